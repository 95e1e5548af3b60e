/// Compiles a CSS selector once and hands out a `&'static Selector`.
///
/// The selector text is a literal in every call site, so an invalid one is a
/// programming error and panics with the offending text on first use.
#[macro_export]
macro_rules! selector {
    ($e: expr) => {{
        use ::once_cell::sync::Lazy;
        use ::scraper::Selector;
        static SELECTOR: Lazy<Selector> = Lazy::new(|| {
            Selector::parse($e).unwrap_or_else(|e| panic!("Invalid selector {:?}: {e:?}", $e))
        });
        &*SELECTOR
    }};
}

#[macro_export]
macro_rules! regex {
    ($e: expr) => {{
        use ::once_cell::sync::Lazy;
        use ::regex::Regex;
        static PATTERN: Lazy<Regex> =
            Lazy::new(|| Regex::new($e).unwrap_or_else(|e| panic!("Invalid pattern {:?}: {e}", $e)));
        &*PATTERN
    }};
}
