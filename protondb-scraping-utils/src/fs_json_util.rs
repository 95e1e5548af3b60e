use std::{
    fmt::Debug,
    io::{BufReader, Write},
    path::PathBuf,
};

use anyhow::Context;
use fs_err::File;
use serde::{Deserialize, Serialize};

pub fn read_json<P: Into<PathBuf> + Debug, T: for<'de> Deserialize<'de>>(
    path: P,
) -> anyhow::Result<T> {
    let path = path.into();
    (|| serde_json::from_reader(BufReader::new(File::open(&path)?)).map_err(anyhow::Error::new))()
        .with_context(|| {
            format!(
                "While trying to parse {path:?} as {}",
                std::any::type_name::<T>()
            )
        })
}

/// Serializes `value` with four-space indentation, the layout every file this
/// workspace hands to people is written in.
pub fn to_writer_pretty<W: Write, T: Serialize>(writer: W, value: &T) -> serde_json::Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    value.serialize(&mut serializer)
}

pub fn to_string_pretty<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut buffer = vec![];
    to_writer_pretty(&mut buffer, value)?;
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{read_json, to_string_pretty, to_writer_pretty};

    #[test]
    fn pretty_uses_four_spaces() {
        let value = BTreeMap::from([("a", 1)]);
        assert_eq!(to_string_pretty(&value).unwrap(), "{\n    \"a\": 1\n}");
    }

    #[test]
    fn write_then_read() {
        let path = std::env::temp_dir().join(format!(
            "protondb-scraping-utils-{}.json",
            std::process::id()
        ));
        let value = vec!["x".to_owned(), "y".to_owned()];
        to_writer_pretty(fs_err::File::create(&path).unwrap(), &value).unwrap();
        let read: Vec<String> = read_json(&path).unwrap();
        assert_eq!(read, value);
        let _ = std::fs::remove_file(&path);
    }
}
