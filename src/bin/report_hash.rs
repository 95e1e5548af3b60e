use clap::Parser;
use protondb_scraping::report_hash::report_hash;

/// Prints the hash of the report file of a game.
#[derive(Parser)]
struct Opts {
    app_id: u64,
    reports: u64,
    /// Timestamp of the data dump, in seconds.
    timestamp: u64,
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    let hash = report_hash(opts.app_id, opts.reports, opts.timestamp)
        .ok_or_else(|| anyhow::anyhow!("The timestamp must not be zero"))?;
    println!("{hash}");
    Ok(())
}
