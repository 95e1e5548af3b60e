use chrono::Utc;
use clap::Parser;
use log::{error, info};
use protondb_scraping::{
    browser::{BrowserOptions, ChromeRenderer},
    cli::Opts,
    config::Settings,
    runner,
};
use protondb_scraping_utils::fs_json_util::to_string_pretty;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let settings = Settings::resolve(Opts::parse().into_partial_settings())?;
    if settings.printconfig {
        println!("{}", to_string_pretty(&settings)?);
    }

    let renderer = ChromeRenderer::launch(&BrowserOptions::from(&settings))?;
    match runner::run(renderer, &settings, Utc::now()) {
        Ok(summary) => {
            match &summary.written_to {
                Some(path) => {
                    println!("{} games processed in: {}", summary.games, path.display())
                }
                None => println!("{} games processed", summary.games),
            }
            if summary.exhausted {
                info!("Every listed game was collected");
            }
            Ok(())
        }
        Err(e) => {
            if let Some(path) = &e.written_to {
                error!(
                    "{} games collected before the failure were saved in: {}",
                    e.games,
                    path.display()
                );
            }
            Err(e.into())
        }
    }
}
