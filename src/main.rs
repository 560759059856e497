use std::sync::Arc;

use env_logger::Env;
use housecall::configuration::{get_configuration, FetchStrategy, Settings};
use housecall::domain::ProfileTask;
use housecall::services::{
    browser::BrowserFetcher, directory, fetcher::StaticFetcher, sink::RunResult, tasklist,
};
use housecall::startup::run_scrape;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().expect("Failed to read configuration.");

    let tasks = collect_tasks(&configuration).await?;
    log::info!("Total profiles to scrape: {}", tasks.len());

    let result = scrape_all(tasks, &configuration).await?;

    result.write(&configuration.output)?;
    log::info!(
        "Scraping complete: {} profiles, {} failures",
        result.records.len(),
        result.errors.len()
    );

    Ok(())
}

/// Tasks come from the input CSV, optionally extended by a directory
/// listing endpoint, then deduplicated as one list (first URL wins).
async fn collect_tasks(configuration: &Settings) -> anyhow::Result<Vec<ProfileTask>> {
    let mut tasks = tasklist::load_tasks(&configuration.source.input_path)?;

    if let Some(listing) = &configuration.source.directory {
        let extra =
            directory::directory_tasks(listing, configuration.fetch.request_timeout_secs).await?;
        tasks.extend(extra);
        tasks = tasklist::dedupe(tasks);
    }

    Ok(tasks)
}

async fn scrape_all(tasks: Vec<ProfileTask>, configuration: &Settings) -> anyhow::Result<RunResult> {
    let result = match configuration.fetch.strategy {
        FetchStrategy::Static => {
            let fetcher = Arc::new(StaticFetcher::new(&configuration.fetch)?);
            run_scrape(fetcher, tasks, configuration).await
        }
        FetchStrategy::Browser => {
            let fetcher = Arc::new(BrowserFetcher::new(configuration.fetch.clone()));
            run_scrape(fetcher, tasks, configuration).await
        }
    };

    Ok(result)
}
