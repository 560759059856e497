use std::time::Duration;

use anyhow::Context;
use fake_user_agent::get_chrome_rua;
use serde_json::Value;
use url::Url;

use crate::configuration::DirectorySettings;
use crate::domain::ProfileTask;

/// Expands a JSON navigation endpoint into profile tasks, one per link
/// whose URL contains the configured path fragment. Link text becomes the
/// task's region.
pub async fn directory_tasks(
    settings: &DirectorySettings,
    timeout_secs: u64,
) -> anyhow::Result<Vec<ProfileTask>> {
    let client = reqwest::Client::builder()
        .user_agent(get_chrome_rua())
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;

    let base = Url::parse(&settings.url)
        .with_context(|| format!("Invalid directory listing URL {}", settings.url))?;

    let listing: Value = client
        .get(base.clone())
        .send()
        .await
        .with_context(|| format!("Failed to reach directory listing {}", settings.url))?
        .error_for_status()?
        .json()
        .await
        .context("Directory listing is not valid JSON")?;

    let tasks = tasks_from_listing(&listing, &settings.path_filter, &base);
    log::info!(
        "Directory listing {} expanded into {} tasks",
        settings.url,
        tasks.len()
    );

    Ok(tasks)
}

/// Relative link URLs are resolved against the listing URL; absolute ones
/// pass through unchanged.
pub fn tasks_from_listing(listing: &Value, path_filter: &str, base: &Url) -> Vec<ProfileTask> {
    let items = listing
        .pointer("/contextNavigation/navigationItems")
        .and_then(Value::as_array);

    let mut tasks = Vec::new();
    if let Some(items) = items {
        for item in items {
            let link = &item["link"];
            if let (Some(url), Some(text)) = (link["url"].as_str(), link["text"].as_str()) {
                if !url.contains(path_filter) {
                    continue;
                }
                match base.join(url) {
                    Ok(resolved) => tasks.push(ProfileTask {
                        region: text.to_string(),
                        url: resolved.to_string(),
                    }),
                    Err(e) => log::debug!("Skipping unresolvable link {url:?}: {e}"),
                }
            }
        }
    }

    tasks
}
