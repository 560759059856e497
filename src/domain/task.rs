use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileTask {
    pub region: String,
    pub url: String,
}

/// A task that exhausted its retries. Only `url` and `region` end up in the
/// errors file; `reason` is for the logs.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScrapeError {
    pub url: String,
    pub region: String,
    #[serde(skip_serializing)]
    pub reason: Option<String>,
}

impl ScrapeError {
    pub fn new(task: &ProfileTask, reason: impl Into<String>) -> Self {
        ScrapeError {
            url: task.url.clone(),
            region: task.region.clone(),
            reason: Some(reason.into()),
        }
    }
}
