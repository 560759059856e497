use std::time::Duration;

use rand::Rng;
use thiserror::Error;

use crate::configuration::RunSettings;
use crate::domain::{DoctorRecord, ProfileTask, ScrapeError};
use crate::services::extractor::{extract_profile, ExtractedProfile};
use crate::services::fetcher::{FetchError, Fetcher};
use crate::services::normalizer::{parse_address, parse_name};

/// Anything that makes a single attempt unusable. Both variants are
/// retryable; a page that renders without its name heading often renders
/// fully on the next visit.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("could not find name element")]
    MissingName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Attempting { attempt: u8 },
    Retrying { attempt: u8 },
    Succeeded,
    Failed,
}

#[derive(Debug)]
pub enum TaskOutcome {
    Record(DoctorRecord),
    Failure(ScrapeError),
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per task.
    pub max_retries: u8,
    pub backoff: Duration,
    pub delay_min_ms: u64,
    pub delay_max_ms: u64,
}

impl RetryPolicy {
    pub fn from_settings(run: &RunSettings) -> Self {
        RetryPolicy {
            max_retries: run.max_retries.max(1),
            backoff: Duration::from_secs(run.backoff_secs),
            delay_min_ms: run.delay_min_ms,
            delay_max_ms: run.delay_max_ms.max(run.delay_min_ms),
        }
    }
}

/// Runs the fetch -> extract -> normalize pipeline for one task, with
/// bounded retries and a politeness delay before every attempt.
///
/// Always resolves to exactly one outcome.
pub async fn run_task<F: Fetcher>(
    fetcher: &F,
    task: &ProfileTask,
    policy: &RetryPolicy,
) -> TaskOutcome {
    let mut state = TaskState::Pending;
    let mut last_error = String::new();

    for attempt in 1..=policy.max_retries {
        transition(task, &mut state, TaskState::Attempting { attempt });
        politeness_delay(policy).await;

        match attempt_once(fetcher, task).await {
            Ok(record) => {
                transition(task, &mut state, TaskState::Succeeded);
                return TaskOutcome::Record(record);
            }
            Err(e) => {
                log::warn!("Attempt {attempt} failed for {}: {e}", task.url);
                last_error = e.to_string();

                if attempt < policy.max_retries {
                    transition(task, &mut state, TaskState::Retrying { attempt });
                    tokio::time::sleep(policy.backoff).await;
                }
            }
        }
    }

    transition(task, &mut state, TaskState::Failed);
    TaskOutcome::Failure(ScrapeError::new(task, last_error))
}

fn transition(task: &ProfileTask, state: &mut TaskState, next: TaskState) {
    log::trace!("{}: {:?} -> {:?}", task.url, state, next);
    *state = next;
}

async fn politeness_delay(policy: &RetryPolicy) {
    let ms = {
        let mut rng = rand::thread_rng();
        rng.gen_range(policy.delay_min_ms..=policy.delay_max_ms)
    };
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

async fn attempt_once<F: Fetcher>(
    fetcher: &F,
    task: &ProfileTask,
) -> Result<DoctorRecord, AttemptError> {
    let page = fetcher.fetch(&task.url).await?;
    let profile = extract_profile(&page.body).map_err(|_| AttemptError::MissingName)?;

    Ok(assemble_record(task, &profile))
}

/// Maps the extracted fields onto the fixed output schema. Fields with no
/// source stay empty; the region from the input file stands in for the
/// state, and the country is always the one this directory covers.
pub fn assemble_record(task: &ProfileTask, profile: &ExtractedProfile) -> DoctorRecord {
    let name = parse_name(&profile.name);

    let address_raw = profile
        .fields
        .get("Practice Address")
        .map(|a| a.trim())
        .unwrap_or("");
    let address = parse_address(address_raw);

    let field = |key: &str| profile.fields.get(key).cloned().unwrap_or_default();

    DoctorRecord {
        title: name.title,
        forename: name.forename,
        surname: name.surname,
        full_address: field("Practice Address"),
        institution: field("Practice Name"),
        department: field("Specialty"),
        street: address.street,
        city: address.city,
        state: task.region.clone(),
        postcode: address.postcode,
        country: "United States".to_string(),
        specialty: field("Specialty"),
        tel_1: field("Phone"),
        workplace: field("Practice Name"),
        website: field("Website"),
        source_result_url: task.url.clone(),
        ..DoctorRecord::default()
    }
}
