use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::configuration::OutputSettings;
use crate::domain::{DoctorRecord, ScrapeError};
use crate::services::pipeline::TaskOutcome;

#[derive(Debug, Default)]
pub struct RunResult {
    pub records: Vec<DoctorRecord>,
    pub errors: Vec<ScrapeError>,
}

/// Drains task outcomes until every sender is gone. The pacing pause only
/// delays the progress announcements; workers keep running.
pub async fn sink_handler(
    mut outcomes: UnboundedReceiver<TaskOutcome>,
    progress_every: usize,
    progress_pause: Duration,
) -> RunResult {
    log::info!("Started sink handler");

    let mut result = RunResult::default();
    let mut completed = 0usize;

    while let Some(outcome) = outcomes.recv().await {
        match outcome {
            TaskOutcome::Record(record) => result.records.push(record),
            TaskOutcome::Failure(error) => {
                log::warn!(
                    "Giving up on {}: {}",
                    error.url,
                    error.reason.as_deref().unwrap_or("unknown reason")
                );
                result.errors.push(error);
            }
        }

        completed += 1;
        if progress_every > 0 && completed % progress_every == 0 {
            log::info!("Processed {completed} profiles...");
            tokio::time::sleep(progress_pause).await;
        }
    }

    result
}

impl RunResult {
    /// Writes both CSVs. Empty collections produce no file at all.
    pub fn write(&self, output: &OutputSettings) -> anyhow::Result<()> {
        if !self.records.is_empty() {
            let mut writer = csv::Writer::from_path(&output.records_path)
                .with_context(|| format!("Failed to create {}", output.records_path))?;
            for record in &self.records {
                writer.serialize(record)?;
            }
            writer.flush()?;
            log::info!(
                "Saved {} profiles to {}",
                self.records.len(),
                output.records_path
            );
        }

        if !self.errors.is_empty() {
            let mut writer = csv::Writer::from_path(&output.errors_path)
                .with_context(|| format!("Failed to create {}", output.errors_path))?;
            for error in &self.errors {
                writer.serialize(error)?;
            }
            writer.flush()?;
            log::info!(
                "Encountered {} errors, saved to {}",
                self.errors.len(),
                output.errors_path
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProfileTask;
    use tokio::sync::mpsc;

    fn output_in(dir: &std::path::Path) -> OutputSettings {
        OutputSettings {
            records_path: dir.join("records.csv").to_str().unwrap().to_string(),
            errors_path: dir.join("errors.csv").to_str().unwrap().to_string(),
        }
    }

    #[tokio::test]
    async fn sink_collects_outcomes_in_arrival_order() {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut record = DoctorRecord::default();
        record.surname = "Doe".to_string();
        tx.send(TaskOutcome::Record(record)).unwrap();
        tx.send(TaskOutcome::Failure(ScrapeError::new(
            &ProfileTask {
                region: "AL".into(),
                url: "https://dir.example/p/9".into(),
            },
            "timeout",
        )))
        .unwrap();
        drop(tx);

        let result = sink_handler(rx, 10, Duration::ZERO).await;

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].surname, "Doe");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].url, "https://dir.example/p/9");
    }

    #[test]
    fn write_produces_fixed_headers_and_skips_reason_column() {
        let dir = tempfile::tempdir().unwrap();
        let output = output_in(dir.path());

        let mut record = DoctorRecord::default();
        record.forename = "Jane".to_string();
        record.country = "United States".to_string();

        let result = RunResult {
            records: vec![record],
            errors: vec![ScrapeError {
                url: "https://dir.example/p/1".into(),
                region: "IL".into(),
                reason: Some("log only".into()),
            }],
        };

        result.write(&output).unwrap();

        let records = std::fs::read_to_string(&output.records_path).unwrap();
        let header = records.lines().next().unwrap();
        assert!(header.starts_with("title,forename,surname,full_address,institution"));
        assert!(header.ends_with("workplace,website,source_result_url"));
        assert!(records.lines().nth(1).unwrap().contains("Jane"));

        let errors = std::fs::read_to_string(&output.errors_path).unwrap();
        assert_eq!(errors.lines().next().unwrap(), "url,region");
        assert_eq!(
            errors.lines().nth(1).unwrap(),
            "https://dir.example/p/1,IL"
        );
        assert!(!errors.contains("log only"));
    }

    #[test]
    fn empty_collections_write_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let output = output_in(dir.path());

        RunResult::default().write(&output).unwrap();

        assert!(!std::path::Path::new(&output.records_path).exists());
        assert!(!std::path::Path::new(&output.errors_path).exists());
    }
}
