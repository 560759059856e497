use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::Semaphore;

use crate::configuration::Settings;
use crate::domain::{ProfileTask, ScrapeError};
use crate::services::pipeline::{run_task, RetryPolicy, TaskOutcome};
use crate::services::sink::{sink_handler, RunResult};
use crate::services::Fetcher;

/// Dispatches every task onto the worker pool and drains the outcomes into
/// the sink. One outcome reaches the sink per task, no matter what: a
/// worker that panics is converted into a failure at the join boundary.
pub async fn run_scrape<F>(
    fetcher: Arc<F>,
    tasks: Vec<ProfileTask>,
    settings: &Settings,
) -> RunResult
where
    F: Fetcher + 'static,
{
    let policy = RetryPolicy::from_settings(&settings.run);
    let workers = Arc::new(Semaphore::new(settings.run.max_workers.max(1)));
    let (outcome_sender, outcome_receiver) = mpsc::unbounded_channel::<TaskOutcome>();

    let sink = tokio::spawn(sink_handler(
        outcome_receiver,
        settings.run.progress_every,
        Duration::from_secs(settings.run.progress_pause_secs),
    ));

    let mut handles = Vec::with_capacity(tasks.len());
    for task in tasks {
        let fetcher = fetcher.clone();
        let policy = policy.clone();
        let workers = workers.clone();
        let sender = outcome_sender.clone();
        let spawned = task.clone();

        let handle = tokio::spawn(async move {
            let _slot = workers
                .acquire_owned()
                .await
                .expect("worker pool semaphore closed");
            let outcome = run_task(fetcher.as_ref(), &spawned, &policy).await;
            let _ = sender.send(outcome);
        });

        handles.push((handle, task));
    }

    for (handle, task) in handles {
        if let Err(join_error) = handle.await {
            log::error!("Worker for {} panicked: {join_error}", task.url);
            let _ = outcome_sender.send(TaskOutcome::Failure(ScrapeError::new(
                &task,
                format!("task panicked: {join_error}"),
            )));
        }
    }

    drop(outcome_sender);
    sink.await.expect("sink task panicked")
}
