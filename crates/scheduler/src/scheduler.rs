use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

/// Admits at most one run at a time. A run requested while another is in
/// flight is skipped rather than queued.
#[derive(Clone, Default)]
pub struct RunGate {
    lock: Arc<Mutex<()>>,
}

impl RunGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `job` unless another run holds the gate; `None` means skipped.
    pub async fn run_exclusive<Fut>(&self, job: Fut) -> Option<Fut::Output>
    where
        Fut: Future,
    {
        let _guard = self.lock.try_lock().ok()?;
        Some(job.await)
    }
}

pub struct PipelineScheduler {
    scheduler: JobScheduler,
    gate: RunGate,
}

impl PipelineScheduler {
    pub async fn new() -> Result<Self> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            scheduler,
            gate: RunGate::new(),
        })
    }

    /// Schedules `job_fn` on a six-field cron expression
    /// (`sec min hour day month weekday`). Ticks that fire while a previous
    /// run is still going are skipped.
    pub async fn add_exclusive_job<F, Fut>(&mut self, cron_expression: &str, job_fn: F) -> Result<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        info!("Scheduling pipeline job with cron: {}", cron_expression);

        let job_fn = Arc::new(job_fn);
        let gate = self.gate.clone();
        let job = Job::new_async(cron_expression, move |_uuid, _l| {
            let job_fn = job_fn.clone();
            let gate = gate.clone();
            Box::pin(async move {
                info!("Executing scheduled run at {}", OffsetDateTime::now_utc());
                match gate.run_exclusive(job_fn()).await {
                    Some(Ok(())) => info!("Scheduled run completed successfully"),
                    Some(Err(e)) => error!("Scheduled run failed: {:#}", e),
                    None => warn!("Previous run still in progress; skipping this tick"),
                }
            })
        })?;

        self.scheduler.add(job).await?;
        Ok(())
    }

    pub async fn start(&self) -> Result<()> {
        info!("Starting scheduler...");
        self.scheduler.start().await?;
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        info!("Shutting down scheduler...");
        self.scheduler.shutdown().await?;
        Ok(())
    }

    pub async fn run_forever(&self) -> Result<()> {
        self.start().await?;

        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn second_run_is_skipped_while_first_holds_gate() {
        let gate = RunGate::new();
        let (release_tx, release_rx) = oneshot::channel::<()>();
        let (started_tx, started_rx) = oneshot::channel::<()>();

        let first_gate = gate.clone();
        let first = tokio::spawn(async move {
            first_gate
                .run_exclusive(async move {
                    let _ = started_tx.send(());
                    let _ = release_rx.await;
                    "first"
                })
                .await
        });

        started_rx.await.unwrap();
        assert_eq!(gate.run_exclusive(async { "second" }).await, None);

        release_tx.send(()).unwrap();
        assert_eq!(first.await.unwrap(), Some("first"));
        assert_eq!(gate.run_exclusive(async { "third" }).await, Some("third"));
    }

    #[tokio::test]
    async fn rejects_malformed_cron() {
        let mut scheduler = PipelineScheduler::new().await.unwrap();
        let result = scheduler
            .add_exclusive_job("every tuesday", || async { Ok(()) })
            .await;
        assert!(result.is_err());
    }
}
