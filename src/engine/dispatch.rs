//! Fire-and-forget background dispatch.
//!
//! Named jobs are queued onto a worker task. There is no retry policy
//! and no deduplication: at most one execution per dispatch is
//! assumed, not enforced, and failures are only logged. Callers that
//! need idempotence must make the dispatched work itself idempotent
//! (action regeneration replaces the existing set for this reason).

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::errors::StewardResult;

type JobFuture = Pin<Box<dyn Future<Output = StewardResult<()>> + Send>>;

struct Job {
    name: String,
    work: JobFuture,
}

/// Queue for background work detached from the request that spawned it.
#[derive(Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<Job>,
    completed: Arc<AtomicU64>,
    failed: Arc<AtomicU64>,
}

impl Dispatcher {
    /// Create a dispatcher and spawn its worker loop on the current
    /// runtime.
    pub fn new() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        let completed = Arc::new(AtomicU64::new(0));
        let failed = Arc::new(AtomicU64::new(0));

        let worker_completed = Arc::clone(&completed);
        let worker_failed = Arc::clone(&failed);
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                match job.work.await {
                    Ok(()) => {
                        debug!(job = %job.name, "background job finished");
                        worker_completed.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(err) => {
                        warn!(job = %job.name, error = %err, "background job failed");
                        worker_failed.fetch_add(1, Ordering::SeqCst);
                    }
                }
            }
        });

        Self {
            tx,
            completed,
            failed,
        }
    }

    /// Queue a named job. The caller gets no handle back; outcomes are
    /// observable only through the counters and the log.
    pub fn dispatch<F>(&self, name: impl Into<String>, work: F)
    where
        F: Future<Output = StewardResult<()>> + Send + 'static,
    {
        let name = name.into();
        let job = Job {
            name: name.clone(),
            work: Box::pin(work),
        };
        if self.tx.send(job).is_err() {
            warn!(job = %name, "dispatcher worker is gone, job dropped");
        }
    }

    /// Jobs that ran to completion.
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::SeqCst)
    }

    /// Jobs that returned an error.
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::SeqCst)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::errors::StewardError;

    async fn settle(dispatcher: &Dispatcher, expected: u64) {
        for _ in 0..100 {
            if dispatcher.completed() + dispatcher.failed() >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("dispatcher did not settle");
    }

    #[tokio::test]
    async fn test_successful_job_counts_as_completed() {
        let dispatcher = Dispatcher::new();
        dispatcher.dispatch("noop", async { Ok(()) });

        settle(&dispatcher, 1).await;
        assert_eq!(dispatcher.completed(), 1);
        assert_eq!(dispatcher.failed(), 0);
    }

    #[tokio::test]
    async fn test_failing_job_counts_as_failed() {
        let dispatcher = Dispatcher::new();
        dispatcher.dispatch("broken", async {
            Err(StewardError::Internal {
                reason: "boom".to_string(),
            })
        });

        settle(&dispatcher, 1).await;
        assert_eq!(dispatcher.completed(), 0);
        assert_eq!(dispatcher.failed(), 1);
    }

    #[tokio::test]
    async fn test_jobs_run_in_dispatch_order() {
        let dispatcher = Dispatcher::new();
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));

        for i in 0..3 {
            let log = Arc::clone(&log);
            dispatcher.dispatch(format!("job-{i}"), async move {
                log.lock().unwrap().push(i);
                Ok(())
            });
        }

        settle(&dispatcher, 3).await;
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);
    }
}
