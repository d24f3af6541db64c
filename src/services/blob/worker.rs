//! Background runtime for blob transfers.
//!
//! OpenDAL's HTTP and filesystem services need a tokio reactor, which the
//! UI executor does not provide. The worker owns a small tokio runtime;
//! futures are spawned onto it and the returned handle is awaited from the
//! UI thread, so results always land back on the thread that owns the view.

use anyhow::{anyhow, Context as _, Result};
use std::future::Future;

/// Number of tokio worker threads. One transfer is in flight at a time.
const WORKER_THREADS: usize = 2;

/// Tokio runtime that executes blob operations for the UI.
pub struct BlobWorker {
    runtime: tokio::runtime::Runtime,
}

impl BlobWorker {
    /// Start the worker runtime.
    pub fn new() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(WORKER_THREADS)
            .thread_name("blob-worker")
            .enable_all()
            .build()
            .context("Failed to start blob worker runtime")?;

        Ok(Self { runtime })
    }

    /// Run a future on the worker and return a handle to await its output.
    ///
    /// The returned future can be awaited from any executor.
    pub fn spawn<F, T>(&self, future: F) -> impl Future<Output = Result<T>> + 'static
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let handle = self.runtime.spawn(future);
        async move {
            handle
                .await
                .map_err(|e| anyhow!("Blob task did not complete: {}", e))
        }
    }
}
