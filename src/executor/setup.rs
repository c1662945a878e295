use crate::config::{ExecutionMode, ExecutorConfig};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use thiserror::Error;

/// Error kind for executor setup failures.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExecutorSetupError {
    /// The worker threads could not be started.
    #[error("failed to start a pool of {workers} worker(s)")]
    Pool {
        /// Requested worker count.
        workers: usize,
        /// Underlying pool error.
        #[source]
        source: ThreadPoolBuildError,
    },
}

/// Builds the worker pool for a parallel configuration; serial ones get none.
pub(super) fn build_pool(config: &ExecutorConfig) -> Result<Option<ThreadPool>, ExecutorSetupError> {
    let ExecutorConfig {
        workers,
        mode,
        stack_size,
        thread_name,
    } = config;
    if *mode == ExecutionMode::Serial {
        log::debug!("serial executor, no worker pool");
        return Ok(None);
    }
    let prefix = thread_name.clone();
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers.get())
        .stack_size(*stack_size)
        .thread_name(move |index| format!("{prefix}-{index}"))
        .build()
        .map_err(|source| ExecutorSetupError::Pool {
            workers: workers.get(),
            source,
        })?;
    log::debug!(
        "started {} worker(s) named {thread_name}-*, stack {stack_size} bytes",
        pool.current_num_threads()
    );
    Ok(Some(pool))
}
