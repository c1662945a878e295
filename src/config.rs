use core::{num::NonZeroUsize, str::FromStr};
use derive_more::{Deref, Display};
use thiserror::Error;

/// Worker count used when nothing else is requested.
pub const DEFAULT_WORKERS: NonZeroUsize = NonZeroUsize::new(4).unwrap();
/// Stack size of every worker thread.
///
/// Quicksort with a last-element pivot recurses `O(n)` deep on sorted input, and
/// a waiting task may run other tasks on top of its own frame.
pub const DEFAULT_STACK_SIZE: usize = 64 * 1024 * 1024;

/// Environment variable holding the worker count for [`ExecutorConfig::from_env`].
pub const WORKERS_ENV: &str = "FJK_WORKERS";
/// Environment variable holding the [`ExecutionMode`] for [`ExecutorConfig::from_env`].
pub const MODE_ENV: &str = "FJK_MODE";

/// Whether forks actually run concurrently.
///
/// `Serial` is the benchmarking baseline: no pool is built and every spawn is an
/// ordinary call in the current thread.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    /// Run every task inline on the calling thread.
    #[display("serial")]
    Serial,
    /// Run tasks on the worker pool.
    #[default]
    #[display("parallel")]
    Parallel,
}

impl FromStr for ExecutionMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "serial" => Ok(Self::Serial),
            "parallel" => Ok(Self::Parallel),
            _ => Err(ConfigError::Mode(value.to_owned())),
        }
    }
}

/// Malformed configuration value.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    /// Worker count is not a positive integer.
    #[error("invalid worker count {0:?}, expected a positive integer")]
    Workers(String),
    /// Unknown execution mode.
    #[error("invalid execution mode {0:?}, expected \"serial\" or \"parallel\"")]
    Mode(String),
}

/// Settings for building an [`Executor`](crate::executor::Executor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Number of worker threads in the pool.
    pub workers: NonZeroUsize,
    /// Serial baseline or parallel execution.
    pub mode: ExecutionMode,
    /// Stack size of each worker thread, in bytes.
    pub stack_size: usize,
    /// Prefix for worker thread names; the worker index is appended.
    pub thread_name: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            mode: ExecutionMode::Parallel,
            stack_size: DEFAULT_STACK_SIZE,
            thread_name: "fjk-worker".to_owned(),
        }
    }
}

impl ExecutorConfig {
    /// Default configuration sized to the host's available parallelism.
    #[must_use]
    pub fn host() -> Self {
        let workers = std::thread::available_parallelism().unwrap_or(DEFAULT_WORKERS);
        Self::default().with_workers(workers)
    }

    /// Serial baseline configuration.
    #[must_use]
    pub fn serial() -> Self {
        Self::default().with_mode(ExecutionMode::Serial)
    }

    /// Default configuration overridden by [`WORKERS_ENV`] and [`MODE_ENV`]
    /// when they are set.
    ///
    /// # Errors
    /// If a set variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    ///
    /// # Errors
    /// If a present value does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = lookup(WORKERS_ENV) {
            let workers = raw
                .trim()
                .parse::<NonZeroUsize>()
                .map_err(|_| ConfigError::Workers(raw.clone()))?;
            config.workers = workers;
        }
        if let Some(raw) = lookup(MODE_ENV) {
            config.mode = raw.parse()?;
        }
        Ok(config)
    }

    /// Sets the worker count.
    #[must_use]
    pub fn with_workers(mut self, workers: NonZeroUsize) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the execution mode.
    #[must_use]
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the worker stack size in bytes.
    #[must_use]
    pub fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = stack_size;
        self
    }

    /// Sets the worker thread name prefix.
    #[must_use]
    pub fn with_thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }
}

/// Largest range a parallel-for leaf processes without splitting further.
#[derive(Debug, Display, Clone, Copy, Deref, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Grain(NonZeroUsize);

impl Grain {
    /// Leaves of a single element.
    pub const ONE: Self = Self(NonZeroUsize::MIN);

    /// A grain of `size`; zero is raised to one.
    #[must_use]
    pub fn new(size: usize) -> Self {
        NonZeroUsize::new(size).map_or(Self::ONE, Self)
    }

    /// Grain giving about eight leaves per worker over `len` items.
    #[must_use]
    pub fn auto(len: usize, workers: NonZeroUsize) -> Self {
        Self::new(len / workers.get().saturating_mul(8))
    }

    /// The grain as a plain count.
    #[must_use]
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for Grain {
    fn default() -> Self {
        Self::ONE
    }
}

/// Leaf sizes used by the Gaussian elimination solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Rows handled serially by one leaf of a forward elimination step.
    pub elimination_grain: Grain,
    /// Terms summed serially by one leaf of a back substitution dot product.
    pub substitution_grain: Grain,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            elimination_grain: Grain::new(8),
            substitution_grain: Grain::new(512),
        }
    }
}
