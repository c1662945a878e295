use std::{
    any::Any,
    panic::{AssertUnwindSafe, catch_unwind},
};
use thiserror::Error;

/// A panic raised by a task body, captured at a fork-join boundary.
///
/// Spawned tasks and [`Executor::install`] convert panics into this value so
/// that a failing leaf is reported through the enclosing sync instead of
/// tearing down a worker thread.
///
/// [`Executor::install`]: crate::executor::Executor::install
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TaskPanic {
    /// Panic payload rendered as text.
    pub message: String,
}

impl TaskPanic {
    pub(crate) fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_owned()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "non-string panic payload".to_owned()
        };
        Self { message }
    }
}

/// Runs a fallible task body, turning a panic into an ordinary failure.
pub(crate) fn run_task<R, E>(body: impl FnOnce() -> Result<R, E>) -> Result<R, E>
where
    E: From<TaskPanic>,
{
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let panic = TaskPanic::from_payload(payload.as_ref());
            log::debug!("task panicked: {}", panic.message);
            Err(panic.into())
        }
    }
}
