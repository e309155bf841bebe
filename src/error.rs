//! Error types for task runs.
//!
//! Every executor delivers exactly one [`RunResult`](crate::RunResult) per invocation; its
//! failure side is a [`FlowError`].

use std::sync::Arc;

use thiserror::Error;

/// Boxed error a task hands to [`Done::fail`](crate::Done::fail).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can end a run.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum FlowError {
    /// The executor was invoked against an empty task list.
    #[error("no tasks to run")]
    NoTasks,

    /// A task completed with a failure of its own.
    #[error("task #{index} failed: {source}")]
    Task {
        index: usize,
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// A task panicked before resolving its completion handle.
    #[error("task #{index} panicked: {panic_message}")]
    TaskPanicked { index: usize, panic_message: String },

    /// A task dropped its completion handle without resolving it.
    #[error("task #{index} dropped its completion handle without reporting an outcome")]
    Abandoned { index: usize },

    /// Workers vanished before reporting (the spawner dropped their futures).
    #[error("{missing} worker(s) were dropped by the spawner before reporting an outcome")]
    WorkersLost { missing: usize },
}

impl FlowError {
    pub(crate) fn task(index: usize, source: BoxError) -> Self {
        FlowError::Task {
            index,
            source: Arc::from(source),
        }
    }

    /// Position of the task that caused this failure, if a single task did.
    pub fn index(&self) -> Option<usize> {
        match self {
            FlowError::Task { index, .. }
            | FlowError::TaskPanicked { index, .. }
            | FlowError::Abandoned { index } => Some(*index),
            FlowError::NoTasks | FlowError::WorkersLost { .. } => None,
        }
    }

    /// The error a task passed to [`Done::fail`](crate::Done::fail), for downcasting.
    ///
    /// ```
    /// use flowx::FlowError;
    ///
    /// let err = FlowError::NoTasks;
    /// assert!(err.task_failure().is_none());
    /// ```
    pub fn task_failure(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            FlowError::Task { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }

    /// True for the structural "no tasks" failure.
    pub fn is_no_tasks(&self) -> bool {
        matches!(self, FlowError::NoTasks)
    }
}

/// Result type for flow operations
pub type FlowResult<T> = Result<T, FlowError>;
