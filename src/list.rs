//! The task list: ordered pending tasks plus the completion counter of a run.
//!
//! A [`TaskList`] is built per invocation, populated before the run, drained by exactly one
//! executor, and consumed by it. Every executor takes the list by value, so a list can
//! never be run twice.

use std::collections::VecDeque;
use std::future::Future;

#[cfg(feature = "tracing")]
use tracing::debug;

use crate::callback::{Callbacks, RunResult};
use crate::error::{FlowError, FlowResult};
use crate::task::{BoxTask, Done, Task};

/// What an executor does with a task's result values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Handoff {
    /// Keep them: forward to the next task (waterfall) or aggregate them (parallel).
    Forward,
    /// Drop them; only success or failure matters (series, series-parallel).
    Discard,
}

/// Counts task completions still outstanding in a run.
///
/// Armed with the task count at run start, decremented once per observed completion.
/// Zero means every launched task has reported. Only the future that owns the run touches
/// it, so it needs no synchronization.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CompletionCounter {
    remaining: usize,
}

impl CompletionCounter {
    pub fn arm(&mut self, tasks: usize) {
        self.remaining = tasks;
    }

    /// Record one completion. Returns true when this was the last one.
    pub fn complete_one(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }

    /// Release every outstanding wait (used when a sequential run stops early).
    pub fn settle(&mut self) {
        self.remaining = 0;
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn is_settled(&self) -> bool {
        self.remaining == 0
    }
}

/// Ordered container of pending tasks.
///
/// The front of the list runs first. Add tasks, register completion handlers with
/// [`TaskList::on_complete`], then hand the list to exactly one executor:
/// [`run_waterfall`](TaskList::run_waterfall), [`run_series`](TaskList::run_series),
/// [`run_parallel`](TaskList::run_parallel) or
/// [`run_series_parallel`](TaskList::run_series_parallel).
///
/// # Examples
///
/// ```
/// use flowx::{Done, TaskList};
///
/// # futures::executor::block_on(async {
/// let mut list = TaskList::new();
/// list.add(|done: Done<u32>, _| async move { done.ok([1]) })
///     .add(|done: Done<u32>, inputs: Vec<u32>| async move {
///         done.ok(inputs.into_iter().map(|x| x + 1));
///     })
///     .on_complete(|result| println!("finished: {result:?}"));
///
/// assert_eq!(list.run_waterfall(Vec::new()).await.unwrap(), vec![2]);
/// # });
/// ```
pub struct TaskList<T> {
    pub(crate) tasks: VecDeque<BoxTask<T>>,
    pub(crate) callbacks: Callbacks<T>,
    pub(crate) pending: CompletionCounter,
}

impl<T> Default for TaskList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TaskList<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
            callbacks: Callbacks::new(),
            pending: CompletionCounter::default(),
        }
    }

    /// Create an empty list with room for `capacity` tasks.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tasks: VecDeque::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Number of tasks still waiting to run.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Completions the current run is still waiting for.
    pub fn outstanding(&self) -> usize {
        self.pending.remaining()
    }

    /// Drop every pending task and handler, returning a fresh empty list.
    pub fn clear(self) -> Self {
        #[cfg(feature = "tracing")]
        debug!(discarded = self.tasks.len(), "clearing task list");

        Self::new()
    }

    /// Remove and return the task at the front.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::NoTasks`] if the list is empty.
    pub fn remove_front(&mut self) -> FlowResult<BoxTask<T>> {
        self.tasks.pop_front().ok_or(FlowError::NoTasks)
    }
}

impl<T: Send + 'static> TaskList<T> {
    /// Append a closure task.
    pub fn add<F, Fut>(&mut self, task: F) -> &mut Self
    where
        F: FnOnce(Done<T>, Vec<T>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.push(Box::new(task))
    }

    /// Append any [`Task`] implementation.
    pub fn add_task<Tk>(&mut self, task: Tk) -> &mut Self
    where
        Tk: Task<T> + 'static,
    {
        self.push(Box::new(task))
    }

    /// Append several boxed tasks, keeping their order.
    pub fn add_multiple<I>(&mut self, tasks: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxTask<T>>,
    {
        for task in tasks {
            self.push(task);
        }
        self
    }

    /// Register a completion handler. Every handler receives the run's single result.
    pub fn on_complete<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnOnce(&RunResult<T>) + Send + 'static,
    {
        self.callbacks.push(Box::new(handler));
        self
    }

    fn push(&mut self, task: BoxTask<T>) -> &mut Self {
        self.tasks.push_back(task);

        #[cfg(feature = "tracing")]
        debug!(position = self.tasks.len() - 1, "added task to list");

        self
    }
}

impl<T> FromIterator<BoxTask<T>> for TaskList<T> {
    fn from_iter<I: IntoIterator<Item = BoxTask<T>>>(iter: I) -> Self {
        Self {
            tasks: iter.into_iter().collect(),
            ..Self::new()
        }
    }
}

impl<T> std::fmt::Debug for TaskList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskList")
            .field("tasks", &self.tasks.len())
            .field("callbacks", &self.callbacks.len())
            .field("pending", &self.pending)
            .finish()
    }
}
