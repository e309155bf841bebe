//! Sequential executors: waterfall and series.
//!
//! Both pop one task at a time from the front of the list and never start task *k+1*
//! before task *k* has reported. Waterfall forwards each task's result values as the next
//! task's inputs; series invokes every task with no inputs and reports no values.
//!
//! Tasks run inline in the orchestrating future. There is only ever one task in flight, so
//! spawning buys nothing.

#[cfg(feature = "tracing")]
use tracing::{debug, error, info};

use crate::callback::RunResult;
use crate::error::FlowError;
use crate::list::{Handoff, TaskList};
use crate::task::{execute, BoxTask};

/// Where a sequential run stands between two tasks.
enum Stage<T> {
    /// Task `index` is next; `carried` holds the values it will receive.
    Ready { index: usize, carried: Vec<T> },
    Completed(Vec<T>),
    Failed(FlowError),
}

impl<T: Send + 'static> TaskList<T> {
    /// Run every task in order, each one receiving the previous task's result values.
    ///
    /// The first task receives `initial`. On success every handler (and the returned
    /// result) gets the last task's result values. The first failure stops the run: no
    /// later task starts and the failure is delivered once. An empty list delivers
    /// [`FlowError::NoTasks`].
    ///
    /// # Examples
    ///
    /// ```
    /// use flowx::{Done, TaskList};
    ///
    /// # futures::executor::block_on(async {
    /// let mut list = TaskList::new();
    /// list.add(|done: Done<String>, inputs: Vec<String>| async move {
    ///     done.ok(inputs.into_iter().map(|s| s.to_uppercase()));
    /// })
    /// .add(|done: Done<String>, inputs: Vec<String>| async move {
    ///     done.ok([inputs.join("-")]);
    /// });
    ///
    /// let result = list.run_waterfall(vec!["a".into(), "b".into()]).await;
    /// assert_eq!(result.unwrap(), vec!["A-B".to_string()]);
    /// # });
    /// ```
    pub async fn run_waterfall(self, initial: Vec<T>) -> RunResult<T> {
        self.run_sequential(initial, Handoff::Forward).await
    }

    /// Run every task in order, ignoring result values.
    ///
    /// Each task is invoked with no inputs. Success is delivered as `Ok` with no values.
    /// Failure and empty-list behavior match [`TaskList::run_waterfall`].
    pub async fn run_series(self) -> RunResult<T> {
        self.run_sequential(Vec::new(), Handoff::Discard).await
    }

    async fn run_sequential(mut self, initial: Vec<T>, handoff: Handoff) -> RunResult<T> {
        #[cfg(feature = "tracing")]
        info!(tasks = self.tasks.len(), ?handoff, "starting sequential run");

        if self.tasks.is_empty() {
            return self.finish(Err(FlowError::NoTasks));
        }

        self.pending.arm(self.tasks.len());

        let mut stage = Stage::Ready {
            index: 0,
            carried: match handoff {
                Handoff::Forward => initial,
                Handoff::Discard => Vec::new(),
            },
        };

        let result = loop {
            stage = match stage {
                Stage::Ready { index, carried } => match self.tasks.pop_front() {
                    Some(task) => self.step(task, index, carried, handoff).await,
                    None => Stage::Completed(carried),
                },
                Stage::Completed(values) => break Ok(values),
                Stage::Failed(err) => break Err(err),
            };
        };

        self.finish(result)
    }

    async fn step(
        &mut self,
        task: BoxTask<T>,
        index: usize,
        carried: Vec<T>,
        handoff: Handoff,
    ) -> Stage<T> {
        match execute(task, index, carried).await {
            Ok(values) => {
                self.pending.complete_one();

                #[cfg(feature = "tracing")]
                debug!(
                    task_index = index,
                    values = values.len(),
                    remaining = self.tasks.len(),
                    "task completed"
                );

                let carried = match handoff {
                    Handoff::Forward => values,
                    Handoff::Discard => Vec::new(),
                };
                Stage::Ready {
                    index: index + 1,
                    carried,
                }
            }
            Err(err) => {
                // Nothing after this task will run; release the remaining waits.
                self.pending.settle();

                #[cfg(feature = "tracing")]
                error!(task_index = index, error = %err, skipped = self.tasks.len(), "sequential run failed");

                Stage::Failed(err)
            }
        }
    }

    fn finish(self, result: RunResult<T>) -> RunResult<T> {
        #[cfg(feature = "tracing")]
        info!(ok = result.is_ok(), "sequential run finished");

        self.callbacks.deliver(&result);
        result
    }
}

/// Build a list from `tasks` and run it as a waterfall.
pub async fn waterfall<T, I>(tasks: I, initial: Vec<T>) -> RunResult<T>
where
    T: Send + 'static,
    I: IntoIterator<Item = BoxTask<T>>,
{
    tasks.into_iter().collect::<TaskList<T>>().run_waterfall(initial).await
}

/// Build a list from `tasks` and run it as a series.
pub async fn series<T, I>(tasks: I) -> RunResult<T>
where
    T: Send + 'static,
    I: IntoIterator<Item = BoxTask<T>>,
{
    tasks.into_iter().collect::<TaskList<T>>().run_series().await
}
