//! Concurrent executors: parallel and series-parallel.
//!
//! The whole list is drained at once and every task is launched on its own worker through
//! a caller-supplied spawner, which keeps the crate runtime-agnostic:
//!
//! - Tokio: `|fut| { tokio::spawn(fut); }`
//! - async-std: `|fut| { async_std::task::spawn(fut); }`
//! - futures: `|fut| pool.spawn_ok(fut)`
//!
//! Workers never touch shared state. Each one sends exactly one `(index, outcome)` message
//! over a single unbounded channel; the orchestrating future is its only consumer and the
//! sole owner of the failure slot and the result buffer.
//!
//! There is no cancellation. After the first failure is reported the remaining workers keep
//! running until they finish, and their outcomes are drained and discarded. Thread or task
//! usage is therefore proportional to the number of launched tasks, even past a failure.

use futures::channel::mpsc;
use futures::future::BoxFuture;
use futures::StreamExt;

#[cfg(feature = "tracing")]
use tracing::{debug, error, info, trace, warn};

use crate::callback::RunResult;
use crate::error::{FlowError, FlowResult};
use crate::list::{Handoff, TaskList};
use crate::task::{execute, BoxTask};

type Report<T> = (usize, FlowResult<Vec<T>>);

impl<T: Send + 'static> TaskList<T> {
    /// Launch every task concurrently and aggregate their result values.
    ///
    /// Values are appended in completion order, not list order. The first failure is
    /// delivered to the handlers immediately; later failures and all further values are
    /// discarded. The call returns only after every launched worker has reported. An
    /// empty list delivers [`FlowError::NoTasks`] without spawning anything.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowx::{Done, TaskList};
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let mut list = TaskList::new();
    /// for i in 0..3 {
    ///     list.add(move |done: Done<i32>, _| async move { done.ok([i, i * 10]) });
    /// }
    ///
    /// let mut values = list.run_parallel(|fut| { tokio::spawn(fut); }).await.unwrap();
    /// values.sort();
    /// assert_eq!(values, vec![0, 0, 1, 2, 10, 20]);
    /// # }
    /// ```
    pub async fn run_parallel<S>(self, spawner: S) -> RunResult<T>
    where
        S: Fn(BoxFuture<'static, ()>),
    {
        self.run_concurrent(spawner, Handoff::Forward).await
    }

    /// Launch every task concurrently, reporting only success or failure.
    ///
    /// Every task's result values are discarded before aggregation; failures propagate as
    /// in [`TaskList::run_parallel`]. Success is delivered as `Ok` with no values.
    pub async fn run_series_parallel<S>(self, spawner: S) -> RunResult<T>
    where
        S: Fn(BoxFuture<'static, ()>),
    {
        self.run_concurrent(spawner, Handoff::Discard).await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, spawner)))]
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    async fn run_concurrent<S>(mut self, spawner: S, handoff: Handoff) -> RunResult<T>
    where
        S: Fn(BoxFuture<'static, ()>),
    {
        #[cfg(feature = "tracing")]
        info!(tasks = self.tasks.len(), "starting concurrent run");

        if self.tasks.is_empty() {
            let result = Err(FlowError::NoTasks);
            self.callbacks.deliver(&result);
            return result;
        }

        self.pending.arm(self.tasks.len());

        let (report_tx, mut report_rx) = mpsc::unbounded::<Report<T>>();

        for (index, task) in self.tasks.drain(..).enumerate() {
            #[cfg(feature = "tracing")]
            trace!(task_index = index, "spawning worker");

            spawner(Box::pin(worker(task, index, handoff, report_tx.clone())));
        }

        // Only workers hold senders now; the channel closes once all of them are gone.
        drop(report_tx);
        drop(spawner);

        let mut callbacks = Some(self.callbacks);
        let mut failure: Option<FlowError> = None;
        let mut values = Vec::new();

        while !self.pending.is_settled() {
            let Some((index, outcome)) = report_rx.next().await else {
                // Workers were dropped without running to completion.
                let lost = FlowError::WorkersLost {
                    missing: self.pending.remaining(),
                };

                #[cfg(feature = "tracing")]
                error!(error = %lost, "workers vanished before reporting");

                self.pending.settle();
                if failure.is_none() {
                    if let Some(callbacks) = callbacks.take() {
                        callbacks.deliver(&Err(lost.clone()));
                    }
                    failure = Some(lost);
                }
                break;
            };

            self.pending.complete_one();

            match outcome {
                Ok(produced) if failure.is_none() => {
                    #[cfg(feature = "tracing")]
                    debug!(
                        task_index = index,
                        values = produced.len(),
                        remaining = self.pending.remaining(),
                        "worker reported"
                    );

                    values.extend(produced);
                }
                Ok(_) => {
                    #[cfg(feature = "tracing")]
                    trace!(task_index = index, "discarding values after failure");
                }
                Err(err) if failure.is_none() => {
                    #[cfg(feature = "tracing")]
                    error!(task_index = index, error = %err, "concurrent run failed");

                    if let Some(callbacks) = callbacks.take() {
                        callbacks.deliver(&Err(err.clone()));
                    }
                    failure = Some(err);
                }
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    warn!(task_index = index, error = %_err, "ignoring failure after the first");
                }
            }
        }

        let result = match failure {
            Some(err) => Err(err),
            None => Ok(values),
        };

        // Handlers were already notified if the run failed.
        if let Some(callbacks) = callbacks {
            callbacks.deliver(&result);
        }

        #[cfg(feature = "tracing")]
        info!(ok = result.is_ok(), "concurrent run finished");

        result
    }
}

async fn worker<T>(
    task: BoxTask<T>,
    index: usize,
    handoff: Handoff,
    report: mpsc::UnboundedSender<Report<T>>,
) where
    T: Send + 'static,
{
    let outcome = execute(task, index, Vec::new()).await.map(|values| match handoff {
        Handoff::Forward => values,
        Handoff::Discard => Vec::new(),
    });

    // The receiver only disappears if the run future itself was dropped.
    let _ = report.unbounded_send((index, outcome));
}

/// Build a list from `tasks` and run it in parallel.
pub async fn parallel<T, I, S>(tasks: I, spawner: S) -> RunResult<T>
where
    T: Send + 'static,
    I: IntoIterator<Item = BoxTask<T>>,
    S: Fn(BoxFuture<'static, ()>),
{
    tasks.into_iter().collect::<TaskList<T>>().run_parallel(spawner).await
}

/// Build a list from `tasks` and run it series-parallel.
pub async fn series_parallel<T, I, S>(tasks: I, spawner: S) -> RunResult<T>
where
    T: Send + 'static,
    I: IntoIterator<Item = BoxTask<T>>,
    S: Fn(BoxFuture<'static, ()>),
{
    tasks
        .into_iter()
        .collect::<TaskList<T>>()
        .run_series_parallel(spawner)
        .await
}
