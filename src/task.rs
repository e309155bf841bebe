//! Task trait, completion handle and task execution.
//!
//! A task is a unit of async work invoked with a [`Done`] handle and its input values. The
//! task reports its outcome by consuming the handle exactly once.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::channel::oneshot;
use futures::future::BoxFuture;
use futures::FutureExt;

#[cfg(feature = "tracing")]
use tracing::trace;

use crate::error::{BoxError, FlowError, FlowResult};

/// Outcome a task reports through its [`Done`] handle.
pub type TaskOutcome<T> = Result<Vec<T>, BoxError>;

/// Boxed task, the form stored in a [`TaskList`](crate::TaskList).
pub type BoxTask<T> = Box<dyn Task<T>>;

/// A callback-driven unit of async work.
///
/// The task receives a [`Done`] handle and the input values chosen by the executor
/// (the previous task's results in a waterfall, nothing otherwise). It must resolve the
/// handle exactly once. The returned future is driven to completion by the executor.
///
/// Closures of the shape `FnOnce(Done<T>, Vec<T>) -> impl Future<Output = ()>` implement
/// this trait, so most callers never implement it by hand:
///
/// ```
/// use flowx::{Done, TaskList};
///
/// let mut list = TaskList::<i32>::new();
/// list.add(|done: Done<i32>, inputs: Vec<i32>| async move {
///     done.ok(inputs.into_iter().map(|x| x + 1));
/// });
/// assert_eq!(list.len(), 1);
/// ```
///
/// # Contract
///
/// A task that keeps its `Done` alive without ever resolving it blocks the run forever.
/// That is a caller bug; the executors do not time out. Dropping the handle (or panicking)
/// is detected and reported as [`FlowError::Abandoned`] or [`FlowError::TaskPanicked`].
pub trait Task<T>: Send {
    fn run(self: Box<Self>, done: Done<T>, inputs: Vec<T>) -> BoxFuture<'static, ()>;
}

impl<T, F, Fut> Task<T> for F
where
    F: FnOnce(Done<T>, Vec<T>) -> Fut + Send,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn run(self: Box<Self>, done: Done<T>, inputs: Vec<T>) -> BoxFuture<'static, ()> {
        (*self)(done, inputs).boxed()
    }
}

/// Box an async closure as a task.
pub fn task<T, F, Fut>(f: F) -> BoxTask<T>
where
    T: Send + 'static,
    F: FnOnce(Done<T>, Vec<T>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Box::new(f)
}

/// Box a synchronous callback-style closure as a task.
///
/// The closure runs when the task starts; it may resolve `done` immediately or hand it to
/// another thread that resolves it later.
///
/// ```
/// use flowx::task_fn;
///
/// let _t = task_fn(|done, _inputs: Vec<&'static str>| {
///     std::thread::spawn(move || done.ok(["from a thread"]));
/// });
/// ```
pub fn task_fn<T, F>(f: F) -> BoxTask<T>
where
    T: Send + 'static,
    F: FnOnce(Done<T>, Vec<T>) + Send + 'static,
{
    Box::new(move |done: Done<T>, inputs: Vec<T>| {
        f(done, inputs);
        futures::future::ready(())
    })
}

/// Completion handle given to every task.
///
/// Every method consumes the handle, so a task cannot report twice.
#[must_use = "a task must resolve its Done handle exactly once"]
pub struct Done<T> {
    tx: oneshot::Sender<TaskOutcome<T>>,
}

impl<T> Done<T> {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<TaskOutcome<T>>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Succeed with the given result values.
    pub fn ok<I>(self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.complete(Ok(values.into_iter().collect()));
    }

    /// Succeed without result values.
    pub fn empty(self) {
        self.complete(Ok(Vec::new()));
    }

    /// Fail with the given error.
    pub fn fail<E>(self, error: E)
    where
        E: Into<BoxError>,
    {
        self.complete(Err(error.into()));
    }

    /// Report an already-built outcome.
    pub fn complete(self, outcome: TaskOutcome<T>) {
        // The receiver is gone only if the run itself was dropped.
        let _ = self.tx.send(outcome);
    }
}

impl<T> std::fmt::Debug for Done<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Done")
            .field("run_dropped", &self.tx.is_canceled())
            .finish()
    }
}

/// Run one task to completion and translate its outcome.
///
/// The task body is driven to completion first and dropped, which releases a `Done` the
/// body still holds (including after a panic). The completion handle is awaited after
/// that, so a `Done` handed off to another thread or runtime is still waited for. Panics
/// are caught so that a panicking task behaves the same whether it runs inline or on a
/// spawned worker.
pub(crate) async fn execute<T>(task: BoxTask<T>, index: usize, inputs: Vec<T>) -> FlowResult<Vec<T>>
where
    T: Send + 'static,
{
    #[cfg(feature = "tracing")]
    trace!(task_index = index, inputs = inputs.len(), "starting task");

    let (done, completion) = Done::channel();
    let body = AssertUnwindSafe(async move { task.run(done, inputs).await })
        .catch_unwind()
        .await;
    let outcome = completion.await;

    let result = match (outcome, body) {
        (Ok(Ok(values)), _) => Ok(values),
        (Ok(Err(source)), _) => Err(FlowError::task(index, source)),
        (Err(oneshot::Canceled), Err(payload)) => Err(FlowError::TaskPanicked {
            index,
            panic_message: panic_message(payload.as_ref()),
        }),
        (Err(oneshot::Canceled), Ok(())) => Err(FlowError::Abandoned { index }),
    };

    #[cfg(feature = "tracing")]
    trace!(task_index = index, ok = result.is_ok(), "task finished");

    result
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
