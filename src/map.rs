//! Per-element transforms built on the executors.
//!
//! Each element becomes one task that calls the caller's routine with `(done, value, index)`.
//! The values the routine completes with replace the element; results are concatenated.
//!
//! [`map`] is waterfall-backed and keeps index order: the accumulated results travel
//! through the waterfall hand-off itself, so every wrapper task receives the results so far
//! as its inputs and forwards them extended. [`map_parallel`] is parallel-backed and
//! returns results in completion order.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::callback::RunResult;
use crate::list::TaskList;
use crate::task::Done;

/// Transform `items` one at a time, in order.
///
/// The first routine failure stops the run; no later element is visited. Empty input
/// produces [`FlowError::NoTasks`](crate::FlowError::NoTasks).
///
/// # Examples
///
/// ```
/// use flowx::{map, Done};
///
/// # futures::executor::block_on(async {
/// let doubled = map(vec![1, 2, 3], |done: Done<i32>, value: i32, _index| async move {
///     done.ok([value * 2]);
/// })
/// .await
/// .unwrap();
///
/// assert_eq!(doubled, vec![2, 4, 6]);
/// # });
/// ```
pub async fn map<I, O, F, Fut, It>(items: It, routine: F) -> RunResult<O>
where
    It: IntoIterator<Item = I>,
    I: Send + 'static,
    O: Send + 'static,
    F: Fn(Done<O>, I, usize) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let routine = Arc::new(routine);
    let mut list = TaskList::new();

    for (index, item) in items.into_iter().enumerate() {
        let routine = Arc::clone(&routine);
        list.add(move |done: Done<O>, mut accumulated: Vec<O>| async move {
            let (inner, completion) = Done::channel();
            routine(inner, item, index).await;

            match completion.await {
                Ok(Ok(values)) => {
                    accumulated.extend(values);
                    done.ok(accumulated);
                }
                Ok(Err(err)) => done.fail(err),
                // The routine dropped its handle; dropping ours reports the same.
                Err(_) => drop(done),
            }
        });
    }

    list.run_waterfall(Vec::new()).await
}

/// Transform `items` concurrently; results arrive in completion order.
///
/// The first routine failure is reported once; the other routines still run to
/// completion. Empty input produces [`FlowError::NoTasks`](crate::FlowError::NoTasks).
pub async fn map_parallel<I, O, F, Fut, It, S>(items: It, routine: F, spawner: S) -> RunResult<O>
where
    It: IntoIterator<Item = I>,
    I: Send + 'static,
    O: Send + 'static,
    F: Fn(Done<O>, I, usize) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
    S: Fn(BoxFuture<'static, ()>),
{
    let routine = Arc::new(routine);
    let mut list = TaskList::new();

    for (index, item) in items.into_iter().enumerate() {
        let routine = Arc::clone(&routine);
        list.add(move |done: Done<O>, _| routine(done, item, index));
    }

    list.run_parallel(spawner).await
}
