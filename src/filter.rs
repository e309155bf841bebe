//! Per-element keep/drop decisions built on the executors.
//!
//! The routine receives `(done, value, index)` and completes a `Done<bool>`. A first value
//! of `false` drops the element; anything else (including no value at all) keeps it.
//!
//! [`filter`] is waterfall-backed: survivors keep their original order and the growing
//! list of survivors is carried by the waterfall hand-off. [`filter_parallel`] is
//! parallel-backed and returns survivors in completion order.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::callback::RunResult;
use crate::list::TaskList;
use crate::task::{Done, TaskOutcome};

fn keeps(decision: &[bool]) -> bool {
    decision.first().copied().unwrap_or(true)
}

/// Resolve `done` from the routine's decision about `item`.
fn settle<T>(done: Done<T>, decision: Option<TaskOutcome<bool>>, item: T, mut kept: Vec<T>) {
    match decision {
        Some(Ok(decision)) => {
            if keeps(&decision) {
                kept.push(item);
            }
            done.ok(kept);
        }
        Some(Err(err)) => done.fail(err),
        None => drop(done),
    }
}

/// Keep the elements of `items` the routine approves, in original order.
///
/// # Examples
///
/// ```
/// use flowx::{filter, Done};
///
/// # futures::executor::block_on(async {
/// let items = vec!["test1", "test2", "test3"];
/// let kept = filter(items, |done: Done<bool>, value: &'static str, _| async move {
///     done.ok([value != "test2"]);
/// })
/// .await
/// .unwrap();
///
/// assert_eq!(kept, vec!["test1", "test3"]);
/// # });
/// ```
pub async fn filter<T, F, Fut, It>(items: It, routine: F) -> RunResult<T>
where
    It: IntoIterator<Item = T>,
    T: Clone + Send + 'static,
    F: Fn(Done<bool>, T, usize) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let routine = Arc::new(routine);
    let mut list = TaskList::new();

    for (index, item) in items.into_iter().enumerate() {
        let routine = Arc::clone(&routine);
        list.add(move |done: Done<T>, kept: Vec<T>| async move {
            let (inner, completion) = Done::channel();
            routine(inner, item.clone(), index).await;
            settle(done, completion.await.ok(), item, kept);
        });
    }

    list.run_waterfall(Vec::new()).await
}

/// Keep the elements of `items` the routine approves, deciding concurrently.
///
/// Survivors are returned in completion order.
pub async fn filter_parallel<T, F, Fut, It, S>(items: It, routine: F, spawner: S) -> RunResult<T>
where
    It: IntoIterator<Item = T>,
    T: Clone + Send + 'static,
    F: Fn(Done<bool>, T, usize) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
    S: Fn(BoxFuture<'static, ()>),
{
    let routine = Arc::new(routine);
    let mut list = TaskList::new();

    for (index, item) in items.into_iter().enumerate() {
        let routine = Arc::clone(&routine);
        list.add(move |done: Done<T>, _| async move {
            let (inner, completion) = Done::channel();
            routine(inner, item.clone(), index).await;
            settle(done, completion.await.ok(), item, Vec::new());
        });
    }

    list.run_parallel(spawner).await
}
