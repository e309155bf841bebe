//! Callback-Driven Task Orchestration
//!
//! A small, runtime-agnostic engine for running lists of asynchronous tasks that report
//! through a completion handle, under four execution disciplines.
//!
//! # Features
//!
//! - **Four executors**: [waterfall](TaskList::run_waterfall) threads each task's values into
//!   the next; [series](TaskList::run_series) runs tasks one at a time and discards values;
//!   [parallel](TaskList::run_parallel) launches everything at once and aggregates values in
//!   completion order; [series-parallel](TaskList::run_series_parallel) launches everything
//!   at once and discards values.
//! - **Explicit completion**: every task receives a [`Done`] handle and reports exactly once,
//!   with values ([`Done::ok`]) or a failure ([`Done::fail`]). The handle is consumed by value,
//!   so a second report cannot compile.
//! - **Runtime-agnostic**: concurrent executors take a spawner closure and work with Tokio,
//!   async-std, smol, or a `futures` thread pool.
//! - **Fail-fast**: sequential executors stop at the first failure; concurrent executors report
//!   the first failure once and wait for in-flight siblings to finish.
//! - **Panic safety**: a task that panics, or drops its handle without reporting, becomes a
//!   typed [`FlowError`] instead of a hang.
//! - **Combinators**: [`map`], [`filter`] and their parallel variants, built on the executors.
//! - **Events**: an [`Events`] registry with frequency-counted handlers that run as a series.
//!
//! # Quick Start
//!
//! ```
//! use flowx::{Done, TaskList};
//!
//! # futures::executor::block_on(async {
//! let mut list = TaskList::new();
//! list.add(|done: Done<i32>, inputs: Vec<i32>| async move {
//!     // First task sees the initial values.
//!     done.ok(inputs.iter().map(|v| v + 1));
//! })
//! .add(|done: Done<i32>, inputs: Vec<i32>| async move {
//!     done.ok([inputs.iter().sum()]);
//! })
//! .on_complete(|result| println!("finished: {result:?}"));
//!
//! let values = list.run_waterfall(vec![1, 2, 3]).await.unwrap();
//! assert_eq!(values, vec![9]);
//! # });
//! ```
//!
//! # Core Concepts
//!
//! ## Task
//!
//! A [`Task`] is a unit of async work. Closures of the shape
//! `FnOnce(Done<T>, Vec<T>) -> impl Future<Output = ()>` implement it automatically; the
//! [`task`] helper boxes one for use with [`TaskList::add_multiple`] or the shorthand
//! functions. [`task_fn`] wraps a synchronous body that hands its [`Done`] to another thread.
//!
//! ## TaskList
//!
//! A [`TaskList`] holds tasks in insertion order, the completion handlers registered with
//! [`TaskList::on_complete`], and a [`CompletionCounter`] for in-flight tasks. Running a list
//! consumes it; handlers are invoked exactly once with the final [`RunResult`], in
//! registration order.
//!
//! ## Concurrent Execution
//!
//! ```
//! use flowx::{parallel, task, Done};
//! use futures::executor::ThreadPool;
//!
//! let pool = ThreadPool::new().unwrap();
//! let tasks = (1..=3).map(|i| task(move |done: Done<i32>, _| async move { done.ok([i * 10]) }));
//!
//! let mut values =
//!     futures::executor::block_on(parallel(tasks, move |fut| pool.spawn_ok(fut))).unwrap();
//! values.sort();
//! assert_eq!(values, vec![10, 20, 30]);
//! ```
//!
//! With Tokio the spawner is `|fut| { tokio::spawn(fut); }`.
//!
//! # Error Handling
//!
//! Every executor returns [`RunResult<T>`], an alias for `Result<Vec<T>, FlowError>`:
//!
//! - [`FlowError::NoTasks`]: the list was empty; handlers still run once.
//! - [`FlowError::Task`]: a task called [`Done::fail`]. The original error is shared and can
//!   be downcast through [`FlowError::task_failure`].
//! - [`FlowError::TaskPanicked`] and [`FlowError::Abandoned`]: the task panicked or dropped
//!   its handle.
//! - [`FlowError::WorkersLost`]: the spawner dropped futures instead of running them.
//!
//! # Optional Tracing Support
//!
//! Enable the `tracing` feature to get structured logs through the `tracing` crate:
//!
//! ```toml
//! [dependencies]
//! flowx = { version = "0.1", features = ["tracing"] }
//! tracing-subscriber = "0.3"
//! ```
//!
//! ## Log Levels
//!
//! - **INFO**: run start and completion for each executor
//! - **DEBUG**: task additions, handler registration, event emission
//! - **TRACE**: individual task execution and hand-off
//! - **WARN**: failures raised by `"error"` event handlers
//! - **ERROR**: task failures, panics, and lost workers
//!
//! ```bash
//! RUST_LOG=flowx=debug cargo run
//! ```
//!
//! When the feature is disabled the logging code is compiled out and `tracing` is not linked.

mod callback;
mod error;
mod events;
mod filter;
mod list;
mod map;
mod parallel;
mod sequential;
mod task;

pub use callback::{Callback, RunResult};
pub use error::{BoxError, FlowError, FlowResult};
pub use events::{Emission, Events, Frequency, Handler, Registration, ERROR_EVENT};
pub use filter::{filter, filter_parallel};
pub use list::{CompletionCounter, TaskList};
pub use map::{map, map_parallel};
pub use parallel::{parallel, series_parallel};
pub use sequential::{series, waterfall};
pub use task::{task, task_fn, BoxTask, Done, Task, TaskOutcome};
