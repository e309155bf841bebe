// Common test utilities and helpers for the test suite

use std::sync::Arc;
use std::time::Duration;

use flowx::{task, BoxTask, Done};
use futures::future::BoxFuture;
use parking_lot::Mutex;

/// Spawner for the current Tokio runtime.
pub fn tokio_spawner(fut: BoxFuture<'static, ()>) {
    tokio::spawn(fut);
}

/// Shared, ordered record of what tasks observed.
#[derive(Clone)]
pub struct Journal<T>(Arc<Mutex<Vec<T>>>);

#[allow(dead_code)]
impl<T: Clone> Journal<T> {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(Vec::new())))
    }

    pub fn record(&self, entry: T) {
        self.0.lock().push(entry);
    }

    pub fn entries(&self) -> Vec<T> {
        self.0.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }
}

// Reusable task builders
#[allow(dead_code)]
pub mod tasks {
    use super::*;

    /// Sleep for `millis` on Tokio, then complete with `values`.
    pub fn delayed<T>(millis: u64, values: Vec<T>) -> BoxTask<T>
    where
        T: Send + 'static,
    {
        task(move |done: Done<T>, _| async move {
            tokio::time::sleep(Duration::from_millis(millis)).await;
            done.ok(values);
        })
    }

    /// Record the inputs, then complete with `values`.
    pub fn recording<T>(journal: Journal<Vec<T>>, values: Vec<T>) -> BoxTask<T>
    where
        T: Clone + Send + 'static,
    {
        task(move |done: Done<T>, inputs: Vec<T>| async move {
            journal.record(inputs);
            done.ok(values);
        })
    }

    /// Fail with `message`.
    pub fn failing<T>(message: &'static str) -> BoxTask<T>
    where
        T: Send + 'static,
    {
        task(move |done: Done<T>, _| async move { done.fail(message) })
    }
}
