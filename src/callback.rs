//! Caller completion handlers and the run result they receive.

use crate::error::FlowResult;

/// The single outcome of one executor invocation.
///
/// `Ok(values)` on success (empty for series runs), `Err(failure)` otherwise.
pub type RunResult<T> = FlowResult<Vec<T>>;

/// A caller completion handler.
pub type Callback<T> = Box<dyn FnOnce(&RunResult<T>) + Send>;

/// Ordered set of completion handlers for one run.
///
/// Delivery consumes the set, so a run cannot notify its handlers twice.
pub(crate) struct Callbacks<T> {
    handlers: Vec<Callback<T>>,
}

impl<T> Callbacks<T> {
    pub(crate) fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, handler: Callback<T>) {
        self.handlers.push(handler);
    }

    pub(crate) fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Invoke every handler, in registration order, with the same result.
    pub(crate) fn deliver(self, result: &RunResult<T>) {
        for handler in self.handlers {
            handler(result);
        }
    }
}

impl<T> Default for Callbacks<T> {
    fn default() -> Self {
        Self::new()
    }
}
