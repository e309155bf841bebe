//! Named events with frequency-counted handlers.
//!
//! An [`Events`] registry maps event names to handlers. Each handler carries a
//! [`Frequency`]: [`Frequency::Always`] handlers stay registered until cleared, while
//! [`Frequency::Times`] handlers are removed once they have been invoked `n` times.
//!
//! [`Events::emit`] runs the handlers registered for a name one at a time, in registration
//! order, on the series executor. A handler that fails stops the remaining handlers of
//! that emission, and the failure is re-emitted as the reserved [`ERROR_EVENT`] carrying
//! [`Emission::Failure`].
//!
//! # Examples
//!
//! ```
//! use flowx::{Emission, Events};
//!
//! # futures::executor::block_on(async {
//! let events = Events::new();
//! events
//!     .on("greet", |emission: &Emission<String>| {
//!         if let Emission::Args(args) = emission {
//!             println!("hello {}", args.join(" "));
//!         }
//!         Ok(())
//!     })
//!     .once("greet", |_: &Emission<String>| Ok(()));
//!
//! assert_eq!(events.length("greet"), 2);
//! events.emit("greet", ["world".to_string()]).await;
//! assert_eq!(events.length("greet"), 1);
//! # });
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

#[cfg(feature = "tracing")]
use tracing::{debug, trace, warn};

use crate::error::{BoxError, FlowError, FlowResult};
use crate::list::TaskList;
use crate::task::{task_fn, Done};

/// Name of the event that receives handler failures.
pub const ERROR_EVENT: &str = "error";

/// What a handler is invoked with.
#[derive(Debug, Clone)]
pub enum Emission<A> {
    /// Arguments passed to [`Events::emit`].
    Args(Arc<[A]>),
    /// A handler failure, delivered to [`ERROR_EVENT`] handlers.
    Failure(FlowError),
}

impl<A> Emission<A> {
    /// The emitted arguments, or an empty slice for a failure.
    pub fn args(&self) -> &[A] {
        match self {
            Emission::Args(args) => args,
            Emission::Failure(_) => &[],
        }
    }

    /// The carried failure, if this emission reports one.
    pub fn failure(&self) -> Option<&FlowError> {
        match self {
            Emission::Args(_) => None,
            Emission::Failure(err) => Some(err),
        }
    }
}

/// An event handler.
///
/// Implemented for every `Fn(&Emission<A>) -> Result<(), BoxError>` closure that is
/// `Send + Sync`.
pub trait Handler<A>: Send + Sync {
    /// Handle one emission. Returning `Err` re-emits the failure as [`ERROR_EVENT`].
    fn invoke(&self, emission: &Emission<A>) -> Result<(), BoxError>;
}

impl<A, F> Handler<A> for F
where
    F: Fn(&Emission<A>) -> Result<(), BoxError> + Send + Sync,
{
    fn invoke(&self, emission: &Emission<A>) -> Result<(), BoxError> {
        self(emission)
    }
}

/// How many more emissions a handler is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    /// Invoke on every emission until cleared.
    Always,
    /// Invoke this many more times, then remove the handler.
    Times(usize),
}

impl Frequency {
    /// Count one invocation; returns whether the handler stays registered.
    fn consume(&mut self) -> bool {
        match self {
            Frequency::Always => true,
            Frequency::Times(n) => {
                *n = n.saturating_sub(1);
                *n > 0
            }
        }
    }
}

/// A registered handler and its remaining frequency.
pub struct Registration<A> {
    pub handler: Arc<dyn Handler<A>>,
    pub frequency: Frequency,
}

impl<A> Clone for Registration<A> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            frequency: self.frequency,
        }
    }
}

impl<A> fmt::Debug for Registration<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("frequency", &self.frequency)
            .finish_non_exhaustive()
    }
}

/// Registry of named events.
///
/// All methods take `&self`; an `Events` can be shared behind an `Arc` and emitted from
/// several tasks. The internal lock is never held while handlers run, so handlers may
/// register or clear events themselves.
pub struct Events<A> {
    registry: Mutex<BTreeMap<String, Vec<Registration<A>>>>,
}

impl<A> Events<A> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(BTreeMap::new()),
        }
    }

    /// Register `handler` for every emission of `name`.
    pub fn on<F>(&self, name: impl Into<String>, handler: F) -> &Self
    where
        F: Fn(&Emission<A>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.add(name, Frequency::Always, handler)
    }

    /// Register `handler` for the next emission of `name` only.
    pub fn once<F>(&self, name: impl Into<String>, handler: F) -> &Self
    where
        F: Fn(&Emission<A>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.add(name, Frequency::Times(1), handler)
    }

    /// Register `handler` for the next `times` emissions of `name`.
    ///
    /// `times == 0` registers nothing.
    pub fn times<F>(&self, name: impl Into<String>, times: usize, handler: F) -> &Self
    where
        F: Fn(&Emission<A>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.add(name, Frequency::Times(times), handler)
    }

    /// Register any [`Handler`] implementation with an explicit frequency.
    ///
    /// `Frequency::Times(0)` registers nothing.
    pub fn add<H>(&self, name: impl Into<String>, frequency: Frequency, handler: H) -> &Self
    where
        H: Handler<A> + 'static,
    {
        if frequency == Frequency::Times(0) {
            return self;
        }

        let name = name.into();
        #[cfg(feature = "tracing")]
        debug!(event = %name, ?frequency, "registering handler");

        self.registry
            .lock()
            .entry(name)
            .or_default()
            .push(Registration {
                handler: Arc::new(handler),
                frequency,
            });
        self
    }

    /// Remove the handlers of `name`, or of every event when `name` is `None`.
    pub fn clear(&self, name: Option<&str>) -> &Self {
        let mut registry = self.registry.lock();
        match name {
            Some(name) => {
                registry.remove(name);
            }
            None => registry.clear(),
        }
        self
    }

    /// Snapshot of the registrations for `name`, in registration order.
    pub fn get(&self, name: &str) -> Vec<Registration<A>> {
        self.registry.lock().get(name).cloned().unwrap_or_default()
    }

    /// Number of handlers registered for `name`.
    pub fn length(&self, name: &str) -> usize {
        self.registry.lock().get(name).map_or(0, Vec::len)
    }

    /// Names that currently have at least one handler, sorted.
    pub fn names(&self) -> Vec<String> {
        self.registry.lock().keys().cloned().collect()
    }

    /// Take the handlers to run for one emission of `name` and count the invocation.
    fn snapshot(&self, name: &str) -> Vec<Arc<dyn Handler<A>>> {
        let mut registry = self.registry.lock();
        let Some(registrations) = registry.get_mut(name) else {
            return Vec::new();
        };

        let handlers = registrations
            .iter()
            .map(|registration| Arc::clone(&registration.handler))
            .collect();

        registrations.retain_mut(|registration| registration.frequency.consume());
        if registrations.is_empty() {
            registry.remove(name);
        }

        handlers
    }
}

impl<A: Send + Sync + 'static> Events<A> {
    /// Emit `name` with `args`.
    ///
    /// Unknown names are a no-op. A handler failure is re-emitted as [`ERROR_EVENT`]
    /// instead of being returned; failures of `"error"` handlers are only logged.
    pub async fn emit<I>(&self, name: &str, args: I)
    where
        I: IntoIterator<Item = A>,
    {
        let emission = Emission::Args(args.into_iter().collect());
        let Err(err) = self.dispatch(name, emission).await else {
            return;
        };

        if name == ERROR_EVENT {
            error_handler_failed(&err);
            return;
        }

        #[cfg(feature = "tracing")]
        debug!(event = name, error = %err, "handler failed, emitting error event");

        if let Err(nested) = self.dispatch(ERROR_EVENT, Emission::Failure(err)).await {
            error_handler_failed(&nested);
        }
    }

    async fn dispatch(&self, name: &str, emission: Emission<A>) -> FlowResult<()> {
        let handlers = self.snapshot(name);
        if handlers.is_empty() {
            #[cfg(feature = "tracing")]
            trace!(event = name, "no handlers");
            return Ok(());
        }

        #[cfg(feature = "tracing")]
        debug!(event = name, handlers = handlers.len(), "emitting");

        let emission = Arc::new(emission);
        let mut list = TaskList::with_capacity(handlers.len());
        list.add_multiple(handlers.into_iter().map(|handler| {
            let emission = Arc::clone(&emission);
            task_fn(move |done: Done<()>, _| match handler.invoke(&emission) {
                Ok(()) => done.empty(),
                Err(err) => done.fail(err),
            })
        }));

        list.run_series().await.map(drop)
    }
}

fn error_handler_failed(err: &FlowError) {
    #[cfg(feature = "tracing")]
    warn!(error = %err, "error handler failed");
    #[cfg(not(feature = "tracing"))]
    let _ = err;
}

impl<A> Default for Events<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Events<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.lock();
        let mut map = f.debug_map();
        for (name, registrations) in registry.iter() {
            map.entry(name, &registrations.len());
        }
        map.finish()
    }
}
