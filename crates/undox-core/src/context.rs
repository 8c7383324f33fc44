//! Run context and scope guard
//!
//! A `RunContext` bundles the run's shared state with its close action.
//! Entering a scope is a no-op; leaving it (normally, by `?`, or by panic)
//! closes the context exactly once.

use std::cell::Cell;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use undox_core_types::schema::EVENT_CONTEXT_CLOSED;
use undox_core_types::RunId;

use crate::ops::SharedState;

/// Shared state plus close action for one logical execution
///
/// Cheap to clone; clones share state and close counter.
#[derive(Clone)]
pub struct RunContext {
    run_id: RunId,
    state: SharedState,
    closes: Rc<Cell<usize>>,
}

impl RunContext {
    /// Create a context over a fresh, empty `SharedState`
    pub fn new() -> Self {
        Self::with_state(SharedState::new())
    }

    /// Create a context over an existing `SharedState`
    pub fn with_state(state: SharedState) -> Self {
        Self {
            run_id: RunId::new(),
            state,
            closes: Rc::new(Cell::new(0)),
        }
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Close the run: log the full shared-state mapping
    pub fn close(&self) {
        self.closes.set(self.closes.get() + 1);
        tracing::info!(
            component = module_path!(),
            event = EVENT_CONTEXT_CLOSED,
            run_id = %self.run_id,
            state = %self.state.to_json(),
            "run context closed"
        );
    }

    /// How many times `close` has run on this context (and its clones)
    pub fn close_count(&self) -> usize {
        self.closes.get()
    }

    /// Enter a scope around `target`; the context closes when the guard drops
    pub fn enter<'a, T: ?Sized>(&self, target: &'a mut T) -> Scope<'a, T> {
        Scope {
            ctx: self.clone(),
            target,
        }
    }

    /// Run `f` inside a scope around `target`
    pub fn scoped<T: ?Sized, R>(&self, target: &mut T, f: impl FnOnce(&mut T) -> R) -> R {
        let mut scope = self.enter(target);
        f(&mut *scope)
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunContext")
            .field("run_id", &self.run_id)
            .field("fields", &self.state.fields())
            .finish()
    }
}

/// Guard returned by `RunContext::enter`
///
/// Derefs to the scoped target. Dropping it closes the context.
pub struct Scope<'a, T: ?Sized> {
    ctx: RunContext,
    target: &'a mut T,
}

impl<T: ?Sized> Deref for Scope<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &*self.target
    }
}

impl<T: ?Sized> DerefMut for Scope<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut *self.target
    }
}

impl<T: ?Sized> Drop for Scope<'_, T> {
    fn drop(&mut self) {
        self.ctx.close();
    }
}

/// Anything that owns a `RunContext` can be entered as a scope
pub trait Scoped {
    fn context(&self) -> &RunContext;

    /// Enter a scope around `self` using its own context
    fn enter(&mut self) -> Scope<'_, Self>
    where
        Self: Sized,
    {
        let ctx = self.context().clone();
        ctx.enter(self)
    }
}
