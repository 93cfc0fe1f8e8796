//! Per-binding generation counter used to invalidate stale async work.
//!
//! # Design
//! - Every edit takes a [`Ticket`]; work applies its effect only while the ticket is current.
//! - A sleeping debounce timer and an in-flight request are both "cancelled" by advancing.
//! - Transports may register abort hooks so superseded fetches are actually torn down.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

type AbortHook = Box<dyn FnOnce()>;

#[derive(Default)]
struct Inner {
    current: Cell<u64>,
    hooks: RefCell<Vec<AbortHook>>,
}

/// Monotonic counter owned by one binding.
#[derive(Clone, Default)]
pub struct Generation {
    inner: Rc<Inner>,
}

impl Generation {
    /// Create a counter at generation zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate outstanding work and abort any in-flight request.
    pub fn supersede(&self) -> Ticket {
        let hooks: Vec<AbortHook> = self.inner.hooks.borrow_mut().drain(..).collect();
        for hook in hooks {
            hook();
        }
        self.bump()
    }

    /// Invalidate outstanding work without aborting requests already on the wire.
    pub fn advance(&self) -> Ticket {
        self.inner.hooks.borrow_mut().clear();
        self.bump()
    }

    /// Current generation value.
    #[must_use]
    pub fn current(&self) -> u64 {
        self.inner.current.get()
    }

    fn bump(&self) -> Ticket {
        let next = self.inner.current.get().wrapping_add(1);
        self.inner.current.set(next);
        Ticket {
            generation: self.clone(),
            value: next,
        }
    }
}

/// Captured generation; doubles as the cancellation signal handed to transports.
#[derive(Clone)]
pub struct Ticket {
    generation: Generation,
    value: u64,
}

impl Ticket {
    /// A ticket that is never superseded, for one-off work with no owner.
    #[must_use]
    pub fn detached() -> Self {
        Generation::new().advance()
    }

    /// Whether no newer ticket has been issued.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.generation.current() == self.value
    }

    /// Inverse of [`Ticket::is_current`].
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        !self.is_current()
    }

    /// Run `hook` when this ticket is superseded; runs immediately if it already is.
    pub fn on_cancel(&self, hook: impl FnOnce() + 'static) {
        if self.is_cancelled() {
            hook();
            return;
        }
        self.generation.inner.hooks.borrow_mut().push(Box::new(hook));
    }
}

impl std::fmt::Debug for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticket")
            .field("value", &self.value)
            .field("current", &self.is_current())
            .finish()
    }
}
