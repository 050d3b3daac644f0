//! # Event registry
//!
//! Tracks every listener a component attaches to its node so that all of
//! them can be detached on teardown. Entries are keyed by callback identity
//! (the `Rc` allocation behind a [`Callback`]).
//!
//! Registering the same callback twice attaches two independent listeners.
//! Both are recorded under the callback's single entry, so `off` and
//! `clear` still detach every one of them. `off` finds the entry by
//! identity alone: whatever event names the callback was bound to, the
//! whole entry goes.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tessera_dom::{Document, Event, Listener, ListenerId, NodeId};
use tracing::{debug, trace};

use crate::error::EngineResult;

/// A shareable event callback compared by identity.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn(&mut Event)>);

impl Callback {
    pub fn new(f: impl Fn(&mut Event) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, event: &mut Event) {
        (self.0)(event)
    }

    /// True when both handles share the same closure allocation.
    pub fn same(&self, other: &Callback) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for Callback {}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

struct Binding {
    event: String,
    listener: ListenerId,
}

struct Entry {
    callback: Callback,
    bindings: Vec<Binding>,
}

struct RegistryState {
    document: Document,
    node: NodeId,
    entries: RefCell<Vec<Entry>>,
}

impl RegistryState {
    fn off(&self, callback: &Callback) -> usize {
        let entry = {
            let mut entries = self.entries.borrow_mut();
            let Some(index) = entries.iter().position(|e| e.callback.same(callback)) else {
                return 0;
            };
            entries.remove(index)
        };
        for binding in &entry.bindings {
            self.document.remove_event_listener(self.node, binding.listener);
        }
        entry.bindings.len()
    }
}

/// Per-component listener bookkeeping, scoped to one node.
pub struct EventRegistry {
    state: Rc<RegistryState>,
}

impl EventRegistry {
    pub fn new(document: &Document, node: NodeId) -> Self {
        Self {
            state: Rc::new(RegistryState {
                document: document.clone(),
                node,
                entries: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn node(&self) -> NodeId {
        self.state.node
    }

    /// Attach `callback` for `event`. The returned handle detaches it again.
    pub fn on(&self, event: &str, callback: &Callback) -> EngineResult<Unsubscribe> {
        let bound = callback.clone();
        let handler: Listener = Rc::new(move |e: &mut Event| bound.call(e));
        let listener = self
            .state
            .document
            .add_event_listener(self.state.node, event, handler)?;

        let mut entries = self.state.entries.borrow_mut();
        let binding = Binding {
            event: event.to_string(),
            listener,
        };
        match entries.iter_mut().find(|e| e.callback.same(callback)) {
            Some(entry) => entry.bindings.push(binding),
            None => entries.push(Entry {
                callback: callback.clone(),
                bindings: vec![binding],
            }),
        }
        trace!(node = %self.state.node, event, %listener, "Listener registered");

        Ok(Unsubscribe {
            state: Rc::downgrade(&self.state),
            event: event.to_string(),
            callback: callback.clone(),
        })
    }

    /// Detach every listener bound for `callback` and drop its entry.
    /// Unknown callbacks are ignored.
    pub fn off(&self, event: &str, callback: &Callback) {
        let detached = self.state.off(callback);
        if detached > 0 {
            trace!(node = %self.state.node, event, detached, "Listener removed");
        }
    }

    /// Detach every tracked listener. Calling it again does nothing.
    pub fn clear(&self) {
        let entries = std::mem::take(&mut *self.state.entries.borrow_mut());
        if entries.is_empty() {
            return;
        }
        let mut detached = 0;
        for binding in entries.iter().flat_map(|entry| entry.bindings.iter()) {
            self.state
                .document
                .remove_event_listener(self.state.node, binding.listener);
            detached += 1;
        }
        debug!(node = %self.state.node, detached, "Cleared event listeners");
    }

    /// Number of distinct callbacks tracked.
    pub fn len(&self) -> usize {
        self.state.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of attached listeners across all callbacks.
    pub fn listener_count(&self) -> usize {
        self.state
            .entries
            .borrow()
            .iter()
            .map(|entry| entry.bindings.len())
            .sum()
    }

    pub fn contains(&self, callback: &Callback) -> bool {
        self.state
            .entries
            .borrow()
            .iter()
            .any(|entry| entry.callback.same(callback))
    }
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("node", &self.state.node)
            .field("callbacks", &self.len())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Handle returned by [`EventRegistry::on`]; equivalent to calling `off`
/// with the same event and callback.
#[derive(Debug, Clone)]
pub struct Unsubscribe {
    state: Weak<RegistryState>,
    event: String,
    callback: Callback,
}

impl Unsubscribe {
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Detach the listener. A no-op once the owning registry is gone.
    pub fn unsubscribe(self) {
        if let Some(state) = self.state.upgrade() {
            state.off(&self.callback);
        }
    }
}
