use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::node::NodeId;

/// Callback attached to a node for one event type.
pub type Listener = Rc<dyn Fn(&mut Event)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// A synthesized event travelling from its target up through its ancestors.
#[derive(Debug, Clone)]
pub struct Event {
    kind: String,
    bubbles: bool,
    target: Option<NodeId>,
    current_target: Option<NodeId>,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
}

impl Event {
    /// Bubbling event, the way `click` and `submit` behave.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            bubbles: true,
            target: None,
            current_target: None,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    pub fn non_bubbling(kind: impl Into<String>) -> Self {
        Self {
            bubbles: false,
            ..Self::new(kind)
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    pub(crate) fn set_target(&mut self, target: NodeId) {
        self.target = Some(target);
    }

    pub(crate) fn set_current_target(&mut self, node: NodeId) {
        self.current_target = Some(node);
    }

    pub(crate) fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub(crate) fn immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }
}

struct Registration {
    id: ListenerId,
    kind: String,
    listener: Listener,
}

#[derive(Default)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, Vec<Registration>>,
    next_id: u64,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, node: NodeId, kind: &str, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.map.entry(node).or_default().push(Registration {
            id,
            kind: kind.to_string(),
            listener,
        });
        id
    }

    pub(crate) fn remove(&mut self, node: NodeId, id: ListenerId) -> bool {
        let Some(registrations) = self.map.get_mut(&node) else {
            return false;
        };
        let before = registrations.len();
        registrations.retain(|registration| registration.id != id);
        let removed = before != registrations.len();
        if registrations.is_empty() {
            self.map.remove(&node);
        }
        removed
    }

    pub(crate) fn drop_node(&mut self, node: NodeId) {
        self.map.remove(&node);
    }

    pub(crate) fn contains(&self, node: NodeId, id: ListenerId) -> bool {
        self.map
            .get(&node)
            .is_some_and(|registrations| registrations.iter().any(|r| r.id == id))
    }

    pub(crate) fn count(&self, node: NodeId, kind: Option<&str>) -> usize {
        self.map
            .get(&node)
            .map(|registrations| {
                registrations
                    .iter()
                    .filter(|r| kind.map_or(true, |kind| r.kind == kind))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Listeners for `kind` on `node`, in registration order.
    pub(crate) fn snapshot(&self, node: NodeId, kind: &str) -> Vec<(ListenerId, Listener)> {
        self.map
            .get(&node)
            .map(|registrations| {
                registrations
                    .iter()
                    .filter(|r| r.kind == kind)
                    .map(|r| (r.id, Rc::clone(&r.listener)))
                    .collect()
            })
            .unwrap_or_default()
    }
}
