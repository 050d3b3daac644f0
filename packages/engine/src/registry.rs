//! # Component registry
//!
//! The set of live components owned by an application, used for bulk
//! teardown. Components unregister themselves when removed, so cleanup
//! iterates over a snapshot taken before any removal runs.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::{debug, error, info};

use crate::component::{Component, ComponentId};
use crate::error::{EngineError, EngineResult};

pub(crate) type Members = RefCell<BTreeMap<ComponentId, Component>>;

/// Outcome of [`ComponentRegistry::cleanup`].
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Components removed by this cleanup (not counting those removed as
    /// children of another member).
    pub removed: usize,
    pub failures: Vec<(ComponentId, EngineError)>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Clone, Default)]
pub struct ComponentRegistry {
    members: Rc<Members>,
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("members", &self.len())
            .finish()
    }
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `component` until it is removed or unregistered.
    pub fn register(&self, component: &Component) -> EngineResult<()> {
        if component.is_removed() {
            return Err(EngineError::Removed(component.id()));
        }
        component.attach_registry(&self.members);
        self.members
            .borrow_mut()
            .insert(component.id(), component.clone());
        debug!(component = %component.id(), tag = component.tag(), "Component registered");
        Ok(())
    }

    /// Returns whether the component was a member.
    pub fn unregister(&self, component: &Component) -> bool {
        let removed = self.members.borrow_mut().remove(&component.id()).is_some();
        if removed {
            component.detach_registry(&self.members);
        }
        removed
    }

    pub fn contains(&self, component: &Component) -> bool {
        self.members.borrow().contains_key(&component.id())
    }

    pub fn len(&self) -> usize {
        self.members.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Members, oldest component first.
    pub fn components(&self) -> Vec<Component> {
        self.members.borrow().values().cloned().collect()
    }

    /// Remove every member. A failing member is logged and skipped; the
    /// registry is empty afterwards either way.
    pub fn cleanup(&self) -> CleanupReport {
        let snapshot = self.components();
        let mut report = CleanupReport::default();

        for component in snapshot {
            if component.is_removed() {
                continue;
            }
            match component.remove() {
                Ok(()) => report.removed += 1,
                Err(err) => {
                    error!(component = %component.id(), tag = component.tag(), error = %err, "Error while removing component");
                    component.detach_registry(&self.members);
                    report.failures.push((component.id(), err));
                }
            }
        }

        self.members.borrow_mut().clear();
        info!(
            removed = report.removed,
            failures = report.failures.len(),
            "Registry cleanup complete"
        );
        report
    }
}
