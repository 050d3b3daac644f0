//! Lifecycle hooks and the widget capability.
//!
//! A widget is a plain struct that owns a [`Component`] and installs a
//! [`Renderable`] on it. The component calls the hooks at fixed points:
//!
//! ```text
//! render()    -> before_mount, insert, after_mount
//! set_state() -> before_update, render_content, after_update
//! remove()    -> before_unmount, children, listeners, detach
//! ```
//!
//! Hooks receive the component they are installed on, so a `Renderable`
//! never needs to hold a handle to its own component.

use crate::component::{Component, RenderOptions};
use crate::error::EngineResult;
use crate::resolver::Target;

pub trait Renderable {
    fn before_mount(&self, _component: &Component) -> EngineResult<()> {
        Ok(())
    }

    fn after_mount(&self, _component: &Component) -> EngineResult<()> {
        Ok(())
    }

    fn before_update(&self, _component: &Component) -> EngineResult<()> {
        Ok(())
    }

    /// Redraw the component's content from its current state.
    fn render_content(&self, _component: &Component) -> EngineResult<()> {
        Ok(())
    }

    fn after_update(&self, _component: &Component) -> EngineResult<()> {
        Ok(())
    }

    /// Release widget resources. An error aborts the removal.
    fn before_unmount(&self, _component: &Component) -> EngineResult<()> {
        Ok(())
    }
}

/// Hooks of a plain component.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl Renderable for NoHooks {}

/// Anything built around a component.
pub trait Widget {
    fn component(&self) -> &Component;

    fn render(&self, options: RenderOptions) -> EngineResult<()> {
        self.component().render(options)
    }

    fn append_to(&self, parent: impl Into<Target>) -> EngineResult<()>
    where
        Self: Sized,
    {
        self.component().append_to(parent)
    }

    fn remove(&self) -> EngineResult<()> {
        self.component().remove()
    }
}

impl Widget for Component {
    fn component(&self) -> &Component {
        self
    }
}
