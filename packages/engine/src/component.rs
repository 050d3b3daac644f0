//! # Component
//!
//! A [`Component`] owns exactly one element node for its whole lifetime and
//! layers attributes, classes, content, local state, listeners and lifecycle
//! hooks on top of it.
//!
//! ```text
//! created ──render/append──▶ mounted ──remove──▶ removed (terminal)
//!    │                          │ ▲
//!    └──────────remove──────────┘ └─ render again re-parents
//! ```
//!
//! Handles are cheap to clone and compare by identity. Every mutator fails
//! with [`EngineError::Removed`] once the component has been removed.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tessera_dom::{Document, DomError, Event, HtmlOptions, NodeId};
use tracing::{debug, instrument, trace};

use crate::error::{json_kind, EngineError, EngineResult};
use crate::insertion::{insert, InsertionMode};
use crate::lifecycle::{NoHooks, Renderable};
use crate::listeners::{Callback, EventRegistry, Unsubscribe};
use crate::registry::Members;
use crate::resolver::{resolve, Target};

static NEXT_COMPONENT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ComponentId(u64);

impl ComponentId {
    fn next() -> Self {
        Self(NEXT_COMPONENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

// =========================================================================
// Argument types
// =========================================================================

/// Class tokens for `with_classes` and `set_class_list`.
///
/// A single string is split on whitespace, so `"btn btn-primary"` and
/// `["btn", "btn-primary"]` are equivalent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList(Vec<String>);

impl ClassList {
    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for ClassList {
    fn from(value: &str) -> Self {
        Self(value.split_whitespace().map(str::to_string).collect())
    }
}

impl From<String> for ClassList {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Vec<String>> for ClassList {
    fn from(value: Vec<String>) -> Self {
        Self(value)
    }
}

impl From<&[String]> for ClassList {
    fn from(value: &[String]) -> Self {
        Self(value.to_vec())
    }
}

impl From<Vec<&str>> for ClassList {
    fn from(value: Vec<&str>) -> Self {
        Self(value.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for ClassList {
    fn from(value: &[&str]) -> Self {
        Self(value.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ClassList {
    fn from(value: [&str; N]) -> Self {
        Self(value.iter().map(|s| s.to_string()).collect())
    }
}

/// A value that can become the content of a component.
#[derive(Debug, Clone)]
pub enum Content {
    Text(String),
    Node(NodeId),
    Component(Component),
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<NodeId> for Content {
    fn from(node: NodeId) -> Self {
        Content::Node(node)
    }
}

impl From<Component> for Content {
    fn from(component: Component) -> Self {
        Content::Component(component)
    }
}

impl From<&Component> for Content {
    fn from(component: &Component) -> Self {
        Content::Component(component.clone())
    }
}

/// JSON content must be a scalar; it is rendered as text.
impl TryFrom<&Value> for Content {
    type Error = EngineError;

    fn try_from(value: &Value) -> EngineResult<Self> {
        match value {
            Value::String(text) => Ok(Content::Text(text.clone())),
            Value::Number(number) => Ok(Content::Text(number.to_string())),
            Value::Bool(flag) => Ok(Content::Text(flag.to_string())),
            other => Err(EngineError::type_error("text, a node or a component", other)),
        }
    }
}

/// One or many children for [`Component::append`].
#[derive(Debug, Clone, Default)]
pub struct Children(Vec<Content>);

impl Children {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Content> for Children {
    fn from(child: Content) -> Self {
        Self(vec![child])
    }
}

impl From<Component> for Children {
    fn from(child: Component) -> Self {
        Self(vec![Content::Component(child)])
    }
}

impl From<&Component> for Children {
    fn from(child: &Component) -> Self {
        Self(vec![Content::Component(child.clone())])
    }
}

impl From<NodeId> for Children {
    fn from(child: NodeId) -> Self {
        Self(vec![Content::Node(child)])
    }
}

impl From<Vec<Component>> for Children {
    fn from(children: Vec<Component>) -> Self {
        Self(children.into_iter().map(Content::Component).collect())
    }
}

impl From<&[Component]> for Children {
    fn from(children: &[Component]) -> Self {
        Self(children.iter().cloned().map(Content::Component).collect())
    }
}

impl From<Vec<NodeId>> for Children {
    fn from(children: Vec<NodeId>) -> Self {
        Self(children.into_iter().map(Content::Node).collect())
    }
}

impl From<Vec<Content>> for Children {
    fn from(children: Vec<Content>) -> Self {
        Self(children)
    }
}

/// Where and how [`Component::render`] mounts.
///
/// The default mounts by appending to the document body. A `None` target is
/// rejected with [`EngineError::MissingTarget`].
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub target: Option<Target>,
    pub method: InsertionMode,
    pub reference: Option<Target>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            target: Some(Target::Body),
            method: InsertionMode::Append,
            reference: None,
        }
    }
}

impl RenderOptions {
    pub fn new(target: impl Into<Target>) -> Self {
        Self {
            target: Some(target.into()),
            ..Self::default()
        }
    }

    pub fn method(mut self, method: InsertionMode) -> Self {
        self.method = method;
        self
    }

    pub fn reference(mut self, reference: impl Into<Target>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Options with no target at all.
    pub fn untargeted() -> Self {
        Self {
            target: None,
            ..Self::default()
        }
    }
}

// =========================================================================
// Component
// =========================================================================

struct ComponentInner {
    id: ComponentId,
    document: Document,
    tag: String,
    node: NodeId,
    hooks: RefCell<Rc<dyn Renderable>>,
    state: RefCell<Map<String, Value>>,
    children: RefCell<Vec<Component>>,
    parent: RefCell<Weak<ComponentInner>>,
    /// Created here rather than wrapped, so removal destroys it.
    owns_node: bool,
    removed: Cell<bool>,
    events: EventRegistry,
    registries: RefCell<Vec<Weak<Members>>>,
}

#[derive(Clone)]
pub struct Component {
    inner: Rc<ComponentInner>,
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Component {}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.inner.id)
            .field("tag", &self.inner.tag)
            .field("node", &self.inner.node)
            .field("mounted", &self.is_mounted())
            .field("removed", &self.inner.removed.get())
            .field("children", &self.inner.children.borrow().len())
            .finish()
    }
}

impl Component {
    /// Create a component owning a fresh `<tag>` element. No hooks fire.
    pub fn new(document: &Document, tag: &str) -> EngineResult<Self> {
        let node = document.create_element(tag)?;
        Ok(Self::from_parts(document, node, true))
    }

    pub fn with_classes(
        document: &Document,
        tag: &str,
        classes: impl Into<ClassList>,
    ) -> EngineResult<Self> {
        let component = Self::new(document, tag)?;
        let classes = classes.into();
        if !classes.is_empty() {
            component.set_class_list(classes)?;
        }
        Ok(component)
    }

    /// Manage an existing element. Removal detaches it but leaves the node
    /// to its creator.
    pub fn wrap(document: &Document, node: NodeId) -> EngineResult<Self> {
        if !document.exists(node) {
            return Err(DomError::NodeNotFound(node).into());
        }
        if !document.is_element(node) {
            return Err(DomError::NotAnElement(node).into());
        }
        Ok(Self::from_parts(document, node, false))
    }

    fn from_parts(document: &Document, node: NodeId, owns_node: bool) -> Self {
        let tag = document.tag_name(node).unwrap_or_default();
        let id = ComponentId::next();
        trace!(component = %id, tag = %tag, %node, "Component created");
        Self {
            inner: Rc::new(ComponentInner {
                id,
                document: document.clone(),
                tag,
                node,
                hooks: RefCell::new(Rc::new(NoHooks)),
                state: RefCell::new(Map::new()),
                children: RefCell::new(Vec::new()),
                parent: RefCell::new(Weak::new()),
                owns_node,
                removed: Cell::new(false),
                events: EventRegistry::new(document, node),
                registries: RefCell::new(Vec::new()),
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn id(&self) -> ComponentId {
        self.inner.id
    }

    pub fn tag(&self) -> &str {
        &self.inner.tag
    }

    pub fn node(&self) -> NodeId {
        self.inner.node
    }

    pub fn document(&self) -> &Document {
        &self.inner.document
    }

    /// True while the node is attached under the document root.
    pub fn is_mounted(&self) -> bool {
        !self.inner.removed.get() && self.inner.document.is_connected(self.inner.node)
    }

    pub fn is_removed(&self) -> bool {
        self.inner.removed.get()
    }

    /// Owned child components, in append order.
    pub fn children(&self) -> Vec<Component> {
        self.inner.children.borrow().clone()
    }

    pub fn events(&self) -> &EventRegistry {
        &self.inner.events
    }

    pub fn outer_html(&self) -> String {
        self.inner.document.outer_html(self.inner.node)
    }

    pub fn to_html(&self, options: &HtmlOptions) -> String {
        self.inner.document.to_html(self.inner.node, options)
    }

    fn ensure_live(&self) -> EngineResult<()> {
        if self.inner.removed.get() {
            return Err(EngineError::Removed(self.inner.id));
        }
        Ok(())
    }

    fn hooks(&self) -> Rc<dyn Renderable> {
        Rc::clone(&self.inner.hooks.borrow())
    }

    /// Install the lifecycle hooks. Replaces any previous hooks.
    pub fn set_hooks(&self, hooks: Rc<dyn Renderable>) -> EngineResult<()> {
        self.ensure_live()?;
        *self.inner.hooks.borrow_mut() = hooks;
        Ok(())
    }

    pub(crate) fn attach_registry(&self, members: &Rc<Members>) {
        let mut registries = self.inner.registries.borrow_mut();
        registries.retain(|weak| weak.strong_count() > 0);
        let known = registries
            .iter()
            .any(|weak| weak.upgrade().is_some_and(|current| Rc::ptr_eq(&current, members)));
        if !known {
            registries.push(Rc::downgrade(members));
        }
    }

    pub(crate) fn detach_registry(&self, members: &Rc<Members>) {
        self.inner.registries.borrow_mut().retain(|weak| {
            weak.upgrade()
                .is_some_and(|current| !Rc::ptr_eq(&current, members))
        });
    }

    // -------------------------------------------------------------------------
    // Attributes, classes, styles
    // -------------------------------------------------------------------------

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.inner.document.attribute(self.inner.node, name)
    }

    pub fn set_attribute(&self, name: &str, value: &str) -> EngineResult<()> {
        self.ensure_live()?;
        self.inner.document.set_attribute(self.inner.node, name, value)?;
        Ok(())
    }

    pub fn set_attributes<I, K, V>(&self, attributes: I) -> EngineResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.ensure_live()?;
        for (name, value) in attributes {
            self.inner
                .document
                .set_attribute(self.inner.node, name.as_ref(), value.as_ref())?;
        }
        Ok(())
    }

    /// Set attributes from a JSON object or an array of `[name, value]` pairs.
    ///
    /// Scalar values are stringified. Nothing is written unless the whole
    /// argument is well formed.
    pub fn set_attributes_json(&self, attributes: &Value) -> EngineResult<()> {
        self.ensure_live()?;
        let pairs = attribute_pairs(attributes)?;
        self.set_attributes(pairs)
    }

    pub fn remove_attribute(&self, name: &str) -> EngineResult<bool> {
        self.ensure_live()?;
        Ok(self.inner.document.remove_attribute(self.inner.node, name)?)
    }

    pub fn set_id(&self, id: &str) -> EngineResult<()> {
        self.set_attribute("id", id)
    }

    pub fn class_list(&self) -> Vec<String> {
        self.inner
            .document
            .class_list(self.inner.node)
            .unwrap_or_default()
    }

    pub fn has_class(&self, token: &str) -> bool {
        self.inner.document.has_class(self.inner.node, token)
    }

    pub fn add_class(&self, token: &str) -> EngineResult<()> {
        self.ensure_live()?;
        self.inner.document.add_class(self.inner.node, token)?;
        Ok(())
    }

    pub fn remove_class(&self, token: &str) -> EngineResult<()> {
        self.ensure_live()?;
        self.inner.document.remove_class(self.inner.node, token)?;
        Ok(())
    }

    /// Returns whether the class is present afterwards.
    pub fn toggle_class(&self, token: &str) -> EngineResult<bool> {
        self.ensure_live()?;
        Ok(self.inner.document.toggle_class(self.inner.node, token)?)
    }

    /// Replace the whole class attribute.
    pub fn set_class_list(&self, classes: impl Into<ClassList>) -> EngineResult<()> {
        self.ensure_live()?;
        let classes = classes.into();
        self.inner
            .document
            .set_class_list(self.inner.node, classes.tokens())?;
        Ok(())
    }

    pub fn set_style(&self, property: &str, value: &str) -> EngineResult<()> {
        self.ensure_live()?;
        self.inner.document.set_style(self.inner.node, property, value)?;
        Ok(())
    }

    pub fn set_styles<I, K, V>(&self, styles: I) -> EngineResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.ensure_live()?;
        for (property, value) in styles {
            self.inner
                .document
                .set_style(self.inner.node, property.as_ref(), value.as_ref())?;
        }
        Ok(())
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.inner.document.style(self.inner.node, property)
    }

    // -------------------------------------------------------------------------
    // Content
    // -------------------------------------------------------------------------

    pub fn text(&self) -> String {
        self.inner.document.text_content(self.inner.node)
    }

    /// Replace the node's content with text.
    ///
    /// The list of owned children is left alone: text and child components
    /// are separate content modes and mixing them is up to the caller.
    pub fn set_text(&self, text: &str) -> EngineResult<()> {
        self.ensure_live()?;
        self.inner.document.set_text_content(self.inner.node, text)?;
        Ok(())
    }

    /// Clear the node (removing owned children) and insert `content`.
    pub fn set_content(&self, content: impl Into<Content>) -> EngineResult<()> {
        self.ensure_live()?;
        let content = content.into();

        let keep = match &content {
            Content::Component(component) => Some(component.id()),
            _ => None,
        };
        let owned = self.children();
        for child in owned.iter().filter(|child| Some(child.id()) != keep) {
            child.remove()?;
        }
        self.inner
            .children
            .borrow_mut()
            .retain(|child| Some(child.id()) == keep);
        self.inner.document.clear_children(self.inner.node)?;

        match content {
            Content::Text(text) => self.set_text(&text),
            other => self.append_one(other),
        }
    }

    pub fn set_content_json(&self, content: &Value) -> EngineResult<()> {
        let content = Content::try_from(content)?;
        self.set_content(content)
    }

    /// Append one child or a sequence of children, in order.
    pub fn append(&self, children: impl Into<Children>) -> EngineResult<()> {
        self.ensure_live()?;
        for child in children.into().0 {
            self.append_one(child)?;
        }
        Ok(())
    }

    fn append_one(&self, child: Content) -> EngineResult<()> {
        let document = &self.inner.document;
        match child {
            Content::Text(text) => {
                let text = document.create_text(&text);
                document.append_child(self.inner.node, text)?;
            }
            Content::Node(node) => document.append_child(self.inner.node, node)?,
            Content::Component(child) => {
                child.ensure_live()?;
                document.append_child(self.inner.node, child.node())?;
                let previous = child
                    .inner
                    .parent
                    .replace(Rc::downgrade(&self.inner))
                    .upgrade()
                    .filter(|previous| !Rc::ptr_eq(previous, &self.inner));
                if let Some(previous) = previous {
                    previous.children.borrow_mut().retain(|owned| owned != &child);
                }
                let mut owned = self.inner.children.borrow_mut();
                if !owned.iter().any(|existing| existing == &child) {
                    owned.push(child);
                }
            }
        }
        Ok(())
    }

    /// Append this component's node to `parent`.
    pub fn append_to(&self, parent: impl Into<Target>) -> EngineResult<()> {
        self.ensure_live()?;
        let parent = resolve(&self.inner.document, &parent.into())?;
        self.inner.document.append_child(parent, self.inner.node)?;
        Ok(())
    }

    /// `append_to` with a loosely typed parent; `null` is a missing target.
    pub fn append_to_json(&self, parent: &Value) -> EngineResult<()> {
        if parent.is_null() {
            return Err(EngineError::MissingTarget("appendTo requires a parent".into()));
        }
        self.append_to(Target::try_from(parent)?)
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Mount (or re-parent) the component. Hooks fire on every call.
    #[instrument(skip_all, fields(component = %self.inner.id, method = %options.method))]
    pub fn render(&self, options: RenderOptions) -> EngineResult<()> {
        self.ensure_live()?;
        let target = options
            .target
            .as_ref()
            .ok_or_else(|| EngineError::MissingTarget("render requires a target".into()))?;
        let document = &self.inner.document;
        let target = resolve(document, target)?;
        let reference = options
            .reference
            .as_ref()
            .map(|reference| resolve(document, reference))
            .transpose()?;

        let hooks = self.hooks();
        hooks.before_mount(self)?;
        insert(document, self.inner.node, target, options.method, reference)?;
        hooks.after_mount(self)?;
        debug!(%target, "Component mounted");
        Ok(())
    }

    /// Snapshot of the local state.
    pub fn state(&self) -> Map<String, Value> {
        self.inner.state.borrow().clone()
    }

    pub fn state_value(&self, key: &str) -> Option<Value> {
        self.inner.state.borrow().get(key).cloned()
    }

    /// Deserialize one state entry; `None` when absent or of another shape.
    pub fn state_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.state_value(key)
            .and_then(|value| serde_json::from_value(value).ok())
    }

    /// Shallow-merge `partial` (a JSON object) into the state, then run the
    /// update hooks.
    pub fn set_state(&self, partial: Value) -> EngineResult<()> {
        self.ensure_live()?;
        let Value::Object(partial) = partial else {
            return Err(EngineError::type_error("an object", &partial));
        };
        trace!(component = %self.inner.id, keys = partial.len(), "Merging state");
        self.inner.state.borrow_mut().extend(partial);
        self.update()
    }

    /// Run the update hooks without changing state.
    pub fn update(&self) -> EngineResult<()> {
        self.ensure_live()?;
        let hooks = self.hooks();
        hooks.before_update(self)?;
        hooks.render_content(self)?;
        hooks.after_update(self)
    }

    /// Tear the component down. Removing twice is a no-op.
    ///
    /// If `before_unmount` or a child's removal fails, the error is returned
    /// and the component stays live so removal can be retried.
    #[instrument(skip_all, fields(component = %self.inner.id))]
    pub fn remove(&self) -> EngineResult<()> {
        if self.inner.removed.get() {
            return Ok(());
        }

        self.hooks().before_unmount(self)?;

        for child in self.children() {
            child.remove()?;
            self.inner
                .children
                .borrow_mut()
                .retain(|owned| owned != &child);
        }

        self.inner.events.clear();
        let document = &self.inner.document;
        if document.exists(self.inner.node) {
            if self.inner.owns_node {
                document.release(self.inner.node)?;
            } else {
                document.detach(self.inner.node)?;
            }
        }

        let parent = self.inner.parent.replace(Weak::new()).upgrade();
        if let Some(parent) = parent {
            parent.children.borrow_mut().retain(|owned| owned != self);
        }
        let registries = std::mem::take(&mut *self.inner.registries.borrow_mut());
        for members in registries.iter().filter_map(Weak::upgrade) {
            members.borrow_mut().remove(&self.inner.id);
        }

        self.inner.removed.set(true);
        // Hooks may own child widgets; dropping them releases those handles.
        *self.inner.hooks.borrow_mut() = Rc::new(NoHooks);
        debug!("Component removed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    pub fn add_event_listener(&self, event: &str, callback: &Callback) -> EngineResult<Unsubscribe> {
        self.ensure_live()?;
        self.inner.events.on(event, callback)
    }

    /// Convenience for closures that are never removed individually.
    pub fn on(&self, event: &str, f: impl Fn(&mut Event) + 'static) -> EngineResult<Callback> {
        let callback = Callback::new(f);
        self.add_event_listener(event, &callback)?;
        Ok(callback)
    }

    pub fn remove_event_listener(&self, event: &str, callback: &Callback) {
        self.inner.events.off(event, callback);
    }

    pub fn clear_event_listeners(&self) {
        self.inner.events.clear();
    }
}

fn attribute_pairs(value: &Value) -> EngineResult<Vec<(String, String)>> {
    const EXPECTED: &str = "an object or an array of [name, value] pairs";
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(name, value)| Ok((name.clone(), attribute_value(value)?)))
            .collect(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item.as_array().map(Vec::as_slice) {
                Some([Value::String(name), value]) => Ok((name.clone(), attribute_value(value)?)),
                _ => Err(EngineError::Type {
                    expected: EXPECTED.into(),
                    found: format!("array containing {}", json_kind(item)),
                }),
            })
            .collect(),
        other => Err(EngineError::type_error(EXPECTED, other)),
    }
}

fn attribute_value(value: &Value) -> EngineResult<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(EngineError::type_error("a scalar attribute value", other)),
    }
}
