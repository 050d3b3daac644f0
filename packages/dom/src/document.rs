//! # Document
//!
//! Arena-backed, single-threaded document tree.
//!
//! A [`Document`] is a cheap handle (`Rc<RefCell<..>>`) so components,
//! listeners and widgets can all hold on to the same tree. Borrows are kept
//! short: no borrow is held while an event listener runs, so listeners are
//! free to mutate the document they were dispatched from.
//!
//! ```text
//! #document
//! └── html
//!     ├── head
//!     └── body
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::error::{DomError, DomResult};
use crate::events::{Event, Listener, ListenerId, ListenerStore};
use crate::html::{self, HtmlOptions};
use crate::node::{is_valid_tag_name, ElementData, Node, NodeId, NodeKind};
use crate::selector::{Combinator, Selector, SelectorPart};

struct Slot {
    generation: u32,
    node: Option<Node>,
}

pub(crate) struct Dom {
    nodes: Vec<Slot>,
    free: Vec<usize>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    pub(crate) listeners: ListenerStore,
}

impl Dom {
    fn new() -> Self {
        let mut dom = Self {
            nodes: vec![Slot {
                generation: 0,
                node: Some(Node::new(NodeKind::Document)),
            }],
            free: Vec::new(),
            root: NodeId::new(0, 0),
            head: NodeId::new(0, 0),
            body: NodeId::new(0, 0),
            listeners: ListenerStore::default(),
        };
        let html = dom.alloc(NodeKind::Element(ElementData::new("html".into())));
        let head = dom.alloc(NodeKind::Element(ElementData::new("head".into())));
        let body = dom.alloc(NodeKind::Element(ElementData::new("body".into())));
        dom.link(dom.root, html, None);
        dom.link(html, head, None);
        dom.link(html, body, None);
        dom.head = head;
        dom.body = body;
        dom
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.nodes[index];
            slot.node = Some(Node::new(kind));
            return NodeId::new(index, slot.generation);
        }
        let id = NodeId::new(self.nodes.len(), 0);
        self.nodes.push(Slot {
            generation: 0,
            node: Some(Node::new(kind)),
        });
        id
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.get_mut(id).ok_or(DomError::NodeNotFound(id))
    }

    fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|node| node.element().is_some())
    }

    fn live_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Free `id` and its whole subtree. The slots are recycled under a new
    /// generation and their listeners are dropped.
    fn release(&mut self, id: NodeId) -> usize {
        self.unlink(id);
        let mut pending = vec![id];
        let mut released = 0;
        while let Some(current) = pending.pop() {
            let Some(slot) = self
                .nodes
                .get_mut(current.index)
                .filter(|slot| slot.generation == current.generation)
            else {
                continue;
            };
            let Some(node) = slot.node.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(current.index);
            self.listeners.drop_node(current);
            pending.extend(node.children);
            released += 1;
        }
        released
    }

    fn element(&self, id: NodeId) -> DomResult<&ElementData> {
        self.node(id)?.element().ok_or(DomError::NotAnElement(id))
    }

    fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        self.node_mut(id)?
            .element_mut()
            .ok_or(DomError::NotAnElement(id))
    }

    pub(crate) fn child_ids(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    /// Inclusive ancestry check, like `Node.contains`.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    fn unlink(&mut self, child: NodeId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Some(parent) = self.get_mut(parent) {
            parent.children.retain(|candidate| *candidate != child);
        }
        if let Some(child) = self.get_mut(child) {
            child.parent = None;
        }
    }

    /// Attach `child` under `parent`, before `reference` when given.
    /// Callers validate ids and hierarchy first.
    fn link(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        self.unlink(child);
        let Some(parent_node) = self.get_mut(parent) else {
            return;
        };
        let children = &mut parent_node.children;
        let index = reference
            .and_then(|reference| children.iter().position(|c| *c == reference))
            .unwrap_or(children.len());
        children.insert(index, child);
        if let Some(child) = self.get_mut(child) {
            child.parent = Some(parent);
        }
    }

    fn validate_insertion(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let parent_node = self.node(parent)?;
        self.node(child)?;
        if matches!(parent_node.kind, NodeKind::Text(_)) {
            return Err(DomError::hierarchy(parent, child, "text nodes cannot have children"));
        }
        if matches!(self.node(child)?.kind, NodeKind::Document) {
            return Err(DomError::hierarchy(parent, child, "the document node cannot be inserted"));
        }
        if self.contains(child, parent) {
            return Err(DomError::hierarchy(
                parent,
                child,
                "a node cannot be inserted into itself or its descendants",
            ));
        }
        Ok(())
    }

    fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<()> {
        self.validate_insertion(parent, child)?;
        if let Some(reference) = reference {
            if reference == child {
                // Inserting a node before itself leaves it in place.
                return Ok(());
            }
            if self.parent(reference) != Some(parent) {
                return Err(DomError::NotAChild {
                    parent,
                    child: reference,
                });
            }
        }
        self.link(parent, child, reference);
        Ok(())
    }

    fn replace_child(&mut self, parent: NodeId, new_child: NodeId, old_child: NodeId) -> DomResult<()> {
        self.validate_insertion(parent, new_child)?;
        if self.parent(old_child) != Some(parent) {
            return Err(DomError::NotAChild {
                parent,
                child: old_child,
            });
        }
        if new_child == old_child {
            return Ok(());
        }
        self.link(parent, new_child, Some(old_child));
        self.unlink(old_child);
        Ok(())
    }

    fn text_content(&self, id: NodeId) -> String {
        match self.get(id).map(|node| &node.kind) {
            Some(NodeKind::Text(text)) => text.clone(),
            Some(_) => self
                .child_ids(id)
                .iter()
                .map(|child| self.text_content(*child))
                .collect(),
            None => String::new(),
        }
    }

    fn clear_children(&mut self, id: NodeId) -> DomResult<()> {
        let children = std::mem::take(&mut self.node_mut(id)?.children);
        for child in children {
            if let Some(child) = self.get_mut(child) {
                child.parent = None;
            }
        }
        Ok(())
    }

    fn collect_elements(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for child in self.child_ids(id) {
            if self.is_element(*child) {
                out.push(*child);
            }
            self.collect_elements(*child, out);
        }
    }

    fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        selector
            .groups()
            .iter()
            .any(|chain| self.matches_chain(id, chain))
    }

    fn matches_chain(&self, id: NodeId, chain: &[SelectorPart]) -> bool {
        let Some((last, rest)) = chain.split_last() else {
            return false;
        };
        if !self.matches_step(id, last) {
            return false;
        }
        let mut current = id;
        let mut combinator = last.combinator;
        for part in rest.iter().rev() {
            let matched = match combinator {
                Combinator::Child => self
                    .parent(current)
                    .filter(|parent| self.matches_step(*parent, part)),
                Combinator::Descendant => {
                    let mut cursor = self.parent(current);
                    let mut found = None;
                    while let Some(ancestor) = cursor {
                        if self.matches_step(ancestor, part) {
                            found = Some(ancestor);
                            break;
                        }
                        cursor = self.parent(ancestor);
                    }
                    found
                }
            };
            let Some(matched) = matched else {
                return false;
            };
            current = matched;
            combinator = part.combinator;
        }
        true
    }

    fn matches_step(&self, id: NodeId, part: &SelectorPart) -> bool {
        self.get(id)
            .and_then(Node::element)
            .is_some_and(|element| part.step.matches(element))
    }

    fn query_all_within(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        let mut candidates = Vec::new();
        self.collect_elements(scope, &mut candidates);
        candidates
            .into_iter()
            .filter(|candidate| self.matches(*candidate, selector))
            .collect()
    }

    fn form_value(&self, id: NodeId) -> Option<String> {
        let element = self.get(id)?.element()?;
        match element.tag() {
            "select" => element.value.clone().or_else(|| self.selected_option_value(id)),
            "textarea" => element.value.clone().or_else(|| Some(self.text_content(id))),
            _ => element
                .value
                .clone()
                .or_else(|| element.attribute("value").map(str::to_string)),
        }
    }

    fn selected_option_value(&self, select: NodeId) -> Option<String> {
        let mut options = Vec::new();
        self.collect_elements(select, &mut options);
        let options: Vec<NodeId> = options
            .into_iter()
            .filter(|id| {
                self.get(*id)
                    .and_then(Node::element)
                    .is_some_and(|e| e.tag() == "option")
            })
            .collect();
        let chosen = options
            .iter()
            .find(|id| {
                self.get(**id)
                    .and_then(Node::element)
                    .is_some_and(|e| e.attribute("selected").is_some())
            })
            .or_else(|| options.first())?;
        let option = self.get(*chosen)?.element()?;
        Some(
            option
                .attribute("value")
                .map(str::to_string)
                .unwrap_or_else(|| self.text_content(*chosen)),
        )
    }
}

/// Shared handle to a document tree.
#[derive(Clone)]
pub struct Document {
    inner: Rc<RefCell<Dom>>,
}

/// Non-owning handle, for listeners that must not keep their document alive.
#[derive(Clone, Default)]
pub struct WeakDocument {
    inner: Weak<RefCell<Dom>>,
}

impl WeakDocument {
    pub fn upgrade(&self) -> Option<Document> {
        self.inner.upgrade().map(|inner| Document { inner })
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dom = self.inner.borrow();
        f.debug_struct("Document")
            .field("nodes", &dom.live_count())
            .finish()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Dom::new())),
        }
    }

    /// True when both handles point at the same tree.
    pub fn ptr_eq(&self, other: &Document) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn downgrade(&self) -> WeakDocument {
        WeakDocument {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn root(&self) -> NodeId {
        self.inner.borrow().root
    }

    pub fn head(&self) -> NodeId {
        self.inner.borrow().head
    }

    pub fn body(&self) -> NodeId {
        self.inner.borrow().body
    }

    // =========================================================================
    // Creation & inspection
    // =========================================================================

    pub fn create_element(&self, tag: &str) -> DomResult<NodeId> {
        if !is_valid_tag_name(tag) {
            return Err(DomError::InvalidTagName(tag.to_string()));
        }
        let tag = tag.to_ascii_lowercase();
        Ok(self
            .inner
            .borrow_mut()
            .alloc(NodeKind::Element(ElementData::new(tag))))
    }

    pub fn create_text(&self, text: &str) -> NodeId {
        self.inner
            .borrow_mut()
            .alloc(NodeKind::Text(text.to_string()))
    }

    pub fn exists(&self, node: NodeId) -> bool {
        self.inner.borrow().get(node).is_some()
    }

    pub fn kind(&self, node: NodeId) -> DomResult<NodeKind> {
        Ok(self.inner.borrow().node(node)?.kind.clone())
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.inner
            .borrow()
            .get(node)
            .is_some_and(|n| n.element().is_some())
    }

    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        self.inner
            .borrow()
            .get(node)
            .and_then(Node::element)
            .map(|element| element.tag().to_string())
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner.borrow().parent(node)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner.borrow().child_ids(node).to_vec()
    }

    pub fn child_elements(&self, node: NodeId) -> Vec<NodeId> {
        let dom = self.inner.borrow();
        dom.child_ids(node)
            .iter()
            .copied()
            .filter(|child| dom.is_element(*child))
            .collect()
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let dom = self.inner.borrow();
        let parent = dom.parent(node)?;
        let siblings = dom.child_ids(parent);
        let index = siblings.iter().position(|c| *c == node)?;
        siblings.get(index + 1).copied()
    }

    pub fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        let dom = self.inner.borrow();
        let parent = dom.parent(node)?;
        let siblings = dom.child_ids(parent);
        let index = siblings.iter().position(|c| *c == node)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    /// Inclusive: a node contains itself.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.inner.borrow().contains(ancestor, node)
    }

    /// Whether the node is reachable from the document root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        let root = self.root();
        self.contains(root, node)
    }

    // =========================================================================
    // Tree mutation
    // =========================================================================

    pub fn append_child(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.inner.borrow_mut().insert_before(parent, child, None)
    }

    /// Insert `child` before `reference`; `None` appends.
    pub fn insert_before(
        &self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<()> {
        self.inner.borrow_mut().insert_before(parent, child, reference)
    }

    pub fn replace_child(&self, parent: NodeId, new_child: NodeId, old_child: NodeId) -> DomResult<()> {
        self.inner
            .borrow_mut()
            .replace_child(parent, new_child, old_child)
    }

    /// Remove the node from its parent. No-op for detached nodes.
    pub fn detach(&self, node: NodeId) -> DomResult<()> {
        let mut dom = self.inner.borrow_mut();
        dom.node(node)?;
        dom.unlink(node);
        Ok(())
    }

    pub fn clear_children(&self, node: NodeId) -> DomResult<()> {
        self.inner.borrow_mut().clear_children(node)
    }

    /// Destroy `node` and its subtree, detaching it first. Their ids become
    /// unknown to the document and their listeners are dropped. The
    /// document's own root, `html`, `head` and `body` cannot be released.
    pub fn release(&self, node: NodeId) -> DomResult<usize> {
        let mut dom = self.inner.borrow_mut();
        dom.node(node)?;
        let html = dom.parent(dom.head);
        if node == dom.root || node == dom.head || node == dom.body || Some(node) == html {
            return Err(DomError::hierarchy(
                dom.root,
                node,
                "the document structure cannot be released",
            ));
        }
        let released = dom.release(node);
        trace!(%node, released, "Subtree released");
        Ok(released)
    }

    /// Number of live nodes in the arena, attached or not.
    pub fn node_count(&self) -> usize {
        self.inner.borrow().live_count()
    }

    // =========================================================================
    // Attributes, classes, styles
    // =========================================================================

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner
            .borrow()
            .get(node)
            .and_then(Node::element)
            .and_then(|element| element.attribute(name).map(str::to_string))
    }

    pub fn attributes(&self, node: NodeId) -> DomResult<Vec<(String, String)>> {
        Ok(self.inner.borrow().element(node)?.attributes().to_vec())
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.inner
            .borrow_mut()
            .element_mut(node)?
            .set_attribute(name, value);
        Ok(())
    }

    pub fn remove_attribute(&self, node: NodeId, name: &str) -> DomResult<bool> {
        Ok(self.inner.borrow_mut().element_mut(node)?.remove_attribute(name))
    }

    pub fn class_list(&self, node: NodeId) -> DomResult<Vec<String>> {
        Ok(self.inner.borrow().element(node)?.classes())
    }

    pub fn has_class(&self, node: NodeId, token: &str) -> bool {
        self.inner
            .borrow()
            .get(node)
            .and_then(Node::element)
            .is_some_and(|element| element.has_class(token))
    }

    pub fn add_class(&self, node: NodeId, token: &str) -> DomResult<()> {
        validate_token(token)?;
        let mut classes = self.class_list(node)?;
        if !classes.iter().any(|class| class == token) {
            classes.push(token.to_string());
            self.write_classes(node, &classes)?;
        }
        Ok(())
    }

    pub fn remove_class(&self, node: NodeId, token: &str) -> DomResult<()> {
        validate_token(token)?;
        let mut classes = self.class_list(node)?;
        let before = classes.len();
        classes.retain(|class| class != token);
        if classes.len() != before {
            self.write_classes(node, &classes)?;
        }
        Ok(())
    }

    /// Returns whether the class is present afterwards.
    pub fn toggle_class(&self, node: NodeId, token: &str) -> DomResult<bool> {
        if self.has_class(node, token) {
            self.remove_class(node, token)?;
            Ok(false)
        } else {
            self.add_class(node, token)?;
            Ok(true)
        }
    }

    /// Replace the whole class attribute; duplicates collapse to the first.
    pub fn set_class_list<S: AsRef<str>>(&self, node: NodeId, tokens: &[S]) -> DomResult<()> {
        let mut classes: Vec<String> = Vec::with_capacity(tokens.len());
        for token in tokens {
            let token = token.as_ref();
            validate_token(token)?;
            if !classes.iter().any(|class| class == token) {
                classes.push(token.to_string());
            }
        }
        self.write_classes(node, &classes)
    }

    fn write_classes(&self, node: NodeId, classes: &[String]) -> DomResult<()> {
        let mut dom = self.inner.borrow_mut();
        let element = dom.element_mut(node)?;
        if classes.is_empty() {
            element.remove_attribute("class");
        } else {
            element.set_attribute("class", &classes.join(" "));
        }
        Ok(())
    }

    pub fn styles(&self, node: NodeId) -> DomResult<Vec<(String, String)>> {
        let style = self.inner.borrow().element(node)?.attribute("style").map(str::to_string);
        Ok(style.as_deref().map(parse_style).unwrap_or_default())
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.styles(node)
            .ok()?
            .into_iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }

    pub fn set_style(&self, node: NodeId, property: &str, value: &str) -> DomResult<()> {
        let mut styles = self.styles(node)?;
        match styles.iter_mut().find(|(name, _)| name == property) {
            Some((_, existing)) => *existing = value.to_string(),
            None => styles.push((property.to_string(), value.to_string())),
        }
        self.write_styles(node, &styles)
    }

    pub fn remove_style(&self, node: NodeId, property: &str) -> DomResult<()> {
        let mut styles = self.styles(node)?;
        styles.retain(|(name, _)| name != property);
        self.write_styles(node, &styles)
    }

    fn write_styles(&self, node: NodeId, styles: &[(String, String)]) -> DomResult<()> {
        let mut dom = self.inner.borrow_mut();
        let element = dom.element_mut(node)?;
        if styles.is_empty() {
            element.remove_attribute("style");
        } else {
            let serialized = styles
                .iter()
                .map(|(name, value)| format!("{name}: {value};"))
                .collect::<Vec<_>>()
                .join(" ");
            element.set_attribute("style", &serialized);
        }
        Ok(())
    }

    // =========================================================================
    // Text
    // =========================================================================

    pub fn text_content(&self, node: NodeId) -> String {
        self.inner.borrow().text_content(node)
    }

    /// Replace all children with a single text node (none for empty text).
    pub fn set_text_content(&self, node: NodeId, text: &str) -> DomResult<()> {
        let mut dom = self.inner.borrow_mut();
        if let NodeKind::Text(existing) = &mut dom.node_mut(node)?.kind {
            *existing = text.to_string();
            return Ok(());
        }
        dom.clear_children(node)?;
        if !text.is_empty() {
            let text_node = dom.alloc(NodeKind::Text(text.to_string()));
            dom.link(node, text_node, None);
        }
        Ok(())
    }

    // =========================================================================
    // Selectors
    // =========================================================================

    pub fn query_selector(&self, selector: &str) -> DomResult<Option<NodeId>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    pub fn query_selector_all(&self, selector: &str) -> DomResult<Vec<NodeId>> {
        let root = self.root();
        self.query_selector_all_within(root, selector)
    }

    /// First matching descendant of `scope` (the scope itself is excluded).
    pub fn query_selector_within(&self, scope: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        Ok(self
            .query_selector_all_within(scope, selector)?
            .into_iter()
            .next())
    }

    pub fn query_selector_all_within(&self, scope: NodeId, selector: &str) -> DomResult<Vec<NodeId>> {
        let selector = Selector::parse(selector)?;
        let dom = self.inner.borrow();
        dom.node(scope)?;
        Ok(dom.query_all_within(scope, &selector))
    }

    pub fn matches(&self, node: NodeId, selector: &str) -> DomResult<bool> {
        let selector = Selector::parse(selector)?;
        Ok(self.inner.borrow().matches(node, &selector))
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let dom = self.inner.borrow();
        let mut elements = Vec::new();
        dom.collect_elements(dom.root, &mut elements);
        elements
            .into_iter()
            .find(|candidate| {
                dom.get(*candidate)
                    .and_then(Node::element)
                    .and_then(|e| e.attribute("id"))
                    == Some(id)
            })
    }

    // =========================================================================
    // Events
    // =========================================================================

    pub fn add_event_listener(&self, node: NodeId, kind: &str, listener: Listener) -> DomResult<ListenerId> {
        let mut dom = self.inner.borrow_mut();
        dom.node(node)?;
        let id = dom.listeners.add(node, kind, listener);
        trace!(%node, kind, %id, "Listener attached");
        Ok(id)
    }

    /// Returns false when the listener was not attached to this node.
    pub fn remove_event_listener(&self, node: NodeId, id: ListenerId) -> bool {
        let removed = self.inner.borrow_mut().listeners.remove(node, id);
        if removed {
            trace!(%node, %id, "Listener detached");
        }
        removed
    }

    pub fn listener_count(&self, node: NodeId) -> usize {
        self.inner.borrow().listeners.count(node, None)
    }

    pub fn listener_count_for(&self, node: NodeId, kind: &str) -> usize {
        self.inner.borrow().listeners.count(node, Some(kind))
    }

    /// Run listeners on the target, then on each ancestor while the event
    /// bubbles. Returns the event so callers can inspect `default_prevented`.
    pub fn dispatch_event(&self, target: NodeId, mut event: Event) -> DomResult<Event> {
        let path = {
            let dom = self.inner.borrow();
            dom.node(target)?;
            let mut path = vec![target];
            if event.bubbles() {
                let mut cursor = dom.parent(target);
                while let Some(ancestor) = cursor {
                    path.push(ancestor);
                    cursor = dom.parent(ancestor);
                }
            }
            path
        };

        event.set_target(target);
        for node in path {
            event.set_current_target(node);
            let listeners = self.inner.borrow().listeners.snapshot(node, event.kind());
            for (id, listener) in listeners {
                // Removed by an earlier listener in this same dispatch.
                if !self.inner.borrow().listeners.contains(node, id) {
                    continue;
                }
                listener(&mut event);
                if event.immediate_propagation_stopped() {
                    break;
                }
            }
            if event.propagation_stopped() {
                break;
            }
        }
        Ok(event)
    }

    pub fn click(&self, node: NodeId) -> DomResult<Event> {
        self.dispatch_event(node, Event::new("click"))
    }

    /// Fire `submit` on a form. The returned event tells whether a listener
    /// prevented the default submission.
    pub fn submit(&self, form: NodeId) -> DomResult<Event> {
        self.dispatch_event(form, Event::new("submit"))
    }

    // =========================================================================
    // Forms
    // =========================================================================

    /// Current value of a form control.
    pub fn value(&self, node: NodeId) -> Option<String> {
        self.inner.borrow().form_value(node)
    }

    pub fn set_value(&self, node: NodeId, value: &str) -> DomResult<()> {
        self.inner.borrow_mut().element_mut(node)?.value = Some(value.to_string());
        Ok(())
    }

    /// Name/value pairs a browser would submit for this form, in tree order.
    pub fn form_data(&self, form: NodeId) -> DomResult<Vec<(String, String)>> {
        let dom = self.inner.borrow();
        dom.node(form)?;
        let mut controls = Vec::new();
        dom.collect_elements(form, &mut controls);

        let mut data = Vec::new();
        for control in controls {
            let Some(element) = dom.get(control).and_then(Node::element) else {
                continue;
            };
            let Some(name) = element.attribute("name").filter(|name| !name.is_empty()) else {
                continue;
            };
            if element.attribute("disabled").is_some() {
                continue;
            }
            match element.tag() {
                "input" => {
                    let kind = element.attribute("type").unwrap_or("text").to_ascii_lowercase();
                    match kind.as_str() {
                        "submit" | "button" | "reset" | "image" | "file" => continue,
                        "checkbox" | "radio" => {
                            if element.attribute("checked").is_none() {
                                continue;
                            }
                            let value = dom.form_value(control).unwrap_or_else(|| "on".to_string());
                            data.push((name.to_string(), value));
                        }
                        _ => data.push((name.to_string(), dom.form_value(control).unwrap_or_default())),
                    }
                }
                "select" | "textarea" => {
                    data.push((name.to_string(), dom.form_value(control).unwrap_or_default()));
                }
                _ => {}
            }
        }
        Ok(data)
    }

    /// Restore every control under `form` to its default value.
    pub fn reset_form(&self, form: NodeId) -> DomResult<()> {
        let mut dom = self.inner.borrow_mut();
        dom.node(form)?;
        let mut controls = Vec::new();
        dom.collect_elements(form, &mut controls);
        for control in controls {
            if let Some(element) = dom.get_mut(control).and_then(Node::element_mut) {
                element.value = None;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    pub fn outer_html(&self, node: NodeId) -> String {
        html::outer_html(&self.inner.borrow(), node, &HtmlOptions::default())
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        html::inner_html(&self.inner.borrow(), node, &HtmlOptions::default())
    }

    pub fn to_html(&self, node: NodeId, options: &HtmlOptions) -> String {
        html::outer_html(&self.inner.borrow(), node, options)
    }
}

fn validate_token(token: &str) -> DomResult<()> {
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return Err(DomError::InvalidToken(token.to_string()));
    }
    Ok(())
}

fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|declaration| {
            let (name, value) = declaration.split_once(':')?;
            let name = name.trim();
            let value = value.trim();
            (!name.is_empty()).then(|| (name.to_string(), value.to_string()))
        })
        .collect()
}
