//! In-memory document.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::clock::VirtualClock;
use crate::dom::{Callback, Dom, DomError, Listener};
use crate::selector::{Compound, Selector};

/// Handle to an element of a `MemoryDom`.
///
/// Ids are never reused, so a handle to a removed element stays dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Clone, Copy, PartialEq, Eq)]
enum EventKind {
    Click,
    TransitionEnd,
}

struct NodeData {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: String,
    hidden: bool,
    styles: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    click: Vec<Option<Listener>>,
    transition_end: Vec<Option<Listener>>,
    // Bumped whenever a new transition starts so a superseded one never
    // delivers its transitionend.
    transition_generation: u64,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            text: String::new(),
            hidden: false,
            styles: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
            click: Vec::new(),
            transition_end: Vec::new(),
            transition_generation: 0,
        }
    }

    fn listeners(&mut self, kind: EventKind) -> &mut Vec<Option<Listener>> {
        match kind {
            EventKind::Click => &mut self.click,
            EventKind::TransitionEnd => &mut self.transition_end,
        }
    }
}

enum Task {
    Timeout(Callback),
    TransitionEnd { node: NodeId, generation: u64 },
}

struct DocState {
    nodes: BTreeMap<NodeId, NodeData>,
    next_id: usize,
    root: NodeId,
    body: NodeId,
    clock: VirtualClock<Task>,
    location: String,
    history: Vec<String>,
}

impl DocState {
    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(&id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(&id)
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, data);
        id
    }

    fn detach(&mut self, id: NodeId) {
        let parent = self.node_mut(id).and_then(|n| n.parent.take());
        if let Some(parent) = parent.and_then(|p| self.node_mut(p)) {
            parent.children.retain(|c| *c != id);
        }
    }

    fn append(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || !self.nodes.contains_key(&parent) || !self.nodes.contains_key(&child) {
            return;
        }
        self.detach(child);
        if let Some(data) = self.node_mut(child) {
            data.parent = Some(parent);
        }
        if let Some(data) = self.node_mut(parent) {
            data.children.push(child);
        }
    }

    /// Detach `id` and drop it with its whole subtree, listeners included.
    /// The dropped data is handed back so the caller can release it after
    /// giving up its borrow.
    fn discard(&mut self, id: NodeId) -> Vec<NodeData> {
        self.detach(id);
        let mut dropped = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(data) = self.nodes.remove(&next) {
                stack.extend(data.children.iter().copied());
                dropped.push(data);
            }
        }
        dropped
    }

    fn is_connected(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == self.root {
                return true;
            }
            current = self.node(node).and_then(|n| n.parent);
        }
        false
    }

    fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or_default()
    }

    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Descendants of `scope` in document order.
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children_of(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children_of(id).iter().rev().copied());
        }
        out
    }

    fn matches_compound(&self, id: NodeId, compound: &Compound) -> bool {
        match self.node(id) {
            Some(node) => {
                compound.matches(&node.tag, |name| node.attributes.get(name).map(String::as_str))
            }
            None => false,
        }
    }

    fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        let compounds = selector.compounds();
        let (subject, ancestors) = match compounds.split_last() {
            Some(split) => split,
            None => return false,
        };
        if !self.matches_compound(id, subject) {
            return false;
        }

        // Greedy right-to-left walk up the ancestor chain.
        let mut remaining = ancestors.iter().rev().peekable();
        let mut current = self.parent_of(id);
        while let Some(compound) = remaining.peek() {
            match current {
                Some(ancestor) => {
                    if self.matches_compound(ancestor, compound) {
                        remaining.next();
                    }
                    current = self.parent_of(ancestor);
                }
                None => return false,
            }
        }
        true
    }

    fn text_of(&self, id: NodeId) -> String {
        let node = match self.node(id) {
            Some(node) => node,
            None => return String::new(),
        };
        let mut text = node.text.clone();
        for child in &node.children {
            text.push_str(&self.text_of(*child));
        }
        text
    }

    fn clone_subtree(&mut self, id: NodeId) -> Option<NodeId> {
        let source = self.node(id)?;
        let mut data = NodeData::new(&source.tag);
        data.attributes = source.attributes.clone();
        data.text = source.text.clone();
        data.hidden = source.hidden;
        data.styles = source.styles.clone();
        let children = source.children.clone();

        let copy = self.alloc(data);
        for child in children {
            if let Some(child_copy) = self.clone_subtree(child) {
                self.append(copy, child_copy);
            }
        }
        Some(copy)
    }
}

/// Document held entirely in memory.
///
/// Timers and CSS transitions run on a virtual clock that only moves when
/// `advance` is called. Setting a style property that the element's
/// `transition` style covers schedules a `transitionend` event after the
/// declared duration, the way a browser would.
///
/// Removing an element frees it. Its handle then reads as an empty,
/// detached element.
#[derive(Clone)]
pub struct MemoryDom {
    state: Rc<RefCell<DocState>>,
}

impl fmt::Debug for MemoryDom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MemoryDom")
            .field("nodes", &state.nodes.len())
            .field("now", &state.clock.now())
            .field("location", &state.location)
            .finish()
    }
}

impl MemoryDom {
    /// Create an empty document with an `<html>` root and a `<body>`.
    pub fn new() -> Self {
        let mut state = DocState {
            nodes: BTreeMap::new(),
            next_id: 0,
            root: NodeId(0),
            body: NodeId(1),
            clock: VirtualClock::new(),
            location: "/".to_string(),
            history: Vec::new(),
        };
        state.root = state.alloc(NodeData::new("html"));
        state.body = state.alloc(NodeData::new("body"));
        let (root, body) = (state.root, state.body);
        state.append(root, body);

        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// The `<body>` element.
    pub fn body(&self) -> NodeId {
        self.state.borrow().body
    }

    /// Set an attribute.
    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        if let Some(data) = self.state.borrow_mut().node_mut(node) {
            data.attributes.insert(name.to_string(), value.to_string());
        }
    }

    /// Append `child` to `parent`, detaching it from any previous parent.
    pub fn append_child(&self, parent: NodeId, child: NodeId) {
        self.state.borrow_mut().append(parent, child);
    }

    /// Parent element, if attached.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.state.borrow().parent_of(node)
    }

    /// Child elements in order.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.state.borrow().children_of(node).to_vec()
    }

    /// Tag name, lowercase.
    pub fn tag(&self, node: NodeId) -> String {
        self.state
            .borrow()
            .node(node)
            .map(|n| n.tag.clone())
            .unwrap_or_default()
    }

    /// Whether the element is hidden.
    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.state.borrow().node(node).is_some_and(|n| n.hidden)
    }

    /// Inline style value.
    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.state
            .borrow()
            .node(node)
            .and_then(|n| n.styles.get(property).cloned())
    }

    /// Whether the element is reachable from the document root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.state.borrow().is_connected(node)
    }

    /// Number of registered click listeners.
    pub fn click_listener_count(&self, node: NodeId) -> usize {
        self.state.borrow().node(node).map_or(0, |n| n.click.len())
    }

    /// Number of registered `transitionend` listeners.
    pub fn transition_listener_count(&self, node: NodeId) -> usize {
        self.state
            .borrow()
            .node(node)
            .map_or(0, |n| n.transition_end.len())
    }

    /// Number of live elements, detached ones included.
    pub fn node_count(&self) -> usize {
        self.state.borrow().nodes.len()
    }

    /// Number of handles sharing this document, counting the ones held by
    /// listeners and pending timers.
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.state)
    }

    /// All connected elements matching `selector`, in document order.
    pub fn query_all(&self, selector: &str) -> Result<Vec<NodeId>, DomError> {
        let selector = Selector::parse(selector)?;
        let state = self.state.borrow();
        Ok(state
            .descendants(state.root)
            .into_iter()
            .filter(|id| state.matches(*id, &selector))
            .collect())
    }

    /// Dispatch a click on `node`. Returns how many listeners ran.
    pub fn click(&self, node: NodeId) -> usize {
        self.dispatch(node, EventKind::Click)
    }

    /// Dispatch `transitionend` on `node` immediately. Returns how many
    /// listeners ran.
    pub fn fire_transition_end(&self, node: NodeId) -> usize {
        self.dispatch(node, EventKind::TransitionEnd)
    }

    /// Current page location.
    pub fn location(&self) -> String {
        self.state.borrow().location.clone()
    }

    /// Every URL navigated to, oldest first.
    pub fn navigation_history(&self) -> Vec<String> {
        self.state.borrow().history.clone()
    }

    /// Virtual time elapsed.
    pub fn now(&self) -> Duration {
        self.state.borrow().clock.now()
    }

    /// Number of timers and transitions still waiting to fire.
    pub fn pending_tasks(&self) -> usize {
        self.state.borrow().clock.pending()
    }

    /// Move virtual time forward, running every timer and transition that
    /// comes due, including ones scheduled by earlier tasks in this window.
    pub fn advance(&self, by: Duration) {
        let deadline = self.now() + by;
        loop {
            let task = self.state.borrow_mut().clock.pop_due(deadline);
            match task {
                Some(task) => self.run(task),
                None => break,
            }
        }
        self.state.borrow_mut().clock.set_now(deadline);
    }

    fn run(&self, task: Task) {
        match task {
            Task::Timeout(callback) => callback(),
            Task::TransitionEnd { node, generation } => {
                let deliver = {
                    let state = self.state.borrow();
                    state
                        .node(node)
                        .is_some_and(|n| n.transition_generation == generation)
                        && state.is_connected(node)
                };
                if deliver {
                    self.dispatch(node, EventKind::TransitionEnd);
                }
            }
        }
    }

    fn dispatch(&self, node: NodeId, kind: EventKind) -> usize {
        let count = self
            .state
            .borrow_mut()
            .node_mut(node)
            .map_or(0, |n| n.listeners(kind).len());
        let mut ran = 0;

        for index in 0..count {
            // Take the listener out so it can touch the document while running.
            let listener = self
                .state
                .borrow_mut()
                .node_mut(node)
                .and_then(|n| n.listeners(kind).get_mut(index).and_then(Option::take));
            let Some(mut listener) = listener else {
                continue;
            };
            listener();
            ran += 1;

            // The listener may have removed its own element.
            let leftover = match self
                .state
                .borrow_mut()
                .node_mut(node)
                .and_then(|n| n.listeners(kind).get_mut(index))
            {
                Some(slot) => {
                    *slot = Some(listener);
                    None
                }
                None => Some(listener),
            };
            drop(leftover);
        }

        ran
    }
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn query(&self, selector: &str) -> Result<Option<NodeId>, DomError> {
        let root = self.state.borrow().root;
        self.query_within(&root, selector)
    }

    fn query_within(&self, scope: &NodeId, selector: &str) -> Result<Option<NodeId>, DomError> {
        let selector = Selector::parse(selector)?;
        let state = self.state.borrow();
        Ok(state
            .descendants(*scope)
            .into_iter()
            .find(|id| state.matches(*id, &selector)))
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.state
            .borrow()
            .node(*node)
            .and_then(|n| n.attributes.get(name).cloned())
    }

    fn text(&self, node: &NodeId) -> String {
        self.state.borrow().text_of(*node)
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        let dropped = {
            let mut state = self.state.borrow_mut();
            let children = match state.node_mut(*node) {
                Some(data) => {
                    data.text = text.to_string();
                    data.children.clone()
                }
                None => return,
            };
            children
                .into_iter()
                .flat_map(|child| state.discard(child))
                .collect::<Vec<_>>()
        };
        drop(dropped);
    }

    fn set_hidden(&self, node: &NodeId, hidden: bool) {
        if let Some(data) = self.state.borrow_mut().node_mut(*node) {
            data.hidden = hidden;
        }
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) -> Result<(), DomError> {
        let mut state = self.state.borrow_mut();
        let connected = state.is_connected(*node);
        let data = state.node_mut(*node).ok_or(DomError::Removed)?;

        let previous = data.styles.insert(property.to_string(), value.to_string());
        let changed = previous.as_deref() != Some(value);

        let duration = data
            .styles
            .get("transition")
            .filter(|_| property != "transition")
            .and_then(|t| transition_duration(t, property));

        if let (true, true, Some(duration)) = (changed, connected, duration) {
            data.transition_generation += 1;
            let generation = data.transition_generation;
            state.clock.schedule(
                duration,
                Task::TransitionEnd {
                    node: *node,
                    generation,
                },
            );
        }

        Ok(())
    }

    fn set_class(&self, node: &NodeId, class: &str) {
        self.set_attribute(*node, "class", class);
    }

    fn create_element(&self, tag: &str) -> Result<NodeId, DomError> {
        Ok(self.state.borrow_mut().alloc(NodeData::new(tag)))
    }

    fn append_to_body(&self, node: &NodeId) -> Result<(), DomError> {
        let mut state = self.state.borrow_mut();
        if state.node(*node).is_none() {
            return Err(DomError::Removed);
        }
        let body = state.body;
        state.append(body, *node);
        Ok(())
    }

    fn remove(&self, node: &NodeId) {
        let dropped = self.state.borrow_mut().discard(*node);
        drop(dropped);
    }

    fn replace_with_clone(&self, node: &NodeId) -> Result<NodeId, DomError> {
        let mut state = self.state.borrow_mut();
        let parent = state.parent_of(*node).ok_or(DomError::Detached)?;
        let position = state
            .children_of(parent)
            .iter()
            .position(|c| c == node)
            .ok_or(DomError::Detached)?;

        let copy = state.clone_subtree(*node).ok_or(DomError::Removed)?;
        if let Some(data) = state.node_mut(parent) {
            data.children[position] = copy;
        }
        if let Some(data) = state.node_mut(copy) {
            data.parent = Some(parent);
        }
        if let Some(data) = state.node_mut(*node) {
            data.parent = None;
        }

        let dropped = state.discard(*node);
        drop(state);
        drop(dropped);
        Ok(copy)
    }

    fn on_click(&self, node: &NodeId, listener: Listener) -> Result<(), DomError> {
        self.listen(*node, EventKind::Click, listener)
    }

    fn on_transition_end(&self, node: &NodeId, listener: Listener) -> Result<(), DomError> {
        self.listen(*node, EventKind::TransitionEnd, listener)
    }

    fn set_timeout(&self, delay: Duration, callback: Callback) -> Result<(), DomError> {
        self.state
            .borrow_mut()
            .clock
            .schedule(delay, Task::Timeout(callback));
        Ok(())
    }

    fn navigate(&self, url: &str) -> Result<(), DomError> {
        let mut state = self.state.borrow_mut();
        state.location = url.to_string();
        state.history.push(url.to_string());
        Ok(())
    }
}

impl MemoryDom {
    fn listen(&self, node: NodeId, kind: EventKind, listener: Listener) -> Result<(), DomError> {
        let rejected = match self.state.borrow_mut().node_mut(node) {
            Some(data) => {
                data.listeners(kind).push(Some(listener));
                None
            }
            None => Some(listener),
        };
        match rejected {
            Some(_) => Err(DomError::Removed),
            None => Ok(()),
        }
    }
}

/// Duration a `transition` declaration gives `property`, if it covers it.
///
/// Understands comma-separated `<property> <duration> ...` items with
/// durations in `s` or `ms`; `all` covers every property.
pub fn transition_duration(transition: &str, property: &str) -> Option<Duration> {
    transition.split(',').find_map(|item| {
        let mut tokens = item.split_whitespace();
        let name = tokens.next()?;
        if name != property && name != "all" {
            return None;
        }
        tokens.find_map(parse_time).filter(|d| !d.is_zero())
    })
}

fn parse_time(token: &str) -> Option<Duration> {
    if let Some(ms) = token.strip_suffix("ms") {
        let ms: f64 = ms.parse().ok()?;
        return Some(Duration::from_micros((ms * 1000.0) as u64));
    }
    let secs: f64 = token.strip_suffix('s')?.parse().ok()?;
    Some(Duration::from_micros((secs * 1_000_000.0) as u64))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn element(dom: &MemoryDom, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let node = dom.create_element(tag).unwrap();
        for (k, v) in attrs {
            dom.set_attribute(node, k, v);
        }
        dom.append_child(parent, node);
        node
    }

    // === Queries ===

    #[test]
    fn test_query_finds_first_in_document_order() {
        let dom = MemoryDom::new();
        let body = dom.body();
        let first = element(&dom, body, "p", &[("data-x", "1")]);
        let second = element(&dom, body, "p", &[("data-x", "2")]);

        assert_eq!(dom.query("p").unwrap(), Some(first));
        assert_eq!(dom.query(r#"[data-x="2"]"#).unwrap(), Some(second));
        assert_eq!(dom.query_all("p").unwrap(), vec![first, second]);
    }

    #[test]
    fn test_query_within_scope_and_descendant_selector() {
        let dom = MemoryDom::new();
        let body = dom.body();
        let outside = element(&dom, body, "span", &[("class", "label")]);
        let section = element(&dom, body, "section", &[("id", "block")]);
        let inner = element(&dom, section, "div", &[]);
        let inside = element(&dom, inner, "span", &[("class", "label")]);

        assert_eq!(dom.query("span.label").unwrap(), Some(outside));
        assert_eq!(dom.query_within(&section, ".label").unwrap(), Some(inside));
        assert_eq!(dom.query("#block .label").unwrap(), Some(inside));
        assert_eq!(dom.query("#nope .label").unwrap(), None);
    }

    #[test]
    fn test_query_skips_detached_nodes() {
        let dom = MemoryDom::new();
        let detached = dom.create_element("div").unwrap();
        dom.set_attribute(detached, "data-orphan", "");

        assert_eq!(dom.query("[data-orphan]").unwrap(), None);
    }

    #[test]
    fn test_query_invalid_selector() {
        let dom = MemoryDom::new();
        assert!(matches!(
            dom.query("div >"),
            Err(DomError::InvalidSelector(_))
        ));
    }

    // === Text ===

    #[test]
    fn test_set_text_replaces_children() {
        let dom = MemoryDom::new();
        let body = dom.body();
        let parent = element(&dom, body, "div", &[]);
        let child = element(&dom, parent, "b", &[]);
        dom.set_text(&child, "bold");

        assert_eq!(dom.text(&parent), "bold");
        dom.set_text(&parent, "plain");
        assert_eq!(dom.text(&parent), "plain");
        assert!(dom.children(parent).is_empty());
        assert!(!dom.is_connected(child));
    }

    // === Clone and Replace ===

    #[test]
    fn test_replace_with_clone_drops_listeners() {
        let dom = MemoryDom::new();
        let body = dom.body();
        let before = element(&dom, body, "p", &[]);
        let button = element(&dom, body, "button", &[("data-block-button", "")]);
        let after = element(&dom, body, "p", &[]);
        dom.set_text(&button, "Go");
        dom.on_click(&button, Box::new(|| {})).unwrap();

        let clone = dom.replace_with_clone(&button).unwrap();

        assert_ne!(clone, button);
        assert_eq!(dom.children(body), vec![before, clone, after]);
        assert_eq!(dom.text(&clone), "Go");
        assert_eq!(dom.attribute(&clone, "data-block-button"), Some(String::new()));
        assert_eq!(dom.click_listener_count(clone), 0);
        assert!(!dom.is_connected(button));
        assert_eq!(dom.query("[data-block-button]").unwrap(), Some(clone));
    }

    #[test]
    fn test_replace_with_clone_requires_parent() {
        let dom = MemoryDom::new();
        let detached = dom.create_element("button").unwrap();

        assert!(matches!(
            dom.replace_with_clone(&detached),
            Err(DomError::Detached)
        ));
    }

    #[test]
    fn test_replaced_node_is_freed() {
        let dom = MemoryDom::new();
        let body = dom.body();
        let button = element(&dom, body, "button", &[]);
        let handle = dom.clone();
        dom.on_click(&button, Box::new(move || handle.navigate("/x").unwrap_or(())))
            .unwrap();
        assert_eq!(dom.handle_count(), 2);

        let clone = dom.replace_with_clone(&button).unwrap();

        assert_eq!(dom.handle_count(), 1);
        assert_eq!(dom.node_count(), 3);
        assert_eq!(dom.click(button), 0);
        assert_eq!(dom.click_listener_count(clone), 0);
    }

    // === Removal ===

    #[test]
    fn test_remove_drops_subtree_and_listeners() {
        let dom = MemoryDom::new();
        let body = dom.body();
        let panel = element(&dom, body, "div", &[]);
        let inner = element(&dom, panel, "span", &[]);

        let handle = dom.clone();
        dom.on_transition_end(&panel, Box::new(move || handle.remove(&panel)))
            .unwrap();
        let handle = dom.clone();
        dom.on_click(&inner, Box::new(move || {
            let _ = handle.now();
        }))
        .unwrap();
        assert_eq!(dom.handle_count(), 3);
        assert_eq!(dom.node_count(), 4);

        dom.remove(&panel);

        assert_eq!(dom.handle_count(), 1);
        assert_eq!(dom.node_count(), 2);
        assert!(dom.children(body).is_empty());
        assert_eq!(dom.transition_listener_count(panel), 0);
        assert_eq!(dom.text(&inner), "");
        assert!(matches!(dom.append_to_body(&panel), Err(DomError::Removed)));
    }

    #[test]
    fn test_listener_may_remove_its_own_node() {
        let dom = MemoryDom::new();
        let body = dom.body();
        let toast = element(&dom, body, "div", &[]);
        let handle = dom.clone();
        dom.on_transition_end(&toast, Box::new(move || handle.remove(&toast)))
            .unwrap();

        assert_eq!(dom.fire_transition_end(toast), 1);

        assert!(!dom.is_connected(toast));
        assert_eq!(dom.node_count(), 2);
        assert_eq!(dom.handle_count(), 1);
        assert_eq!(dom.fire_transition_end(toast), 0);
    }

    // === Events ===

    #[test]
    fn test_click_runs_every_listener() {
        let dom = MemoryDom::new();
        let body = dom.body();
        let button = element(&dom, body, "button", &[]);
        let hits = Rc::new(Cell::new(0));

        for _ in 0..2 {
            let hits = hits.clone();
            dom.on_click(&button, Box::new(move || hits.set(hits.get() + 1)))
                .unwrap();
        }

        assert_eq!(dom.click(button), 2);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_listener_can_mutate_document() {
        let dom = MemoryDom::new();
        let body = dom.body();
        let button = element(&dom, body, "button", &[]);

        let handle = dom.clone();
        dom.on_click(
            &button,
            Box::new(move || {
                let toast = handle.create_element("div").unwrap();
                handle.append_to_body(&toast).unwrap();
            }),
        )
        .unwrap();

        dom.click(button);
        dom.click(button);
        assert_eq!(dom.children(body).len(), 3);
    }

    // === Timers ===

    #[test]
    fn test_timeouts_fire_on_advance() {
        let dom = MemoryDom::new();
        let fired = Rc::new(RefCell::new(Vec::new()));

        for (ms, name) in [(20, "b"), (10, "a")] {
            let fired = fired.clone();
            dom.set_timeout(
                Duration::from_millis(ms),
                Box::new(move || fired.borrow_mut().push(name)),
            )
            .unwrap();
        }

        dom.advance(Duration::from_millis(15));
        assert_eq!(*fired.borrow(), vec!["a"]);
        dom.advance(Duration::from_millis(5));
        assert_eq!(*fired.borrow(), vec!["a", "b"]);
        assert_eq!(dom.now(), Duration::from_millis(20));
    }

    #[test]
    fn test_nested_timeout_within_window_fires() {
        let dom = MemoryDom::new();
        let fired = Rc::new(Cell::new(false));

        let handle = dom.clone();
        let flag = fired.clone();
        dom.set_timeout(
            Duration::from_millis(10),
            Box::new(move || {
                handle
                    .set_timeout(Duration::from_millis(10), Box::new(move || flag.set(true)))
                    .unwrap();
            }),
        )
        .unwrap();

        dom.advance(Duration::from_millis(25));
        assert!(fired.get());
    }

    // === Transitions ===

    #[test]
    fn test_transition_end_fires_after_duration() {
        let dom = MemoryDom::new();
        let body = dom.body();
        let node = element(&dom, body, "div", &[]);
        dom.set_style(&node, "transition", "opacity 0.3s ease").unwrap();
        let ended = Rc::new(Cell::new(0));
        let counter = ended.clone();
        dom.on_transition_end(&node, Box::new(move || counter.set(counter.get() + 1)))
            .unwrap();

        dom.set_style(&node, "opacity", "1").unwrap();
        dom.advance(Duration::from_millis(299));
        assert_eq!(ended.get(), 0);
        dom.advance(Duration::from_millis(1));
        assert_eq!(ended.get(), 1);
    }

    #[test]
    fn test_superseded_transition_does_not_fire() {
        let dom = MemoryDom::new();
        let body = dom.body();
        let node = element(&dom, body, "div", &[]);
        dom.set_style(&node, "transition", "opacity 100ms").unwrap();
        let ended = Rc::new(Cell::new(0));
        let counter = ended.clone();
        dom.on_transition_end(&node, Box::new(move || counter.set(counter.get() + 1)))
            .unwrap();

        dom.set_style(&node, "opacity", "1").unwrap();
        dom.advance(Duration::from_millis(50));
        dom.set_style(&node, "opacity", "0").unwrap();
        dom.advance(Duration::from_millis(100));

        assert_eq!(ended.get(), 1);
    }

    #[test]
    fn test_no_transition_for_unchanged_or_detached() {
        let dom = MemoryDom::new();
        let node = dom.create_element("div").unwrap();
        dom.set_style(&node, "transition", "all 1s").unwrap();
        dom.set_style(&node, "opacity", "0").unwrap();
        assert_eq!(dom.pending_tasks(), 0);

        dom.append_to_body(&node).unwrap();
        dom.set_style(&node, "opacity", "0").unwrap();
        assert_eq!(dom.pending_tasks(), 0);
    }

    #[test]
    fn test_transition_duration_parsing() {
        assert_eq!(
            transition_duration("opacity 0.3s ease", "opacity"),
            Some(Duration::from_millis(300))
        );
        assert_eq!(
            transition_duration("transform 1s, opacity 250ms", "opacity"),
            Some(Duration::from_millis(250))
        );
        assert_eq!(
            transition_duration("all 2s", "color"),
            Some(Duration::from_secs(2))
        );
        assert_eq!(transition_duration("transform 1s", "opacity"), None);
        assert_eq!(transition_duration("opacity 0s", "opacity"), None);
    }

    // === Navigation ===

    #[test]
    fn test_navigate_records_history() {
        let dom = MemoryDom::new();
        assert_eq!(dom.location(), "/");

        dom.navigate("/pricing").unwrap();
        assert_eq!(dom.location(), "/pricing");
        assert_eq!(dom.navigation_history(), vec!["/pricing".to_string()]);
    }
}
