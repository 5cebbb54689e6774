// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory [`Host`] for tests, examples, and server-side rendering.
//!
//! [`Document`] models just enough of a document for the engine: an element
//! tree with class and attribute strings, an intrinsic box per element,
//! computed `visibility`, focus, a virtual clock for timers, and per-selector
//! breakpoint snapshots.
//!
//! Layout follows state classes through [`StyleRule`]s, so collapsing an
//! element really does take its content out of layout the way a stylesheet
//! would:
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_collapsible::headless::{Document, Effect, StyleRule};
//! use understory_collapsible::host::Host;
//! use understory_collapsible::probe;
//!
//! let mut doc = Document::new();
//! doc.add_rule(StyleRule::new("is-collapsed", "content", Effect::DisplayNone));
//!
//! let wrapper = doc.create_element(None, "box");
//! let content = doc.create_element(Some(wrapper), "content");
//! doc.set_box(content, Rect::new(0.0, 0.0, 300.0, 120.0));
//! assert!(!probe::is_collapsed(&doc, Some(content)));
//!
//! doc.set_class_name(wrapper, "box is-collapsed");
//! assert!(probe::is_collapsed(&doc, Some(content)));
//! ```

use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;
use core::time::Duration;

use hashbrown::HashMap;
use kurbo::Rect;

use crate::breakpoints::BreakpointActivity;
use crate::host::{DeferredTask, Host, LayoutBox, TimerId, Visibility};

/// Handle to an element in a [`Document`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    const fn idx(self) -> usize {
        self.0
    }
}

/// What a matching [`StyleRule`] does to an element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// `display: none` on the element and therefore its whole subtree.
    DisplayNone,
    /// `visibility: hidden`, inherited by descendants. Geometry is kept.
    VisibilityHidden,
}

/// A descendant-combinator rule: `.ancestor .target { effect }`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleRule {
    /// Class required on some ancestor of the target.
    pub ancestor_class: String,
    /// Class required on the target.
    pub target_class: String,
    /// The applied declaration.
    pub effect: Effect,
}

impl StyleRule {
    /// Creates a rule matching `.ancestor_class .target_class`.
    pub fn new(
        ancestor_class: impl Into<String>,
        target_class: impl Into<String>,
        effect: Effect,
    ) -> Self {
        Self {
            ancestor_class: ancestor_class.into(),
            target_class: target_class.into(),
            effect,
        }
    }
}

#[derive(Clone, Debug, Default)]
struct NodeData {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    class_name: String,
    attributes: Vec<(String, String)>,
    intrinsic: Option<Rect>,
    visibility: Option<Visibility>,
    detached: bool,
}

impl NodeData {
    fn has_class(&self, class: &str) -> bool {
        self.class_name.split_ascii_whitespace().any(|t| t == class)
    }
}

#[derive(Clone, Debug)]
struct Timer {
    id: TimerId,
    due: Duration,
    task: DeferredTask<NodeId>,
}

/// In-memory document implementing [`Host`].
#[derive(Debug, Default)]
pub struct Document {
    nodes: Vec<NodeData>,
    roots: Vec<NodeId>,
    rules: Vec<StyleRule>,
    breakpoints: HashMap<String, BreakpointActivity>,
    breakpoint_queries: Cell<usize>,
    focused: Option<NodeId>,
    focus_history: Vec<NodeId>,
    now: Duration,
    timers: Vec<Timer>,
    next_timer: u64,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new element under `parent` (or as a new root).
    pub fn create_element(&mut self, parent: Option<NodeId>, class_name: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            parent,
            class_name: String::from(class_name),
            ..NodeData::default()
        });
        match parent {
            Some(parent) => self.nodes[parent.idx()].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Gives the element an intrinsic box. Elements without one have no layout.
    pub fn set_box(&mut self, node: NodeId, rect: Rect) {
        self.nodes[node.idx()].intrinsic = Some(rect);
    }

    /// Removes the intrinsic box.
    pub fn clear_box(&mut self, node: NodeId) {
        self.nodes[node.idx()].intrinsic = None;
    }

    /// Sets the element's own `visibility` declaration.
    pub fn set_visibility(&mut self, node: NodeId, visibility: Visibility) {
        self.nodes[node.idx()].visibility = Some(visibility);
    }

    /// Removes the element (and so its subtree) from the document.
    ///
    /// The handle stays valid; queries treat it as absent.
    pub fn detach(&mut self, node: NodeId) {
        self.nodes[node.idx()].detached = true;
    }

    /// Adds a style rule. Rules apply to every later query.
    pub fn add_rule(&mut self, rule: StyleRule) {
        self.rules.push(rule);
    }

    /// Publishes the breakpoint snapshot returned for `selector`.
    pub fn set_breakpoints(&mut self, selector: impl Into<String>, activity: BreakpointActivity) {
        self.breakpoints.insert(selector.into(), activity);
    }

    /// How many times the breakpoint source has been queried.
    pub fn breakpoint_queries(&self) -> usize {
        self.breakpoint_queries.get()
    }

    /// Returns `true` if the element's class attribute has the exact token.
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes[node.idx()].has_class(class)
    }

    /// The currently focused element.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Every element that received focus, oldest first.
    pub fn focus_history(&self) -> &[NodeId] {
        &self.focus_history
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers waiting to fire.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Advances the virtual clock and runs every timer that came due, in
    /// due-time order (ties in scheduling order).
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
        let now = self.now;
        let mut due: Vec<Timer> = Vec::new();
        self.timers.retain(|timer| {
            if timer.due <= now {
                due.push(timer.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|timer| (timer.due, timer.id));
        for timer in due {
            match timer.task {
                DeferredTask::Focus(node) => self.focus(node),
            }
        }
    }

    fn is_connected(&self, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            let data = &self.nodes[current.idx()];
            if data.detached {
                return false;
            }
            cursor = data.parent;
        }
        true
    }

    fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        core::iter::successors(self.nodes[node.idx()].parent, |n| self.nodes[n.idx()].parent)
    }

    fn rule_matches(&self, rule: &StyleRule, node: NodeId) -> bool {
        self.nodes[node.idx()].has_class(&rule.target_class)
            && self
                .ancestors(node)
                .any(|a| self.nodes[a.idx()].has_class(&rule.ancestor_class))
    }

    /// Returns `true` if `effect` applies to `node` directly or through an ancestor.
    fn inherits_effect(&self, node: NodeId, effect: Effect) -> bool {
        core::iter::once(node)
            .chain(self.ancestors(node))
            .any(|n| {
                self.rules
                    .iter()
                    .any(|rule| rule.effect == effect && self.rule_matches(rule, n))
            })
    }

    fn collect_descendants(&self, node: NodeId, class: &str, out: &mut Vec<NodeId>) {
        for &child in &self.nodes[node.idx()].children {
            if self.nodes[child.idx()].has_class(class) {
                out.push(child);
            }
            self.collect_descendants(child, class, out);
        }
    }
}

impl Host for Document {
    type Node = NodeId;

    fn layout(&self, node: NodeId) -> Option<LayoutBox> {
        if !self.is_connected(node) {
            return None;
        }
        if self.inherits_effect(node, Effect::DisplayNone) {
            return Some(LayoutBox::none());
        }
        Some(
            self.nodes[node.idx()]
                .intrinsic
                .map_or_else(LayoutBox::none, LayoutBox::from_rect),
        )
    }

    fn visibility(&self, node: NodeId) -> Visibility {
        if self.inherits_effect(node, Effect::VisibilityHidden) {
            return Visibility::Hidden;
        }
        core::iter::once(node)
            .chain(self.ancestors(node))
            .find_map(|n| self.nodes[n.idx()].visibility)
            .unwrap_or_default()
    }

    fn class_name(&self, node: NodeId) -> String {
        self.nodes[node.idx()].class_name.clone()
    }

    fn set_class_name(&mut self, node: NodeId, class_name: &str) {
        self.nodes[node.idx()].class_name = String::from(class_name);
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes[node.idx()]
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let attributes = &mut self.nodes[node.idx()].attributes;
        match attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = String::from(value),
            None => attributes.push((String::from(name), String::from(value))),
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        self.nodes[node.idx()].attributes.retain(|(k, _)| k != name);
    }

    fn focus(&mut self, node: NodeId) {
        if !self.is_connected(node) {
            return;
        }
        self.focused = Some(node);
        self.focus_history.push(node);
    }

    fn elements_by_class(&self, scope: Option<NodeId>, class: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        match scope {
            Some(scope) => self.collect_descendants(scope, class, &mut out),
            None => {
                for &root in &self.roots {
                    if !self.is_connected(root) {
                        continue;
                    }
                    if self.nodes[root.idx()].has_class(class) {
                        out.push(root);
                    }
                    self.collect_descendants(root, class, &mut out);
                }
                out.retain(|&n| self.is_connected(n));
            }
        }
        out
    }

    fn breakpoints(&self, selector: &str) -> BreakpointActivity {
        self.breakpoint_queries.set(self.breakpoint_queries.get() + 1);
        self.breakpoints.get(selector).cloned().unwrap_or_default()
    }

    fn set_timeout(&mut self, delay: Duration, task: DeferredTask<NodeId>) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        self.timers.push(Timer {
            id,
            due: self.now + delay,
            task,
        });
        id
    }

    fn clear_timeout(&mut self, id: TimerId) {
        self.timers.retain(|timer| timer.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_hide_descendants_of_matching_ancestor() {
        let mut doc = Document::new();
        doc.add_rule(StyleRule::new("closed", "panel", Effect::DisplayNone));
        let outer = doc.create_element(None, "outer");
        let panel = doc.create_element(Some(outer), "panel");
        let inner = doc.create_element(Some(panel), "");
        doc.set_box(panel, Rect::new(0.0, 0.0, 10.0, 10.0));
        doc.set_box(inner, Rect::new(0.0, 0.0, 5.0, 5.0));

        assert_eq!(doc.layout(inner), Some(LayoutBox::from_rect(Rect::new(0.0, 0.0, 5.0, 5.0))));
        doc.set_class_name(outer, "outer closed");
        assert_eq!(doc.layout(panel), Some(LayoutBox::none()));
        assert_eq!(doc.layout(inner), Some(LayoutBox::none()));
    }

    #[test]
    fn node_ids_follow_creation_order() {
        let mut doc = Document::new();
        let ids: Vec<NodeId> = (0..3).map(|_| doc.create_element(None, "")).collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        let child = doc.create_element(Some(ids[1]), "leaf");
        assert!(ids[2] < child);
        assert_eq!(doc.elements_by_class(None, "leaf"), [child]);
    }

    #[test]
    fn visibility_inherits() {
        let mut doc = Document::new();
        let outer = doc.create_element(None, "");
        let inner = doc.create_element(Some(outer), "");
        assert_eq!(doc.visibility(inner), Visibility::Visible);
        doc.set_visibility(outer, Visibility::Hidden);
        assert_eq!(doc.visibility(inner), Visibility::Hidden);
        doc.set_visibility(inner, Visibility::Visible);
        assert_eq!(doc.visibility(inner), Visibility::Visible);
    }

    #[test]
    fn elements_by_class_in_document_order() {
        let mut doc = Document::new();
        let a = doc.create_element(None, "x");
        let b = doc.create_element(Some(a), "y x");
        let c = doc.create_element(None, "x");
        let d = doc.create_element(Some(c), "x");
        assert_eq!(doc.elements_by_class(None, "x"), [a, b, c, d]);
        assert_eq!(doc.elements_by_class(Some(c), "x"), [d]);
        doc.detach(c);
        assert_eq!(doc.elements_by_class(None, "x"), [a, b]);
    }

    #[test]
    fn timers_fire_in_due_order_and_can_be_cleared() {
        let mut doc = Document::new();
        let a = doc.create_element(None, "");
        let b = doc.create_element(None, "");
        let c = doc.create_element(None, "");
        doc.set_timeout(Duration::from_millis(50), DeferredTask::Focus(a));
        doc.set_timeout(Duration::from_millis(10), DeferredTask::Focus(b));
        let cleared = doc.set_timeout(Duration::from_millis(20), DeferredTask::Focus(c));
        doc.clear_timeout(cleared);

        doc.advance(Duration::from_millis(49));
        assert_eq!(doc.focus_history(), [b]);
        doc.advance(Duration::from_millis(1));
        assert_eq!(doc.focus_history(), [b, a]);
        assert_eq!(doc.pending_timers(), 0);
    }

    #[test]
    fn attributes_round_trip() {
        let mut doc = Document::new();
        let n = doc.create_element(None, "");
        assert_eq!(doc.attribute(n, "aria-label"), None);
        doc.set_attribute(n, "aria-label", "Open");
        doc.set_attribute(n, "aria-label", "Close");
        assert_eq!(doc.attribute(n, "aria-label").as_deref(), Some("Close"));
        doc.remove_attribute(n, "aria-label");
        doc.remove_attribute(n, "aria-label");
        assert_eq!(doc.attribute(n, "aria-label"), None);
    }
}
