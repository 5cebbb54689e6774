// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batch evaluation: resync a set of regions with the current breakpoints.
//!
//! This is a passive pass, run on load and after every viewport change. It
//! never performs a transition and never notifies observers. For each
//! element:
//!
//! - **Collapsible**: the content becomes a programmatic focus target
//!   (`tabindex="-1"`, only if no tab index is assigned yet), the toggle's
//!   `aria-controls` points at the content's `id` when it has one, and
//!   `aria-label`/`aria-expanded` are rewritten to match what the probe sees.
//!   A wrapper carrying neither state class, or both, is reset to the one
//!   matching the probe.
//! - **Not collapsible**: the toggle loses `aria-controls`, `aria-label`, and
//!   `aria-expanded`, and the wrapper is forced to the expanded class.
//!
//! The breakpoint source is queried once per pass.

use alloc::vec::Vec;

use crate::breakpoints::BreakpointActivity;
use crate::classes::ClassList;
use crate::config::Config;
use crate::element::CollapsibleElement;
use crate::host::{Host, attr};
use crate::probe;
use crate::rule;

/// What the evaluator decided for one element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Collapsible, and the content is currently collapsed.
    Collapsed,
    /// Collapsible, and the content is currently showing.
    Expanded,
    /// Not collapsible at the current breakpoint; forced expanded.
    Static,
}

impl Classification {
    /// Returns `true` unless the element is [`Classification::Static`].
    pub const fn is_collapsible(self) -> bool {
        !matches!(self, Self::Static)
    }
}

/// Evaluates every element against one fresh breakpoint snapshot.
///
/// Returns one [`Classification`] per element, in input order.
pub fn evaluate_all<'a, H, I>(host: &mut H, elements: I, config: &Config) -> Vec<Classification>
where
    H: Host + ?Sized,
    H::Node: 'a,
    I: IntoIterator<Item = &'a CollapsibleElement<H::Node>>,
{
    let activity = host.breakpoints(&config.bps_selector);
    elements
        .into_iter()
        .map(|element| evaluate_one(host, element, config, &activity))
        .collect()
}

/// Evaluates one element against a snapshot the caller fetched.
pub fn evaluate_one<H: Host + ?Sized>(
    host: &mut H,
    element: &CollapsibleElement<H::Node>,
    config: &Config,
    activity: &BreakpointActivity,
) -> Classification {
    let CollapsibleElement {
        wrapper,
        toggle,
        content,
    } = *element;

    if !rule::is_collapsible(host, wrapper, activity) {
        for name in [attr::ARIA_CONTROLS, attr::ARIA_LABEL, attr::ARIA_EXPANDED] {
            host.remove_attribute(toggle, name);
        }
        let mut classes = ClassList::read(host, wrapper);
        classes.swap(&config.expanded_class, &config.collapsed_class);
        classes.write(host, wrapper);
        log::trace!("evaluate {wrapper:?}: not collapsible, forced expanded");
        return Classification::Static;
    }

    if let Some(content) = content {
        if host
            .attribute(content, attr::TABINDEX)
            .is_none_or(|index| index.is_empty())
        {
            host.set_attribute(content, attr::TABINDEX, "-1");
        }
        if let Some(id) = host.attribute(content, attr::ID).filter(|id| !id.is_empty()) {
            set_if_changed(host, toggle, attr::ARIA_CONTROLS, &id);
        }
    }

    let collapsed = probe::is_collapsed(host, content);
    let (label, expanded, state_class, stale_class) = if collapsed {
        (&config.label_expand, "false", &config.collapsed_class, &config.expanded_class)
    } else {
        (&config.label_collapse, "true", &config.expanded_class, &config.collapsed_class)
    };
    set_if_changed(host, toggle, attr::ARIA_LABEL, label);
    set_if_changed(host, toggle, attr::ARIA_EXPANDED, expanded);

    // Exactly one exact state class is left alone.
    let mut classes = ClassList::read(host, wrapper);
    if classes.contains(&config.collapsed_class) == classes.contains(&config.expanded_class) {
        classes.swap(state_class, stale_class);
        classes.write(host, wrapper);
    }

    log::trace!("evaluate {wrapper:?}: collapsible, collapsed = {collapsed}");
    if collapsed {
        Classification::Collapsed
    } else {
        Classification::Expanded
    }
}

fn set_if_changed<H: Host + ?Sized>(host: &mut H, node: H::Node, name: &str, value: &str) {
    if host.attribute(node, name).as_deref() != Some(value) {
        host.set_attribute(node, name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{Document, Effect, NodeId, StyleRule};
    use kurbo::Rect;

    fn setup(rule: Option<&str>) -> (Document, Config, CollapsibleElement<NodeId>) {
        let config = Config::new("Expand", "Collapse");
        let mut doc = Document::new();
        doc.add_rule(StyleRule::new(&config.collapsed_class, "content", Effect::DisplayNone));
        let wrapper = doc.create_element(None, "js-collapsible");
        if let Some(rule) = rule {
            doc.set_attribute(wrapper, attr::COLLAPSIBLE_BPS, rule);
        }
        let toggle = doc.create_element(Some(wrapper), "toggle");
        doc.set_attribute(toggle, attr::ARIA_CONTROLS, "panel");
        let content = doc.create_element(Some(wrapper), "content");
        doc.set_attribute(content, attr::ID, "panel");
        doc.set_box(content, Rect::new(0.0, 0.0, 100.0, 40.0));
        (doc, config, CollapsibleElement::new(wrapper, toggle, Some(content)))
    }

    #[test]
    fn static_elements_lose_aria_and_are_forced_expanded() {
        let (mut doc, config, el) = setup(None);
        doc.set_class_name(el.wrapper, "js-collapsible o-collapsible-is-collapsed");
        doc.set_attribute(el.toggle, attr::ARIA_LABEL, "Expand");
        doc.set_attribute(el.toggle, attr::ARIA_EXPANDED, "false");

        let result = evaluate_all(&mut doc, [&el], &config);
        assert_eq!(result, [Classification::Static]);
        assert_eq!(doc.attribute(el.toggle, attr::ARIA_CONTROLS), None);
        assert_eq!(doc.attribute(el.toggle, attr::ARIA_LABEL), None);
        assert_eq!(doc.attribute(el.toggle, attr::ARIA_EXPANDED), None);
        assert_eq!(doc.class_name(el.wrapper), "js-collapsible o-collapsible-is-expanded");
    }

    #[test]
    fn collapsible_elements_sync_aria_from_layout() {
        let (mut doc, config, el) = setup(Some("s"));
        doc.set_breakpoints("body", BreakpointActivity::new().with("s", true));

        assert_eq!(evaluate_all(&mut doc, [&el], &config), [Classification::Expanded]);
        assert_eq!(doc.attribute(el.toggle, attr::ARIA_LABEL).as_deref(), Some("Collapse"));
        assert_eq!(doc.attribute(el.toggle, attr::ARIA_EXPANDED).as_deref(), Some("true"));
        assert_eq!(doc.class_name(el.wrapper), "js-collapsible o-collapsible-is-expanded");

        // Hidden by something other than the state class: ARIA follows, classes stay.
        doc.set_visibility(el.content.unwrap(), crate::host::Visibility::Hidden);
        assert_eq!(evaluate_all(&mut doc, [&el], &config), [Classification::Collapsed]);
        assert_eq!(doc.attribute(el.toggle, attr::ARIA_LABEL).as_deref(), Some("Expand"));
        assert_eq!(doc.attribute(el.toggle, attr::ARIA_EXPANDED).as_deref(), Some("false"));
        assert_eq!(doc.class_name(el.wrapper), "js-collapsible o-collapsible-is-expanded");
    }

    #[test]
    fn wrapper_with_both_state_classes_is_reset_to_probe() {
        let (mut doc, config, el) = setup(Some("s"));
        doc.set_breakpoints("body", BreakpointActivity::new().with("s", true));
        doc.set_class_name(
            el.wrapper,
            "js-collapsible o-collapsible-is-collapsed o-collapsible-is-expanded",
        );

        // The collapsed class hides the content, so the probe settles on collapsed.
        assert_eq!(evaluate_all(&mut doc, [&el], &config), [Classification::Collapsed]);
        assert_eq!(doc.class_name(el.wrapper), "js-collapsible o-collapsible-is-collapsed");
        assert_eq!(doc.attribute(el.toggle, attr::ARIA_EXPANDED).as_deref(), Some("false"));
    }

    #[test]
    fn modifier_token_alone_gains_exact_state_class() {
        let (mut doc, config, el) = setup(Some("s"));
        doc.set_breakpoints("body", BreakpointActivity::new().with("s", true));
        doc.set_class_name(el.wrapper, "js-collapsible o-collapsible-is-expanded--fast");

        assert_eq!(evaluate_all(&mut doc, [&el], &config), [Classification::Expanded]);
        assert_eq!(
            doc.class_name(el.wrapper),
            "js-collapsible o-collapsible-is-expanded--fast o-collapsible-is-expanded"
        );
        assert_eq!(evaluate_all(&mut doc, [&el], &config), [Classification::Expanded]);
        assert_eq!(
            doc.class_name(el.wrapper),
            "js-collapsible o-collapsible-is-expanded--fast o-collapsible-is-expanded"
        );
    }

    #[test]
    fn bare_wrapper_gains_state_class() {
        let (mut doc, config, el) = setup(Some("s"));
        doc.set_breakpoints("body", BreakpointActivity::new().with("s", true));

        assert_eq!(evaluate_all(&mut doc, [&el], &config), [Classification::Expanded]);
        assert_eq!(doc.class_name(el.wrapper), "js-collapsible o-collapsible-is-expanded");
    }

    #[test]
    fn tabindex_is_assigned_once() {
        let (mut doc, config, el) = setup(Some("s"));
        doc.set_breakpoints("body", BreakpointActivity::new().with("s", true));
        let content = el.content.unwrap();

        evaluate_all(&mut doc, [&el], &config);
        assert_eq!(doc.attribute(content, attr::TABINDEX).as_deref(), Some("-1"));

        doc.set_attribute(content, attr::TABINDEX, "0");
        evaluate_all(&mut doc, [&el], &config);
        assert_eq!(doc.attribute(content, attr::TABINDEX).as_deref(), Some("0"));
    }

    #[test]
    fn aria_controls_restored_when_collapsible_again() {
        let (mut doc, config, el) = setup(Some("s"));
        doc.set_breakpoints("body", BreakpointActivity::new().with("s", false));
        evaluate_all(&mut doc, [&el], &config);
        assert_eq!(doc.attribute(el.toggle, attr::ARIA_CONTROLS), None);

        doc.set_breakpoints("body", BreakpointActivity::new().with("s", true));
        evaluate_all(&mut doc, [&el], &config);
        assert_eq!(doc.attribute(el.toggle, attr::ARIA_CONTROLS).as_deref(), Some("panel"));
    }

    #[test]
    fn one_snapshot_per_pass() {
        let (mut doc, config, el) = setup(Some("s"));
        let elements = [el, el, el];
        evaluate_all(&mut doc, &elements, &config);
        assert_eq!(doc.breakpoint_queries(), 1);
        evaluate_all(&mut doc, &elements, &config);
        assert_eq!(doc.breakpoint_queries(), 2);
    }

    #[test]
    fn repeated_passes_are_stable() {
        let (mut doc, config, el) = setup(Some("s"));
        doc.set_breakpoints("body", BreakpointActivity::new().with("s", true));
        let first = evaluate_all(&mut doc, [&el], &config);
        let snapshot = (
            doc.class_name(el.wrapper),
            doc.attribute(el.toggle, attr::ARIA_LABEL),
            doc.attribute(el.toggle, attr::ARIA_EXPANDED),
        );
        let second = evaluate_all(&mut doc, [&el], &config);
        assert_eq!(first, second);
        assert_eq!(
            snapshot,
            (
                doc.class_name(el.wrapper),
                doc.attribute(el.toggle, attr::ARIA_LABEL),
                doc.attribute(el.toggle, attr::ARIA_EXPANDED),
            )
        );
    }
}
