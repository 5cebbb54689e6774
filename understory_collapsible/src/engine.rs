// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The collapse/expand state engine.
//!
//! A [`Collapsible`] is a control handle for one region. It does not store
//! whether the region is collapsed: every operation derives the current
//! state from the [layout probe](crate::probe) unless the caller passes an
//! explicit [`State`] for that call. External DOM changes between calls are
//! therefore picked up automatically.
//!
//! ## Transitions
//!
//! [`Collapsible::expand`] and [`Collapsible::collapse`] follow the same
//! shape:
//!
//! 1. Resolve the current state. Already in the target state: no-op.
//! 2. (`collapse` only) Check the breakpoint rule against a fresh snapshot.
//!    Not permitted: no notification, no mutation.
//! 3. Send the cancelable *before* notification. Vetoed: no mutation.
//! 4. Swap the state classes on the wrapper and the ARIA attributes on the
//!    toggle, then move focus.
//! 5. Send the *after* notification.
//!
//! Return values encode the resulting state, `true` for expanded:
//!
//! | Situation | `expand` | `collapse` |
//! |---|---|---|
//! | Transition performed | `true` | `false` |
//! | Already in target state | `true` | `false` |
//! | Vetoed by an observer | `false` | `true` |
//! | Collapsing not permitted | n/a | `false` |
//!
//! ## Focus
//!
//! Expanding schedules a focus move to the content after
//! [`Config::focus_delay`], giving CSS transitions time to make it
//! focusable. A later successful collapse through the same handle cancels
//! that pending move before focusing the toggle, so focus never jumps into
//! content that has just been hidden.
//!
//! ```rust
//! use std::sync::Arc;
//! use kurbo::Rect;
//! use understory_collapsible::headless::{Document, Effect, StyleRule};
//! use understory_collapsible::host::{Host, attr};
//! use understory_collapsible::{BreakpointActivity, Collapsible, CollapsibleElement, Config};
//!
//! let config = Arc::new(Config::new("Show details", "Hide details"));
//! let mut doc = Document::new();
//! doc.add_rule(StyleRule::new(&config.collapsed_class, "content", Effect::DisplayNone));
//! doc.set_breakpoints("body", BreakpointActivity::new().with("s", true));
//!
//! let wrapper = doc.create_element(None, "js-collapsible");
//! doc.set_attribute(wrapper, attr::COLLAPSIBLE_BPS, "s");
//! let toggle = doc.create_element(Some(wrapper), "toggle");
//! let content = doc.create_element(Some(wrapper), "content");
//! doc.set_box(content, Rect::new(0.0, 0.0, 320.0, 200.0));
//!
//! let mut handle = Collapsible::new(CollapsibleElement::new(wrapper, toggle, Some(content)), config);
//! assert!(!handle.collapse(&mut doc, &mut (), None));
//! assert!(handle.is_collapsed(&doc));
//! assert_eq!(doc.attribute(toggle, attr::ARIA_EXPANDED).as_deref(), Some("false"));
//! assert_eq!(doc.attribute(toggle, attr::ARIA_LABEL).as_deref(), Some("Show details"));
//!
//! assert!(handle.toggle(&mut doc, &mut (), None));
//! assert!(!handle.is_collapsed(&doc));
//! ```

use alloc::sync::Arc;

use crate::classes::ClassList;
use crate::config::{Config, ConfigError};
use crate::element::CollapsibleElement;
use crate::event::{self, EventKind, Notifier};
use crate::host::{DeferredTask, Host, TimerId, attr};
use crate::probe;
use crate::rule;

/// The two visual states of a region.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum State {
    /// Content is hidden.
    Collapsed,
    /// Content is showing.
    Expanded,
}

impl State {
    /// `true` for [`State::Expanded`].
    pub const fn is_expanded(self) -> bool {
        matches!(self, Self::Expanded)
    }

    /// The state matching an `is_expanded` flag.
    pub const fn from_expanded(expanded: bool) -> Self {
        if expanded {
            Self::Expanded
        } else {
            Self::Collapsed
        }
    }
}

/// Control handle for one collapsible region.
#[derive(Clone, Debug)]
pub struct Collapsible<N> {
    element: CollapsibleElement<N>,
    config: Arc<Config>,
    pending_focus: Option<TimerId>,
}

impl<N: Copy + Eq + core::hash::Hash + core::fmt::Debug> Collapsible<N> {
    /// Creates a handle for `element` governed by `config`.
    ///
    /// `config` is trusted as-is. State classes that prefix each other make
    /// the class swap strip the class it just added; use
    /// [`Collapsible::try_new`] for configurations that were not validated.
    pub fn new(element: CollapsibleElement<N>, config: Arc<Config>) -> Self {
        Self {
            element,
            config,
            pending_focus: None,
        }
    }

    /// Creates a handle after checking `config` with [`Config::validate`].
    pub fn try_new(
        element: CollapsibleElement<N>,
        config: Arc<Config>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(element, config))
    }

    /// The elements this handle controls.
    pub fn element(&self) -> &CollapsibleElement<N> {
        &self.element
    }

    /// The configuration shared with sibling handles.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The focus move scheduled by the last expand, if it has not been
    /// cancelled. It may already have fired.
    pub fn pending_focus(&self) -> Option<TimerId> {
        self.pending_focus
    }

    /// Returns `true` if the content is collapsed according to the probe.
    pub fn is_collapsed<H: Host<Node = N> + ?Sized>(&self, host: &H) -> bool {
        probe::is_collapsed(host, self.element.content)
    }

    /// The current state according to the probe.
    pub fn state<H: Host<Node = N> + ?Sized>(&self, host: &H) -> State {
        State::from_expanded(!self.is_collapsed(host))
    }

    /// Returns `true` if the breakpoint rule permits collapsing right now.
    ///
    /// Queries the breakpoint source on every call.
    pub fn is_collapsible<H: Host<Node = N> + ?Sized>(&self, host: &H) -> bool {
        let activity = host.breakpoints(&self.config.bps_selector);
        rule::is_collapsible(host, self.element.wrapper, &activity)
    }

    fn resolve_collapsed<H>(&self, host: &H, current: Option<State>) -> bool
    where
        H: Host<Node = N> + ?Sized,
    {
        match current {
            Some(state) => !state.is_expanded(),
            None => self.is_collapsed(host),
        }
    }

    /// Expands the region. Returns the resulting state, `true` for expanded.
    ///
    /// `current` overrides the probe for this call.
    pub fn expand<H, O>(
        &mut self,
        host: &mut H,
        observers: &mut O,
        current: Option<State>,
    ) -> bool
    where
        H: Host<Node = N> + ?Sized,
        O: Notifier<H> + ?Sized,
    {
        let wrapper = self.element.wrapper;
        if !self.resolve_collapsed(host, current) {
            log::trace!("expand {wrapper:?}: already expanded");
            return true;
        }

        let detail = self.element.detail();
        if !event::dispatch(host, observers, EventKind::ExpandBefore, detail) {
            return false;
        }

        let mut classes = ClassList::read(host, wrapper);
        classes.swap(&self.config.expanded_class, &self.config.collapsed_class);
        classes.write(host, wrapper);
        host.set_attribute(self.element.toggle, attr::ARIA_LABEL, &self.config.label_collapse);
        host.set_attribute(self.element.toggle, attr::ARIA_EXPANDED, "true");

        if let Some(content) = self.element.content {
            if let Some(stale) = self.pending_focus.take() {
                host.clear_timeout(stale);
            }
            let timer = host.set_timeout(self.config.focus_delay, DeferredTask::Focus(content));
            self.pending_focus = Some(timer);
        }

        event::dispatch(host, observers, EventKind::ExpandAfter, detail);
        log::debug!("expanded {wrapper:?}");
        true
    }

    /// Collapses the region if the breakpoint rule permits it. Returns the
    /// resulting state, `true` for expanded.
    ///
    /// Returns `false` without notifying anyone when collapsing is not
    /// permitted, even though the region stays expanded.
    ///
    /// `current` overrides the probe for this call.
    pub fn collapse<H, O>(
        &mut self,
        host: &mut H,
        observers: &mut O,
        current: Option<State>,
    ) -> bool
    where
        H: Host<Node = N> + ?Sized,
        O: Notifier<H> + ?Sized,
    {
        let wrapper = self.element.wrapper;
        if self.resolve_collapsed(host, current) {
            log::trace!("collapse {wrapper:?}: already collapsed");
            return false;
        }

        if !self.is_collapsible(host) {
            log::debug!("collapse {wrapper:?}: not permitted at current breakpoint");
            return false;
        }

        let detail = self.element.detail();
        if !event::dispatch(host, observers, EventKind::CollapseBefore, detail) {
            return true;
        }

        if let Some(pending) = self.pending_focus.take() {
            host.clear_timeout(pending);
        }
        host.focus(self.element.toggle);

        let mut classes = ClassList::read(host, wrapper);
        classes.swap(&self.config.collapsed_class, &self.config.expanded_class);
        classes.write(host, wrapper);
        host.set_attribute(self.element.toggle, attr::ARIA_LABEL, &self.config.label_expand);
        host.set_attribute(self.element.toggle, attr::ARIA_EXPANDED, "false");

        event::dispatch(host, observers, EventKind::CollapseAfter, detail);
        log::debug!("collapsed {wrapper:?}");
        false
    }

    /// Expands a collapsed region, collapses an expanded one. Returns the
    /// resulting state, `true` for expanded.
    pub fn toggle<H, O>(
        &mut self,
        host: &mut H,
        observers: &mut O,
        current: Option<State>,
    ) -> bool
    where
        H: Host<Node = N> + ?Sized,
        O: Notifier<H> + ?Sized,
    {
        if self.resolve_collapsed(host, current) {
            self.expand(host, observers, current)
        } else {
            self.collapse(host, observers, current)
        }
    }
}
