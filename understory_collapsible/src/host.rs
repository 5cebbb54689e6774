// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host surface the state engine reads from and writes to.
//!
//! A [`Host`] stands in for the document: it answers layout and computed-style
//! queries, rewrites class and attribute strings, moves focus, runs one-shot
//! timers, and reports which breakpoints are active. Everything is synchronous
//! and must be answered fresh on every call; the engine never caches a result
//! across calls.
//!
//! The crate ships an in-memory implementation in [`headless`](crate::headless).
//! A browser binding would implement the same trait over `web-sys`.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;
use core::time::Duration;

use kurbo::{Rect, Size};

use crate::breakpoints::BreakpointActivity;

/// Geometry reported for an element that is part of the document.
///
/// Mirrors the two signals a layout engine exposes: the element's offset box
/// size and the list of client rectangles it generates. An element with
/// `display: none` reports a zero size and no rectangles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutBox {
    /// Offset width and height.
    pub offset_size: Size,
    /// Client rectangles generated by the element (one per line box for inline content).
    pub client_rects: Vec<Rect>,
}

impl LayoutBox {
    /// A box with no geometry, as produced by `display: none`.
    pub const fn none() -> Self {
        Self {
            offset_size: Size::ZERO,
            client_rects: Vec::new(),
        }
    }

    /// A box with a single client rectangle covering `rect`.
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            offset_size: rect.size(),
            client_rects: alloc::vec![rect],
        }
    }
}

/// Computed value of the CSS `visibility` property.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// `visible`
    #[default]
    Visible,
    /// `hidden`
    Hidden,
    /// `collapse`
    Collapse,
}

/// Handle to a timer scheduled with [`Host::set_timeout`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Work a host runs when a timer fires.
///
/// Deferred work is data rather than a closure so hosts can queue, inspect,
/// and cancel it without borrowing the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeferredTask<N> {
    /// Move input focus to the node.
    Focus(N),
}

/// Attribute names the engine reads and writes.
pub mod attr {
    /// Declarative breakpoint rule on the wrapper.
    pub const COLLAPSIBLE_BPS: &str = "data-collapsible-bps";
    /// Focus index on the content region.
    pub const TABINDEX: &str = "tabindex";
    /// Relation from the toggle to the content region.
    pub const ARIA_CONTROLS: &str = "aria-controls";
    /// Accessible name of the toggle.
    pub const ARIA_LABEL: &str = "aria-label";
    /// Expanded state of the toggle.
    pub const ARIA_EXPANDED: &str = "aria-expanded";
    /// Element identifier.
    pub const ID: &str = "id";
}

/// The document surface consumed by the engine.
pub trait Host {
    /// Identity of an element. Cheap to copy, stable for the element's lifetime.
    type Node: Copy + Eq + Hash + fmt::Debug;

    /// Layout of `node`, or `None` if the node is not part of the document.
    fn layout(&self, node: Self::Node) -> Option<LayoutBox>;

    /// Computed `visibility` of `node`.
    fn visibility(&self, node: Self::Node) -> Visibility;

    /// The raw, whitespace-delimited class attribute of `node`.
    fn class_name(&self, node: Self::Node) -> String;

    /// Replace the class attribute of `node`.
    fn set_class_name(&mut self, node: Self::Node, class_name: &str);

    /// Read an attribute.
    fn attribute(&self, node: Self::Node, name: &str) -> Option<String>;

    /// Write an attribute.
    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str);

    /// Remove an attribute. Removing an absent attribute is a no-op.
    fn remove_attribute(&mut self, node: Self::Node, name: &str);

    /// Move input focus to `node`.
    fn focus(&mut self, node: Self::Node);

    /// Elements carrying `class`, in document order.
    ///
    /// With `scope` set, only descendants of that element are returned.
    fn elements_by_class(&self, scope: Option<Self::Node>, class: &str) -> Vec<Self::Node>;

    /// Query the breakpoint-state source identified by `selector`.
    ///
    /// Implementations must read the current state; the engine calls this
    /// once per evaluation and never reuses the result.
    fn breakpoints(&self, selector: &str) -> BreakpointActivity;

    /// Schedule `task` to run once after `delay`.
    fn set_timeout(&mut self, delay: Duration, task: DeferredTask<Self::Node>) -> TimerId;

    /// Cancel a pending timer. Cancelling a fired or unknown timer is a no-op.
    fn clear_timeout(&mut self, id: TimerId);
}
