// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Before/after notifications around state transitions.
//!
//! Every transition is bracketed by two notifications:
//!
//! 1. A cancelable *before* notification. Any observer may call
//!    [`CollapsibleEvent::prevent_default`]; if one does, the transition is
//!    abandoned and nothing is mutated.
//! 2. A non-cancelable *after* notification, sent once the classes and ARIA
//!    attributes have been written.
//!
//! Delivery goes through the [`Notifier`] trait, so a host can forward
//! notifications to its own event system. [`Observers`] is a ready-made
//! in-process notifier that calls registered handlers in order and honors
//! [`Outcome::Stop`] like `stopImmediatePropagation`.
//!
//! ```rust
//! use understory_collapsible::event::{EventKind, EventMask, Observers, Outcome};
//! use understory_collapsible::headless::Document;
//!
//! let mut observers = Observers::<Document>::new();
//! observers.on(EventMask::COLLAPSE_BEFORE, |_doc, ev| {
//!     assert_eq!(ev.kind(), EventKind::CollapseBefore);
//!     ev.prevent_default();
//!     Outcome::Continue
//! });
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::host::Host;
use crate::probe;

/// The four notifications emitted by the state engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Before expanding. Cancelable.
    ExpandBefore,
    /// After expanding.
    ExpandAfter,
    /// Before collapsing. Cancelable.
    CollapseBefore,
    /// After collapsing.
    CollapseAfter,
}

impl EventKind {
    /// The event name a DOM binding would dispatch.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ExpandBefore => "collapsibles:expand-before",
            Self::ExpandAfter => "collapsibles:expand-after",
            Self::CollapseBefore => "collapsibles:collapse-before",
            Self::CollapseAfter => "collapsibles:collapse-after",
        }
    }

    /// Returns `true` for the *before* notifications.
    pub const fn is_cancelable(self) -> bool {
        matches!(self, Self::ExpandBefore | Self::CollapseBefore)
    }

    /// The mask bit selecting this kind.
    pub const fn mask(self) -> EventMask {
        match self {
            Self::ExpandBefore => EventMask::EXPAND_BEFORE,
            Self::ExpandAfter => EventMask::EXPAND_AFTER,
            Self::CollapseBefore => EventMask::COLLAPSE_BEFORE,
            Self::CollapseAfter => EventMask::COLLAPSE_AFTER,
        }
    }
}

bitflags::bitflags! {
    /// Set of [`EventKind`]s an observer subscribes to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EventMask: u8 {
        /// [`EventKind::ExpandBefore`].
        const EXPAND_BEFORE   = 0b0000_0001;
        /// [`EventKind::ExpandAfter`].
        const EXPAND_AFTER    = 0b0000_0010;
        /// [`EventKind::CollapseBefore`].
        const COLLAPSE_BEFORE = 0b0000_0100;
        /// [`EventKind::CollapseAfter`].
        const COLLAPSE_AFTER  = 0b0000_1000;
        /// Both cancelable notifications.
        const BEFORE = Self::EXPAND_BEFORE.bits() | Self::COLLAPSE_BEFORE.bits();
        /// Both completion notifications.
        const AFTER = Self::EXPAND_AFTER.bits() | Self::COLLAPSE_AFTER.bits();
    }
}

/// The elements involved in a transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Detail<N> {
    /// The wrapper carrying the state class.
    pub wrapper: N,
    /// The content region, if the wrapper has one.
    pub content: Option<N>,
    /// The toggle control carrying the ARIA state.
    pub toggle: N,
}

impl<N: Copy> Detail<N> {
    /// Predicate reporting whether the content is collapsed right now.
    ///
    /// Reads layout fresh on every call, so an *after* observer sees the
    /// state produced by the style rules, not a value captured at dispatch.
    pub fn is_collapsed<H: Host<Node = N> + ?Sized>(&self, host: &H) -> bool {
        probe::is_collapsed(host, self.content)
    }
}

/// A notification being delivered to observers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollapsibleEvent<N> {
    kind: EventKind,
    detail: Detail<N>,
    default_prevented: bool,
}

impl<N> CollapsibleEvent<N> {
    /// Creates an event that has not been prevented.
    pub fn new(kind: EventKind, detail: Detail<N>) -> Self {
        Self {
            kind,
            detail,
            default_prevented: false,
        }
    }

    /// Which notification this is.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The elements involved.
    pub fn detail(&self) -> &Detail<N> {
        &self.detail
    }

    /// Returns `true` if observers may veto this event.
    pub fn is_cancelable(&self) -> bool {
        self.kind.is_cancelable()
    }

    /// Vetoes the transition. Ignored on non-cancelable events.
    pub fn prevent_default(&mut self) {
        if self.is_cancelable() {
            self.default_prevented = true;
        }
    }

    /// Returns `true` if an observer vetoed the transition.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Propagation control returned by an observer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Deliver to the next observer.
    Continue,
    /// Skip the remaining observers.
    Stop,
}

/// Delivers notifications to whoever is listening.
pub trait Notifier<H: Host + ?Sized> {
    /// Delivers `event`. Observers veto through
    /// [`CollapsibleEvent::prevent_default`].
    fn notify(&mut self, host: &H, event: &mut CollapsibleEvent<H::Node>);
}

/// Nobody is listening; every transition is allowed.
impl<H: Host + ?Sized> Notifier<H> for () {
    fn notify(&mut self, _host: &H, _event: &mut CollapsibleEvent<H::Node>) {}
}

impl<H: Host + ?Sized, T: Notifier<H> + ?Sized> Notifier<H> for &mut T {
    fn notify(&mut self, host: &H, event: &mut CollapsibleEvent<H::Node>) {
        (**self).notify(host, event);
    }
}

/// Handle returned by [`Observers::on`], used to unsubscribe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u32);

struct Entry<H: Host + ?Sized> {
    id: ObserverId,
    mask: EventMask,
    handler: Box<dyn FnMut(&H, &mut CollapsibleEvent<H::Node>) -> Outcome>,
}

/// Ordered list of observer callbacks.
pub struct Observers<H: Host + ?Sized> {
    entries: Vec<Entry<H>>,
    next_id: u32,
}

impl<H: Host + ?Sized> Observers<H> {
    /// Creates an empty observer list.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Subscribes `handler` to the kinds in `mask`.
    ///
    /// Handlers run in subscription order.
    pub fn on(
        &mut self,
        mask: EventMask,
        handler: impl FnMut(&H, &mut CollapsibleEvent<H::Node>) -> Outcome + 'static,
    ) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            mask,
            handler: Box::new(handler),
        });
        id
    }

    /// Unsubscribes an observer. Returns `false` if it was not subscribed.
    pub fn off(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Number of subscribed observers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H: Host + ?Sized> Default for Observers<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Host + ?Sized> fmt::Debug for Observers<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.entries.len())
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl<H: Host + ?Sized> Notifier<H> for Observers<H> {
    fn notify(&mut self, host: &H, event: &mut CollapsibleEvent<H::Node>) {
        let bit = event.kind().mask();
        for entry in &mut self.entries {
            if !entry.mask.contains(bit) {
                continue;
            }
            match (entry.handler)(host, event) {
                Outcome::Continue => {}
                Outcome::Stop => break,
            }
        }
    }
}

/// Sends one notification and reports whether the default action may proceed.
pub(crate) fn dispatch<H, O>(
    host: &H,
    observers: &mut O,
    kind: EventKind,
    detail: Detail<H::Node>,
) -> bool
where
    H: Host + ?Sized,
    O: Notifier<H> + ?Sized,
{
    let mut event = CollapsibleEvent::new(kind, detail);
    observers.notify(host, &mut event);
    if event.default_prevented() {
        log::debug!("{} vetoed for {:?}", kind.name(), detail.wrapper);
        false
    } else {
        log::trace!("{} delivered for {:?}", kind.name(), detail.wrapper);
        true
    }
}
