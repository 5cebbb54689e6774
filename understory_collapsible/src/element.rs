// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The three elements that make up a collapsible region.

use core::fmt;

use crate::config::Config;
use crate::event::Detail;
use crate::host::Host;

/// References to the parts of one collapsible region.
///
/// The engine does not own these elements; it only holds their handles and
/// queries the host for their current state on every call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CollapsibleElement<N> {
    /// Container whose class list carries the state class and whose
    /// `data-collapsible-bps` attribute carries the breakpoint rule.
    pub wrapper: N,
    /// The control that triggers transitions and carries the ARIA state.
    pub toggle: N,
    /// The region whose layout decides collapsed-ness. `None` reads as collapsed.
    pub content: Option<N>,
}

impl<N: Copy> CollapsibleElement<N> {
    /// Bundles existing handles.
    pub const fn new(wrapper: N, toggle: N, content: Option<N>) -> Self {
        Self {
            wrapper,
            toggle,
            content,
        }
    }

    /// Finds the toggle and content inside `wrapper` by their configured classes.
    ///
    /// The first match of each class wins. A missing content region is
    /// accepted; a missing toggle is not, since there would be nothing to
    /// carry the ARIA state.
    pub fn discover<H>(host: &H, wrapper: N, config: &Config) -> Result<Self, DiscoverError<N>>
    where
        H: Host<Node = N> + ?Sized,
    {
        let toggle = host
            .elements_by_class(Some(wrapper), &config.toggle_class)
            .first()
            .copied()
            .ok_or(DiscoverError::MissingToggle { wrapper })?;
        let content = host
            .elements_by_class(Some(wrapper), &config.content_class)
            .first()
            .copied();
        Ok(Self {
            wrapper,
            toggle,
            content,
        })
    }

    /// The payload carried by notifications about this element.
    pub fn detail(&self) -> Detail<N> {
        Detail {
            wrapper: self.wrapper,
            content: self.content,
            toggle: self.toggle,
        }
    }
}

/// Error returned by [`CollapsibleElement::discover`].
#[derive(Clone, PartialEq, Eq)]
pub enum DiscoverError<N> {
    /// The wrapper contains no element with the toggle class.
    MissingToggle {
        /// The wrapper that was searched.
        wrapper: N,
    },
}

impl<N: fmt::Debug> fmt::Debug for DiscoverError<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingToggle { wrapper } => {
                write!(f, "DiscoverError::MissingToggle {{ wrapper: {wrapper:?} }}")
            }
        }
    }
}

impl<N: fmt::Debug> fmt::Display for DiscoverError<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingToggle { wrapper } => {
                write!(f, "collapsible {wrapper:?} has no toggle element")
            }
        }
    }
}

impl<N: fmt::Debug> core::error::Error for DiscoverError<N> {}
