// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registry of control handles keyed by wrapper identity.
//!
//! The engine itself keeps no global state. A [`Registry`] is what an
//! application owns to find the [`Collapsible`] behind a clicked wrapper and
//! to resync every region after a viewport change.
//!
//! ```rust
//! use understory_collapsible::headless::Document;
//! use understory_collapsible::{Classification, Config, Registry};
//!
//! let mut doc = Document::new();
//! let wrapper = doc.create_element(None, "js-collapsible");
//! doc.create_element(Some(wrapper), "js-collapsible__toggle");
//! doc.create_element(Some(wrapper), "js-collapsible__content");
//!
//! let (mut registry, initial) = Registry::init(&mut doc, Config::new("Open", "Close")).unwrap();
//! assert_eq!(initial, [Classification::Static]);
//! assert!(registry.get(wrapper).is_some());
//!
//! // From a debounced resize handler:
//! let _ = registry.reevaluate(&mut doc);
//! ```

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::config::{Config, ConfigError};
use crate::element::{CollapsibleElement, DiscoverError};
use crate::engine::{Collapsible, State};
use crate::evaluate::{self, Classification};
use crate::event::Notifier;
use crate::host::Host;

/// Wrapper → handle map sharing one [`Config`].
#[derive(Clone, Debug)]
pub struct Registry<N> {
    config: Arc<Config>,
    order: Vec<N>,
    handles: HashMap<N, Collapsible<N>>,
}

impl<N: Copy + Eq + Hash + fmt::Debug> Registry<N> {
    /// Creates an empty registry after validating `config`.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            order: Vec::new(),
            handles: HashMap::new(),
        })
    }

    /// Registers every element carrying the init class and runs the first
    /// evaluation pass.
    ///
    /// Wrappers without a toggle are skipped with a warning. Returns the
    /// registry and the classification of each registered element in
    /// document order.
    pub fn init<H>(
        host: &mut H,
        config: Config,
    ) -> Result<(Self, Vec<Classification>), ConfigError>
    where
        H: Host<Node = N> + ?Sized,
    {
        let mut registry = Self::new(config)?;
        for wrapper in host.elements_by_class(None, &registry.config.init_class) {
            if let Err(err) = registry.register(host, wrapper) {
                log::warn!("skipping collapsible: {err}");
            }
        }
        let classifications = registry.reevaluate(host);
        Ok((registry, classifications))
    }

    /// Discovers the parts of `wrapper` and registers a handle for it.
    ///
    /// Re-registering a wrapper replaces its handle. Does not evaluate.
    pub fn register<H>(
        &mut self,
        host: &H,
        wrapper: N,
    ) -> Result<&mut Collapsible<N>, DiscoverError<N>>
    where
        H: Host<Node = N> + ?Sized,
    {
        let element = CollapsibleElement::discover(host, wrapper, &self.config)?;
        Ok(self.insert(element))
    }

    /// Registers a handle for an element whose parts are already known.
    pub fn insert(&mut self, element: CollapsibleElement<N>) -> &mut Collapsible<N> {
        let wrapper = element.wrapper;
        let handle = Collapsible::new(element, Arc::clone(&self.config));
        match self.handles.entry(wrapper) {
            Entry::Occupied(mut slot) => {
                slot.insert(handle);
                slot.into_mut()
            }
            Entry::Vacant(slot) => {
                self.order.push(wrapper);
                slot.insert(handle)
            }
        }
    }

    /// Drops the handle for `wrapper`.
    pub fn remove(&mut self, wrapper: N) -> Option<Collapsible<N>> {
        let handle = self.handles.remove(&wrapper)?;
        self.order.retain(|w| *w != wrapper);
        Some(handle)
    }

    /// The shared configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The handle for `wrapper`.
    pub fn get(&self, wrapper: N) -> Option<&Collapsible<N>> {
        self.handles.get(&wrapper)
    }

    /// The handle for `wrapper`, mutably.
    pub fn get_mut(&mut self, wrapper: N) -> Option<&mut Collapsible<N>> {
        self.handles.get_mut(&wrapper)
    }

    /// Number of registered wrappers.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Handles in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Collapsible<N>> + '_ {
        self.order.iter().filter_map(|w| self.handles.get(w))
    }

    /// Runs the batch evaluator over every registered element.
    pub fn reevaluate<H>(&mut self, host: &mut H) -> Vec<Classification>
    where
        H: Host<Node = N> + ?Sized,
    {
        let elements: Vec<CollapsibleElement<N>> =
            self.iter().map(|handle| *handle.element()).collect();
        evaluate::evaluate_all(host, &elements, &self.config)
    }

    /// Expands the region under `wrapper`. `None` if it is not registered.
    pub fn expand<H, O>(
        &mut self,
        host: &mut H,
        observers: &mut O,
        wrapper: N,
        current: Option<State>,
    ) -> Option<bool>
    where
        H: Host<Node = N> + ?Sized,
        O: Notifier<H> + ?Sized,
    {
        Some(self.get_mut(wrapper)?.expand(host, observers, current))
    }

    /// Collapses the region under `wrapper`. `None` if it is not registered.
    pub fn collapse<H, O>(
        &mut self,
        host: &mut H,
        observers: &mut O,
        wrapper: N,
        current: Option<State>,
    ) -> Option<bool>
    where
        H: Host<Node = N> + ?Sized,
        O: Notifier<H> + ?Sized,
    {
        Some(self.get_mut(wrapper)?.collapse(host, observers, current))
    }

    /// Toggles the region under `wrapper`. `None` if it is not registered.
    pub fn toggle<H, O>(
        &mut self,
        host: &mut H,
        observers: &mut O,
        wrapper: N,
        current: Option<State>,
    ) -> Option<bool>
    where
        H: Host<Node = N> + ?Sized,
        O: Notifier<H> + ?Sized,
    {
        Some(self.get_mut(wrapper)?.toggle(host, observers, current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{Document, NodeId};

    fn add_wrapper(doc: &mut Document, with_toggle: bool) -> NodeId {
        let wrapper = doc.create_element(None, "js-collapsible");
        if with_toggle {
            doc.create_element(Some(wrapper), "js-collapsible__toggle");
        }
        doc.create_element(Some(wrapper), "js-collapsible__content");
        wrapper
    }

    #[test]
    fn init_registers_in_document_order_and_skips_broken_wrappers() {
        let mut doc = Document::new();
        let a = add_wrapper(&mut doc, true);
        let broken = add_wrapper(&mut doc, false);
        let b = add_wrapper(&mut doc, true);

        let (registry, initial) = Registry::init(&mut doc, Config::new("Open", "Close")).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(initial.len(), 2);
        assert!(registry.get(broken).is_none());
        let order: Vec<NodeId> = registry.iter().map(|h| h.element().wrapper).collect();
        assert_eq!(order, [a, b]);
    }

    #[test]
    fn init_rejects_invalid_config() {
        let mut doc = Document::new();
        let config = Config::new("Open", "Close").with_state_classes("x", "x-y");
        assert!(matches!(
            Registry::init(&mut doc, config),
            Err(ConfigError::OverlappingStateClasses { .. })
        ));
    }

    #[test]
    fn reinsert_and_remove_keep_order_consistent() {
        let mut doc = Document::new();
        let a = add_wrapper(&mut doc, true);
        let b = add_wrapper(&mut doc, true);
        let mut registry = Registry::new(Config::new("Open", "Close")).unwrap();
        registry.register(&doc, a).unwrap();
        registry.register(&doc, b).unwrap();
        registry.register(&doc, a).unwrap();
        assert_eq!(registry.len(), 2);

        assert!(registry.remove(a).is_some());
        assert!(registry.remove(a).is_none());
        let order: Vec<NodeId> = registry.iter().map(|h| h.element().wrapper).collect();
        assert_eq!(order, [b]);
    }

    #[test]
    fn unknown_wrapper_yields_none() {
        let mut doc = Document::new();
        let stray = doc.create_element(None, "");
        let mut registry = Registry::new(Config::new("Open", "Close")).unwrap();
        assert_eq!(registry.toggle(&mut doc, &mut (), stray, None), None);
    }
}
