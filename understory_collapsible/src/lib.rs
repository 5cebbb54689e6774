// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_collapsible --heading-base-level=0

//! Understory Collapsible: breakpoint-aware, accessible collapsible regions.
//!
//! A collapsible region is a wrapper holding a toggle control and a content
//! region. Whether the region may collapse depends on which layout
//! breakpoints are active; whether it *is* collapsed is read from rendered
//! layout every time it matters.
//!
//! This crate is the state engine behind such regions. It does not attach
//! event listeners, debounce resizes, or animate anything. Instead, a host
//! implements [`Host`](host::Host) over its document and calls into:
//!
//! - [`probe`]: is the content showing right now?
//! - [`BreakpointRule`] / [`rule::is_collapsible`]: does the wrapper's
//!   `data-collapsible-bps` rule permit collapsing under the active
//!   breakpoints?
//! - [`Collapsible`]: `expand`, `collapse`, and `toggle` with class and ARIA
//!   synchronization and vetoable before/after notifications ([`event`]).
//! - [`evaluate_all`]: a passive resync pass for load and resize.
//! - [`Registry`]: an application-owned map from wrapper to handle, with the
//!   usual discover-then-evaluate initialization.
//!
//! ## State is derived, not stored
//!
//! Handles carry no collapsed flag. Each operation probes the content's
//! layout and computed visibility, or uses a [`State`] the caller passes for
//! that one call. DOM changes made behind the engine's back are picked up on
//! the next call.
//!
//! ## Invariants
//!
//! After any completed operation on an evaluated element:
//!
//! - The wrapper carries exactly one of the configured collapsed/expanded
//!   classes. Modifier tokens prefixed by the outgoing class are removed too.
//! - The toggle's `aria-expanded` is the complement of collapsed, and its
//!   `aria-label` names the action a click will perform.
//! - Elements without a usable rule are never collapsed and are kept in the
//!   expanded class.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_collapsible::headless::{Document, Effect, StyleRule};
//! use understory_collapsible::host::{Host, attr};
//! use understory_collapsible::{BreakpointActivity, Classification, Config, Registry};
//!
//! let config = Config::new("Show more", "Show less");
//! let mut doc = Document::new();
//! // Stand-in for the stylesheet: content disappears under the collapsed class.
//! doc.add_rule(StyleRule::new(&config.collapsed_class, &config.content_class, Effect::DisplayNone));
//! doc.set_breakpoints("body", BreakpointActivity::new().with("s", true).with("l", false));
//!
//! let wrapper = doc.create_element(None, "js-collapsible");
//! doc.set_attribute(wrapper, attr::COLLAPSIBLE_BPS, "s, m");
//! let toggle = doc.create_element(Some(wrapper), "js-collapsible__toggle");
//! let content = doc.create_element(Some(wrapper), "js-collapsible__content");
//! doc.set_box(content, Rect::new(0.0, 0.0, 320.0, 400.0));
//!
//! let (mut registry, initial) = Registry::init(&mut doc, config).unwrap();
//! assert_eq!(initial, [Classification::Expanded]);
//!
//! // A click handler would call this.
//! let expanded = registry.toggle(&mut doc, &mut (), wrapper, None).unwrap();
//! assert!(!expanded);
//! assert_eq!(doc.attribute(toggle, attr::ARIA_EXPANDED).as_deref(), Some("false"));
//!
//! // The viewport grows past every listed breakpoint.
//! doc.set_breakpoints("body", BreakpointActivity::new().with("s", false).with("l", true));
//! assert_eq!(registry.reevaluate(&mut doc), [Classification::Static]);
//! assert!(doc.has_class(wrapper, "o-collapsible-is-expanded"));
//! assert_eq!(doc.attribute(toggle, attr::ARIA_EXPANDED), None);
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo/std`.
//! - `libm`: forwards to `kurbo/libm` for `no_std` targets.
//! - `css_state` (default): decode breakpoint snapshots from CSS `content`
//!   payloads with [`BreakpointActivity::from_css_content`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod breakpoints;
pub mod classes;
pub mod config;
pub mod element;
pub mod engine;
pub mod evaluate;
pub mod event;
pub mod headless;
pub mod host;
pub mod probe;
pub mod registry;
pub mod rule;

pub use breakpoints::{BreakpointActivity, BreakpointStateError};
pub use classes::ClassList;
pub use config::{Config, ConfigError};
pub use element::{CollapsibleElement, DiscoverError};
pub use engine::{Collapsible, State};
pub use evaluate::{Classification, evaluate_all, evaluate_one};
pub use registry::Registry;
pub use rule::BreakpointRule;
