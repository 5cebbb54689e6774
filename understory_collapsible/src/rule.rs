// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Breakpoint rules: may this element collapse at the current breakpoint?
//!
//! A wrapper opts into collapsing with a comma-separated list of breakpoint
//! names in its `data-collapsible-bps` attribute:
//!
//! ```html
//! <section class="js-collapsible" data-collapsible-bps="s, m">…</section>
//! ```
//!
//! The element is collapsible while **any** listed breakpoint is active.
//! A missing or blank rule means the element is never collapsible.
//!
//! ```rust
//! use understory_collapsible::{BreakpointActivity, BreakpointRule};
//!
//! let rule = BreakpointRule::parse(" s , m ").unwrap();
//! assert_eq!(rule.names().collect::<Vec<_>>(), ["s", "m"]);
//!
//! let bps = BreakpointActivity::new().with("s", false).with("m", true);
//! assert!(rule.evaluate(&bps));
//! assert!(BreakpointRule::parse("  ").is_none());
//! ```

use alloc::string::String;

use smallvec::SmallVec;

use crate::breakpoints::BreakpointActivity;
use crate::host::{Host, attr};

/// A parsed `data-collapsible-bps` rule.
///
/// Names are trimmed; empty segments (`"a,,b"`, trailing commas) are dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BreakpointRule {
    names: SmallVec<[String; 4]>,
}

impl BreakpointRule {
    /// Parses a rule string, returning `None` if it names no breakpoint.
    pub fn parse(rule: &str) -> Option<Self> {
        let names: SmallVec<[String; 4]> = rule
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();
        if names.is_empty() {
            None
        } else {
            Some(Self { names })
        }
    }

    /// Reads and parses the rule attached to `wrapper`.
    pub fn read<H: Host + ?Sized>(host: &H, wrapper: H::Node) -> Option<Self> {
        host.attribute(wrapper, attr::COLLAPSIBLE_BPS)
            .as_deref()
            .and_then(Self::parse)
    }

    /// The breakpoint names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    /// Returns `true` if any named breakpoint is active.
    ///
    /// Stops at the first active name. Unknown names count as inactive.
    pub fn evaluate(&self, activity: &BreakpointActivity) -> bool {
        self.names.iter().any(|name| activity.is_active(name))
    }
}

/// Returns `true` if `wrapper` may be collapsed under `activity`.
///
/// Pure: reads the wrapper's rule attribute and nothing else.
pub fn is_collapsible<H: Host + ?Sized>(
    host: &H,
    wrapper: H::Node,
    activity: &BreakpointActivity,
) -> bool {
    BreakpointRule::read(host, wrapper).is_some_and(|rule| rule.evaluate(activity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::Document;
    use alloc::vec::Vec;

    fn bps(entries: &[(&str, bool)]) -> BreakpointActivity {
        entries.iter().map(|&(k, v)| (k, v)).collect()
    }

    #[test]
    fn single_name_follows_its_breakpoint() {
        let rule = BreakpointRule::parse("wide").unwrap();
        assert!(rule.evaluate(&bps(&[("wide", true)])));
        assert!(!rule.evaluate(&bps(&[("wide", false)])));
    }

    #[test]
    fn any_active_name_permits_collapse() {
        let rule = BreakpointRule::parse("a, b").unwrap();
        assert!(rule.evaluate(&bps(&[("a", false), ("b", true)])));
        assert!(rule.evaluate(&bps(&[("a", true), ("b", false)])));
        assert!(!rule.evaluate(&bps(&[("a", false), ("b", false)])));
    }

    #[test]
    fn unknown_names_are_inactive() {
        let rule = BreakpointRule::parse("xl").unwrap();
        assert!(!rule.evaluate(&bps(&[("s", true)])));
        assert!(!rule.evaluate(&BreakpointActivity::new()));
    }

    #[test]
    fn whitespace_and_empty_segments_are_ignored() {
        let rule = BreakpointRule::parse(" ,s ,\t m,, ").unwrap();
        assert_eq!(rule.names().collect::<Vec<_>>(), ["s", "m"]);
        assert!(BreakpointRule::parse("").is_none());
        assert!(BreakpointRule::parse(" , ,").is_none());
    }

    #[test]
    fn missing_attribute_is_never_collapsible() {
        let mut doc = Document::new();
        let wrapper = doc.create_element(None, "js-collapsible");
        let all = bps(&[("s", true), ("m", true)]);
        assert!(!is_collapsible(&doc, wrapper, &all));

        doc.set_attribute(wrapper, attr::COLLAPSIBLE_BPS, "");
        assert!(!is_collapsible(&doc, wrapper, &all));

        doc.set_attribute(wrapper, attr::COLLAPSIBLE_BPS, "m");
        assert!(is_collapsible(&doc, wrapper, &all));
    }

    #[test]
    fn evaluation_is_repeatable() {
        let mut doc = Document::new();
        let wrapper = doc.create_element(None, "");
        doc.set_attribute(wrapper, attr::COLLAPSIBLE_BPS, "a, b");
        let activity = bps(&[("b", true)]);
        let first = is_collapsible(&doc, wrapper, &activity);
        for _ in 0..3 {
            assert_eq!(is_collapsible(&doc, wrapper, &activity), first);
        }
        assert_eq!(
            doc.attribute(wrapper, attr::COLLAPSIBLE_BPS).as_deref(),
            Some("a, b")
        );
    }
}
