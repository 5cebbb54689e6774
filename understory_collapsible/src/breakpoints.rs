// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Breakpoint activity: which named breakpoints are active right now.
//!
//! A [`BreakpointActivity`] is a snapshot produced by the breakpoint-state
//! source (see [`Host::breakpoints`](crate::host::Host::breakpoints)). It is
//! fetched fresh for each evaluation since a viewport change can flip any
//! entry between two calls.
//!
//! ## CSS payload
//!
//! With the `css_state` feature, the snapshot can be decoded from the JSON
//! object a stylesheet publishes through a `content` property, for example:
//!
//! ```css
//! body::after { content: '{"s": true, "m": false, "l": false}'; display: none; }
//! ```
//!
//! ```rust
//! # #[cfg(feature = "css_state")]
//! # fn example() {
//! use understory_collapsible::BreakpointActivity;
//!
//! // Computed `content` values come back quoted and escaped.
//! let bps = BreakpointActivity::from_css_content(r#""{\"s\": true, \"m\": false}""#).unwrap();
//! assert!(bps.is_active("s"));
//! assert!(!bps.is_active("m"));
//! assert!(!bps.is_active("xl"));
//! # }
//! ```

use alloc::string::String;
use core::fmt;

use hashbrown::HashMap;

/// Snapshot mapping breakpoint names to whether they are active.
///
/// Names missing from the snapshot are inactive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BreakpointActivity {
    states: HashMap<String, bool>,
}

impl BreakpointActivity {
    /// Creates an empty snapshot (every breakpoint inactive).
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `name` is listed and active.
    pub fn is_active(&self, name: &str) -> bool {
        self.states.get(name).copied().unwrap_or(false)
    }

    /// Records the state of a breakpoint, replacing any previous entry.
    pub fn set(&mut self, name: impl Into<String>, active: bool) {
        self.states.insert(name.into(), active);
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, active: bool) -> Self {
        self.set(name, active);
        self
    }

    /// Number of listed breakpoints, active or not.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if no breakpoint is listed.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Iterates over the names of active breakpoints in unspecified order.
    pub fn active(&self) -> impl Iterator<Item = &str> + '_ {
        self.states
            .iter()
            .filter(|(_, active)| **active)
            .map(|(name, _)| name.as_str())
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for BreakpointActivity {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self {
            states: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Error returned when a CSS breakpoint payload cannot be decoded.
#[derive(Clone, PartialEq, Eq)]
pub struct BreakpointStateError {
    message: String,
}

impl BreakpointStateError {
    /// Human-readable description of the decoding failure.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for BreakpointStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BreakpointStateError {{ message: {:?} }}", self.message)
    }
}

impl fmt::Display for BreakpointStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid breakpoint state payload: {}", self.message)
    }
}

impl core::error::Error for BreakpointStateError {}

#[cfg(feature = "css_state")]
impl BreakpointActivity {
    /// Decodes the computed value of a CSS `content` property.
    ///
    /// Accepts the raw JSON object, or the object wrapped in one layer of
    /// single or double quotes with backslash-escaped inner quotes, which is
    /// how engines serialize string values of `content`. Every value must be
    /// a boolean.
    pub fn from_css_content(content: &str) -> Result<Self, BreakpointStateError> {
        let trimmed = content.trim();
        let unquoted = strip_quotes(trimmed);
        let json: String = if unquoted.len() != trimmed.len() {
            unescape(unquoted)
        } else {
            String::from(unquoted)
        };

        let states: alloc::collections::BTreeMap<String, bool> = serde_json::from_str(&json)
            .map_err(|err| BreakpointStateError {
                message: alloc::format!("{err}"),
            })?;
        Ok(states.into_iter().collect())
    }
}

#[cfg(feature = "css_state")]
fn strip_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

#[cfg(feature = "css_state")]
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_are_inactive() {
        let bps = BreakpointActivity::new().with("wide", true);
        assert!(bps.is_active("wide"));
        assert!(!bps.is_active("narrow"));
        assert!(!bps.is_active(""));
    }

    #[test]
    fn set_replaces_previous_state() {
        let mut bps = BreakpointActivity::from_iter([("a", true)]);
        bps.set("a", false);
        assert!(!bps.is_active("a"));
        assert_eq!(bps.len(), 1);
        assert_eq!(bps.active().count(), 0);
    }

    #[cfg(feature = "css_state")]
    #[test]
    fn decodes_plain_and_quoted_payloads() {
        let plain = BreakpointActivity::from_css_content(r#"{"s":true,"m":false}"#).unwrap();
        let double = BreakpointActivity::from_css_content(r#""{\"s\":true,\"m\":false}""#).unwrap();
        let single = BreakpointActivity::from_css_content(r#"'{"s":true,"m":false}'"#).unwrap();
        assert_eq!(plain, double);
        assert_eq!(plain, single);
        assert!(plain.is_active("s"));
        assert!(!plain.is_active("m"));
    }

    #[cfg(feature = "css_state")]
    #[test]
    fn rejects_non_boolean_values() {
        let err = BreakpointActivity::from_css_content(r#"{"s":"yes"}"#).unwrap_err();
        assert!(!err.message().is_empty());
        assert!(BreakpointActivity::from_css_content("none").is_err());
    }
}
