// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Class-token list with prefix removal.
//!
//! State classes are swapped on the parsed token list, never by rewriting the
//! raw attribute string. Removal is by token prefix so modifier tokens that
//! extend a state class (`o-collapsible-is-collapsed--fast`) are cleared with
//! it, while unrelated tokens that merely contain the class name somewhere
//! else are left alone.
//!
//! ```rust
//! use understory_collapsible::ClassList;
//!
//! let mut classes = ClassList::parse("card is-collapsed is-collapsed--fast x-is-collapsed");
//! classes.add("is-expanded");
//! classes.remove_prefixed("is-collapsed");
//! assert_eq!(classes.to_string(), "card x-is-collapsed is-expanded");
//! ```

use alloc::string::{String, ToString};
use core::fmt;

use smallvec::SmallVec;

use crate::host::Host;

/// Ordered, de-duplicated set of class tokens.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: SmallVec<[String; 4]>,
}

impl ClassList {
    /// Splits a class attribute on ASCII whitespace, dropping duplicates.
    pub fn parse(class_name: &str) -> Self {
        let mut list = Self::default();
        for token in class_name.split_ascii_whitespace() {
            list.add(token);
        }
        list
    }

    /// Reads the class list of `node`.
    pub fn read<H: Host + ?Sized>(host: &H, node: H::Node) -> Self {
        Self::parse(&host.class_name(node))
    }

    /// Writes the list back to `node` if it differs from the current attribute.
    pub fn write<H: Host + ?Sized>(&self, host: &mut H, node: H::Node) {
        let serialized = self.to_string();
        if host.class_name(node) != serialized {
            host.set_class_name(node, &serialized);
        }
    }

    /// Returns `true` if the exact token is present.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Returns `true` if any token starts with `prefix`.
    pub fn contains_prefixed(&self, prefix: &str) -> bool {
        self.tokens.iter().any(|t| t.starts_with(prefix))
    }

    /// Appends `token` unless already present. Returns `true` if added.
    pub fn add(&mut self, token: &str) -> bool {
        if token.is_empty() || self.contains(token) {
            return false;
        }
        self.tokens.push(String::from(token));
        true
    }

    /// Removes every token starting with `prefix`. Returns the number removed.
    ///
    /// An empty prefix removes nothing.
    pub fn remove_prefixed(&mut self, prefix: &str) -> usize {
        if prefix.is_empty() {
            return 0;
        }
        let before = self.tokens.len();
        self.tokens.retain(|t| !t.starts_with(prefix));
        before - self.tokens.len()
    }

    /// Adds `add` and removes tokens prefixed by `remove`, in that order.
    pub fn swap(&mut self, add: &str, remove: &str) {
        self.add(add);
        self.remove_prefixed(remove);
    }

    /// Iterates over the tokens in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.tokens.iter().map(String::as_str)
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if there are no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for token in &self.tokens {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(token)?;
            first = false;
        }
        Ok(())
    }
}
