// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-instance configuration.

use alloc::string::String;
use core::fmt;
use core::time::Duration;

/// Default class marking a collapsed wrapper.
pub const DEFAULT_COLLAPSED_CLASS: &str = "o-collapsible-is-collapsed";
/// Default class marking an expanded wrapper.
pub const DEFAULT_EXPANDED_CLASS: &str = "o-collapsible-is-expanded";
/// Default class identifying collapsible wrappers.
pub const DEFAULT_INIT_CLASS: &str = "js-collapsible";
/// Default class identifying the toggle inside a wrapper.
pub const DEFAULT_TOGGLE_CLASS: &str = "js-collapsible__toggle";
/// Default class identifying the content region inside a wrapper.
pub const DEFAULT_CONTENT_CLASS: &str = "js-collapsible__content";
/// Default selector for the breakpoint-state source.
pub const DEFAULT_BPS_SELECTOR: &str = "body";
/// Default delay before focusing expanded content.
///
/// Long enough for common CSS transitions to finish so the content is
/// visible and focusable when focus arrives.
pub const DEFAULT_FOCUS_DELAY: Duration = Duration::from_millis(200);

/// Labels, class names, and selectors for a set of collapsibles.
///
/// Labels name the action the toggle performs next: while expanded the
/// toggle is labelled with [`label_collapse`](Self::label_collapse), while
/// collapsed with [`label_expand`](Self::label_expand).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Accessible name of the toggle while the region is collapsed.
    pub label_expand: String,
    /// Accessible name of the toggle while the region is expanded.
    pub label_collapse: String,
    /// Wrapper class while collapsed. Also removes modifier tokens it prefixes.
    pub collapsed_class: String,
    /// Wrapper class while expanded. Also removes modifier tokens it prefixes.
    pub expanded_class: String,
    /// Class identifying wrappers during discovery.
    pub init_class: String,
    /// Class identifying the toggle inside a wrapper.
    pub toggle_class: String,
    /// Class identifying the content region inside a wrapper.
    pub content_class: String,
    /// Selector passed to the breakpoint-state source.
    pub bps_selector: String,
    /// Delay between expanding and focusing the content region.
    pub focus_delay: Duration,
}

impl Config {
    /// Creates a configuration with the given labels and default classes.
    pub fn new(label_expand: impl Into<String>, label_collapse: impl Into<String>) -> Self {
        Self {
            label_expand: label_expand.into(),
            label_collapse: label_collapse.into(),
            collapsed_class: DEFAULT_COLLAPSED_CLASS.into(),
            expanded_class: DEFAULT_EXPANDED_CLASS.into(),
            init_class: DEFAULT_INIT_CLASS.into(),
            toggle_class: DEFAULT_TOGGLE_CLASS.into(),
            content_class: DEFAULT_CONTENT_CLASS.into(),
            bps_selector: DEFAULT_BPS_SELECTOR.into(),
            focus_delay: DEFAULT_FOCUS_DELAY,
        }
    }

    /// Sets the collapsed and expanded state classes.
    #[must_use]
    pub fn with_state_classes(
        mut self,
        collapsed: impl Into<String>,
        expanded: impl Into<String>,
    ) -> Self {
        self.collapsed_class = collapsed.into();
        self.expanded_class = expanded.into();
        self
    }

    /// Sets the discovery classes for wrapper, toggle, and content.
    #[must_use]
    pub fn with_discovery_classes(
        mut self,
        init: impl Into<String>,
        toggle: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.init_class = init.into();
        self.toggle_class = toggle.into();
        self.content_class = content.into();
        self
    }

    /// Sets the breakpoint-state source selector.
    #[must_use]
    pub fn with_bps_selector(mut self, selector: impl Into<String>) -> Self {
        self.bps_selector = selector.into();
        self
    }

    /// Sets the delay before expanded content receives focus.
    #[must_use]
    pub fn with_focus_delay(mut self, delay: Duration) -> Self {
        self.focus_delay = delay;
        self
    }

    /// Checks that the configuration can uphold the class invariants.
    ///
    /// Fails on empty labels, empty or whitespace-containing class names, and
    /// state classes where one prefixes the other. In that last case
    /// prefix-token removal would strip the class that was just added.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, label) in [
            ("label_expand", &self.label_expand),
            ("label_collapse", &self.label_collapse),
        ] {
            if label.trim().is_empty() {
                return Err(ConfigError::EmptyLabel { field });
            }
        }
        for (field, class) in [
            ("collapsed_class", &self.collapsed_class),
            ("expanded_class", &self.expanded_class),
            ("init_class", &self.init_class),
            ("toggle_class", &self.toggle_class),
            ("content_class", &self.content_class),
        ] {
            if class.is_empty() || class.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidClass {
                    field,
                    value: class.clone(),
                });
            }
        }
        if self.collapsed_class.starts_with(&self.expanded_class)
            || self.expanded_class.starts_with(&self.collapsed_class)
        {
            return Err(ConfigError::OverlappingStateClasses {
                collapsed: self.collapsed_class.clone(),
                expanded: self.expanded_class.clone(),
            });
        }
        Ok(())
    }
}

/// Error returned by [`Config::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A label is empty or only whitespace.
    EmptyLabel {
        /// Name of the offending field.
        field: &'static str,
    },
    /// A class name is empty or contains whitespace.
    InvalidClass {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
    /// One state class is a prefix of the other.
    OverlappingStateClasses {
        /// Configured collapsed class.
        collapsed: String,
        /// Configured expanded class.
        expanded: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLabel { field } => write!(f, "`{field}` must not be empty"),
            Self::InvalidClass { field, value } => {
                write!(f, "`{field}` is not a single class token: {value:?}")
            }
            Self::OverlappingStateClasses {
                collapsed,
                expanded,
            } => write!(
                f,
                "state classes {collapsed:?} and {expanded:?} overlap; neither may prefix the other"
            ),
        }
    }
}

impl core::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = Config::new("Show more", "Show less");
        assert_eq!(config.collapsed_class, DEFAULT_COLLAPSED_CLASS);
        assert_eq!(config.expanded_class, DEFAULT_EXPANDED_CLASS);
        assert_eq!(config.bps_selector, "body");
        assert_eq!(config.focus_delay, Duration::from_millis(200));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_blank_labels() {
        let config = Config::new(" ", "Hide");
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyLabel {
                field: "label_expand"
            })
        );
    }

    #[test]
    fn rejects_multi_token_classes() {
        let config = Config::new("Show", "Hide").with_state_classes("a b", "c");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidClass {
                field: "collapsed_class",
                ..
            })
        ));
    }

    #[test]
    fn rejects_prefix_overlap() {
        let config = Config::new("Show", "Hide").with_state_classes("is-open", "is-open-wide");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OverlappingStateClasses { .. })
        ));
        let config = Config::new("Show", "Hide").with_state_classes("is-shut", "is-open");
        assert_eq!(config.validate(), Ok(()));
    }
}
