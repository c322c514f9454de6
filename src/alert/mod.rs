//! Fenced alert blocks.
//!
//! ```text
//! :::warning Be careful
//! This is *important*.
//! :::
//! ```
//!
//! An opening line is `:::` followed by one of the five [`AlertType`]s
//! (case-insensitive) and an optional title. The block ends at a line
//! holding only `:::`, or implicitly when the enclosing container ends or
//! a line is outdented below the current block indent. The interior is
//! ordinary block Markdown.
//!
//! Spoilers render as `<details>` with a `<summary>` label; every other
//! type renders as a `<div role="alert">`.

mod matcher;
mod render;

pub use matcher::try_match_alert_block;
pub use render::{render_close, render_open, AlertStack};

use crate::block::{Ruler, RulerError};

/// Name the alert rule is registered under.
pub const RULE_NAME: &str = "alert";

/// Block constructs an alert opener may interrupt.
pub const INTERRUPTS: [&str; 4] = ["paragraph", "reference", "blockquote", "list"];

/// The closed set of alert kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertType {
    Success,
    Info,
    Warning,
    Danger,
    /// Collapsible disclosure, rendered with `<details>`.
    Spoiler,
}

impl AlertType {
    /// Every alert type, in declaration order.
    pub const ALL: [AlertType; 5] = [
        Self::Success,
        Self::Info,
        Self::Warning,
        Self::Danger,
        Self::Spoiler,
    ];

    /// Parse a type name, ignoring ASCII case.
    ///
    /// # Example
    /// ```
    /// use alertmark::alert::AlertType;
    ///
    /// assert_eq!(AlertType::parse("WARNING"), Some(AlertType::Warning));
    /// assert_eq!(AlertType::parse("note"), None);
    /// ```
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str().eq_ignore_ascii_case(name))
    }

    /// Lowercase name, as used in CSS classes.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Spoiler => "spoiler",
        }
    }

    #[inline]
    pub const fn is_spoiler(self) -> bool {
        matches!(self, Self::Spoiler)
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Register the alert rule ahead of fenced code blocks.
pub fn register(ruler: &mut Ruler) -> Result<(), RulerError> {
    ruler.insert_before("fence", RULE_NAME, try_match_alert_block, &INTERRUPTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_types() {
        for ty in AlertType::ALL {
            assert_eq!(AlertType::parse(ty.as_str()), Some(ty));
        }
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(AlertType::parse("Info"), Some(AlertType::Info));
        assert_eq!(AlertType::parse("sPoIlEr"), Some(AlertType::Spoiler));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(AlertType::parse(""), None);
        assert_eq!(AlertType::parse("note"), None);
        assert_eq!(AlertType::parse("info!"), None);
        assert_eq!(AlertType::parse("infos"), None);
    }

    #[test]
    fn test_only_spoiler_is_spoiler() {
        let spoilers: Vec<_> = AlertType::ALL.into_iter().filter(|t| t.is_spoiler()).collect();
        assert_eq!(spoilers, vec![AlertType::Spoiler]);
    }

    #[test]
    fn test_register_places_rule_before_fence() {
        let mut ruler = Ruler::with_defaults();
        register(&mut ruler).unwrap();
        let names: Vec<_> = ruler.names().collect();
        let alert = names.iter().position(|n| *n == RULE_NAME).unwrap();
        let fence = names.iter().position(|n| *n == "fence").unwrap();
        assert_eq!(alert + 1, fence);
        for chain in INTERRUPTS {
            assert!(ruler.chain_names(chain).any(|n| n == RULE_NAME), "{chain}");
        }
    }
}
