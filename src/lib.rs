//! alertmark: Markdown to HTML with fenced alert blocks.
//!
//! ```text
//! :::warning
//! This is *important*.
//! :::
//! ```
//!
//! Alert blocks open with `:::` and one of `success`, `info`, `warning`,
//! `danger` or `spoiler`, and contain ordinary block Markdown. They render
//! as `<div role="alert">`, or as `<details>` for spoilers.
//!
//! # Design
//! - Line-oriented block pass with an ordered, extensible rule list
//! - Flat token stream; inline content is parsed at render time
//! - No regex: byte-level scanning
//! - Bounded nesting and delimiter stacks keep hostile input linear

pub mod alert;
pub mod block;
pub mod escape;
pub mod inline;
pub mod limits;
pub mod link_ref;
pub mod pipeline;
pub mod range;
pub mod render;
pub mod token;

pub use link_ref::{LinkRefDef, LinkRefStore};
pub use pipeline::{Document, Pipeline};
pub use range::Range;
pub use render::HtmlWriter;
pub use token::{LineRange, Token};

/// Parsing options.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Register the `:::type` alert rule.
    pub alerts: bool,
    /// Parse the interior of an alert that has no closing `:::` line.
    /// When off, such an alert renders empty.
    pub alerts_parse_unterminated: bool,
    /// Maximum block nesting depth.
    pub max_nesting: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            alerts: true,
            alerts_parse_unterminated: true,
            max_nesting: limits::MAX_BLOCK_NESTING,
        }
    }
}

/// Convert Markdown to HTML.
///
/// # Example
/// ```
/// let html = alertmark::to_html(":::spoiler Ending\nThey win.\n:::");
/// assert_eq!(
///     html,
///     "<details class=\"alert alert-spoiler\">\n<summary>Ending</summary>\n<p>They win.</p>\n</details>\n"
/// );
/// ```
pub fn to_html(input: &str) -> String {
    to_html_with_options(input, &Options::default())
}

/// Convert Markdown to HTML with options.
pub fn to_html_with_options(input: &str, options: &Options) -> String {
    Pipeline::new(*options).to_html(input)
}
