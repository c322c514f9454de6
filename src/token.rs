//! Block-level token stream.
//!
//! Block rules push tokens into the stream owned by [`BlockState`]; the
//! renderer reads them once, in order. Tokens are never mutated after they
//! are pushed.
//!
//! [`BlockState`]: crate::block::BlockState

use crate::alert::AlertType;

/// Half-open range of source lines `[start, end)` a token was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of lines covered.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A block token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Start of a paragraph. Hidden paragraphs (tight lists) render no tags.
    ParagraphOpen { hidden: bool },
    /// End of a paragraph.
    ParagraphClose { hidden: bool },

    /// Start of an ATX heading.
    HeadingOpen { level: u8 },
    /// End of an ATX heading.
    HeadingClose { level: u8 },

    /// Inline content awaiting inline parsing at render time.
    Inline { content: String, map: LineRange },

    /// Fenced code block.
    Fence {
        info: String,
        content: String,
        map: LineRange,
    },
    /// Indented code block.
    CodeBlock { content: String, map: LineRange },

    BlockquoteOpen,
    BlockquoteClose,

    BulletListOpen,
    BulletListClose,
    /// Start of an ordered list with its first number.
    OrderedListOpen { start: u32 },
    OrderedListClose,
    ListItemOpen,
    ListItemClose,

    /// Thematic break (`---`).
    ThematicBreak,

    /// Start of an alert block (`:::info`, `:::spoiler Title`, ...).
    AlertOpen {
        /// Validated alert type.
        alert_type: AlertType,
        /// Raw, unescaped title text. `None` when absent.
        title: Option<String>,
        /// Lines from the opening marker up to the closing boundary.
        map: LineRange,
    },
    /// End of an alert block. The owning type is recovered from the
    /// matching [`Token::AlertOpen`].
    AlertClose,
}

impl Token {
    /// Token-kind name, as used for renderer dispatch and debugging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ParagraphOpen { .. } => "paragraph_open",
            Self::ParagraphClose { .. } => "paragraph_close",
            Self::HeadingOpen { .. } => "heading_open",
            Self::HeadingClose { .. } => "heading_close",
            Self::Inline { .. } => "inline",
            Self::Fence { .. } => "fence",
            Self::CodeBlock { .. } => "code_block",
            Self::BlockquoteOpen => "blockquote_open",
            Self::BlockquoteClose => "blockquote_close",
            Self::BulletListOpen => "bullet_list_open",
            Self::BulletListClose => "bullet_list_close",
            Self::OrderedListOpen { .. } => "ordered_list_open",
            Self::OrderedListClose => "ordered_list_close",
            Self::ListItemOpen => "list_item_open",
            Self::ListItemClose => "list_item_close",
            Self::ThematicBreak => "hr",
            Self::AlertOpen { .. } => "alert_open",
            Self::AlertClose => "alert_close",
        }
    }

    /// Nesting delta: `1` opens a container, `-1` closes one, `0` is a leaf.
    pub fn nesting(&self) -> i8 {
        match self {
            Self::ParagraphOpen { .. }
            | Self::HeadingOpen { .. }
            | Self::BlockquoteOpen
            | Self::BulletListOpen
            | Self::OrderedListOpen { .. }
            | Self::ListItemOpen
            | Self::AlertOpen { .. } => 1,
            Self::ParagraphClose { .. }
            | Self::HeadingClose { .. }
            | Self::BlockquoteClose
            | Self::BulletListClose
            | Self::OrderedListClose
            | Self::ListItemClose
            | Self::AlertClose => -1,
            Self::Inline { .. }
            | Self::Fence { .. }
            | Self::CodeBlock { .. }
            | Self::ThematicBreak => 0,
        }
    }

    /// The alert type, if this is an alert opener.
    #[inline]
    pub fn alert_type(&self) -> Option<AlertType> {
        match self {
            Self::AlertOpen { alert_type, .. } => Some(*alert_type),
            _ => None,
        }
    }

    /// The raw alert title, if this is an alert opener carrying one.
    #[inline]
    pub fn alert_title(&self) -> Option<&str> {
        match self {
            Self::AlertOpen { title, .. } => title.as_deref(),
            _ => None,
        }
    }

    /// Source line range, for tokens that record one.
    pub fn map(&self) -> Option<LineRange> {
        match self {
            Self::Inline { map, .. }
            | Self::Fence { map, .. }
            | Self::CodeBlock { map, .. }
            | Self::AlertOpen { map, .. } => Some(*map),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_accessors() {
        let open = Token::AlertOpen {
            alert_type: AlertType::Spoiler,
            title: Some("Plot twist".to_string()),
            map: LineRange::new(0, 3),
        };
        assert_eq!(open.name(), "alert_open");
        assert_eq!(open.nesting(), 1);
        assert_eq!(open.alert_type(), Some(AlertType::Spoiler));
        assert_eq!(open.alert_title(), Some("Plot twist"));
        assert_eq!(open.map(), Some(LineRange::new(0, 3)));

        assert_eq!(Token::AlertClose.name(), "alert_close");
        assert_eq!(Token::AlertClose.nesting(), -1);
        assert_eq!(Token::AlertClose.alert_type(), None);
    }

    #[test]
    fn test_line_range_len() {
        assert_eq!(LineRange::new(2, 5).len(), 3);
        assert!(LineRange::new(4, 4).is_empty());
    }
}
