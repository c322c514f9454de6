//! Inline-level event types.

use crate::Range;

/// Events emitted by the inline parser, in document order.
///
/// Ranges index into the text passed to [`InlineParser::parse`].
///
/// [`InlineParser::parse`]: super::InlineParser::parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineEvent {
    /// Plain text content.
    Text(Range),

    /// Code span content, with the single padding space already stripped.
    /// Line endings inside still need to render as spaces.
    Code(Range),

    /// Backslash escape: the escaped ASCII punctuation character.
    EscapedChar(u8),

    /// Decoded character reference (`&amp;`, `&#35;`, `&#x22;`).
    Entity(String),

    /// Start of emphasis (`*em*` or `_em_`).
    EmphasisStart,
    /// End of emphasis.
    EmphasisEnd,

    /// Start of strong emphasis (`**strong**` or `__strong__`).
    StrongStart,
    /// End of strong emphasis.
    StrongEnd,

    /// Start of an inline or reference link. URL and title are unescaped.
    LinkStart { url: String, title: Option<String> },
    /// End of a link.
    LinkEnd,

    /// Soft line break (newline in source).
    SoftBreak,

    /// Hard line break (two spaces or a backslash before the newline).
    HardBreak,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_size() {
        // LinkStart dominates: String + Option<String>.
        assert!(std::mem::size_of::<InlineEvent>() <= 56);
    }
}
