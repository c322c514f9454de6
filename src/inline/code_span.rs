//! Code span resolution.
//!
//! Code spans bind tighter than everything else: an opening backtick run
//! pairs with the next run of exactly the same length, and every mark in
//! between becomes literal.

use crate::Range;

use super::marks::{flags, Mark};

/// A resolved code span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeSpan {
    /// Start of the opening backticks.
    pub start: u32,
    /// End of the closing backticks.
    pub end: u32,
    /// Content between the backticks, padding stripped.
    pub content: Range,
}

/// Pair backtick marks and flag everything they enclose.
pub fn resolve_code_spans(text: &[u8], marks: &mut [Mark], spans: &mut Vec<CodeSpan>) {
    spans.clear();
    let len = marks.len();

    let mut i = 0;
    while i < len {
        if marks[i].ch != b'`' || !marks[i].is_live() {
            i += 1;
            continue;
        }

        let run = marks[i].len();
        let closer = (i + 1..len).find(|&j| marks[j].ch == b'`' && marks[j].len() == run);
        let Some(j) = closer else {
            i += 1;
            continue;
        };

        marks[i].resolve();
        marks[j].resolve();
        for mark in &mut marks[i + 1..j] {
            mark.flags |= flags::IN_CODE;
        }
        spans.push(CodeSpan {
            start: marks[i].pos,
            end: marks[j].end,
            content: strip_padding(text, marks[i].end, marks[j].pos),
        });
        i = j + 1;
    }
}

/// Strip one space (or line ending) from each side when both sides have
/// one and the content is not all spaces.
fn strip_padding(text: &[u8], start: u32, end: u32) -> Range {
    let content = &text[start as usize..end as usize];
    let is_pad = |b: u8| b == b' ' || b == b'\n';
    let padded = content.len() >= 2
        && is_pad(content[0])
        && is_pad(content[content.len() - 1])
        && !content.iter().all(|&b| is_pad(b));
    if padded {
        Range::new(start + 1, end - 1)
    } else {
        Range::new(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::marks::{collect_marks, MarkBuffer};

    fn spans(text: &[u8]) -> (Vec<CodeSpan>, MarkBuffer) {
        let mut buffer = MarkBuffer::new();
        collect_marks(text, &mut buffer);
        let mut spans = Vec::new();
        resolve_code_spans(text, buffer.marks_mut(), &mut spans);
        (spans, buffer)
    }

    #[test]
    fn test_simple_code_span() {
        let (spans, _) = spans(b"hello `code` world");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].content, Range::new(7, 11));
        assert_eq!((spans[0].start, spans[0].end), (6, 12));
    }

    #[test]
    fn test_padding_stripped_once() {
        let text = b"``  `a`  ``";
        let (spans, _) = spans(text);
        assert_eq!(spans[0].content.slice(text), b" `a` ");
    }

    #[test]
    fn test_all_space_content_kept() {
        let text = b"`  `";
        let (spans, _) = spans(text);
        assert_eq!(spans[0].content.slice(text), b"  ");
    }

    #[test]
    fn test_run_lengths_must_match() {
        let (spans, _) = spans(b"hello `code`` world");
        assert!(spans.is_empty());
    }

    #[test]
    fn test_marks_inside_are_literal() {
        let (_, buffer) = spans(b"`*not emphasis*`");
        for mark in buffer.marks().iter().filter(|m| m.ch == b'*') {
            assert!(mark.flags & flags::IN_CODE != 0);
            assert!(!mark.can_open());
        }
    }
}
