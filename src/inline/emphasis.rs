//! Emphasis and strong emphasis resolution.
//!
//! A closer pairs with the nearest compatible opener of the same character
//! and link scope. Openers skipped over by a match are dropped, and the
//! "rule of three" keeps `*foo**bar*` from pairing the wrong runs.

use crate::limits;

use super::marks::Mark;

/// A matched opener/closer pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmphasisMatch {
    pub opener_start: u32,
    pub opener_end: u32,
    pub closer_start: u32,
    pub closer_end: u32,
    /// 1 for emphasis, 2 for strong.
    pub count: u32,
}

impl EmphasisMatch {
    #[inline]
    pub fn is_strong(&self) -> bool {
        self.count == 2
    }
}

/// Resolve emphasis marks, appending pairs to `matches`.
///
/// Marks are consumed from the inside out: the opener loses delimiters from
/// its right end and the closer from its left end.
pub fn resolve_emphasis(marks: &mut [Mark], matches: &mut Vec<EmphasisMatch>) {
    matches.clear();

    let max_scope = marks.iter().map(|m| m.scope).max().unwrap_or(0);
    let mut openers: Vec<usize> = Vec::new();
    for scope in 0..=max_scope {
        openers.clear();
        for idx in 0..marks.len() {
            let mark = &marks[idx];
            if mark.scope != scope || (mark.ch != b'*' && mark.ch != b'_') {
                continue;
            }
            if mark.can_close() {
                close(marks, idx, &mut openers, matches);
            }
            let mark = &marks[idx];
            if mark.can_open() && mark.len() > 0 {
                if openers.len() == limits::MAX_DELIMITER_STACK {
                    openers.remove(0);
                }
                openers.push(idx);
            }
        }
    }
}

/// Pair the closer at `closer_idx` with openers until it is used up or no
/// compatible opener remains.
fn close(marks: &mut [Mark], closer_idx: usize, openers: &mut Vec<usize>, matches: &mut Vec<EmphasisMatch>) {
    loop {
        let closer = marks[closer_idx];
        let Some(depth) = openers
            .iter()
            .rposition(|&o| compatible(&marks[o], &closer))
        else {
            return;
        };
        let opener_idx = openers[depth];
        let opener = marks[opener_idx];

        let count = if opener.len() >= 2 && closer.len() >= 2 { 2 } else { 1 };
        matches.push(EmphasisMatch {
            opener_start: opener.end - count,
            opener_end: opener.end,
            closer_start: closer.pos,
            closer_end: closer.pos + count,
            count,
        });

        // Openers between the pair can no longer match anything.
        openers.truncate(depth + 1);

        marks[opener_idx].end -= count;
        if marks[opener_idx].len() == 0 {
            marks[opener_idx].resolve();
            openers.pop();
        }
        marks[closer_idx].pos += count;
        if marks[closer_idx].len() == 0 {
            marks[closer_idx].resolve();
            return;
        }
    }
}

fn compatible(opener: &Mark, closer: &Mark) -> bool {
    if opener.ch != closer.ch {
        return false;
    }
    // Rule of three: a run that can both open and close only pairs when
    // the combined length is not a multiple of three, unless both are.
    let ambiguous = opener.can_close() || closer.can_open();
    !(ambiguous && (opener.run + closer.run) % 3 == 0 && (opener.run % 3 != 0 || closer.run % 3 != 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::code_span::resolve_code_spans;
    use crate::inline::marks::{collect_marks, MarkBuffer};

    fn matches(text: &[u8]) -> Vec<EmphasisMatch> {
        let mut buffer = MarkBuffer::new();
        collect_marks(text, &mut buffer);
        let mut spans = Vec::new();
        resolve_code_spans(text, buffer.marks_mut(), &mut spans);
        let mut matches = Vec::new();
        resolve_emphasis(buffer.marks_mut(), &mut matches);
        matches
    }

    #[test]
    fn test_simple_emphasis() {
        let m = matches(b"hello *world*");
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].count, 1);
        assert_eq!((m[0].opener_start, m[0].closer_end), (6, 13));
    }

    #[test]
    fn test_strong() {
        let m = matches(b"__strong__");
        assert_eq!(m.len(), 1);
        assert!(m[0].is_strong());
    }

    #[test]
    fn test_triple_splits_inside_out() {
        let m = matches(b"***both***");
        assert_eq!(m.len(), 2);
        assert!(m[0].is_strong());
        assert_eq!((m[0].opener_start, m[0].opener_end), (1, 3));
        assert_eq!((m[1].opener_start, m[1].opener_end), (0, 1));
    }

    #[test]
    fn test_rule_of_three() {
        let m = matches(b"*foo**bar*");
        assert_eq!(m.len(), 1);
        assert_eq!((m[0].opener_start, m[0].closer_start), (0, 9));
    }

    #[test]
    fn test_no_emphasis_in_code() {
        assert!(matches(b"`*not emphasis*`").is_empty());
    }

    #[test]
    fn test_mismatched_characters() {
        assert!(matches(b"*hello_").is_empty());
    }

    #[test]
    fn test_scopes_do_not_pair() {
        let mut buffer = MarkBuffer::new();
        collect_marks(b"*a *b", &mut buffer);
        buffer.marks_mut()[1].scope = 1;
        // The second mark is a closer only if right-flanking; force it.
        buffer.marks_mut()[1].flags |= crate::inline::marks::flags::POTENTIAL_CLOSER;
        let mut m = Vec::new();
        resolve_emphasis(buffer.marks_mut(), &mut m);
        assert!(m.is_empty());
    }
}
