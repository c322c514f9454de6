//! Mark collection for inline parsing.
//!
//! Marks are candidate delimiter positions (backticks, emphasis runs,
//! brackets, escapes, line ends, entities) gathered in one pass before any
//! of them is resolved.

use crate::limits;

/// Mark state flags.
pub mod flags {
    pub const POTENTIAL_OPENER: u8 = 0b0000_0001;
    pub const POTENTIAL_CLOSER: u8 = 0b0000_0010;
    /// Fully consumed by a resolved construct.
    pub const RESOLVED: u8 = 0b0000_0100;
    /// Inside a code span; treat as literal text.
    pub const IN_CODE: u8 = 0b0000_1000;
    /// Inside a link destination, title or reference label; emit nothing.
    pub const IN_LINK_TAIL: u8 = 0b0001_0000;
}

/// A candidate delimiter.
#[derive(Debug, Clone, Copy)]
pub struct Mark {
    /// Start position in text. Emphasis matching moves it right.
    pub pos: u32,
    /// End position. Emphasis matching moves it left.
    pub end: u32,
    /// Length of the run as scanned, for the rule of three.
    pub run: u32,
    /// The delimiter character.
    pub ch: u8,
    pub flags: u8,
    /// Link nesting scope: emphasis only pairs marks of one scope.
    pub scope: u16,
}

impl Mark {
    #[inline]
    pub fn new(pos: usize, end: usize, ch: u8, flags: u8) -> Self {
        Self {
            pos: pos as u32,
            end: end as u32,
            run: (end - pos) as u32,
            ch,
            flags,
            scope: 0,
        }
    }

    /// Remaining length of the run.
    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.pos
    }

    #[inline]
    pub fn can_open(&self) -> bool {
        self.flags & flags::POTENTIAL_OPENER != 0 && self.is_live()
    }

    #[inline]
    pub fn can_close(&self) -> bool {
        self.flags & flags::POTENTIAL_CLOSER != 0 && self.is_live()
    }

    /// Not resolved and not swallowed by a code span or link tail.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.flags & (flags::RESOLVED | flags::IN_CODE | flags::IN_LINK_TAIL) == 0
    }

    #[inline]
    pub fn resolve(&mut self) {
        self.flags |= flags::RESOLVED;
    }
}

/// Reusable buffer of marks.
#[derive(Debug, Default)]
pub struct MarkBuffer {
    marks: Vec<Mark>,
}

impl MarkBuffer {
    pub fn new() -> Self {
        Self {
            marks: Vec::with_capacity(64),
        }
    }

    /// Add a mark unless the per-run limit is reached.
    #[inline]
    pub fn push(&mut self, mark: Mark) {
        if self.marks.len() < limits::MAX_INLINE_MARKS {
            self.marks.push(mark);
        }
    }

    #[inline]
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    #[inline]
    pub fn marks_mut(&mut self) -> &mut [Mark] {
        &mut self.marks
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

/// Bytes that may start a mark.
static SPECIAL_CHARS: [bool; 256] = {
    let mut table = [false; 256];
    table[b'`' as usize] = true;
    table[b'*' as usize] = true;
    table[b'_' as usize] = true;
    table[b'\\' as usize] = true;
    table[b'\n' as usize] = true;
    table[b'[' as usize] = true;
    table[b']' as usize] = true;
    table[b'&' as usize] = true;
    table
};

/// Scan `text` and collect marks into `buffer`.
pub fn collect_marks(text: &[u8], buffer: &mut MarkBuffer) {
    buffer.marks.clear();

    let len = text.len();
    let mut pos = 0;
    while pos < len {
        let b = text[pos];
        if !SPECIAL_CHARS[b as usize] {
            pos += 1;
            continue;
        }

        match b {
            b'`' => {
                let start = pos;
                pos = skip_run(text, pos, b'`');
                if pos - start <= limits::MAX_CODE_SPAN_BACKTICKS {
                    buffer.push(Mark::new(
                        start,
                        pos,
                        b'`',
                        flags::POTENTIAL_OPENER | flags::POTENTIAL_CLOSER,
                    ));
                }
            }

            b'*' | b'_' => {
                let start = pos;
                pos = skip_run(text, pos, b);
                let before = if start > 0 { text[start - 1] } else { b' ' };
                let after = if pos < len { text[pos] } else { b' ' };
                let flags = emphasis_flags(b, before, after);
                if flags != 0 {
                    buffer.push(Mark::new(start, pos, b, flags));
                }
            }

            b'\\' => {
                if pos + 1 < len && (text[pos + 1].is_ascii_punctuation() || text[pos + 1] == b'\n') {
                    let end = if text[pos + 1] == b'\n' {
                        skip_leading_spaces(text, pos + 2)
                    } else {
                        pos + 2
                    };
                    buffer.push(Mark::new(pos, end, b'\\', 0));
                    pos = end;
                } else {
                    pos += 1;
                }
            }

            b'\n' => {
                // Trailing spaces belong to the break: two or more make it hard.
                let mut start = pos;
                while start > 0 && text[start - 1] == b' ' {
                    start -= 1;
                }
                let end = skip_leading_spaces(text, pos + 1);
                buffer.push(Mark::new(start, end, b'\n', 0));
                pos = end;
            }

            b'[' => {
                buffer.push(Mark::new(pos, pos + 1, b'[', flags::POTENTIAL_OPENER));
                pos += 1;
            }

            b']' => {
                buffer.push(Mark::new(pos, pos + 1, b']', flags::POTENTIAL_CLOSER));
                pos += 1;
            }

            b'&' => {
                if let Some(end) = entity_end(text, pos) {
                    buffer.push(Mark::new(pos, end, b'&', 0));
                    pos = end;
                } else {
                    pos += 1;
                }
            }

            _ => pos += 1,
        }
    }
}

/// End of a syntactically valid `&name;`, `&#123;` or `&#x1F;` at `pos`.
fn entity_end(text: &[u8], pos: usize) -> Option<usize> {
    let limit = (pos + limits::MAX_ENTITY_LEN).min(text.len());
    let semi = memchr::memchr(b';', &text[pos..limit])? + pos;
    let body = &text[pos + 1..semi];
    let valid = match body {
        [b'#', b'x' | b'X', hex @ ..] => (1..=6).contains(&hex.len()) && hex.iter().all(u8::is_ascii_hexdigit),
        [b'#', dec @ ..] => (1..=7).contains(&dec.len()) && dec.iter().all(u8::is_ascii_digit),
        [first, rest @ ..] => first.is_ascii_alphabetic() && rest.iter().all(u8::is_ascii_alphanumeric),
        [] => false,
    };
    valid.then_some(semi + 1)
}

/// Opener/closer flags from the CommonMark flanking rules.
fn emphasis_flags(ch: u8, before: u8, after: u8) -> u8 {
    let before_space = is_whitespace(before);
    let after_space = is_whitespace(after);
    let before_punct = before.is_ascii_punctuation();
    let after_punct = after.is_ascii_punctuation();

    let left_flanking = !after_space && (!after_punct || before_space || before_punct);
    let right_flanking = !before_space && (!before_punct || after_space || after_punct);

    let (opens, closes) = if ch == b'*' {
        (left_flanking, right_flanking)
    } else {
        // Intraword `_` neither opens nor closes.
        (
            left_flanking && (!right_flanking || before_punct),
            right_flanking && (!left_flanking || after_punct),
        )
    };

    let mut flags = 0;
    if opens {
        flags |= flags::POTENTIAL_OPENER;
    }
    if closes {
        flags |= flags::POTENTIAL_CLOSER;
    }
    flags
}

#[inline]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

#[inline]
fn skip_run(text: &[u8], mut pos: usize, ch: u8) -> usize {
    while pos < text.len() && text[pos] == ch {
        pos += 1;
    }
    pos
}

#[inline]
fn skip_leading_spaces(text: &[u8], mut pos: usize) -> usize {
    while pos < text.len() && text[pos] == b' ' {
        pos += 1;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &[u8]) -> MarkBuffer {
        let mut buffer = MarkBuffer::new();
        collect_marks(text, &mut buffer);
        buffer
    }

    #[test]
    fn test_mark_size() {
        assert!(std::mem::size_of::<Mark>() <= 16);
    }

    #[test]
    fn test_collect_backticks() {
        let buffer = collect(b"hello `code` world");
        assert_eq!(buffer.len(), 2);
        assert!(buffer.marks().iter().all(|m| m.ch == b'`' && m.len() == 1));
    }

    #[test]
    fn test_collect_emphasis() {
        let buffer = collect(b"hello *world*");
        assert_eq!(buffer.len(), 2);
        assert!(buffer.marks()[0].can_open());
        assert!(buffer.marks()[1].can_close());
    }

    #[test]
    fn test_intraword_underscore_inert() {
        let buffer = collect(b"snake_case_name");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_escape_consumes_next_char() {
        let buffer = collect(b"a \\* b");
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.marks()[0].ch, b'\\');
        assert_eq!(buffer.marks()[0].len(), 2);
    }

    #[test]
    fn test_line_break_covers_spaces() {
        let buffer = collect(b"a  \n  b");
        let mark = buffer.marks()[0];
        assert_eq!((mark.ch, mark.pos, mark.end), (b'\n', 1, 6));
    }

    #[test]
    fn test_entity_marks() {
        assert_eq!(collect(b"&amp; &#35; &#x22;").len(), 3);
        assert!(collect(b"& &; &#; &#xZZ; &1a;").is_empty());
    }
}
