//! Line-indexed view of the source shared by all block rules.

use memchr::memchr;

use crate::link_ref::LinkRefStore;
use crate::token::Token;

/// Kind of container the current rule runs inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParentType {
    #[default]
    Root,
    Blockquote,
    List,
    Paragraph,
    Reference,
    Alert,
}

/// Restores the line ceiling and parent saved by [`BlockState::with_ceiling`]
/// when dropped.
struct CeilingGuard<'s, 'a> {
    state: &'s mut BlockState<'a>,
    line_max: usize,
    parent: ParentType,
}

impl<'a> std::ops::Deref for CeilingGuard<'_, 'a> {
    type Target = BlockState<'a>;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl std::ops::DerefMut for CeilingGuard<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}

impl Drop for CeilingGuard<'_, '_> {
    fn drop(&mut self) {
        self.state.line_max = self.line_max;
        self.state.parent = self.parent;
    }
}

/// Block parser state.
///
/// Per-line tables are indexed by line number. One extra sentinel entry past
/// the last line keeps `line + 1` lookups in bounds.
pub struct BlockState<'a> {
    /// Normalized source text.
    pub src: &'a str,

    /// Byte offset where each line begins. Container rules move this past
    /// their markers (e.g. `> `) while they parse their interior.
    pub b_marks: Vec<usize>,
    /// Byte offset where each line ends (the `\n` or end of input).
    pub e_marks: Vec<usize>,
    /// Byte distance from `b_marks` to the first non-space character.
    pub t_shift: Vec<usize>,
    /// Indentation in columns, tabs expanded. Negative for lazy
    /// continuation lines inside blockquotes.
    pub s_count: Vec<i32>,
    /// Column offset of `b_marks`, used when expanding tabs.
    pub bs_count: Vec<i32>,

    /// Required indentation for the current container.
    pub blk_indent: i32,
    /// Indentation of the enclosing list item, or -1 outside lists.
    pub list_indent: i32,
    /// Current line cursor.
    pub line: usize,
    /// Line ceiling: rules must not look at lines at or past it.
    pub line_max: usize,
    /// Whether the container being parsed is tight (no blank lines).
    pub tight: bool,
    /// Container the current rule runs inside.
    pub parent: ParentType,
    /// Current token nesting level.
    pub level: u32,

    /// Output token stream.
    pub tokens: Vec<Token>,
    /// Link reference definitions collected so far.
    pub refs: LinkRefStore,
}

impl<'a> BlockState<'a> {
    /// Index `src` by line. `src` must already use `\n` line endings.
    pub fn new(src: &'a str) -> Self {
        let bytes = src.as_bytes();
        let line_hint = bytes.len() / 32 + 1;
        let mut state = Self {
            src,
            b_marks: Vec::with_capacity(line_hint),
            e_marks: Vec::with_capacity(line_hint),
            t_shift: Vec::with_capacity(line_hint),
            s_count: Vec::with_capacity(line_hint),
            bs_count: Vec::with_capacity(line_hint),
            blk_indent: 0,
            list_indent: -1,
            line: 0,
            line_max: 0,
            tight: false,
            parent: ParentType::Root,
            level: 0,
            tokens: Vec::new(),
            refs: LinkRefStore::new(),
        };

        let mut start = 0;
        while start < bytes.len() {
            let end = memchr(b'\n', &bytes[start..]).map_or(bytes.len(), |i| start + i);

            let mut shift = 0;
            let mut offset: i32 = 0;
            for &b in &bytes[start..end] {
                match b {
                    b' ' => offset += 1,
                    b'\t' => offset += 4 - offset % 4,
                    _ => break,
                }
                shift += 1;
            }

            state.b_marks.push(start);
            state.e_marks.push(end);
            state.t_shift.push(shift);
            state.s_count.push(offset);
            state.bs_count.push(0);
            start = end + 1;
        }

        state.line_max = state.b_marks.len();

        // Sentinel line.
        state.b_marks.push(bytes.len());
        state.e_marks.push(bytes.len());
        state.t_shift.push(0);
        state.s_count.push(0);
        state.bs_count.push(0);

        state
    }

    /// Push a token, tracking nesting level.
    pub fn push(&mut self, token: Token) {
        match token.nesting() {
            1 => self.level += 1,
            -1 => self.level = self.level.saturating_sub(1),
            _ => {}
        }
        self.tokens.push(token);
    }

    /// Run `f` with the line ceiling lowered to `line_max` and the parent set
    /// to `parent`. Both are restored on every exit from `f`, unwinding
    /// included.
    pub fn with_ceiling<R>(&mut self, line_max: usize, parent: ParentType, f: impl FnOnce(&mut Self) -> R) -> R {
        let lowered = line_max.min(self.line_max);
        let old_line_max = std::mem::replace(&mut self.line_max, lowered);
        let old_parent = std::mem::replace(&mut self.parent, parent);
        let mut guard = CeilingGuard {
            state: self,
            line_max: old_line_max,
            parent: old_parent,
        };
        f(&mut *guard)
    }

    /// Byte at `pos`. Callers keep `pos` below the relevant `e_marks` entry.
    #[inline]
    pub fn byte(&self, pos: usize) -> u8 {
        self.src.as_bytes()[pos]
    }

    /// Content start of a line (after indentation).
    #[inline]
    pub fn content_start(&self, line: usize) -> usize {
        self.b_marks[line] + self.t_shift[line]
    }

    /// Whether a line holds only whitespace.
    #[inline]
    pub fn is_empty(&self, line: usize) -> bool {
        self.content_start(line) >= self.e_marks[line]
    }

    /// First non-empty line at or after `from`.
    pub fn skip_empty_lines(&self, mut from: usize) -> usize {
        while from < self.line_max && self.is_empty(from) {
            from += 1;
        }
        from
    }

    /// Skip spaces and tabs forward from `pos`.
    pub fn skip_spaces(&self, mut pos: usize) -> usize {
        let bytes = self.src.as_bytes();
        while pos < bytes.len() && is_space(bytes[pos]) {
            pos += 1;
        }
        pos
    }

    /// Skip a run of `ch` forward from `pos`.
    pub fn skip_chars(&self, mut pos: usize, ch: u8) -> usize {
        let bytes = self.src.as_bytes();
        while pos < bytes.len() && bytes[pos] == ch {
            pos += 1;
        }
        pos
    }

    /// Skip spaces and tabs backward from `pos`, stopping at `min`.
    pub fn skip_spaces_back(&self, mut pos: usize, min: usize) -> usize {
        let bytes = self.src.as_bytes();
        while pos > min && is_space(bytes[pos - 1]) {
            pos -= 1;
        }
        pos
    }

    /// Skip a run of `ch` backward from `pos`, stopping at `min`.
    pub fn skip_chars_back(&self, mut pos: usize, ch: u8, min: usize) -> usize {
        let bytes = self.src.as_bytes();
        while pos > min && bytes[pos - 1] == ch {
            pos -= 1;
        }
        pos
    }

    /// Text of a line from its content start, without the newline.
    #[inline]
    pub fn line_text(&self, line: usize) -> &'a str {
        let start = self.content_start(line).min(self.e_marks[line]);
        &self.src[start..self.e_marks[line]]
    }

    /// Join lines `[begin, end)`, removing up to `indent` columns of leading
    /// whitespace from each.
    ///
    /// Lines are separated by `\n`; the final line keeps its newline only
    /// when `keep_last_lf` is set. A tab that straddles the indent boundary
    /// is expanded and its remainder kept as spaces.
    pub fn get_lines(&self, begin: usize, end: usize, indent: i32, keep_last_lf: bool) -> String {
        if begin >= end {
            return String::new();
        }

        let bytes = self.src.as_bytes();
        let mut out = String::with_capacity(self.e_marks[end - 1].saturating_sub(self.b_marks[begin]) + 1);

        for line in begin..end {
            let line_start = self.b_marks[line];
            let mut first = line_start;
            let last = if line + 1 < end || keep_last_lf {
                (self.e_marks[line] + 1).min(bytes.len())
            } else {
                self.e_marks[line]
            };

            let mut line_indent: i32 = 0;
            while first < last && line_indent < indent {
                match bytes[first] {
                    b'\t' => line_indent += 4 - (line_indent + self.bs_count[line]) % 4,
                    b' ' => line_indent += 1,
                    // Already-consumed container markers count as indentation.
                    _ if first - line_start < self.t_shift[line] => line_indent += 1,
                    _ => break,
                }
                first += 1;
            }

            if line_indent > indent {
                for _ in 0..(line_indent - indent) {
                    out.push(' ');
                }
            }
            if first < last {
                out.push_str(&self.src[first..last]);
            }
            if keep_last_lf && line + 1 == end && last == bytes.len() && !out.ends_with('\n') {
                out.push('\n');
            }
        }

        out
    }
}

/// Space or tab.
#[inline]
pub(crate) fn is_space(b: u8) -> bool {
    b == b' ' || b == b'\t'
}
