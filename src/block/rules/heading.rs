//! ATX headings: `#` through `######`.

use crate::block::state::is_space;
use crate::block::{BlockParser, BlockState};
use crate::token::{LineRange, Token};

pub fn heading(state: &mut BlockState<'_>, _parser: &BlockParser, start_line: usize, _end_line: usize, silent: bool) -> bool {
    if state.s_count[start_line] - state.blk_indent >= 4 {
        return false;
    }

    let start = state.content_start(start_line);
    let mut max = state.e_marks[start_line];
    if start >= max || state.byte(start) != b'#' {
        return false;
    }

    let pos = state.skip_chars(start, b'#').min(max);
    let level = pos - start;
    if level > 6 || (pos < max && !is_space(state.byte(pos))) {
        return false;
    }
    if silent {
        return true;
    }

    // Strip an optional closing sequence: `## title ##`
    max = state.skip_spaces_back(max, pos);
    let closing = state.skip_chars_back(max, b'#', pos);
    if closing > pos && is_space(state.byte(closing - 1)) {
        max = closing;
    }

    state.line = start_line + 1;
    let level = level as u8;
    state.push(Token::HeadingOpen { level });
    state.push(Token::Inline {
        content: state.src[pos..max].trim().to_string(),
        map: LineRange::new(start_line, state.line),
    });
    state.push(Token::HeadingClose { level });
    true
}
