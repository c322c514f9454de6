//! Thematic breaks: `***`, `---`, `___`.

use crate::block::state::is_space;
use crate::block::{BlockParser, BlockState};
use crate::token::Token;

pub fn hr(state: &mut BlockState<'_>, _parser: &BlockParser, start_line: usize, _end_line: usize, silent: bool) -> bool {
    if state.s_count[start_line] - state.blk_indent >= 4 {
        return false;
    }

    let max = state.e_marks[start_line];
    let mut pos = state.content_start(start_line);
    if pos >= max {
        return false;
    }

    let marker = state.byte(pos);
    if !matches!(marker, b'*' | b'-' | b'_') {
        return false;
    }

    let mut count = 0;
    while pos < max {
        let b = state.byte(pos);
        if b == marker {
            count += 1;
        } else if !is_space(b) {
            return false;
        }
        pos += 1;
    }
    if count < 3 {
        return false;
    }
    if silent {
        return true;
    }

    state.line = start_line + 1;
    state.push(Token::ThematicBreak);
    true
}
