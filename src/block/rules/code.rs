//! Indented code blocks.

use crate::block::{BlockParser, BlockState};
use crate::token::{LineRange, Token};

pub fn code(state: &mut BlockState<'_>, _parser: &BlockParser, start_line: usize, end_line: usize, _silent: bool) -> bool {
    if state.s_count[start_line] - state.blk_indent < 4 {
        return false;
    }

    let mut next_line = start_line + 1;
    let mut last = next_line;
    while next_line < end_line {
        if state.is_empty(next_line) {
            next_line += 1;
            continue;
        }
        if state.s_count[next_line] - state.blk_indent >= 4 {
            next_line += 1;
            last = next_line;
            continue;
        }
        break;
    }

    state.line = last;
    let content = state.get_lines(start_line, last, 4 + state.blk_indent, true);
    state.push(Token::CodeBlock {
        content,
        map: LineRange::new(start_line, last),
    });
    true
}
