//! Bullet and ordered lists.

use crate::block::state::is_space;
use crate::block::{mark_tight_paragraphs, BlockParser, BlockState, ParentType};
use crate::limits;
use crate::token::Token;

/// Position after a `-`, `+` or `*` marker on `line`.
fn skip_bullet_marker(state: &BlockState<'_>, line: usize) -> Option<usize> {
    let max = state.e_marks[line];
    let pos = state.content_start(line);
    if pos >= max || !matches!(state.byte(pos), b'*' | b'-' | b'+') {
        return None;
    }
    let pos = pos + 1;
    // "-test" is not a list item.
    if pos < max && !is_space(state.byte(pos)) {
        return None;
    }
    Some(pos)
}

/// Position after a `1.` or `1)` marker on `line`.
fn skip_ordered_marker(state: &BlockState<'_>, line: usize) -> Option<usize> {
    let start = state.content_start(line);
    let max = state.e_marks[line];
    if start + 1 >= max || !state.byte(start).is_ascii_digit() {
        return None;
    }

    let mut pos = start + 1;
    loop {
        if pos >= max {
            return None;
        }
        let b = state.byte(pos);
        pos += 1;
        if b.is_ascii_digit() {
            if pos - start > limits::MAX_LIST_MARKER_DIGITS {
                return None;
            }
            continue;
        }
        if b == b')' || b == b'.' {
            break;
        }
        return None;
    }

    if pos < max && !is_space(state.byte(pos)) {
        return None;
    }
    Some(pos)
}

pub fn list(state: &mut BlockState<'_>, parser: &BlockParser, start_line: usize, end_line: usize, silent: bool) -> bool {
    if state.s_count[start_line] - state.blk_indent >= 4 {
        return false;
    }

    // A deeply indented marker after a list item is paragraph continuation:
    //  - one
    //      - two
    if state.list_indent >= 0
        && state.s_count[start_line] - state.list_indent >= 4
        && state.s_count[start_line] < state.blk_indent
    {
        return false;
    }

    let mut is_terminating_paragraph = false;
    if silent && state.parent == ParentType::Paragraph && state.s_count[start_line] >= state.blk_indent {
        is_terminating_paragraph = true;
    }

    let mut marker_value = 1u32;
    let (is_ordered, mut pos_after_marker) = if let Some(pos) = skip_ordered_marker(state, start_line) {
        let digits = &state.src[state.content_start(start_line)..pos - 1];
        marker_value = digits.parse().unwrap_or(1);
        // Only a list starting at 1 may interrupt a paragraph.
        if is_terminating_paragraph && marker_value != 1 {
            return false;
        }
        (true, pos)
    } else if let Some(pos) = skip_bullet_marker(state, start_line) {
        (false, pos)
    } else {
        return false;
    };

    // An empty item cannot interrupt a paragraph.
    if is_terminating_paragraph && state.skip_spaces(pos_after_marker) >= state.e_marks[start_line] {
        return false;
    }
    if silent {
        return true;
    }

    let marker_char = state.byte(pos_after_marker - 1);
    let list_token_idx = state.tokens.len();
    state.push(if is_ordered {
        Token::OrderedListOpen { start: marker_value }
    } else {
        Token::BulletListOpen
    });

    let old_parent = state.parent;
    state.parent = ParentType::List;

    let mut next_line = start_line;
    let mut item_start = start_line;
    let mut prev_empty_end = false;
    let mut tight = true;

    while next_line < end_line {
        let mut pos = pos_after_marker;
        let max = state.e_marks[next_line];

        let initial =
            state.s_count[next_line] + (pos_after_marker - state.content_start(next_line)) as i32;
        let mut offset = initial;
        while pos < max {
            match state.byte(pos) {
                b'\t' => offset += 4 - (offset + state.bs_count[next_line]) % 4,
                b' ' => offset += 1,
                _ => break,
            }
            pos += 1;
        }

        let content_start = pos;
        let mut indent_after_marker = if content_start >= max { 1 } else { offset - initial };
        // More than four spaces: the item holds an indented code block.
        if indent_after_marker > 4 {
            indent_after_marker = 1;
        }
        let indent = initial + indent_after_marker;

        state.push(Token::ListItemOpen);

        let old_tight = state.tight;
        let old_t_shift = state.t_shift[next_line];
        let old_s_count = state.s_count[next_line];
        let old_list_indent = state.list_indent;
        state.list_indent = state.blk_indent;
        state.blk_indent = indent;
        state.tight = true;
        state.t_shift[next_line] = content_start - state.b_marks[next_line];
        state.s_count[next_line] = offset;

        if content_start >= max && state.is_empty(next_line + 1) {
            // An empty item followed by a blank line ends the list.
            state.line = (next_line + 2).min(end_line);
        } else {
            parser.tokenize(state, next_line, end_line);
        }

        if !state.tight || prev_empty_end {
            tight = false;
        }
        // A blank line at the end of an item makes the list loose, unless
        // it also ends the list.
        prev_empty_end = state.line - item_start > 1 && state.is_empty(state.line - 1);

        state.blk_indent = state.list_indent;
        state.list_indent = old_list_indent;
        state.t_shift[next_line] = old_t_shift;
        state.s_count[next_line] = old_s_count;
        state.tight = old_tight;

        state.push(Token::ListItemClose);

        next_line = state.line;
        item_start = next_line;

        if next_line >= end_line {
            break;
        }
        if state.s_count[next_line] < state.blk_indent {
            break;
        }
        if state.s_count[next_line] - state.blk_indent >= 4 {
            break;
        }
        if parser.terminates("list", state, next_line, end_line) {
            break;
        }

        let next_marker = if is_ordered {
            skip_ordered_marker(state, next_line)
        } else {
            skip_bullet_marker(state, next_line)
        };
        match next_marker {
            Some(pos) if state.byte(pos - 1) == marker_char => pos_after_marker = pos,
            _ => break,
        }
    }

    state.push(if is_ordered {
        Token::OrderedListClose
    } else {
        Token::BulletListClose
    });

    state.line = next_line;
    state.parent = old_parent;

    if tight {
        mark_tight_paragraphs(&mut state.tokens[list_token_idx..]);
    }
    true
}
