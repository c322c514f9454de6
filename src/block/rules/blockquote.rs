//! Blockquotes, including lazy continuation lines.

use crate::block::{BlockParser, BlockState, ParentType};
use crate::token::Token;

/// Saved per-line tables, restored once the quote's interior is parsed.
struct SavedLine {
    b_mark: usize,
    t_shift: usize,
    s_count: i32,
    bs_count: i32,
}

pub fn blockquote(state: &mut BlockState<'_>, parser: &BlockParser, start_line: usize, end_line: usize, silent: bool) -> bool {
    if state.s_count[start_line] - state.blk_indent >= 4 {
        return false;
    }

    let start = state.content_start(start_line);
    if start >= state.e_marks[start_line] || state.byte(start) != b'>' {
        return false;
    }
    if silent {
        return true;
    }

    let old_line_max = state.line_max;
    let old_parent = state.parent;
    state.parent = ParentType::Blockquote;

    let mut saved: Vec<SavedLine> = Vec::new();
    let mut last_line_empty = false;
    let mut next_line = start_line;

    while next_line < end_line {
        // Inside a list item and indented less than it: not ours.
        let is_outdented = state.s_count[next_line] < state.blk_indent;
        let mut pos = state.content_start(next_line);
        let max = state.e_marks[next_line];

        if pos >= max {
            break;
        }

        if state.byte(pos) == b'>' && !is_outdented {
            pos += 1;

            // One optional space (or a tab's worth) after the marker.
            let mut initial = state.s_count[next_line] + 1;
            let mut space_after_marker = false;
            let mut adjust_tab = false;
            if pos < max && state.byte(pos) == b' ' {
                pos += 1;
                initial += 1;
                space_after_marker = true;
            } else if pos < max && state.byte(pos) == b'\t' {
                space_after_marker = true;
                if (state.bs_count[next_line] + initial) % 4 == 3 {
                    pos += 1;
                    initial += 1;
                } else {
                    adjust_tab = true;
                }
            }

            let mut offset = initial;
            saved.push(save_line(state, next_line));
            state.b_marks[next_line] = pos;

            while pos < max {
                match state.byte(pos) {
                    b'\t' => {
                        offset += 4 - (offset + state.bs_count[next_line] + i32::from(adjust_tab)) % 4;
                    }
                    b' ' => offset += 1,
                    _ => break,
                }
                pos += 1;
            }

            last_line_empty = pos >= max;
            state.bs_count[next_line] = state.s_count[next_line] + 1 + i32::from(space_after_marker);
            state.s_count[next_line] = offset - initial;
            state.t_shift[next_line] = pos - state.b_marks[next_line];
            next_line += 1;
            continue;
        }

        // Not a quote line, and the previous one was blank: the quote ends.
        if last_line_empty {
            break;
        }

        if parser.terminates("blockquote", state, next_line, end_line) {
            state.line_max = next_line;
            if state.blk_indent != 0 {
                // blk_indent drops to zero below; shift this line to match.
                saved.push(save_line(state, next_line));
                state.s_count[next_line] -= state.blk_indent;
            }
            break;
        }

        // Lazy continuation: negative indent marks it for the paragraph rule.
        saved.push(save_line(state, next_line));
        state.s_count[next_line] = -1;
        next_line += 1;
    }

    let old_indent = state.blk_indent;
    state.blk_indent = 0;

    state.push(Token::BlockquoteOpen);
    parser.tokenize(state, start_line, next_line);
    state.push(Token::BlockquoteClose);

    state.line_max = old_line_max;
    state.parent = old_parent;
    for (i, line) in saved.into_iter().enumerate() {
        let idx = start_line + i;
        state.b_marks[idx] = line.b_mark;
        state.t_shift[idx] = line.t_shift;
        state.s_count[idx] = line.s_count;
        state.bs_count[idx] = line.bs_count;
    }
    state.blk_indent = old_indent;

    true
}

fn save_line(state: &BlockState<'_>, line: usize) -> SavedLine {
    SavedLine {
        b_mark: state.b_marks[line],
        t_shift: state.t_shift[line],
        s_count: state.s_count[line],
        bs_count: state.bs_count[line],
    }
}

#[cfg(test)]
mod tests {
    use crate::to_html;

    #[test]
    fn test_simple_quote() {
        assert_eq!(to_html("> quoted"), "<blockquote>\n<p>quoted</p>\n</blockquote>\n");
    }

    #[test]
    fn test_lazy_continuation() {
        assert_eq!(
            to_html("> first\nlazy"),
            "<blockquote>\n<p>first\nlazy</p>\n</blockquote>\n"
        );
    }

    #[test]
    fn test_blank_line_ends_quote() {
        assert_eq!(
            to_html("> one\n\nafter"),
            "<blockquote>\n<p>one</p>\n</blockquote>\n<p>after</p>\n"
        );
    }

    #[test]
    fn test_nested_quotes() {
        assert_eq!(
            to_html("> > inner"),
            "<blockquote>\n<blockquote>\n<p>inner</p>\n</blockquote>\n</blockquote>\n"
        );
    }

    #[test]
    fn test_terminated_by_hr() {
        assert_eq!(
            to_html("> quote\n---"),
            "<blockquote>\n<p>quote</p>\n</blockquote>\n<hr>\n"
        );
    }

    #[test]
    fn test_lazy_line_after_fence_is_paragraph() {
        assert_eq!(
            to_html("> ```\n> code\nfoo"),
            "<blockquote>\n<pre><code>code\n</code></pre>\n</blockquote>\n<p>foo</p>\n"
        );
    }
}
