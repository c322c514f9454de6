//! Setext headings: a paragraph underlined with `===` or `---`.

use crate::block::{BlockParser, BlockState, ParentType};
use crate::token::{LineRange, Token};

pub fn lheading(state: &mut BlockState<'_>, parser: &BlockParser, start_line: usize, end_line: usize, _silent: bool) -> bool {
    if state.s_count[start_line] - state.blk_indent >= 4 {
        return false;
    }

    let old_parent = state.parent;
    state.parent = ParentType::Paragraph;

    let mut level = 0u8;
    let mut next_line = start_line + 1;
    while next_line < end_line && !state.is_empty(next_line) {
        if state.s_count[next_line] - state.blk_indent > 3 {
            next_line += 1;
            continue;
        }

        if state.s_count[next_line] >= state.blk_indent {
            let pos = state.content_start(next_line);
            let max = state.e_marks[next_line];
            let marker = state.byte(pos);
            if marker == b'=' || marker == b'-' {
                let after = state.skip_spaces(state.skip_chars(pos, marker));
                if after >= max {
                    level = if marker == b'=' { 1 } else { 2 };
                    break;
                }
            }
        }

        if state.s_count[next_line] < 0 {
            next_line += 1;
            continue;
        }
        if parser.terminates("paragraph", state, next_line, end_line) {
            break;
        }
        next_line += 1;
    }

    if level == 0 {
        state.parent = old_parent;
        return false;
    }

    let content = state.get_lines(start_line, next_line, state.blk_indent, false);
    state.line = next_line + 1;

    state.push(Token::HeadingOpen { level });
    state.push(Token::Inline {
        content: content.trim().to_string(),
        map: LineRange::new(start_line, state.line),
    });
    state.push(Token::HeadingClose { level });

    state.parent = old_parent;
    true
}

#[cfg(test)]
mod tests {
    use crate::to_html;

    #[test]
    fn test_setext_levels() {
        assert_eq!(to_html("Title\n====="), "<h1>Title</h1>\n");
        assert_eq!(to_html("Sub\n---"), "<h2>Sub</h2>\n");
    }

    #[test]
    fn test_multiline_setext() {
        assert_eq!(to_html("one\ntwo\n==="), "<h1>one\ntwo</h1>\n");
    }

    #[test]
    fn test_underline_with_trailing_text_is_paragraph() {
        assert_eq!(to_html("Title\n=== x"), "<p>Title\n=== x</p>\n");
    }
}
