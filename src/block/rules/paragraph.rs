//! Paragraphs: the fallback rule, claims any remaining line.

use crate::block::{BlockParser, BlockState, ParentType};
use crate::token::{LineRange, Token};

pub fn paragraph(state: &mut BlockState<'_>, parser: &BlockParser, start_line: usize, _end_line: usize, _silent: bool) -> bool {
    let end_line = state.line_max;
    let old_parent = state.parent;
    state.parent = ParentType::Paragraph;

    let mut next_line = start_line + 1;
    while next_line < end_line && !state.is_empty(next_line) {
        // Would be an indented code block, but lazy continuation wins.
        if state.s_count[next_line] - state.blk_indent > 3 {
            next_line += 1;
            continue;
        }
        // Lazy blockquote line, already vetted by the blockquote rule.
        if state.s_count[next_line] < 0 {
            next_line += 1;
            continue;
        }
        if parser.terminates("paragraph", state, next_line, end_line) {
            break;
        }
        next_line += 1;
    }

    let content = state.get_lines(start_line, next_line, state.blk_indent, false);
    state.line = next_line;

    state.push(Token::ParagraphOpen { hidden: false });
    state.push(Token::Inline {
        content: content.trim().to_string(),
        map: LineRange::new(start_line, next_line),
    });
    state.push(Token::ParagraphClose { hidden: false });

    state.parent = old_parent;
    true
}

#[cfg(test)]
mod tests {
    use crate::to_html;

    #[test]
    fn test_simple_paragraph() {
        assert_eq!(to_html("Hello world"), "<p>Hello world</p>\n");
    }

    #[test]
    fn test_multiline_paragraph() {
        assert_eq!(to_html("Line one\n  Line two"), "<p>Line one\nLine two</p>\n");
    }

    #[test]
    fn test_trailing_whitespace_trimmed() {
        assert_eq!(to_html("  padded   \n"), "<p>padded</p>\n");
    }

    #[test]
    fn test_interrupted_by_fence() {
        assert_eq!(
            to_html("para\n```\ncode\n```"),
            "<p>para</p>\n<pre><code>code\n</code></pre>\n"
        );
    }
}
