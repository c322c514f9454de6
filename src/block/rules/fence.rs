//! Fenced code blocks: ```` ``` ```` or `~~~`, three or more.

use crate::block::{BlockParser, BlockState};
use crate::token::{LineRange, Token};

pub fn fence(state: &mut BlockState<'_>, _parser: &BlockParser, start_line: usize, end_line: usize, silent: bool) -> bool {
    if state.s_count[start_line] - state.blk_indent >= 4 {
        return false;
    }

    let mut pos = state.content_start(start_line);
    let max = state.e_marks[start_line];
    if pos + 3 > max {
        return false;
    }

    let marker = state.byte(pos);
    if marker != b'~' && marker != b'`' {
        return false;
    }

    let mark_start = pos;
    pos = state.skip_chars(pos, marker).min(max);
    let fence_len = pos - mark_start;
    if fence_len < 3 {
        return false;
    }

    let params = &state.src[pos..max];
    if marker == b'`' && params.contains('`') {
        return false;
    }
    if silent {
        return true;
    }

    let mut next_line = start_line;
    let mut have_end_marker = false;
    loop {
        next_line += 1;
        // Unclosed fences run to the end of the region.
        if next_line >= end_line {
            break;
        }

        let line_start = state.content_start(next_line);
        let line_max = state.e_marks[next_line];

        // Non-empty outdented line: the enclosing container ended.
        if line_start < line_max && state.s_count[next_line] < state.blk_indent {
            break;
        }
        if line_start >= line_max || state.byte(line_start) != marker {
            continue;
        }
        if state.s_count[next_line] - state.blk_indent >= 4 {
            continue;
        }

        let run_end = state.skip_chars(line_start, marker).min(line_max);
        if run_end - line_start < fence_len {
            continue;
        }
        if state.skip_spaces(run_end) < line_max {
            continue;
        }

        have_end_marker = true;
        break;
    }

    let indent = state.s_count[start_line];
    let content = state.get_lines(start_line + 1, next_line, indent, true);
    state.line = next_line + usize::from(have_end_marker);
    state.push(Token::Fence {
        info: params.trim().to_string(),
        content,
        map: LineRange::new(start_line, state.line),
    });
    true
}

#[cfg(test)]
mod tests {
    use crate::to_html;

    #[test]
    fn test_code_fence_backticks() {
        assert_eq!(to_html("```\nfn main() {}\n```"), "<pre><code>fn main() {}\n</code></pre>\n");
    }

    #[test]
    fn test_code_fence_with_info() {
        assert_eq!(
            to_html("~~~rust extra\n<T>\n~~~"),
            "<pre><code class=\"language-rust\">&lt;T&gt;\n</code></pre>\n"
        );
    }

    #[test]
    fn test_code_fence_no_closing() {
        assert_eq!(to_html("```\nstill code"), "<pre><code>still code\n</code></pre>\n");
    }

    #[test]
    fn test_code_fence_shorter_closing_invalid() {
        assert_eq!(to_html("````\na\n```\n````"), "<pre><code>a\n```\n</code></pre>\n");
    }

    #[test]
    fn test_backtick_in_info_invalid() {
        assert_eq!(to_html("``` a`b"), "<p>``` a`b</p>\n");
    }

    #[test]
    fn test_indented_fence_strips_indent() {
        assert_eq!(to_html("  ```\n    x\n  y\n  ```"), "<pre><code>  x\ny\n</code></pre>\n");
    }

    #[test]
    fn test_colons_inside_fence_are_code() {
        assert_eq!(
            to_html("```\n:::info\n:::\n```"),
            "<pre><code>:::info\n:::\n</code></pre>\n"
        );
    }
}
