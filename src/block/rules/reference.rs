//! Link reference definitions: `[label]: destination "title"`.
//!
//! Definitions produce no tokens; they land in `state.refs` for the inline
//! pass to resolve.

use crate::block::state::is_space;
use crate::block::{BlockParser, BlockState, ParentType};
use crate::link_ref::{self, LinkRefDef};

pub fn reference(state: &mut BlockState<'_>, parser: &BlockParser, start_line: usize, _end_line: usize, silent: bool) -> bool {
    if state.s_count[start_line] - state.blk_indent >= 4 {
        return false;
    }
    let pos = state.content_start(start_line);
    let max = state.e_marks[start_line];
    if pos >= max || state.byte(pos) != b'[' {
        return false;
    }
    // Cheap reject: a definition needs `]:` somewhere.
    if !state.src.as_bytes()[pos..max].windows(2).any(|w| w == b"]:") {
        let continues = start_line + 1 < state.line_max && !state.is_empty(start_line + 1);
        if !continues {
            return false;
        }
    }

    let end_line = state.line_max;
    let mut next_line = start_line + 1;
    let old_parent = state.parent;
    state.parent = ParentType::Reference;
    while next_line < end_line && !state.is_empty(next_line) {
        // Deep indent or lazy quote line: plain continuation.
        let continuation = state.s_count[next_line] - state.blk_indent > 3 || state.s_count[next_line] < 0;
        if !continuation && parser.terminates("reference", state, next_line, end_line) {
            break;
        }
        next_line += 1;
    }
    state.parent = old_parent;

    let joined = state.get_lines(start_line, next_line, state.blk_indent, false);
    let text = joined.trim();
    let Some(parsed) = parse_definition(text) else {
        return false;
    };
    if silent {
        return true;
    }

    log::trace!("link reference `{}` -> {}", parsed.label, parsed.def.url);
    state.refs.insert(parsed.label, parsed.def);
    state.line = start_line + parsed.lines + 1;
    true
}

struct ParsedDefinition {
    label: String,
    def: LinkRefDef,
    /// Newlines consumed by the definition.
    lines: usize,
}

fn parse_definition(text: &str) -> Option<ParsedDefinition> {
    let src = text.as_bytes();
    let max = src.len();
    let mut lines = 0;

    let mut label_end = None;
    let mut pos = 1;
    while pos < max {
        match src[pos] {
            b'[' => return None,
            b']' => {
                label_end = Some(pos);
                break;
            }
            b'\n' => lines += 1,
            b'\\' => {
                pos += 1;
                if pos < max && src[pos] == b'\n' {
                    lines += 1;
                }
            }
            _ => {}
        }
        pos += 1;
    }
    let label_end = label_end?;
    if src.get(label_end + 1) != Some(&b':') {
        return None;
    }

    pos = skip_whitespace(src, label_end + 2, &mut lines);

    let (url, dest_end) = link_ref::parse_link_destination(src, pos, max)?;
    if !link_ref::is_allowed_url(&url) {
        return None;
    }
    pos = dest_end;
    let dest_end_lines = lines;

    let title_start = skip_whitespace(src, pos, &mut lines);
    let mut title = None;
    if title_start != pos {
        if let Some((t, end, title_lines)) = link_ref::parse_link_title(src, title_start, max) {
            title = Some(t);
            pos = end;
            lines += title_lines;
        }
    }
    if title.is_none() {
        lines = dest_end_lines;
    }

    pos = skip_spaces(src, pos);
    if pos < max && src[pos] != b'\n' && title.is_some() {
        // Garbage after the title: the title line is not part of the definition.
        title = None;
        pos = skip_spaces(src, dest_end);
        lines = dest_end_lines;
    }
    if pos < max && src[pos] != b'\n' {
        return None;
    }

    let label = link_ref::normalize_label(&text[1..label_end]);
    if label.is_empty() {
        return None;
    }
    Some(ParsedDefinition {
        label,
        def: LinkRefDef { url, title },
        lines,
    })
}

fn skip_spaces(src: &[u8], mut pos: usize) -> usize {
    while pos < src.len() && is_space(src[pos]) {
        pos += 1;
    }
    pos
}

fn skip_whitespace(src: &[u8], mut pos: usize, lines: &mut usize) -> usize {
    while pos < src.len() {
        match src[pos] {
            b'\n' => *lines += 1,
            b if is_space(b) => {}
            _ => break,
        }
        pos += 1;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::to_html;

    #[test]
    fn test_definition_is_consumed() {
        assert_eq!(to_html("[foo]: /url \"Title\"\n\n[foo]"), "<p><a href=\"/url\" title=\"Title\">foo</a></p>\n");
    }

    #[test]
    fn test_definition_spanning_lines() {
        let parsed = parse_definition("[foo]:\n/url\n'the title'").unwrap();
        assert_eq!(parsed.label, "foo");
        assert_eq!(parsed.def.url, "/url");
        assert_eq!(parsed.def.title.as_deref(), Some("the title"));
        assert_eq!(parsed.lines, 2);
    }

    #[test]
    fn test_title_on_next_line_with_garbage() {
        // The definition ends after the destination; the rest is a paragraph.
        assert_eq!(to_html("[foo]: /url\n\"title\" ok"), "<p>&quot;title&quot; ok</p>\n");
    }

    #[test]
    fn test_not_a_definition() {
        assert!(parse_definition("[foo] /url").is_none());
        assert!(parse_definition("[]: /url").is_none());
        assert!(parse_definition("[a[b]]: /url").is_none());
        assert_eq!(to_html("[foo]: /url bar"), "<p>[foo]: /url bar</p>\n");
    }

    #[test]
    fn test_unsafe_destination_rejected() {
        assert!(parse_definition("[x]: javascript:alert(1)").is_none());
    }
}
