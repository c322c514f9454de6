//! Link resolution.
//!
//! Handles:
//! - Inline links: `[text](url "title")`
//! - Full reference links: `[text][label]`
//! - Collapsed and shortcut references: `[label][]`, `[label]`
//!
//! Brackets are matched with a stack in source order. A link makes every
//! earlier `[` inactive, so links never nest.

use crate::link_ref::{self, LinkRefStore};

use super::code_span::CodeSpan;
use super::marks::{flags, Mark};

/// A resolved link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Position of the opening `[`.
    pub start: u32,
    /// Position of the closing `]` of the link text.
    pub text_end: u32,
    /// End of the whole link (after `)` or the reference label).
    pub end: u32,
    /// Unescaped destination.
    pub url: String,
    /// Unescaped title.
    pub title: Option<String>,
}

/// Resolve links, appending them to `links` in source order.
///
/// Marks inside a link's destination, title or label are flagged so they
/// emit nothing. Marks inside link text get the link's scope so emphasis
/// cannot cross the link boundary.
pub fn resolve_links(text: &[u8], marks: &mut [Mark], code_spans: &[CodeSpan], refs: &LinkRefStore, links: &mut Vec<Link>) {
    links.clear();
    // (mark index, active)
    let mut openers: Vec<(usize, bool)> = Vec::new();

    for idx in 0..marks.len() {
        let mark = marks[idx];
        if !mark.is_live() {
            continue;
        }
        match mark.ch {
            b'[' => openers.push((idx, true)),
            b']' => {
                let Some((open_idx, active)) = openers.pop() else {
                    continue;
                };
                if !active {
                    continue;
                }
                let open = marks[open_idx].pos;
                let Some(link) = parse_link_tail(text, open, mark.pos, refs) else {
                    continue;
                };
                if code_spans.iter().any(|cs| cs.start > link.text_end && cs.start < link.end) {
                    continue;
                }

                for (_, active) in &mut openers {
                    *active = false;
                }
                let scope = links.len() as u16 + 1;
                for m in marks.iter_mut() {
                    if m.pos > link.start && m.pos < link.text_end {
                        m.scope = scope;
                    } else if m.pos > link.text_end && m.pos < link.end {
                        m.flags |= flags::IN_LINK_TAIL;
                    }
                }
                marks[open_idx].resolve();
                marks[idx].resolve();
                links.push(link);
            }
            _ => {}
        }
    }
}

/// Parse what follows the `]` at `close`, given the `[` at `open`.
fn parse_link_tail(text: &[u8], open: u32, close: u32, refs: &LinkRefStore) -> Option<Link> {
    let after = close as usize + 1;
    let max = text.len();

    if text.get(after) == Some(&b'(') {
        if let Some((url, title, end)) = parse_inline_tail(text, after + 1, max) {
            if !link_ref::is_allowed_url(&url) {
                return None;
            }
            return Some(Link {
                start: open,
                text_end: close,
                end: end as u32,
                url,
                title,
            });
        }
    }

    if refs.is_empty() {
        return None;
    }

    let text_label = std::str::from_utf8(&text[open as usize + 1..close as usize]).ok()?;
    let (label, end) = match text.get(after) {
        Some(b'[') => match link_ref::parse_link_label(text, after, max, false) {
            Some(label_end) if label_end > after + 1 => {
                (std::str::from_utf8(&text[after + 1..label_end]).ok()?, label_end + 1)
            }
            // `[text][]`
            Some(label_end) => (text_label, label_end + 1),
            None => (text_label, after),
        },
        _ => (text_label, after),
    };

    let def = refs.lookup(label)?;
    Some(Link {
        start: open,
        text_end: close,
        end: end as u32,
        url: def.url.clone(),
        title: def.title.clone(),
    })
}

/// Parse `url "title")` starting just after `(`.
/// Returns the URL, optional title and the position after `)`.
fn parse_inline_tail(text: &[u8], mut pos: usize, max: usize) -> Option<(String, Option<String>, usize)> {
    pos = skip_whitespace(text, pos);
    if pos >= max {
        return None;
    }

    let mut url = String::new();
    let mut title = None;
    if text[pos] != b')' {
        let (dest, dest_end) = link_ref::parse_link_destination(text, pos, max)?;
        url = dest;
        pos = skip_whitespace(text, dest_end);

        // A title must be separated from the destination by whitespace.
        if pos > dest_end && pos < max {
            if let Some((t, title_end, _)) = link_ref::parse_link_title(text, pos, max) {
                title = Some(t);
                pos = skip_whitespace(text, title_end);
            }
        }
    }

    (text.get(pos) == Some(&b')')).then_some((url, title, pos + 1))
}

#[inline]
fn skip_whitespace(text: &[u8], mut pos: usize) -> usize {
    while pos < text.len() && matches!(text[pos], b' ' | b'\t' | b'\n') {
        pos += 1;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::code_span::resolve_code_spans;
    use crate::inline::marks::{collect_marks, MarkBuffer};
    use crate::link_ref::{normalize_label, LinkRefDef};

    fn links_with(text: &[u8], refs: &LinkRefStore) -> Vec<Link> {
        let mut buffer = MarkBuffer::new();
        collect_marks(text, &mut buffer);
        let mut spans = Vec::new();
        resolve_code_spans(text, buffer.marks_mut(), &mut spans);
        let mut links = Vec::new();
        resolve_links(text, buffer.marks_mut(), &spans, refs, &mut links);
        links
    }

    fn links(text: &[u8]) -> Vec<Link> {
        links_with(text, &LinkRefStore::new())
    }

    fn refs() -> LinkRefStore {
        let mut store = LinkRefStore::new();
        store.insert(
            normalize_label("Docs"),
            LinkRefDef {
                url: "/docs".to_string(),
                title: Some("Read me".to_string()),
            },
        );
        store
    }

    #[test]
    fn test_inline_link() {
        let l = links(b"see [the docs](/docs \"Title\") now");
        assert_eq!(l.len(), 1);
        assert_eq!((l[0].start, l[0].text_end, l[0].end), (4, 13, 29));
        assert_eq!(l[0].url, "/docs");
        assert_eq!(l[0].title.as_deref(), Some("Title"));
    }

    #[test]
    fn test_empty_destination() {
        let l = links(b"[a]()");
        assert_eq!(l[0].url, "");
    }

    #[test]
    fn test_title_needs_whitespace() {
        let l = links(b"[a](/u\"t\")");
        assert_eq!(l[0].url, "/u\"t\"");
        assert_eq!(l[0].title, None);
    }

    #[test]
    fn test_links_do_not_nest() {
        let l = links(b"[outer [inner](/i)](/o)");
        assert_eq!(l.len(), 1);
        assert_eq!(l[0].url, "/i");
    }

    #[test]
    fn test_bracket_in_code_span_ignored() {
        assert!(links(b"[a `]`(/x)").is_empty());
    }

    #[test]
    fn test_reference_forms() {
        let refs = refs();
        assert_eq!(links_with(b"[docs]", &refs)[0].url, "/docs");
        assert_eq!(links_with(b"[docs][]", &refs)[0].end, 8);
        let full = links_with(b"[read][DOCS] x", &refs);
        assert_eq!((full[0].text_end, full[0].end), (5, 12));
        assert!(links_with(b"[missing]", &refs).is_empty());
    }

    #[test]
    fn test_unsafe_inline_destination() {
        assert!(links(b"[x](javascript:alert(1))").is_empty());
    }
}
