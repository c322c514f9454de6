//! Inline parser for Markdown.
//!
//! Three phases:
//! 1. Mark collection: one pass recording delimiter positions
//! 2. Mark resolution, by precedence: code spans, then links, then emphasis
//! 3. Event emission: resolved constructs become emit points, sorted by
//!    position, with plain text filling the gaps

mod code_span;
mod emphasis;
pub mod event;
mod links;
pub mod marks;

pub use event::InlineEvent;

use std::borrow::Cow;

use html_escape::decode_html_entities;

use crate::link_ref::LinkRefStore;
use crate::Range;
use code_span::{resolve_code_spans, CodeSpan};
use emphasis::{resolve_emphasis, EmphasisMatch};
use links::{resolve_links, Link};
use marks::{collect_marks, Mark, MarkBuffer};

/// Inline parser with buffers reused across calls.
#[derive(Debug, Default)]
pub struct InlineParser {
    mark_buffer: MarkBuffer,
    code_spans: Vec<CodeSpan>,
    links: Vec<Link>,
    emphasis: Vec<EmphasisMatch>,
    points: Vec<EmitPoint>,
}

impl InlineParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse inline content and append events.
    ///
    /// # Example
    /// ```
    /// use alertmark::inline::{InlineEvent, InlineParser};
    /// use alertmark::LinkRefStore;
    ///
    /// let mut parser = InlineParser::new();
    /// let mut events = Vec::new();
    /// parser.parse(b"*hi*", &LinkRefStore::new(), &mut events);
    /// assert_eq!(events[0], InlineEvent::EmphasisStart);
    /// ```
    pub fn parse(&mut self, text: &[u8], refs: &LinkRefStore, events: &mut Vec<InlineEvent>) {
        collect_marks(text, &mut self.mark_buffer);
        if self.mark_buffer.is_empty() {
            if !text.is_empty() {
                events.push(InlineEvent::Text(Range::from_usize(0, text.len())));
            }
            return;
        }

        let marks = self.mark_buffer.marks_mut();
        resolve_code_spans(text, marks, &mut self.code_spans);
        resolve_links(text, marks, &self.code_spans, refs, &mut self.links);
        resolve_emphasis(marks, &mut self.emphasis);

        self.collect_points(text);
        self.emit(text, events);
    }

    fn collect_points(&mut self, text: &[u8]) {
        let points = &mut self.points;
        points.clear();

        for span in &self.code_spans {
            points.push(EmitPoint::new(span.start, span.end, EmitKind::Code(span.content)));
        }

        for (idx, link) in self.links.iter().enumerate() {
            points.push(EmitPoint::new(link.start, link.start + 1, EmitKind::LinkStart(idx)));
            points.push(EmitPoint::new(link.text_end, link.end, EmitKind::LinkEnd));
        }

        for m in &self.emphasis {
            let (start, end) = if m.is_strong() {
                (EmitKind::StrongStart, EmitKind::StrongEnd)
            } else {
                (EmitKind::EmphasisStart, EmitKind::EmphasisEnd)
            };
            points.push(EmitPoint::new(m.opener_start, m.opener_end, start));
            points.push(EmitPoint::new(m.closer_start, m.closer_end, end));
        }

        for mark in self.mark_buffer.marks() {
            if let Some(kind) = leaf_kind(text, mark) {
                points.push(EmitPoint::new(mark.pos, mark.end, kind));
            }
        }

        points.sort_by_key(|p| (p.pos, !p.kind.is_end()));
    }

    fn emit(&self, text: &[u8], events: &mut Vec<InlineEvent>) {
        let mut pos = 0u32;
        for point in &self.points {
            if point.pos > pos {
                events.push(InlineEvent::Text(Range::new(pos, point.pos)));
            }
            let event = match &point.kind {
                EmitKind::Code(content) => InlineEvent::Code(*content),
                EmitKind::EmphasisStart => InlineEvent::EmphasisStart,
                EmitKind::EmphasisEnd => InlineEvent::EmphasisEnd,
                EmitKind::StrongStart => InlineEvent::StrongStart,
                EmitKind::StrongEnd => InlineEvent::StrongEnd,
                EmitKind::LinkStart(idx) => {
                    let link = &self.links[*idx];
                    InlineEvent::LinkStart {
                        url: link.url.clone(),
                        title: link.title.clone(),
                    }
                }
                EmitKind::LinkEnd => InlineEvent::LinkEnd,
                EmitKind::Escape(ch) => InlineEvent::EscapedChar(*ch),
                EmitKind::Entity(decoded) => InlineEvent::Entity(decoded.clone()),
                EmitKind::HardBreak => InlineEvent::HardBreak,
                EmitKind::SoftBreak => InlineEvent::SoftBreak,
            };
            events.push(event);
            pos = pos.max(point.end);
        }

        let len = text.len() as u32;
        if pos < len {
            events.push(InlineEvent::Text(Range::new(pos, len)));
        }
    }
}

/// Emit kind for escapes, line breaks and entities left after resolution.
fn leaf_kind(text: &[u8], mark: &Mark) -> Option<EmitKind> {
    if !mark.is_live() {
        return None;
    }
    let pos = mark.pos as usize;
    match mark.ch {
        b'\\' => Some(match text[pos + 1] {
            b'\n' => EmitKind::HardBreak,
            ch => EmitKind::Escape(ch),
        }),
        b'\n' => {
            let spaces = text[pos..].iter().take_while(|&&b| b == b' ').count();
            Some(if spaces >= 2 {
                EmitKind::HardBreak
            } else {
                EmitKind::SoftBreak
            })
        }
        b'&' => {
            let raw = std::str::from_utf8(&text[pos..mark.end as usize]).ok()?;
            match decode_html_entities(raw) {
                Cow::Owned(decoded) if decoded != raw => Some(EmitKind::Entity(decoded)),
                _ => None,
            }
        }
        _ => None,
    }
}

#[derive(Debug, Clone)]
struct EmitPoint {
    pos: u32,
    end: u32,
    kind: EmitKind,
}

impl EmitPoint {
    #[inline]
    fn new(pos: u32, end: u32, kind: EmitKind) -> Self {
        Self { pos, end, kind }
    }
}

#[derive(Debug, Clone)]
enum EmitKind {
    Code(Range),
    EmphasisStart,
    EmphasisEnd,
    StrongStart,
    StrongEnd,
    /// Index into the resolved links.
    LinkStart(usize),
    LinkEnd,
    Escape(u8),
    Entity(String),
    HardBreak,
    SoftBreak,
}

impl EmitKind {
    #[inline]
    fn is_end(&self) -> bool {
        matches!(self, Self::EmphasisEnd | Self::StrongEnd | Self::LinkEnd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<InlineEvent> {
        let mut parser = InlineParser::new();
        let mut events = Vec::new();
        parser.parse(text.as_bytes(), &LinkRefStore::new(), &mut events);
        events
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(parse("Hello"), [InlineEvent::Text(Range::new(0, 5))]);
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_emphasis_events() {
        assert_eq!(
            parse("a *b* c"),
            [
                InlineEvent::Text(Range::new(0, 2)),
                InlineEvent::EmphasisStart,
                InlineEvent::Text(Range::new(3, 4)),
                InlineEvent::EmphasisEnd,
                InlineEvent::Text(Range::new(5, 7)),
            ]
        );
    }

    #[test]
    fn test_leftover_delimiter_is_text() {
        assert_eq!(
            parse("**a*"),
            [
                InlineEvent::Text(Range::new(0, 1)),
                InlineEvent::EmphasisStart,
                InlineEvent::Text(Range::new(2, 3)),
                InlineEvent::EmphasisEnd,
            ]
        );
    }

    #[test]
    fn test_code_span_event() {
        assert_eq!(
            parse("`` a ``"),
            [InlineEvent::Code(Range::new(3, 4))]
        );
    }

    #[test]
    fn test_breaks() {
        assert_eq!(
            parse("a\nb"),
            [
                InlineEvent::Text(Range::new(0, 1)),
                InlineEvent::SoftBreak,
                InlineEvent::Text(Range::new(2, 3)),
            ]
        );
        assert_eq!(parse("a  \n  b")[1], InlineEvent::HardBreak);
        assert_eq!(parse("a\\\nb")[1], InlineEvent::HardBreak);
    }

    #[test]
    fn test_escape_and_entity() {
        assert_eq!(
            parse("\\*&copy;"),
            [
                InlineEvent::EscapedChar(b'*'),
                InlineEvent::Entity("©".to_string()),
            ]
        );
        // Unknown names stay text.
        assert_eq!(parse("&bogus;"), [InlineEvent::Text(Range::new(0, 7))]);
    }

    #[test]
    fn test_link_events() {
        let events = parse("[*a*](/u)");
        assert_eq!(
            events,
            [
                InlineEvent::LinkStart {
                    url: "/u".to_string(),
                    title: None,
                },
                InlineEvent::EmphasisStart,
                InlineEvent::Text(Range::new(2, 3)),
                InlineEvent::EmphasisEnd,
                InlineEvent::LinkEnd,
            ]
        );
    }

    #[test]
    fn test_emphasis_cannot_cross_link() {
        let events = parse("*[a*](/u)");
        assert!(!events.contains(&InlineEvent::EmphasisStart));
    }
}
