//! HTML rendering: the output writer and the token render pass.
//!
//! Block tags follow the markdown-it layout: a newline after every block
//! tag, except directly before inline content or a hidden (tight-list)
//! paragraph, and an extra newline before a block tag that follows a hidden
//! paragraph. Alert tokens are rendered by [`crate::alert`].

use crate::alert::AlertStack;
use crate::escape;
use crate::inline::{InlineEvent, InlineParser};
use crate::link_ref::{unescape_all, LinkRefStore};
use crate::token::Token;

/// HTML output buffer.
///
/// # Example
/// ```
/// use alertmark::HtmlWriter;
///
/// let mut writer = HtmlWriter::with_capacity_for(64);
/// writer.write_str("<p>");
/// writer.write_escaped_text(b"Hello <World>");
/// writer.write_str("</p>");
/// assert_eq!(writer.into_string(), "<p>Hello &lt;World&gt;</p>");
/// ```
#[derive(Debug, Default)]
pub struct HtmlWriter {
    out: Vec<u8>,
}

impl HtmlWriter {
    #[inline]
    pub fn new() -> Self {
        Self {
            out: Vec::with_capacity(1024),
        }
    }

    /// Reserve for an input of `input_len` bytes; HTML runs about 1.25x.
    #[inline]
    pub fn with_capacity_for(input_len: usize) -> Self {
        Self::with_capacity(input_len + input_len / 4)
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
        }
    }

    /// Write raw bytes without escaping. Callers pass valid UTF-8.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }

    /// Write a string without escaping.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.out.extend_from_slice(s.as_bytes());
    }

    /// Write text content, escaping `& < > "`.
    #[inline]
    pub fn write_escaped_text(&mut self, text: &[u8]) {
        escape::escape_text_into(&mut self.out, text);
    }

    /// Write an attribute value with the five-character map.
    #[inline]
    pub fn write_escaped_attr(&mut self, attr: &[u8]) {
        escape::escape_html_into(&mut self.out, attr);
    }

    /// Write a percent-encoded, attribute-safe link destination.
    #[inline]
    pub fn write_link_url(&mut self, url: &[u8]) {
        escape::write_link_url(&mut self.out, url);
    }

    #[inline]
    pub fn newline(&mut self) {
        self.out.push(b'\n');
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Clear for reuse, keeping capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.out.clear();
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.out
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        // SAFETY: only UTF-8 input slices split at ASCII bytes, ASCII markup
        // and ASCII escapes are ever written.
        unsafe { std::str::from_utf8_unchecked(&self.out) }
    }

    #[inline]
    pub fn into_string(self) -> String {
        // SAFETY: see `as_str`.
        unsafe { String::from_utf8_unchecked(self.out) }
    }

    /// Write `<ol>` or `<ol start="N">` for a list starting at `start`.
    fn ol_start(&mut self, start: u32) {
        if start == 1 {
            self.write_str("<ol");
        } else {
            self.write_str("<ol start=\"");
            self.write_u32(start);
            self.write_str("\"");
        }
    }

    fn write_u32(&mut self, mut n: u32) {
        let mut buf = [0u8; 10];
        let mut i = buf.len();
        loop {
            i -= 1;
            buf[i] = b'0' + (n % 10) as u8;
            n /= 10;
            if n == 0 {
                break;
            }
        }
        self.write_bytes(&buf[i..]);
    }

    /// Write code content with line endings turned into spaces.
    fn write_code_span(&mut self, content: &[u8]) {
        self.write_str("<code>");
        for (i, line) in content.split(|&b| b == b'\n').enumerate() {
            if i > 0 {
                self.out.push(b' ');
            }
            self.write_escaped_text(line);
        }
        self.write_str("</code>");
    }
}

/// Render a block token stream to HTML.
pub fn render_tokens(tokens: &[Token], refs: &LinkRefStore, writer: &mut HtmlWriter) {
    let mut inline = InlineParser::new();
    let mut events = Vec::new();
    let mut alerts = AlertStack::new();

    for (idx, token) in tokens.iter().enumerate() {
        match token {
            Token::Inline { content, .. } => {
                events.clear();
                inline.parse(content.as_bytes(), refs, &mut events);
                render_inline(content.as_bytes(), &events, writer);
            }
            Token::Fence { info, content, .. } => {
                let info = unescape_all(info);
                let lang = info.split_whitespace().next().unwrap_or("");
                if lang.is_empty() {
                    writer.write_str("<pre><code>");
                } else {
                    writer.write_str("<pre><code class=\"language-");
                    writer.write_escaped_text(lang.as_bytes());
                    writer.write_str("\">");
                }
                writer.write_escaped_text(content.as_bytes());
                writer.write_str("</code></pre>\n");
            }
            Token::CodeBlock { content, .. } => {
                writer.write_str("<pre><code>");
                writer.write_escaped_text(content.as_bytes());
                writer.write_str("</code></pre>\n");
            }
            Token::AlertOpen {
                alert_type, title, ..
            } => alerts.open(writer, *alert_type, title.as_deref()),
            Token::AlertClose => alerts.close(writer),
            _ => render_tag(tokens, idx, writer),
        }
    }

    if alerts.depth() != 0 {
        log::debug!("{} alert(s) left open at end of stream", alerts.depth());
    }
}

/// Render a container or leaf tag token.
fn render_tag(tokens: &[Token], idx: usize, writer: &mut HtmlWriter) {
    let token = &tokens[idx];
    if is_hidden(token) {
        return;
    }

    let nesting = token.nesting();
    if nesting != -1 && idx > 0 && is_hidden(&tokens[idx - 1]) {
        writer.newline();
    }

    match token {
        Token::ParagraphOpen { .. } => writer.write_str("<p"),
        Token::ParagraphClose { .. } => writer.write_str("</p"),
        Token::HeadingOpen { level } | Token::HeadingClose { level } => {
            writer.write_str(if nesting == 1 { "<h" } else { "</h" });
            writer.write_bytes(&[b'0' + level]);
        }
        Token::BlockquoteOpen => writer.write_str("<blockquote"),
        Token::BlockquoteClose => writer.write_str("</blockquote"),
        Token::BulletListOpen => writer.write_str("<ul"),
        Token::BulletListClose => writer.write_str("</ul"),
        Token::OrderedListOpen { start } => writer.ol_start(*start),
        Token::OrderedListClose => writer.write_str("</ol"),
        Token::ListItemOpen => writer.write_str("<li"),
        Token::ListItemClose => writer.write_str("</li"),
        Token::ThematicBreak => writer.write_str("<hr"),
        _ => return,
    }

    let mut need_lf = true;
    if nesting == 1 {
        if let Some(next) = tokens.get(idx + 1) {
            if matches!(next, Token::Inline { .. }) || is_hidden(next) || closes(token, next) {
                need_lf = false;
            }
        }
    }
    writer.write_str(if need_lf { ">\n" } else { ">" });
}

#[inline]
fn is_hidden(token: &Token) -> bool {
    matches!(
        token,
        Token::ParagraphOpen { hidden: true } | Token::ParagraphClose { hidden: true }
    )
}

/// Whether `next` directly closes `open`.
fn closes(open: &Token, next: &Token) -> bool {
    matches!(
        (open, next),
        (Token::ListItemOpen, Token::ListItemClose)
            | (Token::BlockquoteOpen, Token::BlockquoteClose)
            | (Token::BulletListOpen, Token::BulletListClose)
            | (Token::OrderedListOpen { .. }, Token::OrderedListClose)
            | (Token::ParagraphOpen { .. }, Token::ParagraphClose { .. })
    )
}

/// Render inline events for `text`.
pub fn render_inline(text: &[u8], events: &[InlineEvent], writer: &mut HtmlWriter) {
    for event in events {
        match event {
            InlineEvent::Text(range) => writer.write_escaped_text(range.slice(text)),
            InlineEvent::Code(range) => writer.write_code_span(range.slice(text)),
            InlineEvent::EscapedChar(ch) => writer.write_escaped_text(&[*ch]),
            InlineEvent::Entity(decoded) => writer.write_escaped_text(decoded.as_bytes()),
            InlineEvent::EmphasisStart => writer.write_str("<em>"),
            InlineEvent::EmphasisEnd => writer.write_str("</em>"),
            InlineEvent::StrongStart => writer.write_str("<strong>"),
            InlineEvent::StrongEnd => writer.write_str("</strong>"),
            InlineEvent::LinkStart { url, title } => {
                writer.write_str("<a href=\"");
                writer.write_link_url(url.as_bytes());
                if let Some(title) = title {
                    writer.write_str("\" title=\"");
                    writer.write_escaped_text(title.as_bytes());
                }
                writer.write_str("\">");
            }
            InlineEvent::LinkEnd => writer.write_str("</a>"),
            InlineEvent::SoftBreak => writer.newline(),
            InlineEvent::HardBreak => writer.write_str("<br>\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::to_html;

    #[test]
    fn test_writer_escaped_text() {
        let mut writer = HtmlWriter::new();
        writer.write_escaped_text(b"<script>");
        assert_eq!(writer.as_str(), "&lt;script&gt;");
    }

    #[test]
    fn test_writer_capacity() {
        let writer = HtmlWriter::with_capacity_for(1000);
        assert!(writer.out.capacity() >= 1250);
        assert!(writer.is_empty());
    }

    #[test]
    fn test_writer_clear_reuse() {
        let mut writer = HtmlWriter::new();
        writer.write_str("first");
        let cap = writer.out.capacity();
        writer.clear();
        assert!(writer.is_empty());
        assert_eq!(writer.out.capacity(), cap);
        writer.write_str("second");
        assert_eq!(writer.as_str(), "second");
    }

    #[test]
    fn test_write_u32() {
        let mut writer = HtmlWriter::new();
        writer.write_u32(0);
        writer.write_str(" ");
        writer.write_u32(1234567890);
        assert_eq!(writer.as_str(), "0 1234567890");
    }

    #[test]
    fn test_code_span_newlines_become_spaces() {
        let mut writer = HtmlWriter::new();
        writer.write_code_span(b"a\nb<");
        assert_eq!(writer.as_str(), "<code>a b&lt;</code>");
    }

    #[test]
    fn test_heading_and_hr() {
        assert_eq!(to_html("## Title\n***"), "<h2>Title</h2>\n<hr>\n");
    }

    #[test]
    fn test_tight_list_before_block() {
        assert_eq!(
            to_html("- a\n  > q"),
            "<ul>\n<li>a\n<blockquote>\n<p>q</p>\n</blockquote>\n</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_link_rendering() {
        assert_eq!(
            to_html("[a & b](/x?y=1&z=2 \"T\\\"q\")"),
            "<p><a href=\"/x?y=1&amp;z=2\" title=\"T&quot;q\">a &amp; b</a></p>\n"
        );
    }

    #[test]
    fn test_inline_mix() {
        assert_eq!(
            to_html("**bold** `x` \\* &amp;  \nend"),
            "<p><strong>bold</strong> <code>x</code> * &amp;<br>\nend</p>\n"
        );
    }

    #[test]
    fn test_fence_info_uses_first_word() {
        let tokens = [Token::Fence {
            info: "js\\_x more".to_string(),
            content: "1\n".to_string(),
            map: crate::token::LineRange::new(0, 3),
        }];
        let mut writer = HtmlWriter::new();
        render_tokens(&tokens, &LinkRefStore::new(), &mut writer);
        assert_eq!(
            writer.as_str(),
            "<pre><code class=\"language-js_x\">1\n</code></pre>\n"
        );
    }
}
