//! HTML escaping utilities.
//!
//! Two escape sets are in use:
//! - text content: `&`, `<`, `>`, `"`
//! - alert fields (type, title): the same plus `'`, which becomes `&#039;`
//!
//! Both scan for the first escapable byte with `memchr` and bulk-copy the
//! segments between escapes. Neither is entity-aware: escaping already
//! escaped text escapes it again.

use std::borrow::Cow;

use memchr::{memchr, memchr2, memchr3};

/// Lookup table for bytes escaped in text content.
const TEXT_ESCAPE_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    table[b'<' as usize] = true;
    table[b'>' as usize] = true;
    table[b'&' as usize] = true;
    table[b'"' as usize] = true;
    table
};

/// Lookup table for the five-character map.
const HTML_ESCAPE_TABLE: [bool; 256] = {
    let mut table = TEXT_ESCAPE_TABLE;
    table[b'\'' as usize] = true;
    table
};

#[inline]
fn entity_for(b: u8) -> &'static [u8] {
    match b {
        b'&' => b"&amp;",
        b'<' => b"&lt;",
        b'>' => b"&gt;",
        b'"' => b"&quot;",
        b'\'' => b"&#039;",
        _ => unreachable!("byte {b:#x} is not in an escape table"),
    }
}

/// Escape text content into the output buffer.
///
/// # Example
/// ```
/// use alertmark::escape::escape_text_into;
///
/// let mut out = Vec::new();
/// escape_text_into(&mut out, b"<b> & \"q\"");
/// assert_eq!(out, b"&lt;b&gt; &amp; &quot;q&quot;");
/// ```
#[inline]
pub fn escape_text_into(out: &mut Vec<u8>, input: &[u8]) {
    let first = min_opt(memchr3(b'<', b'>', b'&', input), memchr(b'"', input));
    escape_from(out, input, first, &TEXT_ESCAPE_TABLE);
}

/// Escape with the five-character map into the output buffer.
#[inline]
pub fn escape_html_into(out: &mut Vec<u8>, input: &[u8]) {
    escape_from(out, input, first_html_escape(input), &HTML_ESCAPE_TABLE);
}

/// Escape `&`, `<`, `>`, `"` and `'` for embedding in markup.
///
/// Returns the input unchanged (borrowed) when nothing needs escaping.
///
/// # Example
/// ```
/// use alertmark::escape::escape_html;
///
/// assert_eq!(escape_html("<script>&\"'"), "&lt;script&gt;&amp;&quot;&#039;");
/// assert_eq!(escape_html("plain"), "plain");
/// ```
pub fn escape_html(text: &str) -> Cow<'_, str> {
    let bytes = text.as_bytes();
    let Some(first) = first_html_escape(bytes) else {
        return Cow::Borrowed(text);
    };
    let mut out = Vec::with_capacity(bytes.len() + bytes.len() / 4 + 8);
    escape_from(&mut out, bytes, Some(first), &HTML_ESCAPE_TABLE);
    // Only ASCII entity sequences replace ASCII bytes, so UTF-8 is preserved.
    match String::from_utf8(out) {
        Ok(s) => Cow::Owned(s),
        Err(_) => unreachable!("escaping preserves UTF-8"),
    }
}

fn escape_from(out: &mut Vec<u8>, input: &[u8], first: Option<usize>, table: &[bool; 256]) {
    let Some(mut pos) = first else {
        out.extend_from_slice(input);
        return;
    };
    out.extend_from_slice(&input[..pos]);

    while pos < input.len() {
        let scan_start = pos;
        while pos < input.len() && !table[input[pos] as usize] {
            pos += 1;
        }
        if pos > scan_start {
            out.extend_from_slice(&input[scan_start..pos]);
        }
        if pos < input.len() {
            out.extend_from_slice(entity_for(input[pos]));
            pos += 1;
        }
    }
}

#[inline]
fn first_html_escape(input: &[u8]) -> Option<usize> {
    min_opt(memchr3(b'<', b'>', b'&', input), memchr2(b'"', b'\'', input))
}

#[inline]
fn min_opt(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Percent-encode a link destination and escape it for an attribute value.
///
/// Unreserved and reserved URL characters pass through, as do existing
/// `%XX` sequences; everything else (spaces, brackets, control and non-ASCII
/// bytes) is percent-encoded. `&` is then entity-escaped.
pub fn write_link_url(out: &mut Vec<u8>, url: &[u8]) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let mut pos = 0;
    while pos < url.len() {
        let b = url[pos];
        match b {
            b'%' if pos + 2 < url.len()
                && url[pos + 1].is_ascii_hexdigit()
                && url[pos + 2].is_ascii_hexdigit() =>
            {
                out.extend_from_slice(&url[pos..pos + 3]);
                pos += 3;
                continue;
            }
            b'&' => out.extend_from_slice(b"&amp;"),
            b'a'..=b'z'
            | b'A'..=b'Z'
            | b'0'..=b'9'
            | b';'
            | b'/'
            | b'?'
            | b':'
            | b'@'
            | b'='
            | b'+'
            | b'$'
            | b','
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')'
            | b'#' => out.push(b),
            _ => {
                out.push(b'%');
                out.push(HEX[(b >> 4) as usize]);
                out.push(HEX[(b & 0xF) as usize]);
            }
        }
        pos += 1;
    }
}
