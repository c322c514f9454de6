//! Link reference definitions and the link syntax shared with inline links.

use html_escape::decode_html_entities;
use rustc_hash::FxHashMap;

use crate::limits;

/// A link reference definition (URL + optional title), already unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRefDef {
    pub url: String,
    pub title: Option<String>,
}

/// Store of link reference definitions, keyed by normalized label.
#[derive(Debug, Default, Clone)]
pub struct LinkRefStore {
    by_label: FxHashMap<String, LinkRefDef>,
}

impl LinkRefStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition if the label is new. First definition wins.
    pub fn insert(&mut self, label: String, def: LinkRefDef) {
        self.by_label.entry(label).or_insert(def);
    }

    /// Look up a raw (not yet normalized) label.
    pub fn lookup(&self, raw_label: &str) -> Option<&LinkRefDef> {
        if self.by_label.is_empty() {
            return None;
        }
        self.by_label.get(&normalize_label(raw_label))
    }

    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }
}

/// Normalize a link label: collapse internal whitespace to single spaces,
/// trim, and case-fold.
pub fn normalize_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut last_was_space = true;

    for ch in label.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
            continue;
        }

        last_was_space = false;
        if ch == 'ß' || ch == 'ẞ' {
            out.push_str("ss");
        } else {
            out.extend(ch.to_lowercase());
        }
    }

    if out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Remove backslash escapes and decode entities.
pub fn unescape_all(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut unescaped = String::with_capacity(text.len());
    let mut last = 0;
    let mut pos = 0;
    while pos + 1 < bytes.len() {
        if bytes[pos] == b'\\' && bytes[pos + 1].is_ascii_punctuation() {
            unescaped.push_str(&text[last..pos]);
            last = pos + 1;
            pos += 2;
        } else {
            pos += 1;
        }
    }
    unescaped.push_str(&text[last..]);
    decode_html_entities(&unescaped).into_owned()
}

/// Find the `]` closing a label that opens with `[` at `start`.
///
/// Backslash escapes and code spans are skipped. With `nested`, balanced
/// inner brackets are allowed; otherwise an inner `[` fails the label.
pub fn parse_link_label(src: &[u8], start: usize, max: usize, nested: bool) -> Option<usize> {
    debug_assert_eq!(src.get(start), Some(&b'['));
    let mut level = 1usize;
    let mut pos = start + 1;

    while pos < max {
        match src[pos] {
            b'\\' => {
                pos += 2;
                continue;
            }
            b'[' => {
                if !nested || level >= limits::MAX_BRACKET_DEPTH {
                    return None;
                }
                level += 1;
            }
            b']' => {
                level -= 1;
                if level == 0 {
                    return Some(pos);
                }
            }
            b'`' => {
                let run_end = skip_run(src, pos, max, b'`');
                let len = run_end - pos;
                pos = find_closing_backticks(src, run_end, max, len).map_or(run_end, |close| close + len);
                continue;
            }
            _ => {}
        }
        pos += 1;
    }
    None
}

/// Parse a link destination at `pos`. Returns the unescaped URL and the
/// position after it.
pub fn parse_link_destination(src: &[u8], mut pos: usize, max: usize) -> Option<(String, usize)> {
    let start = pos;

    if pos < max && src[pos] == b'<' {
        pos += 1;
        while pos < max {
            match src[pos] {
                b'\n' | b'<' => return None,
                b'>' => {
                    let raw = std::str::from_utf8(&src[start + 1..pos]).ok()?;
                    return Some((unescape_all(raw), pos + 1));
                }
                b'\\' if pos + 1 < max => pos += 2,
                _ => pos += 1,
            }
        }
        return None;
    }

    let mut level = 0usize;
    while pos < max {
        let b = src[pos];
        if b == b' ' || b < 0x20 || b == 0x7f {
            break;
        }
        if b == b'\\' && pos + 1 < max {
            if src[pos + 1] == b' ' {
                break;
            }
            pos += 2;
            continue;
        }
        if b == b'(' {
            level += 1;
            if level > limits::MAX_LINK_PAREN_DEPTH {
                return None;
            }
        }
        if b == b')' {
            if level == 0 {
                break;
            }
            level -= 1;
        }
        pos += 1;
    }

    if start == pos || level != 0 {
        return None;
    }
    let raw = std::str::from_utf8(&src[start..pos]).ok()?;
    Some((unescape_all(raw), pos))
}

/// Parse a link title (`"..."`, `'...'` or `(...)`) at `pos`. Returns the
/// unescaped title, the position after it, and the number of newlines
/// crossed.
pub fn parse_link_title(src: &[u8], mut pos: usize, max: usize) -> Option<(String, usize, usize)> {
    if pos >= max {
        return None;
    }
    let marker = match src[pos] {
        b'"' => b'"',
        b'\'' => b'\'',
        b'(' => b')',
        _ => return None,
    };
    let start = pos + 1;
    pos = start;
    let mut lines = 0;

    while pos < max {
        let b = src[pos];
        if b == marker {
            let raw = std::str::from_utf8(&src[start..pos]).ok()?;
            return Some((unescape_all(raw), pos + 1, lines));
        }
        if b == b'(' && marker == b')' {
            return None;
        }
        if b == b'\n' {
            lines += 1;
        } else if b == b'\\' && pos + 1 < max {
            pos += 1;
            if src[pos] == b'\n' {
                lines += 1;
            }
        }
        pos += 1;
    }
    None
}

/// Reject script-capable URL schemes. `data:` is allowed for raster images
/// only.
pub fn is_allowed_url(url: &str) -> bool {
    let url = url.trim_start().as_bytes();
    let has_scheme = |scheme: &[u8]| url.len() >= scheme.len() && url[..scheme.len()].eq_ignore_ascii_case(scheme);

    if has_scheme(b"javascript:") || has_scheme(b"vbscript:") || has_scheme(b"file:") {
        return false;
    }
    if has_scheme(b"data:") {
        const IMAGES: [&[u8]; 4] = [b"data:image/gif;", b"data:image/png;", b"data:image/jpeg;", b"data:image/webp;"];
        return IMAGES.iter().any(|ok| has_scheme(*ok));
    }
    true
}

#[inline]
pub(crate) fn skip_run(src: &[u8], mut pos: usize, max: usize, ch: u8) -> usize {
    while pos < max && src[pos] == ch {
        pos += 1;
    }
    pos
}

/// Start of the next backtick run of exactly `len` at or after `pos`.
pub(crate) fn find_closing_backticks(src: &[u8], mut pos: usize, max: usize, len: usize) -> Option<usize> {
    if len > limits::MAX_CODE_SPAN_BACKTICKS {
        return None;
    }
    while pos < max {
        let next = memchr::memchr(b'`', &src[pos..max])? + pos;
        let run_end = skip_run(src, next, max, b'`');
        if run_end - next == len {
            return Some(next);
        }
        pos = run_end;
    }
    None
}
