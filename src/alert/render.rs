//! HTML for alert open/close tokens.
//!
//! ```text
//! <details class="alert alert-spoiler">\n<summary>Title</summary>\n ... </details>\n
//! <div class="alert alert-info" role="alert" data-alert-type="info">\n ... </div>\n
//! ```
//!
//! Type and title are escaped with the five-character map exactly once.
//! Non-spoiler alerts do not render their title.

use smallvec::SmallVec;

use crate::render::HtmlWriter;
use crate::token::Token;

use super::AlertType;

/// Summary text for a spoiler without a title.
const SPOILER_LABEL: &str = "Spoiler";

/// Render the opening markup for the alert token at `idx`.
///
/// Returns an empty string if `tokens[idx]` is not an alert opener.
pub fn render_open(tokens: &[Token], idx: usize) -> String {
    let mut writer = HtmlWriter::with_capacity(96);
    if let Some(token) = tokens.get(idx) {
        if let Some(alert_type) = token.alert_type() {
            write_open(&mut writer, alert_type, token.alert_title());
        }
    }
    writer.into_string()
}

/// Render the closing markup for the alert close token at `idx`.
///
/// The close token carries no type, so the owning opener is found by
/// scanning backward past complete nested alerts. Without an opener the
/// generic `</div>` is used.
pub fn render_close(tokens: &[Token], idx: usize) -> String {
    let mut depth = 0usize;
    let mut owner = None;
    for token in tokens[..idx.min(tokens.len())].iter().rev() {
        match token {
            Token::AlertClose => depth += 1,
            Token::AlertOpen { alert_type, .. } if depth == 0 => {
                owner = Some(*alert_type);
                break;
            }
            Token::AlertOpen { .. } => depth -= 1,
            _ => {}
        }
    }
    closer(owner).to_string()
}

/// Open alerts during a render pass.
///
/// Pushed on every opener and popped on every closer, so each close finds
/// its type without rescanning the token stream.
#[derive(Debug, Default)]
pub struct AlertStack {
    open: SmallVec<[AlertType; 4]>,
}

impl AlertStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the opening markup and remember the type.
    pub fn open(&mut self, writer: &mut HtmlWriter, alert_type: AlertType, title: Option<&str>) {
        self.open.push(alert_type);
        write_open(writer, alert_type, title);
    }

    /// Write the closing markup for the innermost open alert.
    pub fn close(&mut self, writer: &mut HtmlWriter) {
        let owner = self.open.pop();
        if owner.is_none() {
            log::debug!("alert close without a matching open");
        }
        writer.write_str(closer(owner));
    }

    /// Number of alerts currently open.
    pub fn depth(&self) -> usize {
        self.open.len()
    }
}

fn write_open(writer: &mut HtmlWriter, alert_type: AlertType, title: Option<&str>) {
    let ty = alert_type.as_str().as_bytes();
    if alert_type.is_spoiler() {
        writer.write_str("<details class=\"alert alert-");
        writer.write_escaped_attr(ty);
        writer.write_str("\">\n<summary>");
        match title {
            Some(title) if !title.is_empty() => writer.write_escaped_attr(title.as_bytes()),
            _ => writer.write_str(SPOILER_LABEL),
        }
        writer.write_str("</summary>\n");
    } else {
        writer.write_str("<div class=\"alert alert-");
        writer.write_escaped_attr(ty);
        writer.write_str("\" role=\"alert\" data-alert-type=\"");
        writer.write_escaped_attr(ty);
        writer.write_str("\">\n");
    }
}

fn closer(owner: Option<AlertType>) -> &'static str {
    match owner {
        Some(AlertType::Spoiler) => "</details>\n",
        _ => "</div>\n",
    }
}
