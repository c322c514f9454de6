//! Parse and render stages tied together.

use std::borrow::Cow;

use crate::alert;
use crate::block::{BlockParser, BlockState, Ruler};
use crate::link_ref::LinkRefStore;
use crate::render::{render_tokens, HtmlWriter};
use crate::token::Token;
use crate::Options;

/// Result of the block pass: the token stream and the link definitions
/// collected while producing it.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub tokens: Vec<Token>,
    pub refs: LinkRefStore,
}

/// A configured parser. Build once, reuse for any number of documents.
///
/// # Example
/// ```
/// use alertmark::Pipeline;
///
/// let pipeline = Pipeline::default();
/// let doc = pipeline.parse(":::info\nHello\n:::");
/// assert_eq!(doc.tokens[0].name(), "alert_open");
/// assert_eq!(
///     pipeline.render(&doc),
///     "<div class=\"alert alert-info\" role=\"alert\" data-alert-type=\"info\">\n<p>Hello</p>\n</div>\n"
/// );
/// ```
#[derive(Debug)]
pub struct Pipeline {
    block: BlockParser,
}

impl Pipeline {
    /// Default block rules, plus the alert rule when `options.alerts` is set.
    pub fn new(options: Options) -> Self {
        let mut ruler = Ruler::with_defaults();
        if options.alerts {
            if let Err(err) = alert::register(&mut ruler) {
                log::error!("alert rule not registered: {err}");
            }
        }
        Self::with_ruler(ruler, options)
    }

    /// Use a caller-assembled rule list as is.
    pub fn with_ruler(ruler: Ruler, options: Options) -> Self {
        Self {
            block: BlockParser::new(ruler, options),
        }
    }

    pub fn block_parser(&self) -> &BlockParser {
        &self.block
    }

    /// Run the block pass over `input`.
    pub fn parse(&self, input: &str) -> Document {
        let src = normalize(input);
        let mut state = BlockState::new(&src);
        let end = state.line_max;
        self.block.tokenize(&mut state, 0, end);
        log::trace!("block pass produced {} tokens", state.tokens.len());
        Document {
            tokens: state.tokens,
            refs: state.refs,
        }
    }

    /// Render a parsed document.
    pub fn render(&self, doc: &Document) -> String {
        let mut writer = HtmlWriter::with_capacity(doc.tokens.len() * 32);
        render_tokens(&doc.tokens, &doc.refs, &mut writer);
        writer.into_string()
    }

    /// Parse and render in one step.
    pub fn to_html(&self, input: &str) -> String {
        let doc = self.parse(input);
        self.render(&doc)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

/// Normalize line endings to `\n` and replace NUL with U+FFFD.
fn normalize(input: &str) -> Cow<'_, str> {
    if !input.bytes().any(|b| b == b'\r' || b == 0) {
        return Cow::Borrowed(input);
    }
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            '\0' => out.push('\u{FFFD}'),
            ch => out.push(ch),
        }
    }
    Cow::Owned(out)
}
