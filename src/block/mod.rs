//! Block-level parser for Markdown.
//!
//! The block parser is line-oriented. A [`BlockState`] indexes the source by
//! line; an ordered [`Ruler`] of block rules is tried at each line, and the
//! first rule that claims the line pushes tokens and advances the cursor.
//! Container rules (blockquotes, list items, alerts) narrow the state and
//! call back into [`BlockParser::tokenize`] for their interior.
//!
//! Rules, in order:
//! - Indented code blocks
//! - Fenced code blocks
//! - Blockquotes
//! - Thematic breaks
//! - Lists
//! - Link reference definitions
//! - ATX headings
//! - Setext headings
//! - Paragraphs

mod parser;
mod ruler;
pub mod rules;
mod state;

pub use parser::BlockParser;
pub use ruler::{BlockRuleFn, Ruler, RulerError};
pub use state::{BlockState, ParentType};

/// Post-process tokens of a tight list: hide paragraphs that sit directly
/// inside its items.
///
/// `tokens` must start at the list's opening token. Since the list open is
/// pushed before its items are known to be tight, the paragraphs are patched
/// once the list is finished.
pub fn mark_tight_paragraphs(tokens: &mut [crate::Token]) {
    use crate::Token;

    // list open -> 1, list item open -> 2, paragraph open -> 3
    let mut depth: i32 = 0;
    for token in tokens.iter_mut() {
        match token {
            Token::ParagraphOpen { hidden } if depth == 2 => *hidden = true,
            Token::ParagraphClose { hidden } if depth == 3 => *hidden = true,
            _ => {}
        }
        depth += i32::from(token.nesting());
    }
}
