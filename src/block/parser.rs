//! Block tokenizer driving the rule list.

use rustc_hash::FxHashMap;

use crate::Options;

use super::ruler::{BlockRuleFn, Ruler};
use super::state::BlockState;

/// Compiled block rule list plus the options rules may consult.
///
/// Immutable once built, so one parser can serve any number of documents.
pub struct BlockParser {
    ruler: Ruler,
    rules: Vec<BlockRuleFn>,
    chains: FxHashMap<&'static str, Vec<BlockRuleFn>>,
    options: Options,
}

impl BlockParser {
    /// Compile a rule list.
    pub fn new(ruler: Ruler, options: Options) -> Self {
        let rules = ruler.rules().collect();
        let mut chains: FxHashMap<&'static str, Vec<BlockRuleFn>> = FxHashMap::default();
        for key in ruler.chain_keys() {
            chains
                .entry(key)
                .or_insert_with(|| ruler.chain(key).collect());
        }
        Self {
            ruler,
            rules,
            chains,
            options,
        }
    }

    /// The rule list this parser was built from.
    pub fn ruler(&self) -> &Ruler {
        &self.ruler
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Rules that may interrupt the construct named `chain`.
    pub fn terminators(&self, chain: &str) -> &[BlockRuleFn] {
        self.chains.get(chain).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether any rule of `chain` would start a block at `line`.
    pub fn terminates(&self, chain: &str, state: &mut BlockState<'_>, line: usize, end_line: usize) -> bool {
        self.terminators(chain)
            .iter()
            .any(|rule| rule(state, self, line, end_line, true))
    }

    /// Tokenize lines `[start_line, end_line)` into `state.tokens`.
    ///
    /// Stops early at a line indented below `state.blk_indent`, leaving
    /// `state.line` on it for the enclosing container.
    pub fn tokenize(&self, state: &mut BlockState<'_>, start_line: usize, end_line: usize) {
        let mut line = start_line;
        let mut has_empty_lines = false;

        while line < end_line {
            line = state.skip_empty_lines(line);
            state.line = line;
            if line >= end_line {
                break;
            }

            // Outdented: the enclosing container ends here.
            if state.s_count[line] < state.blk_indent {
                break;
            }

            if state.level >= self.options.max_nesting {
                log::warn!(
                    "block nesting limit {} reached at line {line}, skipping to line {end_line}",
                    self.options.max_nesting
                );
                state.line = end_line;
                break;
            }

            let matched = self.rules.iter().any(|rule| rule(state, self, line, end_line, false));
            if !matched || state.line <= line {
                log::warn!("no block rule advanced past line {line}");
                state.line = line + 1;
            }

            state.tight = !has_empty_lines;

            // A block followed by a blank line makes the container loose.
            if state.is_empty(state.line - 1) {
                has_empty_lines = true;
            }

            line = state.line;
            if line < end_line && state.is_empty(line) {
                has_empty_lines = true;
                line += 1;
                state.line = line;
            }
        }
    }
}

impl std::fmt::Debug for BlockParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockParser")
            .field("ruler", &self.ruler)
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Token;

    fn parse(input: &str) -> Vec<Token> {
        let parser = BlockParser::new(Ruler::with_defaults(), Options::default());
        let mut state = BlockState::new(input);
        let end = state.line_max;
        parser.tokenize(&mut state, 0, end);
        state.tokens
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_blank_lines() {
        assert!(parse("\n\n   \n").is_empty());
    }

    #[test]
    fn test_paragraphs_separated_by_blank() {
        let tokens = parse("one\n\ntwo");
        let names: Vec<_> = tokens.iter().map(Token::name).collect();
        assert_eq!(
            names,
            [
                "paragraph_open",
                "inline",
                "paragraph_close",
                "paragraph_open",
                "inline",
                "paragraph_close"
            ]
        );
    }

    #[test]
    fn test_terminators_cached() {
        let parser = BlockParser::new(Ruler::with_defaults(), Options::default());
        assert_eq!(parser.terminators("paragraph").len(), 5);
        assert_eq!(parser.terminators("list").len(), 3);
        assert!(parser.terminators("nothing").is_empty());
    }

    #[test]
    fn test_nesting_limit_stops_descent() {
        let parser = BlockParser::new(
            Ruler::with_defaults(),
            Options {
                max_nesting: 2,
                ..Options::default()
            },
        );
        let mut state = BlockState::new("> > > > deep");
        let end = state.line_max;
        parser.tokenize(&mut state, 0, end);
        let opens = state
            .tokens
            .iter()
            .filter(|t| matches!(t, Token::BlockquoteOpen))
            .count();
        assert_eq!(opens, 2);
        assert_eq!(state.line, 1);
    }
}
