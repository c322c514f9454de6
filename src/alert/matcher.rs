use crate::block::{BlockParser, BlockState, ParentType};
use crate::token::{LineRange, Token};

use super::AlertType;

const MARKER: &str = ":::";

/// Block rule for `:::type [title]` ... `:::`.
///
/// In silent mode only the opening line is validated. Otherwise the rule
/// scans for the closing `:::`, stopping early at a non-empty line indented
/// below `state.blk_indent` or at `end_line` (an implicit close). The
/// interior is tokenized as ordinary blocks with the line ceiling lowered
/// to the closing boundary. An explicit closer is consumed; the line that
/// stopped an implicit close is left for the next rule.
pub fn try_match_alert_block(
    state: &mut BlockState<'_>,
    parser: &BlockParser,
    start_line: usize,
    end_line: usize,
    silent: bool,
) -> bool {
    let pos = state.content_start(start_line);
    let max = state.e_marks[start_line];
    if pos + MARKER.len() > max || !state.src[pos..max].starts_with(MARKER) {
        return false;
    }
    if state.s_count[start_line] - state.blk_indent >= 4 {
        return false;
    }

    let Some((alert_type, title)) = parse_opener(&state.src[pos + MARKER.len()..max]) else {
        log::trace!("line {start_line}: `:::` without a known alert type");
        return false;
    };
    if silent {
        return true;
    }

    let (stop_line, explicit_close) = find_close(state, start_line, end_line);
    if !explicit_close {
        log::trace!("alert `{alert_type}` at line {start_line} closed implicitly at line {stop_line}");
    }

    state.push(Token::AlertOpen {
        alert_type,
        title,
        map: LineRange::new(start_line, stop_line),
    });

    let parse_interior = explicit_close || parser.options().alerts_parse_unterminated;
    if parse_interior && stop_line > start_line + 1 {
        state.with_ceiling(stop_line, ParentType::Alert, |state| {
            parser.tokenize(state, start_line + 1, stop_line);
        });
    }

    state.push(Token::AlertClose);
    state.line = stop_line + usize::from(explicit_close);
    true
}

/// Split the text after `:::` into a type and an optional title.
///
/// The first whitespace-separated word is the type; the remaining words,
/// joined by single spaces, form the title.
fn parse_opener(params: &str) -> Option<(AlertType, Option<String>)> {
    let mut words = params.split_whitespace();
    let alert_type = AlertType::parse(words.next()?)?;

    let mut title = String::new();
    for word in words {
        if !title.is_empty() {
            title.push(' ');
        }
        title.push_str(word);
    }
    Some((alert_type, (!title.is_empty()).then_some(title)))
}

/// Find the line that ends the block opened at `start_line`.
///
/// Returns the stop line and whether it holds an explicit `:::` closer.
fn find_close(state: &BlockState<'_>, start_line: usize, end_line: usize) -> (usize, bool) {
    let mut line = start_line + 1;
    while line < end_line {
        let text = state.line_text(line);
        // Outdented: the enclosing container ends here.
        if !text.is_empty() && state.s_count[line] < state.blk_indent {
            return (line, false);
        }
        if text.trim() == MARKER {
            return (line, true);
        }
        line += 1;
    }
    (end_line, false)
}
