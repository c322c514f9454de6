//! DoS prevention constants.
//!
//! These limits keep pathological inputs linear: nesting is bounded, and
//! scans that could otherwise rescan the same bytes stop early.

/// Maximum nesting depth for block containers (lists, blockquotes, alerts)
pub const MAX_BLOCK_NESTING: u32 = 32;

/// Maximum bracket depth in link labels [[[...]]]
pub const MAX_BRACKET_DEPTH: usize = 8;

/// Maximum number of unmatched emphasis openers kept on the stack
pub const MAX_DELIMITER_STACK: usize = 64;

/// Maximum number of delimiter marks collected per inline run
pub const MAX_INLINE_MARKS: usize = 4096;

/// Maximum backtick run length for code spans (prevents O(n^2) matching)
/// Longer runs are treated as literal text
pub const MAX_CODE_SPAN_BACKTICKS: usize = 32;

/// Maximum parentheses nesting in link destinations (CommonMark: 32)
pub const MAX_LINK_PAREN_DEPTH: usize = 32;

/// Maximum digits in ordered list marker (prevents big-integer parsing)
pub const MAX_LIST_MARKER_DIGITS: usize = 9;

/// Maximum length of a named or numeric character reference, `&` to `;`
pub const MAX_ENTITY_LEN: usize = 32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_reasonable() {
        const { assert!(MAX_BLOCK_NESTING >= 16) };
        const { assert!(MAX_BLOCK_NESTING <= 64) };
        const { assert!(MAX_CODE_SPAN_BACKTICKS >= 16) };
        const { assert!(MAX_DELIMITER_STACK <= MAX_INLINE_MARKS) };
    }
}
