//! Ordered list of named block rules.

use smallvec::SmallVec;
use thiserror::Error;

use super::parser::BlockParser;
use super::state::BlockState;

/// A block rule.
///
/// Called with the line to try, the exclusive end of the region, and a
/// `silent` flag. In silent mode the rule only reports whether it would
/// match, without pushing tokens or moving `state.line`. Otherwise a
/// matching rule pushes its tokens, advances `state.line`, and returns
/// `true`.
pub type BlockRuleFn =
    fn(state: &mut BlockState<'_>, parser: &BlockParser, start_line: usize, end_line: usize, silent: bool) -> bool;

/// Errors raised while editing a rule list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulerError {
    #[error("no block rule named `{0}`")]
    UnknownRule(String),
    #[error("a block rule named `{0}` is already registered")]
    DuplicateRule(String),
}

#[derive(Clone)]
struct RuleEntry {
    name: &'static str,
    func: BlockRuleFn,
    /// Chains (constructs) this rule may interrupt.
    alt: SmallVec<[&'static str; 4]>,
    enabled: bool,
}

/// Ordered, named block rules.
///
/// Besides the main order, each rule lists the constructs it may
/// terminate. A paragraph, for example, asks every rule in the
/// `"paragraph"` chain whether the next line starts a new block.
#[derive(Clone, Default)]
pub struct Ruler {
    rules: Vec<RuleEntry>,
}

impl Ruler {
    /// An empty rule list.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard CommonMark block rules, without extensions.
    pub fn with_defaults() -> Self {
        use super::rules;

        const ALL: &[&str] = &["paragraph", "reference", "blockquote", "list"];
        const NO_LIST: &[&str] = &["paragraph", "reference", "blockquote"];
        const NONE: &[&str] = &[];

        let defaults: [(&'static str, BlockRuleFn, &[&'static str]); 9] = [
            ("code", rules::code as BlockRuleFn, NONE),
            ("fence", rules::fence as BlockRuleFn, ALL),
            ("blockquote", rules::blockquote as BlockRuleFn, ALL),
            ("hr", rules::hr as BlockRuleFn, ALL),
            ("list", rules::list as BlockRuleFn, NO_LIST),
            ("reference", rules::reference as BlockRuleFn, NONE),
            ("heading", rules::heading as BlockRuleFn, NO_LIST),
            ("lheading", rules::lheading as BlockRuleFn, NONE),
            ("paragraph", rules::paragraph as BlockRuleFn, NONE),
        ];

        let mut ruler = Self::new();
        for (name, func, alt) in defaults {
            ruler.rules.push(RuleEntry::new(name, func, alt));
        }
        ruler
    }

    /// Append a rule at the end.
    pub fn push(&mut self, name: &'static str, func: BlockRuleFn, alt: &[&'static str]) -> Result<(), RulerError> {
        self.ensure_unique(name)?;
        self.rules.push(RuleEntry::new(name, func, alt));
        Ok(())
    }

    /// Insert a rule directly before the rule named `before`.
    pub fn insert_before(
        &mut self,
        before: &str,
        name: &'static str,
        func: BlockRuleFn,
        alt: &[&'static str],
    ) -> Result<(), RulerError> {
        self.ensure_unique(name)?;
        let idx = self.position(before)?;
        self.rules.insert(idx, RuleEntry::new(name, func, alt));
        Ok(())
    }

    /// Insert a rule directly after the rule named `after`.
    pub fn insert_after(
        &mut self,
        after: &str,
        name: &'static str,
        func: BlockRuleFn,
        alt: &[&'static str],
    ) -> Result<(), RulerError> {
        self.ensure_unique(name)?;
        let idx = self.position(after)?;
        self.rules.insert(idx + 1, RuleEntry::new(name, func, alt));
        Ok(())
    }

    /// Disable a rule without removing it.
    pub fn disable(&mut self, name: &str) -> Result<(), RulerError> {
        let idx = self.position(name)?;
        self.rules[idx].enabled = false;
        Ok(())
    }

    /// Names of all rules, enabled or not, in order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.name)
    }

    /// Enabled rules in order.
    pub fn rules(&self) -> impl Iterator<Item = BlockRuleFn> + '_ {
        self.rules.iter().filter(|r| r.enabled).map(|r| r.func)
    }

    /// Enabled rules that may interrupt `chain`, in order.
    pub fn chain<'s>(&'s self, chain: &'s str) -> impl Iterator<Item = BlockRuleFn> + 's {
        self.chain_entries(chain).map(|r| r.func)
    }

    /// Names of the enabled rules that may interrupt `chain`.
    pub fn chain_names<'s>(&'s self, chain: &'s str) -> impl Iterator<Item = &'static str> + 's {
        self.chain_entries(chain).map(|r| r.name)
    }

    /// All chain names mentioned by any rule.
    pub(crate) fn chain_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().flat_map(|r| r.alt.iter().copied())
    }

    fn chain_entries<'s>(&'s self, chain: &'s str) -> impl Iterator<Item = &'s RuleEntry> + 's {
        self.rules
            .iter()
            .filter(move |r| r.enabled && r.alt.iter().any(|a| *a == chain))
    }

    fn position(&self, name: &str) -> Result<usize, RulerError> {
        self.rules
            .iter()
            .position(|r| r.name == name)
            .ok_or_else(|| RulerError::UnknownRule(name.to_string()))
    }

    fn ensure_unique(&self, name: &str) -> Result<(), RulerError> {
        if self.rules.iter().any(|r| r.name == name) {
            return Err(RulerError::DuplicateRule(name.to_string()));
        }
        Ok(())
    }
}

impl RuleEntry {
    fn new(name: &'static str, func: BlockRuleFn, alt: &[&'static str]) -> Self {
        Self {
            name,
            func,
            alt: SmallVec::from_slice(alt),
            enabled: true,
        }
    }
}

impl std::fmt::Debug for Ruler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
