//! Boundary rules compiled from source text.
//!
//! A rule source is a sequence of statements, each ending in `;`:
//!
//! ```text
//! # Comments run to the end of the line.
//! !!chain;                      # an option
//! $Letter = [\p{L} \p{M}];      # a variable
//! $Letter+ {200};               # a rule, tagged with status 200
//! [0-9]+ / [a-z] {100};         # `/` puts the boundary before the letter
//! !.*;                          # a reverse rule
//! ```
//!
//! Rule expressions are regular expressions over characters and character
//! sets. Sets use the usual bracket syntax (`[a-z]`, `[^...]`, nested sets
//! with `-` and `&`) plus property expressions such as `\p{Lu}`,
//! `\p{Line_Break=NU}` or `[:^L:]`, all answered by a [`PropertyOracle`].
//!
//! Starting at a boundary, the next boundary is at the end of the longest
//! forward rule match (or at its `/`), and it carries the tags of every rule
//! whose match ended there. Where no rule matches, the boundary is after the
//! next character with status `0`.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::properties::{LBProperty, PropertyOracle, UcdOracle};
use crate::segmenter::{Boundary, RuleStatus, Segmenter};
use crate::text::{Position, TextBuffer};

mod error;
mod parser;
mod program;
mod scanner;
mod set;

pub use error::{Location, ParseError, ParseErrorContext, ParseErrorKind};

use parser::{ParsedRule, Parser};
use program::Program;

/// Behavior switches set by `!!` statements in the rule source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RuleOptions {
    /// `!!chain`: a match may continue into another one that starts on its
    /// last character.
    pub chain: bool,
    /// `!!lookAheadHardBreak`: a match containing `/` is preferred over any
    /// longer match without one.
    pub lookahead_hard_break: bool,
    /// `!!LBCMNoChain`: chaining never starts from a combining mark
    /// (`Line_Break=CM`).
    pub lb_cm_no_chain: bool,
    /// `!!quoted_literals_only`: literal characters in rules must be quoted
    /// or escaped.
    pub quoted_literals_only: bool,
}

/// The rule lists a source can add to. `!!forward`, `!!reverse`,
/// `!!safe_forward` and `!!safe_reverse` choose where the following rules
/// go; a rule starting with `!` always goes to the reverse list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleList {
    Forward,
    Reverse,
    SafeForward,
    SafeReverse,
}

#[derive(Debug, Clone)]
struct CompiledRule {
    program: Program,
    tag: RuleStatus,
    no_chain_in: bool,
}

impl From<ParsedRule> for CompiledRule {
    fn from(rule: ParsedRule) -> Self {
        Self {
            program: Program::compile(&rule.node),
            tag: rule.tag,
            no_chain_in: rule.no_chain_in,
        }
    }
}

/// A compiled rule set, usable as a [`Segmenter`].
///
/// Tables are immutable once compiled; share one between any number of
/// cursors with [`Arc`].
///
/// Only the forward rules take part in finding boundaries. Reverse and safe
/// rules are checked and kept, and backward movement is derived from the
/// forward boundaries instead.
#[derive(Debug, Clone)]
pub struct RuleTable {
    forward: Vec<CompiledRule>,
    reverse: Vec<CompiledRule>,
    safe_forward: Vec<CompiledRule>,
    safe_reverse: Vec<CompiledRule>,
    options: RuleOptions,
    oracle: Arc<dyn PropertyOracle>,
}

/// The winning forward match from one starting point.
struct Longest {
    end: Position,
    mark: Option<Position>,
    tags: SmallVec<[RuleStatus; 2]>,
}

impl RuleTable {
    pub fn options(&self) -> RuleOptions {
        self.options
    }

    /// Returns the number of rules in one of the table's lists.
    pub fn rule_count(&self, list: RuleList) -> usize {
        match list {
            RuleList::Forward => self.forward.len(),
            RuleList::Reverse => self.reverse.len(),
            RuleList::SafeForward => self.safe_forward.len(),
            RuleList::SafeReverse => self.safe_reverse.len(),
        }
    }

    fn longest(&self, text: &TextBuffer, start: Position, chaining: bool) -> Option<Longest> {
        let oracle = self.oracle.as_ref();
        let matches: Vec<_> = self
            .forward
            .iter()
            .filter(|rule| !(chaining && rule.no_chain_in))
            .filter_map(|rule| Some((rule.tag, rule.program.longest_match(text, start, oracle)?)))
            .filter(|(_, m)| m.end > start)
            .collect();

        let marked_only =
            self.options.lookahead_hard_break && matches.iter().any(|(_, m)| m.mark.is_some());
        let candidates: Vec<_> = matches
            .into_iter()
            .filter(|(_, m)| !marked_only || m.mark.is_some())
            .collect();

        let end = candidates.iter().map(|(_, m)| m.end).max()?;
        let mut longest = Longest {
            end,
            mark: None,
            tags: SmallVec::new(),
        };
        for (tag, m) in candidates.into_iter().filter(|(_, m)| m.end == end) {
            longest.mark = longest.mark.or(m.mark);
            longest.tags.push(tag);
        }
        Some(longest)
    }
}

impl Segmenter for RuleTable {
    fn following(&self, text: &TextBuffer, at: Position) -> Option<Boundary> {
        let first = text.char_at(at)?;
        let step = Position::new_unchecked(at.code_unit_offset() + first.len_utf16());
        let Some(mut found) = self.longest(text, at, false) else {
            return Some(Boundary::new(step, 0));
        };

        if self.options.chain && found.mark.is_none() {
            while let Some((last, c)) = text.char_before(found.end) {
                if self.options.lb_cm_no_chain && self.oracle.line_break(c) == LBProperty::CM {
                    break;
                }
                match self.longest(text, last, true) {
                    Some(next) if next.end > found.end => {
                        let marked = next.mark.is_some();
                        found = next;
                        if marked {
                            break;
                        }
                    }
                    _ => break,
                }
            }
        }

        let position = found.mark.filter(|&mark| mark > at).unwrap_or(found.end);
        Some(Boundary::with_statuses(position, found.tags))
    }
}

/// Compiles a rule source against the Unicode Character Database.
///
/// # Errors
///
/// Returns the first problem found in the source. Nothing is compiled unless
/// the whole source is valid.
pub fn compile_rules(source: &str) -> Result<RuleTable, ParseError> {
    compile_rules_with(source, Arc::new(UcdOracle))
}

/// Compiles a rule source whose property expressions are answered by
/// `oracle`, which the resulting table also uses for matching.
///
/// # Errors
///
/// As for [`compile_rules`], and [`ParseErrorKind::InitializationError`] if
/// [`PropertyOracle::check`] reports that the oracle is unusable.
pub fn compile_rules_with(
    source: &str,
    oracle: Arc<dyn PropertyOracle>,
) -> Result<RuleTable, ParseError> {
    if let Err(reason) = oracle.check() {
        tracing::debug!(%reason, "property data unavailable; not compiling rules");
        return Err(ParseError {
            kind: ParseErrorKind::InitializationError,
            context: ParseErrorContext::at_offset(0),
        });
    }

    let parsed = Parser::new(source).parse().inspect_err(|err| {
        tracing::debug!(
            kind = ?err.kind,
            location = %err.context.location,
            "rule compilation failed"
        );
    })?;

    let compile = |rules: Vec<ParsedRule>| -> Vec<CompiledRule> {
        rules.into_iter().map(CompiledRule::from).collect()
    };
    let table = RuleTable {
        forward: compile(parsed.forward),
        reverse: compile(parsed.reverse),
        safe_forward: compile(parsed.safe_forward),
        safe_reverse: compile(parsed.safe_reverse),
        options: parsed.options,
        oracle,
    };
    tracing::debug!(
        forward = table.forward.len(),
        reverse = table.reverse.len(),
        safe_forward = table.safe_forward.len(),
        safe_reverse = table.safe_reverse.len(),
        options = ?table.options,
        "compiled boundary rules",
    );
    Ok(table)
}
