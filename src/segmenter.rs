//! What every boundary detector has in common: the [`Segmenter`] trait, the
//! [`Boundary`] values it produces, and the rule status tags attached to them.

use std::fmt;

use smallvec::SmallVec;

use crate::text::{Position, TextBuffer};

/// The numeric label a rule attaches to the boundary it produces.
pub type RuleStatus = i32;

/// A boundary position together with the status tags of the rules that
/// produced it.
///
/// The tags are kept sorted and free of duplicates. Built-in segmenters
/// always attach exactly one tag; compiled rule tables attach every tag that
/// fired at the position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    position: Position,
    statuses: SmallVec<[RuleStatus; 2]>,
}

impl Boundary {
    pub fn new(position: Position, status: RuleStatus) -> Self {
        let mut statuses = SmallVec::new();
        statuses.push(status);
        Self { position, statuses }
    }

    /// Builds a boundary from any number of tags. No tags at all means the
    /// default status `0`.
    pub fn with_statuses(
        position: Position,
        statuses: impl IntoIterator<Item = RuleStatus>,
    ) -> Self {
        let mut statuses: SmallVec<[RuleStatus; 2]> = statuses.into_iter().collect();
        statuses.sort_unstable();
        statuses.dedup();
        if statuses.is_empty() {
            statuses.push(0);
        }
        Self { position, statuses }
    }

    /// The boundary every text has at its start.
    pub fn start() -> Self {
        Self::new(Position::START, 0)
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns the numerically largest tag.
    pub fn rule_status(&self) -> RuleStatus {
        self.statuses.last().copied().unwrap_or(0)
    }

    /// Returns all tags, in ascending order.
    pub fn rule_statuses(&self) -> &[RuleStatus] {
        &self.statuses
    }
}

/// A half-open range of rule status values that all mean the same kind of
/// boundary.
///
/// Status categories are ranges rather than single values so that rule sets
/// can subdivide a category (say, several kinds of "letter" words) without
/// breaking callers that only care about the category. Compare with
/// [`RuleStatusRange::contains`], never with equality on the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleStatusRange {
    start: RuleStatus,
    end: RuleStatus,
}

impl RuleStatusRange {
    /// Word boundaries after spaces, punctuation and other non-words.
    pub const WORD_NONE: Self = Self::new(0, 100);
    /// Word boundaries after numbers.
    pub const WORD_NUMBER: Self = Self::new(100, 200);
    /// Word boundaries after words containing letters.
    pub const WORD_LETTER: Self = Self::new(200, 300);
    /// Word boundaries after kana.
    pub const WORD_KANA: Self = Self::new(300, 400);
    /// Word boundaries after ideographs.
    pub const WORD_IDEO: Self = Self::new(400, 500);

    /// Line break opportunities where a break is allowed but not required.
    pub const LINE_SOFT: Self = Self::new(0, 100);
    /// Mandatory line breaks, after a hard line terminator.
    pub const LINE_HARD: Self = Self::new(100, 200);

    /// Sentence boundaries after terminating punctuation (or at the end).
    pub const SENTENCE_TERM: Self = Self::new(0, 100);
    /// Sentence boundaries after a paragraph separator.
    pub const SENTENCE_SEP: Self = Self::new(100, 200);

    pub const fn new(start: RuleStatus, end: RuleStatus) -> Self {
        Self { start, end }
    }

    /// The first value of the range, which the built-in segmenters report.
    pub const fn start(self) -> RuleStatus {
        self.start
    }

    pub const fn end(self) -> RuleStatus {
        self.end
    }

    pub const fn contains(self, status: RuleStatus) -> bool {
        self.start <= status && status < self.end
    }
}

/// Which way to look for a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// A deterministic boundary detector.
///
/// Implementations hold no per-text state: the result of every call depends
/// only on the text and the position passed in.
pub trait Segmenter: Send + Sync + fmt::Debug {
    /// Given a position `at` that is already known to be a boundary, returns
    /// the next boundary strictly after it, or `None` if `at` is the end of
    /// the text.
    fn following(&self, text: &TextBuffer, at: Position) -> Option<Boundary>;

    /// Returns the nearest boundary strictly after (for
    /// [`Direction::Forward`]) or strictly before (for
    /// [`Direction::Backward`]) `from`, which need not be a boundary itself.
    ///
    /// This walks forward from the start of the text. Cursors keep the walk
    /// they have already done instead of calling this repeatedly.
    fn nearest(&self, text: &TextBuffer, from: Position, direction: Direction) -> Option<Boundary> {
        let mut current = Boundary::start();
        match direction {
            Direction::Forward => loop {
                let next = self.following(text, current.position())?;
                if next.position() > from {
                    return Some(next);
                }
                current = next;
            },
            Direction::Backward => {
                let mut best = None;
                while current.position() < from {
                    let next = self.following(text, current.position());
                    best = Some(current);
                    match next {
                        Some(next) => current = next,
                        None => break,
                    }
                }
                best
            }
        }
    }
}
