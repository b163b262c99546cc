//! Sentence boundaries, as defined in
//! [UAX #29 Section 5](https://www.unicode.org/reports/tr29/#Sentence_Boundaries).

use std::sync::Arc;

use crate::properties::{PropertyOracle, SBProperty, UcdOracle};
use crate::segmenter::{Boundary, RuleStatus, RuleStatusRange, Segmenter};
use crate::text::{CharsBackward, Position, TextBuffer};

/// Finds sentence boundaries. A boundary produced by a paragraph separator
/// carries [`RuleStatusRange::SENTENCE_SEP`]; one produced by terminating
/// punctuation (or the end of the text) carries
/// [`RuleStatusRange::SENTENCE_TERM`].
#[derive(Debug, Clone)]
pub struct SentenceSegmenter {
    oracle: Arc<dyn PropertyOracle>,
}

impl SentenceSegmenter {
    pub fn new() -> Self {
        Self::with_oracle(Arc::new(UcdOracle))
    }

    pub fn with_oracle(oracle: Arc<dyn PropertyOracle>) -> Self {
        Self { oracle }
    }

    fn class(&self, c: char) -> SBProperty {
        self.oracle.sentence_break(c)
    }

    fn behind<'a>(&'a self, text: &'a TextBuffer, at: Position) -> Behind<'a> {
        Behind {
            chars: text.chars_before(at),
            oracle: self.oracle.as_ref(),
            held: None,
        }
    }

    /// SB8 looks ahead past anything that is not a letter, separator or
    /// terminator, for a lowercase letter.
    fn lower_follows(&self, text: &TextBuffer, at: Position) -> bool {
        use SBProperty::*;
        text.chars_from(at)
            .map(|(_, c)| self.class(c))
            .find(|k| matches!(k, OLetter | Upper | Lower) || k.is_para_sep() || k.is_sa_term())
            == Some(Lower)
    }

    /// How far the text before `at` has got through `SATerm Close* Sp*`,
    /// found by looking backward.
    fn terminated_before(&self, text: &TextBuffer, at: Position) -> Terminated {
        use SBProperty::*;

        let mut behind = self.behind(text, at).peekable();
        let mut spaces = false;
        while behind.next_if_eq(&Sp).is_some() {
            spaces = true;
        }
        while behind.next_if_eq(&Close).is_some() {}
        match behind.next().filter(|k| k.is_sa_term()) {
            None => Terminated::No,
            Some(term) if spaces => Terminated::Spaced(term),
            Some(term) => Terminated::Term(term),
        }
    }

    /// Decides whether `at`, strictly inside the text, is a sentence
    /// boundary, given the character `a` before it and `b` after it.
    fn is_break(
        &self,
        text: &TextBuffer,
        at: Position,
        terminated: Terminated,
        a: char,
        b: char,
    ) -> bool {
        use SBProperty::*;

        let (raw_left, right) = (self.class(a), self.class(b));

        // SB3
        if raw_left == CR && right == LF {
            return false;
        }
        // SB4
        if raw_left.is_para_sep() {
            return true;
        }
        // SB5
        if matches!(right, Extend | Format) {
            return false;
        }

        let mut behind = self.behind(text, at);
        let left = behind.next().unwrap_or(Other);
        let left2 = behind.next();

        // SB6
        if left == ATerm && right == Numeric {
            return false;
        }
        // SB7
        if matches!(left2, Some(Upper | Lower)) && left == ATerm && right == Upper {
            return false;
        }

        // The remaining rules apply after `SATerm Close* Sp*`.
        let (term, spaces) = match terminated {
            Terminated::No => {
                // SB998
                return false;
            }
            Terminated::Term(term) => (term, false),
            Terminated::Spaced(term) => (term, true),
        };

        // SB8a
        if matches!(right, SContinue | STerm | ATerm) {
            return false;
        }
        // SB9
        if !spaces && (matches!(right, Close | Sp) || right.is_para_sep()) {
            return false;
        }
        // SB10
        if right == Sp || right.is_para_sep() {
            return false;
        }
        // SB8, after SB8a to SB10 because it scans ahead.
        if term == ATerm && self.lower_follows(text, at) {
            return false;
        }
        // SB11
        true
    }

    fn status_before(&self, text: &TextBuffer, at: Position) -> RuleStatus {
        let separated = text
            .char_before(at)
            .is_some_and(|(_, c)| self.class(c).is_para_sep());
        if separated {
            RuleStatusRange::SENTENCE_SEP.start()
        } else {
            RuleStatusRange::SENTENCE_TERM.start()
        }
    }
}

impl Default for SentenceSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter for SentenceSegmenter {
    fn following(&self, text: &TextBuffer, at: Position) -> Option<Boundary> {
        let mut chars = text.chars_from(at);
        let (_, mut a) = chars.next()?;
        let mut terminated = None;
        let mut end = text.end();
        for (p, b) in chars {
            let state = *terminated.get_or_insert_with(|| self.terminated_before(text, p));
            if self.is_break(text, p, state, a, b) {
                end = p;
                break;
            }
            terminated = Some(state.advance(self.class(b)));
            a = b;
        }
        Some(Boundary::new(end, self.status_before(text, end)))
    }
}

/// Progress through `SATerm Close* Sp*`, the context rules SB8 to SB11
/// look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminated {
    No,
    /// Seen `SATerm Close*`, remembering which terminator.
    Term(SBProperty),
    /// Seen `SATerm Close* Sp+`.
    Spaced(SBProperty),
}

impl Terminated {
    fn advance(self, k: SBProperty) -> Self {
        use SBProperty::*;
        match (self, k) {
            // SB5
            (_, Extend | Format) => self,
            (_, k) if k.is_sa_term() => Terminated::Term(k),
            (Terminated::Term(term), Close) => Terminated::Term(term),
            (Terminated::Term(term) | Terminated::Spaced(term), Sp) => Terminated::Spaced(term),
            _ => Terminated::No,
        }
    }
}

/// Walks Sentence_Break classes backward, folding `Extend` and `Format` into
/// whatever precedes them (SB5).
struct Behind<'a> {
    chars: CharsBackward<'a>,
    oracle: &'a dyn PropertyOracle,
    held: Option<SBProperty>,
}

impl Iterator for Behind<'_> {
    type Item = SBProperty;

    fn next(&mut self) -> Option<SBProperty> {
        if let Some(k) = self.held.take() {
            return Some(k);
        }
        let mut pending = None;
        for (_, c) in self.chars.by_ref() {
            let k = self.oracle.sentence_break(c);
            if matches!(k, SBProperty::Extend | SBProperty::Format) {
                pending.get_or_insert(k);
                continue;
            }
            if let (true, Some(ignorable)) = (k.is_para_sep(), pending) {
                self.held = Some(k);
                return Some(ignorable);
            }
            return Some(k);
        }
        pending
    }
}
