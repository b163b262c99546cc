//! Word boundaries, as defined in
//! [UAX #29 Section 4](https://www.unicode.org/reports/tr29/#Word_Boundaries).
//!
//! Every boundary carries the category of the segment that ends there (see
//! the `WORD_*` constants on [`RuleStatusRange`]), which is how callers tell
//! words apart from the spaces and punctuation between them.

use std::sync::Arc;

use crate::properties::{PropertyOracle, UcdOracle, WBProperty};
use crate::segmenter::{Boundary, RuleStatus, RuleStatusRange, Segmenter};
use crate::text::{CharsBackward, Position, TextBuffer};

#[derive(Debug, Clone)]
pub struct WordSegmenter {
    oracle: Arc<dyn PropertyOracle>,
}

impl WordSegmenter {
    pub fn new() -> Self {
        Self::with_oracle(Arc::new(UcdOracle))
    }

    pub fn with_oracle(oracle: Arc<dyn PropertyOracle>) -> Self {
        Self { oracle }
    }

    fn class(&self, c: char) -> WBProperty {
        self.oracle.word_break(c)
    }

    /// Word_Break classes before `at`, nearest first, with rule WB4 applied.
    fn behind<'a>(&'a self, text: &'a TextBuffer, at: Position) -> Behind<'a> {
        Behind {
            chars: text.chars_before(at),
            oracle: self.oracle.as_ref(),
            held: None,
        }
    }

    /// The class of the first character after the one at `at` that rule
    /// WB4 does not fold away.
    fn second_ahead(&self, text: &TextBuffer, at: Position) -> Option<WBProperty> {
        text.chars_from(at)
            .skip(1)
            .map(|(_, c)| self.class(c))
            .find(|k| !k.is_ignorable())
    }

    /// Decides whether `at`, strictly inside the text, is a word boundary.
    /// `unpaired` says whether the regional indicator before `at`, if any,
    /// is still waiting for its pair.
    fn is_break(&self, text: &TextBuffer, at: Position, unpaired: bool) -> bool {
        use WBProperty::*;

        let (Some((_, a)), Some(b)) = (text.char_before(at), text.char_at(at)) else {
            // WB1, WB2
            return true;
        };
        let (raw_left, right) = (self.class(a), self.class(b));

        // WB3
        if raw_left == CR && right == LF {
            return false;
        }
        // WB3a, WB3b
        if raw_left.is_newline() || right.is_newline() {
            return true;
        }
        // WB3c
        if raw_left == ZWJ && self.oracle.extended_pictographic(b) {
            return false;
        }
        // WB3d
        if raw_left == WSegSpace && right == WSegSpace {
            return false;
        }
        // WB4
        if right.is_ignorable() {
            return false;
        }

        let mut behind = self.behind(text, at);
        let left = behind.next().unwrap_or(Other);
        let left2 = behind.next();
        let ah_letter = |k: Option<WBProperty>| k.is_some_and(WBProperty::is_ah_letter);
        let mid_letter = |k: WBProperty| k == MidLetter || k.is_mid_num_let_q();
        let mid_num = |k: WBProperty| k == MidNum || k.is_mid_num_let_q();

        // WB5
        if left.is_ah_letter() && right.is_ah_letter() {
            return false;
        }
        // WB6
        if left.is_ah_letter() && mid_letter(right) && ah_letter(self.second_ahead(text, at)) {
            return false;
        }
        // WB7
        if ah_letter(left2) && mid_letter(left) && right.is_ah_letter() {
            return false;
        }
        // WB7a
        if left == HebrewLetter && right == SingleQuote {
            return false;
        }
        // WB7b
        if left == HebrewLetter
            && right == DoubleQuote
            && self.second_ahead(text, at) == Some(HebrewLetter)
        {
            return false;
        }
        // WB7c
        if left2 == Some(HebrewLetter) && left == DoubleQuote && right == HebrewLetter {
            return false;
        }
        // WB8, WB9, WB10
        if (left == Numeric || left.is_ah_letter()) && (right == Numeric || right.is_ah_letter()) {
            return false;
        }
        // WB11
        if left2 == Some(Numeric) && mid_num(left) && right == Numeric {
            return false;
        }
        // WB12
        if left == Numeric && mid_num(right) && self.second_ahead(text, at) == Some(Numeric) {
            return false;
        }
        // WB13
        if left == Katakana && right == Katakana {
            return false;
        }
        // WB13a
        if (left.is_ah_letter() || matches!(left, Numeric | Katakana | ExtendNumLet))
            && right == ExtendNumLet
        {
            return false;
        }
        // WB13b
        if left == ExtendNumLet && (right.is_ah_letter() || matches!(right, Numeric | Katakana)) {
            return false;
        }
        // WB15, WB16
        if left == RegionalIndicator && right == RegionalIndicator {
            return !unpaired;
        }
        // WB999
        true
    }

    /// Carries the regional indicator parity past `c`. Ignorables leave it
    /// alone (WB4); anything else ends the run.
    fn unpaired_after(&self, unpaired: bool, c: char) -> bool {
        match self.class(c) {
            WBProperty::RegionalIndicator => !unpaired,
            k if k.is_ignorable() => unpaired,
            _ => false,
        }
    }

    /// Categorizes the segment `start..end`: kana, ideographs, words with
    /// letters, numbers, or none of those.
    fn segment_status(&self, text: &TextBuffer, start: Position, end: Position) -> RuleStatus {
        let chars = || {
            text.chars_from(start)
                .take_while(move |&(p, _)| p < end)
                .map(|(_, c)| c)
        };
        let Some(first) = chars().find(|&c| !self.class(c).is_ignorable()) else {
            return RuleStatusRange::WORD_NONE.start();
        };
        let range = if self.class(first) == WBProperty::Katakana {
            RuleStatusRange::WORD_KANA
        } else if self.oracle.is_ideographic(first) || self.oracle.is_hiragana(first) {
            RuleStatusRange::WORD_IDEO
        } else if chars().any(|c| self.class(c).is_ah_letter()) {
            RuleStatusRange::WORD_LETTER
        } else if chars().any(|c| self.class(c) == WBProperty::Numeric) {
            RuleStatusRange::WORD_NUMBER
        } else {
            RuleStatusRange::WORD_NONE
        };
        range.start()
    }
}

impl Default for WordSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter for WordSegmenter {
    fn following(&self, text: &TextBuffer, at: Position) -> Option<Boundary> {
        let mut chars = text.chars_from(at);
        let (_, first) = chars.next()?;
        // A boundary never splits a pair of regional indicators, so the
        // pairing starts afresh at `at`.
        let mut unpaired = self.unpaired_after(false, first);
        let mut end = text.end();
        for (p, c) in chars {
            if self.is_break(text, p, unpaired) {
                end = p;
                break;
            }
            unpaired = self.unpaired_after(unpaired, c);
        }
        Some(Boundary::new(end, self.segment_status(text, at, end)))
    }
}

/// Walks Word_Break classes backward, folding `Extend`, `Format` and `ZWJ`
/// into whatever precedes them (WB4). An ignorable with nothing to attach to
/// (at the start of text or right after a newline) is reported as itself.
struct Behind<'a> {
    chars: CharsBackward<'a>,
    oracle: &'a dyn PropertyOracle,
    held: Option<WBProperty>,
}

impl Iterator for Behind<'_> {
    type Item = WBProperty;

    fn next(&mut self) -> Option<WBProperty> {
        if let Some(k) = self.held.take() {
            return Some(k);
        }
        let mut pending = None;
        for (_, c) in self.chars.by_ref() {
            let k = self.oracle.word_break(c);
            if k.is_ignorable() {
                pending.get_or_insert(k);
                continue;
            }
            if let (true, Some(ignorable)) = (k.is_newline(), pending) {
                self.held = Some(k);
                return Some(ignorable);
            }
            return Some(k);
        }
        pending
    }
}

#[cfg(test)]
mod tests;
