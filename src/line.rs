//! Line break opportunities, as defined in
//! [UAX #14](https://www.unicode.org/reports/tr14/).
//!
//! The rules follow the Unicode 16.0 revision of the algorithm. They are
//! evaluated pairwise, between the resolved classes on either side of each
//! candidate position, with a little context carried forward for the rules
//! that look further back (spaces after `OP`, numbers, quotation marks,
//! regional indicator pairs). A boundary that follows a mandatory break
//! carries [`RuleStatusRange::LINE_HARD`]; every other boundary is
//! [`RuleStatusRange::LINE_SOFT`].

use std::sync::Arc;

use crate::properties::{GeneralCategory, LBProperty, PropertyOracle, UcdOracle};
use crate::segmenter::{Boundary, RuleStatus, RuleStatusRange, Segmenter};
use crate::text::{CharsBackward, Position, TextBuffer};

#[derive(Debug, Clone)]
pub struct LineSegmenter {
    oracle: Arc<dyn PropertyOracle>,
}

impl LineSegmenter {
    pub fn new() -> Self {
        Self::with_oracle(Arc::new(UcdOracle))
    }

    pub fn with_oracle(oracle: Arc<dyn PropertyOracle>) -> Self {
        Self { oracle }
    }

    fn behind<'a>(&'a self, text: &'a TextBuffer, at: Position) -> Behind<'a> {
        Behind {
            chars: text.chars_before(at),
            segmenter: self,
            held: None,
        }
    }

    /// The class after the character at `at`, skipping the combining marks
    /// that attach to it, with the character that carries it.
    fn second_ahead(&self, text: &TextBuffer, at: Position) -> Option<(LBProperty, char)> {
        text.chars_from(at)
            .skip(1)
            .map(|(_, c)| (resolve(self.oracle.as_ref(), c), c))
            .find(|(k, _)| !is_combining(*k))
    }

    /// Builds the context at `at` by looking backward from it. `a` is the
    /// character just before `at`.
    fn context(&self, text: &TextBuffer, at: Position, a: char) -> Context {
        use LBProperty::*;

        let oracle = self.oracle.as_ref();
        let raw_left = resolve(oracle, a);
        let mut behind = self.behind(text, at);
        let left = behind.next().unwrap_or((AL, a));
        let left2 = behind.next();
        let before_spaces = self.behind(text, at).map(|(k, _)| k).find(|k| *k != SP);
        let base = text
            .chars_before(at)
            .map(|(_, c)| resolve(oracle, c))
            .find(|k| !is_combining(*k));
        let mut quote = self.behind(text, at).skip_while(|(k, _)| *k == SP);
        let opening_quote = quote
            .next()
            .is_some_and(|(k, c)| k == QU && is_initial_quote(oracle, c))
            && quote.next().is_none_or(|(k, _)| opens_quote(k));

        Context {
            raw_left,
            left,
            left2,
            before_spaces,
            base,
            orphan_marks: is_combining(raw_left) && !base.is_some_and(|k| !is_base_exception(k)),
            // A boundary never splits a pair, so the walk that starts at one
            // pairs indicators afresh.
            unpaired: left.0 == RI,
            opening_quote,
            number: self.number_before(text, at),
        }
    }

    /// How far a number has got just before `at`, for LB25.
    fn number_before(&self, text: &TextBuffer, at: Position) -> Number {
        use LBProperty::*;

        let mut behind = self.behind(text, at).map(|(k, _)| k).peekable();
        let closed = behind.next_if(|k| matches!(k, CL | CP)).is_some();
        let mut digits = false;
        for k in behind {
            match k {
                NU => digits = true,
                SY | IS => {}
                _ => break,
            }
        }
        match (digits, closed) {
            (false, _) => Number::Outside,
            (true, false) => Number::Digits,
            (true, true) => Number::Closed,
        }
    }

    /// Decides whether there is a break opportunity at `at`, strictly inside
    /// the text, between the text summarized by `ctx` and `b`.
    fn is_break(&self, text: &TextBuffer, at: Position, ctx: &Context, b: char) -> bool {
        use LBProperty::*;

        let oracle = self.oracle.as_ref();
        let raw_left = ctx.raw_left;
        let raw_right = resolve(oracle, b);

        // LB4
        if raw_left == BK {
            return true;
        }
        // LB5
        if raw_left == CR && raw_right == LF {
            return false;
        }
        if matches!(raw_left, CR | LF | NL) {
            return true;
        }
        // LB6
        if raw_right.is_mandatory_break() {
            return false;
        }
        // LB7
        if matches!(raw_right, SP | ZW) {
            return false;
        }
        // LB8
        if ctx.before_spaces == Some(ZW) {
            return true;
        }
        // LB8a
        if raw_left == ZWJ {
            return false;
        }
        // LB9
        if is_combining(raw_right) && ctx.base.is_some_and(|k| !is_base_exception(k)) {
            return false;
        }
        // LB10: combining marks with no base act as AL.
        let right = if is_combining(raw_right) { AL } else { raw_right };

        let (left, left_char) = ctx.left;
        let left2 = ctx.left2.map(|(k, _)| k);
        let ahead = || self.second_ahead(text, at);
        let wide = |c: char| oracle.east_asian_wide(c);

        // LB11
        if right == WJ || left == WJ {
            return false;
        }
        // LB12
        if left == GL {
            return false;
        }
        // LB12a
        if right == GL && !matches!(left, SP | BA | HY | HH) {
            return false;
        }
        // LB13
        if matches!(right, CL | CP | EX | SY) {
            return false;
        }
        // LB14
        if ctx.before_spaces == Some(OP) {
            return false;
        }
        // LB15a
        if ctx.opening_quote {
            return false;
        }
        // LB15b
        if right == QU
            && is_final_quote(oracle, b)
            && ahead().is_none_or(|(k, _)| {
                matches!(k, SP | GL | WJ | CL | QU | CP | EX | IS | SY | ZW)
                    || k.is_mandatory_break()
            })
        {
            return false;
        }
        // LB15c
        if left == SP && right == IS && ahead().is_some_and(|(k, _)| k == NU) {
            return true;
        }
        // LB15d
        if right == IS {
            return false;
        }
        // LB16
        if matches!(ctx.before_spaces, Some(CL | CP)) && right == NS {
            return false;
        }
        // LB17
        if ctx.before_spaces == Some(B2) && right == B2 {
            return false;
        }
        // LB18
        if left == SP {
            return true;
        }
        // LB19
        if right == QU && !is_initial_quote(oracle, b) {
            return false;
        }
        if left == QU && !is_final_quote(oracle, left_char) {
            return false;
        }
        // LB19a
        if right == QU && (!wide(left_char) || ahead().is_none_or(|(_, c)| !wide(c))) {
            return false;
        }
        if left == QU && (!wide(b) || ctx.left2.is_none_or(|(_, c)| !wide(c))) {
            return false;
        }
        // LB20
        if right == CB || left == CB {
            return true;
        }
        // LB20a
        if matches!(left, HY | HH)
            && matches!(right, AL | HL)
            && left2.is_none_or(|k| matches!(k, SP | ZW | CB | GL) || k.is_mandatory_break())
        {
            return false;
        }
        // LB21
        if matches!(right, BA | HH | HY | NS) || left == BB {
            return false;
        }
        // LB21a
        if matches!(left, HY | HH) && left2 == Some(HL) && right != HL {
            return false;
        }
        // LB21b
        if left == SY && right == HL {
            return false;
        }
        // LB22
        if right == IN {
            return false;
        }
        // LB23
        if (matches!(left, AL | HL) && right == NU) || (left == NU && matches!(right, AL | HL)) {
            return false;
        }
        // LB23a
        if (left == PR && matches!(right, ID | EB | EM))
            || (matches!(left, ID | EB | EM) && right == PO)
        {
            return false;
        }
        // LB24
        if (matches!(left, PR | PO) && matches!(right, AL | HL))
            || (matches!(left, AL | HL) && matches!(right, PR | PO))
        {
            return false;
        }
        // LB25
        if self.inside_number(text, at, ctx.number, left, right) {
            return false;
        }
        // LB26
        if (left == JL && matches!(right, JL | JV | H2 | H3))
            || (matches!(left, JV | H2) && matches!(right, JV | JT))
            || (matches!(left, JT | H3) && right == JT)
        {
            return false;
        }
        // LB27
        let korean = |k: LBProperty| matches!(k, JL | JV | JT | H2 | H3);
        if (korean(left) && right == PO) || (left == PR && korean(right)) {
            return false;
        }
        // LB28
        if matches!(left, AL | HL) && matches!(right, AL | HL) {
            return false;
        }
        // LB28a
        if left == AP && is_aksara((right, b)) {
            return false;
        }
        if is_aksara(ctx.left) && matches!(right, VF | VI) {
            return false;
        }
        if left == VI && ctx.left2.is_some_and(is_aksara) && (right == AK || b == DOTTED_CIRCLE) {
            return false;
        }
        if is_aksara(ctx.left) && is_aksara((right, b)) && ahead().is_some_and(|(k, _)| k == VF) {
            return false;
        }
        // LB29
        if left == IS && matches!(right, AL | HL) {
            return false;
        }
        // LB30
        if matches!(left, AL | HL | NU) && right == OP && !wide(b) {
            return false;
        }
        if left == CP && matches!(right, AL | HL | NU) && !wide(left_char) {
            return false;
        }
        // LB30a
        if left == RI && right == RI {
            return !ctx.unpaired;
        }
        // LB30b
        if right == EM
            && (left == EB
                || (oracle.extended_pictographic(left_char)
                    && oracle.general_category(left_char) == GeneralCategory::Unassigned))
        {
            return false;
        }
        // LB31
        true
    }

    /// LB25, in its regular-expression form:
    /// `(PR | PO)? (OP | HY)? IS? NU (NU | SY | IS)* (CL | CP)? (PR | PO)?`
    /// is never broken inside.
    fn inside_number(
        &self,
        text: &TextBuffer,
        at: Position,
        number: Number,
        left: LBProperty,
        right: LBProperty,
    ) -> bool {
        use LBProperty::*;

        if matches!(left, PR | PO) && right == NU {
            return true;
        }
        if matches!(left, PR | PO)
            && matches!(right, OP | HY)
            && self.second_ahead(text, at).is_some_and(|(k, _)| k == NU)
        {
            return true;
        }
        if matches!(left, OP | HY | IS) && right == NU {
            return true;
        }
        match number {
            Number::Outside => false,
            Number::Digits => matches!(right, NU | SY | IS | CL | CP | PR | PO),
            Number::Closed => matches!(right, PR | PO),
        }
    }

    fn status_before(&self, text: &TextBuffer, at: Position) -> RuleStatus {
        let hard = text
            .char_before(at)
            .is_some_and(|(_, c)| resolve(self.oracle.as_ref(), c).is_mandatory_break());
        if hard {
            RuleStatusRange::LINE_HARD.start()
        } else {
            RuleStatusRange::LINE_SOFT.start()
        }
    }
}

impl Default for LineSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter for LineSegmenter {
    fn following(&self, text: &TextBuffer, at: Position) -> Option<Boundary> {
        let oracle = self.oracle.as_ref();
        let mut chars = text.chars_from(at);
        let (_, first) = chars.next()?;
        let mut context = None;
        let mut end = text.end();
        for (p, c) in chars {
            let ctx = context.get_or_insert_with(|| self.context(text, p, first));
            if self.is_break(text, p, ctx, c) {
                end = p;
                break;
            }
            ctx.advance(oracle, c);
        }
        Some(Boundary::new(end, self.status_before(text, end)))
    }
}

/// LB1: resolves the classes whose behavior depends on context this
/// implementation does not have.
fn resolve(oracle: &dyn PropertyOracle, c: char) -> LBProperty {
    use LBProperty::*;
    match oracle.line_break(c) {
        AI | SG | XX => AL,
        SA => match oracle.general_category(c) {
            GeneralCategory::NonspacingMark | GeneralCategory::SpacingMark => CM,
            _ => AL,
        },
        CJ => NS,
        k => k,
    }
}

fn is_combining(k: LBProperty) -> bool {
    matches!(k, LBProperty::CM | LBProperty::ZWJ)
}

/// Classes that combining marks cannot attach to (LB9).
fn is_base_exception(k: LBProperty) -> bool {
    k.is_mandatory_break() || matches!(k, LBProperty::SP | LBProperty::ZW)
}

/// Classes after which an initial quotation mark opens a quotation (LB15a).
fn opens_quote(k: LBProperty) -> bool {
    use LBProperty::*;
    k.is_mandatory_break() || matches!(k, OP | QU | GL | SP | ZW)
}

fn is_initial_quote(oracle: &dyn PropertyOracle, c: char) -> bool {
    oracle.general_category(c) == GeneralCategory::InitialPunctuation
}

fn is_final_quote(oracle: &dyn PropertyOracle, c: char) -> bool {
    oracle.general_category(c) == GeneralCategory::FinalPunctuation
}

/// Stands in for a missing base in Brahmic orthographies (LB28a).
const DOTTED_CIRCLE: char = '\u{25CC}';

fn is_aksara((k, c): (LBProperty, char)) -> bool {
    matches!(k, LBProperty::AK | LBProperty::AS) || c == DOTTED_CIRCLE
}

/// Progress through the digits of a number, for LB25.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Number {
    Outside,
    /// Seen `NU (NU | SY | IS)*`.
    Digits,
    /// Seen `NU (NU | SY | IS)* (CL | CP)`.
    Closed,
}

impl Number {
    fn advance(self, k: LBProperty) -> Self {
        use LBProperty::*;
        match (self, k) {
            (_, NU) => Number::Digits,
            (Number::Digits, SY | IS) => Number::Digits,
            (Number::Digits, CL | CP) => Number::Closed,
            _ => Number::Outside,
        }
    }
}

/// What the rules need to know about the text before a candidate position.
/// `following` builds it once, looking backward from its first candidate,
/// and then advances it one character at a time, so no rule has to rescan
/// a run of marks, spaces, digits or indicators.
#[derive(Debug, Clone, Copy)]
struct Context {
    /// The resolved class of the character just before the candidate.
    raw_left: LBProperty,
    /// The class before the candidate once LB9 and LB10 are applied, with
    /// the character that carries it.
    left: (LBProperty, char),
    left2: Option<(LBProperty, char)>,
    /// The nearest class that is not `SP`.
    before_spaces: Option<LBProperty>,
    /// The nearest class that is not a combining mark.
    base: Option<LBProperty>,
    /// `left` stands for combining marks that had nothing to attach to.
    orphan_marks: bool,
    /// `left` is a regional indicator still waiting for its pair.
    unpaired: bool,
    /// Seen `(sot | BK | CR | LF | NL | OP | QU | GL | SP | ZW) [\p{Pi}&QU] SP*`.
    opening_quote: bool,
    number: Number,
}

impl Context {
    fn advance(&mut self, oracle: &dyn PropertyOracle, c: char) {
        let k = resolve(oracle, c);
        self.raw_left = k;
        if !is_combining(k) {
            self.base = Some(k);
            self.orphan_marks = false;
            self.push(oracle, k, c);
            return;
        }
        // LB9
        if self.base.is_some_and(|b| !is_base_exception(b)) || self.orphan_marks {
            return;
        }
        // LB10
        self.orphan_marks = true;
        self.push(oracle, LBProperty::AL, c);
    }

    fn push(&mut self, oracle: &dyn PropertyOracle, k: LBProperty, c: char) {
        use LBProperty::*;

        self.opening_quote = match k {
            SP => self.opening_quote,
            QU => is_initial_quote(oracle, c) && opens_quote(self.left.0),
            _ => false,
        };
        self.unpaired = k == RI && !self.unpaired;
        self.number = self.number.advance(k);
        if k != SP {
            self.before_spaces = Some(k);
        }
        self.left2 = Some(self.left);
        self.left = (k, c);
    }
}

/// Walks resolved classes backward, nearest first, treating `X (CM | ZWJ)*`
/// as `X` (LB9) and unattached combining marks as `AL` (LB10). Each class
/// comes with the character that carries it.
struct Behind<'a> {
    chars: CharsBackward<'a>,
    segmenter: &'a LineSegmenter,
    held: Option<(LBProperty, char)>,
}

impl Iterator for Behind<'_> {
    type Item = (LBProperty, char);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(item) = self.held.take() {
            return Some(item);
        }
        let oracle = self.segmenter.oracle.as_ref();
        let mut mark = None;
        for (_, c) in self.chars.by_ref() {
            let k = resolve(oracle, c);
            if is_combining(k) {
                mark = Some(c);
                continue;
            }
            return match mark {
                Some(m) if is_base_exception(k) => {
                    self.held = Some((k, c));
                    Some((LBProperty::AL, m))
                }
                _ => Some((k, c)),
            };
        }
        mark.map(|m| (LBProperty::AL, m))
    }
}

#[cfg(test)]
mod tests;
