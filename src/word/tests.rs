use super::*;
use crate::properties::{CountingOracle, GCBProperty, GeneralCategory, LBProperty, SBProperty};

use pretty_assertions::assert_eq;

fn walk(segmenter: &WordSegmenter, text: &str) -> Vec<(usize, RuleStatus)> {
    let text = TextBuffer::new(text);
    let mut got = vec![(0, 0)];
    let mut at = Position::START;
    while let Some(next) = segmenter.following(&text, at) {
        at = next.position();
        got.push((at.code_unit_offset(), next.rule_status()));
    }
    got
}

#[test]
fn english_sentence() {
    let got = walk(&WordSegmenter::new(), "This is the test, isn't it?");
    let offsets: Vec<usize> = got.iter().map(|(offset, _)| *offset).collect();
    assert_eq!(
        offsets,
        &[0, 4, 5, 7, 8, 11, 12, 16, 17, 18, 23, 24, 26, 27]
    );

    let letters: Vec<usize> = got
        .iter()
        .filter(|(_, status)| RuleStatusRange::WORD_LETTER.contains(*status))
        .map(|(offset, _)| *offset)
        .collect();
    assert_eq!(letters, &[4, 7, 11, 16, 23, 26]);
    assert!(
        got.iter()
            .filter(|(offset, _)| !letters.contains(offset))
            .all(|(_, status)| RuleStatusRange::WORD_NONE.contains(*status))
    );
}

#[test]
fn numbers_and_mixed() {
    let got = walk(&WordSegmenter::new(), "3.14 abc42 ,");
    assert_eq!(
        got,
        &[
            (0, 0),
            (4, RuleStatusRange::WORD_NUMBER.start()),
            (5, 0),
            (10, RuleStatusRange::WORD_LETTER.start()),
            (11, 0),
            (12, 0),
        ]
    );
}

#[test]
fn kana_and_ideographs() {
    let got = walk(&WordSegmenter::new(), "\u{30AB}\u{30BF}\u{4E00}");
    assert_eq!(
        got,
        &[
            (0, 0),
            (2, RuleStatusRange::WORD_KANA.start()),
            (3, RuleStatusRange::WORD_IDEO.start()),
        ]
    );
}

#[test]
fn crlf_stays_together() {
    let got = walk(&WordSegmenter::new(), "a\r\nb");
    let offsets: Vec<usize> = got.iter().map(|(offset, _)| *offset).collect();
    assert_eq!(offsets, &[0, 1, 3, 4]);
}

fn offsets(text: &str) -> Vec<usize> {
    walk(&WordSegmenter::new(), text)
        .into_iter()
        .map(|(offset, _)| offset)
        .collect()
}

#[test]
fn joined_emoji() {
    // WB3c
    assert_eq!(offsets("\u{1F468}\u{200D}\u{1F469}"), &[0, 5]);
    assert_eq!(offsets("\u{1F468}\u{1F469}"), &[0, 2, 4]);
}

#[test]
fn hebrew_quotes() {
    // WB7a
    assert_eq!(offsets("\u{05D0}'"), &[0, 2]);
    // WB7b, WB7c: a double quote inside a Hebrew word, as in acronyms.
    assert_eq!(offsets("\u{05D0}\"\u{05D1}"), &[0, 3]);
    assert_eq!(offsets("\u{05D0}\""), &[0, 1, 2]);
    assert_eq!(offsets("a\"b"), &[0, 1, 2, 3]);
}

#[test]
fn long_runs_take_bounded_work() {
    const RUN: usize = 3000;
    let cases = [
        ("\u{1F1E6}".repeat(RUN), RUN / 2),
        (format!("a{}", "\u{0301}".repeat(RUN)), 1),
        (" ".repeat(RUN), 1),
        ("1".repeat(RUN), 1),
    ];
    for (text, boundaries) in cases {
        let oracle = Arc::new(CountingOracle::default());
        let got = walk(&WordSegmenter::with_oracle(oracle.clone()), &text);
        assert_eq!(got.len(), boundaries + 1);
        let chars = text.chars().count();
        assert!(oracle.lookups() < 40 * chars, "{} lookups for {chars} chars", oracle.lookups());
    }
}

#[test]
fn empty_text() {
    assert_eq!(walk(&WordSegmenter::new(), ""), &[(0, 0)]);
}

/// A tiny alphabet: lowercase letters, digits, `.` as MidNumLet, `'` as a
/// single quote, `^` as Extend, `R` as a regional indicator, space.
#[derive(Debug)]
struct Toy;

impl PropertyOracle for Toy {
    fn grapheme_break(&self, c: char) -> GCBProperty {
        match c {
            '^' => GCBProperty::Extend,
            'R' => GCBProperty::RegionalIndicator,
            _ => GCBProperty::None,
        }
    }

    fn word_break(&self, c: char) -> WBProperty {
        match c {
            'a'..='z' => WBProperty::ALetter,
            '0'..='9' => WBProperty::Numeric,
            '.' => WBProperty::MidNumLet,
            '\'' => WBProperty::SingleQuote,
            '^' => WBProperty::Extend,
            'R' => WBProperty::RegionalIndicator,
            ' ' => WBProperty::WSegSpace,
            '\n' => WBProperty::LF,
            _ => WBProperty::Other,
        }
    }

    fn line_break(&self, _c: char) -> LBProperty {
        LBProperty::AL
    }

    fn sentence_break(&self, _c: char) -> SBProperty {
        SBProperty::Other
    }

    fn general_category(&self, _c: char) -> GeneralCategory {
        GeneralCategory::Unassigned
    }
}

fn toy_offsets(text: &str) -> Vec<usize> {
    let segmenter = WordSegmenter::with_oracle(Arc::new(Toy));
    walk(&segmenter, text).into_iter().map(|(offset, _)| offset).collect()
}

#[test]
fn mid_letter_needs_letters_on_both_sides() {
    assert_eq!(toy_offsets("a.b"), &[0, 3]);
    assert_eq!(toy_offsets("a."), &[0, 1, 2]);
    assert_eq!(toy_offsets("1.5"), &[0, 3]);
    assert_eq!(toy_offsets("1.a"), &[0, 1, 2, 3]);
}

#[test]
fn extenders_are_transparent() {
    // WB4 lets the extender ride along with the letter before it, and the
    // letters on either side still join.
    assert_eq!(toy_offsets("a^b"), &[0, 3]);
    assert_eq!(toy_offsets("a^.^b"), &[0, 5]);
    // After a newline there is nothing to attach to.
    assert_eq!(toy_offsets("\n^a"), &[0, 1, 2, 3]);
}

#[test]
fn regional_indicators_pair_up() {
    assert_eq!(toy_offsets("RRR"), &[0, 2, 3]);
    assert_eq!(toy_offsets("RR^RR"), &[0, 3, 5]);
}

#[test]
fn spaces_stay_together() {
    assert_eq!(toy_offsets("a   b"), &[0, 1, 4, 5]);
}
