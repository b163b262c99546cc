use super::*;
use crate::properties::{CountingOracle, GCBProperty, SBProperty, WBProperty};

use pretty_assertions::assert_eq;

fn walk(text: &str) -> Vec<(usize, RuleStatus)> {
    walk_with(&LineSegmenter::new(), text)
}

fn walk_with(segmenter: &LineSegmenter, text: &str) -> Vec<(usize, RuleStatus)> {
    let text = TextBuffer::new(text);
    let mut got = vec![(0, 0)];
    let mut at = Position::START;
    while let Some(next) = segmenter.following(&text, at) {
        at = next.position();
        got.push((at.code_unit_offset(), next.rule_status()));
    }
    got
}

fn offsets(text: &str) -> Vec<usize> {
    walk(text).into_iter().map(|(offset, _)| offset).collect()
}

const HARD: RuleStatus = RuleStatusRange::LINE_HARD.start();

#[test]
fn spaces_newlines_and_dashes() {
    assert_eq!(
        walk("Here's some\npossible\u{2014}breaks."),
        &[(0, 0), (7, 0), (12, HARD), (20, 0), (21, 0), (28, 0)]
    );
}

#[test]
fn newline_kinds() {
    assert_eq!(walk("a\nb"), &[(0, 0), (2, HARD), (3, 0)]);
    assert_eq!(walk("a\r\nb"), &[(0, 0), (3, HARD), (4, 0)]);
    assert_eq!(walk("a\rb\n"), &[(0, 0), (2, HARD), (4, HARD)]);
}

#[test]
fn no_break_before_closing_punctuation() {
    assert_eq!(offsets("(hello) world!"), &[0, 8, 14]);
}

#[test]
fn numbers_hold_together() {
    assert_eq!(offsets("$(12.50) 3,000%"), &[0, 9, 15]);
}

#[test]
fn hyphens_break_after() {
    assert_eq!(offsets("well-known"), &[0, 5, 10]);
    // ...but not in front of a number.
    assert_eq!(offsets("a -5"), &[0, 2, 4]);
}

#[test]
fn ideographs_break_between() {
    assert_eq!(offsets("\u{4E00}\u{4E8C}\u{3002}"), &[0, 1, 3]);
}

#[test]
fn combining_mark_after_space() {
    // The mark attaches to nothing and acts as a letter.
    assert_eq!(offsets("a \u{0301}b"), &[0, 2, 4]);
}

#[test]
fn empty_text() {
    assert_eq!(walk(""), &[(0, 0)]);
}

#[test]
fn zero_width_space_allows_a_break() {
    // LB8 wins over the glue that follows, even across spaces.
    assert_eq!(offsets("a\u{200B}\u{00A0}b"), &[0, 2, 4]);
    assert_eq!(offsets("a\u{200B} \u{00A0}b"), &[0, 3, 5]);
}

#[test]
fn joiners_and_glue() {
    // LB11
    assert_eq!(offsets("\u{4E00}\u{2060}\u{4E00}"), &[0, 3]);
    // LB12, LB12a
    assert_eq!(offsets("\u{4E00}\u{00A0}\u{4E00}"), &[0, 3]);
    // ...but glue after a space does not hold on to it.
    assert_eq!(offsets("a \u{00A0}b"), &[0, 2, 4]);
}

#[test]
fn quotation_marks() {
    // LB19: a plain quote holds on to both neighbors.
    assert_eq!(offsets("\u{4E00}\"\u{4E00}\""), &[0, 4]);
    // LB15a: nothing breaks after an opening quote and its spaces.
    assert_eq!(offsets("a \u{201C} b"), &[0, 2, 5]);
    // LB15b: a closing quote stays with what it closes.
    assert_eq!(offsets("a \u{201D}"), &[0, 3]);
    assert_eq!(offsets("a \u{201D}b"), &[0, 2, 4]);
}

#[test]
fn infix_separator_after_space() {
    // LB15c breaks before a separator that starts a number...
    assert_eq!(offsets("x ,5"), &[0, 2, 4]);
    // ...and LB15d holds on to any other.
    assert_eq!(offsets("x ,y"), &[0, 4]);
}

#[test]
fn hyphens_next_to_letters() {
    assert_eq!(offsets("x-x"), &[0, 2, 3]);
    // LB20a: a hyphen that starts a word is not broken after.
    assert_eq!(offsets("-x"), &[0, 2]);
    assert_eq!(offsets("a -b"), &[0, 2, 4]);
    // LB21a: nor is one after a Hebrew letter, unless another one follows.
    assert_eq!(offsets("\u{05D0}-x"), &[0, 3]);
    assert_eq!(offsets("\u{05D0}-\u{05D1}"), &[0, 2, 3]);
}

#[test]
fn regional_indicators_pair_up() {
    assert_eq!(offsets("\u{1F1E6}\u{1F1E8}\u{1F1EA}"), &[0, 4, 6]);
    assert_eq!(offsets("\u{1F1E6}\u{0301}\u{1F1E8}\u{1F1EA}"), &[0, 5, 7]);
}

#[test]
fn emoji_modifiers() {
    // LB30b
    assert_eq!(offsets("\u{1F466}\u{1F3FB}"), &[0, 4]);
    assert_eq!(offsets("\u{1F466}\u{1F466}"), &[0, 2, 4]);
}

/// Brahmic orthography classes under letters: `k` Aksara, `s` Aksara_Start,
/// `p` Aksara_Prebase, `v` Virama, `f` Virama_Final, and ideographs for
/// everything else.
#[derive(Debug)]
struct Aksaras;

impl PropertyOracle for Aksaras {
    fn grapheme_break(&self, _c: char) -> GCBProperty {
        GCBProperty::None
    }

    fn word_break(&self, _c: char) -> WBProperty {
        WBProperty::Other
    }

    fn line_break(&self, c: char) -> LBProperty {
        match c {
            'k' => LBProperty::AK,
            's' => LBProperty::AS,
            'p' => LBProperty::AP,
            'v' => LBProperty::VI,
            'f' => LBProperty::VF,
            _ => LBProperty::ID,
        }
    }

    fn sentence_break(&self, _c: char) -> SBProperty {
        SBProperty::Other
    }

    fn general_category(&self, _c: char) -> GeneralCategory {
        GeneralCategory::OtherLetter
    }
}

#[test]
fn aksara_clusters() {
    let segmenter = LineSegmenter::with_oracle(Arc::new(Aksaras));
    let offsets = |text: &str| -> Vec<usize> {
        walk_with(&segmenter, text)
            .into_iter()
            .map(|(offset, _)| offset)
            .collect()
    };
    assert_eq!(offsets("kk"), &[0, 1, 2]);
    assert_eq!(offsets("kvk"), &[0, 3]);
    assert_eq!(offsets("kvx"), &[0, 2, 3]);
    assert_eq!(offsets("skf"), &[0, 3]);
    assert_eq!(offsets("pk"), &[0, 2]);
    assert_eq!(offsets("\u{25CC}vk"), &[0, 3]);
}

#[test]
fn long_runs_take_bounded_work() {
    const RUN: usize = 3000;
    let cases = [
        ("\u{1F1E6}".repeat(RUN), RUN / 2),
        (format!("a{}", "\u{0301}".repeat(RUN)), 1),
        ("1".repeat(RUN), 1),
        (format!("x{}y", " ".repeat(RUN)), 2),
    ];
    for (text, boundaries) in cases {
        let oracle = Arc::new(CountingOracle::default());
        let got = walk_with(&LineSegmenter::with_oracle(oracle.clone()), &text);
        assert_eq!(got.len(), boundaries + 1);
        let chars = text.chars().count();
        assert!(oracle.lookups() < 40 * chars, "{} lookups for {chars} chars", oracle.lookups());
    }
}
