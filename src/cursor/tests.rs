use super::*;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::rules::compile_rules;
use crate::segmenter::RuleStatusRange;

const SENTENCE: &str = "This is the test, isn't it?";

fn cursor(axis: BreakAxis, text: &str) -> BoundaryCursor {
    BoundaryCursor::new(axis, None).with_text(text)
}

fn at(offset: usize) -> Position {
    Position::new_unchecked(offset)
}

fn offset(position: Option<Position>) -> Option<usize> {
    position.map(Position::code_unit_offset)
}

fn forward(cursor: &mut BoundaryCursor) -> Vec<usize> {
    let mut got = vec![cursor.first().unwrap().code_unit_offset()];
    while let Some(next) = cursor.next().unwrap() {
        got.push(next.code_unit_offset());
    }
    got
}

fn backward(cursor: &mut BoundaryCursor) -> Vec<usize> {
    let mut got = vec![cursor.last().unwrap().code_unit_offset()];
    while let Some(previous) = cursor.previous().unwrap() {
        got.push(previous.code_unit_offset());
    }
    got
}

#[test]
fn emoji_sequence_is_one_character() {
    let mut c = cursor(
        BreakAxis::Character,
        "a\u{1F937}\u{1F3FD}\u{200D}\u{2642}\u{FE0F}b",
    );
    assert_eq!(forward(&mut c), &[0, 1, 8, 9]);

    assert_eq!(c.is_boundary(at(3)), Ok(false));
    assert_eq!(offset(c.current()), Some(8));
    // Offset 2 is between the halves of a surrogate pair.
    assert_eq!(
        c.following(at(2)),
        Err(CursorError::Misaligned(MisalignedPosition::SplitsSurrogatePair { offset: 2 }))
    );
    assert_eq!(offset(c.current()), Some(8));
}

#[test]
fn words() {
    let mut c = cursor(BreakAxis::Word, SENTENCE);
    assert_eq!(c.first(), Ok(Position::START));
    assert!(RuleStatusRange::WORD_NONE.contains(c.rule_status().unwrap()));
    assert_eq!(offset(c.next().unwrap()), Some(4));
    assert!(RuleStatusRange::WORD_LETTER.contains(c.rule_status().unwrap()));

    assert_eq!(offset(c.following(at(2)).unwrap()), Some(4));
    assert_eq!(offset(c.preceding(at(20)).unwrap()), Some(18));
    assert_eq!(c.is_boundary(at(12)), Ok(true));
    assert_eq!(offset(c.current()), Some(12));
    assert_eq!(c.is_boundary(at(14)), Ok(false));
    assert_eq!(offset(c.current()), Some(16));

    assert_eq!(
        forward(&mut c),
        &[0, 4, 5, 7, 8, 11, 12, 16, 17, 18, 23, 24, 26, 27]
    );
}

#[test]
fn lines() {
    let mut c = cursor(BreakAxis::Line, "Here's some\npossible\u{2014}breaks.");
    assert_eq!(offset(c.following(at(15)).unwrap()), Some(20));
    assert_eq!(offset(c.preceding(at(18)).unwrap()), Some(12));
    assert_eq!(c.rule_status(), Some(RuleStatusRange::LINE_HARD.start()));
    assert_eq!(c.is_boundary(at(17)), Ok(false));
    assert_eq!(offset(c.current()), Some(20));
    assert!(RuleStatusRange::LINE_SOFT.contains(c.rule_status().unwrap()));
}

#[test]
fn sentences() {
    let mut c = cursor(
        BreakAxis::Sentence,
        "Here's a sentence. Another one\nAnd one more?",
    );
    assert_eq!(offset(c.following(at(15)).unwrap()), Some(19));
    assert_eq!(offset(c.preceding(at(35)).unwrap()), Some(31));
    assert!(RuleStatusRange::SENTENCE_SEP.contains(c.rule_status().unwrap()));
    assert_eq!(c.is_boundary(at(28)), Ok(false));
    assert_eq!(offset(c.current()), Some(31));
    assert_eq!(backward(&mut c), &[44, 31, 19, 0]);
}

#[test]
fn ends_of_text() {
    let mut c = cursor(BreakAxis::Word, "one two");
    assert_eq!(c.last(), Ok(at(7)));
    assert_eq!(c.next(), Ok(None));
    assert_eq!(offset(c.current()), Some(7));
    assert_eq!(c.following(at(7)), Ok(None));
    assert_eq!(c.seek_following(at(7)), Ok(Some(at(7))));

    assert_eq!(c.first(), Ok(Position::START));
    assert_eq!(c.previous(), Ok(None));
    assert_eq!(c.preceding(Position::START), Ok(None));
    assert_eq!(c.current(), Some(Position::START));
}

#[test]
fn empty_text_has_one_boundary() {
    let mut c = cursor(BreakAxis::Line, "");
    assert_eq!(c.first(), Ok(Position::START));
    assert_eq!(c.last(), Ok(Position::START));
    assert_eq!(c.next(), Ok(None));
    assert_eq!(c.is_boundary(Position::START), Ok(true));
}

#[test]
fn unpositioned() {
    let mut c = cursor(BreakAxis::Word, SENTENCE);
    assert_eq!(c.current(), None);
    assert_eq!(c.rule_status(), None);
    assert_eq!(c.rule_statuses(), &[] as &[RuleStatus]);
    assert_eq!(c.previous(), Ok(None));
    assert_eq!(c.current(), None);
    assert_eq!(offset(c.next().unwrap()), Some(4));
}

#[test]
fn replacing_the_text_unpositions_the_cursor() {
    let mut c = cursor(BreakAxis::Word, SENTENCE);
    c.last().unwrap();
    c.set_text(Some(Arc::new(TextBuffer::new("one two"))));
    assert_eq!(c.current(), None);
    assert_eq!(offset(c.next().unwrap()), Some(3));
    assert!(RuleStatusRange::WORD_LETTER.contains(c.rule_status().unwrap()));
    assert_eq!(c.text().map(|t| t.as_str()), Some("one two"));
}

#[test]
fn no_text() {
    let mut c = BoundaryCursor::new(BreakAxis::Sentence, Some("en_US"));
    assert_eq!(c.locale(), Some("en_US"));
    assert_eq!(c.first(), Err(CursorError::NoText));
    assert_eq!(c.last(), Err(CursorError::NoText));
    assert_eq!(c.next(), Err(CursorError::NoText));
    assert_eq!(c.previous(), Err(CursorError::NoText));
    assert_eq!(c.following(Position::START), Err(CursorError::NoText));
    assert_eq!(c.is_boundary(Position::START), Err(CursorError::NoText));
    assert_eq!(c.boundaries().count(), 0);

    let mut c = cursor(BreakAxis::Word, SENTENCE);
    c.next().unwrap();
    c.set_text(None);
    assert_eq!(c.current(), None);
    assert_eq!(c.next(), Err(CursorError::NoText));
}

#[test]
fn positions_past_the_end() {
    let mut c = cursor(BreakAxis::Word, "short");
    c.first().unwrap();
    let far = TextBuffer::new("a much longer text").end();
    assert_eq!(c.seek_following(far), Ok(None));
    assert_eq!(c.following(far), Ok(None));
    assert_eq!(c.is_boundary(far), Ok(false));
    assert_eq!(c.current(), Some(Position::START));

    assert_eq!(offset(c.preceding(far).unwrap()), Some(5));
    assert_eq!(c.current(), Some(c.text().unwrap().end()));
}

#[test]
fn rule_tables() {
    let table =
        compile_rules(r"[A-Z]{100}; [\p{Lu}]{200}; [0-9]{300}; [\p{N}]{400}; !.*;").unwrap();
    let mut c = BoundaryCursor::with_rules(Arc::new(table)).with_text("AB12");
    c.first().unwrap();
    assert_eq!(c.rule_statuses(), &[0]);
    assert_eq!(offset(c.next().unwrap()), Some(1));
    assert_eq!(c.rule_statuses(), &[100, 200]);
    assert_eq!(c.rule_status(), Some(200));
    assert_eq!(offset(c.next().unwrap()), Some(2));
    assert_eq!(offset(c.next().unwrap()), Some(3));
    assert_eq!(c.rule_statuses(), &[300, 400]);
    assert_eq!(offset(c.next().unwrap()), Some(4));
    assert_eq!(c.next(), Ok(None));
    assert_eq!(c.locale(), None);
}

#[test]
fn boundaries_iterator_leaves_the_cursor_alone() {
    let mut c = cursor(BreakAxis::Word, "one two");
    c.first().unwrap();
    let all: Vec<_> = c
        .boundaries()
        .map(|b| (b.position().code_unit_offset(), b.rule_status()))
        .collect();
    assert_eq!(
        all,
        &[
            (0, 0),
            (3, RuleStatusRange::WORD_LETTER.start()),
            (4, 0),
            (7, RuleStatusRange::WORD_LETTER.start()),
        ]
    );
    assert_eq!(c.current(), Some(Position::START));
}

const AXES: [BreakAxis; 4] = [
    BreakAxis::Character,
    BreakAxis::Word,
    BreakAxis::Line,
    BreakAxis::Sentence,
];

const SAMPLE: &str = "[a-zA-Z0-9 .,!?'\n\u{E9}\u{301}\u{4E00}\u{30AB}\u{1F600}]{0,30}";

proptest! {
    #[test]
    fn forward_walk_is_monotonic(text in SAMPLE) {
        for axis in AXES {
            let mut c = cursor(axis, &text);
            let walk = forward(&mut c);
            prop_assert!(walk.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(walk.first().copied(), Some(0));
            prop_assert_eq!(walk.last().copied(), Some(text.encode_utf16().count()));
        }
    }

    #[test]
    fn backward_walk_mirrors_forward_walk(text in SAMPLE) {
        for axis in AXES {
            let mut c = cursor(axis, &text);
            let mut walk = forward(&mut c);
            walk.reverse();
            let mut fresh = cursor(axis, &text);
            prop_assert_eq!(backward(&mut fresh), walk);
        }
    }

    #[test]
    fn is_boundary_is_idempotent(
        text in "[a-z .!\n\u{E9}\u{301}\u{1F600}]{0,20}",
        pick in any::<prop::sample::Index>(),
    ) {
        let buffer = TextBuffer::new(text.as_str());
        let position = buffer
            .position_of_scalar(pick.index(buffer.scalar_count() + 1))
            .unwrap_or(buffer.end());
        for axis in AXES {
            let mut c = cursor(axis, &text);
            let first = c.is_boundary(position).unwrap();
            let after_first = c.current();
            prop_assert_eq!(c.is_boundary(position).unwrap(), first);
            prop_assert_eq!(c.current(), after_first);
        }
    }

    #[test]
    fn following_and_preceding_agree_with_the_walk(
        text in "[a-z .!\n\u{E9}\u{1F600}]{0,20}",
        pick in any::<prop::sample::Index>(),
    ) {
        let buffer = TextBuffer::new(text.as_str());
        let position = buffer
            .position_of_scalar(pick.index(buffer.scalar_count() + 1))
            .unwrap_or(buffer.end());
        let p = position.code_unit_offset();
        for axis in AXES {
            let walk = forward(&mut cursor(axis, &text));
            let mut c = cursor(axis, &text);
            prop_assert_eq!(
                offset(c.following(position).unwrap()),
                walk.iter().copied().find(|&b| b > p)
            );
            prop_assert_eq!(
                offset(c.preceding(position).unwrap()),
                walk.iter().copied().rev().find(|&b| b < p)
            );
        }
    }
}
