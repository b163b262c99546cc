use super::*;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

const SENTENCE: &str = "This is the test, isn't it?";

fn at(offset: usize) -> Position {
    Position::new_unchecked(offset)
}

fn offset(found: Result<Option<Position>, CursorError>) -> Option<usize> {
    found.unwrap().map(Position::code_unit_offset)
}

fn all_forward(cursor: &mut SearchCursor) -> Vec<usize> {
    let mut got = Vec::new();
    let mut found = offset(cursor.first());
    while let Some(start) = found {
        got.push(start);
        found = offset(cursor.next());
    }
    got
}

fn all_backward(cursor: &mut SearchCursor) -> Vec<usize> {
    let mut got = Vec::new();
    let mut found = offset(cursor.last());
    while let Some(start) = found {
        got.push(start);
        found = offset(cursor.previous());
    }
    got
}

#[test]
fn forward_through_a_sentence() {
    let mut c = SearchCursor::new("is", None).with_text(SENTENCE);
    assert_eq!(offset(c.first()), Some(2));
    assert_eq!(c.matched_span(), Some(at(2)..at(4)));
    assert_eq!(c.matched_text(), Some("is"));
    assert_eq!(offset(c.next()), Some(5));
    assert_eq!(offset(c.next()), Some(18));
    assert_eq!(offset(c.next()), None);
    // The failed search left everything as it was.
    assert_eq!(c.current(), Some(at(18)));
    assert_eq!(c.matched_span(), Some(at(18)..at(20)));
}

#[test]
fn backward_through_a_sentence() {
    let mut c = SearchCursor::new("is", Some("en")).with_text(SENTENCE);
    assert_eq!(all_backward(&mut c), &[18, 5, 2]);
    assert_eq!(c.current(), Some(at(2)));
    assert_eq!(c.locale(), Some("en"));
}

#[test]
fn seeking() {
    let mut c = SearchCursor::new("is", None).with_text(SENTENCE);
    assert_eq!(offset(c.following(at(3))), Some(5));
    assert_eq!(offset(c.following(at(5))), Some(5));
    assert_eq!(offset(c.preceding(at(16))), Some(5));
    // The match at 5 ends at 7, after the position.
    assert_eq!(offset(c.preceding(at(6))), Some(2));
    assert_eq!(offset(c.preceding(at(2))), None);
    assert_eq!(offset(c.following(at(19))), None);
    assert_eq!(c.current(), Some(at(2)));
}

#[test]
fn set_position() {
    let mut c = SearchCursor::new("is", None).with_text(SENTENCE);
    c.set_position(at(6)).unwrap();
    assert_eq!(c.current(), Some(at(6)));
    assert_eq!(c.matched_span(), None);
    assert_eq!(offset(c.next()), Some(18));

    c.set_position(at(6)).unwrap();
    assert_eq!(offset(c.previous()), Some(2));

    assert_eq!(
        c.set_position(at(99)),
        Err(CursorError::Misaligned(crate::text::MisalignedPosition::OutOfBounds {
            offset: 99,
            len: 27
        }))
    );
    assert_eq!(c.current(), Some(at(2)));
}

#[test]
fn positions_past_the_end() {
    let mut c = SearchCursor::new("is", None).with_text(SENTENCE);
    c.set_position(at(6)).unwrap();
    assert_eq!(c.following(at(99)), Ok(None));
    assert_eq!(c.current(), Some(at(6)));
    assert_eq!(offset(c.preceding(at(99))), Some(18));
}

#[test]
fn overlapping_matches() {
    let mut c = SearchCursor::new("aa", None).with_text("aaaa");
    assert_eq!(all_forward(&mut c), &[0, 2]);
    assert_eq!(all_backward(&mut c), &[2, 0]);

    let mut c = c.with_options(SearchOptions {
        overlapping: true,
        ..SearchOptions::default()
    });
    c.reset();
    assert_eq!(all_forward(&mut c), &[0, 1, 2]);
    assert_eq!(all_backward(&mut c), &[2, 1, 0]);
}

#[test]
fn whole_clusters() {
    let text = "e\u{301}xe";
    let mut c = SearchCursor::new("e", None).with_text(text);
    assert_eq!(all_forward(&mut c), &[3]);

    let mut c = SearchCursor::new("e", None)
        .with_text(text)
        .with_options(SearchOptions {
            whole_clusters: false,
            ..SearchOptions::default()
        });
    assert_eq!(all_forward(&mut c), &[0, 3]);
}

#[test]
fn units_that_share_a_low_byte() {
    // U+0161 and U+0061 have the same low byte.
    let mut c = SearchCursor::new("ab", None).with_text("\u{161}\u{161}b ab");
    assert_eq!(all_forward(&mut c), &[4]);
    assert_eq!(all_backward(&mut c), &[4]);
}

#[test]
fn supplementary_characters() {
    let mut c = SearchCursor::new("\u{1F601}", None).with_text("\u{1F600}\u{1F601}x\u{1F601}");
    assert_eq!(all_forward(&mut c), &[2, 5]);
    assert_eq!(c.matched_span(), Some(at(5)..at(7)));
    assert_eq!(offset(c.previous()), Some(2));
    assert_eq!(c.matched_text(), Some("\u{1F601}"));
}

#[test]
fn replacing_the_pattern_keeps_the_position() {
    let mut c = SearchCursor::new("is", None).with_text(SENTENCE);
    assert_eq!(offset(c.first()), Some(2));
    c.set_pattern("the");
    assert_eq!(c.pattern(), "the");
    assert_eq!(c.current(), Some(at(2)));
    assert_eq!(c.matched_span(), None);
    assert_eq!(offset(c.next()), Some(8));
    assert_eq!(c.matched_text(), Some("the"));
}

#[test]
fn replacing_the_text_resets() {
    let mut c = SearchCursor::new("is", None).with_text(SENTENCE);
    c.last().unwrap();
    c.set_text(Some(Arc::new(TextBuffer::new("this is it"))));
    assert_eq!(c.current(), None);
    assert_eq!(offset(c.next()), Some(2));
}

#[test]
fn reset_starts_over_from_either_end() {
    let mut c = SearchCursor::new("is", None).with_text(SENTENCE);
    c.following(at(3)).unwrap();
    c.reset();
    assert_eq!(c.current(), None);
    assert_eq!(offset(c.next()), Some(2));
    c.reset();
    assert_eq!(offset(c.previous()), Some(18));
}

#[test]
fn empty_pattern_never_matches() {
    let mut c = SearchCursor::new("", None).with_text(SENTENCE);
    assert_eq!(offset(c.first()), None);
    assert_eq!(offset(c.last()), None);
    assert_eq!(c.current(), None);
}

#[test]
fn pattern_longer_than_text() {
    let mut c = SearchCursor::new("longer", None).with_text("long");
    assert_eq!(offset(c.first()), None);
    assert_eq!(offset(c.last()), None);
}

#[test]
fn no_text() {
    let mut c = SearchCursor::new("is", None);
    assert_eq!(c.first(), Err(CursorError::NoText));
    assert_eq!(c.previous(), Err(CursorError::NoText));
    assert_eq!(c.set_position(Position::START), Err(CursorError::NoText));
    assert_eq!(c.matched_text(), None);
}

fn naive(text: &[u16], pattern: &[u16], overlapping: bool) -> Vec<usize> {
    let mut found = Vec::new();
    let mut start = 0;
    while start + pattern.len() <= text.len() {
        if text[start..start + pattern.len()] == *pattern {
            found.push(start);
            start += if overlapping { 1 } else { pattern.len() };
        } else {
            start += 1;
        }
    }
    found
}

proptest! {
    #[test]
    fn agrees_with_naive_search(
        text in "[abc]{0,40}",
        pattern in "[abc]{1,4}",
        overlapping in any::<bool>(),
    ) {
        let units: Vec<u16> = text.encode_utf16().collect();
        let pattern_units: Vec<u16> = pattern.encode_utf16().collect();
        let mut c = SearchCursor::new(&pattern, None)
            .with_text(text.as_str())
            .with_options(SearchOptions { overlapping, whole_clusters: true });
        prop_assert_eq!(all_forward(&mut c), naive(&units, &pattern_units, overlapping));
    }

    #[test]
    fn overlapping_backward_mirrors_forward(
        text in "[ab\u{161}]{0,40}",
        pattern in "[ab]{1,3}",
    ) {
        let options = SearchOptions { overlapping: true, whole_clusters: true };
        let mut c = SearchCursor::new(&pattern, None)
            .with_text(text.as_str())
            .with_options(options);
        let mut forward = all_forward(&mut c);
        forward.reverse();
        prop_assert_eq!(all_backward(&mut c), forward);
    }
}
