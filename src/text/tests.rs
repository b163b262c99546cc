use super::*;
use crate::properties::ucd;

use pretty_assertions::assert_eq;

// "a", U+1F937 U+1F3FD U+200D U+2642 U+FE0F (one cluster, seven code units), "b"
const SHRUG: &str = "a\u{1F937}\u{1F3FD}\u{200D}\u{2642}\u{FE0F}b";

#[test]
fn code_unit_lengths() {
    let text = TextBuffer::new(SHRUG);
    assert_eq!(text.len_utf16(), 9);
    assert_eq!(text.scalar_count(), 7);
    assert_eq!(text.end().code_unit_offset(), 9);
    assert!(!text.is_empty());
    assert!(TextBuffer::new("").is_empty());
}

#[test]
fn rejects_offsets_inside_surrogate_pairs() {
    let text = TextBuffer::new(SHRUG);
    assert_eq!(text.position(1).map(Position::code_unit_offset), Ok(1));
    assert_eq!(
        text.position(2),
        Err(MisalignedPosition::SplitsSurrogatePair { offset: 2 })
    );
    assert_eq!(text.position(3).map(Position::code_unit_offset), Ok(3));
    assert_eq!(
        text.position(4),
        Err(MisalignedPosition::SplitsSurrogatePair { offset: 4 })
    );
    assert_eq!(
        text.position(10),
        Err(MisalignedPosition::OutOfBounds { offset: 10, len: 9 })
    );
}

#[test]
fn scalar_index_space() {
    let text = TextBuffer::new(SHRUG);
    let offsets: Vec<usize> = (0..=text.scalar_count())
        .map(|i| text.position_of_scalar(i).unwrap().code_unit_offset())
        .collect();
    assert_eq!(offsets, &[0, 1, 3, 5, 6, 7, 8, 9]);
    assert_eq!(text.position_of_scalar(8), None);

    for (index, offset) in offsets.iter().enumerate() {
        let position = text.position(*offset).unwrap();
        assert_eq!(text.scalar_index(position), Ok(index));
    }
}

#[test]
fn byte_index_space() {
    let text = TextBuffer::new("h\u{E9}llo");
    assert_eq!(text.position_of_byte(1).map(Position::code_unit_offset), Ok(1));
    assert_eq!(
        text.position_of_byte(2),
        Err(MisalignedPosition::NotCharBoundary { offset: 2 })
    );
    assert_eq!(text.position_of_byte(3).map(Position::code_unit_offset), Ok(2));
    let end = text.end();
    assert_eq!(text.byte_offset(end), Ok(6));
    let start = text.position(1).unwrap();
    assert_eq!(text.slice(start..end), Ok("\u{E9}llo"));
}

#[test]
fn chars_in_both_directions() {
    let text = TextBuffer::new("a\u{1F937}b");
    let forward: Vec<(usize, char)> = text
        .chars_from(Position::START)
        .map(|(p, c)| (p.code_unit_offset(), c))
        .collect();
    assert_eq!(forward, &[(0, 'a'), (1, '\u{1F937}'), (3, 'b')]);

    let backward: Vec<(usize, char)> = text
        .chars_before(text.end())
        .map(|(p, c)| (p.code_unit_offset(), c))
        .collect();
    assert_eq!(backward, &[(3, 'b'), (1, '\u{1F937}'), (0, 'a')]);
    assert_eq!(text.char_before(Position::START), None);
}

#[test]
fn character_index_counts_clusters() {
    let text = TextBuffer::new(SHRUG);
    let index = CharacterIndex::new(&text, ucd());
    assert_eq!(index.len(), 3);
    let offsets: Vec<usize> = (0..=index.len())
        .map(|i| index.position_of(i).unwrap().code_unit_offset())
        .collect();
    assert_eq!(offsets, &[0, 1, 8, 9]);

    let inside = text.position(3).unwrap();
    assert_eq!(
        index.index_of(inside),
        Err(MisalignedPosition::NotClusterAligned { offset: 3 })
    );
    assert_eq!(index.index_of(text.position(8).unwrap()), Ok(2));
}

#[test]
fn empty_text_has_one_boundary() {
    let text = TextBuffer::new("");
    let index = CharacterIndex::new(&text, ucd());
    assert!(index.is_empty());
    assert_eq!(index.position_of(0), Some(Position::START));
}

mod round_trip {
    use super::super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn positions_survive_offset_round_trip(text in "\\PC{0,40}") {
            let buffer = TextBuffer::new(text);
            for offset in 0..=buffer.len_utf16() {
                if let Ok(position) = buffer.position(offset) {
                    let back = buffer.to_code_unit_offset(position);
                    prop_assert_eq!(buffer.position(back), Ok(position));
                }
            }
        }

        #[test]
        fn every_scalar_start_is_aligned(text in "\\PC{0,40}") {
            let buffer = TextBuffer::new(text);
            for index in 0..=buffer.scalar_count() {
                let position = buffer.position_of_scalar(index).unwrap();
                prop_assert!(buffer.is_aligned(position.code_unit_offset()));
                prop_assert_eq!(buffer.scalar_index(position), Ok(index));
            }
        }
    }
}
