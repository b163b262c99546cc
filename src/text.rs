//! The text buffer shared by every cursor, and the mapping between its
//! UTF-16 code-unit index space and the other ways of addressing text.
//!
//! Boundary rules are defined against 16-bit code units, so a [`Position`]
//! is always a code-unit offset into one particular [`TextBuffer`]. The
//! buffer keeps enough side tables that converting between code units,
//! scalar values, UTF-8 bytes and (through [`CharacterIndex`]) grapheme
//! clusters never needs to rescan the text.

use std::ops::Range;

use crate::grapheme;
use crate::properties::PropertyOracle;

/// An offset into the code-unit index space of a [`TextBuffer`].
///
/// Positions are only meaningful for the buffer that produced them. A
/// position obtained from [`TextBuffer::position`] or returned by a cursor
/// never lands inside a surrogate pair.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(usize);

impl Position {
    /// The start of any text.
    pub const START: Self = Self(0);

    /// Wraps an offset that the caller has already checked for alignment.
    pub(crate) const fn new_unchecked(offset: usize) -> Self {
        Self(offset)
    }

    /// Returns the offset of this position in UTF-16 code units.
    pub const fn code_unit_offset(self) -> usize {
        self.0
    }
}

/// Reasons an offset cannot be turned into a [`Position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MisalignedPosition {
    #[error("offset {offset} is past the end of the text ({len} code units)")]
    OutOfBounds { offset: usize, len: usize },

    #[error("offset {offset} splits a surrogate pair")]
    SplitsSurrogatePair { offset: usize },

    #[error("offset {offset} is not on a grapheme cluster boundary")]
    NotClusterAligned { offset: usize },

    #[error("byte offset {offset} is not on a UTF-8 character boundary")]
    NotCharBoundary { offset: usize },
}

/// An immutable piece of text together with its UTF-16 encoding.
///
/// Construct one with [`TextBuffer::new`] (or `From<&str>` / `From<String>`).
/// Cursors hold buffers through [`std::sync::Arc`], so replacing the text of
/// a cursor never disturbs anyone else still reading the old buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    units: Vec<u16>,
    /// Code-unit offset of the first unit of each scalar value.
    scalar_units: Vec<u32>,
    /// UTF-8 byte offset of each scalar value, parallel to `scalar_units`.
    scalar_bytes: Vec<u32>,
}

impl TextBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut units = Vec::with_capacity(text.len());
        let mut scalar_units = Vec::with_capacity(text.len());
        let mut scalar_bytes = Vec::with_capacity(text.len());
        for (byte, c) in text.char_indices() {
            scalar_units.push(units.len() as u32);
            scalar_bytes.push(byte as u32);
            let mut buf = [0u16; 2];
            units.extend_from_slice(c.encode_utf16(&mut buf));
        }
        Self {
            text,
            units,
            scalar_units,
            scalar_bytes,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn code_units(&self) -> &[u16] {
        &self.units
    }

    /// Returns the length of the text in UTF-16 code units.
    pub fn len_utf16(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Returns the position just past the last code unit.
    pub fn end(&self) -> Position {
        Position(self.units.len())
    }

    /// Returns the number of Unicode scalar values in the text.
    pub fn scalar_count(&self) -> usize {
        self.scalar_units.len()
    }

    /// Converts a position back into its raw code-unit offset.
    pub fn to_code_unit_offset(&self, position: Position) -> usize {
        position.0
    }

    /// Validates a code-unit offset and returns the matching [`Position`].
    ///
    /// # Errors
    ///
    /// Fails if `offset` is past the end of the text or points at the low
    /// half of a surrogate pair.
    pub fn position(&self, offset: usize) -> Result<Position, MisalignedPosition> {
        if offset > self.units.len() {
            return Err(MisalignedPosition::OutOfBounds {
                offset,
                len: self.units.len(),
            });
        }
        if !self.is_aligned(offset) {
            return Err(MisalignedPosition::SplitsSurrogatePair { offset });
        }
        Ok(Position(offset))
    }

    /// Returns `true` if `offset` is within the text and not inside a
    /// surrogate pair.
    pub fn is_aligned(&self, offset: usize) -> bool {
        if offset > self.units.len() {
            return false;
        }
        if offset == 0 || offset == self.units.len() {
            return true;
        }
        !(is_low_surrogate(self.units[offset]) && is_high_surrogate(self.units[offset - 1]))
    }

    /// Returns the position of the `index`th scalar value, or the end of the
    /// text when `index` equals [`Self::scalar_count`].
    pub fn position_of_scalar(&self, index: usize) -> Option<Position> {
        match self.scalar_units.get(index) {
            Some(&offset) => Some(Position(offset as usize)),
            None if index == self.scalar_units.len() => Some(self.end()),
            None => None,
        }
    }

    /// Returns how many scalar values precede `position`.
    ///
    /// # Errors
    ///
    /// Fails for positions past the end or inside a surrogate pair.
    pub fn scalar_index(&self, position: Position) -> Result<usize, MisalignedPosition> {
        let offset = self.position(position.0)?.0;
        if offset == self.units.len() {
            return Ok(self.scalar_units.len());
        }
        self.scalar_units
            .binary_search(&(offset as u32))
            .map_err(|_| MisalignedPosition::SplitsSurrogatePair { offset })
    }

    /// Converts a UTF-8 byte offset into `self.as_str()` to a position.
    ///
    /// # Errors
    ///
    /// Fails when `byte` is out of range or not on a `char` boundary.
    pub fn position_of_byte(&self, byte: usize) -> Result<Position, MisalignedPosition> {
        if byte == self.text.len() {
            return Ok(self.end());
        }
        if byte > self.text.len() {
            return Err(MisalignedPosition::OutOfBounds {
                offset: byte,
                len: self.text.len(),
            });
        }
        match self.scalar_bytes.binary_search(&(byte as u32)) {
            Ok(index) => Ok(Position(self.scalar_units[index] as usize)),
            Err(_) => Err(MisalignedPosition::NotCharBoundary { offset: byte }),
        }
    }

    /// Converts a position to a UTF-8 byte offset into `self.as_str()`.
    ///
    /// # Errors
    ///
    /// Fails for positions past the end or inside a surrogate pair.
    pub fn byte_offset(&self, position: Position) -> Result<usize, MisalignedPosition> {
        let index = self.scalar_index(position)?;
        Ok(match self.scalar_bytes.get(index) {
            Some(&byte) => byte as usize,
            None => self.text.len(),
        })
    }

    /// Returns the text between two positions of this buffer.
    ///
    /// # Errors
    ///
    /// Fails if either end is not a valid position of this buffer.
    pub fn slice(&self, range: Range<Position>) -> Result<&str, MisalignedPosition> {
        let start = self.byte_offset(range.start)?;
        let end = self.byte_offset(range.end)?.max(start);
        Ok(&self.text[start..end])
    }

    /// Returns the scalar value that starts at `at`, if any.
    pub fn char_at(&self, at: Position) -> Option<char> {
        let units = self.units.get(at.0..)?;
        char::decode_utf16(units.iter().copied()).next()?.ok()
    }

    /// Returns the scalar value that ends at `at`, with its start position.
    pub fn char_before(&self, at: Position) -> Option<(Position, char)> {
        let offset = at.0;
        if offset == 0 || offset > self.units.len() {
            return None;
        }
        let last = self.units[offset - 1];
        let paired = offset >= 2 && is_high_surrogate(self.units[offset - 2]);
        let start = if is_low_surrogate(last) && paired {
            offset - 2
        } else {
            offset - 1
        };
        let start = Position(start);
        Some((start, self.char_at(start)?))
    }

    /// Iterates forward over the scalar values starting at `at`.
    pub fn chars_from(&self, at: Position) -> CharsForward<'_> {
        CharsForward { text: self, at }
    }

    /// Iterates backward over the scalar values that end at or before `at`.
    pub fn chars_before(&self, at: Position) -> CharsBackward<'_> {
        CharsBackward { text: self, at }
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for TextBuffer {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// Forward iterator of `(start, scalar)` pairs. See [`TextBuffer::chars_from`].
#[derive(Debug, Clone)]
pub struct CharsForward<'a> {
    text: &'a TextBuffer,
    at: Position,
}

impl Iterator for CharsForward<'_> {
    type Item = (Position, char);

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.at;
        let c = self.text.char_at(start)?;
        self.at = Position(start.0 + c.len_utf16());
        Some((start, c))
    }
}

/// Backward iterator of `(start, scalar)` pairs. See [`TextBuffer::chars_before`].
#[derive(Debug, Clone)]
pub struct CharsBackward<'a> {
    text: &'a TextBuffer,
    at: Position,
}

impl Iterator for CharsBackward<'_> {
    type Item = (Position, char);

    fn next(&mut self) -> Option<Self::Item> {
        let (start, c) = self.text.char_before(self.at)?;
        self.at = start;
        Some((start, c))
    }
}

/// Maps between [`Position`]s and the ordinal of the grapheme cluster that
/// starts there, which is how most applications count "characters".
///
/// The cluster starts are computed once when the index is built, after which
/// both directions are binary searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterIndex {
    /// Every grapheme boundary, including the start and the end of the text.
    boundaries: Vec<Position>,
}

impl CharacterIndex {
    pub fn new(text: &TextBuffer, oracle: &dyn PropertyOracle) -> Self {
        let mut boundaries = vec![Position::START];
        let mut at = Position::START;
        while let Some(next) = grapheme::next_cluster_boundary(oracle, text, at) {
            at = next;
            boundaries.push(at);
        }
        Self { boundaries }
    }

    /// Returns the number of grapheme clusters in the text.
    pub fn len(&self) -> usize {
        self.boundaries.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns where the `index`th cluster starts; `index == self.len()`
    /// yields the end of the text.
    pub fn position_of(&self, index: usize) -> Option<Position> {
        self.boundaries.get(index).copied()
    }

    /// Returns the ordinal of the cluster starting at `position`.
    ///
    /// # Errors
    ///
    /// Fails with [`MisalignedPosition::NotClusterAligned`] for positions
    /// that fall inside a cluster.
    pub fn index_of(&self, position: Position) -> Result<usize, MisalignedPosition> {
        self.boundaries
            .binary_search(&position)
            .map_err(|_| MisalignedPosition::NotClusterAligned {
                offset: position.code_unit_offset(),
            })
    }

    pub fn is_boundary(&self, position: Position) -> bool {
        self.boundaries.binary_search(&position).is_ok()
    }
}

pub(crate) const fn is_high_surrogate(unit: u16) -> bool {
    matches!(unit, 0xD800..=0xDBFF)
}

pub(crate) const fn is_low_surrogate(unit: u16) -> bool {
    matches!(unit, 0xDC00..=0xDFFF)
}

#[cfg(test)]
mod tests;
