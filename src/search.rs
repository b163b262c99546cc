//! Literal substring search in either direction over a [`TextBuffer`].

use std::ops::Range;
use std::sync::Arc;

use crate::cursor::CursorError;
use crate::properties::ucd;
use crate::text::{CharacterIndex, Position, TextBuffer};

/// Matching options for a [`SearchCursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchOptions {
    /// Whether [`SearchCursor::next`] and [`SearchCursor::previous`] may find
    /// a match that overlaps the current one.
    pub overlapping: bool,
    /// Whether a match must begin and end on grapheme cluster boundaries, so
    /// that searching for `e` does not find the first half of `e\u{301}`.
    pub whole_clusters: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            overlapping: false,
            whole_clusters: true,
        }
    }
}

/// Boyer-Moore-Horspool shift tables, indexed by the low byte of a code
/// unit. Units that share a low byte share a shift, which only makes the
/// shifts shorter than they could be.
#[derive(Debug)]
struct SkipTables {
    /// Shift for a forward scan, keyed by the unit under the last position
    /// of the window.
    forward: [usize; 256],
    /// Shift for a backward scan, keyed by the unit under the first position
    /// of the window.
    backward: [usize; 256],
}

impl SkipTables {
    fn new(pattern: &[u16]) -> Self {
        let len = pattern.len();
        let mut forward = [len; 256];
        let mut backward = [len; 256];
        for (i, &unit) in pattern.iter().enumerate().take(len.saturating_sub(1)) {
            forward[usize::from(unit as u8)] = len - 1 - i;
        }
        for (i, &unit) in pattern.iter().enumerate().skip(1).rev() {
            backward[usize::from(unit as u8)] = i;
        }
        Self { forward, backward }
    }
}

/// Everything one search needs, borrowed from the cursor.
struct Matcher<'a> {
    pattern: &'a [u16],
    tables: &'a SkipTables,
    text: &'a TextBuffer,
    clusters: Option<&'a CharacterIndex>,
}

impl Matcher<'_> {
    fn accepts(&self, start: usize) -> bool {
        let end = start + self.pattern.len();
        self.text.code_units()[start..end] == *self.pattern
            && self.text.is_aligned(start)
            && self.text.is_aligned(end)
            && self.clusters.is_none_or(|clusters| {
                clusters.is_boundary(Position::new_unchecked(start))
                    && clusters.is_boundary(Position::new_unchecked(end))
            })
    }

    /// Finds the first match starting at or after `from`.
    fn forward(&self, from: usize) -> Option<usize> {
        let units = self.text.code_units();
        let len = self.pattern.len();
        let mut start = from;
        while start + len <= units.len() {
            if self.accepts(start) {
                return Some(start);
            }
            start += self.tables.forward[usize::from(units[start + len - 1] as u8)];
        }
        None
    }

    /// Finds the last match starting at or before `limit`.
    fn backward(&self, limit: usize) -> Option<usize> {
        let units = self.text.code_units();
        let len = self.pattern.len();
        let mut start = limit.min(units.len().checked_sub(len)?);
        loop {
            if self.accepts(start) {
                return Some(start);
            }
            start = start.checked_sub(self.tables.backward[usize::from(units[start] as u8)])?;
        }
    }

    /// Finds the last match starting before `before`, and (unless
    /// `overlapping`) also ending at or before it.
    fn before(&self, before: usize, overlapping: bool) -> Option<usize> {
        let limit = if overlapping {
            before.checked_sub(1)?
        } else {
            before.checked_sub(self.pattern.len())?
        };
        self.backward(limit)
    }
}

/// A stateful literal search over one text.
///
/// Matches are compared code unit for code unit, with no case folding or
/// normalization. Every positioning method returns the start of the match it
/// finds, or `Ok(None)` when there is none, in which case the cursor stays
/// where it was. An empty pattern never matches.
#[derive(Debug)]
pub struct SearchCursor {
    pattern: String,
    pattern_units: Vec<u16>,
    locale: Option<String>,
    options: SearchOptions,
    text: Option<Arc<TextBuffer>>,
    /// Rebuilt on demand after the pattern changes.
    tables: Option<SkipTables>,
    /// Built on demand when matches must cover whole clusters.
    clusters: Option<CharacterIndex>,
    offset: Option<Position>,
    matched: Option<Range<Position>>,
}

impl SearchCursor {
    /// Creates a cursor searching for `pattern`. The locale is recorded but
    /// does not change what matches.
    pub fn new(pattern: &str, locale: Option<&str>) -> Self {
        Self {
            pattern: pattern.to_owned(),
            pattern_units: pattern.encode_utf16().collect(),
            locale: locale.map(str::to_owned),
            options: SearchOptions::default(),
            text: None,
            tables: None,
            clusters: None,
            offset: None,
            matched: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<TextBuffer>) -> Self {
        self.set_text(Some(Arc::new(text.into())));
        self
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn text(&self) -> Option<&Arc<TextBuffer>> {
        self.text.as_ref()
    }

    /// Replaces the text, or removes it with `None`, and resets the cursor.
    pub fn set_text(&mut self, text: Option<Arc<TextBuffer>>) {
        self.text = text;
        self.clusters = None;
        self.reset();
    }

    /// Replaces the pattern. The cursor keeps its position but forgets its
    /// match, so [`Self::next`] searches from where the old match began.
    pub fn set_pattern(&mut self, pattern: &str) {
        self.pattern = pattern.to_owned();
        self.pattern_units = pattern.encode_utf16().collect();
        self.tables = None;
        self.matched = None;
    }

    /// Forgets the position, so that the next call to [`Self::next`] or
    /// [`Self::previous`] starts from the corresponding end of the text.
    pub fn reset(&mut self) {
        self.offset = None;
        self.matched = None;
    }

    /// Positions the cursor at `position` without searching. The next call
    /// to [`Self::next`] finds the first match starting there or later.
    pub fn set_position(&mut self, position: Position) -> Result<(), CursorError> {
        let text = self.text.as_deref().ok_or(CursorError::NoText)?;
        self.offset = Some(text.position(position.code_unit_offset())?);
        self.matched = None;
        Ok(())
    }

    /// Returns the cursor's position: the start of the current match, or
    /// where [`Self::set_position`] put it.
    pub fn current(&self) -> Option<Position> {
        self.offset
    }

    pub fn matched_span(&self) -> Option<Range<Position>> {
        self.matched.clone()
    }

    pub fn matched_text(&self) -> Option<&str> {
        let span = self.matched.clone()?;
        self.text.as_ref()?.slice(span).ok()
    }

    pub fn first(&mut self) -> Result<Option<Position>, CursorError> {
        self.search(|m| m.forward(0))
    }

    pub fn last(&mut self) -> Result<Option<Position>, CursorError> {
        self.search(|m| m.backward(usize::MAX))
    }

    /// Finds the next match after the current one. Without a position this
    /// is the same as [`Self::first`].
    pub fn next(&mut self) -> Result<Option<Position>, CursorError> {
        let from = match (&self.matched, self.offset) {
            (Some(span), _) if self.options.overlapping => span.start.code_unit_offset() + 1,
            (Some(span), _) => span.end.code_unit_offset(),
            (None, Some(offset)) => offset.code_unit_offset(),
            (None, None) => 0,
        };
        self.search(|m| m.forward(from))
    }

    /// Finds the match before the current one. Without a position this is
    /// the same as [`Self::last`].
    pub fn previous(&mut self) -> Result<Option<Position>, CursorError> {
        let before = match (&self.matched, self.offset) {
            (Some(span), _) => span.start,
            (None, Some(offset)) => offset,
            (None, None) => return self.last(),
        };
        self.preceding_offset(before.code_unit_offset())
    }

    /// Finds the first match starting at or after `position`. There is none
    /// past the end of the text, and the cursor stays where it was.
    pub fn following(&mut self, position: Position) -> Result<Option<Position>, CursorError> {
        let Some(from) = self.validate(position)? else {
            return Ok(None);
        };
        self.search(|m| m.forward(from))
    }

    /// Finds the last match starting before `position`. Unless matches may
    /// overlap, it must also end by `position`. A position past the end of
    /// the text searches the whole text.
    pub fn preceding(&mut self, position: Position) -> Result<Option<Position>, CursorError> {
        let before = match self.validate(position)? {
            Some(before) => before,
            None => self.require_text()?.len_utf16(),
        };
        self.preceding_offset(before)
    }

    fn preceding_offset(&mut self, before: usize) -> Result<Option<Position>, CursorError> {
        let overlapping = self.options.overlapping;
        self.search(|m| m.before(before, overlapping))
    }

    /// Checks `position` against the text and returns its offset, or `None`
    /// if it lies past the end.
    fn validate(&self, position: Position) -> Result<Option<usize>, CursorError> {
        let text = self.require_text()?;
        let offset = position.code_unit_offset();
        if offset > text.len_utf16() {
            return Ok(None);
        }
        Ok(Some(text.position(offset)?.code_unit_offset()))
    }

    fn require_text(&self) -> Result<&TextBuffer, CursorError> {
        self.text.as_deref().ok_or(CursorError::NoText)
    }

    fn search(
        &mut self,
        find: impl FnOnce(&Matcher<'_>) -> Option<usize>,
    ) -> Result<Option<Position>, CursorError> {
        let text = self.text.as_deref().ok_or(CursorError::NoText)?;
        if self.pattern_units.is_empty() {
            return Ok(None);
        }
        if self.tables.is_none() {
            tracing::trace!(pattern = %self.pattern, "building skip tables");
            self.tables = Some(SkipTables::new(&self.pattern_units));
        }
        if self.options.whole_clusters && self.clusters.is_none() {
            self.clusters = Some(CharacterIndex::new(text, ucd()));
        }
        let Some(tables) = self.tables.as_ref() else {
            return Ok(None);
        };
        let matcher = Matcher {
            pattern: &self.pattern_units,
            tables,
            text,
            clusters: self.clusters.as_ref().filter(|_| self.options.whole_clusters),
        };
        let Some(start) = find(&matcher) else {
            return Ok(None);
        };

        let start = Position::new_unchecked(start);
        let end = Position::new_unchecked(start.code_unit_offset() + self.pattern_units.len());
        self.offset = Some(start);
        self.matched = Some(start..end);
        Ok(Some(start))
    }
}

#[cfg(test)]
mod tests;
