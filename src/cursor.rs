//! Bidirectional navigation over the boundaries of a text.

use std::sync::Arc;

use crate::grapheme::CharacterSegmenter;
use crate::line::LineSegmenter;
use crate::properties::{PropertyOracle, UcdOracle};
use crate::rules::RuleTable;
use crate::segmenter::{Boundary, RuleStatus, Segmenter};
use crate::sentence::SentenceSegmenter;
use crate::text::{MisalignedPosition, Position, TextBuffer};
use crate::word::WordSegmenter;

/// The built-in kinds of boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreakAxis {
    /// Grapheme clusters, which is what users perceive as characters.
    Character,
    Word,
    Line,
    Sentence,
}

impl BreakAxis {
    fn segmenter(self, oracle: Arc<dyn PropertyOracle>) -> Arc<dyn Segmenter> {
        match self {
            BreakAxis::Character => Arc::new(CharacterSegmenter::with_oracle(oracle)),
            BreakAxis::Word => Arc::new(WordSegmenter::with_oracle(oracle)),
            BreakAxis::Line => Arc::new(LineSegmenter::with_oracle(oracle)),
            BreakAxis::Sentence => Arc::new(SentenceSegmenter::with_oracle(oracle)),
        }
    }
}

/// Ways a cursor can be misused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    #[error("the cursor has no text")]
    NoText,

    #[error(transparent)]
    Misaligned(#[from] MisalignedPosition),
}

/// Every boundary found so far, in order. The walk only ever moves forward;
/// `complete` is set once it has reached the end of the text.
#[derive(Debug)]
struct BoundaryCache {
    boundaries: Vec<Boundary>,
    complete: bool,
}

impl BoundaryCache {
    fn new() -> Self {
        Self {
            boundaries: vec![Boundary::start()],
            complete: false,
        }
    }

    /// Extends the walk until `done` holds or the text runs out.
    fn fill(
        &mut self,
        segmenter: &dyn Segmenter,
        text: &TextBuffer,
        done: impl Fn(&[Boundary]) -> bool,
    ) {
        while !self.complete && !done(&self.boundaries) {
            let last = self
                .boundaries
                .last()
                .map_or(Position::START, Boundary::position);
            match segmenter.following(text, last) {
                Some(boundary) => {
                    tracing::trace!(
                        position = boundary.position().code_unit_offset(),
                        statuses = ?boundary.rule_statuses(),
                        "found boundary",
                    );
                    self.boundaries.push(boundary);
                }
                None => {
                    tracing::trace!(count = self.boundaries.len(), "reached end of text");
                    self.complete = true;
                }
            }
        }
    }
}

/// A stateful navigator over the boundaries of one text.
///
/// A cursor starts out unpositioned. [`Self::first`], [`Self::last`] and the
/// seeking methods position it on a boundary, after which [`Self::next`] and
/// [`Self::previous`] step between neighbouring boundaries. Methods that
/// find nothing return `Ok(None)` and leave the cursor where it was, as do
/// methods that return an error.
///
/// Boundaries are found once per text, lazily, in a single forward walk.
/// Moving backward reuses what the walk already found.
#[derive(Debug)]
pub struct BoundaryCursor {
    segmenter: Arc<dyn Segmenter>,
    locale: Option<String>,
    text: Option<Arc<TextBuffer>>,
    cache: BoundaryCache,
    /// Index into `cache.boundaries`, or `None` while unpositioned.
    current: Option<usize>,
}

impl BoundaryCursor {
    /// Creates a cursor over one of the built-in boundary kinds, using the
    /// Unicode Character Database.
    ///
    /// The locale is recorded but does not change where boundaries are.
    pub fn new(axis: BreakAxis, locale: Option<&str>) -> Self {
        Self::with_oracle(axis, locale, Arc::new(UcdOracle))
    }

    pub fn with_oracle(
        axis: BreakAxis,
        locale: Option<&str>,
        oracle: Arc<dyn PropertyOracle>,
    ) -> Self {
        let mut cursor = Self::with_segmenter(axis.segmenter(oracle));
        cursor.locale = locale.map(str::to_owned);
        cursor
    }

    /// Creates a cursor over the boundaries described by a compiled rule
    /// table.
    pub fn with_rules(table: Arc<RuleTable>) -> Self {
        Self::with_segmenter(table)
    }

    pub fn with_segmenter(segmenter: Arc<dyn Segmenter>) -> Self {
        Self {
            segmenter,
            locale: None,
            text: None,
            cache: BoundaryCache::new(),
            current: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<TextBuffer>) -> Self {
        self.set_text(Some(Arc::new(text.into())));
        self
    }

    /// Replaces the text, or removes it with `None`. Either way the cursor
    /// becomes unpositioned.
    pub fn set_text(&mut self, text: Option<Arc<TextBuffer>>) {
        self.text = text;
        self.cache = BoundaryCache::new();
        self.current = None;
    }

    pub fn text(&self) -> Option<&Arc<TextBuffer>> {
        self.text.as_ref()
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Returns the boundary the cursor is on, if it is positioned.
    pub fn current(&self) -> Option<Position> {
        self.current_boundary().map(Boundary::position)
    }

    /// Returns the largest status tag of the current boundary.
    pub fn rule_status(&self) -> Option<RuleStatus> {
        self.current_boundary().map(Boundary::rule_status)
    }

    /// Returns every status tag of the current boundary, or nothing while
    /// unpositioned.
    pub fn rule_statuses(&self) -> &[RuleStatus] {
        self.current_boundary()
            .map_or(&[][..], Boundary::rule_statuses)
    }

    fn current_boundary(&self) -> Option<&Boundary> {
        self.current.and_then(|index| self.cache.boundaries.get(index))
    }

    fn require_text(&self) -> Result<&TextBuffer, CursorError> {
        self.text.as_deref().ok_or(CursorError::NoText)
    }

    /// Checks `position` against the text. `None` means it lies past the
    /// end, where there are no boundaries to find.
    fn validate(&self, position: Position) -> Result<Option<Position>, CursorError> {
        let text = self.require_text()?;
        let offset = position.code_unit_offset();
        if offset > text.len_utf16() {
            return Ok(None);
        }
        Ok(Some(text.position(offset)?))
    }

    fn fill(&mut self, done: impl Fn(&[Boundary]) -> bool) -> Result<(), CursorError> {
        let text = self.text.as_deref().ok_or(CursorError::NoText)?;
        self.cache.fill(self.segmenter.as_ref(), text, done);
        Ok(())
    }

    fn move_to(&mut self, index: usize) -> Option<Position> {
        let position = self.cache.boundaries.get(index)?.position();
        self.current = Some(index);
        Some(position)
    }

    /// Moves to the start of the text, which is always a boundary.
    pub fn first(&mut self) -> Result<Position, CursorError> {
        self.require_text()?;
        self.current = Some(0);
        Ok(Position::START)
    }

    /// Moves to the end of the text, which is always a boundary.
    pub fn last(&mut self) -> Result<Position, CursorError> {
        self.fill(|_| false)?;
        let index = self.cache.boundaries.len() - 1;
        self.current = Some(index);
        Ok(self.cache.boundaries[index].position())
    }

    /// Moves to the next boundary. An unpositioned cursor behaves as if it
    /// were at the start of the text.
    pub fn next(&mut self) -> Result<Option<Position>, CursorError> {
        let index = self.current.map_or(1, |current| current + 1);
        self.fill(|found| found.len() > index)?;
        Ok(self.move_to(index))
    }

    /// Moves to the previous boundary. An unpositioned cursor behaves as if
    /// it were at the start of the text, so there is none.
    pub fn previous(&mut self) -> Result<Option<Position>, CursorError> {
        self.require_text()?;
        match self.current.and_then(|current| current.checked_sub(1)) {
            Some(index) => Ok(self.move_to(index)),
            None => Ok(None),
        }
    }

    /// Moves to the first boundary strictly after `position`. There is none
    /// past the end of the text.
    pub fn following(&mut self, position: Position) -> Result<Option<Position>, CursorError> {
        let Some(position) = self.validate(position)? else {
            return Ok(None);
        };
        self.fill(|found| found.last().is_some_and(|b| b.position() > position))?;
        let index = self
            .cache
            .boundaries
            .partition_point(|b| b.position() <= position);
        Ok(self.move_to(index))
    }

    /// Moves to the last boundary strictly before `position`. Past the end
    /// of the text, that is the end itself.
    pub fn preceding(&mut self, position: Position) -> Result<Option<Position>, CursorError> {
        let Some(position) = self.validate(position)? else {
            return self.last().map(Some);
        };
        self.fill(|found| found.last().is_some_and(|b| b.position() >= position))?;
        let index = self
            .cache
            .boundaries
            .partition_point(|b| b.position() < position);
        match index.checked_sub(1) {
            Some(index) => Ok(self.move_to(index)),
            None => Ok(None),
        }
    }

    /// Moves to the first boundary at or after `position`. There is none
    /// past the end of the text.
    pub fn seek_following(&mut self, position: Position) -> Result<Option<Position>, CursorError> {
        let Some(position) = self.validate(position)? else {
            return Ok(None);
        };
        self.fill(|found| found.last().is_some_and(|b| b.position() >= position))?;
        let index = self
            .cache
            .boundaries
            .partition_point(|b| b.position() < position);
        Ok(self.move_to(index))
    }

    /// Reports whether `position` is a boundary.
    ///
    /// Either way, the cursor moves to the first boundary at or after
    /// `position`, so this also serves as a seek. A position past the end of
    /// the text is not a boundary and leaves the cursor where it was.
    pub fn is_boundary(&mut self, position: Position) -> Result<bool, CursorError> {
        Ok(self.seek_following(position)? == Some(position))
    }

    /// Iterates over every boundary of the text from the start, without
    /// moving the cursor. Yields nothing if there is no text.
    pub fn boundaries(&mut self) -> Boundaries<'_> {
        Boundaries {
            cursor: self,
            index: 0,
        }
    }
}

/// Iterator returned by [`BoundaryCursor::boundaries`].
#[derive(Debug)]
pub struct Boundaries<'a> {
    cursor: &'a mut BoundaryCursor,
    index: usize,
}

impl Iterator for Boundaries<'_> {
    type Item = Boundary;

    fn next(&mut self) -> Option<Boundary> {
        let index = self.index;
        self.cursor.fill(|found| found.len() > index).ok()?;
        let boundary = self.cursor.cache.boundaries.get(index)?.clone();
        self.index += 1;
        Some(boundary)
    }
}

#[cfg(test)]
mod tests;
