//! Grapheme cluster boundaries, as defined in
//! [UAX #29 Section 3](https://www.unicode.org/reports/tr29/#Grapheme_Cluster_Boundaries).
//!
//! Two front ends share one finite state machine:
//!
//! - [`GraphemeMachine`] is fed one character at a time and answers, for each
//!   new character, whether it begins a new cluster. It needs no buffering
//!   at all and so suits streaming input.
//! - [`CharacterSegmenter`] walks a [`TextBuffer`] and implements
//!   [`Segmenter`], which is what the boundary cursors use.

use std::sync::Arc;

use u8char::u8char;

use crate::properties::{CharProperties, PropertyOracle, UcdOracle};
use crate::segmenter::{Boundary, Segmenter};
use crate::text::{Position, TextBuffer};

mod state;

use state::State;

/// A streaming grapheme cluster detector.
///
/// Feed it characters in order and it answers, for each one, whether it
/// starts a new cluster. The machine holds no text, only the properties of
/// the last character and a few bits of state, so it works equally well on a
/// string in memory and on characters trickling in from a socket. Keeping
/// the characters of the cluster in progress is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphemeMachine {
    state: State,
    prev: Option<CharProperties>,
}

impl Default for GraphemeMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphemeMachine {
    /// Creates a machine positioned at the start of input.
    pub const fn new() -> Self {
        GraphemeMachine {
            state: State::Base,
            prev: None,
        }
    }

    /// Feeds one character, already looked up, into the machine.
    ///
    /// The first character after [`Self::new`] or [`Self::end_of_input`]
    /// always gets [`ClusterAction::Split`].
    pub fn next_char_properties(&mut self, next: CharProperties) -> ClusterAction {
        let step = self.state.transition(self.prev, next);
        tracing::trace!(
            ?next,
            from = ?self.state,
            to = ?step.state,
            rule = ?step.rule,
            boundary = step.boundary,
            "grapheme step",
        );
        self.state = step.state;
        self.prev = Some(next);
        if step.boundary {
            ClusterAction::Split
        } else {
            ClusterAction::Continue
        }
    }

    /// Feeds a [`u8char`], looked up with [`CharProperties::for_u8char`].
    pub fn next_u8char(&mut self, c: u8char) -> ClusterAction {
        self.next_char_properties(CharProperties::for_u8char(c))
    }

    /// Feeds a [`char`], looked up with [`CharProperties::for_char`].
    pub fn next_char(&mut self, c: char) -> ClusterAction {
        self.next_char_properties(CharProperties::for_char(c))
    }

    /// Lazily feeds the characters of `s`, pairing each with its action.
    pub fn next_chars_from_str<'a>(
        &'a mut self,
        s: &'a str,
    ) -> impl Iterator<Item = (ClusterAction, char)> + 'a {
        s.chars().map(move |c| (self.next_char(c), c))
    }

    /// Ends the current cluster and returns the machine to the start of
    /// input. Callers can also use this to force a boundary, for instance
    /// where markup interrupts a run of text. Always returns
    /// [`ClusterAction::Split`].
    pub fn end_of_input(&mut self) -> ClusterAction {
        self.state = State::Base;
        self.prev = None;
        ClusterAction::Split
    }
}

/// What a [`GraphemeMachine`] says about a new character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterAction {
    /// The character extends the cluster in progress.
    Continue,
    /// The cluster in progress is finished and the character starts a new one.
    Split,
}

/// Finds the end of the grapheme cluster that starts at `at`.
///
/// `at` must itself be a cluster boundary. None of the grapheme rules look
/// back across a boundary, so the machine can start fresh there.
pub(crate) fn next_cluster_boundary(
    oracle: &dyn PropertyOracle,
    text: &TextBuffer,
    at: Position,
) -> Option<Position> {
    let mut chars = text.chars_from(at);
    let (_, first) = chars.next()?;
    let mut machine = GraphemeMachine::new();
    machine.next_char_properties(oracle.char_properties(first));
    for (position, c) in chars {
        if machine.next_char_properties(oracle.char_properties(c)) == ClusterAction::Split {
            return Some(position);
        }
    }
    Some(text.end())
}

/// The [`Segmenter`] for user-perceived characters. Every boundary it reports
/// has status `0`.
#[derive(Debug, Clone)]
pub struct CharacterSegmenter {
    oracle: Arc<dyn PropertyOracle>,
}

impl CharacterSegmenter {
    pub fn new() -> Self {
        Self::with_oracle(Arc::new(UcdOracle))
    }

    pub fn with_oracle(oracle: Arc<dyn PropertyOracle>) -> Self {
        Self { oracle }
    }
}

impl Default for CharacterSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter for CharacterSegmenter {
    fn following(&self, text: &TextBuffer, at: Position) -> Option<Boundary> {
        next_cluster_boundary(self.oracle.as_ref(), text, at).map(|p| Boundary::new(p, 0))
    }
}
