//! Text boundary analysis and literal search for Unicode text.
//!
//! This library finds the places in a string where one user-perceived
//! character, word, line-break opportunity or sentence ends and the next
//! begins, following
//! [UAX #29: Unicode Text Segmentation](https://www.unicode.org/reports/tr29/)
//! and [UAX #14: Unicode Line Breaking Algorithm](https://www.unicode.org/reports/tr14/).
//! It can also compile custom boundary rules from a small regular-expression
//! grammar, and search a text for a literal pattern in either direction.
//!
//! All positions are offsets in UTF-16 code units into a [`TextBuffer`],
//! because that is the granularity the boundary rules have traditionally
//! been defined against. [`TextBuffer`] converts to and from scalar value
//! indices and UTF-8 byte offsets for callers working with Rust strings, and
//! [`CharacterIndex`] numbers the grapheme clusters.
//!
//! The main entry points are:
//!
//! - [`BoundaryCursor`], created with [`open_boundary_cursor`] for one of
//!   the built-in [`BreakAxis`] kinds, or with [`open_rule_cursor`] for a
//!   [`RuleTable`] made by [`compile_rules`]. A cursor walks the boundaries
//!   of its text in either direction and reports the
//!   [rule status](RuleStatusRange) of each one.
//! - [`SearchCursor`], created with [`open_search_cursor`], which finds a
//!   pattern in a text from either end.
//! - [`GraphemeMachine`], a finite state machine that is fed characters one
//!   at a time and says whether each one begins a new grapheme cluster.
//!   It needs no buffer at all, so it suits input arriving from a stream.
//!
//! ```
//! use textbound::{BreakAxis, RuleStatusRange, open_boundary_cursor};
//!
//! let mut cursor = open_boundary_cursor(BreakAxis::Word, None).with_text("Hello, world");
//! let mut words = Vec::new();
//! let mut start = cursor.first().unwrap();
//! while let Some(end) = cursor.next().unwrap() {
//!     if RuleStatusRange::WORD_LETTER.contains(cursor.rule_status().unwrap()) {
//!         let range = start..end;
//!         words.push(cursor.text().unwrap().slice(range).unwrap().to_owned());
//!     }
//!     start = end;
//! }
//! assert_eq!(words, ["Hello", "world"]);
//! ```
//!
//! # Character data
//!
//! Every segmenter gets its character properties from a [`PropertyOracle`].
//! The default, [`UcdOracle`], answers from the Unicode Character Database
//! compiled into the [`icu_properties`](https://docs.rs/icu_properties)
//! crate, so there is nothing to load at runtime. Tests, or callers with
//! unusual needs, can supply their own oracle instead.
//!
//! The streaming [`GraphemeMachine`] works directly with [`CharProperties`],
//! which pairs a [`GCBProperty`] with an [`InCBProperty`], and can look those
//! up for [`u8char`](u8char::u8char) values as well as for [`char`].
//!
//! # Locales
//!
//! The functions that open cursors accept a locale, which is recorded and
//! can be read back, but no locale-specific tailoring is applied: every
//! locale gets the default Unicode rules.

mod cursor;
mod grapheme;
mod line;
mod properties;
mod rules;
mod search;
mod segmenter;
mod sentence;
mod text;
mod word;

use std::sync::Arc;

pub use cursor::{Boundaries, BoundaryCursor, BreakAxis, CursorError};
pub use grapheme::{CharacterSegmenter, ClusterAction, GraphemeMachine};
pub use line::LineSegmenter;
pub use properties::{
    Axis, CharProperties, Class, GCBProperty, GeneralCategory, InCBProperty, LBProperty,
    PropertyOracle, PropertyRanges, SBProperty, UcdOracle, WBProperty, ucd,
};
pub use rules::{
    Location, ParseError, ParseErrorContext, ParseErrorKind, RuleList, RuleOptions, RuleTable,
    compile_rules, compile_rules_with,
};
pub use search::{SearchCursor, SearchOptions};
pub use segmenter::{Boundary, Direction, RuleStatus, RuleStatusRange, Segmenter};
pub use sentence::SentenceSegmenter;
pub use text::{
    CharacterIndex, CharsBackward, CharsForward, MisalignedPosition, Position, TextBuffer,
};
pub use word::WordSegmenter;

/// Opens a cursor over one of the built-in kinds of boundary. Give it some
/// text with [`BoundaryCursor::with_text`] or [`BoundaryCursor::set_text`].
pub fn open_boundary_cursor(axis: BreakAxis, locale: Option<&str>) -> BoundaryCursor {
    BoundaryCursor::new(axis, locale)
}

/// Opens a cursor over the boundaries described by a compiled rule table.
pub fn open_rule_cursor(table: Arc<RuleTable>) -> BoundaryCursor {
    BoundaryCursor::with_rules(table)
}

/// Opens a cursor that searches for `pattern`.
pub fn open_search_cursor(pattern: &str, locale: Option<&str>) -> SearchCursor {
    SearchCursor::new(pattern, locale)
}
