use std::fmt;
use std::ops::RangeInclusive;

use u8char::u8char;

mod ucd;

pub use ucd::{UcdOracle, ucd};

/// **Grapheme_Cluster_Break** values, as listed in
/// [UAX #29 table 2](https://www.unicode.org/reports/tr29/#Grapheme_Cluster_Break_Property_Values).
///
/// `ExtendedPictographic` comes from the emoji data rather than from this
/// property, but the two never overlap, so it lives here too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GCBProperty {
    /// Any character with none of the other values.
    None,
    CR,
    LF,
    Control,
    Extend,
    ZWJ,
    RegionalIndicator,
    Prepend,
    SpacingMark,
    L,
    V,
    T,
    LV,
    LVT,
    ExtendedPictographic,
}

impl GCBProperty {
    /// Whether GB4 and GB5 break on both sides of this character.
    pub const fn is_control(self) -> bool {
        matches!(self, Self::CR | Self::LF | Self::Control)
    }
}

/// **Indic_Conjunct_Break** values, from DerivedCoreProperties.txt. Rule
/// [GB9c](https://www.unicode.org/reports/tr29/#GB9c) uses them to keep
/// conjuncts such as KA VIRAMA SSA together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InCBProperty {
    None,
    Consonant,
    Extend,
    Linker,
}

/// The two properties the grapheme cluster rules consult for one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharProperties {
    gcb: GCBProperty,
    incb: InCBProperty,
}

impl CharProperties {
    pub const fn new(gcb: GCBProperty, incb: InCBProperty) -> Self {
        Self { gcb, incb }
    }

    /// Looks up a [`u8char`] in [`ucd()`].
    pub fn for_u8char(c: u8char) -> Self {
        match c.as_str().chars().next() {
            Some(c) => Self::for_char(c),
            None => Self::new(GCBProperty::None, InCBProperty::None),
        }
    }

    /// Looks up a [`char`] in [`ucd()`].
    pub fn for_char(c: char) -> Self {
        ucd().char_properties(c)
    }

    pub const fn gcb_property(self) -> GCBProperty {
        self.gcb
    }

    pub const fn incb_property(self) -> InCBProperty {
        self.incb
    }
}

/// Enumeration of **Word_Break** property values, from
/// [UAX#29 Section 4.1](https://www.unicode.org/reports/tr29/#Word_Boundaries).
///
/// The emoji-related values retired in Unicode 11 are folded into `Other`;
/// Extended_Pictographic is queried separately through
/// [`PropertyOracle::extended_pictographic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WBProperty {
    Other,
    CR,
    LF,
    Newline,
    Extend,
    ZWJ,
    RegionalIndicator,
    Format,
    Katakana,
    HebrewLetter,
    ALetter,
    SingleQuote,
    DoubleQuote,
    MidNumLet,
    MidLetter,
    MidNum,
    Numeric,
    ExtendNumLet,
    WSegSpace,
}

impl WBProperty {
    /// `AHLetter` in the rule notation of UAX#29.
    pub const fn is_ah_letter(self) -> bool {
        matches!(self, Self::ALetter | Self::HebrewLetter)
    }

    /// `MidNumLetQ` in the rule notation of UAX#29.
    pub const fn is_mid_num_let_q(self) -> bool {
        matches!(self, Self::MidNumLet | Self::SingleQuote)
    }

    /// Characters that rule WB4 attaches to whatever precedes them.
    pub const fn is_ignorable(self) -> bool {
        matches!(self, Self::Extend | Self::Format | Self::ZWJ)
    }

    pub const fn is_newline(self) -> bool {
        matches!(self, Self::Newline | Self::CR | Self::LF)
    }
}

/// Enumeration of **Line_Break** property values, from
/// [UAX#14 Section 5.1](https://www.unicode.org/reports/tr14/#Table1),
/// using the two-letter abbreviations the rules are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LBProperty {
    BK,
    CR,
    LF,
    NL,
    SP,
    ZW,
    WJ,
    GL,
    CM,
    ZWJ,
    BA,
    BB,
    B2,
    HY,
    CB,
    CL,
    CP,
    EX,
    IN,
    NS,
    OP,
    QU,
    IS,
    NU,
    PO,
    PR,
    SY,
    AI,
    AL,
    CJ,
    EB,
    EM,
    H2,
    H3,
    HL,
    ID,
    JL,
    JV,
    JT,
    RI,
    SA,
    SG,
    XX,
    AK,
    AP,
    AS,
    VF,
    VI,
    HH,
}

impl LBProperty {
    /// Classes after which rule LB4/LB5 require a break.
    pub const fn is_mandatory_break(self) -> bool {
        matches!(self, Self::BK | Self::CR | Self::LF | Self::NL)
    }
}

/// Enumeration of **Sentence_Break** property values, from
/// [UAX#29 Section 5.1](https://www.unicode.org/reports/tr29/#Sentence_Boundaries).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SBProperty {
    Other,
    CR,
    LF,
    Extend,
    Sep,
    Format,
    Sp,
    Lower,
    Upper,
    OLetter,
    Numeric,
    ATerm,
    SContinue,
    STerm,
    Close,
}

impl SBProperty {
    /// `ParaSep` in the rule notation of UAX#29.
    pub const fn is_para_sep(self) -> bool {
        matches!(self, Self::Sep | Self::CR | Self::LF)
    }

    /// `SATerm` in the rule notation of UAX#29.
    pub const fn is_sa_term(self) -> bool {
        matches!(self, Self::STerm | Self::ATerm)
    }
}

/// Enumeration of **General_Category** property values.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneralCategory {
    Unassigned,
    UppercaseLetter,
    LowercaseLetter,
    TitlecaseLetter,
    ModifierLetter,
    OtherLetter,
    NonspacingMark,
    SpacingMark,
    EnclosingMark,
    DecimalNumber,
    LetterNumber,
    OtherNumber,
    SpaceSeparator,
    LineSeparator,
    ParagraphSeparator,
    Control,
    Format,
    PrivateUse,
    Surrogate,
    DashPunctuation,
    OpenPunctuation,
    ClosePunctuation,
    ConnectorPunctuation,
    InitialPunctuation,
    FinalPunctuation,
    OtherPunctuation,
    MathSymbol,
    CurrencySymbol,
    ModifierSymbol,
    OtherSymbol,
}

impl GeneralCategory {
    /// Returns this category as a single bit, for matching against the
    /// grouped categories (`L`, `N`, ...) used by set expressions.
    pub const fn mask(self) -> u32 {
        1 << self as u8
    }
}

/// The property axes the engine consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    GraphemeBreak,
    WordBreak,
    LineBreak,
    SentenceBreak,
    GeneralCategory,
}

/// The class of one scalar value along one [`Axis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Class {
    GraphemeBreak(GCBProperty),
    WordBreak(WBProperty),
    LineBreak(LBProperty),
    SentenceBreak(SBProperty),
    GeneralCategory(GeneralCategory),
}

impl Class {
    /// The class assigned to values that are not scalar values at all.
    pub const fn other(axis: Axis) -> Self {
        match axis {
            Axis::GraphemeBreak => Self::GraphemeBreak(GCBProperty::None),
            Axis::WordBreak => Self::WordBreak(WBProperty::Other),
            Axis::LineBreak => Self::LineBreak(LBProperty::XX),
            Axis::SentenceBreak => Self::SentenceBreak(SBProperty::Other),
            Axis::GeneralCategory => Self::GeneralCategory(GeneralCategory::Unassigned),
        }
    }
}

/// Read-only access to the Unicode Character Database.
///
/// Segmenters and compiled rule tables consult an oracle for every scalar
/// value they classify, so tests can drive them with synthetic tables.
/// [`UcdOracle`] is the implementation backed by real Unicode data.
///
/// Implementations must be pure: the same scalar always yields the same
/// class for the lifetime of the oracle.
pub trait PropertyOracle: Send + Sync + fmt::Debug {
    fn grapheme_break(&self, c: char) -> GCBProperty;

    fn word_break(&self, c: char) -> WBProperty;

    fn line_break(&self, c: char) -> LBProperty;

    fn sentence_break(&self, c: char) -> SBProperty;

    fn general_category(&self, c: char) -> GeneralCategory;

    fn indic_conjunct_break(&self, _c: char) -> InCBProperty {
        InCBProperty::None
    }

    fn extended_pictographic(&self, c: char) -> bool {
        self.grapheme_break(c) == GCBProperty::ExtendedPictographic
    }

    /// East_Asian_Width of F, W or H, which rule LB30 excludes.
    fn east_asian_wide(&self, _c: char) -> bool {
        false
    }

    fn is_ideographic(&self, _c: char) -> bool {
        false
    }

    fn is_hiragana(&self, _c: char) -> bool {
        false
    }

    /// Reports whether the backing data is usable. Called once whenever a
    /// rule set is compiled against this oracle.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the data cannot be used.
    fn check(&self) -> Result<(), String> {
        Ok(())
    }

    fn char_properties(&self, c: char) -> CharProperties {
        CharProperties::new(self.grapheme_break(c), self.indic_conjunct_break(c))
    }

    /// Classifies any 32-bit value; non-scalars (surrogates and values past
    /// U+10FFFF) get the axis's `Other`/`Unassigned` class.
    fn classify(&self, scalar: u32, axis: Axis) -> Class {
        let Some(c) = char::from_u32(scalar) else {
            return Class::other(axis);
        };
        match axis {
            Axis::GraphemeBreak => Class::GraphemeBreak(self.grapheme_break(c)),
            Axis::WordBreak => Class::WordBreak(self.word_break(c)),
            Axis::LineBreak => Class::LineBreak(self.line_break(c)),
            Axis::SentenceBreak => Class::SentenceBreak(self.sentence_break(c)),
            Axis::GeneralCategory => Class::GeneralCategory(self.general_category(c)),
        }
    }

    /// Enumerates the whole codespace as maximal runs of equal class.
    ///
    /// The iterator is lazy and finite; call this again to start over.
    fn ranges(&self, axis: Axis) -> PropertyRanges<'_>
    where
        Self: Sized,
    {
        PropertyRanges::new(self, axis)
    }
}

/// Iterator over `(range, class)` runs. See [`PropertyOracle::ranges`].
#[derive(Debug)]
pub struct PropertyRanges<'a> {
    oracle: &'a dyn PropertyOracle,
    axis: Axis,
    next: u32,
}

impl<'a> PropertyRanges<'a> {
    pub fn new(oracle: &'a dyn PropertyOracle, axis: Axis) -> Self {
        Self {
            oracle,
            axis,
            next: 0,
        }
    }
}

impl Iterator for PropertyRanges<'_> {
    type Item = (RangeInclusive<u32>, Class);

    fn next(&mut self) -> Option<Self::Item> {
        const LAST: u32 = char::MAX as u32;
        if self.next > LAST {
            return None;
        }
        let start = self.next;
        let class = self.oracle.classify(start, self.axis);
        let mut end = start;
        while end < LAST && self.oracle.classify(end + 1, self.axis) == class {
            end += 1;
        }
        self.next = end + 1;
        Some((start..=end, class))
    }
}

/// Answers from [`UcdOracle`] while counting the lookups, so tests can
/// check that a walk does a bounded amount of work per character.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct CountingOracle {
    lookups: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl CountingOracle {
    pub(crate) fn lookups(&self) -> usize {
        self.lookups.load(std::sync::atomic::Ordering::Relaxed)
    }

    fn ucd(&self) -> &'static UcdOracle {
        self.lookups.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        ucd()
    }
}

#[cfg(test)]
impl PropertyOracle for CountingOracle {
    fn grapheme_break(&self, c: char) -> GCBProperty {
        self.ucd().grapheme_break(c)
    }

    fn word_break(&self, c: char) -> WBProperty {
        self.ucd().word_break(c)
    }

    fn line_break(&self, c: char) -> LBProperty {
        self.ucd().line_break(c)
    }

    fn sentence_break(&self, c: char) -> SBProperty {
        self.ucd().sentence_break(c)
    }

    fn general_category(&self, c: char) -> GeneralCategory {
        self.ucd().general_category(c)
    }

    fn indic_conjunct_break(&self, c: char) -> InCBProperty {
        self.ucd().indic_conjunct_break(c)
    }

    fn extended_pictographic(&self, c: char) -> bool {
        self.ucd().extended_pictographic(c)
    }

    fn east_asian_wide(&self, c: char) -> bool {
        self.ucd().east_asian_wide(c)
    }

    fn is_ideographic(&self, c: char) -> bool {
        self.ucd().is_ideographic(c)
    }

    fn is_hiragana(&self, c: char) -> bool {
        self.ucd().is_hiragana(c)
    }
}
