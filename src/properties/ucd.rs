//! [`PropertyOracle`] backed by the Unicode data compiled into
//! `icu_properties`.

use icu_properties::props::{
    EastAsianWidth, ExtendedPictographic, GeneralCategory as IcuGeneralCategory,
    GraphemeClusterBreak, Ideographic, IndicSyllabicCategory, LineBreak, Script, SentenceBreak,
    WordBreak,
};
use icu_properties::{CodePointMapData, CodePointSetData};

use super::{
    GCBProperty, GeneralCategory, InCBProperty, LBProperty, PropertyOracle, SBProperty, WBProperty,
};

/// The default oracle, answering from the versioned UCD snapshot that
/// `icu_properties` bakes into the binary.
///
/// The data is static and read-only, so a single value can be shared freely
/// between threads; [`ucd()`] returns one.
#[derive(Debug, Default, Clone, Copy)]
pub struct UcdOracle;

/// Returns the process-wide [`UcdOracle`].
pub fn ucd() -> &'static UcdOracle {
    static UCD: UcdOracle = UcdOracle;
    &UCD
}

impl PropertyOracle for UcdOracle {
    fn grapheme_break(&self, c: char) -> GCBProperty {
        let gcb = CodePointMapData::<GraphemeClusterBreak>::new().get(c);
        match gcb {
            GraphemeClusterBreak::CR => GCBProperty::CR,
            GraphemeClusterBreak::LF => GCBProperty::LF,
            GraphemeClusterBreak::Control => GCBProperty::Control,
            GraphemeClusterBreak::Extend => GCBProperty::Extend,
            GraphemeClusterBreak::ZWJ => GCBProperty::ZWJ,
            GraphemeClusterBreak::RegionalIndicator => GCBProperty::RegionalIndicator,
            GraphemeClusterBreak::Prepend => GCBProperty::Prepend,
            GraphemeClusterBreak::SpacingMark => GCBProperty::SpacingMark,
            GraphemeClusterBreak::L => GCBProperty::L,
            GraphemeClusterBreak::V => GCBProperty::V,
            GraphemeClusterBreak::T => GCBProperty::T,
            GraphemeClusterBreak::LV => GCBProperty::LV,
            GraphemeClusterBreak::LVT => GCBProperty::LVT,
            _ if self.extended_pictographic(c) => GCBProperty::ExtendedPictographic,
            _ => GCBProperty::None,
        }
    }

    fn indic_conjunct_break(&self, c: char) -> InCBProperty {
        // Derived as in DerivedCoreProperties.txt: the viramas of the six
        // scripts with conjunct-forming linkers, their consonants, and the
        // remaining extenders.
        if matches!(
            c,
            '\u{094D}' | '\u{09CD}' | '\u{0ACD}' | '\u{0B4D}' | '\u{0C4D}' | '\u{0D4D}'
        ) {
            return InCBProperty::Linker;
        }
        let script = CodePointMapData::<Script>::new().get(c);
        let conjunct_script = matches!(
            script,
            Script::Devanagari
                | Script::Bengali
                | Script::Gujarati
                | Script::Oriya
                | Script::Telugu
                | Script::Malayalam
        );
        if conjunct_script
            && CodePointMapData::<IndicSyllabicCategory>::new().get(c)
                == IndicSyllabicCategory::Consonant
        {
            return InCBProperty::Consonant;
        }
        match CodePointMapData::<GraphemeClusterBreak>::new().get(c) {
            GraphemeClusterBreak::Extend | GraphemeClusterBreak::ZWJ => InCBProperty::Extend,
            _ => InCBProperty::None,
        }
    }

    fn word_break(&self, c: char) -> WBProperty {
        match CodePointMapData::<WordBreak>::new().get(c) {
            WordBreak::CR => WBProperty::CR,
            WordBreak::LF => WBProperty::LF,
            WordBreak::Newline => WBProperty::Newline,
            WordBreak::Extend => WBProperty::Extend,
            WordBreak::ZWJ => WBProperty::ZWJ,
            WordBreak::RegionalIndicator => WBProperty::RegionalIndicator,
            WordBreak::Format => WBProperty::Format,
            WordBreak::Katakana => WBProperty::Katakana,
            WordBreak::HebrewLetter => WBProperty::HebrewLetter,
            WordBreak::ALetter => WBProperty::ALetter,
            WordBreak::SingleQuote => WBProperty::SingleQuote,
            WordBreak::DoubleQuote => WBProperty::DoubleQuote,
            WordBreak::MidNumLet => WBProperty::MidNumLet,
            WordBreak::MidLetter => WBProperty::MidLetter,
            WordBreak::MidNum => WBProperty::MidNum,
            WordBreak::Numeric => WBProperty::Numeric,
            WordBreak::ExtendNumLet => WBProperty::ExtendNumLet,
            WordBreak::WSegSpace => WBProperty::WSegSpace,
            _ => WBProperty::Other,
        }
    }

    fn line_break(&self, c: char) -> LBProperty {
        match CodePointMapData::<LineBreak>::new().get(c) {
            LineBreak::MandatoryBreak => LBProperty::BK,
            LineBreak::CarriageReturn => LBProperty::CR,
            LineBreak::LineFeed => LBProperty::LF,
            LineBreak::NextLine => LBProperty::NL,
            LineBreak::Space => LBProperty::SP,
            LineBreak::ZWSpace => LBProperty::ZW,
            LineBreak::WordJoiner => LBProperty::WJ,
            LineBreak::Glue => LBProperty::GL,
            LineBreak::CombiningMark => LBProperty::CM,
            LineBreak::ZWJ => LBProperty::ZWJ,
            LineBreak::BreakAfter => LBProperty::BA,
            LineBreak::BreakBefore => LBProperty::BB,
            LineBreak::BreakBoth => LBProperty::B2,
            LineBreak::Hyphen => LBProperty::HY,
            LineBreak::ContingentBreak => LBProperty::CB,
            LineBreak::ClosePunctuation => LBProperty::CL,
            LineBreak::CloseParenthesis => LBProperty::CP,
            LineBreak::Exclamation => LBProperty::EX,
            LineBreak::Inseparable => LBProperty::IN,
            LineBreak::Nonstarter => LBProperty::NS,
            LineBreak::OpenPunctuation => LBProperty::OP,
            LineBreak::Quotation => LBProperty::QU,
            LineBreak::InfixNumeric => LBProperty::IS,
            LineBreak::Numeric => LBProperty::NU,
            LineBreak::PostfixNumeric => LBProperty::PO,
            LineBreak::PrefixNumeric => LBProperty::PR,
            LineBreak::BreakSymbols => LBProperty::SY,
            LineBreak::Ambiguous => LBProperty::AI,
            LineBreak::Alphabetic => LBProperty::AL,
            LineBreak::ConditionalJapaneseStarter => LBProperty::CJ,
            LineBreak::EBase => LBProperty::EB,
            LineBreak::EModifier => LBProperty::EM,
            LineBreak::H2 => LBProperty::H2,
            LineBreak::H3 => LBProperty::H3,
            LineBreak::HebrewLetter => LBProperty::HL,
            LineBreak::Ideographic => LBProperty::ID,
            LineBreak::JL => LBProperty::JL,
            LineBreak::JV => LBProperty::JV,
            LineBreak::JT => LBProperty::JT,
            LineBreak::RegionalIndicator => LBProperty::RI,
            LineBreak::ComplexContext => LBProperty::SA,
            LineBreak::Surrogate => LBProperty::SG,
            LineBreak::Aksara => LBProperty::AK,
            LineBreak::AksaraPrebase => LBProperty::AP,
            LineBreak::AksaraStart => LBProperty::AS,
            LineBreak::ViramaFinal => LBProperty::VF,
            LineBreak::Virama => LBProperty::VI,
            LineBreak::UnambiguousHyphen => LBProperty::HH,
            _ => LBProperty::XX,
        }
    }

    fn sentence_break(&self, c: char) -> SBProperty {
        match CodePointMapData::<SentenceBreak>::new().get(c) {
            SentenceBreak::CR => SBProperty::CR,
            SentenceBreak::LF => SBProperty::LF,
            SentenceBreak::Extend => SBProperty::Extend,
            SentenceBreak::Sep => SBProperty::Sep,
            SentenceBreak::Format => SBProperty::Format,
            SentenceBreak::Sp => SBProperty::Sp,
            SentenceBreak::Lower => SBProperty::Lower,
            SentenceBreak::Upper => SBProperty::Upper,
            SentenceBreak::OLetter => SBProperty::OLetter,
            SentenceBreak::Numeric => SBProperty::Numeric,
            SentenceBreak::ATerm => SBProperty::ATerm,
            SentenceBreak::SContinue => SBProperty::SContinue,
            SentenceBreak::STerm => SBProperty::STerm,
            SentenceBreak::Close => SBProperty::Close,
            _ => SBProperty::Other,
        }
    }

    #[allow(unreachable_patterns)]
    fn general_category(&self, c: char) -> GeneralCategory {
        use IcuGeneralCategory as Icu;
        match CodePointMapData::<IcuGeneralCategory>::new().get(c) {
            Icu::UppercaseLetter => GeneralCategory::UppercaseLetter,
            Icu::LowercaseLetter => GeneralCategory::LowercaseLetter,
            Icu::TitlecaseLetter => GeneralCategory::TitlecaseLetter,
            Icu::ModifierLetter => GeneralCategory::ModifierLetter,
            Icu::OtherLetter => GeneralCategory::OtherLetter,
            Icu::NonspacingMark => GeneralCategory::NonspacingMark,
            Icu::SpacingMark => GeneralCategory::SpacingMark,
            Icu::EnclosingMark => GeneralCategory::EnclosingMark,
            Icu::DecimalNumber => GeneralCategory::DecimalNumber,
            Icu::LetterNumber => GeneralCategory::LetterNumber,
            Icu::OtherNumber => GeneralCategory::OtherNumber,
            Icu::SpaceSeparator => GeneralCategory::SpaceSeparator,
            Icu::LineSeparator => GeneralCategory::LineSeparator,
            Icu::ParagraphSeparator => GeneralCategory::ParagraphSeparator,
            Icu::Control => GeneralCategory::Control,
            Icu::Format => GeneralCategory::Format,
            Icu::PrivateUse => GeneralCategory::PrivateUse,
            Icu::Surrogate => GeneralCategory::Surrogate,
            Icu::DashPunctuation => GeneralCategory::DashPunctuation,
            Icu::OpenPunctuation => GeneralCategory::OpenPunctuation,
            Icu::ClosePunctuation => GeneralCategory::ClosePunctuation,
            Icu::ConnectorPunctuation => GeneralCategory::ConnectorPunctuation,
            Icu::InitialPunctuation => GeneralCategory::InitialPunctuation,
            Icu::FinalPunctuation => GeneralCategory::FinalPunctuation,
            Icu::OtherPunctuation => GeneralCategory::OtherPunctuation,
            Icu::MathSymbol => GeneralCategory::MathSymbol,
            Icu::CurrencySymbol => GeneralCategory::CurrencySymbol,
            Icu::ModifierSymbol => GeneralCategory::ModifierSymbol,
            Icu::OtherSymbol => GeneralCategory::OtherSymbol,
            Icu::Unassigned => GeneralCategory::Unassigned,
            _ => GeneralCategory::Unassigned,
        }
    }

    fn extended_pictographic(&self, c: char) -> bool {
        CodePointSetData::new::<ExtendedPictographic>().contains(c)
    }

    fn east_asian_wide(&self, c: char) -> bool {
        matches!(
            CodePointMapData::<EastAsianWidth>::new().get(c),
            EastAsianWidth::Fullwidth | EastAsianWidth::Wide | EastAsianWidth::Halfwidth
        )
    }

    fn is_ideographic(&self, c: char) -> bool {
        CodePointSetData::new::<Ideographic>().contains(c)
    }

    fn is_hiragana(&self, c: char) -> bool {
        CodePointMapData::<Script>::new().get(c) == Script::Hiragana
    }
}
