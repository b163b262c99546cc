//! Character classes used by compiled rules, and the resolution of property
//! expressions such as `\p{Lu}` or `[:Line_Break=NU:]`.
//!
//! Classes stay symbolic: a property is tested against the oracle when a
//! character is matched, rather than expanded into code point ranges when
//! the rules are compiled.

use std::ops::RangeInclusive;

use crate::properties::{
    Class, GCBProperty, GeneralCategory, LBProperty, PropertyOracle, SBProperty, WBProperty,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CharClass {
    /// Every scalar value, as written `.` or `\p{Any}`.
    Any,
    /// Sorted, non-overlapping code point ranges.
    Ranges(Vec<RangeInclusive<u32>>),
    /// Any of the general categories whose bits are set, see
    /// [`GeneralCategory::mask`].
    Categories(u32),
    /// One value of one break property.
    Property(Class),
    ExtendedPictographic,
    Not(Box<CharClass>),
    Union(Vec<CharClass>),
    Intersection(Box<CharClass>, Box<CharClass>),
    Difference(Box<CharClass>, Box<CharClass>),
}

impl CharClass {
    pub(crate) fn literal(c: char) -> Self {
        Self::range(c, c)
    }

    pub(crate) fn range(first: char, last: char) -> Self {
        Self::Ranges(vec![u32::from(first)..=u32::from(last)])
    }

    /// Combines the members of a set expression. Adjacent literal ranges are
    /// merged so that ordinary sets like `[a-zA-Z_]` stay a single range
    /// list.
    pub(crate) fn union(members: Vec<CharClass>) -> Self {
        let mut ranges: Vec<RangeInclusive<u32>> = Vec::new();
        let mut others = Vec::new();
        for member in members {
            match member {
                Self::Ranges(r) => ranges.extend(r),
                other => others.push(other),
            }
        }
        if !ranges.is_empty() {
            others.insert(0, Self::Ranges(normalize(ranges)));
        }
        match others.len() {
            1 => others.remove(0),
            _ => Self::Union(others),
        }
    }

    pub(crate) fn contains(&self, c: char, oracle: &dyn PropertyOracle) -> bool {
        match self {
            Self::Any => true,
            Self::Ranges(ranges) => {
                let scalar = u32::from(c);
                ranges
                    .binary_search_by(|r| {
                        if *r.end() < scalar {
                            std::cmp::Ordering::Less
                        } else if *r.start() > scalar {
                            std::cmp::Ordering::Greater
                        } else {
                            std::cmp::Ordering::Equal
                        }
                    })
                    .is_ok()
            }
            Self::Categories(mask) => oracle.general_category(c).mask() & mask != 0,
            Self::Property(class) => match *class {
                Class::GraphemeBreak(k) => oracle.grapheme_break(c) == k,
                Class::WordBreak(k) => oracle.word_break(c) == k,
                Class::LineBreak(k) => oracle.line_break(c) == k,
                Class::SentenceBreak(k) => oracle.sentence_break(c) == k,
                Class::GeneralCategory(k) => oracle.general_category(c) == k,
            },
            Self::ExtendedPictographic => oracle.extended_pictographic(c),
            Self::Not(inner) => !inner.contains(c, oracle),
            Self::Union(members) => members.iter().any(|m| m.contains(c, oracle)),
            Self::Intersection(a, b) => a.contains(c, oracle) && b.contains(c, oracle),
            Self::Difference(a, b) => a.contains(c, oracle) && !b.contains(c, oracle),
        }
    }
}

fn normalize(mut ranges: Vec<RangeInclusive<u32>>) -> Vec<RangeInclusive<u32>> {
    ranges.sort_by_key(|r| *r.start());
    let mut merged: Vec<RangeInclusive<u32>> = Vec::with_capacity(ranges.len());
    for r in ranges {
        match merged.last_mut() {
            Some(last) if *r.start() <= last.end().saturating_add(1) => {
                if r.end() > last.end() {
                    *last = *last.start()..=*r.end();
                }
            }
            _ => merged.push(r),
        }
    }
    merged
}

/// Resolves the text between the braces of `\p{...}` (or the colons of
/// `[:...:]`). Returns `None` for anything unknown.
pub(crate) fn resolve_property(expr: &str) -> Option<CharClass> {
    match expr.split_once('=') {
        Some((name, value)) => {
            let value = loose(value);
            match loose(name).as_str() {
                "gc" | "generalcategory" => general_category(&value),
                "gcb" | "graphemeclusterbreak" => grapheme_break(&value),
                "wb" | "wordbreak" => lookup(WORD_BREAK, &value)
                    .map(|k| CharClass::Property(Class::WordBreak(k))),
                "lb" | "linebreak" => lookup(LINE_BREAK, &value)
                    .map(|k| CharClass::Property(Class::LineBreak(k))),
                "sb" | "sentencebreak" => lookup(SENTENCE_BREAK, &value)
                    .map(|k| CharClass::Property(Class::SentenceBreak(k))),
                _ => None,
            }
        }
        None => {
            let name = loose(expr);
            match name.as_str() {
                "any" => Some(CharClass::Any),
                "ascii" => Some(CharClass::Ranges(vec![0..=0x7F])),
                "extendedpictographic" | "extpict" => Some(CharClass::ExtendedPictographic),
                _ => general_category(&name),
            }
        }
    }
}

/// Loose matching of property names: case, spaces, hyphens and underscores
/// are ignored.
fn loose(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn lookup<T: Copy>(table: &[(&str, T)], name: &str) -> Option<T> {
    table.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
}

fn general_category(name: &str) -> Option<CharClass> {
    use GeneralCategory::*;
    let group = |cats: &[GeneralCategory]| cats.iter().fold(0, |mask, c| mask | c.mask());
    let mask = match name {
        "l" | "letter" => group(&[
            UppercaseLetter,
            LowercaseLetter,
            TitlecaseLetter,
            ModifierLetter,
            OtherLetter,
        ]),
        "lc" | "casedletter" => group(&[UppercaseLetter, LowercaseLetter, TitlecaseLetter]),
        "m" | "mark" | "combiningmark" => group(&[NonspacingMark, SpacingMark, EnclosingMark]),
        "n" | "number" => group(&[DecimalNumber, LetterNumber, OtherNumber]),
        "p" | "punctuation" => group(&[
            DashPunctuation,
            OpenPunctuation,
            ClosePunctuation,
            ConnectorPunctuation,
            InitialPunctuation,
            FinalPunctuation,
            OtherPunctuation,
        ]),
        "s" | "symbol" => group(&[MathSymbol, CurrencySymbol, ModifierSymbol, OtherSymbol]),
        "z" | "separator" => group(&[SpaceSeparator, LineSeparator, ParagraphSeparator]),
        "c" | "other" => group(&[Control, Format, Surrogate, PrivateUse, Unassigned]),
        _ => lookup(GENERAL_CATEGORY, name)?.mask(),
    };
    Some(CharClass::Categories(mask))
}

fn grapheme_break(value: &str) -> Option<CharClass> {
    let k = lookup(GRAPHEME_BREAK, value)?;
    let class = CharClass::Property(Class::GraphemeBreak(k));
    // Extended_Pictographic characters are `Other` as far as the
    // Grapheme_Cluster_Break property itself is concerned.
    Some(match k {
        GCBProperty::None => CharClass::Union(vec![
            class,
            CharClass::Property(Class::GraphemeBreak(GCBProperty::ExtendedPictographic)),
        ]),
        _ => class,
    })
}

const GENERAL_CATEGORY: &[(&str, GeneralCategory)] = &[
    ("lu", GeneralCategory::UppercaseLetter),
    ("uppercaseletter", GeneralCategory::UppercaseLetter),
    ("ll", GeneralCategory::LowercaseLetter),
    ("lowercaseletter", GeneralCategory::LowercaseLetter),
    ("lt", GeneralCategory::TitlecaseLetter),
    ("titlecaseletter", GeneralCategory::TitlecaseLetter),
    ("lm", GeneralCategory::ModifierLetter),
    ("modifierletter", GeneralCategory::ModifierLetter),
    ("lo", GeneralCategory::OtherLetter),
    ("otherletter", GeneralCategory::OtherLetter),
    ("mn", GeneralCategory::NonspacingMark),
    ("nonspacingmark", GeneralCategory::NonspacingMark),
    ("mc", GeneralCategory::SpacingMark),
    ("spacingmark", GeneralCategory::SpacingMark),
    ("me", GeneralCategory::EnclosingMark),
    ("enclosingmark", GeneralCategory::EnclosingMark),
    ("nd", GeneralCategory::DecimalNumber),
    ("decimalnumber", GeneralCategory::DecimalNumber),
    ("digit", GeneralCategory::DecimalNumber),
    ("nl", GeneralCategory::LetterNumber),
    ("letternumber", GeneralCategory::LetterNumber),
    ("no", GeneralCategory::OtherNumber),
    ("othernumber", GeneralCategory::OtherNumber),
    ("zs", GeneralCategory::SpaceSeparator),
    ("spaceseparator", GeneralCategory::SpaceSeparator),
    ("zl", GeneralCategory::LineSeparator),
    ("lineseparator", GeneralCategory::LineSeparator),
    ("zp", GeneralCategory::ParagraphSeparator),
    ("paragraphseparator", GeneralCategory::ParagraphSeparator),
    ("cc", GeneralCategory::Control),
    ("control", GeneralCategory::Control),
    ("cf", GeneralCategory::Format),
    ("format", GeneralCategory::Format),
    ("cs", GeneralCategory::Surrogate),
    ("surrogate", GeneralCategory::Surrogate),
    ("co", GeneralCategory::PrivateUse),
    ("privateuse", GeneralCategory::PrivateUse),
    ("cn", GeneralCategory::Unassigned),
    ("unassigned", GeneralCategory::Unassigned),
    ("pd", GeneralCategory::DashPunctuation),
    ("dashpunctuation", GeneralCategory::DashPunctuation),
    ("ps", GeneralCategory::OpenPunctuation),
    ("openpunctuation", GeneralCategory::OpenPunctuation),
    ("pe", GeneralCategory::ClosePunctuation),
    ("closepunctuation", GeneralCategory::ClosePunctuation),
    ("pc", GeneralCategory::ConnectorPunctuation),
    ("connectorpunctuation", GeneralCategory::ConnectorPunctuation),
    ("pi", GeneralCategory::InitialPunctuation),
    ("initialpunctuation", GeneralCategory::InitialPunctuation),
    ("pf", GeneralCategory::FinalPunctuation),
    ("finalpunctuation", GeneralCategory::FinalPunctuation),
    ("po", GeneralCategory::OtherPunctuation),
    ("otherpunctuation", GeneralCategory::OtherPunctuation),
    ("sm", GeneralCategory::MathSymbol),
    ("mathsymbol", GeneralCategory::MathSymbol),
    ("sc", GeneralCategory::CurrencySymbol),
    ("currencysymbol", GeneralCategory::CurrencySymbol),
    ("sk", GeneralCategory::ModifierSymbol),
    ("modifiersymbol", GeneralCategory::ModifierSymbol),
    ("so", GeneralCategory::OtherSymbol),
    ("othersymbol", GeneralCategory::OtherSymbol),
];

const GRAPHEME_BREAK: &[(&str, GCBProperty)] = &[
    ("cr", GCBProperty::CR),
    ("lf", GCBProperty::LF),
    ("cn", GCBProperty::Control),
    ("control", GCBProperty::Control),
    ("ex", GCBProperty::Extend),
    ("extend", GCBProperty::Extend),
    ("zwj", GCBProperty::ZWJ),
    ("ri", GCBProperty::RegionalIndicator),
    ("regionalindicator", GCBProperty::RegionalIndicator),
    ("pp", GCBProperty::Prepend),
    ("prepend", GCBProperty::Prepend),
    ("sm", GCBProperty::SpacingMark),
    ("spacingmark", GCBProperty::SpacingMark),
    ("l", GCBProperty::L),
    ("v", GCBProperty::V),
    ("t", GCBProperty::T),
    ("lv", GCBProperty::LV),
    ("lvt", GCBProperty::LVT),
    ("xx", GCBProperty::None),
    ("other", GCBProperty::None),
];

const WORD_BREAK: &[(&str, WBProperty)] = &[
    ("cr", WBProperty::CR),
    ("lf", WBProperty::LF),
    ("nl", WBProperty::Newline),
    ("newline", WBProperty::Newline),
    ("extend", WBProperty::Extend),
    ("zwj", WBProperty::ZWJ),
    ("ri", WBProperty::RegionalIndicator),
    ("regionalindicator", WBProperty::RegionalIndicator),
    ("fo", WBProperty::Format),
    ("format", WBProperty::Format),
    ("ka", WBProperty::Katakana),
    ("katakana", WBProperty::Katakana),
    ("hl", WBProperty::HebrewLetter),
    ("hebrewletter", WBProperty::HebrewLetter),
    ("le", WBProperty::ALetter),
    ("aletter", WBProperty::ALetter),
    ("sq", WBProperty::SingleQuote),
    ("singlequote", WBProperty::SingleQuote),
    ("dq", WBProperty::DoubleQuote),
    ("doublequote", WBProperty::DoubleQuote),
    ("mb", WBProperty::MidNumLet),
    ("midnumlet", WBProperty::MidNumLet),
    ("ml", WBProperty::MidLetter),
    ("midletter", WBProperty::MidLetter),
    ("mn", WBProperty::MidNum),
    ("midnum", WBProperty::MidNum),
    ("nu", WBProperty::Numeric),
    ("numeric", WBProperty::Numeric),
    ("ex", WBProperty::ExtendNumLet),
    ("extendnumlet", WBProperty::ExtendNumLet),
    ("wsegspace", WBProperty::WSegSpace),
    ("xx", WBProperty::Other),
    ("other", WBProperty::Other),
];

const SENTENCE_BREAK: &[(&str, SBProperty)] = &[
    ("cr", SBProperty::CR),
    ("lf", SBProperty::LF),
    ("ex", SBProperty::Extend),
    ("extend", SBProperty::Extend),
    ("se", SBProperty::Sep),
    ("sep", SBProperty::Sep),
    ("fo", SBProperty::Format),
    ("format", SBProperty::Format),
    ("sp", SBProperty::Sp),
    ("lo", SBProperty::Lower),
    ("lower", SBProperty::Lower),
    ("up", SBProperty::Upper),
    ("upper", SBProperty::Upper),
    ("le", SBProperty::OLetter),
    ("oletter", SBProperty::OLetter),
    ("nu", SBProperty::Numeric),
    ("numeric", SBProperty::Numeric),
    ("at", SBProperty::ATerm),
    ("aterm", SBProperty::ATerm),
    ("sc", SBProperty::SContinue),
    ("scontinue", SBProperty::SContinue),
    ("st", SBProperty::STerm),
    ("sterm", SBProperty::STerm),
    ("cl", SBProperty::Close),
    ("close", SBProperty::Close),
    ("xx", SBProperty::Other),
    ("other", SBProperty::Other),
];

const LINE_BREAK: &[(&str, LBProperty)] = &[
    ("bk", LBProperty::BK),
    ("cr", LBProperty::CR),
    ("lf", LBProperty::LF),
    ("nl", LBProperty::NL),
    ("sp", LBProperty::SP),
    ("zw", LBProperty::ZW),
    ("wj", LBProperty::WJ),
    ("gl", LBProperty::GL),
    ("cm", LBProperty::CM),
    ("zwj", LBProperty::ZWJ),
    ("ba", LBProperty::BA),
    ("bb", LBProperty::BB),
    ("b2", LBProperty::B2),
    ("hy", LBProperty::HY),
    ("cb", LBProperty::CB),
    ("cl", LBProperty::CL),
    ("cp", LBProperty::CP),
    ("ex", LBProperty::EX),
    ("in", LBProperty::IN),
    ("ns", LBProperty::NS),
    ("op", LBProperty::OP),
    ("qu", LBProperty::QU),
    ("is", LBProperty::IS),
    ("nu", LBProperty::NU),
    ("po", LBProperty::PO),
    ("pr", LBProperty::PR),
    ("sy", LBProperty::SY),
    ("ai", LBProperty::AI),
    ("al", LBProperty::AL),
    ("cj", LBProperty::CJ),
    ("eb", LBProperty::EB),
    ("em", LBProperty::EM),
    ("h2", LBProperty::H2),
    ("h3", LBProperty::H3),
    ("hl", LBProperty::HL),
    ("id", LBProperty::ID),
    ("jl", LBProperty::JL),
    ("jv", LBProperty::JV),
    ("jt", LBProperty::JT),
    ("ri", LBProperty::RI),
    ("sa", LBProperty::SA),
    ("sg", LBProperty::SG),
    ("xx", LBProperty::XX),
    ("ak", LBProperty::AK),
    ("ap", LBProperty::AP),
    ("as", LBProperty::AS),
    ("vf", LBProperty::VF),
    ("vi", LBProperty::VI),
    ("hh", LBProperty::HH),
];
