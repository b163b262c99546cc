use crate::properties::{CharProperties, GCBProperty, InCBProperty};

/// What the machine remembers about the characters before the most recent
/// one. Each rule that looks further back than one character gets a state
/// for every prefix of the pattern it is waiting for, so clusters of any
/// length are handled in constant space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Nothing is pending. Also the state at the start of input.
    Base,

    /// The last character ended an odd-length run of regional indicators,
    /// so another one would complete a flag (GB12, GB13).
    UnpairedIndicator,

    /// Seen `\p{Extended_Pictographic} Extend*`.
    Pictograph,

    /// Seen `\p{Extended_Pictographic} Extend* ZWJ`, so a following
    /// pictograph joins the cluster (GB11).
    PictographJoiner,

    /// Seen `\p{InCB=Consonant} \p{InCB=Extend}*`.
    Consonant,

    /// Seen a consonant followed by extenders and linkers, with at least one
    /// linker among them, so a following consonant joins (GB9c).
    ConsonantLinked,
}

/// The UAX #29 rule that decided a transition. GB12 and GB13 differ only in
/// what comes before the run of indicators, which this machine does not
/// need to tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    GB1,
    GB3,
    GB4,
    GB5,
    GB6,
    GB7,
    GB8,
    GB9,
    GB9a,
    GB9b,
    GB9c,
    GB11,
    GB12,
    GB999,
}

/// The outcome of feeding one character to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Whether a cluster boundary comes before the new character.
    pub boundary: bool,
    pub rule: Rule,
    /// The state to use for the character after this one.
    pub state: State,
}

impl State {
    /// Decides whether there is a boundary between `prev` and `next`.
    ///
    /// `prev` is `None` at the start of input. Otherwise it must be the
    /// `next` of the step that produced `self`.
    pub fn transition(self, prev: Option<CharProperties>, next: CharProperties) -> Step {
        let (boundary, rule, state) = match prev {
            None => (true, Rule::GB1, State::Base.advance(next)),
            Some(prev) => {
                let (boundary, rule) = self.decide(prev, next);
                (boundary, rule, self.advance(next))
            }
        };
        Step {
            boundary,
            rule,
            state,
        }
    }

    fn decide(self, prev: CharProperties, next: CharProperties) -> (bool, Rule) {
        use GCBProperty::*;

        let (before, after) = (prev.gcb_property(), next.gcb_property());
        match (before, after) {
            (CR, LF) => (false, Rule::GB3),
            (b, _) if b.is_control() => (true, Rule::GB4),
            (_, a) if a.is_control() => (true, Rule::GB5),
            (L, L | V | LV | LVT) => (false, Rule::GB6),
            (LV | V, V | T) => (false, Rule::GB7),
            (LVT | T, T) => (false, Rule::GB8),
            (_, Extend | ZWJ) => (false, Rule::GB9),
            (_, SpacingMark) => (false, Rule::GB9a),
            (Prepend, _) => (false, Rule::GB9b),
            _ if self == State::ConsonantLinked
                && matches!(prev.incb_property(), InCBProperty::Linker | InCBProperty::Extend)
                && next.incb_property() == InCBProperty::Consonant =>
            {
                (false, Rule::GB9c)
            }
            (ZWJ, ExtendedPictographic) if self == State::PictographJoiner => (false, Rule::GB11),
            (RegionalIndicator, RegionalIndicator) if self == State::UnpairedIndicator => {
                (false, Rule::GB12)
            }
            _ => (true, Rule::GB999),
        }
    }

    /// Returns the state after `next` has been consumed.
    fn advance(self, next: CharProperties) -> State {
        let gcb = next.gcb_property();
        let incb = next.incb_property();

        // Patterns that can start anywhere.
        if gcb == GCBProperty::ExtendedPictographic {
            return State::Pictograph;
        }
        if incb == InCBProperty::Consonant {
            return State::Consonant;
        }
        if gcb == GCBProperty::RegionalIndicator {
            return match self {
                State::UnpairedIndicator => State::Base,
                _ => State::UnpairedIndicator,
            };
        }

        match (self, gcb, incb) {
            (State::Pictograph, GCBProperty::ZWJ, _) => State::PictographJoiner,
            (State::Pictograph, GCBProperty::Extend, _) => State::Pictograph,
            (State::Consonant, _, InCBProperty::Linker) => State::ConsonantLinked,
            (State::Consonant, _, InCBProperty::Extend) => State::Consonant,
            (State::ConsonantLinked, _, InCBProperty::Linker | InCBProperty::Extend) => {
                State::ConsonantLinked
            }
            _ => State::Base,
        }
    }
}
