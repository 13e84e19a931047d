use crate::heading::Heading;

/// Turn rule bound to a color index
///
/// Only `TurnRight` and `TurnLeft` are produced by the default generator.
/// `TurnBack` and `TurnNone` are kept as primitives for other rule policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRule {
    TurnRight,
    TurnLeft,
    TurnBack,
    TurnNone,
}

impl TurnRule {
    /// Default generation formula: pairs of colors alternate between right and left.
    ///
    /// `((i + 1) / 2) % 2 == 0` selects right, giving R L L R R L L R ...
    pub fn for_index(index: usize) -> Self {
        if ((index + 1) / 2) % 2 == 0 {
            TurnRule::TurnRight
        } else {
            TurnRule::TurnLeft
        }
    }

    /// Apply this rule to the current heading
    pub fn apply(self, heading: Heading) -> Heading {
        match self {
            TurnRule::TurnRight => heading.clockwise(),
            TurnRule::TurnLeft => heading.counter_clockwise(),
            TurnRule::TurnBack => heading.reversed(),
            TurnRule::TurnNone => heading,
        }
    }

    /// Single-letter code used in logs (R, L, B, N)
    pub fn symbol(self) -> char {
        match self {
            TurnRule::TurnRight => 'R',
            TurnRule::TurnLeft => 'L',
            TurnRule::TurnBack => 'B',
            TurnRule::TurnNone => 'N',
        }
    }
}
