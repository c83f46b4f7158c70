use std::collections::HashSet;
use std::fmt;

//
// ─── CHARACTER CLASSES ─────────────────────────────────────────────────────────
//

/// Character classes a password can draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CharClass {
    Lower,
    Upper,
    Digit,
    Symbol,
}

const SYMBOLS: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

impl CharClass {
    /// Every class, in a fixed order.
    pub const ALL: [CharClass; 4] = [
        CharClass::Lower,
        CharClass::Upper,
        CharClass::Digit,
        CharClass::Symbol,
    ];

    /// The full alphabet for this class.
    #[must_use]
    pub fn alphabet(self) -> &'static str {
        match self {
            CharClass::Lower => "abcdefghijklmnopqrstuvwxyz",
            CharClass::Upper => "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
            CharClass::Digit => "0123456789",
            CharClass::Symbol => SYMBOLS,
        }
    }

    #[must_use]
    pub fn matches(self, c: char) -> bool {
        match self {
            CharClass::Lower => c.is_ascii_lowercase(),
            CharClass::Upper => c.is_ascii_uppercase(),
            CharClass::Digit => c.is_ascii_digit(),
            CharClass::Symbol => SYMBOLS.contains(c),
        }
    }
}

//
// ─── STRENGTH SCORING ──────────────────────────────────────────────────────────
//

/// Score a password from 0 to 100.
///
/// Length tiers give up to 30 points, each present character class 10 (max
/// 40), and character uniqueness up to 30. Deterministic; an empty string
/// scores 0.
#[must_use]
pub fn strength_score(password: &str) -> u8 {
    let length = password.chars().count();
    if length == 0 {
        return 0;
    }

    let mut score: u32 = match length {
        0..=5 => 0,
        6..=7 => 10,
        8..=11 => 20,
        _ => 30,
    };

    for class in CharClass::ALL {
        if password.chars().any(|c| class.matches(c)) {
            score += 10;
        }
    }

    let unique: HashSet<char> = password.chars().collect();
    score += (30 * unique.len() / length) as u32;

    score.min(100) as u8
}

/// Human-readable bucket over the strength score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthLabel {
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

impl StrengthLabel {
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => StrengthLabel::VeryStrong,
            60..=79 => StrengthLabel::Strong,
            40..=59 => StrengthLabel::Medium,
            _ => StrengthLabel::Weak,
        }
    }
}

impl fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrengthLabel::Weak => f.write_str("Weak"),
            StrengthLabel::Medium => f.write_str("Medium"),
            StrengthLabel::Strong => f.write_str("Strong"),
            StrengthLabel::VeryStrong => f.write_str("Very Strong"),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
