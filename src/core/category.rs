//! Unit type normalization.
//!
//! Raw data labels its rows with a single letter, sometimes followed by the
//! `型` ("type") marker: `"A"`, `"b"`, `"C型"`. Everything else is noise.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Suffix marker accepted after the type letter.
pub const TYPE_SUFFIX: char = '型';

/// Canonical unit type.
///
/// `D` shows up in some source collections but never takes part in a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UnitType {
    A,
    B,
    C,
    D,
}

impl UnitType {
    /// The searchable types, in group order.
    pub const SEARCHABLE: [Self; 3] = [Self::A, Self::B, Self::C];

    #[must_use]
    pub const fn is_searchable(self) -> bool {
        !matches!(self, Self::D)
    }

    /// Index of this type's group in a candidate pool.
    #[must_use]
    pub const fn group_index(self) -> Option<usize> {
        match self {
            Self::A => Some(0),
            Self::B => Some(1),
            Self::C => Some(2),
            Self::D => None,
        }
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }

    const fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            _ => None,
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Normalize a textual type label.
///
/// Returns `None` for anything that is not exactly one known letter
/// (either case) with an optional trailing [`TYPE_SUFFIX`].
#[must_use]
pub fn normalize_type(label: &str) -> Option<UnitType> {
    let trimmed = label.trim();
    let body = trimmed.strip_suffix(TYPE_SUFFIX).unwrap_or(trimmed);

    let mut chars = body.chars();
    let letter = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    UnitType::from_letter(letter)
}

/// Normalize an arbitrary JSON cell. Non-strings are never recognized.
#[must_use]
pub fn normalize_type_value(value: &Value) -> Option<UnitType> {
    value.as_str().and_then(normalize_type)
}
