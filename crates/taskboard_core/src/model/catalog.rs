//! Global label and member catalogs.
//!
//! # Responsibility
//! - Define `Label` and `Member`, shared by reference across all cards.
//! - Parse label colors from palette names or hex literals.
//!
//! # Invariants
//! - Label and member ids are unique within their collection.
//! - A stored `LabelColor::Hex` always matches `#rgb` or `#rrggbb`.

use crate::model::new_id;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

static HEX_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid hex color regex")
});

/// Stable label identifier.
pub type LabelId = String;

/// Stable member identifier.
pub type MemberId = String;

/// Fixed symbolic label palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteColor {
    Green,
    Amber,
    Red,
    Violet,
    Blue,
    Teal,
    Orange,
    Pink,
    /// Fallback for unknown or missing colors.
    Gray,
}

impl PaletteColor {
    /// All palette entries in display order.
    pub const ALL: [PaletteColor; 9] = [
        Self::Green,
        Self::Amber,
        Self::Red,
        Self::Violet,
        Self::Blue,
        Self::Teal,
        Self::Orange,
        Self::Pink,
        Self::Gray,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Amber => "amber",
            Self::Red => "red",
            Self::Violet => "violet",
            Self::Blue => "blue",
            Self::Teal => "teal",
            Self::Orange => "orange",
            Self::Pink => "pink",
            Self::Gray => "gray",
        }
    }

    /// Looks up a palette entry by case-insensitive name.
    pub fn from_name(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|color| color.as_str() == normalized.as_str())
    }
}

/// Label color: either a palette name or a literal hex value.
///
/// Serialized as a plain string (`"green"`, `"#ff0000"`). Deserialization is
/// lenient and maps unknown values to `PaletteColor::Gray`; use
/// [`LabelColor::parse`] where malformed input must be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LabelColor {
    Palette(PaletteColor),
    Hex(String),
}

impl LabelColor {
    /// Strictly parses a color value.
    ///
    /// Returns `None` when `value` is neither a palette name nor a
    /// `#rgb`/`#rrggbb` literal.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if HEX_COLOR_RE.is_match(trimmed) {
            return Some(Self::Hex(trimmed.to_string()));
        }
        PaletteColor::from_name(trimmed).map(Self::Palette)
    }

    /// Parses a color value, falling back to gray for anything unknown.
    pub fn parse_lenient(value: &str) -> Self {
        Self::parse(value).unwrap_or(Self::Palette(PaletteColor::Gray))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Palette(color) => color.as_str(),
            Self::Hex(value) => value.as_str(),
        }
    }

    pub fn is_hex(&self) -> bool {
        matches!(self, Self::Hex(_))
    }
}

impl Default for LabelColor {
    fn default() -> Self {
        Self::Palette(PaletteColor::Gray)
    }
}

impl Display for LabelColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for LabelColor {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl From<LabelColor> for String {
    fn from(value: LabelColor) -> Self {
        value.as_str().to_string()
    }
}

/// Global label shared by reference across cards.
///
/// Two labels may share a name; identity is the id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: LabelId,
    pub name: String,
    pub color: LabelColor,
}

impl Label {
    /// Creates a label with a freshly generated id.
    pub fn new(name: impl Into<String>, color: LabelColor) -> Self {
        Self::with_id(new_id(), name, color)
    }

    pub fn with_id(id: impl Into<String>, name: impl Into<String>, color: LabelColor) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color,
        }
    }

    /// Display fallback for a card reference that does not resolve.
    pub fn placeholder(id: &str) -> Self {
        Self::with_id(id, id, LabelColor::default())
    }
}

/// Global member shared by reference across cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
}

impl Member {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Display fallback for a card reference that does not resolve.
    pub fn placeholder(id: &str) -> Self {
        Self::new(id, id)
    }
}
