//! Lore categories (characters, species, regions).
//!
//! Each category maps to exactly one table. Table names only ever come from
//! [`LoreCategory::table`], so they are safe to interpolate into SQL.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Separator placed between an existing description and an appended one.
pub const DESCRIPTION_SEPARATOR: &str = " ";

/// Message returned by the keyword world chat when nothing matched.
pub const NO_MATCH_MESSAGE: &str =
    "No matching information found. Use /remember/ to add it to the world.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoreCategory {
    Character,
    Species,
    Region,
}

impl LoreCategory {
    /// Every category, in display order.
    pub const ALL: [LoreCategory; 3] = [Self::Character, Self::Species, Self::Region];

    /// Parse from the wire name (`character`, `species`, `region`).
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "character" => Ok(Self::Character),
            "species" => Ok(Self::Species),
            "region" => Ok(Self::Region),
            other => Err(CoreError::Validation(format!(
                "Invalid category '{other}'. Must be one of: character, species, region"
            ))),
        }
    }

    /// Wire name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Species => "species",
            Self::Region => "region",
        }
    }

    /// Backing table.
    pub fn table(self) -> &'static str {
        match self {
            Self::Character => "characters",
            Self::Species => "species",
            Self::Region => "regions",
        }
    }

    /// Section heading used by the Markdown/HTML views and the world chat.
    pub fn heading(self) -> &'static str {
        match self {
            Self::Character => "Characters",
            Self::Species => "Species",
            Self::Region => "Regions",
        }
    }
}

impl std::fmt::Display for LoreCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Prefix shown in front of names that have not been confirmed as viewed.
pub fn new_marker(is_new: bool) -> &'static str {
    if is_new {
        "[NEW] "
    } else {
        ""
    }
}
