//! Character, species, and region rows plus aggregate views over them.

use distopia_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `characters` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Character {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub species: Option<String>,
    pub ability: Option<String>,
    pub attack_power: Option<i32>,
    pub defense_power: Option<i32>,
    pub battle_style: Option<String>,
    pub speech_pattern: Option<String>,
    pub is_new: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `species` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Species {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub abilities: Option<String>,
    pub is_new: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `regions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Region {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub climate: Option<String>,
    pub is_new: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for bulk character import. Only `name` is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCharacter {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub species: Option<String>,
    pub ability: Option<String>,
    pub attack_power: Option<i32>,
    pub defense_power: Option<i32>,
    pub battle_style: Option<String>,
    pub speech_pattern: Option<String>,
}

/// Every lore row, grouped by category. Also used for search results.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoreSnapshot {
    pub characters: Vec<Character>,
    pub species: Vec<Species>,
    pub regions: Vec<Region>,
}

impl LoreSnapshot {
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty() && self.species.is_empty() && self.regions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.characters.len() + self.species.len() + self.regions.len()
    }
}

/// Row counts per category and the most recent modification time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LoreStats {
    pub characters: i64,
    pub species: i64,
    pub regions: i64,
    /// `None` when every lore table is empty.
    pub latest_update: Option<Timestamp>,
}
