//! Repository for the lore tables (`characters`, `species`, `regions`).
//!
//! Category-generic operations interpolate [`LoreCategory::table`], which
//! only ever yields one of the three fixed table names.

use distopia_core::lore::LoreCategory;
use distopia_core::types::DbId;
use sqlx::PgPool;

use super::append_on_conflict;
use crate::models::lore::{Character, CreateCharacter, LoreSnapshot, LoreStats, Region, Species};
use crate::models::UpsertOutcome;

const CHARACTER_COLUMNS: &str = "id, name, description, species, ability, attack_power, \
     defense_power, battle_style, speech_pattern, is_new, created_at, updated_at";

const SPECIES_COLUMNS: &str =
    "id, name, description, abilities, is_new, created_at, updated_at";

const REGION_COLUMNS: &str = "id, name, description, climate, is_new, created_at, updated_at";

/// Lore CRUD, search, and bookkeeping.
pub struct LoreRepo;

impl LoreRepo {
    // -----------------------------------------------------------------------
    // Upsert-by-name
    // -----------------------------------------------------------------------

    /// Insert a lore row, or append `description` to the row with the same
    /// name. Either way the row is flagged `is_new` again.
    ///
    /// Returns the row id wrapped in the outcome.
    pub async fn remember(
        pool: &PgPool,
        category: LoreCategory,
        name: &str,
        description: &str,
    ) -> Result<UpsertOutcome<DbId>, sqlx::Error> {
        let table = category.table();
        let query = format!(
            "INSERT INTO {table} (name, description)
             VALUES ($1, $2)
             ON CONFLICT (name) DO UPDATE SET
                description = {},
                is_new = TRUE,
                updated_at = NOW()
             RETURNING id, (xmax = 0) AS inserted",
            append_on_conflict(table, "description")
        );
        let (id, inserted) = sqlx::query_as::<_, (DbId, bool)>(&query)
            .bind(name)
            .bind(description)
            .fetch_one(pool)
            .await?;
        Ok(UpsertOutcome::from_inserted(inserted, id))
    }

    /// Bulk upsert of full character rows inside one transaction.
    ///
    /// Descriptions append like [`LoreRepo::remember`]; the other columns
    /// take the imported value when present and keep the stored one otherwise.
    pub async fn import_characters(
        pool: &PgPool,
        rows: &[CreateCharacter],
    ) -> Result<usize, sqlx::Error> {
        let query = format!(
            "INSERT INTO characters
                (name, description, species, ability, attack_power, defense_power,
                 battle_style, speech_pattern)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (name) DO UPDATE SET
                description = {},
                species = COALESCE(EXCLUDED.species, characters.species),
                ability = COALESCE(EXCLUDED.ability, characters.ability),
                attack_power = COALESCE(EXCLUDED.attack_power, characters.attack_power),
                defense_power = COALESCE(EXCLUDED.defense_power, characters.defense_power),
                battle_style = COALESCE(EXCLUDED.battle_style, characters.battle_style),
                speech_pattern = COALESCE(EXCLUDED.speech_pattern, characters.speech_pattern),
                is_new = TRUE,
                updated_at = NOW()",
            append_on_conflict("characters", "description")
        );

        let mut tx = pool.begin().await?;
        for row in rows {
            sqlx::query(&query)
                .bind(&row.name)
                .bind(&row.description)
                .bind(&row.species)
                .bind(&row.ability)
                .bind(row.attack_power)
                .bind(row.defense_power)
                .bind(&row.battle_style)
                .bind(&row.speech_pattern)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(rows.len())
    }

    // -----------------------------------------------------------------------
    // Listing and search
    // -----------------------------------------------------------------------

    pub async fn list_characters(pool: &PgPool) -> Result<Vec<Character>, sqlx::Error> {
        let query = format!("SELECT {CHARACTER_COLUMNS} FROM characters ORDER BY id");
        sqlx::query_as::<_, Character>(&query).fetch_all(pool).await
    }

    pub async fn list_species(pool: &PgPool) -> Result<Vec<Species>, sqlx::Error> {
        let query = format!("SELECT {SPECIES_COLUMNS} FROM species ORDER BY id");
        sqlx::query_as::<_, Species>(&query).fetch_all(pool).await
    }

    pub async fn list_regions(pool: &PgPool) -> Result<Vec<Region>, sqlx::Error> {
        let query = format!("SELECT {REGION_COLUMNS} FROM regions ORDER BY id");
        sqlx::query_as::<_, Region>(&query).fetch_all(pool).await
    }

    /// Every lore row, grouped by category.
    pub async fn list_all(pool: &PgPool) -> Result<LoreSnapshot, sqlx::Error> {
        Ok(LoreSnapshot {
            characters: Self::list_characters(pool).await?,
            species: Self::list_species(pool).await?,
            regions: Self::list_regions(pool).await?,
        })
    }

    /// Search every category independently for names containing `substring`
    /// (literal, case-sensitive) and merge the hits by category.
    pub async fn search(pool: &PgPool, substring: &str) -> Result<LoreSnapshot, sqlx::Error> {
        let characters = sqlx::query_as::<_, Character>(&format!(
            "SELECT {CHARACTER_COLUMNS} FROM characters WHERE strpos(name, $1) > 0 ORDER BY id"
        ))
        .bind(substring)
        .fetch_all(pool)
        .await?;

        let species = sqlx::query_as::<_, Species>(&format!(
            "SELECT {SPECIES_COLUMNS} FROM species WHERE strpos(name, $1) > 0 ORDER BY id"
        ))
        .bind(substring)
        .fetch_all(pool)
        .await?;

        let regions = sqlx::query_as::<_, Region>(&format!(
            "SELECT {REGION_COLUMNS} FROM regions WHERE strpos(name, $1) > 0 ORDER BY id"
        ))
        .bind(substring)
        .fetch_all(pool)
        .await?;

        Ok(LoreSnapshot {
            characters,
            species,
            regions,
        })
    }

    // -----------------------------------------------------------------------
    // Delete / bookkeeping
    // -----------------------------------------------------------------------

    /// Delete the row named `name` in `category`. Returns `true` if a row was removed.
    pub async fn delete_by_name(
        pool: &PgPool,
        category: LoreCategory,
        name: &str,
    ) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM {} WHERE name = $1", category.table());
        let result = sqlx::query(&query).bind(name).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear the `is_new` flag everywhere. Returns how many rows changed.
    pub async fn confirm_view(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut cleared = 0;
        for category in LoreCategory::ALL {
            let query = format!(
                "UPDATE {} SET is_new = FALSE WHERE is_new = TRUE",
                category.table()
            );
            cleared += sqlx::query(&query).execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;
        Ok(cleared)
    }

    /// Per-category counts plus the latest `updated_at` across all lore tables.
    pub async fn stats(pool: &PgPool) -> Result<LoreStats, sqlx::Error> {
        sqlx::query_as::<_, LoreStats>(
            "SELECT
                (SELECT COUNT(*) FROM characters) AS characters,
                (SELECT COUNT(*) FROM species) AS species,
                (SELECT COUNT(*) FROM regions) AS regions,
                (SELECT MAX(updated_at) FROM (
                    SELECT updated_at FROM characters
                    UNION ALL SELECT updated_at FROM species
                    UNION ALL SELECT updated_at FROM regions
                ) AS lore) AS latest_update",
        )
        .fetch_one(pool)
        .await
    }
}
