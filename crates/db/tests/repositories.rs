//! Integration tests for the repository layer against a real database.
//!
//! Covers the append-on-duplicate upsert, literal substring search, the
//! not-found signals returned by update/delete, and the answer cache.

use assert_matches::assert_matches;
use distopia_core::lore::LoreCategory;
use distopia_db::models::data::UpdateDataEntry;
use distopia_db::models::document::CreateDocument;
use distopia_db::models::lore::CreateCharacter;
use distopia_db::models::UpsertOutcome;
use distopia_db::repositories::{
    ChatSessionRepo, ConversationRepo, DataRepo, DocumentRepo, FeedbackRepo, LoreRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// dtp_data
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_name_appends_description(pool: PgPool) {
    let first = DataRepo::upsert_append(&pool, "Elara", "A scout.").await.unwrap();
    assert_matches!(first, UpsertOutcome::Created(_));

    let second = DataRepo::upsert_append(&pool, "Elara", "Born in the north.")
        .await
        .unwrap();
    assert_matches!(second, UpsertOutcome::Updated(_));

    let rows = DataRepo::list_all(&pool).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Elara");
    assert_eq!(rows[0].description, "A scout. Born in the north.");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_descriptions_do_not_add_separators(pool: PgPool) {
    DataRepo::upsert_append(&pool, "Blank", "").await.unwrap();
    let entry = DataRepo::upsert_append(&pool, "Blank", "Now filled.")
        .await
        .unwrap()
        .into_inner();
    assert_eq!(entry.description, "Now filled.");

    let entry = DataRepo::upsert_append(&pool, "Blank", "")
        .await
        .unwrap()
        .into_inner();
    assert_eq!(entry.description, "Now filled.");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_upserts_keep_every_append(pool: PgPool) {
    DataRepo::upsert_append(&pool, "Race", "start").await.unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            DataRepo::upsert_append(&pool, "Race", &format!("part{i}"))
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let rows = DataRepo::list_all(&pool).await.unwrap();
    assert_eq!(rows.len(), 1);
    for i in 0..8 {
        assert!(
            rows[0].description.contains(&format!("part{i}")),
            "append part{i} was lost: {}",
            rows[0].description
        );
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn search_is_literal_and_case_sensitive(pool: PgPool) {
    for name in ["Elara", "elara", "Gale_Runner", "Galerunner", "100% Iron"] {
        DataRepo::upsert_append(&pool, name, "x").await.unwrap();
    }

    let names = |rows: Vec<distopia_db::models::data::DataEntry>| {
        rows.into_iter().map(|r| r.name).collect::<Vec<_>>()
    };

    assert_eq!(names(DataRepo::search(&pool, "Ela").await.unwrap()), vec!["Elara"]);
    assert_eq!(names(DataRepo::search(&pool, "_R").await.unwrap()), vec!["Gale_Runner"]);
    assert_eq!(names(DataRepo::search(&pool, "%").await.unwrap()), vec!["100% Iron"]);
    assert!(DataRepo::search(&pool, "zzz").await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_and_delete_report_missing_rows(pool: PgPool) {
    let input = UpdateDataEntry {
        name: "Nobody".into(),
        description: "Nothing".into(),
    };
    assert!(DataRepo::update(&pool, 999_999, &input).await.unwrap().is_none());
    assert!(!DataRepo::delete(&pool, 999_999).await.unwrap());

    let created = DataRepo::upsert_append(&pool, "Old", "old")
        .await
        .unwrap()
        .into_inner();
    let updated = DataRepo::update(&pool, created.id, &input)
        .await
        .unwrap()
        .expect("row exists");
    assert_eq!(updated.name, "Nobody");
    assert_eq!(updated.description, "Nothing");

    assert!(DataRepo::delete(&pool, created.id).await.unwrap());
    assert!(DataRepo::list_all(&pool)
        .await
        .unwrap()
        .iter()
        .all(|e| e.id != created.id));
}

// ---------------------------------------------------------------------------
// Lore
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn remember_appends_and_reflags_new(pool: PgPool) {
    let created = LoreRepo::remember(&pool, LoreCategory::Region, "Frostreach", "Cold.")
        .await
        .unwrap();
    assert!(created.is_created());

    LoreRepo::confirm_view(&pool).await.unwrap();
    let regions = LoreRepo::list_regions(&pool).await.unwrap();
    assert!(!regions[0].is_new);

    let updated = LoreRepo::remember(&pool, LoreCategory::Region, "Frostreach", "Windy.")
        .await
        .unwrap();
    assert_matches!(updated, UpsertOutcome::Updated(id) if id == regions[0].id);

    let regions = LoreRepo::list_regions(&pool).await.unwrap();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].description, "Cold. Windy.");
    assert!(regions[0].is_new);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lore_search_merges_categories(pool: PgPool) {
    LoreRepo::remember(&pool, LoreCategory::Character, "Shadowfang", "")
        .await
        .unwrap();
    LoreRepo::remember(&pool, LoreCategory::Species, "Shadowkin", "")
        .await
        .unwrap();
    LoreRepo::remember(&pool, LoreCategory::Region, "Sunvale", "")
        .await
        .unwrap();

    let hits = LoreRepo::search(&pool, "Shadow").await.unwrap();
    assert_eq!(hits.characters.len(), 1);
    assert_eq!(hits.species.len(), 1);
    assert!(hits.regions.is_empty());
    assert_eq!(hits.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_by_name_is_scoped_to_category(pool: PgPool) {
    LoreRepo::remember(&pool, LoreCategory::Species, "Ember", "")
        .await
        .unwrap();

    assert!(!LoreRepo::delete_by_name(&pool, LoreCategory::Region, "Ember")
        .await
        .unwrap());
    assert!(LoreRepo::delete_by_name(&pool, LoreCategory::Species, "Ember")
        .await
        .unwrap());
    assert!(LoreRepo::list_species(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn import_characters_upserts_full_rows(pool: PgPool) {
    let rows = vec![
        CreateCharacter {
            name: "Kael".into(),
            description: "Swordsman.".into(),
            species: Some("Human".into()),
            attack_power: Some(80),
            ..Default::default()
        },
        CreateCharacter {
            name: "Kael".into(),
            description: "Exiled.".into(),
            defense_power: Some(40),
            ..Default::default()
        },
    ];

    assert_eq!(LoreRepo::import_characters(&pool, &rows).await.unwrap(), 2);

    let characters = LoreRepo::list_characters(&pool).await.unwrap();
    assert_eq!(characters.len(), 1);
    let kael = &characters[0];
    assert_eq!(kael.description, "Swordsman. Exiled.");
    assert_eq!(kael.species.as_deref(), Some("Human"));
    assert_eq!(kael.attack_power, Some(80));
    assert_eq!(kael.defense_power, Some(40));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stats_count_rows_and_track_latest_update(pool: PgPool) {
    let empty = LoreRepo::stats(&pool).await.unwrap();
    assert_eq!((empty.characters, empty.species, empty.regions), (0, 0, 0));
    assert!(empty.latest_update.is_none());

    LoreRepo::remember(&pool, LoreCategory::Character, "A", "").await.unwrap();
    LoreRepo::remember(&pool, LoreCategory::Character, "B", "").await.unwrap();
    LoreRepo::remember(&pool, LoreCategory::Region, "C", "").await.unwrap();

    let stats = LoreRepo::stats(&pool).await.unwrap();
    assert_eq!((stats.characters, stats.species, stats.regions), (2, 0, 1));
    assert!(stats.latest_update.is_some());
}

// ---------------------------------------------------------------------------
// Conversation cache, sessions, documents, feedback
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn latest_answer_matches_exact_question_only(pool: PgPool) {
    ConversationRepo::record(&pool, "Who is Elara?", "A scout.").await.unwrap();
    ConversationRepo::record(&pool, "Who is Elara?", "A northern scout.")
        .await
        .unwrap();

    let answer = ConversationRepo::latest_answer(&pool, "Who is Elara?")
        .await
        .unwrap();
    assert_eq!(answer.as_deref(), Some("A northern scout."));

    assert!(ConversationRepo::latest_answer(&pool, "who is elara?")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn session_history_is_ordered_per_session(pool: PgPool) {
    ChatSessionRepo::append_exchange(&pool, "s1", "q1", "a1").await.unwrap();
    ChatSessionRepo::append_exchange(&pool, "s2", "other", "other").await.unwrap();
    ChatSessionRepo::append_exchange(&pool, "s1", "q2", "a2").await.unwrap();

    let turns = ChatSessionRepo::history(&pool, "s1").await.unwrap();
    let flat: Vec<_> = turns
        .iter()
        .map(|t| (t.role.as_str(), t.content.as_str()))
        .collect();
    assert_eq!(
        flat,
        vec![
            ("user", "q1"),
            ("assistant", "a1"),
            ("user", "q2"),
            ("assistant", "a2"),
        ]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn nearest_documents_are_ordered_by_distance(pool: PgPool) {
    let doc = |content: &str| CreateDocument {
        source: "test".into(),
        content: content.into(),
    };
    DocumentRepo::insert(&pool, &doc("north"), &[1.0, 0.0, 0.0]).await.unwrap();
    DocumentRepo::insert(&pool, &doc("east"), &[0.0, 1.0, 0.0]).await.unwrap();
    DocumentRepo::insert(&pool, &doc("mostly north"), &[0.9, 0.1, 0.0])
        .await
        .unwrap();

    let hits = DocumentRepo::nearest(&pool, &[1.0, 0.0, 0.0], 2).await.unwrap();
    let contents: Vec<_> = hits.iter().map(|h| h.content.as_str()).collect();
    assert_eq!(contents, vec!["north", "mostly north"]);
    assert!(hits[0].distance <= hits[1].distance);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn feedback_appends_and_preferences_overwrite(pool: PgPool) {
    FeedbackRepo::append_feedback(&pool, "mina", "More maps.").await.unwrap();
    let fb = FeedbackRepo::append_feedback(&pool, "mina", "Fewer typos.")
        .await
        .unwrap();
    assert_eq!(fb.feedback, "More maps. Fewer typos.");

    FeedbackRepo::set_preferences(&pool, "mina", "dark theme").await.unwrap();
    let prefs = FeedbackRepo::set_preferences(&pool, "mina", "light theme")
        .await
        .unwrap();
    assert_eq!(prefs.preferences, "light theme");

    let all = FeedbackRepo::list_feedback(&pool).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].username, "mina");
}
