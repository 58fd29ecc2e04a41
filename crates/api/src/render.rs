//! Plain-text, Markdown, and HTML renderings of the lore tables.

use distopia_core::lore::{new_marker, LoreCategory, NO_MATCH_MESSAGE};
use distopia_db::models::lore::LoreSnapshot;

/// Markdown document listing every lore row by category.
pub fn lore_markdown(snapshot: &LoreSnapshot) -> String {
    let mut md = String::from("# Stored Data\n");

    md.push_str(&format!("\n## {}\n", LoreCategory::Character.heading()));
    for c in &snapshot.characters {
        md.push_str(&format!(
            "- **{}{}** ({})\n",
            new_marker(c.is_new),
            c.name,
            c.species.as_deref().unwrap_or("unknown species"),
        ));
        if !c.description.is_empty() {
            md.push_str(&format!("  - Description: {}\n", c.description));
        }
    }

    md.push_str(&format!("\n## {}\n", LoreCategory::Species.heading()));
    for s in &snapshot.species {
        md.push_str(&format!("- **{}{}**\n", new_marker(s.is_new), s.name));
        md.push_str(&format!("  - Description: {}\n", s.description));
    }

    md.push_str(&format!("\n## {}\n", LoreCategory::Region.heading()));
    for r in &snapshot.regions {
        md.push_str(&format!("- **{}{}**\n", new_marker(r.is_new), r.name));
        md.push_str(&format!("  - Description: {}\n", r.description));
    }

    md
}

/// Standalone HTML page listing every lore row. All stored values are escaped.
pub fn lore_html(snapshot: &LoreSnapshot) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Stored Data</title></head><body>\n<h1>Stored Data</h1>\n",
    );

    html.push_str(&format!("<h2>{}</h2>\n", LoreCategory::Character.heading()));
    for c in &snapshot.characters {
        html.push_str(&format!(
            "<p>{}<strong>{}</strong> ({})</p>\n",
            new_marker(c.is_new),
            escape_html(&c.name),
            escape_html(c.species.as_deref().unwrap_or("unknown species")),
        ));
    }

    html.push_str(&format!("<h2>{}</h2>\n", LoreCategory::Species.heading()));
    for s in &snapshot.species {
        html.push_str(&format!(
            "<p>{}<strong>{}</strong> - {}</p>\n",
            new_marker(s.is_new),
            escape_html(&s.name),
            escape_html(&s.description),
        ));
    }

    html.push_str(&format!("<h2>{}</h2>\n", LoreCategory::Region.heading()));
    for r in &snapshot.regions {
        html.push_str(&format!(
            "<p>{}<strong>{}</strong> - {}</p>\n",
            new_marker(r.is_new),
            escape_html(&r.name),
            escape_html(&r.description),
        ));
    }

    html.push_str("</body></html>\n");
    html
}

/// Reply for the keyword world chat: the matching rows, or a fixed hint.
pub fn world_chat_reply(hits: &LoreSnapshot) -> String {
    if hits.is_empty() {
        return NO_MATCH_MESSAGE.to_string();
    }

    let mut out = String::new();
    if !hits.characters.is_empty() {
        out.push_str(&format!("{}:\n", LoreCategory::Character.heading()));
        for c in &hits.characters {
            match &c.species {
                Some(species) => out.push_str(&format!("- {} ({species})\n", c.name)),
                None => out.push_str(&format!("- {}\n", c.name)),
            }
        }
    }
    if !hits.species.is_empty() {
        out.push_str(&format!("{}:\n", LoreCategory::Species.heading()));
        for s in &hits.species {
            out.push_str(&format!("- {}\n  Description: {}\n", s.name, s.description));
        }
    }
    if !hits.regions.is_empty() {
        out.push_str(&format!("{}:\n", LoreCategory::Region.heading()));
        for r in &hits.regions {
            out.push_str(&format!("- {}\n  Description: {}\n", r.name, r.description));
        }
    }
    out
}

/// Escape the five HTML-significant characters.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use distopia_db::models::lore::{Character, Region, Species};

    use super::*;

    fn snapshot() -> LoreSnapshot {
        let now = Utc::now();
        LoreSnapshot {
            characters: vec![Character {
                id: 1,
                name: "Elara".into(),
                description: "A scout.".into(),
                species: Some("Human".into()),
                ability: None,
                attack_power: None,
                defense_power: None,
                battle_style: None,
                speech_pattern: None,
                is_new: true,
                created_at: now,
                updated_at: now,
            }],
            species: vec![Species {
                id: 1,
                name: "Shadowkin".into(),
                description: "Live <underground> & hide.".into(),
                abilities: None,
                is_new: false,
                created_at: now,
                updated_at: now,
            }],
            regions: vec![Region {
                id: 1,
                name: "Frostreach".into(),
                description: "Cold.".into(),
                climate: None,
                is_new: false,
                created_at: now,
                updated_at: now,
            }],
        }
    }

    #[test]
    fn markdown_marks_new_rows() {
        let md = lore_markdown(&snapshot());
        assert!(md.starts_with("# Stored Data\n"));
        assert!(md.contains("## Characters\n- **[NEW] Elara** (Human)\n"));
        assert!(md.contains("- **Shadowkin**\n"));
        assert!(md.contains("## Regions\n- **Frostreach**\n  - Description: Cold.\n"));
    }

    #[test]
    fn html_escapes_stored_values() {
        let html = lore_html(&snapshot());
        assert!(html.contains("Live &lt;underground&gt; &amp; hide."));
        assert!(!html.contains("<underground>"));
        assert!(html.contains("[NEW] <strong>Elara</strong>"));
    }

    #[test]
    fn world_chat_lists_only_matching_categories() {
        let mut hits = snapshot();
        hits.regions.clear();
        let reply = world_chat_reply(&hits);
        assert!(reply.starts_with("Characters:\n- Elara (Human)\n"));
        assert!(reply.contains("Species:\n- Shadowkin\n"));
        assert!(!reply.contains("Regions"));
    }

    #[test]
    fn world_chat_without_hits_returns_hint() {
        assert_eq!(world_chat_reply(&LoreSnapshot::default()), NO_MATCH_MESSAGE);
    }

    #[test]
    fn escape_covers_quotes() {
        assert_eq!(escape_html(r#"<a href="x">'"#), "&lt;a href=&quot;x&quot;&gt;&#x27;");
    }
}
