//! Collection, hadith and reader-state types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder owner for bookmarks and preferences until accounts exist.
pub const DEFAULT_USER_ID: &str = "default-user";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub arabic_name: Option<String>,
    pub compiler: String,
    pub description: Option<String>,
    /// Declared size of the collection, not the number of loaded hadiths
    pub total_hadiths: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hadith {
    /// `<collection_id>-<raw id>`
    pub id: String,
    pub collection_id: String,
    pub hadith_number: String,
    pub book: Option<String>,
    pub chapter: Option<String>,
    pub arabic_text: String,
    pub english_translation: String,
    pub urdu_translation: Option<String>,
    pub roman_urdu_translation: Option<String>,
    pub narrator: Option<String>,
    pub grade: String,
    /// Set when `grade` is the configured fallback rather than a sourced grading
    pub grade_inferred: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: i64,
    pub user_id: String,
    pub hadith_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub user_id: String,
    pub font_size: String,
    pub theme: String,
    pub show_diacritics: bool,
    pub auto_play_audio: bool,
}

impl UserPreferences {
    pub fn defaults_for(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            font_size: "medium".to_string(),
            theme: "light".to_string(),
            show_diacritics: true,
            auto_play_audio: false,
        }
    }

    pub fn apply(&mut self, update: PreferencesUpdate) {
        if let Some(font_size) = update.font_size {
            self.font_size = font_size;
        }
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        if let Some(show_diacritics) = update.show_diacritics {
            self.show_diacritics = show_diacritics;
        }
        if let Some(auto_play_audio) = update.auto_play_audio {
            self.auto_play_audio = auto_play_audio;
        }
    }
}

/// Partial preferences as sent by the client; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    pub font_size: Option<String>,
    pub theme: Option<String>,
    pub show_diacritics: Option<bool>,
    pub auto_play_audio: Option<bool>,
}

fn collection(
    id: &str,
    name: &str,
    arabic_name: &str,
    compiler: &str,
    description: &str,
    total_hadiths: u32,
) -> Collection {
    Collection {
        id: id.to_string(),
        name: name.to_string(),
        arabic_name: Some(arabic_name.to_string()),
        compiler: compiler.to_string(),
        description: Some(description.to_string()),
        total_hadiths,
    }
}

/// The fixed set of collections served, in listing order
pub fn builtin_catalog() -> Vec<Collection> {
    vec![
        collection(
            "bukhari",
            "Sahih al-Bukhari",
            "صحيح البخاري",
            "Imam al-Bukhari",
            "The most authentic collection of Hadith compiled by Imam al-Bukhari, containing over 7,000 verified narrations.",
            7563,
        ),
        collection(
            "muslim",
            "Sahih Muslim",
            "صحيح مسلم",
            "Imam Muslim",
            "The second most authentic collection, compiled by Imam Muslim with strict criteria for authenticity.",
            7190,
        ),
        collection(
            "abudawud",
            "Sunan Abu Dawood",
            "سنن أبي داود",
            "Imam Abu Dawood",
            "A comprehensive collection focusing on legal matters and practical guidance for daily life.",
            5274,
        ),
        collection(
            "tirmidhi",
            "Jami` at-Tirmidhi",
            "جامع الترمذي",
            "Imam at-Tirmidhi",
            "A collection known for its detailed commentary and grading of Hadith authenticity.",
            3956,
        ),
    ]
}

/// Order in which the built-in collection files are read. It differs from the
/// catalog order, and hadith iteration order follows it.
pub fn builtin_load_order() -> Vec<String> {
    ["bukhari", "muslim", "tirmidhi", "abudawud"]
        .iter()
        .map(|id| id.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_unique() {
        let catalog = builtin_catalog();
        let mut ids: Vec<&str> = catalog.iter().map(|c| c.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
        assert_eq!(catalog[0].id, "bukhari");
    }

    #[test]
    fn test_load_order_covers_catalog() {
        let mut order = builtin_load_order();
        let mut ids: Vec<String> = builtin_catalog().into_iter().map(|c| c.id).collect();
        assert_eq!(order[2], "tirmidhi");
        order.sort();
        ids.sort();
        assert_eq!(order, ids);
    }

    #[test]
    fn test_preferences_apply_partial() {
        let mut prefs = UserPreferences::defaults_for(DEFAULT_USER_ID);
        prefs.apply(PreferencesUpdate {
            theme: Some("dark".to_string()),
            ..Default::default()
        });
        assert_eq!(prefs.theme, "dark");
        assert_eq!(prefs.font_size, "medium");
        assert!(prefs.show_diacritics);
        assert!(!prefs.auto_play_audio);
    }

    #[test]
    fn test_collection_wire_names() {
        let json = serde_json::to_value(&builtin_catalog()[1]).unwrap();
        assert_eq!(json["arabicName"], "صحيح مسلم");
        assert_eq!(json["totalHadiths"], 7190);
    }
}
