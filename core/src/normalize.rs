//! Turns loosely shaped corpus records into canonical [`Hadith`] values
//!
//! Corpus files come from several exporters and disagree on which fields are
//! present and how they are typed. Every field except the raw id degrades to
//! an empty or default value instead of failing the record.

use crate::models::Hadith;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum NormalizeError {
    #[error("record is not an object")]
    NotAnObject,

    #[error("record has no usable id")]
    MissingId,
}

/// Chapter id (as a string) to chapter display name
#[derive(Debug, Default)]
pub struct ChapterIndex {
    names: HashMap<String, String>,
}

impl ChapterIndex {
    pub fn from_records(chapters: &[Value]) -> Self {
        let names = chapters
            .iter()
            .filter_map(|chapter| {
                let obj = chapter.as_object()?;
                let id = key_string(obj.get("id")?)?;
                let name = ["english", "displayName", "name"]
                    .iter()
                    .find_map(|field| non_empty_str(obj.get(*field)))?;
                Some((id, name))
            })
            .collect();
        Self { names }
    }

    pub fn name_of(&self, chapter_id: Option<&Value>) -> Option<String> {
        let key = key_string(chapter_id?)?;
        self.names.get(&key).cloned()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Stringify an id-like value. Numbers and non-empty strings qualify.
fn key_string(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// English text lives under `english.text` in most exports but some ship a bare string.
fn english_text(obj: &Map<String, Value>) -> String {
    match obj.get("english") {
        Some(Value::Object(english)) => non_empty_str(english.get("text")),
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
    .unwrap_or_default()
}

fn english_narrator(obj: &Map<String, Value>) -> Option<String> {
    obj.get("english")
        .and_then(Value::as_object)
        .and_then(|english| non_empty_str(english.get("narrator")))
}

pub fn normalize(
    collection_id: &str,
    raw: &Value,
    chapters: &ChapterIndex,
    default_grade: &str,
    loaded_at: DateTime<Utc>,
) -> Result<Hadith, NormalizeError> {
    let obj = raw.as_object().ok_or(NormalizeError::NotAnObject)?;
    let raw_id = obj.get("id").and_then(key_string);

    let hadith_number = obj
        .get("idInBook")
        .and_then(key_string)
        .or_else(|| raw_id.clone())
        // Guard only: a record without an id is rejected just below
        .unwrap_or_else(|| "0".to_string());

    let raw_id = raw_id.ok_or(NormalizeError::MissingId)?;

    let (grade, grade_inferred) = match non_empty_str(obj.get("grade")) {
        Some(grade) => (grade, false),
        None => (default_grade.to_string(), true),
    };

    Ok(Hadith {
        id: format!("{}-{}", collection_id, raw_id),
        collection_id: collection_id.to_string(),
        hadith_number,
        book: chapters.name_of(obj.get("chapterId")),
        chapter: None,
        arabic_text: non_empty_str(obj.get("arabic")).unwrap_or_default(),
        english_translation: english_text(obj),
        urdu_translation: non_empty_str(obj.get("urdu")),
        roman_urdu_translation: non_empty_str(obj.get("romanUrdu")),
        narrator: english_narrator(obj),
        grade,
        grade_inferred,
        created_at: loaded_at,
    })
}
