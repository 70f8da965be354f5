//! In-memory hadith store and query engine
//!
//! The store is filled once by the loader and only read afterwards. Iteration
//! order is insertion order: collections in catalog order, hadiths within a
//! collection in file order.

use crate::models::{Collection, Hadith};
use std::collections::HashMap;

/// Filter and pagination for [`HadithStore::list`]. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct HadithQuery {
    pub collection_id: Option<String>,
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl HadithQuery {
    pub fn search(term: &str, collection_id: Option<&str>) -> Self {
        Self {
            collection_id: collection_id.map(str::to_string),
            search: Some(term.to_string()),
            ..Default::default()
        }
    }

    pub(crate) fn collection_filter(&self) -> Option<&str> {
        self.collection_id.as_deref().filter(|id| !id.is_empty())
    }

    pub(crate) fn search_filter(&self) -> Option<&str> {
        self.search.as_deref().filter(|term| !term.is_empty())
    }
}

/// A search term in both the original and the case-folded form.
///
/// Arabic and Urdu script fields are matched against the original form; Latin
/// script fields are matched case-insensitively.
pub struct SearchTerm<'a> {
    original: &'a str,
    folded: String,
}

impl<'a> SearchTerm<'a> {
    pub fn new(term: &'a str) -> Self {
        Self {
            original: term,
            folded: term.to_lowercase(),
        }
    }

    fn folded_in(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.folded)
    }

    fn folded_in_opt(&self, text: Option<&str>) -> bool {
        text.is_some_and(|t| self.folded_in(t))
    }

    pub fn matches(&self, hadith: &Hadith) -> bool {
        self.folded_in(&hadith.english_translation)
            || hadith.arabic_text.contains(self.original)
            || hadith
                .urdu_translation
                .as_deref()
                .is_some_and(|t| t.contains(self.original))
            || self.folded_in_opt(hadith.roman_urdu_translation.as_deref())
            || self.folded_in_opt(hadith.narrator.as_deref())
            || self.folded_in_opt(hadith.book.as_deref())
            || self.folded_in_opt(hadith.chapter.as_deref())
            || self.folded_in(&hadith.hadith_number)
    }
}

/// Contiguous window over `items`: skip `offset`, then take at most `limit`.
pub fn paginate<T>(items: &[T], offset: Option<usize>, limit: Option<usize>) -> &[T] {
    let start = offset.unwrap_or(0).min(items.len());
    let rest = &items[start..];
    let take = limit.unwrap_or(rest.len()).min(rest.len());
    &rest[..take]
}

#[derive(Debug, Default)]
pub struct HadithStore {
    collections: Vec<Collection>,
    hadiths: Vec<Hadith>,
    positions: HashMap<String, usize>,
}

impl HadithStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collections(collections: Vec<Collection>) -> Self {
        let mut store = Self::new();
        for collection in collections {
            store.insert_collection(collection);
        }
        store
    }

    /// Register collection metadata. A repeated id replaces the earlier entry in place.
    pub fn insert_collection(&mut self, collection: Collection) {
        match self.collections.iter_mut().find(|c| c.id == collection.id) {
            Some(existing) => *existing = collection,
            None => self.collections.push(collection),
        }
    }

    /// Insert a hadith keyed by its composite id.
    ///
    /// Returns `true` when an earlier hadith with the same id was replaced. The
    /// replacement keeps the earlier hadith's position.
    pub fn insert(&mut self, hadith: Hadith) -> bool {
        if let Some(&pos) = self.positions.get(&hadith.id) {
            self.hadiths[pos] = hadith;
            return true;
        }
        self.positions.insert(hadith.id.clone(), self.hadiths.len());
        self.hadiths.push(hadith);
        false
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn collection(&self, id: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Hadith> {
        self.positions.get(id).map(|&pos| &self.hadiths[pos])
    }

    pub fn len(&self) -> usize {
        self.hadiths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hadiths.is_empty()
    }

    pub fn count_in(&self, collection_id: &str) -> usize {
        self.hadiths
            .iter()
            .filter(|h| h.collection_id == collection_id)
            .count()
    }

    pub fn first(&self) -> Option<&Hadith> {
        self.hadiths.first()
    }

    pub(crate) fn at(&self, pos: usize) -> Option<&Hadith> {
        self.hadiths.get(pos)
    }

    /// Positions of every hadith passing the collection and search filters, in store order
    pub fn matching_positions(&self, collection_id: Option<&str>, search: Option<&str>) -> Vec<usize> {
        let term = search.map(SearchTerm::new);
        self.hadiths
            .iter()
            .enumerate()
            .filter(|(_, h)| collection_id.map_or(true, |id| h.collection_id == id))
            .filter(|(_, h)| term.as_ref().map_or(true, |t| t.matches(h)))
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn list(&self, query: &HadithQuery) -> Vec<&Hadith> {
        let positions = self.matching_positions(query.collection_filter(), query.search_filter());
        paginate(&positions, query.offset, query.limit)
            .iter()
            .filter_map(|&pos| self.at(pos))
            .collect()
    }

    pub fn search(&self, term: &str, collection_id: Option<&str>) -> Vec<&Hadith> {
        self.list(&HadithQuery::search(term, collection_id))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;

    pub(crate) fn hadith(collection_id: &str, raw_id: u32, english: &str, arabic: &str) -> Hadith {
        Hadith {
            id: format!("{}-{}", collection_id, raw_id),
            collection_id: collection_id.to_string(),
            hadith_number: raw_id.to_string(),
            book: None,
            chapter: None,
            arabic_text: arabic.to_string(),
            english_translation: english.to_string(),
            urdu_translation: None,
            roman_urdu_translation: None,
            narrator: None,
            grade: "Sahih".to_string(),
            grade_inferred: true,
            created_at: Utc::now(),
        }
    }

    pub(crate) fn sample_store() -> HadithStore {
        let mut store = HadithStore::with_collections(crate::models::builtin_catalog());
        store.insert(hadith("bukhari", 1, "Actions are judged by intentions", "إنما الأعمال بالنيات"));
        store.insert(hadith("bukhari", 2, "This hadith discusses Prayer obligations", "الصلاة"));
        let mut narrated = hadith("muslim", 1, "Islam is built on five", "بني الإسلام على خمس");
        narrated.narrator = Some("Ibn Umar".to_string());
        narrated.book = Some("The Book of Faith".to_string());
        narrated.urdu_translation = Some("اسلام کی بنیاد پانچ چیزوں پر ہے".to_string());
        narrated.roman_urdu_translation = Some("Islam ki bunyaad".to_string());
        store.insert(narrated);
        store.insert(hadith("muslim", 2, "Purity is half of faith", "الطهور شطر الإيمان"));
        store.insert(hadith("tirmidhi", 10, "Supplication is worship", "الدعاء هو العبادة"));
        store
    }

    fn ids(hadiths: &[&Hadith]) -> Vec<String> {
        hadiths.iter().map(|h| h.id.clone()).collect()
    }

    #[test]
    fn test_list_all_in_insertion_order() {
        let store = sample_store();
        let all = store.list(&HadithQuery::default());
        assert_eq!(
            ids(&all),
            vec!["bukhari-1", "bukhari-2", "muslim-1", "muslim-2", "tirmidhi-10"]
        );
    }

    #[test]
    fn test_collection_filter_is_exact() {
        let store = sample_store();
        let query = HadithQuery {
            collection_id: Some("muslim".to_string()),
            ..Default::default()
        };
        let found = store.list(&query);
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|h| h.collection_id == "muslim"));

        let query = HadithQuery {
            collection_id: Some("Muslim".to_string()),
            ..Default::default()
        };
        assert!(store.list(&query).is_empty());
    }

    #[test]
    fn test_english_search_ignores_case() {
        let store = sample_store();
        assert_eq!(ids(&store.search("prayer", None)), vec!["bukhari-2"]);
        assert_eq!(ids(&store.search("PRAYER", None)), vec!["bukhari-2"]);
    }

    #[test]
    fn test_field_coverage() {
        let store = sample_store();
        assert_eq!(ids(&store.search("ibn umar", None)), vec!["muslim-1"]);
        assert_eq!(ids(&store.search("book of faith", None)), vec!["muslim-1"]);
        assert_eq!(ids(&store.search("BUNYAAD", None)), vec!["muslim-1"]);
        assert_eq!(ids(&store.search("پانچ", None)), vec!["muslim-1"]);
        assert_eq!(ids(&store.search("الدعاء", None)), vec!["tirmidhi-10"]);
        assert_eq!(ids(&store.search("10", None)), vec!["tirmidhi-10"]);
    }

    #[test]
    fn test_arabic_text_match_is_case_sensitive() {
        let mut store = HadithStore::new();
        store.insert(hadith("demo", 1, "", "Transliterated Salah text"));
        assert_eq!(store.search("Salah", None).len(), 1);
        assert!(store.search("salah", None).is_empty());
    }

    #[test]
    fn test_search_combined_with_collection() {
        let store = sample_store();
        assert_eq!(ids(&store.search("faith", Some("muslim"))), vec!["muslim-1", "muslim-2"]);
        assert!(store.search("faith", Some("bukhari")).is_empty());
        assert!(store.search("no such phrase", None).is_empty());
    }

    #[test]
    fn test_empty_filters_are_ignored() {
        let store = sample_store();
        let query = HadithQuery {
            collection_id: Some(String::new()),
            search: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(store.list(&query).len(), store.len());
    }

    #[test]
    fn test_pagination_window() {
        let store = sample_store();
        let page = |offset, limit| {
            ids(&store.list(&HadithQuery {
                offset,
                limit,
                ..Default::default()
            }))
        };
        assert_eq!(page(Some(1), Some(2)), vec!["bukhari-2", "muslim-1"]);
        assert_eq!(page(Some(4), Some(10)), vec!["tirmidhi-10"]);
        assert!(page(Some(9), Some(2)).is_empty());
        assert!(page(None, Some(0)).is_empty());
        assert_eq!(page(Some(3), None).len(), 2);
    }

    #[test]
    fn test_duplicate_id_replaces_in_place() {
        let mut store = HadithStore::new();
        store.insert(hadith("demo", 1, "first", ""));
        store.insert(hadith("demo", 2, "second", ""));
        assert!(store.insert(hadith("demo", 1, "replacement", "")));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("demo-1").unwrap().english_translation, "replacement");
        assert_eq!(store.first().unwrap().id, "demo-1");
    }

    #[test]
    fn test_lookups() {
        let store = sample_store();
        assert!(store.get("bukhari-1").is_some());
        assert!(store.get("bukhari-99").is_none());
        assert_eq!(store.collection("tirmidhi").unwrap().name, "Jami` at-Tirmidhi");
        assert!(store.collection("nasai").is_none());
        assert_eq!(store.count_in("bukhari"), 2);
        assert_eq!(store.count_in("abudawud"), 0);
    }
}
