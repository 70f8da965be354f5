//! Corpus loading
//!
//! Each collection is backed by one `<collection_id>.json` file found in the
//! first matching root of [`CorpusPaths`]. The file holds a `chapters` list
//! and a `hadiths` list. Missing files, unparseable files and bad records
//! are logged and skipped; loading never fails as a whole.

use crate::models::Collection;
use crate::normalize::{normalize, ChapterIndex};
use crate::store::HadithStore;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Grade recorded for hadiths whose source carries none
pub const DEFAULT_GRADE: &str = "Sahih";

/// Ordered list of directories probed for corpus files
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusPaths {
    roots: Vec<PathBuf>,
}

impl CorpusPaths {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// First existing `<root>/<collection_id>.json`
    pub fn locate(&self, collection_id: &str) -> Option<PathBuf> {
        let file_name = format!("{}.json", collection_id);
        self.roots
            .iter()
            .map(|root| root.join(&file_name))
            .find(|path| path.is_file())
    }
}

impl Default for CorpusPaths {
    fn default() -> Self {
        let mut roots = vec![
            PathBuf::from("."),
            PathBuf::from("client/src/data/hadith-collections"),
            PathBuf::from("data"),
        ];
        if let Some(data_dir) = dirs::data_dir() {
            roots.push(data_dir.join("riwaya").join("collections"));
        }
        Self { roots }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub default_grade: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            default_grade: DEFAULT_GRADE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Loaded,
    Missing,
    Malformed,
}

/// Outcome of loading one collection file
#[derive(Debug, Clone, Serialize)]
pub struct CollectionLoad {
    pub collection_id: String,
    pub status: LoadStatus,
    pub path: Option<PathBuf>,
    pub sha256: Option<String>,
    pub loaded: usize,
    pub skipped: usize,
    pub replaced: usize,
}

impl CollectionLoad {
    fn empty(collection_id: &str, status: LoadStatus, path: Option<PathBuf>) -> Self {
        Self {
            collection_id: collection_id.to_string(),
            status,
            path,
            sha256: None,
            loaded: 0,
            skipped: 0,
            replaced: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub collections: Vec<CollectionLoad>,
}

impl LoadReport {
    pub fn total_loaded(&self) -> usize {
        self.collections.iter().map(|c| c.loaded).sum()
    }

    pub fn get(&self, collection_id: &str) -> Option<&CollectionLoad> {
        self.collections.iter().find(|c| c.collection_id == collection_id)
    }
}

#[derive(Deserialize)]
struct CorpusFile {
    #[serde(default)]
    chapters: Vec<Value>,
    #[serde(default)]
    hadiths: Vec<Value>,
}

/// Read and parse a corpus file, returning it with its hex SHA-256
fn read_corpus_file(path: &Path) -> Result<(CorpusFile, String)> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let sha256 = hex::encode(Sha256::digest(&bytes));
    let file: CorpusFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("Failed to parse {:?}", path))?;
    Ok((file, sha256))
}

pub fn load_collection(
    store: &mut HadithStore,
    collection_id: &str,
    paths: &CorpusPaths,
    options: &LoadOptions,
    loaded_at: DateTime<Utc>,
) -> CollectionLoad {
    let Some(path) = paths.locate(collection_id) else {
        tracing::warn!(
            collection = collection_id,
            roots = ?paths.roots(),
            "{}.json not found in any corpus root",
            collection_id
        );
        return CollectionLoad::empty(collection_id, LoadStatus::Missing, None);
    };

    tracing::info!(collection = collection_id, path = ?path, "Loading collection");
    let (file, sha256) = match read_corpus_file(&path) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::error!(collection = collection_id, "Skipping collection file: {:#}", e);
            return CollectionLoad::empty(collection_id, LoadStatus::Malformed, Some(path));
        }
    };

    let chapters = ChapterIndex::from_records(&file.chapters);
    let mut report = CollectionLoad {
        sha256: Some(sha256),
        ..CollectionLoad::empty(collection_id, LoadStatus::Loaded, Some(path))
    };

    for (idx, raw) in file.hadiths.iter().enumerate() {
        match normalize(collection_id, raw, &chapters, &options.default_grade, loaded_at) {
            Ok(hadith) => {
                if store.insert(hadith) {
                    report.replaced += 1;
                }
                report.loaded += 1;
            }
            Err(e) => {
                tracing::error!(
                    collection = collection_id,
                    record = idx,
                    id = ?raw.get("id"),
                    "Skipping hadith: {}",
                    e
                );
                report.skipped += 1;
            }
        }
    }

    tracing::info!(
        collection = collection_id,
        chapters = chapters.len(),
        loaded = report.loaded,
        skipped = report.skipped,
        "Loaded collection"
    );
    report
}

/// Build the store: register every catalog collection, then load each file once.
///
/// Files are read in `load_order`; catalog ids it does not name follow in
/// catalog order. Ids outside the catalog are ignored.
pub fn load_corpus(
    catalog: Vec<Collection>,
    load_order: &[String],
    paths: &CorpusPaths,
    options: &LoadOptions,
) -> (HadithStore, LoadReport) {
    tracing::info!("Loading hadith data from JSON files");
    let loaded_at = Utc::now();
    let ids = file_order(&catalog, load_order);
    let mut store = HadithStore::with_collections(catalog);

    let collections = ids
        .iter()
        .map(|id| load_collection(&mut store, id, paths, options, loaded_at))
        .collect();
    let report = LoadReport { collections };

    tracing::info!(
        "Loaded {} hadiths from {} collections",
        store.len(),
        store.collections().len()
    );
    (store, report)
}

fn file_order(catalog: &[Collection], load_order: &[String]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::with_capacity(catalog.len());
    for id in load_order {
        if !catalog.iter().any(|c| &c.id == id) {
            tracing::warn!(collection = %id, "Load order names a collection outside the catalog");
            continue;
        }
        if !ids.contains(id) {
            ids.push(id.clone());
        }
    }
    for collection in catalog {
        if !ids.contains(&collection.id) {
            ids.push(collection.id.clone());
        }
    }
    ids
}
