//! Application state management

use crate::cache::CachedStore;
use crate::loader::{load_corpus, CorpusPaths, LoadOptions, LoadReport};
use crate::models::{builtin_catalog, builtin_load_order, Collection};
use crate::settings::SettingsStore;
use crate::visitors::VisitorLog;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything needed to build [`AppState`]
#[derive(Debug, Clone)]
pub struct StateOptions {
    pub corpus_paths: CorpusPaths,
    pub load: LoadOptions,
    pub catalog: Vec<Collection>,
    /// Order in which collection files are read, which fixes hadith iteration order
    pub load_order: Vec<String>,
    /// In-memory settings when `None`
    pub settings_db: Option<PathBuf>,
    pub visitors_file: PathBuf,
    pub cache_capacity: usize,
}

impl Default for StateOptions {
    fn default() -> Self {
        Self {
            corpus_paths: CorpusPaths::default(),
            load: LoadOptions::default(),
            catalog: builtin_catalog(),
            load_order: builtin_load_order(),
            settings_db: None,
            visitors_file: PathBuf::from("server/visitors.json"),
            cache_capacity: crate::cache::DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Application state: the loaded corpus plus reader-side stores
pub struct AppState {
    pub hadiths: CachedStore,
    pub load_report: LoadReport,
    pub settings: SettingsStore,
    pub visitors: VisitorLog,
}

impl AppState {
    /// Load the corpus and open the side stores. Missing corpus files are not an error.
    pub fn new(options: StateOptions) -> Result<Self> {
        let (store, load_report) = load_corpus(
            options.catalog,
            &options.load_order,
            &options.corpus_paths,
            &options.load,
        );
        let hadiths = CachedStore::new(Arc::new(store), options.cache_capacity);

        let settings = match &options.settings_db {
            Some(path) => {
                tracing::info!(path = ?path, "Opening settings database");
                SettingsStore::open(path)?
            }
            None => SettingsStore::in_memory()?,
        };

        Ok(Self {
            hadiths,
            load_report,
            settings,
            visitors: VisitorLog::new(options.visitors_file),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_corpus_is_a_valid_state() {
        let dir = TempDir::new().unwrap();
        let state = AppState::new(StateOptions {
            corpus_paths: CorpusPaths::new(vec![dir.path().to_path_buf()]),
            visitors_file: dir.path().join("visitors.json"),
            ..Default::default()
        })
        .unwrap();

        assert!(state.hadiths.store().is_empty());
        assert_eq!(state.hadiths.store().collections().len(), 4);
        assert_eq!(state.load_report.collections.len(), 4);
        assert_eq!(state.load_report.total_loaded(), 0);
    }
}
