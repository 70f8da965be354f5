//! Riwaya - hadith collection reader
//!
//! Backend library providing corpus loading, search and reader state.

pub mod models;
pub mod normalize;
pub mod loader;
pub mod store;
pub mod cache;
pub mod error;
pub mod settings;
pub mod visitors;
pub mod state;

pub use error::RiwayaError;
pub use state::{AppState, StateOptions};
pub use models::{
    builtin_catalog, builtin_load_order, Bookmark, Collection, Hadith, PreferencesUpdate, UserPreferences,
    DEFAULT_USER_ID,
};
pub use normalize::{normalize, ChapterIndex, NormalizeError};
pub use loader::{
    load_collection, load_corpus, CollectionLoad, CorpusPaths, LoadOptions, LoadReport,
    LoadStatus, DEFAULT_GRADE,
};
pub use store::{HadithQuery, HadithStore, SearchTerm};
pub use cache::CachedStore;
pub use settings::SettingsStore;
pub use visitors::VisitorLog;
