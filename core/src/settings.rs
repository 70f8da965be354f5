//! Bookmarks and reading preferences, stored in SQLite
//!
//! The settings database is separate from the corpus so reader state is
//! independent of corpus reloads. Without a configured path it lives in
//! memory for the lifetime of the process.

use crate::error::RiwayaError;
use crate::models::{Bookmark, PreferencesUpdate, UserPreferences};
use rusqlite::{Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub struct SettingsStore {
    conn: Mutex<Connection>,
}

fn row_to_bookmark(row: &Row) -> rusqlite::Result<Bookmark> {
    Ok(Bookmark {
        id: row.get(0)?,
        user_id: row.get(1)?,
        hadith_id: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn row_to_preferences(row: &Row) -> rusqlite::Result<UserPreferences> {
    Ok(UserPreferences {
        user_id: row.get(0)?,
        font_size: row.get(1)?,
        theme: row.get(2)?,
        show_diacritics: row.get::<_, i64>(3)? != 0,
        auto_play_audio: row.get::<_, i64>(4)? != 0,
    })
}

impl SettingsStore {
    /// Open (creating if missing) a settings database file
    pub fn open(path: &Path) -> Result<Self, RiwayaError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| RiwayaError::Database(format!("{:?}: {}", parent, e)))?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self, RiwayaError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, RiwayaError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS bookmarks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                hadith_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE(user_id, hadith_id)
            );

            CREATE TABLE IF NOT EXISTS user_preferences (
                user_id TEXT PRIMARY KEY,
                font_size TEXT NOT NULL,
                theme TEXT NOT NULL,
                show_diacritics INTEGER NOT NULL,
                auto_play_audio INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_bookmarks_user
            ON bookmarks(user_id, created_at);
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, RiwayaError> {
        self.conn
            .lock()
            .map_err(|_| RiwayaError::Other("Failed to acquire settings lock".to_string()))
    }

    pub fn bookmarks(&self, user_id: &str) -> Result<Vec<Bookmark>, RiwayaError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, hadith_id, created_at FROM bookmarks
             WHERE user_id = ?1 ORDER BY id",
        )?;
        let bookmarks = stmt
            .query_map([user_id], row_to_bookmark)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(bookmarks)
    }

    /// Bookmark a hadith. Bookmarking it again returns the existing bookmark.
    pub fn add_bookmark(&self, user_id: &str, hadith_id: &str) -> Result<Bookmark, RiwayaError> {
        let conn = self.conn()?;
        let now = chrono::Utc::now().to_rfc3339();

        conn.execute(
            "INSERT OR IGNORE INTO bookmarks (user_id, hadith_id, created_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![user_id, hadith_id, now],
        )?;

        let bookmark = conn.query_row(
            "SELECT id, user_id, hadith_id, created_at FROM bookmarks
             WHERE user_id = ?1 AND hadith_id = ?2",
            [user_id, hadith_id],
            row_to_bookmark,
        )?;
        Ok(bookmark)
    }

    /// Returns `false` when there was nothing to remove
    pub fn remove_bookmark(&self, user_id: &str, hadith_id: &str) -> Result<bool, RiwayaError> {
        let conn = self.conn()?;
        let removed = conn.execute(
            "DELETE FROM bookmarks WHERE user_id = ?1 AND hadith_id = ?2",
            [user_id, hadith_id],
        )?;
        Ok(removed > 0)
    }

    pub fn preferences(&self, user_id: &str) -> Result<Option<UserPreferences>, RiwayaError> {
        let conn = self.conn()?;
        let prefs = conn
            .query_row(
                "SELECT user_id, font_size, theme, show_diacritics, auto_play_audio
                 FROM user_preferences WHERE user_id = ?1",
                [user_id],
                row_to_preferences,
            )
            .optional()?;
        Ok(prefs)
    }

    /// Merge `update` over the stored preferences, or over the defaults for a new user
    pub fn update_preferences(
        &self,
        user_id: &str,
        update: PreferencesUpdate,
    ) -> Result<UserPreferences, RiwayaError> {
        let mut prefs = self
            .preferences(user_id)?
            .unwrap_or_else(|| UserPreferences::defaults_for(user_id));
        prefs.apply(update);

        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO user_preferences
             (user_id, font_size, theme, show_diacritics, auto_play_audio)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                prefs.user_id,
                prefs.font_size,
                prefs.theme,
                prefs.show_diacritics,
                prefs.auto_play_audio
            ],
        )?;
        Ok(prefs)
    }
}
