//! Unique visitor counter persisted to a flat JSON file

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct VisitorData {
    count: u64,
    visitors: Vec<String>,
}

impl Default for VisitorData {
    fn default() -> Self {
        Self {
            count: 1,
            visitors: Vec::new(),
        }
    }
}

pub struct VisitorLog {
    path: PathBuf,
    // serialises read-modify-write of the file
    lock: Mutex<()>,
}

impl VisitorLog {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> VisitorData {
        if !self.path.exists() {
            return VisitorData::default();
        }
        match fs::read_to_string(&self.path)
            .map_err(anyhow::Error::from)
            .and_then(|s| serde_json::from_str(&s).map_err(anyhow::Error::from))
        {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(path = ?self.path, "Error reading visitor log: {}", e);
                VisitorData::default()
            }
        }
    }

    fn write(&self, data: &VisitorData) {
        let result = serde_json::to_string_pretty(data)
            .map_err(anyhow::Error::from)
            .and_then(|json| {
                if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&self.path, json)?;
                Ok(())
            });
        if let Err(e) = result {
            tracing::error!(path = ?self.path, "Error writing visitor log: {}", e);
        }
    }

    pub fn count(&self) -> u64 {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.read().count
    }

    /// Record a visitor id and return the number of unique visitors
    pub fn track(&self, visitor_id: &str) -> u64 {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut data = self.read();
        if !data.visitors.iter().any(|v| v == visitor_id) {
            data.visitors.push(visitor_id.to_string());
            data.count = data.visitors.len() as u64;
            self.write(&data);
        }
        data.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_counts_unique_visitors() {
        let dir = TempDir::new().unwrap();
        let log = VisitorLog::new(dir.path().join("server").join("visitors.json"));

        assert_eq!(log.count(), 1);
        assert_eq!(log.track("a"), 1);
        assert_eq!(log.track("b"), 2);
        assert_eq!(log.track("a"), 2);

        let reopened = VisitorLog::new(log.path().to_path_buf());
        assert_eq!(reopened.count(), 2);
        assert_eq!(reopened.track("c"), 3);
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("visitors.json");
        fs::write(&path, "not json").unwrap();

        let log = VisitorLog::new(path);
        assert_eq!(log.count(), 1);
        assert_eq!(log.track("x"), 1);
    }
}
