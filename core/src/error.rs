//! Error types for Riwaya

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiwayaError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("{0}")]
    Other(String),
}

impl From<rusqlite::Error> for RiwayaError {
    fn from(e: rusqlite::Error) -> Self {
        RiwayaError::Database(e.to_string())
    }
}

impl serde::Serialize for RiwayaError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_message() {
        let err = RiwayaError::NotFound("hadith bukhari-9".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"Not found: hadith bukhari-9\"");
    }
}
