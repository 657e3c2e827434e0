//! History store errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_error_display() {
        let err = HistoryError::QueryError("no such table".to_string());
        assert!(err.to_string().contains("no such table"));
        let err = HistoryError::CorruptRecord("bad role".to_string());
        assert!(err.to_string().contains("Corrupt record"));
    }
}
