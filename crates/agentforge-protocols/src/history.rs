//! History store protocol definitions.
//!
//! A history store persists every chat turn and one summary per day.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::HistoryError;
use crate::types::{ChatMessage, MessageRole};

/// Core trait for chat history storage.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persist a user turn.
    async fn save_user(&self, content: &str) -> Result<StoredMessage, HistoryError>;

    /// Persist an assistant turn.
    async fn save_assistant(&self, content: &str) -> Result<StoredMessage, HistoryError>;

    /// All messages, oldest first.
    async fn all_messages(&self) -> Result<Vec<StoredMessage>, HistoryError>;

    /// The newest `limit` messages, oldest first.
    async fn recent_messages(&self, limit: usize) -> Result<Vec<StoredMessage>, HistoryError>;

    /// Messages created on `date` (local time), oldest first.
    async fn messages_by_date(&self, date: NaiveDate) -> Result<Vec<StoredMessage>, HistoryError>;

    async fn count_by_date(&self, date: NaiveDate) -> Result<u64, HistoryError>;

    async fn total_count(&self) -> Result<u64, HistoryError>;

    /// Insert or overwrite the summary for `date`.
    async fn upsert_daily_summary(
        &self,
        date: NaiveDate,
        summary: &str,
        message_count: u64,
    ) -> Result<DailySummary, HistoryError>;

    async fn daily_summary(&self, date: NaiveDate) -> Result<Option<DailySummary>, HistoryError>;

    /// All summaries, newest date first.
    async fn all_summaries(&self) -> Result<Vec<DailySummary>, HistoryError>;
}

/// A persisted chat turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: i64,
    pub role: MessageRole,
    pub content: String,
    pub created_at: NaiveDateTime,
}

impl StoredMessage {
    /// Convert into a message usable as conversation context.
    pub fn to_chat_message(&self) -> ChatMessage {
        ChatMessage::new(self.role, self.content.clone())
    }
}

/// Summary of one day's conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub id: i64,
    pub summary_date: NaiveDate,
    pub summary: String,
    pub message_count: u64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
