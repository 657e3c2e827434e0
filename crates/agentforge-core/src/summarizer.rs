//! Daily conversation summaries.

use std::sync::Arc;

use chrono::NaiveDate;
use futures::TryStreamExt;
use thiserror::Error;
use tracing::info;

use agentforge_protocols::{
    ChatMessage, ChatRequest, DailySummary, HistoryError, HistoryStore, LlmProvider,
    ProviderError, StoredMessage,
};

const SYSTEM_PROMPT: &str = "你是一个对话总结专家。";

const PROMPT_PREFIX: &str = "你是一个对话总结专家。请简洁地总结以下对话的要点：\n\
1. 用户主要询问了什么问题？\n\
2. AI给出了什么关键回答？\n\
请用2-3句话总结。\n\
\n\
对话内容：\n";

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("No messages found for date: {0}")]
    NoMessages(NaiveDate),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Summarizes one day of history through the streaming path.
pub struct Summarizer {
    provider: Arc<dyn LlmProvider>,
    store: Arc<dyn HistoryStore>,
}

impl Summarizer {
    pub fn new(provider: Arc<dyn LlmProvider>, store: Arc<dyn HistoryStore>) -> Self {
        Self { provider, store }
    }

    /// Summarize `date` and store the result, replacing any earlier summary.
    pub async fn summarize(&self, date: NaiveDate) -> Result<DailySummary, SummaryError> {
        let messages = self.store.messages_by_date(date).await?;
        if messages.is_empty() {
            return Err(SummaryError::NoMessages(date));
        }

        info!("Summarizing {} messages for {}", messages.len(), date);
        let request = ChatRequest::builder()
            .system(SYSTEM_PROMPT)
            .message(ChatMessage::user(build_prompt(&messages)))
            .build()?;

        let summary = self
            .provider
            .chat_stream(request)
            .try_fold(String::new(), |mut acc, chunk| async move {
                acc.push_str(&chunk);
                Ok(acc)
            })
            .await?;

        let stored = self
            .store
            .upsert_daily_summary(date, summary.trim(), messages.len() as u64)
            .await?;
        Ok(stored)
    }
}

/// `role: content` turns separated by blank lines.
fn format_transcript(messages: &[StoredMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn build_prompt(messages: &[StoredMessage]) -> String {
    format!("{PROMPT_PREFIX}{}", format_transcript(messages))
}

#[cfg(test)]
#[path = "summarizer_tests.rs"]
mod tests;
