//! SQLite history store implementation.

use std::path::Path;

use async_trait::async_trait;
use chrono::{Local, NaiveDate, NaiveDateTime, SubsecRound};
use rusqlite::{OptionalExtension, params};
use tokio_rusqlite::Connection;
use tracing::debug;

use agentforge_protocols::{DailySummary, HistoryError, HistoryStore, MessageRole, StoredMessage};

use crate::schema::init_schema;

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;

/// Lexically sortable local timestamp.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
const DATE_FORMAT: &str = "%Y-%m-%d";

type MessageRow = (i64, String, String, String);
type SummaryRow = (i64, String, String, i64, String, String);

const MESSAGE_COLUMNS: &str = "id, role, content, created_at";
const SUMMARY_COLUMNS: &str =
    "id, summary_date, summary, message_count, created_at, updated_at";

/// SQLite-based history store.
pub struct SqliteHistoryStore {
    conn: Connection,
}

impl SqliteHistoryStore {
    /// Create a new in-memory database.
    pub async fn in_memory() -> Result<Self, HistoryError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| HistoryError::ConnectionError(e.to_string()))?;
        Self::init(conn).await
    }

    /// Open a file-backed database, creating its parent directory if needed.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                HistoryError::ConnectionError(format!(
                    "cannot create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        debug!("Opening history database at {}", path.display());
        let conn = Connection::open(path)
            .await
            .map_err(|e| HistoryError::ConnectionError(e.to_string()))?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, HistoryError> {
        conn.call(|conn| Ok(init_schema(conn)?))
            .await
            .map_err(|e| HistoryError::QueryError(e.to_string()))?;

        Ok(Self { conn })
    }

    async fn save(&self, role: MessageRole, content: &str) -> Result<StoredMessage, HistoryError> {
        let created_at = now();
        let stamp = format_timestamp(created_at);
        let text = content.to_string();

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO chat_messages (role, content, created_at) VALUES (?1, ?2, ?3)",
                    params![role.as_str(), text, stamp],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(query_error)?;

        Ok(StoredMessage {
            id,
            role,
            content: content.to_string(),
            created_at,
        })
    }

    async fn query_messages(
        &self,
        sql: String,
        args: Vec<String>,
    ) -> Result<Vec<StoredMessage>, HistoryError> {
        let rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(args.iter()), |row| {
                        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
                    })?
                    .collect::<Result<Vec<MessageRow>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(query_error)?;

        rows.into_iter().map(message_from_row).collect()
    }

    async fn query_summaries(
        &self,
        sql: String,
        args: Vec<String>,
    ) -> Result<Vec<DailySummary>, HistoryError> {
        let rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(args.iter()), |row| {
                        Ok((
                            row.get(0)?,
                            row.get(1)?,
                            row.get(2)?,
                            row.get(3)?,
                            row.get(4)?,
                            row.get(5)?,
                        ))
                    })?
                    .collect::<Result<Vec<SummaryRow>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(query_error)?;

        rows.into_iter().map(summary_from_row).collect()
    }
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn save_user(&self, content: &str) -> Result<StoredMessage, HistoryError> {
        self.save(MessageRole::User, content).await
    }

    async fn save_assistant(&self, content: &str) -> Result<StoredMessage, HistoryError> {
        self.save(MessageRole::Assistant, content).await
    }

    async fn all_messages(&self) -> Result<Vec<StoredMessage>, HistoryError> {
        self.query_messages(
            format!("SELECT {MESSAGE_COLUMNS} FROM chat_messages ORDER BY created_at ASC, id ASC"),
            vec![],
        )
        .await
    }

    async fn recent_messages(&self, limit: usize) -> Result<Vec<StoredMessage>, HistoryError> {
        let mut messages = self
            .query_messages(
                format!(
                    "SELECT {MESSAGE_COLUMNS} FROM chat_messages \
                     ORDER BY created_at DESC, id DESC LIMIT {limit}"
                ),
                vec![],
            )
            .await?;
        messages.reverse();
        Ok(messages)
    }

    async fn messages_by_date(&self, date: NaiveDate) -> Result<Vec<StoredMessage>, HistoryError> {
        let (start, end) = day_bounds(date)?;
        self.query_messages(
            format!(
                "SELECT {MESSAGE_COLUMNS} FROM chat_messages \
                 WHERE created_at >= ?1 AND created_at < ?2 \
                 ORDER BY created_at ASC, id ASC"
            ),
            vec![start, end],
        )
        .await
    }

    async fn count_by_date(&self, date: NaiveDate) -> Result<u64, HistoryError> {
        let (start, end) = day_bounds(date)?;
        let count: i64 = self
            .conn
            .call(move |conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM chat_messages WHERE created_at >= ?1 AND created_at < ?2",
                    params![start, end],
                    |row| row.get(0),
                )?)
            })
            .await
            .map_err(query_error)?;
        Ok(count.max(0) as u64)
    }

    async fn total_count(&self) -> Result<u64, HistoryError> {
        let count: i64 = self
            .conn
            .call(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM chat_messages", [], |row| row.get(0))?)
            })
            .await
            .map_err(query_error)?;
        Ok(count.max(0) as u64)
    }

    async fn upsert_daily_summary(
        &self,
        date: NaiveDate,
        summary: &str,
        message_count: u64,
    ) -> Result<DailySummary, HistoryError> {
        let day = date.format(DATE_FORMAT).to_string();
        let stamp = format_timestamp(now());
        let text = summary.to_string();
        let count = i64::try_from(message_count)
            .map_err(|_| HistoryError::QueryError(format!("message count {message_count} too large")))?;

        let key = day.clone();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO daily_summaries (summary_date, summary, message_count, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?4)
                     ON CONFLICT(summary_date) DO UPDATE SET
                         summary = excluded.summary,
                         message_count = excluded.message_count,
                         updated_at = excluded.updated_at",
                    params![key, text, count, stamp],
                )?;
                Ok(())
            })
            .await
            .map_err(query_error)?;

        self.daily_summary(date).await?.ok_or_else(|| {
            HistoryError::QueryError(format!("summary for {day} missing after upsert"))
        })
    }

    async fn daily_summary(&self, date: NaiveDate) -> Result<Option<DailySummary>, HistoryError> {
        let day = date.format(DATE_FORMAT).to_string();
        let row = self
            .conn
            .call(move |conn| {
                let row = conn
                    .query_row(
                        &format!(
                            "SELECT {SUMMARY_COLUMNS} FROM daily_summaries WHERE summary_date = ?1"
                        ),
                        [&day],
                        |row| {
                            Ok((
                                row.get(0)?,
                                row.get(1)?,
                                row.get(2)?,
                                row.get(3)?,
                                row.get(4)?,
                                row.get(5)?,
                            ))
                        },
                    )
                    .optional()?;
                Ok(row)
            })
            .await
            .map_err(query_error)?;

        row.map(summary_from_row).transpose()
    }

    async fn all_summaries(&self) -> Result<Vec<DailySummary>, HistoryError> {
        self.query_summaries(
            format!("SELECT {SUMMARY_COLUMNS} FROM daily_summaries ORDER BY summary_date DESC"),
            vec![],
        )
        .await
    }
}

/// Current local time at the precision that is stored.
fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(6)
}

fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime, HistoryError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map_err(|e| HistoryError::CorruptRecord(format!("bad timestamp {value:?}: {e}")))
}

fn parse_date(value: &str) -> Result<NaiveDate, HistoryError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| HistoryError::CorruptRecord(format!("bad date {value:?}: {e}")))
}

/// `[date 00:00, date+1 00:00)` as stored timestamps.
fn day_bounds(date: NaiveDate) -> Result<(String, String), HistoryError> {
    let next = date
        .succ_opt()
        .ok_or_else(|| HistoryError::QueryError(format!("date out of range: {date}")))?;
    Ok((
        format_timestamp(date.and_time(chrono::NaiveTime::MIN)),
        format_timestamp(next.and_time(chrono::NaiveTime::MIN)),
    ))
}

fn message_from_row((id, role, content, created_at): MessageRow) -> Result<StoredMessage, HistoryError> {
    let role = role
        .parse::<MessageRole>()
        .map_err(HistoryError::CorruptRecord)?;
    Ok(StoredMessage {
        id,
        role,
        content,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn summary_from_row(
    (id, summary_date, summary, message_count, created_at, updated_at): SummaryRow,
) -> Result<DailySummary, HistoryError> {
    Ok(DailySummary {
        id,
        summary_date: parse_date(&summary_date)?,
        summary,
        message_count: u64::try_from(message_count).map_err(|_| {
            HistoryError::CorruptRecord(format!("negative message count {message_count}"))
        })?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

fn query_error(e: tokio_rusqlite::Error) -> HistoryError {
    HistoryError::QueryError(e.to_string())
}
