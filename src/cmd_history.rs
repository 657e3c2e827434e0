//! History subcommand handlers for AgentForge.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::error;

use agentforge_core::{SummaryError, Summarizer};
use agentforge_protocols::{DailySummary, HistoryStore, LlmProvider, MessageRole, StoredMessage};

const RECENT_LIMIT: usize = 50;

/// What the `history` command should show.
pub(crate) enum HistoryAction {
    Recent,
    ByDate(String),
    Count,
    Summarize,
    AllSummaries,
}

impl HistoryAction {
    /// Pick one action; flags are checked in a fixed precedence order.
    pub fn from_flags(
        date: Option<String>,
        count: bool,
        summary: bool,
        all_summaries: bool,
    ) -> Self {
        if summary {
            HistoryAction::Summarize
        } else if all_summaries {
            HistoryAction::AllSummaries
        } else if count {
            HistoryAction::Count
        } else if let Some(date) = date {
            HistoryAction::ByDate(date)
        } else {
            HistoryAction::Recent
        }
    }
}

/// Handle the history subcommand.
///
/// The provider is only built for [`HistoryAction::Summarize`].
pub(crate) async fn handle_history_command<F>(
    action: HistoryAction,
    store: Arc<dyn HistoryStore>,
    provider: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce() -> Result<Arc<dyn LlmProvider>, Box<dyn std::error::Error>>,
{
    match action {
        HistoryAction::Recent => {
            let messages = store.recent_messages(RECENT_LIMIT).await?;
            print_messages(&format!("=== 最近消息 ({}条) ===", messages.len()), &messages);
        }
        HistoryAction::ByDate(raw) => {
            let Some(date) = parse_date(&raw) else {
                println!("{}", DATE_FORMAT_HINT);
                return Ok(());
            };
            let messages = store.messages_by_date(date).await?;
            if messages.is_empty() {
                println!("日期 {} 没有消息记录。", date);
            } else {
                print_messages(&format!("=== {} 消息 ({}条) ===", date, messages.len()), &messages);
            }
        }
        HistoryAction::Count => {
            let total = store.total_count().await?;
            let today = store.count_by_date(today()).await?;
            println!("=== 消息统计 ===");
            println!("总消息数: {}", total);
            println!("今日消息: {}", today);
        }
        HistoryAction::Summarize => {
            let date = today();
            println!("正在生成 {} 的总结...", date);
            let summarizer = Summarizer::new(provider()?, store);
            match summarizer.summarize(date).await {
                Ok(summary) => {
                    println!("=== 总结已生成 ===");
                    print_summary(&summary);
                }
                Err(e @ SummaryError::NoMessages(_)) => println!("错误: {}", e),
                Err(e) => {
                    println!("生成总结时出错: {}", e);
                    error!("Failed to generate summary: {}", e);
                }
            }
        }
        HistoryAction::AllSummaries => {
            let summaries = store.all_summaries().await?;
            if summaries.is_empty() {
                println!("暂无每日总结。");
                return Ok(());
            }
            println!("=== 所有每日总结 ({}条) ===", summaries.len());
            for summary in &summaries {
                print_summary(summary);
                println!("---");
            }
        }
    }
    Ok(())
}

pub(crate) const DATE_FORMAT_HINT: &str = "日期格式错误，请使用 YYYY-MM-DD 格式。";

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse `YYYY-MM-DD`.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

pub(crate) fn role_label(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "用户",
        MessageRole::Assistant => "助手",
        MessageRole::System => "系统",
    }
}

pub(crate) fn format_message(message: &StoredMessage) -> String {
    format!(
        "[{}] {}: {}",
        message.created_at.format("%Y-%m-%d %H:%M:%S"),
        role_label(message.role),
        message.content
    )
}

pub(crate) fn print_messages(title: &str, messages: &[StoredMessage]) {
    print!("{}", render_messages(title, messages));
}

/// Message listing as printed by the CLI; each message is followed by a blank line.
pub(crate) fn render_messages(title: &str, messages: &[StoredMessage]) -> String {
    if messages.is_empty() {
        return "暂无消息记录。\n".to_string();
    }
    let mut text = format!("{}\n", title);
    for message in messages {
        text.push_str(&format_message(message));
        text.push_str("\n\n");
    }
    text
}

fn print_summary(summary: &DailySummary) {
    println!("日期: {}", summary.summary_date);
    println!("消息数: {}", summary.message_count);
    println!("总结: {}", summary.summary);
}

/// Today's stored summary, or a hint on how to generate it.
pub(crate) async fn render_today_summary(
    store: &dyn HistoryStore,
) -> Result<String, Box<dyn std::error::Error>> {
    let date = today();
    let text = match store.daily_summary(date).await? {
        Some(summary) => format!(
            "=== 今日总结 ({}) ===\n消息数: {}\n总结: {}\n",
            date, summary.message_count, summary.summary
        ),
        None => "今日暂无总结，请运行 'history --summary' 生成。\n".to_string(),
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2026-02-18"), NaiveDate::from_ymd_opt(2026, 2, 18));
        assert_eq!(parse_date(" 2026-02-18 "), NaiveDate::from_ymd_opt(2026, 2, 18));
        assert!(parse_date("2026/02/18").is_none());
        assert!(parse_date("2026-13-01").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn test_action_precedence() {
        assert!(matches!(
            HistoryAction::from_flags(Some("2026-02-18".into()), true, true, true),
            HistoryAction::Summarize
        ));
        assert!(matches!(
            HistoryAction::from_flags(Some("x".into()), true, false, false),
            HistoryAction::Count
        ));
        assert!(matches!(
            HistoryAction::from_flags(Some("x".into()), false, false, false),
            HistoryAction::ByDate(ref d) if d == "x"
        ));
        assert!(matches!(
            HistoryAction::from_flags(None, false, false, false),
            HistoryAction::Recent
        ));
    }

    #[test]
    fn test_render_messages_empty() {
        assert_eq!(render_messages("=== 最近消息 ===", &[]), "暂无消息记录。\n");
    }

    #[test]
    fn test_format_message() {
        let message = StoredMessage {
            id: 1,
            role: MessageRole::User,
            content: "你好".to_string(),
            created_at: NaiveDate::from_ymd_opt(2026, 2, 18)
                .unwrap()
                .and_hms_micro_opt(9, 30, 5, 123)
                .unwrap(),
        };
        assert_eq!(format_message(&message), "[2026-02-18 09:30:05] 用户: 你好");
    }
}
