//! Chat subcommand handlers for AgentForge.

use std::io::Write;

use futures::StreamExt;
use tokio::io::AsyncBufRead;
use tracing::{debug, warn};

use agentforge_protocols::{ChatMessage, ChatRequest, HistoryStore, LlmProvider, StoredMessage};

use crate::cmd_history::{DATE_FORMAT_HINT, parse_date, render_messages, render_today_summary};
use crate::ui::{ChatInput, ChatStyle};

/// Messages loaded as context when a session starts.
const CONTEXT_LIMIT: usize = 20;

/// What the `chat` command should do.
pub(crate) enum ChatAction {
    List,
    ByDate(String),
    TodaySummary,
    Interactive,
}

impl ChatAction {
    pub fn from_flags(list: bool, date: Option<String>, summary: bool) -> Self {
        if list {
            ChatAction::List
        } else if let Some(date) = date {
            ChatAction::ByDate(date)
        } else if summary {
            ChatAction::TodaySummary
        } else {
            ChatAction::Interactive
        }
    }
}

/// Handle the non-interactive chat flags.
pub(crate) async fn handle_chat_query(
    action: ChatAction,
    store: &dyn HistoryStore,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ChatAction::List => {
            let messages = store.recent_messages(CONTEXT_LIMIT).await?;
            print!("{}", render_messages("=== 最近消息 ===", &messages));
        }
        ChatAction::ByDate(raw) => match parse_date(&raw) {
            Some(date) => {
                let messages = store.messages_by_date(date).await?;
                if messages.is_empty() {
                    println!("日期 {} 没有消息记录。", date);
                } else {
                    print!("{}", render_messages(&format!("=== {} 消息 ===", date), &messages));
                }
            }
            None => println!("{}", DATE_FORMAT_HINT),
        },
        ChatAction::TodaySummary => print!("{}", render_today_summary(store).await?),
        ChatAction::Interactive => {}
    }
    Ok(())
}

/// Interactive chat session.
pub(crate) struct ChatSession<'a> {
    provider: &'a dyn LlmProvider,
    store: &'a dyn HistoryStore,
    system: String,
    context: Vec<ChatMessage>,
    style: ChatStyle,
}

impl<'a> ChatSession<'a> {
    /// Start a session seeded with the most recent stored messages.
    pub async fn start(
        provider: &'a dyn LlmProvider,
        store: &'a dyn HistoryStore,
        system: impl Into<String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let context: Vec<ChatMessage> = store
            .recent_messages(CONTEXT_LIMIT)
            .await?
            .iter()
            .map(StoredMessage::to_chat_message)
            .collect();
        debug!("Loaded {} context messages", context.len());

        Ok(Self {
            provider,
            store,
            system: system.into(),
            context,
            style: ChatStyle::plain(),
        })
    }

    pub fn with_style(mut self, style: ChatStyle) -> Self {
        self.style = style;
        self
    }

    pub fn context(&self) -> &[ChatMessage] {
        &self.context
    }

    /// Read lines from `input` until EOF or a quit command.
    pub async fn run<R, W>(
        &mut self,
        mut input: ChatInput<R>,
        out: &mut W,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let farewell = self.style.farewell("再见!");
        writeln!(out, "{}", self.style.header("=== AgentForge 对话 ==="))?;
        writeln!(out, "{}", self.style.hint("输入消息，或 :help/:quit"))?;

        loop {
            write!(out, "{}", self.style.prompt())?;
            out.flush()?;

            let Some(line) = input.next_line().await? else {
                if !matches!(input, ChatInput::Terminal(_)) {
                    writeln!(out)?;
                }
                writeln!(out, "{farewell}")?;
                break;
            };

            let line = line.trim();
            match line {
                "" => continue,
                ":quit" | ":exit" | ":q" => {
                    writeln!(out, "{farewell}")?;
                    break;
                }
                ":help" | ":h" => write_help(out)?,
                ":history" => {
                    let messages = self.store.recent_messages(CONTEXT_LIMIT).await?;
                    write!(out, "{}", render_messages("=== 最近消息 ===", &messages))?;
                }
                ":clear" | ":c" => {
                    self.context.clear();
                    writeln!(out, "对话上下文已清除。")?;
                }
                ":summary" => write!(out, "{}", render_today_summary(self.store).await?)?,
                text => {
                    self.send(text, out).await?;
                }
            }
        }
        Ok(())
    }

    /// Send one user turn and stream the reply to `out`.
    ///
    /// Returns whether a reply was received. A failed stream is reported to
    /// `out` and leaves the context as it was before the turn. With ANSI
    /// output a status line stands in until the first fragment arrives.
    pub async fn send<W: Write>(
        &mut self,
        text: &str,
        out: &mut W,
    ) -> Result<bool, Box<dyn std::error::Error>> {
        self.store.save_user(text).await?;
        self.context.push(ChatMessage::user(text));

        let request = ChatRequest::builder()
            .system(self.system.clone())
            .messages(self.context.iter().cloned())
            .build()?;

        self.style.show_status(out)?;
        let mut stream = self.provider.chat_stream(request);
        let mut reply = String::new();
        let mut started = false;
        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(chunk) => {
                    if !started {
                        self.style.clear_status(out)?;
                        write!(out, "{}", self.style.assistant_label())?;
                        started = true;
                    }
                    write!(out, "{}", chunk)?;
                    out.flush()?;
                    reply.push_str(&chunk);
                }
                Err(e) => {
                    if started {
                        writeln!(out)?;
                    } else {
                        self.style.clear_status(out)?;
                    }
                    writeln!(out, "{}", self.style.error(&format!("错误: {e}")))?;
                    warn!("Chat stream failed: {}", e);
                    self.context.pop();
                    return Ok(false);
                }
            }
        }
        if !started {
            self.style.clear_status(out)?;
        }
        writeln!(out)?;

        if reply.trim().is_empty() {
            warn!("Empty reply from provider {}", self.provider.id());
            self.context.pop();
            return Ok(false);
        }

        self.store.save_assistant(&reply).await?;
        self.context.push(ChatMessage::assistant(reply));
        Ok(true)
    }
}

fn write_help<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "=== 可用命令 ===")?;
    writeln!(out, "  :help, :h   - 显示帮助")?;
    writeln!(out, "  :history     - 显示最近消息")?;
    writeln!(out, "  :clear, :c  - 清除对话上下文")?;
    writeln!(out, "  :summary     - 显示今日总结")?;
    writeln!(out, "  :quit, :q   - 退出对话")
}

#[cfg(test)]
#[path = "cmd_chat_tests.rs"]
mod tests;
