use super::*;

use std::collections::VecDeque;
use std::sync::Mutex;

use agentforge_history_sqlite::SqliteHistoryStore;
use agentforge_protocols::{ChatResponse, ChatStream, MessageRole, ProviderError};
use async_trait::async_trait;
use futures::stream;

/// Replies with one scripted stream per call.
struct ScriptedProvider {
    replies: Mutex<VecDeque<Vec<Result<String, ProviderError>>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    fn new(replies: Vec<Vec<Result<String, ProviderError>>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        Err(ProviderError::InvalidRequest("not used".to_string()))
    }

    fn chat_stream(&self, request: ChatRequest) -> ChatStream {
        self.requests.lock().unwrap().push(request);
        let items = self.replies.lock().unwrap().pop_front().unwrap_or_default();
        Box::pin(stream::iter(items))
    }
}

fn ok(chunks: &[&str]) -> Vec<Result<String, ProviderError>> {
    chunks.iter().map(|c| Ok(c.to_string())).collect()
}

fn failing() -> Vec<Result<String, ProviderError>> {
    vec![
        Ok("partial".to_string()),
        Err(ProviderError::Timeout("idle".to_string())),
    ]
}

#[tokio::test]
async fn test_send_streams_and_records() {
    let store = SqliteHistoryStore::in_memory().await.unwrap();
    let provider = ScriptedProvider::new(vec![ok(&["Hello", ", world!"])]);
    let mut session = ChatSession::start(&provider, &store, "sys").await.unwrap();
    let mut out = Vec::new();

    assert!(session.send("Hi", &mut out).await.unwrap());

    assert_eq!(String::from_utf8(out).unwrap(), "Hello, world!\n");
    assert_eq!(
        session.context(),
        &[ChatMessage::user("Hi"), ChatMessage::assistant("Hello, world!")]
    );

    let stored = store.all_messages().await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[1].role, MessageRole::Assistant);
    assert_eq!(stored[1].content, "Hello, world!");

    let requests = provider.requests.lock().unwrap();
    assert_eq!(requests[0].system(), Some("sys"));
}

#[tokio::test]
async fn test_send_failure_discards_user_turn() {
    let store = SqliteHistoryStore::in_memory().await.unwrap();
    let provider = ScriptedProvider::new(vec![ok(&["first"]), failing(), ok(&["third"])]);
    let mut session = ChatSession::start(&provider, &store, "sys").await.unwrap();
    let mut out = Vec::new();

    assert!(session.send("one", &mut out).await.unwrap());
    assert!(!session.send("two", &mut out).await.unwrap());
    assert_eq!(session.context().len(), 2);

    assert!(session.send("three", &mut out).await.unwrap());
    let requests = provider.requests.lock().unwrap();
    let last: Vec<&str> = requests[2]
        .messages()
        .iter()
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(last, vec!["one", "first", "three"]);

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("partial"));
    assert!(printed.contains("错误: Timeout: idle"));
}

#[tokio::test]
async fn test_ansi_send_shows_status_then_labelled_reply() {
    let store = SqliteHistoryStore::in_memory().await.unwrap();
    let provider = ScriptedProvider::new(vec![ok(&["Hello"]), failing()]);
    let mut session = ChatSession::start(&provider, &store, "sys")
        .await
        .unwrap()
        .with_style(ChatStyle::ansi());

    let mut out = Vec::new();
    assert!(session.send("Hi", &mut out).await.unwrap());
    let printed = String::from_utf8(out).unwrap();
    let status = printed.find("思考中...").unwrap();
    let cleared = printed.find("\x1b[2K").unwrap();
    let label = printed.find("助手").unwrap();
    let reply = printed.find("Hello").unwrap();
    assert!(status < cleared && cleared < label && label < reply);

    let mut out = Vec::new();
    assert!(!session.send("again", &mut out).await.unwrap());
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("错误: Timeout: idle"));
    assert!(printed.contains("\x1b["));
}

#[tokio::test]
async fn test_plain_send_has_no_status_line() {
    let store = SqliteHistoryStore::in_memory().await.unwrap();
    let provider = ScriptedProvider::new(vec![vec![]]);
    let mut session = ChatSession::start(&provider, &store, "sys").await.unwrap();

    let mut out = Vec::new();
    assert!(!session.send("Hi", &mut out).await.unwrap());
    assert_eq!(String::from_utf8(out).unwrap(), "\n");
}

#[tokio::test]
async fn test_session_loads_recent_context() {
    let store = SqliteHistoryStore::in_memory().await.unwrap();
    for i in 0..25 {
        store.save_user(&format!("q{i}")).await.unwrap();
    }
    let provider = ScriptedProvider::new(vec![]);

    let session = ChatSession::start(&provider, &store, "sys").await.unwrap();
    assert_eq!(session.context().len(), 20);
    assert_eq!(session.context()[0].content, "q5");
    assert_eq!(session.context()[19].content, "q24");
}

#[tokio::test]
async fn test_run_commands() {
    let store = SqliteHistoryStore::in_memory().await.unwrap();
    store.save_user("earlier").await.unwrap();
    let provider = ScriptedProvider::new(vec![ok(&["answer"])]);
    let mut session = ChatSession::start(&provider, &store, "sys").await.unwrap();

    let input: &[u8] = b":help\n\n:clear\nquestion\n:history\n:summary\n:q\nignored\n";
    let mut out = Vec::new();
    session.run(ChatInput::lines(input), &mut out).await.unwrap();

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("=== 可用命令 ==="));
    assert!(printed.contains("对话上下文已清除。"));
    assert!(printed.contains("answer\n"));
    assert!(printed.contains("=== 最近消息 ==="));
    assert!(printed.contains("今日暂无总结"));
    assert!(printed.ends_with("再见!\n"));

    // The cleared context only holds the new exchange.
    assert_eq!(
        session.context(),
        &[ChatMessage::user("question"), ChatMessage::assistant("answer")]
    );
    assert_eq!(provider.requests.lock().unwrap().len(), 1);
    assert_eq!(store.total_count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_run_ends_on_eof() {
    let store = SqliteHistoryStore::in_memory().await.unwrap();
    let provider = ScriptedProvider::new(vec![]);
    let mut session = ChatSession::start(&provider, &store, "sys").await.unwrap();

    let mut out = Vec::new();
    session.run(ChatInput::lines(&b""[..]), &mut out).await.unwrap();
    assert!(String::from_utf8(out).unwrap().ends_with("再见!\n"));
}

#[test]
fn test_chat_action_from_flags() {
    assert!(matches!(ChatAction::from_flags(true, None, true), ChatAction::List));
    assert!(matches!(
        ChatAction::from_flags(false, Some("2026-02-18".into()), true),
        ChatAction::ByDate(_)
    ));
    assert!(matches!(ChatAction::from_flags(false, None, true), ChatAction::TodaySummary));
    assert!(matches!(ChatAction::from_flags(false, None, false), ChatAction::Interactive));
}
