use super::*;

fn frame(event: Option<&str>, data: &str) -> SseFrame {
    SseFrame {
        event: event.map(str::to_string),
        data: data.to_string(),
        id: None,
    }
}

#[test]
fn test_parse_response_concatenates_text_blocks() {
    let body = br#"{
        "id": "msg_123",
        "model": "claude-test",
        "content": [
            {"type": "text", "text": "Hello"},
            {"type": "tool_use", "id": "t1", "name": "x", "input": {}},
            {"type": "text", "text": ", world!"}
        ],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 10, "output_tokens": 5}
    }"#;

    let response = parse_response(body).unwrap();
    assert_eq!(response.id, "msg_123");
    assert_eq!(response.content, "Hello, world!");
    assert_eq!(response.model, "claude-test");
    assert_eq!(response.stop_reason.as_deref(), Some("end_turn"));

    let usage = response.usage.unwrap();
    assert_eq!(usage.input_tokens(), 10);
    assert_eq!(usage.output_tokens(), 5);
    assert_eq!(usage.total_tokens(), 15);
    assert_eq!(response.raw["id"], "msg_123");
}

#[test]
fn test_parse_response_without_usage() {
    let body = br#"{"id": "msg_1", "model": "m", "content": []}"#;

    let response = parse_response(body).unwrap();
    assert_eq!(response.content, "");
    assert!(response.usage.is_none());
    assert!(response.stop_reason.is_none());
}

#[test]
fn test_parse_response_invalid_json() {
    let err = parse_response(b"<html>bad gateway</html>").unwrap_err();
    assert!(matches!(err, ProviderError::Decode(_)));
}

#[test]
fn test_parse_stream_frame_text_delta() {
    let f = frame(
        Some("content_block_delta"),
        r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"Hi"}}"#,
    );
    assert_eq!(parse_stream_frame(&f).as_deref(), Some("Hi"));
}

#[test]
fn test_parse_stream_frame_ignores_other_events() {
    let start = frame(Some("message_start"), r#"{"type":"message_start"}"#);
    let ping = frame(Some("ping"), r#"{"type":"ping"}"#);
    let unnamed = frame(None, r#"{"delta":{"text":"x"}}"#);

    assert_eq!(parse_stream_frame(&start), None);
    assert_eq!(parse_stream_frame(&ping), None);
    assert_eq!(parse_stream_frame(&unnamed), None);
}

#[test]
fn test_parse_stream_frame_malformed() {
    let f = frame(Some("content_block_delta"), "{not json");
    assert_eq!(parse_stream_frame(&f), None);
}
