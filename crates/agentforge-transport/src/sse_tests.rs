use super::*;
use futures::StreamExt;

fn frames_of(chunks: Vec<&'static [u8]>) -> SseFrames<impl Stream<Item = Result<Bytes, TransportError>> + Unpin> {
    SseFrames::new(futures::stream::iter(
        chunks.into_iter().map(|c| Ok(Bytes::from_static(c))),
    ))
}

#[test]
fn test_single_frame() {
    let mut decoder = SseDecoder::new();
    let frames = decoder.feed(b"event: ping\ndata: {}\n\n");
    assert_eq!(
        frames,
        vec![SseFrame {
            event: Some("ping".to_string()),
            data: "{}".to_string(),
            id: None,
        }]
    );
}

#[test]
fn test_crlf_line_endings() {
    let mut decoder = SseDecoder::new();
    let frames = decoder.feed(b"event: content_block_delta\r\ndata: {\"a\":1}\r\n\r\n");
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].event.as_deref(), Some("content_block_delta"));
    assert_eq!(frames[0].data, "{\"a\":1}");
}

#[test]
fn test_multiline_data_joined() {
    let mut decoder = SseDecoder::new();
    let frames = decoder.feed(b"data: first\ndata: second\n\n");
    assert_eq!(frames[0].data, "first\nsecond");
    assert!(frames[0].event.is_none());
}

#[test]
fn test_comments_and_unknown_fields_ignored() {
    let mut decoder = SseDecoder::new();
    let frames = decoder.feed(b": keep-alive\nretry: 100\ndata: x\nid: 42\n\n");
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].data, "x");
    assert_eq!(frames[0].id.as_deref(), Some("42"));
}

#[test]
fn test_value_without_space() {
    let mut decoder = SseDecoder::new();
    let frames = decoder.feed(b"data:[DONE]\n\n");
    assert_eq!(frames[0].data, "[DONE]");
}

#[test]
fn test_blank_lines_without_fields_do_not_dispatch() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.feed(b"\n\n\n").is_empty());
}

#[test]
fn test_event_without_data_is_discarded() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.feed(b"event: content_block_delta\n\n").is_empty());

    let frames = decoder.feed(b"data: x\n\n");
    assert_eq!(frames.len(), 1);
    assert!(frames[0].event.is_none());
    assert_eq!(frames[0].data, "x");
}

#[test]
fn test_empty_data_line_still_dispatches() {
    let mut decoder = SseDecoder::new();
    let frames = decoder.feed(b"event: ping\ndata:\n\n");
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].data, "");
}

#[test]
fn test_frame_split_across_chunks() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.feed(b"event: mess").is_empty());
    assert!(decoder.feed(b"age_stop\nda").is_empty());
    let frames = decoder.feed(b"ta: {}\n\n");
    assert_eq!(frames[0].event.as_deref(), Some("message_stop"));
    assert_eq!(frames[0].data, "{}");
}

#[test]
fn test_utf8_code_point_split_across_chunks() {
    let text = "data: 你好\n\n".as_bytes();
    // "你" is three bytes starting right after "data: "
    let (head, tail) = text.split_at(7);
    let mut decoder = SseDecoder::new();
    assert!(decoder.feed(head).is_empty());
    let frames = decoder.feed(tail);
    assert_eq!(frames[0].data, "你好");
}

#[test]
fn test_finish_flushes_unterminated_frame() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.feed(b"data: tail").is_empty());
    let frame = decoder.finish().unwrap();
    assert_eq!(frame.data, "tail");
    assert!(decoder.finish().is_none());
}

#[tokio::test]
async fn test_frames_stream() {
    let frames: Vec<SseFrame> = frames_of(vec![
        b"event: message_start\ndata: {}\n\nevent: content_block_delta\n" as &[u8],
        b"data: {\"text\":\"Hello\"}\n\n" as &[u8],
        b"data: [DONE]" as &[u8],
    ])
    .map(|f| f.unwrap())
    .collect()
    .await;

    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0].event.as_deref(), Some("message_start"));
    assert_eq!(frames[1].data, "{\"text\":\"Hello\"}");
    assert_eq!(frames[2].data, "[DONE]");
}

#[tokio::test]
async fn test_frames_stream_error_is_terminal() {
    let chunks: Vec<Result<Bytes, TransportError>> = vec![
        Ok(Bytes::from_static(b"data: one\n\n")),
        Err(TransportError::Timeout("idle".to_string())),
        Ok(Bytes::from_static(b"data: two\n\n")),
    ];
    let mut frames = SseFrames::new(futures::stream::iter(chunks));

    assert_eq!(frames.next().await.unwrap().unwrap().data, "one");
    assert!(matches!(
        frames.next().await,
        Some(Err(TransportError::Timeout(_)))
    ));
    assert!(frames.next().await.is_none());
}
