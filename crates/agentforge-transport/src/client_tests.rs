use super::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

fn transport() -> HttpTransport {
    HttpTransport::new(Duration::from_secs(5), Duration::from_secs(5)).unwrap()
}

/// Accept one connection, answer with `head` followed by `body`, then stall.
///
/// The receiver fires once the client closes the connection.
async fn stalling_server(head: String, body: &'static str) -> (String, oneshot::Receiver<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (closed_tx, closed_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 8192];
        let _ = socket.read(&mut buf).await;
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(body.as_bytes()).await.unwrap();
        socket.flush().await.unwrap();
        while let Ok(n) = socket.read(&mut buf).await {
            if n == 0 {
                break;
            }
        }
        let _ = closed_tx.send(());
    });

    (format!("http://{addr}/v1/messages"), closed_rx)
}

/// An SSE response that delivers one frame and then goes silent.
async fn one_frame_then_silence() -> (String, oneshot::Receiver<()>) {
    let frame = "data: one\n\n";
    let head = "HTTP/1.1 200 OK\r\n\
                content-type: text/event-stream\r\n\
                transfer-encoding: chunked\r\n\r\n"
        .to_string();
    let chunk = format!("{:x}\r\n{frame}\r\n", frame.len());
    stalling_server(head + &chunk, "").await
}

fn api_key_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-api-key", HeaderValue::from_static("test-api-key"));
    headers
}

#[tokio::test]
async fn test_post_json_success() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .and(matchers::path("/v1/messages"))
        .and(matchers::header("x-api-key", "test-api-key"))
        .and(matchers::header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/v1/messages", mock_server.uri());
    let body = serde_json::json!({"model": "claude-test"});
    let bytes = transport()
        .post_json(&url, api_key_headers(), &body)
        .await
        .unwrap();
    assert_eq!(&bytes[..], br#"{"ok":true}"#);

    let requests = mock_server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["model"], "claude-test");
}

#[tokio::test]
async fn test_post_json_non_2xx_carries_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"error":{"message":"Invalid API key"}}"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = transport()
        .post_json(&mock_server.uri(), HeaderMap::new(), &serde_json::json!({}))
        .await
        .unwrap_err();
    match err {
        TransportError::Status { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("Expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn test_post_json_connection_refused() {
    // Port 9 (discard) is not expected to accept connections in test environments
    let err = transport()
        .post_json("http://127.0.0.1:9/", HeaderMap::new(), &serde_json::json!({}))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TransportError::Connect(_) | TransportError::Request(_) | TransportError::Timeout(_)
    ));
}

#[tokio::test]
async fn test_post_json_read_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::new(Duration::from_secs(5), Duration::from_millis(200)).unwrap();
    let err = transport
        .post_json(&mock_server.uri(), HeaderMap::new(), &serde_json::json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Timeout(_)));
}

#[tokio::test]
async fn test_post_json_stream_frames() {
    let mock_server = MockServer::start().await;

    let body = "event: message_start\r\ndata: {}\r\n\r\n\
                event: content_block_delta\r\ndata: {\"text\":\"Hello\"}\r\n\r\n\
                event: message_stop\r\ndata: {}\r\n\r\n";
    Mock::given(matchers::method("POST"))
        .and(matchers::header("accept", "text/event-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let frames: Vec<SseFrame> = transport()
        .post_json_stream(&mock_server.uri(), HeaderMap::new(), &serde_json::json!({"stream": true}))
        .map(|f| f.unwrap())
        .collect()
        .await;

    let events: Vec<_> = frames.iter().map(|f| f.event.as_deref().unwrap()).collect();
    assert_eq!(events, vec!["message_start", "content_block_delta", "message_stop"]);
    assert_eq!(frames[1].data, "{\"text\":\"Hello\"}");
}

#[tokio::test]
async fn test_post_json_stream_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .mount(&mock_server)
        .await;

    let mut frames =
        transport().post_json_stream(&mock_server.uri(), HeaderMap::new(), &serde_json::json!({}));
    match frames.next().await {
        Some(Err(TransportError::Status { status, body })) => {
            assert_eq!(status, 500);
            assert_eq!(body, "overloaded");
        }
        other => panic!("Expected Status error, got {other:?}"),
    }
    assert!(frames.next().await.is_none());
}

#[tokio::test]
async fn test_post_json_stream_is_cold() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("data: x\n\n", "text/event-stream"))
        .mount(&mock_server)
        .await;

    let frames =
        transport().post_json_stream(&mock_server.uri(), HeaderMap::new(), &serde_json::json!({}));
    drop(frames);

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_post_json_stream_idle_timeout_ends_stream() {
    let (url, _closed) = one_frame_then_silence().await;
    let transport = HttpTransport::new(Duration::from_secs(5), Duration::from_millis(300)).unwrap();

    let mut frames = transport.post_json_stream(&url, HeaderMap::new(), &serde_json::json!({}));
    let first = frames.next().await.unwrap().unwrap();
    assert_eq!(first.data, "one");

    match frames.next().await {
        Some(Err(TransportError::Timeout(_))) => {}
        other => panic!("Expected Timeout, got {other:?}"),
    }
    assert!(frames.next().await.is_none());
}

#[tokio::test]
async fn test_dropping_stream_closes_connection() {
    let (url, closed) = one_frame_then_silence().await;

    let mut frames = transport().post_json_stream(&url, HeaderMap::new(), &serde_json::json!({}));
    assert_eq!(frames.next().await.unwrap().unwrap().data, "one");
    drop(frames);

    tokio::time::timeout(Duration::from_secs(5), closed)
        .await
        .expect("connection was not closed after the stream was dropped")
        .unwrap();
}

#[tokio::test]
async fn test_unreadable_error_body_is_reported() {
    // Announces 100 bytes of body but sends 7, then stalls.
    let head = "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 100\r\n\r\n".to_string();
    let (url, _closed) = stalling_server(head, "partial").await;
    let transport = HttpTransport::new(Duration::from_secs(5), Duration::from_millis(300)).unwrap();

    let err = transport
        .post_json(&url, HeaderMap::new(), &serde_json::json!({}))
        .await
        .unwrap_err();
    match err {
        TransportError::Status { status, body } => {
            assert_eq!(status, 500);
            assert!(body.starts_with("<unreadable body:"), "body was {body:?}");
        }
        other => panic!("Expected Status, got {other:?}"),
    }
}
