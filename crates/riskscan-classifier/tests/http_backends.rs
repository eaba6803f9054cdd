//! HTTP-level tests for the real backends and page fetcher
//!
//! Each test binds a one-shot stub server on a loopback port, lets the
//! reqwest-based implementation talk to it, and inspects the raw request.

use riskscan_classifier::{
    build_request, ChatBackend, HttpFetcher, OllamaBackend, OpenAiBackend, PageFetcher,
    DEFAULT_FETCH_TIMEOUT, DEFAULT_USER_AGENT,
};
use riskscan_core::{Error, Evidence, Subject};
use std::io::Write;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tracing_subscriber::fmt::MakeWriter;

/// A request as seen by the stub server
struct CapturedRequest {
    request_line: String,
    /// Header block, lowercased
    headers: String,
    body: String,
}

impl CapturedRequest {
    fn parse(raw: &str) -> Self {
        let (head, body) = raw.split_once("\r\n\r\n").unwrap_or((raw, ""));
        let (request_line, headers) = head.split_once("\r\n").unwrap_or((head, ""));
        Self {
            request_line: request_line.to_string(),
            headers: headers.to_ascii_lowercase(),
            body: body.to_string(),
        }
    }

    fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Serve exactly one response, then hand back the request that was received
async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (SocketAddr, oneshot::Receiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let raw = read_request(&mut stream).await;

        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();

        let _ = tx.send(CapturedRequest::parse(&raw));
    });

    (addr, rx)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let body_len = text[..head_end]
                .to_ascii_lowercase()
                .lines()
                .find_map(|line| line.strip_prefix("content-length:").map(|v| v.trim().to_string()))
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + body_len {
                break;
            }
        }
    }

    String::from_utf8(buf).unwrap()
}

/// Shared buffer that collects formatted log output
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn sample_request() -> riskscan_core::ChatRequest {
    build_request(
        "llama3.2",
        &Subject::new("Face ID", "https://en.wikipedia.org/wiki/Face_ID"),
        &Evidence::new("Face ID is a facial recognition system."),
    )
}

#[tokio::test]
async fn test_ollama_posts_chat_wire_shape() {
    let (addr, rx) = serve_once(
        "200 OK",
        r#"{"model":"llama3.2","message":{"role":"assistant","content":"{\"uses_ai\": true}"},"done":true}"#,
    )
    .await;

    let url = format!("http://{}/api/chat", addr);
    let backend = OllamaBackend::new(&url, Duration::from_secs(5)).unwrap();
    let content = backend.chat(&sample_request()).await.unwrap();
    assert_eq!(content, r#"{"uses_ai": true}"#);

    let request = rx.await.unwrap();
    assert!(request.request_line.starts_with("POST /api/chat "));
    assert!(request.headers.contains("content-type: application/json"));

    let body = request.json();
    assert_eq!(body["model"], "llama3.2");
    assert_eq!(body["stream"], false);
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["role"], "user");
    assert!(messages[1]["content"]
        .as_str()
        .unwrap()
        .contains("SYSTEM NAME: Face ID"));
}

#[tokio::test]
async fn test_ollama_error_status_is_logged_and_retryable() {
    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let (addr, _rx) =
        serve_once("404 Not Found", r#"{"error":"model 'llama3.2' not found"}"#).await;

    let url = format!("http://{}/api/chat", addr);
    let backend = OllamaBackend::new(&url, Duration::from_secs(5)).unwrap();
    let err = backend.chat(&sample_request()).await.unwrap_err();

    match &err {
        Error::HttpStatus { status, body } => {
            assert_eq!(*status, 404);
            assert!(body.contains("model 'llama3.2' not found"));
        }
        other => panic!("expected HttpStatus, got {:?}", other),
    }
    assert!(err.is_retryable());

    let output = logs.contents();
    assert!(output.contains("model endpoint returned an error"));
    assert!(output.contains("model 'llama3.2' not found"));
}

#[tokio::test]
async fn test_openai_sends_bearer_token() {
    let (addr, rx) = serve_once(
        "200 OK",
        r#"{"id":"chatcmpl-1","choices":[{"index":0,"message":{"role":"assistant","content":"{\"uses_ai\": false}"}}]}"#,
    )
    .await;

    let url = format!("http://{}/v1", addr);
    let backend = OpenAiBackend::new(&url, "sk-test", Duration::from_secs(5)).unwrap();
    let content = backend.chat(&sample_request()).await.unwrap();
    assert_eq!(content, r#"{"uses_ai": false}"#);

    let request = rx.await.unwrap();
    assert!(request.request_line.starts_with("POST /v1/chat/completions "));
    assert!(request.headers.contains("authorization: bearer sk-test"));
    assert_eq!(request.json()["model"], "llama3.2");
}

#[tokio::test]
async fn test_fetcher_sends_user_agent() {
    let (addr, rx) = serve_once("200 OK", "<html><p>hello</p></html>").await;

    let fetcher = HttpFetcher::new(DEFAULT_USER_AGENT, DEFAULT_FETCH_TIMEOUT).unwrap();
    let body = fetcher.fetch(&format!("http://{}/wiki/Face_ID", addr)).await.unwrap();
    assert_eq!(body, "<html><p>hello</p></html>");

    let request = rx.await.unwrap();
    assert!(request.request_line.starts_with("GET /wiki/Face_ID "));
    let expected = format!("user-agent: {}", DEFAULT_USER_AGENT.to_ascii_lowercase());
    assert!(request.headers.contains(&expected));
}

#[tokio::test]
async fn test_fetcher_rejects_non_success_status() {
    let (addr, _rx) = serve_once("404 Not Found", "no such page").await;

    let fetcher = HttpFetcher::new(DEFAULT_USER_AGENT, DEFAULT_FETCH_TIMEOUT).unwrap();
    let err = fetcher.fetch(&format!("http://{}/missing", addr)).await.unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
    assert_eq!(err.to_string(), "http status 404");
}
