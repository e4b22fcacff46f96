//! Follower lookup through the real HTTP client.
//!
//! Each test starts a one-shot HTTP responder on localhost, points a
//! `ChesscomClient` at it, and sends a `tools/call` line through the server.

use std::sync::Arc;
use std::time::Duration;

use echoserver_mcp::chesscom::ChesscomClient;
use echoserver_mcp::mcp::{Dispatcher, McpServer, ToolInvoker, ToolRegistry};
use reqwest::Url;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const LOOKUP_ALICE: &str = r#"{"jsonrpc":"2.0","id":23,"method":"tools/call","params":{"name":"chesscomProfileFollowers","arguments":{"username":"alice"}}}"#;

/// Serves a single request with a canned response after `delay`.
async fn one_shot_responder(status: &'static str, body: &'static str, delay: Duration) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => return,
                Ok(n) => head.extend_from_slice(&buf[..n]),
            }
        }
        tokio::time::sleep(delay).await;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    Url::parse(&format!("http://{addr}")).unwrap()
}

fn server_for(base_url: Url, client_timeout: Duration) -> McpServer {
    let http = ChesscomClient::builder("chesscom-app/1.0", client_timeout)
        .no_proxy()
        .build()
        .unwrap();
    let client = ChesscomClient::from_parts(http, base_url);

    McpServer::new(Dispatcher::new(
        Arc::new(ToolRegistry::builtin()),
        ToolInvoker::new(Arc::new(client), Duration::from_secs(10)),
    ))
}

async fn lookup(server: &McpServer) -> Value {
    let envelope = server.handle_line(LOOKUP_ALICE).await.unwrap();
    serde_json::to_value(envelope).unwrap()
}

#[tokio::test]
async fn success_returns_follower_count_as_text() {
    let base = one_shot_responder(
        "200 OK",
        r#"{"player_id":1,"username":"alice","followers":42,"status":"premium"}"#,
        Duration::ZERO,
    )
    .await;

    let response = lookup(&server_for(base, Duration::from_secs(5))).await;
    assert_eq!(
        response,
        json!({"jsonrpc": "2.0", "id": 23, "result": {"content": [{"type": "text", "text": "42"}]}})
    );
}

#[tokio::test]
async fn timeout_not_found_and_malformed_body_look_identical() {
    let expected = json!({
        "jsonrpc": "2.0",
        "id": 23,
        "error": {"code": -1, "message": "Chess.com user profile not found"}
    });

    let slow = one_shot_responder("200 OK", r#"{"followers":1}"#, Duration::from_secs(10)).await;
    let timed_out = lookup(&server_for(slow, Duration::from_millis(200))).await;

    let missing = one_shot_responder("404 Not Found", r#"{"code":0,"message":"not found"}"#, Duration::ZERO).await;
    let not_found = lookup(&server_for(missing, Duration::from_secs(5))).await;

    let garbled = one_shot_responder("200 OK", "<html>Service Unavailable", Duration::ZERO).await;
    let malformed = lookup(&server_for(garbled, Duration::from_secs(5))).await;

    assert_eq!(timed_out, expected);
    assert_eq!(not_found, expected);
    assert_eq!(malformed, expected);
}

#[tokio::test]
async fn unreachable_api_is_folded_too() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = Url::parse(&format!("http://{addr}")).unwrap();
    let response = lookup(&server_for(base, Duration::from_secs(5))).await;
    assert_eq!(response["error"]["code"], -1);
}
