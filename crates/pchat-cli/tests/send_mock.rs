//! `pchat send` against a mock backend.

mod fixtures;

use fixtures::{can_bind_localhost, pchat};
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_send_prints_reply_and_stats() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({ "sessionId": "s1", "message": "你好" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "你好呀",
            "elapsedTime": "0.80s",
            "usage": { "prompt_tokens": 3, "completion_tokens": 4, "total_tokens": 7 },
            "aiName": "小樱"
        })))
        .expect(1)
        .mount(&server)
        .await;

    pchat(&home, &server)
        .args(["send", "s1", "你好"])
        .assert()
        .success()
        .stdout(predicate::str::contains("你好呀\n(0.80s, 7 tokens)"));
}

#[tokio::test]
async fn test_send_termination_prints_summary_and_end_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "terminated": true,
            "summary": "我们聊了东京的行程",
            "endMessage": "祝旅途愉快"
        })))
        .mount(&server)
        .await;

    pchat(&home, &server)
        .args(["send", "s1", "再见"])
        .assert()
        .success()
        .stdout(predicate::str::contains("我们聊了东京的行程\n祝旅途愉快"));
}

#[tokio::test]
async fn test_send_http_error_fails() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "model unavailable" })),
        )
        .mount(&server)
        .await;

    pchat(&home, &server)
        .args(["send", "s1", "你好"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("model unavailable"));
}

#[tokio::test]
async fn test_send_blank_message_makes_no_request() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    pchat(&home, &server)
        .args(["send", "s1", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Message is empty"));
}
