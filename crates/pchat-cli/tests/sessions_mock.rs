//! `pchat sessions ...` against a mock backend.

mod fixtures;

use std::fs;

use fixtures::{can_bind_localhost, messages_json, pchat, sessions_json};
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_sessions(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sessions_json()))
        .mount(server)
        .await;
}

async fn mount_messages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/messages"))
        .and(query_param("sessionId", "s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(messages_json()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_sessions_list_prints_each_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    mount_sessions(&server).await;

    pchat(&home, &server)
        .args(["sessions", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("s1  东京旅行  Deepseek"))
        .stdout(predicate::str::contains("s2  新对话  Deepseek  [已结束]"));
}

#[tokio::test]
async fn test_sessions_list_null_body_is_empty() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    pchat(&home, &server)
        .args(["sessions", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions found."));
}

#[tokio::test]
async fn test_sessions_show_prints_transcript() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    mount_sessions(&server).await;
    mount_messages(&server).await;

    pchat(&home, &server)
        .args(["sessions", "show", "s1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# 东京旅行"))
        .stdout(predicate::str::contains("小樱:\n**你好呀**"))
        .stdout(predicate::str::contains("persona prompt").not());
}

#[tokio::test]
async fn test_sessions_show_unknown_id_fails() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    mount_sessions(&server).await;

    pchat(&home, &server)
        .args(["sessions", "show", "missing"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Session 'missing' not found"));
}

#[tokio::test]
async fn test_sessions_new_posts_configured_setup() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    fs::write(
        home.path().join("config.toml"),
        "[new_session]\nai_name = \"小樱\"\n",
    )
    .unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/setup"))
        .and(body_json(json!({
            "modelName": "Deepseek",
            "personality": "",
            "aiName": "小樱",
            "aiAvatar": "/static/ai_avatar.png"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "sessionId": "s9", "message": "ok" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    pchat(&home, &server)
        .args(["sessions", "new"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created session s9"));
}

#[tokio::test]
async fn test_sessions_rename_sends_trimmed_name() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/session/rename"))
        .and(body_json(json!({ "sessionId": "s1", "newName": "京都" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "success" })))
        .expect(1)
        .mount(&server)
        .await;

    pchat(&home, &server)
        .args(["sessions", "rename", "s1", "  京都 "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renamed session s1 → 京都"));
}

#[tokio::test]
async fn test_sessions_delete_failure_shows_backend_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/session/delete"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "result": "error", "message": "会话不存在" })),
        )
        .mount(&server)
        .await;

    pchat(&home, &server)
        .args(["sessions", "delete", "s1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("会话不存在"));
}

#[tokio::test]
async fn test_sessions_terminate_prints_new_title() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/session/terminate"))
        .and(body_json(json!({ "sessionId": "s1" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "result": "success", "newTitle": "东京之旅" })),
        )
        .mount(&server)
        .await;

    pchat(&home, &server)
        .args(["sessions", "terminate", "s1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Terminated session s1 (东京之旅)"));
}

#[tokio::test]
async fn test_sessions_export_writes_html_file() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let out_path = out_dir.path().join("s1.html");
    let server = MockServer::start().await;
    mount_sessions(&server).await;
    mount_messages(&server).await;

    pchat(&home, &server)
        .args(["sessions", "export", "s1", "--output"])
        .arg(&out_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported session s1"));

    let html = fs::read_to_string(&out_path).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<strong>你好呀</strong>"));
    assert!(html.contains("&lt;b&gt;你好&lt;/b&gt;"));
    assert!(!html.contains("persona prompt"));
}

#[tokio::test]
async fn test_unreachable_backend_exits_with_error() {
    let home = TempDir::new().unwrap();

    assert_cmd::cargo::cargo_bin_cmd!("pchat")
        .env("PCHAT_HOME", home.path())
        .env_remove("PCHAT_BASE_URL")
        .args(["--base-url", "http://127.0.0.1:9", "sessions", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("list sessions"));
}
