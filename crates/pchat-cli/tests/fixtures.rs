//! Shared helpers for CLI tests that talk to a mock backend.

#![allow(dead_code)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;
use wiremock::MockServer;

pub fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

/// `pchat` pointed at `server`, with an isolated empty `PCHAT_HOME`.
pub fn pchat(home: &TempDir, server: &MockServer) -> Command {
    let mut cmd = cargo_bin_cmd!("pchat");
    cmd.env("PCHAT_HOME", home.path())
        .env_remove("PCHAT_BASE_URL")
        .env_remove("PCHAT_LOG")
        .args(["--base-url", &server.uri()]);
    cmd
}

pub fn sessions_json() -> serde_json::Value {
    serde_json::json!([
        {
            "id": "s1",
            "name": "东京旅行",
            "model": "Deepseek",
            "ai_name": "小樱",
            "ai_avatar": "/static/sakura.png",
            "terminated": 0
        },
        {
            "id": "s2",
            "name": "新对话",
            "model": "Deepseek",
            "ai_name": null,
            "terminated": 1
        }
    ])
}

pub fn messages_json() -> serde_json::Value {
    serde_json::json!([
        { "session_id": "s1", "role": "system", "content": "persona prompt", "meta": "" },
        { "session_id": "s1", "role": "user", "content": "<b>你好</b>", "meta": null },
        { "session_id": "s1", "role": "assistant", "content": "**你好呀**", "meta": "耗时 1.2s" }
    ])
}
