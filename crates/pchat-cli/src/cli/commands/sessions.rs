//! Session command handlers.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pchat_core::api::ApiClient;
use pchat_core::config::Config;
use pchat_core::export::{self, END_BANNER};
use pchat_types::{Message, Session};

const DEFAULT_AI_NAME: &str = "AI助手";

pub async fn list(client: &ApiClient) -> Result<()> {
    let sessions = client.list_sessions().await.context("list sessions")?;
    if sessions.is_empty() {
        println!("No sessions found.");
    } else {
        for session in &sessions {
            println!("{}", format_session_line(session));
        }
    }
    Ok(())
}

pub async fn show(client: &ApiClient, id: &str) -> Result<()> {
    let session = find_session(client, id).await?;
    let messages = client
        .list_messages(id)
        .await
        .with_context(|| format!("load messages for '{id}'"))?;
    print!("{}", format_transcript(&session, &messages));
    Ok(())
}

pub async fn create(client: &ApiClient, config: &Config) -> Result<()> {
    let request = config.new_session.setup_request();
    let id = client
        .create_session(&request)
        .await
        .context("create session")?;
    println!("Created session {id}");
    Ok(())
}

pub async fn rename(client: &ApiClient, id: &str, name: &str) -> Result<()> {
    client
        .rename_session(id, name)
        .await
        .with_context(|| format!("rename session '{id}'"))?;
    println!("Renamed session {id} → {}", name.trim());
    Ok(())
}

pub async fn delete(client: &ApiClient, id: &str) -> Result<()> {
    client
        .delete_session(id)
        .await
        .with_context(|| format!("delete session '{id}'"))?;
    println!("Deleted session {id}");
    Ok(())
}

pub async fn terminate(client: &ApiClient, id: &str) -> Result<()> {
    let new_title = client
        .terminate_session(id)
        .await
        .with_context(|| format!("terminate session '{id}'"))?;
    match new_title {
        Some(title) => println!("Terminated session {id} ({title})"),
        None => println!("Terminated session {id}"),
    }
    Ok(())
}

pub async fn export(client: &ApiClient, id: &str, output: Option<&Path>) -> Result<()> {
    let session = find_session(client, id).await?;
    let messages = client
        .list_messages(id)
        .await
        .with_context(|| format!("load messages for '{id}'"))?;
    let html = export::render_html(&session, &messages);

    match output {
        Some(path) => {
            fs::write(path, html)
                .with_context(|| format!("write transcript to {}", path.display()))?;
            println!("Exported session {id} to {}", path.display());
        }
        None => print!("{html}"),
    }
    Ok(())
}

/// The backend has no single-session endpoint, so the list is searched.
async fn find_session(client: &ApiClient, id: &str) -> Result<Session> {
    let sessions = client.list_sessions().await.context("list sessions")?;
    sessions
        .into_iter()
        .find(|s| s.id == id)
        .with_context(|| format!("Session '{id}' not found"))
}

fn format_session_line(session: &Session) -> String {
    let mut line = format!("{}  {}", session.id, session.display_name());
    if !session.model.is_empty() {
        let _ = write!(line, "  {}", session.model);
    }
    if session.terminated {
        line.push_str("  [已结束]");
    }
    line
}

fn format_transcript(session: &Session, messages: &[Message]) -> String {
    let ai_name = if session.ai_name.is_empty() {
        DEFAULT_AI_NAME
    } else {
        &session.ai_name
    };

    let mut out = format!("# {}\n", session.display_name());
    for message in messages.iter().filter(|m| !m.is_hidden()) {
        let speaker = if message.is_assistant() { ai_name } else { "你" };
        let _ = write!(out, "\n{speaker}:\n{}\n", message.content.trim_end());
        if let Some(meta) = message.meta() {
            let _ = writeln!(out, "  ({meta})");
        }
    }
    if session.terminated {
        let _ = write!(out, "\n{END_BANNER}\n");
    }
    out
}
