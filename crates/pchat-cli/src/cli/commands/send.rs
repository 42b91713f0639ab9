//! One-shot chat turn.

use anyhow::{Context, Result};
use pchat_core::api::ApiClient;
use pchat_types::ChatReply;

pub async fn run(client: &ApiClient, session_id: &str, message: &str) -> Result<()> {
    if message.trim().is_empty() {
        anyhow::bail!("Message is empty");
    }
    let reply = client
        .send_message(session_id, message)
        .await
        .with_context(|| format!("send to session '{session_id}'"))?;
    print!("{}", format_reply(&reply));
    Ok(())
}

fn format_reply(reply: &ChatReply) -> String {
    match reply {
        ChatReply::Message {
            text,
            elapsed_time,
            usage,
            ..
        } => {
            let mut out = format!("{}\n", text.trim_end());
            let mut stats = Vec::new();
            if !elapsed_time.is_empty() {
                stats.push(elapsed_time.clone());
            }
            if let Some(usage) = usage {
                stats.push(format!("{} tokens", usage.total_tokens));
            }
            if !stats.is_empty() {
                out.push_str(&format!("({})\n", stats.join(", ")));
            }
            out
        }
        ChatReply::Terminated {
            summary,
            end_message,
            new_title,
        } => {
            let mut out = String::new();
            if !summary.is_empty() {
                out.push_str(&format!("{}\n", summary.trim_end()));
            }
            if let Some(end) = end_message {
                out.push_str(&format!("{}\n", end.trim_end()));
            }
            if let Some(title) = new_title {
                out.push_str(&format!("Session renamed to {title}\n"));
            }
            out
        }
    }
}
