//! Persona command handlers.

use std::path::Path;

use anyhow::{Context, Result};
use pchat_core::api::ApiClient;
use pchat_types::Persona;

pub async fn list(client: &ApiClient) -> Result<()> {
    let personas = client.list_personas().await.context("list personas")?;
    if personas.is_empty() {
        println!("No personas found.");
    } else {
        for persona in &personas {
            println!("{}  {}", persona.id, persona.name);
        }
    }
    Ok(())
}

pub async fn show(client: &ApiClient, id: u64) -> Result<()> {
    let persona = client
        .get_persona(id)
        .await
        .with_context(|| format!("load persona {id}"))?;
    print!("{}", format_persona(&persona));
    Ok(())
}

pub async fn delete(client: &ApiClient, id: u64) -> Result<()> {
    client
        .delete_persona(id)
        .await
        .with_context(|| format!("delete persona {id}"))?;
    println!("Deleted persona {id}");
    Ok(())
}

pub async fn apply(client: &ApiClient, session_id: &str, persona_id: u64) -> Result<()> {
    client
        .use_persona(session_id, persona_id)
        .await
        .with_context(|| format!("apply persona {persona_id} to session '{session_id}'"))?;
    println!("Session {session_id} now uses persona {persona_id}");
    Ok(())
}

pub async fn upload(client: &ApiClient, file: &Path) -> Result<()> {
    let url = client
        .upload_avatar(file)
        .await
        .with_context(|| format!("upload {}", file.display()))?;
    println!("{url}");
    Ok(())
}

fn format_persona(persona: &Persona) -> String {
    let fields = [
        ("名称", persona.name.as_str()),
        ("头像", persona.avatar.as_str()),
        ("身份", persona.identity.as_str()),
        ("外貌", persona.appearance.as_str()),
        ("性格", persona.personality.as_str()),
    ];
    let mut out = format!("#{}\n", persona.id);
    for (label, value) in fields.iter().filter(|(_, v)| !v.trim().is_empty()) {
        out.push_str(&format!("{label}: {}\n", value.trim()));
    }
    out
}
