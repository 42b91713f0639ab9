use std::path::PathBuf;

use pchat_core::api::ApiClient;
use pchat_types::PersonaDraft;

use crate::events::{PersonaUiEvent, UiEvent};

pub async fn persona_list_load(client: ApiClient) -> UiEvent {
    match client.list_personas().await {
        Ok(personas) => UiEvent::Persona(PersonaUiEvent::ListLoaded { personas }),
        Err(error) => UiEvent::Persona(PersonaUiEvent::ListFailed { error }),
    }
}

pub async fn persona_save(client: ApiClient, draft: PersonaDraft) -> UiEvent {
    match client.save_persona(&draft).await {
        Ok(persona) => UiEvent::Persona(PersonaUiEvent::Saved { persona }),
        Err(error) => UiEvent::Persona(PersonaUiEvent::SaveFailed { error }),
    }
}

pub async fn persona_delete(client: ApiClient, id: u64) -> UiEvent {
    match client.delete_persona(id).await {
        Ok(()) => UiEvent::Persona(PersonaUiEvent::Deleted { id }),
        Err(error) => UiEvent::Persona(PersonaUiEvent::DeleteFailed { error }),
    }
}

pub async fn persona_fetch(client: ApiClient, id: u64) -> UiEvent {
    match client.get_persona(id).await {
        Ok(persona) => UiEvent::Persona(PersonaUiEvent::Fetched { persona }),
        Err(error) => UiEvent::Persona(PersonaUiEvent::FetchFailed { id, error }),
    }
}

pub async fn avatar_upload(client: ApiClient, path: PathBuf) -> UiEvent {
    match client.upload_avatar(&path).await {
        Ok(url) => UiEvent::Persona(PersonaUiEvent::AvatarUploaded { url }),
        Err(error) => UiEvent::Persona(PersonaUiEvent::UploadFailed { error }),
    }
}

pub async fn persona_use(client: ApiClient, session_id: String, persona_id: u64) -> UiEvent {
    match client.use_persona(&session_id, persona_id).await {
        Ok(()) => UiEvent::Persona(PersonaUiEvent::Applied { session_id }),
        Err(error) => UiEvent::Persona(PersonaUiEvent::ApplyFailed { error }),
    }
}
