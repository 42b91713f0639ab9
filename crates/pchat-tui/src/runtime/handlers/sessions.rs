use pchat_core::api::ApiClient;
use pchat_types::SetupRequest;
use tracing::info;

use crate::events::{SessionUiEvent, UiEvent};
use crate::sessions::ListFollowUp;

/// Loads the session list.
pub async fn session_list_load(client: ApiClient, follow_up: ListFollowUp) -> UiEvent {
    match client.list_sessions().await {
        Ok(sessions) => UiEvent::Session(SessionUiEvent::ListLoaded {
            sessions,
            follow_up,
        }),
        Err(error) => UiEvent::Session(SessionUiEvent::ListFailed { error }),
    }
}

/// Loads the messages of one session.
pub async fn message_list_load(client: ApiClient, session_id: String) -> UiEvent {
    match client.list_messages(&session_id).await {
        Ok(messages) => UiEvent::Session(SessionUiEvent::MessagesLoaded {
            session_id,
            messages,
        }),
        Err(error) => UiEvent::Session(SessionUiEvent::MessagesFailed { session_id, error }),
    }
}

pub async fn session_create(client: ApiClient, request: SetupRequest) -> UiEvent {
    match client.create_session(&request).await {
        Ok(session_id) => {
            info!(session_id, "session created");
            UiEvent::Session(SessionUiEvent::Created { session_id })
        }
        Err(error) => UiEvent::Session(SessionUiEvent::CreateFailed { error }),
    }
}

pub async fn session_rename(client: ApiClient, session_id: String, name: String) -> UiEvent {
    match client.rename_session(&session_id, &name).await {
        Ok(()) => UiEvent::Session(SessionUiEvent::Renamed { session_id }),
        Err(error) => UiEvent::Session(SessionUiEvent::RenameFailed { error }),
    }
}

pub async fn session_terminate(client: ApiClient, session_id: String) -> UiEvent {
    match client.terminate_session(&session_id).await {
        Ok(new_title) => {
            info!(session_id, "session terminated");
            UiEvent::Session(SessionUiEvent::Terminated {
                session_id,
                new_title,
            })
        }
        Err(error) => UiEvent::Session(SessionUiEvent::TerminateFailed { error }),
    }
}

pub async fn session_delete(client: ApiClient, session_id: String) -> UiEvent {
    match client.delete_session(&session_id).await {
        Ok(()) => {
            info!(session_id, "session deleted");
            UiEvent::Session(SessionUiEvent::Deleted { session_id })
        }
        Err(error) => UiEvent::Session(SessionUiEvent::DeleteFailed { error }),
    }
}
