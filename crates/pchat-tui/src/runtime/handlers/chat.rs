use pchat_core::api::ApiClient;

use crate::events::{ChatUiEvent, UiEvent};

/// Sends one message. The session id travels with the result so a reply
/// for a session the user has left can be told apart.
pub async fn send_message(client: ApiClient, session_id: String, text: String) -> UiEvent {
    match client.send_message(&session_id, &text).await {
        Ok(reply) => UiEvent::Chat(ChatUiEvent::Replied { session_id, reply }),
        Err(error) => UiEvent::Chat(ChatUiEvent::Failed { session_id, error }),
    }
}
