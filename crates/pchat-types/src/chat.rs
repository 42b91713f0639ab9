use serde::{Deserialize, Serialize};

use crate::Persona;
use crate::de;

/// Body of `POST /api/setup`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupRequest {
    pub model_name: String,
    pub personality: String,
    pub ai_name: String,
    pub ai_avatar: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona_id: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SetupResponse {
    pub session_id: String,
    pub message: String,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

/// Token accounting reported with a chat reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Raw `POST /api/chat` response. Either a reply or a termination notice;
/// use [`ChatResponse::into_reply`] to tell them apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChatResponse {
    pub message: Option<String>,
    pub elapsed_time: Option<String>,
    pub usage: Option<Usage>,
    pub ai_name: Option<String>,
    pub ai_avatar: Option<String>,
    #[serde(deserialize_with = "de::flag")]
    pub terminated: bool,
    pub summary: Option<String>,
    pub end_message: Option<String>,
    pub new_title: Option<String>,
}

/// A decoded chat outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    Message {
        text: String,
        elapsed_time: String,
        usage: Option<Usage>,
        ai_name: Option<String>,
        ai_avatar: Option<String>,
    },
    Terminated {
        summary: String,
        end_message: Option<String>,
        new_title: Option<String>,
    },
}

impl ChatResponse {
    /// Classifies the response. Returns `None` when it carries neither a
    /// reply nor a termination notice.
    pub fn into_reply(self) -> Option<ChatReply> {
        if self.terminated {
            return Some(ChatReply::Terminated {
                summary: self.summary.unwrap_or_default(),
                end_message: self.end_message.filter(|s| !s.is_empty()),
                new_title: self.new_title.filter(|s| !s.is_empty()),
            });
        }

        let text = self.message.filter(|m| !m.is_empty())?;
        Some(ChatReply::Message {
            text,
            elapsed_time: self.elapsed_time.unwrap_or_default(),
            usage: self.usage,
            ai_name: self.ai_name.filter(|s| !s.is_empty()),
            ai_avatar: self.ai_avatar.filter(|s| !s.is_empty()),
        })
    }
}

/// Body of `POST /api/session/terminate` and `POST /api/session/delete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdRequest {
    pub session_id: String,
}

/// Body of `POST /api/session/rename`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest {
    pub session_id: String,
    pub new_name: String,
}

/// Body of `POST /api/session/use_persona`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsePersonaRequest {
    pub session_id: String,
    pub persona_id: u64,
}

/// Generic `{ "result": "success", ... }` acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResultResponse {
    pub result: String,
    pub message: Option<String>,
    pub new_title: Option<String>,
    pub persona: Option<Persona>,
}

impl ResultResponse {
    pub fn is_success(&self) -> bool {
        self.result == "success"
    }
}

/// Response of `POST /api/upload_avatar`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UploadResponse {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_classified_as_message() {
        let json = r#"{"message":"Hello","elapsedTime":"1.2s","aiName":"Bot","aiAvatar":"/x.png",
            "usage":{"prompt_tokens":10,"completion_tokens":5,"total_tokens":15}}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();

        let Some(ChatReply::Message {
            text,
            elapsed_time,
            usage,
            ai_name,
            ai_avatar,
        }) = response.into_reply()
        else {
            panic!("expected message reply");
        };
        assert_eq!(text, "Hello");
        assert_eq!(elapsed_time, "1.2s");
        assert_eq!(usage.map(|u| u.total_tokens), Some(15));
        assert_eq!(ai_name.as_deref(), Some("Bot"));
        assert_eq!(ai_avatar.as_deref(), Some("/x.png"));
    }

    #[test]
    fn test_reply_classified_as_terminated() {
        let json = r#"{"terminated":true,"summary":"S","endMessage":"E","newTitle":"T"}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();

        assert_eq!(
            response.into_reply(),
            Some(ChatReply::Terminated {
                summary: "S".to_string(),
                end_message: Some("E".to_string()),
                new_title: Some("T".to_string()),
            })
        );
    }

    #[test]
    fn test_empty_reply_is_none() {
        let response: ChatResponse = serde_json::from_str(r#"{"message":""}"#).unwrap();
        assert_eq!(response.into_reply(), None);
    }

    #[test]
    fn test_setup_request_uses_camel_case() {
        let req = SetupRequest {
            model_name: "Deepseek".to_string(),
            ai_name: "AI助手".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["modelName"], "Deepseek");
        assert_eq!(json["aiName"], "AI助手");
        assert!(json.get("personaId").is_none());
    }
}
