use serde::{Deserialize, Serialize};

use crate::de;

/// Name the backend gives a session before its first exchange is summarized.
pub const DEFAULT_SESSION_NAME: &str = "新对话";

/// A conversation with one AI persona, as listed by `GET /api/sessions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    #[serde(deserialize_with = "de::string_or_null")]
    pub id: String,
    #[serde(deserialize_with = "de::string_or_null")]
    pub name: String,
    #[serde(deserialize_with = "de::string_or_null")]
    pub model: String,
    #[serde(deserialize_with = "de::string_or_null")]
    pub personality: String,
    #[serde(deserialize_with = "de::string_or_null")]
    pub ai_name: String,
    #[serde(deserialize_with = "de::string_or_null")]
    pub ai_avatar: String,
    #[serde(deserialize_with = "de::flag")]
    pub terminated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Session {
    /// True while the backend has not yet replaced the placeholder name.
    pub fn has_default_name(&self) -> bool {
        self.name == DEFAULT_SESSION_NAME
    }

    /// Display name, falling back to the placeholder for blank names.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            DEFAULT_SESSION_NAME
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_decodes_backend_row() {
        let json = r#"{
            "id": "sess_1700000000",
            "name": "新对话",
            "model": "Deepseek",
            "personality": "",
            "ai_name": "AI助手",
            "ai_avatar": "/static/ai_avatar.png",
            "terminated": false,
            "created_at": "2024-05-01T10:00:00+08:00",
            "updated_at": "2024-05-01T10:00:00+08:00",
            "persona_id": null,
            "messages": null
        }"#;

        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.id, "sess_1700000000");
        assert_eq!(session.ai_name, "AI助手");
        assert!(!session.terminated);
        assert!(session.has_default_name());
        assert_eq!(session.persona_id, None);
    }

    #[test]
    fn test_terminated_accepts_integer_flag() {
        let session: Session = serde_json::from_str(r#"{"id":"a","terminated":1}"#).unwrap();
        assert!(session.terminated);

        let session: Session = serde_json::from_str(r#"{"id":"a","terminated":0}"#).unwrap();
        assert!(!session.terminated);
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let session: Session = serde_json::from_str(r#"{"id":"a","name":null}"#).unwrap();
        assert_eq!(session.name, "");
        assert_eq!(session.display_name(), DEFAULT_SESSION_NAME);
        assert_eq!(session.ai_avatar, "");
        assert!(!session.terminated);
    }
}
