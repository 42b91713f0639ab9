use serde::{Deserialize, Serialize};

use crate::de;

/// Author of a stored message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Assistant,
    /// Backend bookkeeping (persona prompt, end-of-session marker).
    System,
    #[serde(other)]
    Other,
}

/// One stored message as returned by `GET /api/messages`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(deserialize_with = "de::string_or_null")]
    pub session_id: String,
    pub role: Role,
    #[serde(deserialize_with = "de::string_or_null")]
    pub content: String,
    #[serde(deserialize_with = "de::string_or_null")]
    pub meta: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Message {
    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    pub fn is_hidden(&self) -> bool {
        self.role == Role::System
    }

    /// Metadata label (elapsed time, summary marker), if any.
    pub fn meta(&self) -> Option<&str> {
        let meta = self.meta.trim();
        (!meta.is_empty()).then_some(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_role_decodes_as_other() {
        let msg: Message = serde_json::from_str(r#"{"role":"tool","content":"x"}"#).unwrap();
        assert_eq!(msg.role, Role::Other);
        assert!(!msg.is_assistant());
        assert!(!msg.is_hidden());
    }

    #[test]
    fn test_meta_blank_is_none() {
        let msg: Message =
            serde_json::from_str(r#"{"role":"assistant","content":"hi","meta":" "}"#).unwrap();
        assert_eq!(msg.meta(), None);

        let msg: Message =
            serde_json::from_str(r#"{"role":"assistant","content":"hi","meta":"对话总结"}"#)
                .unwrap();
        assert_eq!(msg.meta(), Some("对话总结"));
    }
}
