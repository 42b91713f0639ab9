use serde::{Deserialize, Serialize};

use crate::de;

/// A reusable AI character profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
    pub id: u64,
    #[serde(deserialize_with = "de::string_or_null")]
    pub name: String,
    #[serde(deserialize_with = "de::string_or_null")]
    pub avatar: String,
    #[serde(deserialize_with = "de::string_or_null")]
    pub identity: String,
    #[serde(deserialize_with = "de::string_or_null")]
    pub appearance: String,
    #[serde(deserialize_with = "de::string_or_null")]
    pub personality: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Persona {
    /// Editable copy of this persona, keyed by its id.
    pub fn to_draft(&self) -> PersonaDraft {
        PersonaDraft {
            id: Some(self.id),
            name: self.name.clone(),
            avatar: self.avatar.clone(),
            identity: self.identity.clone(),
            appearance: self.appearance.clone(),
            personality: self.personality.clone(),
        }
    }
}

/// Body of `POST /api/persona`. A missing `id` creates a new persona.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    pub avatar: String,
    pub identity: String,
    pub appearance: String,
    pub personality: String,
}

impl PersonaDraft {
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// True when the editable fields match the given persona.
    pub fn matches(&self, persona: &Persona) -> bool {
        self.name == persona.name
            && self.avatar == persona.avatar
            && self.identity == persona.identity
            && self.appearance == persona.appearance
            && self.personality == persona.personality
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_draft_omits_id() {
        let draft = PersonaDraft {
            name: "小雪".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["name"], "小雪");
        assert!(draft.is_new());
    }

    #[test]
    fn test_to_draft_keeps_id_and_fields() {
        let persona = Persona {
            id: 7,
            name: "Ada".to_string(),
            identity: "mathematician".to_string(),
            ..Default::default()
        };
        let draft = persona.to_draft();
        assert_eq!(draft.id, Some(7));
        assert!(draft.matches(&persona));
        assert_eq!(serde_json::to_value(&draft).unwrap()["id"], 7);
    }
}
