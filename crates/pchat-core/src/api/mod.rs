//! HTTP client for the chat backend.
//!
//! One method per REST endpoint. Every call is a single request: no retry,
//! no backoff. Failures come back as [`ApiError`] so callers can tell a dead
//! network apart from a backend refusal.

mod error;

use std::path::Path;
use std::time::Duration;

pub use error::{ApiError, ApiErrorKind, ApiResult};
use error::classify_reqwest_error;
use pchat_types::{
    ChatReply, ChatRequest, ChatResponse, Message, Persona, PersonaDraft, RenameRequest,
    ResultResponse, Session, SessionIdRequest, SetupRequest, SetupResponse, UploadResponse,
    UsePersonaRequest,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;

/// Image extensions the backend accepts for avatars.
pub const AVATAR_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Client for the chat backend REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for `base_url` with an optional per-request timeout.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Creates a client from config (applies `PCHAT_BASE_URL`).
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the client cannot be built.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let base_url = config.resolved_base_url()?;
        Ok(Self::new(base_url, config.request_timeout())?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------

    /// `GET /api/sessions`. A `null` body is treated as an empty list.
    pub async fn list_sessions(&self) -> ApiResult<Vec<Session>> {
        let sessions: Option<Vec<Session>> = self.get_json("/api/sessions").await?;
        Ok(sessions.unwrap_or_default())
    }

    /// `POST /api/setup`. Returns the new session id.
    pub async fn create_session(&self, request: &SetupRequest) -> ApiResult<String> {
        let response: SetupResponse = self.post_json("/api/setup", request).await?;
        if response.session_id.is_empty() {
            return Err(ApiError::backend("Backend returned no session id"));
        }
        Ok(response.session_id)
    }

    /// `GET /api/messages?sessionId=`.
    pub async fn list_messages(&self, session_id: &str) -> ApiResult<Vec<Message>> {
        if session_id.is_empty() {
            return Err(ApiError::validation("缺少会话ID"));
        }
        debug!(session_id, "GET /api/messages");
        let response = self
            .http
            .get(self.url("/api/messages"))
            .query(&[("sessionId", session_id)])
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;
        let messages: Option<Vec<Message>> = read_json(response).await?;
        Ok(messages.unwrap_or_default())
    }

    /// `POST /api/chat`.
    pub async fn send_message(&self, session_id: &str, message: &str) -> ApiResult<ChatReply> {
        let request = ChatRequest {
            session_id: session_id.to_string(),
            message: message.to_string(),
        };
        let response: ChatResponse = self.post_json("/api/chat", &request).await?;
        response
            .into_reply()
            .ok_or_else(|| ApiError::backend("Backend returned an empty reply"))
    }

    /// `POST /api/session/terminate`. Returns the session's new title.
    pub async fn terminate_session(&self, session_id: &str) -> ApiResult<Option<String>> {
        let request = SessionIdRequest {
            session_id: session_id.to_string(),
        };
        let response = self
            .post_result("/api/session/terminate", &request, "终止失败！")
            .await?;
        Ok(response.new_title.filter(|t| !t.is_empty()))
    }

    /// `POST /api/session/delete`.
    pub async fn delete_session(&self, session_id: &str) -> ApiResult<()> {
        let request = SessionIdRequest {
            session_id: session_id.to_string(),
        };
        self.post_result("/api/session/delete", &request, "删除失败！")
            .await
            .map(|_| ())
    }

    /// `POST /api/session/rename`. Blank names are rejected locally.
    pub async fn rename_session(&self, session_id: &str, new_name: &str) -> ApiResult<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(ApiError::validation("名称不能为空"));
        }
        let request = RenameRequest {
            session_id: session_id.to_string(),
            new_name: new_name.to_string(),
        };
        self.post_result("/api/session/rename", &request, "重命名失败！")
            .await
            .map(|_| ())
    }

    // ------------------------------------------------------------------
    // Personas
    // ------------------------------------------------------------------

    /// `GET /api/personas`.
    pub async fn list_personas(&self) -> ApiResult<Vec<Persona>> {
        let personas: Option<Vec<Persona>> = self.get_json("/api/personas").await?;
        Ok(personas.unwrap_or_default())
    }

    /// `GET /api/persona/:id`.
    pub async fn get_persona(&self, id: u64) -> ApiResult<Persona> {
        self.get_json(&format!("/api/persona/{id}")).await
    }

    /// `POST /api/persona`. Creates when `draft.id` is `None`, else updates.
    ///
    /// Returns the stored persona when the backend echoes it back.
    pub async fn save_persona(&self, draft: &PersonaDraft) -> ApiResult<Option<Persona>> {
        if draft.name.trim().is_empty() {
            return Err(ApiError::validation("名称不能为空"));
        }
        let response = self.post_result("/api/persona", draft, "保存失败").await?;
        Ok(response.persona)
    }

    /// `DELETE /api/persona/:id`.
    pub async fn delete_persona(&self, id: u64) -> ApiResult<()> {
        let path = format!("/api/persona/{id}");
        debug!(%path, "DELETE");
        let response = self
            .http
            .delete(self.url(&path))
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;
        let result: ResultResponse = read_json(response).await?;
        ensure_success(result, "删除失败").map(|_| ())
    }

    /// `POST /api/upload_avatar` (multipart field `avatar`). Returns the URL.
    pub async fn upload_avatar(&self, path: &Path) -> ApiResult<String> {
        let file_name = validate_avatar_path(path)?;
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ApiError::validation(format!("无法读取文件 {}: {e}", path.display()))
        })?;

        debug!(file = %file_name, size = bytes.len(), "POST /api/upload_avatar");
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("avatar", part);
        let response = self
            .http
            .post(self.url("/api/upload_avatar"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;
        let upload: UploadResponse = read_json(response).await?;
        if upload.url.is_empty() {
            return Err(ApiError::backend("上传失败"));
        }
        Ok(upload.url)
    }

    /// `POST /api/session/use_persona`.
    pub async fn use_persona(&self, session_id: &str, persona_id: u64) -> ApiResult<()> {
        if session_id.is_empty() {
            return Err(ApiError::validation("请先选择会话"));
        }
        let request = UsePersonaRequest {
            session_id: session_id.to_string(),
            persona_id,
        };
        self.post_result("/api/session/use_persona", &request, "切换人格失败")
            .await
            .map(|_| ())
    }

    // ------------------------------------------------------------------
    // Transport helpers
    // ------------------------------------------------------------------

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        debug!(path, "GET");
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;
        read_json(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(path, "POST");
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;
        read_json(response).await
    }

    async fn post_result<B>(&self, path: &str, body: &B, fallback: &str) -> ApiResult<ResultResponse>
    where
        B: Serialize + ?Sized,
    {
        let response: ResultResponse = self.post_json(path, body).await?;
        ensure_success(response, fallback)
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| classify_reqwest_error(&e))?;

    if !status.is_success() {
        warn!(status = status.as_u16(), "backend returned error status");
        return Err(ApiError::http_status(status.as_u16(), &body));
    }

    serde_json::from_str(&body)
        .map_err(|e| ApiError::parse(format!("Invalid response from backend: {e}"), &body))
}

fn ensure_success(response: ResultResponse, fallback: &str) -> ApiResult<ResultResponse> {
    if response.is_success() {
        return Ok(response);
    }
    let message = response
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(fallback)
        .to_string();
    Err(ApiError::backend(message))
}

/// Checks the avatar extension and returns the file name to upload.
///
/// # Errors
/// Returns a validation error for unsupported extensions or pathless input.
pub fn validate_avatar_path(path: &Path) -> ApiResult<String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !AVATAR_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ApiError::validation("仅支持PNG/JPG/JPEG"));
    }
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| ApiError::validation("无效的文件路径"))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_validate_avatar_path_accepts_images() {
        assert_eq!(
            validate_avatar_path(&PathBuf::from("/tmp/me.PNG")).unwrap(),
            "me.PNG"
        );
        assert!(validate_avatar_path(&PathBuf::from("face.jpeg")).is_ok());
    }

    #[test]
    fn test_validate_avatar_path_rejects_other_files() {
        let err = validate_avatar_path(&PathBuf::from("notes.txt")).unwrap_err();
        assert!(err.is_validation());
        assert!(validate_avatar_path(&PathBuf::from("noext")).is_err());
    }

    #[test]
    fn test_ensure_success_prefers_backend_message() {
        let response = ResultResponse {
            result: "fail".to_string(),
            message: Some("会话不存在".to_string()),
            ..Default::default()
        };
        let err = ensure_success(response, "删除失败！").unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Backend);
        assert_eq!(err.message, "会话不存在");

        let err = ensure_success(ResultResponse::default(), "删除失败！").unwrap_err();
        assert_eq!(err.message, "删除失败！");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:8888/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8888");
        assert_eq!(client.url("/api/sessions"), "http://localhost:8888/api/sessions");
    }
}
