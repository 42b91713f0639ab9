//! Backend calls behind each `UiEffect`.
//!
//! Nothing here touches `AppState`; the outcome travels back as a `UiEvent`.
//!
//! Handlers are async functions that take an owned `ApiClient` clone and
//! return a `UiEvent`. The runtime spawns them with `spawn_task`, which wraps
//! the result in `TaskCompleted`.
//!
//! ```ignore
//! // Handler: pure async, returns UiEvent
//! pub async fn session_list_load(client: ApiClient, follow_up: ListFollowUp) -> UiEvent { ... }
//!
//! // Runtime: spawns and sends to inbox
//! self.spawn_task(kind, task, meta, false, move |_| handler(client, follow_up));
//! ```

pub mod chat;
pub mod personas;
pub mod polling;
pub mod sessions;

pub use chat::*;
pub use personas::*;
pub use polling::*;
pub use sessions::*;
