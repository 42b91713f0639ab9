//! Shared leaf types for TUI features.
//!
//! Contains types with no feature dependencies (tasks, text helpers, the
//! scrollbar widget). These types are shared across all feature modules.
//!
//! IMPORTANT: This module must NOT import UiEvent or feature-specific state
//! to avoid circular dependencies.

pub mod scrollbar;
pub mod task;
pub mod text;

pub use scrollbar::Scrollbar;
pub use task::{TaskCompleted, TaskId, TaskKind, TaskMeta, TaskSeq, TaskStarted, Tasks};
pub use text::{sanitize_for_display, truncate_with_ellipsis};
