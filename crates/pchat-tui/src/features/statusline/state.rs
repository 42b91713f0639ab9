//! Status line state types.

use std::time::{Duration, Instant};

use pchat_types::Usage;

use crate::mutations::StatusMutation;

/// How long a notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
    pub expires_at: Instant,
}

#[derive(Debug, Default)]
pub struct StatusLineState {
    pub notice: Option<Notice>,
    /// `elapsedTime` of the last reply, as sent by the backend.
    pub last_elapsed: Option<String>,
    pub last_usage: Option<Usage>,
}

impl StatusLineState {
    pub fn notify(&mut self, text: impl Into<String>, level: NoticeLevel) {
        self.notice = Some(Notice {
            text: text.into(),
            level,
            expires_at: Instant::now() + NOTICE_TTL,
        });
    }

    /// Drops the notice once it has expired. Returns true if one was dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        if self.notice.as_ref().is_some_and(|n| n.expires_at <= now) {
            self.notice = None;
            return true;
        }
        false
    }

    pub fn notice_text(&self) -> Option<&str> {
        self.notice.as_ref().map(|n| n.text.as_str())
    }

    pub fn apply(&mut self, mutation: StatusMutation) {
        match mutation {
            StatusMutation::Info(text) => self.notify(text, NoticeLevel::Info),
            StatusMutation::Error(text) => self.notify(text, NoticeLevel::Error),
            StatusMutation::ReplyStats { elapsed, usage } => {
                self.last_elapsed = (!elapsed.is_empty()).then_some(elapsed);
                self.last_usage = usage;
            }
            StatusMutation::ClearStats => {
                self.last_elapsed = None;
                self.last_usage = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_expires() {
        let mut status = StatusLineState::default();
        status.notify("删除失败！", NoticeLevel::Error);
        assert!(!status.expire(Instant::now()));
        assert_eq!(status.notice_text(), Some("删除失败！"));

        assert!(status.expire(Instant::now() + NOTICE_TTL + Duration::from_millis(1)));
        assert_eq!(status.notice_text(), None);
    }

    #[test]
    fn test_reply_stats() {
        let mut status = StatusLineState::default();
        status.apply(StatusMutation::ReplyStats {
            elapsed: "1.2s".to_string(),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
        });
        assert_eq!(status.last_elapsed.as_deref(), Some("1.2s"));
        assert_eq!(status.last_usage.map(|u| u.total_tokens), Some(15));

        status.apply(StatusMutation::ClearStats);
        assert!(status.last_usage.is_none());
    }
}
