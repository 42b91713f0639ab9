//! Session store: the cached list plus the current session id.

use pchat_types::Session;

/// What the reducer does with the current session after a list reload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListFollowUp {
    /// Keep the current session if it still exists, else take the first.
    #[default]
    Keep,
    /// Switch to this session (after create and rename).
    SwitchTo(String),
    /// Switch to the first session (after delete).
    First,
    /// Keep the current session and reload its messages.
    ReloadMessages,
}

impl ListFollowUp {
    /// Folds a later reload's follow-up into this one. A later `Keep` never
    /// cancels an earlier switch, and a message reload is implied by any
    /// switch.
    #[must_use]
    pub fn merge(self, newer: ListFollowUp) -> ListFollowUp {
        match (self, newer) {
            (older, ListFollowUp::Keep) => older,
            (older @ (ListFollowUp::SwitchTo(_) | ListFollowUp::First), ListFollowUp::ReloadMessages) => {
                older
            }
            (_, newer) => newer,
        }
    }
}

#[derive(Debug, Default)]
pub struct SessionsState {
    sessions: Vec<Session>,
    current: Option<String>,
    /// Follow-ups of reloads whose results have not landed yet. Only the
    /// newest reload's result is applied, so it carries all of them.
    pending: ListFollowUp,
}

impl SessionsState {
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current(&self) -> Option<&Session> {
        let id = self.current.as_deref()?;
        self.find(id)
    }

    pub fn find(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    pub fn is_current(&self, id: &str) -> bool {
        self.current.as_deref() == Some(id)
    }

    /// Replaces the cached list wholesale. The current id is left alone.
    pub fn replace(&mut self, sessions: Vec<Session>) {
        self.sessions = sessions;
    }

    /// Makes `id` current. Returns false when it is not in the list.
    pub fn select(&mut self, id: &str) -> bool {
        if self.find(id).is_none() {
            return false;
        }
        self.current = Some(id.to_string());
        true
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }

    /// Session `step` rows away from the current one, clamped to the list.
    pub fn neighbor(&self, step: isize) -> Option<&Session> {
        if self.sessions.is_empty() {
            return None;
        }
        let index = self
            .current
            .as_deref()
            .and_then(|id| self.sessions.iter().position(|s| s.id == id))
            .unwrap_or(0);
        let last = self.sessions.len() - 1;
        let target = index.saturating_add_signed(step).min(last);
        self.sessions.get(target)
    }

    pub fn queue_follow_up(&mut self, follow_up: ListFollowUp) {
        self.pending = std::mem::take(&mut self.pending).merge(follow_up);
    }

    /// Drains the queued follow-ups, folding in the one a result carried.
    pub fn take_follow_up(&mut self, carried: ListFollowUp) -> ListFollowUp {
        std::mem::take(&mut self.pending).merge(carried)
    }

    /// Session that should be current after a reload with `follow_up`.
    ///
    /// `None` only when the list is empty.
    pub fn resolve(&self, follow_up: &ListFollowUp) -> Option<&Session> {
        let first = self.sessions.first();
        match follow_up {
            ListFollowUp::First => first,
            ListFollowUp::SwitchTo(id) => self.find(id).or_else(|| self.current()).or(first),
            ListFollowUp::Keep | ListFollowUp::ReloadMessages => self.current().or(first),
        }
    }
}
