use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// One lifecycle slot per backend operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    SessionList,
    MessageLoad,
    Send,
    SessionCreate,
    SessionRename,
    SessionTerminate,
    SessionDelete,
    PersonaList,
    PersonaSave,
    PersonaDelete,
    PersonaFetch,
    AvatarUpload,
    PersonaUse,
    RenamePoll,
}

#[derive(Debug, Clone, Default)]
pub enum TaskMeta {
    #[default]
    None,
    /// Session whose messages or rename are in flight.
    Session { session_id: String },
}

impl TaskMeta {
    pub fn session_id(&self) -> Option<&str> {
        match self {
            TaskMeta::Session { session_id } => Some(session_id),
            TaskMeta::None => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskStarted {
    pub id: TaskId,
    pub cancel: Option<CancellationToken>,
    pub meta: TaskMeta,
}

#[derive(Debug)]
pub struct TaskCompleted<E> {
    pub id: TaskId,
    pub result: E,
}

/// Task lifecycle state (stored in AppState, mutated only by reducer).
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
    pub cancel: Option<CancellationToken>,
    pub meta: TaskMeta,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Claims the slot for `id` as soon as the effect is emitted, so guards
    /// see the task before the runtime reports the start.
    pub fn reserve(&mut self, id: TaskId) {
        self.active = Some(id);
        self.cancel = None;
        self.meta = TaskMeta::None;
    }

    /// Records the start. A start for an id that was already superseded by a
    /// newer reservation is ignored.
    pub fn on_started(&mut self, started: &TaskStarted) {
        if self.active.is_some_and(|id| id != started.id) {
            return;
        }
        self.active = Some(started.id);
        self.cancel = started.cancel.clone();
        self.meta = started.meta.clone();
    }

    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.clear();
        }
        ok
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.cancel = None;
        self.meta = TaskMeta::None;
    }
}

#[derive(Debug, Default, Clone)]
pub struct Tasks {
    pub session_list: TaskState,
    pub message_load: TaskState,
    pub send: TaskState,
    pub session_create: TaskState,
    pub session_rename: TaskState,
    pub session_terminate: TaskState,
    pub session_delete: TaskState,
    pub persona_list: TaskState,
    pub persona_save: TaskState,
    pub persona_delete: TaskState,
    pub persona_fetch: TaskState,
    pub avatar_upload: TaskState,
    pub persona_use: TaskState,
    pub rename_poll: TaskState,
}

impl Tasks {
    pub fn state(&self, kind: TaskKind) -> &TaskState {
        match kind {
            TaskKind::SessionList => &self.session_list,
            TaskKind::MessageLoad => &self.message_load,
            TaskKind::Send => &self.send,
            TaskKind::SessionCreate => &self.session_create,
            TaskKind::SessionRename => &self.session_rename,
            TaskKind::SessionTerminate => &self.session_terminate,
            TaskKind::SessionDelete => &self.session_delete,
            TaskKind::PersonaList => &self.persona_list,
            TaskKind::PersonaSave => &self.persona_save,
            TaskKind::PersonaDelete => &self.persona_delete,
            TaskKind::PersonaFetch => &self.persona_fetch,
            TaskKind::AvatarUpload => &self.avatar_upload,
            TaskKind::PersonaUse => &self.persona_use,
            TaskKind::RenamePoll => &self.rename_poll,
        }
    }

    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::SessionList => &mut self.session_list,
            TaskKind::MessageLoad => &mut self.message_load,
            TaskKind::Send => &mut self.send,
            TaskKind::SessionCreate => &mut self.session_create,
            TaskKind::SessionRename => &mut self.session_rename,
            TaskKind::SessionTerminate => &mut self.session_terminate,
            TaskKind::SessionDelete => &mut self.session_delete,
            TaskKind::PersonaList => &mut self.persona_list,
            TaskKind::PersonaSave => &mut self.persona_save,
            TaskKind::PersonaDelete => &mut self.persona_delete,
            TaskKind::PersonaFetch => &mut self.persona_fetch,
            TaskKind::AvatarUpload => &mut self.avatar_upload,
            TaskKind::PersonaUse => &mut self.persona_use,
            TaskKind::RenamePoll => &mut self.rename_poll,
        }
    }

    /// True while any request is in flight. The rename poll sleeps most of
    /// its life, so it does not count.
    pub fn is_any_running(&self) -> bool {
        [
            &self.session_list,
            &self.message_load,
            &self.send,
            &self.session_create,
            &self.session_rename,
            &self.session_terminate,
            &self.session_delete,
            &self.persona_list,
            &self.persona_save,
            &self.persona_delete,
            &self.persona_fetch,
            &self.avatar_upload,
            &self.persona_use,
        ]
        .iter()
        .any(|state| state.is_running())
    }
}
