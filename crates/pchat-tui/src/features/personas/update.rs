//! Persona feature reducer.
//!
//! Results land in whichever persona overlay is open: editor failures show
//! inside the editor, panel failures inside the panel, and anything else in
//! the status line.

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::events::PersonaUiEvent;
use crate::mutations::{StateMutation, StatusMutation, failure_text};
use crate::overlays::{Field, Overlay, PersonaPanelState};
use crate::sessions::{self, ListFollowUp};
use crate::state::TuiState;

/// Reloads the persona list unless a reload is already in flight.
pub fn reload(tui: &mut TuiState) -> Option<UiEffect> {
    if tui.tasks.persona_list.is_running() {
        return None;
    }
    Some(UiEffect::LoadPersonas {
        task: tui.reserve_task(TaskKind::PersonaList),
    })
}

/// Shows `text` in the open panel, else in the status line.
fn panel_error(overlay: &mut Option<Overlay>, text: String) -> Vec<StateMutation> {
    if let Some(Overlay::PersonaPanel(panel)) = overlay {
        panel.error = Some(text);
        vec![]
    } else {
        vec![StateMutation::Status(StatusMutation::Error(text))]
    }
}

/// Shows `text` in the open editor, else in the status line.
fn editor_error(overlay: &mut Option<Overlay>, text: String) -> Vec<StateMutation> {
    if let Some(Overlay::PersonaEditor(editor)) = overlay {
        editor.error = Some(text);
        vec![]
    } else {
        vec![StateMutation::Status(StatusMutation::Error(text))]
    }
}

pub fn handle_persona_event(
    tui: &mut TuiState,
    overlay: &mut Option<Overlay>,
    event: PersonaUiEvent,
) -> (Vec<UiEffect>, Vec<StateMutation>) {
    match event {
        PersonaUiEvent::ListLoaded { personas } => {
            tui.personas.replace(personas);
            if let Some(Overlay::PersonaPanel(panel)) = overlay {
                panel.clamp(tui.personas.len());
            }
            (vec![], vec![])
        }
        PersonaUiEvent::ListFailed { error } => {
            tui.personas.loaded = true;
            (vec![], panel_error(overlay, failure_text("加载人格失败:", &error)))
        }
        PersonaUiEvent::Saved { persona } => {
            if let Some(persona) = persona {
                tui.personas.upsert(persona);
            }
            if matches!(overlay, Some(Overlay::PersonaEditor(_))) {
                *overlay = Some(Overlay::PersonaPanel(PersonaPanelState::default()));
            }
            (
                reload(tui).into_iter().collect(),
                vec![StateMutation::Status(StatusMutation::Info(
                    "人格已保存".to_string(),
                ))],
            )
        }
        PersonaUiEvent::SaveFailed { error } => {
            (vec![], editor_error(overlay, failure_text("保存失败", &error)))
        }
        PersonaUiEvent::Deleted { id } => {
            tui.personas.remove(id);
            if let Some(Overlay::PersonaPanel(panel)) = overlay {
                panel.clamp(tui.personas.len());
            }
            (
                reload(tui).into_iter().collect(),
                vec![StateMutation::Status(StatusMutation::Info(
                    "人格已删除".to_string(),
                ))],
            )
        }
        PersonaUiEvent::DeleteFailed { error } => {
            (vec![], panel_error(overlay, failure_text("删除失败", &error)))
        }
        PersonaUiEvent::Fetched { persona } => {
            if let Some(Overlay::PersonaDetail(detail)) = overlay
                && detail.id == persona.id
            {
                detail.persona = Some(persona.clone());
                detail.error = None;
            }
            tui.personas.upsert(persona);
            (vec![], vec![])
        }
        PersonaUiEvent::FetchFailed { id, error } => {
            if let Some(Overlay::PersonaDetail(detail)) = overlay
                && detail.id == id
            {
                detail.error = Some(failure_text("加载人格失败:", &error));
                return (vec![], vec![]);
            }
            (
                vec![],
                vec![StateMutation::Status(StatusMutation::failure(
                    "加载人格失败:",
                    &error,
                ))],
            )
        }
        PersonaUiEvent::AvatarUploaded { url } => {
            if let Some(Overlay::PersonaEditor(editor)) = overlay {
                editor.set_field(Field::Avatar, &url);
                editor.error = None;
            }
            (
                vec![],
                vec![StateMutation::Status(StatusMutation::Info(
                    "头像已上传".to_string(),
                ))],
            )
        }
        PersonaUiEvent::UploadFailed { error } => {
            (vec![], editor_error(overlay, failure_text("上传失败", &error)))
        }
        PersonaUiEvent::Applied { session_id } => {
            if matches!(overlay, Some(Overlay::PersonaPanel(_))) {
                *overlay = None;
            }
            let follow_up = if tui.sessions.is_current(&session_id) {
                ListFollowUp::ReloadMessages
            } else {
                ListFollowUp::Keep
            };
            (
                vec![sessions::reload(tui, follow_up)],
                vec![StateMutation::Status(StatusMutation::Info(
                    "已切换人格".to_string(),
                ))],
            )
        }
        PersonaUiEvent::ApplyFailed { error } => {
            (vec![], panel_error(overlay, failure_text("切换人格失败", &error)))
        }
    }
}
