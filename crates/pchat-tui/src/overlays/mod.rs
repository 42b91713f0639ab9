//! Modal dialogs drawn over the chat screen.
//!
//! While one is open it receives every key. Each dialog keeps its own state
//! and draws itself; the reducer only sees the `OverlayUpdate` it returns.
//!
//! - `rename.rs`: session rename (Ctrl+R)
//! - `confirm.rs`: yes/no prompt for terminate and delete
//! - `persona_panel.rs`: persona list (Ctrl+P)
//! - `persona_editor.rs`: persona create/edit form with avatar upload
//! - `persona_detail.rs`: read-only persona view (Enter in the panel, Ctrl+G)
//! - `render_utils.rs`: shared drawing helpers
//!
//! Key handlers get `&mut TuiState` only to claim task slots for the
//! effects they emit; other slices change through returned mutations.

pub mod confirm;
pub mod persona_detail;
pub mod persona_editor;
pub mod persona_panel;
pub mod rename;
pub mod render_utils;

pub use confirm::{ConfirmAction, ConfirmState};
use crossterm::event::KeyEvent;
pub use persona_detail::PersonaDetailState;
pub use persona_editor::{Field, PersonaEditorState};
pub use persona_panel::PersonaPanelState;
use ratatui::Frame;
use ratatui::layout::Rect;
pub use rename::RenameState;

use crate::effects::UiEffect;
use crate::mutations::StateMutation;
use crate::state::TuiState;

/// Dialog to open next. The reducer builds its state, since most of them
/// need data from `TuiState`.
#[derive(Debug)]
pub enum OverlayRequest {
    Rename,
    Confirm(ConfirmAction),
    PersonaPanel,
    PersonaEditor { persona_id: Option<u64> },
    PersonaDetail { id: u64, from_panel: bool },
}

/// What happens to the open dialog after a key.
#[derive(Debug)]
pub enum OverlayTransition {
    Stay,
    Close,
    Open(OverlayRequest),
}

/// Result of one key inside a dialog.
#[derive(Debug)]
pub struct OverlayUpdate {
    pub transition: OverlayTransition,
    pub mutations: Vec<StateMutation>,
    pub effects: Vec<UiEffect>,
}

impl OverlayUpdate {
    fn new(transition: OverlayTransition) -> Self {
        Self {
            transition,
            mutations: Vec::new(),
            effects: Vec::new(),
        }
    }

    pub fn stay() -> Self {
        Self::new(OverlayTransition::Stay)
    }

    pub fn close() -> Self {
        Self::new(OverlayTransition::Close)
    }

    pub fn open(request: OverlayRequest) -> Self {
        Self::new(OverlayTransition::Open(request))
    }

    #[must_use]
    pub fn with_mutations(mut self, mutations: Vec<StateMutation>) -> Self {
        self.mutations = mutations;
        self
    }

    #[must_use]
    pub fn with_ui_effects(mut self, effects: Vec<UiEffect>) -> Self {
        self.effects = effects;
        self
    }
}

#[derive(Debug)]
pub enum Overlay {
    Rename(RenameState),
    Confirm(ConfirmState),
    PersonaPanel(PersonaPanelState),
    PersonaEditor(PersonaEditorState),
    PersonaDetail(PersonaDetailState),
}

impl Overlay {
    pub fn render(&self, frame: &mut Frame, area: Rect, tui: &TuiState) {
        match self {
            Overlay::Rename(r) => r.render(frame, area),
            Overlay::Confirm(c) => c.render(frame, area),
            Overlay::PersonaPanel(p) => p.render(frame, area, tui),
            Overlay::PersonaEditor(e) => e.render(frame, area, tui),
            Overlay::PersonaDetail(d) => d.render(frame, area),
        }
    }

    pub fn handle_key(&mut self, tui: &mut TuiState, key: KeyEvent) -> OverlayUpdate {
        match self {
            Overlay::Rename(r) => r.handle_key(tui, key),
            Overlay::Confirm(c) => c.handle_key(tui, key),
            Overlay::PersonaPanel(p) => p.handle_key(tui, key),
            Overlay::PersonaEditor(e) => e.handle_key(tui, key),
            Overlay::PersonaDetail(d) => d.handle_key(tui, key),
        }
    }

    /// Routes pasted text to the overlay's text field, if it has one.
    pub fn handle_paste(&mut self, text: &str) {
        match self {
            Overlay::Rename(r) => r.handle_paste(text),
            Overlay::PersonaEditor(e) => e.handle_paste(text),
            Overlay::Confirm(_) | Overlay::PersonaPanel(_) | Overlay::PersonaDetail(_) => {}
        }
    }
}

/// Dispatches a key to the active overlay. `None` when no overlay is open.
pub fn handle_overlay_key(
    tui: &mut TuiState,
    overlay: &mut Option<Overlay>,
    key: KeyEvent,
) -> Option<OverlayUpdate> {
    overlay.as_mut().map(|o| o.handle_key(tui, key))
}

/// Lets `render` draw `app.overlay` without unwrapping it.
pub trait OverlayExt {
    fn render(&self, frame: &mut Frame, area: Rect, tui: &TuiState);
}

impl OverlayExt for Option<Overlay> {
    fn render(&self, frame: &mut Frame, area: Rect, tui: &TuiState) {
        if let Some(overlay) = self {
            overlay.render(frame, area, tui);
        }
    }
}
