//! Transcript feature: message cells, Markdown and code rendering, scroll.

mod cell;
mod highlight;
pub mod markdown;
mod render;
mod state;
mod style;
mod wrap;

pub use cell::{CellId, END_BANNER, HistoryCell, THINKING_MARKER, THINKING_TEXT};
pub use render::{SPINNER_SPEED_DIVISOR, convert_style, render_transcript};
pub use state::{ScrollMode, ScrollState, TranscriptState};
pub use style::{Rgb, Style, StyledLine, StyledSpan};
pub use wrap::{WrapCache, WrapOptions, wrap_spans};
