// UI module root: the terminal host for the suggestion controller, split into
// focused submodules under `ui/`

pub mod model;
pub mod render;
pub mod run;
pub mod update;

pub use model::{CatalogProvider, Launch, Model, initial_model};
pub use render::{render_dropdown, render_field_block, render_full, render_modeline_padded};
pub use run::{Outcome, run};
pub use update::handle_update;

use crate::template::RetryToken;

// Messages used by the update logic
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Msg {
    WindowSize { width: usize, height: usize },
    KeyBackspace,
    KeyEnter,
    KeyEsc,
    KeyTab,
    KeySpace,
    KeyUp,
    KeyDown,
    Rune(char),
    // Ctrl-U
    ClearInput,
    // focus leaves the widget (Ctrl-O)
    FocusOut,
    // mouse click on the field
    Click,
    LazyQuery(String),
    TemplateRetry(RetryToken),
}
