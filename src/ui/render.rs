// Render module split into focused submodules: the input field, the dropdown
// list and the modeline.

pub mod decorate;
pub mod field;
pub mod full;
pub mod list;
pub mod modeline;
pub mod styles;
pub mod util;

pub use decorate::decorate_label;
pub use field::render_field_block;
pub use full::render_full;
pub use list::{render_dropdown, render_main_content};
pub use modeline::{render_modeline, render_modeline_padded};
