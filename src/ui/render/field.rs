use crate::ui::model::{DEFAULT_WIDTH, FIELD_BLOCK_LINES, Model};
use crate::ui::render::styles::{STYLE_FIELD, STYLE_FIELD_BOX, STYLE_PLACEHOLDER};
use crate::ui::render::util::fit_lines;

const PLACEHOLDER: &str = "type to search";

pub fn render_field_line(m: &Model) -> String {
    let text = m.ctl.field_text();
    let cursor = if m.ctl.is_focused() { "▏" } else { "" };
    if text.is_empty() {
        format!("> {cursor}{}", STYLE_PLACEHOLDER.render(PLACEHOLDER))
    } else {
        format!("> {}{cursor}", STYLE_FIELD.render(text))
    }
}

pub fn render_field_block(m: &Model) -> Vec<String> {
    let box_width = if m.screen_width >= 2 {
        m.screen_width - 2
    } else {
        DEFAULT_WIDTH
    };
    let w_i32: i32 = box_width.try_into().unwrap_or(i32::MAX);
    let block = STYLE_FIELD_BOX
        .clone()
        .width(w_i32)
        .render(&render_field_line(m));
    fit_lines(&block, FIELD_BLOCK_LINES)
}
