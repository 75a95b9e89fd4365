use crate::filter::highlight_parts;
use crate::option::SuggestOption;
use crate::ui::render::styles::{STYLE_LABEL, STYLE_MATCH};

/// Render `option`'s label with the typed input emphasised.
///
/// Falls back to the plain label when there is nothing to split (empty input
/// or blank label).
pub fn decorate_label(input: &str, option: &SuggestOption, disable_highlighting: bool) -> String {
    let parts = highlight_parts(input, option, disable_highlighting);
    if parts.is_empty() {
        return STYLE_LABEL.render(&option.label);
    }
    let mut out = String::with_capacity(option.label.len());
    for (text, emphasised) in [
        (parts.prefix, false),
        (parts.matched, true),
        (parts.suffix, false),
    ] {
        match text {
            Some(t) if !t.is_empty() => {
                let style = if emphasised { &STYLE_MATCH } else { &STYLE_LABEL };
                out.push_str(&style.render(&t));
            }
            _ => {}
        }
    }
    out
}
