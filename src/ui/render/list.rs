use crate::controller::MessageItem;
use crate::option::SuggestOption;
use crate::ui::model::{DEFAULT_WIDTH, Model};
use crate::ui::render::decorate::decorate_label;
use crate::ui::render::styles::{STYLE_DESC, STYLE_MESSAGE, STYLE_SELECTED};
use crate::ui::render::util::normalize_and_pad;

const LOADING_TEXT: &str = "Loading…";

fn message_line(m: &Model, item: MessageItem) -> String {
    let text = match item {
        MessageItem::Loading => LOADING_TEXT,
        other => m.ctl.message_text(other),
    };
    STYLE_MESSAGE.render(&format!("  {text}"))
}

fn render_option_line(m: &Model, o: &SuggestOption, highlighted: bool) -> String {
    let marker = if highlighted { "▸ " } else { "  " };
    // template output wins once its slot has been rendered
    let body = match m.custom_items.get(o.opt_id).and_then(|s| s.as_deref()) {
        Some(markup) => markup.to_string(),
        None => decorate_label(
            m.ctl.input_value(),
            o,
            m.ctl.config.disable_search_highlighting,
        ),
    };
    let mut line = format!("{marker}{body}");
    if m.ctl.default_option().is_some_and(|d| d.key == o.key) {
        line.push_str(&STYLE_DESC.render("  (default)"));
    }
    if highlighted {
        STYLE_SELECTED.render(&line)
    } else {
        line
    }
}

/// Dropdown rows currently on screen; empty while closed.
pub fn render_dropdown(m: &Model) -> Vec<String> {
    if !m.ctl.is_opened() {
        return Vec::new();
    }
    if let Some(item) = m.ctl.message_item() {
        return vec![message_line(m, item)];
    }
    let display = m.ctl.display_list();
    let rows = if m.per_page == 0 {
        display.len()
    } else {
        m.per_page
    };
    let highlighted = m.ctl.highlighted_index();
    display
        .iter()
        .enumerate()
        .skip(m.scroll)
        .take(rows)
        .map(|(i, o)| render_option_line(m, o, highlighted == Some(i)))
        .collect()
}

pub fn render_main_content(m: &Model) -> String {
    let total_width = if m.screen_width > 0 {
        m.screen_width
    } else {
        DEFAULT_WIDTH
    };
    let lines = m.render_dropdown();
    let per = if m.per_page == 0 {
        lines.len()
    } else {
        m.per_page
    };
    // Ensure we return exactly `per` lines each normalized to the terminal width.
    normalize_and_pad(lines, total_width, per)
}

#[cfg(test)]
mod tests {
    use crate::config::SuggestConfig;
    use crate::option::SuggestOption;
    use crate::ui::Msg;
    use crate::ui::model::{Launch, Model, initial_model};
    use regex::Regex;

    fn strip_ansi(s: &str) -> String {
        let re = Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").unwrap();
        re.replace_all(s, "").to_string()
    }

    fn plain(lines: Vec<String>) -> Vec<String> {
        lines.iter().map(|l| strip_ansi(l)).collect()
    }

    fn model(launch: Launch) -> Model {
        let mut m = initial_model(launch);
        m.update(Msg::WindowSize {
            width: 50,
            height: 8,
        });
        m
    }

    fn colours() -> Vec<SuggestOption> {
        ["Red", "Green", "Blue", "Black", "White", "Grey"]
            .iter()
            .map(|s| SuggestOption::new(s.to_lowercase(), *s))
            .collect()
    }

    #[test]
    fn closed_dropdown_renders_nothing() {
        let m = model(Launch {
            options: colours(),
            ..Default::default()
        });
        assert!(m.render_dropdown().is_empty());
        let main = strip_ansi(&m.render_main_content());
        assert_eq!(main.lines().count(), m.per_page);
        assert!(main.trim().is_empty());
    }

    #[test]
    fn rows_show_marker_and_default_tag() {
        let mut m = model(Launch {
            options: colours(),
            default_key: Some("grey".to_string()),
            ..Default::default()
        });
        m.update(Msg::KeyDown);
        let rows = plain(m.render_dropdown());
        assert_eq!(rows.len(), m.per_page);
        assert_eq!(rows[0], "▸ Grey  (default)");
        assert_eq!(rows[1], "  Red");
    }

    #[test]
    fn filtered_rows_keep_label_text() {
        let mut m = model(Launch {
            options: colours(),
            ..Default::default()
        });
        m.update(Msg::Rune('b'));
        m.update(Msg::Rune('l'));
        assert_eq!(plain(m.render_dropdown()), vec!["  Blue", "  Black"]);
    }

    #[test]
    fn message_rows_replace_options() {
        let mut m = model(Launch {
            options: colours(),
            ..Default::default()
        });
        m.update(Msg::Rune('q'));
        assert_eq!(plain(m.render_dropdown()), vec!["  No results"]);

        let mut m = model(Launch {
            options: colours(),
            config: SuggestConfig {
                lazy: true,
                minimum_input_length_to_perform_lazy_query: 2,
                input_length_below_minimum_message: "more please".to_string(),
                ..Default::default()
            },
            ..Default::default()
        });
        m.update(Msg::Rune('g'));
        assert_eq!(plain(m.render_dropdown()), vec!["  more please"]);
        m.update(Msg::Rune('r'));
        assert_eq!(plain(m.render_dropdown()), vec!["  Loading…"]);
        m.update(Msg::LazyQuery("gr".to_string()));
        assert_eq!(plain(m.render_dropdown()), vec!["  Green", "  Grey"]);
    }

    #[test]
    fn window_follows_scroll() {
        let mut m = model(Launch {
            options: colours(),
            ..Default::default()
        });
        for _ in 0..6 {
            m.update(Msg::KeyDown);
        }
        let rows = plain(m.render_dropdown());
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], "  Blue");
        assert_eq!(rows[3], "▸ Grey");
    }

    #[test]
    fn template_markup_replaces_label() {
        let mut m = model(Launch {
            options: colours(),
            template: Some("{label}:{key}".to_string()),
            ..Default::default()
        });
        m.update(Msg::Rune('w'));
        // slots are not mounted on the opening frame
        assert_eq!(plain(m.render_dropdown()), vec!["  White"]);
        let retry = m.pending_retry.take().unwrap();
        m.update(Msg::TemplateRetry(retry.token));
        assert_eq!(plain(m.render_dropdown()), vec!["  White:white"]);
    }
}
