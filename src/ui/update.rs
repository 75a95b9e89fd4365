use crate::controller::{Key, Notice};
use crate::option::LazyProvider;
use crate::template::RetryToken;
use crate::ui::Msg;
use crate::ui::model::Model;
use bubbletea_widgets::Viewport;
use tracing::debug;

pub fn handle_update(m: &mut Model, msg: Msg) {
    match msg {
        Msg::WindowSize { width, height } => handle_window_size(m, width, height),
        Msg::KeyBackspace => handle_key_backspace(m),
        Msg::KeyEnter => handle_key_enter(m),
        Msg::KeySpace => handle_key_space(m),
        Msg::KeyEsc => handle_key(m, Key::Escape),
        Msg::KeyTab => handle_key(m, Key::Tab),
        Msg::KeyDown => handle_key(m, Key::ArrowDown),
        Msg::KeyUp => handle_key(m, Key::ArrowUp),
        Msg::Rune(r) => handle_rune(m, r),
        Msg::ClearInput => {
            let notices = m.ctl.clear(false);
            absorb(m, notices);
        }
        Msg::FocusOut => {
            m.ctl.blur();
            let notices = m.ctl.outside_interaction();
            absorb(m, notices);
        }
        Msg::Click => {
            m.ctl.focus();
            m.ctl.click();
        }
        Msg::LazyQuery(q) => handle_lazy_query(m, &q),
        Msg::TemplateRetry(token) => handle_template_retry(m, token),
    }
    sync_view(m);
}

fn handle_window_size(m: &mut Model, width: usize, height: usize) {
    m.screen_width = width;
    m.per_page = height.saturating_sub(crate::ui::model::RESERVED_LINES);
    m.vp = Viewport::new(m.per_page, m.screen_width);
}

fn edit_field(m: &mut Model, text: String) {
    if !m.ctl.is_focused() {
        m.ctl.focus();
    }
    let notices = m.ctl.set_input_value(&text);
    absorb(m, notices);
}

fn handle_rune(m: &mut Model, r: char) {
    let mut text = m.ctl.field_text().to_string();
    text.push(r);
    edit_field(m, text);
}

fn handle_key_backspace(m: &mut Model) {
    let mut text = m.ctl.field_text().to_string();
    if text.pop().is_none() {
        return;
    }
    edit_field(m, text);
}

fn handle_key(m: &mut Model, key: Key) {
    let out = m.ctl.on_key_down(key);
    absorb(m, out.notices);
}

fn handle_key_space(m: &mut Model) {
    let out = m.ctl.on_key_down(Key::Space);
    let typed = !out.prevent_default;
    absorb(m, out.notices);
    if typed {
        handle_rune(m, ' ');
    }
}

fn handle_key_enter(m: &mut Model) {
    let out = m.ctl.on_key_down(Key::Enter);
    for n in &out.notices {
        match n {
            Notice::ValueApplied { value, .. } => {
                m.exit_value = Some(value.clone().unwrap_or_default());
            }
            Notice::CustomValueSubmit { value, .. } => {
                m.exit_value = Some(format!("custom:{value}"));
            }
            Notice::InputValueChanged { .. } => {}
        }
    }
    absorb(m, out.notices);
}

fn handle_lazy_query(m: &mut Model, query: &str) {
    // a newer keystroke already superseded this query
    if query != m.ctl.input_value() {
        return;
    }
    if let Some(p) = m.provider.as_mut() {
        let options = p.refresh(query);
        debug!(query, found = options.len(), "lazy options arrived");
        m.ctl.set_options(options);
    }
}

// sync_view reruns the pass; this only filters out retries that no longer apply
fn handle_template_retry(m: &mut Model, token: RetryToken) {
    if !m.ctl.retry_due(token) {
        debug!(attempt = token.attempt, "stale template retry ignored");
    }
}

// Route controller notifications to the host side of the terminal UI.
fn absorb(m: &mut Model, notices: Vec<Notice>) {
    for n in notices {
        debug!(notice = ?n, "controller notice");
        match n {
            Notice::InputValueChanged { value } => {
                if m.ctl.is_loading() && m.provider.is_some() {
                    m.pending_query = Some(value);
                }
            }
            Notice::ValueApplied { label, value } => {
                m.status = match value {
                    Some(v) if !v.is_empty() => format!("{label} ({v})"),
                    _ => "cleared".to_string(),
                };
            }
            Notice::CustomValueSubmit {
                value,
                number_of_available_options,
            } => {
                m.status = format!("custom {value} of {number_of_available_options}");
            }
        }
    }
}

fn scroll_to_highlight(m: &mut Model) {
    let len = m.ctl.display_list().len();
    if m.scroll >= len {
        m.scroll = 0;
    }
    let rows = m.per_page;
    if rows == 0 {
        return;
    }
    if let Some(h) = m.ctl.highlighted_index() {
        if h < m.scroll {
            m.scroll = h;
        } else if h >= m.scroll + rows {
            m.scroll = h + 1 - rows;
        }
    }
}

// Item slots exist once the dropdown has been laid out, which is never the
// case on the frame that opens it.
fn run_template_pass(m: &mut Model) {
    let just_opened = m.ctl.take_overlay_request();
    let mounted = if just_opened {
        0
    } else {
        m.ctl.display_list().len()
    };
    match m.ctl.render_custom_items(mounted) {
        Some(pass) => {
            m.custom_items = vec![None; m.ctl.display_list().len()];
            for (id, markup) in pass.rendered {
                if let Some(slot) = m.custom_items.get_mut(id) {
                    *slot = Some(markup);
                }
            }
            m.pending_retry = pass.retry;
        }
        None => {
            m.custom_items.clear();
            m.pending_retry = None;
        }
    }
}

fn sync_view(m: &mut Model) {
    scroll_to_highlight(m);
    run_template_pass(m);
    let content = m.render_dropdown().join("\n");
    m.vp.set_content(&content);
    if m.ctl.highlighted_index().is_none() {
        m.vp.goto_top();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuggestConfig;
    use crate::option::SuggestOption;
    use crate::ui::model::{Launch, initial_model};

    fn fruit() -> Vec<SuggestOption> {
        ["Apple", "Apricot", "Banana", "Blueberry", "Cherry"]
            .iter()
            .map(|s| SuggestOption::new(s.to_lowercase(), *s))
            .collect()
    }

    fn model_with(config: SuggestConfig) -> Model {
        let mut m = initial_model(Launch {
            options: fruit(),
            config,
            ..Default::default()
        });
        m.update(Msg::WindowSize {
            width: 60,
            height: 10,
        });
        m
    }

    fn model() -> Model {
        model_with(SuggestConfig::default())
    }

    fn type_str(m: &mut Model, s: &str) {
        for c in s.chars() {
            if c == ' ' {
                m.update(Msg::KeySpace);
            } else {
                m.update(Msg::Rune(c));
            }
        }
    }

    #[test]
    fn window_size_reserves_field_and_modeline() {
        let m = model();
        assert_eq!(m.per_page, 10 - crate::ui::model::RESERVED_LINES);
        assert_eq!(m.screen_width, 60);
    }

    #[test]
    fn typing_filters_and_backspace_widens() {
        let mut m = model();
        type_str(&mut m, "ap");
        assert!(m.ctl.is_opened());
        assert_eq!(m.ctl.display_list().len(), 2);
        m.update(Msg::KeyBackspace);
        assert_eq!(m.ctl.input_value(), "a");
        m.update(Msg::KeyBackspace);
        assert!(!m.ctl.is_opened());
        // nothing left to delete
        m.update(Msg::KeyBackspace);
        assert_eq!(m.ctl.field_text(), "");
    }

    #[test]
    fn enter_on_single_match_sets_exit_value() {
        let mut m = model();
        type_str(&mut m, "ch");
        m.update(Msg::KeyEnter);
        assert_eq!(m.exit_value.as_deref(), Some("cherry"));
        assert_eq!(m.status, "Cherry (cherry)");
    }

    #[test]
    fn enter_on_free_text_exits_with_custom_value() {
        let mut m = model();
        type_str(&mut m, "b");
        m.update(Msg::KeyEnter);
        assert_eq!(m.exit_value.as_deref(), Some("custom:b"));
    }

    #[test]
    fn arrows_then_enter_apply_highlighted() {
        let mut m = model();
        m.update(Msg::KeyDown);
        m.update(Msg::KeyDown);
        m.update(Msg::KeyEnter);
        assert_eq!(m.exit_value.as_deref(), Some("apricot"));
    }

    #[test]
    fn space_types_unless_an_option_is_highlighted() {
        let mut m = model();
        type_str(&mut m, "b ");
        assert_eq!(m.ctl.field_text(), "b ");
        assert_eq!(m.ctl.input_value(), "b");
        m.update(Msg::KeyDown);
        m.update(Msg::KeySpace);
        assert_eq!(m.ctl.selected_value(), Some("banana"));
        assert!(m.exit_value.is_none());
    }

    #[test]
    fn escape_commits_previous_value_and_closes() {
        let mut m = model();
        type_str(&mut m, "ch");
        m.update(Msg::KeyEnter);
        type_str(&mut m, "zz");
        m.update(Msg::KeyEsc);
        assert!(!m.ctl.is_opened());
        assert_eq!(m.ctl.field_text(), "Cherry");
    }

    #[test]
    fn focus_out_commits_only_unfocused_open_dropdown() {
        let mut m = model();
        m.update(Msg::FocusOut);
        assert_eq!(m.ctl.field_text(), "");
        type_str(&mut m, "ap");
        m.update(Msg::FocusOut);
        assert!(!m.ctl.is_opened());
        assert_eq!(m.status, "cleared");
    }

    #[test]
    fn click_opens_when_configured() {
        let mut m = model();
        m.update(Msg::Click);
        assert!(!m.ctl.is_opened());
        let mut m = model_with(SuggestConfig {
            open_dropdown_on_click: true,
            ..Default::default()
        });
        m.update(Msg::Click);
        assert!(m.ctl.is_opened());
    }

    #[test]
    fn clear_input_resets_field() {
        let mut m = model();
        type_str(&mut m, "ban");
        m.update(Msg::ClearInput);
        assert_eq!(m.ctl.field_text(), "");
        assert!(!m.ctl.is_opened());
    }

    #[test]
    fn lazy_queries_are_queued_and_answered() {
        let mut m = model_with(SuggestConfig {
            lazy: true,
            ..Default::default()
        });
        type_str(&mut m, "b");
        assert!(m.ctl.is_loading());
        assert_eq!(m.pending_query.as_deref(), Some("b"));
        // a stale answer is dropped
        m.update(Msg::LazyQuery("x".to_string()));
        assert!(m.ctl.is_loading());
        m.update(Msg::LazyQuery("b".to_string()));
        assert!(!m.ctl.is_loading());
        assert_eq!(m.ctl.display_list().len(), 2);
    }

    #[test]
    fn highlight_scrolls_dropdown() {
        let mut m = model();
        m.update(Msg::WindowSize {
            width: 60,
            height: 6,
        });
        assert_eq!(m.per_page, 2);
        for _ in 0..4 {
            m.update(Msg::KeyDown);
        }
        assert_eq!(m.ctl.highlighted_index(), Some(3));
        assert_eq!(m.scroll, 2);
        m.update(Msg::KeyDown);
        m.update(Msg::KeyDown);
        assert_eq!(m.ctl.highlighted_index(), Some(0));
        assert_eq!(m.scroll, 0);
    }

    #[test]
    fn template_pass_retries_after_opening() {
        let mut m = initial_model(Launch {
            options: fruit(),
            template: Some("<{label}>".to_string()),
            ..Default::default()
        });
        m.update(Msg::WindowSize {
            width: 60,
            height: 10,
        });
        type_str(&mut m, "a");
        // the opening frame has no slots yet
        assert!(m.custom_items.iter().all(Option::is_none));
        let retry = m.pending_retry.take().expect("retry scheduled");
        m.update(Msg::TemplateRetry(retry.token));
        assert_eq!(m.custom_items.len(), 2);
        assert_eq!(m.custom_items[0].as_deref(), Some("<Apple>"));
        assert!(m.pending_retry.is_none());

        m.update(Msg::KeyEsc);
        assert!(m.custom_items.is_empty());
    }
}
