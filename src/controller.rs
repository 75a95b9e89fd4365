//! The suggestion state machine.
//!
//! `SuggestController` owns the input text, open/closed state, highlight and
//! loading flag. Every public transition returns the notifications the host
//! should dispatch, in the order they were raised.

use crate::config::SuggestConfig;
use crate::filter::{Sources, compute_display_list};
use crate::option::SuggestOption;
use crate::template::{ItemTemplate, RetryState, RetryToken, ScheduledRetry, TemplatePass};
use tracing::{debug, trace, warn};

/// Outbound notifications observed by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    InputValueChanged {
        value: String,
    },
    ValueApplied {
        label: String,
        value: Option<String>,
    },
    /// Enter on free text that matched no single option. Selection is untouched.
    CustomValueSubmit {
        value: String,
        number_of_available_options: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Keys the controller reacts to; everything else is `Other`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Tab,
    Escape,
    Space,
    Other,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    /// The host must suppress the key's default action (scrolling, focus
    /// traversal, inserting a space).
    pub prevent_default: bool,
    pub notices: Vec<Notice>,
}

/// Disabled row shown instead of the options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageItem {
    Loading,
    NoResults,
    InputLengthBelowMinimum,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Closed,
    OpenedEmptyInput,
    OpenedWithResults,
    OpenedLoading,
}

#[derive(Clone, Debug, Default)]
pub struct SuggestController {
    pub config: SuggestConfig,
    options: Vec<SuggestOption>,
    options_for_null_input: Vec<SuggestOption>,
    default_option: Option<SuggestOption>,
    template: Option<ItemTemplate>,

    input_value: String,
    // untrimmed text shown in the field
    field_text: String,
    opened: bool,
    loading: bool,
    focused: bool,
    // None whenever the logical selection is the default option
    selected_value: Option<String>,
    highlighted: Option<usize>,
    saved_value: Option<String>,

    display: Vec<SuggestOption>,
    retry: RetryState,
    overlay_pending: bool,
    outbox: Vec<Notice>,
}

impl SuggestController {
    pub fn new(config: SuggestConfig) -> Self {
        let mut c = SuggestController {
            config,
            ..Default::default()
        };
        c.recompute();
        c
    }

    pub fn with_options(mut self, options: Vec<SuggestOption>) -> Self {
        self.options = options;
        self.recompute();
        self
    }

    // --- read access -----------------------------------------------------

    pub fn input_value(&self) -> &str {
        &self.input_value
    }

    pub fn field_text(&self) -> &str {
        &self.field_text
    }

    pub fn is_opened(&self) -> bool {
        self.opened
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.selected_value.as_deref()
    }

    pub fn highlighted_index(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn saved_value(&self) -> Option<&str> {
        self.saved_value.as_deref()
    }

    pub fn display_list(&self) -> &[SuggestOption] {
        &self.display
    }

    pub fn options(&self) -> &[SuggestOption] {
        &self.options
    }

    pub fn options_for_null_input(&self) -> &[SuggestOption] {
        &self.options_for_null_input
    }

    pub fn default_option(&self) -> Option<&SuggestOption> {
        self.default_option.as_ref()
    }

    pub fn has_default_option(&self) -> bool {
        self.default_option.is_some()
    }

    pub fn has_template(&self) -> bool {
        self.template.is_some()
    }

    fn default_key(&self) -> Option<&str> {
        self.default_option.as_ref().map(|o| o.key.as_str())
    }

    pub fn phase(&self) -> Phase {
        if !self.opened {
            Phase::Closed
        } else if self.loading {
            Phase::OpenedLoading
        } else if self.input_value.is_empty() {
            Phase::OpenedEmptyInput
        } else {
            Phase::OpenedWithResults
        }
    }

    pub fn message_item(&self) -> Option<MessageItem> {
        if self.loading {
            return Some(MessageItem::Loading);
        }
        if !self.display.is_empty() {
            return None;
        }
        match self.config.lazy_minimum() {
            Some(min) if self.input_value.chars().count() < min => {
                Some(MessageItem::InputLengthBelowMinimum)
            }
            _ => Some(MessageItem::NoResults),
        }
    }

    pub fn message_text(&self, item: MessageItem) -> &str {
        match item {
            MessageItem::Loading => "",
            MessageItem::NoResults => &self.config.no_results_message,
            MessageItem::InputLengthBelowMinimum => &self.config.input_length_below_minimum_message,
        }
    }

    // message rows are disabled, so only real options can be highlighted
    fn navigable_count(&self) -> usize {
        if self.message_item().is_some() {
            0
        } else {
            self.display.len()
        }
    }

    pub fn highlighted_option(&self) -> Option<&SuggestOption> {
        if self.navigable_count() == 0 {
            return None;
        }
        self.highlighted.and_then(|i| self.display.get(i))
    }

    /// Value committed by Tab, Escape or an outside interaction.
    pub fn commit_fallback(&self) -> String {
        self.selected_value
            .clone()
            .or_else(|| self.default_key().map(str::to_string))
            .unwrap_or_default()
    }

    /// True once after each open; the host positions its overlay then.
    pub fn take_overlay_request(&mut self) -> bool {
        std::mem::take(&mut self.overlay_pending)
    }

    // --- internal transitions ---------------------------------------------

    fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.outbox)
    }

    fn recompute(&mut self) {
        let settings = self.config.filter_settings();
        let src = Sources {
            options: &self.options,
            null_input: &self.options_for_null_input,
            default: self.default_option.as_ref(),
        };
        let next = compute_display_list(&src, &self.input_value, &settings);
        if next != self.display {
            self.highlighted = None;
            self.retry.cancel();
        }
        self.display = next;
        trace!(input = %self.input_value, shown = self.display.len(), "recomputed display list");
    }

    fn open_overlay(&mut self) {
        if self.config.read_only || self.opened {
            return;
        }
        self.opened = true;
        self.overlay_pending = true;
        self.recompute();
        debug!(input = %self.input_value, "dropdown opened");
    }

    fn close_overlay(&mut self) {
        if self.opened {
            self.opened = false;
            self.retry.cancel();
            debug!("dropdown closed");
        }
    }

    fn set_input(&mut self, text: &str) {
        self.field_text = text.to_string();
        self.input_value = text.trim().to_string();
        self.highlighted = None;
        self.recompute();
        if self.config.lazy
            && self.input_value.chars().count()
                >= self.config.minimum_input_length_to_perform_lazy_query
        {
            self.loading = true;
        }
        if !self.input_value.is_empty() {
            self.open_overlay();
        } else if self.opened && !self.config.open_dropdown_on_click {
            self.close_overlay();
        }
        self.outbox.push(Notice::InputValueChanged {
            value: self.input_value.clone(),
        });
    }

    fn lookup_label(&self, key: &str) -> Option<String> {
        self.options
            .iter()
            .chain(self.options_for_null_input.iter())
            .chain(self.default_option.iter())
            .find(|o| o.key == key)
            .map(|o| o.label.clone())
    }

    fn apply(&mut self, value: Option<&str>, keep_open: bool) {
        let resolved = value
            .map(str::to_string)
            .or_else(|| self.default_key().map(str::to_string));
        let is_default = self.has_default_option() && self.default_key() == resolved.as_deref();
        self.selected_value = if is_default { None } else { resolved.clone() };

        let label = resolved
            .as_deref()
            .and_then(|v| self.lookup_label(v))
            .unwrap_or_default();
        debug!(value = ?resolved, %label, keep_open, "value applied");
        self.outbox.push(Notice::ValueApplied {
            label: label.clone(),
            value: resolved,
        });
        self.set_input(&label);
        if !keep_open {
            self.close_overlay();
            self.focused = false;
        }
    }

    fn commit_and_close(&mut self) {
        let value = self.commit_fallback();
        self.apply(Some(&value), false);
        self.close_overlay();
        self.focused = false;
    }

    fn enter(&mut self) {
        if let Some(key) = self.highlighted_option().map(|o| o.key.clone()) {
            self.apply(Some(&key), false);
            return;
        }
        // the default, when present, can only sit in front
        let lead = match (self.display.first(), self.default_key()) {
            (Some(first), Some(dk)) if first.key == dk => 1,
            _ => 0,
        };
        if self.display.len() == 1 + lead {
            let key = self.display[lead].key.clone();
            self.apply(Some(&key), false);
        } else if lead == 1 && self.display.len() == 1 {
            let key = self.display[0].key.clone();
            self.apply(Some(&key), false);
        } else if !self.input_value.is_empty() && !self.loading {
            debug!(value = %self.input_value, "custom value submitted");
            self.outbox.push(Notice::CustomValueSubmit {
                value: self.input_value.clone(),
                number_of_available_options: self.display.len(),
            });
        }
    }

    // --- public transitions -----------------------------------------------

    /// The user edited the field.
    pub fn set_input_value(&mut self, text: &str) -> Vec<Notice> {
        self.set_input(text);
        self.drain()
    }

    pub fn open(&mut self) {
        self.open_overlay();
    }

    pub fn close(&mut self, commit: bool) -> Vec<Notice> {
        if commit {
            self.commit_and_close();
        }
        self.close_overlay();
        self.focused = false;
        self.drain()
    }

    /// Move the highlight over the enabled entries, wrapping at both ends.
    /// Returns the label of the newly highlighted entry.
    pub fn navigate(&mut self, direction: Direction) -> Option<String> {
        let count = self.navigable_count();
        if count == 0 {
            return None;
        }
        let current = self.highlighted.filter(|&i| i < count);
        if current.is_none() {
            self.saved_value = Some(self.input_value.clone());
        }
        let next = match (direction, current) {
            (Direction::Next, Some(i)) if i + 1 < count => i + 1,
            (Direction::Next, _) => 0,
            (Direction::Prev, Some(i)) if i > 0 => i - 1,
            (Direction::Prev, _) => count - 1,
        };
        // Wrapping always lands on an entry, so there is no path back to
        // "nothing highlighted" that would restore saved_value.
        self.highlighted = Some(next);
        trace!(?direction, index = next, "highlight moved");
        self.display.get(next).map(|o| o.label.clone())
    }

    pub fn apply_value(&mut self, value: Option<&str>, keep_dropdown_opened: bool) -> Vec<Notice> {
        self.apply(value, keep_dropdown_opened);
        self.drain()
    }

    /// Programmatic selection by key.
    pub fn set_value(&mut self, key: &str) -> Vec<Notice> {
        self.apply_value(Some(key), false)
    }

    pub fn on_key_down(&mut self, key: Key) -> KeyOutcome {
        let prevent_default = match key {
            Key::ArrowDown | Key::ArrowUp => {
                self.open_overlay();
                let dir = if key == Key::ArrowDown {
                    Direction::Next
                } else {
                    Direction::Prev
                };
                self.navigate(dir);
                true
            }
            Key::Enter => {
                self.enter();
                false
            }
            Key::Tab | Key::Escape => {
                self.commit_and_close();
                true
            }
            Key::Space => match self.highlighted_option().map(|o| o.key.clone()) {
                Some(k) => {
                    self.apply(Some(&k), false);
                    true
                }
                None => false,
            },
            Key::Other => false,
        };
        KeyOutcome {
            prevent_default,
            notices: self.drain(),
        }
    }

    /// A click or focus change outside the widget.
    pub fn outside_interaction(&mut self) -> Vec<Notice> {
        if !self.opened || self.focused {
            return Vec::new();
        }
        self.close(true)
    }

    /// Focus the field. Unless the dropdown is kept open, also reset it to
    /// the default option (or nothing), then close and blur.
    pub fn clear(&mut self, keep_dropdown_opened: bool) -> Vec<Notice> {
        self.focused = true;
        if !keep_dropdown_opened {
            let value = self.default_key().unwrap_or("").to_string();
            self.apply(Some(&value), false);
        }
        self.drain()
    }

    pub fn focus(&mut self) {
        self.focused = true;
        if !self.input_value.is_empty() {
            self.open_overlay();
        }
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn click(&mut self) {
        if self.config.open_dropdown_on_click {
            self.open_overlay();
        }
    }

    // --- host property updates ---------------------------------------------

    /// Fresh options from the host; ends any pending lazy load.
    pub fn set_options(&mut self, options: Vec<SuggestOption>) {
        self.options = options;
        self.loading = false;
        self.recompute();
    }

    pub fn set_options_for_null_input(&mut self, options: Vec<SuggestOption>) {
        self.options_for_null_input = options;
        self.recompute();
    }

    pub fn clear_options_for_null_input(&mut self) {
        self.options_for_null_input.clear();
        self.recompute();
    }

    /// Shows the default's label in the field without touching the typed
    /// input, then closes and blurs.
    pub fn set_default_option(&mut self, option: SuggestOption) {
        self.field_text = option.label.clone();
        self.default_option = Some(option.detached());
        self.saved_value = None;
        self.close_overlay();
        self.focused = false;
        self.recompute();
    }

    pub fn clear_default_option(&mut self) {
        self.default_option = None;
        self.recompute();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_no_results_message(&mut self, text: impl Into<String>) {
        self.config.no_results_message = text.into();
    }

    pub fn set_input_length_below_minimum_message(&mut self, text: impl Into<String>) {
        self.config.input_length_below_minimum_message = text.into();
    }

    pub fn set_template(&mut self, template: ItemTemplate) {
        self.template = Some(template);
        self.retry.cancel();
    }

    pub fn clear_template(&mut self) {
        self.template = None;
        self.retry.cancel();
    }

    /// Render the custom template into the first `mounted_slots` items.
    ///
    /// Returns `None` when there is no template or the dropdown is closed.
    /// An incomplete pass schedules a retry until the configured attempts run
    /// out.
    pub fn render_custom_items(&mut self, mounted_slots: usize) -> Option<TemplatePass> {
        let template = self.template.clone()?;
        if !self.opened {
            return None;
        }
        let ctl: &SuggestController = self;
        let rendered: Vec<(usize, String)> = ctl
            .display
            .iter()
            .filter(|o| o.opt_id < mounted_slots)
            .map(|o| (o.opt_id, template.render(o, ctl)))
            .collect();

        if mounted_slots >= self.display.len() {
            self.retry.attempts = 0;
            return Some(TemplatePass {
                rendered,
                complete: true,
                retry: None,
            });
        }
        let policy = &self.config.template_retry;
        if self.retry.attempts >= policy.max_attempts {
            warn!(
                attempts = self.retry.attempts,
                mounted_slots,
                expected = self.display.len(),
                "giving up on custom item rendering"
            );
            return Some(TemplatePass {
                rendered,
                complete: false,
                retry: None,
            });
        }
        self.retry.attempts += 1;
        let token = RetryToken {
            generation: self.retry.generation,
            attempt: self.retry.attempts,
        };
        Some(TemplatePass {
            rendered,
            complete: false,
            retry: Some(ScheduledRetry {
                token,
                after: policy.interval(),
            }),
        })
    }

    /// Whether a scheduled retry should still run.
    pub fn retry_due(&self, token: RetryToken) -> bool {
        self.opened && self.template.is_some() && self.retry.is_current(token)
    }

    /// Widget teardown: cancels outstanding retries and drops queued notices.
    pub fn dispose(&mut self) {
        self.retry.cancel();
        self.opened = false;
        self.focused = false;
        self.outbox.clear();
    }
}
