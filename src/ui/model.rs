use crate::config::SuggestConfig;
use crate::controller::{Phase, SuggestController};
use crate::error::{Result, SuggestError};
use crate::filter::{FilterSettings, filter_options};
use crate::option::{LazyProvider, SuggestOption};
use crate::template::{ItemTemplate, ScheduledRetry};
use bubbletea_widgets::Viewport;

// small constants reused by rendering code
pub const FIELD_BLOCK_LINES: usize = 3;
pub const MODELINE_LINES: usize = 1;
pub const RESERVED_LINES: usize = FIELD_BLOCK_LINES + MODELINE_LINES;
pub const DEFAULT_WIDTH: usize = 80;

/// Startup parameters collected by the binary.
#[derive(Clone, Debug, Default)]
pub struct Launch {
    pub options: Vec<SuggestOption>,
    pub config: SuggestConfig,
    pub default_key: Option<String>,
    // item format with {key}, {label} and {input} placeholders
    pub template: Option<String>,
}

impl Launch {
    pub fn default_option(&self) -> Result<Option<SuggestOption>> {
        let Some(key) = &self.default_key else {
            return Ok(None);
        };
        self.options
            .iter()
            .find(|o| &o.key == key)
            .cloned()
            .map(Some)
            .ok_or_else(|| SuggestError::InvalidConfig(format!("default key `{key}` is not among the options")))
    }
}

pub fn format_template(format: String) -> ItemTemplate {
    ItemTemplate::new(move |option, ctl| {
        format
            .replace("{key}", &option.key)
            .replace("{label}", &option.label)
            .replace("{input}", ctl.input_value())
    })
}

// Lazy mode answers queries from the loaded file, standing in for a remote
// lookup.
#[derive(Clone, Debug, Default)]
pub struct CatalogProvider {
    catalog: Vec<SuggestOption>,
    settings: FilterSettings,
}

impl CatalogProvider {
    pub fn new(catalog: Vec<SuggestOption>, settings: FilterSettings) -> Self {
        CatalogProvider { catalog, settings }
    }
}

impl LazyProvider for CatalogProvider {
    fn refresh(&mut self, query: &str) -> Vec<SuggestOption> {
        filter_options(&self.catalog, query, None, &self.settings)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Model {
    pub ctl: SuggestController,
    pub provider: Option<CatalogProvider>,
    // template output indexed by opt_id; None until a slot is rendered
    pub custom_items: Vec<Option<String>>,
    pub status: String,
    // set when Enter commits; the runner quits and prints it
    pub exit_value: Option<String>,
    pub pending_retry: Option<ScheduledRetry>,
    pub pending_query: Option<String>,
    // first dropdown row on screen
    pub scroll: usize,
    pub per_page: usize,
    pub screen_width: usize,
    pub vp: Viewport,
}

pub fn initial_model(launch: Launch) -> Model {
    let mut m = Model::default();
    let mut ctl = SuggestController::new(launch.config.clone());
    if launch.config.lazy {
        m.provider = Some(CatalogProvider::new(
            launch.options.clone(),
            launch.config.filter_settings(),
        ));
    } else {
        ctl.set_options(launch.options.clone());
    }
    if let Ok(Some(def)) = launch.default_option() {
        ctl.set_default_option(def);
    }
    if let Some(format) = launch.template {
        ctl.set_template(format_template(format));
    }
    ctl.focus();
    m.ctl = ctl;
    m
}

impl Model {
    // wrapper update that delegates to the update module
    pub fn update(&mut self, msg: crate::ui::Msg) {
        crate::ui::update::handle_update(self, msg);
    }

    pub fn mode(&self) -> String {
        match self.ctl.phase() {
            Phase::Closed => "closed",
            Phase::OpenedEmptyInput => "all",
            Phase::OpenedWithResults => "filter",
            Phase::OpenedLoading => "loading",
        }
        .to_string()
    }

    // Render helper wrappers that forward to the render module to keep this file focused on state.
    pub fn render_field_block(&self) -> Vec<String> {
        crate::ui::render::render_field_block(self)
    }
    pub fn render_dropdown(&self) -> Vec<String> {
        crate::ui::render::render_dropdown(self)
    }
    pub fn render_main_content(&self) -> String {
        crate::ui::render::render_main_content(self)
    }
    pub fn render_full(&self) -> String {
        crate::ui::render::render_full(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::Msg;

    fn fruit() -> Vec<SuggestOption> {
        vec![
            SuggestOption::new("a", "Apple"),
            SuggestOption::new("b", "Banana"),
            SuggestOption::new("c", "Cherry"),
        ]
    }

    fn launch() -> Launch {
        Launch {
            options: fruit(),
            ..Default::default()
        }
    }

    #[test]
    fn initial_model_focuses_closed_controller() {
        let m = initial_model(launch());
        assert!(m.ctl.is_focused());
        assert!(!m.ctl.is_opened());
        assert_eq!(m.ctl.options().len(), 3);
        assert_eq!(m.mode(), "closed");
        assert!(m.provider.is_none());
    }

    #[test]
    fn default_key_must_name_an_option() {
        let mut l = launch();
        l.default_key = Some("b".to_string());
        assert_eq!(l.default_option().unwrap().unwrap().label, "Banana");
        let m = initial_model(l.clone());
        assert_eq!(m.ctl.field_text(), "Banana");
        assert!(m.ctl.has_default_option());

        l.default_key = Some("zz".to_string());
        assert!(matches!(l.default_option(), Err(SuggestError::InvalidConfig(_))));
    }

    #[test]
    fn lazy_launch_defers_options_to_provider() {
        let mut l = launch();
        l.config.lazy = true;
        let mut m = initial_model(l);
        assert!(m.ctl.options().is_empty());
        let got = m.provider.as_mut().unwrap().refresh("ch");
        assert_eq!(got, vec![SuggestOption::new("c", "Cherry")]);
    }

    #[test]
    fn template_format_fills_placeholders() {
        let t = format_template("[{key}] {label} <{input}>".to_string());
        let mut ctl = SuggestController::new(SuggestConfig::default());
        ctl.set_input_value("ap");
        assert_eq!(t.render(&SuggestOption::new("a", "Apple"), &ctl), "[a] Apple <ap>");
    }

    #[test]
    fn mode_tracks_phase() {
        let mut m = initial_model(launch());
        m.update(Msg::KeyDown);
        assert_eq!(m.mode(), "all");
        m.update(Msg::Rune('b'));
        assert_eq!(m.mode(), "filter");
    }
}
