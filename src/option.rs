use crate::error::{Result, SuggestError, read_file};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A candidate suggestion.
///
/// `key` identifies the option within its source list, `label` is what the
/// field shows once the option is applied and `search_str` is what typed input
/// is matched against. `opt_id` is the option's position in the last computed
/// display list and is overwritten on every recompute.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestOption {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub search_str: String,
    #[serde(default, skip_serializing)]
    pub opt_id: usize,
}

impl SuggestOption {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        let label = label.into();
        SuggestOption {
            key: key.into(),
            search_str: label.clone(),
            label,
            opt_id: 0,
        }
    }

    pub fn with_search_str(mut self, search_str: impl Into<String>) -> Self {
        self.search_str = search_str.into();
        self
    }

    // copy without the display position of whatever list it came from
    pub(crate) fn detached(&self) -> Self {
        SuggestOption {
            opt_id: 0,
            ..self.clone()
        }
    }

    fn normalized(mut self) -> Self {
        if self.search_str.is_empty() {
            self.search_str = self.label.clone();
        }
        self
    }
}

// Options files accept either bare strings or full option objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawOption {
    Plain(String),
    Full(SuggestOption),
}

impl From<RawOption> for SuggestOption {
    fn from(raw: RawOption) -> Self {
        match raw {
            RawOption::Plain(s) => SuggestOption::new(s.clone(), s),
            RawOption::Full(o) => o.normalized(),
        }
    }
}

pub fn parse_options(json: &str) -> Result<Vec<SuggestOption>> {
    let raw: Vec<RawOption> = serde_json::from_str(json).map_err(|source| SuggestError::Json {
        context: "options".to_string(),
        source,
    })?;
    Ok(raw.into_iter().map(SuggestOption::from).collect())
}

pub fn load_options(path: &Path) -> Result<Vec<SuggestOption>> {
    let s = read_file(path)?;
    parse_options(&s).map_err(|e| match e {
        SuggestError::Json { source, .. } => SuggestError::Json {
            context: path.display().to_string(),
            source,
        },
        other => other,
    })
}

type Generator<T> = Box<dyn Fn(&T) -> String + Send + Sync>;

/// Turns host items into options.
///
/// Labels come from the label generator (or the item's `Display` text) and
/// search strings from the search-string generator (or the label).
pub struct OptionBuilder<T> {
    label: Option<Generator<T>>,
    search: Option<Generator<T>>,
}

impl<T> Default for OptionBuilder<T> {
    fn default() -> Self {
        OptionBuilder {
            label: None,
            search: None,
        }
    }
}

impl<T> OptionBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label_generator(mut self, f: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        self.label = Some(Box::new(f));
        self
    }

    pub fn search_string_generator(
        mut self,
        f: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        self.search = Some(Box::new(f));
        self
    }

    /// Search strings that differ from labels make label highlighting
    /// misleading, so hosts should disable it when this returns true.
    pub fn overrides_search(&self) -> bool {
        self.search.is_some()
    }

    fn search_of(&self, item: &T, label: &str) -> String {
        match &self.search {
            Some(f) => f(item),
            None => label.to_string(),
        }
    }

    /// Build options keyed by their label. A later item with the same label
    /// replaces the earlier one but keeps its position.
    pub fn from_items(&self, items: impl IntoIterator<Item = T>) -> Vec<SuggestOption>
    where
        T: ToString,
    {
        let mut out: Vec<SuggestOption> = Vec::new();
        for item in items {
            let label = match &self.label {
                Some(f) => f(&item),
                None => item.to_string(),
            };
            let opt = SuggestOption::new(label.clone(), label.clone())
                .with_search_str(self.search_of(&item, &label));
            upsert(&mut out, opt);
        }
        out
    }

    /// Build options with explicit keys. Without a label generator the key
    /// doubles as the label.
    pub fn from_keyed(&self, items: impl IntoIterator<Item = (String, T)>) -> Vec<SuggestOption> {
        let mut out: Vec<SuggestOption> = Vec::new();
        for (key, item) in items {
            let label = match &self.label {
                Some(f) => f(&item),
                None => key.clone(),
            };
            let search = self.search_of(&item, &label);
            upsert(&mut out, SuggestOption::new(key, label).with_search_str(search));
        }
        out
    }
}

fn upsert(out: &mut Vec<SuggestOption>, opt: SuggestOption) {
    match out.iter_mut().find(|o| o.key == opt.key) {
        Some(slot) => *slot = opt,
        None => out.push(opt),
    }
}

/// Host-side source of options for lazy mode. Called with the current input
/// whenever it changes; the result is fed back through `set_options`.
pub trait LazyProvider {
    fn refresh(&mut self, query: &str) -> Vec<SuggestOption>;
}

impl<F> LazyProvider for F
where
    F: FnMut(&str) -> Vec<SuggestOption>,
{
    fn refresh(&mut self, query: &str) -> Vec<SuggestOption> {
        self(query)
    }
}
