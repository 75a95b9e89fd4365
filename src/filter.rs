//! Display-list computation.
//!
//! Everything here is a pure function of its arguments: the same options,
//! input and settings always yield the same list in the same order.

use crate::option::SuggestOption;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How typed input is matched against an option's search string.
///
/// Unknown mode names are kept as `Unrecognized` and match nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatchMode {
    #[default]
    StartsWith,
    Contains,
    Unrecognized(String),
}

impl From<String> for MatchMode {
    fn from(s: String) -> Self {
        match s.as_str() {
            "STARTS_WITH" => MatchMode::StartsWith,
            "CONTAINS" => MatchMode::Contains,
            _ => MatchMode::Unrecognized(s),
        }
    }
}

impl From<&str> for MatchMode {
    fn from(s: &str) -> Self {
        MatchMode::from(s.to_string())
    }
}

impl From<MatchMode> for String {
    fn from(m: MatchMode) -> Self {
        m.to_string()
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::StartsWith => f.write_str("STARTS_WITH"),
            MatchMode::Contains => f.write_str("CONTAINS"),
            MatchMode::Unrecognized(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSettings {
    pub mode: MatchMode,
    pub case_sensitive: bool,
    pub limit: Option<usize>,
}

/// The option lists a display list is built from.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sources<'a> {
    pub options: &'a [SuggestOption],
    pub null_input: &'a [SuggestOption],
    pub default: Option<&'a SuggestOption>,
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

// true when the input only repeats the default option's label (or is blank and
// there is no default)
fn echoes_default(value: &str, default: Option<&SuggestOption>) -> bool {
    let label = default.map(|d| d.label.trim()).unwrap_or("");
    value.trim() == label
}

pub fn matches(search_str: &str, value: &str, settings: &FilterSettings) -> bool {
    let hay = search_str.trim();
    let needle = value.trim();
    match &settings.mode {
        MatchMode::StartsWith => {
            if settings.case_sensitive {
                hay.starts_with(needle)
            } else {
                hay.to_lowercase().starts_with(&needle.to_lowercase())
            }
        }
        MatchMode::Contains => {
            if settings.case_sensitive {
                hay.contains(needle)
            } else {
                hay.to_lowercase().contains(&needle.to_lowercase())
            }
        }
        MatchMode::Unrecognized(_) => false,
    }
}

/// Keep the options whose search string matches `value`.
///
/// Blank input, or input that merely repeats the default option's label,
/// filters nothing out.
pub fn filter_options(
    list: &[SuggestOption],
    value: &str,
    default: Option<&SuggestOption>,
    settings: &FilterSettings,
) -> Vec<SuggestOption> {
    if is_blank(value) || echoes_default(value, default) {
        return list.to_vec();
    }
    list.iter()
        .filter(|o| matches(&o.search_str, value, settings))
        .cloned()
        .collect()
}

fn limit_options(mut list: Vec<SuggestOption>, limit: Option<usize>) -> Vec<SuggestOption> {
    if let Some(n) = limit {
        list.truncate(n);
    }
    list
}

/// Compute the ordered, limited list of suggestions for `input`.
///
/// The default option, when it qualifies, is always the first entry and
/// appears at most once. `opt_id` of every entry is its index.
pub fn compute_display_list(
    src: &Sources<'_>,
    input: &str,
    settings: &FilterSettings,
) -> Vec<SuggestOption> {
    let customized_null = !src.null_input.is_empty();
    let source = if customized_null && (is_blank(input) || echoes_default(input, src.default)) {
        src.null_input.to_vec()
    } else {
        filter_options(src.options, input, src.default, settings)
    };
    let mut res = limit_options(source, settings.limit);

    if let Some(def) = src.default {
        let present = res.iter().any(|o| o.key == def.key);
        if input.is_empty() {
            if !customized_null {
                res.retain(|o| o.key != def.key);
                res.insert(0, def.detached());
            } else if !present {
                res.insert(0, def.detached());
            }
        } else if !present
            && !filter_options(std::slice::from_ref(def), input, src.default, settings).is_empty()
        {
            res.insert(0, def.detached());
        }
    }

    for (i, o) in res.iter_mut().enumerate() {
        o.opt_id = i;
    }
    res
}

/// Label split around the typed input, for bold-highlighting the match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightParts {
    pub prefix: Option<String>,
    pub matched: Option<String>,
    pub suffix: Option<String>,
}

impl HighlightParts {
    pub fn is_empty(&self) -> bool {
        self.prefix.is_none() && self.matched.is_none() && self.suffix.is_none()
    }
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

// char index of the first case-insensitive occurrence of needle in hay
fn find_folded(hay: &[char], needle: &str) -> Option<usize> {
    let needle: Vec<char> = needle.chars().map(fold).collect();
    if needle.len() > hay.len() {
        return None;
    }
    (0..=hay.len() - needle.len())
        .find(|&i| hay[i..i + needle.len()].iter().zip(&needle).all(|(a, b)| fold(*a) == *b))
}

/// Split `option.label` around the first case-insensitive occurrence of
/// `input`. When the input does not occur the split is anchored at the start
/// of the label.
pub fn highlight_parts(input: &str, option: &SuggestOption, disabled: bool) -> HighlightParts {
    if disabled {
        return HighlightParts {
            prefix: None,
            matched: None,
            suffix: Some(option.label.clone()),
        };
    }
    if input.is_empty() || is_blank(&option.label) {
        return HighlightParts::default();
    }
    let label: Vec<char> = option.label.chars().collect();
    let start = find_folded(&label, input).unwrap_or(0);
    let end = usize::min(start + input.chars().count(), label.len());
    HighlightParts {
        prefix: Some(label[..start].iter().collect()),
        matched: Some(label[start..end].iter().collect()),
        suffix: Some(label[end..].iter().collect()),
    }
}
