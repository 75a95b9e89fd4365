use crate::error::{Result, SuggestError, read_file};
use crate::filter::{FilterSettings, MatchMode};
use crate::template::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_NO_RESULTS_MESSAGE: &str = "No results";
pub const DEFAULT_BELOW_MINIMUM_MESSAGE: &str = "Type more to see suggestions";

/// Host-supplied widget configuration. JSON keys are camelCase, every field
/// is optional.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuggestConfig {
    pub limit: Option<usize>,
    pub lazy: bool,
    pub minimum_input_length_to_perform_lazy_query: usize,
    pub search_matching_mode: MatchMode,
    pub case_sensitive: bool,
    pub disable_search_highlighting: bool,
    pub open_dropdown_on_click: bool,
    pub read_only: bool,
    pub no_results_message: String,
    pub input_length_below_minimum_message: String,
    pub template_retry: RetryPolicy,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        SuggestConfig {
            limit: None,
            lazy: false,
            minimum_input_length_to_perform_lazy_query: 0,
            search_matching_mode: MatchMode::StartsWith,
            case_sensitive: false,
            disable_search_highlighting: false,
            open_dropdown_on_click: false,
            read_only: false,
            no_results_message: DEFAULT_NO_RESULTS_MESSAGE.to_string(),
            input_length_below_minimum_message: DEFAULT_BELOW_MINIMUM_MESSAGE.to_string(),
            template_retry: RetryPolicy::default(),
        }
    }
}

impl SuggestConfig {
    pub fn from_json(s: &str) -> Result<Self> {
        let cfg: SuggestConfig = serde_json::from_str(s).map_err(|source| SuggestError::Json {
            context: "configuration".to_string(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let s = read_file(path)?;
        let cfg = Self::from_json(&s)?;
        tracing::debug!(path = %path.display(), mode = %cfg.search_matching_mode, "loaded configuration");
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.template_retry.max_attempts == 0 {
            return Err(SuggestError::InvalidConfig(
                "templateRetry.maxAttempts must be at least 1".to_string(),
            ));
        }
        if let MatchMode::Unrecognized(mode) = &self.search_matching_mode {
            // tolerated: the filter fails closed
            tracing::warn!(%mode, "unknown search matching mode; no option will match typed input");
        }
        Ok(())
    }

    pub fn filter_settings(&self) -> FilterSettings {
        FilterSettings {
            mode: self.search_matching_mode.clone(),
            case_sensitive: self.case_sensitive,
            limit: self.limit,
        }
    }

    /// Minimum lazy input length, only when lazy mode actually gates queries.
    pub fn lazy_minimum(&self) -> Option<usize> {
        if self.lazy && self.minimum_input_length_to_perform_lazy_query > 0 {
            Some(self.minimum_input_length_to_perform_lazy_query)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let cfg = SuggestConfig::from_json("{}").unwrap();
        assert_eq!(cfg, SuggestConfig::default());
        assert_eq!(cfg.no_results_message, "No results");
        assert_eq!(cfg.template_retry.max_attempts, 8);
    }

    #[test]
    fn camel_case_keys_are_read() {
        let cfg = SuggestConfig::from_json(
            r#"{"limit": 5, "lazy": true, "minimumInputLengthToPerformLazyQuery": 2,
                "searchMatchingMode": "CONTAINS", "caseSensitive": true,
                "templateRetry": {"intervalMs": 10}}"#,
        )
        .unwrap();
        assert_eq!(cfg.limit, Some(5));
        assert_eq!(cfg.lazy_minimum(), Some(2));
        assert_eq!(cfg.search_matching_mode, MatchMode::Contains);
        assert_eq!(cfg.template_retry.interval_ms, 10);
        assert_eq!(cfg.template_retry.max_attempts, 8);
        let fs = cfg.filter_settings();
        assert!(fs.case_sensitive);
        assert_eq!(fs.limit, Some(5));
    }

    #[test]
    fn unknown_mode_is_accepted_and_fails_closed() {
        let cfg = SuggestConfig::from_json(r#"{"searchMatchingMode": "FUZZY"}"#).unwrap();
        assert_eq!(cfg.search_matching_mode, MatchMode::Unrecognized("FUZZY".to_string()));
    }

    #[test]
    fn zero_limit_is_accepted_and_zero_attempts_rejected() {
        let cfg = SuggestConfig::from_json(r#"{"limit": 0}"#).unwrap();
        assert_eq!(cfg.limit, Some(0));
        let err = SuggestConfig::from_json(r#"{"templateRetry": {"maxAttempts": 0}}"#).unwrap_err();
        assert!(matches!(err, SuggestError::InvalidConfig(_)));
    }

    #[test]
    fn lazy_minimum_requires_lazy_and_positive_minimum() {
        let mut cfg = SuggestConfig {
            minimum_input_length_to_perform_lazy_query: 3,
            ..Default::default()
        };
        assert_eq!(cfg.lazy_minimum(), None);
        cfg.lazy = true;
        assert_eq!(cfg.lazy_minimum(), Some(3));
        cfg.minimum_input_length_to_perform_lazy_query = 0;
        assert_eq!(cfg.lazy_minimum(), None);
    }
}
