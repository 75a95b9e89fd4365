use crate::controller::SuggestController;
use crate::option::SuggestOption;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

type TemplateFn = dyn Fn(&SuggestOption, &SuggestController) -> String + Send + Sync;

/// Host-supplied formatter for dropdown items.
#[derive(Clone)]
pub struct ItemTemplate(Arc<TemplateFn>);

impl ItemTemplate {
    pub fn new(
        f: impl Fn(&SuggestOption, &SuggestController) -> String + Send + Sync + 'static,
    ) -> Self {
        ItemTemplate(Arc::new(f))
    }

    pub fn render(&self, option: &SuggestOption, ctl: &SuggestController) -> String {
        (self.0)(option, ctl)
    }
}

impl fmt::Debug for ItemTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ItemTemplate(..)")
    }
}

/// How often, and how many times, an incomplete template pass is retried.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryPolicy {
    pub interval_ms: u64,
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            interval_ms: 250,
            max_attempts: 8,
        }
    }
}

impl RetryPolicy {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Identifies one scheduled retry. Tokens from before a close, a list change
/// or teardown no longer match and are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryToken {
    pub(crate) generation: u64,
    pub attempt: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledRetry {
    pub token: RetryToken,
    pub after: Duration,
}

/// Result of one template render pass: markup for every mounted slot, keyed
/// by `opt_id`, and the retry to schedule if some items had no slot yet.
/// An incomplete pass without a retry means the attempts ran out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TemplatePass {
    pub rendered: Vec<(usize, String)>,
    pub complete: bool,
    pub retry: Option<ScheduledRetry>,
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct RetryState {
    pub generation: u64,
    pub attempts: u32,
}

impl RetryState {
    // invalidate outstanding tokens and start counting afresh
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.attempts = 0;
    }

    pub fn is_current(&self, token: RetryToken) -> bool {
        token.generation == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_invalidates_tokens_and_resets_attempts() {
        let mut state = RetryState {
            attempts: 3,
            ..Default::default()
        };
        let token = RetryToken {
            generation: state.generation,
            attempt: 3,
        };
        assert!(state.is_current(token));
        state.cancel();
        assert!(!state.is_current(token));
        assert_eq!(state.attempts, 0);
    }

    #[test]
    fn policy_defaults_and_interval() {
        let p = RetryPolicy::default();
        assert_eq!(p.interval(), Duration::from_millis(250));
        let p: RetryPolicy = serde_json::from_str(r#"{"maxAttempts": 2}"#).unwrap();
        assert_eq!(p.interval_ms, 250);
        assert_eq!(p.max_attempts, 2);
    }
}
