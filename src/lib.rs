//! autosuggest - a text field with a dropdown of filtered suggestions
//!
//! The library holds the pure display-list computation (`filter`), the
//! suggestion state machine (`controller`) and the terminal host (`ui`) used
//! by the binary.
//!
//! Tests live close to the modules they exercise as unit tests.

pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod option;
pub mod template;

pub mod ui;

pub use config::SuggestConfig;
pub use controller::{Direction, Key, KeyOutcome, MessageItem, Notice, Phase, SuggestController};
pub use error::{Result, SuggestError};
pub use filter::{FilterSettings, HighlightParts, MatchMode, compute_display_list, highlight_parts};
pub use option::{LazyProvider, OptionBuilder, SuggestOption};
pub use template::{ItemTemplate, RetryPolicy, RetryToken, TemplatePass};
