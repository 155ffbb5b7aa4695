//! Binjola Navigation
//!
//! - Address bar input resolution: direct URL or search query
//! - Search URL construction from a `%s` template
//! - Background search suggestions with last-issued-wins delivery

mod error;
mod input;
mod suggest;

pub use error::NavigationError;
pub use input::{InputResolver, NavigationTarget, DEFAULT_SEARCH_ENGINE};
pub use suggest::{
    parse_suggestions, SuggestionFetcher, SuggestionQuery, SuggestionTicket, SuggestionTracker,
    DEFAULT_SUGGESTION_ENDPOINT,
};

pub type Result<T> = std::result::Result<T, NavigationError>;
