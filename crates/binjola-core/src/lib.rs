//! Binjola Core
//!
//! One [`Browser`] per window. It owns the tab registry and address-bar
//! machinery; the UI shell renders whatever state it exposes and forwards
//! engine events back in. Preferences are process-wide and shared by clones.

mod action;
mod browser;
mod config;
mod error;
mod preferences;

pub use action::{BrowserAction, BrowserEffect};
pub use browser::Browser;
pub use config::Config;
pub use error::CoreError;
pub use preferences::PreferenceStore;

// Re-export core components
pub use binjola_navigation::{
    InputResolver, NavigationError, NavigationTarget, SuggestionFetcher, SuggestionQuery,
    SuggestionTicket, SuggestionTracker,
};
pub use binjola_storage::{Database, StorageError};
pub use binjola_tabs::{
    CloseOutcome, EngineFactory, LoadOutcome, LoadPhase, RenderEngine, TabError, TabId,
    TabRegistry, TabSession,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
