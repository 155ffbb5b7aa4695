//! Browser core instance
//!
//! One instance per window. All tab state is mutated through `&mut self` on
//! the interaction thread; the only background work is suggestion fetching,
//! whose results come back through [`Browser::deliver_suggestions`].

use std::collections::HashMap;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use binjola_navigation::{
    InputResolver, NavigationTarget, SuggestionFetcher, SuggestionQuery, SuggestionTicket,
    SuggestionTracker,
};
use binjola_storage::Database;
use binjola_tabs::{CloseOutcome, EngineFactory, LoadOutcome, TabId, TabRegistry, TabSession};

use crate::config::Config;
use crate::preferences::PreferenceStore;
use crate::Result;

pub struct Browser {
    /// Configuration
    config: Config,
    /// Process-wide preferences, shared with other windows
    preferences: PreferenceStore,
    /// Open and recently closed tabs of this window
    registry: TabRegistry,
    /// Input resolver for address bar
    resolver: InputResolver,
    suggestion_fetcher: SuggestionFetcher,
    /// One per address field, so typing in one tab never cancels another
    suggestion_trackers: HashMap<TabId, SuggestionTracker>,
}

impl Browser {
    /// Open the settings database named by `config` and build the first window
    pub fn new(config: Config, factory: Box<dyn EngineFactory>) -> Result<Self> {
        config.validate()?;
        let db = Database::open(config.database_path())?;
        let preferences = PreferenceStore::open(db)?;
        Self::with_preferences(config, preferences, factory)
    }

    pub fn with_preferences(
        config: Config,
        preferences: PreferenceStore,
        factory: Box<dyn EngineFactory>,
    ) -> Result<Self> {
        let resolver = InputResolver::with_search_engine(config.search_engine.clone())?;
        let suggestion_fetcher = SuggestionFetcher::new(
            config.suggestion_endpoint.clone(),
            config.suggestion_timeout(),
        )?;
        let registry = TabRegistry::with_capacity(factory, config.max_closed_tabs);

        tracing::info!(
            organization = %config.organization,
            application = %config.application,
            dark_theme = preferences.get_theme(),
            "Browser initialized"
        );

        Ok(Self {
            config,
            preferences,
            registry,
            resolver,
            suggestion_fetcher,
            suggestion_trackers: HashMap::new(),
        })
    }

    /// A fresh, independent window: own tabs, shared config and preferences
    pub fn new_window(&self, factory: Box<dyn EngineFactory>) -> Result<Browser> {
        Self::with_preferences(self.config.clone(), self.preferences.clone(), factory)
    }

    // === Tab operations ===

    /// Open a tab on `input` (resolved like address bar text) or the homepage
    pub fn open_tab(&mut self, input: Option<&str>) -> TabId {
        let url = match input {
            Some(input) => {
                let target = self.resolver.resolve(input);
                if target.is_empty() {
                    String::new()
                } else {
                    self.resolver.destination(&target)
                }
            }
            None => self.config.homepage.clone(),
        };

        self.registry.open_tab(url).id()
    }

    pub fn close_tab(&mut self, tab_id: TabId) -> Result<CloseOutcome> {
        let outcome = self.registry.close_tab(tab_id)?;
        self.suggestion_trackers.remove(&tab_id);
        Ok(outcome)
    }

    pub fn close_current_tab(&mut self, current_index: usize) -> Result<CloseOutcome> {
        let tab_id = self.registry.tab_at(current_index)?.id();
        self.close_tab(tab_id)
    }

    pub fn reopen_last_closed(&mut self) -> Option<TabId> {
        self.registry.reopen_last_closed().map(TabSession::id)
    }

    pub fn tab(&self, tab_id: TabId) -> Result<&TabSession> {
        Ok(self.registry.get(tab_id)?)
    }

    pub fn tabs(&self) -> &TabRegistry {
        &self.registry
    }

    // === Navigation ===

    /// Resolve address bar text and navigate the tab. Blank input does nothing.
    pub fn submit_address(
        &mut self,
        tab_id: TabId,
        input: &str,
    ) -> Result<Option<NavigationTarget>> {
        let target = self.resolver.resolve(input);
        if target.is_empty() {
            return Ok(None);
        }

        let url = self.resolver.destination(&target);
        self.registry.get_mut(tab_id)?.navigate(url);
        if let Some(tracker) = self.suggestion_trackers.get_mut(&tab_id) {
            tracker.clear();
        }

        Ok(Some(target))
    }

    pub fn resolve_input(&self, input: &str) -> NavigationTarget {
        self.resolver.resolve(input)
    }

    pub fn go_back(&mut self, tab_id: TabId) -> Result<()> {
        self.registry.get_mut(tab_id)?.go_back();
        Ok(())
    }

    pub fn go_forward(&mut self, tab_id: TabId) -> Result<()> {
        self.registry.get_mut(tab_id)?.go_forward();
        Ok(())
    }

    pub fn reload(&mut self, tab_id: TabId) -> Result<()> {
        self.registry.get_mut(tab_id)?.reload();
        Ok(())
    }

    // === Engine events ===

    pub fn on_load_started(&mut self, tab_id: TabId) -> Result<()> {
        self.registry.session_mut_any(tab_id)?.start_load();
        Ok(())
    }

    pub fn on_load_progress(&mut self, tab_id: TabId, percent: u8) -> Result<bool> {
        Ok(self
            .registry
            .session_mut_any(tab_id)?
            .update_progress(percent))
    }

    pub fn on_load_finished(&mut self, tab_id: TabId, success: bool) -> Result<LoadOutcome> {
        let outcome = self.registry.session_mut_any(tab_id)?.finish_load(success);
        if outcome == LoadOutcome::Failed {
            tracing::debug!(tab_id = %tab_id, "Engine reported load failure");
        }
        Ok(outcome)
    }

    pub fn on_url_changed(&mut self, tab_id: TabId, url: &str) -> Result<()> {
        self.registry.session_mut_any(tab_id)?.url_changed(url);
        Ok(())
    }

    pub fn on_title_changed(&mut self, tab_id: TabId, title: &str) -> Result<()> {
        self.registry.session_mut_any(tab_id)?.set_title(title);
        Ok(())
    }

    // === Suggestions ===

    /// Start a background fetch for the address field of `tab_id`. Safe to
    /// call from a thread with no tokio runtime; the fetch runs on
    /// [`suggestion_runtime`](Self::suggestion_runtime).
    pub fn request_suggestions(
        &mut self,
        tab_id: TabId,
        query: &str,
    ) -> Result<(SuggestionTicket, JoinHandle<Vec<String>>)> {
        self.registry.get(tab_id)?;

        let ticket = self
            .suggestion_trackers
            .entry(tab_id)
            .or_default()
            .issue(query);
        let handle = self.suggestion_fetcher.spawn(query);
        Ok((ticket, handle))
    }

    /// Replace the tab's suggestion list if `ticket` is its latest request
    pub fn deliver_suggestions(
        &mut self,
        tab_id: TabId,
        ticket: SuggestionTicket,
        results: Vec<String>,
    ) -> bool {
        match self.suggestion_trackers.get_mut(&tab_id) {
            Some(tracker) => tracker.deliver(ticket, results),
            None => {
                tracing::debug!(tab_id = %tab_id, "Dropping suggestions for closed tab");
                false
            }
        }
    }

    /// `None` until suggestions were requested for the tab
    pub fn suggestions(&self, tab_id: TabId) -> Option<&SuggestionQuery> {
        self.suggestion_trackers
            .get(&tab_id)
            .map(SuggestionTracker::current)
    }

    pub fn clear_suggestions(&mut self, tab_id: TabId) {
        if let Some(tracker) = self.suggestion_trackers.get_mut(&tab_id) {
            tracker.clear();
        }
    }

    pub fn suggestion_runtime(&self) -> &Handle {
        self.suggestion_fetcher.runtime()
    }

    // === Settings operations ===

    pub fn get_theme(&self) -> bool {
        self.preferences.get_theme()
    }

    pub fn set_theme(&self, dark: bool) -> Result<()> {
        self.preferences.set_theme(dark)
    }

    pub fn toggle_theme(&self) -> Result<bool> {
        self.preferences.toggle_theme()
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl std::fmt::Debug for Browser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Browser")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("suggestion_trackers", &self.suggestion_trackers)
            .finish_non_exhaustive()
    }
}
