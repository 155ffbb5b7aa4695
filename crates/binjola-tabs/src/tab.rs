//! Tab session
//!
//! One browsing context: address text, load phase and progress, and the
//! rendering engine it exclusively owns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::RenderEngine;
use crate::error::TabError;
use crate::state::LoadPhase;
use crate::Result;

/// Opaque tab identifier handed to the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabId(Uuid);

impl TabId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a `finish_load` event meant for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadOutcome {
    Succeeded,
    /// The engine reported failure; display-only, the phase is still Loaded
    Failed,
    /// No load was in progress
    Ignored,
}

pub struct TabSession {
    id: TabId,
    /// Last entered or loaded URL
    address_text: String,
    /// Page title reported by the engine
    title: Option<String>,
    phase: LoadPhase,
    /// 0-100, meaningful only while loading
    progress: u8,
    last_load_failed: bool,
    /// Came back from the closed-tab stack
    restored: bool,
    created_at: DateTime<Utc>,
    engine: Box<dyn RenderEngine>,
}

impl TabSession {
    pub fn new(engine: Box<dyn RenderEngine>) -> Self {
        Self {
            id: TabId::new(),
            address_text: String::new(),
            title: None,
            phase: LoadPhase::Idle,
            progress: 0,
            last_load_failed: false,
            restored: false,
            created_at: Utc::now(),
            engine,
        }
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn address_text(&self) -> &str {
        &self.address_text
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn load_phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn is_loading(&self) -> bool {
        self.phase.is_loading()
    }

    /// The shell shows a progress bar only while a load is running
    pub fn progress_visible(&self) -> bool {
        self.is_loading()
    }

    pub fn last_load_failed(&self) -> bool {
        self.last_load_failed
    }

    pub fn is_restored(&self) -> bool {
        self.restored
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Label for the tab strip
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ if self.restored => "Restored Tab",
            _ => "New Tab",
        }
    }

    fn transition_to(&mut self, new_phase: LoadPhase) -> Result<()> {
        if !self.phase.can_transition_to(new_phase) {
            return Err(TabError::InvalidTransition {
                from: self.phase,
                to: new_phase,
            });
        }

        tracing::debug!(
            tab_id = %self.id,
            from = %self.phase,
            to = %new_phase,
            "Load phase transition"
        );

        self.phase = new_phase;
        Ok(())
    }

    /// Engine started a navigation. Always restarts progress from zero.
    pub fn start_load(&mut self) {
        // Every phase may enter Loading
        if self.transition_to(LoadPhase::Loading).is_ok() {
            self.progress = 0;
            self.last_load_failed = false;
        }
    }

    /// Record progress; ignored unless loading. Returns whether it applied.
    pub fn update_progress(&mut self, percent: u8) -> bool {
        if !self.phase.is_loading() {
            tracing::debug!(tab_id = %self.id, phase = %self.phase, percent, "Ignoring progress outside load");
            return false;
        }

        self.progress = self.progress.max(percent.min(100));
        true
    }

    /// Engine finished the navigation, successfully or not
    pub fn finish_load(&mut self, success: bool) -> LoadOutcome {
        if let Err(e) = self.transition_to(LoadPhase::Loaded) {
            tracing::debug!(tab_id = %self.id, error = %e, "Ignoring load finish");
            return LoadOutcome::Ignored;
        }

        self.last_load_failed = !success;
        if success {
            self.progress = 100;
            LoadOutcome::Succeeded
        } else {
            LoadOutcome::Failed
        }
    }

    /// Point the engine at `url` and show it in the address bar
    pub fn navigate(&mut self, url: impl Into<String>) {
        let url = url.into();
        tracing::debug!(tab_id = %self.id, url = %url, "Navigating");
        self.engine.navigate(&url);
        self.address_text = url;
        self.title = None;
    }

    /// Engine committed a different URL (redirect, history step, link)
    pub fn url_changed(&mut self, url: impl Into<String>) {
        self.address_text = url.into();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn go_back(&mut self) {
        self.engine.go_back();
    }

    pub fn go_forward(&mut self) {
        self.engine.go_forward();
    }

    pub fn reload(&mut self) {
        self.engine.reload();
    }

    pub(crate) fn mark_restored(&mut self) {
        self.restored = true;
    }
}

impl std::fmt::Debug for TabSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabSession")
            .field("id", &self.id)
            .field("address_text", &self.address_text)
            .field("title", &self.title)
            .field("phase", &self.phase)
            .field("progress", &self.progress)
            .field("last_load_failed", &self.last_load_failed)
            .field("restored", &self.restored)
            .finish_non_exhaustive()
    }
}
