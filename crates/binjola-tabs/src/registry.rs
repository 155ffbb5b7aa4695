//! Tab Registry
//!
//! Open tabs in display order plus the closed-tab stack used for undo-close.
//! A session lives in exactly one of the two. Closing never releases an
//! engine; only eviction from the stack or `clear_closed` does.

use std::collections::VecDeque;

use crate::engine::EngineFactory;
use crate::error::TabError;
use crate::tab::{TabId, TabSession};
use crate::Result;

pub const DEFAULT_MAX_CLOSED_TABS: usize = 20;

/// Result of closing a tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Other tabs remain open
    Closed,
    /// That was the last open tab; the window should close
    WindowShouldClose,
}

pub struct TabRegistry {
    open: Vec<TabSession>,
    /// Most recently closed last
    closed: VecDeque<TabSession>,
    max_closed: usize,
    factory: Box<dyn EngineFactory>,
}

impl TabRegistry {
    pub fn new(factory: Box<dyn EngineFactory>) -> Self {
        Self::with_capacity(factory, DEFAULT_MAX_CLOSED_TABS)
    }

    /// Registry whose closed stack keeps at most `max_closed` tabs
    pub fn with_capacity(factory: Box<dyn EngineFactory>, max_closed: usize) -> Self {
        Self {
            open: Vec::new(),
            closed: VecDeque::new(),
            max_closed,
            factory,
        }
    }

    /// Create a tab at the end of the strip, navigating to `url` unless empty
    pub fn open_tab(&mut self, url: impl Into<String>) -> &TabSession {
        let url = url.into();
        let mut tab = TabSession::new(self.factory.create_engine());
        if !url.is_empty() {
            tab.navigate(url);
        }

        tracing::info!(tab_id = %tab.id(), url = %tab.address_text(), "Opened tab");

        self.open.push(tab);
        &self.open[self.open.len() - 1]
    }

    /// Move a tab onto the closed stack, keeping its engine alive
    pub fn close_tab(&mut self, tab_id: TabId) -> Result<CloseOutcome> {
        let index = self.index_of(tab_id).ok_or(TabError::NotFound(tab_id))?;
        let tab = self.open.remove(index);

        tracing::info!(tab_id = %tab_id, remaining = self.open.len(), "Closed tab");

        self.closed.push_back(tab);
        while self.closed.len() > self.max_closed {
            if let Some(evicted) = self.closed.pop_front() {
                tracing::debug!(tab_id = %evicted.id(), "Evicted closed tab, releasing engine");
            }
        }

        if self.open.is_empty() {
            tracing::info!("Last tab closed");
            Ok(CloseOutcome::WindowShouldClose)
        } else {
            Ok(CloseOutcome::Closed)
        }
    }

    pub fn close_current_tab(&mut self, current_index: usize) -> Result<CloseOutcome> {
        let tab_id = self.tab_at(current_index)?.id();
        self.close_tab(tab_id)
    }

    /// Undo the most recent close. `None` when nothing was closed.
    pub fn reopen_last_closed(&mut self) -> Option<&TabSession> {
        let mut tab = self.closed.pop_back()?;
        tab.mark_restored();

        tracing::info!(tab_id = %tab.id(), url = %tab.address_text(), "Restored closed tab");

        self.open.push(tab);
        Some(&self.open[self.open.len() - 1])
    }

    /// Permanently drop every closed tab. Returns how many engines were released.
    pub fn clear_closed(&mut self) -> usize {
        let count = self.closed.len();
        self.closed.clear();
        count
    }

    pub fn get(&self, tab_id: TabId) -> Result<&TabSession> {
        self.open
            .iter()
            .find(|t| t.id() == tab_id)
            .ok_or(TabError::NotFound(tab_id))
    }

    pub fn get_mut(&mut self, tab_id: TabId) -> Result<&mut TabSession> {
        self.open
            .iter_mut()
            .find(|t| t.id() == tab_id)
            .ok_or(TabError::NotFound(tab_id))
    }

    /// Open or closed; closed engines keep reporting load events
    pub fn session_mut_any(&mut self, tab_id: TabId) -> Result<&mut TabSession> {
        self.open
            .iter_mut()
            .chain(self.closed.iter_mut())
            .find(|t| t.id() == tab_id)
            .ok_or(TabError::NotFound(tab_id))
    }

    pub fn tab_at(&self, index: usize) -> Result<&TabSession> {
        self.open.get(index).ok_or(TabError::IndexOutOfRange {
            index,
            len: self.open.len(),
        })
    }

    pub fn tab_at_mut(&mut self, index: usize) -> Result<&mut TabSession> {
        let len = self.open.len();
        self.open
            .get_mut(index)
            .ok_or(TabError::IndexOutOfRange { index, len })
    }

    pub fn index_of(&self, tab_id: TabId) -> Option<usize> {
        self.open.iter().position(|t| t.id() == tab_id)
    }

    pub fn is_closed(&self, tab_id: TabId) -> bool {
        self.closed.iter().any(|t| t.id() == tab_id)
    }

    /// Open tabs in display order
    pub fn tabs(&self) -> &[TabSession] {
        &self.open
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn closed_len(&self) -> usize {
        self.closed.len()
    }

    pub fn max_closed(&self) -> usize {
        self.max_closed
    }
}

impl std::fmt::Debug for TabRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabRegistry")
            .field("open", &self.open)
            .field("closed", &self.closed)
            .field("max_closed", &self.max_closed)
            .finish_non_exhaustive()
    }
}
