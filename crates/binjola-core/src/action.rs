//! Shell actions
//!
//! Intents the shell binds to shortcuts or menu entries. Key bindings, focus
//! and fullscreen stay in the shell; everything that touches core state goes
//! through [`Browser::dispatch`].

use serde::{Deserialize, Serialize};

use binjola_tabs::{CloseOutcome, TabId};

use crate::browser::Browser;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BrowserAction {
    NewTab,
    CloseCurrentTab { index: usize },
    ReopenClosedTab,
    NewWindow,
    Reload { index: usize },
    ToggleTheme,
}

/// What the shell has to apply after a dispatched action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum BrowserEffect {
    TabOpened { tab_id: TabId },
    TabClosed,
    WindowShouldClose,
    TabRestored { tab_id: TabId },
    NothingToRestore,
    /// The shell creates the window and its engine factory, then calls
    /// [`Browser::new_window`]
    OpenWindow,
    Reloaded { tab_id: TabId },
    ThemeChanged { dark: bool },
}

impl Browser {
    pub fn dispatch(&mut self, action: BrowserAction) -> Result<BrowserEffect> {
        tracing::debug!(?action, "Dispatching action");

        let effect = match action {
            BrowserAction::NewTab => BrowserEffect::TabOpened {
                tab_id: self.open_tab(None),
            },
            BrowserAction::CloseCurrentTab { index } => match self.close_current_tab(index)? {
                CloseOutcome::Closed => BrowserEffect::TabClosed,
                CloseOutcome::WindowShouldClose => BrowserEffect::WindowShouldClose,
            },
            BrowserAction::ReopenClosedTab => match self.reopen_last_closed() {
                Some(tab_id) => BrowserEffect::TabRestored { tab_id },
                None => BrowserEffect::NothingToRestore,
            },
            BrowserAction::NewWindow => BrowserEffect::OpenWindow,
            BrowserAction::Reload { index } => {
                let tab_id = self.tabs().tab_at(index)?.id();
                self.reload(tab_id)?;
                BrowserEffect::Reloaded { tab_id }
            }
            BrowserAction::ToggleTheme => BrowserEffect::ThemeChanged {
                dark: self.toggle_theme()?,
            },
        };

        Ok(effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::tests::test_browser;

    #[test]
    fn test_tab_shortcuts() {
        let (mut browser, _) = test_browser();

        let opened = match browser.dispatch(BrowserAction::NewTab).unwrap() {
            BrowserEffect::TabOpened { tab_id } => tab_id,
            other => panic!("Expected TabOpened, got {:?}", other),
        };
        browser.dispatch(BrowserAction::NewTab).unwrap();

        assert_eq!(
            browser
                .dispatch(BrowserAction::CloseCurrentTab { index: 0 })
                .unwrap(),
            BrowserEffect::TabClosed
        );
        assert_eq!(
            browser.dispatch(BrowserAction::ReopenClosedTab).unwrap(),
            BrowserEffect::TabRestored { tab_id: opened }
        );
        assert_eq!(
            browser.dispatch(BrowserAction::ReopenClosedTab).unwrap(),
            BrowserEffect::NothingToRestore
        );
    }

    #[test]
    fn test_last_close_requests_window_close() {
        let (mut browser, _) = test_browser();
        browser.dispatch(BrowserAction::NewTab).unwrap();

        assert_eq!(
            browser
                .dispatch(BrowserAction::CloseCurrentTab { index: 0 })
                .unwrap(),
            BrowserEffect::WindowShouldClose
        );
        assert!(browser
            .dispatch(BrowserAction::CloseCurrentTab { index: 0 })
            .is_err());
    }

    #[test]
    fn test_reload_and_theme() {
        let (mut browser, log) = test_browser();
        let tab = browser.open_tab(None);

        assert_eq!(
            browser.dispatch(BrowserAction::Reload { index: 0 }).unwrap(),
            BrowserEffect::Reloaded { tab_id: tab }
        );
        assert_eq!(log.lock().last().map(String::as_str), Some("reload"));

        assert_eq!(
            browser.dispatch(BrowserAction::ToggleTheme).unwrap(),
            BrowserEffect::ThemeChanged { dark: true }
        );
        assert_eq!(
            browser.dispatch(BrowserAction::NewWindow).unwrap(),
            BrowserEffect::OpenWindow
        );
    }

    #[test]
    fn test_action_wire_format() {
        let action: BrowserAction =
            serde_json::from_str(r#"{"action":"close_current_tab","index":2}"#).unwrap();
        assert_eq!(action, BrowserAction::CloseCurrentTab { index: 2 });

        let json = serde_json::to_string(&BrowserEffect::ThemeChanged { dark: false }).unwrap();
        assert_eq!(json, r#"{"effect":"theme_changed","dark":false}"#);
    }
}
