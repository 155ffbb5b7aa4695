//! Load Phase State Machine
//!
//! ```text
//! Idle
//!   ↓ start_load
//! Loading ⟲ start_load (a new navigation supersedes the unfinished one)
//!   ↓ finish_load
//! Loaded
//!   ↓ start_load
//! Loading
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPhase {
    /// No navigation has started yet
    #[default]
    Idle,
    /// Navigation started, progress updates expected
    Loading,
    /// Navigation completed, successfully or not
    Loaded,
}

impl LoadPhase {
    /// Check if transition to another phase is valid
    pub fn can_transition_to(&self, target: LoadPhase) -> bool {
        matches!(
            (self, target),
            (_, LoadPhase::Loading) | (LoadPhase::Loading, LoadPhase::Loaded)
        )
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadPhase::Loading)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoadPhase::Idle => "idle",
            LoadPhase::Loading => "loading",
            LoadPhase::Loaded => "loaded",
        }
    }
}

impl std::fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
