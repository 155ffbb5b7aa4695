//! Tab error types

use thiserror::Error;

use crate::state::LoadPhase;
use crate::tab::TabId;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TabError {
    #[error("Tab not found: {0}")]
    NotFound(TabId),

    #[error("Tab index {index} out of range ({len} open)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid load transition: {from} -> {to}")]
    InvalidTransition { from: LoadPhase, to: LoadPhase },
}
