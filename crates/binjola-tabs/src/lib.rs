//! Binjola Tab Management
//!
//! Each tab is a [`TabSession`] owned by the [`TabRegistry`]; the shell only
//! holds [`TabId`]s. Closed tabs keep their engine alive on a bounded undo
//! stack until they are restored or evicted.

mod engine;
mod error;
mod registry;
mod state;
mod tab;

pub use engine::{EngineFactory, RenderEngine};
pub use error::TabError;
pub use registry::{CloseOutcome, TabRegistry, DEFAULT_MAX_CLOSED_TABS};
pub use state::LoadPhase;
pub use tab::{LoadOutcome, TabId, TabSession};

pub type Result<T> = std::result::Result<T, TabError>;
