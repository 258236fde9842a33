pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::FolioConfig;
pub use error::{FolioError, Result};
pub use events::{Command, CommandEnvelope, CommandKind, EventBus};
pub use types::*;
