//! Folio dialogues crate - viewer panels driven by the command bus.
//!
//! Each panel composes a [`DialogueBehavior`] for the open/close/focus
//! lifecycle and keeps its own state behind a single `update()` step that
//! recomputes everything the panel displays.
//!
//! # Modules
//!
//! - [`aspect`]: width/height pair under a fixed ratio with clamped bounds
//! - [`presets`]: embed size presets and the `custom` sentinel
//! - [`providers`]: collaborator traits and in-memory implementations
//! - [`dialogue`]: generic open/close state and focus restoration
//! - [`focus`]: cancellable one-shot deferred focus shift
//! - [`share`]: the share / embed dialogue
//!
//! # Usage
//!
//! ```rust,ignore
//! use folio_core::{Command, EventBus, FolioConfig};
//! use folio_dialogues::ShareDialogue;
//!
//! let bus = EventBus::new();
//! let share = ShareDialogue::create(&bus, collaborators, &FolioConfig::default())?;
//! bus.publish(Command::ShowShareDialogue { trigger: None });
//! assert!(share.is_open());
//! ```

pub mod aspect;
pub mod dialogue;
pub mod focus;
pub mod presets;
pub mod providers;
pub mod share;

pub use aspect::{AspectConstraint, EmbedSize};
pub use dialogue::{DialogueBehavior, DialogueState};
pub use focus::DeferredFocus;
pub use presets::{SizePreset, CUSTOM_PRESET_ID};
pub use providers::{
    ClipboardService, EmbedCodeProvider, FocusService, ManifestShareUrlProvider,
    RequiredStatement, RequiredStatementProvider, ShareCollaborators, ShareUrlProvider,
};
pub use share::{EmbedSizeState, ShareDialogue, ShareDialogueHandle, ShareField, ShareView};
