//! Scripted steps for driving the share dialogue from the command line.
//!
//! Lifecycle steps go through the command bus exactly like toolbar buttons
//! would; input steps call the dialogue handle like the panel's controls.

use std::str::FromStr;

use folio_core::{Command, ElementRef, EventBus};
use folio_dialogues::{ShareDialogueHandle, ShareField, ShareView};
use serde::Serialize;

/// One scripted user or shell action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Open,
    Embed,
    Close,
    Update,
    Terms,
    Preset(String),
    Width(String),
    Height(String),
    Copy(ShareField),
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (verb, arg) = match s.split_once(':') {
            Some((verb, arg)) => (verb, Some(arg)),
            None => (s, None),
        };
        match (verb, arg) {
            ("open", None) => Ok(Step::Open),
            ("embed", None) => Ok(Step::Embed),
            ("close", None) => Ok(Step::Close),
            ("update", None) => Ok(Step::Update),
            ("terms", None) => Ok(Step::Terms),
            ("preset", Some(id)) => Ok(Step::Preset(id.to_string())),
            ("width", Some(n)) => Ok(Step::Width(n.to_string())),
            ("height", Some(n)) => Ok(Step::Height(n.to_string())),
            ("copy", Some(field)) => Ok(Step::Copy(field.parse()?)),
            _ => Err(format!("unknown step: {}", s)),
        }
    }
}

/// The toolbar button that opens the share dialogue.
pub fn share_button() -> ElementRef {
    ElementRef::new("share-button")
        .with_class("share")
        .with_class("btn")
}

/// The toolbar button that opens the dialogue on its embed section.
pub fn embed_button() -> ElementRef {
    ElementRef::new("embed-button")
        .with_class("embed")
        .with_class("btn")
}

/// What a step did, printed as JSON after each step.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: String,
    /// Whether the step had an effect (handlers reached, copy made, ...).
    pub applied: bool,
    pub state: String,
    pub view: ShareView,
}

/// Apply `step` and describe the resulting dialogue state.
pub fn run_step(step: &Step, bus: &EventBus, share: &ShareDialogueHandle) -> StepReport {
    let applied = match step {
        Step::Open => {
            bus.publish(Command::ShowShareDialogue {
                trigger: Some(share_button()),
            }) > 0
        }
        Step::Embed => {
            bus.publish(Command::ShowEmbedDialogue {
                trigger: Some(embed_button()),
            }) > 0
        }
        Step::Close => bus.publish(Command::HideShareDialogue) > 0,
        Step::Update => {
            share.update();
            true
        }
        Step::Terms => share.request_terms_of_use(),
        Step::Preset(id) => share.select_preset(id),
        Step::Width(text) => {
            share.edit_width(text);
            true
        }
        Step::Height(text) => {
            share.edit_height(text);
            true
        }
        Step::Copy(field) => share.copy(*field),
    };

    StepReport {
        step: format!("{:?}", step),
        applied,
        state: share.state().to_string(),
        view: share.view(),
    }
}
