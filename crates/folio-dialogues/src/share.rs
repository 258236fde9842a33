//! Share / embed dialogue.
//!
//! Lets the user copy a link to the current view, copy the IIIF manifest
//! link, and size an embeddable iframe. Everything the panel shows lives in
//! [`ShareView`], which only [`ShareDialogue::update`] writes. Every action
//! (open, preset change, dimension edit) changes the underlying state and
//! then calls `update()`.
//!
//! The dialogue listens on the [`EventBus`] for
//! [`Command::ShowShareDialogue`], [`Command::HideShareDialogue`] and
//! [`Command::ShowEmbedDialogue`], and publishes only
//! [`Command::ShowTermsOfUse`].

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use folio_core::config::{FolioConfig, ShareDialogueConfig};
use folio_core::error::Result;
use folio_core::events::{Command, CommandKind, EventBus};
use folio_core::types::ElementRef;
use serde::{Deserialize, Serialize};

use crate::aspect::{parse_dimension, AspectConstraint, EmbedSize};
use crate::dialogue::{DialogueBehavior, DialogueState};
use crate::focus::DeferredFocus;
use crate::presets::{default_presets, SizePreset};
use crate::providers::ShareCollaborators;

/// Class names identifying the toolbar's embed button.
pub const EMBED_BUTTON_CLASSES: [&str; 2] = ["embed", "btn"];

/// True if `trigger` is the embed button, which wants the embed code focused.
pub fn is_embed_button(trigger: &ElementRef) -> bool {
    trigger.has_classes(&EMBED_BUTTON_CLASSES)
}

/// The copyable read-only fields of the dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareField {
    ShareUrl,
    ManifestUrl,
    EmbedCode,
}

impl ShareField {
    /// Element handle of the field's input, for focus changes.
    pub fn element(&self) -> ElementRef {
        match self {
            ShareField::ShareUrl => ElementRef::new("urlInput").with_class("copy-input"),
            ShareField::ManifestUrl => ElementRef::new("manifestInput").with_class("copy-input"),
            ShareField::EmbedCode => ElementRef::new("embedCode").with_class("copy-input"),
        }
    }
}

impl std::str::FromStr for ShareField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "share_url" | "url" => Ok(ShareField::ShareUrl),
            "manifest_url" | "manifest" => Ok(ShareField::ManifestUrl),
            "embed_code" | "embed" => Ok(ShareField::EmbedCode),
            other => Err(format!("unknown share field: {}", other)),
        }
    }
}

/// Selected preset plus the current iframe size.
///
/// With a fixed preset selected the size equals the preset's. With the
/// custom preset it is whatever the last dimension edit derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedSizeState {
    pub selected_preset_id: String,
    pub current_width: u32,
    pub current_height: u32,
}

/// Everything the panel displays. Written only by [`ShareDialogue::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShareView {
    pub url_section_visible: bool,
    pub share_url: String,
    pub manifest_section_visible: bool,
    pub manifest_url: String,
    pub embed_section_visible: bool,
    pub custom_size_visible: bool,
    pub width_field: String,
    pub height_field: String,
    pub embed_code: String,
    pub copy_buttons_visible: bool,
    pub terms_of_use_visible: bool,
}

/// State of one share dialogue. Shared through [`ShareDialogueHandle`].
pub struct ShareDialogue {
    dialogue: DialogueBehavior,
    options: ShareDialogueConfig,
    constraint: AspectConstraint,
    presets: Vec<SizePreset>,
    size: EmbedSizeState,
    view: ShareView,
    deferred_focus: DeferredFocus,
    collaborators: ShareCollaborators,
}

impl std::fmt::Debug for ShareDialogue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareDialogue")
            .field("dialogue", &self.dialogue)
            .field("options", &self.options)
            .field("size", &self.size)
            .field("view", &self.view)
            .finish()
    }
}

impl ShareDialogue {
    /// Build a closed dialogue with the first preset selected, without bus
    /// subscriptions. Most callers want [`ShareDialogue::create`].
    pub fn new(collaborators: ShareCollaborators, config: &FolioConfig) -> Result<Self> {
        let constraint = AspectConstraint::from_config(&config.embed_size)?;
        let presets = default_presets();
        let (selected_preset_id, initial) = presets
            .first()
            .map(|p| (p.id.clone(), p.size))
            .unwrap_or_default();
        let initial = initial.unwrap_or(EmbedSize::new(
            constraint.min_width(),
            constraint.min_height(),
        ));

        let mut dialogue = Self {
            dialogue: DialogueBehavior::new("share", collaborators.focus.clone()),
            options: config.share_dialogue.clone(),
            constraint,
            presets,
            size: EmbedSizeState {
                selected_preset_id,
                current_width: initial.width,
                current_height: initial.height,
            },
            view: ShareView::default(),
            deferred_focus: DeferredFocus::new(Duration::from_millis(
                config.embed_size.focus_delay_ms,
            )),
            collaborators,
        };
        dialogue.update();
        Ok(dialogue)
    }

    /// Build the dialogue and subscribe it to its three bus commands.
    ///
    /// Subscriptions hold a weak reference: once every handle is dropped the
    /// handlers do nothing.
    pub fn create(
        bus: &EventBus,
        collaborators: ShareCollaborators,
        config: &FolioConfig,
    ) -> Result<ShareDialogueHandle> {
        let dialogue = Self::new(collaborators, config)?;
        let handle = ShareDialogueHandle {
            inner: Arc::new(Mutex::new(dialogue)),
            bus: bus.clone(),
        };

        handle.subscribe(CommandKind::ShowShareDialogue, |dialogue, command| {
            dialogue.open(command.trigger().cloned());
        });
        handle.subscribe(CommandKind::HideShareDialogue, |dialogue, _| {
            dialogue.close();
        });
        handle.subscribe(CommandKind::ShowEmbedDialogue, |dialogue, command| {
            dialogue.open_embed(command.trigger().cloned());
        });

        tracing::info!(id = %handle.lock().dialogue.id(), "Share dialogue created");
        Ok(handle)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Show the dialogue, remembering `trigger` for focus restoration.
    pub fn open(&mut self, trigger: Option<ElementRef>) {
        self.dialogue.open(trigger);
        self.update();
    }

    /// Open via the embed command. When the trigger is the embed button the
    /// embed code field gets focus once the open animation has run.
    pub fn open_embed(&mut self, trigger: Option<ElementRef>) {
        let wants_embed_focus = trigger.as_ref().is_some_and(is_embed_button);
        self.open(trigger);

        if wants_embed_focus {
            let focus = self.collaborators.focus.clone();
            self.deferred_focus
                .schedule(focus, ShareField::EmbedCode.element());
        }
    }

    /// Hide the dialogue and return focus to whatever opened it.
    pub fn close(&mut self) -> Option<ElementRef> {
        self.deferred_focus.cancel();
        self.dialogue.close()
    }

    // =========================================================================
    // Derived state
    // =========================================================================

    /// Recompute every visible property from the current state and providers.
    ///
    /// Idempotent: with unchanged providers a second call changes nothing.
    pub fn update(&mut self) {
        let share_url = self
            .collaborators
            .share_url
            .share_url()
            .filter(|url| !url.is_empty());
        self.view.url_section_visible = share_url.is_some();

        match self.selected_preset().and_then(|p| p.size) {
            Some(fixed) => {
                self.view.custom_size_visible = false;
                self.size.current_width = fixed.width;
                self.size.current_height = fixed.height;
            }
            None => {
                self.view.custom_size_visible = true;
            }
        }
        self.view.width_field = self.size.current_width.to_string();
        self.view.height_field = self.size.current_height.to_string();

        // Keep the last known link when the provider has none right now.
        if let Some(url) = share_url {
            self.view.share_url = url;
        }

        let include_manifest = self.options.share_manifests_enabled;
        self.view.manifest_section_visible = include_manifest;
        self.view.manifest_url = self
            .collaborators
            .manifest_url
            .iiif_share_url(include_manifest);

        self.view.embed_section_visible = self.options.embed_enabled;
        self.view.embed_code = self
            .collaborators
            .embed_code
            .embed_code(self.size.current_width, self.size.current_height)
            .unwrap_or_default();

        self.view.copy_buttons_visible = self.options.copy_to_clipboard_enabled;

        self.view.terms_of_use_visible = self.options.terms_of_use_enabled
            && self
                .collaborators
                .required_statement
                .required_statement()
                .is_some_and(|s| !s.value.is_empty());
    }

    // =========================================================================
    // User input
    // =========================================================================

    /// Select a size preset by id. Unknown ids leave the selection unchanged.
    ///
    /// Switching to the custom preset keeps the current width but re-derives
    /// the size through the constraint, since fixed presets need not satisfy
    /// the configured ratio or bounds.
    pub fn select_preset(&mut self, id: &str) -> bool {
        let known = self.presets.iter().any(|p| p.id == id);
        if known {
            self.size.selected_preset_id = id.to_string();
            if self.selected_preset().is_some_and(SizePreset::is_custom) {
                let size = self
                    .constraint
                    .derive_height_from_width(i64::from(self.size.current_width));
                self.size.current_width = size.width;
                self.size.current_height = size.height;
            }
        } else {
            tracing::warn!(preset = id, "Ignoring unknown size preset");
        }
        self.update();
        known
    }

    /// The user changed the width field: clamp it and derive the height.
    pub fn edit_width(&mut self, text: &str) {
        let size = self
            .constraint
            .derive_height_from_width(parse_dimension(text));
        self.apply_size(size);
    }

    /// The user changed the height field: clamp it and derive the width.
    pub fn edit_height(&mut self, text: &str) {
        let size = self
            .constraint
            .derive_width_from_height(parse_dimension(text));
        self.apply_size(size);
    }

    fn apply_size(&mut self, size: EmbedSize) {
        tracing::debug!(width = size.width, height = size.height, "Embed size edited");
        self.size.current_width = size.width;
        self.size.current_height = size.height;
        self.update();
    }

    /// Copy a field's current text to the clipboard and focus the field.
    ///
    /// Does nothing when copy buttons are hidden. Returns whether it copied.
    pub fn copy(&self, field: ShareField) -> bool {
        if !self.view.copy_buttons_visible {
            return false;
        }
        let text = match field {
            ShareField::ShareUrl => &self.view.share_url,
            ShareField::ManifestUrl => &self.view.manifest_url,
            ShareField::EmbedCode => &self.view.embed_code,
        };
        self.collaborators.clipboard.copy(text);
        self.collaborators.focus.focus(&field.element());
        true
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn view(&self) -> &ShareView {
        &self.view
    }

    pub fn size(&self) -> &EmbedSizeState {
        &self.size
    }

    pub fn presets(&self) -> &[SizePreset] {
        &self.presets
    }

    pub fn selected_preset(&self) -> Option<&SizePreset> {
        self.presets
            .iter()
            .find(|p| p.id == self.size.selected_preset_id)
    }

    pub fn constraint(&self) -> &AspectConstraint {
        &self.constraint
    }

    pub fn options(&self) -> &ShareDialogueConfig {
        &self.options
    }

    pub fn dialogue(&self) -> &DialogueBehavior {
        &self.dialogue
    }

    pub fn state(&self) -> DialogueState {
        self.dialogue.state()
    }

    pub fn is_open(&self) -> bool {
        self.dialogue.is_open()
    }

    /// Whether a share link can be obtained right now.
    pub fn is_share_available(&self) -> bool {
        self.collaborators
            .share_url
            .share_url()
            .is_some_and(|url| !url.is_empty())
    }

    pub fn is_focus_pending(&self) -> bool {
        self.deferred_focus.is_pending()
    }
}

/// Shared handle to a [`ShareDialogue`] subscribed to the bus.
///
/// Each method locks the dialogue for the duration of the call only. Bus
/// publishes happen after the lock is released, so other components may
/// react by publishing commands back at this dialogue.
#[derive(Clone)]
pub struct ShareDialogueHandle {
    inner: Arc<Mutex<ShareDialogue>>,
    bus: EventBus,
}

impl std::fmt::Debug for ShareDialogueHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ShareDialogueHandle")
            .field(&*self.lock())
            .finish()
    }
}

impl ShareDialogueHandle {
    fn lock(&self) -> MutexGuard<'_, ShareDialogue> {
        self.inner.lock().expect("share dialogue mutex poisoned")
    }

    fn subscribe<F>(&self, kind: CommandKind, action: F)
    where
        F: Fn(&mut ShareDialogue, &Command) + Send + Sync + 'static,
    {
        let weak: Weak<Mutex<ShareDialogue>> = Arc::downgrade(&self.inner);
        self.bus.subscribe(kind, move |command| {
            let Some(dialogue) = weak.upgrade() else {
                return;
            };
            let mut dialogue = dialogue.lock().expect("share dialogue mutex poisoned");
            action(&mut *dialogue, command);
        });
    }

    /// Run `f` with the dialogue locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut ShareDialogue) -> R) -> R {
        let mut dialogue = self.lock();
        f(&mut *dialogue)
    }

    pub fn update(&self) {
        self.lock().update();
    }

    pub fn select_preset(&self, id: &str) -> bool {
        self.lock().select_preset(id)
    }

    pub fn edit_width(&self, text: &str) {
        self.lock().edit_width(text);
    }

    pub fn edit_height(&self, text: &str) {
        self.lock().edit_height(text);
    }

    pub fn copy(&self, field: ShareField) -> bool {
        self.lock().copy(field)
    }

    /// The user activated the terms-of-use link.
    ///
    /// Refreshes the view first so visibility reflects the current required
    /// statement, then publishes [`Command::ShowTermsOfUse`] when the link is
    /// visible. Returns whether it published.
    pub fn request_terms_of_use(&self) -> bool {
        let visible = {
            let mut dialogue = self.lock();
            dialogue.update();
            dialogue.view().terms_of_use_visible
        };
        if visible {
            self.bus.publish(Command::ShowTermsOfUse);
        } else {
            tracing::debug!("Terms of use requested while hidden, ignoring");
        }
        visible
    }

    /// Snapshot of the visible state.
    pub fn view(&self) -> ShareView {
        self.lock().view().clone()
    }

    pub fn size(&self) -> EmbedSizeState {
        self.lock().size().clone()
    }

    pub fn state(&self) -> DialogueState {
        self.lock().state()
    }

    pub fn is_open(&self) -> bool {
        self.lock().is_open()
    }

    pub fn is_focus_pending(&self) -> bool {
        self.lock().is_focus_pending()
    }

    pub fn last_trigger(&self) -> Option<ElementRef> {
        self.lock().dialogue().last_trigger().cloned()
    }
}
