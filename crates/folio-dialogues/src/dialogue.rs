//! Open/close and focus machinery shared by every dialogue.
//!
//! Panels hold a [`DialogueBehavior`] and delegate to it:
//! - Closed -> Open (`open`, records the trigger element)
//! - Open -> Open (`open` again, replaces the trigger)
//! - Open -> Closed (`close`, returns focus to the recorded trigger)

use std::fmt;
use std::sync::Arc;

use folio_core::types::{DialogueId, ElementRef};

use crate::providers::FocusService;

/// Visibility state of a dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogueState {
    Closed,
    Open,
}

impl fmt::Display for DialogueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogueState::Closed => write!(f, "Closed"),
            DialogueState::Open => write!(f, "Open"),
        }
    }
}

/// Generic dialogue lifecycle, composed into each concrete panel.
pub struct DialogueBehavior {
    id: DialogueId,
    name: &'static str,
    state: DialogueState,
    last_trigger: Option<ElementRef>,
    focus: Arc<dyn FocusService>,
}

impl fmt::Debug for DialogueBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogueBehavior")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("state", &self.state)
            .field("last_trigger", &self.last_trigger)
            .finish()
    }
}

impl DialogueBehavior {
    /// Create a closed dialogue. `name` only appears in logs.
    pub fn new(name: &'static str, focus: Arc<dyn FocusService>) -> Self {
        Self {
            id: DialogueId::new(),
            name,
            state: DialogueState::Closed,
            last_trigger: None,
            focus,
        }
    }

    pub fn id(&self) -> DialogueId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DialogueState::Open
    }

    /// Element focus will return to on close.
    pub fn last_trigger(&self) -> Option<&ElementRef> {
        self.last_trigger.as_ref()
    }

    /// Show the dialogue and remember what opened it.
    pub fn open(&mut self, trigger: Option<ElementRef>) {
        tracing::debug!(
            dialogue = self.name,
            id = %self.id,
            trigger = trigger.as_ref().map(|t| t.to_string()),
            "Dialogue state: {} -> {}",
            self.state,
            DialogueState::Open
        );
        self.last_trigger = trigger;
        self.state = DialogueState::Open;
    }

    /// Hide the dialogue and hand focus back to the recorded trigger.
    ///
    /// Returns the element that received focus, if any. The record is
    /// consumed, so closing twice restores focus once.
    pub fn close(&mut self) -> Option<ElementRef> {
        let restored = self.last_trigger.take();
        if let Some(trigger) = &restored {
            self.focus.focus(trigger);
        }
        tracing::debug!(
            dialogue = self.name,
            id = %self.id,
            restored = restored.as_ref().map(|t| t.to_string()),
            "Dialogue state: {} -> {}",
            self.state,
            DialogueState::Closed
        );
        self.state = DialogueState::Closed;
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::FocusLog;

    fn behavior() -> (DialogueBehavior, Arc<FocusLog>) {
        let focus = Arc::new(FocusLog::new());
        (DialogueBehavior::new("test", focus.clone()), focus)
    }

    #[test]
    fn test_state_display() {
        assert_eq!(DialogueState::Closed.to_string(), "Closed");
        assert_eq!(DialogueState::Open.to_string(), "Open");
    }

    #[test]
    fn test_starts_closed() {
        let (d, focus) = behavior();
        assert_eq!(d.state(), DialogueState::Closed);
        assert!(!d.is_open());
        assert!(d.last_trigger().is_none());
        assert!(focus.history().is_empty());
        assert_eq!(d.name(), "test");
    }

    #[test]
    fn test_open_records_trigger() {
        let (mut d, _) = behavior();
        let button = ElementRef::new("share-button").with_class("btn");
        d.open(Some(button.clone()));
        assert!(d.is_open());
        assert_eq!(d.last_trigger(), Some(&button));
    }

    #[test]
    fn test_close_returns_focus_to_trigger() {
        let (mut d, focus) = behavior();
        let button = ElementRef::new("share-button");
        d.open(Some(button.clone()));

        let restored = d.close();
        assert_eq!(restored, Some(button.clone()));
        assert_eq!(focus.history(), vec![button]);
        assert_eq!(d.state(), DialogueState::Closed);
        assert!(d.last_trigger().is_none());
    }

    #[test]
    fn test_second_close_does_not_refocus() {
        let (mut d, focus) = behavior();
        d.open(Some(ElementRef::new("share-button")));
        d.close();
        assert_eq!(d.close(), None);
        assert_eq!(focus.history().len(), 1);
    }

    #[test]
    fn test_close_without_trigger_moves_no_focus() {
        let (mut d, focus) = behavior();
        d.open(None);
        assert_eq!(d.close(), None);
        assert!(focus.history().is_empty());
    }

    #[test]
    fn test_reopen_replaces_trigger() {
        let (mut d, focus) = behavior();
        d.open(Some(ElementRef::new("first")));
        d.open(Some(ElementRef::new("second")));
        assert!(d.is_open());
        d.close();
        assert_eq!(focus.last(), Some(ElementRef::new("second")));
    }

    #[test]
    fn test_ids_differ_per_instance() {
        let (a, _) = behavior();
        let (b, _) = behavior();
        assert_ne!(a.id(), b.id());
    }
}
