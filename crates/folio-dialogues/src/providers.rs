//! Collaborator traits the dialogues read from, plus in-memory
//! implementations used by the demo binary and tests.
//!
//! All provider calls are synchronous reads without side effects. Absent data
//! (`None`, empty strings) is a normal state that hides UI, never an error.

use std::sync::{Arc, Mutex};

use folio_core::types::ElementRef;
use serde::{Deserialize, Serialize};

/// Supplies the shareable link to the current view, if one can be built.
pub trait ShareUrlProvider: Send + Sync {
    fn share_url(&self) -> Option<String>;
}

/// Supplies the IIIF manifest link.
pub trait ManifestShareUrlProvider: Send + Sync {
    fn iiif_share_url(&self, include_manifest: bool) -> String;
}

/// The resource's required statement (attribution / rights text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredStatement {
    #[serde(default)]
    pub label: Option<String>,
    pub value: String,
}

impl RequiredStatement {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            label: None,
            value: value.into(),
        }
    }
}

/// Supplies the resource's required statement.
pub trait RequiredStatementProvider: Send + Sync {
    fn required_statement(&self) -> Option<RequiredStatement>;
}

/// Renders the embed snippet for a given iframe size.
pub trait EmbedCodeProvider: Send + Sync {
    fn embed_code(&self, width: u32, height: u32) -> Option<String>;
}

/// System clipboard.
pub trait ClipboardService: Send + Sync {
    fn copy(&self, text: &str);
}

/// Moves keyboard and screen-reader focus to an element.
pub trait FocusService: Send + Sync {
    fn focus(&self, target: &ElementRef);
}

/// Everything a share dialogue reads from or writes to outside itself.
#[derive(Clone)]
pub struct ShareCollaborators {
    pub share_url: Arc<dyn ShareUrlProvider>,
    pub manifest_url: Arc<dyn ManifestShareUrlProvider>,
    pub required_statement: Arc<dyn RequiredStatementProvider>,
    pub embed_code: Arc<dyn EmbedCodeProvider>,
    pub clipboard: Arc<dyn ClipboardService>,
    pub focus: Arc<dyn FocusService>,
}

impl ShareCollaborators {
    /// Wire every provider role to one [`MemoryViewer`].
    pub fn from_memory(
        viewer: Arc<MemoryViewer>,
        clipboard: Arc<dyn ClipboardService>,
        focus: Arc<dyn FocusService>,
    ) -> Self {
        Self {
            share_url: viewer.clone(),
            manifest_url: viewer.clone(),
            required_statement: viewer.clone(),
            embed_code: viewer,
            clipboard,
            focus,
        }
    }
}

// =============================================================================
// In-memory collaborators
// =============================================================================

/// Mutable stand-in for the viewer state behind the provider traits.
#[derive(Debug, Default)]
pub struct MemoryViewer {
    share_url: Mutex<Option<String>>,
    manifest_url: Mutex<Option<String>>,
    required_statement: Mutex<Option<RequiredStatement>>,
    embed_base_url: Mutex<Option<String>>,
}

impl MemoryViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_share_url(&self, url: Option<String>) {
        *self.share_url.lock().expect("viewer mutex poisoned") = url;
    }

    pub fn set_manifest_url(&self, url: Option<String>) {
        *self.manifest_url.lock().expect("viewer mutex poisoned") = url;
    }

    pub fn set_required_statement(&self, statement: Option<RequiredStatement>) {
        *self.required_statement.lock().expect("viewer mutex poisoned") = statement;
    }

    pub fn set_embed_base_url(&self, url: Option<String>) {
        *self.embed_base_url.lock().expect("viewer mutex poisoned") = url;
    }
}

impl ShareUrlProvider for MemoryViewer {
    fn share_url(&self) -> Option<String> {
        self.share_url.lock().expect("viewer mutex poisoned").clone()
    }
}

impl ManifestShareUrlProvider for MemoryViewer {
    fn iiif_share_url(&self, include_manifest: bool) -> String {
        let manifest = self
            .manifest_url
            .lock()
            .expect("viewer mutex poisoned")
            .clone()
            .unwrap_or_default();
        if include_manifest && !manifest.is_empty() {
            format!("{}?manifest={}", manifest, manifest)
        } else {
            manifest
        }
    }
}

impl RequiredStatementProvider for MemoryViewer {
    fn required_statement(&self) -> Option<RequiredStatement> {
        self.required_statement
            .lock()
            .expect("viewer mutex poisoned")
            .clone()
    }
}

impl EmbedCodeProvider for MemoryViewer {
    fn embed_code(&self, width: u32, height: u32) -> Option<String> {
        let base = self.embed_base_url.lock().expect("viewer mutex poisoned");
        base.as_ref().map(|src| {
            format!(
                "<iframe src=\"{}\" width=\"{}\" height=\"{}\" allowfullscreen frameborder=\"0\"></iframe>",
                src, width, height
            )
        })
    }
}

/// Clipboard that remembers everything copied to it.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    entries: Mutex<Vec<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<String> {
        self.entries
            .lock()
            .expect("clipboard mutex poisoned")
            .last()
            .cloned()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().expect("clipboard mutex poisoned").clone()
    }
}

impl ClipboardService for MemoryClipboard {
    fn copy(&self, text: &str) {
        tracing::info!(text_len = text.len(), "Copied to clipboard");
        self.entries
            .lock()
            .expect("clipboard mutex poisoned")
            .push(text.to_string());
    }
}

/// Focus service that records every focus change in order.
#[derive(Debug, Default)]
pub struct FocusLog {
    history: Mutex<Vec<ElementRef>>,
}

impl FocusLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<ElementRef> {
        self.history
            .lock()
            .expect("focus mutex poisoned")
            .last()
            .cloned()
    }

    pub fn history(&self) -> Vec<ElementRef> {
        self.history.lock().expect("focus mutex poisoned").clone()
    }
}

impl FocusService for FocusLog {
    fn focus(&self, target: &ElementRef) {
        tracing::debug!(element = %target, "Focus moved");
        self.history
            .lock()
            .expect("focus mutex poisoned")
            .push(target.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_viewer_defaults_to_nothing() {
        let viewer = MemoryViewer::new();
        assert_eq!(viewer.share_url(), None);
        assert_eq!(viewer.iiif_share_url(true), "");
        assert_eq!(viewer.required_statement(), None);
        assert_eq!(viewer.embed_code(560, 420), None);
    }

    #[test]
    fn test_memory_viewer_setters() {
        let viewer = MemoryViewer::new();
        viewer.set_share_url(Some("https://example.org/view#page=3".into()));
        viewer.set_required_statement(Some(RequiredStatement::new("CC-BY")));
        assert_eq!(
            viewer.share_url().as_deref(),
            Some("https://example.org/view#page=3")
        );
        assert_eq!(viewer.required_statement().unwrap().value, "CC-BY");

        viewer.set_share_url(None);
        assert_eq!(viewer.share_url(), None);
    }

    #[test]
    fn test_iiif_share_url_include_manifest() {
        let viewer = MemoryViewer::new();
        viewer.set_manifest_url(Some("https://example.org/manifest.json".into()));
        assert_eq!(
            viewer.iiif_share_url(false),
            "https://example.org/manifest.json"
        );
        assert_eq!(
            viewer.iiif_share_url(true),
            "https://example.org/manifest.json?manifest=https://example.org/manifest.json"
        );
    }

    #[test]
    fn test_embed_code_carries_size() {
        let viewer = MemoryViewer::new();
        viewer.set_embed_base_url(Some("https://example.org/embed".into()));
        let code = viewer.embed_code(640, 480).unwrap();
        assert!(code.starts_with("<iframe"));
        assert!(code.contains("width=\"640\""));
        assert!(code.contains("height=\"480\""));
    }

    #[test]
    fn test_memory_clipboard_records_copies() {
        let clipboard = MemoryClipboard::new();
        assert_eq!(clipboard.last(), None);
        clipboard.copy("one");
        clipboard.copy("two");
        assert_eq!(clipboard.last().as_deref(), Some("two"));
        assert_eq!(clipboard.entries(), vec!["one", "two"]);
    }

    #[test]
    fn test_focus_log_records_history() {
        let focus = FocusLog::new();
        focus.focus(&ElementRef::new("a"));
        focus.focus(&ElementRef::new("b"));
        assert_eq!(focus.last(), Some(ElementRef::new("b")));
        assert_eq!(focus.history().len(), 2);
    }

    #[test]
    fn test_required_statement_deserialize() {
        let s: RequiredStatement = serde_json::from_str(r#"{"value":"Public domain"}"#).unwrap();
        assert_eq!(s, RequiredStatement::new("Public domain"));
    }
}
