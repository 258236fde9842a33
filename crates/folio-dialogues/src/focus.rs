//! One-shot deferred focus shift.
//!
//! Opening a dialogue animates asynchronously, so a focus change requested
//! at open time is applied a few milliseconds later on the tokio runtime.
//! The owner cancels it on close and on drop, so a late task never focuses a
//! field that is no longer visible.

use std::sync::Arc;
use std::time::Duration;

use folio_core::types::ElementRef;
use tokio::task::AbortHandle;

use crate::providers::FocusService;

/// Default delay between opening a dialogue and moving focus inside it.
pub const DEFAULT_FOCUS_DELAY: Duration = Duration::from_millis(2);

/// At most one pending focus task.
#[derive(Debug)]
pub struct DeferredFocus {
    delay: Duration,
    pending: Option<AbortHandle>,
}

impl Default for DeferredFocus {
    fn default() -> Self {
        Self::new(DEFAULT_FOCUS_DELAY)
    }
}

impl DeferredFocus {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Focus `target` after the delay, replacing any pending shift.
    ///
    /// Outside a tokio runtime there is nothing to defer onto, so the focus
    /// moves immediately. Returns `true` if the shift was deferred.
    pub fn schedule(&mut self, focus: Arc<dyn FocusService>, target: ElementRef) -> bool {
        self.cancel();

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let delay = self.delay;
                let task = runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    focus.focus(&target);
                });
                self.pending = Some(task.abort_handle());
                true
            }
            Err(_) => {
                tracing::debug!(element = %target, "No runtime for deferred focus, focusing now");
                focus.focus(&target);
                false
            }
        }
    }

    /// Abort the pending shift. Returns `true` if one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                tracing::debug!("Deferred focus cancelled");
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for DeferredFocus {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::FocusLog;

    fn target() -> ElementRef {
        ElementRef::new("embedCode")
    }

    #[test]
    fn test_without_runtime_focuses_immediately() {
        let log = Arc::new(FocusLog::new());
        let mut deferred = DeferredFocus::default();
        assert_eq!(deferred.delay(), Duration::from_millis(2));

        assert!(!deferred.schedule(log.clone(), target()));
        assert_eq!(log.last(), Some(target()));
        assert!(!deferred.is_pending());
        assert!(!deferred.cancel());
    }

    #[tokio::test]
    async fn test_focus_applies_after_delay() {
        let log = Arc::new(FocusLog::new());
        let mut deferred = DeferredFocus::new(Duration::from_millis(10));

        assert!(deferred.schedule(log.clone(), target()));
        assert!(log.history().is_empty());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(log.history(), vec![target()]);
        assert!(!deferred.is_pending());
    }

    #[tokio::test]
    async fn test_cancel_prevents_focus() {
        let log = Arc::new(FocusLog::new());
        let mut deferred = DeferredFocus::new(Duration::from_millis(50));

        deferred.schedule(log.clone(), target());
        assert!(deferred.is_pending());
        assert!(deferred.cancel());
        assert!(!deferred.is_pending());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(log.history().is_empty());
    }

    #[tokio::test]
    async fn test_reschedule_replaces_pending() {
        let log = Arc::new(FocusLog::new());
        let mut deferred = DeferredFocus::new(Duration::from_millis(30));

        deferred.schedule(log.clone(), ElementRef::new("first"));
        deferred.schedule(log.clone(), ElementRef::new("second"));

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(log.history(), vec![ElementRef::new("second")]);
    }

    #[tokio::test]
    async fn test_drop_cancels() {
        let log = Arc::new(FocusLog::new());
        {
            let mut deferred = DeferredFocus::new(Duration::from_millis(30));
            deferred.schedule(log.clone(), target());
        }
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(log.history().is_empty());
    }
}
