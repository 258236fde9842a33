//! Typed command bus shared by the viewer's UI components.
//!
//! The viewer shell and the panels talk to each other by publishing
//! [`Command`]s. Components register synchronous handlers per
//! [`CommandKind`] and the bus fans each published command out to them in
//! subscription order. Every command is also mirrored to a broadcast channel
//! so observers (logging, the demo binary, tests) can watch the traffic
//! without registering handlers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::{ElementRef, Timestamp};

/// Default buffer size of the observer broadcast channel.
pub const DEFAULT_OBSERVER_CAPACITY: usize = 256;

/// All commands that can be published on the viewer bus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Command {
    // =========================================================================
    // Share dialogue
    // =========================================================================
    /// Open the share dialogue. `trigger` is the element that requested it.
    ShowShareDialogue { trigger: Option<ElementRef> },

    /// Close the share dialogue.
    HideShareDialogue,

    /// Open the share dialogue focused on its embed section.
    ShowEmbedDialogue { trigger: Option<ElementRef> },

    // =========================================================================
    // Terms of use
    // =========================================================================
    /// Ask the shell to display the resource's terms of use.
    ShowTermsOfUse,
}

/// Payload-free discriminant of [`Command`], used as the subscription key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum CommandKind {
    ShowShareDialogue,
    HideShareDialogue,
    ShowEmbedDialogue,
    ShowTermsOfUse,
}

impl CommandKind {
    /// Stable snake_case name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::ShowShareDialogue => "show_share_dialogue",
            CommandKind::HideShareDialogue => "hide_share_dialogue",
            CommandKind::ShowEmbedDialogue => "show_embed_dialogue",
            CommandKind::ShowTermsOfUse => "show_terms_of_use",
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::ShowShareDialogue { .. } => CommandKind::ShowShareDialogue,
            Command::HideShareDialogue => CommandKind::HideShareDialogue,
            Command::ShowEmbedDialogue { .. } => CommandKind::ShowEmbedDialogue,
            Command::ShowTermsOfUse => CommandKind::ShowTermsOfUse,
        }
    }

    /// Returns a human-readable command name for logging.
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// The element that triggered the command, for commands that carry one.
    pub fn trigger(&self) -> Option<&ElementRef> {
        match self {
            Command::ShowShareDialogue { trigger } | Command::ShowEmbedDialogue { trigger } => {
                trigger.as_ref()
            }
            Command::HideShareDialogue | Command::ShowTermsOfUse => None,
        }
    }
}

/// A published command as seen by bus observers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub command: Command,
    pub published_at: Timestamp,
}

/// Handler invoked synchronously for every published command of one kind.
pub type CommandHandler = Arc<dyn Fn(&Command) + Send + Sync>;

struct BusInner {
    handlers: Mutex<HashMap<CommandKind, Vec<CommandHandler>>>,
    observers: broadcast::Sender<CommandEnvelope>,
}

/// Publish/subscribe bus injected into every UI component.
///
/// Cloning is cheap and every clone shares the same subscriptions.
/// Subscriptions live as long as the bus; components that must not be kept
/// alive by their handlers capture a `Weak` reference to themselves.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.inner.handlers.lock().expect("bus mutex poisoned");
        let counts: HashMap<CommandKind, usize> =
            handlers.iter().map(|(k, v)| (*k, v.len())).collect();
        f.debug_struct("EventBus")
            .field("handlers", &counts)
            .field("observers", &self.inner.observers.receiver_count())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_observer_capacity(DEFAULT_OBSERVER_CAPACITY)
    }

    /// Create a bus whose observer channel buffers `capacity` commands.
    /// Observers that fall further behind lose the oldest commands.
    pub fn with_observer_capacity(capacity: usize) -> Self {
        let (observers, _) = broadcast::channel(capacity.max(1));
        Self {
            inner: Arc::new(BusInner {
                handlers: Mutex::new(HashMap::new()),
                observers,
            }),
        }
    }

    /// Register `handler` for every future command of `kind`.
    pub fn subscribe<F>(&self, kind: CommandKind, handler: F)
    where
        F: Fn(&Command) + Send + Sync + 'static,
    {
        let mut handlers = self.inner.handlers.lock().expect("bus mutex poisoned");
        handlers.entry(kind).or_default().push(Arc::new(handler));
        tracing::debug!(command = kind.name(), "Subscribed to command");
    }

    /// Number of handlers registered for `kind`.
    pub fn subscriber_count(&self, kind: CommandKind) -> usize {
        let handlers = self.inner.handlers.lock().expect("bus mutex poisoned");
        handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Mirror `command` to observers, then deliver it to its handlers.
    ///
    /// Observers see commands in publish order: a command published from
    /// inside a handler arrives after the command that triggered it.
    /// Handlers run on the caller's thread, in subscription order, without the
    /// subscription table locked, so a handler may publish or subscribe.
    /// Returns the number of handlers invoked.
    pub fn publish(&self, command: Command) -> usize {
        let kind = command.kind();
        let targets: Vec<CommandHandler> = {
            let handlers = self.inner.handlers.lock().expect("bus mutex poisoned");
            handlers.get(&kind).cloned().unwrap_or_default()
        };

        tracing::debug!(
            command = kind.name(),
            handlers = targets.len(),
            "Publishing command"
        );

        // No observers is not an error.
        let _ = self.inner.observers.send(CommandEnvelope {
            command: command.clone(),
            published_at: Timestamp::now(),
        });

        for handler in &targets {
            handler(&command);
        }

        targets.len()
    }

    /// Observe every command published from now on.
    pub fn watch(&self) -> broadcast::Receiver<CommandEnvelope> {
        self.inner.observers.subscribe()
    }
}
