//! Public types consumed by the host.
//!
//! A transport reports raw [`TransportEvent`]s through its [`EventSink`];
//! the session turns them into [`FailureEvent`]s for the failure policy,
//! which answers with a [`PolicyDirective`].

use std::fmt;

use tokio::sync::mpsc;

/// A raw signal from a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The channel reported an error but may still be usable.
    Error(String),
    /// The channel or the backend process went away.
    Closed,
}

/// A failure as seen by the failure policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureEvent {
    /// `count` is 1 for the first error of the session and increases by one
    /// with every error after it, across restarts.
    Error { message: String, count: u32 },
    Closed,
}

/// What the session should do about a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDirective {
    /// Keep the current transport running.
    Continue,
    /// Close the current transport and open a fresh one.
    Restart,
    /// Stop the session after an error.
    Shutdown,
    /// Stop the session after the transport closed.
    DoNotRestart,
}

impl PolicyDirective {
    /// Whether the directive ends the session.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Shutdown | Self::DoNotRestart)
    }
}

/// Observable lifecycle state of a client session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Starting,
    Running,
    Restarting,
    Stopped,
}

impl SessionState {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Restarting => "restarting",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A transport event tagged with the generation of the transport that sent it.
#[derive(Debug)]
pub(crate) struct Stamped {
    pub generation: u64,
    pub event: TransportEvent,
}

/// Where a transport reports its events.
///
/// Every transport a session opens gets a sink with a fresh generation, so
/// events from a superseded transport can be told apart and dropped.
#[derive(Debug, Clone)]
pub struct EventSink {
    generation: u64,
    tx: mpsc::Sender<Stamped>,
}

impl EventSink {
    pub(crate) fn new(generation: u64, tx: mpsc::Sender<Stamped>) -> Self {
        Self { generation, tx }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub async fn send(&self, event: TransportEvent) {
        let stamped = Stamped {
            generation: self.generation,
            event,
        };
        // The session may already be gone; nobody is left to tell.
        let _ = self.tx.send(stamped).await;
    }

    pub async fn error(&self, message: impl Into<String>) {
        self.send(TransportEvent::Error(message.into())).await;
    }

    pub async fn closed(&self) {
        self.send(TransportEvent::Closed).await;
    }
}
