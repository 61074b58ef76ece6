//! ClientSession: the lifecycle the host drives.
//!
//! The host calls [`ClientSession::start`] and [`ClientSession::stop`] and
//! feeds the session from its event loop with [`ClientSession::next_event`]
//! or [`ClientSession::poll_events`]. Every transport failure goes through
//! the [`FailurePolicy`]; only a missing executable reaches the host as an
//! error.
//!
//! The live transport is stored inside the `Running` state, so there is
//! never more than one transport the session can reach.

use std::mem;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use bond_types::{BackendSettings, LocateError, SessionConfig};

use crate::policy::FailurePolicy;
use crate::transport::{Connector, Transport};
use crate::types::{EventSink, FailureEvent, PolicyDirective, SessionState, Stamped, TransportEvent};

/// Channel capacity for events flowing from transports to the session.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Receives the user-visible notices a session raises.
pub trait Notifier {
    /// Fire-and-forget.
    fn notify_error(&self, message: &str);
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Locate(#[from] LocateError),
    #[error("session already stopped; construct a new session to start again")]
    Stopped,
}

/// Requests a stop from outside the call that is driving the session.
///
/// A stop requested while a transport is opening cancels the open.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    #[must_use]
    pub fn is_stop_requested(&self) -> bool {
        *self.tx.borrow()
    }
}

enum Lifecycle<T> {
    Idle,
    Starting,
    Running { transport: T },
    Restarting,
    Stopped,
}

impl<T> Lifecycle<T> {
    fn state(&self) -> SessionState {
        match self {
            Self::Idle => SessionState::Idle,
            Self::Starting => SessionState::Starting,
            Self::Running { .. } => SessionState::Running,
            Self::Restarting => SessionState::Restarting,
            Self::Stopped => SessionState::Stopped,
        }
    }
}

enum OpenOutcome {
    Opened,
    Failed,
    Cancelled,
}

/// One logical client lifetime: at most one transport at a time, one
/// failure policy, and a terminal `Stopped` state.
pub struct ClientSession<C: Connector, N: Notifier> {
    settings: BackendSettings,
    config: Option<SessionConfig>,
    policy: Option<FailurePolicy>,
    connector: C,
    notifier: N,
    lifecycle: Lifecycle<C::Transport>,
    /// Generation of the most recently opened transport.
    generation: u64,
    /// Errors seen so far in this session, across restarts.
    error_count: u32,
    event_tx: mpsc::Sender<Stamped>,
    event_rx: mpsc::Receiver<Stamped>,
    stop_tx: Arc<watch::Sender<bool>>,
    stop_rx: watch::Receiver<bool>,
}

impl<C: Connector, N: Notifier> ClientSession<C, N> {
    /// Construct an idle session. Nothing is resolved or spawned until
    /// [`start`](Self::start).
    pub fn new(settings: BackendSettings, connector: C, notifier: N) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (stop_tx, stop_rx) = watch::channel(false);
        Self {
            settings,
            config: None,
            policy: None,
            connector,
            notifier,
            lifecycle: Lifecycle::Idle,
            generation: 0,
            error_count: 0,
            event_tx,
            event_rx,
            stop_tx: Arc::new(stop_tx),
            stop_rx,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.lifecycle.state()
    }

    /// The resolved configuration, once `start` has located the backend.
    #[must_use]
    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    #[must_use]
    pub fn policy(&self) -> Option<FailurePolicy> {
        self.policy
    }

    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            tx: Arc::clone(&self.stop_tx),
        }
    }

    /// Locate the backend and open the first transport.
    ///
    /// A no-op while starting or running. Transport failures during the
    /// open are handled by the failure policy and do not surface here.
    pub async fn start(&mut self) -> Result<(), SessionError> {
        match self.lifecycle {
            Lifecycle::Idle => {}
            Lifecycle::Stopped => return Err(SessionError::Stopped),
            Lifecycle::Starting | Lifecycle::Running { .. } | Lifecycle::Restarting => {
                tracing::debug!(state = %self.state(), "Session already started");
                return Ok(());
            }
        }

        let config = match self.settings.locate() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Cannot start language client: {e}");
                self.notifier.notify_error(&e.to_string());
                self.lifecycle = Lifecycle::Stopped;
                return Err(e.into());
            }
        };

        let policy = FailurePolicy::for_config(&config);
        tracing::info!(
            executable = config.executable_path(),
            policy = policy.name(),
            "Starting language client"
        );
        self.config = Some(config);
        self.policy = Some(policy);

        self.connect().await;
        Ok(())
    }

    /// Stop the session, closing any live transport. Idempotent.
    pub async fn stop(&mut self) {
        self.stop_tx.send_replace(true);
        match mem::replace(&mut self.lifecycle, Lifecycle::Stopped) {
            Lifecycle::Stopped => {}
            Lifecycle::Running { transport } => {
                tracing::info!(generation = self.generation, "Stopping language client");
                transport.close().await;
            }
            Lifecycle::Idle | Lifecycle::Starting | Lifecycle::Restarting => {
                tracing::info!("Language client stopped before it was running");
            }
        }
    }

    /// Wait for the next transport event (or a stop request) and act on it.
    ///
    /// Returns immediately unless the session is running.
    pub async fn next_event(&mut self) -> SessionState {
        if !matches!(self.lifecycle, Lifecycle::Running { .. }) {
            return self.state();
        }

        let mut stop_rx = self.stop_rx.clone();
        let received = tokio::select! {
            biased;
            _ = stop_rx.wait_for(|stopped| *stopped) => None,
            stamped = self.event_rx.recv() => stamped,
        };

        match received {
            Some(stamped) => self.dispatch(stamped).await,
            None => self.stop().await,
        }
        self.state()
    }

    /// Act on already-queued events, up to `budget`, without waiting.
    pub async fn poll_events(&mut self, budget: usize) -> usize {
        if *self.stop_rx.borrow() {
            self.stop().await;
            return 0;
        }

        let mut count = 0;
        while count < budget {
            match self.event_rx.try_recv() {
                Ok(stamped) => {
                    self.dispatch(stamped).await;
                    count += 1;
                }
                Err(mpsc::error::TryRecvError::Empty | mpsc::error::TryRecvError::Disconnected) => {
                    break;
                }
            }
        }
        count
    }

    /// Process events until the session stops.
    pub async fn run(&mut self) {
        while matches!(self.lifecycle, Lifecycle::Running { .. }) {
            self.next_event().await;
        }
        if !matches!(self.lifecycle, Lifecycle::Stopped) {
            self.stop().await;
        }
    }

    async fn dispatch(&mut self, stamped: Stamped) {
        let current = stamped.generation == self.generation
            && matches!(self.lifecycle, Lifecycle::Running { .. });
        if !current {
            tracing::trace!(
                generation = stamped.generation,
                current = self.generation,
                event = ?stamped.event,
                "Discarding event from superseded transport"
            );
            return;
        }

        let event = match stamped.event {
            TransportEvent::Error(message) => {
                self.error_count = self.error_count.saturating_add(1);
                FailureEvent::Error {
                    message,
                    count: self.error_count,
                }
            }
            TransportEvent::Closed => FailureEvent::Closed,
        };
        self.handle_failure(event).await;
    }

    async fn handle_failure(&mut self, event: FailureEvent) {
        let directive = self.decide(&event);
        if directive == PolicyDirective::Continue {
            return;
        }

        let terminal = directive.is_terminal();
        let next = if terminal {
            Lifecycle::Stopped
        } else {
            Lifecycle::Restarting
        };
        if let Lifecycle::Running { transport } = mem::replace(&mut self.lifecycle, next) {
            transport.close().await;
        }

        if terminal {
            tracing::info!("Language client stopped by failure policy");
        } else {
            tracing::info!(generation = self.generation, "Restarting language server");
            self.connect().await;
        }
    }

    /// Evaluate the policy and raise its notice, if any.
    fn decide(&self, event: &FailureEvent) -> PolicyDirective {
        let Some(policy) = self.policy else {
            return PolicyDirective::DoNotRestart;
        };
        let decision = policy.evaluate(event);
        match event {
            FailureEvent::Error { message, count } => tracing::warn!(
                count,
                directive = ?decision.directive,
                "Language server error: {message}"
            ),
            FailureEvent::Closed => tracing::warn!(
                directive = ?decision.directive,
                "Language server connection closed"
            ),
        }
        if let Some(notice) = decision.notice {
            self.notifier.notify_error(notice);
        }
        decision.directive
    }

    /// Open transports until one is running, the policy gives up, or a stop
    /// is requested.
    async fn connect(&mut self) {
        loop {
            match self.open_transport().await {
                OpenOutcome::Opened => return,
                OpenOutcome::Cancelled => {
                    tracing::info!("Language server start cancelled");
                    self.lifecycle = Lifecycle::Stopped;
                    return;
                }
                OpenOutcome::Failed => {
                    if self.decide(&FailureEvent::Closed) == PolicyDirective::Restart {
                        self.lifecycle = Lifecycle::Restarting;
                        continue;
                    }
                    self.lifecycle = Lifecycle::Stopped;
                    return;
                }
            }
        }
    }

    async fn open_transport(&mut self) -> OpenOutcome {
        let Some(config) = self.config.as_ref() else {
            return OpenOutcome::Failed;
        };

        self.lifecycle = Lifecycle::Starting;
        self.generation += 1;
        let generation = self.generation;
        let sink = EventSink::new(generation, self.event_tx.clone());
        let mut stop_rx = self.stop_rx.clone();

        let result = tokio::select! {
            biased;
            _ = stop_rx.wait_for(|stopped| *stopped) => None,
            result = self.connector.open(config, sink) => Some(result),
        };

        match result {
            None => OpenOutcome::Cancelled,
            Some(Ok(transport)) => {
                tracing::info!(generation, "Language server running");
                self.lifecycle = Lifecycle::Running { transport };
                OpenOutcome::Opened
            }
            Some(Err(e)) => {
                tracing::warn!(generation, "Failed to open language server: {e:#}");
                OpenOutcome::Failed
            }
        }
    }
}
