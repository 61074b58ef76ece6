//! Language client session for the Bond language server.
//!
//! A [`ClientSession`] owns at most one [`Transport`] at a time and routes
//! every transport failure through a [`FailurePolicy`].

pub mod codec;
pub mod policy;
pub mod types;

pub(crate) mod protocol;

mod session;
mod transport;

pub use policy::{CRASH_NOTICE, Decision, FailurePolicy};
pub use session::{ClientSession, Notifier, SessionError, StopHandle};
pub use transport::{Connector, StdioConnector, StdioTransport, Transport};
pub use types::{EventSink, FailureEvent, PolicyDirective, SessionState, TransportEvent};
