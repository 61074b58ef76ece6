//! Failure policy: decides what a session does when its transport fails.
//!
//! Evaluation is a pure function of the policy variant and the event, so
//! every decision can be checked without a backend process.

use bond_types::{RecoverySettings, SessionConfig};

use crate::types::{FailureEvent, PolicyDirective};

/// Shown when the transport closes and the session gives up.
pub const CRASH_NOTICE: &str = "The Bond language server has crashed";

/// Policy variant, selected once from the session configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Fail fast: the first error shuts the session down.
    Strict,
    /// Tolerate errors per the recovery settings.
    Default(RecoverySettings),
}

/// Outcome of evaluating a failure: a directive and an optional user notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub directive: PolicyDirective,
    pub notice: Option<&'static str>,
}

impl Decision {
    fn silent(directive: PolicyDirective) -> Self {
        Self {
            directive,
            notice: None,
        }
    }
}

impl FailurePolicy {
    #[must_use]
    pub fn for_config(config: &SessionConfig) -> Self {
        if config.fail_fast() {
            Self::Strict
        } else {
            Self::Default(config.recovery())
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Default(_) => "default",
        }
    }

    #[must_use]
    pub fn evaluate(&self, event: &FailureEvent) -> Decision {
        match (self, event) {
            (_, FailureEvent::Closed) => Decision {
                directive: PolicyDirective::DoNotRestart,
                notice: Some(CRASH_NOTICE),
            },
            (Self::Strict, FailureEvent::Error { .. }) => {
                Decision::silent(PolicyDirective::Shutdown)
            }
            (Self::Default(recovery), FailureEvent::Error { count, .. }) => {
                let directive = if *count <= recovery.error_tolerance {
                    PolicyDirective::Continue
                } else if recovery.restart_on_error {
                    PolicyDirective::Restart
                } else {
                    PolicyDirective::Shutdown
                };
                Decision::silent(directive)
            }
        }
    }
}
