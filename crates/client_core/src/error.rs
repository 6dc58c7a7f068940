//! Error types the controller hands back to its callers.

use thiserror::Error;

use crate::journey::{JourneyAction, JourneyStep};
use crate::session::SafetyScoreError;

/// Failures the user gets to see, each with a localized message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JourneyErrorKind {
    StartFailed,
    ResumeFailed,
    SubmitFailed,
    ActivationSaveFailed,
    IncompleteAnswers,
    MissingSafetyScore,
    MissingActivation,
}

impl JourneyErrorKind {
    pub const ALL: [JourneyErrorKind; 7] = [
        JourneyErrorKind::StartFailed,
        JourneyErrorKind::ResumeFailed,
        JourneyErrorKind::SubmitFailed,
        JourneyErrorKind::ActivationSaveFailed,
        JourneyErrorKind::IncompleteAnswers,
        JourneyErrorKind::MissingSafetyScore,
        JourneyErrorKind::MissingActivation,
    ];

    /// Local validation failures never reach the network.
    pub fn is_local(self) -> bool {
        matches!(
            self,
            JourneyErrorKind::IncompleteAnswers
                | JourneyErrorKind::MissingSafetyScore
                | JourneyErrorKind::MissingActivation
        )
    }
}

#[derive(Debug, Error)]
pub enum JourneyError {
    #[error("{kind:?}")]
    Surfaced {
        kind: JourneyErrorKind,
        #[source]
        source: Option<anyhow::Error>,
    },
    #[error("{action:?} is not available on the {step:?} step")]
    NotAllowed {
        action: JourneyAction,
        step: JourneyStep,
    },
    #[error("an answer is already advancing to the next scenario")]
    AdvancePending,
    #[error("another journey request is still in flight")]
    Busy,
    #[error(transparent)]
    InvalidSafetyScore(#[from] SafetyScoreError),
    #[error("option '{option_code}' does not belong to scenario '{scenario_code}'")]
    UnknownOption {
        scenario_code: String,
        option_code: String,
    },
    #[error("activation '{0}' is not one of the offered items")]
    UnknownActivation(String),
    #[error("journey was reset while the request was in flight")]
    Superseded,
}

impl JourneyError {
    pub fn kind(&self) -> Option<JourneyErrorKind> {
        match self {
            JourneyError::Surfaced { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
