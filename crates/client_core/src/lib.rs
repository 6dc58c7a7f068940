//! Client-side core of the persona journey: the flow controller, the remote
//! journey service seam, and the domain records it owns for one attempt.

pub mod answers;
pub mod config;
pub mod error;
pub mod host;
pub mod journey;
pub mod messages;
pub mod session;
pub mod transport;
pub mod view;

pub use answers::AnswerSet;
pub use config::{load_settings, ClientSettings};
pub use error::{JourneyError, JourneyErrorKind};
pub use host::{HeadlessHost, JourneyContext, JourneyHost};
pub use journey::{
    AdvisoryCall, JourneyAction, JourneyController, JourneyEvent, JourneyOptions, JourneyStep,
};
pub use messages::Messages;
pub use session::{JourneySession, SafetyScore, SubmissionResult};
pub use transport::{HttpJourneyService, JourneyService};
pub use view::JourneyView;
