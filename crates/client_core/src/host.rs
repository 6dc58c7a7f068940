//! Collaborators the controller receives at construction instead of reaching
//! for process-wide state.

use std::sync::Arc;

use async_trait::async_trait;
use shared::domain::Language;
use tokio::sync::watch;

use crate::messages::Messages;

/// Shell around the flow: asks the user to confirm a hard exit and leaves
/// the flow afterwards.
#[async_trait]
pub trait JourneyHost: Send + Sync {
    async fn confirm_exit(&self, prompt: &str) -> bool;
    fn leave_flow(&self);
}

/// Host that confirms every exit and has nowhere to navigate to.
pub struct HeadlessHost;

#[async_trait]
impl JourneyHost for HeadlessHost {
    async fn confirm_exit(&self, _prompt: &str) -> bool {
        true
    }

    fn leave_flow(&self) {}
}

#[derive(Clone)]
pub struct JourneyContext {
    language: watch::Receiver<Language>,
    host: Arc<dyn JourneyHost>,
}

impl JourneyContext {
    pub fn new(language: watch::Receiver<Language>, host: Arc<dyn JourneyHost>) -> Self {
        Self { language, host }
    }

    /// Context with a language that never changes.
    pub fn fixed(language: Language, host: Arc<dyn JourneyHost>) -> Self {
        let (tx, rx) = watch::channel(language);
        // Receiver keeps the last value after the sender is gone.
        drop(tx);
        Self::new(rx, host)
    }

    pub fn language(&self) -> Language {
        *self.language.borrow()
    }

    pub fn messages(&self) -> &'static Messages {
        Messages::for_language(self.language())
    }

    pub fn host(&self) -> &Arc<dyn JourneyHost> {
        &self.host
    }
}
