//! Journey flow controller.
//!
//! One journey attempt moves through a closed set of steps. All state sits
//! behind a single mutex that is never held across a remote call; an epoch
//! counter lets late responses notice that the attempt they belong to was
//! reset in the meantime.

use std::{future::Future, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use shared::{
    domain::TestRunId,
    protocol::{
        JourneyCancelRequest, JourneyFeedbackRequest, JourneyResumeRequest, JourneyStartRequest,
        JourneyStartResponse, JourneySubmitAnswersRequest,
    },
};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    answers::AnswerSet,
    config::{ClientSettings, DEFAULT_AUTO_ADVANCE_DELAY_MS},
    error::{JourneyError, JourneyErrorKind},
    host::JourneyContext,
    session::{JourneySession, SafetyScore, SubmissionResult},
    transport::JourneyService,
    view::JourneyView,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JourneyStep {
    Intro,
    Prep,
    Scenarios,
    Safety,
    Loading,
    Results,
    Activation,
    Closing,
}

impl JourneyStep {
    /// Steps from which the user may abandon the journey.
    pub fn can_exit(self) -> bool {
        !matches!(self, JourneyStep::Intro | JourneyStep::Closing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JourneyAction {
    Proceed,
    Resume,
    SelectOption,
    SelectSafetyScore,
    SelectActivation,
    Finalize,
    Exit,
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdvisoryCall {
    /// Judged score recorded when results first arrive.
    ResultsFeedback,
    /// Cancellation of an abandoned test run.
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JourneyEvent {
    StepChanged { from: JourneyStep, to: JourneyStep },
    ScenarioAdvanced { index: usize, total: usize },
    ErrorRaised(JourneyErrorKind),
    AdvisoryFinished { call: AdvisoryCall, succeeded: bool },
    Reset,
}

#[derive(Debug, Clone)]
pub struct JourneyOptions {
    pub auto_advance_delay: Duration,
    /// Question-set version to request; the service picks one when absent.
    pub version_id: Option<String>,
}

impl Default for JourneyOptions {
    fn default() -> Self {
        Self {
            auto_advance_delay: Duration::from_millis(DEFAULT_AUTO_ADVANCE_DELAY_MS),
            version_id: None,
        }
    }
}

impl JourneyOptions {
    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self {
            auto_advance_delay: settings.auto_advance_delay(),
            version_id: None,
        }
    }
}

pub(crate) struct JourneyState {
    pub(crate) epoch: u64,
    pub(crate) step: JourneyStep,
    pub(crate) session: Option<JourneySession>,
    pub(crate) answers: AnswerSet,
    pub(crate) cursor: usize,
    pub(crate) judged_score: Option<SafetyScore>,
    pub(crate) result: Option<SubmissionResult>,
    pub(crate) selected_activation: Option<String>,
    /// Start, resume or finalize request in flight.
    pub(crate) busy: bool,
    /// Present while an answered scenario waits to move on.
    pub(crate) pending_advance: Option<JoinHandle<()>>,
    pub(crate) error: Option<JourneyErrorKind>,
}

impl JourneyState {
    fn fresh(epoch: u64) -> Self {
        Self {
            epoch,
            step: JourneyStep::Intro,
            session: None,
            answers: AnswerSet::new(),
            cursor: 0,
            judged_score: None,
            result: None,
            selected_activation: None,
            busy: false,
            pending_advance: None,
            error: None,
        }
    }

    fn ensure_step(&self, expected: JourneyStep, action: JourneyAction) -> Result<(), JourneyError> {
        if self.step == expected {
            Ok(())
        } else {
            debug!(step = ?self.step, ?action, "journey: ignoring action outside its step");
            Err(JourneyError::NotAllowed {
                action,
                step: self.step,
            })
        }
    }

    fn cancel_pending_advance(&mut self) {
        if let Some(handle) = self.pending_advance.take() {
            handle.abort();
        }
    }
}

pub struct JourneyController {
    service: Arc<dyn JourneyService>,
    context: JourneyContext,
    options: JourneyOptions,
    inner: Mutex<JourneyState>,
    events: broadcast::Sender<JourneyEvent>,
}

impl JourneyController {
    pub fn new(
        service: Arc<dyn JourneyService>,
        context: JourneyContext,
        options: JourneyOptions,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            service,
            context,
            options,
            inner: Mutex::new(JourneyState::fresh(0)),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<JourneyEvent> {
        self.events.subscribe()
    }

    pub fn context(&self) -> &JourneyContext {
        &self.context
    }

    pub async fn step(&self) -> JourneyStep {
        self.inner.lock().await.step
    }

    pub async fn view(&self) -> JourneyView {
        let state = self.inner.lock().await;
        JourneyView::build(&state, self.context.language())
    }

    /// Moves forward from Intro, Prep, Safety or Results. Prep starts a new
    /// journey and Safety submits the collected answers.
    pub async fn proceed(self: &Arc<Self>) -> Result<JourneyStep, JourneyError> {
        let step = self.step().await;
        match step {
            JourneyStep::Intro => self.leave_intro().await,
            JourneyStep::Prep => self.open_session(None).await,
            JourneyStep::Safety => self.submit_answers().await,
            JourneyStep::Results => self.open_activation().await,
            other => {
                debug!(step = ?other, "journey: proceed has no meaning here");
                Err(JourneyError::NotAllowed {
                    action: JourneyAction::Proceed,
                    step: other,
                })
            }
        }
    }

    /// Re-opens a test run that was started earlier. The service does not
    /// return earlier answers, so the traversal begins again at the first
    /// scenario.
    pub async fn resume(self: &Arc<Self>, test_run_id: TestRunId) -> Result<JourneyStep, JourneyError> {
        self.open_session(Some(test_run_id)).await
    }

    pub async fn select_option(self: &Arc<Self>, option_code: &str) -> Result<JourneyStep, JourneyError> {
        let mut guard = self.inner.lock().await;
        let state = &mut *guard;
        state.ensure_step(JourneyStep::Scenarios, JourneyAction::SelectOption)?;
        if state.pending_advance.is_some() {
            debug!(option_code, "journey: selection ignored while advancing");
            return Err(JourneyError::AdvancePending);
        }

        let Some(scenario) = state
            .session
            .as_ref()
            .and_then(|session| session.scenario(state.cursor))
        else {
            return Err(JourneyError::NotAllowed {
                action: JourneyAction::SelectOption,
                step: state.step,
            });
        };
        if !scenario.has_option(option_code) {
            return Err(JourneyError::UnknownOption {
                scenario_code: scenario.code.clone(),
                option_code: option_code.to_string(),
            });
        }

        let scenario_code = scenario.code.clone();
        debug!(scenario_code = %scenario_code, option_code, cursor = state.cursor, "journey: answer recorded");
        state.answers.record(scenario_code, option_code);
        state.error = None;
        state.pending_advance = Some(self.schedule_advance(state.epoch));
        Ok(JourneyStep::Scenarios)
    }

    pub async fn select_safety_score(&self, value: u8) -> Result<JourneyStep, JourneyError> {
        let mut state = self.inner.lock().await;
        state.ensure_step(JourneyStep::Safety, JourneyAction::SelectSafetyScore)?;
        let score = SafetyScore::new(value)?;
        state.judged_score = Some(score);
        state.error = None;
        Ok(JourneyStep::Safety)
    }

    pub async fn select_activation(&self, advice_id: &str) -> Result<JourneyStep, JourneyError> {
        let mut state = self.inner.lock().await;
        state.ensure_step(JourneyStep::Activation, JourneyAction::SelectActivation)?;
        let offered = state
            .result
            .as_ref()
            .is_some_and(|result| result.activation_item(advice_id).is_some());
        if !offered {
            return Err(JourneyError::UnknownActivation(advice_id.to_string()));
        }
        state.selected_activation = Some(advice_id.to_string());
        state.error = None;
        Ok(JourneyStep::Activation)
    }

    /// Records the chosen activation and closes the journey. Without a
    /// submission result there is nothing to attribute, so the journey
    /// closes without contacting the service.
    pub async fn finalize(&self) -> Result<JourneyStep, JourneyError> {
        let (epoch, request) = {
            let mut guard = self.inner.lock().await;
            let state = &mut *guard;
            state.ensure_step(JourneyStep::Activation, JourneyAction::Finalize)?;
            if state.busy {
                return Err(JourneyError::Busy);
            }

            let scored = match (&state.session, state.judged_score, &state.result) {
                (Some(session), Some(score), Some(_)) => Some((session.test_run_id(), score)),
                _ => None,
            };
            let Some((test_run_id, score)) = scored else {
                info!("journey: closing without a scored submission");
                self.set_step(state, JourneyStep::Closing);
                return Ok(JourneyStep::Closing);
            };
            let Some(selected) = state.selected_activation.clone() else {
                return Err(self.raise(state, JourneyErrorKind::MissingActivation, None));
            };

            state.busy = true;
            state.error = None;
            (
                state.epoch,
                JourneyFeedbackRequest {
                    test_run_id,
                    judged_score: score.value(),
                    selected_activation_id: Some(selected),
                },
            )
        };

        let test_run_id = request.test_run_id;
        let response = self.service.submit_feedback(request).await;

        let mut guard = self.inner.lock().await;
        let state = &mut *guard;
        if state.epoch != epoch {
            debug!(%test_run_id, "journey: dropping activation response for a reset journey");
            return Err(JourneyError::Superseded);
        }
        state.busy = false;

        match response {
            Ok(response) => {
                info!(%test_run_id, status = %response.status, "journey: activation recorded");
                self.set_step(state, JourneyStep::Closing);
                Ok(JourneyStep::Closing)
            }
            Err(err) => {
                warn!(%test_run_id, "journey: activation feedback failed: {err:#}");
                Err(self.raise(state, JourneyErrorKind::ActivationSaveFailed, Some(err)))
            }
        }
    }

    /// Abandons the journey after the host confirms. The cancel notification
    /// is best-effort and does not hold up leaving the flow.
    pub async fn request_exit(&self) -> Result<JourneyStep, JourneyError> {
        let step = self.step().await;
        if !step.can_exit() {
            return Err(JourneyError::NotAllowed {
                action: JourneyAction::Exit,
                step,
            });
        }

        let host = Arc::clone(self.context.host());
        if !host.confirm_exit(self.context.messages().exit_confirm).await {
            debug!(?step, "journey: exit declined");
            return Ok(self.step().await);
        }

        let abandoned = {
            let mut guard = self.inner.lock().await;
            let state = &mut *guard;
            if !state.step.can_exit() {
                return Err(JourneyError::NotAllowed {
                    action: JourneyAction::Exit,
                    step: state.step,
                });
            }
            let abandoned = state.session.as_ref().map(JourneySession::test_run_id);
            self.reset(state);
            abandoned
        };

        if let Some(test_run_id) = abandoned {
            info!(%test_run_id, "journey: abandoned by user");
            self.spawn_cancel(test_run_id);
        }
        host.leave_flow();
        Ok(JourneyStep::Intro)
    }

    pub async fn restart(&self) -> Result<JourneyStep, JourneyError> {
        let mut guard = self.inner.lock().await;
        let state = &mut *guard;
        state.ensure_step(JourneyStep::Closing, JourneyAction::Restart)?;
        self.reset(state);
        Ok(JourneyStep::Intro)
    }

    async fn leave_intro(&self) -> Result<JourneyStep, JourneyError> {
        let mut guard = self.inner.lock().await;
        let state = &mut *guard;
        state.ensure_step(JourneyStep::Intro, JourneyAction::Proceed)?;
        self.set_step(state, JourneyStep::Prep);
        Ok(JourneyStep::Prep)
    }

    async fn open_activation(&self) -> Result<JourneyStep, JourneyError> {
        let mut guard = self.inner.lock().await;
        let state = &mut *guard;
        state.ensure_step(JourneyStep::Results, JourneyAction::Proceed)?;
        if state.result.is_none() {
            return Err(JourneyError::NotAllowed {
                action: JourneyAction::Proceed,
                step: state.step,
            });
        }
        self.set_step(state, JourneyStep::Activation);
        Ok(JourneyStep::Activation)
    }

    async fn open_session(
        self: &Arc<Self>,
        resume_from: Option<TestRunId>,
    ) -> Result<JourneyStep, JourneyError> {
        let (action, failure) = match resume_from {
            Some(_) => (JourneyAction::Resume, JourneyErrorKind::ResumeFailed),
            None => (JourneyAction::Proceed, JourneyErrorKind::StartFailed),
        };

        let epoch = {
            let mut state = self.inner.lock().await;
            state.ensure_step(JourneyStep::Prep, action)?;
            if state.busy {
                return Err(JourneyError::Busy);
            }
            state.busy = true;
            state.error = None;
            state.epoch
        };

        let response = match resume_from {
            Some(test_run_id) => self
                .service
                .resume(JourneyResumeRequest { test_run_id })
                .await
                .with_context(|| format!("failed to resume test run {test_run_id}")),
            None => self
                .service
                .start(JourneyStartRequest {
                    version_id: self.options.version_id.clone(),
                })
                .await
                .context("failed to start journey"),
        };

        let mut guard = self.inner.lock().await;
        let state = &mut *guard;
        if state.epoch != epoch {
            drop(guard);
            if let Ok(response) = &response {
                if resume_from.is_none() {
                    info!(test_run_id = %response.test_run_id, "journey: cancelling run started after exit");
                    self.spawn_cancel(response.test_run_id);
                }
            }
            return Err(JourneyError::Superseded);
        }
        state.busy = false;

        match response.and_then(session_from_response) {
            Ok(session) => {
                info!(
                    test_run_id = %session.test_run_id(),
                    version_id = session.version_id(),
                    scenarios = session.len(),
                    "journey: session opened"
                );
                state.session = Some(session);
                state.answers.clear();
                state.cursor = 0;
                state.judged_score = None;
                state.result = None;
                state.selected_activation = None;
                state.cancel_pending_advance();
                self.set_step(state, JourneyStep::Scenarios);
                Ok(JourneyStep::Scenarios)
            }
            Err(err) => {
                warn!("journey: could not open session: {err:#}");
                Err(self.raise(state, failure, Some(err)))
            }
        }
    }

    async fn submit_answers(&self) -> Result<JourneyStep, JourneyError> {
        let (epoch, request, score) = {
            let mut guard = self.inner.lock().await;
            let state = &mut *guard;
            state.ensure_step(JourneyStep::Safety, JourneyAction::Proceed)?;
            let Some(score) = state.judged_score else {
                return Err(self.raise(state, JourneyErrorKind::MissingSafetyScore, None));
            };
            let Some(session) = state.session.as_ref() else {
                return Err(JourneyError::NotAllowed {
                    action: JourneyAction::Proceed,
                    step: state.step,
                });
            };

            let request = match state.answers.to_submissions(session) {
                Ok(answers) => JourneySubmitAnswersRequest {
                    version_id: session.version_id().to_string(),
                    test_run_id: session.test_run_id(),
                    answers,
                },
                Err(err) => {
                    warn!("journey: refusing to submit incomplete answers: {err}");
                    state.cursor = state.answers.first_unanswered(session).unwrap_or(0);
                    let err = self.raise(state, JourneyErrorKind::IncompleteAnswers, Some(err.into()));
                    self.set_step(state, JourneyStep::Scenarios);
                    return Err(err);
                }
            };

            state.error = None;
            self.set_step(state, JourneyStep::Loading);
            (state.epoch, request, score)
        };

        let test_run_id = request.test_run_id;
        let response = self.service.submit_answers(request).await;

        let mut guard = self.inner.lock().await;
        let state = &mut *guard;
        if state.epoch != epoch {
            debug!(%test_run_id, "journey: dropping submission response for a reset journey");
            return Err(JourneyError::Superseded);
        }

        match response {
            Ok(response) => {
                let result = SubmissionResult::from(response);
                info!(
                    %test_run_id,
                    genes = result.genes.len(),
                    activation_items = result.activation_items().len(),
                    "journey: answers scored"
                );
                state.result = Some(result);
                self.spawn_results_feedback(test_run_id, score);
                self.set_step(state, JourneyStep::Results);
                Ok(JourneyStep::Results)
            }
            Err(err) => {
                warn!(%test_run_id, "journey: answer submission failed: {err:#}");
                // Answers and judged score survive; the user walks the
                // scenarios again from the top to re-confirm them.
                state.cursor = 0;
                let err = self.raise(state, JourneyErrorKind::SubmitFailed, Some(err));
                self.set_step(state, JourneyStep::Scenarios);
                Err(err)
            }
        }
    }

    fn schedule_advance(self: &Arc<Self>, epoch: u64) -> JoinHandle<()> {
        let controller = Arc::downgrade(self);
        let delay = self.options.auto_advance_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(controller) = controller.upgrade() {
                controller.complete_advance(epoch).await;
            }
        })
    }

    async fn complete_advance(&self, epoch: u64) {
        let mut guard = self.inner.lock().await;
        let state = &mut *guard;
        if state.epoch != epoch || state.step != JourneyStep::Scenarios {
            return;
        }
        if state.pending_advance.take().is_none() {
            return;
        }

        let total = state.session.as_ref().map_or(0, JourneySession::len);
        if state.cursor + 1 >= total {
            self.set_step(state, JourneyStep::Safety);
        } else {
            state.cursor += 1;
            let _ = self.events.send(JourneyEvent::ScenarioAdvanced {
                index: state.cursor,
                total,
            });
        }
    }

    fn spawn_results_feedback(&self, test_run_id: TestRunId, score: SafetyScore) {
        let service = Arc::clone(&self.service);
        self.spawn_advisory(AdvisoryCall::ResultsFeedback, test_run_id, async move {
            service
                .submit_feedback(JourneyFeedbackRequest {
                    test_run_id,
                    judged_score: score.value(),
                    selected_activation_id: None,
                })
                .await
                .map(|_| ())
        });
    }

    fn spawn_cancel(&self, test_run_id: TestRunId) {
        let service = Arc::clone(&self.service);
        self.spawn_advisory(AdvisoryCall::Cancel, test_run_id, async move {
            service
                .cancel(JourneyCancelRequest { test_run_id })
                .await
                .map(|_| ())
        });
    }

    /// Runs a call whose outcome is only logged; nothing waits for it.
    fn spawn_advisory<F>(&self, call: AdvisoryCall, test_run_id: TestRunId, call_future: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        let events = self.events.clone();
        tokio::spawn(async move {
            let succeeded = match call_future.await {
                Ok(()) => {
                    debug!(%test_run_id, ?call, "journey: advisory call finished");
                    true
                }
                Err(err) => {
                    warn!(%test_run_id, ?call, "journey: advisory call failed: {err:#}");
                    false
                }
            };
            let _ = events.send(JourneyEvent::AdvisoryFinished { call, succeeded });
        });
    }

    fn set_step(&self, state: &mut JourneyState, to: JourneyStep) {
        let from = state.step;
        if from == to {
            return;
        }
        state.step = to;
        info!(?from, ?to, "journey: step changed");
        let _ = self.events.send(JourneyEvent::StepChanged { from, to });
    }

    fn raise(
        &self,
        state: &mut JourneyState,
        kind: JourneyErrorKind,
        source: Option<anyhow::Error>,
    ) -> JourneyError {
        if kind.is_local() {
            debug!(?kind, step = ?state.step, "journey: validation failed");
        }
        state.error = Some(kind);
        let _ = self.events.send(JourneyEvent::ErrorRaised(kind));
        JourneyError::Surfaced { kind, source }
    }

    fn reset(&self, state: &mut JourneyState) {
        let from = state.step;
        state.cancel_pending_advance();
        *state = JourneyState::fresh(state.epoch + 1);
        let _ = self.events.send(JourneyEvent::Reset);
        if from != JourneyStep::Intro {
            let _ = self.events.send(JourneyEvent::StepChanged {
                from,
                to: JourneyStep::Intro,
            });
        }
    }
}

impl Drop for JourneyController {
    fn drop(&mut self) {
        self.inner.get_mut().cancel_pending_advance();
    }
}

fn session_from_response(response: JourneyStartResponse) -> Result<JourneySession> {
    let test_run_id = response.test_run_id;
    JourneySession::try_from(response)
        .with_context(|| format!("unusable session for test run {test_run_id}"))
}

#[cfg(test)]
#[path = "tests/journey_tests.rs"]
mod tests;
