//! Answers collected during one traversal of the scenarios.

use std::collections::HashMap;

use shared::protocol::JourneyAnswerSubmission;
use thiserror::Error;

use crate::session::JourneySession;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoverageError {
    #[error("scenarios without an answer: {0:?}")]
    Missing(Vec<String>),
    #[error("answers for scenarios outside the session: {0:?}")]
    Unexpected(Vec<String>),
}

/// Chosen option per scenario code. Recording a scenario twice keeps the
/// latest option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet {
    answers: HashMap<String, String>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, scenario_code: impl Into<String>, option_code: impl Into<String>) {
        self.answers.insert(scenario_code.into(), option_code.into());
    }

    pub fn get(&self, scenario_code: &str) -> Option<&str> {
        self.answers.get(scenario_code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }

    /// Index of the first scenario, in session order, that has no answer yet.
    pub fn first_unanswered(&self, session: &JourneySession) -> Option<usize> {
        session
            .scenarios()
            .iter()
            .position(|scenario| !self.answers.contains_key(&scenario.code))
    }

    pub fn ensure_covers(&self, session: &JourneySession) -> Result<(), CoverageError> {
        let missing: Vec<String> = session
            .scenarios()
            .iter()
            .filter(|scenario| !self.answers.contains_key(&scenario.code))
            .map(|scenario| scenario.code.clone())
            .collect();
        if !missing.is_empty() {
            return Err(CoverageError::Missing(missing));
        }

        let mut unexpected: Vec<String> = self
            .answers
            .keys()
            .filter(|code| !session.scenarios().iter().any(|s| &s.code == *code))
            .cloned()
            .collect();
        if !unexpected.is_empty() {
            unexpected.sort();
            return Err(CoverageError::Unexpected(unexpected));
        }

        Ok(())
    }

    /// Submission payload in scenario order. Fails unless every scenario is
    /// answered and nothing else is.
    pub fn to_submissions(
        &self,
        session: &JourneySession,
    ) -> Result<Vec<JourneyAnswerSubmission>, CoverageError> {
        self.ensure_covers(session)?;
        Ok(session
            .scenarios()
            .iter()
            .filter_map(|scenario| {
                self.answers
                    .get(&scenario.code)
                    .map(|option_code| JourneyAnswerSubmission {
                        scenario_code: scenario.code.clone(),
                        option_code: option_code.clone(),
                    })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::TestRunId;

    use super::*;
    use crate::session::{Scenario, ScenarioOption};

    fn session(codes: &[&str]) -> JourneySession {
        let scenarios = codes
            .iter()
            .enumerate()
            .map(|(index, code)| Scenario {
                code: code.to_string(),
                order_index: index as i32 + 1,
                text_en: code.to_string(),
                text_ar: None,
                options: vec![
                    ScenarioOption {
                        code: "A".to_string(),
                        text_en: "A".to_string(),
                        text_ar: None,
                    },
                    ScenarioOption {
                        code: "B".to_string(),
                        text_en: "B".to_string(),
                        text_ar: None,
                    },
                ],
            })
            .collect();
        JourneySession::new(TestRunId(5), "v1", scenarios).expect("session")
    }

    #[test]
    fn rerecording_a_scenario_overwrites_instead_of_duplicating() {
        let mut answers = AnswerSet::new();
        answers.record("S01", "A");
        answers.record("S01", "B");
        assert_eq!(answers.len(), 1);
        assert_eq!(answers.get("S01"), Some("B"));
    }

    #[test]
    fn coverage_reports_missing_scenarios_in_order() {
        let session = session(&["S01", "S02", "S03"]);
        let mut answers = AnswerSet::new();
        answers.record("S02", "A");
        assert_eq!(
            answers.ensure_covers(&session),
            Err(CoverageError::Missing(vec![
                "S01".to_string(),
                "S03".to_string()
            ]))
        );
        assert_eq!(answers.first_unanswered(&session), Some(0));
    }

    #[test]
    fn coverage_rejects_foreign_scenarios() {
        let session = session(&["S01"]);
        let mut answers = AnswerSet::new();
        answers.record("S01", "A");
        answers.record("S99", "A");
        assert_eq!(
            answers.ensure_covers(&session),
            Err(CoverageError::Unexpected(vec!["S99".to_string()]))
        );
    }

    #[test]
    fn submissions_follow_session_order() {
        let session = session(&["S01", "S02"]);
        let mut answers = AnswerSet::new();
        answers.record("S02", "B");
        answers.record("S01", "A");
        let submissions = answers.to_submissions(&session).expect("complete");
        assert_eq!(
            submissions,
            vec![
                JourneyAnswerSubmission {
                    scenario_code: "S01".to_string(),
                    option_code: "A".to_string(),
                },
                JourneyAnswerSubmission {
                    scenario_code: "S02".to_string(),
                    option_code: "B".to_string(),
                },
            ]
        );
    }
}
