//! Session-scoped domain records built from journey service responses.

use std::collections::HashSet;

use shared::{
    domain::{ActivationChannel, GeneRole, TestRunId},
    protocol::{
        JourneyActivationItem, JourneyArchetypeMatch, JourneyScenario, JourneyStartResponse,
        JourneySubmitAnswersResponse, JourneyTopGene,
    },
};
use thiserror::Error;

/// Only the first few activation items are offered to the user.
pub const ACTIVATION_ITEM_LIMIT: usize = 3;
/// Only the strongest genes are shown on the results step.
pub const TOP_GENE_LIMIT: usize = 3;

pub const SAFETY_SCORE_MIN: u8 = 1;
pub const SAFETY_SCORE_MAX: u8 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("journey session has no scenarios")]
    NoScenarios,
    #[error("scenario code '{0}' appears more than once")]
    DuplicateScenario(String),
    #[error("scenario '{0}' has no options")]
    NoOptions(String),
    #[error("option code '{option_code}' appears more than once in scenario '{scenario_code}'")]
    DuplicateOption {
        scenario_code: String,
        option_code: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioOption {
    pub code: String,
    pub text_en: String,
    pub text_ar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub code: String,
    pub order_index: i32,
    pub text_en: String,
    pub text_ar: Option<String>,
    pub options: Vec<ScenarioOption>,
}

impl Scenario {
    pub fn has_option(&self, option_code: &str) -> bool {
        self.options.iter().any(|option| option.code == option_code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneySession {
    test_run_id: TestRunId,
    version_id: String,
    scenarios: Vec<Scenario>,
}

impl JourneySession {
    pub fn new(
        test_run_id: TestRunId,
        version_id: impl Into<String>,
        scenarios: Vec<Scenario>,
    ) -> Result<Self, SessionError> {
        if scenarios.is_empty() {
            return Err(SessionError::NoScenarios);
        }

        let mut seen = HashSet::new();
        for scenario in &scenarios {
            if !seen.insert(scenario.code.as_str()) {
                return Err(SessionError::DuplicateScenario(scenario.code.clone()));
            }
            if scenario.options.is_empty() {
                return Err(SessionError::NoOptions(scenario.code.clone()));
            }
            let mut option_codes = HashSet::new();
            for option in &scenario.options {
                if !option_codes.insert(option.code.as_str()) {
                    return Err(SessionError::DuplicateOption {
                        scenario_code: scenario.code.clone(),
                        option_code: option.code.clone(),
                    });
                }
            }
        }

        let mut scenarios = scenarios;
        scenarios.sort_by_key(|scenario| scenario.order_index);

        Ok(Self {
            test_run_id,
            version_id: version_id.into(),
            scenarios,
        })
    }

    pub fn test_run_id(&self) -> TestRunId {
        self.test_run_id
    }

    pub fn version_id(&self) -> &str {
        &self.version_id
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn scenario(&self, index: usize) -> Option<&Scenario> {
        self.scenarios.get(index)
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

impl TryFrom<JourneyStartResponse> for JourneySession {
    type Error = SessionError;

    fn try_from(response: JourneyStartResponse) -> Result<Self, Self::Error> {
        let scenarios = response
            .scenarios
            .into_iter()
            .map(scenario_from_wire)
            .collect();
        Self::new(response.test_run_id, response.version_id, scenarios)
    }
}

fn scenario_from_wire(scenario: JourneyScenario) -> Scenario {
    Scenario {
        code: scenario.scenario_code,
        order_index: scenario.order_index,
        text_en: scenario.scenario_text_en,
        text_ar: scenario.scenario_text_ar,
        options: scenario
            .options
            .into_iter()
            .map(|option| ScenarioOption {
                code: option.option_code,
                text_en: option.option_text_en,
                text_ar: option.option_text_ar,
            })
            .collect(),
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("safety score {0} is outside 1..=5")]
pub struct SafetyScoreError(pub u8);

/// Self-reported psychological safety on a closed 1..=5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SafetyScore(u8);

impl SafetyScore {
    pub fn new(value: u8) -> Result<Self, SafetyScoreError> {
        if (SAFETY_SCORE_MIN..=SAFETY_SCORE_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SafetyScoreError(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = SafetyScore> {
        (SAFETY_SCORE_MIN..=SAFETY_SCORE_MAX).map(SafetyScore)
    }
}

#[derive(Debug, Clone)]
pub struct GeneScore {
    pub gene_code: String,
    pub name_en: String,
    pub name_ar: Option<String>,
    pub desc_en: String,
    pub desc_ar: Option<String>,
    pub normalized_score: f64,
    pub rank: i32,
    pub role: Option<GeneRole>,
    pub raw_role: String,
}

#[derive(Debug, Clone)]
pub struct ArchetypeMatch {
    pub model_code: String,
    pub name_en: String,
    pub name_ar: Option<String>,
    pub summary_ar: Option<String>,
    pub similarity: f64,
    pub rank: i32,
}

#[derive(Debug, Clone)]
pub struct ActivationItem {
    pub advice_id: String,
    pub channel: Option<ActivationChannel>,
    pub raw_channel: String,
    pub title_en: String,
    pub title_ar: Option<String>,
    pub body_en: String,
    pub body_ar: Option<String>,
    pub priority: i32,
}

#[derive(Debug, Clone)]
pub struct SubmissionResult {
    pub test_run_id: TestRunId,
    pub version_id: String,
    pub genes: Vec<GeneScore>,
    pub archetypes: Vec<ArchetypeMatch>,
    activation_items: Vec<ActivationItem>,
}

impl SubmissionResult {
    pub fn top_genes(&self) -> &[GeneScore] {
        &self.genes[..self.genes.len().min(TOP_GENE_LIMIT)]
    }

    /// Activation items offered to the user, already ranked by the service.
    pub fn activation_items(&self) -> &[ActivationItem] {
        &self.activation_items[..self.activation_items.len().min(ACTIVATION_ITEM_LIMIT)]
    }

    pub fn activation_item(&self, advice_id: &str) -> Option<&ActivationItem> {
        self.activation_items()
            .iter()
            .find(|item| item.advice_id == advice_id)
    }
}

impl From<JourneySubmitAnswersResponse> for SubmissionResult {
    fn from(response: JourneySubmitAnswersResponse) -> Self {
        let mut genes: Vec<GeneScore> = response.top_genes.into_iter().map(gene_from_wire).collect();
        genes.sort_by_key(|gene| gene.rank);
        Self {
            test_run_id: response.test_run_id,
            version_id: response.version_id,
            genes,
            archetypes: response
                .archetype_matches
                .into_iter()
                .map(archetype_from_wire)
                .collect(),
            activation_items: response
                .activation_items
                .into_iter()
                .map(activation_from_wire)
                .collect(),
        }
    }
}

fn gene_from_wire(gene: JourneyTopGene) -> GeneScore {
    GeneScore {
        role: GeneRole::parse(&gene.role),
        raw_role: gene.role,
        gene_code: gene.gene_code,
        name_en: gene.name_en,
        name_ar: gene.name_ar,
        desc_en: gene.desc_en,
        desc_ar: gene.desc_ar,
        normalized_score: gene.normalized_score,
        rank: gene.rank,
    }
}

fn archetype_from_wire(archetype: JourneyArchetypeMatch) -> ArchetypeMatch {
    ArchetypeMatch {
        model_code: archetype.model_code,
        name_en: archetype.name_en,
        name_ar: archetype.name_ar,
        summary_ar: archetype.summary_ar,
        similarity: archetype.similarity,
        rank: archetype.rank,
    }
}

fn activation_from_wire(item: JourneyActivationItem) -> ActivationItem {
    ActivationItem {
        channel: ActivationChannel::parse(&item.channel),
        raw_channel: item.channel,
        advice_id: item.advice_id,
        title_en: item.title_en,
        title_ar: item.title_ar,
        body_en: item.body_en,
        body_ar: item.body_ar,
        priority: item.priority,
    }
}
