use serde::{Deserialize, Serialize};

use crate::domain::TestRunId;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JourneyStartRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyResumeRequest {
    pub test_run_id: TestRunId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyScenarioOption {
    pub option_code: String,
    pub option_text_en: String,
    #[serde(default)]
    pub option_text_ar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyScenario {
    pub scenario_code: String,
    pub order_index: i32,
    pub scenario_text_en: String,
    #[serde(default)]
    pub scenario_text_ar: Option<String>,
    pub options: Vec<JourneyScenarioOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyStartResponse {
    pub test_run_id: TestRunId,
    pub version_id: String,
    pub scenarios: Vec<JourneyScenario>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyAnswerSubmission {
    pub scenario_code: String,
    pub option_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneySubmitAnswersRequest {
    pub version_id: String,
    pub test_run_id: TestRunId,
    pub answers: Vec<JourneyAnswerSubmission>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyTopGene {
    pub gene_code: String,
    pub name_en: String,
    #[serde(default)]
    pub name_ar: Option<String>,
    pub desc_en: String,
    #[serde(default)]
    pub desc_ar: Option<String>,
    pub raw_score: f64,
    pub normalized_score: f64,
    pub rank: i32,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyArchetypeMatch {
    pub model_code: String,
    pub name_en: String,
    #[serde(default)]
    pub name_ar: Option<String>,
    #[serde(default)]
    pub summary_ar: Option<String>,
    pub similarity: f64,
    pub rank: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyActivationItem {
    pub channel: String,
    pub advice_id: String,
    pub advice_type: String,
    pub title_en: String,
    #[serde(default)]
    pub title_ar: Option<String>,
    pub body_en: String,
    #[serde(default)]
    pub body_ar: Option<String>,
    pub priority: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneySubmitAnswersResponse {
    pub version_id: String,
    pub test_run_id: TestRunId,
    pub top_genes: Vec<JourneyTopGene>,
    #[serde(default)]
    pub archetype_matches: Vec<JourneyArchetypeMatch>,
    #[serde(default)]
    pub activation_items: Vec<JourneyActivationItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyFeedbackRequest {
    pub test_run_id: TestRunId,
    pub judged_score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_activation_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyFeedbackResponse {
    pub test_run_id: TestRunId,
    pub judged_score: u8,
    pub selected_activation_id: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyCancelRequest {
    pub test_run_id: TestRunId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyCancelResponse {
    pub test_run_id: TestRunId,
    pub status: String,
}
