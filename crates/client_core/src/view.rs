//! Owned, localized snapshot of the controller state for rendering.

use shared::domain::{localize, Language};

use crate::{
    journey::{JourneyState, JourneyStep},
    messages::Messages,
};

#[derive(Debug, Clone, PartialEq)]
pub struct JourneyView {
    pub step: JourneyStep,
    pub language: Language,
    pub busy: bool,
    pub advancing: bool,
    pub can_exit: bool,
    pub progress: Option<Progress>,
    pub scenario: Option<ScenarioView>,
    pub judged_score: Option<u8>,
    pub genes: Vec<GeneView>,
    pub archetypes: Vec<ArchetypeView>,
    pub activation_items: Vec<ActivationView>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// 1-based position of the current scenario.
    pub current: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.current as f64 / self.total as f64 * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioView {
    pub code: String,
    pub prompt: String,
    pub options: Vec<OptionView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub code: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneView {
    pub code: String,
    pub role_label: String,
    pub name: String,
    pub description: String,
    pub normalized_score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArchetypeView {
    pub code: String,
    pub name: String,
    /// Only the Arabic summary exists, so it shows up in Arabic alone.
    pub summary: Option<String>,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationView {
    pub advice_id: String,
    pub channel_label: String,
    pub title: String,
    pub body: String,
    pub selected: bool,
}

impl JourneyView {
    pub(crate) fn build(state: &JourneyState, language: Language) -> Self {
        let messages = Messages::for_language(language);

        let scenario_step = state.step == JourneyStep::Scenarios;
        let progress = state
            .session
            .as_ref()
            .filter(|_| scenario_step)
            .map(|session| Progress {
                current: state.cursor + 1,
                total: session.len(),
            });
        let scenario = state
            .session
            .as_ref()
            .filter(|_| scenario_step)
            .and_then(|session| session.scenario(state.cursor))
            .map(|scenario| {
                let recorded = state.answers.get(&scenario.code);
                ScenarioView {
                    code: scenario.code.clone(),
                    prompt: localize(language, &scenario.text_en, scenario.text_ar.as_deref())
                        .to_string(),
                    options: scenario
                        .options
                        .iter()
                        .map(|option| OptionView {
                            code: option.code.clone(),
                            label: localize(language, &option.text_en, option.text_ar.as_deref())
                                .to_string(),
                            selected: recorded == Some(option.code.as_str()),
                        })
                        .collect(),
                }
            });

        let (genes, archetypes, activation_items) = match &state.result {
            Some(result) => (
                result
                    .top_genes()
                    .iter()
                    .map(|gene| GeneView {
                        code: gene.gene_code.clone(),
                        role_label: messages.gene_role(gene.role, &gene.raw_role).to_string(),
                        name: localize(language, &gene.name_en, gene.name_ar.as_deref())
                            .to_string(),
                        description: localize(language, &gene.desc_en, gene.desc_ar.as_deref())
                            .to_string(),
                        normalized_score: gene.normalized_score,
                    })
                    .collect(),
                result
                    .archetypes
                    .iter()
                    .map(|archetype| ArchetypeView {
                        code: archetype.model_code.clone(),
                        name: localize(language, &archetype.name_en, archetype.name_ar.as_deref())
                            .to_string(),
                        summary: archetype
                            .summary_ar
                            .clone()
                            .filter(|summary| language == Language::Ar && !summary.is_empty()),
                        similarity: archetype.similarity,
                    })
                    .collect(),
                result
                    .activation_items()
                    .iter()
                    .map(|item| ActivationView {
                        advice_id: item.advice_id.clone(),
                        channel_label: messages.channel(item.channel, &item.raw_channel).to_string(),
                        title: localize(language, &item.title_en, item.title_ar.as_deref())
                            .to_string(),
                        body: localize(language, &item.body_en, item.body_ar.as_deref())
                            .to_string(),
                        selected: state.selected_activation.as_deref()
                            == Some(item.advice_id.as_str()),
                    })
                    .collect(),
            ),
            None => (Vec::new(), Vec::new(), Vec::new()),
        };

        Self {
            step: state.step,
            language,
            busy: state.busy,
            advancing: state.pending_advance.is_some(),
            can_exit: state.step.can_exit(),
            progress,
            scenario,
            judged_score: state.judged_score.map(|score| score.value()),
            genes,
            archetypes,
            activation_items,
            error: state.error.map(|kind| messages.error(kind).to_string()),
        }
    }
}
