use client_core::{JourneyStep, JourneyView, Messages, SafetyScore};

/// Right-to-left mark, so bidi-aware terminals lay Arabic lines out properly.
const RTL_MARK: char = '\u{200F}';

/// Plain-text screen for one view snapshot.
pub fn render(view: &JourneyView) -> String {
    let messages = Messages::for_language(view.language);
    let mut lines = vec![String::new()];

    match view.step {
        JourneyStep::Intro => {
            lines.push(format!("== {} ==", messages.intro_title));
            lines.push(messages.intro_subtitle.to_string());
            lines.push(format!("[next] {}", messages.intro_cta));
        }
        JourneyStep::Prep => {
            lines.push(format!("== {} ==", messages.prep_title));
            lines.extend(messages.prep_points.iter().map(|point| format!("  - {point}")));
            if view.busy {
                lines.push(messages.starting.to_string());
            } else {
                lines.push(format!("[next] {}   [resume <id>]", messages.begin_scenarios));
            }
        }
        JourneyStep::Scenarios => {
            if let Some(progress) = view.progress {
                lines.push(format!(
                    "{} {}/{} ({:.0}%)",
                    messages.scenario_progress,
                    progress.current,
                    progress.total,
                    progress.percent()
                ));
            }
            if let Some(scenario) = &view.scenario {
                lines.push(scenario.prompt.clone());
                for (position, option) in scenario.options.iter().enumerate() {
                    let marker = if option.selected { "*" } else { " " };
                    lines.push(format!("{marker} {}. {}", position + 1, option.label));
                }
            }
            lines.push(messages.auto_next_hint.to_string());
        }
        JourneyStep::Safety => {
            lines.push(format!("== {} ==", messages.safety_title));
            lines.push(messages.safety_subtitle.to_string());
            lines.push(messages.safety_scale_hint.to_string());
            if let Some(score) = view.judged_score {
                lines.push(format!("{}: {score}", messages.selected));
            }
            let scale: Vec<String> = SafetyScore::all()
                .map(|score| score.value().to_string())
                .collect();
            lines.push(format!("[{}]   [next] {}", scale.join(" "), messages.see_results));
        }
        JourneyStep::Loading => lines.push(messages.loading.to_string()),
        JourneyStep::Results => {
            lines.push(format!("== {} ==", messages.results_title));
            lines.push(messages.results_subtitle.to_string());
            for gene in &view.genes {
                lines.push(format!(
                    "  {}: {} ({:.0})",
                    gene.role_label, gene.name, gene.normalized_score
                ));
                lines.push(format!("      {}", gene.description));
            }
            if !view.archetypes.is_empty() {
                lines.push(format!("-- {} --", messages.archetypes_title));
                for archetype in &view.archetypes {
                    // Similarity arrives as a 0..1 fraction.
                    lines.push(format!(
                        "  {} ({:.1}%)",
                        archetype.name,
                        archetype.similarity * 100.0
                    ));
                    if let Some(summary) = &archetype.summary {
                        lines.push(format!("      {summary}"));
                    }
                }
            }
            lines.push(format!("[next] {}", messages.to_activation));
        }
        JourneyStep::Activation => {
            lines.push(format!("== {} ==", messages.activation_title));
            lines.push(messages.activation_subtitle.to_string());
            for (position, item) in view.activation_items.iter().enumerate() {
                let marker = if item.selected { "*" } else { " " };
                lines.push(format!(
                    "{marker} {}. [{}] {}",
                    position + 1,
                    item.channel_label,
                    item.title
                ));
                lines.push(format!("      {}", item.body));
            }
            if view.busy {
                lines.push(messages.saving.to_string());
            } else {
                lines.push(format!("[<n>]   [done] {}", messages.finish));
            }
        }
        JourneyStep::Closing => {
            lines.push(format!("== {} ==", messages.closing_title));
            lines.push(messages.closing_body.to_string());
            lines.push(format!("[restart] {}", messages.restart));
        }
    }

    if let Some(error) = &view.error {
        lines.push(format!("! {error}"));
    }
    if view.can_exit {
        lines.push(format!("[exit] {}", messages.exit_journey));
    }
    if view.language.is_rtl() {
        for line in lines.iter_mut().filter(|line| !line.is_empty()) {
            line.insert(0, RTL_MARK);
        }
    }
    lines.join("\n")
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
