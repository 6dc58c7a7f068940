use super::*;
use client_core::view::{ActivationView, OptionView, Progress, ScenarioView};

use crate::terminal::is_affirmative;

fn view_at(step: JourneyStep) -> JourneyView {
    JourneyView {
        step,
        language: Language::En,
        busy: false,
        advancing: false,
        can_exit: step.can_exit(),
        progress: None,
        scenario: None,
        judged_score: None,
        genes: Vec::new(),
        archetypes: Vec::new(),
        activation_items: Vec::new(),
        error: None,
    }
}

fn scenario_view() -> JourneyView {
    let option = |code: &str, label: &str| OptionView {
        code: code.to_string(),
        label: label.to_string(),
        selected: false,
    };
    JourneyView {
        progress: Some(Progress {
            current: 1,
            total: 2,
        }),
        scenario: Some(ScenarioView {
            code: "S01".to_string(),
            prompt: "Scenario 1".to_string(),
            options: vec![option("A", "Option A"), option("B", "Option B")],
        }),
        ..view_at(JourneyStep::Scenarios)
    }
}

#[test]
fn global_commands_work_on_every_step() {
    let view = view_at(JourneyStep::Results);
    assert_eq!(parse("quit", &view), Command::Quit);
    assert_eq!(parse(" exit ", &view), Command::Exit);
    assert_eq!(parse("lang ar", &view), Command::Language(Language::Ar));
    assert_eq!(parse("lang fr", &view), Command::Unknown("lang fr".to_string()));
}

#[test]
fn enter_continues_where_proceed_applies() {
    for step in [
        JourneyStep::Intro,
        JourneyStep::Prep,
        JourneyStep::Safety,
        JourneyStep::Results,
    ] {
        assert_eq!(parse("", &view_at(step)), Command::Proceed, "{step:?}");
    }
    assert!(matches!(
        parse("", &view_at(JourneyStep::Closing)),
        Command::Unknown(_)
    ));
}

#[test]
fn resume_needs_a_numeric_id() {
    let view = view_at(JourneyStep::Prep);
    assert_eq!(parse("resume 42", &view), Command::Resume(TestRunId(42)));
    assert!(matches!(parse("resume abc", &view), Command::Unknown(_)));
    assert!(matches!(
        parse("resume 42", &view_at(JourneyStep::Intro)),
        Command::Unknown(_)
    ));
}

#[test]
fn options_resolve_by_position_or_code() {
    let view = scenario_view();
    assert_eq!(parse("2", &view), Command::SelectOption("B".to_string()));
    assert_eq!(parse("a", &view), Command::SelectOption("A".to_string()));
    assert_eq!(parse("Z", &view), Command::SelectOption("Z".to_string()));
    assert!(matches!(parse("", &view), Command::Unknown(_)));
}

#[test]
fn safety_accepts_scores_and_leaves_range_checks_to_the_controller() {
    let view = view_at(JourneyStep::Safety);
    assert_eq!(parse("4", &view), Command::SafetyScore(4));
    assert_eq!(parse("7", &view), Command::SafetyScore(7));
    assert!(matches!(parse("four", &view), Command::Unknown(_)));
}

#[test]
fn activation_items_resolve_and_done_finalizes() {
    let view = JourneyView {
        activation_items: vec![ActivationView {
            advice_id: "ACT_BEH".to_string(),
            channel_label: "Behavior".to_string(),
            title: "Behavior action".to_string(),
            body: "Do one thing".to_string(),
            selected: false,
        }],
        ..view_at(JourneyStep::Activation)
    };
    assert_eq!(
        parse("1", &view),
        Command::SelectActivation("ACT_BEH".to_string())
    );
    assert_eq!(parse("done", &view), Command::Finalize);
    assert_eq!(
        parse("restart", &view_at(JourneyStep::Closing)),
        Command::Restart
    );
}

#[test]
fn exit_confirmation_accepts_both_languages() {
    assert!(is_affirmative("Y"));
    assert!(is_affirmative(" yes "));
    assert!(is_affirmative("نعم"));
    assert!(!is_affirmative(""));
    assert!(!is_affirmative("no"));
}
