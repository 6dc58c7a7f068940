//! Maps a line of terminal input onto a controller operation for the step
//! currently on screen.

use client_core::{JourneyStep, JourneyView};
use shared::domain::{Language, TestRunId};

pub const HELP: &str = "\
commands:
  next | <enter>      continue (intro, prep, safety, results)
  resume <id>         reopen an earlier test run (prep)
  <n> | <code>        choose an option or activation by position or code
  1..5                judged safety score (safety)
  done                finish with the selected activation (activation)
  restart             start over (closing)
  exit                abandon the journey
  lang en|ar          switch language
  quit                close the program";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Proceed,
    Resume(TestRunId),
    SelectOption(String),
    SafetyScore(u8),
    SelectActivation(String),
    Finalize,
    Restart,
    Exit,
    Language(Language),
    Help,
    Quit,
    Unknown(String),
}

pub fn parse(line: &str, view: &JourneyView) -> Command {
    let line = line.trim();
    let mut words = line.split_whitespace();
    let head = words.next().unwrap_or_default();
    let arg = words.next();
    let unknown = || Command::Unknown(line.to_string());

    match head.to_ascii_lowercase().as_str() {
        "quit" | "q" => return Command::Quit,
        "help" | "?" => return Command::Help,
        "exit" => return Command::Exit,
        "lang" => {
            return match arg.map(str::parse::<Language>) {
                Some(Ok(language)) => Command::Language(language),
                _ => unknown(),
            }
        }
        _ => {}
    }

    match view.step {
        JourneyStep::Intro | JourneyStep::Results => match head {
            "" | "next" | "n" => Command::Proceed,
            _ => unknown(),
        },
        JourneyStep::Prep => match head {
            "" | "next" | "n" => Command::Proceed,
            "resume" => arg
                .and_then(|id| id.parse().ok())
                .map(|id| Command::Resume(TestRunId(id)))
                .unwrap_or_else(unknown),
            _ => unknown(),
        },
        JourneyStep::Scenarios if !head.is_empty() => {
            let options = view
                .scenario
                .as_ref()
                .map(|scenario| scenario.options.as_slice())
                .unwrap_or_default();
            // Unmatched codes go through so the controller can reject them.
            Command::SelectOption(
                pick(options, head, |option| option.code.as_str()).unwrap_or_else(|| head.to_string()),
            )
        }
        JourneyStep::Safety => match head {
            "" | "next" | "n" => Command::Proceed,
            other => other
                .parse()
                .map(Command::SafetyScore)
                .unwrap_or_else(|_| unknown()),
        },
        JourneyStep::Activation => match head {
            "done" | "finish" => Command::Finalize,
            "" => unknown(),
            other => Command::SelectActivation(
                pick(&view.activation_items, other, |item| item.advice_id.as_str())
                    .unwrap_or_else(|| other.to_string()),
            ),
        },
        JourneyStep::Closing => match head {
            "restart" | "again" => Command::Restart,
            _ => unknown(),
        },
        JourneyStep::Scenarios | JourneyStep::Loading => unknown(),
    }
}

/// Accepts a 1-based position or the item's code, case-insensitively.
fn pick<T>(items: &[T], input: &str, code: impl Fn(&T) -> &str) -> Option<String> {
    if let Ok(position) = input.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|index| items.get(index))
            .map(|item| code(item).to_string());
    }
    items
        .iter()
        .map(|item| code(item))
        .find(|candidate| candidate.eq_ignore_ascii_case(input))
        .map(str::to_string)
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
