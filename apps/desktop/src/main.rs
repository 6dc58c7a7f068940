mod commands;
mod render;
mod terminal;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    config::{load_settings_from, settings_path},
    HttpJourneyService, JourneyContext, JourneyController, JourneyError, JourneyEvent,
    JourneyOptions, JourneyStep, JourneyView, Messages,
};
use shared::domain::Language;
use tokio::sync::{
    broadcast::{self, error::RecvError, error::TryRecvError},
    mpsc, watch,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{commands::Command, terminal::TerminalHost};

#[derive(Parser, Debug)]
#[command(about = "Terminal front end for the persona journey")]
struct Args {
    /// Overrides the server URL from settings and environment.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    language: Option<Language>,
    /// Settings file; defaults to ./journey.toml.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Question-set version to request instead of the service default.
    #[arg(long)]
    version_id: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings_from(&settings_path(args.config), |key| {
        std::env::var(key).ok()
    });
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(language) = args.language {
        settings.language = language;
    }
    settings.validate().context("invalid client settings")?;

    let service = HttpJourneyService::from_settings(&settings)?;
    info!(base_url = %service.base_url(), language = %settings.language, "desktop: journey service configured");

    let (language_tx, language_rx) = watch::channel(settings.language);
    let input = terminal::spawn_stdin_reader();
    let host = Arc::new(TerminalHost::new(Arc::clone(&input)));
    let mut options = JourneyOptions::from_settings(&settings);
    options.version_id = args.version_id;
    let controller = JourneyController::new(
        Arc::new(service),
        JourneyContext::new(language_rx, host),
        options,
    );
    let mut events = controller.subscribe_events();

    // Commands that wait on the service finish in the background and
    // report back here, so `exit` stays readable while they are in flight.
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<()>();

    println!("{}", render::render(&controller.view().await));
    loop {
        tokio::select! {
            line = terminal::next_line(&input) => {
                let Some(line) = line else { break };
                let view = controller.view().await;
                match commands::parse(&line, &view) {
                    Command::Quit => break,
                    Command::Help => println!("{}", commands::HELP),
                    Command::Unknown(input) => println!("? {input}  (help)"),
                    Command::Language(next) => {
                        language_tx.send_replace(next);
                        println!("{}", render::render(&controller.view().await));
                    }
                    // Confirmation reads stdin itself, so exit runs in line.
                    Command::Exit => {
                        report(controller.request_exit().await);
                        drain(&mut events);
                        println!("{}", render::render(&controller.view().await));
                    }
                    command => {
                        announce(&view, &command);
                        let controller = Arc::clone(&controller);
                        let done = done_tx.clone();
                        tokio::spawn(async move {
                            report(dispatch(&controller, command).await);
                            let _ = done.send(());
                        });
                    }
                }
            }
            Some(()) = done_rx.recv() => {
                drain(&mut events);
                println!("{}", render::render(&controller.view().await));
            }
            event = events.recv() => match event {
                Ok(JourneyEvent::StepChanged { .. } | JourneyEvent::ScenarioAdvanced { .. })
                | Err(RecvError::Lagged(_)) => {
                    println!("{}", render::render(&controller.view().await));
                }
                Ok(_) => {}
                Err(RecvError::Closed) => break,
            },
        }
    }

    Ok(())
}

/// Progress line for commands that wait on the journey service.
fn announce(view: &JourneyView, command: &Command) {
    let messages = Messages::for_language(view.language);
    match (command, view.step) {
        (Command::Proceed, JourneyStep::Prep) | (Command::Resume(_), _) => {
            println!("{}", messages.starting)
        }
        (Command::Proceed, JourneyStep::Safety) => println!("{}", messages.loading),
        (Command::Finalize, _) => println!("{}", messages.saving),
        _ => {}
    }
}

async fn dispatch(
    controller: &Arc<JourneyController>,
    command: Command,
) -> Result<JourneyStep, JourneyError> {
    match command {
        Command::Proceed => controller.proceed().await,
        Command::Resume(test_run_id) => controller.resume(test_run_id).await,
        Command::SelectOption(code) => controller.select_option(&code).await,
        Command::SafetyScore(value) => controller.select_safety_score(value).await,
        Command::SelectActivation(advice_id) => controller.select_activation(&advice_id).await,
        Command::Finalize => controller.finalize().await,
        Command::Restart => controller.restart().await,
        Command::Exit => controller.request_exit().await,
        Command::Language(_) | Command::Help | Command::Quit | Command::Unknown(_) => {
            Ok(controller.step().await)
        }
    }
}

fn report(outcome: Result<JourneyStep, JourneyError>) {
    match outcome {
        Ok(step) => debug!(?step, "desktop: command applied"),
        // The view carries the localized message.
        Err(JourneyError::Surfaced { kind, .. }) => debug!(?kind, "desktop: command failed"),
        Err(JourneyError::Superseded) => debug!("desktop: command outlived its journey"),
        Err(err) => println!("! {err}"),
    }
}

/// Events caused by a command are covered by the render that follows it.
fn drain(events: &mut broadcast::Receiver<JourneyEvent>) {
    loop {
        match events.try_recv() {
            Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
