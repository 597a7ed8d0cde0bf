//! Binary entry point (§0.1): wires configuration, logging, the in-memory
//! store, the tool registry, the provider adapters, and the Turn
//! Orchestrator together, then runs a demo turn loop over stdin or a
//! one-shot CLI argument.

mod args;
mod wiring;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::Parser;
use domain::UserProfile;
use uuid::Uuid;

use args::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    telemetry::init(&args.log_filter);

    let config = config::Config::from_env();
    let (orchestrator, conversation_id) = wiring::build(&config);
    let orchestrator = Arc::new(orchestrator);
    let profile = UserProfile::default();

    if let Some(message) = args.message {
        run_turn(&orchestrator, conversation_id, &profile, message).await;
        return Ok(());
    }

    println!("request-orchestration-core demo — type a message and press enter (Ctrl-D to quit)");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        run_turn(&orchestrator, conversation_id, &profile, line).await;
        print!("> ");
        stdout.flush()?;
    }

    Ok(())
}

async fn run_turn(orchestrator: &orchestrator::TurnOrchestrator, conversation_id: Uuid, profile: &UserProfile, message: String) {
    match orchestrator.handle_turn(conversation_id, message, profile).await {
        Ok(outcome) => {
            println!("{}", outcome.assistant_text);
            log::info!(
                "turn complete: route={:?} confidence={:.2} tokens={}/{}",
                outcome.routing.route,
                outcome.routing.confidence,
                outcome.metrics.input_tokens,
                outcome.metrics.output_tokens
            );
        }
        Err(error) => {
            log::error!("turn failed: {error}");
            println!("(error: {error})");
        }
    }
}
