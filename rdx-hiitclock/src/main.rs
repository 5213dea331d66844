use anyhow::{Context, Result};
use colored::Colorize;
use hiitclock::display::phase_label;
use hiitclock::events::recv_skipping_lag;
use hiitclock::prelude::*;
use hiitclock::{ENGINE_NAME, VERSION};
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    // 2. Load the configuration, or fall back to the defaults.
    let config = match env::args().nth(1) {
        Some(path) => HiitConfig::load(&path)
            .with_context(|| format!("could not load configuration from {path}"))?,
        None => HiitConfig::default(),
    };
    info!(
        "{} v{} running at a {} ms tick.",
        ENGINE_NAME,
        VERSION,
        config.resolution.period_ms()
    );

    // 3. Create the engine and listen before starting, so no event is missed.
    let engine = HiitEngine::new(config);
    let mut events = engine.subscribe_session_events();

    // 4. Run one full session. It stops early on Ctrl+C.
    engine.start().await;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received. Stopping the session...");
                engine.stop().await;
                break;
            }
            event = recv_skipping_lag(&mut events) => match event {
                Some(event) => {
                    if report(&engine, event).await {
                        break;
                    }
                }
                None => {
                    warn!("Event stream closed before the session ended.");
                    break;
                }
            },
        }
    }

    Ok(())
}

/// Logs one session event. Returns `true` once the session is over.
async fn report(engine: &HiitEngine, event: SessionEvent) -> bool {
    match event {
        SessionEvent::Started { snapshot } | SessionEvent::PhaseChanged { snapshot, .. } => {
            let workout = engine.workout().await;
            info!(
                "[PHASE] => {} {}",
                phase_label(&snapshot, &workout).cyan().bold(),
                format_clock(snapshot.remaining_ms).dimmed()
            );
            false
        }
        SessionEvent::StartRejected => {
            warn!("[SESSION] => Nothing to run: the workout has no sets.");
            true
        }
        SessionEvent::Finished { sets_completed } => {
            info!("[SESSION] => {} after {} set(s).", "Finished".green().bold(), sets_completed);
            true
        }
        other => {
            info!("[SESSION] => {:?}", other);
            false
        }
    }
}
