//! Squad Invaders - headless demo
//!
//! Loads settings (path from the first argument, default `settings.json`),
//! lets the autopilot play for the configured number of ticks and prints the
//! final snapshot as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use squad_invaders::sim::{Session, SessionStatus, autopilot_input};
use squad_invaders::{FileHighScores, Settings};

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Squad Invaders (headless) starting...");

    let settings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("settings.json"));
    let settings = Settings::load(&settings_path);

    let seed = settings.seed.unwrap_or_else(rand::random::<u64>);
    let store = FileHighScores::open(&settings.high_score_path);

    let mut session = match Session::new(&settings, seed, store) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Failed to set up session: {}", e);
            return ExitCode::FAILURE;
        }
    };
    log::info!("Game initialized with seed: {}", seed);

    for _ in 0..settings.demo_ticks {
        let input = autopilot_input(&session.snapshot());
        if let Err(e) = session.tick(&input) {
            log::error!("Simulation error: {}", e);
            return ExitCode::FAILURE;
        }
        if session.status() == SessionStatus::Over {
            break;
        }
    }

    let snapshot = session.snapshot();
    log::info!(
        "Demo finished after {} ms: wave {}, score {}, health {}",
        snapshot.clock_ms,
        snapshot.wave,
        snapshot.score,
        snapshot.health
    );
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize snapshot: {}", e);
            ExitCode::FAILURE
        }
    }
}
