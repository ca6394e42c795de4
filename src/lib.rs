pub mod types;
pub mod config;
pub mod data;
pub mod sim;
pub mod standings;
pub mod bracket;
pub mod tournament;
pub mod predict;

use config::*;
use sim::SimRng;
use tournament::TournamentState;

use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ── Entry point ────────────────────────────────────────────────────────

pub async fn run() -> Result<(), String> {
    // Initialize tracing with file + stderr output
    let logs_dir = repo_root().join("logs");
    fs::create_dir_all(&logs_dir).ok();
    let file_appender = tracing_appender::rolling::daily(&logs_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    info!("Tournament Predictor starting");

    let settings = load_settings_inner()?;
    info!(
        "Settings: seed {}, {} prediction runs",
        settings.seed, settings.sample_count
    );

    let state = TournamentState::reference()?;
    let mut rng = SimRng::new(settings.seed);

    let played = state.simulate_tournament(&mut rng)?;
    info!(
        "Sample tournament: champion {}, runner-up {}, third place {}",
        played.champion().unwrap_or_default(),
        played.runner_up().unwrap_or_default(),
        played.third_place().unwrap_or_default(),
    );

    let predictions = predict::predict(
        &state,
        settings.sample_count,
        &mut rng,
        |current, total| {
            if current % 100 == 0 || current == total {
                info!("Prediction progress: {current}/{total}");
            }
        },
    )
    .await?;

    if let Some(final_match) = predictions.knockout_matches.get("final_F") {
        let mut winners: Vec<(&String, &f64)> = final_match.winners.iter().collect();
        winners.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));
        for (code, pct) in winners.iter().take(5) {
            info!("Title chance: {code} {pct:.1}%");
        }
    }

    if settings.log_runs {
        let payload = serde_json::to_string_pretty(&predictions).map_err(|e| e.to_string())?;
        append_run_log("predictions", &payload);
    }

    Ok(())
}
