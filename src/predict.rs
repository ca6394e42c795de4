use crate::sim::SimRng;
use crate::tournament::TournamentState;
use crate::types::*;
use std::collections::HashMap;
use tracing::{info, warn};

// Cooperative yield cadence while a batch is running.
const YIELD_INTERVAL: u32 = 5;

#[derive(Default)]
struct MatchCounts {
  match_id: String,
  stage: String,
  side_a: HashMap<String, u32>,
  side_b: HashMap<String, u32>,
  winners: HashMap<String, u32>,
  draws: u32,
  side_a_wins: u32,
  side_b_wins: u32,
}

impl MatchCounts {
  fn new(match_id: &str, stage: &str) -> Self {
    MatchCounts {
      match_id: match_id.to_string(),
      stage: stage.to_string(),
      ..Default::default()
    }
  }

  fn into_prediction(self, sample_count: u32) -> MatchPrediction {
    let pct = |count: u32| (count as f64 / sample_count as f64) * 100.0;
    let to_pct = |counts: HashMap<String, u32>| {
      counts
        .into_iter()
        .map(|(code, count)| (code, pct(count)))
        .collect()
    };
    MatchPrediction {
      match_id: self.match_id,
      stage: self.stage,
      side_a_appearances: to_pct(self.side_a),
      side_b_appearances: to_pct(self.side_b),
      winners: to_pct(self.winners),
      draws: pct(self.draws),
      side_a_wins: pct(self.side_a_wins),
      side_b_wins: pct(self.side_b_wins),
    }
  }
}

fn bump(counts: &mut HashMap<String, u32>, code: &str) {
  *counts.entry(code.to_string()).or_insert(0) += 1;
}

fn accumulate_run(
  done: &TournamentState,
  group_counts: &mut HashMap<String, MatchCounts>,
  knockout_counts: &mut HashMap<String, MatchCounts>,
) {
  let snapshot = done.snapshot();

  for group in &snapshot.groups {
    for game in &group.matches {
      let key = format!("{}_{}", group.id, game.id);
      let entry = group_counts
        .entry(key)
        .or_insert_with(|| MatchCounts::new(&game.id, &group.id));
      if let Some(code) = game.slot_a.code() {
        bump(&mut entry.side_a, code);
      }
      if let Some(code) = game.slot_b.code() {
        bump(&mut entry.side_b, code);
      }
      let result = match &game.result {
        Some(result) => result,
        None => continue,
      };
      match &result.winner {
        Some(winner) => {
          bump(&mut entry.winners, winner);
          if game.slot_a.code() == Some(winner.as_str()) {
            entry.side_a_wins += 1;
          }
          if game.slot_b.code() == Some(winner.as_str()) {
            entry.side_b_wins += 1;
          }
        }
        None => entry.draws += 1,
      }
    }
  }

  if let Some(rounds) = &snapshot.bracket {
    for round in rounds {
      for game in &round.matches {
        let key = format!("{}_{}", round.round.key(), game.id);
        let entry = knockout_counts
          .entry(key)
          .or_insert_with(|| MatchCounts::new(&game.id, round.round.key()));
        if let Some(code) = &game.slot_a {
          bump(&mut entry.side_a, code);
        }
        if let Some(code) = &game.slot_b {
          bump(&mut entry.side_b, code);
        }
        if let Some(winner) = game.result.as_ref().and_then(|r| r.winner.as_ref()) {
          bump(&mut entry.winners, winner);
        }
      }
    }
  }
}

/// Run the full pipeline `sample_count` times and aggregate per-match
/// appearance and win frequencies as percentages of the sample size.
/// A failed run is logged and skipped; it never aborts the batch.
pub async fn predict<F>(
  state: &TournamentState,
  sample_count: u32,
  rng: &mut SimRng,
  mut on_progress: F,
) -> Result<Predictions, String>
where
  F: FnMut(u32, u32),
{
  if sample_count == 0 {
    return Err("Prediction needs at least one run.".to_string());
  }
  info!("Starting {sample_count} prediction runs");

  let mut group_counts: HashMap<String, MatchCounts> = HashMap::new();
  let mut knockout_counts: HashMap<String, MatchCounts> = HashMap::new();
  let mut completed_runs = 0;

  for run in 0..sample_count {
    match state.simulate_tournament(rng) {
      Ok(done) => {
        accumulate_run(&done, &mut group_counts, &mut knockout_counts);
        completed_runs += 1;
      }
      Err(e) => warn!("Prediction run {} failed, skipping: {e}", run + 1),
    }
    on_progress(run + 1, sample_count);
    if (run + 1) % YIELD_INTERVAL == 0 {
      tokio::task::yield_now().await;
    }
  }

  info!("Completed {completed_runs}/{sample_count} prediction runs");

  Ok(Predictions {
    group_matches: group_counts
      .into_iter()
      .map(|(key, counts)| (key, counts.into_prediction(sample_count)))
      .collect(),
    knockout_matches: knockout_counts
      .into_iter()
      .map(|(key, counts)| (key, counts.into_prediction(sample_count)))
      .collect(),
    sample_count,
    completed_runs,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  const SAMPLES: u32 = 40;

  async fn small_batch() -> Predictions {
    let state = TournamentState::reference().unwrap();
    let mut rng = SimRng::new(1337);
    predict(&state, SAMPLES, &mut rng, |_, _| {}).await.unwrap()
  }

  #[tokio::test]
  async fn test_progress_reports_every_run() {
    let state = TournamentState::reference().unwrap();
    let mut rng = SimRng::new(7);
    let mut calls = Vec::new();
    let _ = predict(&state, 10, &mut rng, |current, total| calls.push((current, total)))
      .await
      .unwrap();
    assert_eq!(calls.len(), 10);
    assert_eq!(calls.last(), Some(&(10, 10)));
  }

  #[tokio::test]
  async fn test_group_match_outcomes_sum_to_hundred() {
    let predictions = small_batch().await;
    assert_eq!(predictions.completed_runs, SAMPLES);
    // G4 has fixed participants, so wins and draws partition every run.
    let g4 = &predictions.group_matches["G_G4"];
    let total = g4.side_a_wins + g4.side_b_wins + g4.draws;
    assert!((total - 100.0).abs() < 1e-6, "got {total}");
    assert_eq!(g4.side_a_appearances["NZL"], 100.0);
    assert_eq!(g4.side_b_appearances["EGY"], 100.0);
  }

  #[tokio::test]
  async fn test_final_winner_percentages_sum_to_hundred() {
    let predictions = small_batch().await;
    let final_match = &predictions.knockout_matches["final_F"];
    let winners: f64 = final_match.winners.values().sum();
    assert!((winners - 100.0).abs() < 1e-6, "got {winners}");
    let side_a: f64 = final_match.side_a_appearances.values().sum();
    assert!((side_a - 100.0).abs() < 1e-6);
  }

  #[tokio::test]
  async fn test_all_tracked_matches_present() {
    let predictions = small_batch().await;
    assert_eq!(
      predictions.group_matches.len(),
      GROUP_COUNT * MATCHES_PER_GROUP
    );
    // 16 + 8 + 4 + 2 + 1 + 1 knockout matches.
    assert_eq!(predictions.knockout_matches.len(), 32);
    assert!(predictions.knockout_matches.contains_key("third_place_TP"));
  }

  #[tokio::test]
  async fn test_zero_samples_rejected() {
    let state = TournamentState::reference().unwrap();
    let mut rng = SimRng::new(1);
    assert!(predict(&state, 0, &mut rng, |_, _| {}).await.is_err());
  }
}
