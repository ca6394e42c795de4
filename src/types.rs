use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Constants ──────────────────────────────────────────────────────────

pub const GROUP_COUNT: usize = 12;
pub const GROUP_SIZE: usize = 4;
pub const MATCHES_PER_GROUP: usize = 6;
pub const MAX_GOALS: u8 = 6;
pub const POINTS_WIN: u32 = 3;
pub const POINTS_DRAW: u32 = 1;
pub const BEST_THIRD_PLACE_SLOTS: usize = 8;
pub const ROUND_OF_32_MATCHES: usize = 16;

// ── Teams ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
  pub code: String,
  pub name: String,
  pub ranking: u32,
  pub points: f64,
}

/// Team lookup plus the observed points range used to normalize strength.
#[derive(Clone, Debug)]
pub struct TeamTable {
  teams: HashMap<String, Team>,
  min_points: f64,
  max_points: f64,
}

impl TeamTable {
  pub fn new(teams: Vec<Team>) -> Result<Self, String> {
    if teams.is_empty() {
      return Err("Team table needs at least one team.".to_string());
    }
    let mut min_points = f64::MAX;
    let mut max_points = f64::MIN;
    let mut by_code = HashMap::new();
    for team in teams {
      if team.points < min_points {
        min_points = team.points;
      }
      if team.points > max_points {
        max_points = team.points;
      }
      if by_code.insert(team.code.clone(), team).is_some() {
        return Err("Team table contains a duplicate code.".to_string());
      }
    }
    Ok(TeamTable {
      teams: by_code,
      min_points,
      max_points,
    })
  }

  pub fn get(&self, code: &str) -> Option<&Team> {
    self.teams.get(code)
  }

  pub fn points(&self, code: &str) -> Result<f64, String> {
    self
      .teams
      .get(code)
      .map(|team| team.points)
      .ok_or_else(|| format!("Unknown team code: {code}"))
  }

  pub fn min_points(&self) -> f64 {
    self.min_points
  }

  pub fn max_points(&self) -> f64 {
    self.max_points
  }

  pub fn len(&self) -> usize {
    self.teams.len()
  }

  pub fn is_empty(&self) -> bool {
    self.teams.is_empty()
  }
}

// ── Slots ──────────────────────────────────────────────────────────────

/// A tournament slot: either a concrete team or the set of candidates still
/// competing for the place. Serialized as a bare code or an array of codes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Slot {
  Team(String),
  Undecided(Vec<String>),
}

impl Slot {
  pub fn team(code: &str) -> Self {
    Slot::Team(code.to_string())
  }

  pub fn undecided(codes: &[&str]) -> Self {
    Slot::Undecided(codes.iter().map(|c| c.to_string()).collect())
  }

  pub fn code(&self) -> Option<&str> {
    match self {
      Slot::Team(code) => Some(code),
      Slot::Undecided(_) => None,
    }
  }

  pub fn is_undecided(&self) -> bool {
    matches!(self, Slot::Undecided(_))
  }

  pub fn candidates(&self) -> Option<&[String]> {
    match self {
      Slot::Team(_) => None,
      Slot::Undecided(codes) => Some(codes),
    }
  }

  /// Stable map key. Undecided slots collapse to the joined candidate list.
  pub fn key(&self) -> String {
    match self {
      Slot::Team(code) => code.clone(),
      Slot::Undecided(codes) => codes.join("/"),
    }
  }
}

// ── Matches ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMatch {
  pub id: String,
  pub slot_a: Slot,
  pub slot_b: Slot,
  pub matchday: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyScore {
  pub side_a: u8,
  pub side_b: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
  pub score_a: u8,
  pub score_b: u8,
  pub winner: Option<String>,
  pub extra_time: bool,
  pub penalties: bool,
  pub penalty_score: Option<PenaltyScore>,
}

impl MatchResult {
  pub fn is_draw(&self) -> bool {
    self.winner.is_none()
  }
}

/// Outcome of asking the simulator for a match that may not be simulable
/// yet. An undecided participant is a normal state, not an error.
#[derive(Clone, Debug)]
pub enum SimOutcome {
  Played(MatchResult),
  Unresolved,
}

impl SimOutcome {
  pub fn into_result(self) -> Option<MatchResult> {
    match self {
      SimOutcome::Played(result) => Some(result),
      SimOutcome::Unresolved => None,
    }
  }
}

// ── Standings and qualifiers ───────────────────────────────────────────

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStanding {
  pub slot: Slot,
  pub played: u32,
  pub won: u32,
  pub drawn: u32,
  pub lost: u32,
  pub goals_for: u32,
  pub goals_against: u32,
  pub goal_difference: i32,
  pub points: u32,
}

impl GroupStanding {
  pub fn zeroed(slot: Slot) -> Self {
    GroupStanding {
      slot,
      played: 0,
      won: 0,
      drawn: 0,
      lost: 0,
      goals_for: 0,
      goals_against: 0,
      goal_difference: 0,
      points: 0,
    }
  }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifiedTeam {
  pub group: String,
  pub standing: GroupStanding,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Qualifiers {
  pub first_place: Vec<QualifiedTeam>,
  pub second_place: Vec<QualifiedTeam>,
  pub third_place: Vec<QualifiedTeam>,
}

// ── Knockout bracket ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KnockoutRound {
  #[serde(rename = "round_of_32")]
  RoundOf32,
  #[serde(rename = "round_of_16")]
  RoundOf16,
  #[serde(rename = "quarter_finals")]
  QuarterFinals,
  #[serde(rename = "semi_finals")]
  SemiFinals,
  #[serde(rename = "third_place")]
  ThirdPlace,
  #[serde(rename = "final")]
  Final,
}

impl KnockoutRound {
  pub fn key(&self) -> &'static str {
    match self {
      KnockoutRound::RoundOf32 => "round_of_32",
      KnockoutRound::RoundOf16 => "round_of_16",
      KnockoutRound::QuarterFinals => "quarter_finals",
      KnockoutRound::SemiFinals => "semi_finals",
      KnockoutRound::ThirdPlace => "third_place",
      KnockoutRound::Final => "final",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      KnockoutRound::RoundOf32 => "Round of 32",
      KnockoutRound::RoundOf16 => "Round of 16",
      KnockoutRound::QuarterFinals => "Quarter-Finals",
      KnockoutRound::SemiFinals => "Semi-Finals",
      KnockoutRound::ThirdPlace => "Third Place",
      KnockoutRound::Final => "Final",
    }
  }

  /// Rounds whose winners feed a later match, in play order.
  pub const ADVANCING: [KnockoutRound; 5] = [
    KnockoutRound::RoundOf32,
    KnockoutRound::RoundOf16,
    KnockoutRound::QuarterFinals,
    KnockoutRound::SemiFinals,
    KnockoutRound::Final,
  ];

  pub fn next(&self) -> Option<KnockoutRound> {
    match self {
      KnockoutRound::RoundOf32 => Some(KnockoutRound::RoundOf16),
      KnockoutRound::RoundOf16 => Some(KnockoutRound::QuarterFinals),
      KnockoutRound::QuarterFinals => Some(KnockoutRound::SemiFinals),
      KnockoutRound::SemiFinals => Some(KnockoutRound::Final),
      KnockoutRound::ThirdPlace | KnockoutRound::Final => None,
    }
  }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketMatch {
  pub id: String,
  /// Seeding label for the opening round, e.g. "Winner E vs 3rd A/B/C/D/F".
  pub label: Option<String>,
  pub slot_a: Option<String>,
  pub slot_b: Option<String>,
  pub result: Option<MatchResult>,
}

impl BracketMatch {
  pub fn labeled(id: &str, label: &str) -> Self {
    BracketMatch {
      id: id.to_string(),
      label: Some(label.to_string()),
      slot_a: None,
      slot_b: None,
      result: None,
    }
  }

  pub fn empty(id: &str) -> Self {
    BracketMatch {
      id: id.to_string(),
      label: None,
      slot_a: None,
      slot_b: None,
      result: None,
    }
  }

  pub fn is_ready(&self) -> bool {
    self.slot_a.is_some() && self.slot_b.is_some() && self.result.is_none()
  }

  pub fn loser(&self) -> Option<&str> {
    let winner = self.result.as_ref().and_then(|r| r.winner.as_deref())?;
    match (self.slot_a.as_deref(), self.slot_b.as_deref()) {
      (Some(a), Some(b)) => {
        if a == winner {
          Some(b)
        } else {
          Some(a)
        }
      }
      _ => None,
    }
  }
}

// ── Phases ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TournamentPhase {
  #[serde(rename = "qualifiers")]
  Qualifiers,
  #[serde(rename = "group_stage")]
  GroupStage,
  #[serde(rename = "round_of_32")]
  RoundOf32,
  #[serde(rename = "round_of_16")]
  RoundOf16,
  #[serde(rename = "quarter_finals")]
  QuarterFinals,
  #[serde(rename = "semi_finals")]
  SemiFinals,
  #[serde(rename = "final")]
  Final,
  #[serde(rename = "completed")]
  Completed,
}

// ── Predictions ────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPrediction {
  pub match_id: String,
  pub stage: String,
  /// Percentage of runs in which each team occupied the A side.
  pub side_a_appearances: HashMap<String, f64>,
  pub side_b_appearances: HashMap<String, f64>,
  /// Percentage of runs each team won this match.
  pub winners: HashMap<String, f64>,
  pub draws: f64,
  pub side_a_wins: f64,
  pub side_b_wins: f64,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Predictions {
  pub group_matches: HashMap<String, MatchPrediction>,
  pub knockout_matches: HashMap<String, MatchPrediction>,
  pub sample_count: u32,
  pub completed_runs: u32,
}
