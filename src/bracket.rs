use crate::data;
use crate::types::*;
use serde::Serialize;
use std::sync::Arc;

// ── Seeding labels ─────────────────────────────────────────────────────

fn group_letter(raw: &str) -> Option<char> {
  let trimmed = raw.trim();
  let mut chars = trimmed.chars();
  let letter = chars.next()?.to_ascii_uppercase();
  if chars.next().is_some() {
    return None;
  }
  if ('A'..='L').contains(&letter) {
    Some(letter)
  } else {
    None
  }
}

fn qualified_code(entries: &[QualifiedTeam], group: char) -> Option<String> {
  let entry = entries.iter().find(|q| q.group == group.to_string())?;
  // An undecided qualifier cannot seed a bracket slot yet.
  entry.standing.slot.code().map(|c| c.to_string())
}

/// Resolve one side of a seeding label against the qualifier lists.
/// Grammar (case-insensitive): "Winner X", "Runner-up X", "1X", "2X",
/// "3X/Y/Z" or "3rd X/Y/Z". Anything else, or a reference that is still
/// undecided, resolves to `None`.
pub fn resolve_label(label: &str, qualifiers: &Qualifiers) -> Option<String> {
  let trimmed = label.trim();
  if trimmed.is_empty() {
    return None;
  }
  let lower = trimmed.to_ascii_lowercase();

  if let Some(rest) = lower.strip_prefix("winner") {
    if !rest.starts_with(char::is_whitespace) {
      return None;
    }
    let group = group_letter(rest)?;
    return qualified_code(&qualifiers.first_place, group);
  }

  if let Some(rest) = lower.strip_prefix("runner-up") {
    if !rest.starts_with(char::is_whitespace) {
      return None;
    }
    let group = group_letter(rest)?;
    return qualified_code(&qualifiers.second_place, group);
  }

  if let Some(rest) = lower.strip_prefix("3rd").or_else(|| lower.strip_prefix('3')) {
    let mut groups = Vec::new();
    for part in rest.trim().split('/') {
      groups.push(group_letter(part)?);
    }
    if groups.is_empty() {
      return None;
    }
    // First listed group that actually produced a qualifying third place.
    for group in groups {
      if let Some(entry) = qualifiers
        .third_place
        .iter()
        .find(|q| q.group == group.to_string())
      {
        return entry.standing.slot.code().map(|c| c.to_string());
      }
    }
    return None;
  }

  if let Some(rest) = lower.strip_prefix('1') {
    let group = group_letter(rest)?;
    return qualified_code(&qualifiers.first_place, group);
  }
  if let Some(rest) = lower.strip_prefix('2') {
    let group = group_letter(rest)?;
    return qualified_code(&qualifiers.second_place, group);
  }

  None
}

/// Split a full match label on a "vs" separator and resolve both sides.
/// A label without exactly one separator is malformed and yields neither
/// participant rather than failing.
pub fn resolve_match_label(
  label: &str,
  qualifiers: &Qualifiers,
) -> (Option<String>, Option<String>) {
  let tokens: Vec<&str> = label.split_whitespace().collect();
  let separators: Vec<usize> = tokens
    .iter()
    .enumerate()
    .filter(|(_, token)| token.eq_ignore_ascii_case("vs"))
    .map(|(i, _)| i)
    .collect();
  if separators.len() != 1 {
    return (None, None);
  }
  let at = separators[0];
  if at == 0 || at == tokens.len() - 1 {
    return (None, None);
  }
  let left = tokens[..at].join(" ");
  let right = tokens[at + 1..].join(" ");
  (
    resolve_label(&left, qualifiers),
    resolve_label(&right, qualifiers),
  )
}

// ── Bracket arena ──────────────────────────────────────────────────────

fn round_ordinal(round: KnockoutRound) -> usize {
  match round {
    KnockoutRound::RoundOf32 => 0,
    KnockoutRound::RoundOf16 => 1,
    KnockoutRound::QuarterFinals => 2,
    KnockoutRound::SemiFinals => 3,
    KnockoutRound::ThirdPlace => 4,
    KnockoutRound::Final => 5,
  }
}

const ROUND_ORDER: [KnockoutRound; 6] = [
  KnockoutRound::RoundOf32,
  KnockoutRound::RoundOf16,
  KnockoutRound::QuarterFinals,
  KnockoutRound::SemiFinals,
  KnockoutRound::ThirdPlace,
  KnockoutRound::Final,
];

/// Knockout bracket with rounds held behind `Arc` so recording a result
/// copies only the rounds it touches.
#[derive(Clone, Debug)]
pub struct Bracket {
  rounds: [Arc<Vec<BracketMatch>>; 6],
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketRoundSnapshot {
  pub round: KnockoutRound,
  pub matches: Vec<BracketMatch>,
}

impl Bracket {
  pub fn initial() -> Self {
    Bracket {
      rounds: [
        Arc::new(data::round_of_32_template()),
        Arc::new(data::round_of_16_template()),
        Arc::new(data::quarter_finals_template()),
        Arc::new(data::semi_finals_template()),
        Arc::new(data::third_place_template()),
        Arc::new(data::final_template()),
      ],
    }
  }

  pub fn round(&self, round: KnockoutRound) -> &[BracketMatch] {
    &self.rounds[round_ordinal(round)]
  }

  pub fn get(&self, round: KnockoutRound, index: usize) -> Option<&BracketMatch> {
    self.round(round).get(index)
  }

  /// Fill the opening round from the qualifier lists via seeding labels.
  pub fn seed_round_of_32(&self, qualifiers: &Qualifiers) -> Bracket {
    let mut next = self.clone();
    let matches = Arc::make_mut(&mut next.rounds[round_ordinal(KnockoutRound::RoundOf32)]);
    for game in matches.iter_mut() {
      if let Some(label) = game.label.clone() {
        let (slot_a, slot_b) = resolve_match_label(&label, qualifiers);
        game.slot_a = slot_a;
        game.slot_b = slot_b;
      }
    }
    next
  }

  /// Record a completed match and propagate its winner: match `i` feeds
  /// match `i / 2` of the following round, the A side when `i` is even.
  /// Semi-final losers drop into the third-place match by the same parity.
  pub fn record_result(
    &self,
    round: KnockoutRound,
    index: usize,
    result: MatchResult,
  ) -> Result<Bracket, String> {
    let current = self
      .get(round, index)
      .ok_or_else(|| format!("No match at index {index} in {}.", round.label()))?;
    if current.result.is_some() {
      return Err(format!(
        "Match {} in {} already has a result.",
        current.id,
        round.label()
      ));
    }
    let winner = result
      .winner
      .clone()
      .ok_or_else(|| format!("Knockout result for {} names no winner.", current.id))?;
    let participants = [current.slot_a.as_deref(), current.slot_b.as_deref()];
    if !participants.contains(&Some(winner.as_str())) {
      return Err(format!(
        "Winner {winner} is not a participant of {}.",
        current.id
      ));
    }

    let mut next = self.clone();
    {
      let matches = Arc::make_mut(&mut next.rounds[round_ordinal(round)]);
      matches[index].result = Some(result);
    }

    if let Some(next_round) = round.next() {
      let feeds = Arc::make_mut(&mut next.rounds[round_ordinal(next_round)]);
      let target = index / 2;
      if let Some(slot) = feeds.get_mut(target) {
        if index % 2 == 0 {
          slot.slot_a = Some(winner.clone());
        } else {
          slot.slot_b = Some(winner.clone());
        }
      }
    }

    if round == KnockoutRound::SemiFinals {
      let loser = next
        .get(round, index)
        .and_then(|game| game.loser().map(|l| l.to_string()));
      if let Some(loser) = loser {
        let third = Arc::make_mut(&mut next.rounds[round_ordinal(KnockoutRound::ThirdPlace)]);
        if let Some(game) = third.first_mut() {
          if index == 0 {
            game.slot_a = Some(loser);
          } else {
            game.slot_b = Some(loser);
          }
        }
      }
    }

    Ok(next)
  }

  pub fn is_round_complete(&self, round: KnockoutRound) -> bool {
    self.round(round).iter().all(|game| game.result.is_some())
  }

  /// Earliest advancing round that still has an unplayed match. `None`
  /// once the Final is decided. The third-place match does not gate this.
  pub fn current_round(&self) -> Option<KnockoutRound> {
    KnockoutRound::ADVANCING
      .iter()
      .copied()
      .find(|round| !self.is_round_complete(*round))
  }

  pub fn champion(&self) -> Option<String> {
    self
      .get(KnockoutRound::Final, 0)
      .and_then(|game| game.result.as_ref())
      .and_then(|result| result.winner.clone())
  }

  pub fn runner_up(&self) -> Option<String> {
    self
      .get(KnockoutRound::Final, 0)
      .and_then(|game| game.loser().map(|l| l.to_string()))
  }

  pub fn third_place(&self) -> Option<String> {
    self
      .get(KnockoutRound::ThirdPlace, 0)
      .and_then(|game| game.result.as_ref())
      .and_then(|result| result.winner.clone())
  }

  pub fn snapshot(&self) -> Vec<BracketRoundSnapshot> {
    ROUND_ORDER
      .iter()
      .map(|round| BracketRoundSnapshot {
        round: *round,
        matches: self.round(*round).to_vec(),
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;

  fn make_qualifiers() -> Qualifiers {
    let entry = |group: &str, code: &str, points: u32| {
      let mut standing = GroupStanding::zeroed(Slot::team(code));
      standing.points = points;
      QualifiedTeam {
        group: group.to_string(),
        standing,
      }
    };
    Qualifiers {
      first_place: vec![entry("A", "MEX", 9), entry("E", "GER", 9), entry("C", "BRA", 9)],
      second_place: vec![entry("A", "KOR", 6), entry("B", "SUI", 6)],
      third_place: vec![entry("C", "SCO", 4), entry("F", "JPN", 4)],
    }
  }

  fn knockout_result(winner: &str, score_a: u8, score_b: u8) -> MatchResult {
    MatchResult {
      score_a,
      score_b,
      winner: Some(winner.to_string()),
      extra_time: false,
      penalties: false,
      penalty_score: None,
    }
  }

  #[test]
  fn test_label_grammar() {
    let q = make_qualifiers();
    assert_eq!(resolve_label("Winner E", &q), Some("GER".to_string()));
    assert_eq!(resolve_label("winner a", &q), Some("MEX".to_string()));
    assert_eq!(resolve_label("Runner-up B", &q), Some("SUI".to_string()));
    assert_eq!(resolve_label("1C", &q), Some("BRA".to_string()));
    assert_eq!(resolve_label("2A", &q), Some("KOR".to_string()));
    assert_eq!(resolve_label("3A/B/C/D/F", &q), Some("SCO".to_string()));
    assert_eq!(resolve_label("3rd F/C", &q), Some("JPN".to_string()));
    // Unknown references resolve to nothing, not an error.
    assert_eq!(resolve_label("Winner Z", &q), None);
    assert_eq!(resolve_label("3A/B", &q), None);
    assert_eq!(resolve_label("gibberish", &q), None);
  }

  #[test]
  fn test_undecided_qualifier_resolves_to_none() {
    let mut q = make_qualifiers();
    q.first_place[1].standing.slot = Slot::undecided(&["GER", "AUT"]);
    assert_eq!(resolve_label("Winner E", &q), None);
  }

  #[test]
  fn test_match_label_splitter() {
    let q = make_qualifiers();
    let (a, b) = resolve_match_label("Winner E vs 3rd C/F", &q);
    assert_eq!(a, Some("GER".to_string()));
    assert_eq!(b, Some("SCO".to_string()));

    let (a, b) = resolve_match_label("Winner E", &q);
    assert_eq!((a, b), (None, None));
    let (a, b) = resolve_match_label("A vs B vs C", &q);
    assert_eq!((a, b), (None, None));
  }

  #[test]
  fn test_advancement_parity() {
    let mut bracket = Bracket::initial();
    {
      let matches = Arc::make_mut(&mut bracket.rounds[0]);
      matches[0].slot_a = Some("MEX".to_string());
      matches[0].slot_b = Some("KOR".to_string());
      matches[1].slot_a = Some("GER".to_string());
      matches[1].slot_b = Some("SCO".to_string());
    }
    let bracket = bracket
      .record_result(KnockoutRound::RoundOf32, 0, knockout_result("MEX", 2, 0))
      .unwrap();
    let bracket = bracket
      .record_result(KnockoutRound::RoundOf32, 1, knockout_result("SCO", 0, 1))
      .unwrap();
    let fed = bracket.get(KnockoutRound::RoundOf16, 0).unwrap();
    assert_eq!(fed.slot_a.as_deref(), Some("MEX"));
    assert_eq!(fed.slot_b.as_deref(), Some("SCO"));
  }

  #[test]
  fn test_semi_final_losers_seed_third_place() {
    let mut bracket = Bracket::initial();
    {
      let semis = Arc::make_mut(&mut bracket.rounds[3]);
      semis[0].slot_a = Some("ARG".to_string());
      semis[0].slot_b = Some("FRA".to_string());
      semis[1].slot_a = Some("ESP".to_string());
      semis[1].slot_b = Some("ENG".to_string());
    }
    let bracket = bracket
      .record_result(KnockoutRound::SemiFinals, 0, knockout_result("ARG", 2, 1))
      .unwrap();
    let bracket = bracket
      .record_result(KnockoutRound::SemiFinals, 1, knockout_result("ESP", 1, 0))
      .unwrap();
    let third = bracket.get(KnockoutRound::ThirdPlace, 0).unwrap();
    assert_eq!(third.slot_a.as_deref(), Some("FRA"));
    assert_eq!(third.slot_b.as_deref(), Some("ENG"));
    let final_match = bracket.get(KnockoutRound::Final, 0).unwrap();
    assert_eq!(final_match.slot_a.as_deref(), Some("ARG"));
    assert_eq!(final_match.slot_b.as_deref(), Some("ESP"));
  }

  #[test]
  fn test_record_result_rejects_foreign_winner() {
    let mut bracket = Bracket::initial();
    {
      let matches = Arc::make_mut(&mut bracket.rounds[0]);
      matches[0].slot_a = Some("MEX".to_string());
      matches[0].slot_b = Some("KOR".to_string());
    }
    let err = bracket.record_result(KnockoutRound::RoundOf32, 0, knockout_result("BRA", 2, 0));
    assert!(err.is_err());
  }

  #[test]
  fn test_structural_sharing_on_record() {
    let mut bracket = Bracket::initial();
    {
      let matches = Arc::make_mut(&mut bracket.rounds[0]);
      matches[0].slot_a = Some("MEX".to_string());
      matches[0].slot_b = Some("KOR".to_string());
    }
    let updated = bracket
      .record_result(KnockoutRound::RoundOf32, 0, knockout_result("MEX", 1, 0))
      .unwrap();
    // Untouched rounds still share storage with the source bracket.
    assert!(Arc::ptr_eq(&bracket.rounds[2], &updated.rounds[2]));
    assert!(Arc::ptr_eq(&bracket.rounds[5], &updated.rounds[5]));
    assert!(!Arc::ptr_eq(&bracket.rounds[0], &updated.rounds[0]));
  }

  #[test]
  fn test_champion_derivation() {
    let mut bracket = Bracket::initial();
    {
      let finals = Arc::make_mut(&mut bracket.rounds[5]);
      finals[0].slot_a = Some("ARG".to_string());
      finals[0].slot_b = Some("ESP".to_string());
      let third = Arc::make_mut(&mut bracket.rounds[4]);
      third[0].slot_a = Some("FRA".to_string());
      third[0].slot_b = Some("ENG".to_string());
    }
    let bracket = bracket
      .record_result(KnockoutRound::ThirdPlace, 0, knockout_result("ENG", 0, 2))
      .unwrap();
    let bracket = bracket
      .record_result(KnockoutRound::Final, 0, knockout_result("ARG", 3, 2))
      .unwrap();
    assert_eq!(bracket.champion().as_deref(), Some("ARG"));
    assert_eq!(bracket.runner_up().as_deref(), Some("ESP"));
    assert_eq!(bracket.third_place().as_deref(), Some("ENG"));
    assert_eq!(bracket.current_round(), None);
  }
}
