use crate::bracket::{Bracket, BracketRoundSnapshot};
use crate::data;
use crate::sim::{self, SimRng};
use crate::standings;
use crate::types::*;
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

// ── State ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct GroupState {
  pub id: String,
  pub slots: Vec<Slot>,
  pub matches: Vec<GroupMatch>,
  pub results: Vec<Option<MatchResult>>,
}

impl GroupState {
  fn from_template(template: data::GroupTemplate) -> Self {
    let results = vec![None; template.matches.len()];
    GroupState {
      id: template.id,
      slots: template.slots,
      matches: template.matches,
      results,
    }
  }

  pub fn is_complete(&self) -> bool {
    self.results.iter().all(|r| r.is_some())
  }
}

/// Immutable tournament state. Every transition returns a new state and
/// leaves the receiver untouched; the RNG is the only threaded mutability.
#[derive(Clone, Debug)]
pub struct TournamentState {
  table: TeamTable,
  groups: Vec<GroupState>,
  selections: HashMap<(String, usize), String>,
  bracket: Option<Bracket>,
  qualifiers: Option<Qualifiers>,
}

impl TournamentState {
  pub fn new(table: TeamTable, templates: Vec<data::GroupTemplate>) -> Self {
    TournamentState {
      table,
      groups: templates.into_iter().map(GroupState::from_template).collect(),
      selections: HashMap::new(),
      bracket: None,
      qualifiers: None,
    }
  }

  pub fn reference() -> Result<Self, String> {
    Ok(TournamentState::new(
      data::reference_table()?,
      data::reference_groups(),
    ))
  }

  pub fn table(&self) -> &TeamTable {
    &self.table
  }

  pub fn groups(&self) -> &[GroupState] {
    &self.groups
  }

  pub fn bracket(&self) -> Option<&Bracket> {
    self.bracket.as_ref()
  }

  pub fn qualifiers(&self) -> Option<&Qualifiers> {
    self.qualifiers.as_ref()
  }

  fn group_index(&self, group_id: &str) -> Result<usize, String> {
    self
      .groups
      .iter()
      .position(|g| g.id == group_id)
      .ok_or_else(|| format!("Unknown group: {group_id}"))
  }

  // ── Slot resolution ──────────────────────────────────────────────────

  /// Match an undecided slot back to its template position by candidate
  /// set, ignoring candidate order.
  fn slot_position(group: &GroupState, candidates: &[String]) -> Option<usize> {
    let mut wanted: Vec<&String> = candidates.iter().collect();
    wanted.sort();
    group.slots.iter().position(|slot| match slot.candidates() {
      Some(options) => {
        let mut have: Vec<&String> = options.iter().collect();
        have.sort();
        have == wanted
      }
      None => false,
    })
  }

  /// Apply any recorded selection to a slot. Unselected undecided slots
  /// pass through unchanged.
  fn resolved_slot(&self, group: &GroupState, slot: &Slot) -> Slot {
    let candidates = match slot.candidates() {
      Some(candidates) => candidates,
      None => return slot.clone(),
    };
    let position = match Self::slot_position(group, candidates) {
      Some(position) => position,
      None => return slot.clone(),
    };
    match self.selections.get(&(group.id.clone(), position)) {
      Some(code) => Slot::Team(code.clone()),
      None => slot.clone(),
    }
  }

  fn resolved_roster(&self, group: &GroupState) -> Vec<Slot> {
    group
      .slots
      .iter()
      .map(|slot| self.resolved_slot(group, slot))
      .collect()
  }

  fn resolved_matches(&self, group: &GroupState) -> Vec<GroupMatch> {
    group
      .matches
      .iter()
      .map(|game| GroupMatch {
        id: game.id.clone(),
        slot_a: self.resolved_slot(group, &game.slot_a),
        slot_b: self.resolved_slot(group, &game.slot_b),
        matchday: game.matchday,
      })
      .collect()
  }

  pub fn group_standings(&self, group_id: &str) -> Result<Vec<GroupStanding>, String> {
    let group = &self.groups[self.group_index(group_id)?];
    Ok(standings::calculate_standings(
      &self.resolved_matches(group),
      &group.results,
      &self.resolved_roster(group),
    ))
  }

  fn all_standings(&self) -> Vec<(String, Vec<GroupStanding>)> {
    self
      .groups
      .iter()
      .map(|group| {
        let table = standings::calculate_standings(
          &self.resolved_matches(group),
          &group.results,
          &self.resolved_roster(group),
        );
        (group.id.clone(), table)
      })
      .collect()
  }

  // ── Qualification transitions ────────────────────────────────────────

  /// Manually resolve an undecided qualification slot.
  pub fn select_team(&self, group_id: &str, slot_index: usize, code: &str) -> Result<Self, String> {
    let group = &self.groups[self.group_index(group_id)?];
    let slot = group
      .slots
      .get(slot_index)
      .ok_or_else(|| format!("Group {group_id} has no slot {slot_index}."))?;
    let candidates = slot
      .candidates()
      .ok_or_else(|| format!("Slot {slot_index} of group {group_id} is already decided."))?;
    if !candidates.iter().any(|c| c == code) {
      return Err(format!(
        "{code} is not a candidate for slot {slot_index} of group {group_id}."
      ));
    }
    let mut next = self.clone();
    next
      .selections
      .insert((group_id.to_string(), slot_index), code.to_string());
    Ok(next)
  }

  /// Resolve every remaining undecided slot through a mini round-robin.
  pub fn simulate_qualifiers(&self, rng: &mut SimRng) -> Result<Self, String> {
    let mut next = self.clone();
    for group in &self.groups {
      for (index, slot) in group.slots.iter().enumerate() {
        let candidates = match slot.candidates() {
          Some(candidates) => candidates,
          None => continue,
        };
        let key = (group.id.clone(), index);
        if next.selections.contains_key(&key) {
          continue;
        }
        let winner = sim::resolve_slot(&self.table, candidates, rng)?;
        info!("Qualifier resolved: group {} slot {index} -> {winner}", group.id);
        next.selections.insert(key, winner);
      }
    }
    Ok(next)
  }

  // ── Group stage transitions ──────────────────────────────────────────

  /// Simulate one group match. Matches that already have a result, or
  /// whose participants are still undecided, are left untouched.
  pub fn simulate_group_match(
    &self,
    group_id: &str,
    match_index: usize,
    rng: &mut SimRng,
  ) -> Result<Self, String> {
    let group_idx = self.group_index(group_id)?;
    let group = &self.groups[group_idx];
    let game = group
      .matches
      .get(match_index)
      .ok_or_else(|| format!("Group {group_id} has no match {match_index}."))?;
    if group.results[match_index].is_some() {
      return Ok(self.clone());
    }
    let slot_a = self.resolved_slot(group, &game.slot_a);
    let slot_b = self.resolved_slot(group, &game.slot_b);
    let outcome = sim::simulate_group_match(&self.table, &slot_a, &slot_b, rng)?;
    let result = match outcome.into_result() {
      Some(result) => result,
      None => return Ok(self.clone()),
    };
    let mut next = self.clone();
    next.groups[group_idx].results[match_index] = Some(result);
    Ok(next)
  }

  pub fn simulate_group(&self, group_id: &str, rng: &mut SimRng) -> Result<Self, String> {
    let group_idx = self.group_index(group_id)?;
    let match_count = self.groups[group_idx].matches.len();
    let mut state = self.clone();
    for index in 0..match_count {
      state = state.simulate_group_match(group_id, index, rng)?;
    }
    Ok(state)
  }

  pub fn simulate_all_groups(&self, rng: &mut SimRng) -> Result<Self, String> {
    let ids: Vec<String> = self.groups.iter().map(|g| g.id.clone()).collect();
    let mut state = self.clone();
    for id in ids {
      state = state.simulate_group(&id, rng)?;
    }
    Ok(state)
  }

  pub fn group_stage_complete(&self) -> bool {
    self.groups.iter().all(|group| group.is_complete())
  }

  // ── Knockout transitions ─────────────────────────────────────────────

  /// Compute qualifiers and seed the opening knockout round. Requires a
  /// fully played group stage.
  pub fn advance_to_knockout(&self) -> Result<Self, String> {
    if !self.group_stage_complete() {
      return Err("Group stage is not complete.".to_string());
    }
    let qualifiers = standings::resolve_qualifiers(&self.all_standings());
    let bracket = Bracket::initial().seed_round_of_32(&qualifiers);
    info!("Knockout stage seeded from group results");
    let mut next = self.clone();
    next.qualifiers = Some(qualifiers);
    next.bracket = Some(bracket);
    Ok(next)
  }

  /// Simulate one knockout match and advance its winner. A match without
  /// both participants, or one already played, is left untouched.
  pub fn simulate_knockout_match(
    &self,
    round: KnockoutRound,
    index: usize,
    rng: &mut SimRng,
  ) -> Result<Self, String> {
    let bracket = self
      .bracket
      .as_ref()
      .ok_or_else(|| "Knockout stage has not started.".to_string())?;
    let game = bracket
      .get(round, index)
      .ok_or_else(|| format!("No match at index {index} in {}.", round.label()))?;
    if !game.is_ready() {
      return Ok(self.clone());
    }
    let slot_a = Slot::Team(game.slot_a.clone().unwrap_or_default());
    let slot_b = Slot::Team(game.slot_b.clone().unwrap_or_default());
    let outcome = sim::simulate_knockout_match(&self.table, &slot_a, &slot_b, rng)?;
    let result = match outcome.into_result() {
      Some(result) => result,
      None => return Ok(self.clone()),
    };
    let updated = bracket.record_result(round, index, result)?;
    let mut next = self.clone();
    next.bracket = Some(updated);
    Ok(next)
  }

  /// Simulate a whole round. After the semi-finals the third-place match
  /// is played as soon as both losers are known.
  pub fn simulate_knockout_round(&self, round: KnockoutRound, rng: &mut SimRng) -> Result<Self, String> {
    let bracket = self
      .bracket
      .as_ref()
      .ok_or_else(|| "Knockout stage has not started.".to_string())?;
    let match_count = bracket.round(round).len();
    let mut state = self.clone();
    for index in 0..match_count {
      state = state.simulate_knockout_match(round, index, rng)?;
    }
    if round == KnockoutRound::SemiFinals {
      state = state.simulate_knockout_match(KnockoutRound::ThirdPlace, 0, rng)?;
    }
    Ok(state)
  }

  /// Run the remaining pipeline end to end: qualifiers, groups, seeding,
  /// and every knockout round through the Final.
  pub fn simulate_tournament(&self, rng: &mut SimRng) -> Result<Self, String> {
    let mut state = self.simulate_qualifiers(rng)?;
    state = state.simulate_all_groups(rng)?;
    state = state.advance_to_knockout()?;
    for round in KnockoutRound::ADVANCING {
      state = state.simulate_knockout_round(round, rng)?;
    }
    Ok(state)
  }

  /// Back to the untouched template: no selections, no results, no bracket.
  pub fn reset(&self) -> Self {
    let mut next = self.clone();
    for group in &mut next.groups {
      group.results = vec![None; group.matches.len()];
    }
    next.selections.clear();
    next.bracket = None;
    next.qualifiers = None;
    next
  }

  // ── Derived views ────────────────────────────────────────────────────

  fn has_unresolved_qualifier(&self) -> bool {
    self.groups.iter().any(|group| {
      group.slots.iter().enumerate().any(|(index, slot)| {
        slot.is_undecided() && !self.selections.contains_key(&(group.id.clone(), index))
      })
    })
  }

  /// The phase is never stored; it always follows from the contents, so
  /// it cannot drift out of sync with the bracket.
  pub fn phase(&self) -> TournamentPhase {
    if let Some(bracket) = &self.bracket {
      return match bracket.current_round() {
        Some(KnockoutRound::RoundOf32) => TournamentPhase::RoundOf32,
        Some(KnockoutRound::RoundOf16) => TournamentPhase::RoundOf16,
        Some(KnockoutRound::QuarterFinals) => TournamentPhase::QuarterFinals,
        Some(KnockoutRound::SemiFinals) => TournamentPhase::SemiFinals,
        Some(KnockoutRound::ThirdPlace) | Some(KnockoutRound::Final) => TournamentPhase::Final,
        None => TournamentPhase::Completed,
      };
    }
    if self.has_unresolved_qualifier() {
      TournamentPhase::Qualifiers
    } else {
      TournamentPhase::GroupStage
    }
  }

  pub fn champion(&self) -> Option<String> {
    self.bracket.as_ref().and_then(|b| b.champion())
  }

  pub fn runner_up(&self) -> Option<String> {
    self.bracket.as_ref().and_then(|b| b.runner_up())
  }

  pub fn third_place(&self) -> Option<String> {
    self.bracket.as_ref().and_then(|b| b.third_place())
  }

  pub fn snapshot(&self) -> TournamentSnapshot {
    let groups = self
      .groups
      .iter()
      .map(|group| {
        let matches = self
          .resolved_matches(group)
          .into_iter()
          .zip(group.results.iter())
          .map(|(game, result)| GroupMatchSnapshot {
            id: game.id.clone(),
            slot_a: game.slot_a.clone(),
            slot_b: game.slot_b.clone(),
            matchday: game.matchday,
            result: result.clone(),
          })
          .collect();
        GroupSnapshot {
          id: group.id.clone(),
          slots: self.resolved_roster(group),
          matches,
          standings: standings::calculate_standings(
            &self.resolved_matches(group),
            &group.results,
            &self.resolved_roster(group),
          ),
        }
      })
      .collect();
    TournamentSnapshot {
      phase: self.phase(),
      groups,
      qualifiers: self.qualifiers.clone(),
      bracket: self.bracket.as_ref().map(|b| b.snapshot()),
      champion: self.champion(),
      runner_up: self.runner_up(),
      third_place: self.third_place(),
    }
  }
}

// ── Snapshots ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMatchSnapshot {
  pub id: String,
  pub slot_a: Slot,
  pub slot_b: Slot,
  pub matchday: u8,
  pub result: Option<MatchResult>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSnapshot {
  pub id: String,
  pub slots: Vec<Slot>,
  pub matches: Vec<GroupMatchSnapshot>,
  pub standings: Vec<GroupStanding>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentSnapshot {
  pub phase: TournamentPhase,
  pub groups: Vec<GroupSnapshot>,
  pub qualifiers: Option<Qualifiers>,
  pub bracket: Option<Vec<BracketRoundSnapshot>>,
  pub champion: Option<String>,
  pub runner_up: Option<String>,
  pub third_place: Option<String>,
}
