use crate::types::*;
use std::cmp::Ordering;
use std::collections::HashMap;

// ── Ordering ───────────────────────────────────────────────────────────

/// Points, then goal difference, then goals scored, all descending.
/// Undecided slots always sort behind resolved teams.
fn compare_standings(a: &GroupStanding, b: &GroupStanding) -> Ordering {
  match (a.slot.is_undecided(), b.slot.is_undecided()) {
    (true, false) => return Ordering::Greater,
    (false, true) => return Ordering::Less,
    _ => {}
  }
  b.points
    .cmp(&a.points)
    .then(b.goal_difference.cmp(&a.goal_difference))
    .then(b.goals_for.cmp(&a.goals_for))
}

// ── Standings calculator ───────────────────────────────────────────────

/// Rebuild a group table from scratch. Matches whose result is missing or
/// whose participants are not both resolved contribute nothing, so the
/// output is independent of the order results arrive in.
pub fn calculate_standings(
  matches: &[GroupMatch],
  results: &[Option<MatchResult>],
  roster: &[Slot],
) -> Vec<GroupStanding> {
  let mut entries: Vec<GroupStanding> = roster
    .iter()
    .map(|slot| GroupStanding::zeroed(slot.clone()))
    .collect();
  let index: HashMap<String, usize> = roster
    .iter()
    .enumerate()
    .map(|(i, slot)| (slot.key(), i))
    .collect();

  for (game, result) in matches.iter().zip(results.iter()) {
    let result = match result {
      Some(result) => result,
      None => continue,
    };
    if game.slot_a.is_undecided() || game.slot_b.is_undecided() {
      continue;
    }
    let (idx_a, idx_b) = match (index.get(&game.slot_a.key()), index.get(&game.slot_b.key())) {
      (Some(&a), Some(&b)) => (a, b),
      _ => continue,
    };

    {
      let entry = &mut entries[idx_a];
      entry.played += 1;
      entry.goals_for += result.score_a as u32;
      entry.goals_against += result.score_b as u32;
    }
    {
      let entry = &mut entries[idx_b];
      entry.played += 1;
      entry.goals_for += result.score_b as u32;
      entry.goals_against += result.score_a as u32;
    }

    if result.score_a > result.score_b {
      entries[idx_a].won += 1;
      entries[idx_a].points += POINTS_WIN;
      entries[idx_b].lost += 1;
    } else if result.score_b > result.score_a {
      entries[idx_b].won += 1;
      entries[idx_b].points += POINTS_WIN;
      entries[idx_a].lost += 1;
    } else {
      entries[idx_a].drawn += 1;
      entries[idx_b].drawn += 1;
      entries[idx_a].points += POINTS_DRAW;
      entries[idx_b].points += POINTS_DRAW;
    }

    for idx in [idx_a, idx_b] {
      let entry = &mut entries[idx];
      entry.goal_difference = entry.goals_for as i32 - entry.goals_against as i32;
    }
  }

  entries.sort_by(compare_standings);
  entries
}

// ── Qualifier resolver ─────────────────────────────────────────────────

/// Top two of each group qualify directly; the eight best third-placed
/// entries join them. Undecided slots pass through untouched.
pub fn resolve_qualifiers(all_standings: &[(String, Vec<GroupStanding>)]) -> Qualifiers {
  let mut first_place = Vec::new();
  let mut second_place = Vec::new();
  let mut third_place = Vec::new();

  for (group, standings) in all_standings {
    if let Some(standing) = standings.first() {
      first_place.push(QualifiedTeam {
        group: group.clone(),
        standing: standing.clone(),
      });
    }
    if let Some(standing) = standings.get(1) {
      second_place.push(QualifiedTeam {
        group: group.clone(),
        standing: standing.clone(),
      });
    }
    if let Some(standing) = standings.get(2) {
      third_place.push(QualifiedTeam {
        group: group.clone(),
        standing: standing.clone(),
      });
    }
  }

  third_place.sort_by(|a, b| compare_standings(&a.standing, &b.standing));
  third_place.truncate(BEST_THIRD_PLACE_SLOTS);

  Qualifiers {
    first_place,
    second_place,
    third_place,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn result(score_a: u8, score_b: u8) -> Option<MatchResult> {
    Some(MatchResult {
      score_a,
      score_b,
      winner: None,
      extra_time: false,
      penalties: false,
      penalty_score: None,
    })
  }

  fn roster() -> Vec<Slot> {
    vec![
      Slot::team("BRA"),
      Slot::team("MAR"),
      Slot::team("HAI"),
      Slot::team("SCO"),
    ]
  }

  fn round_robin() -> Vec<GroupMatch> {
    let pairs = [
      ("C1", "BRA", "MAR"),
      ("C2", "HAI", "SCO"),
      ("C3", "BRA", "HAI"),
      ("C4", "SCO", "MAR"),
      ("C5", "SCO", "BRA"),
      ("C6", "MAR", "HAI"),
    ];
    pairs
      .iter()
      .map(|(id, a, b)| GroupMatch {
        id: id.to_string(),
        slot_a: Slot::team(a),
        slot_b: Slot::team(b),
        matchday: 1,
      })
      .collect()
  }

  #[test]
  fn test_scripted_group_table() {
    // BRA beats everyone, MAR and SCO split their games, HAI loses out.
    let results = vec![
      result(2, 0), // BRA 2-0 MAR
      result(1, 1), // HAI 1-1 SCO
      result(3, 0), // BRA 3-0 HAI
      result(2, 1), // SCO 2-1 MAR
      result(0, 1), // SCO 0-1 BRA
      result(2, 0), // MAR 2-0 HAI
    ];
    let standings = calculate_standings(&round_robin(), &results, &roster());
    assert_eq!(standings[0].slot, Slot::team("BRA"));
    assert_eq!(standings[0].points, 9);
    assert_eq!(standings[0].goal_difference, 6);
    assert_eq!(standings[1].slot, Slot::team("SCO"));
    assert_eq!(standings[1].points, 4);
    assert_eq!(standings[2].slot, Slot::team("MAR"));
    assert_eq!(standings[2].points, 3);
    assert_eq!(standings[3].slot, Slot::team("HAI"));
    assert_eq!(standings[3].points, 1);
  }

  #[test]
  fn test_points_sum_identity() {
    let results = vec![
      result(2, 0),
      result(1, 1),
      result(3, 0),
      result(2, 1),
      result(0, 1),
      result(2, 0),
    ];
    let standings = calculate_standings(&round_robin(), &results, &roster());
    let total: u32 = standings.iter().map(|s| s.points).sum();
    let decisive = 5;
    let draws = 1;
    assert_eq!(total, decisive * POINTS_WIN + draws * 2 * POINTS_DRAW);
  }

  #[test]
  fn test_order_independent() {
    let matches = round_robin();
    let results = vec![
      result(2, 0),
      result(1, 1),
      result(3, 0),
      result(2, 1),
      result(0, 1),
      result(2, 0),
    ];
    let forward = calculate_standings(&matches, &results, &roster());

    let mut reversed_matches: Vec<GroupMatch> = matches.clone();
    reversed_matches.reverse();
    let mut reversed_results = results.clone();
    reversed_results.reverse();
    let backward = calculate_standings(&reversed_matches, &reversed_results, &roster());

    for (a, b) in forward.iter().zip(backward.iter()) {
      assert_eq!(a.slot, b.slot);
      assert_eq!(a.points, b.points);
      assert_eq!(a.goal_difference, b.goal_difference);
    }
  }

  #[test]
  fn test_undecided_slot_sorts_last() {
    let roster = vec![
      Slot::team("KOR"),
      Slot::undecided(&["DEN", "MKD", "CZE", "ISR"]),
      Slot::team("MEX"),
    ];
    let standings = calculate_standings(&[], &[], &roster);
    assert!(standings[2].slot.is_undecided());
    assert_eq!(standings[2].points, 0);
  }

  #[test]
  fn test_unplayed_matches_ignored() {
    let results = vec![result(2, 0), None, None, None, None, None];
    let standings = calculate_standings(&round_robin(), &results, &roster());
    let played: u32 = standings.iter().map(|s| s.played).sum();
    assert_eq!(played, 2);
  }

  #[test]
  fn test_best_thirds_truncated_to_eight() {
    let mut all = Vec::new();
    for (i, group) in ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L"]
      .iter()
      .enumerate()
    {
      let mut standings = Vec::new();
      for pos in 0..3u32 {
        let mut entry = GroupStanding::zeroed(Slot::team(&format!("T{group}{pos}")));
        entry.points = 9 - pos * 3 + i as u32 % 3;
        standings.push(entry);
      }
      all.push((group.to_string(), standings));
    }
    let qualifiers = resolve_qualifiers(&all);
    assert_eq!(qualifiers.first_place.len(), 12);
    assert_eq!(qualifiers.second_place.len(), 12);
    assert_eq!(qualifiers.third_place.len(), BEST_THIRD_PLACE_SLOTS);
    // Best thirds come out sorted by points.
    for pair in qualifiers.third_place.windows(2) {
      assert!(pair[0].standing.points >= pair[1].standing.points);
    }
  }
}
