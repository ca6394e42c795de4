// Reference data for the 48-team tournament: team table, group templates,
// and the knockout bracket skeleton. Rankings and points are a late-2025
// snapshot and drive the simulation probabilities.

use crate::types::*;

fn team(code: &str, name: &str, ranking: u32, points: f64) -> Team {
  Team {
    code: code.to_string(),
    name: name.to_string(),
    ranking,
    points,
  }
}

pub fn reference_teams() -> Vec<Team> {
  vec![
    team("MEX", "Mexico", 15, 1675.75),
    team("RSA", "South Africa", 61, 1426.73),
    team("KOR", "Korea Republic", 22, 1599.45),
    team("DEN", "Denmark", 21, 1616.75),
    team("MKD", "North Macedonia", 66, 1378.57),
    team("CZE", "Czech Republic", 44, 1487.00),
    team("ISR", "Israel", 77, 1328.14),
    team("BEL", "Belgium", 8, 1730.71),
    team("EGY", "Egypt", 32, 1529.71),
    team("NZL", "New Zealand", 87, 1279.25),
    team("CAN", "Canada", 26, 1574.01),
    team("ITA", "Italy", 12, 1702.06),
    team("QAT", "Qatar", 54, 1454.96),
    team("SUI", "Switzerland", 17, 1654.69),
    team("NIR", "Northern Ireland", 69, 1366.02),
    team("WAL", "Wales", 29, 1553.14),
    team("BIH", "Bosnia and Herzegovina", 71, 1362.37),
    team("BRA", "Brazil", 5, 1760.46),
    team("MAR", "Morocco", 11, 1716.34),
    team("HAI", "Haiti", 84, 1294.49),
    team("SCO", "Scotland", 38, 1502.46),
    team("USA", "United States", 14, 1681.88),
    team("PAR", "Paraguay", 39, 1501.50),
    team("AUS", "Australia", 35, 1515.18),
    team("TUR", "Türkiye", 25, 1582.69),
    team("ROU", "Romania", 47, 1465.78),
    team("SVK", "Slovakia", 45, 1485.65),
    team("KOS", "Kosovo", 80, 1308.84),
    team("NED", "Netherlands", 7, 1756.27),
    team("JPN", "Japan", 18, 1650.12),
    team("UKR", "Ukraine", 36, 1506.77),
    team("TUN", "Tunisia", 41, 1494.86),
    team("SWE", "Sweden", 43, 1487.13),
    team("ALB", "Albania", 63, 1401.07),
    team("ARG", "Argentina", 2, 1873.33),
    team("FRA", "France", 3, 1870.00),
    team("SEN", "Senegal", 19, 1648.07),
    team("NOR", "Norway", 37, 1506.34),
    team("ESP", "Spain", 1, 1877.18),
    team("CPV", "Cape Verde", 67, 1370.49),
    team("KSA", "Saudi Arabia", 60, 1429.48),
    team("URU", "Uruguay", 16, 1672.62),
    team("GER", "Germany", 9, 1724.15),
    team("ALG", "Algeria", 31, 1532.04),
    team("AUT", "Austria", 24, 1585.51),
    team("JOR", "Jordan", 64, 1388.93),
    team("IRQ", "Iraq", 58, 1436.94),
    team("SOL", "Solomon Islands", 152, 1039.86),
    team("SUR", "Suriname", 123, 1140.54),
    team("ENG", "England", 4, 1834.12),
    team("CRO", "Croatia", 10, 1716.88),
    team("GHA", "Ghana", 72, 1351.09),
    team("PAN", "Panama", 27, 1559.15),
    team("POR", "Portugal", 6, 1760.38),
    team("COL", "Colombia", 13, 1701.30),
    team("UZB", "Uzbekistan", 50, 1462.03),
    team("ECU", "Ecuador", 23, 1591.73),
    team("COD", "DR Congo", 56, 1444.16),
    team("JAM", "Jamaica", 70, 1362.46),
    team("NCL", "New Caledonia", 150, 1042.62),
    team("CIV", "Côte d'Ivoire", 42, 1489.59),
    team("IRN", "Iran", 20, 1617.02),
    team("CUW", "Curaçao", 82, 1302.70),
    team("POL", "Poland", 28, 1557.47),
  ]
}

pub fn reference_table() -> Result<TeamTable, String> {
  TeamTable::new(reference_teams())
}

// ── Groups ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct GroupTemplate {
  pub id: String,
  pub slots: Vec<Slot>,
  pub matches: Vec<GroupMatch>,
}

fn gm(id: &str, slot_a: Slot, slot_b: Slot, matchday: u8) -> GroupMatch {
  GroupMatch {
    id: id.to_string(),
    slot_a,
    slot_b,
    matchday,
  }
}

fn group(id: &str, slots: Vec<Slot>, matches: Vec<GroupMatch>) -> GroupTemplate {
  GroupTemplate {
    id: id.to_string(),
    slots,
    matches,
  }
}

pub fn reference_groups() -> Vec<GroupTemplate> {
  let t = Slot::team;
  let u = Slot::undecided;
  vec![
    group(
      "A",
      vec![t("MEX"), t("RSA"), t("KOR"), u(&["DEN", "MKD", "CZE", "ISR"])],
      vec![
        gm("A1", t("MEX"), t("RSA"), 1),
        gm("A2", t("KOR"), u(&["DEN", "MKD", "CZE", "ISR"]), 1),
        gm("A3", t("MEX"), t("KOR"), 2),
        gm("A4", u(&["DEN", "MKD", "CZE", "ISR"]), t("RSA"), 2),
        gm("A5", u(&["DEN", "MKD", "CZE", "ISR"]), t("MEX"), 3),
        gm("A6", t("RSA"), t("KOR"), 3),
      ],
    ),
    group(
      "B",
      vec![t("CAN"), u(&["ITA", "NIR", "WAL", "BIH"]), t("QAT"), t("SUI")],
      vec![
        gm("B1", t("CAN"), u(&["ITA", "NIR", "WAL", "BIH"]), 1),
        gm("B2", t("QAT"), t("SUI"), 1),
        gm("B3", t("CAN"), t("QAT"), 2),
        gm("B4", t("SUI"), u(&["ITA", "NIR", "WAL", "BIH"]), 2),
        gm("B5", t("SUI"), t("CAN"), 3),
        gm("B6", u(&["ITA", "NIR", "WAL", "BIH"]), t("QAT"), 3),
      ],
    ),
    group(
      "C",
      vec![t("BRA"), t("MAR"), t("HAI"), t("SCO")],
      vec![
        gm("C1", t("BRA"), t("MAR"), 1),
        gm("C2", t("HAI"), t("SCO"), 1),
        gm("C3", t("BRA"), t("HAI"), 2),
        gm("C4", t("SCO"), t("MAR"), 2),
        gm("C5", t("SCO"), t("BRA"), 3),
        gm("C6", t("MAR"), t("HAI"), 3),
      ],
    ),
    group(
      "D",
      vec![t("USA"), t("PAR"), t("AUS"), u(&["TUR", "ROU", "SVK", "KOS"])],
      vec![
        gm("D1", t("USA"), t("PAR"), 1),
        gm("D2", t("AUS"), u(&["TUR", "ROU", "SVK", "KOS"]), 1),
        gm("D3", t("USA"), t("AUS"), 2),
        gm("D4", u(&["TUR", "ROU", "SVK", "KOS"]), t("PAR"), 2),
        gm("D5", u(&["TUR", "ROU", "SVK", "KOS"]), t("USA"), 3),
        gm("D6", t("PAR"), t("AUS"), 3),
      ],
    ),
    group(
      "E",
      vec![t("GER"), t("CUW"), t("CIV"), t("ECU")],
      vec![
        gm("E1", t("GER"), t("CUW"), 1),
        gm("E2", t("CIV"), t("ECU"), 1),
        gm("E3", t("GER"), t("CIV"), 2),
        gm("E4", t("ECU"), t("CUW"), 2),
        gm("E5", t("ECU"), t("GER"), 3),
        gm("E6", t("CUW"), t("CIV"), 3),
      ],
    ),
    group(
      "F",
      vec![t("NED"), t("JPN"), u(&["UKR", "SWE", "POL", "ALB"]), t("TUN")],
      vec![
        gm("F1", t("NED"), t("JPN"), 1),
        gm("F2", u(&["UKR", "SWE", "POL", "ALB"]), t("TUN"), 1),
        gm("F3", t("NED"), u(&["UKR", "SWE", "POL", "ALB"]), 2),
        gm("F4", t("TUN"), t("JPN"), 2),
        gm("F5", t("TUN"), t("NED"), 3),
        gm("F6", t("JPN"), u(&["UKR", "SWE", "POL", "ALB"]), 3),
      ],
    ),
    group(
      "G",
      vec![t("BEL"), t("EGY"), t("IRN"), t("NZL")],
      vec![
        gm("G1", t("BEL"), t("EGY"), 1),
        gm("G2", t("IRN"), t("NZL"), 1),
        gm("G3", t("BEL"), t("IRN"), 2),
        gm("G4", t("NZL"), t("EGY"), 2),
        gm("G5", t("NZL"), t("BEL"), 3),
        gm("G6", t("EGY"), t("IRN"), 3),
      ],
    ),
    group(
      "H",
      vec![t("ESP"), t("CPV"), t("KSA"), t("URU")],
      vec![
        gm("H1", t("ESP"), t("CPV"), 1),
        gm("H2", t("KSA"), t("URU"), 1),
        gm("H3", t("URU"), t("CPV"), 2),
        gm("H4", t("ESP"), t("KSA"), 2),
        gm("H5", t("URU"), t("ESP"), 3),
        gm("H6", t("CPV"), t("KSA"), 3),
      ],
    ),
    group(
      "I",
      vec![t("FRA"), t("SEN"), u(&["IRQ", "SOL", "SUR"]), t("NOR")],
      vec![
        gm("I1", t("FRA"), t("SEN"), 1),
        gm("I2", u(&["IRQ", "SOL", "SUR"]), t("NOR"), 1),
        gm("I3", t("FRA"), u(&["IRQ", "SOL", "SUR"]), 2),
        gm("I4", t("NOR"), t("SEN"), 2),
        gm("I5", t("NOR"), t("FRA"), 3),
        gm("I6", t("SEN"), u(&["IRQ", "SOL", "SUR"]), 3),
      ],
    ),
    group(
      "J",
      vec![t("ARG"), t("ALG"), t("AUT"), t("JOR")],
      vec![
        gm("J1", t("ARG"), t("ALG"), 1),
        gm("J2", t("AUT"), t("JOR"), 1),
        gm("J3", t("ARG"), t("AUT"), 2),
        gm("J4", t("JOR"), t("ALG"), 2),
        gm("J5", t("JOR"), t("ARG"), 3),
        gm("J6", t("ALG"), t("AUT"), 3),
      ],
    ),
    group(
      "K",
      vec![t("POR"), u(&["COD", "JAM", "NCL"]), t("UZB"), t("COL")],
      vec![
        gm("K1", t("POR"), u(&["COD", "JAM", "NCL"]), 1),
        gm("K2", t("UZB"), t("COL"), 1),
        gm("K3", t("POR"), t("UZB"), 2),
        gm("K4", u(&["COD", "JAM", "NCL"]), t("COL"), 2),
        gm("K5", t("COL"), t("POR"), 3),
        gm("K6", u(&["COD", "JAM", "NCL"]), t("UZB"), 3),
      ],
    ),
    group(
      "L",
      vec![t("ENG"), t("CRO"), t("GHA"), t("PAN")],
      vec![
        gm("L1", t("ENG"), t("CRO"), 1),
        gm("L2", t("GHA"), t("PAN"), 1),
        gm("L3", t("ENG"), t("GHA"), 2),
        gm("L4", t("PAN"), t("CRO"), 2),
        gm("L5", t("PAN"), t("ENG"), 3),
        gm("L6", t("CRO"), t("GHA"), 3),
      ],
    ),
  ]
}

// ── Knockout bracket skeleton ──────────────────────────────────────────

pub fn round_of_32_template() -> Vec<BracketMatch> {
  vec![
    BracketMatch::labeled("R32_1", "Runner-up A vs Runner-up B"),
    BracketMatch::labeled("R32_2", "Winner E vs 3rd A/B/C/D/F"),
    BracketMatch::labeled("R32_3", "Winner F vs Runner-up C"),
    BracketMatch::labeled("R32_4", "Winner C vs Runner-up F"),
    BracketMatch::labeled("R32_5", "Winner I vs 3rd C/D/F/G/H"),
    BracketMatch::labeled("R32_6", "Runner-up E vs Runner-up I"),
    BracketMatch::labeled("R32_7", "Winner A vs 3rd C/E/F/H/I"),
    BracketMatch::labeled("R32_8", "Winner L vs 3rd E/H/I/J/K"),
    BracketMatch::labeled("R32_9", "Winner D vs 3rd B/E/F/I/J"),
    BracketMatch::labeled("R32_10", "Winner G vs 3rd A/E/H/I/J"),
    BracketMatch::labeled("R32_11", "Runner-up K vs Runner-up L"),
    BracketMatch::labeled("R32_12", "Winner H vs Runner-up J"),
    BracketMatch::labeled("R32_13", "Winner B vs 3rd E/F/G/I/J"),
    BracketMatch::labeled("R32_14", "Winner J vs Runner-up H"),
    BracketMatch::labeled("R32_15", "Winner K vs 3rd D/E/I/J/L"),
    BracketMatch::labeled("R32_16", "Runner-up D vs Runner-up G"),
  ]
}

pub fn round_of_16_template() -> Vec<BracketMatch> {
  (1..=8).map(|i| BracketMatch::empty(&format!("R16_{i}"))).collect()
}

pub fn quarter_finals_template() -> Vec<BracketMatch> {
  (1..=4).map(|i| BracketMatch::empty(&format!("QF_{i}"))).collect()
}

pub fn semi_finals_template() -> Vec<BracketMatch> {
  (1..=2).map(|i| BracketMatch::empty(&format!("SF_{i}"))).collect()
}

pub fn third_place_template() -> Vec<BracketMatch> {
  vec![BracketMatch::empty("TP")]
}

pub fn final_template() -> Vec<BracketMatch> {
  vec![BracketMatch::empty("F")]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_reference_data_shape() {
    let groups = reference_groups();
    assert_eq!(groups.len(), GROUP_COUNT);
    for group in &groups {
      assert_eq!(group.slots.len(), GROUP_SIZE);
      assert_eq!(group.matches.len(), MATCHES_PER_GROUP);
    }
    assert_eq!(round_of_32_template().len(), ROUND_OF_32_MATCHES);
  }

  #[test]
  fn test_every_group_code_in_team_table() {
    let table = reference_table().unwrap();
    for group in reference_groups() {
      for slot in &group.slots {
        match slot {
          Slot::Team(code) => assert!(table.get(code).is_some(), "missing {code}"),
          Slot::Undecided(codes) => {
            for code in codes {
              assert!(table.get(code).is_some(), "missing {code}");
            }
          }
        }
      }
    }
  }

  #[test]
  fn test_points_range_spans_table() {
    let table = reference_table().unwrap();
    assert_eq!(table.min_points(), 1039.86);
    assert_eq!(table.max_points(), 1877.18);
  }
}
