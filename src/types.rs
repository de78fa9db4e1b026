//! Shared types for the DRAFTWATCH tracker.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that the tracker, odds, and
//! dashboard modules can depend on them without circular references.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// One lottery participant.
///
/// `rank` is the reverse-standings position (1 = worst record, N = best),
/// fixed for the duration of a lottery. `weight` is the number of
/// combinations assigned to the team — more combinations, better odds of
/// an early slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub rank: u32,
    pub name: String,
    pub weight: u32,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} ({} combinations)", self.rank, self.name, self.weight)
    }
}

// ---------------------------------------------------------------------------
// Pick conversions
// ---------------------------------------------------------------------------

/// Owed-pick conversion rule.
///
/// If `rank`'s probability at any of `slots` is exactly 100, the pick is
/// conveyed and the odds table shows `destination` instead of the team's
/// own name. These rules are configuration, not engine logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickConversion {
    pub rank: u32,
    pub slots: Vec<usize>,
    pub destination: String,
}

// ---------------------------------------------------------------------------
// Lottery configuration
// ---------------------------------------------------------------------------

/// Immutable per-lottery configuration: the weight table, the size of the
/// protected window, and any owed-pick conversions.
///
/// Passed explicitly into the engines so multiple lottery configurations
/// can coexist in one process. Built through [`LotteryConfig::new`] only,
/// so every instance is validated.
#[derive(Debug, Clone)]
pub struct LotteryConfig {
    teams: Vec<Team>,
    top_picks: usize,
    conversions: Vec<PickConversion>,
}

impl LotteryConfig {
    /// Build a validated configuration.
    ///
    /// Teams must carry contiguous ranks starting at 1, every weight must
    /// be positive, and the protected window must be smaller than the
    /// field.
    pub fn new(
        mut teams: Vec<Team>,
        top_picks: usize,
        conversions: Vec<PickConversion>,
    ) -> Result<Self, LotteryError> {
        if teams.is_empty() {
            return Err(LotteryError::Config("no teams configured".into()));
        }
        teams.sort_by_key(|t| t.rank);
        for (i, team) in teams.iter().enumerate() {
            if team.rank as usize != i + 1 {
                return Err(LotteryError::Config(format!(
                    "team ranks must be contiguous from 1; found rank {} at position {}",
                    team.rank,
                    i + 1
                )));
            }
            if team.weight == 0 {
                return Err(LotteryError::Config(format!(
                    "team {} has zero weight",
                    team.name
                )));
            }
        }
        if top_picks == 0 || top_picks >= teams.len() {
            return Err(LotteryError::Config(format!(
                "top_picks must be between 1 and {} (got {})",
                teams.len() - 1,
                top_picks
            )));
        }
        Ok(Self { teams, top_picks, conversions })
    }

    /// Number of teams in the field (N).
    pub fn num_teams(&self) -> usize {
        self.teams.len()
    }

    /// Size of the protected window (K).
    pub fn top_picks(&self) -> usize {
        self.top_picks
    }

    /// Teams in rank order (1..=N).
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Owed-pick conversion rules.
    pub fn conversions(&self) -> &[PickConversion] {
        &self.conversions
    }

    /// Look up a team by rank.
    pub fn team(&self, rank: u32) -> Option<&Team> {
        self.teams.get(rank.checked_sub(1)? as usize)
    }

    /// Display name for a rank. Only valid for ranks this config produced.
    pub fn name_of(&self, rank: u32) -> &str {
        &self.teams[(rank - 1) as usize].name
    }

    /// Combination count for a rank. Only valid for ranks this config
    /// produced.
    pub fn weight_of(&self, rank: u32) -> u32 {
        self.teams[(rank - 1) as usize].weight
    }

    /// Resolve a display name back to a rank.
    pub fn rank_of(&self, name: &str) -> Option<u32> {
        self.teams.iter().find(|t| t.name == name).map(|t| t.rank)
    }

    /// Sum of all combination weights (the full pool).
    pub fn total_weight(&self) -> u64 {
        self.teams.iter().map(|t| t.weight as u64).sum()
    }

    /// The reference 14-team configuration used throughout the tests.
    #[cfg(test)]
    pub fn sample() -> Self {
        let names = [
            "Pistons", "Rockets", "Spurs", "Hornets", "Trailblazers", "Magic",
            "Pacers", "Wizards", "Jazz", "Mavericks", "Bulls", "Thunder",
            "Raptors", "Pelicans",
        ];
        let weights = [140, 140, 140, 125, 105, 90, 75, 60, 45, 30, 20, 15, 10, 5];
        let teams = names
            .iter()
            .zip(weights)
            .enumerate()
            .map(|(i, (name, weight))| Team {
                rank: i as u32 + 1,
                name: (*name).to_string(),
                weight,
            })
            .collect();
        let conversions = vec![
            PickConversion {
                rank: 10,
                slots: vec![11, 12, 13, 14],
                destination: "Knicks".to_string(),
            },
            PickConversion {
                rank: 11,
                slots: (5..=14).collect(),
                destination: "Magic".to_string(),
            },
        ];
        LotteryConfig::new(teams, 4, conversions).unwrap()
    }
}

// ---------------------------------------------------------------------------
// Reveal state
// ---------------------------------------------------------------------------

/// Everything known about the lottery so far, derived from the reveal
/// sequence.
///
/// `teams_selected` is the append-only reveal order (first entry = slot N).
/// `top_pick_list` holds ranks confirmed inside the protected window whose
/// exact slot is still unknown. `top_pick_order` holds window reveals in
/// sequence (first entry = slot K, last = slot 1). A rank revealed inside
/// the window appears in both lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealState {
    pub teams_selected: Vec<u32>,
    pub top_pick_list: Vec<u32>,
    pub top_pick_order: Vec<u32>,
}

impl RevealState {
    /// The next slot to resolve: N with nothing revealed, down to 1.
    pub fn current_slot(&self, num_teams: usize) -> usize {
        num_teams - self.teams_selected.len()
    }

    /// Whether every slot has been resolved.
    pub fn is_complete(&self, num_teams: usize) -> bool {
        self.teams_selected.len() == num_teams
    }

    /// Whether a rank has been revealed (in the tail or the window).
    pub fn is_selected(&self, rank: u32) -> bool {
        self.teams_selected.contains(&rank)
    }
}

impl fmt::Display for RevealState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "revealed={:?} protected={:?} window_order={:?}",
            self.teams_selected, self.top_pick_list, self.top_pick_order,
        )
    }
}

// ---------------------------------------------------------------------------
// Probability table
// ---------------------------------------------------------------------------

/// Exact conditional odds: rank → probability (percent, one decimal) of
/// landing each slot 1..=N.
///
/// Every row sums to 100 within rounding tolerance, or is exactly one-hot
/// once the team's slot is certain.
#[derive(Debug, Clone, Serialize)]
pub struct ProbabilityTable {
    rows: BTreeMap<u32, Vec<f64>>,
}

impl ProbabilityTable {
    pub fn new() -> Self {
        Self { rows: BTreeMap::new() }
    }

    pub fn insert(&mut self, rank: u32, probs: Vec<f64>) {
        self.rows.insert(rank, probs);
    }

    /// Probability row for a rank (index 0 = slot 1).
    pub fn row(&self, rank: u32) -> Option<&[f64]> {
        self.rows.get(&rank).map(|v| v.as_slice())
    }

    /// Probability that `rank` lands `slot` (1-based).
    pub fn at(&self, rank: u32, slot: usize) -> f64 {
        self.rows
            .get(&rank)
            .and_then(|r| r.get(slot - 1))
            .copied()
            .unwrap_or(0.0)
    }

    /// Iterate rows in rank order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[f64])> {
        self.rows.iter().map(|(rank, row)| (*rank, row.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for ProbabilityTable {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for DRAFTWATCH.
#[derive(Debug, thiserror::Error)]
pub enum LotteryError {
    #[error("Invalid reveal: {name} (rank {rank}) is not an eligible candidate")]
    InvalidReveal { rank: u32, name: String },

    #[error("Unknown team: {0}")]
    UnknownTeam(String),

    #[error("Malformed reveal history: {0}")]
    MalformedHistory(String),

    #[error("Combination pool exhausted with {remaining} teams undetermined")]
    DegeneratePool { remaining: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn team(rank: u32, name: &str, weight: u32) -> Team {
        Team { rank, name: name.into(), weight }
    }

    // -- Team tests --

    #[test]
    fn test_team_display() {
        let t = team(3, "Spurs", 140);
        assert_eq!(format!("{t}"), "#3 Spurs (140 combinations)");
    }

    // -- LotteryConfig tests --

    #[test]
    fn test_sample_config_shape() {
        let cfg = LotteryConfig::sample();
        assert_eq!(cfg.num_teams(), 14);
        assert_eq!(cfg.top_picks(), 4);
        assert_eq!(cfg.total_weight(), 1000);
        assert_eq!(cfg.name_of(1), "Pistons");
        assert_eq!(cfg.name_of(14), "Pelicans");
        assert_eq!(cfg.weight_of(14), 5);
    }

    #[test]
    fn test_rank_lookup_by_name() {
        let cfg = LotteryConfig::sample();
        assert_eq!(cfg.rank_of("Jazz"), Some(9));
        assert_eq!(cfg.rank_of("Knicks"), None);
    }

    #[test]
    fn test_config_rejects_gap_in_ranks() {
        let teams = vec![team(1, "A", 10), team(3, "B", 10)];
        assert!(LotteryConfig::new(teams, 1, Vec::new()).is_err());
    }

    #[test]
    fn test_config_rejects_zero_weight() {
        let teams = vec![team(1, "A", 10), team(2, "B", 0)];
        assert!(LotteryConfig::new(teams, 1, Vec::new()).is_err());
    }

    #[test]
    fn test_config_rejects_oversized_window() {
        let teams = vec![team(1, "A", 10), team(2, "B", 10)];
        assert!(LotteryConfig::new(teams.clone(), 2, Vec::new()).is_err());
        assert!(LotteryConfig::new(teams, 0, Vec::new()).is_err());
    }

    #[test]
    fn test_config_sorts_unordered_teams() {
        let teams = vec![team(2, "B", 10), team(1, "A", 10), team(3, "C", 10)];
        let cfg = LotteryConfig::new(teams, 2, Vec::new()).unwrap();
        assert_eq!(cfg.name_of(1), "A");
        assert_eq!(cfg.name_of(3), "C");
    }

    // -- RevealState tests --

    #[test]
    fn test_fresh_state_slots() {
        let state = RevealState::default();
        assert_eq!(state.current_slot(14), 14);
        assert!(!state.is_complete(14));
        assert!(!state.is_selected(7));
    }

    #[test]
    fn test_state_serde_roundtrip() {
        let state = RevealState {
            teams_selected: vec![14, 13, 12],
            top_pick_list: vec![],
            top_pick_order: vec![],
        };
        let json = serde_json::to_string(&state).unwrap();
        let back: RevealState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
        assert_eq!(back.current_slot(14), 11);
    }

    // -- ProbabilityTable tests --

    #[test]
    fn test_probability_table_access() {
        let mut table = ProbabilityTable::new();
        table.insert(1, vec![50.0, 50.0]);
        assert_eq!(table.at(1, 1), 50.0);
        assert_eq!(table.at(1, 2), 50.0);
        assert_eq!(table.at(1, 3), 0.0);
        assert_eq!(table.at(2, 1), 0.0);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_probability_table_rank_order() {
        let mut table = ProbabilityTable::new();
        table.insert(3, vec![1.0]);
        table.insert(1, vec![2.0]);
        table.insert(2, vec![3.0]);
        let ranks: Vec<u32> = table.iter().map(|(r, _)| r).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    // -- Error display --

    #[test]
    fn test_error_messages() {
        let e = LotteryError::InvalidReveal { rank: 9, name: "Jazz".into() };
        assert!(format!("{e}").contains("Jazz"));
        let e = LotteryError::DegeneratePool { remaining: 3 };
        assert!(format!("{e}").contains('3'));
    }
}
