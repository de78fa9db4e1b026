//! Lottery engines — reveal tracking, exact odds, and the display table.

pub mod odds;
pub mod table;
pub mod tracker;

use tracing::info;

use crate::types::{LotteryConfig, LotteryError, ProbabilityTable, RevealState};
use table::{DraftSlot, OddsTable};

// ---------------------------------------------------------------------------
// Facade
// ---------------------------------------------------------------------------

/// One live lottery: configuration plus everything revealed so far.
///
/// Pipelines reveal validation → state derivation → fast-forward →
/// odds recomputation behind a single entry point, so callers never
/// hold a state that skipped a step. All operations are synchronous and
/// deterministic; callers sharing one `Lottery` across tasks must
/// serialize access.
#[derive(Debug)]
pub struct Lottery {
    config: LotteryConfig,
    state: RevealState,
}

impl Lottery {
    /// Start a fresh lottery.
    pub fn new(config: LotteryConfig) -> Self {
        Self { config, state: RevealState::default() }
    }

    /// Reconstruct a lottery from a persisted reveal sequence (ranks).
    pub fn from_history(
        config: LotteryConfig,
        history: &[u32],
    ) -> Result<Self, LotteryError> {
        let mut state = RevealState::from_history(history, &config)?;
        state.fast_forward(&config);
        Ok(Self { config, state })
    }

    /// Reconstruct a lottery from a persisted reveal sequence (names).
    pub fn from_history_names<S: AsRef<str>>(
        config: LotteryConfig,
        names: &[S],
    ) -> Result<Self, LotteryError> {
        let mut history = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let rank = config.rank_of(name).ok_or_else(|| {
                LotteryError::MalformedHistory(format!("unknown team {name}"))
            })?;
            history.push(rank);
        }
        Self::from_history(config, &history)
    }

    pub fn config(&self) -> &LotteryConfig {
        &self.config
    }

    pub fn state(&self) -> &RevealState {
        &self.state
    }

    /// The next slot to resolve.
    pub fn current_slot(&self) -> usize {
        self.state.current_slot(self.config.num_teams())
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete(self.config.num_teams())
    }

    /// Record one reveal by rank, then fast-forward if the rest of the
    /// tail has become determined by elimination.
    pub fn reveal(&mut self, rank: u32) -> Result<(), LotteryError> {
        let slot = self.current_slot();
        self.state.apply_reveal(&self.config, rank)?;
        info!(
            team = %self.config.name_of(rank),
            slot,
            protected = self.state.top_pick_list.len(),
            "Team revealed"
        );
        self.state.fast_forward(&self.config);
        Ok(())
    }

    /// Record one reveal by display name. Returns the resolved rank.
    pub fn reveal_by_name(&mut self, name: &str) -> Result<u32, LotteryError> {
        let rank = self
            .config
            .rank_of(name)
            .ok_or_else(|| LotteryError::UnknownTeam(name.to_string()))?;
        self.reveal(rank)?;
        Ok(rank)
    }

    /// Names of the teams that can be revealed next, worst rank first.
    /// Empty once the lottery is fully resolved (the trivial final pick
    /// resolves itself).
    pub fn eligible_candidates(&mut self) -> Vec<String> {
        self.state
            .eligible_candidates(&self.config)
            .into_iter()
            .map(|r| self.config.name_of(r).to_string())
            .collect()
    }

    /// Exact probability table for the current state.
    pub fn probabilities(&self) -> Result<ProbabilityTable, LotteryError> {
        odds::compute_odds(&self.config, &self.state)
    }

    /// Display-ready odds table for the current state.
    pub fn odds_table(&self) -> Result<OddsTable, LotteryError> {
        let probs = self.probabilities()?;
        Ok(table::format_odds(&self.config, &probs))
    }

    /// Slot-by-slot draft order with blanks for open slots.
    pub fn draft_order(&self) -> Vec<DraftSlot> {
        table::draft_order(&self.config, &self.state)
    }

    /// Reveal history as display names, oldest first.
    pub fn history_names(&self) -> Vec<String> {
        self.state
            .teams_selected
            .iter()
            .map(|&r| self.config.name_of(r).to_string())
            .collect()
    }

    /// Drop all reveals and start over.
    pub fn reset(&mut self) {
        info!("Lottery reset");
        self.state = RevealState::default();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
