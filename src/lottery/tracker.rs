//! Reveal-state tracking.
//!
//! Derives which teams are locked into the protected window versus the
//! open tail from the raw reveal sequence, validates incoming reveals,
//! and fast-forwards the tail once it is fully determined by elimination.

use tracing::debug;

use crate::types::{LotteryConfig, LotteryError, RevealState};

// ---------------------------------------------------------------------------
// Stateless derivation
// ---------------------------------------------------------------------------

/// Reconstruct `top_pick_list` / `top_pick_order` from a reveal sequence.
///
/// Walks the reveals against a descending expectation counter. A reveal
/// that misses the expected rank while the process is still outside the
/// protected window means the expected rank was skipped — it holds one of
/// the protected slots. A skip consumes an extra expectation: the next
/// tail reveal is measured against the rank after the skipped one.
/// Reveals inside the window (fewer than K+1 teams left) go straight to
/// `top_pick_order`.
pub fn derive_top_picks(
    teams_selected: &[u32],
    config: &LotteryConfig,
) -> (Vec<u32>, Vec<u32>) {
    let k = config.top_picks();
    let mut expected = config.num_teams() as i64;
    let mut remaining = config.num_teams();
    let mut top_pick_list: Vec<u32> = Vec::new();
    let mut top_pick_order: Vec<u32> = Vec::new();

    for &rank in teams_selected {
        if rank as i64 != expected && top_pick_list.len() < k && remaining >= k + 1 {
            top_pick_list.push(expected as u32);
            expected -= 1;
        }
        if remaining <= k {
            top_pick_order.push(rank);
        }
        expected -= 1;
        remaining -= 1;
    }

    (top_pick_list, top_pick_order)
}

// ---------------------------------------------------------------------------
// State transitions
// ---------------------------------------------------------------------------

impl RevealState {
    /// Reconstruct state from a persisted reveal sequence.
    ///
    /// The whole history is validated up front; an inconsistent history is
    /// rejected in full rather than truncated.
    pub fn from_history(
        history: &[u32],
        config: &LotteryConfig,
    ) -> Result<Self, LotteryError> {
        let n = config.num_teams();
        if history.len() > n {
            return Err(LotteryError::MalformedHistory(format!(
                "{} reveals recorded but only {} teams exist",
                history.len(),
                n
            )));
        }
        let mut seen = vec![false; n];
        for &rank in history {
            if rank == 0 || rank as usize > n {
                return Err(LotteryError::MalformedHistory(format!(
                    "unknown rank {rank}"
                )));
            }
            if seen[(rank - 1) as usize] {
                return Err(LotteryError::MalformedHistory(format!(
                    "rank {rank} revealed twice"
                )));
            }
            seen[(rank - 1) as usize] = true;
        }

        let mut state = RevealState {
            teams_selected: history.to_vec(),
            ..RevealState::default()
        };
        state.rederive(config);
        Ok(state)
    }

    /// Record one reveal.
    ///
    /// The rank must be a member of the current eligible set; otherwise
    /// the state is left untouched and `InvalidReveal` is returned.
    pub fn apply_reveal(
        &mut self,
        config: &LotteryConfig,
        rank: u32,
    ) -> Result<(), LotteryError> {
        let team = config
            .team(rank)
            .ok_or_else(|| LotteryError::UnknownTeam(rank.to_string()))?;

        if !self.eligible(config).contains(&rank) {
            return Err(LotteryError::InvalidReveal {
                rank,
                name: team.name.clone(),
            });
        }

        self.teams_selected.push(rank);
        self.rederive(config);

        debug!(
            rank,
            slot = self.current_slot(config.num_teams()) + 1,
            protected = self.top_pick_list.len(),
            "Reveal recorded"
        );
        Ok(())
    }

    /// Advance past the rest of the tail once it is fully determined.
    ///
    /// Applies only when all K protected teams are known while tail slots
    /// remain: every unrevealed non-protected team is appended in
    /// descending rank order, since no randomness remains among them.
    /// Reapplying is a no-op.
    pub fn fast_forward(&mut self, config: &LotteryConfig) {
        let n = config.num_teams();
        let k = config.top_picks();
        if self.top_pick_list.len() != k || self.current_slot(n) <= k {
            return;
        }

        let slots_filled = self.current_slot(n) - k;
        for rank in (1..=n as u32).rev() {
            if !self.is_selected(rank) && !self.top_pick_list.contains(&rank) {
                self.teams_selected.push(rank);
            }
        }
        self.rederive(config);

        debug!(slots_filled, "Tail determined by elimination; fast-forwarded");
    }

    /// Teams that can legitimately be revealed next, worst rank first.
    ///
    /// While the tail is being revealed, only the worst
    /// `K + 1 - top_pick_list.len()` unprotected teams are live — any
    /// better team would need more than the remaining protected capacity
    /// to be passed over. Inside the window every unrevealed team is
    /// live. When a single team remains overall its slot is forced, so it
    /// is resolved here and the list comes back empty.
    pub fn eligible_candidates(&mut self, config: &LotteryConfig) -> Vec<u32> {
        let candidates = self.eligible(config);
        if candidates.len() == 1
            && self.teams_selected.len() + 1 == config.num_teams()
        {
            let last = candidates[0];
            self.teams_selected.push(last);
            self.rederive(config);
            debug!(rank = last, "Final slot forced; auto-resolved");
            return Vec::new();
        }
        candidates
    }

    /// Non-mutating eligible set used by both the public candidate list
    /// and reveal validation.
    fn eligible(&self, config: &LotteryConfig) -> Vec<u32> {
        let n = config.num_teams();
        let k = config.top_picks();
        let mut out = Vec::new();

        if self.current_slot(n) > k {
            let live = k + 1 - self.top_pick_list.len();
            for rank in (1..=n as u32).rev() {
                if !self.is_selected(rank) && !self.top_pick_list.contains(&rank) {
                    out.push(rank);
                    if out.len() == live {
                        break;
                    }
                }
            }
        } else {
            for rank in (1..=n as u32).rev() {
                if !self.is_selected(rank) {
                    out.push(rank);
                }
            }
        }

        out
    }

    /// Recompute the derived lists from the full reveal sequence.
    fn rederive(&mut self, config: &LotteryConfig) {
        let (list, order) = derive_top_picks(&self.teams_selected, config);
        self.top_pick_list = list;
        self.top_pick_order = order;

        // Once the slot just above the window resolves, the unrevealed
        // ranks are exactly the protected teams by elimination, even
        // though their internal order is still unknown.
        let n = config.num_teams();
        if self.teams_selected.len() == n - config.top_picks() {
            self.top_pick_list = (1..=n as u32)
                .filter(|r| !self.is_selected(*r))
                .collect();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
