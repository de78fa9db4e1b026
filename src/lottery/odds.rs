//! Exact pick probabilities.
//!
//! Enumerates every ordered arrangement of the unresolved protected slots
//! over the still-undetermined teams — weighted sampling without
//! replacement — and accumulates each team's exact conditional odds for
//! every slot. No simulation: the arrangement space is bounded by the
//! small window size, so the full enumeration is cheap and the numbers
//! are exact.

use tracing::debug;

use crate::types::{LotteryConfig, LotteryError, ProbabilityTable, RevealState};

/// Compute the full probability table for the current reveal state.
///
/// Rows for teams whose slot is already certain are one-hot; every other
/// row is an exact distribution over the slots the team can still land,
/// conditioned on everything revealed so far.
pub fn compute_odds(
    config: &LotteryConfig,
    state: &RevealState,
) -> Result<ProbabilityTable, LotteryError> {
    let n = config.num_teams();
    let k = config.top_picks();
    let m = k - state.top_pick_order.len();

    // Teams with no resolved slot yet. Arrangements of the unresolved
    // window positions are drawn from exactly this pool.
    let undetermined: Vec<u32> = (1..=n as u32)
        .filter(|r| !state.is_selected(*r))
        .collect();
    let pool_weight: u64 = undetermined
        .iter()
        .map(|r| config.weight_of(*r) as u64)
        .sum();
    if pool_weight == 0 && !undetermined.is_empty() {
        return Err(LotteryError::DegeneratePool {
            remaining: undetermined.len(),
        });
    }

    // Protected teams that have not been revealed yet must appear in any
    // admissible arrangement.
    let required: Vec<u32> = state
        .top_pick_list
        .iter()
        .copied()
        .filter(|r| !state.is_selected(*r))
        .collect();

    // window_mass[rank-1][p]: probability rank is drawn at position p
    // (slot p+1). fall_mass[rank-1][f]: probability rank is left out of
    // the window with f worse-ranked teams drawn ahead of it.
    let mut window_mass = vec![vec![0.0f64; m]; n];
    let mut fall_mass = vec![vec![0.0f64; m + 1]; n];

    let mut arrangements = 0u64;
    let mut chosen: Vec<u32> = Vec::with_capacity(m);
    let mut used = vec![false; undetermined.len()];
    visit_arrangements(
        config,
        &undetermined,
        m,
        pool_weight as f64,
        1.0,
        &mut chosen,
        &mut used,
        &mut |arrangement: &[u32], prob: f64| {
            if !required.iter().all(|r| arrangement.contains(r)) {
                return;
            }
            arrangements += 1;
            for (pos, &rank) in arrangement.iter().enumerate() {
                window_mass[(rank - 1) as usize][pos] += prob;
            }
            for &team in &undetermined {
                if arrangement.contains(&team) {
                    continue;
                }
                let jumped =
                    arrangement.iter().filter(|&&r| r > team).count();
                fall_mass[(team - 1) as usize][jumped] += prob;
            }
        },
    );

    debug!(
        undetermined = undetermined.len(),
        positions = m,
        arrangements,
        "Enumerated window arrangements"
    );

    let mut table = ProbabilityTable::new();
    for team in 1..=n as u32 {
        let ti = (team - 1) as usize;
        let mut row = vec![0.0f64; n];

        if state.is_selected(team) && !state.top_pick_order.contains(&team) {
            // Tail slot certain: own rank pushed down one slot per
            // protected team with a worse record.
            let pushed = state
                .top_pick_list
                .iter()
                .filter(|&&p| p > team)
                .count();
            row[ti + pushed] = 1.0;
        } else if let Some(pos) =
            state.top_pick_order.iter().position(|&r| r == team)
        {
            // Window slot certain: reveals run from slot K down to 1.
            row[k - pos - 1] = 1.0;
        } else {
            row[..m].copy_from_slice(&window_mass[ti]);
            // A team left out of the window lands at its own rank plus
            // one slot per worse-ranked team drawn ahead of it. Only
            // tail slots are reachable this way.
            for slot_idx in ti..=(ti + m) {
                if slot_idx > k - 1 && slot_idx <= n - 1 {
                    row[slot_idx] = fall_mass[ti][slot_idx - ti];
                }
            }
        }

        let sum: f64 = row.iter().sum();
        if sum > 0.0 {
            for v in &mut row {
                *v /= sum;
            }
        }
        for v in &mut row {
            *v = (1000.0 * *v).round() / 10.0;
        }
        table.insert(team, row);
    }

    Ok(table)
}

/// Depth-first walk over every ordered selection of `depth` ranks from
/// `pool`, threading the running draw probability: each level draws one
/// rank with probability weight / remaining pool weight, then removes its
/// weight from the pool.
#[allow(clippy::too_many_arguments)]
fn visit_arrangements<F: FnMut(&[u32], f64)>(
    config: &LotteryConfig,
    pool: &[u32],
    depth: usize,
    pool_weight: f64,
    prob: f64,
    chosen: &mut Vec<u32>,
    used: &mut [bool],
    visit: &mut F,
) {
    if depth == 0 {
        visit(chosen, prob);
        return;
    }
    for i in 0..pool.len() {
        if used[i] {
            continue;
        }
        let rank = pool[i];
        let weight = config.weight_of(rank) as f64;
        used[i] = true;
        chosen.push(rank);
        visit_arrangements(
            config,
            pool,
            depth - 1,
            pool_weight - weight,
            prob * (weight / pool_weight),
            chosen,
            used,
            visit,
        );
        chosen.pop();
        used[i] = false;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
