//! Display-ready odds table.
//!
//! Turns the raw probability table into sorted rows keyed by asset label
//! (a team's own name unless an owed-pick conversion has locked in), with
//! cells rendered the way the tracker has always shown them: "0", "100",
//! or a three-significant-figure decimal.

use serde::Serialize;

use crate::types::{LotteryConfig, ProbabilityTable, RevealState};

// ---------------------------------------------------------------------------
// Display types
// ---------------------------------------------------------------------------

/// One display row of the odds table.
#[derive(Debug, Clone, Serialize)]
pub struct OddsRow {
    pub rank: u32,
    pub label: String,
    /// Rendered cell per slot, index 0 = slot 1.
    pub cells: Vec<String>,
}

/// The full display table, rows sorted best slot-1 odds first.
#[derive(Debug, Clone, Serialize)]
pub struct OddsTable {
    pub slots: Vec<usize>,
    pub rows: Vec<OddsRow>,
}

/// One entry of the running draft order.
#[derive(Debug, Clone, Serialize)]
pub struct DraftSlot {
    pub slot: usize,
    /// Resolved team name, or None while the slot is open.
    pub team: Option<String>,
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Build the display table from raw probabilities.
///
/// Rows are sorted descending on slot-1 odds with ties broken by slots
/// 2 through 4; the sort is stable beyond that, so equal rows keep rank
/// order.
pub fn format_odds(config: &LotteryConfig, probs: &ProbabilityTable) -> OddsTable {
    let n = config.num_teams();
    let tie_break = n.min(4);

    let mut rows: Vec<OddsRow> = probs
        .iter()
        .map(|(rank, row)| OddsRow {
            rank,
            label: display_label(config, probs, rank),
            cells: row.iter().map(|&v| format_cell(v)).collect(),
        })
        .collect();

    rows.sort_by(|a, b| {
        for slot in 1..=tie_break {
            let ord = probs
                .at(b.rank, slot)
                .total_cmp(&probs.at(a.rank, slot));
            if ord != std::cmp::Ordering::Equal {
                return ord;
            }
        }
        std::cmp::Ordering::Equal
    });

    OddsTable { slots: (1..=n).collect(), rows }
}

/// Running draft order: every slot, best first, with unresolved slots
/// left blank.
pub fn draft_order(config: &LotteryConfig, state: &RevealState) -> Vec<DraftSlot> {
    let n = config.num_teams();
    (1..=n)
        .map(|slot| DraftSlot {
            slot,
            team: state
                .teams_selected
                .get(n - slot)
                .map(|&r| config.name_of(r).to_string()),
        })
        .collect()
}

/// A team's display label, applying owed-pick conversions.
///
/// A conversion fires once the team's probability at any of the rule's
/// slots is exactly 100 — the pick is conveyed and the table shows the
/// destination instead.
fn display_label(config: &LotteryConfig, probs: &ProbabilityTable, rank: u32) -> String {
    for rule in config.conversions() {
        if rule.rank == rank
            && rule.slots.iter().any(|&slot| probs.at(rank, slot) == 100.0)
        {
            return rule.destination.clone();
        }
    }
    config.name_of(rank).to_string()
}

/// Render one probability cell.
///
/// Exact endpoints render bare; everything else gets three significant
/// figures with at least one decimal place.
fn format_cell(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value == 100.0 {
        return "100".to_string();
    }
    let decimals = (2 - value.abs().log10().floor() as i32).max(1) as usize;
    let mut s = format!("{value:.decimals$}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.push('0');
    }
    s
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
