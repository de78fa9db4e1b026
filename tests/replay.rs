//! End-to-end replay of a full lottery night.
//!
//! Drives the public API through tail reveals with skips, the
//! fast-forward once the protected window is known, and the window
//! reveals themselves — checking the state, the exact odds, and the
//! display table at each phase.

use draftwatch::lottery::{table, tracker, Lottery};
use draftwatch::types::{LotteryConfig, LotteryError, PickConversion, RevealState, Team};

fn reference_config() -> LotteryConfig {
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

fn assert_consistent_odds(lottery: &Lottery) {
    let n = lottery.config().num_teams();
    let table = lottery.probabilities().unwrap();

    for (rank, row) in table.iter() {
        let sum: f64 = row.iter().sum();
        let one_hot = row.iter().filter(|&&v| v == 100.0).count() == 1
            && row.iter().filter(|&&v| v != 0.0).count() == 1;
        assert!(
            one_hot || (sum - 100.0).abs() <= 0.25,
            "rank {rank} row sums to {sum}"
        );
    }
    for slot in 1..=n {
        let sum: f64 = table.iter().map(|(_, row)| row[slot - 1]).sum();
        assert!(
            (sum - 100.0).abs() <= 0.35,
            "slot {slot} column sums to {sum}"
        );
    }
}

#[test]
fn full_night_with_skips() {
    let mut lottery = Lottery::new(reference_config());

    // Opening board: heavier weights hold better window odds.
    let table = lottery.probabilities().unwrap();
    assert!(table.at(1, 1) > table.at(14, 1));
    assert_consistent_odds(&lottery);

    // Tail opens in expected order.
    for name in ["Pelicans", "Raptors", "Thunder", "Bulls"] {
        lottery.reveal_by_name(name).unwrap();
        assert_consistent_odds(&lottery);
    }

    // Jazz revealed where the Mavericks were expected: Mavericks are in
    // the window, Jazz falls one slot.
    lottery.reveal_by_name("Jazz").unwrap();
    assert_eq!(lottery.state().top_pick_list, vec![10]);
    let table = lottery.probabilities().unwrap();
    assert_eq!(table.at(9, 10), 100.0);
    assert_consistent_odds(&lottery);

    // Pacers revealed where the Wizards were expected.
    lottery.reveal_by_name("Pacers").unwrap();
    assert_eq!(lottery.state().top_pick_list, vec![10, 8]);
    assert_consistent_odds(&lottery);

    // Magic land on schedule, Hornets jump the Trailblazers, then the
    // tail closes out through slot 5.
    for name in ["Magic", "Hornets", "Spurs", "Rockets"] {
        lottery.reveal_by_name(name).unwrap();
        assert_consistent_odds(&lottery);
    }

    // Slot 5 resolved: the four unrevealed teams are the window, and the
    // candidate list switches to exactly those teams.
    assert_eq!(lottery.current_slot(), 4);
    assert_eq!(lottery.state().top_pick_list, vec![1, 5, 8, 10]);
    assert_eq!(
        lottery.eligible_candidates(),
        vec!["Mavericks", "Wizards", "Trailblazers", "Pistons"]
    );

    // Window reveals: slot 4 down to slot 2.
    lottery.reveal_by_name("Pistons").unwrap();
    lottery.reveal_by_name("Mavericks").unwrap();
    lottery.reveal_by_name("Trailblazers").unwrap();
    assert_consistent_odds(&lottery);

    // One team left: the final pick resolves itself.
    assert!(lottery.eligible_candidates().is_empty());
    assert!(lottery.is_complete());
    assert_eq!(lottery.state().top_pick_order, vec![1, 10, 5, 8]);

    let table = lottery.probabilities().unwrap();
    assert_eq!(table.at(8, 1), 100.0); // Wizards
    assert_eq!(table.at(5, 2), 100.0); // Trailblazers
    assert_eq!(table.at(10, 3), 100.0); // Mavericks
    assert_eq!(table.at(1, 4), 100.0); // Pistons

    let order = lottery.draft_order();
    assert_eq!(order[0].team.as_deref(), Some("Wizards"));
    assert_eq!(order[13].team.as_deref(), Some("Pelicans"));
    assert!(order.iter().all(|slot| slot.team.is_some()));
}

#[test]
fn early_window_lock_triggers_fast_forward() {
    let mut lottery = Lottery::new(reference_config());

    // Four skips in the first nine reveals lock the window with tail
    // slots still open; the facade fast-forwards the rest of the tail.
    for rank in [14, 13, 12, 11, 9, 7, 6, 4, 2] {
        lottery.reveal(rank).unwrap();
    }
    assert_eq!(lottery.current_slot(), 4);
    assert_eq!(lottery.state().top_pick_list, vec![3, 5, 8, 10]);
    assert_eq!(lottery.state().teams_selected.last(), Some(&1));
    assert_consistent_odds(&lottery);

    // Fast-forward is idempotent.
    let snapshot = lottery.state().clone();
    let mut state = snapshot.clone();
    state.fast_forward(lottery.config());
    assert_eq!(state, snapshot);
}

#[test]
fn reconstruction_matches_incremental_replay() {
    let config = reference_config();
    let history = [14u32, 13, 12, 11, 9, 7, 6, 4, 3, 2, 1, 10, 5, 8];

    let mut incremental = RevealState::default();
    for &rank in &history {
        incremental.apply_reveal(&config, rank).unwrap();
    }
    let reconstructed = RevealState::from_history(&history, &config).unwrap();
    assert_eq!(reconstructed, incremental);

    // Reference fixture for the derived lists.
    let (list, order) = tracker::derive_top_picks(&history, &config);
    assert_eq!(list, vec![10, 8, 5]);
    assert_eq!(order, vec![1, 10, 5, 8]);
}

#[test]
fn display_table_tracks_conveyed_picks() {
    let config = reference_config();
    // Mavericks revealed where the Bulls were expected: Bulls protected,
    // Mavericks fall to slot 11 and the pick conveys.
    let state =
        RevealState::from_history(&[14, 13, 12, 10], &config).unwrap();
    let probs = draftwatch::lottery::odds::compute_odds(&config, &state).unwrap();
    let table = table::format_odds(&config, &probs);

    let conveyed = table.rows.iter().find(|r| r.rank == 10).unwrap();
    assert_eq!(conveyed.label, "Knicks");
    assert_eq!(conveyed.cells[10], "100");

    let protected = table.rows.iter().find(|r| r.rank == 11).unwrap();
    assert_eq!(protected.label, "Bulls");
}

#[test]
fn invalid_reveals_leave_state_untouched() {
    let mut lottery = Lottery::new(reference_config());
    lottery.reveal_by_name("Pelicans").unwrap();

    let before = lottery.state().clone();
    assert!(matches!(
        lottery.reveal_by_name("Pelicans"),
        Err(LotteryError::InvalidReveal { .. })
    ));
    assert!(matches!(
        lottery.reveal_by_name("Pistons"),
        Err(LotteryError::InvalidReveal { .. })
    ));
    assert!(matches!(
        lottery.reveal_by_name("Supersonics"),
        Err(LotteryError::UnknownTeam(_))
    ));
    assert_eq!(lottery.state(), &before);
}
