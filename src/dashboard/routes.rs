//! Dashboard API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<DashboardState>`;
//! each mutation persists the reveal log before responding.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::error;

use crate::lottery::table::{DraftSlot, OddsTable};
use crate::lottery::Lottery;
use crate::storage::{self, RevealLog};
use crate::types::LotteryError;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct DashboardState {
    pub lottery: RwLock<Lottery>,
    pub log: RwLock<RevealLog>,
    pub log_path: Option<String>,
}

impl DashboardState {
    pub fn new(lottery: Lottery, log: RevealLog, log_path: Option<String>) -> Self {
        Self {
            lottery: RwLock::new(lottery),
            log: RwLock::new(log),
            log_path,
        }
    }
}

pub type AppState = Arc<DashboardState>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RevealRequest {
    pub team: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateResponse {
    pub current_slot: usize,
    pub complete: bool,
    pub teams_selected: Vec<String>,
    pub top_pick_list: Vec<String>,
    pub top_pick_order: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidatesResponse {
    pub candidates: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Handler error: status + JSON body.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn reject(err: LotteryError) -> ApiError {
    let status = match err {
        LotteryError::InvalidReveal { .. }
        | LotteryError::UnknownTeam(_)
        | LotteryError::MalformedHistory(_) => StatusCode::UNPROCESSABLE_ENTITY,
        LotteryError::DegeneratePool { .. } | LotteryError::Config(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ErrorResponse { error: err.to_string() }))
}

fn state_response(lottery: &Lottery) -> StateResponse {
    let config = lottery.config();
    let state = lottery.state();
    let names = |ranks: &[u32]| -> Vec<String> {
        ranks.iter().map(|&r| config.name_of(r).to_string()).collect()
    };
    StateResponse {
        current_slot: lottery.current_slot(),
        complete: lottery.is_complete(),
        teams_selected: names(&state.teams_selected),
        top_pick_list: names(&state.top_pick_list),
        top_pick_order: names(&state.top_pick_order),
    }
}

/// Bring the persisted log up to date with the in-memory lottery and
/// write it out. Save failures are logged, not surfaced — the in-memory
/// state is still authoritative for this session.
async fn persist(state: &DashboardState) {
    let lottery = state.lottery.read().await;
    let mut log = state.log.write().await;
    let history = lottery.history_names();
    for name in history.iter().skip(log.reveals.len()) {
        log.record(name);
    }
    if let Err(e) = storage::save_log(&log, state.log_path.as_deref()) {
        error!(error = %e, "Failed to save reveal log");
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /api/state
pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    let lottery = state.lottery.read().await;
    Json(state_response(&lottery))
}

/// GET /api/odds
pub async fn get_odds(
    State(state): State<AppState>,
) -> Result<Json<OddsTable>, ApiError> {
    let lottery = state.lottery.read().await;
    let table = lottery.odds_table().map_err(reject)?;
    Ok(Json(table))
}

/// GET /api/draft-order
pub async fn get_draft_order(
    State(state): State<AppState>,
) -> Json<Vec<DraftSlot>> {
    let lottery = state.lottery.read().await;
    Json(lottery.draft_order())
}

/// GET /api/candidates
///
/// May auto-resolve the trivial final pick, so it can mutate state.
pub async fn get_candidates(
    State(state): State<AppState>,
) -> Json<CandidatesResponse> {
    let (candidates, resolved) = {
        let mut lottery = state.lottery.write().await;
        let before = lottery.state().teams_selected.len();
        let candidates = lottery.eligible_candidates();
        let resolved = lottery.state().teams_selected.len() != before;
        (candidates, resolved)
    };
    if resolved {
        persist(&state).await;
    }
    Json(CandidatesResponse { candidates })
}

/// POST /api/reveal
pub async fn post_reveal(
    State(state): State<AppState>,
    Json(req): Json<RevealRequest>,
) -> Result<Json<StateResponse>, ApiError> {
    let response = {
        let mut lottery = state.lottery.write().await;
        lottery.reveal_by_name(&req.team).map_err(reject)?;
        state_response(&lottery)
    };
    persist(&state).await;
    Ok(Json(response))
}

/// POST /api/reset
pub async fn post_reset(State(state): State<AppState>) -> Json<StateResponse> {
    let response = {
        let mut lottery = state.lottery.write().await;
        lottery.reset();
        state_response(&lottery)
    };
    {
        let mut log = state.log.write().await;
        log.clear();
        if let Err(e) = storage::save_log(&log, state.log_path.as_deref()) {
            error!(error = %e, "Failed to save reveal log");
        }
    }
    Json(response)
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
