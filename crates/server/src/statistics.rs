//! Statistics API endpoints

use api_types::stats::Statistic;
use axum::{Extension, Json, extract::State};
use engine::Session;

use crate::server::ServerState;

/// Headline numbers of the whole ledger.
pub async fn get_stats(
    Extension(_session): Extension<Session>,
    State(state): State<ServerState>,
) -> Json<Statistic> {
    let totals = state.ledger.read().await.totals();

    Json(Statistic {
        total_completed: totals.total_completed.as_major(),
        transactions: totals.transactions,
        unique_donors: totals.unique_donors,
        active_campaigns: totals.active_campaigns,
    })
}
