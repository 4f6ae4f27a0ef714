//! Donors API endpoint

use api_types::donor::{DonorListResponse, DonorQuery, DonorSummaryView};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use engine::Session;

use crate::server::ServerState;

pub async fn list(
    Extension(_session): Extension<Session>,
    State(state): State<ServerState>,
    Query(query): Query<DonorQuery>,
) -> Json<DonorListResponse> {
    let ledger = state.ledger.read().await;
    let donors: Vec<DonorSummaryView> = ledger
        .donors()
        .into_iter()
        .filter(|donor| donor.matches(&query.search))
        .map(|donor| DonorSummaryView {
            last_donation: donor.last_donation.map(|date| date.raw().to_string()),
            email: donor.email,
            name: donor.name,
            phone: donor.phone,
            total: donor.total.as_major(),
            count: donor.count,
        })
        .collect();

    Json(DonorListResponse {
        count: donors.len(),
        donors,
    })
}
