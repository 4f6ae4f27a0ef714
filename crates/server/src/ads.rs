//! Ad platform API endpoint

use api_types::ads::AdMetricsView;
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use engine::Session;

use crate::{ServerError, server::ServerState};

/// Delivery statistics of a campaign's ads, from the configured provider.
pub async fn campaign_metrics(
    Extension(_session): Extension<Session>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<AdMetricsView>, ServerError> {
    let ledger = state.ledger.read().await;
    let campaign = ledger.campaign(&id)?;
    let metrics = state.ads.campaign_metrics(campaign)?;

    Ok(Json(AdMetricsView {
        campaign_id: campaign.id.clone(),
        impressions: metrics.impressions,
        clicks: metrics.clicks,
        spend: metrics.spend.as_major(),
        conversions: metrics.conversions,
        ctr: metrics.click_through_rate(),
        cost_per_conversion: metrics.cost_per_conversion().map(|cost| cost.as_major()),
    }))
}
