//! Campaigns API endpoints

use api_types::{
    campaign::{CampaignListResponse, CampaignSummaryResponse, CampaignSummaryView, CampaignView},
    donation::DonationQuery,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::Utc;
use engine::{Campaign, CampaignSummary, Session};

use crate::{ServerError, donations::filter_from_query, server::ServerState};

fn map_campaign(campaign: &Campaign) -> CampaignView {
    CampaignView {
        id: campaign.id.clone(),
        name: campaign.name.clone(),
        description: campaign.description.clone(),
        goal: campaign.goal.as_major(),
        raised: campaign.raised.as_major(),
        donors: campaign.donors,
        start_date: campaign.start_date.raw().to_string(),
        end_date: campaign.end_date.raw().to_string(),
        status: campaign.status.to_string(),
        category: campaign.category.clone(),
        progress: campaign.progress_percentage(),
    }
}

fn map_summary(summary: &CampaignSummary<'_>) -> CampaignSummaryView {
    CampaignSummaryView {
        campaign_id: summary.campaign.id.clone(),
        name: summary.campaign.name.clone(),
        total: summary.total.as_major(),
        count: summary.count,
        goal: summary.campaign.goal.as_major(),
        raised: summary.campaign.raised.as_major(),
        percentage: summary.campaign.progress_percentage(),
        drift: summary.drift().as_major(),
    }
}

pub async fn list(
    Extension(_session): Extension<Session>,
    State(state): State<ServerState>,
) -> Json<CampaignListResponse> {
    let ledger = state.ledger.read().await;
    Json(CampaignListResponse {
        campaigns: ledger.campaigns().iter().map(map_campaign).collect(),
    })
}

/// Campaign ranking by Completed total.
///
/// Accepts the same query as `/donations`; the ranking is computed over the
/// matching donations only.
pub async fn summary(
    Extension(_session): Extension<Session>,
    State(state): State<ServerState>,
    Query(query): Query<DonationQuery>,
) -> Result<Json<CampaignSummaryResponse>, ServerError> {
    let filter = filter_from_query(&query, state.date_policy)?;
    let now = Utc::now();

    let ledger = state.ledger.read().await;
    let summaries = if filter.is_identity() {
        ledger.campaign_summaries()
    } else {
        ledger.campaign_summaries_for(&filter, now)
    };

    Ok(Json(CampaignSummaryResponse {
        summaries: summaries.iter().map(map_summary).collect(),
        as_of: now,
    }))
}
