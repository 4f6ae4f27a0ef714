//! Donations API endpoints

use api_types::donation::{DonationListResponse, DonationQuery, DonationView, DonorView};
use axum::{
    Extension, Json,
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use engine::{DatePolicy, DateWindow, Donation, DonationFilter, EngineError, Session};

use crate::{ServerError, server::ServerState};

const CSV_HEADER: [&str; 13] = [
    "id",
    "date",
    "donor_name",
    "donor_email",
    "campaign_id",
    "campaign_name",
    "amount",
    "currency",
    "type",
    "method",
    "status",
    "transaction_id",
    "receipt",
];

/// Builds the engine filter from the dashboard query string.
pub(crate) fn filter_from_query(
    query: &DonationQuery,
    policy: DatePolicy,
) -> Result<DonationFilter, ServerError> {
    let filter = DonationFilter::new()
        .search(&query.search)
        .status(&query.status)
        .campaign(&query.campaign)
        .date(DateWindow::parse_filter(&query.date)?)
        .date_policy(policy);
    Ok(filter)
}

pub(crate) fn map_donation(donation: &Donation) -> DonationView {
    DonationView {
        id: donation.id.clone(),
        donor: DonorView {
            name: donation.donor.name.clone(),
            email: donation.donor.email.clone(),
            phone: donation.donor.phone.clone(),
        },
        campaign_id: donation.campaign.id.clone(),
        campaign_name: donation.campaign.name.clone(),
        amount: donation.amount.as_major(),
        currency: donation.currency.to_string(),
        kind: donation.kind.clone(),
        method: donation.method.clone(),
        status: donation.status.to_string(),
        date: donation.date.raw().to_string(),
        transaction_id: donation.transaction_id.clone(),
        receipt: donation.receipt.clone(),
        notes: donation.notes.clone(),
        frequency: donation.frequency.clone(),
        check_number: donation.check_number.clone(),
    }
}

pub async fn list(
    Extension(_session): Extension<Session>,
    State(state): State<ServerState>,
    Query(query): Query<DonationQuery>,
) -> Result<Json<DonationListResponse>, ServerError> {
    let filter = filter_from_query(&query, state.date_policy)?;
    let now = Utc::now();

    let ledger = state.ledger.read().await;
    let donations: Vec<DonationView> = ledger
        .filter(&filter, now)
        .into_iter()
        .map(map_donation)
        .collect();

    Ok(Json(DonationListResponse {
        count: donations.len(),
        donations,
        as_of: now,
    }))
}

pub async fn detail(
    Extension(_session): Extension<Session>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<DonationView>, ServerError> {
    let ledger = state.ledger.read().await;
    let donation = ledger.donation(&id)?;
    Ok(Json(map_donation(donation)))
}

/// Filtered donations as a CSV attachment.
pub async fn export_csv(
    Extension(_session): Extension<Session>,
    State(state): State<ServerState>,
    Query(query): Query<DonationQuery>,
) -> Result<Response, ServerError> {
    let filter = filter_from_query(&query, state.date_policy)?;

    let body = {
        let ledger = state.ledger.read().await;
        write_csv(&ledger.filter(&filter, Utc::now()))?
    };

    let mut resp = Response::new(Body::from(body));
    let headers = resp.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=donations.csv"),
    );
    Ok(resp.into_response())
}

fn write_csv(donations: &[&Donation]) -> Result<Vec<u8>, ServerError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER).map_err(csv_error)?;
    for donation in donations {
        let amount = donation.amount.to_string();
        let currency = donation.currency.to_string();
        writer
            .write_record([
                donation.id.as_str(),
                donation.date.raw(),
                donation.donor.name.as_str(),
                donation.donor.email.as_str(),
                donation.campaign.id.as_str(),
                donation.campaign.name.as_str(),
                amount.as_str(),
                currency.as_str(),
                donation.kind.as_str(),
                donation.method.as_str(),
                donation.status.as_str(),
                donation.transaction_id.as_str(),
                donation.receipt.as_str(),
            ])
            .map_err(csv_error)?;
    }
    writer
        .into_inner()
        .map_err(|err| EngineError::Io(err.into_error()).into())
}

fn csv_error(err: csv::Error) -> ServerError {
    EngineError::Io(err.into()).into()
}
