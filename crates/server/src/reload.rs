//! Dataset reload API endpoint

use api_types::reload::ReloadResponse;
use axum::{Extension, Json, extract::State};
use chrono::Utc;
use engine::{Dataset, EngineError, Ledger, Session};

use crate::{ServerError, server::ServerState};

/// Re-reads the dataset directory and swaps the snapshot.
///
/// The new ledger is built before any lock is taken; on error the current
/// snapshot stays in place.
pub async fn reload(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
) -> Result<Json<ReloadResponse>, ServerError> {
    let Some(dir) = state.data_dir.clone() else {
        return Err(EngineError::Unavailable("no dataset directory configured".to_string()).into());
    };

    let mut dataset = tokio::task::spawn_blocking(move || Dataset::from_dir(dir))
        .await
        .map_err(|err| EngineError::Io(std::io::Error::other(err)))??;
    let organizations = std::mem::take(&mut dataset.organizations);
    let ledger = Ledger::builder().dataset(dataset).build()?;

    let response = ReloadResponse {
        donations: ledger.donations().len(),
        campaigns: ledger.campaigns().len(),
        organizations: organizations.len(),
        orphaned_donations: ledger.orphaned_donations().to_vec(),
        reloaded_at: Utc::now(),
    };

    {
        let mut current_ledger = state.ledger.write().await;
        let mut current_orgs = state.organizations.write().await;
        *current_ledger = ledger;
        *current_orgs = organizations;
    }

    tracing::info!(
        "dataset reloaded by {}: {} donations, {} campaigns, {} orphaned",
        session.organization_id(),
        response.donations,
        response.campaigns,
        response.orphaned_donations.len()
    );
    Ok(Json(response))
}
