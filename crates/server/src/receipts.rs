//! Receipt scanning API endpoint

use api_types::receipt::{ExtractedFields, ReceiptExtract, ReceiptExtracted};
use axum::{Extension, Json, extract::State};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use engine::{ReceiptDocument, Session};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

/// Runs the configured extractor over an uploaded check or receipt.
///
/// Nothing is stored: the caller reviews the fields and records the
/// donation itself.
pub async fn extract(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Json(payload): Json<ReceiptExtract>,
) -> Result<Json<ReceiptExtracted>, ServerError> {
    if payload.file_name.is_empty() {
        return Err(ServerError::Generic("file_name required".to_string()));
    }
    let bytes = STANDARD
        .decode(payload.content_base64.as_bytes())
        .map_err(|err| ServerError::Generic(format!("invalid base64 content: {err}")))?;
    if bytes.is_empty() {
        return Err(ServerError::Generic("empty document".to_string()));
    }

    let document = ReceiptDocument {
        file_name: &payload.file_name,
        content_type: payload.content_type.as_deref(),
        bytes: &bytes,
    };
    let receipt = state.receipts.extract(&document)?;

    let scan_id = Uuid::new_v4();
    tracing::info!(
        "receipt {} scanned for {} as {scan_id}",
        payload.file_name,
        session.organization_id()
    );

    Ok(Json(ReceiptExtracted {
        scan_id,
        extracted: ExtractedFields {
            donor_name: receipt.donor_name,
            amount: receipt.amount.map(|amount| amount.as_major()),
            date: receipt.date.map(|date| date.raw().to_string()),
            method: receipt.method,
            check_number: receipt.check_number,
            notes: receipt.notes,
        },
    }))
}
