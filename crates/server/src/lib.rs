use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run_with_listener, spawn_with_listener};

mod ads;
mod campaigns;
mod donations;
mod donors;
mod receipts;
mod reload;
mod server;
mod session;
mod statistics;

pub mod types {
    pub mod session {
        pub use api_types::session::{OrganizationView, ThemeView};
    }

    pub mod donation {
        pub use api_types::donation::{DonationListResponse, DonationQuery, DonationView, DonorView};
    }

    pub mod campaign {
        pub use api_types::campaign::{
            CampaignListResponse, CampaignSummaryResponse, CampaignSummaryView, CampaignView,
        };
    }

    pub mod donor {
        pub use api_types::donor::{DonorListResponse, DonorQuery, DonorSummaryView};
    }

    pub mod stats {
        pub use api_types::stats::Statistic;
    }

    pub mod receipt {
        pub use api_types::receipt::{ExtractedFields, ReceiptExtract, ReceiptExtracted};
    }

    pub mod ads {
        pub use api_types::ads::AdMetricsView;
    }

    pub mod reload {
        pub use api_types::reload::ReloadResponse;
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        EngineError::Io(_) | EngineError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_)
        | EngineError::InvalidCurrency(_)
        | EngineError::InvalidFilter(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Io(io_err) => {
            tracing::error!("dataset i/o error: {io_err}");
            "internal server error".to_string()
        }
        EngineError::Json(json_err) => {
            tracing::error!("dataset parse error: {json_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
