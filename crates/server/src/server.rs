use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use tokio::sync::RwLock;

use std::{path::PathBuf, sync::Arc};

use crate::{ads, campaigns, donations, donors, receipts, reload, session, statistics};
use engine::{
    AdMetricsProvider, DatePolicy, Ledger, Organization, ReceiptExtractor, Session, Unconfigured,
};

/// Shared state of every request.
///
/// The ledger and the organizations are snapshots: handlers take a read
/// lock for the duration of one request and `/reload` swaps them under the
/// write lock.
#[derive(Clone)]
pub struct ServerState {
    pub ledger: Arc<RwLock<Ledger>>,
    pub organizations: Arc<RwLock<Vec<Organization>>>,
    /// Directory `/reload` reads from. Reload is unavailable without it.
    pub data_dir: Option<PathBuf>,
    pub date_policy: DatePolicy,
    pub receipts: Arc<dyn ReceiptExtractor>,
    pub ads: Arc<dyn AdMetricsProvider>,
}

impl ServerState {
    pub fn new(ledger: Ledger, organizations: Vec<Organization>) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
            organizations: Arc::new(RwLock::new(organizations)),
            data_dir: None,
            date_policy: DatePolicy::default(),
            receipts: Arc::new(Unconfigured),
            ads: Arc::new(Unconfigured),
        }
    }

    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn date_policy(mut self, policy: DatePolicy) -> Self {
        self.date_policy = policy;
        self
    }

    pub fn receipt_extractor(mut self, extractor: Arc<dyn ReceiptExtractor>) -> Self {
        self.receipts = extractor;
        self
    }

    pub fn ad_metrics(mut self, provider: Arc<dyn AdMetricsProvider>) -> Self {
        self.ads = provider;
        self
    }
}

/// Basic authentication against the organizations of the dataset.
///
/// The username is the organization e-mail.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(credentials)) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    let session = {
        let organizations = state.organizations.read().await;
        Session::authenticate(&organizations, credentials.username(), credentials.password())
    };

    let Some(session) = session else {
        tracing::debug!("rejected credentials for {}", credentials.username());
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/session", get(session::get))
        .route("/donations", get(donations::list))
        .route("/donations/export", get(donations::export_csv))
        .route("/donations/{id}", get(donations::detail))
        .route("/campaigns", get(campaigns::list))
        .route("/campaigns/summary", get(campaigns::summary))
        .route("/campaigns/{id}/ads", get(ads::campaign_metrics))
        .route("/donors", get(donors::list))
        .route("/stats", get(statistics::get_stats))
        .route("/receipts/extract", post(receipts::extract))
        .route("/reload", post(reload::reload))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
