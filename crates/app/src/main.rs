use engine::{Dataset, Ledger};
use server::ServerState;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "donorsense={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let data_dir = settings.data.dir.clone();
    tracing::info!("Loading dataset from {data_dir}...");
    let mut dataset = Dataset::from_dir(&data_dir)?;
    let organizations = std::mem::take(&mut dataset.organizations);
    let ledger = Ledger::builder().dataset(dataset).build()?;

    tracing::info!(
        "Loaded {} donations, {} campaigns, {} organizations",
        ledger.donations().len(),
        ledger.campaigns().len(),
        organizations.len()
    );
    if !ledger.orphaned_donations().is_empty() {
        tracing::warn!(
            "{} donations reference unknown campaigns: {}",
            ledger.orphaned_donations().len(),
            ledger.orphaned_donations().join(", ")
        );
    }

    let Some(server) = settings.server else {
        tracing::info!("No server settings, dataset is valid");
        return Ok(());
    };

    let state = ServerState::new(ledger, organizations)
        .data_dir(data_dir)
        .date_policy(settings.filters);

    tasks.spawn(async move {
        tracing::info!("Found server settings...");
        let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
        let addr = format!("{}:{}", bind, server.port);
        let listener = match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(err) => {
                tracing::error!("failed to bind server listener: {err}");
                return;
            }
        };
        if let Err(err) = server::run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}
