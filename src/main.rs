//! Alzheimer Insight API server
//!
//! Loads the patient dataset and classifier, precomputes the dashboard,
//! then starts serving. Any load failure aborts before the listener binds.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use alzheimer_insight::{
    analytics::PatientTable,
    create_router,
    inference::OnnxClassifier,
    AppState, Config, Dashboard, Predictor,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env();
    tracing::info!(
        "Alzheimer Insight starting ({}, production={})",
        config.environment,
        config.is_production()
    );

    // Dataset
    tracing::info!("Loading dataset: {}", config.data_path.display());
    let table = PatientTable::from_path(&config.data_path)
        .with_context(|| format!("failed to load dataset {}", config.data_path.display()))?;
    tracing::info!("Dataset loaded: {} patients", table.len());

    let dashboard = Dashboard::build(&table).context("failed to compute dashboard views")?;

    // Model
    let classifier = OnnxClassifier::load(&config.model_path)
        .with_context(|| format!("failed to load model {}", config.model_path.display()))?;
    let predictor = Predictor::new(Box::new(classifier), config.model_input_layout);

    let addr = config.bind_address();
    let state = AppState::new(config, dashboard, predictor);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "alzheimer_insight=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT").map(|f| f == "json").unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
