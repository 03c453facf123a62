use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use pulseboard_core::config::Config;
use pulseboard_ga4::Ga4Client;
use pulseboard_server::state::AppState;

/// `pulseboard health`: liveness probe for Docker HEALTHCHECK.
///
/// Calls `GET http://localhost:$PULSEBOARD_PORT/health`.
/// Exits 0 if the server responds with HTTP 200, exits 1 otherwise.
fn run_health_check() -> ! {
    let port = std::env::var("PULSEBOARD_PORT").unwrap_or_else(|_| "3000".to_string());
    let url = format!("http://localhost:{}/health", port);
    match ureq::get(&url).call() {
        Ok(resp) if resp.status() == 200 => std::process::exit(0),
        _ => std::process::exit(1),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(|s| s.as_str()) == Some("health") {
        run_health_check();
    }
    // Structured JSON logging. Level controlled via RUST_LOG env var.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pulseboard=info".parse()?),
        )
        .json()
        .init();

    let cfg = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Fail fast: without credentials every data endpoint would answer 500.
    let account = cfg
        .google
        .require()
        .context("Google Analytics service account is not configured")?;
    let client =
        Ga4Client::from_config(&cfg, &account).context("failed to initialise the GA4 client")?;

    info!(
        property_id = %account.property_id,
        project_id = %account.project_id,
        api_base = %cfg.ga_api_base,
        "GA4 client ready"
    );

    let state = Arc::new(AppState::new(cfg.clone(), Arc::new(client)));

    let addr = format!("0.0.0.0:{}", cfg.port);
    let app = pulseboard_server::app::build_app(Arc::clone(&state));

    info!(port = cfg.port, "Pulseboard listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    info!("Pulseboard stopped");
    Ok(())
}
