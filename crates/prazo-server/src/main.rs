//! prazo - timeline API over the backing spreadsheet.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use prazo_server::{build_router, AppState, Settings, SheetNames};
use prazo_sheets::GoogleSheetsProvider;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::parse();

    let provider = GoogleSheetsProvider::new(&settings.spreadsheet_id, &settings.creds_file);
    let state = AppState::new(
        provider,
        SheetNames {
            projects: settings.projects_sheet.clone(),
            tasks: settings.tasks_sheet.clone(),
        },
    );
    let app = build_router(state);

    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
