use rosterline_api::{build_router, state::AppState};
use rosterline_config::Settings;
use rosterline_db::{connect, indexes::ensure_indexes};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (silently ignore if missing)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "rosterline_api=debug,rosterline_services=debug,rosterline_db=debug,tower_http=debug"
                .into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load()?;
    info!("Starting Rosterline API on {}:{}", settings.app.host, settings.app.port);
    info!(
        batch_size = settings.dashboard.query_batch_size,
        window_days = settings.dashboard.schedule_window_days,
        lookback_days = settings.dashboard.metrics_lookback_days,
        "Dashboard config"
    );

    let db = connect(&settings.database).await?;
    ensure_indexes(&db).await?;

    let app_state = AppState::new(db, settings.clone());
    let app = build_router(app_state);

    let addr = format!("{}:{}", settings.app.host, settings.app.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
