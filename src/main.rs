use anyhow::Result;
use time::macros::format_description;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::fmt::time::UtcTime;

use clinichub_backend::config::Settings;
use clinichub_backend::db::Database;
use clinichub_backend::{handlers, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with better timestamp formatting
    let time_format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let timer = UtcTime::new(time_format);

    tracing_subscriber::fmt()
        .with_timer(timer)
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("🚀 Starting ClinicHub API");

    let settings = Settings::new()?;
    if settings.using_default_secret() {
        warn!("⚠️  Using the default JWT secret; set CLINICHUB_JWT__SECRET in production");
    }

    let db = Database::connect(&settings.database.url).await?;
    let state = AppState::new(&db, &settings);
    let app = handlers::router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("✅ ClinicHub API listening on http://{}", addr);
    info!("📝 API available under /api");

    axum::serve(listener, app).await?;
    Ok(())
}
