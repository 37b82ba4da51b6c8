//! Catalog server: loads settings, prepares the database and serves the API.
//!
//! Run from repo root: `cargo run -p catalog-server`

use catalog_api::service::AdminService;
use catalog_api::{apply_migrations, app, ensure_database_exists, init_schema, AppState, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("catalog_api=info,catalog_server=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    init_schema(&settings.database.schema);

    ensure_database_exists(&settings.database.url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await?;
    apply_migrations(&pool).await?;

    if let Some(admin) = &settings.admin {
        AdminService::ensure(&pool, &admin.username, &admin.password).await?;
    }

    let state = AppState::from_settings(pool, &settings).await?;
    let listener = TcpListener::bind(&settings.server.bind_addr).await?;
    tracing::info!("catalog server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
