use dotenvy::dotenv;
use envelope_ledger::{
    api::{self, ApiState},
    config::{self, database, users},
    core::user,
    errors::{Error, Result},
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = config::load_app_config()
        .inspect_err(|e| error!("Failed to load application configuration: {}", e))?;

    // 4. Connect to the database and make sure the schema exists
    let database_url = database::get_database_url();
    let db = database::create_connection(&database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;
    info!("Database initialized successfully.");

    // 5. Bootstrap the admin account, if credentials are configured
    match users::get_admin_credentials() {
        Some(admin) => {
            let account = user::ensure_user(
                &db,
                &admin.username,
                &admin.password,
                &app_config.default_categories,
            )
            .await?;
            info!(user_id = account.id, username = %account.username, "admin account ready");
        }
        None => warn!("ADMIN_PASSWORD not set, no account bootstrapped"),
    }

    // 6. Serve the API until Ctrl-C
    let bind_address = app_config.server.bind_address.clone();
    let state = Arc::new(ApiState::new(db, &app_config));
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", bind_address, e))?;
    info!("Listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Error::from)?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
