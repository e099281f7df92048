//! Admin command that creates a login with the configured starter categories.
//!
//! Usage: `create_user <username> <password>`. Reads `DATABASE_URL` and `CONFIG_PATH`
//! the same way the server does.

use clap::Parser;
use dotenvy::dotenv;
use envelope_ledger::{
    config::{self, database},
    core::user,
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Create a ledger user", long_about = None)]
struct Args {
    /// Login name of the new user
    username: String,

    /// Initial password
    password: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    dotenv().ok();

    let args = Args::parse();
    let app_config = config::load_app_config()?;

    let db = database::create_connection(&database::get_database_url()).await?;
    database::create_tables(&db).await?;

    let created = user::create_user(
        &db,
        &args.username,
        &args.password,
        &app_config.default_categories,
    )
    .await
    .inspect_err(|e| error!("Failed to create user '{}': {}", args.username, e))?;

    info!(
        user_id = created.id,
        username = %created.username,
        categories = app_config.default_categories.len(),
        "user created with starter categories"
    );
    Ok(())
}
