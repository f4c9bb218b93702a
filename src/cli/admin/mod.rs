//! Create-admin command - bootstraps an admin account

use clap::Args;

use crate::config::AppConfig;

#[derive(Args)]
pub struct CreateAdminArgs {
    /// Admin login email
    #[arg(long)]
    pub email: String,

    /// Admin password (at least 8 characters)
    #[arg(long)]
    pub password: String,
}

/// Create a verified admin account against the configured database
pub async fn run(args: CreateAdminArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    let state = crate::create_app_state(&config).await?;

    let user = state.users.create_admin(&args.email, &args.password).await?;

    println!("Created admin user {} ({})", user.email(), user.id());

    Ok(())
}
