use clap::Parser;
use showcase::{
    api::{create_router, AppState},
    cache::SystemClock,
    cli::{commands, Cli, Commands},
    config::Settings,
    Result,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    // Silently ignore if file doesn't exist
    let _ = dotenvy::dotenv();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let mut settings = Settings::from_env()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_ansi(!settings.environment.is_production()))
        .init();

    match cli.command {
        Commands::Serve { port, host } => {
            // Override settings with CLI arguments
            if let Some(port) = port {
                settings.server.port = port;
            }
            if let Some(host) = host {
                settings.server.host = host;
            }
            settings.validate()?;
            serve(settings).await?;
        }
        Commands::Check => {
            settings.validate()?;
            let report = commands::check(&settings).await?;
            commands::print_check_report(&settings, &report);
        }
    }

    Ok(())
}

async fn serve(settings: Settings) -> Result<()> {
    info!("Starting Showcase server");
    info!(
        "GitHub user: {} (API: {})",
        settings.github.username,
        settings.github.api_base_url()
    );
    info!(
        "Environment: {:?}, cache TTL: {} minutes",
        settings.environment, settings.cache.ttl_minutes
    );

    let state = AppState::new(settings.clone(), Arc::new(SystemClock))?;
    let app = create_router(state, &settings);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!("\n========================================");
    println!("Showcase Server");
    println!("========================================");
    println!("Address: http://{addr}");
    println!("GitHub user: {}", settings.github.username);
    println!("\nAPI Endpoints:");
    println!("  GET  /");
    println!("  GET  /api/repositories");
    println!("  GET  /api/repositories/:repo_name/languages");
    println!("  GET  /api/pinned");
    println!("  GET  /api/featured");
    println!("\nPress Ctrl+C to stop");
    println!("========================================\n");

    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    info!("Shutting down...");
    Ok(())
}
