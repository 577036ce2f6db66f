use clap::Parser;
use realestate::{
    api::{handlers::AppState, routes},
    auth,
    cli::{Cli, Commands, FilterArgs},
    config::{listings::ListingFixture, sync, Settings},
    db::{self, DbPool},
    Error, Result,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,realestate=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let settings = Settings::from_env()?;
    settings.validate()?;

    match cli.command {
        Commands::Serve { port, host } => {
            serve(settings, port, host).await?;
        }
        Commands::Migrate => {
            migrate(settings).await?;
        }
        Commands::Seed { fixture } => {
            seed(settings, fixture).await?;
        }
        Commands::Query {
            fixture,
            filters,
            page_size,
        } => {
            query_fixture(settings, fixture, filters, page_size)?;
        }
        Commands::Search { filters, limit } => {
            let server_url = settings.server.base_url();
            realestate::cli::commands::search(&server_url, &filters.to_listing_query(), limit)
                .await?;
        }
        Commands::Show { property_id } => {
            let server_url = settings.server.base_url();
            realestate::cli::commands::show(&server_url, property_id).await?;
        }
    }

    Ok(())
}

/// Upsert the fixture listings; failures are logged, not fatal
async fn seed_from_fixture(pool: &DbPool, path: &Path) -> Result<sync::SeedReport> {
    let fixture = ListingFixture::from_file(path)?;
    info!(
        "Loaded listing fixture {:?}: {} properties",
        path,
        fixture.total_properties()
    );

    sync::sync_listings_from_fixture(pool, &fixture).await
}

async fn serve(mut settings: Settings, port: Option<u16>, host: Option<String>) -> Result<()> {
    if let Some(port) = port {
        settings.server.port = port;
    }
    if let Some(host) = host {
        settings.server.host = host;
    }

    info!("Starting HomeFinder server");
    info!("Database: {}", settings.database.url);
    info!("Server: {}:{}", settings.server.host, settings.server.port);

    let pool = db::init_pool_with_config(&settings.database).await?;
    info!(
        "Database connection established (max_connections: {}, min_connections: {})",
        settings.database.max_connections, settings.database.min_connections
    );

    db::run_migrations(&pool).await?;
    info!("Database migrations completed");

    if let Err(e) = seed_from_fixture(&pool, &settings.listings.fixture_path).await {
        warn!(
            "Failed to load listings from {:?}: {}",
            settings.listings.fixture_path, e
        );
        warn!("Continuing without fixture listings");
    }

    match auth::ensure_admin(&pool, &settings.auth).await {
        Ok(Some(admin)) => info!("Admin account ready: {}", admin.email),
        Ok(None) => {}
        Err(e) => warn!("Failed to set up admin account: {}", e),
    }

    let purged = db::sessions::purge_expired(&pool).await?;
    if purged > 0 {
        info!("Removed {} expired sessions", purged);
    }

    let state = AppState {
        pool,
        settings: settings.clone(),
    };
    let app = routes::create_router(state, &settings);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    println!("\n========================================");
    println!("HomeFinder");
    println!("========================================");
    println!("Address: http://{addr}");
    println!("Listings page size: {}", settings.pagination.page_size);
    println!("\nAPI Endpoints:");
    println!("  GET    /api/properties");
    println!("  GET    /api/properties/:id");
    println!("  GET    /api/properties/:id/reviews");
    println!("  GET    /api/stats");
    println!("  POST   /api/admin/properties");
    println!("  DELETE /api/admin/properties/:id");
    println!("\nPress Ctrl+C to stop");
    println!("========================================\n");

    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .map_err(|e| Error::Internal(format!("Server error: {e}")))?;

    info!("Shutting down...");
    Ok(())
}

async fn migrate(settings: Settings) -> Result<()> {
    info!("Running database migrations");

    let pool = db::init_pool(&settings.database.url).await?;
    db::run_migrations(&pool).await?;

    println!("✓ Database migrations completed successfully");
    Ok(())
}

async fn seed(settings: Settings, fixture: Option<PathBuf>) -> Result<()> {
    let path = fixture.unwrap_or(settings.listings.fixture_path);

    let pool = db::init_pool(&settings.database.url).await?;
    db::run_migrations(&pool).await?;

    let report = seed_from_fixture(&pool, &path).await?;
    println!(
        "✓ Seeded {:?}: {} added, {} updated, {} unchanged, {} retired",
        path, report.added, report.updated, report.unchanged, report.retired
    );
    for error in &report.errors {
        println!("  ✗ {error}");
    }
    Ok(())
}

fn query_fixture(
    settings: Settings,
    fixture: Option<PathBuf>,
    filters: FilterArgs,
    page_size: usize,
) -> Result<()> {
    let path = fixture.unwrap_or(settings.listings.fixture_path);
    realestate::cli::commands::query(&path, &filters.to_listing_query(), page_size)
}
