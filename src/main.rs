use auto_board::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    repository::{
        AdRepositoryState, PostgresAdRepository, PostgresUserRepository, UserRepositoryState,
    },
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// The asynchronous entry point for the application, responsible for initializing
/// all core components: Configuration, Logging, Database, and the HTTP Server.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    // Loads .env file settings before configuration can be read.
    dotenv::dotenv().ok();
    // AppConfig::load() implements the fail-fast principle for missing secrets.
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    // Sets the default log level. It prioritizes the RUST_LOG environment variable,
    // falling back to sensible defaults for local development.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "auto_board=debug,tower_http=info,axum=trace".into());

    // 3. Initialize Logging based on Environment
    // The structured logging format is dynamically selected based on the APP_ENV.
    match config.env {
        Env::Local => {
            // LOCAL: pretty print output for human readability during debugging.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // PROD: JSON format output for ingestion by centralized log aggregators.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Database Initialization (Postgres)
    // Creates a connection pool to the Postgres instance defined in the configuration.
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db_url)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

    // Apply pending schema migrations before accepting traffic.
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("FATAL: Failed to run database migrations.");

    // 5. Repository Construction
    // Wrap the Postgres implementations in Arcs for thread-safe sharing.
    let users = Arc::new(PostgresUserRepository::new(pool.clone())) as UserRepositoryState;
    let ads = Arc::new(PostgresAdRepository::new(pool)) as AdRepositoryState;

    // 6. Unified State Assembly
    let bind_addr = config.bind_addr.clone();
    let app_state = AppState {
        users,
        ads,
        config,
    };

    // 7. Router and Server Startup
    let app = create_router(app_state);

    // Binds the TCP listener and initiates the HTTP server.
    let listener = TcpListener::bind(&bind_addr).await.unwrap();

    tracing::info!("HTTP server bound successfully.");
    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    // The long-running Axum server process.
    axum::serve(listener, app).await.unwrap();
}
