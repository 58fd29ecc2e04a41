use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use distopia_core::storage::UploadDir;
use distopia_llm::OpenAiApi;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use distopia_api::auth::users::UserStore;
use distopia_api::config::ServerConfig;
use distopia_api::router::build_app_router;
use distopia_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "distopia_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        upload_dir = %config.upload_dir.display(),
        chat_model = %config.llm.chat_model,
        "Loaded server configuration",
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = distopia_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    distopia_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    distopia_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Users ---
    let users = UserStore::from_list(&config.auth_users).expect("AUTH_USERS is malformed");
    if users.is_empty() {
        tracing::warn!("AUTH_USERS is empty; every login will be rejected");
    } else {
        tracing::info!(count = users.len(), "Loaded login table");
    }

    // --- Uploads ---
    let uploads = UploadDir::new(config.upload_dir.clone());
    uploads
        .ensure()
        .await
        .expect("Failed to create upload directory");

    // --- Language model ---
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .expect("Failed to build HTTP client");
    let llm = OpenAiApi::with_client(
        http,
        config.llm.api_key.clone(),
        config.llm.base_url.clone(),
        config.llm.chat_model.clone(),
        config.llm.embedding_model.clone(),
    );

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        uploads,
        users: Arc::new(users),
        llm: Arc::new(llm),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
