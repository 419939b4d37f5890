//! SleepLog Web Server
//!
//! Session-authenticated HTML front end over the sleep record store.

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use forms::RecordLimits;
use std::net::SocketAddr;
use std::sync::Arc;
use storage::Repository;
use tower_governor::GovernorLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::{ExpiredDeletion, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod auth;
pub mod error;
pub mod rate_limit;
pub mod routes;
pub mod settings;
pub mod templates;


use rate_limit::{create_governor_config, DefaultGovernorConfig};
use settings::{LogSettings, SessionSettings, Settings};

/// Application state shared across handlers
pub struct AppState {
    /// Record store
    pub repository: Repository,
    /// Accepted sleep durations
    pub limits: RecordLimits,
}

impl AppState {
    pub fn new(repository: Repository) -> Self {
        Self {
            repository,
            limits: RecordLimits::default(),
        }
    }
}

/// Session layer persisting sessions in the repository's database
pub async fn session_layer(
    repository: &Repository,
    settings: &SessionSettings,
) -> anyhow::Result<SessionManagerLayer<SqliteStore>> {
    let store = SqliteStore::new(repository.pool().clone());
    store
        .migrate()
        .await
        .context("Failed to create the session table")?;
    store
        .delete_expired()
        .await
        .context("Failed to prune expired sessions")?;

    Ok(SessionManagerLayer::new(store)
        .with_secure(settings.secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(settings.expiry_days))))
}

/// Create the application router
pub fn create_router(
    state: Arc<AppState>,
    sessions: SessionManagerLayer<SqliteStore>,
    governor: Option<Arc<DefaultGovernorConfig>>,
) -> Router {
    let mut accounts: Router<Arc<AppState>> = Router::new()
        .route(
            "/signup/",
            get(routes::accounts::signup_form).post(routes::accounts::signup),
        )
        .route(
            "/accounts/login/",
            get(routes::accounts::login_form).post(routes::accounts::login),
        );
    if let Some(config) = governor {
        accounts = accounts.layer(GovernorLayer { config });
    }

    Router::new()
        .route("/", get(routes::records::sleep_list))
        .route(
            "/add/",
            get(routes::records::add_record_form).post(routes::records::add_record),
        )
        .route("/accounts/logout/", post(routes::accounts::logout))
        .route("/healthz", get(routes::health))
        .merge(accounts)
        .layer(sessions)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize logging
pub fn init_logging(settings: &LogSettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = if settings.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))
}

/// Run the server
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let repository = Repository::connect(&settings.database.url, settings.database.max_connections)
        .await
        .with_context(|| format!("Failed to open database {}", settings.database.url))?;
    let sessions = session_layer(&repository, &settings.session).await?;
    let governor = create_governor_config(&settings.rate_limit);

    let state = Arc::new(AppState::new(repository));
    let app = create_router(state, sessions, governor);

    info!("Starting SleepLog on {}", settings.server.addr);

    let listener = tokio::net::TcpListener::bind(&settings.server.addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.server.addr))?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
