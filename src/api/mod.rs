use axum::{
    Router, middleware,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_sessions::{
    Expiry, MemoryStore, SessionManagerLayer,
    cookie::{Key, SameSite},
};

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, SeaOrmAuthService};

mod assets;
pub mod auth;
mod error;
pub mod flash;
pub mod movies;
mod observability;
pub mod settings;
pub mod validation;
pub mod views;

pub use error::AppError;

pub const SESSION_COOKIE_NAME: &str = "watchlist_session";

/// Everything a handler may touch, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth: Arc<dyn AuthService>,

    pub session_store: MemoryStore,

    pub session_key: Key,

    pub prometheus_handle: Option<PrometheusHandle>,
}

fn session_key(config: &Config) -> anyhow::Result<Key> {
    match &config.server.session_secret {
        Some(secret) => Key::try_from(secret.as_bytes())
            .map_err(|e| anyhow::anyhow!("Invalid session secret: {e}")),
        None => {
            tracing::warn!("No session secret configured; sessions will not survive a restart");
            Ok(Key::generate())
        }
    }
}

pub fn create_app_state(
    config: Config,
    store: Store,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let session_key = session_key(&config)?;
    let auth = Arc::new(SeaOrmAuthService::new(
        store.clone(),
        config.security.clone(),
    )) as Arc<dyn AuthService + Send + Sync + 'static>;

    Ok(Arc::new(AppState {
        config: Arc::new(config),
        store,
        auth,
        session_store: MemoryStore::default(),
        session_key,
        prometheus_handle,
    }))
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;
    create_app_state(config, store, prometheus_handle)
}

pub fn router(state: Arc<AppState>) -> Router {
    let server = &state.config.server;

    let session_layer = SessionManagerLayer::new(state.session_store.clone())
        .with_name(SESSION_COOKIE_NAME)
        .with_secure(server.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            server.session_inactivity_minutes,
        )))
        .with_signed(state.session_key.clone());

    let protected_routes = create_protected_router(state.clone());

    Router::new()
        .route("/", get(movies::index).post(movies::create_movie))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/static/{*path}", get(assets::serve_static))
        .merge(protected_routes)
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            error::render_not_found,
        ))
        .layer(session_layer)
        .layer(middleware::from_fn(
            observability::security_headers_middleware,
        ))
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/movie/edit/{id}",
            get(movies::edit_page).post(movies::update_movie),
        )
        .route("/movie/delete/{id}", post(movies::delete_movie))
        .route("/logout", get(auth::logout))
        .route(
            "/settings",
            get(settings::settings_page).post(settings::update_settings),
        )
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::require_authenticated,
        ))
}

/// Fallback for every unmatched path.
async fn not_found() -> AppError {
    AppError::NotFound("No route matched".to_string())
}
