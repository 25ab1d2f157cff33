use axum::{
    Router, middleware,
    routing::{any, delete, get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::SameSite};

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, FilmService};
use crate::state::SharedState;

mod assets;
pub mod auth;
mod error;
mod films;
mod observability;
mod pages;
mod system;
mod templates;
mod types;
mod validation;

pub use error::WebError;
pub use observability::RequestUser;
pub use templates::Templates;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub templates: Arc<Templates>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth(&self) -> &dyn AuthService {
        self.shared.auth_service.as_ref()
    }

    #[must_use]
    pub fn films(&self) -> &dyn FilmService {
        self.shared.film_service.as_ref()
    }
}

pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let templates = Arc::new(Templates::load()?);

    Ok(Arc::new(AppState {
        shared,
        templates,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let server = &state.config().server;

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(server.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            server.session_inactivity_minutes,
        )));

    Router::new()
        .merge(create_protected_router(state.clone()))
        .route("/", get(pages::root))
        .route("/index/", get(pages::index))
        .route("/login/", get(auth::login_page).post(auth::login))
        .route("/logout/", get(auth::logout).post(auth::logout))
        .route("/register/", get(auth::register_page).post(auth::register))
        .route("/check-username/", post(auth::check_username))
        .route("/clear/", any(pages::clear))
        .route("/static/{*path}", get(assets::serve_static))
        .route("/health/live", get(system::health_live))
        .route("/health/ready", get(system::health_ready))
        .route("/metrics", get(observability::get_metrics))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::track_requests))
        .layer(middleware::from_fn(observability::security_headers))
        .with_state(state)
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/films/", get(films::list_films))
        .route("/add-film/", post(films::add_film))
        .route("/delete-film/{id}/", delete(films::delete_film))
        .route("/search-film/", post(films::search_film))
        .route("/sort/", post(films::sort))
        .route_layer(middleware::from_fn_with_state(state, auth::require_login))
}
