pub mod app_state;
pub mod auth;
pub mod configuration;
pub mod dashboard;
pub mod data_models;
pub mod db;
pub mod errors;
pub mod events;
pub mod extraction;
mod routes;

use crate::app_state::AppState;
use crate::auth::AuthService;
use crate::db::Database;
use crate::errors::Error;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

pub fn create_app(db: Database, auth: AuthService) -> Result<(Router, AppState), Error> {
    let app_state = AppState::init(db, auth);
    let app = Router::new()
        .route("/health_check", get(routes::health_check))
        .route("/auth/login", post(routes::login))
        .route("/auth/logout", post(routes::logout))
        .route("/auth/session/:token", get(routes::session))
        .route("/auth/refresh", post(routes::refresh_session))
        .route("/auth/demo_users", get(routes::demo_users))
        .route("/products", get(routes::products).post(routes::add_product))
        .route("/n_products", get(routes::n_products))
        .route("/product/:id", delete(routes::delete_product))
        .route("/product/:id/status", put(routes::update_status))
        .route("/extract", post(routes::extract))
        .route("/dashboard", get(routes::dashboard))
        .route(
            "/dashboard/onboarding_dismissed",
            post(routes::dismiss_onboarding),
        )
        .route("/api/prices/sync", post(routes::price_sync))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state.clone());
    Ok((app, app_state))
}
