use crate::app_state::AppState;
use crate::auth::verifier::DemoAccount;
use crate::dashboard;
use crate::data_models::{
    AddProductRequest, AddProductResponse, DashboardData, ExtractRequest, LoginRequest,
    LoginResponse, SessionView, StatusUpdateRequest, TokenRequest,
};
use crate::db::product::{MonitoredProduct, ProductData};
use crate::errors::AppErrors;
use crate::events::ChangeEvent;
use crate::extraction::{self, ExtractedProduct};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Result};
use validator::Validate;

pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppErrors> {
    request.validate()?;
    let (token, session, user) = state
        .auth
        .login(&request.email, &request.password, request.remember_me)
        .await?;
    Ok(Json(LoginResponse {
        token,
        user,
        expires_at: session.expires_at,
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> StatusCode {
    state.auth.logout(&request.token).await;
    state.events.publish(ChangeEvent::SessionEnded);
    StatusCode::OK
}

pub async fn session(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<SessionView>, AppErrors> {
    let session = state.auth.session(&token)?;
    Ok(Json(session.into()))
}

pub async fn refresh_session(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> Result<Json<SessionView>, AppErrors> {
    let session = state.auth.refresh(&request.token)?;
    Ok(Json(session.into()))
}

pub async fn demo_users(State(state): State<AppState>) -> Json<Vec<DemoAccount>> {
    Json(state.auth.demo_accounts())
}

pub async fn products(
    State(state): State<AppState>,
) -> Result<Json<Vec<MonitoredProduct>>, AppErrors> {
    let products = state.db.all_products().await?;
    Ok(Json(products))
}

pub async fn n_products(State(state): State<AppState>) -> Result<Json<usize>, AppErrors> {
    let count = state.db.count_products().await?;
    Ok(Json(count))
}

pub async fn add_product(
    State(state): State<AppState>,
    Json(request): Json<AddProductRequest>,
) -> Result<Json<AddProductResponse>, AppErrors> {
    request.validate()?;
    let data = match request {
        AddProductRequest::Url(request) => {
            let extracted = extraction::extract_product(&request.product_url)?;
            ProductData {
                name: extracted.name,
                price: extracted.price,
                image: extracted.image,
                retailer: extracted.retailer,
                category: extracted.category,
                source_url: Some(extracted.original_url),
                alert_settings: request.alert_settings,
            }
        }
        AddProductRequest::Manual(request) => ProductData {
            name: request.name,
            price: request.price,
            image: request.image,
            retailer: request.retailer,
            category: request.category,
            source_url: request.custom_url,
            alert_settings: request.alert_settings,
        },
    };
    let id = state.db.add_product(data).await?;
    state.events.publish(ChangeEvent::ProductsChanged);
    Ok(Json(AddProductResponse { id }))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<StatusCode, AppErrors> {
    state.db.update_status(&id, request.status).await?;
    state.events.publish(ChangeEvent::ProductsChanged);
    Ok(StatusCode::OK)
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppErrors> {
    state.db.delete_product(&id).await?;
    state.events.publish(ChangeEvent::ProductsChanged);
    Ok(StatusCode::OK)
}

pub async fn extract(
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractedProduct>, AppErrors> {
    request.validate()?;
    let product = extraction::extract_product(&request.url)?;
    Ok(Json(product))
}

pub async fn dashboard(State(state): State<AppState>) -> Json<DashboardData> {
    let data = dashboard::dashboard_data(&state.db).await;
    // the first load is what flips the first-time flag
    state.db.mark_visited().await;
    Json(data)
}

pub async fn dismiss_onboarding(State(state): State<AppState>) -> StatusCode {
    state.db.dismiss_onboarding().await;
    StatusCode::OK
}

/// Stand-in for the price sync backend; accepts and drops the payload.
pub async fn price_sync() -> StatusCode {
    StatusCode::ACCEPTED
}
