use crate::auth::session::Session;
use crate::auth::verifier::{Role, User};
use crate::db::product::{AlertConfiguration, SyncStatus};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    pub remember_me: bool,
}

impl From<Session> for SessionView {
    fn from(session: Session) -> Self {
        Self {
            email: session.email,
            name: session.name,
            role: session.role,
            expires_at: session.expires_at,
            remember_me: session.remember_me,
        }
    }
}

/// The two ways a product can enter monitoring. Each variant carries only
/// the fields that make sense for its input method.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "input_method", rename_all = "lowercase")]
pub enum AddProductRequest {
    Url(UrlProductRequest),
    Manual(ManualProductRequest),
}

impl Validate for AddProductRequest {
    fn validate(&self) -> Result<(), validator::ValidationErrors> {
        match self {
            AddProductRequest::Url(request) => request.validate(),
            AddProductRequest::Manual(request) => request.validate(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UrlProductRequest {
    #[validate(url)]
    pub product_url: String,
    #[serde(default)]
    #[validate(nested)]
    pub alert_settings: AlertConfiguration,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ManualProductRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(exclusive_min = 0.0))]
    pub price: f32,
    #[serde(default)]
    pub image: String,
    #[validate(length(min = 1))]
    pub retailer: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    #[validate(url)]
    pub custom_url: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub alert_settings: AlertConfiguration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddProductResponse {
    pub id: String,
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateRequest {
    #[serde_as(as = "DisplayFromStr")]
    pub status: SyncStatus,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ExtractRequest {
    #[validate(url)]
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    ProductAdded,
    PriceDrop,
    NewDeal,
    AlertTriggered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentActivityItem {
    pub id: String,
    pub kind: ActivityKind,
    pub title: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub action_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub monitored_products: usize,
    pub active_alerts: usize,
    pub money_saved: f32,
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickAction {
    pub id: String,
    pub title: String,
    pub description: String,
    pub href: String,
    pub is_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub stats: DashboardStats,
    pub recent_activity: Vec<RecentActivityItem>,
    pub quick_actions: Vec<QuickAction>,
    pub is_first_time_user: bool,
}
