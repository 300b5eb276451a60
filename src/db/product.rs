use crate::db::errors::DBError;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use time::OffsetDateTime;
use validator::Validate;

const ID_SUFFIX_LEN: usize = 9;

/// Lifecycle marker simulating eventual synchronization with a backend
/// that does not actually exist.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Pending,
    Synced,
    Error,
}

impl Display for SyncStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncStatus::Pending => write!(f, "pending"),
            SyncStatus::Synced => write!(f, "synced"),
            SyncStatus::Error => write!(f, "error"),
        }
    }
}

impl FromStr for SyncStatus {
    type Err = DBError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SyncStatus::Pending),
            "synced" => Ok(SyncStatus::Synced),
            "error" => Ok(SyncStatus::Error),
            other => Err(DBError::UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationMethod {
    Email,
    Browser,
    Sms,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AlertConfiguration {
    #[validate(range(exclusive_min = 0.0))]
    pub target_price: Option<f32>,
    #[validate(range(exclusive_min = 0.0, max = 100.0))]
    pub percentage_threshold: Option<f32>,
    #[serde(default)]
    pub enable_price_drop: bool,
    #[serde(default)]
    pub enable_back_in_stock: bool,
    #[serde(default)]
    pub notification_methods: Vec<NotificationMethod>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProductData {
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
    pub source_url: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub alert_settings: AlertConfiguration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoredProduct {
    pub id: String,
    pub data: ProductData,
    pub status: SyncStatus,
    pub version: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl MonitoredProduct {
    pub fn from_data(data: ProductData) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: generate_product_id(),
            data,
            status: SyncStatus::Pending,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Ids carry the creation time plus a random suffix; collision avoidance
/// is the only uniqueness guarantee.
pub fn generate_product_id() -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("product_{}_{}", millis, suffix.to_lowercase())
}
