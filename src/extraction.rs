use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

const MIN_EXTRACTED_PRICE: f32 = 10.0;
const PRICE_JITTER: f32 = 50.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("Please enter a valid URL (must start with http:// or https://)")]
    InvalidUrl,
    #[error("URL must be from a supported platform: {0}")]
    UnsupportedPlatform(String),
    #[error("Product information could not be extracted")]
    NoProductData,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SupportedPlatform {
    pub name: &'static str,
    pub url_pattern: &'static str,
    pub enabled: bool,
}

pub static SUPPORTED_PLATFORMS: [SupportedPlatform; 4] = [
    SupportedPlatform {
        name: "Amazon",
        url_pattern: "amazon.com",
        enabled: true,
    },
    SupportedPlatform {
        name: "Best Buy",
        url_pattern: "bestbuy.com",
        enabled: true,
    },
    SupportedPlatform {
        name: "Target",
        url_pattern: "target.com",
        enabled: true,
    },
    SupportedPlatform {
        name: "Walmart",
        url_pattern: "walmart.com",
        enabled: true,
    },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedProduct {
    pub name: String,
    pub price: f32,
    pub image: String,
    pub retailer: String,
    pub category: Option<String>,
    pub original_url: String,
    pub is_available: bool,
}

pub fn is_valid_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed.scheme() == "http" || parsed.scheme() == "https",
        Err(_) => false,
    }
}

fn platform_for(url: &str) -> Option<&'static SupportedPlatform> {
    let lowercase = url.to_lowercase();
    SUPPORTED_PLATFORMS
        .iter()
        .find(|platform| platform.enabled && lowercase.contains(platform.url_pattern))
}

pub fn check_supported(url: &str) -> Result<&'static SupportedPlatform, ExtractionError> {
    if !is_valid_url(url) {
        return Err(ExtractionError::InvalidUrl);
    }
    platform_for(url).ok_or_else(|| {
        let names = SUPPORTED_PLATFORMS
            .iter()
            .map(|platform| platform.name)
            .collect::<Vec<_>>()
            .join(", ");
        ExtractionError::UnsupportedPlatform(names)
    })
}

// Canned demo catalog, one entry per platform. Real extraction would
// fetch and parse the product page here.
fn catalog_entry(url_pattern: &str) -> Option<ExtractedProduct> {
    let (name, price, retailer, category) = match url_pattern {
        "amazon.com" => ("iPhone 15 Pro Max 256GB", 1199.99, "Amazon", "Electronics"),
        "bestbuy.com" => ("MacBook Air M3 13-inch", 1099.99, "Best Buy", "Computers"),
        "target.com" => ("AirPods Pro 2nd Gen", 199.99, "Target", "Electronics"),
        "walmart.com" => ("iPad Air 10.9-inch", 599.99, "Walmart", "Tablets"),
        _ => return None,
    };
    Some(ExtractedProduct {
        name: name.to_string(),
        price,
        image: "/icons/apple-touch-icon.png".to_string(),
        retailer: retailer.to_string(),
        category: Some(category.to_string()),
        original_url: String::new(),
        is_available: true,
    })
}

/// Mock extraction: canned product data with a random price jitter so
/// repeated lookups do not look static.
pub fn extract_product(url: &str) -> Result<ExtractedProduct, ExtractionError> {
    let platform = check_supported(url)?;
    let mut product = catalog_entry(platform.url_pattern).ok_or(ExtractionError::NoProductData)?;
    let jitter: f32 = thread_rng().gen_range(-PRICE_JITTER..PRICE_JITTER);
    product.price = ((product.price + jitter).max(MIN_EXTRACTED_PRICE) * 100.0).round() / 100.0;
    product.original_url = url.to_string();
    Ok(product)
}
