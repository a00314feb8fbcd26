//! Pricing Layer
//!
//! Resolves a scanned card title to market prices via a two-step chain:
//! catalog search (name to product id), then price lookup (product id to
//! market/foil prices), authenticated with a cached, expiring bearer token.

pub mod token;

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, PricingConfig};
use crate::storage::KeyValueStore;

pub use token::TokenCache;

/// Price lookup failure
#[derive(Debug, Error)]
pub enum PriceError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("token endpoint rejected the client credentials ({0})")]
    Auth(reqwest::StatusCode),
    #[error("no catalog product matches \"{0}\"")]
    NoMatch(String),
    #[error("token store error: {0}")]
    Store(anyhow::Error),
}

/// Market prices for one product
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    /// Market price of the regular printing
    pub market: Option<f64>,
    /// Market price of the foil printing
    pub market_foil: Option<f64>,
}

impl fmt::Display for PriceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.market {
            Some(price) => write!(f, "Market: ${price:.2}")?,
            None => write!(f, "No info found for market price")?,
        }
        write!(f, " / ")?;
        match self.market_foil {
            Some(price) => write!(f, "Foil: ${price:.2}"),
            None => write!(f, "No info found for foil market price"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogProduct {
    product_id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    results: Vec<CatalogProduct>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceEntry {
    sub_type_name: Option<String>,
    market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    results: Vec<PriceEntry>,
}

/// Price lookup client.
///
/// The bearer token lives in an injected key-value store and is refreshed
/// via a client-credentials exchange once it outlives its configured
/// lifetime. Scanned titles are matched against catalog results by string
/// similarity, since OCR consensus can still differ from the canonical
/// product name by punctuation or casing.
pub struct PriceClient {
    http: Client,
    config: PricingConfig,
    tokens: TokenCache,
}

impl PriceClient {
    /// Create a client; credentials are validated here, before any request
    pub fn new(config: PricingConfig, store: Box<dyn KeyValueStore>) -> Result<Self, ConfigError> {
        config.validate()?;
        let tokens = TokenCache::new(store, Duration::from_secs(config.token_lifetime_secs));
        Ok(Self {
            http: Client::new(),
            config,
            tokens,
        })
    }

    /// Resolve a card title to its market prices
    pub async fn resolve_price(&self, title: &str) -> Result<PriceRecord, PriceError> {
        let token = self.bearer_token().await?;
        let product = self.search_product(&token, title).await?;
        debug!(product_id = product.product_id, name = %product.name, "catalog match");
        self.lookup_prices(&token, product.product_id).await
    }

    /// Cached token, or a fresh one from the client-credentials exchange
    async fn bearer_token(&self) -> Result<String, PriceError> {
        if !self.tokens.is_expired() {
            if let Some(token) = self.tokens.get() {
                return Ok(token);
            }
        }

        info!("bearer token missing or expired, requesting a new one");
        let response = self
            .http
            .post(&self.config.auth_endpoint)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PriceError::Auth(response.status()));
        }

        let minted: TokenResponse = response.json().await?;
        self.tokens.put(&minted.access_token).map_err(PriceError::Store)?;
        Ok(minted.access_token)
    }

    async fn search_product(&self, token: &str, name: &str) -> Result<CatalogProduct, PriceError> {
        let response = self
            .http
            .get(&self.config.catalog_endpoint)
            .bearer_auth(token)
            .query(&[("productName", name), ("limit", "10")])
            .send()
            .await?
            .error_for_status()?;

        let catalog: CatalogResponse = response.json().await?;
        best_match(name, catalog.results).ok_or_else(|| PriceError::NoMatch(name.to_string()))
    }

    async fn lookup_prices(&self, token: &str, product_id: i64) -> Result<PriceRecord, PriceError> {
        let url = format!("{}/{}", self.config.pricing_endpoint, product_id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?;

        let payload: PriceResponse = response.json().await?;
        Ok(extract_prices(&payload.results))
    }
}

/// Catalog result closest to the scanned title, by Jaro-Winkler similarity
fn best_match(name: &str, results: Vec<CatalogProduct>) -> Option<CatalogProduct> {
    let wanted = name.to_lowercase();
    results.into_iter().max_by(|a, b| {
        let sim_a = strsim::jaro_winkler(&a.name.to_lowercase(), &wanted);
        let sim_b = strsim::jaro_winkler(&b.name.to_lowercase(), &wanted);
        sim_a.total_cmp(&sim_b)
    })
}

/// Pick regular and foil market prices out of the price payload.
///
/// Entries are matched by `subTypeName` where the API provides it, falling
/// back to position (first entry regular, second foil) where it does not.
fn extract_prices(entries: &[PriceEntry]) -> PriceRecord {
    let mut record = PriceRecord {
        market: None,
        market_foil: None,
    };

    for (i, entry) in entries.iter().enumerate() {
        match entry.sub_type_name.as_deref() {
            Some("Normal") => record.market = record.market.or(entry.market_price),
            Some("Foil") => record.market_foil = record.market_foil.or(entry.market_price),
            _ => match i {
                0 => record.market = record.market.or(entry.market_price),
                1 => record.market_foil = record.market_foil.or(entry.market_price),
                _ => {}
            },
        }
    }

    record
}
