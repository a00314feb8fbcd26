//! Application Configuration
//!
//! User settings stored in TOML format. Session thresholds are validated
//! when a reader is constructed, before any frame processing begins.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::vision::{Rect, Size};

/// Invalid configuration, rejected at setup time
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("accuracy_required must be within 0.0..=1.0, got {0}")]
    AccuracyOutOfRange(f64),
    #[error("evaluation_cadence must be at least 1")]
    ZeroCadence,
    #[error("minimum_frequency must be at least 1")]
    ZeroMinimumFrequency,
    #[error("shortlist_limit must be at least 1")]
    ZeroShortlistLimit,
    #[error("max_observations must be at least 1")]
    ZeroRetention,
    #[error("display bounds must have positive dimensions")]
    EmptyDisplay,
    #[error("region of interest must have positive dimensions")]
    EmptyRegion,
    #[error("pricing client_id and client_secret must be configured")]
    MissingCredentials,
}

/// Scanner settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScannerConfig {
    /// Title-reading session settings
    pub session: SessionConfig,
    /// Price lookup settings
    pub pricing: PricingConfig,
}

/// Settings for one title-reading session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Relative-frequency threshold a candidate must exceed against the most
    /// frequent one (0.0 - 1.0). Raise for stricter consensus, slower reads.
    pub accuracy_required: f64,
    /// Frames between consensus evaluations. Raise for less work per frame,
    /// slower reads.
    pub evaluation_cadence: u32,
    /// Occurrences a candidate must exceed to be considered at all.
    /// Deployment-specific; always explicit, never a hidden constant.
    pub minimum_frequency: u32,
    /// Maximum candidates surfaced per evaluation
    pub shortlist_limit: usize,
    /// Frames that must have been analyzed before the first evaluation runs
    /// (0 = evaluate on cadence from the start)
    pub required_frames: u32,
    /// Retention cap on accepted observations; oldest evicted first
    pub max_observations: usize,
    /// Display surface OCR boxes are mapped onto
    pub display: Size,
    /// Only observations whose mapped origin falls inside this region are
    /// accepted; full display bounds when unset
    pub region_of_interest: Option<Rect>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            accuracy_required: 0.75,
            evaluation_cadence: 5,
            minimum_frequency: 2,
            shortlist_limit: 3,
            required_frames: 0,
            max_observations: 4096,
            display: Size::new(1920.0, 1080.0),
            region_of_interest: None,
        }
    }
}

impl SessionConfig {
    /// Reject invalid thresholds and degenerate geometry
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.accuracy_required) {
            return Err(ConfigError::AccuracyOutOfRange(self.accuracy_required));
        }
        if self.evaluation_cadence == 0 {
            return Err(ConfigError::ZeroCadence);
        }
        if self.minimum_frequency == 0 {
            return Err(ConfigError::ZeroMinimumFrequency);
        }
        if self.shortlist_limit == 0 {
            return Err(ConfigError::ZeroShortlistLimit);
        }
        if self.max_observations == 0 {
            return Err(ConfigError::ZeroRetention);
        }
        if self.display.width <= 0.0 || self.display.height <= 0.0 {
            return Err(ConfigError::EmptyDisplay);
        }
        if let Some(region) = &self.region_of_interest {
            if region.width <= 0.0 || region.height <= 0.0 {
                return Err(ConfigError::EmptyRegion);
            }
        }
        Ok(())
    }
}

/// Settings for the pricing collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Client-credentials exchange endpoint
    pub auth_endpoint: String,
    /// Product catalog search endpoint (name to product id)
    pub catalog_endpoint: String,
    /// Price lookup endpoint (product id to market prices)
    pub pricing_endpoint: String,
    /// OAuth client id
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Seconds a bearer token stays usable before a refresh is forced
    pub token_lifetime_secs: u64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            auth_endpoint: "https://api.tcgplayer.com/token".to_string(),
            catalog_endpoint: "https://api.tcgplayer.com/catalog/products".to_string(),
            pricing_endpoint: "https://api.tcgplayer.com/pricing/product".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            // TCGplayer tokens are issued for 14 days
            token_lifetime_secs: 14 * 24 * 60 * 60,
        }
    }
}

impl PricingConfig {
    /// Reject unusable credentials before any request is made
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(ConfigError::MissingCredentials);
        }
        Ok(())
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<ScannerConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ScannerConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &ScannerConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
