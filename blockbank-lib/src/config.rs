//! Site configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields the stock demo behaviour.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{BlockbankError, Result};

/// Tunables for the demo flow and the account services.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// How long the demo wizard stays in the processing phase.
    #[serde(default = "default_processing_delay_ms")]
    pub processing_delay_ms: u64,

    /// Simulated settlement time for the payment form.
    #[serde(default = "default_payment_delay_ms")]
    pub payment_delay_ms: u64,

    /// Probability that a simulated payment succeeds (0.0 - 1.0).
    #[serde(default = "default_success_rate")]
    pub success_rate: f64,

    /// Object store bucket for identity documents.
    #[serde(default = "default_kyc_bucket")]
    pub kyc_bucket: String,

    /// Number of transactions shown under "Recent Transactions".
    #[serde(default = "default_recent_transaction_limit")]
    pub recent_transaction_limit: usize,

    /// Gas limit for a plain native-asset transfer.
    #[serde(default = "default_transfer_gas")]
    pub transfer_gas: u64,
}

fn default_processing_delay_ms() -> u64 {
    3000
}

fn default_payment_delay_ms() -> u64 {
    3000
}

fn default_success_rate() -> f64 {
    0.8
}

fn default_kyc_bucket() -> String {
    "kyc-documents".to_string()
}

fn default_recent_transaction_limit() -> usize {
    5
}

fn default_transfer_gas() -> u64 {
    21_000
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: default_processing_delay_ms(),
            payment_delay_ms: default_payment_delay_ms(),
            success_rate: default_success_rate(),
            kyc_bucket: default_kyc_bucket(),
            recent_transaction_limit: default_recent_transaction_limit(),
            transfer_gas: default_transfer_gas(),
        }
    }
}

impl SiteConfig {
    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            BlockbankError::Storage(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.success_rate) {
            return Err(BlockbankError::invalid_data(
                "success_rate",
                "must be between 0.0 and 1.0",
            ));
        }
        if self.kyc_bucket.trim().is_empty() {
            return Err(BlockbankError::invalid_data("kyc_bucket", "must not be empty"));
        }
        Ok(())
    }

    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }

    pub fn payment_delay(&self) -> Duration {
        Duration::from_millis(self.payment_delay_ms)
    }

    /// Set the demo processing delay.
    pub fn with_processing_delay(mut self, delay: Duration) -> Self {
        self.processing_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the simulated payment delay.
    pub fn with_payment_delay(mut self, delay: Duration) -> Self {
        self.payment_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the simulated payment success rate.
    pub fn with_success_rate(mut self, rate: f64) -> Self {
        self.success_rate = rate;
        self
    }

    /// Set the KYC document bucket.
    pub fn with_kyc_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.kyc_bucket = bucket.into();
        self
    }

    /// Set how many recent transactions are listed.
    pub fn with_recent_transaction_limit(mut self, limit: usize) -> Self {
        self.recent_transaction_limit = limit;
        self
    }
}
