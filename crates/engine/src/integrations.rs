//! Capabilities provided by external services.
//!
//! Receipt OCR and ad-platform statistics live outside the ledger. The
//! engine only defines what it needs from them; concrete clients are plugged
//! in by the binary. [`Unconfigured`] is used when no client is available
//! and answers every call with [`EngineError::Unavailable`].

use serde::{Deserialize, Serialize};

use crate::{Campaign, EngineError, EventDate, Money, ResultEngine};

/// A scanned check or receipt.
#[derive(Clone, Copy, Debug)]
pub struct ReceiptDocument<'a> {
    pub file_name: &'a str,
    pub content_type: Option<&'a str>,
    pub bytes: &'a [u8],
}

/// Donation fields read from a receipt. Anything the extractor could not
/// read is left empty for the user to fill in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedReceipt {
    pub donor_name: Option<String>,
    pub amount: Option<Money>,
    pub date: Option<EventDate>,
    pub method: Option<String>,
    pub check_number: Option<String>,
    pub notes: Option<String>,
}

pub trait ReceiptExtractor: Send + Sync {
    fn extract(&self, document: &ReceiptDocument<'_>) -> ResultEngine<ExtractedReceipt>;
}

/// Delivery statistics of the ads attached to a campaign.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdMetrics {
    pub impressions: u64,
    pub clicks: u64,
    pub spend: Money,
    pub conversions: u64,
}

impl AdMetrics {
    /// Clicks per impression in percent.
    pub fn click_through_rate(&self) -> Option<f64> {
        if self.impressions == 0 {
            return None;
        }
        Some(self.clicks as f64 * 100.0 / self.impressions as f64)
    }

    /// Spend divided by conversions, rounded down to the stored precision.
    pub fn cost_per_conversion(&self) -> Option<Money> {
        let conversions = i64::try_from(self.conversions).ok().filter(|c| *c > 0)?;
        Some(Money::from_raw(self.spend.raw().div_euclid(conversions)))
    }
}

pub trait AdMetricsProvider: Send + Sync {
    fn campaign_metrics(&self, campaign: &Campaign) -> ResultEngine<AdMetrics>;
}

/// Stand-in for integrations that have not been configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unconfigured;

impl ReceiptExtractor for Unconfigured {
    fn extract(&self, _document: &ReceiptDocument<'_>) -> ResultEngine<ExtractedReceipt> {
        Err(EngineError::Unavailable(
            "receipt extraction is not configured".to_string(),
        ))
    }
}

impl AdMetricsProvider for Unconfigured {
    fn campaign_metrics(&self, _campaign: &Campaign) -> ResultEngine<AdMetrics> {
        Err(EngineError::Unavailable(
            "ad platform is not connected".to_string(),
        ))
    }
}
