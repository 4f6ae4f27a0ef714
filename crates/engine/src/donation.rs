//! Donation records.
//!
//! A `Donation` is an immutable snapshot of a single contribution. Donor and
//! campaign data are denormalized into the record at the time it was taken,
//! so renaming a campaign later does not rewrite past donations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Currency, EventDate, Money};

/// Donor details as captured on the donation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorSnapshot {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Reference to the campaign a donation was made for.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRef {
    pub id: String,
    pub name: String,
}

/// Processing status of a donation.
///
/// Only [`DonationStatus::Completed`] counts towards aggregated totals.
/// Labels outside the known set are preserved in [`DonationStatus::Other`]
/// and compared verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DonationStatus {
    Completed,
    Processing,
    Active,
    Other(String),
}

impl DonationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Completed => "Completed",
            Self::Processing => "Processing",
            Self::Active => "Active",
            Self::Other(label) => label,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl From<&str> for DonationStatus {
    fn from(value: &str) -> Self {
        match value {
            "Completed" => Self::Completed,
            "Processing" => Self::Processing,
            "Active" => Self::Active,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for DonationStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Completed" | "Processing" | "Active" => Self::from(value.as_str()),
            _ => Self::Other(value),
        }
    }
}

impl From<DonationStatus> for String {
    fn from(value: DonationStatus) -> Self {
        match value {
            DonationStatus::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: String,
    pub donor: DonorSnapshot,
    pub campaign: CampaignRef,
    pub amount: Money,
    #[serde(default)]
    pub currency: Currency,
    /// One-time / recurring, or the intake channel (Online, Offline, ...).
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub method: String,
    pub status: DonationStatus,
    #[serde(default)]
    pub date: EventDate,
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub receipt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_number: Option<String>,
}

impl Donation {
    /// Whether the donation counts towards aggregated totals.
    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }
}
