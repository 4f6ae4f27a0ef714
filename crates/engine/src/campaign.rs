//! Fundraising campaigns.
//!
//! `raised` and `donors` are snapshot fields maintained outside the ledger.
//! They drive the campaign progress bar and are never recomputed from the
//! donation records; see [`crate::summarize_campaigns`] for the live totals.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{EventDate, Money};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CampaignStatus {
    Active,
    Completed,
    Scheduled,
    Other(String),
}

impl CampaignStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "Active",
            Self::Completed => "Completed",
            Self::Scheduled => "Scheduled",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for CampaignStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Active" => Self::Active,
            "Completed" => Self::Completed,
            "Scheduled" => Self::Scheduled,
            _ => Self::Other(value),
        }
    }
}

impl From<CampaignStatus> for String {
    fn from(value: CampaignStatus) -> Self {
        match value {
            CampaignStatus::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub goal: Money,
    /// Recorded amount raised (denormalized snapshot).
    #[serde(default)]
    pub raised: Money,
    /// Recorded donor count (denormalized snapshot).
    #[serde(default)]
    pub donors: u32,
    #[serde(default)]
    pub start_date: EventDate,
    #[serde(default)]
    pub end_date: EventDate,
    pub status: CampaignStatus,
    #[serde(default)]
    pub category: String,
}

impl Campaign {
    /// Progress towards the goal in percent, from the recorded `raised`
    /// figure. `None` when the goal is zero.
    ///
    /// The value is not clamped: over-funded campaigns report more than 100.
    pub fn progress_percentage(&self) -> Option<f64> {
        self.raised.percent_of(self.goal)
    }

    pub fn is_active(&self) -> bool {
        self.status == CampaignStatus::Active
    }
}
