use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod session {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ThemeView {
        pub primary: String,
        pub secondary: String,
        pub tertiary: String,
    }

    /// Profile of the authenticated organization. The password never leaves
    /// the server.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrganizationView {
        pub id: String,
        pub name: String,
        pub email: String,
        pub ein: Option<String>,
        pub country: Option<String>,
        pub state: Option<String>,
        pub description: Option<String>,
        pub theme: ThemeView,
    }
}

pub mod donation {
    use super::*;

    /// Dashboard filter inputs.
    ///
    /// Every field accepts `"all"` or an empty string as "no filter".
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DonationQuery {
        #[serde(default)]
        pub search: String,
        #[serde(default)]
        pub status: String,
        #[serde(default)]
        pub campaign: String,
        /// One of `today`, `7days`, `30days`.
        #[serde(default)]
        pub date: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DonorView {
        pub name: String,
        pub email: String,
        pub phone: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DonationView {
        pub id: String,
        pub donor: DonorView,
        pub campaign_id: String,
        pub campaign_name: String,
        /// Major currency units.
        pub amount: f64,
        pub currency: String,
        #[serde(rename = "type")]
        pub kind: String,
        pub method: String,
        pub status: String,
        /// Date exactly as recorded in the dataset.
        pub date: String,
        pub transaction_id: String,
        pub receipt: String,
        pub notes: Option<String>,
        pub frequency: Option<String>,
        pub check_number: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DonationListResponse {
        pub donations: Vec<DonationView>,
        pub count: usize,
        /// Reference instant used for the date windows.
        pub as_of: DateTime<Utc>,
    }
}

pub mod campaign {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CampaignView {
        pub id: String,
        pub name: String,
        pub description: String,
        pub goal: f64,
        pub raised: f64,
        pub donors: u32,
        pub start_date: String,
        pub end_date: String,
        pub status: String,
        pub category: String,
        /// `raised / goal` in percent, `null` when the goal is zero.
        pub progress: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CampaignListResponse {
        pub campaigns: Vec<CampaignView>,
    }

    /// One row of the campaign ranking.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CampaignSummaryView {
        pub campaign_id: String,
        pub name: String,
        /// Sum of the Completed donations seen.
        pub total: f64,
        pub count: usize,
        pub goal: f64,
        /// Denormalized figure stored on the campaign.
        pub raised: f64,
        pub percentage: Option<f64>,
        /// `raised - total`.
        pub drift: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CampaignSummaryResponse {
        pub summaries: Vec<CampaignSummaryView>,
        pub as_of: DateTime<Utc>,
    }
}

pub mod donor {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DonorQuery {
        #[serde(default)]
        pub search: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DonorSummaryView {
        pub email: String,
        pub name: String,
        pub phone: String,
        pub total: f64,
        pub count: usize,
        pub last_donation: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DonorListResponse {
        pub donors: Vec<DonorSummaryView>,
        pub count: usize,
    }
}

pub mod stats {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Statistic {
        pub total_completed: f64,
        pub transactions: usize,
        pub unique_donors: usize,
        pub active_campaigns: usize,
    }
}

pub mod receipt {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReceiptExtract {
        pub file_name: String,
        pub content_type: Option<String>,
        /// File contents, standard base64.
        pub content_base64: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExtractedFields {
        pub donor_name: Option<String>,
        pub amount: Option<f64>,
        pub date: Option<String>,
        pub method: Option<String>,
        pub check_number: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReceiptExtracted {
        pub scan_id: Uuid,
        pub extracted: ExtractedFields,
    }
}

pub mod ads {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AdMetricsView {
        pub campaign_id: String,
        pub impressions: u64,
        pub clicks: u64,
        pub spend: f64,
        pub conversions: u64,
        /// Click-through rate in percent.
        pub ctr: Option<f64>,
        pub cost_per_conversion: Option<f64>,
    }
}

pub mod reload {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReloadResponse {
        pub donations: usize,
        pub campaigns: usize,
        pub organizations: usize,
        pub orphaned_donations: Vec<String>,
        pub reloaded_at: DateTime<Utc>,
    }
}
