use std::collections::HashSet;

use chrono::{DateTime, Utc};

pub use aggregate::{
    CampaignSummary, DonorSummary, LedgerTotals, count_unique_donors, ledger_totals,
    summarize_campaigns, summarize_donors,
};
pub use campaign::{Campaign, CampaignStatus};
pub use currency::Currency;
pub use dataset::Dataset;
pub use date::EventDate;
pub use donation::{CampaignRef, Donation, DonationStatus, DonorSnapshot};
pub use error::EngineError;
pub use filter::{ALL, DatePolicy, DateWindow, DonationFilter, Predicate};
pub use integrations::{
    AdMetrics, AdMetricsProvider, ExtractedReceipt, ReceiptDocument, ReceiptExtractor,
    Unconfigured,
};
pub use money::Money;
pub use session::{Organization, Session, Theme};

mod aggregate;
mod campaign;
mod currency;
pub mod dataset;
mod date;
mod donation;
mod error;
mod filter;
mod integrations;
mod money;
mod session;

pub type ResultEngine<T> = Result<T, EngineError>;

/// In-memory donation record store.
///
/// The ledger is an immutable snapshot: it is built once from a dataset and
/// only read afterwards. Replacing the data means building a new ledger.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    donations: Vec<Donation>,
    campaigns: Vec<Campaign>,
    orphaned: Vec<String>,
}

impl Ledger {
    /// Return a builder for `Ledger`. Help to build the struct.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    /// All donations in dataset order.
    pub fn donations(&self) -> &[Donation] {
        &self.donations
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    /// Ids of donations whose campaign is not in the ledger. They stay
    /// listable but never contribute to campaign summaries.
    pub fn orphaned_donations(&self) -> &[String] {
        &self.orphaned
    }

    pub fn donation(&self, id: &str) -> ResultEngine<&Donation> {
        self.donations
            .iter()
            .find(|donation| donation.id == id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
    }

    pub fn campaign(&self, id: &str) -> ResultEngine<&Campaign> {
        self.campaigns
            .iter()
            .find(|campaign| campaign.id == id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
    }

    /// Donations matching `filter`, in dataset order.
    pub fn filter(&self, filter: &DonationFilter, now: DateTime<Utc>) -> Vec<&Donation> {
        filter.apply(&self.donations, now)
    }

    /// Ranked per-campaign totals over the whole ledger.
    pub fn campaign_summaries(&self) -> Vec<CampaignSummary<'_>> {
        summarize_campaigns(&self.donations, &self.campaigns)
    }

    /// Ranked per-campaign totals restricted to the donations matching
    /// `filter`.
    pub fn campaign_summaries_for(
        &self,
        filter: &DonationFilter,
        now: DateTime<Utc>,
    ) -> Vec<CampaignSummary<'_>> {
        summarize_campaigns(self.filter(filter, now), &self.campaigns)
    }

    pub fn unique_donor_count(&self) -> usize {
        count_unique_donors(&self.donations)
    }

    pub fn donors(&self) -> Vec<DonorSummary> {
        summarize_donors(&self.donations)
    }

    pub fn totals(&self) -> LedgerTotals {
        ledger_totals(&self.donations, &self.campaigns)
    }
}

#[derive(Debug, Default)]
pub struct LedgerBuilder {
    donations: Vec<Donation>,
    campaigns: Vec<Campaign>,
}

impl LedgerBuilder {
    pub fn donations(mut self, donations: Vec<Donation>) -> LedgerBuilder {
        self.donations = donations;
        self
    }

    pub fn campaigns(mut self, campaigns: Vec<Campaign>) -> LedgerBuilder {
        self.campaigns = campaigns;
        self
    }

    /// Takes donations and campaigns from a loaded dataset.
    pub fn dataset(self, dataset: Dataset) -> LedgerBuilder {
        self.donations(dataset.donations).campaigns(dataset.campaigns)
    }

    /// Construct `Ledger`
    ///
    /// Rejects duplicate ids, non-positive donation amounts, negative
    /// campaign figures and datasets whose donation total overflows.
    pub fn build(self) -> ResultEngine<Ledger> {
        let mut campaign_ids = HashSet::with_capacity(self.campaigns.len());
        for campaign in &self.campaigns {
            if !campaign_ids.insert(campaign.id.as_str()) {
                return Err(EngineError::ExistingKey(campaign.id.clone()));
            }
            if campaign.goal.is_negative() || campaign.raised.is_negative() {
                return Err(EngineError::InvalidAmount(format!(
                    "campaign {}: goal and raised must be >= 0",
                    campaign.id
                )));
            }
        }

        let mut donation_ids = HashSet::with_capacity(self.donations.len());
        let mut orphaned = Vec::new();
        // Every aggregate is a sum over a subset of the amounts, all positive,
        // so a bounded grand total bounds them all.
        let mut grand_total = Money::ZERO;
        for donation in &self.donations {
            if !donation_ids.insert(donation.id.as_str()) {
                return Err(EngineError::ExistingKey(donation.id.clone()));
            }
            if !donation.amount.is_positive() {
                return Err(EngineError::InvalidAmount(format!(
                    "donation {}: amount must be > 0",
                    donation.id
                )));
            }
            grand_total = grand_total.checked_add(donation.amount).ok_or_else(|| {
                EngineError::InvalidAmount(format!(
                    "donation {}: ledger total exceeds the supported range",
                    donation.id
                ))
            })?;
            if !campaign_ids.contains(donation.campaign.id.as_str()) {
                orphaned.push(donation.id.clone());
            }
        }

        Ok(Ledger {
            donations: self.donations,
            campaigns: self.campaigns,
            orphaned,
        })
    }
}
