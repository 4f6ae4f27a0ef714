//! Read-side aggregations over donation collections.
//!
//! All functions here are pure: they borrow their inputs, allocate a fresh
//! result and can be called concurrently on shared snapshots.

use std::collections::{HashMap, HashSet};

use crate::{Campaign, Donation, EventDate, Money};

/// Live totals of the Completed donations of one campaign.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CampaignSummary<'a> {
    pub campaign: &'a Campaign,
    pub total: Money,
    pub count: usize,
}

impl CampaignSummary<'_> {
    /// Recorded `raised` minus the live `total`.
    ///
    /// The recorded figure covers the campaign's whole history while the live
    /// total only covers the donations handed to the aggregator, so a
    /// non-zero drift is expected for filtered views.
    pub fn drift(&self) -> Money {
        self.campaign.raised - self.total
    }
}

/// Groups Completed donations by campaign and ranks the groups by total.
///
/// Donations whose campaign id has no match in `campaigns` are skipped, and
/// campaigns without Completed donations do not appear. Groups with equal
/// totals keep the order in which their first donation was seen.
pub fn summarize_campaigns<'a, 'c, I>(donations: I, campaigns: &'c [Campaign]) -> Vec<CampaignSummary<'c>>
where
    I: IntoIterator<Item = &'a Donation>,
{
    let mut by_id: HashMap<&str, &'c Campaign> = HashMap::with_capacity(campaigns.len());
    for campaign in campaigns {
        by_id.entry(campaign.id.as_str()).or_insert(campaign);
    }

    let mut slots: HashMap<&'c str, usize> = HashMap::new();
    let mut summaries: Vec<CampaignSummary<'c>> = Vec::new();

    for donation in donations.into_iter().filter(|d| d.is_completed()) {
        let Some(campaign) = by_id.get(donation.campaign.id.as_str()).copied() else {
            continue;
        };
        let slot = *slots.entry(campaign.id.as_str()).or_insert_with(|| {
            summaries.push(CampaignSummary {
                campaign,
                total: Money::ZERO,
                count: 0,
            });
            summaries.len() - 1
        });
        let summary = &mut summaries[slot];
        summary.total += donation.amount;
        summary.count += 1;
    }

    summaries.sort_by(|a, b| b.total.cmp(&a.total));
    summaries
}

/// Number of distinct donor e-mail addresses, compared verbatim.
///
/// No normalization is applied: `Ann@x.org` and `ann@x.org` are two donors.
pub fn count_unique_donors<'a, I>(donations: I) -> usize
where
    I: IntoIterator<Item = &'a Donation>,
{
    donations
        .into_iter()
        .map(|donation| donation.donor.email.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Per-donor view of the ledger, keyed by e-mail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DonorSummary {
    pub email: String,
    /// Name on the most recently dated donation.
    pub name: String,
    pub phone: String,
    /// Sum of Completed donations.
    pub total: Money,
    /// Number of donations in any status.
    pub count: usize,
    pub last_donation: Option<EventDate>,
}

impl DonorSummary {
    /// Case-insensitive substring match on name or e-mail.
    pub fn matches(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let needle = term.to_lowercase();
        self.name.to_lowercase().contains(&needle) || self.email.to_lowercase().contains(&needle)
    }
}

/// Builds the donor directory ordered by Completed total, descending.
///
/// Donors with equal totals keep first-seen order.
pub fn summarize_donors<'a, I>(donations: I) -> Vec<DonorSummary>
where
    I: IntoIterator<Item = &'a Donation>,
{
    let mut slots: HashMap<&'a str, usize> = HashMap::new();
    let mut donors: Vec<DonorSummary> = Vec::new();

    for donation in donations {
        let slot = *slots
            .entry(donation.donor.email.as_str())
            .or_insert_with(|| {
                donors.push(DonorSummary {
                    email: donation.donor.email.clone(),
                    name: donation.donor.name.clone(),
                    phone: donation.donor.phone.clone(),
                    total: Money::ZERO,
                    count: 0,
                    last_donation: None,
                });
                donors.len() - 1
            });
        let donor = &mut donors[slot];
        donor.count += 1;
        if donation.is_completed() {
            donor.total += donation.amount;
        }
        let newer = match (&donor.last_donation, donation.date.instant()) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(last), Some(instant)) => last.instant().is_none_or(|seen| instant > seen),
        };
        if newer {
            donor.name = donation.donor.name.clone();
            if !donation.donor.phone.is_empty() {
                donor.phone = donation.donor.phone.clone();
            }
            donor.last_donation = Some(donation.date.clone());
        }
    }

    donors.sort_by(|a, b| b.total.cmp(&a.total));
    donors
}

/// Headline numbers of the donations dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LedgerTotals {
    /// Sum of Completed donation amounts.
    pub total_completed: Money,
    /// Number of donation records, any status.
    pub transactions: usize,
    pub unique_donors: usize,
    /// Campaigns whose status is `Active`.
    pub active_campaigns: usize,
}

pub fn ledger_totals(donations: &[Donation], campaigns: &[Campaign]) -> LedgerTotals {
    LedgerTotals {
        total_completed: donations
            .iter()
            .filter(|d| d.is_completed())
            .map(|d| d.amount)
            .sum(),
        transactions: donations.len(),
        unique_donors: count_unique_donors(donations),
        active_campaigns: campaigns.iter().filter(|c| c.is_active()).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CampaignRef, CampaignStatus, Currency, DonationStatus, DonorSnapshot};

    fn campaign(id: &str, raised: i64) -> Campaign {
        Campaign {
            id: id.to_string(),
            name: format!("Campaign {id}"),
            description: String::new(),
            goal: Money::major(1_000),
            raised: Money::major(raised),
            donors: 0,
            start_date: EventDate::default(),
            end_date: EventDate::default(),
            status: CampaignStatus::Active,
            category: String::new(),
        }
    }

    fn donation(campaign: &str, email: &str, amount: i64, status: DonationStatus, date: &str) -> Donation {
        Donation {
            id: format!("{campaign}-{email}-{amount}"),
            donor: DonorSnapshot {
                name: email.to_string(),
                email: email.to_string(),
                phone: String::new(),
            },
            campaign: CampaignRef {
                id: campaign.to_string(),
                name: format!("Campaign {campaign}"),
            },
            amount: Money::major(amount),
            currency: Currency::default(),
            kind: String::new(),
            method: String::new(),
            status,
            date: EventDate::parse(date),
            transaction_id: String::new(),
            receipt: String::new(),
            notes: None,
            frequency: None,
            check_number: None,
        }
    }

    #[test]
    fn drift_compares_recorded_and_live_totals() {
        let campaigns = vec![campaign("C1", 400)];
        let donations = vec![donation("C1", "a@x.com", 300, DonationStatus::Completed, "")];
        let summaries = summarize_campaigns(&donations, &campaigns);
        assert_eq!(summaries[0].drift(), Money::major(100));
    }

    #[test]
    fn equal_totals_keep_encounter_order() {
        let campaigns = vec![campaign("C1", 0), campaign("C2", 0), campaign("C3", 0)];
        let donations = vec![
            donation("C2", "a@x.com", 50, DonationStatus::Completed, ""),
            donation("C3", "a@x.com", 70, DonationStatus::Completed, ""),
            donation("C1", "a@x.com", 50, DonationStatus::Completed, ""),
        ];
        let ids: Vec<&str> = summarize_campaigns(&donations, &campaigns)
            .iter()
            .map(|s| s.campaign.id.as_str())
            .collect();
        assert_eq!(ids, vec!["C3", "C2", "C1"]);
    }

    #[test]
    fn campaign_with_only_pending_donations_is_absent() {
        let campaigns = vec![campaign("C1", 0)];
        let donations = vec![donation("C1", "a@x.com", 50, DonationStatus::Processing, "")];
        assert!(summarize_campaigns(&donations, &campaigns).is_empty());
    }

    #[test]
    fn donor_directory_tracks_latest_name_and_completed_total() {
        let mut first = donation("C1", "a@x.com", 100, DonationStatus::Completed, "2025-01-01");
        first.donor.name = "Ann Lee".to_string();
        let mut second = donation("C1", "a@x.com", 40, DonationStatus::Processing, "2025-03-01");
        second.donor.name = "Ann Lee-Park".to_string();
        let third = donation("C2", "b@x.com", 500, DonationStatus::Completed, "2025-02-01");

        let donors = summarize_donors(&[first, second, third]);
        assert_eq!(donors.len(), 2);
        assert_eq!(donors[0].email, "b@x.com");
        assert_eq!(donors[1].name, "Ann Lee-Park");
        assert_eq!(donors[1].total, Money::major(100));
        assert_eq!(donors[1].count, 2);
        assert_eq!(
            donors[1].last_donation.as_ref().map(|d| d.raw()),
            Some("2025-03-01")
        );
    }

    #[test]
    fn donor_search_is_case_insensitive() {
        let donors = summarize_donors(&[donation("C1", "Sarah@Email.com", 10, DonationStatus::Completed, "")]);
        assert!(donors[0].matches("sarah"));
        assert!(donors[0].matches(""));
        assert!(!donors[0].matches("john"));
    }

    #[test]
    fn totals_only_sum_completed() {
        let campaigns = vec![campaign("C1", 0), {
            let mut done = campaign("C2", 0);
            done.status = CampaignStatus::Completed;
            done
        }];
        let donations = vec![
            donation("C1", "a@x.com", 100, DonationStatus::Completed, ""),
            donation("C1", "b@x.com", 900, DonationStatus::Processing, ""),
        ];
        assert_eq!(
            ledger_totals(&donations, &campaigns),
            LedgerTotals {
                total_completed: Money::major(100),
                transactions: 2,
                unique_donors: 2,
                active_campaigns: 1,
            }
        );
    }
}
