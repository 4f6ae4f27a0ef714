//! Filter predicate engine.
//!
//! A [`DonationFilter`] is a conjunction of independent predicates. Each
//! filter input of the dashboard (search box, status, campaign, date range)
//! contributes at most one predicate; inputs left at their no-op value
//! (`"all"` or empty) contribute none, so a default filter is the identity.
//!
//! Filtering is stable: matching donations keep their original relative
//! order. Nothing is cached, every call walks the whole input.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Donation, DonationStatus, EngineError, ResultEngine};

/// Filter value meaning "do not filter on this input".
pub const ALL: &str = "all";

/// Relative date ranges offered by the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateWindow {
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "7days")]
    Last7Days,
    #[serde(rename = "30days")]
    Last30Days,
}

impl DateWindow {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Last7Days => "7days",
            Self::Last30Days => "30days",
        }
    }

    /// Parses a date filter input; `"all"` and `""` mean no window.
    pub fn parse_filter(value: &str) -> ResultEngine<Option<Self>> {
        if is_no_op(value) {
            return Ok(None);
        }
        value.parse().map(Some)
    }

    /// Largest accepted age in whole days.
    fn max_days(self) -> i64 {
        match self {
            Self::Today => 0,
            Self::Last7Days => 7,
            Self::Last30Days => 30,
        }
    }

    fn contains(self, days_before: i64, policy: DatePolicy) -> bool {
        match self {
            Self::Today => days_before == 0,
            Self::Last7Days | Self::Last30Days => {
                days_before <= self.max_days() && (policy.include_future_dated || days_before >= 0)
            }
        }
    }
}

impl FromStr for DateWindow {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(Self::Today),
            "7days" => Ok(Self::Last7Days),
            "30days" => Ok(Self::Last30Days),
            other => Err(EngineError::InvalidFilter(format!(
                "unknown date filter: {other}"
            ))),
        }
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How multi-day windows treat donations dated after `now`.
///
/// With `include_future_dated` unset (the default) the `7days`/`30days`
/// windows require `0 <= days <= N`. Setting it keeps the legacy behaviour
/// of an upper bound only, where any future-dated donation matches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct DatePolicy {
    #[serde(default)]
    pub include_future_dated: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    /// Lower-cased needle matched against donor name, campaign name and
    /// transaction id.
    Search(String),
    Status(DonationStatus),
    Campaign(String),
    Date(DateWindow),
}

impl Predicate {
    fn matches(&self, donation: &Donation, now: DateTime<Utc>, policy: DatePolicy) -> bool {
        match self {
            Self::Search(needle) => [
                donation.donor.name.as_str(),
                donation.campaign.name.as_str(),
                donation.transaction_id.as_str(),
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(needle.as_str())),
            Self::Status(status) => donation.status == *status,
            Self::Campaign(id) => donation.campaign.id == *id,
            Self::Date(window) => donation
                .date
                .days_before(now)
                .is_some_and(|days| window.contains(days, policy)),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DonationFilter {
    predicates: Vec<Predicate>,
    policy: DatePolicy,
}

impl DonationFilter {
    /// A filter that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring search. Empty terms are ignored.
    pub fn search(mut self, term: &str) -> Self {
        if !term.is_empty() {
            self.predicates.push(Predicate::Search(term.to_lowercase()));
        }
        self
    }

    /// Exact status match, `"all"` and `""` are ignored.
    pub fn status(mut self, status: &str) -> Self {
        if !is_no_op(status) {
            self.predicates.push(Predicate::Status(DonationStatus::from(status)));
        }
        self
    }

    /// Exact campaign id match, `"all"` and `""` are ignored.
    pub fn campaign(mut self, campaign_id: &str) -> Self {
        if !is_no_op(campaign_id) {
            self.predicates
                .push(Predicate::Campaign(campaign_id.to_string()));
        }
        self
    }

    pub fn date(mut self, window: Option<DateWindow>) -> Self {
        if let Some(window) = window {
            self.predicates.push(Predicate::Date(window));
        }
        self
    }

    pub fn date_policy(mut self, policy: DatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builds a filter from the four raw dashboard inputs.
    pub fn from_inputs(search: &str, status: &str, campaign: &str, date: &str) -> ResultEngine<Self> {
        Ok(Self::new()
            .search(search)
            .status(status)
            .campaign(campaign)
            .date(DateWindow::parse_filter(date)?))
    }

    /// Conjunction of two filters. The date policy of `self` is kept.
    pub fn and(mut self, other: DonationFilter) -> Self {
        self.predicates.extend(other.predicates);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// `true` when no predicate is active.
    pub fn is_identity(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches(&self, donation: &Donation, now: DateTime<Utc>) -> bool {
        self.predicates
            .iter()
            .all(|predicate| predicate.matches(donation, now, self.policy))
    }

    /// Returns the matching donations in their original order.
    pub fn apply<'a, I>(&self, donations: I, now: DateTime<Utc>) -> Vec<&'a Donation>
    where
        I: IntoIterator<Item = &'a Donation>,
    {
        donations
            .into_iter()
            .filter(|donation| self.matches(donation, now))
            .collect()
    }
}

/// `"all"` and the empty string both mean "no filter". The empty string is
/// what a query string carries for an input left untouched (`?status=`), and
/// no donation has an empty status or campaign id worth selecting.
fn is_no_op(value: &str) -> bool {
    value.is_empty() || value == ALL
}
