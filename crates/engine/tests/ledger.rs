use chrono::{DateTime, Duration, Utc};

use engine::{
    ALL, Campaign, CampaignRef, CampaignStatus, Currency, Dataset, DateWindow, Donation,
    DonationFilter, DonationStatus, DonorSnapshot, EngineError, EventDate, Ledger, Money,
    count_unique_donors, summarize_campaigns,
};

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-11-28T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn campaign(id: &str, goal: i64) -> Campaign {
    Campaign {
        id: id.to_string(),
        name: format!("Campaign {id}"),
        description: String::new(),
        goal: Money::major(goal),
        raised: Money::ZERO,
        donors: 0,
        start_date: EventDate::parse("2025-01-01"),
        end_date: EventDate::parse("2025-12-31"),
        status: CampaignStatus::Active,
        category: "General".to_string(),
    }
}

fn donation(id: &str, campaign: &str, amount: i64, status: DonationStatus) -> Donation {
    Donation {
        id: id.to_string(),
        donor: DonorSnapshot {
            name: format!("Donor {id}"),
            email: format!("donor-{id}@example.org"),
            phone: String::new(),
        },
        campaign: CampaignRef {
            id: campaign.to_string(),
            name: format!("Campaign {campaign}"),
        },
        amount: Money::major(amount),
        currency: Currency::default(),
        kind: "One-time".to_string(),
        method: "Credit Card".to_string(),
        status,
        date: EventDate::from(now() - Duration::days(1)),
        transaction_id: format!("TXN-{id}"),
        receipt: format!("RCP-{id}"),
        notes: None,
        frequency: None,
        check_number: None,
    }
}

fn sample() -> Vec<Donation> {
    let mut items = vec![
        donation("1", "C1", 100, DonationStatus::Completed),
        donation("2", "C2", 250, DonationStatus::Processing),
        donation("3", "C1", 40, DonationStatus::Active),
        donation("4", "C3", 75, DonationStatus::Completed),
        donation("5", "C2", 10, DonationStatus::Completed),
    ];
    items[0].donor.name = "John Smith".to_string();
    items[2].date = EventDate::from(now() - Duration::days(20));
    items[3].date = EventDate::from(now() - Duration::hours(2));
    items[4].date = EventDate::parse("garbage");
    items
}

fn ids(items: &[&Donation]) -> Vec<String> {
    items.iter().map(|d| d.id.clone()).collect()
}

#[test]
fn identity_filter_returns_everything_in_order() {
    let data = sample();
    let filter = DonationFilter::from_inputs("", ALL, ALL, ALL).unwrap();
    let out = filter.apply(&data, now());
    assert_eq!(out.len(), data.len());
    assert!(out.iter().zip(&data).all(|(a, b)| *a == b));
}

#[test]
fn empty_collection_gives_empty_result() {
    let filter = DonationFilter::from_inputs("john", "Completed", "C1", "7days").unwrap();
    assert!(filter.apply(&Vec::<Donation>::new(), now()).is_empty());
}

#[test]
fn filtering_is_idempotent() {
    let data = sample();
    let filter = DonationFilter::from_inputs("campaign c", "Completed", ALL, "30days").unwrap();
    let once = filter.apply(&data, now());
    let twice = filter.apply(once.iter().copied(), now());
    assert_eq!(ids(&once), ids(&twice));
}

#[test]
fn search_is_case_insensitive_on_every_field() {
    let data = sample();
    for term in ["john", "JOHN", "jOhN sMiTh"] {
        let out = DonationFilter::new().search(term).apply(&data, now());
        assert_eq!(ids(&out), vec!["1"]);
    }
    let by_campaign = DonationFilter::new().search("CAMPAIGN C2").apply(&data, now());
    assert_eq!(ids(&by_campaign), vec!["2", "5"]);
    let by_txn = DonationFilter::new().search("txn-4").apply(&data, now());
    assert_eq!(ids(&by_txn), vec!["4"]);
}

#[test]
fn filters_compose_by_intersection() {
    let data = sample();
    let status = DonationFilter::new().status("Completed");
    let campaign = DonationFilter::new().campaign("C2");
    let date = DonationFilter::new().date(Some(DateWindow::Last7Days));

    let chained = campaign.apply(status.apply(&data, now()), now());
    let combined = status.clone().and(campaign.clone()).apply(&data, now());
    assert_eq!(ids(&chained), ids(&combined));
    assert_eq!(ids(&combined), vec!["5"]);

    let chained = date.apply(status.apply(&data, now()), now());
    let combined = status.and(date).apply(&data, now());
    assert_eq!(ids(&chained), ids(&combined));
    assert_eq!(ids(&combined), vec!["1", "4"]);
}

#[test]
fn date_windows() {
    let data = sample();
    let today = DonationFilter::new()
        .date(Some(DateWindow::Today))
        .apply(&data, now());
    assert_eq!(ids(&today), vec!["4"]);
    let month = DonationFilter::new()
        .date(Some(DateWindow::Last30Days))
        .apply(&data, now());
    assert_eq!(ids(&month), vec!["1", "2", "3", "4"]);
}

#[test]
fn unknown_date_input_is_an_error() {
    assert!(matches!(
        DonationFilter::from_inputs("", ALL, ALL, "yesterday"),
        Err(EngineError::InvalidFilter(_))
    ));
}

#[test]
fn aggregation_counts_only_completed_donations() {
    let campaigns = vec![campaign("C1", 1_000)];
    let donations = vec![
        donation("a", "C1", 100, DonationStatus::Completed),
        donation("b", "C1", 50, DonationStatus::Processing),
        donation("c", "C1", 25, DonationStatus::Completed),
    ];
    let summaries = summarize_campaigns(&donations, &campaigns);
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].campaign.id, "C1");
    assert_eq!(summaries[0].total, Money::major(125));
    assert_eq!(summaries[0].count, 2);
}

#[test]
fn aggregation_drops_unknown_campaigns() {
    let campaigns = vec![campaign("C1", 1_000)];
    let donations = vec![
        donation("a", "C1", 100, DonationStatus::Completed),
        donation("b", "C9", 500, DonationStatus::Completed),
    ];
    let summaries = summarize_campaigns(&donations, &campaigns);
    assert_eq!(summaries.len(), 1);
    assert!(summaries.iter().all(|s| s.campaign.id != "C9"));
}

#[test]
fn aggregation_sorts_by_total_descending() {
    let campaigns = vec![campaign("A", 100), campaign("B", 100), campaign("C", 100)];
    let donations = vec![
        donation("1", "A", 30, DonationStatus::Completed),
        donation("2", "B", 90, DonationStatus::Completed),
        donation("3", "C", 10, DonationStatus::Completed),
    ];
    let totals: Vec<Money> = summarize_campaigns(&donations, &campaigns)
        .iter()
        .map(|s| s.total)
        .collect();
    assert_eq!(totals, vec![Money::major(90), Money::major(30), Money::major(10)]);
}

#[test]
fn unique_donors_are_counted_by_email() {
    let mut donations = vec![
        donation("1", "C1", 1, DonationStatus::Completed),
        donation("2", "C1", 1, DonationStatus::Completed),
        donation("3", "C1", 1, DonationStatus::Completed),
    ];
    donations[0].donor.email = "a@x.com".to_string();
    donations[1].donor.email = "a@x.com".to_string();
    donations[2].donor.email = "b@x.com".to_string();
    assert_eq!(count_unique_donors(&donations), 2);

    donations[2].donor.email = "A@x.com".to_string();
    assert_eq!(count_unique_donors(&donations), 2);
    donations[1].donor.email = "A@x.com".to_string();
    donations[2].donor.email = "b@x.com".to_string();
    assert_eq!(count_unique_donors(&donations), 3);
}

#[test]
fn end_to_end_campaign_ranking() {
    let ledger = Ledger::builder()
        .campaigns(vec![
            campaign("C1", 50_000),
            campaign("C2", 100_000),
            campaign("C3", 25_000),
        ])
        .donations(vec![
            donation("d1", "C1", 100, DonationStatus::Completed),
            donation("d2", "C1", 150, DonationStatus::Completed),
            donation("d3", "C1", 50, DonationStatus::Completed),
            donation("d4", "C2", 500, DonationStatus::Completed),
            donation("d5", "C1", 1_000, DonationStatus::Processing),
        ])
        .build()
        .unwrap();

    let summaries = ledger.campaign_summaries();
    let got: Vec<(&str, Money, usize)> = summaries
        .iter()
        .map(|s| (s.campaign.id.as_str(), s.total, s.count))
        .collect();
    assert_eq!(
        got,
        vec![("C2", Money::major(500), 1), ("C1", Money::major(300), 3)]
    );
    assert!(ledger.orphaned_donations().is_empty());
}

#[test]
fn filtered_summaries_only_see_the_view() {
    let ledger = Ledger::builder()
        .campaigns(vec![campaign("C1", 1_000), campaign("C2", 1_000)])
        .donations(sample())
        .build()
        .unwrap();
    let filter = DonationFilter::new().date(Some(DateWindow::Last7Days));
    let summaries = ledger.campaign_summaries_for(&filter, now());
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].campaign.id, "C1");
    assert_eq!(summaries[0].total, Money::major(100));
    assert_eq!(ledger.orphaned_donations().to_vec(), vec!["4".to_string()]);
}

#[test]
fn builder_rejects_bad_records() {
    let zero = Ledger::builder()
        .donations(vec![donation("1", "C1", 0, DonationStatus::Completed)])
        .build();
    assert!(matches!(zero, Err(EngineError::InvalidAmount(_))));

    let duplicate = Ledger::builder()
        .donations(vec![
            donation("1", "C1", 5, DonationStatus::Completed),
            donation("1", "C1", 6, DonationStatus::Completed),
        ])
        .build();
    assert_eq!(duplicate.unwrap_err(), EngineError::ExistingKey("1".to_string()));
}

#[test]
fn donation_lookup() {
    let ledger = Ledger::builder().donations(sample()).build().unwrap();
    assert_eq!(ledger.donation("3").unwrap().amount, Money::major(40));
    assert_eq!(
        ledger.donation("missing").unwrap_err(),
        EngineError::KeyNotFound("missing".to_string())
    );
}

#[test]
fn dataset_loads_from_directory() {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../target/test_data")
        .join(uuid::Uuid::new_v4().to_string());
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(
        root.join("campaigns.json"),
        r#"[{ "id": "CAMP-001", "name": "Education Fund", "goal": 50000, "raised": 38500,
              "donors": 120, "startDate": "2025-01-01", "endDate": "2025-12-31",
              "status": "Active", "category": "Education" }]"#,
    )
    .unwrap();
    std::fs::write(
        root.join("donations.json"),
        r#"[{ "id": "DON-001",
              "donor": { "name": "Jane Smith", "email": "jane@email.com", "phone": "" },
              "campaign": { "id": "CAMP-001", "name": "Education Fund" },
              "amount": 500, "currency": "USD", "type": "One-time", "method": "Cash",
              "status": "Completed", "date": "2025-11-27", "transactionId": "TXN-1",
              "receipt": "RCP-1", "notes": "Community event donation" }]"#,
    )
    .unwrap();

    let dataset = Dataset::from_dir(&root).unwrap();
    assert!(dataset.organizations.is_empty());
    let ledger = Ledger::builder().dataset(dataset).build().unwrap();
    assert_eq!(ledger.totals().total_completed, Money::major(500));
    assert_eq!(
        ledger.campaign("CAMP-001").unwrap().progress_percentage(),
        Some(77.0)
    );

    std::fs::write(root.join("donations.json"), "{ not json").unwrap();
    assert!(matches!(
        Dataset::from_dir(&root),
        Err(EngineError::Json(_))
    ));

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn three_decimal_amounts_load_and_aggregate() {
    let donations: Vec<Donation> = serde_json::from_str(
        r#"[
            { "id": "K1", "donor": { "name": "Fatima Ali", "email": "fatima@email.com" },
              "campaign": { "id": "C1", "name": "Campaign C1" }, "amount": 10.125,
              "currency": "KWD", "type": "One-time", "method": "Bank Transfer",
              "status": "Completed", "date": "2025-11-27" },
            { "id": "K2", "donor": { "name": "Omar Saleh", "email": "omar@email.com" },
              "campaign": { "id": "C1", "name": "Campaign C1" }, "amount": "0.375",
              "currency": "BHD", "type": "One-time", "method": "Cash",
              "status": "Completed", "date": "2025-11-26" }
        ]"#,
    )
    .unwrap();
    assert_eq!(donations[0].amount.to_string(), "10.125");
    assert_eq!(donations[0].currency.code(), "KWD");

    let ledger = Ledger::builder()
        .campaigns(vec![campaign("C1", 1_000)])
        .donations(donations)
        .build()
        .unwrap();
    let summaries = ledger.campaign_summaries();
    assert_eq!(summaries[0].total, "10.5".parse::<Money>().unwrap());
    assert_eq!(ledger.totals().total_completed.as_major(), 10.5);
}

#[test]
fn builder_rejects_totals_that_overflow() {
    let half = Money::from_raw(i64::MAX / 2 + 1);
    let mut first = donation("1", "C1", 1, DonationStatus::Completed);
    first.amount = half;
    let mut second = donation("2", "C1", 1, DonationStatus::Completed);
    second.amount = half;

    let result = Ledger::builder()
        .campaigns(vec![campaign("C1", 1_000)])
        .donations(vec![first.clone(), second.clone()])
        .build();
    assert!(matches!(result, Err(EngineError::InvalidAmount(_))));

    let campaigns = vec![campaign("C1", 1_000)];
    let donations = vec![first, second];
    let summaries = summarize_campaigns(&donations, &campaigns);
    assert_eq!(summaries[0].total, Money::MAX);
    assert_eq!(summaries[0].count, 2);
}
