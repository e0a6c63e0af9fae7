//! End-to-end: trip document on disk → settlement report

use expense_settlement::{Currency, ExclusionReason, MemberId, SettlementEngine, Transfer};
use rust_decimal_macros::dec;
use std::io::Write;
use trip_planner::{spending_totals, Error, Trip};

const DOCUMENT: &str = r#"{
    "settings": {
        "startDate": "2024-11-14",
        "endDate": "2024-11-20",
        "members": ["Ming", "Mei", "Zhuang"]
    },
    "expenses": [
        {
            "id": "6f1c1a8e-3c55-4a43-9a0e-5b8f2f0f4b01",
            "payer": "Ming",
            "amount": "3000",
            "currency": "JPY",
            "description": "Dinner in Arashiyama",
            "date": "2024-11-15",
            "isShared": true,
            "participants": ["Ming", "Mei", "Zhuang"]
        },
        {
            "id": "6f1c1a8e-3c55-4a43-9a0e-5b8f2f0f4b02",
            "payer": "Mei",
            "amount": "500",
            "currency": "TWD",
            "description": "Airport pickup",
            "date": "2024-11-15",
            "isShared": true,
            "participants": ["Ming", "Mei", "Zhuang"]
        },
        {
            "id": "6f1c1a8e-3c55-4a43-9a0e-5b8f2f0f4b03",
            "payer": "Zhuang",
            "amount": "1200",
            "currency": "JPY",
            "description": "Souvenirs",
            "date": "2024-11-16",
            "isShared": false,
            "participants": ["Zhuang"]
        },
        {
            "id": "6f1c1a8e-3c55-4a43-9a0e-5b8f2f0f4b04",
            "payer": "Mei",
            "amount": "800",
            "currency": "JPY",
            "description": "Broken record",
            "date": "2024-11-16",
            "isShared": true,
            "participants": []
        }
    ]
}"#;

fn write_document(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn transfer(from: &str, to: &str, amount: rust_decimal::Decimal, currency: Currency) -> Transfer {
    Transfer {
        from: MemberId::new(from),
        to: MemberId::new(to),
        amount,
        currency,
    }
}

#[test]
fn test_document_settles_per_currency() {
    let file = write_document(DOCUMENT);
    let trip = Trip::load(file.path()).unwrap();

    let report = trip.settle(&SettlementEngine::default());

    assert_eq!(
        report.transfers,
        vec![
            transfer("Mei", "Ming", dec!(1000), Currency::jpy()),
            transfer("Zhuang", "Ming", dec!(1000), Currency::jpy()),
            transfer("Ming", "Mei", dec!(166.67), Currency::twd()),
            transfer("Zhuang", "Mei", dec!(166.67), Currency::twd()),
        ]
    );

    assert_eq!(report.excluded.len(), 1);
    assert_eq!(report.excluded[0].reason, ExclusionReason::NoParticipants);
}

#[test]
fn test_document_totals() {
    let file = write_document(DOCUMENT);
    let trip = Trip::load(file.path()).unwrap();

    let totals = spending_totals(trip.expenses());

    assert_eq!(totals[&Currency::jpy()], dec!(5000));
    assert_eq!(totals[&Currency::twd()], dec!(500));
}

#[test]
fn test_document_round_trip() {
    let file = write_document(DOCUMENT);
    let trip = Trip::load(file.path()).unwrap();

    let json = serde_json::to_string(&trip.to_document()).unwrap();
    let reloaded = Trip::load(write_document(&json).path()).unwrap();

    assert_eq!(reloaded.to_document(), trip.to_document());
}

#[test]
fn test_invalid_json_rejected() {
    let file = write_document("{ not json");
    assert!(matches!(Trip::load(file.path()), Err(Error::Json(_))));
}

#[test]
fn test_missing_file_rejected() {
    assert!(matches!(
        Trip::load("/nonexistent/trip.json"),
        Err(Error::Io(_))
    ));
}
