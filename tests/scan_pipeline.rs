use simexport::{
    contact::{ContactRecord, FieldRow, SimContact},
    core::{
        cancel::CancelToken,
        scan::{ScanLimits, ScanTarget, scan_contact, scan_rows, scan_source},
    },
    error::ExportError,
    source::{ContactSource, memory::MemoryContactSource, sqlite::SqliteContactSource},
    types::FieldKind,
};

fn limits() -> ScanLimits {
    ScanLimits {
        max_name_len: 14,
        max_number_len: 20,
    }
}

#[test]
fn bulk_scan_groups_rows_and_dedupes_numbers() {
    let rows = vec![
        FieldRow::name(1, "Alice"),
        FieldRow::phone(1, "555-1111"),
        FieldRow::phone(1, "555-1111"),
        FieldRow::phone(2, "999"),
    ];
    let outcome = scan_rows(Some(rows), limits(), &CancelToken::new()).expect("scan");

    assert_eq!(
        outcome.accepted,
        vec![SimContact::new("Alice", "555-1111"), SimContact::new("", "999")]
    );
    assert!(outcome.ignored.is_empty());
    assert!(outcome.truncated_names.is_empty());
    assert!(!outcome.source_unavailable);
}

#[test]
fn one_sim_contact_per_number_with_trimmed_fields() {
    let rows = vec![
        FieldRow::phone(7, " 111 "),
        FieldRow::name(7, "  Bob  "),
        FieldRow::phone(7, "222"),
        FieldRow::email(7, "bob@example.com"),
    ];
    let outcome = scan_rows(Some(rows), limits(), &CancelToken::new()).expect("scan");

    assert_eq!(
        outcome.accepted,
        vec![SimContact::new("Bob", "111"), SimContact::new("Bob", "222")]
    );
}

#[test]
fn long_numbers_are_ignored_and_long_names_recorded() {
    let rows = vec![
        FieldRow::name(1, "Bartholomew Featherstone"),
        FieldRow::phone(1, "+1 555 0100"),
        FieldRow::phone(1, "123456789012345678901234"),
    ];
    let outcome = scan_rows(Some(rows), limits(), &CancelToken::new()).expect("scan");

    assert_eq!(outcome.truncated_names, vec!["Bartholomew Featherstone".to_string()]);
    assert_eq!(outcome.accepted.len(), 1);
    assert_eq!(
        outcome.accepted[0].truncated_name.as_deref(),
        Some("Bartholomew Fe")
    );
    assert_eq!(outcome.accepted[0].tag(), "Bartholomew Fe");
    assert_eq!(outcome.ignored.len(), 1);
    assert_eq!(outcome.ignored[0].primary_number, "123456789012345678901234");
    assert!(outcome.needs_confirmation());
}

#[test]
fn empty_data_and_unknown_kinds_are_skipped() {
    let rows = vec![
        FieldRow {
            raw_contact_id: 3,
            kind: FieldKind::Phone,
            data: None,
        },
        FieldRow {
            raw_contact_id: 3,
            kind: FieldKind::Phone,
            data: Some(String::new()),
        },
        FieldRow {
            raw_contact_id: 3,
            kind: FieldKind::Other("vnd.android.cursor.item/note".to_string()),
            data: Some("likes tea".to_string()),
        },
        FieldRow::phone(3, "42"),
    ];
    let outcome = scan_rows(Some(rows), limits(), &CancelToken::new()).expect("scan");
    assert_eq!(outcome.accepted, vec![SimContact::new("", "42")]);
}

#[test]
fn unreadable_source_yields_empty_outcome() {
    let outcome = scan_rows(None, limits(), &CancelToken::new()).expect("scan");
    assert!(outcome.is_empty());
    assert!(outcome.source_unavailable);
}

#[test]
fn canceled_scan_reports_cancellation_not_partial_results() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let rows = vec![FieldRow::phone(1, "1"), FieldRow::phone(2, "2")];
    let err = scan_rows(Some(rows), limits(), &cancel).expect_err("canceled");
    assert!(matches!(err, ExportError::Canceled));
}

#[test]
fn single_contact_scan_uses_display_name_and_unique_numbers() {
    let record = ContactRecord::new(
        Some(" Carol ".to_string()),
        vec!["1".to_string(), "2".to_string(), "1".to_string()],
        vec!["c@x.org".to_string(), "c@x.org".to_string()],
    );
    assert_eq!(record.phone_numbers, vec!["1", "2"]);
    assert_eq!(record.email_addresses, vec!["c@x.org"]);

    let outcome = scan_contact(&record, limits());
    assert_eq!(
        outcome.accepted,
        vec![SimContact::new("Carol", "1"), SimContact::new("Carol", "2")]
    );
}

#[test]
fn missing_single_contact_is_an_error() {
    let mut source = MemoryContactSource::from_rows(Vec::new());
    let err = scan_source(&mut source, ScanTarget::Contact(9), limits(), &CancelToken::new())
        .expect_err("missing");
    assert!(matches!(err, ExportError::ContactUnavailable(9)));
}

#[test]
fn memory_source_orders_rows_by_grouping_key() {
    let mut source = MemoryContactSource::from_rows(vec![
        FieldRow::phone(2, "200"),
        FieldRow::name(1, "Ann"),
        FieldRow::phone(1, "100"),
        FieldRow::name(2, "Ben"),
    ]);
    let outcome = scan_source(&mut source, ScanTarget::AllContacts, limits(), &CancelToken::new())
        .expect("scan");
    assert_eq!(
        outcome.accepted,
        vec![SimContact::new("Ann", "100"), SimContact::new("Ben", "200")]
    );
}

#[test]
fn sqlite_source_feeds_bulk_and_single_scans() {
    let mut source = SqliteContactSource::open_in_memory().expect("open");
    let dana = source
        .add_contact(Some("Dana"), &["555-0001", "555-0002"], &["dana@example.com"])
        .expect("dana");
    let _eve = source.add_contact(None, &["555-0003"], &[]).expect("eve");
    let raw = source.add_raw_contact(dana).expect("raw");
    source
        .add_field(raw, &FieldKind::Phone, Some("555-0001"))
        .expect("dupe number");

    let bulk = scan_source(&mut source, ScanTarget::AllContacts, limits(), &CancelToken::new())
        .expect("bulk");
    assert_eq!(
        bulk.accepted,
        vec![
            SimContact::new("Dana", "555-0001"),
            SimContact::new("Dana", "555-0002"),
            SimContact::new("", "555-0003"),
            SimContact::new("", "555-0001"),
        ]
    );

    let record = source.load_contact(dana).expect("load").expect("present");
    assert_eq!(record.display_name.as_deref(), Some("Dana"));
    assert_eq!(record.phone_numbers, vec!["555-0001", "555-0002"]);
    assert_eq!(record.email_addresses, vec!["dana@example.com"]);

    let single = scan_source(&mut source, ScanTarget::Contact(dana), limits(), &CancelToken::new())
        .expect("single");
    assert_eq!(single.accepted.len(), 2);
}
