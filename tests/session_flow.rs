use std::sync::Arc;

use simexport::{
    config::ExportConfig,
    contact::{ContactRecord, FieldRow},
    core::{
        capacity::Overflow,
        export::ExportState,
        report::SectionKind,
        scan::ScanTarget,
    },
    runtime::{
        handle::{ExportHandle, spawn_exporter},
        session::{Choice, ExportSession, FailureKind, Prompt},
        wake::NoopWakeLock,
    },
    sim::{
        SimStorage,
        records::AdnRecordStorage,
        sqlite::{SimGeometry, SqliteSimStorage},
    },
    source::memory::MemoryContactSource,
    types::SimSlot,
};

fn geometry(capacity: usize) -> SimGeometry {
    SimGeometry {
        capacity: Some(capacity),
        max_name_len: Some(10),
        max_number_len: Some(12),
        max_email_len: None,
    }
}

fn runtime(source: MemoryContactSource, sim: Box<dyn SimStorage>) -> ExportHandle {
    spawn_exporter(
        Box::new(source),
        sim,
        Arc::new(NoopWakeLock),
        ExportConfig::default(),
    )
}

#[tokio::test]
async fn bulk_export_that_fits_finishes_after_confirmation() {
    let source = MemoryContactSource::from_rows(vec![
        FieldRow::name(1, "Ann"),
        FieldRow::phone(1, "100"),
        FieldRow::name(2, "Ben"),
        FieldRow::phone(2, "200"),
    ]);
    let sim = SqliteSimStorage::open_in_memory(geometry(10)).expect("sim");
    let handle = runtime(source, Box::new(sim));
    let mut session = ExportSession::new(handle.clone(), ScanTarget::AllContacts, SimSlot::Slot1);

    assert_eq!(
        session.begin().await.expect("begin"),
        Prompt::ConfirmExport {
            contact_name: None,
            slot: SimSlot::Slot1,
        }
    );
    let Prompt::Finished(Some(report)) = session.respond(Choice::Proceed).await.expect("scan")
    else {
        panic!("expected finished export");
    };
    assert_eq!(report.state, ExportState::Completed);
    assert_eq!(report.exported, 2);
    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn truncation_and_ignored_need_confirmation_then_space_check() {
    let source = MemoryContactSource::from_rows(vec![
        FieldRow::name(1, "Maximilian Long"),
        FieldRow::phone(1, "100"),
        FieldRow::name(2, "Ben"),
        FieldRow::phone(2, "1234567890123456"),
        FieldRow::name(3, "Cy"),
        FieldRow::phone(3, "300"),
        FieldRow::name(4, "Di"),
        FieldRow::phone(4, "400"),
    ]);
    let mut sim = SqliteSimStorage::open_in_memory(geometry(3)).expect("sim");
    sim.insert("Old", "999").expect("seed");
    sim.insert("Older", "998").expect("seed");
    let handle = runtime(source, Box::new(sim));
    let mut session = ExportSession::new(handle.clone(), ScanTarget::AllContacts, SimSlot::Single);

    session.begin().await.expect("begin");
    let Prompt::ConfirmTruncatedAndIgnored {
        sections,
        single_contact,
    } = session.respond(Choice::Proceed).await.expect("scan")
    else {
        panic!("expected truncation confirmation");
    };
    assert!(!single_contact);
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].kind, SectionKind::ToBeTruncated);
    assert_eq!(sections[0].rows[0].name, "Maximilian Long");
    assert_eq!(sections[1].kind, SectionKind::ToBeIgnored);
    assert_eq!(sections[1].rows[0].number.as_deref(), Some("1234567890123456"));

    assert_eq!(
        session.respond(Choice::Proceed).await.expect("space"),
        Prompt::NotEnoughSpace {
            overflow: Overflow::DeleteThenExport { to_delete: 2 },
        }
    );

    let Prompt::Finished(Some(report)) =
        session.respond(Choice::Proceed).await.expect("export")
    else {
        panic!("expected finished export");
    };
    assert_eq!(report.deleted, 2);
    assert_eq!(report.exported, 3);
    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn export_until_full_reports_not_complete() {
    let source = MemoryContactSource::from_rows(vec![
        FieldRow::phone(1, "100"),
        FieldRow::phone(2, "200"),
        FieldRow::phone(3, "300"),
    ]);
    let handle = runtime(source, Box::new(AdnRecordStorage::new(2, 10)));
    let mut session = ExportSession::new(handle.clone(), ScanTarget::AllContacts, SimSlot::Single);

    session.begin().await.expect("begin");
    assert_eq!(
        session.respond(Choice::Proceed).await.expect("scan"),
        Prompt::NotEnoughSpace {
            overflow: Overflow::ExportUntilFull,
        }
    );
    let Prompt::NotComplete { section, report } =
        session.respond(Choice::Proceed).await.expect("export")
    else {
        panic!("expected not complete");
    };
    assert_eq!(section.kind, SectionKind::NotExported);
    assert_eq!(section.rows.len(), 1);
    assert_eq!(section.rows[0].number.as_deref(), Some("300"));
    assert_eq!(report.map(|r| r.state), Some(ExportState::PartiallyCompleted));
    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn empty_address_book_shows_contacts_not_found() {
    let sim = SqliteSimStorage::open_in_memory(geometry(5)).expect("sim");
    let handle = runtime(MemoryContactSource::unavailable(), Box::new(sim));
    let mut session = ExportSession::new(handle.clone(), ScanTarget::AllContacts, SimSlot::Single);

    session.begin().await.expect("begin");
    assert_eq!(
        session.respond(Choice::Proceed).await.expect("scan"),
        Prompt::ContactsNotFound
    );
    assert_eq!(
        session.respond(Choice::Proceed).await.expect("after"),
        Prompt::Finished(None)
    );
    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn bulk_with_only_long_numbers_is_not_complete_without_export() {
    let source = MemoryContactSource::from_rows(vec![FieldRow::phone(1, "12345678901234567890")]);
    let sim = SqliteSimStorage::open_in_memory(geometry(5)).expect("sim");
    let handle = runtime(source, Box::new(sim));
    let mut session = ExportSession::new(handle.clone(), ScanTarget::AllContacts, SimSlot::Single);

    session.begin().await.expect("begin");
    let Prompt::NotComplete { section, report } =
        session.respond(Choice::Proceed).await.expect("scan")
    else {
        panic!("expected not complete");
    };
    assert_eq!(section.kind, SectionKind::ToBeIgnored);
    assert!(report.is_none());
    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn single_contact_paths() {
    let source = MemoryContactSource::default()
        .with_contact(
            1,
            ContactRecord::new(Some("Gina".to_string()), vec!["555".to_string()], Vec::new()),
        )
        .with_contact(
            2,
            ContactRecord::new(
                Some("Hal".to_string()),
                vec!["12345678901234567890".to_string()],
                Vec::new(),
            ),
        )
        .with_contact(3, ContactRecord::new(Some("Ida".to_string()), Vec::new(), Vec::new()))
        .with_contact(
            4,
            ContactRecord::new(
                Some("Jonathan Livingston".to_string()),
                vec!["777".to_string()],
                Vec::new(),
            ),
        );
    let sim = SqliteSimStorage::open_in_memory(geometry(5)).expect("sim");
    let handle = runtime(source, Box::new(sim));

    let mut gina = ExportSession::new(handle.clone(), ScanTarget::Contact(1), SimSlot::Slot2);
    assert_eq!(
        gina.begin().await.expect("begin"),
        Prompt::ConfirmExport {
            contact_name: Some("Gina".to_string()),
            slot: SimSlot::Slot2,
        }
    );
    assert!(matches!(
        gina.respond(Choice::Proceed).await.expect("export"),
        Prompt::Finished(Some(_))
    ));

    let mut hal = ExportSession::new(handle.clone(), ScanTarget::Contact(2), SimSlot::Single);
    hal.begin().await.expect("begin");
    assert_eq!(
        hal.respond(Choice::Proceed).await.expect("scan"),
        Prompt::Failed(FailureKind::ContainsLongNumber)
    );

    let mut ida = ExportSession::new(handle.clone(), ScanTarget::Contact(3), SimSlot::Single);
    ida.begin().await.expect("begin");
    assert_eq!(
        ida.respond(Choice::Proceed).await.expect("scan"),
        Prompt::Finished(None)
    );

    let mut jon = ExportSession::new(handle.clone(), ScanTarget::Contact(4), SimSlot::Single);
    jon.begin().await.expect("begin");
    assert_eq!(
        jon.respond(Choice::Proceed).await.expect("scan"),
        Prompt::ConfirmTruncatedAndIgnored {
            sections: Vec::new(),
            single_contact: true,
        }
    );
    assert_eq!(
        jon.respond(Choice::Cancel).await.expect("cancel"),
        Prompt::Finished(None)
    );

    let mut missing = ExportSession::new(handle.clone(), ScanTarget::Contact(99), SimSlot::Single);
    assert_eq!(
        missing.begin().await.expect("begin"),
        Prompt::Failed(FailureKind::UnableToReadContact)
    );
    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn unready_sim_fails_with_sim_not_ready() {
    let source = MemoryContactSource::from_rows(vec![FieldRow::phone(1, "1")]);
    let sim = SqliteSimStorage::open_in_memory(SimGeometry::default()).expect("sim");
    let handle = runtime(source, Box::new(sim));
    let mut session = ExportSession::new(handle.clone(), ScanTarget::AllContacts, SimSlot::Single);

    session.begin().await.expect("begin");
    assert_eq!(
        session.respond(Choice::Proceed).await.expect("scan"),
        Prompt::Failed(FailureKind::SimNotReady)
    );
    handle.shutdown().await.expect("shutdown");
}
