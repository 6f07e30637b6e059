use carbon_registry_core::certificate::CertificateIssue;
use carbon_registry_core::ids::{CertificateId, EntityId, ReportId};
use carbon_registry_core::index::MAX_INDEX_ENTRIES;
use carbon_registry_core::lifecycle::{CertificateStatus, ReviewStatus};
use carbon_registry_core::report::ReportSubmission;
use carbon_registry_core::{CallContext, Principal, RegistryError, RegistryState};

const ADMIN: Principal = Principal::from_bytes([0x01; 32]);
const NEW_ADMIN: Principal = Principal::from_bytes([0x02; 32]);
const STRANGER: Principal = Principal::from_bytes([0x03; 32]);

fn at(caller: Principal, height: u64) -> CallContext {
    CallContext::new(caller, height)
}

fn report(entity: &str) -> ReportSubmission {
    ReportSubmission {
        entity_id: entity.into(),
        methodology_id: "method1".into(),
        emissions_amount: 1000,
        period_start: 90,
        period_end: 99,
    }
}

fn certificate(entity: &str, validity: u64) -> CertificateIssue {
    CertificateIssue {
        entity_id: entity.into(),
        baseline_report_id: "report1".into(),
        current_report_id: "report2".into(),
        reduction_amount: 50,
        validity_period: validity,
    }
}

fn seeded_state() -> RegistryState {
    let mut state = RegistryState::new(ADMIN);
    let ctx = at(ADMIN, 100);
    state.register_entity(&ctx, "entity1".into(), "Test Company", "Energy").unwrap();
    state
        .register_methodology(&ctx, "method1".into(), "GHG Protocol", "Description", "All")
        .unwrap();
    state.submit_report(&ctx, "report1".into(), report("entity1")).unwrap();
    state.issue_certificate(&ctx, "cert1".into(), certificate("entity1", 365)).unwrap();
    state
}

#[test]
fn every_mutation_rejects_non_admin_without_side_effects() {
    let mut state = seeded_state();
    let before = state.clone();
    let ctx = at(STRANGER, 150);

    let results = [
        state.register_entity(&ctx, "entity2".into(), "X", "Y"),
        state.verify_entity(&ctx, &"entity1".into()),
        state.register_methodology(&ctx, "method2".into(), "X", "Y", "Z"),
        state.verify_methodology(&ctx, &"method1".into()),
        state.submit_report(&ctx, "report9".into(), report("entity1")),
        state.verify_report(&ctx, &"report1".into()),
        state.issue_certificate(&ctx, "cert9".into(), certificate("entity1", 10)),
        state.revoke_certificate(&ctx, &"cert1".into()),
        state.transfer_admin(&ctx, STRANGER),
    ];
    for r in results {
        assert_eq!(r, Err(RegistryError::Unauthorized));
        assert_eq!(r.unwrap_err().code(), 403);
    }
    assert_eq!(state, before);
}

#[test]
fn authorization_precedes_existence_checks() {
    let mut state = seeded_state();
    let ctx = at(STRANGER, 150);
    // Duplicate id and unknown id both report 403 for a non-admin.
    assert_eq!(
        state.register_entity(&ctx, "entity1".into(), "X", "Y"),
        Err(RegistryError::Unauthorized)
    );
    assert_eq!(
        state.verify_report(&ctx, &"ghost".into()),
        Err(RegistryError::Unauthorized)
    );
}

#[test]
fn admin_transfer_moves_rights_across_registries() {
    let mut state = seeded_state();
    state.transfer_admin(&at(ADMIN, 120), NEW_ADMIN).unwrap();
    assert_eq!(state.admin(), NEW_ADMIN);

    let ctx = at(NEW_ADMIN, 130);
    state.register_entity(&ctx, "entity2".into(), "Test Company", "Energy").unwrap();
    state.verify_methodology(&ctx, &"method1".into()).unwrap();
    state.verify_report(&ctx, &"report1".into()).unwrap();
    state.revoke_certificate(&ctx, &"cert1".into()).unwrap();

    assert_eq!(
        state.register_entity(&at(ADMIN, 131), "entity3".into(), "Old", "Admin"),
        Err(RegistryError::Unauthorized)
    );
}

#[test]
fn status_never_moves_backwards() {
    let mut state = seeded_state();
    let ctx = at(ADMIN, 200);
    let entity = EntityId::from("entity1");
    let cert = CertificateId::from("cert1");

    for _ in 0..3 {
        state.verify_entity(&ctx, &entity).unwrap();
        state.revoke_certificate(&ctx, &cert).unwrap();
    }
    assert_eq!(state.get_entity(&entity).unwrap().status, ReviewStatus::Verified);
    assert_eq!(state.get_certificate(&cert).unwrap().status, CertificateStatus::Revoked);
}

#[test]
fn stamps_follow_the_clock_at_creation() {
    let mut state = RegistryState::new(ADMIN);
    state.register_entity(&at(ADMIN, 7), "e-early".into(), "A", "B").unwrap();
    state.register_entity(&at(ADMIN, 700), "e-late".into(), "A", "B").unwrap();
    state.submit_report(&at(ADMIN, 701), "r1".into(), report("e-late")).unwrap();
    assert_eq!(state.get_entity(&"e-early".into()).unwrap().registration_date, 7);
    assert_eq!(state.get_entity(&"e-late".into()).unwrap().registration_date, 700);
    assert_eq!(state.get_report(&"r1".into()).unwrap().submission_date, 701);
}

#[test]
fn weak_references_are_not_checked() {
    let mut state = RegistryState::new(ADMIN);
    let ctx = at(ADMIN, 100);
    state.submit_report(&ctx, "r1".into(), report("unregistered")).unwrap();
    state.issue_certificate(&ctx, "c1".into(), certificate("unregistered", 5)).unwrap();
    assert!(state.get_entity(&"unregistered".into()).is_none());
    assert_eq!(state.entity_reports(&"unregistered".into()).unwrap().len(), 1);
}

#[test]
fn certificate_index_caps_at_one_hundred_atomically() {
    let mut state = RegistryState::new(ADMIN);
    let ctx = at(ADMIN, 100);
    for i in 0..MAX_INDEX_ENTRIES {
        state
            .issue_certificate(&ctx, format!("cert{i}").into(), certificate("entity1", 365))
            .unwrap();
    }

    let journal_len = state.journal().len();
    let err = state
        .issue_certificate(&ctx, "cert100".into(), certificate("entity1", 365))
        .unwrap_err();
    assert_eq!(err, RegistryError::CapacityExceeded);
    assert_eq!(err.code(), 101);

    assert!(state.get_certificate(&"cert100".into()).is_none());
    assert_eq!(state.journal().len(), journal_len);

    let ids = state.entity_certificates(&"entity1".into()).unwrap();
    assert_eq!(ids.len(), MAX_INDEX_ENTRIES);
    for (i, id) in ids.iter().enumerate() {
        assert_eq!(id, &CertificateId::from(format!("cert{i}")));
    }

    // A different entity still has room.
    state.issue_certificate(&ctx, "cert100".into(), certificate("entity2", 365)).unwrap();
}

#[test]
fn report_index_keeps_order_at_capacity() {
    let mut state = RegistryState::new(ADMIN);
    let ctx = at(ADMIN, 100);
    for i in 0..MAX_INDEX_ENTRIES {
        state.submit_report(&ctx, format!("report{i}").into(), report("entity1")).unwrap();
    }
    assert_eq!(
        state.submit_report(&ctx, "report100".into(), report("entity1")),
        Err(RegistryError::CapacityExceeded)
    );
    let ids = state.entity_reports(&"entity1".into()).unwrap();
    assert_eq!(ids.first(), Some(&ReportId::from("report0")));
    assert_eq!(ids.last(), Some(&ReportId::from("report99")));
}

#[test]
fn certificate_validity_scenario() {
    let mut state = RegistryState::new(ADMIN);
    let id = CertificateId::from("cert1");
    state.issue_certificate(&at(ADMIN, 100), id.clone(), certificate("entity1", 365)).unwrap();

    let cert = state.get_certificate(&id).unwrap();
    assert_eq!(cert.issuance_date, 100);
    assert_eq!(cert.expiration_date, 465);
    assert_eq!(
        state.entity_certificates(&"entity1".into()),
        Some(&[id.clone()][..])
    );

    assert!(state.is_certificate_valid(&id, 465));
    assert!(!state.is_certificate_valid(&id, 466));

    state.revoke_certificate(&at(ADMIN, 300), &id).unwrap();
    assert!(!state.is_certificate_valid(&id, 300));
    assert!(!state.is_certificate_valid(&id, 465));
}

#[test]
fn journal_records_successes_only() {
    let mut state = seeded_state();
    assert_eq!(state.journal().len(), 4);
    let head = state.journal().head();

    let _ = state.verify_entity(&at(STRANGER, 101), &"entity1".into());
    let _ = state.verify_entity(&at(ADMIN, 101), &"ghost".into());
    assert_eq!(state.journal().head(), head);

    state.verify_entity(&at(ADMIN, 101), &"entity1".into()).unwrap();
    assert_eq!(state.journal().len(), 5);
    assert!(state.journal().verify_chain().is_ok());
    assert!(state.journal().merkle_root().is_some());
}
