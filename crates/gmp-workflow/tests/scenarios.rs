//! End-to-end workflow scenarios through the service façade

use gmp_test_utils::{
    certificate, deviation, finance_officer, management, procurement_officer, purchase_order,
    qa_head, qa_manager, qa_operator, qc_manager, qc_operator, secret, warehouse_manager, actor,
    ScriptedPad, OTHER_PLANT, PLANT,
};
use gmp_types::{
    CertificateOfAnalysis, CoaStatus, Credential, Deviation, DeviationStatus, PoStatus,
    PurchaseOrder, RecordField, RecordId, Role, TransitionStamp, WorkflowRecord,
};
use gmp_workflow::{
    AuditOutcome, ErrorKind, RecordStores, TransitionRequest, WorkflowConfig, WorkflowService,
};
use pretty_assertions::assert_eq;

fn service() -> WorkflowService {
    let config = WorkflowConfig::default();
    WorkflowService::new(config.clone(), RecordStores::in_memory(&config))
}

#[tokio::test]
async fn test_deviation_closes_after_two_signatures() {
    let svc = service();
    let (u1, u2, u3) = (qa_operator(), qa_manager(), qa_head());
    let id = RecordId::new("dev-1");
    svc.create(&u2, deviation("dev-1")).await.unwrap();

    svc.transition::<Deviation>(&u1, &id, DeviationStatus::Investigation, TransitionRequest::new())
        .await
        .unwrap();
    svc.transition::<Deviation>(
        &u1,
        &id,
        DeviationStatus::PendingManagerReview,
        TransitionRequest::new()
            .with_edit(RecordField::InvestigationSummary, "Door seal failed overnight")
            .with_edit(RecordField::RootCause, "Worn gasket")
            .with_edit(RecordField::Capa, "Replace gaskets quarterly"),
    )
    .await
    .unwrap();

    // Manager step without a signature
    let err = svc
        .transition::<Deviation>(
            &u2,
            &id,
            DeviationStatus::PendingFinalApproval,
            TransitionRequest::new(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignatureRequired);

    // Wrong password: no token, no state change
    let current: Deviation = svc.record(&u2, &id).await.unwrap();
    let err = svc
        .sign(&u2, &current, DeviationStatus::PendingFinalApproval, &Credential::new("guess"), None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCredential);
    let unchanged: Deviation = svc.record(&u2, &id).await.unwrap();
    assert_eq!(unchanged, current);

    // Wrong then right at the prompt
    let pad = ScriptedPad::entering(["guess", "u2-pass"]);
    let reviewed: Deviation = svc
        .sign_and_transition(
            &pad,
            &u2,
            &id,
            DeviationStatus::PendingFinalApproval,
            TransitionRequest::new(),
        )
        .await
        .unwrap();
    let prompts = pad.prompts();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0].title, "Approve & Submit to Head");
    assert_eq!(prompts[1].last_error.as_deref(), Some("invalid credential"));
    assert_eq!(reviewed.manager_reviewed_by.as_ref().map(|a| a.as_str()), Some("u2"));

    let token = svc
        .sign(&u3, &reviewed, DeviationStatus::Closed, &secret("u3"), Some("CAPA adequate".into()))
        .unwrap();
    let closed: Deviation = svc
        .transition(&u3, &id, DeviationStatus::Closed, TransitionRequest::new().with_token(token))
        .await
        .unwrap();

    assert_eq!(closed.status(), DeviationStatus::Closed);
    assert_eq!(closed.meta.trail().len(), 4);
    assert!(closed.meta.trail_is_consistent());
    assert_eq!(closed.meta.last_entry().unwrap().to, DeviationStatus::Closed);
    assert_eq!(closed.approved_by.as_ref().map(|a| a.as_str()), Some("u3"));
    let signed: Vec<bool> = closed.meta.trail().iter().map(|e| e.signed).collect();
    assert_eq!(signed, [false, false, true, true]);

    assert!(svc.audit().verify_integrity().is_ok());
    let applied = svc
        .audit()
        .events_for(&id)
        .iter()
        .filter(|e| e.outcome == AuditOutcome::Applied)
        .count();
    assert_eq!(applied, 4);
}

#[tokio::test]
async fn test_purchase_order_cannot_skip_approvals() {
    let svc = service();
    let officer = procurement_officer();
    let id = RecordId::new("po-1");
    svc.create(&officer, purchase_order("po-1")).await.unwrap();

    let err = svc
        .transition::<PurchaseOrder>(&officer, &id, PoStatus::Approved, TransitionRequest::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotPermitted);
    assert!(err.is_recoverable());
    assert!(!err.is_retryable());

    let po: PurchaseOrder = svc.record(&officer, &id).await.unwrap();
    assert_eq!(po.status(), PoStatus::Draft);
    assert!(po.meta.trail().is_empty());

    let events = svc.audit().events_for(&id);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome, AuditOutcome::Denied);
}

#[tokio::test]
async fn test_purchase_order_full_lifecycle_stamps_named_fields() {
    let svc = service();
    let id = RecordId::new("po-2");
    svc.create(&procurement_officer(), purchase_order("po-2")).await.unwrap();

    svc.transition::<PurchaseOrder>(
        &procurement_officer(),
        &id,
        PoStatus::PendingFinanceApproval,
        TransitionRequest::new()
            .with_edit(RecordField::JustificationNotes, "Stock below reorder level"),
    )
    .await
    .unwrap();

    let finance = finance_officer();
    let pad = ScriptedPad::entering(["u8-pass"]);
    let po: PurchaseOrder = svc
        .sign_and_transition(
            &pad,
            &finance,
            &id,
            PoStatus::PendingManagementApproval,
            TransitionRequest::new(),
        )
        .await
        .unwrap();
    assert_eq!(po.finance_approved_by.as_ref().map(|a| a.as_str()), Some("u8"));
    assert_eq!(po.finance_approved_on, Some(po.meta.last_entry().unwrap().timestamp));

    // Corporate account, no home plant
    let mgmt = management();
    let pad = ScriptedPad::entering(["u9-pass"]);
    let po: PurchaseOrder = svc
        .sign_and_transition(&pad, &mgmt, &id, PoStatus::Approved, TransitionRequest::new())
        .await
        .unwrap();
    assert_eq!(po.management_approved_by.as_ref().map(|a| a.as_str()), Some("u9"));

    svc.transition::<PurchaseOrder>(
        &procurement_officer(),
        &id,
        PoStatus::Sent,
        TransitionRequest::new(),
    )
        .await
        .unwrap();

    // Unsigned steps never prompt
    let pad = ScriptedPad::cancelling();
    let wh = warehouse_manager();
    svc.sign_and_transition::<PurchaseOrder, _>(
        &pad,
        &wh,
        &id,
        PoStatus::PartiallyReceived,
        TransitionRequest::new(),
    )
        .await
        .unwrap();
    assert!(pad.prompts().is_empty());
    let po: PurchaseOrder = svc
        .transition(&wh, &id, PoStatus::Received, TransitionRequest::new())
        .await
        .unwrap();

    assert_eq!(po.status(), PoStatus::Received);
    assert_eq!(po.received_by.as_ref().map(|a| a.as_str()), Some("u10"));
    assert!(po.date_received.is_some());
    assert_eq!(po.meta.trail().len(), 6);
    assert_eq!(po.meta.version, 7);
    assert_eq!(po.justification_notes.as_deref(), Some("Stock below reorder level"));
}

#[tokio::test]
async fn test_warehouse_cannot_release_certificate() {
    let svc = service();
    let id = RecordId::new("coa-1");
    svc.create(&qc_operator(), certificate("coa-1")).await.unwrap();
    svc.transition::<CertificateOfAnalysis>(
        &qc_operator(),
        &id,
        CoaStatus::PendingManagerReview,
        TransitionRequest::new(),
    )
        .await
        .unwrap();
    let coa: CertificateOfAnalysis = svc
        .transition(&qc_manager(), &id, CoaStatus::PendingHeadApproval, TransitionRequest::new())
        .await
        .unwrap();
    assert_eq!(coa.reviewed_by.as_ref().map(|a| a.as_str()), Some("u5"));

    let wh = warehouse_manager();

    // Refused before any prompt is shown
    let pad = ScriptedPad::entering(["u10-pass"]);
    let err = svc
        .sign_and_transition::<CertificateOfAnalysis, _>(
            &pad,
            &wh,
            &id,
            CoaStatus::Released,
            TransitionRequest::new(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotPermitted);
    assert!(pad.prompts().is_empty());

    // A valid signature does not help either
    let token = svc.sign(&wh, &coa, CoaStatus::Released, &secret("u10"), None).unwrap();
    let err = svc
        .transition::<CertificateOfAnalysis>(
            &wh,
            &id,
            CoaStatus::Released,
            TransitionRequest::new().with_token(token),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotPermitted);

    let after: CertificateOfAnalysis = svc.record(&wh, &id).await.unwrap();
    assert_eq!(after, coa);
}

#[tokio::test]
async fn test_cancelled_signature_leaves_record_untouched() {
    let svc = service();
    let id = RecordId::new("coa-2");
    svc.create(&qc_operator(), certificate("coa-2")).await.unwrap();
    svc.transition::<CertificateOfAnalysis>(
        &qc_operator(),
        &id,
        CoaStatus::PendingManagerReview,
        TransitionRequest::new(),
    )
        .await
        .unwrap();
    let before: CertificateOfAnalysis = svc
        .transition(&qc_manager(), &id, CoaStatus::PendingHeadApproval, TransitionRequest::new())
        .await
        .unwrap();

    let head = gmp_test_utils::qc_head();
    let pad = ScriptedPad::new(vec![None]);
    let err = svc
        .sign_and_transition::<CertificateOfAnalysis, _>(
            &pad,
            &head,
            &id,
            CoaStatus::Released,
            TransitionRequest::new(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert_eq!(svc.record::<CertificateOfAnalysis>(&head, &id).await.unwrap(), before);
}

#[tokio::test]
async fn test_token_is_spent_once_the_record_moves() {
    let svc = service();
    let (u1, u2) = (qa_operator(), qa_manager());
    let id = RecordId::new("dev-7");
    svc.create(&u2, deviation("dev-7")).await.unwrap();
    svc.transition::<Deviation>(&u1, &id, DeviationStatus::Investigation, TransitionRequest::new())
        .await
        .unwrap();
    let pending: Deviation = svc
        .transition(
            &u1,
            &id,
            DeviationStatus::PendingManagerReview,
            TransitionRequest::new()
                .with_edit(RecordField::InvestigationSummary, "Mislabelled drum"),
        )
        .await
        .unwrap();

    let token = svc
        .sign(&u2, &pending, DeviationStatus::PendingFinalApproval, &secret("u2"), None)
        .unwrap();
    svc.transition::<Deviation>(&u2, &id, DeviationStatus::Investigation, TransitionRequest::new())
        .await
        .unwrap();
    svc.transition::<Deviation>(
        &u1,
        &id,
        DeviationStatus::PendingManagerReview,
        TransitionRequest::new(),
    )
    .await
    .unwrap();

    // Same edge again, but the token was issued for an older version
    let err = svc
        .transition::<Deviation>(
            &u2,
            &id,
            DeviationStatus::PendingFinalApproval,
            TransitionRequest::new().with_token(token),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignatureRequired);
}

#[tokio::test]
async fn test_plant_scope() {
    let svc = service();
    svc.create(&qa_manager(), deviation("dev-1")).await.unwrap();
    let outsider = actor("u20", "Farah Khan", Role::QaManager).with_plant(OTHER_PLANT);

    let err = svc
        .record::<Deviation>(&outsider, &"dev-1".into())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotPermitted);
    assert!(svc
        .list_by_plant::<Deviation>(&outsider, &PLANT.into())
        .await
        .unwrap()
        .is_empty());

    let corporate = management();
    assert_eq!(
        svc.list_by_plant::<Deviation>(&corporate, &PLANT.into()).await.unwrap().len(),
        1
    );

    let missing = svc
        .record::<Deviation>(&qa_manager(), &"dev-404".into())
        .await
        .unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::NotFound);
    assert!(!missing.is_recoverable());
}

#[tokio::test]
async fn test_available_transitions_match_buttons() {
    let svc = service();
    let dev = svc.create(&qa_manager(), deviation("dev-1")).await.unwrap();
    let labels: Vec<_> = svc
        .available_transitions(&qa_operator(), &dev)
        .iter()
        .map(|r| r.label)
        .collect();
    assert_eq!(labels, ["Start Investigation"]);
    assert!(svc.available_transitions(&warehouse_manager(), &dev).is_empty());
}

#[tokio::test]
async fn test_create_refuses_records_with_history() {
    let svc = service();

    let mut forged = deviation("dev-9");
    forged.meta.advance(
        DeviationStatus::Closed,
        TransitionStamp {
            step: "Final Approve & Close".into(),
            actor_id: "u3".into(),
            role: Role::QaHead,
            at: gmp_test_utils::t0(),
            comment: None,
            signed: true,
        },
    );
    let err = svc.create(&qa_operator(), forged).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let mut preversioned = deviation("dev-9");
    preversioned.meta.version = 4;
    let err = svc.create(&qa_operator(), preversioned).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let missing = svc
        .record::<Deviation>(&qa_operator(), &"dev-9".into())
        .await
        .unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::NotFound);
    assert!(svc.audit().is_empty());
}
