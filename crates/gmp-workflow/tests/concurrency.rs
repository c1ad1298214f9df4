//! Two sessions racing on the same record

use futures::future::join_all;
use gmp_test_utils::{deviation, qa_manager, qa_operator, t0};
use gmp_types::{Deviation, DeviationStatus};
use gmp_workflow::{
    ConcurrencyMode, ErrorKind, InMemoryRecordStore, RecordStore, StoreError, TransitionRequest,
    WorkflowEngine, WorkflowError,
};
use gmp_esign::ESignatureGate;

#[tokio::test]
async fn test_second_writer_gets_conflict() {
    let engine = WorkflowEngine::new(ESignatureGate::generate().verifying_key());
    let store = InMemoryRecordStore::<Deviation>::new();
    let loaded = store.save(deviation("dev-1")).await.unwrap();

    // Both sessions read version 1 and fire the same edge
    let attempts = [qa_operator(), qa_manager()].map(|actor| {
        engine
            .apply_transition_at(
                &loaded,
                DeviationStatus::Investigation,
                &actor,
                TransitionRequest::new(),
                t0(),
            )
            .unwrap()
    });
    let results = join_all(attempts.into_iter().map(|rec| store.save(rec))).await;

    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(StoreError::Conflict { .. })))
        .count();
    assert_eq!(conflicts, 1);
    let winner = store.get(&"dev-1".into()).await.unwrap();
    assert_eq!(winner.meta.version, 2);
    assert_eq!(winner.meta.trail().len(), 1);

    let err: WorkflowError = results.into_iter().find_map(Result::err).unwrap().into();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_last_writer_wins_keeps_second_save() {
    let engine = WorkflowEngine::new(ESignatureGate::generate().verifying_key());
    let store = InMemoryRecordStore::<Deviation>::with_mode(ConcurrencyMode::LastWriterWins);
    let loaded = store.save(deviation("dev-1")).await.unwrap();

    for actor in [qa_operator(), qa_manager()] {
        let next = engine
            .apply_transition_at(
                &loaded,
                DeviationStatus::Investigation,
                &actor,
                TransitionRequest::new(),
                t0(),
            )
            .unwrap();
        store.save(next).await.unwrap();
    }
    let stored = store.get(&"dev-1".into()).await.unwrap();
    assert_eq!(stored.meta.trail()[0].actor_id.as_str(), "u2");
    assert_eq!(stored.meta.trail().len(), 1);
}
