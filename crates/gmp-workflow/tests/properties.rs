//! Engine properties over random transition attempts

use chrono::{DateTime, Utc};
use gmp_access::HasRuleTable;
use gmp_esign::ESignatureGate;
use gmp_test_utils::{all_actors, certificate, deviation, purchase_order, secret, t0};
use gmp_types::{Actor, RecordField, WorkflowRecord, WorkflowState};
use gmp_workflow::{TransitionRequest, WorkflowEngine};
use proptest::prelude::*;

/// (actor index, target index, attach signature, add summary edit)
type Step = (usize, usize, bool, bool);

fn steps() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec((0usize..64, 0usize..64, any::<bool>(), any::<bool>()), 1..48)
}

fn unix(at: DateTime<Utc>) -> u64 {
    u64::try_from(at.timestamp()).unwrap()
}

/// Replays `steps` against `record`, checking every attempt; returns
/// (final record, successful transitions)
fn replay<R>(mut record: R, steps: &[Step]) -> Result<(R, usize), TestCaseError>
where
    R: WorkflowRecord,
    R::Status: HasRuleTable,
{
    let gate = ESignatureGate::generate();
    let engine = WorkflowEngine::new(gate.verifying_key());
    let actors: Vec<Actor> = all_actors();
    let states = R::Status::all();
    let mut applied = 0;

    for &(who, target, sign, fill) in steps {
        let actor = &actors[who % actors.len()];
        let to = states[target % states.len()];

        let mut request = TransitionRequest::new();
        if fill {
            request = request.with_edit(
                RecordField::InvestigationSummary,
                "Checked and documented",
            );
        }
        if sign {
            let binding = WorkflowEngine::binding_for(&record, to, actor);
            let token = gate
                .confirm_at(actor, &secret(actor.id.as_str()), None, binding, unix(t0()))
                .unwrap();
            request = request.with_token(token);
        }

        let before = record.clone();
        match engine.apply_transition_at(&record, to, actor, request, t0()) {
            Ok(next) => {
                prop_assert_eq!(next.meta().trail().len(), before.meta().trail().len() + 1);
                prop_assert_eq!(next.status(), to);
                record = next;
                applied += 1;
            }
            Err(_) => prop_assert_eq!(&record, &before),
        }
        prop_assert!(record.meta().trail_is_consistent());
    }
    Ok((record, applied))
}

fn check_trail<R: WorkflowRecord>(record: &R, applied: usize) -> Result<(), TestCaseError> {
    prop_assert_eq!(record.meta().trail().len(), applied);
    if let Some(last) = record.meta().last_entry() {
        prop_assert_eq!(last.to, record.status());
    } else {
        prop_assert_eq!(record.status(), <R::Status as WorkflowState>::INITIAL);
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_deviation_trail_counts_successes(steps in steps()) {
        let (record, applied) = replay(deviation("dev-p"), &steps)?;
        check_trail(&record, applied)?;
    }

    #[test]
    fn prop_purchase_order_trail_counts_successes(steps in steps()) {
        let (record, applied) = replay(purchase_order("po-p"), &steps)?;
        check_trail(&record, applied)?;
    }

    #[test]
    fn prop_certificate_trail_counts_successes(steps in steps()) {
        let (record, applied) = replay(certificate("coa-p"), &steps)?;
        check_trail(&record, applied)?;
    }

    #[test]
    fn prop_unsigned_attempts_never_pass_signed_rules(steps in steps()) {
        let unsigned: Vec<Step> = steps.into_iter().map(|(a, t, _, f)| (a, t, false, f)).collect();
        let (record, _) = replay(purchase_order("po-u"), &unsigned)?;
        for entry in record.meta().trail() {
            prop_assert!(!entry.signed);
        }
    }
}
