use gmp_types::{
    ActorId, Credential, CredentialHash, Deviation, DeviationStatus, RecordField, Role, RoleSet,
    TransitionStamp, WorkflowRecord,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn any_roles() -> impl Strategy<Value = Vec<Role>> {
    prop::collection::vec(prop::sample::select(Role::ALL.to_vec()), 0..12)
}

proptest! {
    #[test]
    fn prop_role_set_behaves_like_a_set(a in any_roles(), b in any_roles()) {
        let (sa, sb) = (RoleSet::of(&a), RoleSet::of(&b));
        let (ma, mb): (BTreeSet<Role>, BTreeSet<Role>) =
            (a.iter().copied().collect(), b.iter().copied().collect());

        prop_assert_eq!(sa.len(), ma.len());
        prop_assert_eq!(
            sa.union(sb).iter().collect::<BTreeSet<_>>(),
            ma.union(&mb).copied().collect::<BTreeSet<_>>()
        );
        prop_assert_eq!(
            sa.intersection(sb).iter().collect::<BTreeSet<_>>(),
            ma.intersection(&mb).copied().collect::<BTreeSet<_>>()
        );
        for role in Role::ALL {
            prop_assert_eq!(sa.contains(role), ma.contains(&role));
        }
    }

    #[test]
    fn prop_credential_accepts_only_its_secret(secret in "[ -~]{1,32}", other in "[ -~]{1,32}") {
        let hash = CredentialHash::derive(&Credential::new(secret.clone()));
        prop_assert!(hash.verify(&Credential::new(secret.clone())));
        prop_assert_eq!(hash.verify(&Credential::new(other.clone())), secret == other);
    }
}

#[test]
fn test_unassigned_fields_read_as_none() {
    let dev = Deviation::open("dev-1", "plant-1", "u2", chrono::Utc::now(), "Broken seal");
    assert_eq!(dev.read_field(RecordField::AssignedTo).unwrap(), None);
    assert!(dev.read_field(RecordField::FinanceApprovedBy).is_err());
}

#[test]
fn test_deviation_json_keeps_trail_and_labels() {
    let mut dev = Deviation::open("dev-1", "plant-1", "u2", chrono::Utc::now(), "Broken seal")
        .assigned_to("u1");
    dev.meta.advance(
        DeviationStatus::Investigation,
        TransitionStamp {
            step: "Start Investigation".into(),
            actor_id: ActorId::new("u1"),
            role: Role::QaOperator,
            at: dev.meta.created_at,
            comment: None,
            signed: false,
        },
    );
    let json = serde_json::to_value(&dev).unwrap();
    assert_eq!(json["status"], "Investigation");
    assert_eq!(json["approval_trail"][0]["role"], "QA Operator");
    let back: Deviation = serde_json::from_value(json).unwrap();
    assert_eq!(back, dev);
}
