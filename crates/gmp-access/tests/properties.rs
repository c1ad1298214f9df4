use gmp_access::{HasRuleTable, PermissionResolver, NAVIGATION};
use gmp_types::{CoaStatus, DeviationStatus, PoStatus, Role, WorkflowState};
use proptest::prelude::*;

fn any_role() -> impl Strategy<Value = Role> {
    prop::sample::select(Role::ALL.to_vec())
}

fn any_state<S: WorkflowState>() -> impl Strategy<Value = S> {
    prop::sample::select(S::all().to_vec())
}

fn at_most_one_rule<S: HasRuleTable>(from: S, to: S) -> bool {
    S::table()
        .rules()
        .iter()
        .filter(|r| r.from == from && r.to == to)
        .count()
        <= 1
}

fn available_matches_can_transition<S: HasRuleTable>(from: S, role: Role) -> bool {
    let resolver = PermissionResolver::new();
    let available = resolver.available_transitions(from, role);
    S::all().iter().all(|to| {
        let listed = available.iter().any(|r| r.to == *to);
        listed == resolver.can_transition(from, *to, role)
    })
}

proptest! {
    #[test]
    fn prop_each_edge_has_at_most_one_rule(
        dev in (any_state::<DeviationStatus>(), any_state::<DeviationStatus>()),
        po in (any_state::<PoStatus>(), any_state::<PoStatus>()),
        coa in (any_state::<CoaStatus>(), any_state::<CoaStatus>()),
    ) {
        prop_assert!(at_most_one_rule(dev.0, dev.1));
        prop_assert!(at_most_one_rule(po.0, po.1));
        prop_assert!(at_most_one_rule(coa.0, coa.1));
    }

    #[test]
    fn prop_navigation_is_ordered_subset(role in any_role()) {
        let resolver = PermissionResolver::new();
        let first = resolver.visible_navigation(role);
        let second = resolver.visible_navigation(role);
        prop_assert_eq!(&first, &second);

        // Subsequence of the full table: positions strictly increase
        let mut last = None;
        for entry in &first {
            let pos = NAVIGATION.iter().position(|e| e.key == entry.key);
            prop_assert!(pos.is_some());
            prop_assert!(last < pos);
            last = pos;
            prop_assert!(entry.allowed_roles.contains(role));
        }
    }

    #[test]
    fn prop_available_transitions_agree_with_can_transition(
        role in any_role(),
        dev in any_state::<DeviationStatus>(),
        po in any_state::<PoStatus>(),
        coa in any_state::<CoaStatus>(),
    ) {
        prop_assert!(available_matches_can_transition(dev, role));
        prop_assert!(available_matches_can_transition(po, role));
        prop_assert!(available_matches_can_transition(coa, role));
    }

    #[test]
    fn prop_terminal_states_are_absorbing(role in any_role(), to in any_state::<PoStatus>()) {
        let resolver = PermissionResolver::new();
        prop_assert!(!resolver.can_transition(PoStatus::Received, to, role));
        prop_assert!(!resolver.can_transition(PoStatus::Rejected, to, role));
    }
}

#[test]
fn test_every_role_sees_global_entries() {
    let resolver = PermissionResolver::new();
    for role in Role::ALL {
        let nav = resolver.visible_navigation(role);
        assert!(nav.len() >= 2, "{role} lost the global entries");
        assert_eq!(nav[0].key, "dashboard");
    }
}

#[test]
fn test_builtin_tables_validate() {
    gmp_access::validate_all().unwrap();
}
