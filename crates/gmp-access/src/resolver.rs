//! Permission resolver
//!
//! Pure lookups over the static navigation and rule tables. Nothing here
//! fails: a missing rule or an unknown role is an ordinary "no".

use crate::navigation::{self, NavigationEntry, NAVIGATION};
use crate::rules::{TransitionRule, TransitionTable};
use crate::tables::{HasRuleTable, COA_TABLE, DEVIATION_TABLE, PURCHASE_ORDER_TABLE};
use gmp_types::{RecordType, Role, WorkflowState};

/// Stateless facade over the navigation and transition tables
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionResolver;

impl PermissionResolver {
    /// Create a resolver
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Entries `role` may open, in configured order
    #[must_use]
    pub fn visible_navigation(&self, role: Role) -> Vec<&'static NavigationEntry> {
        NAVIGATION.iter().filter(|e| e.allows(role)).collect()
    }

    /// Same as `visible_navigation` for a role given by name; an unknown name
    /// yields an empty shell
    #[must_use]
    pub fn visible_navigation_by_name(&self, role: &str) -> Vec<&'static NavigationEntry> {
        role.parse::<Role>()
            .map(|r| self.visible_navigation(r))
            .unwrap_or_default()
    }

    /// True when `role` may open the view `key`
    #[must_use]
    pub fn can_navigate(&self, role: Role, key: &str) -> bool {
        navigation::entry(key).is_some_and(|e| e.allows(role))
    }

    /// True iff a rule exists for `from -> to` and `role` may fire it
    #[must_use]
    pub fn can_transition<S: HasRuleTable>(&self, from: S, to: S, role: Role) -> bool {
        self.rule(from, to).is_some_and(|r| r.allows(role))
    }

    /// `can_transition` over display strings; unknown names give `false`
    #[must_use]
    pub fn can_transition_by_name(
        &self,
        record_type: RecordType,
        from: &str,
        to: &str,
        role: &str,
    ) -> bool {
        let Ok(role) = role.parse::<Role>() else {
            return false;
        };
        match record_type {
            RecordType::Deviation => check_named(&DEVIATION_TABLE, from, to, role),
            RecordType::PurchaseOrder => check_named(&PURCHASE_ORDER_TABLE, from, to, role),
            RecordType::CertificateOfAnalysis => check_named(&COA_TABLE, from, to, role),
        }
    }

    /// The rule for an exact edge, whoever asks
    #[must_use]
    pub fn rule<S: HasRuleTable>(&self, from: S, to: S) -> Option<&'static TransitionRule<S>> {
        S::table().find(from, to)
    }

    /// Rules `role` may fire from `from`, in table order
    #[must_use]
    pub fn available_transitions<S: HasRuleTable>(
        &self,
        from: S,
        role: Role,
    ) -> Vec<&'static TransitionRule<S>> {
        S::table().outbound(from).filter(|r| r.allows(role)).collect()
    }
}

fn check_named<S: WorkflowState>(
    table: &TransitionTable<S>,
    from: &str,
    to: &str,
    role: Role,
) -> bool {
    match (from.parse::<S>(), to.parse::<S>()) {
        (Ok(from), Ok(to)) => table.find(from, to).is_some_and(|r| r.allows(role)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gmp_types::{CoaStatus, DeviationStatus, PoStatus};
    use pretty_assertions::assert_eq;

    #[test]
    fn roles_without_screens_get_global_entries_only() {
        let keys: Vec<_> = PermissionResolver::new()
            .visible_navigation(Role::FinanceOfficer)
            .iter()
            .map(|e| e.key)
            .collect();
        assert_eq!(keys, vec!["dashboard", "myTasks"]);
    }

    #[test]
    fn unknown_role_name_yields_empty_shell() {
        assert!(PermissionResolver::new()
            .visible_navigation_by_name("Chief Alchemist")
            .is_empty());
    }

    #[test]
    fn navigation_by_name_matches_typed() {
        let resolver = PermissionResolver::new();
        assert_eq!(
            resolver.visible_navigation_by_name("QC Head"),
            resolver.visible_navigation(Role::QcHead)
        );
    }

    #[test]
    fn can_navigate_checks_role() {
        let resolver = PermissionResolver::new();
        assert!(resolver.can_navigate(Role::SystemAdmin, "userManagement"));
        assert!(!resolver.can_navigate(Role::QaHead, "userManagement"));
        assert!(!resolver.can_navigate(Role::QaHead, "missingView"));
    }

    #[test]
    fn typed_transition_checks() {
        let resolver = PermissionResolver::new();
        assert!(resolver.can_transition(
            DeviationStatus::PendingManagerReview,
            DeviationStatus::PendingFinalApproval,
            Role::QaManager
        ));
        assert!(!resolver.can_transition(
            DeviationStatus::PendingManagerReview,
            DeviationStatus::PendingFinalApproval,
            Role::QaOperator
        ));
        assert!(!resolver.can_transition(
            PoStatus::Draft,
            PoStatus::Approved,
            Role::ProcurementOfficer,
        ));
        assert!(!resolver.can_transition(
            CoaStatus::PendingHeadApproval,
            CoaStatus::Released,
            Role::WarehouseManager
        ));
    }

    #[test]
    fn named_transition_checks() {
        let resolver = PermissionResolver::new();
        assert!(resolver.can_transition_by_name(
            RecordType::PurchaseOrder,
            "Pending Finance Approval",
            "Pending Management Approval",
            "Finance Officer"
        ));
        assert!(!resolver.can_transition_by_name(
            RecordType::PurchaseOrder,
            "Draft",
            "Shipped",
            "Procurement Officer",
        ));
        assert!(!resolver.can_transition_by_name(
            RecordType::Deviation,
            "Open",
            "Investigation",
            "Janitor",
        ));
    }

    #[test]
    fn available_transitions_for_manager() {
        let labels: Vec<_> = PermissionResolver::new()
            .available_transitions(DeviationStatus::PendingManagerReview, Role::QcManager)
            .iter()
            .map(|r| r.to)
            .collect();
        assert_eq!(
            labels,
            vec![
                DeviationStatus::PendingFinalApproval,
                DeviationStatus::Investigation,
                DeviationStatus::Rejected
            ]
        );
        assert!(PermissionResolver::new()
            .available_transitions(DeviationStatus::Closed, Role::QaHead)
            .is_empty());
    }
}
