//! Transition rule model and table validation

use crate::error::TableError;
use gmp_types::{RecordField, Role, RoleSet, WorkflowRecord, WorkflowState};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};

/// What a transition does to a named record field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "field", rename_all = "snake_case")]
pub enum FieldMutation {
    /// The caller may edit the field while firing the transition
    Writable(RecordField),
    /// Set to the acting account when still empty after caller edits
    DefaultToActor(RecordField),
    /// Overwritten with the acting account
    StampActor(RecordField),
    /// Overwritten with the commit time
    StampTime(RecordField),
}

impl FieldMutation {
    /// Field this mutation touches
    #[inline]
    #[must_use]
    pub const fn field(self) -> RecordField {
        match self {
            FieldMutation::Writable(f)
            | FieldMutation::DefaultToActor(f)
            | FieldMutation::StampActor(f)
            | FieldMutation::StampTime(f) => f,
        }
    }
}

/// Precondition on the record beyond the actor's role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "field", rename_all = "snake_case")]
pub enum Guard {
    /// Only the account named in this field may fire the transition
    AssigneeOnly(RecordField),
    /// The field must be non-blank once caller edits are applied
    RequiresField(RecordField),
}

impl Guard {
    /// Field this guard reads
    #[inline]
    #[must_use]
    pub const fn field(self) -> RecordField {
        match self {
            Guard::AssigneeOnly(f) | Guard::RequiresField(f) => f,
        }
    }
}

/// One permitted edge of a record type's status machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(bound = "S: WorkflowState")]
pub struct TransitionRule<S: 'static> {
    /// Source status
    pub from: S,
    /// Target status
    pub to: S,
    /// Roles allowed to fire the edge
    pub allowed_roles: RoleSet,
    /// Whether a fresh e-signature must confirm the edge
    pub requires_esign: bool,
    /// Field effects applied on commit
    pub mutations: &'static [FieldMutation],
    /// Extra preconditions
    pub guards: &'static [Guard],
    /// Action label, as shown on the button
    pub label: &'static str,
}

impl<S: WorkflowState> TransitionRule<S> {
    /// Edge without e-signature, mutations or guards
    #[must_use]
    pub const fn new(from: S, to: S, allowed_roles: RoleSet, label: &'static str) -> Self {
        Self {
            from,
            to,
            allowed_roles,
            requires_esign: false,
            mutations: &[],
            guards: &[],
            label,
        }
    }

    /// Require an e-signature
    #[must_use]
    pub const fn signed(mut self) -> Self {
        self.requires_esign = true;
        self
    }

    /// Attach field mutations
    #[must_use]
    pub const fn mutating(mut self, mutations: &'static [FieldMutation]) -> Self {
        self.mutations = mutations;
        self
    }

    /// Attach guards
    #[must_use]
    pub const fn guarded(mut self, guards: &'static [Guard]) -> Self {
        self.guards = guards;
        self
    }

    /// True when `role` may fire the edge
    #[inline]
    #[must_use]
    pub fn allows(&self, role: Role) -> bool {
        self.allowed_roles.contains(role)
    }

    /// True when the caller may edit `field` during this transition
    #[must_use]
    pub fn is_writable(&self, field: RecordField) -> bool {
        self.mutations
            .iter()
            .any(|m| matches!(m, FieldMutation::Writable(f) if *f == field))
    }
}

/// Complete edge set of one record type
#[derive(Debug)]
pub struct TransitionTable<S: 'static> {
    rules: &'static [TransitionRule<S>],
    terminal: &'static [S],
}

impl<S: WorkflowState> TransitionTable<S> {
    /// Table over a static rule list
    #[must_use]
    pub const fn new(rules: &'static [TransitionRule<S>], terminal: &'static [S]) -> Self {
        Self { rules, terminal }
    }

    /// Every rule, in declaration order
    #[inline]
    #[must_use]
    pub fn rules(&self) -> &'static [TransitionRule<S>] {
        self.rules
    }

    /// States with no way out
    #[inline]
    #[must_use]
    pub fn terminal_states(&self) -> &'static [S] {
        self.terminal
    }

    /// True for an absorbing state
    #[must_use]
    pub fn is_terminal(&self, state: S) -> bool {
        self.terminal.contains(&state)
    }

    /// The rule for an exact edge
    #[must_use]
    pub fn find(&self, from: S, to: S) -> Option<&'static TransitionRule<S>> {
        self.rules.iter().find(|r| r.from == from && r.to == to)
    }

    /// All edges leaving `from`
    pub fn outbound(&self, from: S) -> impl Iterator<Item = &'static TransitionRule<S>> {
        self.rules.iter().filter(move |r| r.from == from)
    }

    /// Structural checks: unique edges, absorbing terminal states,
    /// every state reachable from the initial one, no empty role set
    pub fn validate(&self) -> Result<(), TableError> {
        let mut edges = HashSet::new();
        for rule in self.rules {
            if !edges.insert((rule.from, rule.to)) {
                return Err(TableError::DuplicateEdge {
                    record_type: S::RECORD_TYPE,
                    from: rule.from.as_str(),
                    to: rule.to.as_str(),
                });
            }
            if rule.allowed_roles.is_empty() {
                return Err(TableError::NoRoles {
                    record_type: S::RECORD_TYPE,
                    from: rule.from.as_str(),
                    to: rule.to.as_str(),
                });
            }
            if self.is_terminal(rule.from) {
                return Err(TableError::TerminalHasExit {
                    record_type: S::RECORD_TYPE,
                    state: rule.from.as_str(),
                });
            }
        }

        let mut reached = HashSet::from([S::INITIAL]);
        let mut queue = VecDeque::from([S::INITIAL]);
        while let Some(state) = queue.pop_front() {
            for rule in self.outbound(state) {
                if reached.insert(rule.to) {
                    queue.push_back(rule.to);
                }
            }
        }
        if let Some(lost) = S::all().iter().find(|s| !reached.contains(*s)) {
            return Err(TableError::Unreachable {
                record_type: S::RECORD_TYPE,
                state: lost.as_str(),
            });
        }
        Ok(())
    }

    /// `validate` plus a check that every mutated or guarded field exists on `R`
    pub fn validate_for<R>(&self) -> Result<(), TableError>
    where
        R: WorkflowRecord<Status = S>,
    {
        self.validate()?;
        let fields = R::fields();
        for rule in self.rules {
            let touched = rule
                .mutations
                .iter()
                .map(|m| m.field())
                .chain(rule.guards.iter().map(|g| g.field()));
            for field in touched {
                if !fields.contains(&field) {
                    return Err(TableError::ForeignField {
                        record_type: S::RECORD_TYPE,
                        from: rule.from.as_str(),
                        to: rule.to.as_str(),
                        field,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gmp_types::CoaStatus;

    static LOOP: &[TransitionRule<CoaStatus>] = &[
        TransitionRule::new(
            CoaStatus::Draft,
            CoaStatus::PendingManagerReview,
            RoleSet::of(&[Role::QcOperator]),
            "Submit",
        ),
        TransitionRule::new(
            CoaStatus::Draft,
            CoaStatus::PendingManagerReview,
            RoleSet::of(&[Role::QcManager]),
            "Submit again",
        ),
    ];

    static DEAD_END: &[TransitionRule<CoaStatus>] = &[TransitionRule::new(
        CoaStatus::Draft,
        CoaStatus::Rejected,
        RoleSet::of(&[Role::QcOperator]),
        "Withdraw",
    )];

    static EMPTY_ROLES: &[TransitionRule<CoaStatus>] = &[TransitionRule::new(
        CoaStatus::Draft,
        CoaStatus::Rejected,
        RoleSet::EMPTY,
        "Nobody",
    )];

    static FROM_TERMINAL: &[TransitionRule<CoaStatus>] = &[TransitionRule::new(
        CoaStatus::Rejected,
        CoaStatus::Draft,
        RoleSet::of(&[Role::QcHead]),
        "Reopen",
    )];

    #[test]
    fn duplicate_edge_is_reported() {
        let table = TransitionTable::new(LOOP, &[]);
        assert!(matches!(table.validate(), Err(TableError::DuplicateEdge { .. })));
    }

    #[test]
    fn unreachable_state_is_reported() {
        let table = TransitionTable::new(DEAD_END, &[CoaStatus::Rejected]);
        let err = table.validate().unwrap_err();
        assert!(matches!(err, TableError::Unreachable { state: "Pending Manager Review", .. }));
    }

    #[test]
    fn empty_role_set_is_reported() {
        let table = TransitionTable::new(EMPTY_ROLES, &[]);
        assert!(matches!(table.validate(), Err(TableError::NoRoles { .. })));
    }

    #[test]
    fn exit_from_terminal_is_reported() {
        let table = TransitionTable::new(FROM_TERMINAL, &[CoaStatus::Rejected]);
        assert!(matches!(table.validate(), Err(TableError::TerminalHasExit { .. })));
    }

    #[test]
    fn builder_flags() {
        const RULE: TransitionRule<CoaStatus> = TransitionRule::new(
            CoaStatus::PendingHeadApproval,
            CoaStatus::Released,
            RoleSet::of(&[Role::QcHead]),
            "Release",
        )
        .signed()
        .mutating(&[FieldMutation::StampActor(RecordField::ApprovedBy)]);
        assert!(RULE.requires_esign);
        assert!(RULE.allows(Role::QcHead));
        assert!(!RULE.is_writable(RecordField::ApprovedBy));
    }
}
