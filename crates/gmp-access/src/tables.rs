//! Rule tables for the three governed record types

use crate::rules::{FieldMutation, Guard, TransitionRule, TransitionTable};
use gmp_types::{CoaStatus, DeviationStatus, PoStatus, RecordField, Role, RoleSet, WorkflowState};

/// Status enumerations that own a rule table
pub trait HasRuleTable: WorkflowState {
    /// The process-wide table for this record type
    fn table() -> &'static TransitionTable<Self>;
}

const DEV_INVESTIGATORS: RoleSet = RoleSet::of(&[Role::QaOperator, Role::QcOperator]);
const DEV_MANAGERS: RoleSet = RoleSet::of(&[Role::QaManager, Role::QcManager]);
const DEV_HEADS: RoleSet = RoleSet::of(&[Role::QaHead, Role::QcHead]);

const MANAGER_REVIEW: &[FieldMutation] =
    &[FieldMutation::StampActor(RecordField::ManagerReviewedBy)];
const HEAD_DECISION: &[FieldMutation] = &[FieldMutation::StampActor(RecordField::ApprovedBy)];

static DEVIATION_RULES: &[TransitionRule<DeviationStatus>] = &[
    TransitionRule::new(
        DeviationStatus::Open,
        DeviationStatus::Investigation,
        DEV_INVESTIGATORS.union(DEV_MANAGERS).union(DEV_HEADS),
        "Start Investigation",
    )
    .mutating(&[
        FieldMutation::Writable(RecordField::AssignedTo),
        FieldMutation::DefaultToActor(RecordField::AssignedTo),
    ]),
    TransitionRule::new(
        DeviationStatus::Investigation,
        DeviationStatus::PendingManagerReview,
        DEV_INVESTIGATORS,
        "Submit for Manager Review",
    )
    .mutating(&[
        FieldMutation::Writable(RecordField::InvestigationSummary),
        FieldMutation::Writable(RecordField::RootCause),
        FieldMutation::Writable(RecordField::Capa),
    ])
    .guarded(&[
        Guard::AssigneeOnly(RecordField::AssignedTo),
        Guard::RequiresField(RecordField::InvestigationSummary),
    ]),
    TransitionRule::new(
        DeviationStatus::PendingManagerReview,
        DeviationStatus::PendingFinalApproval,
        DEV_MANAGERS,
        "Approve & Submit to Head",
    )
    .signed()
    .mutating(MANAGER_REVIEW),
    TransitionRule::new(
        DeviationStatus::PendingManagerReview,
        DeviationStatus::Investigation,
        DEV_MANAGERS,
        "Request Revision",
    ),
    TransitionRule::new(
        DeviationStatus::PendingManagerReview,
        DeviationStatus::Rejected,
        DEV_MANAGERS,
        "Reject Deviation",
    )
    .signed()
    .mutating(MANAGER_REVIEW),
    TransitionRule::new(
        DeviationStatus::PendingFinalApproval,
        DeviationStatus::Closed,
        DEV_HEADS,
        "Approve & Close Deviation",
    )
    .signed()
    .mutating(HEAD_DECISION),
    TransitionRule::new(
        DeviationStatus::PendingFinalApproval,
        DeviationStatus::Investigation,
        DEV_HEADS,
        "Request Revision",
    ),
    TransitionRule::new(
        DeviationStatus::PendingFinalApproval,
        DeviationStatus::Rejected,
        DEV_HEADS,
        "Reject Deviation",
    )
    .signed()
    .mutating(HEAD_DECISION),
];

/// Deviation lifecycle
pub static DEVIATION_TABLE: TransitionTable<DeviationStatus> =
    TransitionTable::new(DEVIATION_RULES, &[DeviationStatus::Closed, DeviationStatus::Rejected]);

const PROCUREMENT: RoleSet = RoleSet::of(&[Role::ProcurementOfficer]);
const FINANCE: RoleSet = RoleSet::of(&[Role::FinanceOfficer]);
const MANAGEMENT: RoleSet = RoleSet::of(&[Role::Management]);
const WAREHOUSE: RoleSet = RoleSet::of(&[Role::WarehouseManager]);

const FINANCE_DECISION: &[FieldMutation] = &[
    FieldMutation::StampActor(RecordField::FinanceApprovedBy),
    FieldMutation::StampTime(RecordField::FinanceApprovedOn),
];
const MANAGEMENT_DECISION: &[FieldMutation] = &[
    FieldMutation::StampActor(RecordField::ManagementApprovedBy),
    FieldMutation::StampTime(RecordField::ManagementApprovedOn),
];
const RECEIPT: &[FieldMutation] = &[
    FieldMutation::StampActor(RecordField::ReceivedBy),
    FieldMutation::StampTime(RecordField::DateReceived),
];

static PURCHASE_ORDER_RULES: &[TransitionRule<PoStatus>] = &[
    TransitionRule::new(
        PoStatus::Draft,
        PoStatus::PendingFinanceApproval,
        PROCUREMENT,
        "Submit for Approval",
    )
    .mutating(&[FieldMutation::Writable(RecordField::JustificationNotes)]),
    TransitionRule::new(
        PoStatus::PendingFinanceApproval,
        PoStatus::PendingManagementApproval,
        FINANCE,
        "Approve",
    )
    .signed()
    .mutating(FINANCE_DECISION),
    TransitionRule::new(PoStatus::PendingFinanceApproval, PoStatus::Rejected, FINANCE, "Reject")
        .signed()
        .mutating(FINANCE_DECISION),
    TransitionRule::new(
        PoStatus::PendingManagementApproval,
        PoStatus::Approved,
        MANAGEMENT,
        "Approve",
    )
    .signed()
    .mutating(MANAGEMENT_DECISION),
    TransitionRule::new(
        PoStatus::PendingManagementApproval,
        PoStatus::Rejected,
        MANAGEMENT,
        "Reject",
    )
    .signed()
    .mutating(MANAGEMENT_DECISION),
    TransitionRule::new(PoStatus::Approved, PoStatus::Sent, PROCUREMENT, "Send to Supplier"),
    TransitionRule::new(PoStatus::Sent, PoStatus::Received, WAREHOUSE, "Mark as Received")
        .mutating(RECEIPT),
    TransitionRule::new(
        PoStatus::Sent,
        PoStatus::PartiallyReceived,
        WAREHOUSE,
        "Mark as Partially Received",
    )
    .mutating(RECEIPT),
    TransitionRule::new(PoStatus::Sent, PoStatus::Rejected, WAREHOUSE, "Reject Delivery")
        .mutating(RECEIPT),
    TransitionRule::new(
        PoStatus::PartiallyReceived,
        PoStatus::Received,
        WAREHOUSE,
        "Mark as Received",
    )
    .mutating(RECEIPT),
];

/// Purchase order lifecycle
pub static PURCHASE_ORDER_TABLE: TransitionTable<PoStatus> =
    TransitionTable::new(PURCHASE_ORDER_RULES, &[PoStatus::Received, PoStatus::Rejected]);

const QC_OPERATOR: RoleSet = RoleSet::of(&[Role::QcOperator]);
const QC_MANAGER: RoleSet = RoleSet::of(&[Role::QcManager]);
const QC_HEAD: RoleSet = RoleSet::of(&[Role::QcHead]);

const QC_REVIEW: &[FieldMutation] = &[FieldMutation::StampActor(RecordField::ReviewedBy)];

static COA_RULES: &[TransitionRule<CoaStatus>] = &[
    TransitionRule::new(
        CoaStatus::Draft,
        CoaStatus::PendingManagerReview,
        QC_OPERATOR,
        "Submit for Review",
    )
    .mutating(&[FieldMutation::StampActor(RecordField::PreparedBy)]),
    TransitionRule::new(
        CoaStatus::PendingManagerReview,
        CoaStatus::PendingHeadApproval,
        QC_MANAGER,
        "Approve & Submit to Head",
    )
    .mutating(QC_REVIEW),
    TransitionRule::new(
        CoaStatus::PendingManagerReview,
        CoaStatus::Rejected,
        QC_MANAGER,
        "Reject COA",
    )
        .mutating(QC_REVIEW),
    TransitionRule::new(
        CoaStatus::PendingHeadApproval,
        CoaStatus::Released,
        QC_HEAD,
        "Final Approve with E-signature",
    )
    .signed()
    .mutating(&[
        FieldMutation::StampActor(RecordField::ApprovedBy),
        FieldMutation::StampTime(RecordField::ReleaseDate),
    ]),
    TransitionRule::new(CoaStatus::PendingHeadApproval, CoaStatus::Rejected, QC_HEAD, "Reject COA")
        .signed()
        .mutating(HEAD_DECISION),
];

/// Certificate of analysis lifecycle
pub static COA_TABLE: TransitionTable<CoaStatus> =
    TransitionTable::new(COA_RULES, &[CoaStatus::Released, CoaStatus::Rejected]);

impl HasRuleTable for DeviationStatus {
    fn table() -> &'static TransitionTable<Self> {
        &DEVIATION_TABLE
    }
}

impl HasRuleTable for PoStatus {
    fn table() -> &'static TransitionTable<Self> {
        &PURCHASE_ORDER_TABLE
    }
}

impl HasRuleTable for CoaStatus {
    fn table() -> &'static TransitionTable<Self> {
        &COA_TABLE
    }
}
