//! Static navigation table
//!
//! One entry per screen of the shell, grouped by the section it is listed
//! under. Order is significant: `visible_navigation` preserves it.

use gmp_types::{Role, RoleSet};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Sidebar section an entry is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavSection {
    /// Entries every role sees
    Global,
    /// Production floor screens
    ProductionOperator,
    /// Production management screens
    ProductionManager,
    /// Production oversight screens
    ProductionHead,
    /// QA head console
    QaHead,
    /// QA manager screens
    QaManager,
    /// QA operator workbench
    QaOperator,
    /// Warehouse screens
    Warehouse,
    /// Procurement screens
    Procurement,
    /// System administration
    Admin,
    /// Corporate management
    Management,
    /// Plant head console
    PlantHead,
    /// QC head console
    QcHead,
    /// QC manager screens
    QcManager,
    /// QC analyst screens
    QcOperator,
}

/// Icon hint for the rendering collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Icon {
    Admin,
    Audit,
    BatchReview,
    Capa,
    ChangeControl,
    Coa,
    Dashboard,
    DocDigitize,
    Document,
    Em,
    Escalation,
    Finance,
    FinishedGoods,
    Help,
    Indent,
    Maintenance,
    MarketComplaint,
    Notification,
    Plants,
    PreRelease,
    Production,
    Projects,
    PurchaseOrder,
    Qa,
    Qc,
    Quote,
    Release,
    Reports,
    Safety,
    ScmOverview,
    Shift,
    Stability,
    Task,
    UserManagement,
    Vendor,
    Warehouse,
    Workforce,
}

/// A role-gated menu item mapping to a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigationEntry {
    /// Sidebar section
    pub section: NavSection,
    /// Stable view key
    pub key: &'static str,
    /// Label shown in the menu
    pub display_name: &'static str,
    /// Icon hint
    pub icon: Icon,
    /// Roles allowed to open the view
    pub allowed_roles: RoleSet,
}

impl NavigationEntry {
    /// True when `role` may open this entry
    #[inline]
    #[must_use]
    pub const fn allows(&self, role: Role) -> bool {
        self.allowed_roles.contains(role)
    }
}

const fn nav(
    section: NavSection,
    key: &'static str,
    display_name: &'static str,
    icon: Icon,
    allowed_roles: RoleSet,
) -> NavigationEntry {
    NavigationEntry {
        section,
        key,
        display_name,
        icon,
        allowed_roles,
    }
}

/// Every navigation entry, in display order
#[rustfmt::skip]
pub static NAVIGATION: &[NavigationEntry] = &[
    nav(NavSection::Global, "dashboard", "Dashboard", Icon::Dashboard, RoleSet::ALL),
    nav(NavSection::Global, "myTasks", "My Tasks", Icon::Task, RoleSet::ALL),
    nav(NavSection::ProductionOperator, "myBatches", "My Batches", Icon::Production, RoleSet::of(&[Role::ProductionOperator])),
    nav(NavSection::ProductionOperator, "batchExecutionWorkspace", "Batch Execution", Icon::BatchReview, RoleSet::of(&[Role::ProductionOperator])),
    nav(NavSection::ProductionOperator, "prodMaterialIssue", "Material Issue", Icon::ScmOverview, RoleSet::of(&[Role::ProductionOperator])),
    nav(NavSection::ProductionOperator, "prodSamplingQC", "Sampling & QC", Icon::Qc, RoleSet::of(&[Role::ProductionOperator])),
    nav(NavSection::ProductionOperator, "prodReportDeviation", "Report Deviation", Icon::Safety, RoleSet::of(&[Role::ProductionOperator])),
    nav(NavSection::ProductionOperator, "prodEquipmentLogs", "Equipment Logs", Icon::Maintenance, RoleSet::of(&[Role::ProductionOperator])),
    nav(NavSection::ProductionOperator, "prodOfficierChecklists", "Checklists", Icon::Task, RoleSet::of(&[Role::ProductionOperator])),
    nav(NavSection::ProductionOperator, "prodDocAccessOfficer", "Document Access", Icon::Document, RoleSet::of(&[Role::ProductionOperator])),
    nav(NavSection::ProductionOperator, "prodOfficerNotifications", "Notifications", Icon::Notification, RoleSet::of(&[Role::ProductionOperator])),
    nav(NavSection::ProductionOperator, "prodAuditTrailOfficer", "My Audit Trail", Icon::Audit, RoleSet::of(&[Role::ProductionOperator])),
    nav(NavSection::ProductionManager, "batchControlPanel", "Batch Execution Control", Icon::Production, RoleSet::of(&[Role::ProductionManager])),
    nav(NavSection::ProductionManager, "stageTracking", "Stage/Operation Tracking", Icon::BatchReview, RoleSet::of(&[Role::ProductionManager])),
    nav(NavSection::ProductionManager, "shiftScheduling", "Shift Scheduling", Icon::Shift, RoleSet::of(&[Role::ProductionManager])),
    nav(NavSection::ProductionManager, "prodMaterialRequests", "Material & Variance", Icon::ScmOverview, RoleSet::of(&[Role::ProductionManager])),
    nav(NavSection::ProductionManager, "prodEventManager", "Deviation Management", Icon::Safety, RoleSet::of(&[Role::ProductionManager])),
    nav(NavSection::ProductionManager, "lineReadiness", "Equipment & Line Readiness", Icon::Maintenance, RoleSet::of(&[Role::ProductionManager])),
    nav(NavSection::ProductionManager, "prodInterDeptActions", "Inter-department Actions", Icon::Escalation, RoleSet::of(&[Role::ProductionManager])),
    nav(NavSection::ProductionManager, "prodDocsChecklists", "Documents & Checklists", Icon::Document, RoleSet::of(&[Role::ProductionManager])),
    nav(NavSection::ProductionManager, "prodTeamCompetency", "Team Competency", Icon::Workforce, RoleSet::of(&[Role::ProductionManager])),
    nav(NavSection::ProductionManager, "prodReportsManager", "Manager Reports", Icon::Reports, RoleSet::of(&[Role::ProductionManager])),
    nav(NavSection::ProductionManager, "prodAuditTrailManager", "Manager Audit Trail", Icon::Audit, RoleSet::of(&[Role::ProductionManager])),
    nav(NavSection::ProductionHead, "batchOversight", "Batch Oversight", Icon::Production, RoleSet::of(&[Role::ProductionHead])),
    nav(NavSection::ProductionHead, "stageProgress", "Stage Progress", Icon::BatchReview, RoleSet::of(&[Role::ProductionHead])),
    nav(NavSection::ProductionHead, "lineEquipment", "Line & Equipment", Icon::Maintenance, RoleSet::of(&[Role::ProductionHead])),
    nav(NavSection::ProductionHead, "shiftManagement", "Shift Management", Icon::Shift, RoleSet::of(&[Role::ProductionHead])),
    nav(NavSection::ProductionHead, "materialYield", "Material & Yield", Icon::ScmOverview, RoleSet::of(&[Role::ProductionHead])),
    nav(NavSection::ProductionHead, "prodDeviationCenter", "Deviation Center", Icon::Safety, RoleSet::of(&[Role::ProductionHead])),
    nav(NavSection::ProductionHead, "environmentMonitor", "Environment Monitoring", Icon::Em, RoleSet::of(&[Role::ProductionHead])),
    nav(NavSection::ProductionHead, "interDeptComm", "Inter-Dept Comm.", Icon::Escalation, RoleSet::of(&[Role::ProductionHead])),
    nav(NavSection::ProductionHead, "prodDocuments", "Production Documents", Icon::Document, RoleSet::of(&[Role::ProductionHead])),
    nav(NavSection::ProductionHead, "prodWorkforce", "Workforce", Icon::Workforce, RoleSet::of(&[Role::ProductionHead])),
    nav(NavSection::ProductionHead, "prodAnalytics", "Manufacturing Analytics", Icon::Reports, RoleSet::of(&[Role::ProductionHead])),
    nav(NavSection::ProductionHead, "prodAuditTrail", "Audit Trail", Icon::Audit, RoleSet::of(&[Role::ProductionHead])),
    nav(NavSection::QaHead, "qaApprovals", "Approvals", Icon::PreRelease, RoleSet::of(&[Role::QaHead])),
    nav(NavSection::QaHead, "qaRelease", "Release Console", Icon::Release, RoleSet::of(&[Role::QaHead])),
    nav(NavSection::QaHead, "batchReview", "Batch Review", Icon::BatchReview, RoleSet::of(&[Role::QaHead, Role::QaManager])),
    nav(NavSection::QaHead, "deviations", "Deviations", Icon::Safety, RoleSet::of(&[Role::QaHead, Role::QaManager, Role::QaOperator])),
    nav(NavSection::QaHead, "changeControl", "Change Control", Icon::ChangeControl, RoleSet::of(&[Role::QaHead, Role::QaManager])),
    nav(NavSection::QaHead, "capa", "CAPA", Icon::Capa, RoleSet::of(&[Role::QaHead, Role::QaManager])),
    nav(NavSection::QaHead, "documentControl", "Document Control", Icon::Document, RoleSet::of(&[Role::QaHead, Role::QaManager])),
    nav(NavSection::QaHead, "stability", "Stability Studies", Icon::Stability, RoleSet::of(&[Role::QaHead, Role::QaManager])),
    nav(NavSection::QaHead, "marketComplaints", "Market Complaints", Icon::MarketComplaint, RoleSet::of(&[Role::QaHead])),
    nav(NavSection::QaHead, "audits", "Audits", Icon::Audit, RoleSet::of(&[Role::QaHead])),
    nav(NavSection::QaHead, "training", "Training", Icon::Workforce, RoleSet::of(&[Role::QaHead, Role::QaManager])),
    nav(NavSection::QaHead, "em", "EM", Icon::Em, RoleSet::of(&[Role::QaHead, Role::QaManager])),
    nav(NavSection::QaHead, "qaReports", "Reports", Icon::Reports, RoleSet::of(&[Role::QaHead, Role::QaManager])),
    nav(NavSection::QaHead, "qaSettings", "Settings", Icon::Admin, RoleSet::of(&[Role::QaHead])),
    nav(NavSection::QaManager, "preReleaseReview", "Pre-Release Review", Icon::PreRelease, RoleSet::of(&[Role::QaManager])),
    nav(NavSection::QaManager, "docDigitization", "Doc Digitization", Icon::DocDigitize, RoleSet::of(&[Role::QaManager])),
    nav(NavSection::QaOperator, "labWorkbench", "Lab Workbench", Icon::Qc, RoleSet::of(&[Role::QaOperator])),
    nav(NavSection::QaOperator, "inProcessInspections", "In-Process Inspections", Icon::BatchReview, RoleSet::of(&[Role::QaOperator])),
    nav(NavSection::QaOperator, "em_officer", "EM", Icon::Em, RoleSet::of(&[Role::QaOperator])),
    nav(NavSection::QaOperator, "capaTasks", "CAPA Tasks", Icon::Capa, RoleSet::of(&[Role::QaOperator])),
    nav(NavSection::QaOperator, "sampleManagement", "Sample Management", Icon::Qc, RoleSet::of(&[Role::QaOperator])),
    nav(NavSection::QaOperator, "docDigitizationUploader", "Doc Digitization", Icon::DocDigitize, RoleSet::of(&[Role::QaOperator])),
    nav(NavSection::QaOperator, "sopsMethods", "SOPs & Methods", Icon::Document, RoleSet::of(&[Role::QaOperator])),
    nav(NavSection::QaOperator, "training_officer", "My Training", Icon::Workforce, RoleSet::of(&[Role::QaOperator])),
    nav(NavSection::QaOperator, "notifications", "Notifications", Icon::Notification, RoleSet::of(&[Role::QaOperator])),
    nav(NavSection::QaOperator, "auditTrail", "My Audit Trail", Icon::Audit, RoleSet::of(&[Role::QaOperator])),
    nav(NavSection::QaOperator, "help", "Help", Icon::Help, RoleSet::of(&[Role::QaOperator])),
    nav(NavSection::Warehouse, "inbound", "Inbound (GRN & Receiving)", Icon::Warehouse, RoleSet::of(&[Role::WarehouseManager])),
    nav(NavSection::Warehouse, "warehouseQCCoordination", "QC Coordination", Icon::Qc, RoleSet::of(&[Role::WarehouseManager])),
    nav(NavSection::Warehouse, "inventoryMgmt", "Inventory Management", Icon::ScmOverview, RoleSet::of(&[Role::WarehouseManager])),
    nav(NavSection::Warehouse, "binBatchMgmt", "Batch & Bin Management", Icon::BatchReview, RoleSet::of(&[Role::WarehouseManager])),
    nav(NavSection::Warehouse, "materialIssuance", "Material Issuance", Icon::Indent, RoleSet::of(&[Role::WarehouseManager])),
    nav(NavSection::Warehouse, "dispatchMgmt", "Dispatch Management", Icon::FinishedGoods, RoleSet::of(&[Role::WarehouseManager])),
    nav(NavSection::Warehouse, "returnHandling", "Return Handling", Icon::Vendor, RoleSet::of(&[Role::WarehouseManager])),
    nav(NavSection::Warehouse, "stockAdjustment", "Stock Adjustments", Icon::ChangeControl, RoleSet::of(&[Role::WarehouseManager])),
    nav(NavSection::Warehouse, "cycleCounts", "Cycle Counts / Audits", Icon::Task, RoleSet::of(&[Role::WarehouseManager])),
    nav(NavSection::Warehouse, "warehouseComplianceDocs", "Compliance Docs", Icon::Document, RoleSet::of(&[Role::WarehouseManager])),
    nav(NavSection::Warehouse, "warehouseCrossDept", "Cross-Department Tasks", Icon::Escalation, RoleSet::of(&[Role::WarehouseManager])),
    nav(NavSection::Warehouse, "warehouseNotifications", "Notifications", Icon::Notification, RoleSet::of(&[Role::WarehouseManager])),
    nav(NavSection::Warehouse, "warehouseAuditTrail", "Audit Trail", Icon::Audit, RoleSet::of(&[Role::WarehouseManager])),
    nav(NavSection::Procurement, "prManagement", "PR Management", Icon::Indent, RoleSet::of(&[Role::ProcurementOfficer])),
    nav(NavSection::Procurement, "quotationManagement", "Quotation Management", Icon::Quote, RoleSet::of(&[Role::ProcurementOfficer])),
    nav(NavSection::Procurement, "poTracking", "PO Tracking", Icon::PurchaseOrder, RoleSet::of(&[Role::ProcurementOfficer])),
    nav(NavSection::Procurement, "vendorManagementOfficer", "Vendor Management", Icon::Vendor, RoleSet::of(&[Role::ProcurementOfficer])),
    nav(NavSection::Procurement, "deliveryTracking", "Delivery Tracking", Icon::Shift, RoleSet::of(&[Role::ProcurementOfficer])),
    nav(NavSection::Procurement, "grnCoordination", "GRN Coordination", Icon::Warehouse, RoleSet::of(&[Role::ProcurementOfficer])),
    nav(NavSection::Procurement, "qcInspection", "QC Inspection", Icon::Qc, RoleSet::of(&[Role::ProcurementOfficer])),
    nav(NavSection::Procurement, "invoiceSupport", "Invoice Support", Icon::Finance, RoleSet::of(&[Role::ProcurementOfficer])),
    nav(NavSection::Procurement, "expediteRequests", "Expedite Requests", Icon::Escalation, RoleSet::of(&[Role::ProcurementOfficer])),
    nav(NavSection::Procurement, "rateAgreements", "Rate Agreements", Icon::Document, RoleSet::of(&[Role::ProcurementOfficer])),
    nav(NavSection::Procurement, "procNotifications", "Notifications", Icon::Notification, RoleSet::of(&[Role::ProcurementOfficer])),
    nav(NavSection::Procurement, "procAuditTrail", "My Audit Trail", Icon::Audit, RoleSet::of(&[Role::ProcurementOfficer])),
    nav(NavSection::Admin, "userManagement", "User Management", Icon::UserManagement, RoleSet::of(&[Role::SystemAdmin])),
    nav(NavSection::Management, "plants", "Plants", Icon::Plants, RoleSet::of(&[Role::Management])),
    nav(NavSection::Management, "quality", "Quality", Icon::Qa, RoleSet::of(&[Role::Management])),
    nav(NavSection::Management, "finance", "Finance", Icon::Finance, RoleSet::of(&[Role::Management])),
    nav(NavSection::Management, "projects", "Projects", Icon::Projects, RoleSet::of(&[Role::Management])),
    nav(NavSection::Management, "scmOverview", "SCM Overview", Icon::ScmOverview, RoleSet::of(&[Role::Management])),
    nav(NavSection::Management, "reports", "Reports", Icon::Reports, RoleSet::of(&[Role::Management])),
    nav(NavSection::PlantHead, "plantApprovals", "Approvals", Icon::Task, RoleSet::of(&[Role::PlantHead])),
    nav(NavSection::PlantHead, "plantProduction", "Production", Icon::Production, RoleSet::of(&[Role::PlantHead])),
    nav(NavSection::PlantHead, "plantQuality", "Quality", Icon::Qa, RoleSet::of(&[Role::PlantHead])),
    nav(NavSection::PlantHead, "plantSCM", "Supply Chain", Icon::ScmOverview, RoleSet::of(&[Role::PlantHead])),
    nav(NavSection::PlantHead, "plantWarehouse", "Warehouse", Icon::Warehouse, RoleSet::of(&[Role::PlantHead])),
    nav(NavSection::PlantHead, "plantMaintenance", "Maintenance", Icon::Maintenance, RoleSet::of(&[Role::PlantHead])),
    nav(NavSection::PlantHead, "plantSafety", "Safety / EHS", Icon::Safety, RoleSet::of(&[Role::PlantHead])),
    nav(NavSection::PlantHead, "plantWorkforce", "Workforce", Icon::Workforce, RoleSet::of(&[Role::PlantHead])),
    nav(NavSection::PlantHead, "plantCompliance", "Compliance", Icon::Document, RoleSet::of(&[Role::PlantHead])),
    nav(NavSection::PlantHead, "plantProjects", "Projects & CAPEX", Icon::Projects, RoleSet::of(&[Role::PlantHead])),
    nav(NavSection::PlantHead, "plantBatchReports", "Batch Reports", Icon::Reports, RoleSet::of(&[Role::PlantHead])),
    nav(NavSection::PlantHead, "plantAuditTrails", "Audit Trails", Icon::Audit, RoleSet::of(&[Role::PlantHead])),
    nav(NavSection::PlantHead, "plantAdmin", "Admin", Icon::Admin, RoleSet::of(&[Role::PlantHead])),
    nav(NavSection::QcHead, "sampleOversight", "Sample Oversight", Icon::Qc, RoleSet::of(&[Role::QcHead])),
    nav(NavSection::QcHead, "testOversight", "Test Oversight", Icon::BatchReview, RoleSet::of(&[Role::QcHead])),
    nav(NavSection::QcHead, "coaApprovalCenter", "COA Approval Center", Icon::Coa, RoleSet::of(&[Role::QcHead])),
    nav(NavSection::QcHead, "investigationCenter", "Investigation Center", Icon::Safety, RoleSet::of(&[Role::QcHead])),
    nav(NavSection::QcHead, "stabilityOversight", "Stability Oversight", Icon::Stability, RoleSet::of(&[Role::QcHead])),
    nav(NavSection::QcHead, "instrumentControl", "Instrument Control", Icon::Maintenance, RoleSet::of(&[Role::QcHead])),
    nav(NavSection::QcHead, "standardsControl", "Standards Control", Icon::Warehouse, RoleSet::of(&[Role::QcHead])),
    nav(NavSection::QcHead, "documentControlHead", "Document Control", Icon::Document, RoleSet::of(&[Role::QcHead])),
    nav(NavSection::QcHead, "interDeptEscalations", "Inter-Dept. Escalations", Icon::Escalation, RoleSet::of(&[Role::QcHead])),
    nav(NavSection::QcHead, "qcWorkforce", "QC Workforce", Icon::Workforce, RoleSet::of(&[Role::QcHead])),
    nav(NavSection::QcHead, "qcResourcePlanning", "Resource Planning", Icon::Task, RoleSet::of(&[Role::QcHead])),
    nav(NavSection::QcHead, "qcAnalytics", "Analytics & KPIs", Icon::Reports, RoleSet::of(&[Role::QcHead])),
    nav(NavSection::QcHead, "auditTrailsHead", "Audit Trails", Icon::Audit, RoleSet::of(&[Role::QcHead])),
    nav(NavSection::QcManager, "qcSampleMgmtManager", "Sample Management", Icon::Qc, RoleSet::of(&[Role::QcManager])),
    nav(NavSection::QcManager, "qcTestReview", "Test Review & Approval", Icon::PreRelease, RoleSet::of(&[Role::QcManager])),
    nav(NavSection::QcManager, "qcAssignmentCenter", "Assignment Center", Icon::Task, RoleSet::of(&[Role::QcManager])),
    nav(NavSection::QcManager, "qcInstrumentsManager", "Instruments & Calibration", Icon::Maintenance, RoleSet::of(&[Role::QcManager])),
    nav(NavSection::QcManager, "qcStabilityManager", "Stability Management", Icon::Stability, RoleSet::of(&[Role::QcManager])),
    nav(NavSection::QcManager, "qcStandardsManager", "Standards & Reagents", Icon::Warehouse, RoleSet::of(&[Role::QcManager])),
    nav(NavSection::QcManager, "qcInvestigationsManager", "Investigations", Icon::Safety, RoleSet::of(&[Role::QcManager])),
    nav(NavSection::QcManager, "qcDocumentsManager", "Documents", Icon::Document, RoleSet::of(&[Role::QcManager])),
    nav(NavSection::QcManager, "qcTeamMatrixManager", "Team & Training", Icon::Workforce, RoleSet::of(&[Role::QcManager])),
    nav(NavSection::QcManager, "qcPlanningManager", "QC Planning & Scheduling", Icon::Task, RoleSet::of(&[Role::QcManager])),
    nav(NavSection::QcManager, "qcReportsManager", "Reports & Analytics", Icon::Reports, RoleSet::of(&[Role::QcManager])),
    nav(NavSection::QcManager, "qcAuditTrailsManager", "Audit Trails", Icon::Audit, RoleSet::of(&[Role::QcManager])),
    nav(NavSection::QcOperator, "sampleAssignment", "Sample Assignment", Icon::Qc, RoleSet::of(&[Role::QcOperator])),
    nav(NavSection::QcOperator, "testingBench", "Testing Bench", Icon::Production, RoleSet::of(&[Role::QcOperator])),
    nav(NavSection::QcOperator, "resultEntry", "Result Entry", Icon::DocDigitize, RoleSet::of(&[Role::QcOperator])),
    nav(NavSection::QcOperator, "instrumentsQC", "Instruments", Icon::Maintenance, RoleSet::of(&[Role::QcOperator])),
    nav(NavSection::QcOperator, "stabilityTasks", "Stability Tasks", Icon::Stability, RoleSet::of(&[Role::QcOperator])),
    nav(NavSection::QcOperator, "standardsReagents", "Standards & Reagents", Icon::Warehouse, RoleSet::of(&[Role::QcOperator])),
    nav(NavSection::QcOperator, "documentAccessQC", "Document Access", Icon::Document, RoleSet::of(&[Role::QcOperator])),
    nav(NavSection::QcOperator, "deviationsQC", "Deviations / OOS", Icon::Safety, RoleSet::of(&[Role::QcOperator])),
    nav(NavSection::QcOperator, "trainingMatrixQC", "Training Matrix", Icon::Workforce, RoleSet::of(&[Role::QcOperator])),
    nav(NavSection::QcOperator, "myAuditLogQC", "My Audit Log", Icon::Audit, RoleSet::of(&[Role::QcOperator])),
];

static BY_KEY: Lazy<HashMap<&'static str, &'static NavigationEntry>> =
    Lazy::new(|| NAVIGATION.iter().map(|e| (e.key, e)).collect());

/// Look up an entry by view key
#[must_use]
pub fn entry(key: &str) -> Option<&'static NavigationEntry> {
    BY_KEY.get(key).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_are_unique() {
        let keys: HashSet<_> = NAVIGATION.iter().map(|e| e.key).collect();
        assert_eq!(keys.len(), NAVIGATION.len());
    }

    #[test]
    fn global_entries_lead_and_allow_everyone() {
        assert_eq!(NAVIGATION[0].key, "dashboard");
        assert_eq!(NAVIGATION[1].key, "myTasks");
        for role in Role::ALL {
            assert!(NAVIGATION[0].allows(role));
            assert!(NAVIGATION[1].allows(role));
        }
    }

    #[test]
    fn sections_are_contiguous() {
        let mut seen = Vec::new();
        for e in NAVIGATION {
            if seen.last() != Some(&e.section) {
                assert!(!seen.contains(&e.section), "section {:?} split", e.section);
                seen.push(e.section);
            }
        }
    }

    #[test]
    fn no_entry_is_unreachable() {
        assert!(NAVIGATION.iter().all(|e| !e.allowed_roles.is_empty()));
    }

    #[test]
    fn lookup_by_key() {
        let e = entry("coaApprovalCenter").unwrap();
        assert_eq!(e.display_name, "COA Approval Center");
        assert!(e.allows(Role::QcHead));
        assert!(!e.allows(Role::QcManager));
        assert!(entry("nope").is_none());
    }

    #[test]
    fn shared_qa_entries() {
        let deviations = entry("deviations").unwrap();
        assert_eq!(
            deviations.allowed_roles,
            RoleSet::of(&[Role::QaHead, Role::QaManager, Role::QaOperator])
        );
    }
}
