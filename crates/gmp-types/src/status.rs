//! Record types and their status enumerations

use crate::error::ParseError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// The three workflow-governed record kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// Quality deviation report
    Deviation,
    /// Purchase order
    PurchaseOrder,
    /// Certificate of analysis issued by the QC lab
    CertificateOfAnalysis,
}

impl RecordType {
    /// Every record type
    pub const ALL: [RecordType; 3] = [
        RecordType::Deviation,
        RecordType::PurchaseOrder,
        RecordType::CertificateOfAnalysis,
    ];

    /// Stable lowercase name, used for audit entries and transport paths
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RecordType::Deviation => "deviation",
            RecordType::PurchaseOrder => "purchase_order",
            RecordType::CertificateOfAnalysis => "certificate_of_analysis",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "deviation" | "dev" => Ok(RecordType::Deviation),
            "purchase_order" | "purchaseorder" | "po" => Ok(RecordType::PurchaseOrder),
            "certificate_of_analysis" | "certificateofanalysis" | "coa" => {
                Ok(RecordType::CertificateOfAnalysis)
            }
            _ => Err(ParseError::UnknownRecordType(s.to_string())),
        }
    }
}

/// A per-record-type status enumeration
///
/// Implemented only by the closed enums below; the rule tables and the
/// engine are generic over it.
pub trait WorkflowState:
    Copy
    + Eq
    + Hash
    + Ord
    + fmt::Debug
    + fmt::Display
    + FromStr<Err = ParseError>
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Record type this status set belongs to
    const RECORD_TYPE: RecordType;

    /// Status every new record starts in
    const INITIAL: Self;

    /// Every status, in lifecycle order
    fn all() -> &'static [Self];

    /// Display name, as rendered in status badges
    fn as_str(self) -> &'static str;
}

macro_rules! status_enum {
    (
        $(#[$doc:meta])*
        $name:ident for $record:ident, initial $initial:ident {
            $( $(#[$vdoc:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vdoc])*
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl WorkflowState for $name {
            const RECORD_TYPE: RecordType = RecordType::$record;
            const INITIAL: Self = $name::$initial;

            fn all() -> &'static [Self] {
                &[$($name::$variant),+]
            }

            fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(WorkflowState::as_str(*self))
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                <$name as WorkflowState>::all()
                    .iter()
                    .copied()
                    .find(|st| {
                        let label = WorkflowState::as_str(*st);
                        label.eq_ignore_ascii_case(wanted)
                            || label.replace(' ', "_").eq_ignore_ascii_case(wanted)
                    })
                    .ok_or_else(|| ParseError::UnknownStatus {
                        record_type: RecordType::$record,
                        value: s.to_string(),
                    })
            }
        }
    };
}

status_enum! {
    /// Lifecycle of a deviation report
    DeviationStatus for Deviation, initial Open {
        /// Reported, not yet picked up
        Open => "Open",
        /// Under investigation by the assignee
        Investigation => "Investigation",
        /// Investigation submitted, awaiting manager review
        PendingManagerReview => "Pending Manager Review",
        /// Reviewed, awaiting head-level approval
        PendingFinalApproval => "Pending Final Approval",
        /// Approved and closed
        Closed => "Closed",
        /// Rejected during review or approval
        Rejected => "Rejected",
    }
}

status_enum! {
    /// Lifecycle of a purchase order
    PoStatus for PurchaseOrder, initial Draft {
        /// Being prepared by procurement
        Draft => "Draft",
        /// Awaiting finance sign-off
        PendingFinanceApproval => "Pending Finance Approval",
        /// Awaiting management sign-off
        PendingManagementApproval => "Pending Management Approval",
        /// Fully approved, not yet sent to the vendor
        Approved => "Approved",
        /// Sent to the vendor
        Sent => "Sent",
        /// Goods partly received at the warehouse
        PartiallyReceived => "Partially Received",
        /// Goods fully received
        Received => "Received",
        /// Rejected at approval or on receipt
        Rejected => "Rejected",
    }
}

status_enum! {
    /// Lifecycle of a certificate of analysis
    CoaStatus for CertificateOfAnalysis, initial Draft {
        /// Being prepared by the analyst
        Draft => "Draft",
        /// Awaiting QC manager review
        PendingManagerReview => "Pending Manager Review",
        /// Awaiting QC head approval
        PendingHeadApproval => "Pending Head Approval",
        /// Released for use
        Released => "Released",
        /// Rejected during review
        Rejected => "Rejected",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_round_trip() {
        for st in DeviationStatus::all() {
            assert_eq!(st.as_str().parse::<DeviationStatus>().unwrap(), *st);
        }
        for st in PoStatus::all() {
            assert_eq!(st.to_string().parse::<PoStatus>().unwrap(), *st);
        }
        for st in CoaStatus::all() {
            assert_eq!(st.to_string().parse::<CoaStatus>().unwrap(), *st);
        }
    }

    #[test]
    fn status_accepts_snake_case() {
        assert_eq!(
            "pending_final_approval".parse::<DeviationStatus>().unwrap(),
            DeviationStatus::PendingFinalApproval
        );
    }

    #[test]
    fn unknown_status_names_record_type() {
        let err = "Shipped".parse::<CoaStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown certificate_of_analysis status: Shipped");
    }

    #[test]
    fn initial_states() {
        assert_eq!(DeviationStatus::INITIAL, DeviationStatus::Open);
        assert_eq!(PoStatus::INITIAL, PoStatus::Draft);
        assert_eq!(CoaStatus::INITIAL, CoaStatus::Draft);
    }

    #[test]
    fn record_type_aliases() {
        assert_eq!("po".parse::<RecordType>().unwrap(), RecordType::PurchaseOrder);
        assert_eq!("CoA".parse::<RecordType>().unwrap(), RecordType::CertificateOfAnalysis);
        assert_eq!("Purchase Order".parse::<RecordType>().unwrap(), RecordType::PurchaseOrder);
        assert!("invoice".parse::<RecordType>().is_err());
    }

    #[test]
    fn serde_uses_display_labels() {
        let json = serde_json::to_string(&PoStatus::PartiallyReceived).unwrap();
        assert_eq!(json, r#""Partially Received""#);
    }
}
