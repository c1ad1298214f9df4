//! Closed role and department enumerations
//!
//! Every navigation entry and transition rule is keyed by `Role`; there is no
//! string branching on role names anywhere past the parsing boundary.

use crate::error::ParseError;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Organisational department an actor belongs to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Department {
    /// Quality Assurance
    #[serde(rename = "Quality Assurance")]
    QualityAssurance,
    /// Quality Control laboratory
    #[serde(rename = "Quality Control")]
    QualityControl,
    /// Procurement and warehousing
    #[serde(rename = "Supply Chain Management")]
    SupplyChain,
    /// Manufacturing floor
    Production,
    /// Plant and system administration
    Administration,
    /// Sales
    Sales,
    /// Corporate leadership
    Corporate,
    /// Finance
    Finance,
    /// Site security
    Security,
}

impl Department {
    /// Every department, in declaration order
    pub const ALL: [Department; 9] = [
        Department::QualityAssurance,
        Department::QualityControl,
        Department::SupplyChain,
        Department::Production,
        Department::Administration,
        Department::Sales,
        Department::Corporate,
        Department::Finance,
        Department::Security,
    ];

    /// Human-readable department name
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Department::QualityAssurance => "Quality Assurance",
            Department::QualityControl => "Quality Control",
            Department::SupplyChain => "Supply Chain Management",
            Department::Production => "Production",
            Department::Administration => "Administration",
            Department::Sales => "Sales",
            Department::Corporate => "Corporate",
            Department::Finance => "Finance",
            Department::Security => "Security",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Department {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Department::ALL
            .into_iter()
            .find(|d| d.display_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::UnknownDepartment(s.to_string()))
    }
}

/// Job role of an actor; drives every authorization decision
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[repr(u8)]
pub enum Role {
    /// Head of production
    #[serde(rename = "Production Head")]
    ProductionHead,
    /// Production shift manager
    #[serde(rename = "Production Manager")]
    ProductionManager,
    /// Production floor operator
    #[serde(rename = "Production Operator")]
    ProductionOperator,
    /// Head of quality assurance
    #[serde(rename = "QA Head")]
    QaHead,
    /// Quality assurance manager
    #[serde(rename = "QA Manager")]
    QaManager,
    /// Quality assurance operator
    #[serde(rename = "QA Operator")]
    QaOperator,
    /// Head of the QC laboratory
    #[serde(rename = "QC Head")]
    QcHead,
    /// QC laboratory manager
    #[serde(rename = "QC Manager")]
    QcManager,
    /// QC analyst
    #[serde(rename = "QC Operator")]
    QcOperator,
    /// Procurement officer
    #[serde(rename = "Procurement Officer")]
    ProcurementOfficer,
    /// Warehouse manager
    #[serde(rename = "Warehouse Manager")]
    WarehouseManager,
    /// Finance officer
    #[serde(rename = "Finance Officer")]
    FinanceOfficer,
    /// System administrator
    #[serde(rename = "System Admin")]
    SystemAdmin,
    /// Plant head
    #[serde(rename = "Plant Head")]
    PlantHead,
    /// Corporate management
    Management,
    /// Security officer
    #[serde(rename = "Security Officer")]
    SecurityOfficer,
    /// Sales person
    #[serde(rename = "Sales Person")]
    SalesPerson,
}

impl Role {
    /// Number of roles in the enumeration
    pub const COUNT: usize = 17;

    /// Every role, in declaration order
    pub const ALL: [Role; Role::COUNT] = [
        Role::ProductionHead,
        Role::ProductionManager,
        Role::ProductionOperator,
        Role::QaHead,
        Role::QaManager,
        Role::QaOperator,
        Role::QcHead,
        Role::QcManager,
        Role::QcOperator,
        Role::ProcurementOfficer,
        Role::WarehouseManager,
        Role::FinanceOfficer,
        Role::SystemAdmin,
        Role::PlantHead,
        Role::Management,
        Role::SecurityOfficer,
        Role::SalesPerson,
    ];

    /// Human-readable role name, as shown in the navigation shell
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Role::ProductionHead => "Production Head",
            Role::ProductionManager => "Production Manager",
            Role::ProductionOperator => "Production Operator",
            Role::QaHead => "QA Head",
            Role::QaManager => "QA Manager",
            Role::QaOperator => "QA Operator",
            Role::QcHead => "QC Head",
            Role::QcManager => "QC Manager",
            Role::QcOperator => "QC Operator",
            Role::ProcurementOfficer => "Procurement Officer",
            Role::WarehouseManager => "Warehouse Manager",
            Role::FinanceOfficer => "Finance Officer",
            Role::SystemAdmin => "System Admin",
            Role::PlantHead => "Plant Head",
            Role::Management => "Management",
            Role::SecurityOfficer => "Security Officer",
            Role::SalesPerson => "Sales Person",
        }
    }

    /// Department the role belongs to
    #[must_use]
    pub const fn department(self) -> Department {
        match self {
            Role::ProductionHead | Role::ProductionManager | Role::ProductionOperator => {
                Department::Production
            }
            Role::QaHead | Role::QaManager | Role::QaOperator => Department::QualityAssurance,
            Role::QcHead | Role::QcManager | Role::QcOperator => Department::QualityControl,
            Role::ProcurementOfficer | Role::WarehouseManager => Department::SupplyChain,
            Role::FinanceOfficer => Department::Finance,
            Role::SystemAdmin | Role::PlantHead => Department::Administration,
            Role::Management => Department::Corporate,
            Role::SecurityOfficer => Department::Security,
            Role::SalesPerson => Department::Sales,
        }
    }

    #[inline]
    const fn bit(self) -> u32 {
        1 << self as u32
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Role {
    type Err = ParseError;

    /// Accepts the display name ("QA Head") case-insensitively, or the
    /// snake form used in config files ("qa_head")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Role::ALL
            .into_iter()
            .find(|r| {
                let name = r.display_name();
                name.eq_ignore_ascii_case(wanted)
                    || name.replace(' ', "_").eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| ParseError::UnknownRole(s.to_string()))
    }
}

/// Compact set of roles
///
/// Stored as a bitmask so the static navigation and rule tables can be built
/// in `const` context.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RoleSet(u32);

impl RoleSet {
    /// No role at all
    pub const EMPTY: RoleSet = RoleSet(0);

    /// Every role of the enumeration
    pub const ALL: RoleSet = RoleSet((1 << Role::COUNT) - 1);

    /// Build a set from a slice of roles
    #[must_use]
    pub const fn of(roles: &[Role]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < roles.len() {
            bits |= roles[i].bit();
            i += 1;
        }
        Self(bits)
    }

    /// Membership test
    #[inline]
    #[must_use]
    pub const fn contains(self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    /// Union of two sets
    #[inline]
    #[must_use]
    pub const fn union(self, other: RoleSet) -> Self {
        Self(self.0 | other.0)
    }

    /// Intersection of two sets
    #[inline]
    #[must_use]
    pub const fn intersection(self, other: RoleSet) -> Self {
        Self(self.0 & other.0)
    }

    /// True when no role is present
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of roles in the set
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate members in declaration order
    pub fn iter(self) -> impl Iterator<Item = Role> {
        Role::ALL.into_iter().filter(move |r| self.contains(*r))
    }
}

impl fmt::Debug for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        iter.into_iter()
            .fold(RoleSet::EMPTY, |acc, r| acc.union(RoleSet(r.bit())))
    }
}

impl Serialize for RoleSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for RoleSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let roles = Vec::<Role>::deserialize(deserializer)?;
        Ok(roles.into_iter().collect())
    }
}
