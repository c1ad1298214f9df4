//! Testing utilities for the GMP workspace
//!
//! Shared actors, records and a scripted signature pad.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use gmp_esign::{SignatureAttempt, SignaturePad, SignaturePrompt};
use gmp_types::{Actor, CertificateOfAnalysis, Credential, Deviation, PurchaseOrder, Role, Unit};
use parking_lot::Mutex;

pub const PLANT: &str = "plant-1";
pub const OTHER_PLANT: &str = "plant-2";

/// Fixed clock for deterministic trails
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 8, 30, 0)
        .single()
        .unwrap_or_default()
}

/// Each fixture account's secret is derived from its id
pub fn secret(id: &str) -> Credential {
    Credential::new(format!("{id}-pass"))
}

pub fn actor(id: &str, name: &str, role: Role) -> Actor {
    Actor::new(id, name, role, &secret(id))
        .with_email(format!("{id}@plant.test"))
        .with_plant(PLANT)
}

pub fn qa_operator() -> Actor {
    actor("u1", "Ravi Kumar", Role::QaOperator)
}

pub fn qa_manager() -> Actor {
    actor("u2", "Anita Desai", Role::QaManager)
}

pub fn qa_head() -> Actor {
    actor("u3", "Vikram Rao", Role::QaHead)
}

pub fn qc_operator() -> Actor {
    actor("u4", "Sunita Iyer", Role::QcOperator)
}

pub fn qc_manager() -> Actor {
    actor("u5", "Arjun Mehta", Role::QcManager)
}

pub fn qc_head() -> Actor {
    actor("u6", "Kavya Nair", Role::QcHead)
}

pub fn procurement_officer() -> Actor {
    actor("u7", "Meera Shah", Role::ProcurementOfficer)
}

pub fn finance_officer() -> Actor {
    actor("u8", "Rahul Gupta", Role::FinanceOfficer)
}

/// Corporate account without a home plant
pub fn management() -> Actor {
    Actor::new("u9", "Priya Menon", Role::Management, &secret("u9")).with_email("u9@plant.test")
}

pub fn warehouse_manager() -> Actor {
    actor("u10", "Deepak Singh", Role::WarehouseManager)
}

pub fn all_actors() -> Vec<Actor> {
    vec![
        qa_operator(),
        qa_manager(),
        qa_head(),
        qc_operator(),
        qc_manager(),
        qc_head(),
        procurement_officer(),
        finance_officer(),
        management(),
        warehouse_manager(),
    ]
}

/// Open deviation assigned to the QA operator
pub fn deviation(id: &str) -> Deviation {
    Deviation::open(id, PLANT, "u2", t0(), "Temperature excursion in cold room 2")
        .with_batch("B-2024-117")
        .assigned_to("u1")
}

pub fn purchase_order(id: &str) -> PurchaseOrder {
    PurchaseOrder::draft(id, PLANT, "u7", t0(), "PO-2024-0042")
        .with_line("Microcrystalline cellulose", 250.0, Unit::Kilogram)
        .with_vendor("v-17", 4_375.0)
}

pub fn certificate(id: &str) -> CertificateOfAnalysis {
    CertificateOfAnalysis::draft(id, PLANT, "u4", t0(), "B-2024-117", "Paracetamol 500 mg")
}

/// Signature pad replaying canned answers; `None` cancels
#[derive(Debug, Default)]
pub struct ScriptedPad {
    answers: Mutex<Vec<Option<SignatureAttempt>>>,
    prompts: Mutex<Vec<SignaturePrompt>>,
}

impl ScriptedPad {
    pub fn new(mut answers: Vec<Option<SignatureAttempt>>) -> Self {
        answers.reverse();
        Self {
            answers: Mutex::new(answers),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Enter each secret in turn
    pub fn entering<I, S>(secrets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            secrets
                .into_iter()
                .map(|s| {
                    Some(SignatureAttempt {
                        credential: Credential::new(s),
                        reason: None,
                    })
                })
                .collect(),
        )
    }

    /// Cancel at the first prompt
    pub fn cancelling() -> Self {
        Self::new(vec![None])
    }

    /// Every prompt shown so far
    pub fn prompts(&self) -> Vec<SignaturePrompt> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl SignaturePad for ScriptedPad {
    async fn prompt(&self, prompt: &SignaturePrompt) -> Option<SignatureAttempt> {
        self.prompts.lock().push(prompt.clone());
        self.answers.lock().pop().flatten()
    }
}
