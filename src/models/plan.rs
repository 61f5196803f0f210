//! Plan and response models
//!
//! The engine's output (`TaperPlan`) and the JSON boundary shape
//! (`TaperResponse`) handed to the web layer and CLI.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::combination::SlotDose;
use super::step::TaperStep;

/// A schedule step together with its per-slot tablet plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepPlan {
    pub step: TaperStep,
    pub slots: Vec<SlotDose>,
}

/// The full generated plan, before artifact rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaperPlan {
    /// Starting dose converted to diazepam, in mg
    pub reference_dose_mg: f64,
    pub steps: Vec<StepPlan>,
    /// Total calendar span of the schedule in days
    pub total_days: u32,
    /// Per-step warnings (unreachable sub-doses, rounding residue)
    pub warnings: Vec<String>,
}

/// One pharmacy order line for a dosing phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PharmacyOrder {
    /// Phase start, e.g. "July 15 2025"
    pub date: String,
    pub date_range: String,
    /// e.g. "Diazepam 10 mg tablet"
    pub product: String,
    /// Directions for use, e.g. "Sig: Take 2 tablets by mouth in the morning"
    pub sig: String,
    /// Dispense text, e.g. "Disp: 42 tablets for 21 days"
    pub dispense: String,
    /// Tablets dispensed by this order
    pub quantity: u32,
    pub strength_mg: f64,
}

/// Response shape serialized as JSON by the web boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaperResponse {
    pub warn: Option<String>,
    pub patient_instructions: Vec<String>,
    pub ehr_summary: String,
    pub pharmacy_orders: Vec<PharmacyOrder>,
    /// Tablet totals keyed by formatted strength, e.g. "10" -> 63
    pub pill_totals: BTreeMap<String, u32>,
    pub reference_dose_mg: f64,
    pub total_days: u32,
}
