//! Data models
//!
//! Rust structs and enums for taper requests, schedule steps, tablet
//! combinations and generated plans.

mod combination;
mod plan;
mod request;
mod step;

pub use combination::{DoseCombination, SlotDose, TabletCount, TimeSlot};
pub use plan::{PharmacyOrder, StepPlan, TaperPlan, TaperResponse};
pub use request::{DosingFrequency, FinalHold, Medication, TaperRequest, TaperSpeed};
pub use step::TaperStep;
