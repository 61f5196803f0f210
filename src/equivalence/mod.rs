//! Medication equivalence
//!
//! Fixed conversion tables and the diazepam-normalization function.

pub mod converter;
pub mod tables;

pub use converter::{round_mg, to_diazepam_equivalent, EPSILON_MG};
pub use tables::{
    available_strengths, conversion_factor, equivalent_mg, reference_strengths, speed_profile,
    SpeedProfile, DIAZEPAM_REFERENCE_MG, GUIDELINE_URL,
};
