//! Dose conversion functions
//!
//! Normalizes a (medication, dose) pair to the diazepam-equivalent dose
//! all schedule math is performed in.

use crate::error::{TaperError, TaperResult};
use crate::models::Medication;

use super::tables::conversion_factor;

/// Comparison tolerance for dose arithmetic, in mg
pub const EPSILON_MG: f64 = 1e-6;

/// Round a milligram amount to two decimal places
pub fn round_mg(mg: f64) -> f64 {
    (mg * 100.0).round() / 100.0
}

/// Convert a dose of the given medication to its diazepam equivalent.
///
/// Fails with `InvalidDose` for non-positive doses. Unknown medications
/// cannot reach this point: the closed `Medication` enum rejects them
/// where strings are parsed.
pub fn to_diazepam_equivalent(medication: Medication, dose_mg: f64) -> TaperResult<f64> {
    if dose_mg <= 0.0 || !dose_mg.is_finite() {
        return Err(TaperError::InvalidDose(dose_mg));
    }
    Ok(round_mg(dose_mg * conversion_factor(medication)))
}
