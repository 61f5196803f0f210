//! Fixed equivalency and cadence tables
//!
//! Defined once and immutable for the process lifetime. Dose equivalents
//! and taper cadences follow the ASAM 2025 benzodiazepine tapering
//! guideline.

use serde::Serialize;

use crate::models::{Medication, TaperSpeed};

/// Guideline the cadence table is taken from
pub const GUIDELINE_URL: &str =
    "https://downloads.asam.org/sitefinity-production-blobs/docs/default-source/\
     guidelines/benzodiazepine-tapering-2025/bzd-tapering-document---final-approved-\
     version-for-distribution-02-28-25.pdf?sfvrsn=5bdf9c81_4";

/// Reference amount of diazepam the equivalency table is normalized to
pub const DIAZEPAM_REFERENCE_MG: f64 = 10.0;

/// Milligrams of the given medication equivalent to 10 mg diazepam
pub fn equivalent_mg(medication: Medication) -> f64 {
    match medication {
        Medication::Alprazolam => 0.5,
        Medication::Clonazepam => 0.5,
        Medication::Lorazepam => 1.0,
        Medication::Temazepam => 10.0,
        Medication::Oxazepam => 15.0,
        Medication::Chlordiazepoxide => 25.0,
        Medication::Diazepam => 10.0,
    }
}

/// Conversion factor: mg of diazepam per 1 mg of the given medication
pub fn conversion_factor(medication: Medication) -> f64 {
    DIAZEPAM_REFERENCE_MG / equivalent_mg(medication)
}

/// Tablet strengths commercially available for the given medication, in
/// mg, largest first. Only some medications come in tablet forms we
/// track; the rest return an empty slice.
pub fn available_strengths(medication: Medication) -> &'static [f64] {
    match medication {
        Medication::Diazepam => &[10.0, 5.0, 2.0],
        Medication::Clonazepam => &[2.0, 1.0, 0.5],
        Medication::Alprazolam => &[2.0, 1.0, 0.5, 0.25],
        _ => &[],
    }
}

/// Strengths of the reference drug (diazepam), the default for requests
pub fn reference_strengths() -> &'static [f64] {
    available_strengths(Medication::Diazepam)
}

/// A named cadence: percentage reduction applied every `interval_days`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeedProfile {
    pub label: &'static str,
    pub percent: f64,
    pub interval_days: u32,
}

/// Cadence for a named taper speed
pub fn speed_profile(speed: TaperSpeed) -> SpeedProfile {
    match speed {
        TaperSpeed::Slow => SpeedProfile { label: "slow", percent: 2.5, interval_days: 28 },
        TaperSpeed::Standard => SpeedProfile { label: "standard", percent: 5.0, interval_days: 21 },
        TaperSpeed::Fast => SpeedProfile { label: "fast", percent: 10.0, interval_days: 14 },
        TaperSpeed::VeryFast => SpeedProfile { label: "very_fast", percent: 15.0, interval_days: 14 },
        TaperSpeed::UltraFast => SpeedProfile { label: "ultra_fast", percent: 20.0, interval_days: 7 },
    }
}
