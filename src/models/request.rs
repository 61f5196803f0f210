//! Taper request model
//!
//! The inbound contract: medication, starting dose, speed, start date,
//! available tablet strengths, dosing frequency and optional final hold.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{TaperError, TaperResult};

/// Benzodiazepines covered by the equivalency table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medication {
    Alprazolam,
    Clonazepam,
    Lorazepam,
    Temazepam,
    Oxazepam,
    Chlordiazepoxide,
    Diazepam,
}

impl Medication {
    /// All supported medications, in table order
    pub const ALL: [Medication; 7] = [
        Medication::Alprazolam,
        Medication::Clonazepam,
        Medication::Lorazepam,
        Medication::Temazepam,
        Medication::Oxazepam,
        Medication::Chlordiazepoxide,
        Medication::Diazepam,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Medication::Alprazolam => "alprazolam",
            Medication::Clonazepam => "clonazepam",
            Medication::Lorazepam => "lorazepam",
            Medication::Temazepam => "temazepam",
            Medication::Oxazepam => "oxazepam",
            Medication::Chlordiazepoxide => "chlordiazepoxide",
            Medication::Diazepam => "diazepam",
        }
    }

    /// Parse a medication name, rejecting anything outside the table
    pub fn parse(s: &str) -> TaperResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "alprazolam" => Ok(Medication::Alprazolam),
            "clonazepam" => Ok(Medication::Clonazepam),
            "lorazepam" => Ok(Medication::Lorazepam),
            "temazepam" => Ok(Medication::Temazepam),
            "oxazepam" => Ok(Medication::Oxazepam),
            "chlordiazepoxide" => Ok(Medication::Chlordiazepoxide),
            "diazepam" => Ok(Medication::Diazepam),
            other => Err(TaperError::UnknownMedication(other.to_string())),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Medication::Alprazolam => "Alprazolam",
            Medication::Clonazepam => "Clonazepam",
            Medication::Lorazepam => "Lorazepam",
            Medication::Temazepam => "Temazepam",
            Medication::Oxazepam => "Oxazepam",
            Medication::Chlordiazepoxide => "Chlordiazepoxide",
            Medication::Diazepam => "Diazepam",
        }
    }
}

/// Named reduction cadence from the ASAM 2025 guideline table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaperSpeed {
    Slow,
    Standard,
    Fast,
    VeryFast,
    UltraFast,
}

impl TaperSpeed {
    /// All speeds, slowest first
    pub const ALL: [TaperSpeed; 5] = [
        TaperSpeed::Slow,
        TaperSpeed::Standard,
        TaperSpeed::Fast,
        TaperSpeed::VeryFast,
        TaperSpeed::UltraFast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaperSpeed::Slow => "slow",
            TaperSpeed::Standard => "standard",
            TaperSpeed::Fast => "fast",
            TaperSpeed::VeryFast => "very_fast",
            TaperSpeed::UltraFast => "ultra_fast",
        }
    }

    pub fn parse(s: &str) -> TaperResult<Self> {
        match s.trim().to_lowercase().replace(' ', "_").as_str() {
            "slow" => Ok(TaperSpeed::Slow),
            "standard" => Ok(TaperSpeed::Standard),
            "fast" => Ok(TaperSpeed::Fast),
            "very_fast" => Ok(TaperSpeed::VeryFast),
            "ultra_fast" => Ok(TaperSpeed::UltraFast),
            other => Err(TaperError::UnknownSpeed(other.to_string())),
        }
    }
}

/// Daily dosing frequency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DosingFrequency {
    #[default]
    Once,
    Bid,
    Tid,
}

impl DosingFrequency {
    /// Number of dose slots per day
    pub fn slots_per_day(&self) -> usize {
        match self {
            DosingFrequency::Once => 1,
            DosingFrequency::Bid => 2,
            DosingFrequency::Tid => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DosingFrequency::Once => "once",
            DosingFrequency::Bid => "bid",
            DosingFrequency::Tid => "tid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "once" | "qd" | "daily" => Some(DosingFrequency::Once),
            "bid" | "twice" => Some(DosingFrequency::Bid),
            "tid" | "thrice" => Some(DosingFrequency::Tid),
            _ => None,
        }
    }
}

/// Optional plateau phase before discontinuation.
///
/// The hold starts once the main taper reaches `dose_mg`, or the floor
/// when `dose_mg` is omitted. One dose at that level is taken every
/// `every_n_days` across `total_days`. An explicit dose must sit on the
/// grid of the smallest available strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalHold {
    pub total_days: u32,
    pub every_n_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dose_mg: Option<f64>,
}

/// A taper generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaperRequest {
    pub medication: Medication,
    pub starting_dose_mg: f64,
    #[serde(default = "default_speed")]
    pub speed: TaperSpeed,
    pub start_date: NaiveDate,
    /// Diazepam tablet strengths the pharmacy can dispense, in mg
    #[serde(default = "default_strengths")]
    pub available_strengths: Vec<f64>,
    #[serde(default)]
    pub frequency: DosingFrequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_hold: Option<FinalHold>,
}

fn default_speed() -> TaperSpeed {
    TaperSpeed::Standard
}

fn default_strengths() -> Vec<f64> {
    crate::equivalence::tables::reference_strengths().to_vec()
}

impl TaperRequest {
    /// Validate the request before any computation
    pub fn validate(&self) -> TaperResult<()> {
        if self.starting_dose_mg <= 0.0 || !self.starting_dose_mg.is_finite() {
            return Err(TaperError::InvalidDose(self.starting_dose_mg));
        }
        if self.available_strengths.is_empty() {
            return Err(TaperError::EmptyStrengths);
        }
        for &s in &self.available_strengths {
            if s <= 0.0 || !s.is_finite() {
                return Err(TaperError::InvalidStrength(s));
            }
        }
        if let Some(hold) = &self.final_hold {
            if hold.total_days == 0 || hold.every_n_days == 0 {
                return Err(TaperError::InvalidFinalHold);
            }
            if let Some(d) = hold.dose_mg {
                if d <= 0.0 || !d.is_finite() {
                    return Err(TaperError::InvalidDose(d));
                }
                // The schedule can only dose on multiples of the
                // smallest strength; anything off that grid would be
                // silently rounded, so refuse it up front.
                let units = d / self.smallest_strength();
                if (units - units.round()).abs() > 1e-6 {
                    return Err(TaperError::InvalidHoldDose(d));
                }
            }
        }
        Ok(())
    }

    /// Available strengths sorted largest first, duplicates removed
    pub fn sorted_strengths(&self) -> Vec<f64> {
        let mut strengths = self.available_strengths.clone();
        strengths.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        strengths.dedup();
        strengths
    }

    /// Smallest available strength, the rounding granularity and dose floor
    pub fn smallest_strength(&self) -> f64 {
        self.available_strengths
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min)
    }
}
