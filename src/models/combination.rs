//! Tablet combination model
//!
//! How a single sub-dose is made up from the available tablet strengths.

use serde::{Deserialize, Serialize};

/// Time-of-day slot for a sub-dose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeSlot {
    Am,
    Pm,
    Hs,
}

impl TimeSlot {
    /// Slot order for a given number of daily doses
    pub fn slots(count: usize) -> &'static [TimeSlot] {
        static ALL: [TimeSlot; 3] = [TimeSlot::Am, TimeSlot::Pm, TimeSlot::Hs];
        &ALL[..count.min(3)]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Am => "AM",
            TimeSlot::Pm => "PM",
            TimeSlot::Hs => "HS",
        }
    }

    /// Phrase used in pharmacy directions
    pub fn phrase(&self) -> &'static str {
        match self {
            TimeSlot::Am => "in the morning",
            TimeSlot::Pm => "in the afternoon",
            TimeSlot::Hs => "at bedtime",
        }
    }
}

/// A count of tablets at one strength
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TabletCount {
    pub strength_mg: f64,
    pub count: u32,
}

/// Tablets making up one sub-dose.
///
/// `actual_mg` is the milligram sum of the tablets; `residual_mg` is the
/// part of the target that could not be expressed and was rounded away
/// (never added), below the smallest available strength.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoseCombination {
    pub tablets: Vec<TabletCount>,
    pub actual_mg: f64,
    pub residual_mg: f64,
}

impl DoseCombination {
    /// Whether any tablets are dispensed at all
    pub fn is_empty(&self) -> bool {
        self.tablets.is_empty()
    }

    /// Total tablet count across strengths
    pub fn tablet_count(&self) -> u32 {
        self.tablets.iter().map(|t| t.count).sum()
    }
}

/// One time slot of a step with its resolved combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotDose {
    pub slot: TimeSlot,
    pub target_mg: f64,
    pub combination: DoseCombination,
}
