//! Schedule step model
//!
//! One dated phase of the taper: a daily dose held for a span of days.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::request::DosingFrequency;

/// A single step of the taper schedule.
///
/// Steps are ordered by `index`; dates are contiguous across the whole
/// sequence (`end_date + 1 day == next.start_date`). `dose_days` is the
/// number of days within the step on which a dose is actually taken:
/// equal to `duration_days` for ordinary steps, 1 for each final-hold
/// window, 0 for the terminal discontinue step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaperStep {
    pub index: usize,
    pub dose_mg: f64,
    pub start_day: u32,
    pub end_day: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_days: u32,
    pub dose_days: u32,
    pub frequency: DosingFrequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TaperStep {
    /// Human label using 1-based day numbers, e.g. "Days 1-21"
    pub fn label(&self) -> String {
        if self.start_day == self.end_day {
            format!("Day {}", self.start_day)
        } else {
            format!("Days {}-{}", self.start_day, self.end_day)
        }
    }

    /// Formatted date range, e.g. "Jul 15 2025 - Aug 04 2025"
    pub fn date_range(&self) -> String {
        if self.start_date == self.end_date {
            self.start_date.format("%b %d %Y").to_string()
        } else {
            format!(
                "{} - {}",
                self.start_date.format("%b %d %Y"),
                self.end_date.format("%b %d %Y")
            )
        }
    }
}
