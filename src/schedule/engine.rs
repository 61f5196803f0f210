//! Schedule engine
//!
//! Iteratively reduces the diazepam-equivalent dose by the cadence
//! percentage each interval, snapping every computed dose down onto the
//! grid of the smallest available tablet strength (never up - rounding
//! must not increase the patient's dose). The sequence ends with an
//! optional final-hold phase and an explicit zero-dose discontinue step.

use chrono::{Days, NaiveDate};

use crate::equivalence::converter::{round_mg, EPSILON_MG};
use crate::equivalence::tables::{speed_profile, SpeedProfile};
use crate::error::{TaperError, TaperResult};
use crate::models::{DosingFrequency, TaperRequest, TaperStep};

/// Safety cap on emitted steps. Guideline cadences decay geometrically
/// and cannot come near this; the cap guards against a misconfigured
/// reduction fraction near zero.
pub const MAX_STEPS: usize = 2000;

/// Accumulates steps while tracking the date and 1-based day cursor
struct StepBuilder {
    steps: Vec<TaperStep>,
    day: u32,
    date: NaiveDate,
    frequency: DosingFrequency,
}

impl StepBuilder {
    fn new(start_date: NaiveDate, frequency: DosingFrequency) -> Self {
        Self {
            steps: Vec::new(),
            day: 1,
            date: start_date,
            frequency,
        }
    }

    fn push(
        &mut self,
        dose_mg: f64,
        duration_days: u32,
        dose_days: u32,
        note: Option<&str>,
    ) -> TaperResult<()> {
        if self.steps.len() >= MAX_STEPS {
            return Err(TaperError::ScheduleTooLong(MAX_STEPS));
        }
        let end_date = self
            .date
            .checked_add_days(Days::new(u64::from(duration_days) - 1))
            .ok_or(TaperError::ScheduleTooLong(MAX_STEPS))?;
        self.steps.push(TaperStep {
            index: self.steps.len(),
            dose_mg,
            start_day: self.day,
            end_day: self.day + duration_days - 1,
            start_date: self.date,
            end_date,
            duration_days,
            dose_days,
            frequency: self.frequency,
            note: note.map(str::to_string),
        });
        self.day += duration_days;
        self.date = end_date
            .checked_add_days(Days::new(1))
            .ok_or(TaperError::ScheduleTooLong(MAX_STEPS))?;
        Ok(())
    }
}

/// Snap a dose down onto the granularity grid. The epsilon absorbs
/// floating-point drift so an on-grid value is not pushed a whole unit
/// lower.
fn snap_down(dose_mg: f64, granularity_mg: f64) -> f64 {
    round_mg(((dose_mg + EPSILON_MG) / granularity_mg).floor() * granularity_mg)
}

/// Build the ordered step sequence for a validated request.
pub fn build_steps(req: &TaperRequest, reference_dose_mg: f64) -> TaperResult<Vec<TaperStep>> {
    build_steps_with_profile(req, reference_dose_mg, speed_profile(req.speed))
}

/// Engine core, parameterized on the cadence so the defensive step cap
/// is reachable from tests.
pub(crate) fn build_steps_with_profile(
    req: &TaperRequest,
    reference_dose_mg: f64,
    profile: SpeedProfile,
) -> TaperResult<Vec<TaperStep>> {
    // Floor and granularity are both the smallest available strength:
    // the smallest nonzero daily amount the pharmacy can dispense.
    let floor = req.smallest_strength();
    let granularity = floor;
    // An explicit hold dose is the threshold the taper descends to
    // before holding; without one, the hold sits at the floor. The
    // threshold is validated onto the strength grid and never exceeds
    // the starting dose.
    let stop_dose = match req.final_hold.as_ref().and_then(|h| h.dose_mg) {
        Some(d) => snap_down(d, granularity)
            .min(snap_down(reference_dose_mg, granularity))
            .max(floor),
        None => floor,
    };
    let mut builder = StepBuilder::new(req.start_date, req.frequency);

    let mut dose = reference_dose_mg;
    if dose > floor + EPSILON_MG {
        while dose > stop_dose + EPSILON_MG {
            builder.push(dose, profile.interval_days, profile.interval_days, None)?;
            // Reduce, snap down, and never land on a nonzero dose below
            // the stopping threshold: anything under it becomes the
            // threshold, dosed once more before stopping.
            let reduced = snap_down(dose * (1.0 - profile.percent / 100.0), granularity);
            dose = reduced.max(stop_dose);
        }

        // One interval at the stopping dose before discontinuation
        builder.push(stop_dose, profile.interval_days, profile.interval_days, Some("final daily dose"))?;

        if let Some(hold) = &req.final_hold {
            let note = format!("final hold - one dose every {} days", hold.every_n_days);
            let mut remaining = hold.total_days;
            while remaining > 0 {
                let window = hold.every_n_days.min(remaining);
                builder.push(stop_dose, window, 1, Some(note.as_str()))?;
                remaining -= window;
            }
        }
    }

    // Explicit terminal step marking discontinuation
    builder.push(0.0, 1, 0, Some("discontinue"))?;

    Ok(builder.steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FinalHold, Medication, TaperSpeed};

    fn request(dose_mg: f64, speed: TaperSpeed) -> TaperRequest {
        TaperRequest {
            medication: Medication::Diazepam,
            starting_dose_mg: dose_mg,
            speed,
            start_date: NaiveDate::from_ymd_opt(2025, 7, 15).unwrap(),
            available_strengths: vec![10.0, 5.0, 2.0],
            frequency: DosingFrequency::Once,
            final_hold: None,
        }
    }

    fn assert_contiguous(steps: &[TaperStep]) {
        for pair in steps.windows(2) {
            assert_eq!(
                pair[0].end_date.succ_opt().unwrap(),
                pair[1].start_date,
                "gap between step {} and {}",
                pair[0].index,
                pair[1].index
            );
            assert_eq!(pair[0].end_day + 1, pair[1].start_day);
        }
    }

    #[test]
    fn test_standard_taper_first_step_dates() {
        // Scenario: clonazepam 1 mg converts to 20 mg diazepam; the
        // first standard step covers 21 days from the start date.
        let req = request(20.0, TaperSpeed::Standard);
        let steps = build_steps(&req, 20.0).unwrap();

        assert_eq!(steps[0].dose_mg, 20.0);
        assert_eq!(steps[0].start_date, NaiveDate::from_ymd_opt(2025, 7, 15).unwrap());
        assert_eq!(steps[0].end_date, NaiveDate::from_ymd_opt(2025, 8, 4).unwrap());
        assert_eq!(steps[0].start_day, 1);
        assert_eq!(steps[0].end_day, 21);
    }

    #[test]
    fn test_dates_contiguous_and_monotone() {
        let req = request(20.0, TaperSpeed::Standard);
        let steps = build_steps(&req, 20.0).unwrap();

        assert_contiguous(&steps);
        for pair in steps.windows(2) {
            assert!(
                pair[1].dose_mg <= pair[0].dose_mg + EPSILON_MG,
                "dose increased from {} to {}",
                pair[0].dose_mg,
                pair[1].dose_mg
            );
        }
    }

    #[test]
    fn test_terminates_at_zero() {
        let req = request(20.0, TaperSpeed::Standard);
        let steps = build_steps(&req, 20.0).unwrap();
        let last = steps.last().unwrap();
        assert_eq!(last.dose_mg, 0.0);
        assert_eq!(last.note.as_deref(), Some("discontinue"));
        assert_eq!(last.duration_days, 1);
    }

    #[test]
    fn test_ultra_fast_sequence() {
        // 20 mg at 20%/7d: 20, 16, 12.8 snapped to 12, then 8, 6, 4,
        // floor plateau at 2, discontinue.
        let req = request(20.0, TaperSpeed::UltraFast);
        let steps = build_steps(&req, 20.0).unwrap();

        let doses: Vec<f64> = steps.iter().map(|s| s.dose_mg).collect();
        assert_eq!(doses, vec![20.0, 16.0, 12.0, 8.0, 6.0, 4.0, 2.0, 0.0]);
        for step in &steps[..steps.len() - 1] {
            assert_eq!(step.duration_days, 7);
        }
        assert_contiguous(&steps);
    }

    #[test]
    fn test_floor_step_is_noted() {
        let req = request(20.0, TaperSpeed::UltraFast);
        let steps = build_steps(&req, 20.0).unwrap();
        let floor_step = &steps[steps.len() - 2];
        assert_eq!(floor_step.dose_mg, 2.0);
        assert_eq!(floor_step.note.as_deref(), Some("final daily dose"));
    }

    #[test]
    fn test_start_at_floor_yields_single_discontinue_step() {
        let req = request(2.0, TaperSpeed::Standard);
        let steps = build_steps(&req, 2.0).unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].dose_mg, 0.0);
        assert_eq!(steps[0].start_date, req.start_date);
        assert_eq!(steps[0].note.as_deref(), Some("discontinue"));
    }

    #[test]
    fn test_final_hold_windows() {
        // 6 days of hold dosed every 3 days: two 3-day windows between
        // the floor plateau and the discontinue step.
        let mut req = request(20.0, TaperSpeed::UltraFast);
        req.final_hold = Some(FinalHold {
            total_days: 6,
            every_n_days: 3,
            dose_mg: None,
        });
        let steps = build_steps(&req, 20.0).unwrap();

        let holds: Vec<&TaperStep> = steps
            .iter()
            .filter(|s| s.note.as_deref().is_some_and(|n| n.starts_with("final hold")))
            .collect();
        assert_eq!(holds.len(), 2);
        for hold in &holds {
            assert_eq!(hold.duration_days, 3);
            assert_eq!(hold.dose_days, 1);
            assert_eq!(hold.dose_mg, 2.0);
        }
        // Hold sits directly before the terminal zero step
        assert_eq!(holds[1].index, steps.len() - 2);
        assert_contiguous(&steps);
    }

    #[test]
    fn test_explicit_hold_dose_stops_the_taper_above_the_floor() {
        // A 4 mg hold with strengths 10/5/2 halts the descent at 4 mg:
        // the plateau and every hold window carry 4.0, and no step ever
        // drops to the 2 mg floor before the terminal zero.
        let mut req = request(20.0, TaperSpeed::UltraFast);
        req.final_hold = Some(FinalHold {
            total_days: 6,
            every_n_days: 3,
            dose_mg: Some(4.0),
        });
        let steps = build_steps(&req, 20.0).unwrap();

        let holds: Vec<f64> = steps
            .iter()
            .filter(|s| s.note.as_deref().is_some_and(|n| n.starts_with("final hold")))
            .map(|s| s.dose_mg)
            .collect();
        assert_eq!(holds, vec![4.0, 4.0]);

        let plateau = steps
            .iter()
            .find(|s| s.note.as_deref() == Some("final daily dose"))
            .unwrap();
        assert_eq!(plateau.dose_mg, 4.0);

        assert!(steps.iter().all(|s| s.dose_mg == 0.0 || s.dose_mg >= 4.0));
        assert_contiguous(&steps);
    }

    #[test]
    fn test_hold_dose_above_starting_dose_is_capped() {
        // A hold threshold above the converted starting dose cannot
        // raise the schedule: it is capped at the starting dose.
        let mut req = request(10.0, TaperSpeed::UltraFast);
        req.final_hold = Some(FinalHold {
            total_days: 3,
            every_n_days: 3,
            dose_mg: Some(40.0),
        });
        let steps = build_steps(&req, 10.0).unwrap();

        assert!(steps.iter().all(|s| s.dose_mg <= 10.0));
        let last_dosed = steps[steps.len() - 2].dose_mg;
        assert_eq!(last_dosed, 10.0);
        assert_contiguous(&steps);
    }

    #[test]
    fn test_final_hold_truncates_last_window() {
        let mut req = request(20.0, TaperSpeed::UltraFast);
        req.final_hold = Some(FinalHold {
            total_days: 7,
            every_n_days: 3,
            dose_mg: None,
        });
        let steps = build_steps(&req, 20.0).unwrap();
        let hold_span: u32 = steps
            .iter()
            .filter(|s| s.note.as_deref().is_some_and(|n| n.starts_with("final hold")))
            .map(|s| s.duration_days)
            .sum();
        assert_eq!(hold_span, 7);
    }

    #[test]
    fn test_idempotent_generation() {
        let mut req = request(20.0, TaperSpeed::Fast);
        req.final_hold = Some(FinalHold {
            total_days: 6,
            every_n_days: 3,
            dose_mg: None,
        });
        let a = build_steps(&req, 20.0).unwrap();
        let b = build_steps(&req, 20.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_step_cap_on_degenerate_reduction() {
        let req = request(20.0, TaperSpeed::Standard);
        let profile = SpeedProfile {
            label: "degenerate",
            percent: 1e-9,
            interval_days: 7,
        };
        let result = build_steps_with_profile(&req, 20.0, profile);
        assert!(matches!(result, Err(TaperError::ScheduleTooLong(_))));
    }

    #[test]
    fn test_snap_down_never_rounds_up() {
        assert_eq!(snap_down(12.8, 2.0), 12.0);
        assert_eq!(snap_down(19.0, 2.0), 18.0);
        // On-grid values survive floating-point drift
        assert_eq!(snap_down(0.1 + 0.2, 0.3), 0.3);
    }
}
