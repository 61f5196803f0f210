//! Schedule generation
//!
//! The single entry point callers use: validate the request, convert to
//! the diazepam equivalent, build the dated step sequence, and attach a
//! tablet plan to every step.

pub mod engine;
pub mod splitter;

pub use engine::MAX_STEPS;

use crate::equivalence::to_diazepam_equivalent;
use crate::error::TaperResult;
use crate::models::{StepPlan, TaperPlan, TaperRequest};

/// Generate a complete taper plan for a request.
///
/// Pure and synchronous: identical input yields identical output, and
/// there is no shared state, so this is safe to call concurrently.
pub fn generate_plan(req: &TaperRequest) -> TaperResult<TaperPlan> {
    req.validate()?;

    let reference_dose_mg = to_diazepam_equivalent(req.medication, req.starting_dose_mg)?;
    let steps = engine::build_steps(req, reference_dose_mg)?;
    let strengths = req.sorted_strengths();

    let mut warnings = Vec::new();
    let step_plans: Vec<StepPlan> = steps
        .into_iter()
        .map(|step| {
            let (slots, mut slot_warnings) = splitter::render_slots(&step, &strengths);
            warnings.append(&mut slot_warnings);
            StepPlan { step, slots }
        })
        .collect();

    let total_days = step_plans.last().map_or(0, |p| p.step.end_day);

    Ok(TaperPlan {
        reference_dose_mg,
        steps: step_plans,
        total_days,
        warnings,
    })
}
