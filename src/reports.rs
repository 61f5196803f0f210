//! Artifact generation
//!
//! Pure formatting over a generated `TaperPlan`: patient instructions,
//! EHR summary, pharmacy orders and pill totals. No new computation
//! happens here beyond aggregation.

use std::collections::BTreeMap;

use crate::equivalence::{EPSILON_MG, GUIDELINE_URL};
use crate::models::{
    PharmacyOrder, StepPlan, TaperPlan, TaperRequest, TaperResponse,
};

// ============================================================================
// Formatting helpers
// ============================================================================

/// Format a strength for display and map keys ("10", "0.5")
pub fn format_strength(mg: f64) -> String {
    if (mg - mg.round()).abs() < 1e-9 {
        format!("{}", mg.round() as i64)
    } else {
        format!("{}", mg)
    }
}

fn tablet_word(count: u32) -> &'static str {
    if count == 1 { "tablet" } else { "tablets" }
}

/// Whether a step doses daily (false for hold windows)
fn is_daily(plan: &StepPlan) -> bool {
    plan.step.dose_days == plan.step.duration_days
}

// ============================================================================
// Patient instructions
// ============================================================================

/// One plain-language block per step, plus header and footer
pub fn patient_instructions(plan: &TaperPlan) -> Vec<String> {
    let mut lines = vec![
        "Do not alter this schedule without prescriber approval.".to_string(),
        "Benzodiazepine taper plan".to_string(),
        String::new(),
        format!("Guideline reference: {}", GUIDELINE_URL),
        String::new(),
    ];

    for step_plan in &plan.steps {
        let step = &step_plan.step;
        lines.push(format!("{} ({}):", step.label(), step.date_range()));
        for slot in &step_plan.slots {
            // A slot can legitimately carry nothing when an uneven
            // split leaves a whole dose in the morning slot.
            let dose_str = if slot.target_mg <= EPSILON_MG {
                "no dose".to_string()
            } else if slot.combination.is_empty() {
                "no tablet combination available".to_string()
            } else {
                slot.combination
                    .tablets
                    .iter()
                    .map(|t| format!("{} x {} mg", t.count, format_strength(t.strength_mg)))
                    .collect::<Vec<_>>()
                    .join(" + ")
            };
            lines.push(format!("  {}: {}", slot.slot.as_str(), dose_str));
        }
        if step_plan.slots.is_empty() {
            lines.push("  No dose - taper complete".to_string());
        }
        if let Some(note) = &step.note {
            lines.push(format!("  -> {}", note));
        }
    }

    lines.push(String::new());
    lines.push("Report withdrawal symptoms to your provider immediately.".to_string());
    lines
}

// ============================================================================
// EHR summary
// ============================================================================

/// Single condensed string for the chart
pub fn ehr_summary(req: &TaperRequest, plan: &TaperPlan) -> String {
    let end_date = plan
        .steps
        .last()
        .map(|p| p.step.end_date.format("%b %d %Y").to_string())
        .unwrap_or_default();
    format!(
        "Diazepam taper from {} {} mg ({} mg diazepam equivalent): {} steps over {} days at {} speed, discontinuing {}. Ref: {}",
        req.medication.display_name(),
        req.starting_dose_mg,
        plan.reference_dose_mg,
        plan.steps.len(),
        plan.total_days,
        req.speed.as_str(),
        end_date,
        GUIDELINE_URL
    )
}

// ============================================================================
// Pharmacy orders
// ============================================================================

/// Consecutive steps sharing slot combinations and dosing cadence form
/// one phase; grouping key equality only, no global optimization.
fn phases(plan: &TaperPlan) -> Vec<&[StepPlan]> {
    let mut result = Vec::new();
    let steps = &plan.steps[..];
    let mut start = 0;
    for i in 1..=steps.len() {
        let split = i == steps.len()
            || steps[i].slots != steps[start].slots
            || is_daily(&steps[i]) != is_daily(&steps[start]);
        if split {
            result.push(&steps[start..i]);
            start = i;
        }
    }
    result
}

/// One order per (phase, slot, strength); quantities cover exactly the
/// tablets consumed so dispensed sums match the pill totals.
pub fn pharmacy_orders(plan: &TaperPlan) -> Vec<PharmacyOrder> {
    let mut orders = Vec::new();

    for phase in phases(plan) {
        let first = &phase[0].step;
        let last = &phase[phase.len() - 1].step;
        if phase[0].slots.is_empty() {
            continue; // discontinue step dispenses nothing
        }

        let dose_days: u32 = phase.iter().map(|p| p.step.dose_days).sum();
        let span_days = last.end_day - first.start_day + 1;
        let date = first.start_date.format("%B %d %Y").to_string();
        let date_range = if first.start_date == last.end_date {
            date.clone()
        } else {
            format!(
                "{} - {}",
                first.start_date.format("%B %d %Y"),
                last.end_date.format("%B %d %Y")
            )
        };
        let cadence = if is_daily(&phase[0]) {
            String::new()
        } else {
            format!(" (one dose every {} days)", first.duration_days)
        };

        for slot in &phase[0].slots {
            for tablet in &slot.combination.tablets {
                let quantity = tablet.count * dose_days;
                orders.push(PharmacyOrder {
                    date: date.clone(),
                    date_range: date_range.clone(),
                    product: format!(
                        "Diazepam {} mg tablet",
                        format_strength(tablet.strength_mg)
                    ),
                    sig: format!(
                        "Sig: Take {} {} by mouth {}{}",
                        tablet.count,
                        tablet_word(tablet.count),
                        slot.slot.phrase(),
                        cadence
                    ),
                    dispense: format!("Disp: {} tablets for {} days", quantity, span_days),
                    quantity,
                    strength_mg: tablet.strength_mg,
                });
            }
        }
    }

    orders
}

// ============================================================================
// Pill totals
// ============================================================================

/// Total tablets per strength across the whole schedule
pub fn pill_totals(plan: &TaperPlan) -> BTreeMap<String, u32> {
    let mut totals: BTreeMap<String, u32> = BTreeMap::new();
    for step_plan in &plan.steps {
        for slot in &step_plan.slots {
            for tablet in &slot.combination.tablets {
                *totals.entry(format_strength(tablet.strength_mg)).or_insert(0) +=
                    tablet.count * step_plan.step.dose_days;
            }
        }
    }
    totals
}

// ============================================================================
// Response assembly
// ============================================================================

/// Assemble the JSON boundary shape from a plan
pub fn build_response(req: &TaperRequest, plan: &TaperPlan) -> TaperResponse {
    let warn = if plan.warnings.is_empty() {
        None
    } else {
        Some(plan.warnings.join("; "))
    };
    TaperResponse {
        warn,
        patient_instructions: patient_instructions(plan),
        ehr_summary: ehr_summary(req, plan),
        pharmacy_orders: pharmacy_orders(plan),
        pill_totals: pill_totals(plan),
        reference_dose_mg: plan.reference_dose_mg,
        total_days: plan.total_days,
    }
}
