//! Dose renderer
//!
//! Splits a step's daily dose across time slots and resolves each slot
//! into a tablet combination. Splitting is granularity-aware: the total
//! is quantized into units of the smallest strength and distributed as
//! evenly as possible, with earlier slots (AM first) receiving the
//! remainder. Combination resolution is a greedy largest-strength-first
//! fill; when greedy strands a residue (16 mg against 10/5/2 leaves
//! 1 mg) a small dynamic program searches for an exact minimal-tablet
//! decomposition. Anything still inexpressible is rounded away (never
//! added) and reported as a warning.

use crate::equivalence::converter::{round_mg, EPSILON_MG};
use crate::error::TaperError;
use crate::models::{DoseCombination, DosingFrequency, SlotDose, TabletCount, TaperStep, TimeSlot};

/// Split a daily dose across the frequency's slots.
///
/// Slot sums always equal the total within tolerance. Deterministic:
/// remainder units and any sub-granularity leftover go to the AM slot.
pub fn split_daily_dose(total_mg: f64, frequency: DosingFrequency, smallest_mg: f64) -> Vec<f64> {
    let parts = frequency.slots_per_day();
    let units = ((total_mg + EPSILON_MG) / smallest_mg).floor() as u64;
    let leftover = round_mg(total_mg - units as f64 * smallest_mg).max(0.0);

    let base = units / parts as u64;
    let extra = (units % parts as u64) as usize;

    let mut slots: Vec<f64> = (0..parts)
        .map(|i| {
            let slot_units = base + u64::from(i < extra);
            round_mg(slot_units as f64 * smallest_mg)
        })
        .collect();
    if leftover > EPSILON_MG {
        slots[0] = round_mg(slots[0] + leftover);
    }
    slots
}

/// Resolve a target sub-dose into tablets: greedy largest-first, with
/// an exact minimum-tablet search as fallback when greedy leaves a
/// residue.
pub fn pill_combination(target_mg: f64, strengths_desc: &[f64]) -> DoseCombination {
    let mut remaining = target_mg;
    let mut tablets = Vec::new();

    for &strength in strengths_desc {
        let count = ((remaining + EPSILON_MG) / strength).floor() as u32;
        if count > 0 {
            tablets.push(TabletCount { strength_mg: strength, count });
            remaining = round_mg(remaining - f64::from(count) * strength);
        }
    }

    if remaining > EPSILON_MG {
        if let Some(exact) = exact_combination(target_mg, strengths_desc) {
            return exact;
        }
    }

    let residual = if remaining > EPSILON_MG { remaining } else { 0.0 };
    DoseCombination {
        actual_mg: round_mg(target_mg - residual),
        residual_mg: residual,
        tablets,
    }
}

/// Centimilligram scale used by the exact-change search
const CMG_SCALE: f64 = 100.0;

/// Largest target (in centimilligrams) the exact search will attempt
const CMG_SEARCH_CAP: usize = 1_000_000;

/// Minimum-tablet exact decomposition via a coin-change dynamic program
/// over centimilligram sums. Returns None when the target is off the
/// centimilligram grid, too large, or genuinely unreachable.
fn exact_combination(target_mg: f64, strengths_desc: &[f64]) -> Option<DoseCombination> {
    let scaled = target_mg * CMG_SCALE;
    if (scaled - scaled.round()).abs() > EPSILON_MG * CMG_SCALE {
        return None;
    }
    let target = scaled.round() as usize;
    if target == 0 || target > CMG_SEARCH_CAP {
        return None;
    }

    let coins: Vec<usize> = strengths_desc
        .iter()
        .map(|&s| (s * CMG_SCALE).round() as usize)
        .collect();
    if coins.iter().any(|&c| c == 0) {
        return None;
    }

    let mut best = vec![u32::MAX; target + 1];
    let mut pick = vec![usize::MAX; target + 1];
    best[0] = 0;
    for amount in 1..=target {
        for (i, &coin) in coins.iter().enumerate() {
            if coin <= amount && best[amount - coin] != u32::MAX {
                let candidate = best[amount - coin] + 1;
                if candidate < best[amount] {
                    best[amount] = candidate;
                    pick[amount] = i;
                }
            }
        }
    }
    if best[target] == u32::MAX {
        return None;
    }

    let mut counts = vec![0u32; coins.len()];
    let mut amount = target;
    while amount > 0 {
        let i = pick[amount];
        counts[i] += 1;
        amount -= coins[i];
    }

    let tablets = strengths_desc
        .iter()
        .zip(counts)
        .filter(|&(_, count)| count > 0)
        .map(|(&strength_mg, count)| TabletCount { strength_mg, count })
        .collect();

    Some(DoseCombination {
        tablets,
        actual_mg: round_mg(target_mg),
        residual_mg: 0.0,
    })
}

/// Render a step into per-slot doses, collecting warnings for anything
/// the available strengths cannot express. A single unreachable slot
/// never aborts the schedule.
pub fn render_slots(step: &TaperStep, strengths_desc: &[f64]) -> (Vec<SlotDose>, Vec<String>) {
    let mut warnings = Vec::new();

    if step.dose_mg <= EPSILON_MG {
        // Discontinue step: no doses to place
        return (Vec::new(), warnings);
    }

    let smallest = strengths_desc.last().copied().unwrap_or(step.dose_mg);
    let targets = split_daily_dose(step.dose_mg, step.frequency, smallest);
    let slots = TimeSlot::slots(targets.len());

    let rendered: Vec<SlotDose> = slots
        .iter()
        .zip(targets)
        .map(|(&slot, target_mg)| {
            let combination = pill_combination(target_mg, strengths_desc);
            if target_mg > EPSILON_MG && combination.is_empty() {
                tracing::warn!(target_mg, slot = slot.as_str(), "dose unreachable with available strengths");
                warnings.push(format!(
                    "{} {}: {}",
                    step.label(),
                    slot.as_str(),
                    TaperError::UnreachableDose(target_mg)
                ));
            } else if combination.residual_mg > EPSILON_MG {
                tracing::warn!(
                    target_mg,
                    residual_mg = combination.residual_mg,
                    slot = slot.as_str(),
                    "dose rounded down to the tablet grid"
                );
                warnings.push(format!(
                    "{} {}: {} mg of the {} mg dose rounded down to {} mg (not expressible with available strengths)",
                    step.label(),
                    slot.as_str(),
                    combination.residual_mg,
                    target_mg,
                    combination.actual_mg
                ));
            }
            SlotDose { slot, target_mg, combination }
        })
        .collect();

    (rendered, warnings)
}
