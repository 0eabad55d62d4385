//! Diagonal ("cheating") packing: tilt the item corner to corner inside the cross-section.
//!
//! The item is rotated about the open axis in whole-degree steps. Each feasible
//! angle yields an effective interior; the snuggest one wins.

use crate::geometry::tilted_footprint;
use crate::model::{PackingLevel, ShippingBox};
use crate::types::{Dims3, EPSILON_GENERAL};

use super::{CandidateResult, EvaluationContext, Orientation, StrategyDetail, is_degenerate};

/// Angle increment between evaluated rotations.
pub const ANGLE_STEP_DEGREES: u32 = 1;

fn inapplicable(
    shipping_box: &ShippingBox,
    level: PackingLevel,
    note: &'static str,
) -> CandidateResult {
    CandidateResult::inapplicable(
        StrategyDetail::Diagonal {
            rotation_degrees: 0.0,
        },
        level,
        shipping_box,
        note,
    )
}

fn tilted(
    shipping_box: &ShippingBox,
    orientation: &Orientation,
    degrees: u32,
    level: PackingLevel,
    ctx: &EvaluationContext<'_>,
) -> Option<CandidateResult> {
    let [length, thickness] = orientation.cross;
    let (extent_major, extent_minor) =
        tilted_footprint(length, thickness, (degrees as f64).to_radians());

    let [major_slot, minor_slot] = shipping_box.cross_slots();
    // Largest axis-aligned item the tilted position can hold.
    let mut effective = Dims3::zero();
    effective[shipping_box.open_axis] = shipping_box.open_length();
    effective[major_slot] = length + (shipping_box.cross_section_major() - extent_major);
    effective[minor_slot] = thickness + (shipping_box.cross_section_minor() - extent_minor);

    let clearance = effective - orientation.in_box_frame(shipping_box);
    if clearance.min_component() < -EPSILON_GENERAL {
        return None;
    }

    Some(CandidateResult::evaluated(
        StrategyDetail::Diagonal {
            rotation_degrees: degrees as f64,
        },
        level,
        shipping_box.price(level),
        effective,
        clearance.as_array().to_vec(),
        ctx.required(level),
        format!(
            "Tilted {}° corner to corner, internal {}",
            degrees,
            effective.label()
        ),
    ))
}

/// Evaluates every rotation and keeps the feasible one with the lowest tightness score.
pub fn evaluate(
    shipping_box: &ShippingBox,
    item: &Dims3,
    level: PackingLevel,
    ctx: &EvaluationContext<'_>,
) -> CandidateResult {
    if is_degenerate(shipping_box, item) {
        return inapplicable(shipping_box, level, "Degenerate dimensions");
    }
    let straight = shipping_box.sorted_dims - item.sorted_desc();
    if straight.min_component() >= -EPSILON_GENERAL {
        return inapplicable(shipping_box, level, "Item fits without tilting");
    }

    let mut best: Option<CandidateResult> = None;
    for orientation in Orientation::all(item) {
        if orientation.open_extent > shipping_box.open_length() + EPSILON_GENERAL {
            continue;
        }
        for degrees in (ANGLE_STEP_DEGREES..90).step_by(ANGLE_STEP_DEGREES as usize) {
            let Some(candidate) = tilted(shipping_box, &orientation, degrees, level, ctx) else {
                continue;
            };
            let better = best
                .as_ref()
                .is_none_or(|current| candidate.tightness_score < current.tightness_score);
            if better {
                best = Some(candidate);
            }
        }
    }

    best.unwrap_or_else(|| inapplicable(shipping_box, level, "No rotation clears the cross-section"))
}
