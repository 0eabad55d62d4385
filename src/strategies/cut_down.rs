//! Cut-down packing: shorten the box along its open axis.
//!
//! A pre-scored depth is preferred when one is deep enough. Otherwise the box
//! is cut by hand to exactly the needed depth, never deeper than it already is.

use crate::model::{PackingLevel, ShippingBox};
use crate::policy::Feasibility;
use crate::types::{Dims3, EPSILON_GENERAL};

use super::{CandidateResult, EvaluationContext, Orientation, StrategyDetail, is_degenerate};

/// Where to cut, before any depth has been picked.
#[derive(Clone, Copy, Debug)]
struct CutPlan {
    orientation: Orientation,
    /// Item extent along the open axis plus the level's clearance.
    needed_depth: f64,
}

fn plan(
    shipping_box: &ShippingBox,
    item: &Dims3,
    level: PackingLevel,
    ctx: &EvaluationContext<'_>,
) -> Option<CutPlan> {
    if is_degenerate(shipping_box, item) {
        return None;
    }
    // Put the shortest dimension that still clears the cross-section on the open axis.
    let orientation = Orientation::all(item)
        .into_iter()
        .filter(|o| o.cross_fits(shipping_box))
        .filter(|o| o.open_extent <= shipping_box.open_length() + EPSILON_GENERAL)
        .min_by(|a, b| a.open_extent.total_cmp(&b.open_extent))?;

    Some(CutPlan {
        orientation,
        needed_depth: orientation.open_extent + ctx.required(level),
    })
}

fn cut_at(
    shipping_box: &ShippingBox,
    plan: &CutPlan,
    depth: f64,
    pre_scored: bool,
    level: PackingLevel,
    ctx: &EvaluationContext<'_>,
) -> CandidateResult {
    let effective = shipping_box
        .sorted_dims
        .with(shipping_box.open_axis, depth);
    let clearance = effective - plan.orientation.in_box_frame(shipping_box);
    let note = if pre_scored {
        format!("Cut at pre-scored line to {}", effective.label())
    } else {
        format!("Cut down to {}", effective.label())
    };

    CandidateResult::evaluated(
        StrategyDetail::CutDown {
            cut_depth: depth,
            pre_scored,
        },
        level,
        shipping_box.price(level),
        effective,
        clearance.as_array().to_vec(),
        ctx.required(level),
        note,
    )
}

const CROSS_SECTION_NOTE: &str = "Item does not fit the cross-section";

/// Pre-scored depths that actually shorten the box.
fn usable_depths(shipping_box: &ShippingBox) -> impl Iterator<Item = f64> + '_ {
    let open_length = shipping_box.open_length();
    shipping_box
        .alternate_depths
        .iter()
        .copied()
        .filter(move |d| *d < open_length - EPSILON_GENERAL)
}

/// Shallowest pre-scored depth that leaves room for the item and its clearance.
fn sufficient_depth(shipping_box: &ShippingBox, plan: &CutPlan) -> Option<f64> {
    usable_depths(shipping_box).find(|d| *d >= plan.needed_depth - EPSILON_GENERAL)
}

fn inapplicable(shipping_box: &ShippingBox, level: PackingLevel, note: &str) -> CandidateResult {
    CandidateResult::inapplicable(
        StrategyDetail::CutDown {
            cut_depth: shipping_box.open_length(),
            pre_scored: false,
        },
        level,
        shipping_box,
        note,
    )
}

fn manual_depth(shipping_box: &ShippingBox, plan: &CutPlan) -> f64 {
    plan.needed_depth.min(shipping_box.open_length())
}

/// Cuts by hand to the needed depth.
///
/// A cut at the full open length that already fits removes nothing and is
/// the box packed as is, so it is not offered.
fn manual_cut(
    shipping_box: &ShippingBox,
    plan: &CutPlan,
    level: PackingLevel,
    ctx: &EvaluationContext<'_>,
) -> CandidateResult {
    let depth = manual_depth(shipping_box, plan);
    let result = cut_at(shipping_box, plan, depth, false, level, ctx);
    if depth >= shipping_box.open_length() - EPSILON_GENERAL
        && result.feasibility == Feasibility::Fits
    {
        return inapplicable(shipping_box, level, "Cut would not shorten the box");
    }
    result
}

/// Picks the single cut for this box: the shallowest sufficient pre-scored
/// depth, or a manual cut when none qualifies.
pub fn evaluate(
    shipping_box: &ShippingBox,
    item: &Dims3,
    level: PackingLevel,
    ctx: &EvaluationContext<'_>,
) -> CandidateResult {
    let Some(plan) = plan(shipping_box, item, level, ctx) else {
        return inapplicable(shipping_box, level, CROSS_SECTION_NOTE);
    };

    match sufficient_depth(shipping_box, &plan) {
        Some(depth) => cut_at(shipping_box, &plan, depth, true, level, ctx),
        None => manual_cut(shipping_box, &plan, level, ctx),
    }
}

/// Every cut the ranking stage may choose from: one per pre-scored depth,
/// plus the manual cut when no pre-scored depth is deep enough.
pub fn variants(
    shipping_box: &ShippingBox,
    item: &Dims3,
    level: PackingLevel,
    ctx: &EvaluationContext<'_>,
) -> Vec<CandidateResult> {
    let Some(plan) = plan(shipping_box, item, level, ctx) else {
        return vec![inapplicable(shipping_box, level, CROSS_SECTION_NOTE)];
    };

    let mut results: Vec<CandidateResult> = usable_depths(shipping_box)
        .map(|depth| cut_at(shipping_box, &plan, depth, true, level, ctx))
        .collect();

    if sufficient_depth(shipping_box, &plan).is_none() {
        results.push(manual_cut(shipping_box, &plan, level, ctx));
    }
    results
}
