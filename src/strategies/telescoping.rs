//! Telescoping: join several boxes end to end along the open axis for overlength items.
//!
//! Adjoining boxes overlap by `telescoping_overlap` at every seam, so each
//! segment contributes less than its raw open length. The seam box is packed
//! one protection level higher than requested.

use crate::geometry::{telescoped_box_count, telescoped_length};
use crate::model::{PackingLevel, ShippingBox};
use crate::types::{Dims3, EPSILON_GENERAL};

use super::{CandidateResult, EvaluationContext, Orientation, StrategyDetail, is_degenerate};

/// Price of `box_count` boxes: all but one at `level`, one at the next more
/// protective level. At the top level every box is priced the same.
pub fn telescoped_price(shipping_box: &ShippingBox, level: PackingLevel, box_count: u32) -> f64 {
    let count = box_count as f64;
    if level.is_most_protective() {
        count * shipping_box.price(level)
    } else {
        (count - 1.0) * shipping_box.price(level) + shipping_box.price(level.next_protective())
    }
}

fn inapplicable(
    shipping_box: &ShippingBox,
    level: PackingLevel,
    note: &'static str,
) -> CandidateResult {
    CandidateResult::inapplicable(
        StrategyDetail::Telescoping { box_count: 1 },
        level,
        shipping_box,
        note,
    )
}

/// Evaluates telescoping for an item longer than the box's open axis.
pub fn evaluate(
    shipping_box: &ShippingBox,
    item: &Dims3,
    level: PackingLevel,
    ctx: &EvaluationContext<'_>,
) -> CandidateResult {
    if is_degenerate(shipping_box, item) {
        return inapplicable(shipping_box, level, "Degenerate dimensions");
    }

    let open_length = shipping_box.open_length();
    let fitting: Vec<Orientation> = Orientation::all(item)
        .into_iter()
        .filter(|o| o.cross_fits(shipping_box))
        .collect();
    if fitting.is_empty() {
        return inapplicable(shipping_box, level, "Item does not fit the cross-section");
    }
    if fitting
        .iter()
        .any(|o| o.open_extent <= open_length + EPSILON_GENERAL)
    {
        return inapplicable(shipping_box, level, "Item fits a single box");
    }
    let Some(orientation) = fitting
        .into_iter()
        .min_by(|a, b| a.open_extent.total_cmp(&b.open_extent))
    else {
        return inapplicable(shipping_box, level, "Item does not fit the cross-section");
    };

    let needed = orientation.open_extent + ctx.required(level);
    let Some(box_count) = telescoped_box_count(needed, open_length, ctx.telescoping_overlap)
    else {
        return inapplicable(shipping_box, level, "Box too shallow to telescope");
    };
    let box_count = box_count.max(2);

    let assembled = telescoped_length(open_length, ctx.telescoping_overlap, box_count);
    let effective = shipping_box
        .sorted_dims
        .with(shipping_box.open_axis, assembled);
    let clearance = effective - orientation.in_box_frame(shipping_box);

    CandidateResult::evaluated(
        StrategyDetail::Telescoping { box_count },
        level,
        telescoped_price(shipping_box, level, box_count),
        effective,
        clearance.as_array().to_vec(),
        ctx.required(level),
        format!("Telescoped to {} using {} boxes", effective.label(), box_count),
    )
}
