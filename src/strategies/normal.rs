//! Normal packing: the item goes in as is, longest side against longest side.

use crate::model::{PackingLevel, ShippingBox};
use crate::types::Dims3;

use super::{CandidateResult, EvaluationContext, StrategyDetail, is_degenerate};

/// Evaluates the box unmodified.
pub fn evaluate(
    shipping_box: &ShippingBox,
    item: &Dims3,
    level: PackingLevel,
    ctx: &EvaluationContext<'_>,
) -> CandidateResult {
    if is_degenerate(shipping_box, item) {
        return CandidateResult::inapplicable(
            StrategyDetail::Normal,
            level,
            shipping_box,
            "Degenerate dimensions",
        );
    }

    let clearance = shipping_box.sorted_dims - item.sorted_desc();
    CandidateResult::evaluated(
        StrategyDetail::Normal,
        level,
        shipping_box.price(level),
        shipping_box.sorted_dims,
        clearance.as_array().to_vec(),
        ctx.required(level),
        format!("Use as is ({})", shipping_box.sorted_dims.label()),
    )
}
