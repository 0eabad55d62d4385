//! Flattened packing: use the box as an unfolded sheet for thin items.

use crate::geometry::FlatSheet;
use crate::model::{PackingLevel, ShippingBox};
use crate::types::{Dims3, EPSILON_GENERAL, format_length};

use super::{CandidateResult, EvaluationContext, StrategyDetail, is_degenerate};

/// Thickest item that can go into a flattened box, in inches.
pub const MAX_FLAT_THICKNESS: f64 = 1.0;

/// Evaluates the box as a flat sheet. The item may lie either way round.
pub fn evaluate(
    shipping_box: &ShippingBox,
    item: &Dims3,
    level: PackingLevel,
    ctx: &EvaluationContext<'_>,
) -> CandidateResult {
    if is_degenerate(shipping_box, item) {
        return CandidateResult::inapplicable(
            StrategyDetail::Flattened,
            level,
            shipping_box,
            "Degenerate dimensions",
        );
    }
    let s = item.sorted_desc();
    let thickness = s[2];
    if thickness > MAX_FLAT_THICKNESS + EPSILON_GENERAL {
        return CandidateResult::inapplicable(
            StrategyDetail::Flattened,
            level,
            shipping_box,
            "Item thicker than 1\"",
        );
    }

    let sheet = FlatSheet::from_box(shipping_box);
    let effective = Dims3::new(sheet.length, sheet.width, thickness);
    let note = format!(
        "Flattened to {}x{}",
        format_length(sheet.length),
        format_length(sheet.width)
    );

    [(s[0], s[1]), (s[1], s[0])]
        .into_iter()
        .map(|(along_length, along_width)| {
            CandidateResult::evaluated(
                StrategyDetail::Flattened,
                level,
                shipping_box.price(level),
                effective,
                vec![sheet.length - along_length, sheet.width - along_width],
                ctx.required(level),
                note.clone(),
            )
        })
        .max_by(|a, b| {
            a.feasibility
                .cmp(&b.feasibility)
                .then(b.tightness_score.total_cmp(&a.tightness_score))
        })
        .unwrap_or_else(|| {
            CandidateResult::inapplicable(StrategyDetail::Flattened, level, shipping_box, "")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{ClearanceTable, Feasibility};
    use crate::strategies::test_support::reference_box;

    fn ctx(table: &ClearanceTable) -> EvaluationContext<'_> {
        EvaluationContext {
            clearances: table,
            telescoping_overlap: 2.0,
        }
    }

    #[test]
    fn thin_item_uses_either_orientation() {
        let table = ClearanceTable::REFERENCE;
        // Sheet is 25 x 35; the 30" side only fits along the 35" width.
        let result = evaluate(
            &reference_box(vec![]),
            &Dims3::new(30.0, 20.0, 0.5),
            PackingLevel::Standard,
            &ctx(&table),
        );
        assert_eq!(result.feasibility, Feasibility::Fits);
        assert_eq!(result.clearances, vec![5.0, 5.0]);
        assert_eq!(result.tightness_score, 50.0);
        assert_eq!(result.effective_dims, Dims3::new(25.0, 35.0, 0.5));
        assert_eq!(result.note, "Flattened to 25x35");
    }

    #[test]
    fn one_inch_is_still_flat() {
        let table = ClearanceTable::REFERENCE;
        let result = evaluate(
            &reference_box(vec![]),
            &Dims3::new(10.0, 10.0, 1.0),
            PackingLevel::NoPack,
            &ctx(&table),
        );
        assert!(result.is_feasible());
    }

    #[test]
    fn thick_item_is_impossible_for_every_level_and_size() {
        let table = ClearanceTable::REFERENCE;
        let small = reference_box(vec![]);
        for level in PackingLevel::ALL {
            for item in [Dims3::new(2.0, 2.0, 1.5), Dims3::new(5.0, 1.01, 5.0)] {
                let result = evaluate(&small, &item, level, &ctx(&table));
                assert_eq!(result.feasibility, Feasibility::Impossible);
            }
        }
    }
}
