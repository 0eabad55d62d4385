//! Candidate generation: every strategy against every box for one item and level.

use tracing::{debug, trace};

use crate::engine::EngineConfig;
use crate::model::{PackingLevel, ShippingBox};
use crate::policy::ClearanceTable;
use crate::strategies::{
    CandidateResult, EvaluationContext, StrategyDetail, cut_down, diagonal, flattened, normal,
    telescoping,
};
use crate::types::{Dims3, EPSILON_GENERAL};

/// A feasible (box, strategy) result.
#[derive(Clone, Debug)]
pub struct Candidate<'a> {
    /// Position of the box in the inventory slice.
    pub box_index: usize,
    pub shipping_box: &'a ShippingBox,
    pub result: CandidateResult,
}

/// Manual cuts shallower than `threshold` × open length destroy too much of the box.
///
/// Pre-scored cuts are never extreme: their depths are fixed by the manufacturer.
pub fn is_extreme_cut(shipping_box: &ShippingBox, result: &CandidateResult, threshold: f64) -> bool {
    match result.detail {
        StrategyDetail::CutDown {
            cut_depth,
            pre_scored: false,
        } => cut_depth < threshold * shipping_box.open_length() - EPSILON_GENERAL,
        _ => false,
    }
}

/// Runs all strategies for one box. Cut-down contributes every variant.
pub fn evaluate_box(
    shipping_box: &ShippingBox,
    item: &Dims3,
    level: PackingLevel,
    ctx: &EvaluationContext<'_>,
) -> Vec<CandidateResult> {
    let mut results = Vec::with_capacity(5 + shipping_box.alternate_depths.len());
    results.push(normal::evaluate(shipping_box, item, level, ctx));
    results.extend(cut_down::variants(shipping_box, item, level, ctx));
    results.push(telescoping::evaluate(shipping_box, item, level, ctx));
    results.push(diagonal::evaluate(shipping_box, item, level, ctx));
    results.push(flattened::evaluate(shipping_box, item, level, ctx));
    results
}

/// Generates all feasible candidates for an item across the inventory.
///
/// Impossible results and extreme manual cuts are dropped.
pub fn generate<'a>(
    inventory: &'a [ShippingBox],
    item: &Dims3,
    level: PackingLevel,
    clearances: &ClearanceTable,
    config: &EngineConfig,
) -> Vec<Candidate<'a>> {
    let ctx = EvaluationContext {
        clearances,
        telescoping_overlap: config.telescoping_overlap,
    };

    let mut candidates = Vec::new();
    let mut dropped_impossible = 0usize;
    let mut dropped_extreme = 0usize;

    for (box_index, shipping_box) in inventory.iter().enumerate() {
        for result in evaluate_box(shipping_box, item, level, &ctx) {
            if !result.is_feasible() {
                dropped_impossible += 1;
                trace!(
                    model = %shipping_box.model,
                    strategy = %result.strategy(),
                    note = %result.note,
                    "candidate impossible"
                );
                continue;
            }
            if is_extreme_cut(shipping_box, &result, config.extreme_cut_threshold) {
                dropped_extreme += 1;
                trace!(model = %shipping_box.model, note = %result.note, "extreme manual cut dropped");
                continue;
            }
            candidates.push(Candidate {
                box_index,
                shipping_box,
                result,
            });
        }
    }

    debug!(
        boxes = inventory.len(),
        candidates = candidates.len(),
        dropped_impossible,
        dropped_extreme,
        "candidate generation finished"
    );
    candidates
}
