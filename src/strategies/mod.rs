//! Packing strategies.
//!
//! Each strategy turns (box, item, level) into one `CandidateResult`. Results
//! that make no sense for a box are returned as `Feasibility::Impossible`
//! instead of an error so the candidate generator stays total.

pub mod cut_down;
pub mod diagonal;
pub mod flattened;
pub mod normal;
pub mod telescoping;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{PackingLevel, ShippingBox};
use crate::policy::{ClearanceTable, Feasibility, classify, tightness_score};
use crate::types::{Dims3, EPSILON_GENERAL};

/// The five ways a box can be used.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Normal,
    CutDown,
    Telescoping,
    Diagonal,
    Flattened,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::Normal,
        StrategyKind::CutDown,
        StrategyKind::Telescoping,
        StrategyKind::Diagonal,
        StrategyKind::Flattened,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            StrategyKind::Normal => "normal",
            StrategyKind::CutDown => "cut_down",
            StrategyKind::Telescoping => "telescoping",
            StrategyKind::Diagonal => "diagonal",
            StrategyKind::Flattened => "flattened",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Strategy-specific outcome. Each variant carries only its own fields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StrategyDetail {
    Normal,
    CutDown { cut_depth: f64, pre_scored: bool },
    Telescoping { box_count: u32 },
    Diagonal { rotation_degrees: f64 },
    Flattened,
}

impl StrategyDetail {
    pub const fn kind(&self) -> StrategyKind {
        match self {
            StrategyDetail::Normal => StrategyKind::Normal,
            StrategyDetail::CutDown { .. } => StrategyKind::CutDown,
            StrategyDetail::Telescoping { .. } => StrategyKind::Telescoping,
            StrategyDetail::Diagonal { .. } => StrategyKind::Diagonal,
            StrategyDetail::Flattened => StrategyKind::Flattened,
        }
    }

    /// Key into the strategy preference table. Cut-down splits into pre-scored and manual.
    pub const fn preference_key(&self) -> &'static str {
        match self {
            StrategyDetail::Normal => "normal",
            StrategyDetail::CutDown {
                pre_scored: true, ..
            } => "prescored",
            StrategyDetail::CutDown {
                pre_scored: false, ..
            } => "manual_cut",
            StrategyDetail::Telescoping { .. } => "telescoping",
            StrategyDetail::Diagonal { .. } => "cheating",
            StrategyDetail::Flattened => "flattened",
        }
    }
}

/// Inputs every strategy reads besides the box and the item.
#[derive(Clone, Copy, Debug)]
pub struct EvaluationContext<'a> {
    pub clearances: &'a ClearanceTable,
    /// Flap overlap lost at every telescoping seam, in inches.
    pub telescoping_overlap: f64,
}

impl EvaluationContext<'_> {
    #[inline]
    pub fn required(&self, level: PackingLevel) -> f64 {
        self.clearances.required(level)
    }
}

/// Outcome of evaluating one strategy on one box.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateResult {
    /// Interior the item effectively gets, in the box's sorted slot order.
    pub effective_dims: Dims3,
    /// Per-axis clearance that was classified. Empty when the strategy does not apply.
    pub clearances: Vec<f64>,
    pub level: PackingLevel,
    pub price: f64,
    pub feasibility: Feasibility,
    pub tightness_score: f64,
    pub detail: StrategyDetail,
    pub note: String,
}

impl CandidateResult {
    pub(crate) fn evaluated(
        detail: StrategyDetail,
        level: PackingLevel,
        price: f64,
        effective_dims: Dims3,
        clearances: Vec<f64>,
        required: f64,
        note: String,
    ) -> Self {
        Self {
            effective_dims,
            feasibility: classify(&clearances, required),
            tightness_score: tightness_score(&clearances),
            clearances,
            level,
            price,
            detail,
            note,
        }
    }

    pub(crate) fn inapplicable(
        detail: StrategyDetail,
        level: PackingLevel,
        shipping_box: &ShippingBox,
        note: impl Into<String>,
    ) -> Self {
        Self {
            effective_dims: shipping_box.sorted_dims,
            clearances: Vec::new(),
            level,
            price: shipping_box.price(level),
            feasibility: Feasibility::Impossible,
            tightness_score: 0.0,
            detail,
            note: note.into(),
        }
    }

    #[inline]
    pub fn strategy(&self) -> StrategyKind {
        self.detail.kind()
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.feasibility.is_feasible()
    }
}

/// One way to hold the item relative to the box's open axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Orientation {
    /// Item extent along the open axis.
    pub open_extent: f64,
    /// Item extents matched against cross-section major and minor.
    pub cross: [f64; 2],
}

impl Orientation {
    /// The three orientations of an item, one per choice of the open-axis dimension.
    pub fn all(item: &Dims3) -> [Orientation; 3] {
        let s = item.sorted_desc();
        [
            Orientation {
                open_extent: s[0],
                cross: [s[1], s[2]],
            },
            Orientation {
                open_extent: s[1],
                cross: [s[0], s[2]],
            },
            Orientation {
                open_extent: s[2],
                cross: [s[0], s[1]],
            },
        ]
    }

    /// True when the cross-section can take the item without any clearance.
    pub fn cross_fits(&self, shipping_box: &ShippingBox) -> bool {
        shipping_box.cross_section_major() - self.cross[0] >= -EPSILON_GENERAL
            && shipping_box.cross_section_minor() - self.cross[1] >= -EPSILON_GENERAL
    }

    /// Item dimensions laid out in the box's sorted slot order.
    pub fn in_box_frame(&self, shipping_box: &ShippingBox) -> Dims3 {
        let [major, minor] = shipping_box.cross_slots();
        let mut frame = Dims3::zero();
        frame[shipping_box.open_axis] = self.open_extent;
        frame[major] = self.cross[0];
        frame[minor] = self.cross[1];
        frame
    }
}

/// Boxes or items that can never produce a candidate.
#[inline]
pub(crate) fn is_degenerate(shipping_box: &ShippingBox, item: &Dims3) -> bool {
    shipping_box.is_degenerate() || !item.is_valid_dimension()
}
