//! Packing-level policy: required clearance per level and feasibility classification.
//!
//! The clearance table is passed into every evaluation instead of being stored
//! on boxes, so one inventory snapshot can serve any rule set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::PackingLevel;
use crate::types::EPSILON_GENERAL;

/// How well an item fits a given interior for a given level.
///
/// Variants are ordered from worst to best.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Feasibility {
    /// Some axis is too short for the item.
    Impossible,
    /// Item fits with zero space on some axis while the level needs cushioning.
    NoSpace,
    /// Some cushioning fits, less than the level asks for.
    Possible,
    /// Every axis has at least the required clearance.
    Fits,
}

impl Feasibility {
    pub const fn code(self) -> &'static str {
        match self {
            Feasibility::Impossible => "impossible",
            Feasibility::NoSpace => "no_space",
            Feasibility::Possible => "possible",
            Feasibility::Fits => "fits",
        }
    }

    #[inline]
    pub const fn is_feasible(self) -> bool {
        !matches!(self, Feasibility::Impossible)
    }
}

impl std::fmt::Display for Feasibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Required total clearance per axis for every packing level.
///
/// Values are the padding on both sides together, i.e. twice the padding inches.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClearanceTable {
    pub no_pack: f64,
    pub standard: f64,
    pub fragile: f64,
    pub custom: f64,
}

impl ClearanceTable {
    pub const REFERENCE: ClearanceTable = ClearanceTable {
        no_pack: 0.0,
        standard: 2.0,
        fragile: 4.0,
        custom: 6.0,
    };

    /// Required clearance for a level.
    #[inline]
    pub fn required(&self, level: PackingLevel) -> f64 {
        match level {
            PackingLevel::NoPack => self.no_pack,
            PackingLevel::Standard => self.standard,
            PackingLevel::Fragile => self.fragile,
            PackingLevel::Custom => self.custom,
        }
    }
}

impl Default for ClearanceTable {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Classifies a set of per-axis clearances against the level's requirement.
///
/// # Examples
/// ```
/// use box_advisor::policy::{classify, Feasibility};
///
/// assert_eq!(classify(&[2.0, 2.0, 2.0], 2.0), Feasibility::Fits);
/// assert_eq!(classify(&[2.0, 0.0, 2.0], 2.0), Feasibility::NoSpace);
/// assert_eq!(classify(&[2.0, -0.5, 2.0], 0.0), Feasibility::Impossible);
/// ```
pub fn classify(clearances: &[f64], required: f64) -> Feasibility {
    if clearances.iter().any(|c| c.is_nan() || *c < -EPSILON_GENERAL) {
        return Feasibility::Impossible;
    }
    if required > EPSILON_GENERAL && clearances.iter().any(|c| c.abs() <= EPSILON_GENERAL) {
        return Feasibility::NoSpace;
    }
    if clearances.iter().any(|c| *c < required - EPSILON_GENERAL) {
        return Feasibility::Possible;
    }
    Feasibility::Fits
}

/// Sum of squared clearances. Lower means a snugger fit.
#[inline]
pub fn tightness_score(clearances: &[f64]) -> f64 {
    clearances.iter().map(|c| c * c).sum()
}

/// Packing rule for one level as maintained by a store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PackingRule {
    pub level: PackingLevel,
    /// Padding between item and box wall, per side.
    pub padding_inches: f64,
    #[serde(default)]
    pub wizard_description: String,
    #[serde(default)]
    pub label_instructions: String,
    #[serde(default)]
    pub is_custom: bool,
}

impl PackingRule {
    fn reference(level: PackingLevel) -> Self {
        let (padding_inches, wizard_description) = match level {
            PackingLevel::NoPack => (0.0, "For non-sensitive items like clothing, toys, books"),
            PackingLevel::Standard => (
                1.0,
                "For electronics, jewelry, and medium-sensitive items",
            ),
            PackingLevel::Fragile => (2.0, "For china, crystal, art, and sensitive equipment"),
            PackingLevel::Custom => (3.0, "Maximum protection for highly sensitive items"),
        };
        Self {
            level,
            padding_inches,
            wizard_description: wizard_description.to_string(),
            label_instructions: String::new(),
            is_custom: false,
        }
    }

    /// Clearance required across one axis: padding on both sides.
    #[inline]
    pub fn required_clearance(&self) -> f64 {
        self.padding_inches * 2.0
    }
}

/// Effective packing rules: store overrides layered over the defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct PackingRules {
    rules: BTreeMap<PackingLevel, PackingRule>,
}

impl PackingRules {
    /// The default rule set (0/1/2/3 inches of padding).
    pub fn reference() -> Self {
        Self {
            rules: PackingLevel::ALL
                .iter()
                .map(|&level| (level, PackingRule::reference(level)))
                .collect(),
        }
    }

    /// Replaces the rule for each level present in `overrides`.
    ///
    /// Overrides are flagged as custom; levels without an override keep their current rule.
    pub fn with_overrides(self, overrides: impl IntoIterator<Item = PackingRule>) -> Self {
        self.with_rules(overrides.into_iter().map(|mut rule| {
            rule.is_custom = true;
            rule
        }))
    }

    /// Replaces the rule for each level present in `rules`, keeping their flags.
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = PackingRule>) -> Self {
        for rule in rules {
            self.rules.insert(rule.level, rule);
        }
        self
    }

    pub fn get(&self, level: PackingLevel) -> Option<&PackingRule> {
        self.rules.get(&level)
    }

    /// Rules ordered from NoPack to Custom.
    pub fn effective(&self) -> Vec<PackingRule> {
        self.rules.values().cloned().collect()
    }

    /// Derives the clearance table. Any level missing a rule falls back to the reference value.
    pub fn clearance_table(&self) -> ClearanceTable {
        let required = |level: PackingLevel| {
            self.get(level)
                .map(PackingRule::required_clearance)
                .unwrap_or_else(|| ClearanceTable::REFERENCE.required(level))
        };
        ClearanceTable {
            no_pack: required(PackingLevel::NoPack),
            standard: required(PackingLevel::Standard),
            fragile: required(PackingLevel::Fragile),
            custom: required(PackingLevel::Custom),
        }
    }
}

impl Default for PackingRules {
    fn default() -> Self {
        Self::reference()
    }
}
