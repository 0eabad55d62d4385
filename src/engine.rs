//! Scoring and ranking of packing candidates.
//!
//! This module turns the feasible candidates for one item into an ordered
//! recommendation list:
//! - price and tightness are min-max normalized across all candidates
//! - the strategy preference (0–10) becomes a penalty in [0, 1]
//! - a weighted sum of the three gives the composite score (lower is better)
//! - the list is deduplicated per (box, strategy), truncated and tagged;
//!   among cut variants of one box the best feasibility is kept

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use utoipa::ToSchema;

use crate::candidates::{Candidate, generate};
use crate::model::{PackingLevel, ShippingBox};
use crate::policy::{ClearanceTable, Feasibility};
use crate::strategies::{CandidateResult, StrategyDetail, StrategyKind};
use crate::types::{Dims3, EPSILON_GENERAL, approx_eq};

/// Invalid engine configuration. The only fatal error of the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("engine configuration is missing 'weights'")]
    MissingWeights,
    #[error("engine configuration is missing 'strategy_preferences'")]
    MissingStrategyPreferences,
    #[error("strategy preferences must define '{0}'")]
    MissingPreference(String),
    #[error("strategy preference '{key}' must be between 0 and 10, got: {value}")]
    PreferenceOutOfRange { key: String, value: f64 },
    #[error("extreme_cut_threshold must be in (0, 1], got: {0}")]
    InvalidExtremeCutThreshold(f64),
    #[error("max_recommendations must be at least 1")]
    InvalidMaxRecommendations,
    #[error("telescoping_overlap must be a non-negative number, got: {0}")]
    InvalidTelescopingOverlap(f64),
    #[error("practically_tight_threshold must be finite, got: {0}")]
    InvalidPracticallyTightThreshold(f64),
}

/// Weights of the composite score. Not required to sum to 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Weights {
    pub price: f64,
    pub efficiency: f64,
    pub ease: f64,
}

impl Weights {
    pub const fn new(price: f64, efficiency: f64, ease: f64) -> Self {
        Self {
            price,
            efficiency,
            ease,
        }
    }
}

/// Strategy preference on a 0 (preferred) to 10 (avoid) scale.
///
/// Keys: `normal`, `prescored`, `manual_cut`, `telescoping`, `cheating`, `flattened`.
/// A key that is not present falls back to `manual_cut`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(
    try_from = "BTreeMap<String, f64>",
    into = "BTreeMap<String, f64>"
)]
pub struct StrategyPreferences(BTreeMap<String, f64>);

impl TryFrom<BTreeMap<String, f64>> for StrategyPreferences {
    type Error = ConfigError;

    fn try_from(values: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<StrategyPreferences> for BTreeMap<String, f64> {
    fn from(preferences: StrategyPreferences) -> Self {
        preferences.0
    }
}

impl StrategyPreferences {
    pub const FALLBACK_KEY: &'static str = "manual_cut";

    /// Validates a preference table.
    pub fn new(values: BTreeMap<String, f64>) -> Result<Self, ConfigError> {
        if !values.contains_key(Self::FALLBACK_KEY) {
            return Err(ConfigError::MissingPreference(Self::FALLBACK_KEY.to_string()));
        }
        if let Some((key, value)) = values
            .iter()
            .find(|(_, v)| !(0.0..=10.0).contains(*v))
        {
            return Err(ConfigError::PreferenceOutOfRange {
                key: key.clone(),
                value: *value,
            });
        }
        Ok(Self(values))
    }

    /// Preferences shipped with the default packing guidelines.
    pub fn reference() -> Self {
        Self(
            [
                ("normal", 0.0),
                ("prescored", 1.0),
                ("flattened", 2.0),
                ("manual_cut", 5.0),
                ("telescoping", 6.0),
                ("cheating", 8.0),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        )
    }

    pub fn get(&self, key: &str) -> f64 {
        self.0
            .get(key)
            .or_else(|| self.0.get(Self::FALLBACK_KEY))
            .copied()
            .unwrap_or(10.0)
    }

    /// Preference scaled to [0, 1].
    pub fn penalty(&self, detail: &StrategyDetail) -> f64 {
        self.get(detail.preference_key()) / 10.0
    }
}

/// Configuration of the recommendation engine.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct EngineConfig {
    pub weights: Weights,
    pub strategy_preferences: StrategyPreferences,
    pub max_recommendations: usize,
    /// Manual cuts below this fraction of the open length are excluded.
    pub extreme_cut_threshold: f64,
    /// Standard deviations above the mean tightness still considered efficient.
    pub practically_tight_threshold: f64,
    /// Flap overlap per telescoping seam, in inches.
    pub telescoping_overlap: f64,
}

impl EngineConfig {
    pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 10;
    pub const DEFAULT_EXTREME_CUT_THRESHOLD: f64 = 0.5;
    pub const DEFAULT_PRACTICALLY_TIGHT_THRESHOLD: f64 = 0.5;
    pub const DEFAULT_TELESCOPING_OVERLAP: f64 = 2.0;

    /// Starts a configuration. Weights and preferences have no defaults and must be given.
    pub fn builder(weights: Weights, strategy_preferences: StrategyPreferences) -> EngineConfigBuilder {
        EngineConfigBuilder {
            config: EngineConfig {
                weights,
                strategy_preferences,
                max_recommendations: Self::DEFAULT_MAX_RECOMMENDATIONS,
                extreme_cut_threshold: Self::DEFAULT_EXTREME_CUT_THRESHOLD,
                practically_tight_threshold: Self::DEFAULT_PRACTICALLY_TIGHT_THRESHOLD,
                telescoping_overlap: Self::DEFAULT_TELESCOPING_OVERLAP,
            },
        }
    }

    /// The configuration of the default packing guidelines, for callers that ask for it explicitly.
    pub fn reference_defaults() -> Self {
        Self {
            weights: Weights::new(0.45, 0.25, 0.30),
            strategy_preferences: StrategyPreferences::reference(),
            max_recommendations: Self::DEFAULT_MAX_RECOMMENDATIONS,
            extreme_cut_threshold: Self::DEFAULT_EXTREME_CUT_THRESHOLD,
            practically_tight_threshold: Self::DEFAULT_PRACTICALLY_TIGHT_THRESHOLD,
            telescoping_overlap: Self::DEFAULT_TELESCOPING_OVERLAP,
        }
    }

    /// Reopens a configuration for adjustment, e.g. environment overrides.
    pub fn into_builder(self) -> EngineConfigBuilder {
        EngineConfigBuilder { config: self }
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.max_recommendations == 0 {
            return Err(ConfigError::InvalidMaxRecommendations);
        }
        if !(self.extreme_cut_threshold > 0.0 && self.extreme_cut_threshold <= 1.0) {
            return Err(ConfigError::InvalidExtremeCutThreshold(
                self.extreme_cut_threshold,
            ));
        }
        if !(self.telescoping_overlap >= 0.0 && self.telescoping_overlap.is_finite()) {
            return Err(ConfigError::InvalidTelescopingOverlap(self.telescoping_overlap));
        }
        if !self.practically_tight_threshold.is_finite() {
            return Err(ConfigError::InvalidPracticallyTightThreshold(
                self.practically_tight_threshold,
            ));
        }
        Ok(self)
    }
}

/// Builder for EngineConfig.
#[derive(Clone, Debug)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn max_recommendations(mut self, max: usize) -> Self {
        self.config.max_recommendations = max;
        self
    }

    pub fn extreme_cut_threshold(mut self, threshold: f64) -> Self {
        self.config.extreme_cut_threshold = threshold;
        self
    }

    pub fn practically_tight_threshold(mut self, threshold: f64) -> Self {
        self.config.practically_tight_threshold = threshold;
        self
    }

    pub fn telescoping_overlap(mut self, overlap: f64) -> Self {
        self.config.telescoping_overlap = overlap;
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        self.config.validate()
    }
}

/// Engine configuration as read from a guidelines file, before validation.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct EngineConfigSource {
    pub weights: Option<Weights>,
    pub strategy_preferences: Option<BTreeMap<String, f64>>,
    pub max_recommendations: Option<usize>,
    pub extreme_cut_threshold: Option<f64>,
    pub practically_tight_threshold: Option<f64>,
    pub telescoping_overlap: Option<f64>,
}

impl TryFrom<EngineConfigSource> for EngineConfig {
    type Error = ConfigError;

    fn try_from(source: EngineConfigSource) -> Result<Self, Self::Error> {
        let weights = source.weights.ok_or(ConfigError::MissingWeights)?;
        let preferences = StrategyPreferences::new(
            source
                .strategy_preferences
                .ok_or(ConfigError::MissingStrategyPreferences)?,
        )?;

        let mut builder = EngineConfig::builder(weights, preferences);
        if let Some(max) = source.max_recommendations {
            builder = builder.max_recommendations(max);
        }
        if let Some(threshold) = source.extreme_cut_threshold {
            builder = builder.extreme_cut_threshold(threshold);
        }
        if let Some(threshold) = source.practically_tight_threshold {
            builder = builder.practically_tight_threshold(threshold);
        }
        if let Some(overlap) = source.telescoping_overlap {
            builder = builder.telescoping_overlap(overlap);
        }
        builder.build()
    }
}

/// One ranked way to pack the item.
#[derive(Clone, Debug, PartialEq)]
pub struct Recommendation {
    pub box_index: usize,
    pub box_id: String,
    pub result: CandidateResult,
    pub normalized_price: f64,
    pub normalized_tightness: f64,
    pub strategy_penalty: f64,
    pub composite_score: f64,
    pub tag: String,
    pub tag_class: &'static str,
    pub reason: String,
    /// Tightness within the practically-tight band of the candidate set.
    pub reasonably_efficient: bool,
}

impl Recommendation {
    #[inline]
    pub fn strategy(&self) -> StrategyKind {
        self.result.strategy()
    }

    #[inline]
    pub fn price(&self) -> f64 {
        self.result.price
    }
}

/// Corpus-wide statistics of the candidate set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CandidateStats {
    pub min_price: f64,
    pub max_price: f64,
    pub min_tightness: f64,
    pub max_tightness: f64,
    pub mean_tightness: f64,
    pub stddev_tightness: f64,
}

impl CandidateStats {
    pub fn from_results<'r>(results: impl Iterator<Item = &'r CandidateResult> + Clone) -> Option<Self> {
        let count = results.clone().count();
        if count == 0 {
            return None;
        }
        let mut stats = CandidateStats {
            min_price: f64::INFINITY,
            max_price: f64::NEG_INFINITY,
            min_tightness: f64::INFINITY,
            max_tightness: f64::NEG_INFINITY,
            mean_tightness: 0.0,
            stddev_tightness: 0.0,
        };
        let mut sum = 0.0;
        for result in results.clone() {
            stats.min_price = stats.min_price.min(result.price);
            stats.max_price = stats.max_price.max(result.price);
            stats.min_tightness = stats.min_tightness.min(result.tightness_score);
            stats.max_tightness = stats.max_tightness.max(result.tightness_score);
            sum += result.tightness_score;
        }
        stats.mean_tightness = sum / count as f64;
        let variance = results
            .map(|r| (r.tightness_score - stats.mean_tightness).powi(2))
            .sum::<f64>()
            / count as f64;
        stats.stddev_tightness = variance.sqrt();
        Some(stats)
    }
}

/// Min-max normalization to [0, 1]; a flat range normalizes to 0.
#[inline]
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    if range.abs() <= EPSILON_GENERAL {
        0.0
    } else {
        (value - min) / range
    }
}

/// Tag and tag class for a strategy, before price or fit highlights.
pub fn base_tag(detail: &StrategyDetail) -> (&'static str, &'static str) {
    match detail {
        StrategyDetail::Normal => ("No Modifications", "normal"),
        StrategyDetail::CutDown {
            pre_scored: true, ..
        } => ("Pre-Scored Cut", "prescored"),
        StrategyDetail::CutDown {
            pre_scored: false, ..
        } => ("Manual Cut Required", "manual-cut"),
        StrategyDetail::Telescoping { .. } => ("Multiple Boxes", "telescoping"),
        StrategyDetail::Diagonal { .. } => ("Diagonal Pack", "diagonal"),
        StrategyDetail::Flattened => ("Flat Pack", "flat"),
    }
}

/// Reason line. The telescoping box count is read from the variant, not parsed out of the note.
fn reason_for(detail: &StrategyDetail) -> String {
    match detail {
        StrategyDetail::Telescoping { box_count } => format!("Uses {} boxes", box_count),
        _ => String::new(),
    }
}

/// Scores, deduplicates, truncates and tags a candidate set.
pub fn rank(candidates: Vec<Candidate<'_>>, config: &EngineConfig) -> Vec<Recommendation> {
    let Some(stats) = CandidateStats::from_results(candidates.iter().map(|c| &c.result)) else {
        return Vec::new();
    };
    let weights = config.weights;
    let efficient_limit =
        stats.mean_tightness + config.practically_tight_threshold * stats.stddev_tightness;

    let mut scored: Vec<Recommendation> = candidates
        .into_iter()
        .map(|candidate| {
            let result = candidate.result;
            let normalized_price = normalize(result.price, stats.min_price, stats.max_price);
            let normalized_tightness =
                normalize(result.tightness_score, stats.min_tightness, stats.max_tightness);
            let strategy_penalty = config.strategy_preferences.penalty(&result.detail);
            let composite_score = weights.price * normalized_price
                + weights.efficiency * normalized_tightness
                + weights.ease * strategy_penalty;

            let (base, mut tag_class) = base_tag(&result.detail);
            let tag = if approx_eq(result.price, stats.min_price) {
                tag_class = "price";
                format!("{} · Lowest Price", base)
            } else if approx_eq(result.tightness_score, stats.min_tightness) {
                format!("{} · Tightest Fit", base)
            } else {
                base.to_string()
            };

            Recommendation {
                box_index: candidate.box_index,
                box_id: candidate.shipping_box.model.clone(),
                reason: reason_for(&result.detail),
                reasonably_efficient: result.tightness_score <= efficient_limit + EPSILON_GENERAL,
                result,
                normalized_price,
                normalized_tightness,
                strategy_penalty,
                composite_score,
                tag,
                tag_class,
            }
        })
        .collect();

    scored.sort_by(|a, b| a.composite_score.total_cmp(&b.composite_score));

    let total = scored.len();
    // Competing cut variants of one box: best feasibility wins, then the lowest score.
    let mut best: HashMap<(usize, StrategyKind), Feasibility> = HashMap::new();
    for rec in &scored {
        let entry = best
            .entry((rec.box_index, rec.strategy()))
            .or_insert(rec.result.feasibility);
        *entry = (*entry).max(rec.result.feasibility);
    }
    let mut seen: HashSet<(usize, StrategyKind)> = HashSet::new();
    scored.retain(|rec| {
        let key = (rec.box_index, rec.strategy());
        best.get(&key) == Some(&rec.result.feasibility) && seen.insert(key)
    });
    let unique = scored.len();
    scored.truncate(config.max_recommendations);

    debug!(
        candidates = total,
        unique,
        returned = scored.len(),
        "ranking finished"
    );
    scored
}

/// Recommends the best ways to pack `item` at `level` from `inventory`.
pub fn compute(
    inventory: &[ShippingBox],
    item: &Dims3,
    level: PackingLevel,
    clearances: &ClearanceTable,
    config: &EngineConfig,
) -> Vec<Recommendation> {
    let candidates = generate(inventory, item, level, clearances, config);
    rank(candidates, config)
}

/// Engine bound to one configuration and clearance table.
#[derive(Clone, Debug)]
pub struct Recommender {
    config: EngineConfig,
    clearances: ClearanceTable,
}

impl Recommender {
    pub fn new(config: EngineConfig, clearances: ClearanceTable) -> Self {
        Self { config, clearances }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clearances(&self) -> &ClearanceTable {
        &self.clearances
    }

    pub fn compute(
        &self,
        inventory: &[ShippingBox],
        item: &Dims3,
        level: PackingLevel,
    ) -> Vec<Recommendation> {
        compute(inventory, item, level, &self.clearances, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PriceData, PriceVector};
    use crate::strategies::test_support::reference_box;

    fn priced_box(model: &str, dims: Dims3, price: f64) -> ShippingBox {
        ShippingBox::new(
            model,
            dims,
            2,
            PriceData::Flat(PriceVector([price; 4])),
            vec![],
        )
        .unwrap()
    }

    fn result(detail: StrategyDetail, price: f64, tightness: f64) -> CandidateResult {
        CandidateResult {
            effective_dims: Dims3::new(10.0, 10.0, 10.0),
            clearances: vec![],
            level: PackingLevel::Standard,
            price,
            feasibility: Feasibility::Fits,
            tightness_score: tightness,
            detail,
            note: String::new(),
        }
    }

    fn price_only() -> EngineConfig {
        EngineConfig::builder(Weights::new(1.0, 0.0, 0.0), StrategyPreferences::reference())
            .build()
            .unwrap()
    }

    #[test]
    fn construction_requires_weights_and_preferences() {
        let missing_weights = EngineConfigSource {
            strategy_preferences: Some(BTreeMap::from([("manual_cut".to_string(), 5.0)])),
            ..Default::default()
        };
        assert_eq!(
            EngineConfig::try_from(missing_weights),
            Err(ConfigError::MissingWeights)
        );

        let missing_preferences = EngineConfigSource {
            weights: Some(Weights::new(0.5, 0.5, 0.5)),
            ..Default::default()
        };
        assert_eq!(
            EngineConfig::try_from(missing_preferences),
            Err(ConfigError::MissingStrategyPreferences)
        );
    }

    #[test]
    fn preferences_are_range_checked() {
        let err = StrategyPreferences::new(BTreeMap::from([
            ("manual_cut".to_string(), 5.0),
            ("cheating".to_string(), 11.0),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::PreferenceOutOfRange { .. }));
    }

    #[test]
    fn deserialized_preferences_are_validated() {
        let out_of_range =
            serde_json::from_str::<StrategyPreferences>(r#"{"cheating": 11, "manual_cut": 5}"#);
        assert!(out_of_range.is_err());

        let missing_fallback = serde_json::from_str::<StrategyPreferences>(r#"{"normal": 0}"#);
        assert!(missing_fallback.is_err());

        let prefs: StrategyPreferences =
            serde_json::from_str(r#"{"manual_cut": 5, "normal": 0}"#).unwrap();
        assert_eq!(prefs.get("normal"), 0.0);
        assert_eq!(
            serde_json::to_value(&prefs).unwrap(),
            serde_json::json!({"manual_cut": 5.0, "normal": 0.0})
        );
    }

    #[test]
    fn unknown_strategy_key_falls_back_to_manual_cut() {
        let prefs = StrategyPreferences::new(BTreeMap::from([
            ("manual_cut".to_string(), 7.0),
            ("normal".to_string(), 1.0),
        ]))
        .unwrap();
        assert_eq!(prefs.get("telescoping"), 7.0);
        assert_eq!(prefs.penalty(&StrategyDetail::Flattened), 0.7);
        assert_eq!(prefs.penalty(&StrategyDetail::Normal), 0.1);
    }

    #[test]
    fn weights_are_used_unnormalized() {
        let config = EngineConfig::builder(Weights::new(2.0, 3.0, 4.0), StrategyPreferences::reference())
            .build()
            .unwrap();
        assert_eq!(config.weights.price + config.weights.efficiency + config.weights.ease, 9.0);
    }

    #[test]
    fn builder_rejects_bad_thresholds() {
        let base = || EngineConfig::builder(Weights::new(1.0, 0.0, 0.0), StrategyPreferences::reference());
        assert!(matches!(
            base().extreme_cut_threshold(0.0).build(),
            Err(ConfigError::InvalidExtremeCutThreshold(_))
        ));
        assert!(matches!(
            base().max_recommendations(0).build(),
            Err(ConfigError::InvalidMaxRecommendations)
        ));
        assert!(matches!(
            base().telescoping_overlap(-1.0).build(),
            Err(ConfigError::InvalidTelescopingOverlap(_))
        ));
    }

    #[test]
    fn normalize_flat_range_is_zero() {
        assert_eq!(normalize(5.0, 5.0, 5.0), 0.0);
        assert_eq!(normalize(7.5, 5.0, 10.0), 0.5);
    }

    #[test]
    fn cheaper_candidate_scores_lower_with_price_only_weights() {
        let a = priced_box("A", Dims3::new(20.0, 15.0, 10.0), 4.0);
        let b = priced_box("B", Dims3::new(20.0, 15.0, 10.0), 9.0);
        let candidates = vec![
            Candidate {
                box_index: 1,
                shipping_box: &b,
                result: result(StrategyDetail::Normal, 9.0, 12.0),
            },
            Candidate {
                box_index: 0,
                shipping_box: &a,
                result: result(StrategyDetail::Normal, 4.0, 12.0),
            },
        ];
        let ranked = rank(candidates, &price_only());
        assert_eq!(ranked[0].box_id, "A");
        assert!(ranked[0].composite_score <= ranked[1].composite_score);
        assert_eq!(ranked[0].tag, "No Modifications · Lowest Price");
        assert_eq!(ranked[0].tag_class, "price");
        // equal tightness everywhere: both hold the minimum
        assert_eq!(ranked[1].tag, "No Modifications · Tightest Fit");
        assert_eq!(ranked[1].tag_class, "normal");
    }

    #[test]
    fn dedup_keeps_best_cut_variant_per_box() {
        let b = reference_box(vec![4.0, 6.0]);
        let config = EngineConfig::builder(Weights::new(0.0, 1.0, 0.0), StrategyPreferences::reference())
            .build()
            .unwrap();
        let candidates = vec![
            Candidate {
                box_index: 0,
                shipping_box: &b,
                result: result(
                    StrategyDetail::CutDown {
                        cut_depth: 6.0,
                        pre_scored: true,
                    },
                    7.0,
                    20.0,
                ),
            },
            Candidate {
                box_index: 0,
                shipping_box: &b,
                result: result(
                    StrategyDetail::CutDown {
                        cut_depth: 4.0,
                        pre_scored: true,
                    },
                    7.0,
                    5.0,
                ),
            },
            Candidate {
                box_index: 0,
                shipping_box: &b,
                result: result(StrategyDetail::Normal, 7.0, 30.0),
            },
        ];
        let ranked = rank(candidates, &config);
        assert_eq!(ranked.len(), 2);
        assert_eq!(
            ranked[0].result.detail,
            StrategyDetail::CutDown {
                cut_depth: 4.0,
                pre_scored: true
            }
        );
        assert_eq!(ranked[1].strategy(), StrategyKind::Normal);
    }

    #[test]
    fn dedup_prefers_a_fitting_cut_over_a_tighter_partial_one() {
        let b = reference_box(vec![4.0, 6.0]);
        let mut shallow = result(
            StrategyDetail::CutDown {
                cut_depth: 4.0,
                pre_scored: true,
            },
            7.0,
            9.0,
        );
        shallow.feasibility = Feasibility::Possible;
        let deep = result(
            StrategyDetail::CutDown {
                cut_depth: 6.0,
                pre_scored: true,
            },
            7.0,
            12.0,
        );
        let candidates = vec![
            Candidate {
                box_index: 0,
                shipping_box: &b,
                result: shallow,
            },
            Candidate {
                box_index: 0,
                shipping_box: &b,
                result: deep,
            },
        ];

        let ranked = rank(candidates, &EngineConfig::reference_defaults());
        assert_eq!(ranked.len(), 1);
        assert_eq!(
            ranked[0].result.detail,
            StrategyDetail::CutDown {
                cut_depth: 6.0,
                pre_scored: true
            }
        );
        assert_eq!(ranked[0].result.feasibility, Feasibility::Fits);
    }

    #[test]
    fn telescoping_reason_reports_box_count() {
        let b = reference_box(vec![]);
        let candidates = vec![Candidate {
            box_index: 0,
            shipping_box: &b,
            result: result(StrategyDetail::Telescoping { box_count: 3 }, 23.0, 10.0),
        }];
        let ranked = rank(candidates, &price_only());
        // the note is empty; the count comes from the variant
        assert!(ranked[0].result.note.is_empty());
        assert_eq!(ranked[0].reason, "Uses 3 boxes");
        assert!(ranked[0].tag.starts_with("Multiple Boxes"));
    }

    #[test]
    fn stats_flag_reasonably_efficient_candidates() {
        let b = reference_box(vec![]);
        let config = EngineConfig::builder(Weights::new(1.0, 0.0, 0.0), StrategyPreferences::reference())
            .practically_tight_threshold(0.0)
            .build()
            .unwrap();
        let candidates = [2.0, 4.0, 30.0]
            .into_iter()
            .enumerate()
            .map(|(i, t)| Candidate {
                box_index: i,
                shipping_box: &b,
                result: result(StrategyDetail::Normal, 5.0, t),
            })
            .collect();
        let ranked = rank(candidates, &config);
        assert_eq!(ranked.len(), 3);
        let efficient: Vec<bool> = ranked
            .iter()
            .map(|r| (r.result.tightness_score, r.reasonably_efficient))
            .filter(|(t, _)| *t > 20.0)
            .map(|(_, e)| e)
            .collect();
        assert_eq!(efficient, vec![false]);
        assert_eq!(ranked.iter().filter(|r| r.reasonably_efficient).count(), 2);
    }

    #[test]
    fn empty_candidate_set_ranks_to_nothing() {
        assert!(rank(Vec::new(), &price_only()).is_empty());
    }
}
