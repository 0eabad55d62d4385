//! Loading of store inventories and packing guidelines from YAML.
//!
//! A store file lists the boxes a store keeps in stock and optionally
//! overrides the packing rules per level. The guidelines file carries the
//! engine configuration and the default packing rules.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::engine::{ConfigError, EngineConfig, EngineConfigSource};
use crate::model::{ItemizedPrices, PackingLevel, PriceData, PriceVector, ShippingBox, ValidationError};
use crate::policy::{PackingRule, PackingRules};
use crate::types::{Dims3, format_length};

/// Error while loading a store or guidelines file.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("box #{index} ('{model}') is invalid: {source}")]
    InvalidBox {
        index: usize,
        model: String,
        #[source]
        source: ValidationError,
    },
    #[error("box #{index} ('{model}') has neither 'prices' nor 'itemized-prices'")]
    MissingPrices { index: usize, model: String },
    #[error("packing rule '{level}' has invalid padding: {padding}")]
    InvalidRule { level: PackingLevel, padding: f64 },
    #[error("guidelines are missing the 'recommendation_engine' section")]
    MissingEngineSection,
    #[error("invalid engine configuration: {0}")]
    Engine(#[from] ConfigError),
}

fn read_file(path: &Path) -> Result<String, InventoryError> {
    std::fs::read_to_string(path).map_err(|source| InventoryError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn default_open_dim() -> usize {
    2
}

/// One box entry of a store file.
#[derive(Clone, Debug, Deserialize)]
struct BoxRecord {
    #[serde(rename = "type", default)]
    box_type: Option<String>,
    #[serde(default)]
    model: Option<String>,
    dimensions: Vec<f64>,
    #[serde(default = "default_open_dim")]
    open_dim: usize,
    #[serde(default)]
    alternate_depths: Vec<f64>,
    #[serde(default)]
    prices: Option<[f64; 4]>,
    #[serde(default, rename = "itemized-prices")]
    itemized_prices: Option<ItemizedPrices>,
}

impl BoxRecord {
    fn model_name(&self) -> String {
        self.model.clone().unwrap_or_else(|| {
            let parts: Vec<String> = self.dimensions.iter().map(|d| format_length(*d)).collect();
            format!("Unknown-{}", parts.join("-"))
        })
    }

    fn into_shipping_box(self, index: usize) -> Result<ShippingBox, InventoryError> {
        let model = self.model_name();
        let dims: [f64; 3] = self.dimensions.as_slice().try_into().map_err(|_| {
            InventoryError::InvalidBox {
                index,
                model: model.clone(),
                source: ValidationError::InvalidDimension(format!(
                    "expected 3 dimensions, got {}",
                    self.dimensions.len()
                )),
            }
        })?;

        // itemized pricing wins when both forms are present
        let pricing = match (self.itemized_prices, self.prices) {
            (Some(itemized), _) => PriceData::Itemized(itemized),
            (None, Some(prices)) => PriceData::Flat(PriceVector(prices)),
            (None, None) => return Err(InventoryError::MissingPrices { index, model }),
        };

        ShippingBox::new(
            model.clone(),
            Dims3(dims),
            self.open_dim,
            pricing,
            self.alternate_depths,
        )
        .map_err(|source| InventoryError::InvalidBox {
            index,
            model,
            source,
        })
    }
}

/// Packing rule entry as written in YAML.
#[derive(Clone, Debug, Deserialize)]
struct RuleRecord {
    padding_inches: f64,
    #[serde(default)]
    wizard_description: String,
    #[serde(default)]
    label_instructions: String,
}

impl RuleRecord {
    fn into_rule(self, level: PackingLevel) -> Result<PackingRule, InventoryError> {
        if !self.padding_inches.is_finite() || self.padding_inches < 0.0 {
            return Err(InventoryError::InvalidRule {
                level,
                padding: self.padding_inches,
            });
        }
        Ok(PackingRule {
            level,
            padding_inches: self.padding_inches,
            wizard_description: self.wizard_description,
            label_instructions: self.label_instructions,
            is_custom: false,
        })
    }
}

/// Rules keyed by level name. `basic` is the NoPack level.
#[derive(Clone, Debug, Default, Deserialize)]
struct RuleSet {
    #[serde(default, alias = "no_pack", alias = "nopack")]
    basic: Option<RuleRecord>,
    #[serde(default)]
    standard: Option<RuleRecord>,
    #[serde(default)]
    fragile: Option<RuleRecord>,
    #[serde(default)]
    custom: Option<RuleRecord>,
}

impl RuleSet {
    fn into_rules(self) -> Result<Vec<PackingRule>, InventoryError> {
        [
            (PackingLevel::NoPack, self.basic),
            (PackingLevel::Standard, self.standard),
            (PackingLevel::Fragile, self.fragile),
            (PackingLevel::Custom, self.custom),
        ]
        .into_iter()
        .filter_map(|(level, record)| record.map(|r| r.into_rule(level)))
        .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
struct StoreFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    boxes: Vec<serde_yaml::Value>,
    #[serde(default, rename = "packing-rules", alias = "packing_rules")]
    packing_rules: RuleSet,
}

/// A store's box inventory.
#[derive(Clone, Debug, PartialEq)]
pub struct Store {
    pub name: Option<String>,
    pub boxes: Vec<ShippingBox>,
    /// Store-specific rules that replace the guideline defaults.
    pub rule_overrides: Vec<PackingRule>,
}

impl Store {
    /// Parses a store file. Invalid box records are skipped with a warning.
    pub fn from_yaml_str(contents: &str) -> Result<Self, InventoryError> {
        let file: StoreFile = if contents.trim().is_empty() {
            StoreFile::default()
        } else {
            serde_yaml::from_str::<Option<StoreFile>>(contents)?.unwrap_or_default()
        };

        let mut boxes = Vec::with_capacity(file.boxes.len());
        for (index, value) in file.boxes.into_iter().enumerate() {
            let loaded = serde_yaml::from_value::<BoxRecord>(value)
                .map_err(InventoryError::from)
                .and_then(|record| {
                    if record.box_type.is_none() {
                        warn!(index, "box record has no 'type'");
                    }
                    record.into_shipping_box(index)
                });
            match loaded {
                Ok(shipping_box) => boxes.push(shipping_box),
                Err(err) => warn!(index, error = %err, "skipping box record"),
            }
        }

        Ok(Self {
            name: file.name,
            boxes,
            rule_overrides: file.packing_rules.into_rules()?,
        })
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, InventoryError> {
        let path = path.as_ref();
        let store = Self::from_yaml_str(&read_file(path)?)?;
        info!(
            path = %path.display(),
            boxes = store.boxes.len(),
            overrides = store.rule_overrides.len(),
            "store loaded"
        );
        Ok(store)
    }

    /// Layers this store's overrides on top of `base`.
    pub fn packing_rules(&self, base: PackingRules) -> PackingRules {
        base.with_overrides(self.rule_overrides.iter().cloned())
    }
}

#[derive(Debug, Deserialize)]
struct GuidelinesFile {
    #[serde(default)]
    recommendation_engine: Option<EngineConfigSource>,
    #[serde(flatten)]
    rules: RuleSet,
}

/// Engine configuration and default packing rules.
#[derive(Clone, Debug, PartialEq)]
pub struct Guidelines {
    pub engine: EngineConfig,
    pub rules: PackingRules,
}

impl Guidelines {
    /// Parses a guidelines file. Weights and strategy preferences are mandatory.
    pub fn from_yaml_str(contents: &str) -> Result<Self, InventoryError> {
        let file: GuidelinesFile = serde_yaml::from_str(contents)?;
        let source = file
            .recommendation_engine
            .ok_or(InventoryError::MissingEngineSection)?;
        let engine = EngineConfig::try_from(source)?;
        let rules = PackingRules::reference().with_rules(file.rules.into_rules()?);
        Ok(Self { engine, rules })
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, InventoryError> {
        let path = path.as_ref();
        let guidelines = Self::from_yaml_str(&read_file(path)?)?;
        info!(path = %path.display(), "packing guidelines loaded");
        Ok(guidelines)
    }
}
