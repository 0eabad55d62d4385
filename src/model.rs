//! Data models for the box recommendation engine.
//!
//! This module defines the inventory-side data structures:
//! - `PackingLevel`: the requested protection level
//! - `PriceVector` / `ItemizedPrices` / `PriceData`: per-level pricing
//! - `ShippingBox`: one box SKU with normalized geometry
//!
//! Boxes are built once from an inventory snapshot and never mutated afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::types::Dims3;

/// Validation error for inventory data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),
    #[error("Invalid open axis: {0}")]
    InvalidOpenAxis(String),
    #[error("Invalid price: {0}")]
    InvalidPrice(String),
    #[error("Unknown packing level: {0}")]
    UnknownLevel(String),
}

/// Protection level requested for a shipment, ordered from least to most protective.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum PackingLevel {
    #[serde(alias = "basic", alias = "nopack", alias = "Basic", alias = "NoPack")]
    NoPack,
    #[serde(alias = "Standard")]
    Standard,
    #[serde(alias = "Fragile")]
    Fragile,
    #[serde(alias = "Custom")]
    Custom,
}

impl PackingLevel {
    pub const ALL: [PackingLevel; 4] = [
        PackingLevel::NoPack,
        PackingLevel::Standard,
        PackingLevel::Fragile,
        PackingLevel::Custom,
    ];

    /// Position in the price vector.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PackingLevel::NoPack => 0,
            PackingLevel::Standard => 1,
            PackingLevel::Fragile => 2,
            PackingLevel::Custom => 3,
        }
    }

    /// The next more protective level. `Custom` is the ceiling and maps to itself.
    pub const fn next_protective(self) -> PackingLevel {
        match self {
            PackingLevel::NoPack => PackingLevel::Standard,
            PackingLevel::Standard => PackingLevel::Fragile,
            PackingLevel::Fragile | PackingLevel::Custom => PackingLevel::Custom,
        }
    }

    pub const fn is_most_protective(self) -> bool {
        matches!(self, PackingLevel::Custom)
    }

    /// Display name, matching the level names used in packing guidelines.
    pub const fn name(self) -> &'static str {
        match self {
            PackingLevel::NoPack => "NoPack",
            PackingLevel::Standard => "Standard",
            PackingLevel::Fragile => "Fragile",
            PackingLevel::Custom => "Custom",
        }
    }
}

impl fmt::Display for PackingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PackingLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', '-', ' '], "").as_str() {
            "nopack" | "basic" => Ok(PackingLevel::NoPack),
            "standard" => Ok(PackingLevel::Standard),
            "fragile" => Ok(PackingLevel::Fragile),
            "custom" => Ok(PackingLevel::Custom),
            _ => Err(ValidationError::UnknownLevel(s.to_string())),
        }
    }
}

/// Uniform per-level price vector (NoPack, Standard, Fragile, Custom).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceVector(pub [f64; 4]);

impl PriceVector {
    #[inline]
    pub fn price(&self, level: PackingLevel) -> f64 {
        self.0[level.index()]
    }
}

/// Itemized cost breakdown as stored in store files.
///
/// Any missing field counts as 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ItemizedPrices {
    pub box_price: f64,
    pub basic_materials: f64,
    pub basic_services: f64,
    pub standard_materials: f64,
    pub standard_services: f64,
    pub fragile_materials: f64,
    pub fragile_services: f64,
    pub custom_materials: f64,
    pub custom_services: f64,
}

impl ItemizedPrices {
    /// Totals per level: box price plus that level's materials and services.
    ///
    /// NoPack is charged the "basic" materials and services.
    pub fn to_price_vector(&self) -> PriceVector {
        PriceVector([
            self.box_price + self.basic_materials + self.basic_services,
            self.box_price + self.standard_materials + self.standard_services,
            self.box_price + self.fragile_materials + self.fragile_services,
            self.box_price + self.custom_materials + self.custom_services,
        ])
    }
}

/// Either pricing form accepted from an inventory.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PriceData {
    Flat(PriceVector),
    Itemized(ItemizedPrices),
}

impl PriceData {
    pub fn to_price_vector(&self) -> PriceVector {
        match self {
            PriceData::Flat(prices) => *prices,
            PriceData::Itemized(itemized) => itemized.to_price_vector(),
        }
    }
}

/// A box SKU with its dimensions sorted and the open axis tracked through the sort.
#[derive(Clone, Debug, PartialEq)]
pub struct ShippingBox {
    pub model: String,
    pub original_dims: Dims3,
    pub sorted_dims: Dims3,
    /// Slot in `sorted_dims` that holds the open (insertion) axis.
    pub open_axis: usize,
    pub prices: PriceVector,
    /// Manufacturer pre-scored depths, ascending.
    pub alternate_depths: Vec<f64>,
}

impl ShippingBox {
    /// Creates a box from raw inventory values.
    ///
    /// `open_axis` is the index of the open axis in `dims` as given. Non-finite
    /// values are rejected; non-positive dimensions are accepted and simply
    /// never produce a feasible candidate.
    ///
    /// # Examples
    /// ```
    /// use box_advisor::model::{PriceData, PriceVector, ShippingBox};
    /// use box_advisor::types::Dims3;
    ///
    /// let b = ShippingBox::new(
    ///     "20x15x10",
    ///     Dims3::new(10.0, 20.0, 15.0),
    ///     0,
    ///     PriceData::Flat(PriceVector([5.0, 7.0, 9.0, 11.0])),
    ///     vec![],
    /// )
    /// .unwrap();
    /// assert_eq!(b.open_axis, 2);
    /// assert_eq!(b.open_length(), 10.0);
    /// ```
    pub fn new(
        model: impl Into<String>,
        dims: Dims3,
        open_axis: usize,
        pricing: PriceData,
        alternate_depths: Vec<f64>,
    ) -> Result<Self, ValidationError> {
        let model = model.into();
        if dims.0.iter().any(|v| !v.is_finite()) {
            return Err(ValidationError::InvalidDimension(format!(
                "box '{}' has non-finite dimensions {:?}",
                model, dims.0
            )));
        }
        if open_axis > 2 {
            return Err(ValidationError::InvalidOpenAxis(format!(
                "box '{}' open axis must be 0, 1 or 2, got: {}",
                model, open_axis
            )));
        }
        let prices = pricing.to_price_vector();
        if prices.0.iter().any(|p| !p.is_finite()) {
            return Err(ValidationError::InvalidPrice(format!(
                "box '{}' has non-finite prices {:?}",
                model, prices.0
            )));
        }

        let (sorted_dims, origin) = dims.sorted_desc_with_origin();
        let open_slot = origin
            .iter()
            .position(|&idx| idx == open_axis)
            .unwrap_or(2);

        let mut depths: Vec<f64> = alternate_depths
            .into_iter()
            .filter(|d| d.is_finite() && *d > 0.0)
            .collect();
        depths.sort_by(f64::total_cmp);
        depths.dedup();

        Ok(Self {
            model,
            original_dims: dims,
            sorted_dims,
            open_axis: open_slot,
            prices,
            alternate_depths: depths,
        })
    }

    /// Length of the open axis before any modification.
    #[inline]
    pub fn open_length(&self) -> f64 {
        self.sorted_dims[self.open_axis]
    }

    /// Sorted slots of the two cross-section axes, larger first.
    #[inline]
    pub fn cross_slots(&self) -> [usize; 2] {
        match self.open_axis {
            0 => [1, 2],
            1 => [0, 2],
            _ => [0, 1],
        }
    }

    #[inline]
    pub fn cross_section_major(&self) -> f64 {
        self.sorted_dims[self.cross_slots()[0]]
    }

    #[inline]
    pub fn cross_section_minor(&self) -> f64 {
        self.sorted_dims[self.cross_slots()[1]]
    }

    /// Flap length of a regular slotted carton: half the minor cross-section side.
    #[inline]
    pub fn flap_length(&self) -> f64 {
        self.cross_section_minor() / 2.0
    }

    #[inline]
    pub fn price(&self, level: PackingLevel) -> f64 {
        self.prices.price(level)
    }

    /// True when the geometry can never hold anything.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !self.sorted_dims.is_valid_dimension()
    }
}
