//! Common types for three-axis box and item geometry.
//!
//! All lengths are inches. Boxes and items are both described by a `Dims3`;
//! the strategies compare them slot by slot after sorting.

use std::ops::{Index, IndexMut, Sub};

use serde::{Deserialize, Serialize};

/// Global numerical tolerance for floating-point comparisons.
///
/// Used whenever a clearance or a price has to be compared for equality.
pub const EPSILON_GENERAL: f64 = 1e-6;

/// Three dimensions of a box, an item or a clearance vector.
///
/// # Examples
/// ```
/// use box_advisor::types::Dims3;
///
/// let box_dims = Dims3::new(20.0, 15.0, 10.0);
/// let item = Dims3::new(18.0, 13.0, 8.0);
/// let clearance = box_dims - item;
/// assert_eq!(clearance.sum_of_squares(), 12.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Dims3(pub [f64; 3]);

impl Dims3 {
    /// Creates a new dimension triple.
    #[inline]
    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self([a, b, c])
    }

    /// All components zero.
    #[inline]
    pub const fn zero() -> Self {
        Self([0.0; 3])
    }

    #[inline]
    pub const fn as_array(&self) -> [f64; 3] {
        self.0
    }

    /// Sum of squared components. Used as the tightness measure of a clearance vector.
    #[inline]
    pub fn sum_of_squares(&self) -> f64 {
        self.0.iter().map(|v| v * v).sum()
    }

    /// Smallest component.
    #[inline]
    pub fn min_component(&self) -> f64 {
        self.0.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Checks if all components are positive and finite.
    #[inline]
    pub fn is_valid_dimension(&self) -> bool {
        self.0.iter().all(|v| *v > 0.0 && v.is_finite())
    }

    /// Returns the components sorted descending.
    pub fn sorted_desc(&self) -> Self {
        let (sorted, _) = self.sorted_desc_with_origin();
        sorted
    }

    /// Sorts descending and reports, for every sorted slot, the index the
    /// value had before sorting.
    ///
    /// Equal values keep their original relative order, so two axes that
    /// share a length never swap identities.
    pub fn sorted_desc_with_origin(&self) -> (Self, [usize; 3]) {
        let mut pairs = [(self.0[0], 0usize), (self.0[1], 1), (self.0[2], 2)];
        pairs.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
        (
            Self([pairs[0].0, pairs[1].0, pairs[2].0]),
            [pairs[0].1, pairs[1].1, pairs[2].1],
        )
    }

    /// Returns a copy with one slot replaced.
    #[inline]
    pub fn with(&self, slot: usize, value: f64) -> Self {
        let mut out = *self;
        out.0[slot] = value;
        out
    }

    /// Formats as `AxBxC` with trailing zeros trimmed.
    pub fn label(&self) -> String {
        format!(
            "{}x{}x{}",
            format_length(self.0[0]),
            format_length(self.0[1]),
            format_length(self.0[2])
        )
    }
}

impl Index<usize> for Dims3 {
    type Output = f64;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IndexMut<usize> for Dims3 {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl Sub for Dims3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self([self.0[0] - rhs.0[0], self.0[1] - rhs.0[1], self.0[2] - rhs.0[2]])
    }
}

impl From<[f64; 3]> for Dims3 {
    #[inline]
    fn from(value: [f64; 3]) -> Self {
        Self(value)
    }
}

impl From<Dims3> for [f64; 3] {
    #[inline]
    fn from(value: Dims3) -> Self {
        value.0
    }
}

/// Renders a length with at most two decimals and no trailing zeros.
pub fn format_length(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let text = format!("{:.2}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Equality within `EPSILON_GENERAL`.
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON_GENERAL
}
