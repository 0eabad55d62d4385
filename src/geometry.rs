//! Geometric helpers for the packing strategies.
//!
//! This module covers the three non-trivial shapes the strategies reason about:
//! a rectangle tilted inside a cross-section, a box unfolded into a flat sheet,
//! and several boxes telescoped along their open axis.

use crate::model::ShippingBox;

/// Axis-aligned footprint of a `length × thickness` rectangle rotated by `angle` radians.
///
/// # Parameters
/// * `length` - Longer in-plane side of the item
/// * `thickness` - Shorter in-plane side of the item
/// * `angle` - Rotation in radians, 0 meaning `length` lies along the first axis
///
/// # Returns
/// Extent along the first and second axis.
///
/// # Example
/// ```
/// use box_advisor::geometry::tilted_footprint;
///
/// let (a, b) = tilted_footprint(10.0, 2.0, 0.0);
/// assert!((a - 10.0).abs() < 1e-9 && (b - 2.0).abs() < 1e-9);
/// ```
#[inline]
pub fn tilted_footprint(length: f64, thickness: f64, angle: f64) -> (f64, f64) {
    let (sin, cos) = angle.sin_cos();
    (length * cos + thickness * sin, length * sin + thickness * cos)
}

/// A box cut open and laid flat, as used for envelope-style packing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlatSheet {
    /// Open length plus a flap on both ends.
    pub length: f64,
    /// Both cross-section sides side by side.
    pub width: f64,
}

impl FlatSheet {
    /// Unfolds a regular slotted carton.
    pub fn from_box(shipping_box: &ShippingBox) -> Self {
        Self {
            length: shipping_box.open_length() + 2.0 * shipping_box.flap_length(),
            width: shipping_box.cross_section_minor() + shipping_box.cross_section_major(),
        }
    }
}

/// Number of telescoped boxes needed to cover `needed` inches along the open axis.
///
/// Every segment contributes `open_length - overlap`. Returns `None` when a
/// segment would contribute nothing.
pub fn telescoped_box_count(needed: f64, open_length: f64, overlap: f64) -> Option<u32> {
    let usable = open_length - overlap;
    if !(usable > 0.0) || !needed.is_finite() || needed <= 0.0 {
        return None;
    }
    let count = (needed / usable).ceil();
    if count > u32::MAX as f64 {
        return None;
    }
    Some((count as u32).max(1))
}

/// Open-axis length of `count` boxes joined with `overlap` inches of flap overlap per seam.
#[inline]
pub fn telescoped_length(open_length: f64, overlap: f64, count: u32) -> f64 {
    let count = count as f64;
    count * open_length - (count - 1.0).max(0.0) * overlap
}
