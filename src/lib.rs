//! Box recommendation engine.
//!
//! Given an item and a packing level, evaluates every box of an inventory
//! with five packing strategies and returns a ranked list of ways to ship it.
//!
//! # Example
//! ```
//! use box_advisor::{EngineConfig, PackingLevel, PackingRules, compute};
//! use box_advisor::model::{PriceData, PriceVector, ShippingBox};
//! use box_advisor::types::Dims3;
//!
//! let inventory = vec![
//!     ShippingBox::new(
//!         "20x15x10",
//!         Dims3::new(20.0, 15.0, 10.0),
//!         2,
//!         PriceData::Flat(PriceVector([5.0, 7.0, 9.0, 11.0])),
//!         vec![],
//!     )
//!     .unwrap(),
//! ];
//! let recommendations = compute(
//!     &inventory,
//!     &Dims3::new(18.0, 13.0, 8.0),
//!     PackingLevel::Standard,
//!     &PackingRules::reference().clearance_table(),
//!     &EngineConfig::reference_defaults(),
//! );
//! assert_eq!(recommendations[0].box_id, "20x15x10");
//! ```

pub mod api;
pub mod candidates;
pub mod config;
pub mod engine;
pub mod geometry;
pub mod inventory;
pub mod model;
pub mod policy;
pub mod strategies;
pub mod types;

pub use candidates::{Candidate, generate};
pub use engine::{
    ConfigError, EngineConfig, Recommendation, Recommender, StrategyPreferences, Weights, compute,
};
pub use model::{PackingLevel, ShippingBox, ValidationError};
pub use policy::{ClearanceTable, Feasibility, PackingRules};
pub use strategies::{CandidateResult, StrategyDetail, StrategyKind};
pub use types::Dims3;
