//! Deterministic simulation module
//!
//! All wheel physics lives here. This module must be pure and deterministic:
//! - One fixed step per tick
//! - Seeded RNG only
//! - Stable iteration order (bucket list order)
//! - No rendering or platform dependencies

pub mod bucket;
pub mod error;
pub mod history;
pub mod tick;
pub mod wheel;

pub use bucket::{Bucket, WheelGeometry};
pub use error::WheelError;
pub use history::TorqueHistory;
pub use tick::{TickReport, tick};
pub use wheel::{Wheel, WheelConfig, WheelSummary};
