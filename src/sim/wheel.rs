//! The wheel: ordered buckets, tunable rates, and the shared rotation
//!
//! Every bucket stores a fixed slot offset; the wheel holds the single
//! rotation scalar they all share. Only `rotate_all` moves the wheel, so the
//! bucket set always turns as one rigid body.

use std::f32::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::bucket::{Bucket, WheelGeometry};
use super::error::{Result, WheelError};
use super::history::TorqueHistory;
use crate::consts::*;
use crate::normalize_angle;

/// Construction parameters for a [`Wheel`]
#[derive(Debug, Clone)]
pub struct WheelConfig {
    pub num_buckets: usize,
    pub fill_rate: f32,
    pub drain_rate: f32,
    pub friction: f32,
    pub geometry: WheelGeometry,
    pub base_bucket_size: f32,
    /// New buckets start with a mass in `[0, initial_mass_max)`
    pub initial_mass_max: f32,
    pub torque_history_len: usize,
    pub seed: u64,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            num_buckets: DEFAULT_NUM_BUCKETS,
            fill_rate: DEFAULT_FILL_RATE,
            drain_rate: DEFAULT_DRAIN_RATE,
            friction: DEFAULT_FRICTION,
            geometry: WheelGeometry::default(),
            base_bucket_size: BASE_BUCKET_SIZE,
            initial_mass_max: INITIAL_MASS_MAX,
            torque_history_len: TORQUE_HISTORY_LEN,
            seed: 0,
        }
    }
}

/// Compact view of the wheel for logs and headless output
#[derive(Debug, Clone, Serialize)]
pub struct WheelSummary {
    pub time_ticks: u64,
    pub num_buckets: usize,
    pub total_mass: f32,
    pub rotation: f32,
    pub latest_torque: Option<f32>,
    pub fill_rate: f32,
    pub drain_rate: f32,
    pub friction: f32,
}

/// The simulation engine state
#[derive(Debug, Clone)]
pub struct Wheel {
    pub(super) buckets: Vec<Bucket>,
    /// Shared rotation added to every bucket's slot offset
    pub(super) rotation: f32,
    pub(super) fill_rate: f32,
    pub(super) drain_rate: f32,
    pub(super) friction: f32,
    pub(super) geometry: WheelGeometry,
    pub(super) torque_history: TorqueHistory,
    pub(super) time_ticks: u64,
    base_width: f32,
    base_size: f32,
    initial_mass_max: f32,
    rng: Pcg32,
}

impl Wheel {
    /// Build a wheel with `config.num_buckets` randomly filled buckets
    pub fn new(config: WheelConfig) -> Result<Self> {
        if config.num_buckets == 0 {
            return Err(WheelError::ZeroBuckets);
        }

        let mut wheel = Self::empty(&config);
        for _ in 0..config.num_buckets {
            wheel.add_bucket();
        }

        log::info!(
            "Wheel created: {} buckets, fill {}, drain {}, friction {}, seed {}",
            wheel.num_buckets(),
            wheel.fill_rate,
            wheel.drain_rate,
            wheel.friction,
            config.seed
        );
        Ok(wheel)
    }

    /// Build a wheel whose buckets start with exactly `masses`, evenly spaced
    /// in the given order. `config.num_buckets` is ignored.
    pub fn with_initial_masses(config: WheelConfig, masses: &[f32]) -> Result<Self> {
        if masses.is_empty() {
            return Err(WheelError::ZeroBuckets);
        }

        let mut wheel = Self::empty(&config);
        let base_size = wheel.base_size;
        wheel.buckets = masses
            .iter()
            .map(|&mass| Bucket::new(0.0, mass, base_size))
            .collect();
        wheel.respace();
        Ok(wheel)
    }

    fn empty(config: &WheelConfig) -> Self {
        Self {
            buckets: Vec::with_capacity(config.num_buckets),
            rotation: 0.0,
            fill_rate: config.fill_rate,
            drain_rate: config.drain_rate,
            friction: config.friction,
            geometry: config.geometry,
            torque_history: TorqueHistory::new(config.torque_history_len),
            time_ticks: 0,
            base_width: config.base_bucket_size,
            base_size: config.base_bucket_size,
            initial_mass_max: config.initial_mass_max.max(0.0),
            rng: Pcg32::seed_from_u64(config.seed),
        }
    }

    // ------------------------------------------------------------------
    // Bucket count
    // ------------------------------------------------------------------

    /// Append a freshly filled bucket and respace the wheel.
    /// Returns the new bucket count.
    pub fn add_bucket(&mut self) -> usize {
        let mass = self.rng.random::<f32>() * self.initial_mass_max;
        let mut bucket = Bucket::new(0.0, mass, self.base_size);
        bucket.set_base_width(self.base_width);
        self.buckets.push(bucket);
        self.respace();
        log::debug!("Added bucket (mass {:.1}), now {}", mass, self.buckets.len());
        self.buckets.len()
    }

    /// Drop the oldest bucket and respace the survivors.
    /// Returns the new bucket count.
    pub fn remove_bucket(&mut self) -> Result<usize> {
        if self.buckets.len() <= 1 {
            return Err(WheelError::LastBucket);
        }
        let removed = self.buckets.remove(0);
        self.respace();
        log::debug!(
            "Removed bucket (mass {:.1}), now {}",
            removed.mass(),
            self.buckets.len()
        );
        Ok(self.buckets.len())
    }

    /// Add or remove buckets until there are exactly `count`
    pub fn set_bucket_count(&mut self, count: usize) -> Result<()> {
        if count == 0 {
            return Err(WheelError::ZeroBuckets);
        }
        while self.buckets.len() < count {
            self.add_bucket();
        }
        while self.buckets.len() > count {
            self.remove_bucket()?;
        }
        log::info!("Bucket count set to {}", count);
        Ok(())
    }

    /// Spread buckets evenly at `2π / n`, in list order, starting from zero.
    /// Drops any rotation accumulated so far.
    fn respace(&mut self) {
        let angle_delta = TAU / self.buckets.len() as f32;
        for (i, bucket) in self.buckets.iter_mut().enumerate() {
            bucket.set_offset(i as f32 * angle_delta);
            // Indices shift on removal; stale render flags would point at the wrong bucket
            bucket.set_fill_target(false);
            bucket.set_drip_target(None);
        }
        self.rotation = 0.0;
        self.refresh_geometry();
    }

    // ------------------------------------------------------------------
    // Rates
    // ------------------------------------------------------------------

    pub fn set_fill_rate(&mut self, rate: f32) {
        if let Some(rate) = accept_finite("fill rate", rate) {
            self.fill_rate = rate;
        }
    }

    pub fn set_drip_rate(&mut self, rate: f32) {
        if let Some(rate) = accept_finite("drip rate", rate) {
            self.drain_rate = rate;
        }
    }

    pub fn set_friction(&mut self, friction: f32) {
        if let Some(friction) = accept_finite("friction", friction) {
            self.friction = friction;
        }
    }

    /// Change the base render width of every bucket, current and future
    pub fn set_base_bucket_width(&mut self, width: f32) {
        if let Some(width) = accept_finite("base bucket width", width) {
            self.base_width = width;
            for bucket in &mut self.buckets {
                bucket.set_base_width(width);
            }
        }
    }

    // ------------------------------------------------------------------
    // Motion
    // ------------------------------------------------------------------

    /// Turn the whole wheel by `delta` radians
    pub(super) fn rotate_all(&mut self, delta: f32) {
        if !delta.is_finite() {
            log::warn!("Skipping non-finite rotation step: {}", delta);
            return;
        }
        self.rotation = normalize_angle(self.rotation + delta);
        self.refresh_geometry();
    }

    /// Recompute every bucket's angle and screen position
    pub fn refresh_geometry(&mut self) {
        let rotation = self.rotation;
        let geometry = self.geometry;
        for bucket in &mut self.buckets {
            bucket.update_position(rotation, &geometry);
        }
    }

    // ------------------------------------------------------------------
    // Read-only views
    // ------------------------------------------------------------------

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    pub fn fill_rate(&self) -> f32 {
        self.fill_rate
    }

    pub fn drain_rate(&self) -> f32 {
        self.drain_rate
    }

    pub fn friction(&self) -> f32 {
        self.friction
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn geometry(&self) -> &WheelGeometry {
        &self.geometry
    }

    pub fn spout_x(&self) -> f32 {
        self.geometry.spout_x
    }

    pub fn torque_history(&self) -> &TorqueHistory {
        &self.torque_history
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn total_mass(&self) -> f32 {
        self.buckets.iter().map(Bucket::mass).sum()
    }

    pub fn summary(&self) -> WheelSummary {
        WheelSummary {
            time_ticks: self.time_ticks,
            num_buckets: self.buckets.len(),
            total_mass: self.total_mass(),
            rotation: self.rotation,
            latest_torque: self.torque_history.latest(),
            fill_rate: self.fill_rate,
            drain_rate: self.drain_rate,
            friction: self.friction,
        }
    }
}

fn accept_finite(name: &str, value: f32) -> Option<f32> {
    if value.is_finite() {
        Some(value)
    } else {
        log::warn!("Ignoring non-finite {}: {}", name, value);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(num_buckets: usize) -> WheelConfig {
        WheelConfig {
            num_buckets,
            seed: 12345,
            ..Default::default()
        }
    }

    fn offsets(wheel: &Wheel) -> Vec<f32> {
        wheel.buckets().iter().map(Bucket::offset).collect()
    }

    #[test]
    fn test_zero_buckets_rejected() {
        assert_eq!(Wheel::new(config(0)).unwrap_err(), WheelError::ZeroBuckets);
        assert_eq!(
            Wheel::with_initial_masses(config(4), &[]).unwrap_err(),
            WheelError::ZeroBuckets
        );
    }

    #[test]
    fn test_initial_masses_in_range() {
        let wheel = Wheel::new(config(16)).unwrap();
        assert_eq!(wheel.num_buckets(), 16);
        for bucket in wheel.buckets() {
            assert!(bucket.mass() >= 0.0 && bucket.mass() < INITIAL_MASS_MAX);
        }
    }

    #[test]
    fn test_same_seed_same_masses() {
        let a = Wheel::new(config(6)).unwrap();
        let b = Wheel::new(config(6)).unwrap();
        let masses = |w: &Wheel| w.buckets().iter().map(Bucket::mass).collect::<Vec<_>>();
        assert_eq!(masses(&a), masses(&b));
    }

    #[test]
    fn test_buckets_evenly_spaced() {
        let wheel = Wheel::new(config(4)).unwrap();
        let expected: Vec<f32> = (0..4).map(|i| i as f32 * (TAU / 4.0)).collect();
        assert_eq!(offsets(&wheel), expected);
    }

    #[test]
    fn test_add_bucket_respaces_over_new_count() {
        let mut wheel = Wheel::with_initial_masses(config(0), &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(wheel.add_bucket(), 4);
        let expected: Vec<f32> = (0..4).map(|i| i as f32 * (TAU / 4.0)).collect();
        assert_eq!(offsets(&wheel), expected);
        // Survivors keep their order; the new bucket is last
        let masses: Vec<f32> = wheel.buckets()[..3].iter().map(Bucket::mass).collect();
        assert_eq!(masses, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_remove_bucket_drops_oldest() {
        let mut wheel = Wheel::with_initial_masses(config(0), &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(wheel.remove_bucket(), Ok(2));
        let masses: Vec<f32> = wheel.buckets().iter().map(Bucket::mass).collect();
        assert_eq!(masses, vec![2.0, 3.0]);
        assert_eq!(offsets(&wheel), vec![0.0, TAU / 2.0]);
    }

    #[test]
    fn test_respacing_resets_rotation() {
        let mut wheel = Wheel::new(config(5)).unwrap();
        for _ in 0..20 {
            wheel.tick();
        }
        assert_ne!(wheel.rotation(), 0.0);

        wheel.add_bucket();
        assert_eq!(wheel.rotation(), 0.0);
        let expected: Vec<f32> = (0..6).map(|i| i as f32 * (TAU / 6.0)).collect();
        assert_eq!(offsets(&wheel), expected);
        for bucket in wheel.buckets() {
            assert_eq!(bucket.angle(), bucket.offset());
        }
    }

    #[test]
    fn test_remove_last_bucket_rejected() {
        let mut wheel = Wheel::with_initial_masses(config(0), &[7.0]).unwrap();
        assert_eq!(wheel.remove_bucket(), Err(WheelError::LastBucket));
        assert_eq!(wheel.num_buckets(), 1);
        assert_eq!(wheel.buckets()[0].mass(), 7.0);
    }

    #[test]
    fn test_add_then_remove_restores_count() {
        let mut wheel = Wheel::new(config(5)).unwrap();
        wheel.add_bucket();
        wheel.remove_bucket().unwrap();
        assert_eq!(wheel.num_buckets(), 5);
    }

    #[test]
    fn test_set_bucket_count() {
        let mut wheel = Wheel::new(config(5)).unwrap();
        wheel.set_bucket_count(9).unwrap();
        assert_eq!(wheel.num_buckets(), 9);
        wheel.set_bucket_count(2).unwrap();
        assert_eq!(wheel.num_buckets(), 2);

        let before: Vec<f32> = wheel.buckets().iter().map(Bucket::mass).collect();
        assert_eq!(wheel.set_bucket_count(0), Err(WheelError::ZeroBuckets));
        let after: Vec<f32> = wheel.buckets().iter().map(Bucket::mass).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_setters_ignore_non_finite() {
        let mut wheel = Wheel::new(config(3)).unwrap();
        wheel.set_fill_rate(12.0);
        wheel.set_fill_rate(f32::NAN);
        assert_eq!(wheel.fill_rate(), 12.0);

        wheel.set_drip_rate(-3.0);
        wheel.set_drip_rate(f32::INFINITY);
        assert_eq!(wheel.drain_rate(), -3.0);

        wheel.set_friction(0.5);
        wheel.set_friction(f32::NEG_INFINITY);
        assert_eq!(wheel.friction(), 0.5);
    }

    #[test]
    fn test_base_width_applies_to_new_buckets() {
        let mut wheel = Wheel::new(config(3)).unwrap();
        wheel.set_base_bucket_width(25.0);
        wheel.add_bucket();
        assert!(wheel.buckets().iter().all(|b| b.base_width() == 25.0));
    }

    #[test]
    fn test_refresh_geometry_idempotent() {
        let mut wheel = Wheel::new(config(7)).unwrap();
        wheel.rotate_all(0.3);
        let first: Vec<_> = wheel.buckets().iter().map(Bucket::pos).collect();
        wheel.refresh_geometry();
        let second: Vec<_> = wheel.buckets().iter().map(Bucket::pos).collect();
        assert_eq!(first, second);
    }
}
