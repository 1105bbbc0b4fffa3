//! Water Wheel - a chaotic water wheel simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (buckets, wheel, tick)
//! - `animation`: Stopped/Running state machine around a cancelable interval
//! - `platform`: Browser/native interval handles
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Data-driven configuration

pub mod animation;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use animation::{Animation, AnimationState, IntervalHandle, WheelObserver};
pub use settings::Settings;

/// Simulation configuration constants
pub mod consts {
    /// Animation period (~30 Hz)
    pub const TICK_INTERVAL_MS: u32 = 33;

    /// Logical canvas size the wheel is laid out on
    pub const DEFAULT_CANVAS_SIZE: f32 = 600.0;
    /// Wheel radius as a fraction of canvas width
    pub const WHEEL_RADIUS_FRACTION: f32 = 0.4;
    /// Horizontal spout position
    pub const SPOUT_X: f32 = 300.0;

    /// Bucket defaults
    pub const DEFAULT_NUM_BUCKETS: usize = 10;
    pub const BASE_BUCKET_SIZE: f32 = 10.0;
    pub const INITIAL_MASS_MAX: f32 = 100.0;
    /// Mass every bucket carries even when empty
    pub const BUCKET_TARE: f32 = 1.0;

    /// Rates
    pub const DEFAULT_FILL_RATE: f32 = 20.0;
    pub const DEFAULT_DRAIN_RATE: f32 = 4.0;
    pub const DEFAULT_FRICTION: f32 = 0.01;

    /// Angular step = torque / (ROTATION_DIVISOR * bucket count)
    pub const ROTATION_DIVISOR: f32 = 1000.0;

    /// Torque chart window
    pub const TORQUE_HISTORY_LEN: usize = 300;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to exactly TAU
    if wrapped >= PI { -PI } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps_into_range() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(PI), -PI);
        assert!((normalize_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
        assert!((normalize_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_normalize_angle_returns_for_huge_finite_input() {
        for angle in [1e8_f32, -1e8, 1e12, -1e30, f32::MAX, f32::MIN] {
            let wrapped = normalize_angle(angle);
            assert!((-PI..PI).contains(&wrapped), "{} -> {}", angle, wrapped);
        }
    }
}
