//! Fixed-step simulation tick
//!
//! One call advances the wheel by one animation frame:
//! fill under the spout, sum torque, rotate, drain bucket-to-bucket,
//! refresh geometry, record torque.

use super::bucket::Bucket;
use super::wheel::Wheel;
use crate::consts::*;

/// What happened during one tick. Mass bookkeeping:
/// `after = before + inflow - drained_out - clamped`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickReport {
    /// Bucket that received the spout's inflow
    pub fill_target: Option<usize>,
    /// Mass added by the spout
    pub inflow: f32,
    /// Mass drained with no bucket below to catch it
    pub drained_out: f32,
    /// Mass zeroed because it was at or below the drain rate
    pub clamped: f32,
    /// Net torque after friction
    pub angular_force: f32,
}

impl Wheel {
    /// Advance the simulation by one tick
    pub fn tick(&mut self) -> TickReport {
        tick(self)
    }
}

/// Advance the wheel by one fixed step
pub fn tick(wheel: &mut Wheel) -> TickReport {
    let n = wheel.buckets.len();
    let mut report = TickReport::default();

    // Fill whichever bucket sits highest under the spout
    report.fill_target = find_fill_target(wheel);
    for (i, bucket) in wheel.buckets.iter_mut().enumerate() {
        bucket.set_fill_target(report.fill_target == Some(i));
        bucket.set_drip_target(None);
    }
    if let Some(target) = report.fill_target {
        wheel.buckets[target].add_mass(wheel.fill_rate);
        report.inflow = wheel.fill_rate;
    }

    // Net torque, damped
    let mut angular_force: f32 = wheel.buckets.iter().map(Bucket::downward_force).sum();
    angular_force *= 1.0 - wheel.friction;
    report.angular_force = angular_force;

    wheel.rotate_all(angular_force / (ROTATION_DIVISOR * n as f32));

    // Drain in list order. Each bucket reads masses already updated by the
    // buckets before it in this same pass.
    let drain = wheel.drain_rate;
    for i in 0..n {
        if wheel.buckets[i].mass() > drain {
            wheel.buckets[i].add_mass(-drain);
            match find_bucket_under(wheel, i) {
                Some(below) => {
                    wheel.buckets[below].add_mass(drain);
                    wheel.buckets[i].set_drip_target(Some(below));
                }
                None => report.drained_out += drain,
            }
        } else {
            report.clamped += wheel.buckets[i].mass();
            wheel.buckets[i].set_mass(0.0);
        }
    }

    wheel.refresh_geometry();
    wheel.torque_history.push(angular_force / n as f32);
    wheel.time_ticks += 1;

    report
}

/// Uppermost bucket whose span strictly contains the spout. First in list
/// order wins ties.
pub(super) fn find_fill_target(wheel: &Wheel) -> Option<usize> {
    let n = wheel.buckets.len();
    let spout_x = wheel.geometry.spout_x;
    let mut min_y = wheel.geometry.canvas_height;
    let mut target = None;

    for (i, bucket) in wheel.buckets.iter().enumerate() {
        if bucket.spans_x(spout_x, n) && bucket.pos().y < min_y {
            min_y = bucket.pos().y;
            target = Some(i);
        }
    }

    target
}

/// Closest bucket strictly below `source` whose span contains its x
pub(super) fn find_bucket_under(wheel: &Wheel, source: usize) -> Option<usize> {
    let n = wheel.buckets.len();
    let from = wheel.buckets[source].pos();
    let mut best: Option<(usize, f32)> = None;

    for (i, bucket) in wheel.buckets.iter().enumerate() {
        let y = bucket.pos().y;
        if i != source
            && y > from.y
            && bucket.spans_x(from.x, n)
            && best.is_none_or(|(_, best_y)| y < best_y)
        {
            best = Some((i, y));
        }
    }

    best.map(|(i, _)| i)
}
