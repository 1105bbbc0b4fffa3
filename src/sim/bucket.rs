//! Bucket entity and the wheel geometry it is positioned against
//!
//! Angles are measured from straight down: angle 0 sits at the bottom of the
//! wheel, positive angles swing toward +x. Screen y grows downward.

use glam::Vec2;

use crate::consts::*;

/// Fixed on-screen layout of the wheel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGeometry {
    /// Canvas width in logical pixels
    pub canvas_width: f32,
    /// Canvas height in logical pixels
    pub canvas_height: f32,
    /// Wheel radius as a fraction of canvas width
    pub radius_fraction: f32,
    /// Horizontal position of the spout
    pub spout_x: f32,
}

impl Default for WheelGeometry {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_SIZE,
            canvas_height: DEFAULT_CANVAS_SIZE,
            radius_fraction: WHEEL_RADIUS_FRACTION,
            spout_x: SPOUT_X,
        }
    }
}

impl WheelGeometry {
    /// Visual center of the wheel
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.canvas_width * 0.5, self.canvas_height * 0.5)
    }

    /// Distance from the center to every bucket
    #[inline]
    pub fn radius(&self) -> f32 {
        self.canvas_width * self.radius_fraction
    }

    /// Screen position of a point on the rim at `angle`
    #[inline]
    pub fn rim_point(&self, angle: f32) -> Vec2 {
        let r = self.radius();
        self.center() + Vec2::new(r * angle.sin(), r * angle.cos())
    }
}

/// One liquid-holding cell on the rim
#[derive(Debug, Clone)]
pub struct Bucket {
    /// Fixed slot on the wheel, assigned at respacing time
    offset: f32,
    /// Absolute angle (slot + wheel rotation) as of the last refresh
    angle: f32,
    mass: f32,
    is_fill_target: bool,
    drip_target: Option<usize>,
    base_width: f32,
    base_height: f32,
    pos: Vec2,
}

impl Bucket {
    pub fn new(offset: f32, mass: f32, base_size: f32) -> Self {
        Self {
            offset,
            angle: offset,
            mass,
            is_fill_target: false,
            drip_target: None,
            base_width: base_size,
            base_height: base_size,
            pos: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// True iff this bucket sat under the spout on the last tick
    #[inline]
    pub fn is_fill_target(&self) -> bool {
        self.is_fill_target
    }

    /// Index of the bucket that caught this one's drip on the last tick
    #[inline]
    pub fn drip_target(&self) -> Option<usize> {
        self.drip_target
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn base_width(&self) -> f32 {
        self.base_width
    }

    /// Tangential gravitational pull of this bucket at its current angle
    pub fn downward_force(&self) -> f32 {
        self.angle.sin() * (self.mass + BUCKET_TARE) * -1.0
    }

    /// Recompute absolute angle and screen position from the wheel rotation
    pub fn update_position(&mut self, rotation: f32, geometry: &WheelGeometry) {
        self.angle = self.offset + rotation;
        self.pos = geometry.rim_point(self.angle);
    }

    /// Render width; grows with sqrt(mass) normalized by bucket count
    pub fn width(&self, num_buckets: usize) -> f32 {
        self.base_width + self.fill_growth(num_buckets)
    }

    /// Render height; grows with sqrt(mass) normalized by bucket count
    pub fn height(&self, num_buckets: usize) -> f32 {
        self.base_height + self.fill_growth(num_buckets)
    }

    /// Open horizontal extent `(left, right)` used by spout and drip search
    pub fn span(&self, num_buckets: usize) -> (f32, f32) {
        let half = self.width(num_buckets) / 2.0;
        (self.pos.x - half, self.pos.x + half)
    }

    /// Whether `x` lies strictly inside this bucket's horizontal extent
    pub fn spans_x(&self, x: f32, num_buckets: usize) -> bool {
        let (left, right) = self.span(num_buckets);
        x > left && x < right
    }

    fn fill_growth(&self, num_buckets: usize) -> f32 {
        // Negative drain rates can push mass below zero; keep geometry finite
        (self.mass.max(0.0) / (num_buckets as f32 + 1.0)).sqrt()
    }

    pub(super) fn set_offset(&mut self, offset: f32) {
        self.offset = offset;
    }

    pub(super) fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
    }

    pub(super) fn add_mass(&mut self, amount: f32) {
        self.mass += amount;
    }

    pub(super) fn set_fill_target(&mut self, is_target: bool) {
        self.is_fill_target = is_target;
    }

    pub(super) fn set_drip_target(&mut self, target: Option<usize>) {
        self.drip_target = target;
    }

    pub(super) fn set_base_width(&mut self, width: f32) {
        self.base_width = width;
    }

    /// Pin the cached screen position, bypassing the rim layout
    #[cfg(test)]
    pub(super) fn place_at(&mut self, pos: Vec2) {
        self.pos = pos;
    }
}
