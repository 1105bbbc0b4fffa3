//! Wheel scene: turns simulation state into triangles
//!
//! Draw order: spout stream, drip lines, spokes, hub, buckets, chart.

use glam::Vec2;

use super::chart::{ChartLayout, torque_chart};
use super::shapes;
use super::vertex::{Vertex, colors};
use crate::sim::Wheel;

const SPOKE_WIDTH: f32 = 2.0;
const HUB_RADIUS: f32 = 6.0;
const HUB_SEGMENTS: u32 = 16;
/// Stream widths scale with their rate; a rate of 200 draws 20px
const STREAM_WIDTH_PER_RATE: f32 = 20.0 / 200.0;

/// What to draw besides the buckets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    pub show_spokes: bool,
    pub show_chart: bool,
    pub chart: ChartLayout,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            show_spokes: true,
            show_chart: true,
            chart: ChartLayout::default(),
        }
    }
}

/// Width of the spout stream
pub fn fill_stream_width(fill_rate: f32) -> f32 {
    fill_rate * STREAM_WIDTH_PER_RATE
}

/// Width of a drip line
pub fn drip_stream_width(drain_rate: f32) -> f32 {
    drain_rate * STREAM_WIDTH_PER_RATE + 1.0
}

/// Build the full frame for `wheel`
pub fn wheel_vertices(wheel: &Wheel, options: &SceneOptions) -> Vec<Vertex> {
    let buckets = wheel.buckets();
    let n = buckets.len();
    let geometry = wheel.geometry();
    let mut vertices = Vec::with_capacity(n * 24);

    // Spout stream from the top edge into the fill target
    for bucket in buckets.iter().filter(|b| b.is_fill_target()) {
        let pos = bucket.pos();
        vertices.extend(shapes::line(
            Vec2::new(pos.x, 0.0),
            pos,
            fill_stream_width(wheel.fill_rate()),
            colors::WATER,
        ));
    }

    // Drips land on the catching bucket or fall off the canvas
    if wheel.drain_rate() > 0.0 {
        let width = drip_stream_width(wheel.drain_rate());
        for bucket in buckets.iter().filter(|b| b.mass() > 0.0) {
            let pos = bucket.pos();
            let end_y = bucket
                .drip_target()
                .and_then(|i| buckets.get(i))
                .map_or(geometry.canvas_height, |target| target.pos().y);
            vertices.extend(shapes::line(pos, Vec2::new(pos.x, end_y), width, colors::WATER));
        }
    }

    if options.show_spokes {
        let hub = geometry.center();
        for bucket in buckets {
            vertices.extend(shapes::line(bucket.pos(), hub, SPOKE_WIDTH, colors::SPOKE));
        }
        vertices.extend(shapes::circle(hub, HUB_RADIUS, colors::HUB, HUB_SEGMENTS));
    }

    for bucket in buckets {
        let color = if bucket.is_fill_target() {
            colors::FILL_TARGET
        } else {
            colors::BUCKET
        };
        vertices.extend(shapes::rect(
            bucket.pos(),
            Vec2::new(bucket.width(n), bucket.height(n)),
            color,
        ));
    }

    if options.show_chart {
        vertices.extend(torque_chart(wheel.torque_history(), &options.chart));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::WheelConfig;

    fn wheel(fill_rate: f32, drain_rate: f32, masses: &[f32]) -> Wheel {
        Wheel::with_initial_masses(
            WheelConfig {
                fill_rate,
                drain_rate,
                friction: 0.0,
                ..Default::default()
            },
            masses,
        )
        .unwrap()
    }

    fn bare() -> SceneOptions {
        SceneOptions {
            show_spokes: false,
            show_chart: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_stream_widths() {
        assert_eq!(fill_stream_width(200.0), 20.0);
        assert_eq!(drip_stream_width(0.0), 1.0);
        assert_eq!(drip_stream_width(100.0), 11.0);
    }

    #[test]
    fn test_untouched_wheel_draws_only_buckets() {
        // No tick yet: no fill target, no drip targets, drain disabled
        let wheel = wheel(5.0, 0.0, &[1.0, 2.0, 3.0]);
        assert_eq!(wheel_vertices(&wheel, &bare()).len(), 3 * 6);
    }

    #[test]
    fn test_spokes_add_one_line_per_bucket_and_a_hub() {
        let wheel = wheel(5.0, 0.0, &[1.0, 2.0, 3.0, 4.0]);
        let with_spokes = SceneOptions {
            show_spokes: true,
            ..bare()
        };
        let extra = wheel_vertices(&wheel, &with_spokes).len() - wheel_vertices(&wheel, &bare()).len();
        assert_eq!(extra, 4 * 6 + (HUB_SEGMENTS * 3) as usize);
    }

    #[test]
    fn test_drip_without_target_runs_to_canvas_bottom() {
        let mut wheel = wheel(0.0, 2.0, &[10.0]);
        wheel.tick();
        let vertices = wheel_vertices(&wheel, &bare());
        let max_y = vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::MIN, f32::max);
        assert_eq!(max_y, wheel.geometry().canvas_height);
    }

    #[test]
    fn test_fill_target_stream_starts_at_top() {
        let mut wheel = wheel(5.0, 0.0, &[10.0, 20.0, 30.0, 40.0]);
        wheel.tick();
        let vertices = wheel_vertices(&wheel, &bare());
        assert!(vertices.iter().any(|v| v.position[1] == 0.0 && v.color == colors::WATER));
        assert!(vertices.iter().any(|v| v.color == colors::FILL_TARGET));
    }
}
