//! Rolling net-torque chart

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::sim::TorqueHistory;

const LINE_WIDTH: f32 = 1.5;
const AXIS_WIDTH: f32 = 1.0;

/// Where the chart panel sits on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    /// Top-left corner
    pub origin: Vec2,
    pub size: Vec2,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            origin: Vec2::new(10.0, 10.0),
            size: Vec2::new(180.0, 60.0),
        }
    }
}

impl ChartLayout {
    fn mid_y(&self) -> f32 {
        self.origin.y + self.size.y / 2.0
    }

    /// Canvas point for sample `index` of a window of `capacity`, scaled so
    /// `peak` touches the panel edge
    pub fn sample_point(&self, index: usize, capacity: usize, sample: f32, peak: f32) -> Vec2 {
        let t = index as f32 / capacity.saturating_sub(1).max(1) as f32;
        let norm = if peak > 0.0 { sample / peak } else { 0.0 };
        // Positive torque plots upward
        Vec2::new(
            self.origin.x + t * self.size.x,
            self.mid_y() - norm * self.size.y / 2.0,
        )
    }
}

/// Panel, zero axis, and the torque polyline
pub fn torque_chart(history: &TorqueHistory, layout: &ChartLayout) -> Vec<Vertex> {
    let mut vertices = shapes::rect(
        layout.origin + layout.size / 2.0,
        layout.size,
        colors::CHART_PANEL,
    );

    vertices.extend(shapes::line(
        Vec2::new(layout.origin.x, layout.mid_y()),
        Vec2::new(layout.origin.x + layout.size.x, layout.mid_y()),
        AXIS_WIDTH,
        colors::CHART_AXIS,
    ));

    let peak = history.peak_magnitude();
    let points: Vec<Vec2> = history
        .iter()
        .enumerate()
        .map(|(i, sample)| layout.sample_point(i, history.capacity(), sample, peak))
        .collect();
    vertices.extend(shapes::polyline(&points, LINE_WIDTH, colors::CHART_LINE));

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history_draws_panel_and_axis() {
        let history = TorqueHistory::new(10);
        assert_eq!(torque_chart(&history, &ChartLayout::default()).len(), 12);
    }

    #[test]
    fn test_one_segment_per_sample_pair() {
        let mut history = TorqueHistory::new(10);
        for sample in [1.0, -1.0, 0.5, 0.0] {
            history.push(sample);
        }
        assert_eq!(torque_chart(&history, &ChartLayout::default()).len(), 12 + 3 * 6);
    }

    #[test]
    fn test_peak_touches_panel_edge() {
        let layout = ChartLayout::default();
        let top = layout.sample_point(0, 10, 2.0, 2.0);
        assert_eq!(top, layout.origin);
        let bottom = layout.sample_point(9, 10, -2.0, 2.0);
        assert_eq!(bottom, layout.origin + layout.size);
    }

    #[test]
    fn test_zero_peak_sits_on_axis() {
        let layout = ChartLayout::default();
        let p = layout.sample_point(3, 10, 0.0, 0.0);
        assert_eq!(p.y, layout.mid_y());
    }
}
