//! Shape generation for 2D primitives
//!
//! All shapes are emitted as triangle lists in canvas coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Axis-aligned filled rectangle centered on `center`
pub fn rect(center: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let half = size / 2.0;
    let min = center - half;
    let max = center + half;

    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Thick line segment as a quad. Degenerate segments produce nothing.
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO || width <= 0.0 {
        return Vec::new();
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a1 = from + perp;
    let b1 = from - perp;
    let a2 = to + perp;
    let b2 = to - perp;

    vec![
        Vertex::new(a1.x, a1.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(b2.x, b2.y, color),
    ]
}

/// Connected thick segments through `points`
pub fn polyline(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(points.len().saturating_sub(1) * 6);
    for pair in points.windows(2) {
        vertices.extend(line(pair[0], pair[1], width, color));
    }
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_rect_bounds() {
        let vertices = rect(Vec2::new(10.0, 20.0), Vec2::new(4.0, 6.0), RED);
        assert_eq!(vertices.len(), 6);
        let xs: Vec<f32> = vertices.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = vertices.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 8.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 12.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 17.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 23.0);
    }

    #[test]
    fn test_vertical_line_width() {
        let vertices = line(Vec2::new(5.0, 0.0), Vec2::new(5.0, 10.0), 2.0, RED);
        assert_eq!(vertices.len(), 6);
        for v in &vertices {
            assert!((v.position[0] - 5.0).abs() <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn test_degenerate_line_is_empty() {
        let p = Vec2::new(3.0, 3.0);
        assert!(line(p, p, 2.0, RED).is_empty());
        assert!(line(p, Vec2::new(4.0, 3.0), 0.0, RED).is_empty());
    }

    #[test]
    fn test_polyline_segments() {
        let points = [Vec2::ZERO, Vec2::X, Vec2::new(1.0, 1.0)];
        assert_eq!(polyline(&points, 1.0, RED).len(), 12);
        assert!(polyline(&points[..1], 1.0, RED).is_empty());
    }

    #[test]
    fn test_circle_triangle_count() {
        assert_eq!(circle(Vec2::ZERO, 5.0, RED, 12).len(), 36);
    }
}
