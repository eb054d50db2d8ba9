//! Parametric Bezier curves for lane geometry
//!
//! Lanes are authored as chains of quadratic or cubic Bezier curves. The
//! simulation never needs exact arc length; a polyline estimate over a fixed
//! tessellation is plenty, with the resolution split between a coarse
//! "update" pass (lengths, bounding boxes) and a finer "draw" pass (meshes).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::perp;
use crate::render::MeshData;

/// A quadratic or cubic Bezier curve, immutable after construction
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Curve {
    Quadratic([Vec2; 3]),
    Cubic([Vec2; 4]),
}

impl Curve {
    /// Quadratic curve from start, control, end
    pub fn quadratic(p0: Vec2, p1: Vec2, p2: Vec2) -> Self {
        Self::Quadratic([p0, p1, p2])
    }

    /// Cubic curve from start, two controls, end
    pub fn cubic(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        Self::Cubic([p0, p1, p2, p3])
    }

    /// First control point (curve start)
    pub fn start(&self) -> Vec2 {
        match self {
            Self::Quadratic(p) => p[0],
            Self::Cubic(p) => p[0],
        }
    }

    /// Last control point (curve end)
    pub fn end(&self) -> Vec2 {
        match self {
            Self::Quadratic(p) => p[2],
            Self::Cubic(p) => p[3],
        }
    }

    /// Evaluate the curve at parameter `t`.
    ///
    /// `t` is not clamped; callers wanting the [0, 1] span must clamp first.
    pub fn point_at(&self, t: f32) -> Vec2 {
        let u = 1.0 - t;
        match self {
            Self::Quadratic([p0, p1, p2]) => {
                *p0 * (u * u) + *p1 * (2.0 * u * t) + *p2 * (t * t)
            }
            Self::Cubic([p0, p1, p2, p3]) => {
                *p0 * (u * u * u)
                    + *p1 * (3.0 * u * u * t)
                    + *p2 * (3.0 * u * t * t)
                    + *p3 * (t * t * t)
            }
        }
    }

    /// Sample `segments + 1` points uniformly on [0, 1], both ends inclusive
    pub fn samples(&self, segments: u32) -> Vec<Vec2> {
        debug_assert!(segments >= 1, "tessellation needs at least one segment");
        (0..=segments)
            .map(|i| self.point_at(i as f32 / segments as f32))
            .collect()
    }

    /// Tessellate into `segments` line pieces
    pub fn to_lines(&self, segments: u32) -> Vec<(Vec2, Vec2)> {
        let samples = self.samples(segments);
        samples.windows(2).map(|w| (w[0], w[1])).collect()
    }

    /// Polyline estimate of the curve's length at the given resolution
    pub fn arc_length(&self, segments: u32) -> f32 {
        self.samples(segments)
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .sum()
    }

    /// Build a thick-polyline triangle mesh: two vertices per sample, offset
    /// along the averaged segment normal, two triangles per segment.
    pub fn to_mesh(&self, segments: u32, thickness: f32) -> MeshData {
        let samples = self.samples(segments);
        let half = thickness / 2.0;
        let n = samples.len();

        let mut vertices = Vec::with_capacity(n * 2);
        for i in 0..n {
            // Direction at a sample: average of the adjacent segment tangents
            let dir = if i == 0 {
                samples[1] - samples[0]
            } else if i == n - 1 {
                samples[n - 1] - samples[n - 2]
            } else {
                (samples[i + 1] - samples[i - 1]) / 2.0
            };
            let normal = perp(dir.normalize_or_zero());
            vertices.push(samples[i] + normal * half);
            vertices.push(samples[i] - normal * half);
        }

        let mut indices = Vec::with_capacity((n - 1) * 6);
        for i in 0..(n as u32 - 1) {
            let base = i * 2;
            indices.extend_from_slice(&[base, base + 1, base + 2]);
            indices.extend_from_slice(&[base + 1, base + 3, base + 2]);
        }

        MeshData { vertices, indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_endpoints_quadratic() {
        let curve = Curve::quadratic(Vec2::ZERO, Vec2::new(50.0, 100.0), Vec2::new(100.0, 0.0));
        assert_eq!(curve.point_at(0.0), Vec2::ZERO);
        assert_eq!(curve.point_at(1.0), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_endpoints_cubic() {
        let curve = Curve::cubic(
            Vec2::new(-10.0, 3.0),
            Vec2::new(0.0, 40.0),
            Vec2::new(30.0, -40.0),
            Vec2::new(80.0, 7.0),
        );
        assert_eq!(curve.point_at(0.0), Vec2::new(-10.0, 3.0));
        assert_eq!(curve.point_at(1.0), Vec2::new(80.0, 7.0));
    }

    #[test]
    fn test_tessellation_counts() {
        let curve = Curve::quadratic(Vec2::ZERO, Vec2::new(1.0, 1.0), Vec2::new(2.0, 0.0));
        for n in 1..=16 {
            assert_eq!(curve.samples(n).len() as u32, n + 1);
            assert_eq!(curve.to_lines(n).len() as u32, n);
        }
    }

    #[test]
    fn test_straight_line_arc_length() {
        // Collinear control points degenerate to a straight line
        let curve = Curve::quadratic(Vec2::ZERO, Vec2::new(50.0, 0.0), Vec2::new(100.0, 0.0));
        let length = curve.arc_length(64);
        assert!((length - 100.0).abs() < 0.01, "got {length}");
    }

    #[test]
    fn test_arc_length_monotone_in_resolution() {
        // A finer polyline never measures shorter than a coarser one
        let curve = Curve::cubic(
            Vec2::ZERO,
            Vec2::new(0.0, 100.0),
            Vec2::new(100.0, 100.0),
            Vec2::new(100.0, 0.0),
        );
        let coarse = curve.arc_length(8);
        let fine = curve.arc_length(128);
        assert!(fine >= coarse - 1e-4);
    }

    #[test]
    fn test_mesh_counts() {
        let curve = Curve::quadratic(Vec2::ZERO, Vec2::new(1.0, 1.0), Vec2::new(2.0, 0.0));
        let mesh = curve.to_mesh(8, 10.0);
        assert_eq!(mesh.vertices.len(), 18); // (8 + 1) samples * 2
        assert_eq!(mesh.triangle_count(), 16); // 2 per segment
    }

    proptest! {
        #[test]
        fn prop_curve_hits_endpoints(
            x0 in -500.0f32..500.0, y0 in -500.0f32..500.0,
            x1 in -500.0f32..500.0, y1 in -500.0f32..500.0,
            x2 in -500.0f32..500.0, y2 in -500.0f32..500.0,
        ) {
            let curve = Curve::quadratic(
                Vec2::new(x0, y0),
                Vec2::new(x1, y1),
                Vec2::new(x2, y2),
            );
            prop_assert!(curve.point_at(0.0).distance(Vec2::new(x0, y0)) < 1e-3);
            prop_assert!(curve.point_at(1.0).distance(Vec2::new(x2, y2)) < 1e-3);
        }
    }
}
