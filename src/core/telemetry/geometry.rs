//! Pure mappings from values to drawable geometry.
//!
//! Nothing here touches a terminal or any shared state; the presenter is
//! responsible for drawing what these functions return.

use serde::Serialize;

/// Largest value a sparkline is scaled against when its window is all zero.
pub const SPARKLINE_FLOOR: f64 = 100.0;

/// Headroom kept above the tallest sparkline point.
pub const SPARKLINE_PADDING: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// One arc of a dial, angles in degrees (counter-clockwise positive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArcSegment {
    pub start_deg: f64,
    pub extent_deg: f64,
}

impl ArcSegment {
    pub fn end_deg(&self) -> f64 {
        self.start_deg + self.extent_deg
    }

    /// Points along the arc on a circle of `radius` around `center`,
    /// roughly one every `step_deg` degrees, endpoints included.
    pub fn points(&self, center: Point, radius: f64, step_deg: f64) -> Vec<Point> {
        let steps = (self.extent_deg.abs() / step_deg.max(0.1)).ceil().max(1.0) as usize;
        (0..=steps)
            .map(|i| {
                let angle = (self.start_deg + self.extent_deg * i as f64 / steps as f64).to_radians();
                Point {
                    x: center.x + radius * angle.cos(),
                    y: center.y + radius * angle.sin(),
                }
            })
            .collect()
    }
}

/// Secondary arc first, primary continuing from its end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GaugeGeometry {
    pub secondary: Option<ArcSegment>,
    pub primary: Option<ArcSegment>,
}

impl GaugeGeometry {
    /// Combined sweep of both arcs, in degrees (signed like the layout).
    pub fn total_extent(&self) -> f64 {
        self.secondary.map_or(0.0, |a| a.extent_deg) + self.primary.map_or(0.0, |a| a.extent_deg)
    }

    pub fn is_empty(&self) -> bool {
        self.secondary.is_none() && self.primary.is_none()
    }
}

/// Dial shape shared by every gauge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeLayout {
    pub start_deg: f64,
    /// Full-scale sweep; negative sweeps clockwise.
    pub sweep_deg: f64,
}

impl Default for GaugeLayout {
    fn default() -> Self {
        // 270° dial opening at the bottom
        Self {
            start_deg: 225.0,
            sweep_deg: -270.0,
        }
    }
}

impl GaugeLayout {
    /// Map a percentage `primary` and a sub-component `secondary` to arcs.
    ///
    /// Both are clamped to `[0, 100]` and `secondary` to at most `primary`,
    /// so the total sweep never exceeds the dial.
    pub fn arcs(&self, primary: f64, secondary: f64) -> GaugeGeometry {
        let primary = clamp_percent(primary);
        let secondary = clamp_percent(secondary).min(primary);
        let secondary_extent = self.sweep_deg * secondary / 100.0;
        let primary_extent = self.sweep_deg * (primary - secondary) / 100.0;

        GaugeGeometry {
            secondary: (secondary > 0.0).then_some(ArcSegment {
                start_deg: self.start_deg,
                extent_deg: secondary_extent,
            }),
            primary: (primary - secondary > 0.0).then_some(ArcSegment {
                start_deg: self.start_deg + secondary_extent,
                extent_deg: primary_extent,
            }),
        }
    }

    /// Fraction of the dial covered, in `[0, 1]`.
    pub fn fill_ratio(&self, geometry: &GaugeGeometry) -> f64 {
        if self.sweep_deg == 0.0 {
            return 0.0;
        }
        (geometry.total_extent() / self.sweep_deg).clamp(0.0, 1.0)
    }
}

pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Polyline for a trend over a `width` × `height` surface (y grows down).
///
/// Returns `None` for fewer than two samples or a degenerate surface.
pub fn sparkline_points(values: &[f64], width: f64, height: f64) -> Option<Vec<Point>> {
    if values.len() < 2 || width < 2.0 || height < 2.0 {
        return None;
    }

    let max = values.iter().copied().map(sanitize).fold(0.0, f64::max);
    let scale = if max > 0.0 { max } else { SPARKLINE_FLOOR };
    let last_index = (values.len() - 1) as f64;
    let usable_height = height - SPARKLINE_PADDING;

    Some(
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| Point {
                x: i as f64 / last_index * width,
                y: height - (sanitize(value) / scale) * usable_height,
            })
            .collect(),
    )
}

fn sanitize(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_empty_gauge() {
        let geometry = GaugeLayout::default().arcs(0.0, 0.0);
        assert!(geometry.is_empty());
    }

    #[test]
    fn test_full_single_color_gauge() {
        let layout = GaugeLayout::default();
        let geometry = layout.arcs(100.0, 0.0);
        assert!(geometry.secondary.is_none());
        let primary = geometry.primary.unwrap();
        assert_eq!(primary.start_deg, 225.0);
        assert!((primary.extent_deg - layout.sweep_deg).abs() < EPS);
    }

    #[test]
    fn test_secondary_then_contiguous_primary() {
        let layout = GaugeLayout::default();
        let geometry = layout.arcs(60.0, 20.0);
        let secondary = geometry.secondary.unwrap();
        let primary = geometry.primary.unwrap();

        assert!((secondary.extent_deg - 0.2 * layout.sweep_deg).abs() < EPS);
        assert!((primary.extent_deg - 0.4 * layout.sweep_deg).abs() < EPS);
        assert!((primary.start_deg - secondary.end_deg()).abs() < EPS);
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        let layout = GaugeLayout::default();
        let geometry = layout.arcs(180.0, 250.0);
        assert!((geometry.total_extent() - layout.sweep_deg).abs() < EPS);
        assert!((layout.fill_ratio(&geometry) - 1.0).abs() < EPS);

        assert!(layout.arcs(-5.0, f64::NAN).is_empty());
    }

    #[test]
    fn test_secondary_capped_at_primary() {
        let geometry = GaugeLayout::default().arcs(30.0, 50.0);
        assert!(geometry.primary.is_none());
        assert!((geometry.secondary.unwrap().extent_deg - (-81.0)).abs() < EPS);
    }

    #[test]
    fn test_arc_points_span_extent() {
        let arc = ArcSegment {
            start_deg: 0.0,
            extent_deg: 90.0,
        };
        let points = arc.points(Point { x: 0.0, y: 0.0 }, 1.0, 10.0);
        let first = points.first().unwrap();
        let last = points.last().unwrap();
        assert!((first.x - 1.0).abs() < EPS && first.y.abs() < EPS);
        assert!(last.x.abs() < EPS && (last.y - 1.0).abs() < EPS);
    }

    #[test]
    fn test_constant_sparkline_is_flat() {
        let points = sparkline_points(&[10.0, 10.0], 100.0, 25.0).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].y, points[1].y);
        assert_eq!(points[0].x, 0.0);
        assert_eq!(points[1].x, 100.0);
    }

    #[test]
    fn test_single_sample_is_noop() {
        assert!(sparkline_points(&[42.0], 100.0, 25.0).is_none());
        assert!(sparkline_points(&[], 100.0, 25.0).is_none());
    }

    #[test]
    fn test_all_zero_uses_floor() {
        let points = sparkline_points(&[0.0, 0.0, 0.0], 100.0, 25.0).unwrap();
        assert!(points.iter().all(|p| p.y == 25.0));
    }

    #[test]
    fn test_sparkline_scales_to_window_max() {
        let points = sparkline_points(&[0.0, 50.0, 100.0], 10.0, 24.0).unwrap();
        assert_eq!(points[0].y, 24.0);
        assert_eq!(points[1].y, 14.0);
        assert_eq!(points[2].y, 4.0);
        assert_eq!(points[1].x, 5.0);
    }
}
