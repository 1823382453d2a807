use crate::coords::Vec2;

/// Segments shorter than this have no usable direction.
pub const MIN_SEGMENT_LENGTH: f32 = 1e-6;

/// Horizontal placement of a graph in NDC.
///
/// Sample `i` sits at `start_x + i * total_width / capacity`, whatever the
/// current sample count; a partly filled window occupies the left part of the
/// extent instead of being stretched across it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GraphLayout {
    pub start_x: f32,
    pub total_width: f32,
    pub capacity: usize,
}

impl GraphLayout {
    /// Layout centered on x = 0.
    #[inline]
    pub fn centered(total_width: f32, capacity: usize) -> Self {
        Self {
            start_x: -total_width / 2.0,
            total_width,
            capacity,
        }
    }

    #[inline]
    pub fn x_step(&self) -> f32 {
        self.total_width / self.capacity.max(1) as f32
    }

    #[inline]
    pub fn x_at(&self, index: usize) -> f32 {
        self.start_x + index as f32 * self.x_step()
    }
}

/// Expands a polyline of samples into a thick-line triangle list.
///
/// Each consecutive pair becomes a quad of width `line_width`, emitted as two
/// triangles: `(a+n, a-n, b+n)` and `(b+n, a-n, b-n)` where `n` is the
/// half-width normal. Joins are not mitred.
///
/// A segment shorter than [`MIN_SEGMENT_LENGTH`] reuses the previous segment's
/// normal (or +Y for the first segment) so no NaN reaches the vertex buffer.
pub fn tessellate<I>(points: I, layout: &GraphLayout, line_width: f32) -> Vec<Vec2>
where
    I: IntoIterator<Item = f32>,
{
    let half = line_width / 2.0;
    let mut out = Vec::new();

    let mut prev: Option<Vec2> = None;
    let mut prev_normal = Vec2::new(0.0, 1.0);

    for (i, y) in points.into_iter().enumerate() {
        let p = Vec2::new(layout.x_at(i), y);
        let Some(a) = prev.replace(p) else { continue };

        let d = p - a;
        let len = d.length();
        let normal = if len < MIN_SEGMENT_LENGTH {
            log::trace!("degenerate graph segment at index {i}; reusing previous normal");
            prev_normal
        } else {
            (d / len).perp()
        };
        prev_normal = normal;

        let n = normal * half;
        out.extend_from_slice(&[a + n, a - n, p + n, p + n, a - n, p - n]);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> GraphLayout {
        GraphLayout::centered(1.0, 200)
    }

    fn triangle_area(a: Vec2, b: Vec2, c: Vec2) -> f32 {
        ((b - a).cross(c - a) / 2.0).abs()
    }

    #[test]
    fn empty_and_single_point_produce_nothing() {
        assert!(tessellate(Vec::<f32>::new(), &layout(), 0.005).is_empty());
        assert!(tessellate([0.3], &layout(), 0.005).is_empty());
    }

    #[test]
    fn vertex_count_is_six_per_segment() {
        for n in [2usize, 3, 50, 200] {
            let pts: Vec<f32> = (0..n).map(|i| (i as f32 * 0.37).sin() * 0.1).collect();
            assert_eq!(tessellate(pts, &layout(), 0.005).len(), 6 * (n - 1));
        }
    }

    #[test]
    fn single_segment_area_matches_length_times_width() {
        let width = 0.005;
        let l = layout();
        let v = tessellate([0.0, 0.1], &l, width);
        assert_eq!(v.len(), 6);

        let area = triangle_area(v[0], v[1], v[2]) + triangle_area(v[3], v[4], v[5]);
        let seg_len = Vec2::new(l.x_step(), 0.1).length();
        let expected = seg_len * width;
        assert!((area - expected).abs() < expected * 1e-3, "area {area} vs {expected}");
    }

    #[test]
    fn x_positions_follow_capacity_not_length() {
        let l = layout();
        let v = tessellate([0.0, 0.0, 0.0], &l, 0.01);
        // flat line: normal is +Y, so vertex 0 sits above sample 0
        assert!((v[0].x - -0.5).abs() < 1e-6);
        assert!((v[2].x - (-0.5 + 1.0 / 200.0)).abs() < 1e-6);
        assert!((v[0].y - 0.005).abs() < 1e-6);
        assert!((v[1].y + 0.005).abs() < 1e-6);
    }

    #[test]
    fn degenerate_segment_reuses_previous_normal() {
        // zero horizontal extent forces zero-length segments
        let l = GraphLayout { start_x: 0.0, total_width: 0.0, capacity: 200 };
        let v = tessellate([0.0, 0.0, 0.0], &l, 0.01);
        assert_eq!(v.len(), 12);
        assert!(v.iter().all(|p| p.is_finite()));
        assert!((v[0].y - 0.005).abs() < 1e-6);
    }

    #[test]
    fn degenerate_after_real_segment_keeps_its_normal() {
        let l = GraphLayout { start_x: 0.0, total_width: 0.0, capacity: 2 };
        // first segment vertical (x stays at 0), second degenerate
        let v = tessellate([0.0, 1.0, 1.0], &l, 2.0);
        assert!(v.iter().all(|p| p.is_finite()));
        // upward segment: normal is (-1, 0)
        assert!((v[0].x - -1.0).abs() < 1e-6);
        assert!((v[6].x - -1.0).abs() < 1e-6);
    }

    #[test]
    fn triangles_share_the_segment_diagonal() {
        let v = tessellate([0.0, 0.05], &layout(), 0.005);
        assert_eq!(v[2], v[3]);
        assert_eq!(v[1], v[4]);
    }
}
