use crate::coords::Vec2;

use super::FontMetrics;

/// Horizontal anchoring of a laid-out line.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum TextAlign {
    /// Line is centered on x = 0.
    #[default]
    Center,
    /// Line starts at the left edge of the viewport, inset by
    /// [`TextLayoutParams::left_margin`].
    Left,
}

/// Layout parameters shared by every text entity.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextLayoutParams {
    /// Left inset for [`TextAlign::Left`], in NDC units before aspect compensation.
    pub left_margin: f32,
}

impl Default for TextLayoutParams {
    fn default() -> Self {
        Self { left_margin: 0.05 }
    }
}

/// Per-entity style inputs to [`layout_text`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextStyle {
    /// Baseline-independent top of the line, in NDC.
    pub origin_y: f32,
    /// Line size in NDC units.
    pub size: f32,
    pub align: TextAlign,
}

/// Triangle-list geometry for one line of text.
///
/// `vertices[i]` and `uvs[i]` describe the same corner; both hold six entries
/// per rendered glyph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextGeometry {
    pub vertices: Vec<Vec2>,
    pub uvs: Vec<Vec2>,
}

impl TextGeometry {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Pen advance for a character, falling back to half a line for glyphs the
/// atlas does not contain.
#[inline]
fn advance_of(c: char, scale: f32, metrics: &FontMetrics) -> f32 {
    match metrics.glyph(c) {
        Some(g) => g.advance * scale,
        None => metrics.line_size() * scale * 0.5,
    }
}

/// Total pen travel of `text` at `size`, before aspect compensation.
///
/// Characters missing from the atlas count with their fallback spacing so
/// centered lines stay centered even when a gap is rendered.
pub fn measure_text(text: &str, size: f32, metrics: &FontMetrics) -> f32 {
    let scale = size / metrics.line_size();
    text.chars().map(|c| advance_of(c, scale, metrics)).sum()
}

/// Lays out a single line of text into quads.
///
/// Horizontal coordinates are divided by `aspect_ratio` so glyphs keep their
/// proportions on a non-square viewport. Missing glyphs are logged and leave a
/// gap.
pub fn layout_text(
    text: &str,
    style: &TextStyle,
    aspect_ratio: f32,
    params: &TextLayoutParams,
    metrics: &FontMetrics,
) -> TextGeometry {
    debug_assert!(aspect_ratio > 0.0 && aspect_ratio.is_finite());

    let scale = style.size / metrics.line_size();
    let atlas = metrics.atlas_size();

    let mut pen_x = match style.align {
        TextAlign::Center => -measure_text(text, style.size, metrics) / 2.0,
        TextAlign::Left => -1.0 + params.left_margin * aspect_ratio,
    };

    let glyph_count = text.chars().filter(|&c| metrics.glyph(c).is_some()).count();
    let mut geometry = TextGeometry {
        vertices: Vec::with_capacity(glyph_count * 6),
        uvs: Vec::with_capacity(glyph_count * 6),
    };

    for c in text.chars() {
        let Some(glyph) = metrics.glyph(c) else {
            log::warn!("character {c:?} not found in font metrics; skipping");
            pen_x += advance_of(c, scale, metrics);
            continue;
        };

        let x0 = (pen_x + glyph.offset.x * scale) / aspect_ratio;
        let x1 = (pen_x + (glyph.offset.x + glyph.size.x) * scale) / aspect_ratio;
        let y0 = style.origin_y - glyph.offset.y * scale;
        let y1 = y0 - glyph.size.y * scale;

        let u0 = glyph.atlas_origin.x / atlas.x;
        let v0 = glyph.atlas_origin.y / atlas.y;
        let u1 = (glyph.atlas_origin.x + glyph.size.x) / atlas.x;
        let v1 = (glyph.atlas_origin.y + glyph.size.y) / atlas.y;

        // top-left, top-right, bottom-left, bottom-left, top-right, bottom-right
        geometry.vertices.extend_from_slice(&[
            Vec2::new(x0, y0),
            Vec2::new(x1, y0),
            Vec2::new(x0, y1),
            Vec2::new(x0, y1),
            Vec2::new(x1, y0),
            Vec2::new(x1, y1),
        ]);
        geometry.uvs.extend_from_slice(&[
            Vec2::new(u0, v0),
            Vec2::new(u1, v0),
            Vec2::new(u0, v1),
            Vec2::new(u0, v1),
            Vec2::new(u1, v0),
            Vec2::new(u1, v1),
        ]);

        pen_x += glyph.advance * scale;
    }

    geometry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Glyph;

    const EPS: f32 = 1e-5;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() <= EPS
    }

    /// Glyph whose quad exactly covers its advance, so pen extents equal geometry extents.
    fn boxed(advance: f32, height: f32, atlas_x: f32) -> Glyph {
        Glyph {
            advance,
            size: Vec2::new(advance, height),
            offset: Vec2::zero(),
            atlas_origin: Vec2::new(atlas_x, 0.0),
        }
    }

    fn single_a() -> FontMetrics {
        let a = Glyph {
            advance: 20.0,
            size: Vec2::new(18.0, 20.0),
            offset: Vec2::zero(),
            atlas_origin: Vec2::zero(),
        };
        FontMetrics::new(32.0, Vec2::new(256.0, 256.0), [('A', a)]).unwrap()
    }

    fn digits() -> FontMetrics {
        let glyphs = "0123456789"
            .chars()
            .enumerate()
            .map(|(i, c)| (c, boxed(10.0, 16.0, i as f32 * 10.0)));
        FontMetrics::new(20.0, Vec2::new(128.0, 32.0), glyphs).unwrap()
    }

    fn centered(size: f32) -> TextStyle {
        TextStyle { origin_y: 0.0, size, align: TextAlign::Center }
    }

    fn x_extent(g: &TextGeometry) -> (f32, f32) {
        g.vertices.iter().fold((f32::MAX, f32::MIN), |(lo, hi), v| (lo.min(v.x), hi.max(v.x)))
    }

    #[test]
    fn single_glyph_produces_one_quad_with_atlas_uvs() {
        let g = layout_text("A", &centered(32.0), 1.0, &TextLayoutParams::default(), &single_a());

        assert_eq!(g.vertex_count(), 6);
        assert_eq!(g.uvs.len(), 6);

        let (u0, v0) = (g.uvs[0].x, g.uvs[0].y);
        let (u1, v1) = (g.uvs[5].x, g.uvs[5].y);
        assert!(approx(u0, 0.0) && approx(v0, 0.0));
        assert!((u1 - 0.0703).abs() < 1e-4, "u1 = {u1}");
        assert!((v1 - 0.0781).abs() < 1e-4, "v1 = {v1}");
    }

    #[test]
    fn quad_winding_is_tl_tr_bl_bl_tr_br() {
        let g = layout_text("A", &centered(32.0), 1.0, &TextLayoutParams::default(), &single_a());
        let v = &g.vertices;

        // pen starts at -10 (half of the 20-unit advance)
        assert!(approx(v[0].x, -10.0) && approx(v[0].y, 0.0));
        assert!(approx(v[1].x, 8.0) && approx(v[1].y, 0.0));
        assert!(approx(v[2].x, -10.0) && approx(v[2].y, -20.0));
        assert_eq!(v[2], v[3]);
        assert_eq!(v[1], v[4]);
        assert!(approx(v[5].x, 8.0) && approx(v[5].y, -20.0));
    }

    #[test]
    fn vertex_count_is_six_per_matched_character() {
        let m = digits();
        let g = layout_text("12,345.67", &centered(0.1), 1.5, &TextLayoutParams::default(), &m);
        // ',' and '.' are not in the atlas
        assert_eq!(g.vertex_count(), 6 * 7);
        assert_eq!(g.uvs.len(), g.vertex_count());
    }

    #[test]
    fn missing_glyph_leaves_gap_but_advances_pen() {
        let m = digits();
        let params = TextLayoutParams::default();
        let style = TextStyle { origin_y: 0.0, size: 20.0, align: TextAlign::Left };

        let with_gap = layout_text("1?2", &style, 1.0, &params, &m);
        assert_eq!(with_gap.vertex_count(), 12);

        // second rendered glyph starts one advance plus half a line after the first
        let first_x = with_gap.vertices[0].x;
        let second_x = with_gap.vertices[6].x;
        assert!(approx(second_x - first_x, 10.0 + 10.0), "gap = {}", second_x - first_x);
    }

    #[test]
    fn centered_width_equals_sum_of_scaled_advances() {
        let m = digits();
        // scale = 0.2 / 20 = 0.01, each advance 10 -> 0.1
        assert!(approx(measure_text("12345", 0.2, &m), 0.5));
    }

    #[test]
    fn centered_geometry_midpoint_is_zero() {
        let m = digits();
        for aspect in [1.0, 16.0 / 9.0, 0.5] {
            let g = layout_text("90210", &centered(0.2), aspect, &TextLayoutParams::default(), &m);
            let (lo, hi) = x_extent(&g);
            assert!(approx((lo + hi) / 2.0, 0.0), "aspect {aspect}: {lo}..{hi}");
            assert!(approx((hi - lo) * aspect, 0.5));
        }
    }

    #[test]
    fn centered_midpoint_holds_with_missing_glyphs() {
        let m = digits();
        let style = centered(0.2);
        let g = layout_text("1 2", &style, 1.0, &TextLayoutParams::default(), &m);
        let (lo, hi) = x_extent(&g);
        assert!(approx((lo + hi) / 2.0, 0.0));
        assert!(approx(measure_text("1 2", style.size, &m), 0.1 + 0.1 + 0.1));
    }

    #[test]
    fn missing_glyph_fallback_counts_toward_centered_width() {
        let m = digits();
        let params = TextLayoutParams::default();
        // scale 0.01: each digit advances 0.1, the unknown ' ' advances 20 * 0.01 * 0.5
        let g = layout_text("1 2", &centered(0.2), 1.0, &params, &m);

        assert_eq!(g.vertex_count(), 12);
        assert!(approx(g.vertices[0].x, -0.15), "left = {}", g.vertices[0].x);
        assert!(approx(g.vertices[6].x, 0.05), "second = {}", g.vertices[6].x);
        assert!(approx(g.vertices[11].x, 0.15), "right = {}", g.vertices[11].x);

        // same string without the gap is centered on its own, narrower width
        let tight = layout_text("12", &centered(0.2), 1.0, &params, &m);
        assert!(approx(tight.vertices[0].x, -0.1));
    }

    #[test]
    fn left_aligned_starts_at_margin() {
        let m = digits();
        let params = TextLayoutParams { left_margin: 0.1 };
        let style = TextStyle { origin_y: 0.5, size: 0.2, align: TextAlign::Left };

        let aspect = 2.0;
        let g = layout_text("1", &style, aspect, &params, &m);
        let expected = (-1.0 + 0.1 * aspect) / aspect;
        assert!(approx(g.vertices[0].x, expected));
        assert!(approx(g.vertices[0].y, 0.5));
    }

    #[test]
    fn horizontal_coordinates_shrink_with_aspect_ratio() {
        let m = digits();
        let params = TextLayoutParams::default();
        let square = layout_text("42", &centered(0.2), 1.0, &params, &m);
        let wide = layout_text("42", &centered(0.2), 2.0, &params, &m);

        for (s, w) in square.vertices.iter().zip(&wide.vertices) {
            assert!(approx(s.x / 2.0, w.x));
            assert!(approx(s.y, w.y));
        }
        assert_eq!(square.uvs, wide.uvs);
    }

    #[test]
    fn glyph_offset_shifts_quad() {
        let g = Glyph {
            advance: 10.0,
            size: Vec2::new(8.0, 12.0),
            offset: Vec2::new(1.0, 3.0),
            atlas_origin: Vec2::new(4.0, 8.0),
        };
        let m = FontMetrics::new(10.0, Vec2::new(64.0, 64.0), [('x', g)]).unwrap();
        let style = TextStyle { origin_y: 0.0, size: 10.0, align: TextAlign::Center };
        let geo = layout_text("x", &style, 1.0, &TextLayoutParams::default(), &m);

        // pen at -5, offset +1 -> left edge at -4; offset y 3 -> top at -3
        assert!(approx(geo.vertices[0].x, -4.0));
        assert!(approx(geo.vertices[0].y, -3.0));
        assert!(approx(geo.vertices[5].y, -15.0));
        assert!(approx(geo.uvs[0].x, 4.0 / 64.0));
        assert!(approx(geo.uvs[5].y, 20.0 / 64.0));
    }

    #[test]
    fn empty_text_produces_no_geometry() {
        let g = layout_text("", &centered(0.1), 1.0, &TextLayoutParams::default(), &digits());
        assert!(g.is_empty());
    }

    #[test]
    fn layout_is_deterministic() {
        let m = digits();
        let params = TextLayoutParams::default();
        let a = layout_text("31415", &centered(0.15), 1.3, &params, &m);
        let b = layout_text("31415", &centered(0.15), 1.3, &params, &m);
        assert_eq!(a, b);
    }
}
