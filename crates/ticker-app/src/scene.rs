//! Scene state: the three labels and the sample graph.
//!
//! Everything here is CPU-side; [`crate::app::TickerApp`] hands the resulting
//! geometry to the renderers every frame.

use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;

use ticker_engine::coords::{ColorRgba, Vec2};
use ticker_engine::graph::{GraphLayout, SampleSeries, tessellate};
use ticker_engine::text::{FontMetrics, TextGeometry, TextLayoutParams, TextStyle, layout_text};

use crate::config::{LabelConfig, SamplingConfig, TickerConfig};
use crate::price::PriceModel;

/// One line of text plus the geometry generated for it.
#[derive(Debug, Clone)]
pub struct TextEntity {
    text: String,
    style: TextStyle,
    color: ColorRgba,
    geometry: TextGeometry,
}

impl TextEntity {
    fn from_label(label: &LabelConfig) -> Self {
        Self {
            text: label.text.clone(),
            style: label.style(),
            color: label.color(),
            geometry: TextGeometry::default(),
        }
    }

    fn relayout(&mut self, layout: &TextLayout<'_>) {
        self.geometry = layout_text(
            &self.text,
            &self.style,
            layout.aspect_ratio,
            &layout.params,
            layout.metrics,
        );
    }

    fn set_text(&mut self, text: String, layout: &TextLayout<'_>) {
        self.text = text;
        self.relayout(layout);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self) -> ColorRgba {
        self.color
    }

    pub fn geometry(&self) -> &TextGeometry {
        &self.geometry
    }
}

struct TextLayout<'a> {
    metrics: &'a FontMetrics,
    params: TextLayoutParams,
    aspect_ratio: f32,
}

/// Owns every entity on screen and advances the random walk.
///
/// Generic over the random source so tests can run it deterministically.
pub struct TickerScene<R = StdRng> {
    metrics: FontMetrics,
    layout_params: TextLayoutParams,
    aspect_ratio: f32,
    header: TextEntity,
    price_label: TextEntity,
    change_label: TextEntity,

    series: SampleSeries,
    graph_layout: GraphLayout,
    line_width: f32,
    graph_color: ColorRgba,
    mesh: Vec<Vec2>,

    sampling: SamplingConfig,
    price: PriceModel,
    next_update: Duration,
    rng: R,
}

impl TickerScene<StdRng> {
    pub fn new(config: &TickerConfig, metrics: FontMetrics, aspect_ratio: f32) -> Self {
        Self::with_rng(config, metrics, aspect_ratio, StdRng::from_entropy())
    }
}

impl<R: Rng> TickerScene<R> {
    pub fn with_rng(
        config: &TickerConfig,
        metrics: FontMetrics,
        aspect_ratio: f32,
        rng: R,
    ) -> Self {
        let band = config.graph.band();
        let mut scene = Self {
            metrics,
            layout_params: config.text.layout_params(),
            aspect_ratio: sanitize_aspect(aspect_ratio),
            header: TextEntity::from_label(&config.text.header),
            price_label: TextEntity::from_label(&config.text.price),
            change_label: TextEntity::from_label(&config.text.change),
            series: SampleSeries::new(config.graph.capacity, band, band.midpoint()),
            graph_layout: config.graph.layout(),
            line_width: config.graph.line_width,
            graph_color: config.graph.color(),
            mesh: Vec::new(),
            sampling: config.sampling.clone(),
            price: config.price,
            next_update: Duration::ZERO,
            rng,
        };
        scene.relayout();
        scene
    }

    /// Advances the walk if its timer has expired. `now` is time since start.
    ///
    /// Returns whether a new sample was taken.
    pub fn update(&mut self, now: Duration) -> bool {
        if now < self.next_update {
            return false;
        }

        let step = self.rng.gen_range(-self.sampling.max_step..=self.sampling.max_step);
        let value = self.series.push(self.series.latest() + step);
        self.rebuild_mesh();
        self.refresh_quote();

        let delay_ms = self
            .rng
            .gen_range(self.sampling.min_interval_ms..=self.sampling.max_interval_ms);
        self.next_update = now.saturating_add(delay_from_ms(delay_ms));

        log::trace!("sample {value:.4}, next in {delay_ms:.0} ms");
        true
    }

    /// Regenerates all geometry for a new aspect ratio. Samples and label
    /// strings are left untouched.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        let aspect_ratio = sanitize_aspect(aspect_ratio);
        if aspect_ratio == self.aspect_ratio {
            return;
        }
        log::debug!("layout changed: aspect ratio {aspect_ratio:.3}");
        self.aspect_ratio = aspect_ratio;
        self.relayout();
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Header, price and change labels, in draw order.
    pub fn labels(&self) -> [&TextEntity; 3] {
        [&self.header, &self.price_label, &self.change_label]
    }

    pub fn series(&self) -> &SampleSeries {
        &self.series
    }

    pub fn line_mesh(&self) -> &[Vec2] {
        &self.mesh
    }

    pub fn graph_color(&self) -> ColorRgba {
        self.graph_color
    }

    fn relayout(&mut self) {
        let layout = TextLayout {
            metrics: &self.metrics,
            params: self.layout_params,
            aspect_ratio: self.aspect_ratio,
        };
        for label in [&mut self.header, &mut self.price_label, &mut self.change_label] {
            label.relayout(&layout);
        }
        self.rebuild_mesh();
    }

    fn rebuild_mesh(&mut self) {
        self.mesh = tessellate(self.series.iter(), &self.graph_layout, self.line_width);
    }

    fn refresh_quote(&mut self) {
        let band = self.series.band();
        let fraction = (self.series.latest() - band.min) as f64 / band.range() as f64;
        let quote = self.price.quote(fraction);

        let layout = TextLayout {
            metrics: &self.metrics,
            params: self.layout_params,
            aspect_ratio: self.aspect_ratio,
        };
        self.price_label.set_text(quote.price_label(), &layout);
        self.change_label.set_text(quote.change_label(), &layout);
        self.change_label.color = quote.change_color();
    }
}

/// Out-of-range delays saturate instead of panicking: too long means never,
/// negative or NaN means immediately.
fn delay_from_ms(ms: f64) -> Duration {
    match Duration::try_from_secs_f64(ms / 1000.0) {
        Ok(d) => d,
        Err(_) if ms > 0.0 => Duration::MAX,
        Err(_) => Duration::ZERO,
    }
}

fn sanitize_aspect(aspect_ratio: f32) -> f32 {
    if aspect_ratio > 0.0 && aspect_ratio.is_finite() {
        aspect_ratio
    } else {
        1.0
    }
}
