//! Ticker configuration.
//!
//! Every field has a default matching the stock ticker; a JSON file named by
//! `TICKER_CONFIG` may override any subset of them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use winit::dpi::LogicalSize;

use ticker_engine::coords::ColorRgba;
use ticker_engine::graph::{GraphLayout, SampleBand};
use ticker_engine::text::{TextAlign, TextLayoutParams, TextStyle};
use ticker_engine::window::RuntimeConfig;

use crate::price::PriceModel;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "TICKER_CONFIG";

/// Largest accepted sample window.
pub const MAX_GRAPH_CAPACITY: usize = 100_000;

/// Longest accepted delay between samples (one minute).
pub const MAX_INTERVAL_MS: f64 = 60_000.0;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    pub window: WindowConfig,
    pub assets: AssetPaths,
    pub text: TextConfig,
    pub graph: GraphConfig,
    pub sampling: SamplingConfig,
    pub price: PriceModel,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub clear_color: [f32; 4],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "BTC/USDT ticker".to_string(),
            width: 1280.0,
            height: 720.0,
            clear_color: ColorRgba::white().to_array(),
        }
    }
}

impl WindowConfig {
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(self.width, self.height),
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.width > 0.0 && self.height > 0.0 {
            (self.width / self.height) as f32
        } else {
            1.0
        }
    }

    pub fn clear_color(&self) -> ColorRgba {
        ColorRgba::from_array(self.clear_color)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    /// BMFont-style JSON metrics for the SDF atlas.
    pub font_metrics: PathBuf,
    /// Atlas image (PNG).
    pub atlas_image: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            font_metrics: PathBuf::from("assets/fonts/arial_bold-msdf.json"),
            atlas_image: PathBuf::from("assets/fonts/arialbold.png"),
        }
    }
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelAlign {
    #[default]
    Center,
    Left,
}

impl From<LabelAlign> for TextAlign {
    fn from(a: LabelAlign) -> Self {
        match a {
            LabelAlign::Center => TextAlign::Center,
            LabelAlign::Left => TextAlign::Left,
        }
    }
}

/// One text entity's initial content and style.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelConfig {
    pub text: String,
    pub y: f32,
    pub size: f32,
    pub color: [f32; 4],
    #[serde(default)]
    pub align: LabelAlign,
}

impl LabelConfig {
    fn new(text: &str, y: f32, size: f32, color: [f32; 4]) -> Self {
        Self {
            text: text.to_string(),
            y,
            size,
            color,
            align: LabelAlign::Center,
        }
    }

    pub fn style(&self) -> TextStyle {
        TextStyle {
            origin_y: self.y,
            size: self.size,
            align: self.align.into(),
        }
    }

    pub fn color(&self) -> ColorRgba {
        ColorRgba::from_array(self.color)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Inset for left-aligned labels (NDC units before aspect compensation).
    pub left_margin: f32,
    pub header: LabelConfig,
    pub price: LabelConfig,
    pub change: LabelConfig,
}

impl Default for TextConfig {
    fn default() -> Self {
        const BLACK: [f32; 4] = ColorRgba::black().to_array();
        Self {
            left_margin: TextLayoutParams::default().left_margin,
            header: LabelConfig::new("BTC/USDT Binance", 0.25, 0.08, BLACK),
            price: LabelConfig::new("114,900.00", 0.15, 0.15, BLACK),
            change: LabelConfig::new("1.00%   1,140.87", 0.0, 0.05, [0.8, 0.0, 0.8, 0.7]),
        }
    }
}

impl TextConfig {
    pub fn layout_params(&self) -> TextLayoutParams {
        TextLayoutParams { left_margin: self.left_margin }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Maximum number of samples kept (and horizontal slots on screen).
    pub capacity: usize,
    pub min_y: f32,
    pub max_y: f32,
    /// Horizontal extent in NDC, centered on x = 0.
    pub total_width: f32,
    pub line_width: f32,
    pub color: [f32; 4],
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            capacity: 200,
            min_y: -0.5,
            max_y: -0.2,
            total_width: 1.0,
            line_width: 0.005,
            color: [0.8, 0.0, 0.8, 0.7],
        }
    }
}

impl GraphConfig {
    pub fn band(&self) -> SampleBand {
        SampleBand::new(self.min_y, self.max_y)
    }

    pub fn layout(&self) -> GraphLayout {
        GraphLayout::centered(self.total_width, self.capacity)
    }

    pub fn color(&self) -> ColorRgba {
        ColorRgba::from_array(self.color)
    }
}

/// Random-walk parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Each new sample is the previous one plus a step drawn from
    /// `[-max_step, max_step]`.
    pub max_step: f32,
    /// Delay before the next sample is drawn from `[min_interval_ms, max_interval_ms]`.
    pub min_interval_ms: f64,
    pub max_interval_ms: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            max_step: 0.025,
            min_interval_ms: 100.0,
            max_interval_ms: 300.0,
        }
    }
}

impl TickerConfig {
    /// Loads the file named by `TICKER_CONFIG`, or the defaults when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => {
                log::debug!("{CONFIG_ENV} not set; using default config");
                Ok(Self::default())
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_json_slice(&bytes)
            .with_context(|| format!("invalid config {}", path.display()))?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(bytes).context("malformed config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let g = &self.graph;
        anyhow::ensure!(
            (2..=MAX_GRAPH_CAPACITY).contains(&g.capacity),
            "graph.capacity must be in [2, {MAX_GRAPH_CAPACITY}], got {}",
            g.capacity
        );
        anyhow::ensure!(
            g.min_y.is_finite() && g.max_y.is_finite() && g.min_y < g.max_y,
            "graph.min_y ({}) must be below graph.max_y ({})",
            g.min_y,
            g.max_y
        );
        anyhow::ensure!(
            g.total_width.is_finite() && g.total_width > 0.0,
            "graph.total_width must be finite and positive, got {}",
            g.total_width
        );
        anyhow::ensure!(
            g.line_width.is_finite() && g.line_width > 0.0,
            "graph.line_width must be finite and positive, got {}",
            g.line_width
        );

        let s = &self.sampling;
        anyhow::ensure!(
            s.max_step.is_finite() && s.max_step >= 0.0,
            "sampling.max_step must be finite and not negative, got {}",
            s.max_step
        );
        anyhow::ensure!(
            0.0 <= s.min_interval_ms
                && s.min_interval_ms <= s.max_interval_ms
                && s.max_interval_ms <= MAX_INTERVAL_MS,
            "sampling interval [{}, {}] ms must lie within [0, {MAX_INTERVAL_MS}]",
            s.min_interval_ms,
            s.max_interval_ms
        );

        let p = &self.price;
        anyhow::ensure!(
            p.reference_price.is_finite() && p.reference_price != 0.0,
            "price.reference_price must be finite and non-zero"
        );

        let labels = [
            ("header", &self.text.header),
            ("price", &self.text.price),
            ("change", &self.text.change),
        ];
        for (name, label) in labels {
            anyhow::ensure!(
                label.size.is_finite() && label.size > 0.0,
                "text.{name}.size must be finite and positive"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        TickerConfig::default().validate().unwrap();
    }

    #[test]
    fn empty_object_yields_defaults() {
        let c = TickerConfig::from_json_slice(b"{}").unwrap();
        assert_eq!(c.graph.capacity, 200);
        assert_eq!(c.text.price.text, "114,900.00");
        assert_eq!(c.text.left_margin, 0.05);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let json = br#"{
            "graph": { "capacity": 50 },
            "text": {
                "left_margin": 0.1,
                "header": {
                    "text": "ETH/USDT", "y": 0.3, "size": 0.1,
                    "color": [0, 0, 0, 1], "align": "left"
                }
            }
        }"#;
        let c = TickerConfig::from_json_slice(json).unwrap();
        assert_eq!(c.graph.capacity, 50);
        assert_eq!(c.graph.line_width, 0.005);
        assert_eq!(c.text.header.align, LabelAlign::Left);
        assert_eq!(c.text.header.style().align, TextAlign::Left);
        assert_eq!(c.text.price.size, 0.15);
    }

    #[test]
    fn rejects_inverted_band() {
        let json = br#"{ "graph": { "min_y": 0.5, "max_y": 0.1 } }"#;
        let err = TickerConfig::from_json_slice(json).unwrap_err();
        assert!(format!("{err:#}").contains("min_y"));
    }

    #[test]
    fn rejects_inverted_interval() {
        let json = br#"{ "sampling": { "min_interval_ms": 500, "max_interval_ms": 100 } }"#;
        assert!(TickerConfig::from_json_slice(json).is_err());
    }

    #[test]
    fn rejects_oversized_capacity() {
        let json = format!(r#"{{ "graph": {{ "capacity": {} }} }}"#, u64::MAX);
        let err = TickerConfig::from_json_slice(json.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("graph.capacity"));

        let json = format!(r#"{{ "graph": {{ "capacity": {MAX_GRAPH_CAPACITY} }} }}"#);
        assert!(TickerConfig::from_json_slice(json.as_bytes()).is_ok());
    }

    #[test]
    fn rejects_interval_beyond_limit() {
        let json = br#"{ "sampling": { "max_interval_ms": 1e300 } }"#;
        let err = TickerConfig::from_json_slice(json).unwrap_err();
        assert!(format!("{err:#}").contains("sampling interval"));
    }

    #[test]
    fn rejects_non_finite_widths() {
        let mut c = TickerConfig::default();
        c.graph.total_width = f32::INFINITY;
        assert!(c.validate().is_err());

        let mut c = TickerConfig::default();
        c.graph.line_width = f32::NAN;
        assert!(c.validate().is_err());

        let mut c = TickerConfig::default();
        c.sampling.max_step = f32::INFINITY;
        assert!(c.validate().is_err());
    }

    #[test]
    fn window_aspect_ratio() {
        let w = WindowConfig { width: 1600.0, height: 800.0, ..WindowConfig::default() };
        assert_eq!(w.aspect_ratio(), 2.0);
    }
}
