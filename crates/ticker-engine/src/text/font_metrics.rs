use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::coords::Vec2;

/// Error returned while loading a font metrics descriptor.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font metrics from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse font metrics: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid font metrics: {0}")]
    Invalid(String),
}

/// Metrics for a single glyph, in font units (pixels of the atlas' source size).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Glyph {
    /// Horizontal pen advance after this glyph.
    pub advance: f32,
    /// Quad size.
    pub size: Vec2,
    /// Offset from the pen position to the quad's top-left corner (+Y down).
    pub offset: Vec2,
    /// Top-left of the glyph's atlas rect, in atlas pixels.
    pub atlas_origin: Vec2,
}

/// Immutable glyph table for one pre-baked SDF atlas.
///
/// Built once from the metrics descriptor; lookups are O(1) by character.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    line_size: f32,
    atlas_size: Vec2,
    glyphs: HashMap<char, Glyph>,
}

// ── descriptor (BMFont JSON as emitted by msdf-bmfont) ─────────────────────

#[derive(Debug, Deserialize)]
struct RawDescriptor {
    info: RawInfo,
    common: RawCommon,
    chars: Vec<RawChar>,
}

#[derive(Debug, Deserialize)]
struct RawInfo {
    size: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCommon {
    scale_w: f32,
    scale_h: f32,
}

#[derive(Debug, Deserialize)]
struct RawChar {
    #[serde(default)]
    id: Option<u32>,
    #[serde(default)]
    char: Option<RawCharKey>,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    xoffset: f32,
    yoffset: f32,
    xadvance: f32,
}

/// Some exporters write the character itself, others its code point.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCharKey {
    Text(String),
    Code(u32),
}

impl RawChar {
    fn key(&self) -> Result<char, FontError> {
        let from_code = |code: u32| {
            char::from_u32(code)
                .ok_or_else(|| FontError::Invalid(format!("code point {code:#x} is not a char")))
        };

        match &self.char {
            Some(RawCharKey::Text(s)) => {
                let mut it = s.chars();
                match (it.next(), it.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(FontError::Invalid(format!(
                        "char entry {s:?} is not a single character"
                    ))),
                }
            }
            Some(RawCharKey::Code(code)) => from_code(*code),
            None => match self.id {
                Some(code) => from_code(code),
                None => Err(FontError::Invalid("char entry has neither `char` nor `id`".into())),
            },
        }
    }

    fn glyph(&self) -> Glyph {
        Glyph {
            advance: self.xadvance,
            size: Vec2::new(self.width, self.height),
            offset: Vec2::new(self.xoffset, self.yoffset),
            atlas_origin: Vec2::new(self.x, self.y),
        }
    }
}

impl FontMetrics {
    /// Builds a metrics table directly from glyph entries.
    pub fn new(
        line_size: f32,
        atlas_size: Vec2,
        glyphs: impl IntoIterator<Item = (char, Glyph)>,
    ) -> Result<Self, FontError> {
        if !(line_size > 0.0 && line_size.is_finite()) {
            return Err(FontError::Invalid(format!("line size must be positive, got {line_size}")));
        }
        if !(atlas_size.x > 0.0 && atlas_size.y > 0.0 && atlas_size.is_finite()) {
            return Err(FontError::Invalid(format!(
                "atlas size must be positive, got {}x{}",
                atlas_size.x, atlas_size.y
            )));
        }

        Ok(Self {
            line_size,
            atlas_size,
            glyphs: glyphs.into_iter().collect(),
        })
    }

    /// Parses a BMFont-style JSON descriptor.
    ///
    /// Later duplicates of the same character win.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, FontError> {
        let raw: RawDescriptor = serde_json::from_slice(bytes)?;

        let mut glyphs = Vec::with_capacity(raw.chars.len());
        for c in &raw.chars {
            glyphs.push((c.key()?, c.glyph()));
        }

        let atlas_size = Vec2::new(raw.common.scale_w, raw.common.scale_h);
        let metrics = Self::new(raw.info.size, atlas_size, glyphs)?;
        log::debug!(
            "loaded font metrics: {} glyphs, line size {}, atlas {}x{}",
            metrics.glyphs.len(),
            metrics.line_size,
            metrics.atlas_size.x,
            metrics.atlas_size.y
        );
        Ok(metrics)
    }

    /// Reads and parses a descriptor file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FontError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_slice(&bytes)
    }

    /// Nominal size the atlas was generated at (`info.size`).
    #[inline]
    pub fn line_size(&self) -> f32 {
        self.line_size
    }

    /// Atlas dimensions in pixels (`common.scaleW`, `common.scaleH`).
    #[inline]
    pub fn atlas_size(&self) -> Vec2 {
        self.atlas_size
    }

    #[inline]
    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}
