use anyhow::{Context, Result};

use ticker_engine::render::shapes::text::AtlasImage;
use ticker_engine::text::FontMetrics;

use crate::config::AssetPaths;

/// Font resources loaded once before the window opens.
#[derive(Debug)]
pub struct Assets {
    pub metrics: FontMetrics,
    pub atlas: AtlasImage,
}

pub fn load_assets(paths: &AssetPaths) -> Result<Assets> {
    let metrics = FontMetrics::load(&paths.font_metrics)
        .with_context(|| format!("failed to load font metrics {}", paths.font_metrics.display()))?;

    let bytes = std::fs::read(&paths.atlas_image)
        .with_context(|| format!("failed to read font atlas {}", paths.atlas_image.display()))?;
    let atlas = decode_atlas(&bytes)
        .with_context(|| format!("failed to decode font atlas {}", paths.atlas_image.display()))?;

    let declared = metrics.atlas_size();
    if declared.x != atlas.width() as f32 || declared.y != atlas.height() as f32 {
        log::warn!(
            "font atlas is {}x{} but metrics declare {}x{}; glyph UVs may be off",
            atlas.width(),
            atlas.height(),
            declared.x,
            declared.y
        );
    }

    log::info!(
        "loaded font: {} glyphs, atlas {}x{}",
        metrics.len(),
        atlas.width(),
        atlas.height()
    );
    Ok(Assets { metrics, atlas })
}

/// Decodes an encoded image into tightly packed RGBA8.
pub fn decode_atlas(bytes: &[u8]) -> Result<AtlasImage> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    AtlasImage::new(width, height, rgba.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;
    use std::path::PathBuf;

    use image::{ImageFormat, Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([255, 128, 0, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_png_to_rgba() {
        let atlas = decode_atlas(&png_bytes(4, 2)).unwrap();
        assert_eq!((atlas.width(), atlas.height()), (4, 2));
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode_atlas(b"not an image").is_err());
    }

    #[test]
    fn loads_from_disk() {
        let dir = std::env::temp_dir().join(format!("ticker-assets-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let metrics = dir.join("font.json");
        let atlas = dir.join("font.png");
        std::fs::write(
            &metrics,
            r#"{ "info": { "size": 32 }, "common": { "scaleW": 4, "scaleH": 2 },
                 "chars": [ { "char": "A", "x": 0, "y": 0, "width": 2, "height": 2,
                              "xoffset": 0, "yoffset": 0, "xadvance": 2 } ] }"#,
        )
        .unwrap();
        std::fs::write(&atlas, png_bytes(4, 2)).unwrap();

        let paths = AssetPaths {
            font_metrics: metrics,
            atlas_image: atlas,
        };
        let assets = load_assets(&paths).unwrap();
        assert_eq!(assets.metrics.len(), 1);
        assert_eq!(assets.atlas.width(), 4);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_files_report_path() {
        let paths = AssetPaths {
            font_metrics: PathBuf::from("/nonexistent/ticker/font.json"),
            ..AssetPaths::default()
        };
        let err = load_assets(&paths).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/ticker/font.json"));
    }
}
