use std::{
    io::Write,
    path::{Path, PathBuf},
};

use image::{DynamicImage, GenericImageView, RgbaImage};

use crate::{
    config::model::DeviceConfig,
    fonts::face::ResolvedFonts,
    foundation::{
        error::{AppshotsError, AppshotsResult},
        math::blend_straight_u8,
    },
    layout::{geometry, wrap},
    render::raster::TextRasterizer,
    text::engine::{TextBrushRgba8, TextLayoutEngine},
};

/// Size of the blank canvas used when the background image is absent.
pub const FALLBACK_BACKGROUND_SIZE: (u32, u32) = (1200, 800);
/// JPEG quality for every written preview.
pub const JPEG_QUALITY: u8 = 95;
/// Pixel density recorded in the JPEG header.
pub const OUTPUT_DPI: u16 = 300;

/// `{screenshot_stem}_{fastlane_device_identifier}_{NN}.jpg` for the 1-based slot `index`.
pub fn output_filename(config: &DeviceConfig, index: usize) -> String {
    let stem = Path::new(&config.filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(config.filename.as_str());
    format!(
        "{stem}_{}_{index:02}.jpg",
        config.fastlane_device_identifier
    )
}

/// Load a background image as RGBA. A missing file yields a white canvas.
pub fn load_background(path: &Path) -> AppshotsResult<RgbaImage> {
    if !path.is_file() {
        tracing::warn!(
            path = %path.display(),
            "background image not found, using blank white canvas"
        );
        let (w, h) = FALLBACK_BACKGROUND_SIZE;
        return Ok(RgbaImage::from_pixel(w, h, image::Rgba([255, 255, 255, 255])));
    }
    let img = open_image(path)?;
    Ok(DynamicImage::ImageRgb8(img.to_rgb8()).to_rgba8())
}

/// Load a phone screenshot, keeping its alpha channel.
pub fn load_phone(path: &Path) -> AppshotsResult<DynamicImage> {
    if !path.is_file() {
        return Err(AppshotsError::ImageAssetMissing {
            path: path.to_path_buf(),
        });
    }
    open_image(path)
}

fn open_image(path: &Path) -> AppshotsResult<DynamicImage> {
    image::open(path).map_err(|source| AppshotsError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })
}

/// Draws one preview: phone image over background plus a centered caption.
///
/// Holds the text shaping and rasterization state for one (device, language)
/// pass; create a fresh compositor per pass.
pub struct Compositor {
    engine: TextLayoutEngine,
    raster: TextRasterizer,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    pub fn new() -> Self {
        Self {
            engine: TextLayoutEngine::new(),
            raster: TextRasterizer::new(),
        }
    }

    /// Compose one slot. Inputs are not modified.
    pub fn render(
        &mut self,
        config: &DeviceConfig,
        fonts: &ResolvedFonts,
        background: &RgbaImage,
        phone: &DynamicImage,
    ) -> AppshotsResult<DynamicImage> {
        let mut canvas = background.clone();
        let (bg_w, bg_h) = canvas.dimensions();

        let placement = geometry::position_phone(
            (bg_w, bg_h),
            phone.dimensions(),
            config.scale_factor,
            config.phone_y_offset,
        );
        let scaled = image::imageops::resize(
            &phone.to_rgba8(),
            placement.width,
            placement.height,
            image::imageops::FilterType::Lanczos3,
        );
        image::imageops::overlay(&mut canvas, &scaled, placement.x, placement.y);

        let title = &fonts.title;
        let lines = wrap::wrap(
            &config.text,
            geometry::max_text_width(bg_w),
            title,
            &mut self.engine,
        );
        if lines.is_empty() {
            return Ok(DynamicImage::ImageRgba8(canvas));
        }
        let mut layouts = Vec::with_capacity(lines.len());
        for line in &lines {
            layouts.push(
                self.engine
                    .layout_line(line, title, TextBrushRgba8::BLACK)?,
            );
        }
        let widths: Vec<i64> = layouts
            .iter()
            .map(|l| l.width().round() as i64)
            .collect();
        let anchor_y = placement.y + i64::from(config.text_y_offset);
        let origins = geometry::center_text_block(
            &widths,
            placement.center_x(),
            geometry::line_height(config.font_size_title),
            anchor_y,
        );

        for (layout, origin) in layouts.iter().zip(origins) {
            self.raster
                .draw_line(&mut canvas, layout, title.face(), origin);
        }
        tracing::debug!(
            file = %config.filename,
            lines = lines.len(),
            family = title.face().family(),
            axis_weight = ?title.axis_weight(),
            "caption drawn"
        );
        Ok(DynamicImage::ImageRgba8(canvas))
    }

    /// Flatten onto white and write a JPEG (quality 95, 300 DPI).
    pub fn save(&self, image: &DynamicImage, output_path: &Path) -> AppshotsResult<PathBuf> {
        save_jpeg(image, output_path)
    }
}

/// Write `image` as the final JPEG, creating parent directories.
pub fn save_jpeg(image: &DynamicImage, output_path: &Path) -> AppshotsResult<PathBuf> {
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppshotsError::image_write(output_path, e))?;
    }
    let rgb = flatten_on_white(image);

    let file = std::fs::File::create(output_path)
        .map_err(|e| AppshotsError::image_write(output_path, e))?;
    let mut out = std::io::BufWriter::new(file);
    {
        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
        encoder.set_pixel_density(image::codecs::jpeg::PixelDensity::dpi(OUTPUT_DPI));
        encoder
            .encode(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| AppshotsError::image_write(output_path, e))?;
    }
    out.flush()
        .map_err(|e| AppshotsError::image_write(output_path, e))?;

    tracing::info!(path = %output_path.display(), "preview written");
    Ok(output_path.to_path_buf())
}

/// Drop alpha by compositing over opaque white.
pub fn flatten_on_white(image: &DynamicImage) -> image::RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    image::RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        image::Rgb([
            blend_straight_u8(r, 255, a),
            blend_straight_u8(g, 255, a),
            blend_straight_u8(b, 255, a),
        ])
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
