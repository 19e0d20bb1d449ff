//! Image adapter: dimensions, sampled brightness/contrast/color heuristics,
//! and a letterboxed PNG thumbnail.
//!
//! Text detection is a fixed stub (`false`). No OCR runs here, and the value
//! never varies between runs.

use std::collections::HashSet;
use std::io::Cursor;

use async_trait::async_trait;
use base64::Engine;
use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageError, ImageFormat, Rgba, RgbaImage};

use sift_core::defaults::{IMAGE_SAMPLE_TARGET, THUMBNAIL_SIZE};
use sift_core::{Error, ExtractionAdapter, ExtractionResult, FileCategory, Result, UploadedFile};

use crate::banner;

pub struct ImageAdapter;

/// Aggregate pixel statistics from a sample of the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageStats {
    /// Mean luminance, 0-255.
    pub brightness: f64,
    /// Luminance standard deviation.
    pub contrast: f64,
    /// Distinct colors after quantizing each channel to 4 bits.
    pub color_variety: usize,
}

pub fn brightness_label(brightness: f64) -> &'static str {
    match brightness {
        b if b < 60.0 => "Dark",
        b if b < 120.0 => "Dim",
        b if b < 200.0 => "Bright",
        _ => "Very Bright",
    }
}

pub fn contrast_label(contrast: f64) -> &'static str {
    match contrast {
        c if c < 30.0 => "Low",
        c if c < 70.0 => "Medium",
        _ => "High",
    }
}

/// Sample every n-th pixel so at most about `IMAGE_SAMPLE_TARGET` are read.
pub fn sample_stats(img: &DynamicImage) -> ImageStats {
    let rgb = img.to_rgb8();
    let total = rgb.width() as u64 * rgb.height() as u64;
    let step = (total / IMAGE_SAMPLE_TARGET).max(1) as usize;

    let mut lum_sum = 0.0;
    let mut lum_sq_sum = 0.0;
    let mut count = 0usize;
    let mut colors = HashSet::new();
    for pixel in rgb.pixels().step_by(step) {
        let [r, g, b] = pixel.0;
        let lum = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
        lum_sum += lum;
        lum_sq_sum += lum * lum;
        count += 1;
        colors.insert((r >> 4, g >> 4, b >> 4));
    }

    if count == 0 {
        return ImageStats {
            brightness: 0.0,
            contrast: 0.0,
            color_variety: 0,
        };
    }
    let mean = lum_sum / count as f64;
    let variance = (lum_sq_sum / count as f64 - mean * mean).max(0.0);
    ImageStats {
        brightness: mean,
        contrast: variance.sqrt(),
        color_variety: colors.len(),
    }
}

/// Encode an image as a `data:image/png;base64,...` URL.
pub(crate) fn png_data_url(img: &DynamicImage) -> Result<String> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| Error::Internal(format!("Failed to encode thumbnail: {}", e)))?;
    Ok(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&buffer)
    ))
}

/// Fit the image inside a `size`x`size` black canvas, centered.
pub fn letterbox_thumbnail(img: &DynamicImage, size: u32) -> DynamicImage {
    let resized = img.resize(size, size, FilterType::Triangle).to_rgba8();
    let mut canvas = RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 255]));
    let x = (size - resized.width().min(size)) / 2;
    let y = (size - resized.height().min(size)) / 2;
    image::imageops::overlay(&mut canvas, &resized, x as i64, y as i64);
    DynamicImage::ImageRgba8(canvas)
}

fn analyze(data: &[u8]) -> Result<(u32, u32, ImageStats, String)> {
    let img = image::load_from_memory(data).map_err(|e| match e {
        ImageError::Unsupported(u) => {
            Error::UnsupportedFormat(format!("image encoding is not supported: {}", u))
        }
        other => Error::Extraction(format!("image could not be decoded: {}", other)),
    })?;
    let (width, height) = img.dimensions();
    let stats = sample_stats(&img);
    let thumbnail = png_data_url(&letterbox_thumbnail(&img, THUMBNAIL_SIZE))?;
    Ok((width, height, stats, thumbnail))
}

#[async_trait]
impl ExtractionAdapter for ImageAdapter {
    fn category(&self) -> FileCategory {
        FileCategory::Image
    }

    async fn extract(&self, file: &UploadedFile) -> Result<ExtractionResult> {
        let data = file.data.clone();
        // Decoded buffers are dropped inside the blocking task on every path.
        let (width, height, stats, thumbnail) = tokio::task::spawn_blocking(move || analyze(&data))
            .await
            .map_err(|e| Error::Internal(format!("Image analysis task error: {}", e)))??;

        let brightness = brightness_label(stats.brightness);
        let contrast = contrast_label(stats.contrast);
        let content = banner::header(
            "🖼️",
            "Image",
            &file.name,
            &[
                ("Dimensions", format!("{} × {} pixels", width, height)),
                ("Size", banner::format_size(file.size)),
                ("Brightness", brightness.to_string()),
                ("Contrast", contrast.to_string()),
                ("Color Variety", format!("{} distinct tones", stats.color_variety)),
                ("Text Detected", "No (text recognition is not available)".to_string()),
            ],
        );

        Ok(ExtractionResult::extracted(content)
            .with_meta("width", width)
            .with_meta("height", height)
            .with_meta("brightness", brightness)
            .with_meta("contrast", contrast)
            .with_meta("color_variety", stats.color_variety)
            .with_meta("text_detected", false)
            .with_meta("thumbnail", thumbnail))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "image"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn png_bytes(img: RgbImage) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_brightness_buckets() {
        assert_eq!(brightness_label(10.0), "Dark");
        assert_eq!(brightness_label(60.0), "Dim");
        assert_eq!(brightness_label(150.0), "Bright");
        assert_eq!(brightness_label(230.0), "Very Bright");
    }

    #[test]
    fn test_contrast_buckets() {
        assert_eq!(contrast_label(5.0), "Low");
        assert_eq!(contrast_label(50.0), "Medium");
        assert_eq!(contrast_label(120.0), "High");
    }

    #[test]
    fn test_stats_checkerboard_is_high_contrast() {
        let img = RgbImage::from_fn(20, 20, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        let stats = sample_stats(&DynamicImage::ImageRgb8(img));
        assert_eq!(contrast_label(stats.contrast), "High");
        assert_eq!(stats.color_variety, 2);
    }

    #[test]
    fn test_letterbox_is_square_with_black_bars() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 20, Rgb([255, 0, 0])));
        let thumb = letterbox_thumbnail(&img, 150).to_rgba8();
        assert_eq!(thumb.dimensions(), (150, 150));
        assert_eq!(thumb.get_pixel(0, 0).0, [0, 0, 0, 255]);
        let [r, g, _, _] = thumb.get_pixel(75, 75).0;
        assert!(r > 200 && g < 50);
    }

    #[tokio::test]
    async fn test_extract_bright_image() {
        let data = png_bytes(RgbImage::from_pixel(40, 20, Rgb([250, 250, 250])));
        let file = UploadedFile::new("white.png", "image/png", data);
        let result = ImageAdapter.extract(&file).await.unwrap();

        assert!(result.content.contains("Dimensions: 40 × 20 pixels"));
        assert!(result.content.contains("Brightness: Very Bright"));
        assert!(result.content.contains("Contrast: Low"));
        assert_eq!(result.metadata["text_detected"], false);
        let thumb = result.metadata["thumbnail"].as_str().unwrap();
        assert!(thumb.starts_with("data:image/png;base64,"));

        let png = base64::engine::general_purpose::STANDARD
            .decode(thumb.trim_start_matches("data:image/png;base64,"))
            .unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.dimensions(), (150, 150));
    }

    #[tokio::test]
    async fn test_extract_is_deterministic() {
        let img = RgbImage::from_fn(64, 64, |x, y| Rgb([(x * 4) as u8, (y * 4) as u8, 128]));
        let file = UploadedFile::new("gradient.png", "image/png", png_bytes(img));
        let a = ImageAdapter.extract(&file).await.unwrap();
        let b = ImageAdapter.extract(&file).await.unwrap();
        assert_eq!(a.content, b.content);
        assert_eq!(a.metadata, b.metadata);
    }

    #[tokio::test]
    async fn test_undecodable_image_errors() {
        let file = UploadedFile::new("broken.png", "image/png", "not an image");
        assert!(ImageAdapter.extract(&file).await.is_err());
    }
}
