//! Card image processing
//!
//! Uploaded images are normalized into the exact dimensions of their
//! card type: decode, flatten transparency onto white, scale to cover
//! the target rectangle, center-crop, and re-encode as PNG.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use crate::domain::card::CardType;
use crate::domain::DomainError;

/// Accepted upload content types
pub const ALLOWED_CONTENT_TYPES: &[&str] =
    &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Processes uploaded images into card-ready PNGs
#[derive(Debug, Clone)]
pub struct ImageProcessor {
    max_bytes: usize,
}

impl ImageProcessor {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    /// Validate content type and byte size before decoding
    pub fn validate(&self, data: &[u8], content_type: &str) -> Result<(), DomainError> {
        if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
            return Err(DomainError::image(format!(
                "Invalid file type: {}. Allowed types: {}",
                content_type,
                ALLOWED_CONTENT_TYPES.join(", ")
            )));
        }

        if data.len() > self.max_bytes {
            return Err(DomainError::image(format!(
                "File too large: {} bytes. Maximum size: {} bytes",
                data.len(),
                self.max_bytes
            )));
        }

        Ok(())
    }

    /// Process an image for the given card type, returning PNG bytes
    pub fn process(&self, data: &[u8], card_type: CardType) -> Result<Vec<u8>, DomainError> {
        let img = image::load_from_memory(data)
            .map_err(|e| DomainError::image(format!("Failed to decode image: {}", e)))?;

        let flattened = flatten_onto_white(&img);
        let (target_w, target_h) = card_type.dimensions();
        let covered = resize_to_cover(flattened, target_w, target_h);
        let cropped = center_crop(covered, target_w, target_h);

        let mut output = Cursor::new(Vec::new());
        cropped
            .write_to(&mut output, ImageFormat::Png)
            .map_err(|e| DomainError::image(format!("Failed to encode PNG: {}", e)))?;

        Ok(output.into_inner())
    }
}

/// Replace transparency with a white background
fn flatten_onto_white(img: &DynamicImage) -> DynamicImage {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut flat = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = pixel[3] as u32;
        let blend = |channel: u8| -> u8 {
            ((channel as u32 * alpha + 255 * (255 - alpha)) / 255) as u8
        };

        flat.put_pixel(x, y, Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]));
    }

    DynamicImage::ImageRgb8(flat)
}

/// Scale so the image covers the target rectangle, preserving aspect
/// ratio. The longer relative dimension overflows and is cropped later.
fn resize_to_cover(img: DynamicImage, target_w: u32, target_h: u32) -> DynamicImage {
    let (width, height) = (img.width() as u64, img.height() as u64);
    let (tw, th) = (target_w as u64, target_h as u64);

    // Compare width/height to tw/th without floating point
    let (new_w, new_h) = if width * th > tw * height {
        // Wider than target: scale by height, width overflows
        (((width * th) / height).max(tw) as u32, target_h)
    } else {
        // Taller than (or same as) target: scale by width
        (target_w, ((height * tw) / width).max(th) as u32)
    };

    img.resize_exact(new_w, new_h, FilterType::Lanczos3)
}

/// Crop the central target_w x target_h region
fn center_crop(img: DynamicImage, target_w: u32, target_h: u32) -> DynamicImage {
    let left = (img.width() - target_w) / 2;
    let top = (img.height() - target_h) / 2;

    img.crop_imm(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png_bytes(img: RgbaImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn solid_png(width: u32, height: u32, color: Rgba<u8>) -> Vec<u8> {
        png_bytes(RgbaImage::from_pixel(width, height, color))
    }

    fn processor() -> ImageProcessor {
        ImageProcessor::new(5 * 1024 * 1024)
    }

    #[test]
    fn test_validate_content_type() {
        let p = processor();
        assert!(p.validate(b"data", "image/png").is_ok());
        assert!(p.validate(b"data", "image/webp").is_ok());
        assert!(p.validate(b"data", "application/pdf").is_err());
        assert!(p.validate(b"data", "").is_err());
    }

    #[test]
    fn test_validate_size() {
        let p = ImageProcessor::new(10);
        assert!(p.validate(&[0u8; 10], "image/png").is_ok());
        assert!(p.validate(&[0u8; 11], "image/png").is_err());
    }

    #[test]
    fn test_process_summary_dimensions() {
        let data = solid_png(640, 480, Rgba([200, 10, 10, 255]));

        let out = processor().process(&data, CardType::Summary).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();

        assert_eq!(decoded.width(), 144);
        assert_eq!(decoded.height(), 144);
    }

    #[test]
    fn test_process_large_image_dimensions() {
        let data = solid_png(300, 900, Rgba([10, 200, 10, 255]));

        let out = processor()
            .process(&data, CardType::SummaryLargeImage)
            .unwrap();
        let decoded = image::load_from_memory(&out).unwrap();

        assert_eq!(decoded.width(), 1200);
        assert_eq!(decoded.height(), 628);
    }

    #[test]
    fn test_transparency_flattened_to_white() {
        let data = solid_png(144, 144, Rgba([0, 0, 0, 0]));

        let out = processor().process(&data, CardType::Summary).unwrap();
        let decoded = image::load_from_memory(&out).unwrap().to_rgb8();

        let center = decoded.get_pixel(72, 72);
        assert_eq!(center, &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_invalid_image_data() {
        let result = processor().process(b"definitely not an image", CardType::Summary);
        assert!(matches!(result, Err(DomainError::Image { .. })));
    }

    #[test]
    fn test_cover_resize_wide_input() {
        // 1000x100 against a 144x144 target must scale to height 144
        let resized = resize_to_cover(
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(1000, 100, Rgba([0, 0, 0, 255]))),
            144,
            144,
        );

        assert_eq!(resized.height(), 144);
        assert!(resized.width() >= 144);
    }

    #[test]
    fn test_cover_resize_exact_fit() {
        let resized = resize_to_cover(
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(288, 288, Rgba([0, 0, 0, 255]))),
            144,
            144,
        );

        assert_eq!((resized.width(), resized.height()), (144, 144));
    }
}
