//! Image preprocessing for OCR.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};
use tracing::debug;

use crate::config::PreprocessConfig;

/// Normalizes an arbitrary input photo into a contrast-enhanced grayscale
/// image the OCR engine can read reliably.
///
/// The step order is fixed and deliberate: blurring must precede the
/// contrast boost, otherwise sensor noise gets amplified along with the
/// print. Reordering these steps measurably degrades recognition of faint
/// thermal-printer output.
pub struct ImagePreprocessor {
    config: PreprocessConfig,
}

impl ImagePreprocessor {
    /// Create a preprocessor with default settings.
    pub fn new() -> Self {
        Self {
            config: PreprocessConfig::default(),
        }
    }

    /// Create a preprocessor from explicit configuration.
    pub fn with_config(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Run the full preprocessing pipeline.
    ///
    /// Deterministic and stateless; the only failure mode is upstream image
    /// decoding, which happens before this is called.
    pub fn preprocess(&self, image: &DynamicImage) -> GrayImage {
        let gray = image.to_luma8();
        let (w, h) = gray.dimensions();
        debug!("Preprocessing image: {}x{}", w, h);

        let gray = self.upscale(gray);

        let gray = if self.config.blur_sigma > 0.0 {
            imageops::blur(&gray, self.config.blur_sigma)
        } else {
            gray
        };

        let gray = adjust_contrast(&gray, self.config.contrast);
        let gray = adjust_brightness(&gray, self.config.brightness);
        let gray = sharpen(&gray, self.config.sharpness);

        let gray = if self.config.median_denoise {
            median_filter_3x3(&gray)
        } else {
            gray
        };

        if self.config.percentile_stretch {
            percentile_stretch(&gray, 2.0, 98.0)
        } else {
            gray
        }
    }

    /// Upscale isotropically so the shorter side reaches the configured
    /// minimum. Receipts photographed at thumbnail sizes are unreadable to
    /// the OCR engine without this.
    fn upscale(&self, gray: GrayImage) -> GrayImage {
        let (width, height) = gray.dimensions();
        let short_side = width.min(height);

        if short_side == 0 || short_side >= self.config.min_dimension {
            return gray;
        }

        let scale = self.config.min_dimension as f32 / short_side as f32;
        let new_width = ((width as f32 * scale).round() as u32).max(1);
        let new_height = ((height as f32 * scale).round() as u32).max(1);

        debug!(
            "Upscaling {}x{} -> {}x{}",
            width, height, new_width, new_height
        );

        imageops::resize(&gray, new_width, new_height, FilterType::Lanczos3)
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Scale pixel deviation from the image mean by `factor`.
fn adjust_contrast(image: &GrayImage, factor: f32) -> GrayImage {
    let (width, height) = image.dimensions();
    let count = (width as u64 * height as u64).max(1);
    let sum: u64 = image.pixels().map(|p| p[0] as u64).sum();
    let mean = sum as f32 / count as f32;

    let mut result = GrayImage::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels() {
        let value = (pixel[0] as f32 - mean) * factor + mean;
        result.put_pixel(x, y, Luma([value.clamp(0.0, 255.0) as u8]));
    }
    result
}

/// Multiply pixel intensity by `factor`.
fn adjust_brightness(image: &GrayImage, factor: f32) -> GrayImage {
    let mut result = image.clone();
    for pixel in result.pixels_mut() {
        pixel[0] = (pixel[0] as f32 * factor).clamp(0.0, 255.0) as u8;
    }
    result
}

/// Unsharp-mask style sharpening: push each pixel away from its blurred
/// neighborhood by `factor - 1`.
fn sharpen(image: &GrayImage, factor: f32) -> GrayImage {
    if (factor - 1.0).abs() < f32::EPSILON {
        return image.clone();
    }

    let blurred = imageops::blur(image, 1.0);
    let (width, height) = image.dimensions();
    let mut result = GrayImage::new(width, height);

    for (x, y, pixel) in image.enumerate_pixels() {
        let original = pixel[0] as f32;
        let smooth = blurred.get_pixel(x, y)[0] as f32;
        let value = original + (original - smooth) * (factor - 1.0);
        result.put_pixel(x, y, Luma([value.clamp(0.0, 255.0) as u8]));
    }
    result
}

/// 3x3 median filter; removes salt-and-pepper noise without softening
/// character edges the way a gaussian blur would.
fn median_filter_3x3(image: &GrayImage) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut result = GrayImage::new(width, height);
    let mut window = [0u8; 9];

    for y in 0..height {
        for x in 0..width {
            let mut n = 0;
            for dy in -1i64..=1 {
                for dx in -1i64..=1 {
                    let ny = y as i64 + dy;
                    let nx = x as i64 + dx;
                    if ny >= 0 && ny < height as i64 && nx >= 0 && nx < width as i64 {
                        window[n] = image.get_pixel(nx as u32, ny as u32)[0];
                        n += 1;
                    }
                }
            }
            window[..n].sort_unstable();
            result.put_pixel(x, y, Luma([window[n / 2]]));
        }
    }
    result
}

/// Clip intensities at the given low/high percentiles and rescale to the
/// full 0-255 range. Robust to outlier pixels that defeat a plain min/max
/// normalization.
fn percentile_stretch(image: &GrayImage, low_pct: f32, high_pct: f32) -> GrayImage {
    let mut histogram = [0u64; 256];
    for pixel in image.pixels() {
        histogram[pixel[0] as usize] += 1;
    }

    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return image.clone();
    }

    let low_count = (total as f64 * low_pct as f64 / 100.0) as u64;
    let high_count = (total as f64 * high_pct as f64 / 100.0) as u64;

    let mut cumulative = 0u64;
    let mut low = 0u8;
    let mut high = 255u8;
    let mut low_found = false;

    for (value, &count) in histogram.iter().enumerate() {
        cumulative += count;
        if !low_found && cumulative > low_count {
            low = value as u8;
            low_found = true;
        }
        if cumulative >= high_count {
            high = value as u8;
            break;
        }
    }

    if high <= low {
        return image.clone();
    }

    let range = (high - low) as f32;
    let mut result = image.clone();
    for pixel in result.pixels_mut() {
        let value = (pixel[0].saturating_sub(low)) as f32 * 255.0 / range;
        pixel[0] = value.clamp(0.0, 255.0) as u8;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_image(width: u32, height: u32, value: u8) -> GrayImage {
        GrayImage::from_pixel(width, height, Luma([value]))
    }

    #[test]
    fn test_small_image_upscaled_to_min_dimension() {
        let preprocessor = ImagePreprocessor::new();
        let image = DynamicImage::ImageLuma8(uniform_image(150, 200, 128));

        let processed = preprocessor.preprocess(&image);
        let (w, h) = processed.dimensions();

        assert!(w.min(h) >= 300);
        // Aspect ratio preserved (150:200 = 3:4).
        assert_eq!(w, 300);
        assert_eq!(h, 400);
    }

    #[test]
    fn test_large_image_not_resized() {
        let preprocessor = ImagePreprocessor::new();
        let image = DynamicImage::ImageLuma8(uniform_image(800, 600, 128));

        let processed = preprocessor.preprocess(&image);
        assert_eq!(processed.dimensions(), (800, 600));
    }

    #[test]
    fn test_preprocess_is_deterministic() {
        let preprocessor = ImagePreprocessor::new();
        let mut source = uniform_image(320, 320, 100);
        source.put_pixel(10, 10, Luma([220]));
        source.put_pixel(200, 150, Luma([30]));
        let image = DynamicImage::ImageLuma8(source);

        let first = preprocessor.preprocess(&image);
        let second = preprocessor.preprocess(&image);
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn test_contrast_widens_intensity_spread() {
        let mut source = uniform_image(10, 10, 128);
        source.put_pixel(0, 0, Luma([110]));
        source.put_pixel(1, 0, Luma([146]));

        let boosted = adjust_contrast(&source, 3.5);
        let min = boosted.pixels().map(|p| p[0]).min().unwrap();
        let max = boosted.pixels().map(|p| p[0]).max().unwrap();

        assert!(max - min > 146 - 110);
    }

    #[test]
    fn test_median_filter_removes_speckle() {
        let mut source = uniform_image(9, 9, 200);
        source.put_pixel(4, 4, Luma([0]));

        let filtered = median_filter_3x3(&source);
        assert_eq!(filtered.get_pixel(4, 4)[0], 200);
    }

    #[test]
    fn test_percentile_stretch_expands_range() {
        let mut source = uniform_image(10, 10, 100);
        for x in 0..10 {
            for y in 0..5 {
                source.put_pixel(x, y, Luma([150]));
            }
        }

        let stretched = percentile_stretch(&source, 2.0, 98.0);
        let min = stretched.pixels().map(|p| p[0]).min().unwrap();
        let max = stretched.pixels().map(|p| p[0]).max().unwrap();

        assert!(min < 100);
        assert!(max > 150);
    }
}
