//! Configuration structures for the scanning pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for the scanwise pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// OCR engine configuration.
    pub ocr: OcrConfig,

    /// Image preprocessing configuration.
    pub preprocess: PreprocessConfig,

    /// Receipt field extraction configuration.
    pub extraction: ExtractionConfig,

    /// PDF intake configuration.
    pub pdf: PdfConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ocr: OcrConfig::default(),
            preprocess: PreprocessConfig::default(),
            extraction: ExtractionConfig::default(),
            pdf: PdfConfig::default(),
        }
    }
}

/// OCR engine configuration.
///
/// Passed explicitly into the engine at construction time; the library never
/// mutates process-wide state to locate or configure the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Recognition language passed to the backend.
    pub language: String,

    /// Page segmentation mode. 6 treats the receipt as a uniform text block,
    /// which holds up best on narrow thermal prints.
    pub psm: i32,

    /// OCR engine mode (3 = default, LSTM where available).
    pub oem: i32,

    /// DPI hint for the backend.
    pub dpi: i32,

    /// Upper bound on one OCR call, in seconds. A timed-out call is an
    /// extraction failure, not a partial result.
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            psm: 6,
            oem: 3,
            dpi: 300,
            timeout_secs: 30,
        }
    }
}

/// Image preprocessing configuration.
///
/// Defaults are tuned for low-resolution, low-contrast phone photos of
/// receipts; the pipeline order is fixed, only the knobs move.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Minimum length of the shorter image side after upscaling, in pixels.
    pub min_dimension: u32,

    /// Gaussian blur sigma applied before contrast operations.
    pub blur_sigma: f32,

    /// Multiplicative contrast factor.
    pub contrast: f32,

    /// Multiplicative brightness factor.
    pub brightness: f32,

    /// Sharpness factor applied after contrast/brightness.
    pub sharpness: f32,

    /// Apply a 3x3 median filter for edge-preserving denoise.
    pub median_denoise: bool,

    /// Clip intensities to the 2nd/98th percentile and rescale.
    pub percentile_stretch: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            min_dimension: 300,
            blur_sigma: 1.0,
            contrast: 3.5,
            brightness: 1.2,
            sharpness: 2.5,
            median_denoise: false,
            percentile_stretch: false,
        }
    }
}

/// Receipt field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum length of the vendor field, in characters.
    pub vendor_max_len: usize,

    /// Placeholder vendor when no line qualifies. Never empty.
    pub vendor_placeholder: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            vendor_max_len: 50,
            vendor_placeholder: "Receipt".to_string(),
        }
    }
}

/// PDF intake configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Use embedded PDF text instead of OCR when it is long enough.
    pub prefer_embedded_text: bool,

    /// Minimum embedded text length to skip OCR.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            prefer_embedded_text: true,
            min_text_length: 50,
        }
    }
}

impl ScanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
