//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod scan;

use std::path::Path;

use scanwise_core::ScanConfig;

/// Load configuration from an explicit path, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ScanConfig> {
    match config_path {
        Some(path) => Ok(ScanConfig::from_file(Path::new(path))?),
        None => Ok(ScanConfig::default()),
    }
}

/// Kind of input file, decided by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Image,
    Pdf,
}

/// Classify a path by extension; unknown extensions are rejected up front so
/// no bytes are read from files we cannot handle.
pub fn classify_input(path: &Path) -> Option<InputKind> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" => Some(InputKind::Pdf),
        "png" | "jpg" | "jpeg" | "webp" | "tiff" | "tif" | "bmp" => Some(InputKind::Image),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_extension() {
        assert_eq!(classify_input(Path::new("a.JPG")), Some(InputKind::Image));
        assert_eq!(classify_input(Path::new("b.pdf")), Some(InputKind::Pdf));
        assert_eq!(classify_input(Path::new("notes.txt")), None);
        assert_eq!(classify_input(Path::new("no_extension")), None);
    }
}
