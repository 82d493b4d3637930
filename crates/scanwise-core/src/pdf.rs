//! PDF receipt intake using lopdf and pdf-extract.
//!
//! Receipts arrive as PDFs in two flavors: digitally generated ones with an
//! embedded text layer, and scanned ones that are just a photograph wrapped
//! in a page. [`PdfReceipt`] exposes both paths; the scanner decides which
//! to use based on how much text the layer actually yields.

use image::{DynamicImage, ImageBuffer, Rgba};
use lopdf::{Document, Object};
use tracing::{debug, trace};

use crate::error::PdfError;

/// A loaded PDF receipt.
pub struct PdfReceipt {
    document: Document,
    raw_data: Vec<u8>,
}

impl PdfReceipt {
    /// Parse a PDF from memory.
    ///
    /// Encrypted documents get one decryption attempt with the empty
    /// password, which covers the common "protected" bank statements; a real
    /// password requirement is reported as [`PdfError::Encrypted`].
    pub fn load(data: &[u8]) -> Result<Self, PdfError> {
        let mut document =
            Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let raw_data = if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            document
                .save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(e.to_string()))?;
            decrypted
        } else {
            data.to_vec()
        };

        if document.get_pages().is_empty() {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", document.get_pages().len());
        Ok(Self { document, raw_data })
    }

    pub fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    /// Extract the embedded text layer of the whole document.
    pub fn extract_text(&self) -> Result<String, PdfError> {
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    /// Extract every decodable raster image in the document.
    ///
    /// Scanned receipts are single photographs, so a document-wide object
    /// scan is sufficient; page attribution is not needed.
    pub fn extract_images(&self) -> Result<Vec<DynamicImage>, PdfError> {
        let mut images = Vec::new();

        for (_, object) in self.document.objects.iter() {
            if let Some(image) = extract_image_object(object) {
                images.push(image);
            }
        }

        debug!("Found {} images in document", images.len());
        if images.is_empty() {
            return Err(PdfError::ImageExtraction(
                "no decodable images in PDF".to_string(),
            ));
        }
        Ok(images)
    }
}

/// Decode a single PDF object if it is a raster image XObject.
fn extract_image_object(object: &Object) -> Option<DynamicImage> {
    let Object::Stream(stream) = object else {
        return None;
    };
    let dict = &stream.dict;

    let subtype = dict.get(b"Subtype").ok()?;
    if subtype.as_name().ok()? != b"Image" {
        return None;
    }

    let width = dict.get(b"Width").ok()?.as_i64().ok()? as u32;
    let height = dict.get(b"Height").ok()?.as_i64().ok()? as u32;
    trace!("Found image object: {}x{}", width, height);

    if let Ok(filter) = dict.get(b"Filter") {
        let filter_name = match filter {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
            _ => None,
        };

        match filter_name {
            Some(b"DCTDecode") => {
                // JPEG: the stream content is the compressed file itself.
                return image::load_from_memory_with_format(
                    &stream.content,
                    image::ImageFormat::Jpeg,
                )
                .ok();
            }
            Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
                trace!("Unsupported image filter in PDF");
                return None;
            }
            _ => {}
        }
    }

    let data = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());

    let color_space = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|o| match o {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
            _ => None,
        })
        .unwrap_or(b"DeviceRGB");

    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(8);
    if bits != 8 {
        trace!("Unsupported bits per component: {}", bits);
        return None;
    }

    decode_raw_pixels(&data, width, height, color_space)
}

/// Assemble uncompressed 8-bit RGB or grayscale samples into an image.
fn decode_raw_pixels(
    data: &[u8],
    width: u32,
    height: u32,
    color_space: &[u8],
) -> Option<DynamicImage> {
    let pixel_count = (width as usize) * (height as usize);

    if color_space == b"DeviceRGB" || color_space == b"RGB" {
        let expected = pixel_count * 3;
        if data.len() < expected {
            return None;
        }
        let mut rgba = Vec::with_capacity(pixel_count * 4);
        for chunk in data[..expected].chunks_exact(3) {
            rgba.extend_from_slice(&[chunk[0], chunk[1], chunk[2], 255]);
        }
        ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba).map(DynamicImage::ImageRgba8)
    } else if color_space == b"DeviceGray" || color_space == b"G" {
        if data.len() < pixel_count {
            return None;
        }
        let mut rgba = Vec::with_capacity(pixel_count * 4);
        for &gray in &data[..pixel_count] {
            rgba.extend_from_slice(&[gray, gray, gray, 255]);
        }
        ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba).map(DynamicImage::ImageRgba8)
    } else {
        trace!(
            "Unsupported color space: {:?}",
            String::from_utf8_lossy(color_space)
        );
        None
    }
}
