use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageOutputFormat};
use image_editor_block::{CompressionOptions, ImageCompressor};
use std::io::Cursor;

/// JPEG qualities tried in turn until the payload fits
const JPEG_QUALITIES: [u8; 6] = [90, 80, 70, 60, 50, 40];

/// `ImageCompressor` backed by the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterCompressor;

fn encode(image: &DynamicImage, format: ImageOutputFormat) -> Result<Vec<u8>, String> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), format)
        .map_err(|e| e.to_string())?;
    Ok(buffer)
}

fn encode_jpeg(image: &DynamicImage, budget: usize) -> Result<Vec<u8>, String> {
    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut smallest: Option<Vec<u8>> = None;
    for quality in JPEG_QUALITIES {
        let encoded = encode(&rgb, ImageOutputFormat::Jpeg(quality))?;
        if encoded.len() <= budget {
            return Ok(encoded);
        }
        smallest = Some(encoded);
    }
    smallest.ok_or_else(|| "no JPEG quality configured".to_string())
}

/// Raster format named by a MIME type
pub fn declared_format(content_type: &str) -> Option<ImageFormat> {
    match content_type.trim().to_ascii_lowercase().as_str() {
        "image/png" => Some(ImageFormat::Png),
        "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
        _ => None,
    }
}

impl ImageCompressor for RasterCompressor {
    fn compress(&self, raw: &[u8], content_type: &str, options: &CompressionOptions) -> Result<Vec<u8>, String> {
        let declared = declared_format(content_type)
            .ok_or_else(|| format!("unsupported content type: {}", content_type))?;
        let format = image::guess_format(raw).map_err(|e| e.to_string())?;
        if format != declared {
            return Err(format!("file declared as {} but contains {:?} data", content_type, format));
        }
        let decoded = image::load_from_memory_with_format(raw, format).map_err(|e| e.to_string())?;

        let (width, height) = decoded.dimensions();
        let max = options.max_dimension_px;
        let budget = options.max_size_bytes();
        let oversized = width.max(height) > max;

        if !oversized && raw.len() <= budget {
            return Ok(raw.to_vec());
        }

        let resized = if oversized {
            decoded.resize(max, max, FilterType::Lanczos3)
        } else {
            decoded
        };

        let encoded = match format {
            ImageFormat::Png => encode(&resized, ImageOutputFormat::Png)?,
            _ => encode_jpeg(&resized, budget)?,
        };

        if !oversized && encoded.len() >= raw.len() {
            return Ok(raw.to_vec());
        }
        if encoded.len() > budget {
            tracing::warn!(
                "⚠️ Compressed image still over budget: {} bytes (budget {})",
                encoded.len(),
                budget
            );
        }

        tracing::info!(
            "🗜️ Compressed image: {}x{} -> {}x{}, {} -> {} bytes",
            width,
            height,
            resized.width(),
            resized.height(),
            raw.len(),
            encoded.len()
        );
        Ok(encoded)
    }
}

#[cfg(test)]
#[path = "compression_test.rs"]
mod tests;
