use async_trait::async_trait;
use image::{DynamicImage, GenericImageView, ImageFormat};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to fetch image {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image has zero width or height")]
    Empty,
}

/// Source of raw image bytes for the URLs referenced by story parts.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageError>;
}

/// Fetcher for stories exported without network access: every lookup fails,
/// so each image is replaced by the placeholder line.
pub struct NoImages;

#[async_trait]
impl ImageFetcher for NoImages {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        Err(ImageError::Fetch {
            url: url.to_string(),
            reason: "image fetching disabled".to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelData {
    /// Original JPEG stream, embedded without re-encoding.
    Jpeg { bytes: Vec<u8>, grayscale: bool },
    /// Zlib-compressed 8-bit RGB samples plus an optional compressed alpha
    /// channel.
    Rgb {
        compressed: Vec<u8>,
        alpha: Option<Vec<u8>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width_px: u32,
    pub height_px: u32,
    pub pixels: PixelData,
}

impl DecodedImage {
    /// Display size for a box `target_width` wide, preserving aspect ratio and
    /// shrinking further when the height would exceed `max_height`.
    pub fn display_size(&self, target_width: f32, max_height: f32) -> (f32, f32) {
        display_size(self.width_px, self.height_px, target_width, max_height)
    }
}

pub fn display_size(width_px: u32, height_px: u32, target_width: f32, max_height: f32) -> (f32, f32) {
    let aspect = height_px as f32 / width_px.max(1) as f32;
    let height = target_width * aspect;
    if height > max_height && max_height > 0.0 {
        (max_height / aspect, max_height)
    } else {
        (target_width, height)
    }
}

pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, ImageError> {
    let format = image::guess_format(bytes)?;
    let decoded = image::load_from_memory_with_format(bytes, format)?;
    let (width_px, height_px) = decoded.dimensions();
    if width_px == 0 || height_px == 0 {
        return Err(ImageError::Empty);
    }

    // Only gray and YCbCr/RGB streams can be embedded as DCT data; CMYK and
    // YCCK JPEGs go through the decoded RGB pixels instead.
    let pixels = match (format, jpeg_component_count(bytes)) {
        (ImageFormat::Jpeg, Some(components @ (1 | 3))) => PixelData::Jpeg {
            bytes: bytes.to_vec(),
            grayscale: components == 1,
        },
        _ => compress_pixels(&decoded),
    };

    Ok(DecodedImage {
        width_px,
        height_px,
        pixels,
    })
}

/// Number of color components declared by the first frame header of a JPEG
/// stream.
fn jpeg_component_count(bytes: &[u8]) -> Option<u8> {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return None;
    }
    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        let is_frame = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_frame {
            return bytes.get(pos + 9).copied();
        }
        let len = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
        pos += 2 + len;
    }
    None
}

fn compress_pixels(decoded: &DynamicImage) -> PixelData {
    let rgb = decoded.to_rgb8();
    let compressed = miniz_oxide::deflate::compress_to_vec_zlib(rgb.as_raw(), 6);

    let alpha = decoded.color().has_alpha().then(|| {
        let alpha: Vec<u8> = decoded.to_rgba8().pixels().map(|p| p.0[3]).collect();
        miniz_oxide::deflate::compress_to_vec_zlib(&alpha, 6)
    });

    PixelData::Rgb { compressed, alpha }
}
