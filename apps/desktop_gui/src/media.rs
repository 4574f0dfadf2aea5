//! Image decoding for the story panel and clipboard helpers.

use arboard::Clipboard;

/// Largest edge of a decoded story image, in pixels.
pub const PREVIEW_MAX_EDGE: u32 = 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

pub fn decode_preview_image(bytes: &[u8]) -> Result<PreviewImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let resized = if dynamic.width() > PREVIEW_MAX_EDGE || dynamic.height() > PREVIEW_MAX_EDGE {
        dynamic.thumbnail(PREVIEW_MAX_EDGE, PREVIEW_MAX_EDGE)
    } else {
        dynamic
    };
    let rgba = resized.to_rgba8();
    Ok(PreviewImage {
        width: rgba.width() as usize,
        height: rgba.height() as usize,
        rgba: rgba.into_raw(),
    })
}

/// Size at which an image is drawn in a column of `column_width` points.
pub fn fit_to_column(width: usize, height: usize, column_width: f32, max_height: f32) -> [f32; 2] {
    if width == 0 || height == 0 {
        return [0.0, 0.0];
    }
    let (w, h) = (width as f32, height as f32);
    let scale = (column_width / w).min(max_height / h).min(1.0);
    [w * scale, h * scale]
}

pub fn write_clipboard_text(text: &str) -> Result<(), String> {
    let mut clipboard = Clipboard::new().map_err(|err| err.to_string())?;
    clipboard
        .set_text(text.to_string())
        .map_err(|err| err.to_string())
}
