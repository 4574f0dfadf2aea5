//! Paginated PDF export of a generated story.
//!
//! [`export_story`] resolves each part's image through an [`ImageFetcher`],
//! lays the parts out with the configured [`LayoutVariant`], and returns an
//! [`ExportDocument`] that serializes with [`ExportDocument::to_pdf_bytes`].

use std::path::{Path, PathBuf};

use shared::domain::{LayoutVariant, StoryPart};
use thiserror::Error;
use tracing::{info, warn};

pub mod images;
pub mod layout;
pub mod metrics;
mod pdf;

pub use images::{decode_image, DecodedImage, ImageError, ImageFetcher, NoImages, PixelData};
pub use layout::{
    compose, Composer, ExportDocument, ImagePlacement, Page, PageItem, ResolvedImage, TextLine,
    IMAGE_PLACEHOLDER,
};
pub use metrics::{text_width, wrap_text};

pub const DEFAULT_EXPORT_FILE_NAME: &str = "generated_story.pdf";

#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub font_size: f32,
    pub line_height: f32,
    pub title: String,
    pub title_font_size: f32,
    pub title_line_height: f32,
    /// Vertical space after every part.
    pub part_spacing: f32,
    /// Space between an image and the text next to or below it.
    pub gutter: f32,
    pub layout: LayoutVariant,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            margin: 40.0,
            font_size: 12.0,
            line_height: 16.0,
            title: "Generated Story".to_string(),
            title_font_size: 20.0,
            title_line_height: 28.0,
            part_spacing: 12.0,
            gutter: 12.0,
            layout: LayoutVariant::Stacked,
        }
    }
}

impl ExportOptions {
    pub fn with_layout(mut self, layout: LayoutVariant) -> Self {
        self.layout = layout;
        self
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    pub fn usable_height(&self) -> f32 {
        self.page_height - 2.0 * self.margin
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Builds the paginated document for `parts`.
///
/// Images are fetched one at a time in part order. A part whose image cannot
/// be fetched or decoded gets a placeholder line instead; the export itself
/// never fails.
pub async fn export_story(
    parts: &[StoryPart],
    fetcher: &dyn ImageFetcher,
    options: &ExportOptions,
) -> ExportDocument {
    info!(parts = parts.len(), layout = %options.layout, "exporting story");

    let mut resolved = Vec::with_capacity(parts.len());
    for part in parts {
        resolved.push((part, resolve_image(part, fetcher).await));
    }

    let document = compose(resolved, options);
    info!(pages = document.page_count(), "story export laid out");
    document
}

async fn resolve_image(part: &StoryPart, fetcher: &dyn ImageFetcher) -> ResolvedImage {
    let Some(url) = part.image_url() else {
        return ResolvedImage::Absent;
    };

    let decoded = match fetcher.fetch(url).await {
        Ok(bytes) => decode_image(&bytes),
        Err(err) => Err(err),
    };

    match decoded {
        Ok(image) => ResolvedImage::Loaded(image),
        Err(err) => {
            warn!(url, "image unavailable for export: {err}");
            ResolvedImage::Failed
        }
    }
}

pub fn write_pdf(document: &ExportDocument, path: &Path) -> Result<(), ExportError> {
    std::fs::write(path, document.to_pdf_bytes()).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "wrote story pdf");
    Ok(())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
