//! Page composition. Coordinates are in points measured from the top-left
//! corner of the page; `y` is the top edge of the item's box.

use shared::domain::{LayoutVariant, StoryPart};

use crate::{
    images::DecodedImage,
    metrics::{text_width, wrap_text},
    ExportOptions,
};

pub const IMAGE_PLACEHOLDER: &str = "(Image could not be loaded)";

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImagePlacement {
    /// Index into [`ExportDocument::images`].
    pub image: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageItem {
    Text(TextLine),
    Image(ImagePlacement),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<PageItem>,
}

impl Page {
    pub fn text_lines(&self) -> impl Iterator<Item = &TextLine> {
        self.items.iter().filter_map(|item| match item {
            PageItem::Text(line) => Some(line),
            PageItem::Image(_) => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = &ImagePlacement> {
        self.items.iter().filter_map(|item| match item {
            PageItem::Image(image) => Some(image),
            PageItem::Text(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub page_width: f32,
    pub page_height: f32,
    pub title: String,
    pub pages: Vec<Page>,
    pub images: Vec<DecodedImage>,
}

impl ExportDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Text of every line in reading order, across pages.
    pub fn lines(&self) -> Vec<&str> {
        self.pages
            .iter()
            .flat_map(Page::text_lines)
            .map(|line| line.text.as_str())
            .collect()
    }
}

/// Outcome of resolving a part's image before it is laid out.
#[derive(Debug, Clone)]
pub enum ResolvedImage {
    Absent,
    Loaded(DecodedImage),
    Failed,
}

/// Places title, images and wrapped paragraphs onto pages, breaking to a new
/// page whenever the next block would cross the bottom margin.
pub struct Composer<'a> {
    options: &'a ExportOptions,
    pages: Vec<Page>,
    images: Vec<DecodedImage>,
    cursor: f32,
}

impl<'a> Composer<'a> {
    pub fn new(options: &'a ExportOptions) -> Self {
        let mut composer = Self {
            options,
            pages: vec![Page::default()],
            images: Vec::new(),
            cursor: options.margin,
        };
        composer.place_title();
        composer
    }

    fn place_title(&mut self) {
        let options = self.options;
        let width = text_width(&options.title, options.title_font_size);
        let x = ((options.page_width - width) / 2.0).max(options.margin);
        self.push(PageItem::Text(TextLine {
            x,
            y: self.cursor,
            font_size: options.title_font_size,
            text: options.title.clone(),
        }));
        self.cursor += options.title_line_height + options.part_spacing;
    }

    fn bottom(&self) -> f32 {
        self.options.page_height - self.options.margin
    }

    fn at_page_top(&self) -> bool {
        self.cursor <= self.options.margin
    }

    fn push(&mut self, item: PageItem) {
        if let Some(page) = self.pages.last_mut() {
            page.items.push(item);
        }
    }

    fn page_index(&self) -> usize {
        self.pages.len() - 1
    }

    /// Starts a new page when a block of `height` does not fit below the
    /// cursor. A block taller than the usable area is placed at the top of a
    /// page rather than looping on blank pages.
    fn ensure_room(&mut self, height: f32) {
        if self.cursor + height > self.bottom() && !self.at_page_top() {
            self.pages.push(Page::default());
            self.cursor = self.options.margin;
        }
    }

    fn emit_lines(&mut self, lines: Vec<String>, x: f32) {
        let line_height = self.options.line_height;
        for text in lines {
            self.ensure_room(line_height);
            self.push(PageItem::Text(TextLine {
                x,
                y: self.cursor,
                font_size: self.options.font_size,
                text,
            }));
            self.cursor += line_height;
        }
    }

    fn emit_paragraph(&mut self, paragraph: &str, x: f32, width: f32) {
        let lines = wrap_text(paragraph, width, self.options.font_size);
        self.emit_lines(lines, x);
    }

    fn place_image(&mut self, image: DecodedImage, x: f32, width: f32, height: f32) -> f32 {
        self.ensure_room(height);
        let top = self.cursor;
        let index = self.images.len();
        self.images.push(image);
        self.push(PageItem::Image(ImagePlacement {
            image: index,
            x,
            y: top,
            width,
            height,
        }));
        top
    }

    pub fn add_part(&mut self, index: usize, part: &StoryPart, image: ResolvedImage) {
        let options = self.options;
        let margin = options.margin;
        let content_width = options.content_width();

        match (options.layout, image) {
            (_, ResolvedImage::Absent) => {
                self.emit_paragraph(&part.paragraph, margin, content_width);
            }
            (_, ResolvedImage::Failed) => {
                self.emit_lines(vec![IMAGE_PLACEHOLDER.to_string()], margin);
                self.emit_paragraph(&part.paragraph, margin, content_width);
            }
            (LayoutVariant::Stacked, ResolvedImage::Loaded(image)) => {
                let (width, height) = image.display_size(content_width, options.usable_height());
                let x = margin + (content_width - width) / 2.0;
                let top = self.place_image(image, x, width, height);
                self.cursor = top + height + options.gutter;
                self.emit_paragraph(&part.paragraph, margin, content_width);
            }
            (LayoutVariant::SideBySide, ResolvedImage::Loaded(image)) => {
                let (width, height) =
                    image.display_size(content_width / 2.0, options.usable_height());
                let float_left = index % 2 == 0;
                let image_x = if float_left {
                    margin
                } else {
                    margin + content_width - width
                };
                let top = self.place_image(image, image_x, width, height);
                let image_page = self.page_index();

                let column_width = (content_width - width - options.gutter).max(options.font_size);
                let column_x = if float_left {
                    margin + width + options.gutter
                } else {
                    margin
                };
                self.emit_paragraph(&part.paragraph, column_x, column_width);

                if self.page_index() == image_page {
                    self.cursor = self.cursor.max(top + height);
                }
            }
        }

        self.cursor += options.part_spacing;
    }

    pub fn finish(self) -> ExportDocument {
        ExportDocument {
            page_width: self.options.page_width,
            page_height: self.options.page_height,
            title: self.options.title.clone(),
            pages: self.pages,
            images: self.images,
        }
    }
}

/// Lays out parts whose images have already been resolved.
pub fn compose<'p>(
    parts: impl IntoIterator<Item = (&'p StoryPart, ResolvedImage)>,
    options: &ExportOptions,
) -> ExportDocument {
    let mut composer = Composer::new(options);
    for (index, (part, image)) in parts.into_iter().enumerate() {
        composer.add_part(index, part, image);
    }
    composer.finish()
}
