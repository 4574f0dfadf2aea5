use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::{
    images::PixelData,
    layout::{ExportDocument, PageItem},
};

const FONT_NAME: &[u8] = b"F1";

/// Baseline offset below the top of a line box, as a fraction of font size.
const ASCENT_RATIO: f32 = 0.8;

impl ExportDocument {
    /// Serializes the laid-out pages into a PDF file.
    pub fn to_pdf_bytes(&self) -> Vec<u8> {
        let mut pdf = Pdf::new();
        let mut next_id = 1i32;
        let mut alloc = || {
            let r = Ref::new(next_id);
            next_id += 1;
            r
        };

        let catalog_id = alloc();
        let pages_id = alloc();
        let font_id = alloc();
        let info_id = alloc();

        let image_ids: Vec<(Ref, Option<Ref>)> = self
            .images
            .iter()
            .map(|image| {
                let id = alloc();
                let mask = match &image.pixels {
                    PixelData::Rgb { alpha: Some(_), .. } => Some(alloc()),
                    _ => None,
                };
                (id, mask)
            })
            .collect();

        let page_ids: Vec<(Ref, Ref)> = self.pages.iter().map(|_| (alloc(), alloc())).collect();

        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id)
            .kids(page_ids.iter().map(|(page_id, _)| *page_id))
            .count(page_ids.len() as i32);
        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        pdf.document_info(info_id)
            .title(TextStr(&self.title))
            .producer(TextStr("story_writer"));

        for (image, (id, mask_id)) in self.images.iter().zip(&image_ids) {
            let width = image.width_px as i32;
            let height = image.height_px as i32;
            match &image.pixels {
                PixelData::Jpeg { bytes, grayscale } => {
                    let mut xobj = pdf.image_xobject(*id, bytes);
                    xobj.filter(Filter::DctDecode);
                    xobj.width(width);
                    xobj.height(height);
                    if *grayscale {
                        xobj.color_space().device_gray();
                    } else {
                        xobj.color_space().device_rgb();
                    }
                    xobj.bits_per_component(8);
                    xobj.finish();
                }
                PixelData::Rgb { compressed, alpha } => {
                    if let (Some(alpha), Some(mask_id)) = (alpha, mask_id) {
                        let mut mask = pdf.image_xobject(*mask_id, alpha);
                        mask.filter(Filter::FlateDecode);
                        mask.width(width);
                        mask.height(height);
                        mask.color_space().device_gray();
                        mask.bits_per_component(8);
                        mask.finish();
                    }
                    let mut xobj = pdf.image_xobject(*id, compressed);
                    xobj.filter(Filter::FlateDecode);
                    xobj.width(width);
                    xobj.height(height);
                    xobj.color_space().device_rgb();
                    xobj.bits_per_component(8);
                    if let Some(mask_id) = mask_id {
                        xobj.s_mask(*mask_id);
                    }
                    xobj.finish();
                }
            }
        }

        for (page, (page_id, content_id)) in self.pages.iter().zip(&page_ids) {
            let mut content = Content::new();
            let mut used_images = Vec::new();

            for item in &page.items {
                match item {
                    PageItem::Text(line) => {
                        let baseline = self.page_height - line.y - line.font_size * ASCENT_RATIO;
                        let bytes = to_winansi(&line.text);
                        content
                            .begin_text()
                            .set_font(Name(FONT_NAME), line.font_size)
                            .next_line(line.x, baseline)
                            .show(Str(&bytes))
                            .end_text();
                    }
                    PageItem::Image(placement) => {
                        let name = image_name(placement.image);
                        let y_bottom = self.page_height - placement.y - placement.height;
                        content.save_state();
                        content.transform([
                            placement.width,
                            0.0,
                            0.0,
                            placement.height,
                            placement.x,
                            y_bottom,
                        ]);
                        content.x_object(Name(name.as_bytes()));
                        content.restore_state();
                        if !used_images.contains(&placement.image) {
                            used_images.push(placement.image);
                        }
                    }
                }
            }

            let raw = content.finish();
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&raw, 6);
            pdf.stream(*content_id, &compressed)
                .filter(Filter::FlateDecode);

            let mut pdf_page = pdf.page(*page_id);
            pdf_page
                .media_box(Rect::new(0.0, 0.0, self.page_width, self.page_height))
                .parent(pages_id)
                .contents(*content_id);
            let mut resources = pdf_page.resources();
            resources.fonts().pair(Name(FONT_NAME), font_id);
            if !used_images.is_empty() {
                let mut x_objects = resources.x_objects();
                for index in &used_images {
                    let name = image_name(*index);
                    x_objects.pair(Name(name.as_bytes()), image_ids[*index].0);
                }
            }
        }

        pdf.finish()
    }
}

fn image_name(index: usize) -> String {
    format!("Im{}", index + 1)
}

/// Encodes text for the WinAnsi-encoded base-14 font. Characters the encoding
/// cannot represent become `?`.
pub(crate) fn to_winansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2026}' => 0x85,
            '\u{20AC}' => 0x80,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}
