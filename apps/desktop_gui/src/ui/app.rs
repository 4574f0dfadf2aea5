use std::collections::HashMap;

use client_core::{render_blocks, ClientSettings, ImageSide, StoryBlock};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::TextureHandle;
use pdf_export::{DEFAULT_EXPORT_FILE_NAME, IMAGE_PLACEHOLDER};
use shared::domain::{LayoutVariant, StoryField};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::{UiError, UiErrorCategory, UiErrorContext, UiEvent},
        orchestration::dispatch_backend_command,
        reducer::{ImageSlot, StoryWriterState},
    },
    media::{fit_to_column, write_clipboard_text},
};

const MAX_IMAGE_HEIGHT: f32 = 360.0;

pub struct StoryWriterApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    state: StoryWriterState,
    /// Textures for the current story generation, by part index.
    textures: HashMap<usize, TextureHandle>,
    texture_generation: u64,
}

impl StoryWriterApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        settings: &ClientSettings,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            state: StoryWriterState::new(settings),
            textures: HashMap::new(),
            texture_generation: 0,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            if let Some(cmd) = self.state.apply_event(event) {
                dispatch_backend_command(&self.cmd_tx, cmd, &mut self.state.status);
            }
        }
        if self.texture_generation != self.state.generation() {
            self.textures.clear();
            self.texture_generation = self.state.generation();
        }
    }

    fn try_generate(&mut self) {
        if let Some(cmd) = self.state.request_generate() {
            if !dispatch_backend_command(&self.cmd_tx, cmd, &mut self.state.status) {
                self.state.generate_not_sent();
            }
        }
    }

    fn try_export(&mut self) {
        let suggested = self
            .state
            .export_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(DEFAULT_EXPORT_FILE_NAME)
            .to_string();
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(suggested)
            .add_filter("PDF document", &["pdf"])
            .save_file()
        else {
            return;
        };

        if let Some(cmd) = self.state.request_export(path) {
            if !dispatch_backend_command(&self.cmd_tx, cmd, &mut self.state.status) {
                self.state.export_not_sent();
            }
        }
    }

    fn copy_story(&mut self) {
        let Some(text) = self.state.story().map(|story| story.plain_text()) else {
            return;
        };
        match write_clipboard_text(&text) {
            Ok(()) => self.state.status = "Copied story text to clipboard".to_string(),
            Err(err) => {
                let err = UiError::new(
                    UiErrorCategory::Unknown,
                    UiErrorContext::Clipboard,
                    format!("Failed to copy story: {err}"),
                );
                self.state.status = err.status_text();
            }
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        ui.heading("Story Writer");
        ui.add_space(12.0);

        for field in StoryField::ALL {
            ui.label(egui::RichText::new(field.label()).strong());
            let current = self.state.form.draft().field(field).to_string();
            let selected_text = if current.is_empty() {
                format!("Select {}", field.label())
            } else {
                current.clone()
            };
            let mut selected = current.clone();
            egui::ComboBox::from_id_salt(field.label())
                .selected_text(selected_text)
                .width(ui.available_width())
                .show_ui(ui, |ui| {
                    for option in field.options() {
                        ui.selectable_value(&mut selected, option.to_string(), *option);
                    }
                });
            if selected != current {
                self.state.form.set_field(field, selected);
            }
            ui.add_space(6.0);
        }

        ui.label(egui::RichText::new("Layout").strong());
        egui::ComboBox::from_id_salt("layout_variant")
            .selected_text(self.state.layout.label())
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                for layout in LayoutVariant::ALL {
                    ui.selectable_value(&mut self.state.layout, layout, layout.label());
                }
            });
        ui.add_space(12.0);

        let busy = self.state.form.is_busy();
        let label = if busy { "Generating..." } else { "Generate Story" };
        let button = egui::Button::new(egui::RichText::new(label).strong().size(16.0))
            .min_size(egui::vec2(ui.available_width(), 36.0));
        if ui.add_enabled(!busy, button).clicked() {
            self.try_generate();
        }

        ui.add_space(6.0);
        let export_label = if self.state.is_exporting() {
            "Exporting..."
        } else {
            "Export PDF"
        };
        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.state.can_export(), egui::Button::new(export_label))
                .clicked()
            {
                self.try_export();
            }
            if ui
                .add_enabled(self.state.story().is_some(), egui::Button::new("Copy text"))
                .clicked()
            {
                self.copy_story();
            }
        });
    }

    fn show_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = self.state.banner.clone() else {
            return;
        };
        egui::Frame::group(ui.style())
            .fill(egui::Color32::from_rgb(111, 53, 53))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new(banner.message()).color(egui::Color32::WHITE));
                    if ui.button("Dismiss").clicked() {
                        self.state.banner = None;
                    }
                });
            });
    }

    fn show_story(&mut self, ui: &mut egui::Ui) {
        let Some(story) = self.state.story().cloned() else {
            ui.centered_and_justified(|ui| {
                ui.label(egui::RichText::new("Your story will appear here.").weak());
            });
            return;
        };

        let layout = self.state.layout;
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for block in render_blocks(&story, layout) {
                    self.show_block(ui, &block, layout);
                    ui.add_space(18.0);
                }
            });
    }

    fn show_block(&mut self, ui: &mut egui::Ui, block: &StoryBlock<'_>, layout: LayoutVariant) {
        if block.image_url.is_none() {
            ui.label(block.paragraph);
            return;
        }

        match layout {
            LayoutVariant::Stacked => {
                let width = ui.available_width();
                self.show_block_image(ui, block.index, width);
                ui.add_space(6.0);
                ui.label(block.paragraph);
            }
            LayoutVariant::SideBySide => {
                ui.columns(2, |columns| {
                    let (image_column, text_column) = match block.image_side {
                        ImageSide::Left => (0, 1),
                        ImageSide::Right => (1, 0),
                    };
                    let width = columns[image_column].available_width();
                    self.show_block_image(&mut columns[image_column], block.index, width);
                    columns[text_column].label(block.paragraph);
                });
            }
        }
    }

    fn show_block_image(&mut self, ui: &mut egui::Ui, index: usize, width: f32) {
        match self.state.image(index) {
            Some(ImageSlot::Ready(image)) => {
                let texture = self.textures.entry(index).or_insert_with(|| {
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(
                        [image.width, image.height],
                        &image.rgba,
                    );
                    ui.ctx().load_texture(
                        format!("story_image_{}_{index}", self.texture_generation),
                        color_image,
                        egui::TextureOptions::LINEAR,
                    )
                });
                let size = fit_to_column(image.width, image.height, width, MAX_IMAGE_HEIGHT);
                ui.add(egui::Image::new(&*texture).fit_to_exact_size(size.into()));
            }
            Some(ImageSlot::Failed(_)) => {
                ui.label(egui::RichText::new(IMAGE_PLACEHOLDER).italics().weak());
            }
            Some(ImageSlot::Loading) | None => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(egui::RichText::new("Loading image...").weak());
                });
            }
        }
    }
}

impl eframe::App for StoryWriterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(&self.state.status).weak());
            });
        });

        egui::SidePanel::left("story_form")
            .resizable(false)
            .default_width(300.0)
            .show(ctx, |ui| {
                self.show_form(ui);
                ui.add_space(12.0);
                self.show_banner(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| self.show_story(ui));

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
