//! UI state transitions. Events from the backend worker are folded into
//! [`StoryWriterState`]; user actions produce the commands to queue.

use std::{collections::HashMap, path::PathBuf};

use client_core::{ClientSettings, FormController, FormError, SubmitOutcome};
use shared::domain::{LayoutVariant, Story};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{UiError, UiErrorContext, UiEvent},
    media::PreviewImage,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSlot {
    Loading,
    Ready(PreviewImage),
    Failed(String),
}

pub struct StoryWriterState {
    pub form: FormController,
    pub layout: LayoutVariant,
    pub export_path: PathBuf,
    pub status: String,
    pub banner: Option<UiError>,
    generation: u64,
    images: HashMap<usize, ImageSlot>,
    exporting: bool,
}

impl StoryWriterState {
    pub fn new(settings: &ClientSettings) -> Self {
        Self {
            form: FormController::new(),
            layout: settings.layout,
            export_path: settings.export_path.clone(),
            status: "Choose a character, setting and goal".to_string(),
            banner: None,
            generation: 0,
            images: HashMap::new(),
            exporting: false,
        }
    }

    /// Bumped each time a new story replaces the current one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn story(&self) -> Option<&Story> {
        self.form.story()
    }

    pub fn image(&self, index: usize) -> Option<&ImageSlot> {
        self.images.get(&index)
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    pub fn can_export(&self) -> bool {
        !self.exporting && self.story().is_some_and(|story| !story.is_empty())
    }

    pub fn request_generate(&mut self) -> Option<BackendCommand> {
        match self.form.begin_submit() {
            Ok(request) => {
                self.status = "Generating story...".to_string();
                self.banner = None;
                Some(BackendCommand::GenerateStory(request))
            }
            Err(FormError::Busy) => None,
            Err(err) => {
                let err = UiError::from_form_error(&err);
                self.status = err.message().to_string();
                self.banner = Some(err);
                None
            }
        }
    }

    /// Undoes [`Self::request_generate`] when the command could not be queued.
    pub fn generate_not_sent(&mut self) {
        self.form.abandon_submit();
    }

    pub fn request_export(&mut self, path: PathBuf) -> Option<BackendCommand> {
        if !self.can_export() {
            return None;
        }
        let story = self.story()?.clone();
        self.exporting = true;
        self.status = format!("Exporting PDF to {}...", path.display());
        self.export_path = path.clone();
        Some(BackendCommand::ExportPdf {
            story,
            layout: self.layout,
            path,
        })
    }

    pub fn export_not_sent(&mut self) {
        self.exporting = false;
    }

    /// Applies one backend event and returns a follow-up command, if any.
    pub fn apply_event(&mut self, event: UiEvent) -> Option<BackendCommand> {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
                None
            }
            UiEvent::StoryFinished(result) => {
                let error = result.as_ref().err().map(UiError::from_client_error);
                match self.form.finish_submit(result) {
                    SubmitOutcome::Generated { parts } => {
                        self.status = match self.form.notice() {
                            Some(notice) => notice.message().to_string(),
                            None => format!("Story generated ({parts} parts)"),
                        };
                        self.banner = None;
                        self.start_image_loads()
                    }
                    SubmitOutcome::Failed(message) => {
                        self.status = message;
                        self.banner = error;
                        None
                    }
                    SubmitOutcome::Rejected(_) => None,
                }
            }
            UiEvent::ImageLoaded {
                generation,
                index,
                image,
            } => {
                if generation == self.generation {
                    self.images.insert(index, ImageSlot::Ready(image));
                }
                None
            }
            UiEvent::ImageFailed {
                generation,
                index,
                reason,
            } => {
                if generation == self.generation {
                    tracing::warn!(index, "story image unavailable: {reason}");
                    self.images.insert(index, ImageSlot::Failed(reason));
                }
                None
            }
            UiEvent::Exported { path, pages } => {
                self.exporting = false;
                self.status = format!("Exported {pages} page(s) to {}", path.display());
                None
            }
            UiEvent::Error(err) => {
                if err.context() == UiErrorContext::Export {
                    self.exporting = false;
                }
                self.status = err.status_text();
                self.banner = Some(err);
                None
            }
        }
    }

    fn start_image_loads(&mut self) -> Option<BackendCommand> {
        self.generation += 1;
        self.images.clear();

        let images: Vec<(usize, String)> = self
            .form
            .story()?
            .parts
            .iter()
            .enumerate()
            .filter_map(|(index, part)| part.image_url().map(|url| (index, url.to_string())))
            .collect();
        if images.is_empty() {
            return None;
        }

        for (index, _) in &images {
            self.images.insert(*index, ImageSlot::Loading);
        }
        Some(BackendCommand::LoadImages {
            generation: self.generation,
            images,
        })
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
