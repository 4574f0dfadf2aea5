//! Backend commands queued from UI to backend worker.

use std::path::PathBuf;

use shared::domain::{LayoutVariant, Story, StoryRequest};

#[derive(Debug, Clone)]
pub enum BackendCommand {
    GenerateStory(StoryRequest),
    /// Fetch and decode the images of story `generation`, keyed by part index.
    LoadImages {
        generation: u64,
        images: Vec<(usize, String)>,
    },
    ExportPdf {
        story: Story,
        layout: LayoutVariant,
        path: PathBuf,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::GenerateStory(_) => "generate_story",
            BackendCommand::LoadImages { .. } => "load_images",
            BackendCommand::ExportPdf { .. } => "export_pdf",
        }
    }
}
