//! UI layer for desktop GUI: the form panel and the story view.

pub mod app;

pub use app::StoryWriterApp;
