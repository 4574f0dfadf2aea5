//! UI/backend events and error modeling for desktop GUI controller.

use std::path::PathBuf;

use client_core::{ClientError, FormError};
use shared::domain::Story;

use crate::media::PreviewImage;

pub enum UiEvent {
    Info(String),
    StoryFinished(Result<Story, ClientError>),
    ImageLoaded {
        generation: u64,
        index: usize,
        image: PreviewImage,
    },
    ImageFailed {
        generation: u64,
        index: usize,
        reason: String,
    },
    Exported {
        path: PathBuf,
        pages: usize,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    Transport,
    Server,
    Export,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Generate,
    Export,
    Clipboard,
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Transport => "Connection",
        UiErrorCategory::Server => "Story service",
        UiErrorCategory::Export => "Export",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(
        category: UiErrorCategory,
        context: UiErrorContext,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            context,
            message: message.into(),
        }
    }

    /// Keeps the user-facing wording from [`ClientError::user_message`].
    pub fn from_client_error(err: &ClientError) -> Self {
        let category = match err {
            ClientError::InvalidBaseUrl { .. } => UiErrorCategory::Validation,
            ClientError::Transport(_) => UiErrorCategory::Transport,
            ClientError::Api { .. } => UiErrorCategory::Server,
            ClientError::MalformedResponse(_) => UiErrorCategory::Unknown,
        };
        Self::new(category, UiErrorContext::Generate, err.user_message())
    }

    pub fn from_form_error(err: &FormError) -> Self {
        Self::new(
            UiErrorCategory::Validation,
            UiErrorContext::Generate,
            err.to_string(),
        )
    }

    pub fn export(message: impl Into<String>) -> Self {
        Self::new(UiErrorCategory::Export, UiErrorContext::Export, message)
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Status line text, prefixed with the category label.
    pub fn status_text(&self) -> String {
        format!("{} error: {}", err_label(self.category), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::StoryField;

    #[test]
    fn service_errors_keep_the_detail_message() {
        let err = UiError::from_client_error(&ClientError::Api {
            status: 422,
            detail: Some("Invalid input".to_string()),
        });
        assert_eq!(err.category(), UiErrorCategory::Server);
        assert_eq!(err.context(), UiErrorContext::Generate);
        assert_eq!(err.message(), "Error: Invalid input");
        assert_eq!(err.status_text(), "Story service error: Error: Invalid input");
    }

    #[test]
    fn malformed_responses_use_the_generic_message() {
        let err = UiError::from_client_error(&ClientError::MalformedResponse("eof".into()));
        assert_eq!(err.category(), UiErrorCategory::Unknown);
        assert_eq!(err.message(), client_core::error::GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn form_errors_are_validation_errors() {
        let err = UiError::from_form_error(&FormError::MissingFields(vec![StoryField::Goal]));
        assert_eq!(err.category(), UiErrorCategory::Validation);
        assert_eq!(
            err.message(),
            "Please fill in all fields before generating a story."
        );
    }
}
