//! Form state for a story request: the three selections, the busy flag, the
//! current story and the message shown to the user.

use async_trait::async_trait;
use shared::domain::{Story, StoryField, StoryRequest};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::error::ClientError;

pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all fields before generating a story.";

#[async_trait]
pub trait StoryGenerator: Send + Sync {
    async fn generate_story(&self, request: &StoryRequest) -> Result<Story, ClientError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{}", MISSING_FIELDS_MESSAGE)]
    MissingFields(Vec<StoryField>),
    #[error("A story is already being generated.")]
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Info(message) | Notice::Error(message) => message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Generated { parts: usize },
    Rejected(FormError),
    Failed(String),
}

#[derive(Debug, Default)]
pub struct FormController {
    draft: StoryRequest,
    busy: bool,
    story: Option<Story>,
    notice: Option<Notice>,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_draft(draft: StoryRequest) -> Self {
        Self {
            draft,
            ..Self::default()
        }
    }

    pub fn draft(&self) -> &StoryRequest {
        &self.draft
    }

    pub fn set_field(&mut self, field: StoryField, value: impl Into<String>) {
        *self.draft.field_mut(field) = value.into();
    }

    pub fn set_character(&mut self, value: impl Into<String>) {
        self.set_field(StoryField::Character, value);
    }

    pub fn set_setting(&mut self, value: impl Into<String>) {
        self.set_field(StoryField::Setting, value);
    }

    pub fn set_goal(&mut self, value: impl Into<String>) {
        self.set_field(StoryField::Goal, value);
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn story(&self) -> Option<&Story> {
        self.story.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Validates the draft and marks a request as in flight.
    ///
    /// On success the caller must hand the request's result back through
    /// [`FormController::finish_submit`].
    pub fn begin_submit(&mut self) -> Result<StoryRequest, FormError> {
        if self.busy {
            return Err(FormError::Busy);
        }

        let missing = self.draft.missing_fields();
        if !missing.is_empty() {
            warn!(?missing, "story form submitted with empty fields");
            self.notice = Some(Notice::Error(MISSING_FIELDS_MESSAGE.to_string()));
            return Err(FormError::MissingFields(missing));
        }

        self.busy = true;
        self.notice = None;
        Ok(self.draft.clone())
    }

    /// Records the result of a request started with `begin_submit`. The busy
    /// flag is cleared on every path; a failure keeps the previous story.
    /// Either way the notice describes the outcome.
    pub fn finish_submit(&mut self, result: Result<Story, ClientError>) -> SubmitOutcome {
        self.busy = false;
        match result {
            Ok(story) => {
                let parts = story.parts.len();
                info!(parts, "story generated");
                self.story = Some(story);
                self.notice = Some(Notice::Info(format!("Story generated with {parts} parts.")));
                SubmitOutcome::Generated { parts }
            }
            Err(err) => {
                error!(status = ?err.status(), "error generating story: {err}");
                let message = err.user_message();
                self.notice = Some(Notice::Error(message.clone()));
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Clears the busy flag for a request that was never sent.
    pub fn abandon_submit(&mut self) {
        self.busy = false;
    }

    /// Validates, issues exactly one request through `generator`, and records
    /// the result. Nothing is sent when validation fails.
    pub async fn submit(&mut self, generator: &dyn StoryGenerator) -> SubmitOutcome {
        let request = match self.begin_submit() {
            Ok(request) => request,
            Err(err) => return SubmitOutcome::Rejected(err),
        };
        let result = generator.generate_story(&request).await;
        self.finish_submit(result)
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
