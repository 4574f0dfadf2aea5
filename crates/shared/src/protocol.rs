use serde::{Deserialize, Serialize};

use crate::domain::{Story, StoryPart, StoryRequest};

pub const GENERATE_STORY_PATH: &str = "/api/v1/generate_story";

/// Body of `POST /api/v1/generate_story`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateStoryRequest {
    pub story_type: String,
    pub background_setting: String,
    pub story_theme: String,
}

impl From<&StoryRequest> for GenerateStoryRequest {
    fn from(value: &StoryRequest) -> Self {
        Self {
            story_type: value.character.trim().to_string(),
            background_setting: value.setting.trim().to_string(),
            story_theme: value.goal.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateStoryResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub story: Vec<StoryPart>,
}

impl From<GenerateStoryResponse> for Story {
    fn from(value: GenerateStoryResponse) -> Self {
        let story = Story::new(value.story);
        match value.prompt {
            Some(prompt) => story.with_prompt(prompt),
            None => story,
        }
    }
}
