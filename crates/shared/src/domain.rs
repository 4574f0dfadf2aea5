use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

/// Value the story service sends in place of an image URL when image
/// generation failed for a paragraph.
pub const NO_IMAGE_SENTINEL: &str = "None";

pub const CHARACTERS: [&str; 4] = ["Detective", "Alien", "Superhero", "Time traveler"];
pub const SETTINGS: [&str; 4] = [
    "Abandoned spaceship",
    "Medieval castle",
    "Futuristic city",
    "Underwater research facility",
];
pub const GOALS: [&str; 4] = [
    "Solve a mystery",
    "Save the world",
    "Find a way home",
    "Defeat an ancient evil",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryPart {
    pub paragraph: String,
    #[serde(
        default,
        deserialize_with = "deserialize_image_ref",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
}

impl StoryPart {
    pub fn new(paragraph: impl Into<String>, image: Option<String>) -> Self {
        Self {
            paragraph: paragraph.into(),
            image,
        }
    }

    pub fn text(paragraph: impl Into<String>) -> Self {
        Self::new(paragraph, None)
    }

    /// The image reference, with the "no image" sentinel and blank values
    /// reported as absent.
    pub fn image_url(&self) -> Option<&str> {
        self.image
            .as_deref()
            .map(str::trim)
            .filter(|value| !is_no_image(value))
    }
}

fn is_no_image(value: &str) -> bool {
    value.is_empty() || value == NO_IMAGE_SENTINEL
}

fn deserialize_image_ref<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| !is_no_image(value.trim())))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub parts: Vec<StoryPart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl Story {
    pub fn new(parts: Vec<StoryPart>) -> Self {
        Self {
            parts,
            prompt: None,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Paragraphs joined by blank lines, for clipboard and plain-text output.
    pub fn plain_text(&self) -> String {
        self.parts
            .iter()
            .map(|part| part.paragraph.trim())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryField {
    Character,
    Setting,
    Goal,
}

impl StoryField {
    pub const ALL: [StoryField; 3] = [StoryField::Character, StoryField::Setting, StoryField::Goal];

    pub fn label(self) -> &'static str {
        match self {
            StoryField::Character => "Story Type",
            StoryField::Setting => "Background Setting",
            StoryField::Goal => "Theme",
        }
    }

    pub fn options(self) -> &'static [&'static str] {
        match self {
            StoryField::Character => &CHARACTERS,
            StoryField::Setting => &SETTINGS,
            StoryField::Goal => &GOALS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryRequest {
    pub character: String,
    pub setting: String,
    pub goal: String,
}

impl StoryRequest {
    pub fn new(
        character: impl Into<String>,
        setting: impl Into<String>,
        goal: impl Into<String>,
    ) -> Self {
        Self {
            character: character.into(),
            setting: setting.into(),
            goal: goal.into(),
        }
    }

    pub fn field(&self, field: StoryField) -> &str {
        match field {
            StoryField::Character => &self.character,
            StoryField::Setting => &self.setting,
            StoryField::Goal => &self.goal,
        }
    }

    pub fn field_mut(&mut self, field: StoryField) -> &mut String {
        match field {
            StoryField::Character => &mut self.character,
            StoryField::Setting => &mut self.setting,
            StoryField::Goal => &mut self.goal,
        }
    }

    /// Fields that are still blank, in form order.
    pub fn missing_fields(&self) -> Vec<StoryField> {
        StoryField::ALL
            .into_iter()
            .filter(|field| self.field(*field).trim().is_empty())
            .collect()
    }

    pub fn prompt_preview(&self) -> String {
        format!(
            "A story about {} must {} in a {}.",
            self.character.trim(),
            self.goal.trim(),
            self.setting.trim()
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutVariant {
    #[default]
    Stacked,
    SideBySide,
}

impl LayoutVariant {
    pub const ALL: [LayoutVariant; 2] = [LayoutVariant::Stacked, LayoutVariant::SideBySide];

    pub fn label(self) -> &'static str {
        match self {
            LayoutVariant::Stacked => "Stacked",
            LayoutVariant::SideBySide => "Side by side",
        }
    }
}

impl fmt::Display for LayoutVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutVariant::Stacked => f.write_str("stacked"),
            LayoutVariant::SideBySide => f.write_str("side-by-side"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown layout variant '{0}' (expected 'stacked' or 'side-by-side')")]
pub struct UnknownLayoutVariant(pub String);

impl FromStr for LayoutVariant {
    type Err = UnknownLayoutVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "stacked" => Ok(LayoutVariant::Stacked),
            "side-by-side" => Ok(LayoutVariant::SideBySide),
            _ => Err(UnknownLayoutVariant(s.to_string())),
        }
    }
}
