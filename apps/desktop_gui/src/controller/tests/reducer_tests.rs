use super::*;

use client_core::ClientError;
use shared::domain::StoryPart;

use crate::controller::events::UiErrorCategory;

fn state() -> StoryWriterState {
    StoryWriterState::new(&ClientSettings::default())
}

fn filled_state() -> StoryWriterState {
    let mut state = state();
    state.form.set_character("Superhero");
    state.form.set_setting("Abandoned spaceship");
    state.form.set_goal("Defeat an ancient evil");
    state
}

fn illustrated_story() -> Story {
    Story::new(vec![
        StoryPart::new("First.", Some("http://host/images/1.png".to_string())),
        StoryPart::new("Second.", Some("None".to_string())),
        StoryPart::new("Third.", Some("http://host/images/3.png".to_string())),
    ])
}

fn preview() -> PreviewImage {
    PreviewImage {
        width: 1,
        height: 1,
        rgba: vec![0, 0, 0, 255],
    }
}

#[test]
fn incomplete_form_produces_no_command() {
    let mut state = state();
    state.form.set_character("Detective");

    assert!(state.request_generate().is_none());
    assert!(!state.form.is_busy());
    let banner = state.banner.as_ref().expect("banner");
    assert_eq!(banner.category(), UiErrorCategory::Validation);
}

#[test]
fn generate_is_refused_while_a_request_is_in_flight() {
    let mut state = filled_state();

    let command = state.request_generate().expect("command");
    assert!(matches!(command, BackendCommand::GenerateStory(ref request) if request.character == "Superhero"));
    assert!(state.form.is_busy());
    assert!(state.request_generate().is_none());

    state.generate_not_sent();
    assert!(!state.form.is_busy());
}

#[test]
fn generated_story_requests_only_real_images() {
    let mut state = filled_state();
    state.request_generate().expect("command");

    let follow_up = state.apply_event(UiEvent::StoryFinished(Ok(illustrated_story())));

    assert!(!state.form.is_busy());
    assert_eq!(state.status, "Story generated with 3 parts.");
    assert_eq!(state.generation(), 1);
    match follow_up {
        Some(BackendCommand::LoadImages { generation, images }) => {
            assert_eq!(generation, 1);
            assert_eq!(
                images,
                vec![
                    (0, "http://host/images/1.png".to_string()),
                    (2, "http://host/images/3.png".to_string()),
                ]
            );
        }
        _ => panic!("expected image loads"),
    }
    assert_eq!(state.image(0), Some(&ImageSlot::Loading));
    assert_eq!(state.image(1), None);
}

#[test]
fn text_only_story_needs_no_image_loads() {
    let mut state = filled_state();
    state.request_generate().expect("command");
    let follow_up = state.apply_event(UiEvent::StoryFinished(Ok(Story::new(vec![
        StoryPart::text("Only words."),
    ]))));
    assert!(follow_up.is_none());
    assert!(state.can_export());
}

#[test]
fn stale_image_events_are_ignored() {
    let mut state = filled_state();
    state.request_generate().expect("command");
    state.apply_event(UiEvent::StoryFinished(Ok(illustrated_story())));
    state.request_generate().expect("command");
    state.apply_event(UiEvent::StoryFinished(Ok(illustrated_story())));

    state.apply_event(UiEvent::ImageLoaded {
        generation: 1,
        index: 0,
        image: preview(),
    });
    assert_eq!(state.image(0), Some(&ImageSlot::Loading));

    state.apply_event(UiEvent::ImageLoaded {
        generation: 2,
        index: 0,
        image: preview(),
    });
    state.apply_event(UiEvent::ImageFailed {
        generation: 2,
        index: 2,
        reason: "404".to_string(),
    });
    assert_eq!(state.image(0), Some(&ImageSlot::Ready(preview())));
    assert_eq!(state.image(2), Some(&ImageSlot::Failed("404".to_string())));
}

#[test]
fn failed_generation_keeps_previous_story() {
    let mut state = filled_state();
    state.request_generate().expect("command");
    state.apply_event(UiEvent::StoryFinished(Ok(illustrated_story())));

    state.request_generate().expect("command");
    state.apply_event(UiEvent::StoryFinished(Err(ClientError::Api {
        status: 500,
        detail: None,
    })));

    assert!(!state.form.is_busy());
    assert_eq!(state.story(), Some(&illustrated_story()));
    assert_eq!(state.status, "Error: An unexpected error occurred.");
    let banner = state.banner.as_ref().expect("banner");
    assert_eq!(banner.category(), UiErrorCategory::Server);
}

#[test]
fn export_runs_once_at_a_time() {
    let mut state = filled_state();
    assert!(state.request_export(PathBuf::from("story.pdf")).is_none());

    state.request_generate().expect("command");
    state.apply_event(UiEvent::StoryFinished(Ok(illustrated_story())));
    state.layout = LayoutVariant::SideBySide;

    match state.request_export(PathBuf::from("story.pdf")) {
        Some(BackendCommand::ExportPdf { story, layout, path }) => {
            assert_eq!(story.parts.len(), 3);
            assert_eq!(layout, LayoutVariant::SideBySide);
            assert_eq!(path, PathBuf::from("story.pdf"));
        }
        _ => panic!("expected export command"),
    }
    assert!(state.is_exporting());
    assert!(state.request_export(PathBuf::from("again.pdf")).is_none());

    state.apply_event(UiEvent::Exported {
        path: PathBuf::from("story.pdf"),
        pages: 2,
    });
    assert!(!state.is_exporting());
    assert_eq!(state.status, "Exported 2 page(s) to story.pdf");
}

#[test]
fn export_failure_releases_the_export_button() {
    let mut state = filled_state();
    state.request_generate().expect("command");
    state.apply_event(UiEvent::StoryFinished(Ok(illustrated_story())));
    state.request_export(PathBuf::from("story.pdf")).expect("export");

    state.apply_event(UiEvent::Error(UiError::export("permission denied")));

    assert!(!state.is_exporting());
    assert_eq!(state.status, "Export error: permission denied");
}

#[test]
fn backend_info_replaces_status_text() {
    let mut state = state();
    assert!(state
        .apply_event(UiEvent::Info("Story service: http://localhost:9000".to_string()))
        .is_none());
    assert_eq!(state.status, "Story service: http://localhost:9000");
}
