use super::*;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use shared::domain::StoryPart;

struct RecordingGenerator {
    calls: AtomicUsize,
    requests: Mutex<Vec<StoryRequest>>,
    fail_with: Option<(u16, Option<String>)>,
}

impl RecordingGenerator {
    fn ok() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            fail_with: None,
        }
    }

    fn failing(status: u16, detail: Option<&str>) -> Self {
        Self {
            fail_with: Some((status, detail.map(str::to_string))),
            ..Self::ok()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoryGenerator for RecordingGenerator {
    async fn generate_story(&self, request: &StoryRequest) -> Result<Story, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().expect("lock").push(request.clone());
        if let Some((status, detail)) = &self.fail_with {
            return Err(ClientError::Api {
                status: *status,
                detail: detail.clone(),
            });
        }
        Ok(Story::new(vec![
            StoryPart::text(format!("{} arrives.", request.character)),
            StoryPart::text("Things happen."),
            StoryPart::text("The end."),
        ]))
    }
}

fn filled_form() -> FormController {
    let mut form = FormController::new();
    form.set_character("Detective");
    form.set_setting("Medieval castle");
    form.set_goal("Solve a mystery");
    form
}

#[tokio::test]
async fn missing_fields_never_reach_the_generator() {
    let generator = RecordingGenerator::ok();

    for blank in StoryField::ALL {
        let mut form = filled_form();
        form.set_field(blank, "");

        let outcome = form.submit(&generator).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Rejected(FormError::MissingFields(vec![blank]))
        );
        assert_eq!(
            form.notice(),
            Some(&Notice::Error(MISSING_FIELDS_MESSAGE.to_string()))
        );
        assert!(!form.is_busy());
    }

    let mut empty = FormController::new();
    assert!(matches!(
        empty.submit(&generator).await,
        SubmitOutcome::Rejected(FormError::MissingFields(fields)) if fields.len() == 3
    ));
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn successful_submit_replaces_story_and_clears_busy() {
    let generator = RecordingGenerator::ok();
    let mut form = filled_form();

    let outcome = form.submit(&generator).await;

    assert_eq!(outcome, SubmitOutcome::Generated { parts: 3 });
    assert_eq!(generator.calls(), 1);
    assert!(!form.is_busy());
    assert_eq!(
        form.notice(),
        Some(&Notice::Info("Story generated with 3 parts.".to_string()))
    );
    assert!(!form.notice().is_some_and(Notice::is_error));
    let story = form.story().expect("story");
    assert_eq!(story.parts[0].paragraph, "Detective arrives.");
    assert_eq!(
        generator.requests.lock().expect("lock")[0],
        StoryRequest::new("Detective", "Medieval castle", "Solve a mystery")
    );
}

#[tokio::test]
async fn failed_submit_keeps_previous_story_and_reports_detail() {
    let mut form = filled_form();
    form.submit(&RecordingGenerator::ok()).await;
    let previous = form.story().cloned();

    let failing = RecordingGenerator::failing(400, Some("Invalid input: unknown theme"));
    let outcome = form.submit(&failing).await;

    assert_eq!(
        outcome,
        SubmitOutcome::Failed("Error: Invalid input: unknown theme".to_string())
    );
    assert!(!form.is_busy());
    assert_eq!(form.story().cloned(), previous);
    assert!(form.notice().is_some_and(Notice::is_error));
}

#[tokio::test]
async fn failed_submit_without_detail_uses_generic_api_message() {
    let mut form = filled_form();
    let outcome = form.submit(&RecordingGenerator::failing(500, None)).await;
    assert_eq!(
        outcome,
        SubmitOutcome::Failed("Error: An unexpected error occurred.".to_string())
    );
}

#[test]
fn second_submit_is_refused_while_busy() {
    let mut form = filled_form();
    let request = form.begin_submit().expect("first submit");
    assert_eq!(request.character, "Detective");
    assert!(form.is_busy());

    assert_eq!(form.begin_submit(), Err(FormError::Busy));

    form.finish_submit(Err(ClientError::MalformedResponse("eof".to_string())));
    assert!(!form.is_busy());
    assert_eq!(
        form.notice().map(Notice::message),
        Some(crate::error::GENERIC_FAILURE_MESSAGE)
    );
    assert!(form.begin_submit().is_ok());
}

#[test]
fn abandoned_submit_releases_busy_without_touching_story() {
    let mut form = filled_form();
    form.begin_submit().expect("submit");
    form.abandon_submit();
    assert!(!form.is_busy());
    assert!(form.story().is_none());
    assert!(form.notice().is_none());
}

#[test]
fn missing_fields_error_text_matches_notice() {
    assert_eq!(
        FormError::MissingFields(vec![StoryField::Character]).to_string(),
        MISSING_FIELDS_MESSAGE
    );
}
