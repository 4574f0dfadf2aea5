use super::*;

use std::collections::HashMap;

#[test]
fn defaults_point_at_local_service() {
    let settings = ClientSettings::default();
    assert_eq!(settings.api_base_url, "http://localhost:9000");
    assert_eq!(settings.layout, LayoutVariant::Stacked);
    assert_eq!(settings.export_path, PathBuf::from("generated_story.pdf"));
    assert_eq!(settings.request_timeout(), None);
}

#[test]
fn file_values_override_defaults() {
    let mut settings = ClientSettings::default();
    settings.apply_file(
        r#"
api_base_url = "https://stories.example.com/"
layout = "side-by-side"
export_path = "out/story.pdf"
request_timeout_secs = 30
"#,
    );

    assert_eq!(settings.api_base_url, "https://stories.example.com/");
    assert_eq!(settings.layout, LayoutVariant::SideBySide);
    assert_eq!(settings.export_path, PathBuf::from("out/story.pdf"));
    assert_eq!(settings.request_timeout(), Some(Duration::from_secs(30)));
}

#[test]
fn invalid_file_and_values_fall_back_to_defaults() {
    let mut settings = ClientSettings::default();
    settings.apply_file("this is = = not toml");
    assert_eq!(settings, ClientSettings::default());

    settings.apply_file("layout = \"grid\"\nrequest_timeout_secs = \"soon\"\nunknown = \"x\"");
    assert_eq!(settings, ClientSettings::default());
}

#[test]
fn env_overrides_file_and_app_prefix_wins() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("STORY_API_URL", "http://legacy:9000"),
        ("APP__API_BASE_URL", "http://preferred:9000"),
        ("APP__LAYOUT", "side_by_side"),
    ]);

    let mut settings = ClientSettings::default();
    settings.apply_file("api_base_url = \"http://file:9000\"");
    settings.apply_env(|name| env.get(name).map(|value| value.to_string()));

    assert_eq!(settings.api_base_url, "http://preferred:9000");
    assert_eq!(settings.layout, LayoutVariant::SideBySide);
}

#[test]
fn zero_timeout_means_no_timeout() {
    let mut settings = ClientSettings::default();
    settings.apply_env(|name| (name == "APP__REQUEST_TIMEOUT_SECS").then(|| "0".to_string()));
    assert_eq!(settings.request_timeout_secs, Some(0));
    assert_eq!(settings.request_timeout(), None);
}

#[test]
fn normalizes_base_url() {
    assert_eq!(
        normalize_base_url("  http://localhost:9000/ ").expect("valid"),
        "http://localhost:9000"
    );
    assert!(matches!(
        normalize_base_url("localhost:9000"),
        Err(ClientError::InvalidBaseUrl { .. })
    ));
    assert!(matches!(
        normalize_base_url("ftp://files.example.com"),
        Err(ClientError::InvalidBaseUrl { .. })
    ));
}
