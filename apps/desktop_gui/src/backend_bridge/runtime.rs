//! Runtime bridge between UI command queue and backend event intake.

use std::{path::Path, thread};

use client_core::{ClientError, ClientSettings, HttpImageFetcher, StoryClient};
use crossbeam_channel::{Receiver, Sender};
use pdf_export::{export_story, ExportOptions, ImageFetcher};
use shared::domain::{LayoutVariant, Story};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{UiError, UiErrorCategory, UiErrorContext, UiEvent},
    media::decode_preview_image,
};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: ClientSettings) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                    UiErrorCategory::Unknown,
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = match StoryClient::from_settings(&settings) {
                Ok(client) => client,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                        UiErrorCategory::Validation,
                        UiErrorContext::BackendStartup,
                        format!("{err}; set STORY_API_URL and relaunch"),
                    )));
                    tracing::error!("story client unavailable: {err}");
                    reject_commands(&cmd_rx, &ui_tx, &settings.api_base_url, &err.to_string());
                    return;
                }
            };
            tracing::info!(base_url = client.base_url(), "backend worker ready");
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Story service: {}",
                client.base_url()
            )));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::GenerateStory(request) => {
                        let result = client.generate_story(&request).await;
                        let _ = ui_tx.send(UiEvent::StoryFinished(result));
                    }
                    BackendCommand::LoadImages { generation, images } => {
                        for (index, url) in images {
                            let fetcher = client.image_fetcher();
                            let ui_tx = ui_tx.clone();
                            tokio::spawn(async move {
                                let event = load_image(&fetcher, generation, index, &url).await;
                                let _ = ui_tx.send(event);
                            });
                        }
                    }
                    BackendCommand::ExportPdf {
                        story,
                        layout,
                        path,
                    } => {
                        let fetcher = client.image_fetcher();
                        let event = export_pdf(&fetcher, &story, layout, &path).await;
                        let _ = ui_tx.send(event);
                    }
                }
            }
            tracing::info!("ui command channel closed; backend worker exiting");
        });
    });
}

/// Answers commands with failures until the UI side closes the queue. Used
/// when the worker has no story client.
fn reject_commands(
    cmd_rx: &Receiver<BackendCommand>,
    ui_tx: &Sender<UiEvent>,
    url: &str,
    reason: &str,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        let event = match cmd {
            BackendCommand::GenerateStory(_) => {
                UiEvent::StoryFinished(Err(ClientError::InvalidBaseUrl {
                    url: url.to_string(),
                    reason: reason.to_string(),
                }))
            }
            BackendCommand::ExportPdf { .. } => {
                UiEvent::Error(UiError::export(format!("Story service unavailable: {reason}")))
            }
            BackendCommand::LoadImages { .. } => continue,
        };
        let _ = ui_tx.send(event);
    }
}

async fn load_image(
    fetcher: &HttpImageFetcher,
    generation: u64,
    index: usize,
    url: &str,
) -> UiEvent {
    let decoded = match fetcher.fetch(url).await {
        Ok(bytes) => decode_preview_image(&bytes),
        Err(err) => Err(err.to_string()),
    };
    match decoded {
        Ok(image) => UiEvent::ImageLoaded {
            generation,
            index,
            image,
        },
        Err(reason) => UiEvent::ImageFailed {
            generation,
            index,
            reason,
        },
    }
}

async fn export_pdf(
    fetcher: &dyn ImageFetcher,
    story: &Story,
    layout: LayoutVariant,
    path: &Path,
) -> UiEvent {
    let options = ExportOptions::default().with_layout(layout);
    let document = export_story(&story.parts, fetcher, &options).await;
    match tokio::fs::write(path, document.to_pdf_bytes()).await {
        Ok(()) => {
            tracing::info!(path = %path.display(), pages = document.page_count(), "story exported");
            UiEvent::Exported {
                path: path.to_path_buf(),
                pages: document.page_count(),
            }
        }
        Err(err) => {
            tracing::error!(path = %path.display(), "failed to write story pdf: {err}");
            UiEvent::Error(UiError::export(format!(
                "Failed to save {}: {err}",
                path.display()
            )))
        }
    }
}
