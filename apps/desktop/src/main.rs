use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{builder::PossibleValuesParser, Parser};
use client_core::{
    load_settings, render_blocks, FormController, ImageSide, StoryBlock, StoryClient,
    SubmitOutcome,
};
use pdf_export::{export_story, write_pdf, ExportOptions, ImageFetcher, NoImages};
use shared::domain::{LayoutVariant, StoryField, CHARACTERS, GOALS, SETTINGS};
use tracing_subscriber::EnvFilter;

/// Generate an illustrated story and optionally export it to PDF.
#[derive(Parser, Debug)]
#[command(name = "story_writer")]
struct Args {
    #[arg(long, value_parser = PossibleValuesParser::new(CHARACTERS))]
    character: Option<String>,
    #[arg(long, value_parser = PossibleValuesParser::new(SETTINGS))]
    setting: Option<String>,
    #[arg(long, value_parser = PossibleValuesParser::new(GOALS))]
    goal: Option<String>,
    /// Base URL of the story service. Overrides settings and environment.
    #[arg(long)]
    api_url: Option<String>,
    /// `stacked` or `side-by-side`.
    #[arg(long)]
    layout: Option<LayoutVariant>,
    /// Write the story to a PDF. Without a path the configured export path is used.
    #[arg(long, num_args = 0..=1, value_name = "PATH")]
    export: Option<Option<PathBuf>>,
    /// Export without fetching images; each image becomes a placeholder line.
    #[arg(long, requires = "export")]
    no_images: bool,
    /// Print the selectable values for each field and exit.
    #[arg(long)]
    list_options: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    let args = Args::parse();

    if args.list_options {
        print!("{}", format_options());
        return Ok(());
    }

    let mut settings = load_settings();
    if let Some(api_url) = &args.api_url {
        settings.api_base_url = api_url.clone();
    }
    if let Some(layout) = args.layout {
        settings.layout = layout;
    }

    let client = StoryClient::from_settings(&settings)
        .with_context(|| format!("invalid story service URL '{}'", settings.api_base_url))?;

    let mut form = FormController::new();
    form.set_character(args.character.unwrap_or_default());
    form.set_setting(args.setting.unwrap_or_default());
    form.set_goal(args.goal.unwrap_or_default());

    let story = match form.submit(&client).await {
        SubmitOutcome::Generated { .. } => match form.story() {
            Some(story) => story.clone(),
            None => bail!("story missing after successful generation"),
        },
        SubmitOutcome::Rejected(err) => bail!("{err} (see --list-options)"),
        SubmitOutcome::Failed(message) => bail!(message),
    };

    if let Some(notice) = form.notice() {
        tracing::info!("{}", notice.message());
    }

    let prompt = story
        .prompt
        .clone()
        .unwrap_or_else(|| form.draft().prompt_preview());
    println!("{prompt}\n");
    print!("{}", format_blocks(&render_blocks(&story, settings.layout)));

    if let Some(path) = args.export {
        let path = path.unwrap_or_else(|| settings.export_path.clone());
        let options = ExportOptions::default().with_layout(settings.layout);
        let http_images = client.image_fetcher();
        let fetcher: &dyn ImageFetcher = if args.no_images {
            &NoImages
        } else {
            &http_images
        };
        let document = export_story(&story.parts, fetcher, &options).await;
        write_pdf(&document, &path)?;
        println!(
            "Exported {} page(s) to {}",
            document.page_count(),
            path.display()
        );
    }

    Ok(())
}

fn format_options() -> String {
    let mut out = String::new();
    for field in StoryField::ALL {
        out.push_str(field.label());
        out.push_str(":\n");
        for option in field.options() {
            out.push_str("  ");
            out.push_str(option);
            out.push('\n');
        }
    }
    out
}

fn format_blocks(blocks: &[StoryBlock<'_>]) -> String {
    let mut out = String::new();
    for block in blocks {
        if let Some(url) = block.image_url {
            let side = match block.image_side {
                ImageSide::Left => "left",
                ImageSide::Right => "right",
            };
            out.push_str(&format!("[image, {side}: {url}]\n"));
        }
        out.push_str(block.paragraph);
        out.push_str("\n\n");
    }
    out
}
