//! Command implementations

use anyhow::{Context, Result, bail};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use feedbackkit_config::Config;
use feedbackkit_core::{
    Attachment, DefaultMetadataCollector, DescriptionEnhancer, FeedbackError, NoOpEnhancer,
    NoScreenshotCapture, ScreenshotCapture, UNKNOWN,
};
use feedbackkit_flow::{Action, FeedbackStore, FlowConfig, FlowDependencies};

use super::args::SubmitArgs;
use crate::clipboard::SystemClipboard;
use crate::screenshot::FileScreenshotCapture;

pub(crate) fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let config = Config::load(explicit)?;
    match &config.source {
        Some(path) => info!(path = %path.display(), provider = %config.provider, "Loaded configuration"),
        None => info!(provider = %config.provider, "No config file found, using defaults and environment"),
    }
    Ok(config)
}

pub(crate) fn execute_config(config: &Config, json: bool) -> Result<()> {
    let entries = config.effective_entries();
    if json {
        let map: serde_json::Map<String, serde_json::Value> = entries
            .into_iter()
            .map(|(key, value)| (key, serde_json::Value::String(value)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    match &config.source {
        Some(path) => println!("# source: {}", path.display()),
        None => println!("# source: defaults + environment"),
    }
    for (key, value) in entries {
        println!("{key} = {value}");
    }
    Ok(())
}

/// Wire the configured leaves for one submission
pub(crate) fn build_dependencies(config: &Config, args: &SubmitArgs) -> Result<FlowDependencies> {
    let provider = feedbackkit_providers::from_config(config)?;

    let enhancer: Arc<dyn DescriptionEnhancer> = if args.enhance {
        if config.ai.is_none() {
            return Err(FeedbackError::InvalidConfiguration(
                "--enhance needs an [ai] section or AI_PROVIDER with its API key".to_string(),
            )
            .into());
        }
        feedbackkit_ai::from_config(config)?
    } else {
        Arc::new(NoOpEnhancer)
    };

    let screenshot: Arc<dyn ScreenshotCapture> = match &args.screenshot {
        Some(path) => Arc::new(FileScreenshotCapture::new(path)),
        None => Arc::new(NoScreenshotCapture),
    };

    let metadata = DefaultMetadataCollector::new(
        config
            .app
            .version
            .clone()
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
        config.app.build.clone().unwrap_or_else(|| UNKNOWN.to_string()),
    )
    .with_custom_fields(config.app.custom_fields.clone());

    Ok(FlowDependencies::noop()
        .with_provider(provider)
        .with_enhancer(enhancer)
        .with_metadata(Arc::new(metadata))
        .with_screenshot(screenshot)
        .with_clipboard(Arc::new(SystemClipboard::new())))
}

pub(crate) async fn execute_submit(config: &Config, args: &SubmitArgs) -> Result<()> {
    let deps = build_dependencies(config, args)?;
    let mut store = FeedbackStore::new(deps, FlowConfig::from(config));
    let outcome = drive_submission(&mut store, args).await;
    store.dismiss();
    outcome
}

/// Run one flow to completion and print the result
pub(crate) async fn drive_submission(store: &mut FeedbackStore, args: &SubmitArgs) -> Result<()> {
    store.set_title(args.title.clone());
    store.set_message(read_message(args.message.as_deref())?);
    for path in &args.attachments {
        store.attach(read_attachment(path)?);
    }

    if let Some(path) = &args.screenshot {
        store.capture_screenshot();
        store.settle().await;
        if store.state().screenshot.is_none() {
            bail!("{} is not a readable PNG, JPEG, GIF or WebP image", path.display());
        }
    }

    if args.enhance {
        store.improve_description();
        store.settle().await;
        match store.state().error.clone() {
            Some(error) => {
                warn!(error = %error, "Submitting the original description");
                eprintln!("warning: {error}; submitting the original description");
                store.clear_error();
            }
            None if store.state().is_ai_generated => {
                eprintln!("Improved description:\n{}\n", store.state().message);
            }
            None => {}
        }
    }

    if !store.state().can_submit() {
        bail!("the title must not be blank");
    }

    store.submit();
    let mut failure = None;
    while let Some(action) = store.next().await {
        if let Action::FeedbackResponse(Err(err)) = action {
            failure = Some(err);
        }
    }
    if let Some(err) = failure {
        return Err(err.into());
    }

    let result = store
        .state()
        .result
        .clone()
        .context("submission finished without a result")?;

    if args.json {
        println!(
            "{}",
            serde_json::json!({
                "identifier": result.identifier,
                "url": result.url,
                "provider": result.provider_name,
            })
        );
    } else {
        println!("Submitted {} via {}", result.identifier, result.provider_name);
        if let Some(url) = &result.url {
            println!("{url}");
        }
    }

    if args.copy {
        store.copy_result_reference();
        match store.state().error.as_deref() {
            Some(error) => eprintln!("warning: {error}"),
            None => eprintln!("Copied {} to the clipboard", result.reference()),
        }
    }

    Ok(())
}

fn read_message(message: Option<&str>) -> Result<String> {
    match message {
        Some("-") => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read description from stdin")?;
            Ok(buffer.trim_end().to_string())
        }
        Some(text) => Ok(text.to_string()),
        None => Ok(String::new()),
    }
}

pub(crate) fn read_attachment(path: &Path) -> Result<Attachment> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read attachment {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))?;
    Ok(Attachment::data(bytes, mime_for(path), filename))
}

/// MIME type by file extension
pub(crate) fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "txt" | "log" => "text/plain",
        "json" => "application/json",
        "csv" => "text/csv",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}
