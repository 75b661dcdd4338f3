//! Command implementations.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;

use lifeline_core::dispatch::ReportDraft;
use lifeline_core::{
    CancelAction, Config, Credential, DispatchClient, RequestKind, RequestTracker, TrackedRequest,
    TrackerEvent,
};

use crate::presenter::Presenter;

/// Track one request until it reaches a terminal outcome.
///
/// Ctrl-C stops the tracker cleanly and leaves the request untouched
/// server-side.
pub async fn track(
    client: Arc<dyn DispatchClient>,
    credential: Credential,
    config: &Config,
    request: TrackedRequest,
) -> Result<()> {
    let presenter = Presenter::new(request.kind);
    let tracker = RequestTracker::new(
        client,
        credential,
        request.clone(),
        config.tracker.clone(),
    );

    let mut rx = tracker
        .start()
        .await
        .with_context(|| format!("Failed to start tracking {} {}", request.kind.as_str(), request.id))?;

    println!("{}", presenter.intro());

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                tracker.stop().await;
                println!("Tracking stopped. The {} is still active server-side.", request.kind.as_str());
                break;
            }
            event = rx.recv() => {
                let Some(event) = event else { break };
                let terminal = event.is_terminal();

                if let Some(line) = presenter.line_for(&event) {
                    println!("{}", line);
                }

                if terminal {
                    // Let the success message sit on screen before returning
                    // to the shell, matching the linger the config asks for.
                    if matches!(event, TrackerEvent::Succeeded { .. }) {
                        tokio::time::sleep(config.tracker.success_linger()).await;
                    }
                    break;
                }
            }
        }
    }

    Ok(())
}

/// File a new incident report, then track it unless asked not to.
pub async fn report(
    client: Arc<dyn DispatchClient>,
    credential: Credential,
    config: &Config,
    latitude: f64,
    longitude: f64,
    description: Option<String>,
    no_track: bool,
) -> Result<()> {
    let mut draft = ReportDraft::new(RequestKind::Report, latitude, longitude);
    if let Some(description) = description {
        draft = draft.with_description(description);
    }

    let created = client
        .create_report(&draft, &credential)
        .await
        .context("Failed to create report")?;

    info!(id = %created.id, "report created");
    println!("Report filed with id {}", created.id);

    if no_track {
        return Ok(());
    }

    track(
        client,
        credential,
        config,
        TrackedRequest::report(created.id),
    )
    .await
}

/// Cancel a pending request.
pub async fn cancel(
    client: Arc<dyn DispatchClient>,
    credential: Credential,
    request: TrackedRequest,
) -> Result<()> {
    let kind = request.kind;
    let action = CancelAction::new(client, credential, request);
    action
        .execute()
        .await
        .with_context(|| format!("Failed to cancel {}", kind.as_str()))?;

    println!("{} cancelled.", capitalize(kind.as_str()));
    Ok(())
}

/// Print the caller's request history, newest first.
pub async fn history(
    client: Arc<dyn DispatchClient>,
    credential: Credential,
    kind: RequestKind,
    json: bool,
) -> Result<()> {
    let mut entries = client
        .list_requests(kind, &credential)
        .await
        .with_context(|| format!("Failed to list {}s", kind.as_str()))?;

    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No {}s yet.", kind.as_str());
        return Ok(());
    }

    for entry in entries {
        let when = entry
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        let description = entry.description.as_deref().unwrap_or("-");
        println!(
            "{:<12} {:<10} {:<17} {}",
            entry.id,
            entry.status.as_str(),
            when,
            description
        );
    }

    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
