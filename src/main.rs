//! quote-desk - A terminal desk for comparing freight quotes
//!
//! This is the main entry point for the quote-desk application.
//! It uses the Component Architecture pattern from ratatui.

mod action;
mod app;
mod component;
mod components;
mod config;
mod dispatcher;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::{Cli, Config};
use crate::dispatcher::{DispatchSettings, Dispatcher};
use crate::services::{HttpQuoteApi, RequestContext, RequestRunner};
use crate::tui::Tui;
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::Event;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = Config::load_or_default().merge_cli(&cli);
    if cli.save_config {
        config.save()?;
    }
    tracing::info!(api_url = %config.api_url, org = %config.org_id, "starting quote-desk");

    let api = HttpQuoteApi::new(&config.api_url, config.connect_timeout())?;
    let runner = RequestRunner::new(
        Arc::new(api),
        RequestContext {
            org_id: config.org_id.clone(),
            user_id: config.user_id.clone(),
        },
    );
    let dispatcher = Dispatcher::new(
        runner,
        DispatchSettings {
            notify_address: config.notify_address.clone(),
            export_dir: PathBuf::from(&config.export_dir),
            mfa_code: config.export_mfa_code.clone(),
            default_hs_code: config.default_hs_code.clone(),
        },
    );

    // Setup terminal
    tui::install_panic_hook();
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(100));
    tui.enter()?;

    let mut app = App::new(dispatcher, config.org_id.clone());
    app.init()?;

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "exiting after error");
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    Ok(())
}

/// Log to a file; the terminal belongs to the UI
fn init_logging(cli: &Cli) -> Result<()> {
    let path = match &cli.log_file {
        Some(path) => path.clone(),
        None => Config::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quote-desk.log"),
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = match &cli.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_env("QUOTE_DESK_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();
    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        // Draw the UI
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                tracing::error!(error = %e, "draw failed");
            }
        })?;

        // Check for a document to open
        if let Some(path) = app.pending_viewer_file.take() {
            open_in_viewer(tui, app, &path)?;
            continue;
        }

        // Poll for events
        if let Some(event) = tui.next_event()? {
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Action might produce a follow-up action
            let mut current_action = action;
            while let Some(a) = current_action {
                current_action = app.update(a)?;
            }
        } else {
            // No event - tick drains finished requests
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}

/// Hand a saved file to `$QUOTE_DESK_VIEWER` or the platform opener
fn open_in_viewer(tui: &mut Tui, app: &mut App, path: &Path) -> Result<()> {
    let viewer = std::env::var("QUOTE_DESK_VIEWER").unwrap_or_else(|_| {
        if cfg!(target_os = "macos") {
            "open".to_string()
        } else {
            "xdg-open".to_string()
        }
    });

    tui.suspend()?;
    let status = Command::new(&viewer).arg(path).status();
    tui.resume()?;

    match status {
        Ok(exit_status) if exit_status.success() => {
            app.status_message = Some(format!("Opened {}", path.display()));
        }
        Ok(exit_status) => {
            tracing::warn!(%viewer, %exit_status, "viewer exited with failure");
            app.status_message = Some(format!("Viewer exited with status: {}", exit_status));
        }
        Err(e) => {
            tracing::warn!(%viewer, error = %e, "failed to launch viewer");
            app.status_message = Some(format!("Failed to launch viewer '{}': {}", viewer, e));
        }
    }
    Ok(())
}
