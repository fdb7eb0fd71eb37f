//! colony: desktop launcher entry point.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use colony_config::{LauncherConfig, SettingsStore};
use colony_core::FontRole;
use colony_shell::{AppContent, AppOptions, Application};
use colony_text::{FontSet, FontSources};
use colony_window::ColonyWindow;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn font_sources(config: &LauncherConfig) -> FontSources {
    let fonts = &config.fonts;
    let mut sources = FontSources { font_path: fonts.font_path.clone(), ..FontSources::default() };
    let roles: [(FontRole, &Option<PathBuf>); 4] = [
        (FontRole::Display, &fonts.display),
        (FontRole::Headline, &fonts.headline),
        (FontRole::Body, &fonts.body),
        (FontRole::Ui, &fonts.ui),
    ];
    for (role, path) in roles {
        if let Some(path) = path {
            sources = sources.with_role(role, path.clone());
        }
    }
    sources
}

fn run() -> Result<()> {
    let config = LauncherConfig::load();
    info!(content = %config.paths.content.display(), "starting launcher");

    // Startup-fatal: nothing is shown without content and fonts.
    let content = AppContent::load(&config.paths.content)
        .with_context(|| format!("loading content from {}", config.paths.content.display()))?;
    let fonts = Arc::new(FontSet::load(&font_sources(&config)).context("resolving fonts")?);

    let settings = SettingsStore::load(config.settings_path());
    let options = AppOptions {
        title: config.window.title.clone(),
        locales_dir: config.paths.locales.clone(),
        fallback_language: config.launcher.fallback_language.clone(),
        global_search_cap: config.launcher.global_search_cap,
        max_frame_delta: config.launcher.max_frame_delta,
        ..AppOptions::default()
    };
    let app = Application::new(content, settings, fonts.clone(), options);

    let window = ColonyWindow::new(&config.window, fonts)?;
    window.run(app)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(error = format!("{error:#}"), "launcher failed");
            ExitCode::FAILURE
        }
    }
}
