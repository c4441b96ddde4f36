mod bootstrap;
mod render;

use anyhow::{Context, Result};
use ev_core::settings::Settings;
use ev_runtime::session::DashboardSession;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("EV Dashboard v{} starting", env!("CARGO_PKG_VERSION"));

    let sources = bootstrap::data_sources(&settings);
    let session = DashboardSession::load(sources).context("failed to load dashboard data")?;

    let Some(requested) = settings.year_range(session.observed_bounds())? else {
        anyhow::bail!("no rows with a valid year; nothing to show");
    };
    let filter = settings.filter_config(requested)?;
    tracing::info!(
        "Range: {}, categories: {:?}, format: {}",
        filter.year_range,
        filter.categories,
        settings.format
    );

    let views = session.views(&filter)?;
    for warning in &views.warnings {
        tracing::warn!("{}", render::describe_warning(warning));
    }

    match settings.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&views)?),
        _ => print!("{}", render::render_views(&views, &session.status())?),
    }

    Ok(())
}
