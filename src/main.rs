use anyhow::Result;
use speedometer::autostart::{Autostart, XdgAutostart};
use speedometer::*;
use std::io::Write;
use std::sync::Arc;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let app_config = config::AppConfig::load()?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        update_interval_ms = app_config.sampler.update_interval_ms,
        "starting speedometer"
    );

    apply_autostart(app_config.autostart);

    let source = Arc::new(interface_repo::SysinfoInterfaceSource::new());
    let mut sampler =
        sampler::RateSampler::new(source, app_config.sampler.sampler_config())?;
    sampler.start().await;

    tokio::select! {
        _ = render_loop(&sampler, &app_config.display) => {}
        _ = shutdown_signal() => {
            tracing::info!("Received shutdown signal");
        }
    }

    sampler.stop().await;
    println!();
    Ok(())
}

/// Redraw on our own timer; the sampler may tick much faster or slower than this.
async fn render_loop<S: interface_repo::InterfaceSource>(
    sampler: &sampler::RateSampler<S>,
    display: &config::DisplayConfig,
) {
    let settings = display.settings();
    let mut tick = interval(Duration::from_millis(display.refresh_interval_ms));
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_text = String::new();
    let mut stdout = std::io::stdout();

    loop {
        tick.tick().await;
        let text = display::format_rates(&sampler.latest(), &settings);
        if text == last_text {
            continue;
        }
        // Pad so a shorter line fully overwrites a longer one.
        let width = last_text.chars().count().max(text.chars().count());
        if let Err(e) = write!(stdout, "\r{:<width$}", text, width = width).and_then(|_| stdout.flush()) {
            tracing::warn!(error = %e, operation = "render", "stdout write failed");
        }
        last_text = text;
    }
}

fn apply_autostart(enabled: bool) {
    let autostart = match XdgAutostart::from_env() {
        Ok(a) => a,
        Err(e) => {
            tracing::warn!(error = %e, operation = "autostart", "autostart unavailable");
            return;
        }
    };
    if autostart.is_enabled() == enabled {
        return;
    }
    let result = if enabled {
        autostart.enable()
    } else {
        autostart.disable()
    };
    if let Err(e) = result {
        tracing::warn!(error = %e, operation = "autostart", "failed to update autostart entry");
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
