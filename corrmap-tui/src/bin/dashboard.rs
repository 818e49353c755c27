/// Correlation heatmap dashboard
///
/// Tracks simulated prices for a set of symbols and shows their correlation
/// matrix, the hovered pair's statistics and the selected symbol's chart.
/// Configured through `CORRMAP_*` environment variables; logs go to
/// `CORRMAP_LOG` (default: corrmap.log) since the terminal is taken.
use std::{error::Error, sync::Arc, time::Duration};

use corrmap::{Dashboard, DashboardConfig, MockPriceSource, Refresher, spawn_refresher};
use corrmap_tui::{
    Action, action_for,
    logging::init_file_logging,
    terminal::{self, DashboardTerminal},
    ui,
};
use crossterm::event::{self, Event};
use tracing::{info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = DashboardConfig::from_env();
    init_file_logging(&config.log_path)?;
    info!(?config, "starting correlation dashboard");

    let source = MockPriceSource::new()
        .with_sample_interval(config.sample_interval)
        .with_latency(config.mock_latency, config.mock_latency);
    let refresher = spawn_refresher(Arc::new(source), &config);

    terminal::install_panic_hook();
    let mut terminal = terminal::setup()?;

    let result = run(&mut terminal, &refresher, Dashboard::new(config.window.clone()));

    terminal::restore(&mut terminal)?;
    refresher.shutdown().await;

    if let Err(error) = &result {
        warn!(%error, "dashboard exited with error");
    }
    result
}

fn run(
    terminal: &mut DashboardTerminal,
    refresher: &Refresher,
    mut dashboard: Dashboard,
) -> Result<(), Box<dyn Error>> {
    let mut status_rx = refresher.subscribe();

    loop {
        // Err once the refresh task has stopped; keep showing the last state
        if status_rx.has_changed().unwrap_or(false) {
            let status = status_rx.borrow_and_update().clone();
            dashboard.apply(&status);
        }

        terminal.draw(|f| ui::render(f, &dashboard))?;

        // Blocks this worker; the refresh task runs on another
        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        let Some(action) = action_for(key) else {
            continue;
        };

        match action {
            Action::Quit => break,
            Action::Refresh => {
                if let Err(error) = refresher.refresh() {
                    warn!(%error, "manual refresh dropped");
                }
            }
            Action::SetWindow(window) => {
                if dashboard.set_window(window.clone()) {
                    info!(%window, "window changed");
                    if let Err(error) = refresher.set_window(window) {
                        warn!(%error, "window change not forwarded to refresh task");
                    }
                }
            }
            Action::MoveCursor { rows, cols } => dashboard.move_cursor(rows, cols),
            Action::NextSymbol => dashboard.select_next_symbol(),
            Action::PreviousSymbol => dashboard.select_previous_symbol(),
            Action::SelectHoveredRow => dashboard.select_hovered_row(),
        }
    }

    Ok(())
}
