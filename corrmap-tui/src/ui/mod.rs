//! Dashboard layout
//!
//! ```text
//! ┌ header: title | window tabs | status ─────────────────┐
//! │ heatmap + legend          │ pair detail               │
//! │                           │ strongest pairs           │
//! │                           │ selected symbol chart     │
//! └ footer: key help ─────────────────────────────────────┘
//! ```

mod chart;
mod heatmap;
mod panels;

use chrono::{DateTime, Local};
use corrmap::{CorrelationBand, DEFAULT_TIME_WINDOWS, Dashboard};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
};

pub(crate) const C_POSITIVE: Color = Color::Rgb(100, 220, 100);
pub(crate) const C_NEGATIVE: Color = Color::Rgb(220, 100, 100);
pub(crate) const C_NEUTRAL: Color = Color::Rgb(180, 180, 100);
pub(crate) const C_DIM: Color = Color::Rgb(120, 120, 120);
pub(crate) const C_BRIGHT: Color = Color::Rgb(220, 220, 220);
pub(crate) const C_ACCENT: Color = Color::Rgb(100, 180, 220);
pub(crate) const C_HEADER: Color = Color::Rgb(180, 130, 220);

/// Heatmap cell background for a correlation band
pub fn band_color(band: CorrelationBand) -> Color {
    match band {
        CorrelationBand::StrongNegative => Color::Rgb(200, 50, 50),
        CorrelationBand::ModerateNegative => Color::Rgb(170, 90, 80),
        CorrelationBand::WeakNegative => Color::Rgb(110, 80, 75),
        CorrelationBand::Neutral => Color::Rgb(70, 70, 70),
        CorrelationBand::WeakPositive => Color::Rgb(75, 105, 75),
        CorrelationBand::ModeratePositive => Color::Rgb(70, 150, 80),
        CorrelationBand::StrongPositive => Color::Rgb(40, 180, 70),
    }
}

/// Foreground for text on a band background
pub(crate) fn band_text_color(band: CorrelationBand) -> Color {
    if band.intensity() >= 2 { Color::White } else { C_BRIGHT }
}

pub(crate) fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

/// Local wall clock label for an epoch ms timestamp
pub(crate) fn format_time(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|utc| utc.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}

pub(crate) fn bordered(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(C_DIM))
}

/// Draw the whole dashboard
pub fn render(f: &mut Frame, dashboard: &Dashboard) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, dashboard, rows[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    heatmap::render(f, dashboard, body[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),
            Constraint::Length(7),
            Constraint::Min(6),
        ])
        .split(body[1]);

    panels::render_pair_detail(f, dashboard, right[0]);
    panels::render_strongest_pairs(f, dashboard, right[1]);
    chart::render(f, dashboard, right[2]);

    render_footer(f, rows[2]);
}

fn render_header(f: &mut Frame, dashboard: &Dashboard, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(22),
            Constraint::Min(30),
            Constraint::Length(32),
        ])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        "CORRELATION MAP",
        Style::default().fg(C_HEADER).add_modifier(Modifier::BOLD),
    )))
    .block(bordered(""));
    f.render_widget(title, chunks[0]);

    let titles: Vec<Line> = DEFAULT_TIME_WINDOWS
        .iter()
        .enumerate()
        .map(|(i, w)| Line::from(format!("{} {}", i + 1, w)))
        .collect();
    let mut tabs = Tabs::new(titles)
        .block(bordered(" Window "))
        .style(Style::default().fg(C_DIM));
    // Custom windows leave every tab unhighlighted
    if let Some(index) = dashboard.window().default_index() {
        tabs = tabs
            .select(index)
            .highlight_style(Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD));
    } else {
        tabs = tabs.highlight_style(Style::default().fg(C_DIM));
    }
    f.render_widget(tabs, chunks[1]);

    f.render_widget(
        Paragraph::new(status_line(dashboard)).block(bordered(" Status ")),
        chunks[2],
    );
}

fn status_line(dashboard: &Dashboard) -> Line<'static> {
    if dashboard.is_loading() {
        return Line::from(Span::styled("Loading...", Style::default().fg(C_NEUTRAL)));
    }
    if let Some(error) = dashboard.error() {
        return Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(C_NEGATIVE),
        ));
    }
    match dashboard.snapshot() {
        Some(snapshot) => Line::from(vec![
            Span::styled("Updated ", Style::default().fg(C_DIM)),
            Span::styled(
                format_time(snapshot.computed_at_ms),
                Style::default().fg(C_POSITIVE),
            ),
        ]),
        None => Line::from(Span::styled("No data", Style::default().fg(C_DIM))),
    }
}

fn render_footer(f: &mut Frame, area: Rect) {
    let keys = [
        ("q", "quit"),
        ("r", "refresh"),
        ("1-6", "window"),
        ("arrows", "move"),
        ("tab", "symbol"),
        ("enter", "select row"),
    ];
    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, action)| {
            [
                Span::styled(format!(" {key} "), Style::default().fg(C_ACCENT)),
                Span::styled(format!("{action} "), Style::default().fg(C_DIM)),
            ]
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use corrmap::{
        MockPriceSource, RefreshStatus, SeriesBySymbol, Snapshot, TimeWindow,
        build_correlation_matrix, fetch_all, source::Clock,
    };
    use ratatui::{Terminal, backend::TestBackend};
    use smol_str::SmolStr;

    use super::*;

    pub(crate) fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub(crate) fn ready_dashboard(symbols: &[&str]) -> Dashboard {
        let source = MockPriceSource::new()
            .with_seed(7)
            .with_clock(Clock::Fixed(1_700_000_000_000));
        let symbols: Vec<SmolStr> = symbols.iter().map(|s| SmolStr::new(s)).collect();
        let window = TimeWindow::default();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let series: SeriesBySymbol = runtime.block_on(fetch_all(&source, &symbols, &window));
        let matrix = build_correlation_matrix(&series);

        let mut dashboard = Dashboard::new(window.clone());
        dashboard.apply(&RefreshStatus::Ready(Arc::new(Snapshot {
            window,
            series,
            matrix,
            computed_at_ms: 1_700_000_000_000,
        })));
        dashboard
    }

    fn draw(dashboard: &Dashboard) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|f| render(f, dashboard)).unwrap();
        terminal
    }

    #[test]
    fn test_render_loading_dashboard() {
        let dashboard = Dashboard::new(TimeWindow::default());
        let text = buffer_text(&draw(&dashboard));

        assert!(text.contains("CORRELATION MAP"));
        assert!(text.contains("Loading..."));
        assert!(text.contains("1 5m"));
        assert!(text.contains("6 4h"));
    }

    #[test]
    fn test_render_error_status() {
        let mut dashboard = Dashboard::new(TimeWindow::default());
        dashboard.apply(&RefreshStatus::Failed("Failed to fetch stock data".to_string()));
        let text = buffer_text(&draw(&dashboard));

        assert!(text.contains("Failed to fetch stock data"));
    }

    #[test]
    fn test_render_ready_dashboard() {
        let dashboard = ready_dashboard(&["AAPL", "MSFT", "TSLA"]);
        let text = buffer_text(&draw(&dashboard));

        assert!(text.contains("Updated"));
        assert!(text.contains("AAPL"));
        assert!(text.contains("TSLA"));
        // Unit diagonal
        assert!(text.contains("1.00"));
        assert!(text.contains("No Correlation"));
    }

    #[test]
    fn test_band_colors_are_distinct() {
        let bands = [
            CorrelationBand::StrongNegative,
            CorrelationBand::ModerateNegative,
            CorrelationBand::WeakNegative,
            CorrelationBand::Neutral,
            CorrelationBand::WeakPositive,
            CorrelationBand::ModeratePositive,
            CorrelationBand::StrongPositive,
        ];
        let colors: std::collections::HashSet<_> =
            bands.iter().map(|band| band_color(*band)).collect();
        assert_eq!(colors.len(), bands.len());
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_price(172.456), "172.46");
        assert_eq!(format_price(0.0), "0.00");
        assert_eq!(format_time(i64::MAX), "--:--:--");
        assert_eq!(format_time(1_700_000_000_000).len(), 8);
    }
}
