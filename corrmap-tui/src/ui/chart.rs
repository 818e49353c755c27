use corrmap::{Dashboard, PriceChart};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph},
};

use super::{C_ACCENT, C_DIM, C_NEUTRAL, bordered, format_price, format_time};

/// Dots used to draw the average price line
const AVERAGE_DOTS: usize = 48;

/// Selected symbol's price series with its average drawn as a dotted line
pub(super) fn render(f: &mut Frame, dashboard: &Dashboard, area: Rect) {
    let chart = match dashboard.selected_chart() {
        Some(chart) if !chart.points.is_empty() => chart,
        other => {
            let title = other.map_or_else(|| " PRICE ".to_string(), |c| format!(" {} ", c.symbol));
            let message = Paragraph::new(Span::styled("No price data", Style::default().fg(C_DIM)))
                .alignment(Alignment::Center)
                .block(bordered(&title));
            f.render_widget(message, area);
            return;
        }
    };

    let title = format!(
        " {}  avg {}  sd {} ",
        chart.symbol,
        format_price(chart.average_price),
        format_price(chart.standard_deviation)
    );
    let (x_bounds, y_bounds) = bounds(&chart);

    let prices: Vec<(f64, f64)> = chart
        .points
        .iter()
        .map(|&(ts, price)| (ts as f64, price))
        .collect();
    let average = average_dots(x_bounds, chart.average_price);

    let datasets = vec![
        Dataset::default()
            .name("avg")
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(C_NEUTRAL))
            .data(&average),
        Dataset::default()
            .name(chart.symbol.to_string())
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(C_ACCENT))
            .data(&prices),
    ];

    let x_labels = vec![
        Span::styled(format_time(x_bounds[0] as i64), Style::default().fg(C_DIM)),
        Span::styled(format_time(x_bounds[1] as i64), Style::default().fg(C_DIM)),
    ];
    let y_labels = vec![
        Span::styled(format_price(y_bounds[0]), Style::default().fg(C_DIM)),
        Span::styled(format_price(y_bounds[1]), Style::default().fg(C_DIM)),
    ];

    let widget = Chart::new(datasets)
        .block(bordered(&title).title_style(Style::default().add_modifier(Modifier::BOLD)))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(C_DIM))
                .bounds(x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(C_DIM))
                .bounds(y_bounds)
                .labels(y_labels),
        );
    f.render_widget(widget, area);
}

/// Axis bounds, widened so a single point or a flat series still has extent
fn bounds(chart: &PriceChart) -> ([f64; 2], [f64; 2]) {
    let (first, last) = chart.time_bounds().unwrap_or((0, 1));
    let last = if last == first { first + 1 } else { last };

    let (low, high) = chart.price_bounds().unwrap_or((0.0, 1.0));
    let pad = ((high - low) * 0.05).max(0.01);

    ([first as f64, last as f64], [low - pad, high + pad])
}

fn average_dots(x_bounds: [f64; 2], average: f64) -> Vec<(f64, f64)> {
    let step = (x_bounds[1] - x_bounds[0]) / AVERAGE_DOTS as f64;
    (0..=AVERAGE_DOTS)
        .map(|i| (x_bounds[0] + step * i as f64, average))
        .collect()
}
