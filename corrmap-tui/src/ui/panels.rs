use corrmap::{CorrelationBand, Dashboard, SymbolStatistics};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{
    C_ACCENT, C_BRIGHT, C_DIM, C_NEGATIVE, C_NEUTRAL, C_POSITIVE, band_color, bordered,
    format_price,
};

/// Hovered pair statistics and their correlation
pub(super) fn render_pair_detail(f: &mut Frame, dashboard: &Dashboard, area: Rect) {
    let block = bordered(" PAIR DETAIL ");

    let Some(pair) = dashboard.hovered_pair() else {
        let hint = Line::from(Span::styled(
            "Move the cursor over the matrix",
            Style::default().fg(C_DIM),
        ));
        f.render_widget(Paragraph::new(hint).block(block), area);
        return;
    };

    let band = CorrelationBand::classify(pair.correlation);
    let tone = if band.is_positive() {
        C_POSITIVE
    } else if band.is_negative() {
        C_NEGATIVE
    } else {
        C_NEUTRAL
    };

    let mut lines = statistics_lines(pair.first);
    lines.extend(statistics_lines(pair.second));
    lines.push(Line::from(vec![
        Span::styled("Correlation: ", Style::default().fg(C_DIM)),
        Span::styled(
            format!("{:.2}", pair.correlation),
            Style::default().fg(tone).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" ({band})"), Style::default().fg(tone)),
    ]));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Most strongly correlated (or anti-correlated) pairs, one per line
pub(super) fn render_strongest_pairs(f: &mut Frame, dashboard: &Dashboard, area: Rect) {
    let block = bordered(" STRONGEST PAIRS ");
    let limit = block.inner(area).height as usize;

    let lines: Vec<Line> = dashboard
        .strongest_pairs(limit)
        .into_iter()
        .map(|pair| {
            let band = CorrelationBand::classify(pair.correlation);
            Line::from(vec![
                Span::styled(
                    format!("{:>6.2} ", pair.correlation),
                    Style::default().bg(band_color(band)).fg(C_BRIGHT),
                ),
                Span::styled(
                    format!(" {} / {}", pair.first, pair.second),
                    Style::default().fg(C_ACCENT),
                ),
                Span::styled(format!("  {band}"), Style::default().fg(C_DIM)),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn statistics_lines(statistics: &SymbolStatistics) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            statistics.symbol.to_string(),
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("  Avg: ", Style::default().fg(C_DIM)),
            Span::styled(
                format_price(statistics.average_price),
                Style::default().fg(C_BRIGHT),
            ),
            Span::styled("  StdDev: ", Style::default().fg(C_DIM)),
            Span::styled(
                format_price(statistics.standard_deviation),
                Style::default().fg(C_BRIGHT),
            ),
        ]),
    ]
}
