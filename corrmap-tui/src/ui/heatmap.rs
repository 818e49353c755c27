use corrmap::{CorrelationBand, Dashboard, heatmap::LEGEND};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
};

use super::{C_ACCENT, C_DIM, C_HEADER, band_color, band_text_color, bordered};

const LABEL_WIDTH: u16 = 7;
const CELL_WIDTH: u16 = 7;

pub(super) fn render(f: &mut Frame, dashboard: &Dashboard, area: Rect) {
    let block = bordered(" CORRELATION MATRIX ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    match dashboard.snapshot() {
        Some(snapshot) if !snapshot.matrix.is_empty() => {
            f.render_widget(matrix_table(dashboard), chunks[0]);
        }
        _ => {
            let message = if dashboard.is_loading() {
                "Fetching prices..."
            } else {
                "No symbols"
            };
            f.render_widget(
                Paragraph::new(Span::styled(message, Style::default().fg(C_DIM)))
                    .alignment(Alignment::Center),
                chunks[0],
            );
        }
    }

    f.render_widget(legend(), chunks[1]);
}

fn matrix_table(dashboard: &Dashboard) -> Table<'_> {
    let symbols = dashboard.symbols();
    let (cursor_row, cursor_col) = dashboard.cursor();
    let selected = dashboard.selected_symbol();

    let header_cells = std::iter::once(Cell::from("")).chain(symbols.iter().enumerate().map(
        |(j, symbol)| {
            let mut style = Style::default().fg(C_HEADER).add_modifier(Modifier::BOLD);
            if j == cursor_col {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            Cell::from(symbol.as_str()).style(style)
        },
    ));
    let header = Row::new(header_cells).height(1);

    let correlations = dashboard
        .snapshot()
        .map(|snapshot| snapshot.matrix.correlations.as_slice())
        .unwrap_or_default();

    let rows = correlations.iter().enumerate().map(|(i, row)| {
        let mut label_style = Style::default().fg(C_ACCENT);
        if selected.is_some_and(|s| symbols.get(i) == Some(s)) {
            label_style = label_style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        let label = Cell::from(symbols.get(i).map_or("", |s| s.as_str())).style(label_style);

        let cells = row.iter().enumerate().map(|(j, &value)| {
            let band = CorrelationBand::classify(value);
            let mut style = Style::default()
                .bg(band_color(band))
                .fg(band_text_color(band));
            if (i, j) == (cursor_row, cursor_col) {
                style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }
            Cell::from(format!("{value:>6.2}")).style(style)
        });

        Row::new(std::iter::once(label).chain(cells)).height(1)
    });

    let widths = std::iter::once(Constraint::Length(LABEL_WIDTH))
        .chain(symbols.iter().map(|_| Constraint::Length(CELL_WIDTH)));

    Table::new(rows, widths).header(header).column_spacing(1)
}

fn legend_stop(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        format!("{value:+.0}")
    }
}

fn legend() -> Paragraph<'static> {
    let spans: Vec<Span> = LEGEND
        .iter()
        .flat_map(|&(value, band)| {
            [
                Span::styled(
                    format!(" {} ", legend_stop(value)),
                    Style::default()
                        .bg(band_color(band))
                        .fg(band_text_color(band)),
                ),
                Span::styled(format!(" {band} "), Style::default().fg(C_DIM)),
            ]
        })
        .collect();
    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::ui::tests::{buffer_text, ready_dashboard};

    #[test]
    fn test_heatmap_shows_matrix_and_legend() {
        let mut dashboard = ready_dashboard(&["AAPL", "GOOGL", "MSFT"]);
        dashboard.move_cursor(1, 2);

        let mut terminal = Terminal::new(TestBackend::new(72, 10)).unwrap();
        terminal
            .draw(|f| render(f, &dashboard, f.area()))
            .unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains("CORRELATION MATRIX"));
        assert!(text.contains("GOOGL"));
        assert_eq!(text.matches("1.00").count(), 3);
        assert!(text.contains("Strong Negative"));
        assert!(text.contains("Strong Positive"));
        assert!(text.contains(" -1 "));
        assert!(text.contains(" +1 "));

        // Selected row label and cursor cell are highlighted
        let buffer = terminal.backend().buffer();
        let highlighted = buffer
            .content()
            .iter()
            .filter(|cell| cell.modifier.contains(Modifier::REVERSED))
            .count();
        assert!(highlighted >= (LABEL_WIDTH + CELL_WIDTH) as usize);
    }

    #[test]
    fn test_heatmap_placeholder_while_loading() {
        let dashboard = Dashboard::new(Default::default());
        let mut terminal = Terminal::new(TestBackend::new(60, 8)).unwrap();
        terminal
            .draw(|f| render(f, &dashboard, f.area()))
            .unwrap();

        assert!(buffer_text(&terminal).contains("Fetching prices..."));
    }
}
