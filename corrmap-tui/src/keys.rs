//! Key bindings

use corrmap::TimeWindow;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the dashboard to do
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Refresh,
    SetWindow(TimeWindow),
    MoveCursor { rows: isize, cols: isize },
    NextSymbol,
    PreviousSymbol,
    SelectHoveredRow,
}

/// Map a key event to an action, `None` for unbound keys and key releases
pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let action = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Char(c @ '1'..='9') => {
            let index = c.to_digit(10)? as usize - 1;
            Action::SetWindow(TimeWindow::nth_default(index)?)
        }
        KeyCode::Up => Action::MoveCursor { rows: -1, cols: 0 },
        KeyCode::Down => Action::MoveCursor { rows: 1, cols: 0 },
        KeyCode::Left => Action::MoveCursor { rows: 0, cols: -1 },
        KeyCode::Right => Action::MoveCursor { rows: 0, cols: 1 },
        KeyCode::Tab => Action::NextSymbol,
        KeyCode::BackTab => Action::PreviousSymbol,
        KeyCode::Enter => Action::SelectHoveredRow,
        _ => return None,
    };
    Some(action)
}
