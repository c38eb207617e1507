use crossterm::event::KeyCode;

/// Events that can occur in the monitor TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorEvent {
    /// Quit the application
    Quit,
    /// Toggle help overlay
    ToggleHelp,
    /// Switch to next view
    NextTab,
    /// Switch to previous view
    PrevTab,
    /// Jump straight to a view by its position
    SelectTab(usize),
    /// No action
    None,
}

impl MonitorEvent {
    pub fn from_key(code: KeyCode) -> Self {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => MonitorEvent::Quit,
            KeyCode::Char('?') | KeyCode::Char('h') => MonitorEvent::ToggleHelp,
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => MonitorEvent::NextTab,
            KeyCode::BackTab | KeyCode::Left => MonitorEvent::PrevTab,
            KeyCode::Char(c @ '1'..='9') => MonitorEvent::SelectTab(c as usize - '1' as usize),
            _ => MonitorEvent::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(MonitorEvent::from_key(KeyCode::Char('q')), MonitorEvent::Quit);
        assert_eq!(MonitorEvent::from_key(KeyCode::Char('3')), MonitorEvent::SelectTab(2));
        assert_eq!(MonitorEvent::from_key(KeyCode::Char('x')), MonitorEvent::None);
    }
}
