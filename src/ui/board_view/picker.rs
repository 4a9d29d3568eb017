use crossterm::event::{KeyCode, KeyEvent};

use crate::board::{Grouping, Sorting};
use crate::prefs::Preferences;

/// Which list in the display panel has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelField {
    Grouping,
    Ordering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    None,
    Close,
    ApplyGrouping(Grouping),
    ApplySorting(Sorting),
}

/// Single-choice list with a cursor.
#[derive(Debug, Clone)]
pub struct OptionList<T: Copy + PartialEq> {
    options: Vec<T>,
    selected: usize,
}

impl<T: Copy + PartialEq> OptionList<T> {
    pub fn new(options: Vec<T>, current: T) -> Self {
        let selected = options
            .iter()
            .position(|option| *option == current)
            .unwrap_or(0);
        Self { options, selected }
    }

    pub fn options(&self) -> &[T] {
        &self.options
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<T> {
        self.options.get(self.selected).copied()
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.options.len() as isize;
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = (self.selected as isize + delta).rem_euclid(len);
        self.selected = next as usize;
    }

    fn select_index(&mut self, idx: usize) -> bool {
        if idx < self.options.len() {
            self.selected = idx;
            true
        } else {
            false
        }
    }
}

/// The "Display" dropdown: grouping and ordering lists.
#[derive(Debug, Clone)]
pub struct DisplayPanel {
    focus: PanelField,
    grouping: OptionList<Grouping>,
    ordering: OptionList<Sorting>,
}

impl DisplayPanel {
    pub fn new(current: Preferences) -> Self {
        Self {
            focus: PanelField::Grouping,
            grouping: OptionList::new(Grouping::ALL.to_vec(), current.grouping),
            ordering: OptionList::new(Sorting::ALL.to_vec(), current.sorting),
        }
    }

    pub fn focus(&self) -> PanelField {
        self.focus
    }

    pub fn grouping(&self) -> &OptionList<Grouping> {
        &self.grouping
    }

    pub fn ordering(&self) -> &OptionList<Sorting> {
        &self.ordering
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PanelAction {
        match key.code {
            KeyCode::Esc | KeyCode::Char('d') | KeyCode::Char('q') => return PanelAction::Close,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                self.focus = match self.focus {
                    PanelField::Grouping => PanelField::Ordering,
                    PanelField::Ordering => PanelField::Grouping,
                };
            }
            KeyCode::Down | KeyCode::Char('j') => self.move_focused(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_focused(-1),
            KeyCode::Enter => return self.apply_focused(),
            KeyCode::Char(ch) if ch.is_ascii_digit() => {
                let Some(idx) = ch.to_digit(10).and_then(|value| value.checked_sub(1)) else {
                    return PanelAction::None;
                };
                let moved = match self.focus {
                    PanelField::Grouping => self.grouping.select_index(idx as usize),
                    PanelField::Ordering => self.ordering.select_index(idx as usize),
                };
                if moved {
                    return self.apply_focused();
                }
            }
            _ => {}
        }
        PanelAction::None
    }

    fn move_focused(&mut self, delta: isize) {
        match self.focus {
            PanelField::Grouping => self.grouping.move_selection(delta),
            PanelField::Ordering => self.ordering.move_selection(delta),
        }
    }

    fn apply_focused(&self) -> PanelAction {
        match self.focus {
            PanelField::Grouping => self
                .grouping
                .selected()
                .map(PanelAction::ApplyGrouping)
                .unwrap_or(PanelAction::None),
            PanelField::Ordering => self
                .ordering
                .selected()
                .map(PanelAction::ApplySorting)
                .unwrap_or(PanelAction::None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn panel_starts_on_current_values() {
        let panel = DisplayPanel::new(Preferences {
            grouping: Grouping::Priority,
            sorting: Sorting::Title,
        });
        assert_eq!(panel.grouping().selected(), Some(Grouping::Priority));
        assert_eq!(panel.ordering().selected(), Some(Sorting::Title));
        assert_eq!(panel.focus(), PanelField::Grouping);
    }

    #[test]
    fn moving_wraps_and_enter_applies() {
        let mut panel = DisplayPanel::new(Preferences::default());
        assert_eq!(panel.handle_key(key(KeyCode::Char('k'))), PanelAction::None);
        assert_eq!(
            panel.handle_key(key(KeyCode::Enter)),
            PanelAction::ApplyGrouping(Grouping::Priority)
        );
    }

    #[test]
    fn tab_switches_to_ordering() {
        let mut panel = DisplayPanel::new(Preferences::default());
        panel.handle_key(key(KeyCode::Tab));
        assert_eq!(panel.focus(), PanelField::Ordering);
        panel.handle_key(key(KeyCode::Char('j')));
        assert_eq!(
            panel.handle_key(key(KeyCode::Enter)),
            PanelAction::ApplySorting(Sorting::Title)
        );
    }

    #[test]
    fn digits_pick_directly() {
        let mut panel = DisplayPanel::new(Preferences::default());
        assert_eq!(
            panel.handle_key(key(KeyCode::Char('2'))),
            PanelAction::ApplyGrouping(Grouping::User)
        );
        assert_eq!(panel.handle_key(key(KeyCode::Char('9'))), PanelAction::None);
        assert_eq!(panel.handle_key(key(KeyCode::Esc)), PanelAction::Close);
    }
}
