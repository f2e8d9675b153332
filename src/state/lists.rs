// Loading and selection state for list views.

use ratatui::widgets::ListState;

/// Loading state for async data.
#[derive(Debug, Clone, Default)]
pub enum LoadingState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> LoadingState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadingState::Loaded(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadingState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadingState::Error(e) => Some(e),
            _ => None,
        }
    }
}

/// A list of items with keyboard-driven selection.
#[derive(Debug, Clone)]
pub struct SelectableList<T> {
    pub data: LoadingState<Vec<T>>,
    pub list_state: ListState,
}

impl<T> Default for SelectableList<T> {
    fn default() -> Self {
        Self {
            data: LoadingState::Idle,
            list_state: ListState::default(),
        }
    }
}

impl<T> SelectableList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.data().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the currently selected index.
    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    /// Get the selected item.
    pub fn selected_item(&self) -> Option<&T> {
        let index = self.list_state.selected()?;
        self.data.data()?.get(index)
    }

    /// Move selection down, stopping at the end.
    pub fn select_next(&mut self) {
        let len = self.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Move selection up, stopping at the start.
    pub fn select_prev(&mut self) {
        if self.len() == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Reset selection to the first item, or none when empty.
    pub fn reset_selection(&mut self) {
        if self.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(0));
        }
    }

    pub fn set_loading(&mut self) {
        self.data = LoadingState::Loading;
    }

    pub fn set_loaded(&mut self, items: Vec<T>) {
        self.data = LoadingState::Loaded(items);
        self.reset_selection();
    }

    pub fn set_error(&mut self, error: String) {
        self.data = LoadingState::Error(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_bounds() {
        let mut list: SelectableList<u32> = SelectableList::new();

        // No data: selection is inert.
        list.select_next();
        assert_eq!(list.selected(), None);

        list.set_loaded(vec![10, 20, 30]);
        assert_eq!(list.selected(), Some(0));

        list.select_next();
        list.select_next();
        assert_eq!(list.selected(), Some(2));
        assert_eq!(list.selected_item(), Some(&30));

        // Stays at the end.
        list.select_next();
        assert_eq!(list.selected(), Some(2));

        list.select_prev();
        list.select_prev();
        list.select_prev();
        assert_eq!(list.selected(), Some(0));
    }

    #[test]
    fn test_empty_load_clears_selection() {
        let mut list: SelectableList<u32> = SelectableList::new();
        list.set_loaded(vec![1]);
        assert_eq!(list.selected(), Some(0));

        list.set_loaded(Vec::new());
        assert_eq!(list.selected(), None);
        assert!(list.is_empty());
    }

    #[test]
    fn test_loading_state_accessors() {
        let state: LoadingState<u32> = LoadingState::Loaded(5);
        assert!(state.is_loaded());
        assert_eq!(state.data(), Some(&5));
        assert!(state.error().is_none());

        let err: LoadingState<u32> = LoadingState::Error("boom".to_string());
        assert_eq!(err.error(), Some("boom"));
    }
}
