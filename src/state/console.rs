// Console tab state management.
// Activity log for mutation outcomes and background errors, with an unread
// badge shown on the tab bar.

use chrono::{DateTime, Utc};
use ratatui::widgets::ListState;

/// Console message level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Info,
    Warn,
    Error,
}

/// A console message for the activity log.
#[derive(Debug, Clone)]
pub struct ConsoleMessage {
    pub level: ConsoleLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ConsoleMessage {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ConsoleLevel::Info,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            level: ConsoleLevel::Warn,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ConsoleLevel::Error,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Complete state for the console tab.
#[derive(Debug, Default)]
pub struct ConsoleState {
    /// Console messages (activity log).
    pub messages: Vec<ConsoleMessage>,
    /// List state for message scrolling.
    pub list_state: ListState,
    /// Errors logged since the console was last viewed (for the badge).
    pub unread_errors: usize,
}

impl ConsoleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_info(&mut self, message: impl Into<String>) {
        self.messages.push(ConsoleMessage::info(message));
        self.scroll_to_bottom();
    }

    pub fn log_warn(&mut self, message: impl Into<String>) {
        self.messages.push(ConsoleMessage::warn(message));
        self.scroll_to_bottom();
    }

    pub fn log_error(&mut self, message: impl Into<String>) {
        self.messages.push(ConsoleMessage::error(message));
        self.unread_errors += 1;
        self.scroll_to_bottom();
    }

    /// Clear the unread badge when the console tab is viewed.
    pub fn mark_viewed(&mut self) {
        self.unread_errors = 0;
    }

    fn scroll_to_bottom(&mut self) {
        if !self.messages.is_empty() {
            self.list_state.select(Some(self.messages.len() - 1));
        }
    }

    pub fn select_prev(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => self.messages.len() - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_next(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.messages.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Drop everything (on logout).
    pub fn clear(&mut self) {
        self.messages.clear();
        self.list_state.select(None);
        self.unread_errors = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unread_badge_counts_errors_only() {
        let mut console = ConsoleState::new();
        console.log_info("repository created");
        console.log_warn("rate limit low");
        assert_eq!(console.unread_errors, 0);

        console.log_error("delete failed");
        console.log_error("upload failed");
        assert_eq!(console.unread_errors, 2);

        console.mark_viewed();
        assert_eq!(console.unread_errors, 0);
        assert_eq!(console.messages.len(), 4);
    }

    #[test]
    fn test_log_follows_tail() {
        let mut console = ConsoleState::new();
        console.log_info("one");
        console.log_info("two");
        assert_eq!(console.list_state.selected(), Some(1));

        console.select_prev();
        assert_eq!(console.list_state.selected(), Some(0));
        console.select_prev();
        assert_eq!(console.list_state.selected(), Some(0));

        console.select_next();
        console.select_next();
        assert_eq!(console.list_state.selected(), Some(1));
    }
}
