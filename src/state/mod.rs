// State management module.
// Holds the data, selection, and modal state behind the dashboard UI.

pub mod console;
pub mod forms;
pub mod lists;
pub mod navigation;
pub mod repos;

pub use console::{ConsoleLevel, ConsoleMessage, ConsoleState};
pub use forms::{ConfirmAction, ConfirmState, CreateForm, EditForm, Modal, UploadForm};
pub use lists::{LoadingState, SelectableList};
pub use navigation::{NavigationStack, ViewLevel};
pub use repos::{RepoFilter, RepoTabState, SortMode, VisibilityFilter};
