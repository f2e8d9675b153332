// Repositories tab state management.
// Repository list with filtering and sorting, plus the drill-down into a
// repository's contents.

use ratatui::widgets::ListState;

use crate::github::{ContentEntry, Repository, Visibility};

use super::lists::{LoadingState, SelectableList};
use super::navigation::{NavigationStack, ViewLevel};

/// Visibility filter over the repository list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityFilter {
    #[default]
    All,
    Public,
    Private,
}

impl VisibilityFilter {
    pub fn label(&self) -> &'static str {
        match self {
            VisibilityFilter::All => "all",
            VisibilityFilter::Public => "public",
            VisibilityFilter::Private => "private",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            VisibilityFilter::All => VisibilityFilter::Public,
            VisibilityFilter::Public => VisibilityFilter::Private,
            VisibilityFilter::Private => VisibilityFilter::All,
        }
    }

    fn matches(&self, repo: &Repository) -> bool {
        match self {
            VisibilityFilter::All => true,
            VisibilityFilter::Public => repo.visibility() == Visibility::Public,
            VisibilityFilter::Private => repo.visibility() == Visibility::Private,
        }
    }
}

/// Sort order for the repository list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Most recently updated first (the API default).
    #[default]
    Updated,
    /// Name, ascending.
    Name,
    /// Star count, descending.
    Stars,
}

impl SortMode {
    pub fn label(&self) -> &'static str {
        match self {
            SortMode::Updated => "updated",
            SortMode::Name => "name",
            SortMode::Stars => "stars",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            SortMode::Updated => SortMode::Name,
            SortMode::Name => SortMode::Stars,
            SortMode::Stars => SortMode::Updated,
        }
    }
}

/// Filter and sort settings for the repository list.
#[derive(Debug, Clone, Default)]
pub struct RepoFilter {
    /// Case-insensitive substring match on name and description.
    pub query: String,
    pub visibility: VisibilityFilter,
    pub sort: SortMode,
}

impl RepoFilter {
    /// Apply the filter to a repository slice, returning indices into it in
    /// display order.
    pub fn apply(&self, repos: &[Repository]) -> Vec<usize> {
        let needle = self.query.to_lowercase();
        let mut indices: Vec<usize> = repos
            .iter()
            .enumerate()
            .filter(|(_, repo)| self.visibility.matches(repo))
            .filter(|(_, repo)| {
                needle.is_empty()
                    || repo.name.to_lowercase().contains(&needle)
                    || repo
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .map(|(i, _)| i)
            .collect();

        match self.sort {
            SortMode::Updated => {
                indices.sort_by(|&a, &b| repos[b].updated_at.cmp(&repos[a].updated_at));
            }
            SortMode::Name => {
                indices.sort_by(|&a, &b| {
                    repos[a].name.to_lowercase().cmp(&repos[b].name.to_lowercase())
                });
            }
            SortMode::Stars => {
                indices.sort_by(|&a, &b| {
                    repos[b].stargazers_count.cmp(&repos[a].stargazers_count)
                });
            }
        }

        indices
    }

    pub fn is_default(&self) -> bool {
        self.query.is_empty()
            && self.visibility == VisibilityFilter::All
            && self.sort == SortMode::Updated
    }
}

/// Complete state for the repositories tab.
#[derive(Debug)]
pub struct RepoTabState {
    /// Navigation stack for the contents drill-down.
    pub nav: NavigationStack,
    /// All loaded repositories.
    pub repos: LoadingState<Vec<Repository>>,
    /// Whether more pages remain on the server.
    pub has_more: bool,
    /// Next page to request.
    pub next_page: u32,
    /// Filter and sort settings.
    pub filter: RepoFilter,
    /// Whether keystrokes go to the filter input.
    pub filter_active: bool,
    /// Indices into `repos` after filter and sort, in display order.
    visible: Vec<usize>,
    /// Selection within the visible list.
    pub list_state: ListState,
    /// Contents listing for the current drill-down level.
    pub contents: SelectableList<ContentEntry>,
}

impl Default for RepoTabState {
    fn default() -> Self {
        Self {
            nav: NavigationStack::default(),
            repos: LoadingState::Idle,
            has_more: false,
            next_page: 1,
            filter: RepoFilter::default(),
            filter_active: false,
            visible: Vec::new(),
            list_state: ListState::default(),
            contents: SelectableList::new(),
        }
    }
}

impl RepoTabState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_view(&self) -> &ViewLevel {
        self.nav.current()
    }

    /// Replace the repository list with the first page.
    pub fn set_loaded(&mut self, repos: Vec<Repository>, per_page: u32) {
        self.has_more = repos.len() as u32 == per_page;
        self.next_page = 2;
        self.repos = LoadingState::Loaded(repos);
        self.refresh_visible();
        self.reset_selection();
    }

    /// Append a further page.
    pub fn append_page(&mut self, mut repos: Vec<Repository>, per_page: u32) {
        self.has_more = repos.len() as u32 == per_page;
        self.next_page += 1;
        if let LoadingState::Loaded(existing) = &mut self.repos {
            existing.append(&mut repos);
        } else {
            self.repos = LoadingState::Loaded(repos);
        }
        self.refresh_visible();
    }

    pub fn set_loading(&mut self) {
        self.repos = LoadingState::Loading;
        self.visible.clear();
        self.list_state.select(None);
    }

    pub fn set_error(&mut self, error: String) {
        self.repos = LoadingState::Error(error);
        self.visible.clear();
        self.list_state.select(None);
    }

    /// Recompute the visible indices after data or filter changes, keeping
    /// the selection in bounds.
    pub fn refresh_visible(&mut self) {
        self.visible = match self.repos.data() {
            Some(repos) => self.filter.apply(repos),
            None => Vec::new(),
        };
        match self.list_state.selected() {
            Some(i) if i >= self.visible.len() => {
                self.reset_selection();
            }
            None if !self.visible.is_empty() => {
                self.list_state.select(Some(0));
            }
            _ => {}
        }
    }

    /// Repositories in display order.
    pub fn visible_repos(&self) -> Vec<&Repository> {
        match self.repos.data() {
            Some(repos) => self.visible.iter().map(|&i| &repos[i]).collect(),
            None => Vec::new(),
        }
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// The repository under the cursor.
    pub fn selected_repo(&self) -> Option<&Repository> {
        let pos = self.list_state.selected()?;
        let index = *self.visible.get(pos)?;
        self.repos.data()?.get(index)
    }

    pub fn select_next(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.visible.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_prev(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn reset_selection(&mut self) {
        if self.visible.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(0));
        }
    }

    /// Whether the cursor is near the end of the list (pagination trigger).
    pub fn near_end(&self, threshold: usize) -> bool {
        match self.list_state.selected() {
            Some(i) => self.has_more && i + threshold >= self.visible.len(),
            None => false,
        }
    }

    /// Filter input editing.
    pub fn filter_push(&mut self, c: char) {
        self.filter.query.push(c);
        self.refresh_visible();
    }

    pub fn filter_backspace(&mut self) {
        self.filter.query.pop();
        self.refresh_visible();
    }

    pub fn filter_clear(&mut self) {
        self.filter.query.clear();
        self.refresh_visible();
    }

    pub fn cycle_visibility_filter(&mut self) {
        self.filter.visibility = self.filter.visibility.next();
        self.refresh_visible();
    }

    pub fn cycle_sort(&mut self) {
        self.filter.sort = self.filter.sort.next();
        self.refresh_visible();
    }

    /// Navigate back (Escape key). Clears child contents so fresh data
    /// loads when drilling down again.
    pub fn go_back(&mut self) -> bool {
        let popped = self.nav.pop();
        if popped {
            self.contents = SelectableList::new();
        }
        popped
    }
}
