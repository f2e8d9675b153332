// App state and main event loop.
// Owns the screens, tabs, modals, and the query cache; network work runs on
// spawned tasks that report back over a channel.

use std::sync::Arc;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::prelude::*;
use tokio::sync::{Mutex, mpsc};

use crate::auth::{self, TokenStore};
use crate::error::{DeckError, Result};
use crate::github::{ContentEntry, GitHubClient, Repository, User};
use crate::query::{DEFAULT_TTL, Family, QueryCache, QueryKey, with_retry};
use crate::state::{
    ConfirmAction, ConfirmState, ConsoleState, CreateForm, EditForm, Modal, RepoTabState,
    UploadForm, ViewLevel,
};
use crate::ui;

/// Page size for the repository list.
pub const REPOS_PER_PAGE: u32 = 50;

/// Remaining rows before the end of the list that trigger the next page.
const PAGINATE_THRESHOLD: usize = 5;

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    TokenEntry,
    Dashboard,
}

/// Active tab on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Repositories,
    Console,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Repositories => "Repositories",
            Tab::Console => "Console",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Repositories => Tab::Console,
            Tab::Console => Tab::Repositories,
        }
    }

    pub fn prev(&self) -> Self {
        self.next()
    }
}

/// Results sent back from spawned network tasks.
#[derive(Debug)]
pub enum AppMessage {
    LoginResult {
        result: Result<User>,
    },
    UserLoaded(Result<User>),
    ReposLoaded {
        page: u32,
        result: Result<Vec<Repository>>,
    },
    ContentsLoaded {
        owner: String,
        repo: String,
        path: String,
        result: Result<Vec<ContentEntry>>,
    },
    RepoCreated(Result<Repository>),
    RepoUpdated {
        owner: String,
        repo: String,
        result: Result<Repository>,
    },
    VisibilitySet {
        owner: String,
        repo: String,
        result: Result<Repository>,
    },
    RepoDeleted {
        owner: String,
        repo: String,
        result: Result<()>,
    },
    FileUploaded {
        owner: String,
        repo: String,
        path: String,
        result: Result<()>,
    },
    FileDeleted {
        owner: String,
        repo: String,
        path: String,
        result: Result<()>,
    },
}

/// Main application state.
pub struct App {
    pub screen: Screen,
    pub active_tab: Tab,
    pub should_quit: bool,
    pub show_help: bool,

    /// Token entry screen state.
    pub token_input: String,
    pub token_error: Option<String>,
    pub validating: bool,

    pub store: TokenStore,
    pub client: Option<Arc<Mutex<GitHubClient>>>,
    pub cache: QueryCache,

    pub user: Option<User>,
    pub repos: RepoTabState,
    pub console: ConsoleState,
    pub modal: Option<Modal>,
    /// One-shot success banner (e.g. after creating a repository).
    pub banner: Option<String>,

    tx: mpsc::UnboundedSender<AppMessage>,
    rx: mpsc::UnboundedReceiver<AppMessage>,
}

impl App {
    pub fn new(store: TokenStore) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            screen: Screen::TokenEntry,
            active_tab: Tab::default(),
            should_quit: false,
            show_help: false,
            token_input: String::new(),
            token_error: None,
            validating: false,
            store,
            client: None,
            cache: QueryCache::new(),
            user: None,
            repos: RepoTabState::new(),
            console: ConsoleState::new(),
            modal: None,
            banner: None,
            tx,
            rx,
        }
    }

    /// Main event loop.
    pub async fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> Result<()> {
        self.bootstrap();

        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;

            while let Ok(message) = self.rx.try_recv() {
                self.handle_message(message);
            }

            self.handle_events()?;
        }
        Ok(())
    }

    /// Resume a previous session when a token is already stored.
    fn bootstrap(&mut self) {
        if !self.store.is_authenticated() {
            return;
        }
        match auth::client_from_store(&self.store) {
            Ok(client) => {
                self.client = Some(Arc::new(Mutex::new(client)));
                self.screen = Screen::Dashboard;
                self.load_user();
                self.load_repos(1);
            }
            Err(e) => {
                self.token_error = Some(e.to_string());
            }
        }
    }

    /// Handle keyboard and other events.
    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.banner = None;
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.show_help {
            self.show_help = false;
            return;
        }
        match self.screen {
            Screen::TokenEntry => self.handle_token_key(key),
            Screen::Dashboard => {
                if self.modal.is_some() {
                    self.handle_modal_key(key);
                } else {
                    self.handle_dashboard_key(key);
                }
            }
        }
    }

    // ---- token entry ----

    fn handle_token_key(&mut self, key: KeyEvent) {
        if self.validating {
            return;
        }
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter => self.submit_login(),
            KeyCode::Backspace => {
                self.token_input.pop();
                self.token_error = None;
            }
            KeyCode::Char(c) => {
                self.token_input.push(c);
                self.token_error = None;
            }
            _ => {}
        }
    }

    fn submit_login(&mut self) {
        let token = self.token_input.trim().to_string();
        if token.is_empty() {
            self.token_error = Some("Enter a personal access token".to_string());
            return;
        }
        self.validating = true;
        self.token_error = None;

        let store = self.store.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = auth::login(&store, &token).await;
            let _ = tx.send(AppMessage::LoginResult { result });
        });
    }

    // ---- dashboard keys ----

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        // Filter input swallows printable keys first.
        if self.active_tab == Tab::Repositories && self.repos.filter_active {
            match key.code {
                KeyCode::Esc => {
                    self.repos.filter_clear();
                    self.repos.filter_active = false;
                }
                KeyCode::Enter => self.repos.filter_active = false,
                KeyCode::Backspace => self.repos.filter_backspace(),
                KeyCode::Char(c) => self.repos.filter_push(c),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Tab => {
                self.active_tab = self.active_tab.next();
                self.clear_console_badge_if_viewing();
            }
            KeyCode::BackTab => {
                self.active_tab = self.active_tab.prev();
                self.clear_console_badge_if_viewing();
            }
            _ => match self.active_tab {
                Tab::Repositories => self.handle_repos_key(key),
                Tab::Console => self.handle_console_key(key),
            },
        }
    }

    fn handle_console_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.console.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.console.select_next(),
            _ => {}
        }
    }

    fn handle_repos_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => match self.repos.current_view() {
                ViewLevel::Repositories => self.repos.select_prev(),
                ViewLevel::Contents { .. } => self.repos.contents.select_prev(),
            },
            KeyCode::Down | KeyCode::Char('j') => match self.repos.current_view() {
                ViewLevel::Repositories => {
                    self.repos.select_next();
                    if self.repos.near_end(PAGINATE_THRESHOLD) {
                        let page = self.repos.next_page;
                        self.load_repos(page);
                    }
                }
                ViewLevel::Contents { .. } => self.repos.contents.select_next(),
            },
            KeyCode::Enter => self.drill_down(),
            KeyCode::Esc => {
                self.repos.go_back();
            }
            KeyCode::Char('/') => self.repos.filter_active = true,
            KeyCode::Char('f') => self.repos.cycle_visibility_filter(),
            KeyCode::Char('s') => self.repos.cycle_sort(),
            KeyCode::Char('r') => self.refresh_current(),
            KeyCode::Char('n') => {
                if matches!(self.repos.current_view(), ViewLevel::Repositories) {
                    self.modal = Some(Modal::Create(CreateForm::new()));
                }
            }
            KeyCode::Char('e') => {
                if let Some(repo) = self.repos.selected_repo() {
                    if matches!(self.repos.current_view(), ViewLevel::Repositories) {
                        self.modal = Some(Modal::Edit(EditForm::from_repo(repo)));
                    }
                }
            }
            KeyCode::Char('v') => {
                if matches!(self.repos.current_view(), ViewLevel::Repositories) {
                    if let Some(repo) = self.repos.selected_repo() {
                        self.modal = Some(Modal::Confirm(ConfirmState::new(
                            ConfirmAction::ToggleVisibility {
                                owner: repo.owner.login.clone(),
                                repo: repo.name.clone(),
                                make_private: !repo.private,
                            },
                        )));
                    }
                }
            }
            KeyCode::Char('d') => self.request_delete(),
            KeyCode::Char('u') => self.open_upload(),
            KeyCode::Char('o') => self.sign_out(),
            _ => {}
        }
    }

    /// Enter on the current selection: into a repository's contents, or
    /// deeper into a directory.
    fn drill_down(&mut self) {
        match self.repos.current_view().clone() {
            ViewLevel::Repositories => {
                if let Some(repo) = self.repos.selected_repo() {
                    let owner = repo.owner.login.clone();
                    let name = repo.name.clone();
                    self.repos.nav.push(ViewLevel::Contents {
                        owner: owner.clone(),
                        repo: name.clone(),
                        path: String::new(),
                    });
                    self.load_contents(owner, name, String::new());
                }
            }
            ViewLevel::Contents { owner, repo, .. } => {
                if let Some(entry) = self.repos.contents.selected_item() {
                    if entry.is_dir() {
                        let path = entry.path.clone();
                        self.repos.nav.push(ViewLevel::Contents {
                            owner: owner.clone(),
                            repo: repo.clone(),
                            path: path.clone(),
                        });
                        self.load_contents(owner, repo, path);
                    }
                }
            }
        }
    }

    fn request_delete(&mut self) {
        match self.repos.current_view().clone() {
            ViewLevel::Repositories => {
                if let Some(repo) = self.repos.selected_repo() {
                    self.modal = Some(Modal::Confirm(ConfirmState::new(
                        ConfirmAction::DeleteRepo {
                            owner: repo.owner.login.clone(),
                            repo: repo.name.clone(),
                        },
                    )));
                }
            }
            ViewLevel::Contents { owner, repo, .. } => {
                if let Some(entry) = self.repos.contents.selected_item() {
                    if !entry.is_dir() {
                        self.modal = Some(Modal::Confirm(ConfirmState::new(
                            ConfirmAction::DeleteFile {
                                owner,
                                repo,
                                path: entry.path.clone(),
                                sha: entry.sha.clone(),
                            },
                        )));
                    }
                }
            }
        }
    }

    fn open_upload(&mut self) {
        match self.repos.current_view().clone() {
            ViewLevel::Repositories => {
                if let Some(repo) = self.repos.selected_repo() {
                    self.modal = Some(Modal::Upload(UploadForm::new(
                        repo.owner.login.clone(),
                        repo.name.clone(),
                        "",
                    )));
                }
            }
            ViewLevel::Contents { owner, repo, path } => {
                let mut form = UploadForm::new(owner, repo, &path);
                // Uploading over the selected file replaces it.
                if let Some(entry) = self.repos.contents.selected_item() {
                    if !entry.is_dir() {
                        form.repo_path = entry.path.clone();
                        form.existing_sha = Some(entry.sha.clone());
                    }
                }
                self.modal = Some(Modal::Upload(form));
            }
        }
    }

    fn sign_out(&mut self) {
        if let Err(e) = auth::logout(&self.store, &mut self.cache) {
            self.console.log_error(format!("Sign out failed: {}", e));
            return;
        }
        self.client = None;
        self.user = None;
        self.repos = RepoTabState::new();
        self.console.clear();
        self.modal = None;
        self.banner = None;
        self.token_input.clear();
        self.token_error = None;
        self.screen = Screen::TokenEntry;
    }

    /// Force a fresh fetch of whatever the current view shows.
    fn refresh_current(&mut self) {
        match self.repos.current_view().clone() {
            ViewLevel::Repositories => {
                self.cache.invalidate(&Family::RepoList);
                self.load_repos(1);
            }
            ViewLevel::Contents { owner, repo, path } => {
                self.cache.invalidate(&Family::Contents {
                    owner: owner.clone(),
                    repo: repo.clone(),
                });
                self.load_contents(owner, repo, path);
            }
        }
    }

    fn clear_console_badge_if_viewing(&mut self) {
        if self.active_tab == Tab::Console {
            self.console.mark_viewed();
        }
    }

    // ---- modal keys ----

    fn handle_modal_key(&mut self, key: KeyEvent) {
        // A submit in progress keeps the modal locked.
        let submitting = match &self.modal {
            Some(Modal::Create(f)) => f.submitting,
            Some(Modal::Edit(f)) => f.submitting,
            Some(Modal::Upload(f)) => f.submitting,
            Some(Modal::Confirm(c)) => c.submitting,
            None => return,
        };
        if submitting {
            return;
        }

        if key.code == KeyCode::Esc {
            self.modal = None;
            return;
        }
        if key.code == KeyCode::Enter {
            match &self.modal {
                Some(Modal::Create(_)) => self.submit_create(),
                Some(Modal::Edit(_)) => self.submit_edit(),
                Some(Modal::Upload(_)) => self.submit_upload(),
                Some(Modal::Confirm(_)) => self.submit_confirm(),
                None => {}
            }
            return;
        }

        match &mut self.modal {
            Some(Modal::Create(form)) => match key.code {
                KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
                KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.prev(),
                KeyCode::Backspace => form.backspace(),
                KeyCode::Char(' ') => {
                    form.toggle();
                    form.input_char(' ');
                }
                KeyCode::Char(c) => form.input_char(c),
                _ => {}
            },
            Some(Modal::Edit(form)) => match key.code {
                KeyCode::Tab | KeyCode::Down | KeyCode::BackTab | KeyCode::Up => {
                    form.focus = form.focus.next()
                }
                KeyCode::Backspace => form.backspace(),
                KeyCode::Char(' ') => {
                    form.toggle();
                    form.input_char(' ');
                }
                KeyCode::Char(c) => form.input_char(c),
                _ => {}
            },
            Some(Modal::Upload(form)) => match key.code {
                KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
                KeyCode::Backspace => form.backspace(),
                KeyCode::Char(c) => form.input_char(c),
                _ => {}
            },
            Some(Modal::Confirm(confirm)) => match key.code {
                KeyCode::Backspace => confirm.backspace(),
                KeyCode::Char(c) => confirm.input_char(c),
                _ => {}
            },
            None => {}
        }
    }

    // ---- mutations ----

    fn submit_create(&mut self) {
        let Some(Modal::Create(form)) = &mut self.modal else {
            return;
        };
        if let Err(problem) = form.validate() {
            form.error = Some(problem);
            return;
        }
        let request = form.to_request();
        form.submitting = true;

        let Some(client) = self.client.clone() else {
            return;
        };
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.lock().await.create_repo(&request).await;
            let _ = tx.send(AppMessage::RepoCreated(result));
        });
    }

    fn submit_edit(&mut self) {
        let Some(Modal::Edit(form)) = &mut self.modal else {
            return;
        };
        let owner = form.owner.clone();
        let repo = form.repo.clone();
        let request = form.to_request();
        form.submitting = true;

        let Some(client) = self.client.clone() else {
            return;
        };
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.lock().await.update_repo(&owner, &repo, &request).await;
            let _ = tx.send(AppMessage::RepoUpdated {
                owner,
                repo,
                result,
            });
        });
    }

    fn submit_upload(&mut self) {
        let Some(Modal::Upload(form)) = &mut self.modal else {
            return;
        };
        if let Err(problem) = form.validate() {
            form.error = Some(problem);
            return;
        }
        let owner = form.owner.clone();
        let repo = form.repo.clone();
        let local_path = form.local_path.trim().to_string();
        let repo_path = form.repo_path.trim().to_string();
        let message = form.commit_message();
        let sha = form.existing_sha.clone();
        form.submitting = true;

        let Some(client) = self.client.clone() else {
            return;
        };
        let tx = self.tx.clone();
        // File read and upload both happen in the task; either failure
        // comes back through the result message.
        tokio::spawn(async move {
            let result: Result<()> = async {
                let bytes = tokio::fs::read(&local_path).await?;
                client
                    .lock()
                    .await
                    .put_file(&owner, &repo, &repo_path, &message, &bytes, sha.as_deref())
                    .await?;
                Ok(())
            }
            .await;
            let _ = tx.send(AppMessage::FileUploaded {
                owner,
                repo,
                path: repo_path,
                result,
            });
        });
    }

    fn submit_confirm(&mut self) {
        let Some(Modal::Confirm(confirm)) = &mut self.modal else {
            return;
        };
        if !confirm.can_confirm() {
            confirm.error = Some("Type the repository name to confirm".to_string());
            return;
        }
        let action = confirm.action.clone();
        confirm.submitting = true;

        let Some(client) = self.client.clone() else {
            return;
        };
        let tx = self.tx.clone();
        match action {
            ConfirmAction::ToggleVisibility {
                owner,
                repo,
                make_private,
            } => {
                tokio::spawn(async move {
                    let result = client
                        .lock()
                        .await
                        .set_visibility(&owner, &repo, make_private)
                        .await;
                    let _ = tx.send(AppMessage::VisibilitySet {
                        owner,
                        repo,
                        result,
                    });
                });
            }
            ConfirmAction::DeleteRepo { owner, repo } => {
                tokio::spawn(async move {
                    let result = client.lock().await.delete_repo(&owner, &repo).await;
                    let _ = tx.send(AppMessage::RepoDeleted {
                        owner,
                        repo,
                        result,
                    });
                });
            }
            ConfirmAction::DeleteFile {
                owner,
                repo,
                path,
                sha,
            } => {
                tokio::spawn(async move {
                    let message = format!("Delete {}", path);
                    let result = client
                        .lock()
                        .await
                        .delete_file(&owner, &repo, &path, &message, &sha)
                        .await;
                    let _ = tx.send(AppMessage::FileDeleted {
                        owner,
                        repo,
                        path,
                        result,
                    });
                });
            }
        }
    }

    // ---- reads ----

    fn load_user(&mut self) {
        let key = QueryKey::CurrentUser;
        if let Some(user) = self.cache.get_fresh::<User>(&key, DEFAULT_TTL) {
            self.user = Some(user);
            return;
        }
        if !self.cache.begin_fetch(&key) {
            return;
        }
        let Some(client) = self.client.clone() else {
            self.cache.finish_fetch(&key);
            return;
        };
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = with_retry(|| {
                let client = Arc::clone(&client);
                async move { client.lock().await.get_current_user().await }
            })
            .await;
            let _ = tx.send(AppMessage::UserLoaded(result));
        });
    }

    fn load_repos(&mut self, page: u32) {
        let key = QueryKey::Repos { page };
        if let Some(repos) = self.cache.get_fresh::<Vec<Repository>>(&key, DEFAULT_TTL) {
            if page == 1 {
                self.repos.set_loaded(repos, REPOS_PER_PAGE);
            } else {
                self.repos.append_page(repos, REPOS_PER_PAGE);
            }
            return;
        }
        if !self.cache.begin_fetch(&key) {
            return;
        }
        let Some(client) = self.client.clone() else {
            self.cache.finish_fetch(&key);
            return;
        };
        if page == 1 {
            self.repos.set_loading();
        }
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = with_retry(|| {
                let client = Arc::clone(&client);
                async move { client.lock().await.list_repos(page, REPOS_PER_PAGE).await }
            })
            .await;
            let _ = tx.send(AppMessage::ReposLoaded { page, result });
        });
    }

    fn load_contents(&mut self, owner: String, repo: String, path: String) {
        let key = QueryKey::Contents {
            owner: owner.clone(),
            repo: repo.clone(),
            path: path.clone(),
        };
        if let Some(entries) = self.cache.get_fresh::<Vec<ContentEntry>>(&key, DEFAULT_TTL) {
            self.repos.contents.set_loaded(entries);
            return;
        }
        if !self.cache.begin_fetch(&key) {
            return;
        }
        let Some(client) = self.client.clone() else {
            self.cache.finish_fetch(&key);
            return;
        };
        self.repos.contents.set_loading();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = with_retry(|| {
                let client = Arc::clone(&client);
                let owner = owner.clone();
                let repo = repo.clone();
                let path = path.clone();
                async move { client.lock().await.get_contents(&owner, &repo, &path).await }
            })
            .await;
            let _ = tx.send(AppMessage::ContentsLoaded {
                owner,
                repo,
                path,
                result,
            });
        });
    }

    /// Reload the contents listing if the given location is on screen.
    fn reload_contents_if_viewing(&mut self, owner: &str, repo: &str) {
        if let ViewLevel::Contents {
            owner: o,
            repo: r,
            path,
        } = self.repos.current_view().clone()
        {
            if o == owner && r == repo {
                self.load_contents(o, r, path);
            }
        }
    }

    // ---- message handling ----

    fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::LoginResult { result } => self.on_login(result),
            AppMessage::UserLoaded(result) => self.on_user_loaded(result),
            AppMessage::ReposLoaded { page, result } => self.on_repos_loaded(page, result),
            AppMessage::ContentsLoaded {
                owner,
                repo,
                path,
                result,
            } => self.on_contents_loaded(owner, repo, path, result),
            AppMessage::RepoCreated(result) => self.on_repo_created(result),
            AppMessage::RepoUpdated {
                owner,
                repo,
                result,
            } => self.on_repo_updated(owner, repo, result),
            AppMessage::VisibilitySet {
                owner,
                repo,
                result,
            } => self.on_visibility_set(owner, repo, result),
            AppMessage::RepoDeleted {
                owner,
                repo,
                result,
            } => self.on_repo_deleted(owner, repo, result),
            AppMessage::FileUploaded {
                owner,
                repo,
                path,
                result,
            } => self.on_file_uploaded(owner, repo, path, result),
            AppMessage::FileDeleted {
                owner,
                repo,
                path,
                result,
            } => self.on_file_deleted(owner, repo, path, result),
        }
    }

    fn on_login(&mut self, result: Result<User>) {
        self.validating = false;
        match result {
            Ok(user) => {
                match auth::client_from_store(&self.store) {
                    Ok(client) => self.client = Some(Arc::new(Mutex::new(client))),
                    Err(e) => {
                        self.token_error = Some(e.to_string());
                        return;
                    }
                }
                self.console.log_info(format!("Signed in as {}", user.login));
                self.cache.insert(QueryKey::CurrentUser, &user);
                self.user = Some(user);
                self.token_input.clear();
                self.screen = Screen::Dashboard;
                self.load_repos(1);
            }
            Err(e) => {
                // Invalid, expired, and under-scoped tokens all land here.
                self.token_error = Some(match e {
                    DeckError::Unauthorized => "Invalid token".to_string(),
                    other => other.to_string(),
                });
            }
        }
    }

    fn on_user_loaded(&mut self, result: Result<User>) {
        match result {
            Ok(user) => {
                self.cache.insert(QueryKey::CurrentUser, &user);
                self.user = Some(user);
            }
            Err(e) => {
                self.cache.finish_fetch(&QueryKey::CurrentUser);
                self.console.log_error(format!("Failed to load user: {}", e));
            }
        }
    }

    fn on_repos_loaded(&mut self, page: u32, result: Result<Vec<Repository>>) {
        let key = QueryKey::Repos { page };
        match result {
            Ok(repos) => {
                self.cache.insert(key, &repos);
                if page == 1 {
                    self.repos.set_loaded(repos, REPOS_PER_PAGE);
                } else {
                    self.repos.append_page(repos, REPOS_PER_PAGE);
                }
            }
            Err(e) => {
                self.cache.finish_fetch(&key);
                self.console
                    .log_error(format!("Failed to load repositories: {}", e));
                if page == 1 {
                    self.repos.set_error(e.to_string());
                }
                if e.is_auth_failure() {
                    self.console
                        .log_warn("Token rejected, sign in again with a fresh token");
                }
            }
        }
    }

    fn on_contents_loaded(
        &mut self,
        owner: String,
        repo: String,
        path: String,
        result: Result<Vec<ContentEntry>>,
    ) {
        let key = QueryKey::Contents {
            owner: owner.clone(),
            repo: repo.clone(),
            path: path.clone(),
        };
        let viewing = matches!(
            self.repos.current_view(),
            ViewLevel::Contents { owner: o, repo: r, path: p }
                if *o == owner && *r == repo && *p == path
        );
        match result {
            Ok(entries) => {
                self.cache.insert(key, &entries);
                // Late results for a view we already left are dropped.
                if viewing {
                    self.repos.contents.set_loaded(entries);
                }
            }
            Err(e) => {
                self.cache.finish_fetch(&key);
                self.console
                    .log_error(format!("Failed to load {}/{} contents: {}", owner, repo, e));
                if viewing {
                    self.repos.contents.set_error(e.to_string());
                }
            }
        }
    }

    fn on_repo_created(&mut self, result: Result<Repository>) {
        match result {
            Ok(repo) => {
                self.modal = None;
                self.banner = Some(format!("Repository {} created", repo.full_name));
                self.console
                    .log_info(format!("Created repository {}", repo.full_name));
                self.cache.invalidate(&Family::RepoList);
                self.cache.invalidate(&Family::User);
                self.load_repos(1);
                self.load_user();
            }
            Err(e) => {
                let message = e.to_string();
                self.console
                    .log_error(format!("Create repository failed: {}", message));
                if let Some(Modal::Create(form)) = &mut self.modal {
                    form.submitting = false;
                    form.error = Some(message);
                }
            }
        }
    }

    fn on_repo_updated(&mut self, owner: String, repo: String, result: Result<Repository>) {
        match result {
            Ok(updated) => {
                self.modal = None;
                self.console
                    .log_info(format!("Updated {}", updated.full_name));
                self.cache.invalidate(&Family::Repo {
                    owner: owner.clone(),
                    repo: repo.clone(),
                });
                self.cache.invalidate(&Family::RepoList);
                self.load_repos(1);
            }
            Err(e) => {
                let message = e.to_string();
                self.console
                    .log_error(format!("Update {}/{} failed: {}", owner, repo, message));
                if let Some(Modal::Edit(form)) = &mut self.modal {
                    form.submitting = false;
                    form.error = Some(message);
                }
            }
        }
    }

    fn on_visibility_set(&mut self, owner: String, repo: String, result: Result<Repository>) {
        match result {
            Ok(updated) => {
                self.modal = None;
                self.banner = Some(format!(
                    "{} is now {}",
                    updated.full_name,
                    updated.visibility().label()
                ));
                self.console.log_info(format!(
                    "{} visibility changed to {}",
                    updated.full_name,
                    updated.visibility().label()
                ));
                self.cache.invalidate(&Family::Repo {
                    owner: owner.clone(),
                    repo: repo.clone(),
                });
                self.cache.invalidate(&Family::RepoList);
                self.load_repos(1);
            }
            Err(e) => {
                let message = e.to_string();
                self.console.log_error(format!(
                    "Visibility change for {}/{} failed: {}",
                    owner, repo, message
                ));
                if let Some(Modal::Confirm(confirm)) = &mut self.modal {
                    confirm.submitting = false;
                    confirm.error = Some(message);
                }
            }
        }
    }

    fn on_repo_deleted(&mut self, owner: String, repo: String, result: Result<()>) {
        match result {
            Ok(()) => {
                self.modal = None;
                self.console
                    .log_info(format!("Deleted repository {}/{}", owner, repo));
                self.cache.invalidate(&Family::RepoList);
                self.cache.invalidate(&Family::User);
                self.cache.invalidate(&Family::Repo {
                    owner: owner.clone(),
                    repo: repo.clone(),
                });
                self.cache.invalidate(&Family::Contents {
                    owner: owner.clone(),
                    repo: repo.clone(),
                });
                self.repos.nav.reset();
                self.load_repos(1);
                self.load_user();
            }
            Err(e) => {
                let message = e.to_string();
                self.console
                    .log_error(format!("Delete {}/{} failed: {}", owner, repo, message));
                if let Some(Modal::Confirm(confirm)) = &mut self.modal {
                    confirm.submitting = false;
                    confirm.error = Some(message);
                }
            }
        }
    }

    fn on_file_uploaded(&mut self, owner: String, repo: String, path: String, result: Result<()>) {
        match result {
            Ok(()) => {
                self.modal = None;
                self.banner = Some(format!("Uploaded {}", path));
                self.console
                    .log_info(format!("Uploaded {} to {}/{}", path, owner, repo));
                self.cache.invalidate(&Family::Contents {
                    owner: owner.clone(),
                    repo: repo.clone(),
                });
                self.reload_contents_if_viewing(&owner, &repo);
            }
            Err(e) => {
                let message = e.to_string();
                self.console
                    .log_error(format!("Upload of {} failed: {}", path, message));
                if let Some(Modal::Upload(form)) = &mut self.modal {
                    form.submitting = false;
                    form.error = Some(message);
                }
            }
        }
    }

    fn on_file_deleted(&mut self, owner: String, repo: String, path: String, result: Result<()>) {
        match result {
            Ok(()) => {
                self.modal = None;
                self.console
                    .log_info(format!("Deleted {} from {}/{}", path, owner, repo));
                self.cache.invalidate(&Family::Contents {
                    owner: owner.clone(),
                    repo: repo.clone(),
                });
                self.reload_contents_if_viewing(&owner, &repo);
            }
            Err(e) => {
                let message = e.to_string();
                self.console
                    .log_error(format!("Delete {} failed: {}", path, message));
                if let Some(Modal::Confirm(confirm)) = &mut self.modal {
                    confirm.submitting = false;
                    confirm.error = Some(message);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_app() -> (App, TempDir) {
        let temp = TempDir::new().unwrap();
        let store = TokenStore::new(temp.path().join("token"));
        (App::new(store), temp)
    }

    fn sample_repo(name: &str) -> Repository {
        let json = format!(
            r#"{{
                "id": 1,
                "name": "{name}",
                "full_name": "octocat/{name}",
                "owner": {{"id": 1, "login": "octocat", "name": null, "avatar_url": null}},
                "private": false,
                "description": null,
                "html_url": "https://github.com/octocat/{name}",
                "language": null,
                "default_branch": "main",
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-06-01T00:00:00Z",
                "pushed_at": null
            }}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    #[tokio::test]
    async fn test_starts_on_token_screen_without_token() {
        let (app, _temp) = test_app();
        assert_eq!(app.screen, Screen::TokenEntry);
        assert!(!app.store.is_authenticated());
    }

    #[tokio::test]
    async fn test_create_success_invalidates_repo_list() {
        let (mut app, _temp) = test_app();
        app.cache
            .insert(QueryKey::Repos { page: 1 }, &vec![sample_repo("old")]);
        app.cache.insert(QueryKey::CurrentUser, &"octocat".to_string());

        app.handle_message(AppMessage::RepoCreated(Ok(sample_repo("widget"))));

        // List and user entries are gone so the next read hits the network.
        assert!(
            app.cache
                .get_fresh::<Vec<Repository>>(&QueryKey::Repos { page: 1 }, DEFAULT_TTL)
                .is_none()
        );
        assert!(
            app.cache
                .get_fresh::<String>(&QueryKey::CurrentUser, DEFAULT_TTL)
                .is_none()
        );
        assert!(app.modal.is_none());
        assert!(app.banner.as_deref().unwrap().contains("octocat/widget"));
    }

    #[tokio::test]
    async fn test_duplicate_name_error_stays_in_form() {
        let (mut app, _temp) = test_app();
        let mut form = CreateForm::new();
        form.name = "widget".to_string();
        form.submitting = true;
        app.modal = Some(Modal::Create(form));

        app.handle_message(AppMessage::RepoCreated(Err(DeckError::NameExists)));

        match &app.modal {
            Some(Modal::Create(form)) => {
                assert!(!form.submitting);
                let error = form.error.as_deref().unwrap();
                assert!(error.contains("already exists"));
            }
            other => panic!("expected create modal, got {:?}", other.is_some()),
        }
    }

    #[tokio::test]
    async fn test_file_mutations_invalidate_contents_family() {
        let (mut app, _temp) = test_app();
        let key = QueryKey::Contents {
            owner: "octocat".to_string(),
            repo: "widget".to_string(),
            path: String::new(),
        };
        app.cache.insert(key.clone(), &Vec::<ContentEntry>::new());

        app.handle_message(AppMessage::FileUploaded {
            owner: "octocat".to_string(),
            repo: "widget".to_string(),
            path: "README.md".to_string(),
            result: Ok(()),
        });

        assert!(
            app.cache
                .get_fresh::<Vec<ContentEntry>>(&key, DEFAULT_TTL)
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_upload_failure_surfaces_in_form_and_console() {
        let (mut app, _temp) = test_app();
        let mut form = UploadForm::new("octocat".to_string(), "widget".to_string(), "");
        form.submitting = true;
        app.modal = Some(Modal::Upload(form));

        app.handle_message(AppMessage::FileUploaded {
            owner: "octocat".to_string(),
            repo: "widget".to_string(),
            path: "big.bin".to_string(),
            result: Err(DeckError::Status {
                status: 422,
                message: "too large".to_string(),
            }),
        });

        match &app.modal {
            Some(Modal::Upload(form)) => {
                assert!(!form.submitting);
                assert!(form.error.is_some());
            }
            _ => panic!("expected upload modal"),
        }
        assert_eq!(app.console.unread_errors, 1);
    }

    #[tokio::test]
    async fn test_failed_read_surfaces_error_state() {
        let (mut app, _temp) = test_app();
        app.handle_message(AppMessage::ReposLoaded {
            page: 1,
            result: Err(DeckError::Unauthorized),
        });

        assert!(app.repos.repos.error().is_some());
        assert!(app.console.unread_errors > 0);
    }

    #[tokio::test]
    async fn test_sign_out_resets_everything() {
        let (mut app, _temp) = test_app();
        app.store.save("ghp_example").unwrap();
        app.screen = Screen::Dashboard;
        app.cache
            .insert(QueryKey::Repos { page: 1 }, &vec![sample_repo("widget")]);
        app.console.log_info("hello");

        app.sign_out();

        assert_eq!(app.screen, Screen::TokenEntry);
        assert!(!app.store.is_authenticated());
        assert!(app.cache.is_empty());
        assert!(app.console.messages.is_empty());
        assert!(app.user.is_none());
    }

    #[tokio::test]
    async fn test_stale_contents_result_dropped() {
        let (mut app, _temp) = test_app();
        // Viewing the repository list, not octocat/widget contents.
        app.handle_message(AppMessage::ContentsLoaded {
            owner: "octocat".to_string(),
            repo: "widget".to_string(),
            path: "src".to_string(),
            result: Ok(Vec::new()),
        });

        // Cached for later, but the visible list is untouched.
        assert!(matches!(
            app.repos.contents.data,
            crate::state::LoadingState::Idle
        ));
        let key = QueryKey::Contents {
            owner: "octocat".to_string(),
            repo: "widget".to_string(),
            path: "src".to_string(),
        };
        assert!(
            app.cache
                .get_fresh::<Vec<ContentEntry>>(&key, DEFAULT_TTL)
                .is_some()
        );
    }
}
