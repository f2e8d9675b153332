// Modal form state.
// Create/edit/upload forms and typed confirmations for destructive actions.

use crate::github::{CreateRepoRequest, Repository, UpdateRepoRequest};

/// The modal currently covering the dashboard, if any.
#[derive(Debug, Clone)]
pub enum Modal {
    Create(CreateForm),
    Edit(EditForm),
    Upload(UploadForm),
    Confirm(ConfirmState),
}

/// Focusable field in the create-repository form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreateField {
    #[default]
    Name,
    Description,
    Private,
    AutoInit,
}

impl CreateField {
    pub fn next(&self) -> Self {
        match self {
            CreateField::Name => CreateField::Description,
            CreateField::Description => CreateField::Private,
            CreateField::Private => CreateField::AutoInit,
            CreateField::AutoInit => CreateField::Name,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            CreateField::Name => CreateField::AutoInit,
            CreateField::Description => CreateField::Name,
            CreateField::Private => CreateField::Description,
            CreateField::AutoInit => CreateField::Private,
        }
    }
}

/// State for the create-repository form.
#[derive(Debug, Clone, Default)]
pub struct CreateForm {
    pub name: String,
    pub description: String,
    pub private: bool,
    pub auto_init: bool,
    pub focus: CreateField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl CreateForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_char(&mut self, c: char) {
        match self.focus {
            CreateField::Name => self.name.push(c),
            CreateField::Description => self.description.push(c),
            _ => {}
        }
        self.error = None;
    }

    pub fn backspace(&mut self) {
        match self.focus {
            CreateField::Name => {
                self.name.pop();
            }
            CreateField::Description => {
                self.description.pop();
            }
            _ => {}
        }
        self.error = None;
    }

    /// Toggle the focused checkbox (space key).
    pub fn toggle(&mut self) {
        match self.focus {
            CreateField::Private => self.private = !self.private,
            CreateField::AutoInit => self.auto_init = !self.auto_init,
            _ => {}
        }
    }

    /// Validate before submit. Returns the problem for the form to display.
    pub fn validate(&self) -> Result<(), String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Repository name is required".to_string());
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err("Name may only contain letters, digits, '-', '_' and '.'".to_string());
        }
        Ok(())
    }

    pub fn to_request(&self) -> CreateRepoRequest {
        let description = self.description.trim();
        CreateRepoRequest {
            name: self.name.trim().to_string(),
            description: if description.is_empty() {
                None
            } else {
                Some(description.to_string())
            },
            private: self.private,
            auto_init: self.auto_init,
        }
    }
}

/// Focusable field in the edit-metadata form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditField {
    #[default]
    Description,
    Private,
}

impl EditField {
    pub fn next(&self) -> Self {
        match self {
            EditField::Description => EditField::Private,
            EditField::Private => EditField::Description,
        }
    }
}

/// State for the edit-repository-metadata form.
#[derive(Debug, Clone)]
pub struct EditForm {
    pub owner: String,
    pub repo: String,
    pub description: String,
    pub private: bool,
    pub focus: EditField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl EditForm {
    pub fn from_repo(repo: &Repository) -> Self {
        Self {
            owner: repo.owner.login.clone(),
            repo: repo.name.clone(),
            description: repo.description.clone().unwrap_or_default(),
            private: repo.private,
            focus: EditField::default(),
            error: None,
            submitting: false,
        }
    }

    pub fn input_char(&mut self, c: char) {
        if self.focus == EditField::Description {
            self.description.push(c);
        }
        self.error = None;
    }

    pub fn backspace(&mut self) {
        if self.focus == EditField::Description {
            self.description.pop();
        }
        self.error = None;
    }

    pub fn toggle(&mut self) {
        if self.focus == EditField::Private {
            self.private = !self.private;
        }
    }

    pub fn to_request(&self) -> UpdateRepoRequest {
        UpdateRepoRequest {
            name: None,
            description: Some(self.description.trim().to_string()),
            private: Some(self.private),
        }
    }
}

/// Focusable field in the upload form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadField {
    #[default]
    LocalPath,
    RepoPath,
    Message,
}

impl UploadField {
    pub fn next(&self) -> Self {
        match self {
            UploadField::LocalPath => UploadField::RepoPath,
            UploadField::RepoPath => UploadField::Message,
            UploadField::Message => UploadField::LocalPath,
        }
    }
}

/// State for the upload-file form.
#[derive(Debug, Clone)]
pub struct UploadForm {
    pub owner: String,
    pub repo: String,
    /// Path on the local machine to read.
    pub local_path: String,
    /// Destination path within the repository.
    pub repo_path: String,
    /// Commit message.
    pub message: String,
    /// Blob sha when replacing an existing file.
    pub existing_sha: Option<String>,
    pub focus: UploadField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl UploadForm {
    pub fn new(owner: String, repo: String, dir: &str) -> Self {
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{}/", dir)
        };
        Self {
            owner,
            repo,
            local_path: String::new(),
            repo_path: prefix,
            message: String::new(),
            existing_sha: None,
            focus: UploadField::default(),
            error: None,
            submitting: false,
        }
    }

    fn focused_field(&mut self) -> &mut String {
        match self.focus {
            UploadField::LocalPath => &mut self.local_path,
            UploadField::RepoPath => &mut self.repo_path,
            UploadField::Message => &mut self.message,
        }
    }

    pub fn input_char(&mut self, c: char) {
        self.focused_field().push(c);
        self.error = None;
    }

    pub fn backspace(&mut self) {
        self.focused_field().pop();
        self.error = None;
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.local_path.trim().is_empty() {
            return Err("Local file path is required".to_string());
        }
        if self.repo_path.trim().is_empty() || self.repo_path.trim().ends_with('/') {
            return Err("Destination path must name a file".to_string());
        }
        Ok(())
    }

    /// Commit message, defaulted when left blank.
    pub fn commit_message(&self) -> String {
        let message = self.message.trim();
        if message.is_empty() {
            format!("Upload {}", self.repo_path.trim())
        } else {
            message.to_string()
        }
    }
}

/// A destructive action awaiting confirmation.
#[derive(Debug, Clone)]
pub enum ConfirmAction {
    ToggleVisibility {
        owner: String,
        repo: String,
        make_private: bool,
    },
    DeleteRepo {
        owner: String,
        repo: String,
    },
    DeleteFile {
        owner: String,
        repo: String,
        path: String,
        sha: String,
    },
}

/// Confirmation dialog state. Repository deletion additionally requires
/// typing the repository name.
#[derive(Debug, Clone)]
pub struct ConfirmState {
    pub action: ConfirmAction,
    pub typed: String,
    pub error: Option<String>,
    pub submitting: bool,
}

impl ConfirmState {
    pub fn new(action: ConfirmAction) -> Self {
        Self {
            action,
            typed: String::new(),
            error: None,
            submitting: false,
        }
    }

    pub fn title(&self) -> &'static str {
        match &self.action {
            ConfirmAction::ToggleVisibility { .. } => " Change Visibility ",
            ConfirmAction::DeleteRepo { .. } => " Delete Repository ",
            ConfirmAction::DeleteFile { .. } => " Delete File ",
        }
    }

    pub fn prompt(&self) -> String {
        match &self.action {
            ConfirmAction::ToggleVisibility {
                owner,
                repo,
                make_private,
            } => {
                let target = if *make_private { "private" } else { "public" };
                format!("Make {}/{} {}?", owner, repo, target)
            }
            ConfirmAction::DeleteRepo { owner, repo } => format!(
                "Permanently delete {}/{}? Type the repository name to confirm.",
                owner, repo
            ),
            ConfirmAction::DeleteFile { path, .. } => format!("Delete {}?", path),
        }
    }

    /// The name the user must type before Enter is accepted, if any.
    pub fn required_confirmation(&self) -> Option<&str> {
        match &self.action {
            ConfirmAction::DeleteRepo { repo, .. } => Some(repo),
            _ => None,
        }
    }

    /// Whether Enter may proceed.
    pub fn can_confirm(&self) -> bool {
        match self.required_confirmation() {
            Some(required) => self.typed == required,
            None => true,
        }
    }

    pub fn input_char(&mut self, c: char) {
        if self.required_confirmation().is_some() {
            self.typed.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.typed.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_focus_cycles() {
        let mut field = CreateField::Name;
        for _ in 0..4 {
            field = field.next();
        }
        assert_eq!(field, CreateField::Name);
        assert_eq!(CreateField::Name.prev(), CreateField::AutoInit);
    }

    #[test]
    fn test_create_validation() {
        let mut form = CreateForm::new();
        assert!(form.validate().is_err());

        form.name = "my-repo_2.0".to_string();
        assert!(form.validate().is_ok());

        form.name = "has spaces".to_string();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_create_request_omits_blank_description() {
        let mut form = CreateForm::new();
        form.name = " widget ".to_string();
        form.description = "   ".to_string();
        form.private = true;

        let req = form.to_request();
        assert_eq!(req.name, "widget");
        assert!(req.description.is_none());
        assert!(req.private);
    }

    #[test]
    fn test_create_typing_routes_to_focused_field() {
        let mut form = CreateForm::new();
        form.input_char('a');
        form.focus = CreateField::Description;
        form.input_char('b');
        assert_eq!(form.name, "a");
        assert_eq!(form.description, "b");

        // Checkboxes ignore typed characters but toggle on space.
        form.focus = CreateField::Private;
        form.input_char('x');
        assert!(!form.private);
        form.toggle();
        assert!(form.private);
    }

    #[test]
    fn test_delete_repo_requires_typed_name() {
        let mut confirm = ConfirmState::new(ConfirmAction::DeleteRepo {
            owner: "octocat".to_string(),
            repo: "widget".to_string(),
        });
        assert!(!confirm.can_confirm());

        confirm.input_char('w');
        assert!(!confirm.can_confirm());

        for c in "idget".chars() {
            confirm.input_char(c);
        }
        assert!(confirm.can_confirm());

        confirm.input_char('x');
        assert!(!confirm.can_confirm());
        confirm.backspace();
        assert!(confirm.can_confirm());
    }

    #[test]
    fn test_visibility_toggle_confirms_without_typing() {
        let confirm = ConfirmState::new(ConfirmAction::ToggleVisibility {
            owner: "octocat".to_string(),
            repo: "widget".to_string(),
            make_private: true,
        });
        assert!(confirm.can_confirm());
        assert!(confirm.prompt().contains("private"));
    }

    #[test]
    fn test_upload_validation_and_default_message() {
        let mut form = UploadForm::new("octocat".to_string(), "widget".to_string(), "docs");
        assert_eq!(form.repo_path, "docs/");
        assert!(form.validate().is_err());

        form.local_path = "/tmp/readme.md".to_string();
        // Still a directory path, not a file.
        assert!(form.validate().is_err());

        form.repo_path.push_str("readme.md");
        assert!(form.validate().is_ok());
        assert_eq!(form.commit_message(), "Upload docs/readme.md");

        form.message = "docs: add readme".to_string();
        assert_eq!(form.commit_message(), "docs: add readme");
    }
}
