// GitHub API request and response types.
// Defines structs for serializing requests to and deserializing responses
// from the GitHub REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated user (or a repository owner).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
    pub total_private_repos: Option<u64>,
}

/// Repository visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn label(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

/// GitHub repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner: User,
    pub private: bool,
    pub description: Option<String>,
    pub html_url: String,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub fork: bool,
    pub default_branch: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub pushed_at: Option<DateTime<Utc>>,
}

impl Repository {
    pub fn visibility(&self) -> Visibility {
        if self.private {
            Visibility::Private
        } else {
            Visibility::Public
        }
    }
}

/// Request body for creating a repository.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateRepoRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub private: bool,
    pub auto_init: bool,
}

/// Request body for updating repository metadata. Omitted fields are left
/// unchanged by the API.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateRepoRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
}

/// Entry type in a repository contents listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    File,
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Unknown,
}

/// A file or directory in a repository contents listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    pub sha: String,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "type")]
    pub entry_type: ContentType,
    pub download_url: Option<String>,
    /// Base64-encoded file content; only present when fetching a single file.
    pub content: Option<String>,
    pub encoding: Option<String>,
}

impl ContentEntry {
    pub fn is_dir(&self) -> bool {
        self.entry_type == ContentType::Dir
    }
}

/// Request body for creating or updating a file.
#[derive(Debug, Clone, Serialize)]
pub struct PutFileRequest {
    pub message: String,
    /// Base64-encoded file content.
    pub content: String,
    /// Blob sha of the file being replaced; required when overwriting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

/// Request body for deleting a file.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteFileRequest {
    pub message: String,
    /// Blob sha of the file being deleted.
    pub sha: String,
}

/// Commit info returned by content mutations.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitInfo {
    pub sha: Option<String>,
}

/// Response from a file create/update.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentUpdate {
    pub content: Option<ContentEntry>,
    pub commit: CommitInfo,
}

/// Structured error body returned by the GitHub API on failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<ApiSubError>,
}

/// Sub-error within a GitHub API error body (e.g. field validation errors).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiSubError {
    pub resource: Option<String>,
    pub code: Option<String>,
    pub field: Option<String>,
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Whether any sub-error indicates a duplicate repository name.
    pub fn has_existing_name_error(&self) -> bool {
        self.errors.iter().any(|e| {
            e.field.as_deref() == Some("name")
                && e.message
                    .as_deref()
                    .is_some_and(|m| m.contains("already exists"))
        })
    }
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_deserialize() {
        let json = r#"{
            "id": 42,
            "name": "widget",
            "full_name": "octocat/widget",
            "owner": {"id": 1, "login": "octocat", "name": null, "avatar_url": null},
            "private": true,
            "description": "A widget",
            "html_url": "https://github.com/octocat/widget",
            "language": "Rust",
            "stargazers_count": 7,
            "forks_count": 2,
            "watchers_count": 7,
            "topics": ["tui", "cli"],
            "fork": false,
            "default_branch": "main",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-06-01T12:00:00Z",
            "pushed_at": null
        }"#;

        let repo: Repository = serde_json::from_str(json).unwrap();
        assert_eq!(repo.name, "widget");
        assert_eq!(repo.owner.login, "octocat");
        assert_eq!(repo.visibility(), Visibility::Private);
        assert_eq!(repo.stargazers_count, 7);
        assert_eq!(repo.topics, vec!["tui", "cli"]);
    }

    #[test]
    fn test_repository_missing_counts_default() {
        let json = r#"{
            "id": 1,
            "name": "bare",
            "full_name": "octocat/bare",
            "owner": {"id": 1, "login": "octocat", "name": null, "avatar_url": null},
            "private": false,
            "description": null,
            "html_url": "https://github.com/octocat/bare",
            "language": null,
            "default_branch": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
            "pushed_at": null
        }"#;

        let repo: Repository = serde_json::from_str(json).unwrap();
        assert_eq!(repo.stargazers_count, 0);
        assert!(repo.topics.is_empty());
        assert_eq!(repo.visibility(), Visibility::Public);
    }

    #[test]
    fn test_error_body_duplicate_name() {
        let json = r#"{
            "message": "Repository creation failed.",
            "errors": [{
                "resource": "Repository",
                "code": "custom",
                "field": "name",
                "message": "name already exists on this account"
            }]
        }"#;

        let body: ApiErrorBody = serde_json::from_str(json).unwrap();
        assert!(body.has_existing_name_error());
    }

    #[test]
    fn test_error_body_other_validation() {
        let json = r#"{
            "message": "Validation Failed",
            "errors": [{"resource": "Repository", "code": "invalid", "field": "description"}]
        }"#;

        let body: ApiErrorBody = serde_json::from_str(json).unwrap();
        assert!(!body.has_existing_name_error());
    }

    #[test]
    fn test_content_entry_type() {
        let json = r#"{
            "name": "src",
            "path": "src",
            "sha": "abc123",
            "size": 0,
            "type": "dir",
            "download_url": null,
            "content": null,
            "encoding": null
        }"#;

        let entry: ContentEntry = serde_json::from_str(json).unwrap();
        assert!(entry.is_dir());
    }

    #[test]
    fn test_update_request_omits_unset_fields() {
        let req = UpdateRepoRequest {
            private: Some(true),
            ..Default::default()
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"private":true}"#);
    }
}
