// GitHub API endpoint functions.
// Typed methods for the repository-management surface of the GitHub REST API.

use crate::error::{DeckError, Result};

use super::client::GitHubClient;
use super::content;
use super::types::{
    ContentEntry, ContentUpdate, CreateRepoRequest, DeleteFileRequest, PutFileRequest, Repository,
    UpdateRepoRequest, User,
};

impl GitHubClient {
    /// Get the authenticated user.
    pub async fn get_current_user(&mut self) -> Result<User> {
        let response = self.get("/user").await?;
        let user: User = response.json().await?;
        Ok(user)
    }

    /// List repositories owned by the authenticated user, most recently
    /// updated first.
    pub async fn list_repos(&mut self, page: u32, per_page: u32) -> Result<Vec<Repository>> {
        let params = [
            ("affiliation", "owner"),
            ("sort", "updated"),
            ("direction", "desc"),
            ("page", &page.to_string()),
            ("per_page", &per_page.to_string()),
        ];
        let response = self.get_with_params("/user/repos", &params).await?;
        let repos: Vec<Repository> = response.json().await?;
        Ok(repos)
    }

    /// Get a specific repository.
    pub async fn get_repo(&mut self, owner: &str, repo: &str) -> Result<Repository> {
        let response = self.get(&format!("/repos/{}/{}", owner, repo)).await?;
        let repository: Repository = response.json().await?;
        Ok(repository)
    }

    /// Create a repository for the authenticated user.
    pub async fn create_repo(&mut self, request: &CreateRepoRequest) -> Result<Repository> {
        let response = self.post_json("/user/repos", request).await?;
        let repository: Repository = response.json().await?;
        Ok(repository)
    }

    /// Update repository metadata.
    pub async fn update_repo(
        &mut self,
        owner: &str,
        repo: &str,
        request: &UpdateRepoRequest,
    ) -> Result<Repository> {
        let response = self
            .patch_json(&format!("/repos/{}/{}", owner, repo), request)
            .await?;
        let repository: Repository = response.json().await?;
        Ok(repository)
    }

    /// Flip a repository between public and private.
    pub async fn set_visibility(
        &mut self,
        owner: &str,
        repo: &str,
        private: bool,
    ) -> Result<Repository> {
        let request = UpdateRepoRequest {
            private: Some(private),
            ..Default::default()
        };
        self.update_repo(owner, repo, &request).await
    }

    /// Delete a repository. Irreversible on the GitHub side.
    pub async fn delete_repo(&mut self, owner: &str, repo: &str) -> Result<()> {
        self.delete(&format!("/repos/{}/{}", owner, repo)).await?;
        Ok(())
    }

    /// List the contents of a repository path. An empty path lists the root.
    /// The API returns an array for directories and a single object for
    /// files; both shapes come back as a Vec here.
    pub async fn get_contents(
        &mut self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Vec<ContentEntry>> {
        let response = self
            .get(&format!("/repos/{}/{}/contents/{}", owner, repo, path))
            .await?;
        let value: serde_json::Value = response.json().await?;

        if value.is_array() {
            let entries: Vec<ContentEntry> = serde_json::from_value(value)?;
            Ok(entries)
        } else {
            let entry: ContentEntry = serde_json::from_value(value)?;
            Ok(vec![entry])
        }
    }

    /// Fetch a single file with its base64 content.
    pub async fn get_file(&mut self, owner: &str, repo: &str, path: &str) -> Result<ContentEntry> {
        let response = self
            .get(&format!("/repos/{}/{}/contents/{}", owner, repo, path))
            .await?;
        let entry: ContentEntry = response.json().await?;
        Ok(entry)
    }

    /// Create or replace a file. Pass the current blob sha when replacing;
    /// the API rejects an overwrite without it.
    pub async fn put_file(
        &mut self,
        owner: &str,
        repo: &str,
        path: &str,
        message: &str,
        bytes: &[u8],
        sha: Option<&str>,
    ) -> Result<ContentUpdate> {
        let request = PutFileRequest {
            message: message.to_string(),
            content: content::encode(bytes),
            sha: sha.map(str::to_string),
        };
        let response = self
            .put_json(&format!("/repos/{}/{}/contents/{}", owner, repo, path), &request)
            .await?;
        let update: ContentUpdate = response.json().await?;
        Ok(update)
    }

    /// Delete a file. Requires the blob sha from a contents listing.
    pub async fn delete_file(
        &mut self,
        owner: &str,
        repo: &str,
        path: &str,
        message: &str,
        sha: &str,
    ) -> Result<()> {
        let request = DeleteFileRequest {
            message: message.to_string(),
            sha: sha.to_string(),
        };
        self.delete_json(&format!("/repos/{}/{}/contents/{}", owner, repo, path), &request)
            .await?;
        Ok(())
    }

    /// Decode the base64 body of a fetched file.
    pub fn decode_file(entry: &ContentEntry) -> Result<Vec<u8>> {
        let encoded = entry
            .content
            .as_deref()
            .ok_or_else(|| DeckError::Other(format!("no content for {}", entry.path)))?;
        content::decode(encoded)
    }
}
