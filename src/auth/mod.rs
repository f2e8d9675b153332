// Authentication module.
// Token persistence plus login/logout against the GitHub API.

pub mod token;

pub use token::TokenStore;

use crate::error::Result;
use crate::github::{GitHubClient, User};
use crate::query::QueryCache;

/// Validate a token by fetching the authenticated user. The token is
/// persisted only after the call succeeds; any failure (bad token, missing
/// scope, network) leaves the store untouched.
pub async fn login(store: &TokenStore, token: &str) -> Result<User> {
    let mut client = GitHubClient::new(token)?;
    let user = client.get_current_user().await?;
    store.save(token)?;
    Ok(user)
}

/// Remove the stored token and drop all cached data. After this no
/// previously fetched repository data is reachable.
pub fn logout(store: &TokenStore, cache: &mut QueryCache) -> Result<()> {
    store.delete()?;
    cache.clear();
    Ok(())
}

/// Build a client from the stored token. Fails with a missing-token error,
/// without any network traffic, when no token is stored.
pub fn client_from_store(store: &TokenStore) -> Result<GitHubClient> {
    let token = store.load()?.ok_or(crate::error::DeckError::MissingToken)?;
    GitHubClient::new(&token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeckError;
    use crate::query::QueryKey;
    use tempfile::TempDir;

    #[test]
    fn test_client_from_empty_store_fails_without_network() {
        let temp = TempDir::new().unwrap();
        let store = TokenStore::new(temp.path().join("token"));

        let err = client_from_store(&store).unwrap_err();
        assert!(matches!(err, DeckError::MissingToken));
    }

    #[test]
    fn test_logout_clears_token_and_cache() {
        let temp = TempDir::new().unwrap();
        let store = TokenStore::new(temp.path().join("token"));
        store.save("ghp_example").unwrap();

        let mut cache = QueryCache::new();
        cache.insert(QueryKey::Repos { page: 1 }, &vec!["widget".to_string()]);
        cache.insert(QueryKey::CurrentUser, &"octocat".to_string());

        logout(&store, &mut cache).unwrap();

        assert!(!store.is_authenticated());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_logout_with_no_token_is_a_noop() {
        let temp = TempDir::new().unwrap();
        let store = TokenStore::new(temp.path().join("token"));
        let mut cache = QueryCache::new();

        logout(&store, &mut cache).unwrap();
        assert!(!store.is_authenticated());
    }
}
