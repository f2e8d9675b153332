// Query keys and invalidation families.
// A key identifies one cached read (operation plus parameters); a family
// groups the keys a mutation makes stale.

/// Identifier for a cached read operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// The authenticated user (`GET /user`).
    CurrentUser,
    /// One page of the repository list (`GET /user/repos`).
    Repos { page: u32 },
    /// A single repository.
    Repo { owner: String, repo: String },
    /// A contents listing for a path within a repository.
    Contents {
        owner: String,
        repo: String,
        path: String,
    },
}

/// Resource family affected by a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Family {
    /// The current-user entry (repo counts change with create/delete).
    User,
    /// Every page of the repository list.
    RepoList,
    /// One repository's entry.
    Repo { owner: String, repo: String },
    /// Every contents listing within one repository.
    Contents { owner: String, repo: String },
}

impl QueryKey {
    /// Whether this key belongs to the given family.
    pub fn in_family(&self, family: &Family) -> bool {
        match (self, family) {
            (QueryKey::CurrentUser, Family::User) => true,
            (QueryKey::Repos { .. }, Family::RepoList) => true,
            (QueryKey::Repo { owner, repo }, Family::Repo { owner: o, repo: r }) => {
                owner == o && repo == r
            }
            (QueryKey::Contents { owner, repo, .. }, Family::Contents { owner: o, repo: r }) => {
                owner == o && repo == r
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents_key(path: &str) -> QueryKey {
        QueryKey::Contents {
            owner: "octocat".to_string(),
            repo: "widget".to_string(),
            path: path.to_string(),
        }
    }

    #[test]
    fn test_repo_list_family() {
        assert!(QueryKey::Repos { page: 1 }.in_family(&Family::RepoList));
        assert!(QueryKey::Repos { page: 7 }.in_family(&Family::RepoList));
        assert!(!QueryKey::CurrentUser.in_family(&Family::RepoList));
    }

    #[test]
    fn test_contents_family_scoped_to_repo() {
        let family = Family::Contents {
            owner: "octocat".to_string(),
            repo: "widget".to_string(),
        };
        assert!(contents_key("").in_family(&family));
        assert!(contents_key("src/deep/path").in_family(&family));

        let other = Family::Contents {
            owner: "octocat".to_string(),
            repo: "other".to_string(),
        };
        assert!(!contents_key("src").in_family(&other));
    }

    #[test]
    fn test_repo_family_exact_match() {
        let key = QueryKey::Repo {
            owner: "octocat".to_string(),
            repo: "widget".to_string(),
        };
        assert!(key.in_family(&Family::Repo {
            owner: "octocat".to_string(),
            repo: "widget".to_string(),
        }));
        assert!(!key.in_family(&Family::Repo {
            owner: "octocat".to_string(),
            repo: "gadget".to_string(),
        }));
    }
}
