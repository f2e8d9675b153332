// Navigation state management.
// Navigation stack and breadcrumb trail for drilling from the repository
// list into a repository's contents.

/// A node in the navigation breadcrumb trail.
#[derive(Debug, Clone)]
pub struct BreadcrumbNode {
    /// Display label for the breadcrumb.
    pub label: String,
}

/// The current view level in the navigation hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewLevel {
    /// Top level: the user's repositories.
    Repositories,
    /// Contents of a path within a repository. Empty path is the root.
    Contents {
        owner: String,
        repo: String,
        path: String,
    },
}

impl ViewLevel {
    /// Get the display title for this view level.
    pub fn title(&self) -> String {
        match self {
            ViewLevel::Repositories => "Repositories".to_string(),
            ViewLevel::Contents {
                owner, repo, path, ..
            } => {
                if path.is_empty() {
                    format!("{}/{}", owner, repo)
                } else {
                    format!("{}/{} / {}", owner, repo, path)
                }
            }
        }
    }

    /// Create a breadcrumb node for this view level.
    pub fn to_breadcrumb(&self) -> BreadcrumbNode {
        let label = match self {
            ViewLevel::Repositories => "Repositories".to_string(),
            ViewLevel::Contents { repo, path, .. } => {
                if path.is_empty() {
                    repo.clone()
                } else {
                    // Last path segment only; the parents are earlier nodes.
                    path.rsplit('/').next().unwrap_or(path).to_string()
                }
            }
        };
        BreadcrumbNode { label }
    }
}

/// Navigation stack for the repositories tab.
#[derive(Debug, Clone)]
pub struct NavigationStack {
    /// Stack of view levels (bottom = root, top = current).
    stack: Vec<ViewLevel>,
}

impl Default for NavigationStack {
    fn default() -> Self {
        Self {
            stack: vec![ViewLevel::Repositories],
        }
    }
}

impl NavigationStack {
    /// Get the current view level.
    pub fn current(&self) -> &ViewLevel {
        self.stack.last().expect("Stack should never be empty")
    }

    /// Push a new view level onto the stack (drill down).
    pub fn push(&mut self, level: ViewLevel) {
        self.stack.push(level);
    }

    /// Pop the current view level (go back). Returns false if at root.
    pub fn pop(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    /// Check if we can go back (not at root).
    pub fn can_go_back(&self) -> bool {
        self.stack.len() > 1
    }

    /// Get the breadcrumb trail.
    pub fn breadcrumbs(&self) -> Vec<BreadcrumbNode> {
        self.stack.iter().map(ViewLevel::to_breadcrumb).collect()
    }

    /// Reset to the repository list.
    pub fn reset(&mut self) {
        self.stack.truncate(1);
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
