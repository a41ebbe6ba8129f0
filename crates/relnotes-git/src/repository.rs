//! Git repository operations

use std::path::Path;

use git2::Repository;
use tracing::{debug, info, instrument};

use relnotes_core::error::GitError;

/// Result type for git operations
pub type Result<T> = std::result::Result<T, GitError>;

/// Git repository wrapper
pub struct GitRepo {
    pub(crate) repo: Repository,
}

impl GitRepo {
    /// Open a repository at the given path
    #[instrument(fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "opening git repository");
        let repo = Repository::open(path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                GitError::RepositoryNotFound(path.to_path_buf())
            } else {
                GitError::OpenFailed(e.to_string())
            }
        })?;

        Ok(Self { repo })
    }

    /// Discover and open a repository by searching parent directories
    #[instrument(fields(start_path = %start_path.display()))]
    pub fn discover(start_path: &Path) -> Result<Self> {
        info!(start_path = %start_path.display(), "discovering git repository");
        let repo = Repository::discover(start_path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                GitError::NotARepository(start_path.to_path_buf())
            } else {
                GitError::OpenFailed(e.to_string())
            }
        })?;

        debug!(
            workdir = %repo.workdir().unwrap_or_else(|| repo.path()).display(),
            "repository discovered"
        );
        Ok(Self { repo })
    }

    /// Get the HEAD commit
    pub fn head_commit(&self) -> Result<git2::Commit<'_>> {
        let head = self.repo.head()?;
        head.peel_to_commit().map_err(GitError::Git2)
    }

    /// Resolve a tag, branch or revision expression to a commit
    pub fn resolve_commit(&self, reference: &str) -> Result<git2::Commit<'_>> {
        let object = self.repo.revparse_single(reference).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                GitError::UnknownRef(reference.to_string())
            } else {
                GitError::Git2(e)
            }
        })?;
        object.peel_to_commit().map_err(GitError::Git2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, GitRepo) {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        let sig = Signature::now("Test", "test@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
            .unwrap();

        let repo = GitRepo::open(temp.path()).unwrap();
        (temp, repo)
    }

    #[test]
    fn test_discover_repo() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();

        let subdir = temp.path().join("sub").join("dir");
        std::fs::create_dir_all(&subdir).unwrap();

        let repo = GitRepo::discover(&subdir).unwrap();
        // Canonicalize both paths to handle macOS /var -> /private/var symlink
        let workdir = repo.repo.workdir().unwrap().canonicalize().unwrap();
        let temp_path = temp.path().canonicalize().unwrap();
        assert_eq!(workdir, temp_path);
    }

    #[test]
    fn test_not_a_repo() {
        let temp = TempDir::new().unwrap();
        let result = GitRepo::open(temp.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_commit() {
        let (_temp, repo) = init_repo();
        let head = repo.head_commit().unwrap().id();
        assert_eq!(repo.resolve_commit("HEAD").unwrap().id(), head);
    }

    #[test]
    fn test_resolve_unknown_ref() {
        let (_temp, repo) = init_repo();
        let result = repo.resolve_commit("v9.9.9");
        assert!(matches!(result, Err(GitError::UnknownRef(_))));
    }
}
