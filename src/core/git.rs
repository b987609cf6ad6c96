//! Git-backed committed content.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::refactor::CommittedContent;
use crate::utils::command;

/// Reads files as they were at a fixed revision of a repository.
#[derive(Debug, Clone)]
pub struct GitSnapshot {
    repo: PathBuf,
    revision: String,
}

impl GitSnapshot {
    /// Open a snapshot, failing fast when the repository or revision is unusable.
    pub fn open(repo: impl Into<PathBuf>, revision: impl Into<String>) -> Result<Self> {
        let repo = repo.into();
        let revision = revision.into();

        if !is_git_repo(&repo) {
            return Err(Error::git_command_failed(format!(
                "{} is not inside a git repository",
                repo.display()
            ))
            .with_hint("Set snapshot.repo in pkgshift.json to a directory inside the repository"));
        }

        let commit = format!("{}^{{commit}}", revision);
        command::run_in(
            &repo,
            "git",
            &["rev-parse", "--verify", "--quiet", &commit],
            "git rev-parse",
        )
        .map_err(|_| {
            Error::git_command_failed(format!("Unknown revision '{}'", revision))
                .with_hint("Set snapshot.revision to a commit, branch, or tag")
        })?;

        Ok(Self { repo, revision })
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }

    pub fn repo(&self) -> &Path {
        &self.repo
    }
}

impl CommittedContent for GitSnapshot {
    fn get_committed_content(&self, relative_path: &str) -> Result<Vec<u8>> {
        // `./` anchors the path at `repo`, which may sit below the work tree root.
        let object = format!("{}:./{}", self.revision, relative_path);

        if !command::succeeded_in(&self.repo, "git", &["cat-file", "-e", &object]) {
            return Err(Error::source_not_found(
                relative_path,
                Some(self.revision.clone()),
            ));
        }

        let output = command::output_in(&self.repo, "git", &["show", &object], "git show")?;
        if !output.status.success() {
            return Err(Error::git_command_failed(format!(
                "git show {} failed: {}",
                object,
                command::error_text(&output)
            )));
        }

        Ok(output.stdout)
    }
}

pub(crate) fn is_git_repo(path: &Path) -> bool {
    command::succeeded_in(path, "git", &["rev-parse", "--git-dir"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::fs;
    use tempfile::TempDir;

    fn git(dir: &Path, args: &[&str]) -> bool {
        command::succeeded_in(dir, "git", args)
    }

    /// Repository with one commit, or None when git is unavailable.
    fn committed_repo() -> Option<TempDir> {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        if !git(root, &["init", "-q"]) {
            return None;
        }
        fs::create_dir_all(root.join("src/a")).unwrap();
        fs::write(root.join("src/a/Foo.java"), "package a;\nclass Foo {}\n").unwrap();
        let committed = git(root, &["add", "."])
            && git(
                root,
                &[
                    "-c",
                    "user.name=test",
                    "-c",
                    "user.email=test@example.com",
                    "commit",
                    "-q",
                    "-m",
                    "init",
                ],
            );
        committed.then_some(dir)
    }

    #[test]
    fn reads_committed_bytes_not_working_tree() {
        let Some(dir) = committed_repo() else {
            return;
        };
        fs::write(dir.path().join("src/a/Foo.java"), "mutated\n").unwrap();

        let snapshot = GitSnapshot::open(dir.path(), "HEAD").unwrap();
        let content = snapshot.get_committed_content("src/a/Foo.java").unwrap();
        assert_eq!(content, b"package a;\nclass Foo {}\n");
    }

    #[test]
    fn missing_path_is_not_found() {
        let Some(dir) = committed_repo() else {
            return;
        };
        let snapshot = GitSnapshot::open(dir.path(), "HEAD").unwrap();
        let err = snapshot.get_committed_content("src/a/Nope.java").unwrap_err();
        assert_eq!(err.code, ErrorCode::SourceNotFound);
    }

    #[test]
    fn unknown_revision_fails_fast() {
        let Some(dir) = committed_repo() else {
            return;
        };
        let err = GitSnapshot::open(dir.path(), "no-such-branch").unwrap_err();
        assert_eq!(err.code, ErrorCode::GitCommandFailed);
    }
}
