//! External processes: the block's build tool and git.
//!
//! Commands never spawn processes directly; they go through [`Toolchain`] so tests
//! can substitute [`fake::FakeToolchain`].

use crate::error::{ElementError, Result};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tracing::debug;

pub trait Toolchain {
    /// Run the build command inside `dir`, streaming its output to the terminal.
    fn build(&self, dir: &Path, command: &[String]) -> Result<()>;

    fn is_repository(&self, dir: &Path) -> bool;

    fn branch_exists(&self, dir: &Path, branch: &str) -> Result<bool>;

    /// Commit the working tree and check out a new branch from it.
    fn create_branch(&self, dir: &Path, branch: &str, message: &str) -> Result<()>;

    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Shells out to the programs on `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemToolchain;

fn git_in(dir: &Path, args: &[&str]) -> Result<Output> {
    debug!("git -C {} {}", dir.display(), args.join(" "));
    Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .map_err(|e| ElementError::Tool(format!("Failed to run git: {}", e)))
}

fn git_checked(dir: &Path, args: &[&str]) -> Result<()> {
    let output = git_in(dir, args)?;
    if !output.status.success() {
        return Err(ElementError::Tool(format!(
            "git {} failed: {}",
            args.first().copied().unwrap_or_default(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(())
}

impl Toolchain for SystemToolchain {
    fn build(&self, dir: &Path, command: &[String]) -> Result<()> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| ElementError::Tool("No build command configured.".to_string()))?;
        debug!("Building with `{}`", command.join(" "));

        let status = Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| ElementError::Tool(format!("Failed to run `{}`: {}", program, e)))?;

        if !status.success() {
            return Err(ElementError::Tool(format!(
                "`{}` exited with {}",
                command.join(" "),
                status
            )));
        }
        Ok(())
    }

    fn is_repository(&self, dir: &Path) -> bool {
        git_in(dir, &["rev-parse", "--is-inside-work-tree"])
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn branch_exists(&self, dir: &Path, branch: &str) -> Result<bool> {
        let reference = format!("refs/heads/{}", branch);
        let output = git_in(dir, &["rev-parse", "--verify", "--quiet", &reference])?;
        Ok(output.status.success())
    }

    fn create_branch(&self, dir: &Path, branch: &str, message: &str) -> Result<()> {
        git_checked(dir, &["add", "-A"])?;
        git_checked(dir, &["commit", "--allow-empty", "-m", message])?;
        git_checked(dir, &["checkout", "-b", branch])
    }

    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        debug!("Cloning {} into {}", url, dest.display());
        let output = Command::new("git")
            .arg("clone")
            .arg(url)
            .arg(dest)
            .output()
            .map_err(|e| ElementError::Tool(format!("Failed to run git: {}", e)))?;

        if !output.status.success() {
            return Err(ElementError::Tool(format!(
                "Could not clone {}: {}",
                url,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

#[cfg(any(test, feature = "test_utils"))]
pub mod fake {
    use super::*;
    use crate::commands::scaffold::TEMPLATE_NAME;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::fs;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ToolCall {
        Build,
        CreateBranch(String),
        Clone(String),
    }

    /// Records calls instead of spawning processes. `clone_repo` writes a minimal
    /// copy of the boilerplate so scaffolding can be exercised on a temp dir.
    #[derive(Default)]
    pub struct FakeToolchain {
        repository: bool,
        fail_build: bool,
        fail_branch: bool,
        branches: RefCell<HashSet<String>>,
        calls: RefCell<Vec<ToolCall>>,
    }

    impl FakeToolchain {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn in_repository(mut self) -> Self {
            self.repository = true;
            self
        }

        pub fn failing_build(mut self) -> Self {
            self.fail_build = true;
            self
        }

        pub fn failing_branch(mut self) -> Self {
            self.fail_branch = true;
            self
        }

        pub fn with_branch(self, branch: &str) -> Self {
            self.branches.borrow_mut().insert(branch.to_string());
            self
        }

        pub fn calls(&self) -> Vec<ToolCall> {
            self.calls.borrow().clone()
        }

        pub fn has_branch(&self, branch: &str) -> bool {
            self.branches.borrow().contains(branch)
        }
    }

    impl Toolchain for FakeToolchain {
        fn build(&self, _dir: &Path, _command: &[String]) -> Result<()> {
            self.calls.borrow_mut().push(ToolCall::Build);
            if self.fail_build {
                return Err(ElementError::Tool("`npm run build` exited with 1".into()));
            }
            Ok(())
        }

        fn is_repository(&self, _dir: &Path) -> bool {
            self.repository
        }

        fn branch_exists(&self, _dir: &Path, branch: &str) -> Result<bool> {
            Ok(self.has_branch(branch))
        }

        fn create_branch(&self, _dir: &Path, branch: &str, _message: &str) -> Result<()> {
            self.calls
                .borrow_mut()
                .push(ToolCall::CreateBranch(branch.to_string()));
            if self.fail_branch {
                return Err(ElementError::Tool("git commit failed".into()));
            }
            self.branches.borrow_mut().insert(branch.to_string());
            Ok(())
        }

        fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
            self.calls.borrow_mut().push(ToolCall::Clone(url.to_string()));
            fs::create_dir_all(dest.join("local"))?;
            fs::create_dir_all(dest.join("docs"))?;
            fs::create_dir_all(dest.join(".git"))?;
            fs::write(
                dest.join("local/index.html"),
                format!("<script>window.{0} = {0};</script>\n", TEMPLATE_NAME),
            )?;
            fs::write(
                dest.join("rollup.config.js"),
                format!("export default {{ output: {{ name: '{}' }} }};\n", TEMPLATE_NAME),
            )?;
            fs::write(dest.join("LICENSE"), "MIT")?;
            fs::write(dest.join("CODE_OF_CONDUCT.md"), "Be kind.")?;
            fs::write(dest.join("docs/README.md"), "# Docs")?;
            Ok(())
        }
    }
}
