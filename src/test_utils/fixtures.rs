//! Content fixtures and temporary projects.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::constants::DEFAULT_CONFIG_FILE;

/// A content file: path relative to the project root plus its full text.
#[derive(Debug, Clone)]
pub struct ContentFixture {
    pub path: String,
    pub content: String,
}

impl ContentFixture {
    /// A file with arbitrary content.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// A blog post under `content/posts/` with YAML frontmatter.
    pub fn post(slug: &str, title: &str, date: &str) -> Self {
        Self::new(
            format!("content/posts/{slug}.mdx"),
            format!(
                r#"---
title: "{title}"
date: {date}
---

# {title}

Body of {slug}.
"#
            ),
        )
    }

    /// A file whose YAML block is given verbatim.
    pub fn with_yaml(path: impl Into<String>, yaml: &str) -> Self {
        Self::new(path, format!("---\n{yaml}\n---\n\nBody.\n"))
    }

    /// Write the fixture below `root`, creating parent directories.
    pub fn write_to(&self, root: &Path) -> Result<PathBuf> {
        let path = root.join(&self.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, &self.content)
            .with_context(|| format!("Failed to write fixture {}", path.display()))?;
        Ok(path)
    }
}

/// A project root in a temporary directory, removed on drop.
#[derive(Debug)]
pub struct ContentProject {
    dir: TempDir,
}

impl ContentProject {
    /// Create an empty project.
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new().context("Failed to create temp project")?,
        })
    }

    /// The project root.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a fixture into the project.
    pub fn add(&self, fixture: &ContentFixture) -> Result<PathBuf> {
        fixture.write_to(self.path())
    }

    /// Write `frontmatter-collection.toml`.
    pub fn write_config(&self, toml: &str) -> Result<PathBuf> {
        self.add(&ContentFixture::new(DEFAULT_CONFIG_FILE, toml))
    }

    /// Delete a file relative to the root.
    pub fn remove(&self, relative: &str) -> Result<()> {
        let path = self.path().join(relative);
        fs::remove_file(&path).with_context(|| format!("Failed to remove {}", path.display()))
    }

    /// Read a file relative to the root.
    pub fn read(&self, relative: &str) -> Result<String> {
        let path = self.path().join(relative);
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }
}
