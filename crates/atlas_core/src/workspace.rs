use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::types::Article;

const DIGESTS_DIR: &str = "search-digests";
const ARTICLES_DIR: &str = "json-files";
const PAGES_DIR: &str = "outputs";

/// On-disk layout for the pipeline: digests in, articles and rendered
/// pages out. Directory creation is explicit and idempotent; the entry
/// point calls `ensure_layout` once before doing any work.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn ensure_layout(&self) -> Result<()> {
        for dir in [DIGESTS_DIR, ARTICLES_DIR, PAGES_DIR] {
            fs::create_dir_all(self.root.join(dir))?;
        }
        debug!("workspace layout ready at {}", self.root.display());
        Ok(())
    }

    pub fn digest_path(&self, name: &str) -> PathBuf {
        self.root.join(DIGESTS_DIR).join(name)
    }

    pub fn article_path(&self, name: &str) -> PathBuf {
        self.root.join(ARTICLES_DIR).join(name)
    }

    pub fn page_path(&self, name: &str) -> PathBuf {
        self.root.join(PAGES_DIR).join(name)
    }

    /// Reads a digest by file name. A missing or empty digest is an input
    /// error, caught before any backend call is made.
    pub fn read_digest(&self, name: &str) -> Result<String> {
        let path = self.digest_path(name);
        if !path.is_file() {
            return Err(Error::InputError(format!(
                "digest not found: {}",
                path.display()
            )));
        }
        let text = fs::read_to_string(&path)?;
        if text.trim().is_empty() {
            return Err(Error::InputError(format!(
                "digest is empty: {}",
                path.display()
            )));
        }
        Ok(text)
    }

    /// Writes the article as pretty-printed JSON. Whole-file write,
    /// last writer wins.
    pub fn write_article(&self, name: &str, article: &Article) -> Result<PathBuf> {
        let path = self.article_path(name);
        fs::write(&path, serde_json::to_string_pretty(article)?)?;
        Ok(path)
    }

    pub fn read_article(&self, name: &str) -> Result<Article> {
        let path = self.article_path(name);
        if !path.is_file() {
            return Err(Error::InputError(format!(
                "article not found: {}",
                path.display()
            )));
        }
        Ok(serde_json::from_str(&fs::read_to_string(&path)?)?)
    }

    pub fn write_page(&self, name: &str, html: &str) -> Result<PathBuf> {
        let path = self.page_path(name);
        fs::write(&path, html)?;
        Ok(path)
    }

    pub fn list_digests(&self) -> Result<Vec<String>> {
        self.list_dir(DIGESTS_DIR, "txt")
    }

    pub fn list_articles(&self) -> Result<Vec<String>> {
        self.list_dir(ARTICLES_DIR, "json")
    }

    fn list_dir(&self, dir: &str, extension: &str) -> Result<Vec<String>> {
        let path = self.root.join(dir);
        if !path.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let name = entry.path();
            if name.extension().and_then(|e| e.to_str()) == Some(extension) {
                if let Some(stem) = name.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Turns a topic into a safe artifact file stem: lowercase, whitespace
/// to underscores, everything outside [a-z0-9_-] dropped.
pub fn slugify(topic: &str) -> String {
    topic
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .collect()
}
