//! In-memory cache of the public directory.
//!
//! Every regular file directly under the directory is read once at startup
//! and served from memory afterwards.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use bytes::Bytes;
use url::Url;

use crate::http::mime;

const INDEX: &str = "/index.html";

#[derive(Debug, Clone)]
pub struct StaticFile {
    pub content: Bytes,
    pub content_type: &'static str,
}

#[derive(Debug, Default)]
pub struct StaticCache {
    files: HashMap<String, StaticFile>,
}

impl StaticCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(dir: &Path) -> anyhow::Result<Self> {
        let mut cache = Self::new();
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .with_context(|| format!("reading public directory {}", dir.display()))?;

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                tracing::warn!(path = %entry.path().display(), "Skipping non UTF-8 file name");
                continue;
            };
            let content = tokio::fs::read(entry.path())
                .await
                .with_context(|| format!("reading {}", entry.path().display()))?;
            cache.insert(format!("/{name}"), content);
        }

        tracing::info!(files = cache.len(), dir = %dir.display(), "Static files cached");
        Ok(cache)
    }

    /// Adds a file under `key` (an absolute URL path such as `/index.html`).
    pub fn insert(&mut self, key: impl Into<String>, content: impl Into<Bytes>) {
        let key = key.into();
        let content_type = mime::content_type_for_path(&key);
        self.files.insert(
            key,
            StaticFile {
                content: content.into(),
                content_type,
            },
        );
    }

    /// Looks up the file for a raw request target.
    pub fn get(&self, target: &str) -> Option<&StaticFile> {
        let key = resolve(target)?;
        self.files.get(&key)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Cache key for a request target: query and fragment dropped, dot segments
/// collapsed, `/` mapped to `/index.html`.
pub fn resolve(target: &str) -> Option<String> {
    let url = Url::parse("http://localhost/").ok()?.join(target).ok()?;
    match url.path() {
        "/" => Some(INDEX.to_string()),
        path => Some(path.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_resolves_to_index() {
        assert_eq!(resolve("/").as_deref(), Some("/index.html"));
    }

    #[test]
    fn query_and_dot_segments_are_dropped() {
        assert_eq!(resolve("/a.html?x=1").as_deref(), Some("/a.html"));
        assert_eq!(resolve("/../../etc/passwd").as_deref(), Some("/etc/passwd"));
    }

    #[test]
    fn lookup_sets_content_type() {
        let mut cache = StaticCache::new();
        cache.insert("/style.css", b"body {}".to_vec());
        let file = cache.get("/style.css").unwrap();
        assert_eq!(file.content_type, "text/css");
        assert!(cache.get("/missing.css").is_none());
    }
}
