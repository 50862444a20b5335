//! Server configuration.
//!
//! Defaults, overridden by an optional YAML file (`GUESTBOOK_CONFIG`, else
//! `guestbook.yaml` in the working directory), overridden by `LISTEN`.
//!
//! ```yaml
//! server:
//!   listen_addr: "0.0.0.0:8000"
//! storage:
//!   public_dir: public_html
//!   private_dir: private
//!   comments_format: fragments
//!   decoding_keys: private/decodingKeys.json
//! comments_response: html
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "guestbook.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub comments_response: CommentsResponse,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory whose files are preloaded into the static cache.
    pub public_dir: PathBuf,
    /// Directory holding the stores and the page templates.
    pub private_dir: PathBuf,
    pub comments_format: CommentsFormat,
    /// JSON object of escape sequence → replacement; built-in table if unset.
    pub decoding_keys: Option<PathBuf>,
}

/// On-disk layout of the comment store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentsFormat {
    /// `comments.json`, a JSON array rewritten on every post.
    #[default]
    Array,
    /// `comments.fragments`, one `,{...}` appended per post.
    Fragments,
}

/// Body served on `GET /comments`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentsResponse {
    #[default]
    Json,
    Html,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            public_dir: PathBuf::from("public_html"),
            private_dir: PathBuf::from("private"),
            comments_format: CommentsFormat::default(),
            decoding_keys: None,
        }
    }
}

impl Config {
    /// Loads the configuration. Never fails: a missing or broken file is
    /// logged and the defaults are used.
    pub fn load() -> Self {
        let path = std::env::var("GUESTBOOK_CONFIG")
            .map(PathBuf::from)
            .ok()
            .or_else(|| {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            });

        let mut cfg = match path {
            Some(path) => Self::from_file(&path).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring config file");
                Self::default()
            }),
            None => Self::default(),
        };

        if let Ok(listen_addr) = std::env::var("LISTEN") {
            cfg.server.listen_addr = listen_addr;
        }

        cfg
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(raw).context("parsing YAML config")
    }

    pub fn comments_file(&self) -> PathBuf {
        let name = match self.storage.comments_format {
            CommentsFormat::Array => "comments.json",
            CommentsFormat::Fragments => "comments.fragments",
        };
        self.storage.private_dir.join(name)
    }

    pub fn cookies_file(&self) -> PathBuf {
        self.storage.private_dir.join("cookies.json")
    }

    pub fn guest_book_template(&self) -> PathBuf {
        self.storage.private_dir.join("guest_book.html")
    }

    pub fn login_template(&self) -> PathBuf {
        self.storage.private_dir.join("guest_book_login.html")
    }
}
