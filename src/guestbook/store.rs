//! File-backed comment and cookie stores.
//!
//! Both stores keep an in-memory copy that is reloaded from disk by
//! middleware on every request and written back on change. The locks only
//! guard the in-memory list; two requests writing at once race on the file
//! and the last writer wins.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tokio::io::AsyncWriteExt;

use crate::config::CommentsFormat;
use crate::error::GuestBookError;
use crate::guestbook::comment::Comment;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Reads `path`, creating it with `initial` when it does not exist yet.
async fn read_or_create(path: &Path, initial: &str) -> Result<String, GuestBookError> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => Ok(raw),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Creating store file");
            tokio::fs::write(path, initial)
                .await
                .map_err(GuestBookError::internal)?;
            Ok(initial.to_string())
        }
        Err(e) => Err(GuestBookError::internal(e)),
    }
}

fn persistence(path: &Path) -> impl FnOnce(std::io::Error) -> GuestBookError + '_ {
    move |source| GuestBookError::Persistence {
        path: path.to_path_buf(),
        source,
    }
}

#[derive(Debug)]
pub struct CommentStore {
    path: PathBuf,
    format: CommentsFormat,
    comments: Mutex<Vec<Comment>>,
}

impl CommentStore {
    pub fn new(path: impl Into<PathBuf>, format: CommentsFormat) -> Self {
        Self {
            path: path.into(),
            format,
            comments: Mutex::new(Vec::new()),
        }
    }

    /// Replaces the in-memory list with the file's contents.
    pub async fn reload(&self) -> Result<(), GuestBookError> {
        let comments = match self.format {
            CommentsFormat::Array => {
                let raw = read_or_create(&self.path, "[]").await?;
                serde_json::from_str(&raw)?
            }
            CommentsFormat::Fragments => {
                let raw = read_or_create(&self.path, "").await?;
                parse_fragments(&raw)?
            }
        };
        *lock(&self.comments) = comments;
        Ok(())
    }

    /// Copy of the current list, oldest first.
    pub fn snapshot(&self) -> Vec<Comment> {
        lock(&self.comments).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.comments).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.comments).is_empty()
    }

    /// Appends `comment` and writes it to disk.
    pub async fn add(&self, comment: Comment) -> Result<(), GuestBookError> {
        match self.format {
            CommentsFormat::Array => {
                let serialized = {
                    let mut comments = lock(&self.comments);
                    comments.push(comment);
                    serde_json::to_vec(&*comments)?
                };
                tokio::fs::write(&self.path, serialized)
                    .await
                    .map_err(persistence(&self.path))
            }
            CommentsFormat::Fragments => {
                let mut fragment = b",".to_vec();
                serde_json::to_writer(&mut fragment, &comment)?;
                lock(&self.comments).push(comment);

                let mut file = tokio::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)
                    .await
                    .map_err(persistence(&self.path))?;
                file.write_all(&fragment)
                    .await
                    .map_err(persistence(&self.path))?;
                file.flush().await.map_err(persistence(&self.path))
            }
        }
    }
}

/// Parses the append-only layout: `,{..},{..}` read back as `[{..},{..}]`.
pub fn parse_fragments(raw: &str) -> Result<Vec<Comment>, GuestBookError> {
    let body = raw.trim();
    let body = body.strip_prefix(',').unwrap_or(body);
    Ok(serde_json::from_str(&format!("[{body}]"))?)
}

/// Raw `Cookie` header strings accepted as logged-in sessions.
#[derive(Debug)]
pub struct CookieStore {
    path: PathBuf,
    cookies: Mutex<Vec<String>>,
}

impl CookieStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cookies: Mutex::new(Vec::new()),
        }
    }

    pub async fn reload(&self) -> Result<(), GuestBookError> {
        let raw = read_or_create(&self.path, "[]").await?;
        let cookies: Vec<String> = serde_json::from_str(&raw)?;
        *lock(&self.cookies) = cookies;
        Ok(())
    }

    pub fn contains(&self, cookie: &str) -> bool {
        lock(&self.cookies).iter().any(|c| c == cookie)
    }

    /// Adds `cookie` unless present. Returns whether it was added.
    pub fn insert(&self, cookie: &str) -> bool {
        let mut cookies = lock(&self.cookies);
        if cookies.iter().any(|c| c == cookie) {
            return false;
        }
        cookies.push(cookie.to_string());
        true
    }

    /// Drops every entry equal to `cookie`.
    pub fn remove(&self, cookie: &str) {
        lock(&self.cookies).retain(|c| c != cookie);
    }

    pub fn snapshot(&self) -> Vec<String> {
        lock(&self.cookies).clone()
    }

    pub async fn persist(&self) -> Result<(), GuestBookError> {
        let serialized = serde_json::to_vec(&*lock(&self.cookies))?;
        tokio::fs::write(&self.path, serialized)
            .await
            .map_err(persistence(&self.path))
    }
}
