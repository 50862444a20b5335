//! The guest book application.
//!
//! [`GuestBook`] owns every piece of shared state (stores, static cache,
//! decoding table, template paths) and is handed to each handler by the
//! router. [`build_router`] registers the middleware chain and routes in
//! dispatch order.

pub mod comment;
pub mod form;
pub mod handlers;
pub mod session;
pub mod static_files;
pub mod store;
pub mod template;

use std::path::PathBuf;

use anyhow::Context;

use crate::config::{CommentsResponse, Config};
use crate::router::Router;

use form::DecodingKeys;
use handlers::*;
use static_files::StaticCache;
use store::{CommentStore, CookieStore};

#[derive(Debug, Clone)]
pub struct Templates {
    /// Comment page, with `__NAME_HOLDER__` and `__COMMENTS__` placeholders.
    pub guest_book: PathBuf,
    pub login: PathBuf,
}

#[derive(Debug)]
pub struct GuestBook {
    pub comments: CommentStore,
    pub cookies: CookieStore,
    pub static_files: StaticCache,
    pub decoding_keys: DecodingKeys,
    pub templates: Templates,
    pub comments_response: CommentsResponse,
}

impl GuestBook {
    /// Prepares the private directory and preloads the public one.
    pub async fn open(cfg: &Config) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&cfg.storage.private_dir)
            .await
            .with_context(|| format!("creating {}", cfg.storage.private_dir.display()))?;

        let static_files = StaticCache::load(&cfg.storage.public_dir).await?;

        let decoding_keys = match &cfg.storage.decoding_keys {
            Some(path) => DecodingKeys::from_file(path).await?,
            None => DecodingKeys::default(),
        };

        Ok(Self {
            comments: CommentStore::new(cfg.comments_file(), cfg.storage.comments_format),
            cookies: CookieStore::new(cfg.cookies_file()),
            static_files,
            decoding_keys,
            templates: Templates {
                guest_book: cfg.guest_book_template(),
                login: cfg.login_template(),
            },
            comments_response: cfg.comments_response,
        })
    }
}

/// The guest book's routing table.
pub fn build_router() -> Router<GuestBook> {
    Router::<GuestBook>::new()
        .use_middleware(load_comments)
        .use_middleware(load_cookies)
        .use_middleware(log_request)
        .use_middleware(read_post_body)
        .post("/guest_book", post_comment)
        .get("/guest_book", serve_guest_book_page)
        .post("/guest_book_home", login)
        .post("/logout", logout)
        .get("/comments", serve_comments)
        .use_middleware(serve_file)
}
