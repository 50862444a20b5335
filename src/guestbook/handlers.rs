//! Route handlers and middleware of the guest book.

use std::path::Path;

use tracing::{info, warn};

use crate::config::CommentsResponse;
use crate::error::GuestBookError;
use crate::guestbook::GuestBook;
use crate::guestbook::comment::{Comment, render_comments_html};
use crate::guestbook::form::read_args;
use crate::guestbook::session::{self, CLEAR_SESSION_COOKIE};
use crate::guestbook::template::render;
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::router::{BoxFuture, Flow, HandlerResult};

pub const NAME_PLACEHOLDER: &str = "__NAME_HOLDER__";
pub const COMMENTS_PLACEHOLDER: &str = "__COMMENTS__";

const HTML: &str = "text/html; charset=utf-8";

/// Decoded request body, attached by [`read_post_body`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostBody(pub String);

fn post_body(req: &Request) -> String {
    req.extensions
        .get::<PostBody>()
        .map(|body| body.0.clone())
        .unwrap_or_else(|| req.body_text())
}

/// Answers a 404/500 error. Persistence failures are handed back instead.
fn send_error(res: &mut Response, err: GuestBookError) -> HandlerResult {
    match err.status() {
        Some((status, body)) => {
            warn!(error = %err, status = status.as_u16(), "Request failed");
            res.send(status, body);
            Ok(Flow::Finalized)
        }
        None => Err(err.into()),
    }
}

async fn send_page(res: &mut Response, template: &Path, data: &[(&str, &str)]) -> HandlerResult {
    match tokio::fs::read_to_string(template).await {
        Ok(raw) => {
            res.set_header("Content-Type", HTML);
            res.send(StatusCode::Ok, render(&raw, data));
            Ok(Flow::Finalized)
        }
        // Missing templates answer 500, not 404.
        Err(e) => send_error(res, GuestBookError::internal(e)),
    }
}

async fn send_login_page(app: &GuestBook, res: &mut Response) -> HandlerResult {
    send_page(res, &app.templates.login, &[]).await
}

async fn send_comment_page(app: &GuestBook, res: &mut Response, cookie: &str) -> HandlerResult {
    let user_name = session::user_name(cookie).unwrap_or_default();
    let comments = render_comments_html(&app.comments.snapshot());
    send_page(
        res,
        &app.templates.guest_book,
        &[(NAME_PLACEHOLDER, user_name), (COMMENTS_PLACEHOLDER, &comments)],
    )
    .await
}

/// Login page without a known session cookie, comment page with one.
async fn check_cookies(app: &GuestBook, req: &Request, res: &mut Response) -> HandlerResult {
    match req.cookie() {
        Some(cookie) if app.cookies.contains(cookie) => send_comment_page(app, res, cookie).await,
        Some(_) => {
            info!(path = %req.path, "Unknown session cookie, sending login page");
            send_login_page(app, res).await
        }
        None => send_login_page(app, res).await,
    }
}

pub fn load_comments<'a>(
    app: &'a GuestBook,
    _req: &'a mut Request,
    res: &'a mut Response,
) -> BoxFuture<'a, HandlerResult> {
    Box::pin(async move {
        match app.comments.reload().await {
            Ok(()) => Ok(Flow::Continue),
            Err(e) => send_error(res, e),
        }
    })
}

pub fn load_cookies<'a>(
    app: &'a GuestBook,
    _req: &'a mut Request,
    res: &'a mut Response,
) -> BoxFuture<'a, HandlerResult> {
    Box::pin(async move {
        match app.cookies.reload().await {
            Ok(()) => Ok(Flow::Continue),
            Err(e) => send_error(res, e),
        }
    })
}

pub fn log_request<'a>(
    _app: &'a GuestBook,
    req: &'a mut Request,
    _res: &'a mut Response,
) -> BoxFuture<'a, HandlerResult> {
    Box::pin(async move {
        info!(method = %req.method, path = %req.path, "Request");
        Ok(Flow::Continue)
    })
}

pub fn read_post_body<'a>(
    _app: &'a GuestBook,
    req: &'a mut Request,
    _res: &'a mut Response,
) -> BoxFuture<'a, HandlerResult> {
    Box::pin(async move {
        let body = PostBody(req.body_text());
        req.extensions.insert(body);
        Ok(Flow::Continue)
    })
}

/// `POST /guest_book`: stores the comment under the session's name.
pub fn post_comment<'a>(
    app: &'a GuestBook,
    req: &'a mut Request,
    res: &'a mut Response,
) -> BoxFuture<'a, HandlerResult> {
    Box::pin(async move {
        let Some(cookie) = req.cookie() else {
            info!("Comment posted without a session, sending login page");
            return send_login_page(app, res).await;
        };
        let name = session::user_name(cookie).unwrap_or_default();

        let decoded = app.decoding_keys.decode(&post_body(req));
        let args = read_args(&decoded);
        let text = args.get("comment").cloned().unwrap_or_default();

        // Write failures abort the chain; the client gets no response.
        app.comments.add(Comment::new(name, text)).await?;
        info!(user = name, total = app.comments.len(), "Comment saved");

        check_cookies(app, req, res).await
    })
}

/// `GET /guest_book`
pub fn serve_guest_book_page<'a>(
    app: &'a GuestBook,
    req: &'a mut Request,
    res: &'a mut Response,
) -> BoxFuture<'a, HandlerResult> {
    Box::pin(check_cookies(app, req, res))
}

/// `POST /guest_book_home`: the raw body is the user name.
pub fn login<'a>(
    app: &'a GuestBook,
    req: &'a mut Request,
    res: &'a mut Response,
) -> BoxFuture<'a, HandlerResult> {
    Box::pin(async move {
        let cookie = session::session_cookie(&post_body(req));
        res.set_header("Set-Cookie", cookie.as_str());

        if app.cookies.insert(&cookie) {
            if let Err(e) = app.cookies.persist().await {
                warn!(error = %e, "Failed to save cookies");
            }
        }

        send_comment_page(app, res, &cookie).await
    })
}

/// `POST /logout`
pub fn logout<'a>(
    app: &'a GuestBook,
    req: &'a mut Request,
    res: &'a mut Response,
) -> BoxFuture<'a, HandlerResult> {
    Box::pin(async move {
        if let Some(cookie) = req.cookie() {
            app.cookies.remove(cookie);
        }
        if let Err(e) = app.cookies.persist().await {
            warn!(error = %e, "Failed to save cookies");
        }

        res.set_header("Set-Cookie", CLEAR_SESSION_COOKIE);
        send_login_page(app, res).await
    })
}

/// `GET /comments`
pub fn serve_comments<'a>(
    app: &'a GuestBook,
    _req: &'a mut Request,
    res: &'a mut Response,
) -> BoxFuture<'a, HandlerResult> {
    Box::pin(async move {
        let comments = app.comments.snapshot();
        match app.comments_response {
            CommentsResponse::Json => {
                let body = serde_json::to_vec(&comments)?;
                res.set_header("Content-Type", "application/json");
                res.send(StatusCode::Ok, body);
            }
            CommentsResponse::Html => {
                res.set_header("Content-Type", HTML);
                res.send(StatusCode::Ok, render_comments_html(&comments));
            }
        }
        Ok(Flow::Finalized)
    })
}

/// Catch-all: serves from the static cache, else 404.
pub fn serve_file<'a>(
    app: &'a GuestBook,
    req: &'a mut Request,
    res: &'a mut Response,
) -> BoxFuture<'a, HandlerResult> {
    Box::pin(async move {
        match app.static_files.get(&req.path) {
            Some(file) => {
                res.set_header("Content-Type", file.content_type);
                res.send(StatusCode::Ok, &file.content);
                Ok(Flow::Finalized)
            }
            None => send_error(res, GuestBookError::NotFound(req.path.clone())),
        }
    })
}
