use std::sync::Arc;

use guestbook::http::connection::Connection;
use guestbook::http::request::Request;
use guestbook::http::response::{Response, StatusCode};
use guestbook::router::{BoxFuture, Flow, HandlerResult, Router};
use guestbook::server::App;
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

fn echo<'a>(
    _: &'a (),
    req: &'a mut Request,
    res: &'a mut Response,
) -> BoxFuture<'a, HandlerResult> {
    Box::pin(async move {
        let body = format!("{} {}", req.method, req.path);
        res.send(StatusCode::Ok, body);
        Ok(Flow::Finalized)
    })
}

fn broken<'a>(
    _: &'a (),
    _req: &'a mut Request,
    _res: &'a mut Response,
) -> BoxFuture<'a, HandlerResult> {
    Box::pin(async move { Err(anyhow::anyhow!("disk gone")) })
}

/// Feeds `input` to a connection, lets it run to completion and returns
/// everything it wrote back.
async fn exchange(router: Router<()>, input: &[u8]) -> String {
    let app = Arc::new(App::new(router, ()));
    let (mut client, server) = tokio::io::duplex(64 * 1024);

    client.write_all(input).await.unwrap();
    client.shutdown().await.unwrap();

    let mut conn: Connection<DuplexStream, ()> = Connection::new(server, app);
    conn.run().await.unwrap();
    drop(conn);

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn test_single_request_round_trip() {
    let router = Router::new().get("/hello", echo);

    let out = exchange(
        router,
        b"GET /hello HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert!(out.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(out.contains("Content-Length: 10\r\n"));
    assert!(out.ends_with("\r\n\r\nGET /hello"));
}

#[tokio::test]
async fn test_keep_alive_serves_pipelined_requests() {
    let router = Router::new().use_middleware(echo);

    let out = exchange(
        router,
        b"GET /a HTTP/1.1\r\nHost: x\r\n\r\nPOST /b HTTP/1.1\r\nHost: x\r\nContent-Length: 2\r\n\r\nhi",
    )
    .await;

    assert_eq!(out.matches("HTTP/1.1 200 OK").count(), 2);
    assert!(out.contains("GET /a"));
    assert!(out.ends_with("POST /b"));
}

#[tokio::test]
async fn test_unmatched_request_gets_404() {
    let router = Router::new().get("/hello", echo);

    let out = exchange(router, b"GET /other HTTP/1.1\r\nConnection: close\r\n\r\n").await;

    assert!(out.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(out.ends_with("404: Resource Not Found"));
}

#[tokio::test]
async fn test_malformed_request_gets_400_and_close() {
    let router = Router::new().use_middleware(echo);

    let out = exchange(
        router,
        b"NONSENSE\r\n\r\nGET /never HTTP/1.1\r\n\r\n",
    )
    .await;

    assert!(out.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    assert!(!out.contains("/never"));
}

#[tokio::test]
async fn test_handler_error_drops_connection_without_response() {
    let router = Router::new().use_middleware(broken);

    let out = exchange(router, b"POST /guest_book HTTP/1.1\r\nContent-Length: 0\r\n\r\n").await;

    assert!(out.is_empty());
}
