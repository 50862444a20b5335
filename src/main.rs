use std::sync::Arc;

use guestbook::config::Config;
use guestbook::guestbook::{GuestBook, build_router};
use guestbook::server::{self, App};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load();
    let state = GuestBook::open(&cfg).await?;
    tracing::info!(
        static_files = state.static_files.len(),
        decoding_keys = state.decoding_keys.len(),
        comments = %cfg.comments_file().display(),
        "Guest book ready"
    );
    let app = Arc::new(App::new(build_router(), state));

    tokio::select! {
        res = server::listener::run(&cfg, app) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
