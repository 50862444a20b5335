use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::server::App;

pub async fn run<S>(cfg: &Config, app: Arc<App<S>>) -> anyhow::Result<()>
where
    S: Send + Sync + 'static,
{
    let listener = TcpListener::bind(&cfg.server.listen_addr).await?;
    info!("Listening on {}", cfg.server.listen_addr);

    serve(listener, app).await
}

/// Accepts connections on an already bound listener.
pub async fn serve<S>(listener: TcpListener, app: Arc<App<S>>) -> anyhow::Result<()>
where
    S: Send + Sync + 'static,
{
    loop {
        let (socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        let app = Arc::clone(&app);
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, app);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
