//! Server mode

use actix_web::{
    App, HttpServer,
    dev::Server,
    middleware::{Compress, DefaultHeaders},
};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::StaticConfig;
use crate::runtime::lifetime::{shutdown, startup};

/// Run the HTTP server
///
/// Signal handling is taken over from actix: on SIGINT/SIGTERM the server
/// stops accepting, lets in-flight requests finish, and only then is the
/// final reconciliation pass run.
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: &StaticConfig) -> Result<()> {
    let startup = startup::prepare_server_startup(config)
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {}", e))?;

    let services = startup.services;
    let cpu_count = config.server.cpu_count.clamp(1, 32);
    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        let services = services.clone();
        App::new()
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .configure(move |cfg| services.configure(cfg))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .workers(cpu_count)
    .disable_signals()
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    // 绑定成功后才启动回写任务，之后的任何退出路径都要经过最后一次回写
    let reconciler = startup
        .core
        .reconciler
        .spawn(config.reconciliation.interval());

    warn!("Starting server at http://{} ({} workers)", bind_address, cpu_count);

    let outcome = serve_until_signal(server).await;
    shutdown::finish_after(outcome, reconciler, config.reconciliation.shutdown_timeout()).await
}

/// 运行直到收到信号（优雅停止）或服务器自行退出
async fn serve_until_signal(server: Server) -> Result<()> {
    let server_handle = server.handle();
    let mut server = std::pin::pin!(server);

    let signalled = tokio::select! {
        res = &mut server => {
            warn!("HTTP server exited without a shutdown signal");
            res.context("HTTP server failed")?;
            false
        }
        _ = shutdown::wait_for_signal() => true,
    };

    if signalled {
        info!("Stopping HTTP server, waiting for in-flight requests...");
        let (_, res) = tokio::join!(server_handle.stop(true), &mut server);
        res.context("HTTP server failed during shutdown")?;
    }

    Ok(())
}
