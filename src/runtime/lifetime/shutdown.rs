use std::time::Duration;

use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::analytics::ReconcilerHandle;

/// 等待 SIGINT / SIGTERM
pub async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

/// 服务器退出后（无论成功与否）先完成最后一次回写，再返回服务器的结果
pub async fn finish_after<T>(
    outcome: anyhow::Result<T>,
    handle: ReconcilerHandle,
    limit: Duration,
) -> anyhow::Result<T> {
    if let Err(e) = &outcome {
        error!("Server stopped with an error, flushing counters before exit: {:#}", e);
    }

    let flushed = finish_reconciliation(handle, limit).await;
    if flushed && outcome.is_ok() {
        info!("Graceful shutdown completed");
    }

    outcome
}

/// 停止定时回写并在超时内完成最后一次回写
///
/// Returns `false` when the final pass failed or timed out.
pub async fn finish_reconciliation(handle: ReconcilerHandle, limit: Duration) -> bool {
    match timeout(limit, handle.shutdown()).await {
        Ok(Ok(report)) => {
            if report.failed > 0 || report.skipped > 0 {
                warn!(
                    "Final reconciliation incomplete: {} failed, {} skipped",
                    report.failed, report.skipped
                );
            }
            true
        }
        Ok(Err(e)) => {
            error!("Final reconciliation failed: {}", e);
            false
        }
        Err(_) => {
            error!(
                "Final reconciliation timed out after {} seconds",
                limit.as_secs()
            );
            false
        }
    }
}
