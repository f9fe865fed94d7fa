//! 计数器回写
//!
//! 每个周期：
//! - 列出缓存中所有计数器
//! - 逐个读取快照并覆盖数据库中的 click_count
//! - 单个 key 失败只跳过该 key，下个周期重试
//!
//! The counter itself is never reset: the durable baseline is overwritten from
//! a snapshot, so a pass is idempotent and an increment racing the snapshot is
//! picked up one cycle later.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, trace, warn};

use crate::cache::CounterCache;
use crate::errors::Result;
use crate::storage::MappingStore;

/// 单次回写的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// 列出的计数器数量
    pub scanned: usize,
    /// 成功写入数据库
    pub flushed: usize,
    /// 读取失败或计数器已消失
    pub skipped: usize,
    /// 写入数据库失败
    pub failed: usize,
}

#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn MappingStore>,
    cache: Arc<dyn CounterCache>,
    /// 防止定时回写与手动回写并发执行
    pass_lock: Arc<Mutex<()>>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn MappingStore>, cache: Arc<dyn CounterCache>) -> Self {
        Self {
            store,
            cache,
            pass_lock: Arc::new(Mutex::new(())),
        }
    }

    /// 执行一次完整回写（阻塞直到完成）
    ///
    /// Fails only when the counter keys cannot be listed; per-key failures are
    /// counted in the report.
    pub async fn run_once(&self) -> Result<ReconcileReport> {
        let _guard = self.pass_lock.lock().await;

        let keys = self.cache.list_counter_keys().await?;
        let mut report = ReconcileReport {
            scanned: keys.len(),
            ..Default::default()
        };

        for key in keys {
            let count = match self.cache.get_clicks(&key).await {
                Ok(Some(count)) => count,
                Ok(None) => {
                    trace!("Counter for '{}' vanished before flush", key);
                    report.skipped += 1;
                    continue;
                }
                Err(e) => {
                    warn!("Reconciler: failed to read counter '{}': {}", key, e);
                    report.skipped += 1;
                    continue;
                }
            };

            match self.store.set_click_count(&key, count).await {
                Ok(()) => {
                    trace!("Reconciler: '{}' -> {}", key, count);
                    report.flushed += 1;
                }
                Err(e) => {
                    warn!("Reconciler: failed to flush '{}': {}", key, e);
                    report.failed += 1;
                }
            }
        }

        if report.scanned > 0 {
            debug!(
                "Reconciler: scanned {}, flushed {}, skipped {}, failed {}",
                report.scanned, report.flushed, report.skipped, report.failed
            );
        }
        Ok(report)
    }

    /// 启动后台定时回写任务
    pub fn spawn(&self, period: Duration) -> ReconcilerHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let reconciler = self.clone();

        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval 的第一次 tick 立即完成，跳过它
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = reconciler.run_once().await {
                            error!("Reconciler: scheduled pass failed: {}", e);
                        }
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            debug!("Reconciler: stop signal received");
                            break;
                        }
                    }
                }
            }
        });

        info!("Reconciler started (interval: {:?})", period);
        ReconcilerHandle {
            reconciler: self.clone(),
            stop_tx,
            task,
        }
    }
}

/// 后台回写任务句柄
pub struct ReconcilerHandle {
    reconciler: Reconciler,
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ReconcilerHandle {
    /// 停止定时任务，等待其退出，然后同步执行最后一次回写
    pub async fn shutdown(self) -> Result<ReconcileReport> {
        let _ = self.stop_tx.send(true);
        if let Err(e) = self.task.await {
            error!("Reconciler task ended abnormally: {}", e);
        }

        info!("Running final reconciliation pass...");
        let report = self.reconciler.run_once().await?;
        info!(
            "Final reconciliation flushed {} of {} counters",
            report.flushed, report.scanned
        );
        Ok(report)
    }
}
