use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::StaticConfig;
use crate::runtime::lifetime::startup;

/// 执行一次回写后退出
pub async fn run_reconcile(config: &StaticConfig) -> Result<()> {
    let core = startup::prepare_core(config).await?;

    let report = core
        .reconciler
        .run_once()
        .await
        .context("Reconciliation pass failed")?;

    println!(
        "{} scanned {}, flushed {}, skipped {}, failed {}",
        "Reconciliation finished:".green().bold(),
        report.scanned,
        report.flushed,
        report.skipped,
        report.failed
    );

    if report.failed > 0 {
        anyhow::bail!("{} counters could not be written", report.failed);
    }
    Ok(())
}
