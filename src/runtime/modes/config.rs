use anyhow::Result;
use colored::Colorize;

use crate::config::StaticConfig;
use crate::errors::LinkPulseError;

const DEFAULT_OUTPUT: &str = "config.example.toml";

/// 生成示例配置文件
pub fn generate_config(output_path: Option<&str>) -> Result<()> {
    let path = output_path.unwrap_or(DEFAULT_OUTPUT);

    StaticConfig::default()
        .save_to_file(path)
        .map_err(|e| LinkPulseError::file_operation(format!("Failed to write {}: {}", path, e)))?;

    println!("{} {}", "Configuration written to".green(), path.bold());
    Ok(())
}
