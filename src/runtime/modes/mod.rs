//! Mode routing
//!
//! - `serve`: HTTP server with the background reconciler
//! - `reconcile`: one synchronous reconciliation pass
//! - `config generate`: write a sample configuration file

pub mod config;
pub mod reconcile;
pub mod server;

use std::process::ExitCode;

use tracing::error;

use crate::errors::LinkPulseError;

pub use config::generate_config;
pub use reconcile::run_reconcile;
pub use server::run_server;

/// 把模式的运行结果转换为退出码，错误只在这里输出一次
pub fn exit_code(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match colored_message(&e) {
                Some(message) => eprintln!("{}", message),
                None => error!("{:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

/// 业务错误使用彩色格式，其余错误交给日志
fn colored_message(err: &anyhow::Error) -> Option<String> {
    err.downcast_ref::<LinkPulseError>()
        .map(LinkPulseError::format_colored)
}
