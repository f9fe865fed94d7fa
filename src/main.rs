use std::process::ExitCode;

use clap::Parser;

use linkpulse::cli::{Cli, Commands, ConfigCommands};
use linkpulse::config::StaticConfig;
use linkpulse::runtime::modes;
use linkpulse::system::init_logging;

#[actix_web::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();

    // config generate 不需要加载配置和日志
    if let Some(Commands::Config {
        action: ConfigCommands::Generate { output_path },
    }) = &cli.command
    {
        return modes::exit_code(modes::generate_config(output_path.as_deref()));
    }

    let config = StaticConfig::load(cli.config.as_deref());
    let _log_guard = init_logging(&config.logging);

    let result = match cli.command {
        None | Some(Commands::Serve) => modes::run_server(&config).await,
        Some(Commands::Reconcile) => modes::run_reconcile(&config).await,
        Some(Commands::Config { .. }) => Ok(()),
    };

    modes::exit_code(result)
}
