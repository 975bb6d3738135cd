use anyhow::Result;
use clap::Parser;
use sentiscope::{
    app,
    cli::{handle_analyze_command, handle_config_command, handle_normalize_command, Cli, CliCommand},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr so `analyze` and `normalize` output stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(CliCommand::Version) => {
            println!("Sentiscope {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(CliCommand::Analyze(args)) => handle_analyze_command(args).await,
        Some(CliCommand::Normalize(args)) => handle_normalize_command(args),
        Some(CliCommand::Config) => handle_config_command(),
        Some(CliCommand::Serve(args)) => app::run_service(args.port).await,
        None => app::run_service(None).await,
    }
}
