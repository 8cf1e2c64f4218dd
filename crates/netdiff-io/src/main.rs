use clap::Parser;
use netdiff_io::cli::{run_spectrum_command, run_sweep_command, Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("netdiff=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Spectrum { topology, n, seed }) => {
            run_spectrum_command(topology, n, seed).await?;
        }
        None => {
            run_sweep_command(cli.sweep).await?;
        }
    }

    Ok(())
}
