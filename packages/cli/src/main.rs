mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{bench, init, render, BenchArgs, InitArgs, RenderArgs};
use config::Config;
use tokio::task::LocalSet;
use tracing_subscriber::EnvFilter;

/// Tessera CLI - render component pages and benchmark the engine
#[derive(Parser, Debug)]
#[command(name = "tessera")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default tessera.config.json
    Init(InitArgs),

    /// Render a page from a descriptor file to HTML
    Render(RenderArgs),

    /// Time components against raw document calls
    Bench(BenchArgs),
}

fn init_tracing(config: &Config) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Command, cwd: &str, config: &Config) -> anyhow::Result<()> {
    match command {
        Command::Init(args) => init(args, cwd),
        Command::Render(args) => render(args, cwd, config).await,
        Command::Bench(args) => bench(args, config),
    }
}

fn main() {
    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            let config = Config::load(&cwd)?;
            init_tracing(&config);

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            // Widgets hold `Rc` handles, so everything runs on this thread.
            LocalSet::new().block_on(&runtime, run(cli.command, &cwd, &config))
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
