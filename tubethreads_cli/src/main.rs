use clap::Parser;
use owo_colors::OwoColorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use commands::*;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let default_filter = match cli.verbose {
        0 => "tubethreads_cli=info,tubethreads_core=info",
        1 => "tubethreads_cli=debug,tubethreads_core=debug",
        _ => "tubethreads_cli=trace,tubethreads_core=trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match &cli.command {
        Commands::Title { url } => title::run(&cli, url).await,
        Commands::Comments {
            url,
            output_dir,
            concurrency,
            fail_fast,
            preview,
        } => {
            let args = comments::CommentsArgs {
                url: url.clone(),
                output_dir: output_dir.clone(),
                concurrency: *concurrency,
                fail_fast: *fail_fast,
                preview: *preview,
            };
            comments::run(&cli, args).await
        }
        Commands::Channel { id } => channel::run(&cli, id).await,
        Commands::Config { action } => config::run(&cli, action.clone()).await,
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(1);
    }
}
