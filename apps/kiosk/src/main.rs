use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use intake_core::{export::DEFAULT_EXPORT_PREFIX, seed::sample_requests, IntakeSession};
use storage::{open_store, StorageLocation};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod command;
mod kiosk;
mod screen;

use command::parse_command;
use kiosk::{Flow, Kiosk};

#[derive(Parser, Debug)]
struct Args {
    /// JSON path, `sqlite://...` URL or `memory`.
    #[arg(long, default_value = StorageLocation::DEFAULT)]
    storage_url: String,
    /// Start with an empty history instead of the sample requests.
    #[arg(long)]
    no_seed: bool,
    #[arg(long, default_value = DEFAULT_EXPORT_PREFIX)]
    export_prefix: String,
    /// Where `export` writes when no directory is given.
    #[arg(long, default_value = ".")]
    export_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let store = open_store(&StorageLocation::parse(&args.storage_url))
        .await
        .with_context(|| format!("failed to open storage '{}'", args.storage_url))?;
    let mut session = IntakeSession::open(store).await;
    if !args.no_seed {
        session.seed_if_empty(sample_requests()).await?;
    }

    let kiosk = Kiosk::new(session, args.export_prefix, args.export_dir);
    let stdin = BufReader::new(tokio::io::stdin());
    run(kiosk, stdin, &mut std::io::stdout()).await?;
    info!("kiosk closed");
    Ok(())
}

/// Renders, reads a line, dispatches it; stops on `quit` or end of input.
async fn run<R, W>(mut kiosk: Kiosk, input: R, out: &mut W) -> Result<Kiosk>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        screen::render(&kiosk, out)?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_command(&line) {
            Ok(command) => {
                if kiosk.handle(command).await == Flow::Quit {
                    break;
                }
            }
            Err(error) => kiosk.show_error(error.to_string()),
        }
    }
    writeln!(out)?;
    Ok(kiosk)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
