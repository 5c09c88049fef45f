use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use intake_core::{
    export::{parse_delimited, DEFAULT_EXPORT_PREFIX, NOTHING_TO_EXPORT},
    seed::sample_requests,
    CancelOutcome, Criterion, IntakeSession, RequestFilter,
};
use shared::domain::{RequestId, RequestStatus};
use storage::{open_store, StorageLocation};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = StorageLocation::DEFAULT)]
    storage_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Campus name, or `all`.
    #[arg(long)]
    campus: Option<String>,
    /// Category id or title, or `all`.
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    status: Option<String>,
    /// Case-insensitive text in description, subcategory, name or location.
    #[arg(long)]
    search: Option<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> Result<RequestFilter> {
        Ok(RequestFilter {
            campus: Criterion::parse(self.campus.as_deref())?,
            main_category: Criterion::parse(self.category.as_deref())?,
            status: Criterion::parse(self.status.as_deref())?,
            search: self.search.clone().unwrap_or_default(),
        })
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    SetStatus {
        id: i64,
        status: RequestStatus,
    },
    Cancel {
        id: i64,
    },
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value = ".")]
        out: PathBuf,
        #[arg(long, default_value = DEFAULT_EXPORT_PREFIX)]
        prefix: String,
    },
    Seed,
    /// Reads a CSV export back and reports how many rows it holds.
    ImportCheck {
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();

    if let Command::ImportCheck { file } = &cli.command {
        return import_check(file, &mut stdout).await;
    }

    let store = open_store(&StorageLocation::parse(&cli.storage_url))
        .await
        .with_context(|| format!("failed to open storage '{}'", cli.storage_url))?;
    let mut session = IntakeSession::open(store).await;
    execute(cli.command, &mut session, &mut stdout).await
}

async fn execute(
    command: Command,
    session: &mut IntakeSession,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::List { filter } => {
            let filter = filter.to_filter()?;
            let requests = session.filter(&filter);
            for request in &requests {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    request.id,
                    request.status,
                    request.campus,
                    request.main_category,
                    request.sub_category,
                    request.display_name(),
                    request.description
                )?;
            }
            writeln!(out, "{} request(s)", requests.len())?;
        }
        Command::SetStatus { id, status } => {
            let change = session.set_status(RequestId(id), status).await?;
            writeln!(out, "request {id}: {} -> {}", change.previous, change.current)?;
        }
        Command::Cancel { id } => match session.cancel(RequestId(id)).await? {
            CancelOutcome::Cancelled { previous } => {
                writeln!(out, "request {id}: {previous} -> {}", RequestStatus::Cancelled)?
            }
            CancelOutcome::AlreadyCancelled => {
                writeln!(out, "request {id} was already cancelled")?
            }
        },
        Command::Export {
            filter,
            out: dir,
            prefix,
        } => {
            let filter = filter.to_filter()?;
            let Some(export) = session.export(&filter, &prefix, Utc::now())? else {
                writeln!(out, "{NOTHING_TO_EXPORT}")?;
                return Ok(());
            };
            tokio::fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("failed to create '{}'", dir.display()))?;
            let path = dir.join(&export.file_name);
            tokio::fs::write(&path, export.content.as_bytes())
                .await
                .with_context(|| format!("failed to write '{}'", path.display()))?;
            info!(path = %path.display(), rows = export.row_count, "wrote export");
            writeln!(out, "{} {}", export.summary(), path.display())?;
        }
        Command::Seed => {
            if session.seed_if_empty(sample_requests()).await? {
                writeln!(out, "seeded {} sample request(s)", session.registry().len())?;
            } else {
                writeln!(
                    out,
                    "store already holds {} request(s); nothing seeded",
                    session.registry().len()
                )?;
            }
        }
        Command::ImportCheck { file } => import_check(&file, out).await?,
    }
    Ok(())
}

async fn import_check(file: &std::path::Path, out: &mut impl Write) -> Result<()> {
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read '{}'", file.display()))?;
    let rows = parse_delimited(&text)
        .with_context(|| format!("'{}' is not a request export", file.display()))?;
    writeln!(out, "{}: {} row(s)", file.display(), rows.len())?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
