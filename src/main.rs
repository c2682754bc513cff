use anyhow::{Context, Result};
use assemblee_harvester::jobs::{self, Job};
use assemblee_harvester::{logging, Config};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "assemblee-harvester")]
#[command(about = "Extract legislative open data into relational tables")]
#[command(version)]
struct Cli {
    /// Domain to extract
    #[arg(value_enum, default_value = "all")]
    job: JobArg,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum JobArg {
    Acteurs,
    Votes,
    All,
}

impl JobArg {
    fn job(self) -> Option<Job> {
        match self {
            JobArg::Acteurs => Some(Job::Acteurs),
            JobArg::Votes => Some(Job::Votes),
            JobArg::All => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    config.verbose |= cli.verbose;
    logging::init(config.verbose);

    tracing::info!("assemblee-harvester v{}", env!("CARGO_PKG_VERSION"));

    let summaries = match cli.job.job() {
        Some(job) => vec![jobs::run_job(&config, job).await?],
        None => jobs::run_all(&config).await?,
    };

    for summary in &summaries {
        tracing::info!(
            domain = %summary.domain,
            documents = summary.documents_seen,
            failed = summary.documents_failed,
            duration_ms = summary.duration_ms,
            "Exported"
        );
    }
    Ok(())
}
