//! Job wiring: one source, one extractor and one pipeline per domain.

use std::fmt;
use std::path::PathBuf;
use tracing::info;

use crate::config::Config;
use crate::harvest::{
    ActeursExtractor, BatchPipeline, DirectorySource, PipelineError, RunSummary, VotesExtractor,
};
use crate::traits::Extractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Acteurs,
    Votes,
}

impl Job {
    pub const ALL: [Job; 2] = [Job::Acteurs, Job::Votes];

    fn source_dir(self, config: &Config) -> PathBuf {
        match self {
            Job::Acteurs => config.acteurs_source_dir(),
            Job::Votes => config.votes_source_dir(),
        }
    }

    fn complete_file(self, config: &Config) -> PathBuf {
        let name = match self {
            Job::Acteurs => &config.acteurs_complete_file,
            Job::Votes => &config.votes_complete_file,
        };
        config.output_dir.join(name)
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Job::Acteurs => write!(f, "acteurs"),
            Job::Votes => write!(f, "votes"),
        }
    }
}

/// Runs one job and exports its own state to both sinks.
pub async fn run_job(config: &Config, job: Job) -> Result<RunSummary, PipelineError> {
    match job {
        Job::Acteurs => run_with(config, job, ActeursExtractor::new()).await,
        Job::Votes => run_with(config, job, VotesExtractor::new()).await,
    }
}

/// Runs every job in order, stopping at the first fatal error.
pub async fn run_all(config: &Config) -> Result<Vec<RunSummary>, PipelineError> {
    let mut summaries = Vec::with_capacity(Job::ALL.len());
    for job in Job::ALL {
        summaries.push(run_job(config, job).await?);
    }
    Ok(summaries)
}

async fn run_with<E: Extractor>(
    config: &Config,
    job: Job,
    extractor: E,
) -> Result<RunSummary, PipelineError> {
    let source =
        DirectorySource::new(job.source_dir(config)).with_extension(&config.document_extension);
    let mut pipeline =
        BatchPipeline::new(source, extractor).with_read_concurrency(config.read_concurrency);

    let summary = pipeline.run().await?;
    pipeline
        .export_single_document(&job.complete_file(config))
        .await?;
    pipeline.export_separate_documents(&config.table_dir()).await?;

    info!(job = %job, "Job finished");
    Ok(summary)
}
