//! Job command handlers
//!
//! Handles all job-related CLI commands: submission, listing, viewing
//! details, cancelling, waiting and fetching results.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::Subcommand;
use colored::*;
use qjob_client::{
    DEFAULT_TIMEOUT, Job, JobDetails, JobFilter, JobStatus, Refreshable, ResultFetchable,
    WaitOptions, Workspace,
};
use regex::Regex;

use crate::config::Config;
use crate::id_resolver::resolve_job_id;
use crate::types::IdOrPrefix;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// List jobs in the workspace
    List {
        /// Regular expression searched in the job name
        #[arg(long)]
        name: Option<Regex>,

        /// Only show jobs with this status
        #[arg(long)]
        status: Option<JobStatus>,

        /// Only show jobs created at or after this time (RFC 3339)
        #[arg(long)]
        created_after: Option<DateTime<Utc>>,
    },
    /// Get job details
    Get {
        /// Job ID or unambiguous prefix
        id: String,
    },
    /// Request cancellation of a job
    Cancel {
        /// Job ID or unambiguous prefix
        id: String,
    },
    /// Block until a job reaches a terminal status
    Wait {
        /// Job ID or unambiguous prefix
        id: String,

        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Upper bound on the delay between polls, in seconds
        #[arg(long, default_value_t = 30.0)]
        max_poll_wait: f64,

        /// Do not print progress dots
        #[arg(short, long)]
        quiet: bool,
    },
    /// Wait for a job and print its decoded results
    Results {
        /// Job ID or unambiguous prefix
        id: String,

        /// Give up waiting after this many seconds
        #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
        timeout: u64,
    },
    /// Submit a job described by a JSON file
    Submit {
        /// Path to a job details document (camelCase fields)
        details: PathBuf,
    },
}

/// Handle job commands
///
/// Routes job subcommands to their respective handlers.
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    let workspace = config.connect()?;

    match command {
        JobCommands::List {
            name,
            status,
            created_after,
        } => {
            let mut filter = JobFilter::new();
            filter.name_match = name;
            filter.status = status;
            filter.created_after = created_after;
            list_jobs(&workspace, &filter).await
        }
        JobCommands::Get { id } => get_job(&workspace, &id).await,
        JobCommands::Cancel { id } => cancel_job(&workspace, &id).await,
        JobCommands::Wait {
            id,
            timeout,
            max_poll_wait,
            quiet,
        } => {
            if !max_poll_wait.is_finite() || max_poll_wait <= 0.0 {
                bail!("--max-poll-wait must be a positive number of seconds");
            }
            let mut options =
                WaitOptions::new().with_max_poll_wait(Duration::from_secs_f64(max_poll_wait));
            if let Some(secs) = timeout {
                options = options.with_timeout(Duration::from_secs(secs));
            }
            if !quiet {
                options = options.with_progress(|_| {
                    eprint!(".");
                    let _ = std::io::stderr().flush();
                });
            }
            wait_job(&workspace, &id, &options).await
        }
        JobCommands::Results { id, timeout } => {
            job_results(&workspace, &id, Duration::from_secs(timeout)).await
        }
        JobCommands::Submit { details } => submit_job(&workspace, &details).await,
    }
}

async fn lookup(workspace: &Workspace, id: &str) -> Result<Job> {
    let id_or_prefix = IdOrPrefix::parse(id);
    let job_id = resolve_job_id(workspace, &id_or_prefix).await?;

    workspace
        .get_job(&job_id)
        .await
        .with_context(|| format!("Failed to fetch job {}", job_id))
}

/// List jobs matching the filter
async fn list_jobs(workspace: &Workspace, filter: &JobFilter) -> Result<()> {
    let jobs = workspace.list_jobs(filter).await?;

    if jobs.is_empty() {
        println!("{}", "No jobs found.".yellow());
    } else {
        println!("{}", format!("Found {} job(s):", jobs.len()).bold());
        println!();
        for job in jobs {
            print_job_summary(job.details());
        }
    }

    Ok(())
}

/// Get and display a single job
async fn get_job(workspace: &Workspace, id: &str) -> Result<()> {
    let job = lookup(workspace, id).await?;
    print_job_details(job.details());
    Ok(())
}

async fn cancel_job(workspace: &Workspace, id: &str) -> Result<()> {
    let job = lookup(workspace, id).await?;
    let job = workspace.cancel_job(&job).await?;

    println!(
        "{} Cancellation requested for job {}",
        "✓".green(),
        job.id().cyan()
    );
    print_job_details(job.details());
    Ok(())
}

async fn wait_job(workspace: &Workspace, id: &str, options: &WaitOptions) -> Result<()> {
    let mut job = lookup(workspace, id).await?;
    let outcome = job.wait_until_completed(options).await;
    eprintln!();
    outcome?;

    print_job_details(job.details());
    Ok(())
}

async fn job_results(workspace: &Workspace, id: &str, timeout: Duration) -> Result<()> {
    let mut job = lookup(workspace, id).await?;
    let results = job.get_results(Some(timeout)).await?;

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

async fn submit_job(workspace: &Workspace, path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut details: JobDetails = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid job details in {}", path.display()))?;

    if details.id.is_empty() {
        details.id = Job::create_job_id();
    }

    let mut job = Job::new(workspace.clone(), details);
    job.submit().await?;

    println!("{} Submitted job {}", "✓".green(), job.id().cyan());
    print_job_summary(job.details());
    Ok(())
}

/// Print a one-entry job summary
fn print_job_summary(details: &JobDetails) {
    println!("  {} Job {}", "▸".cyan(), details.id.dimmed());
    println!("    Name:     {}", details.name);
    println!("    Target:   {}", details.target.dimmed());
    println!("    Status:   {}", colorize_status(details.status));
    if let Some(created) = details.creation_time {
        println!(
            "    Created:  {}",
            created.format("%Y-%m-%d %H:%M:%S").to_string().dimmed()
        );
    }
    println!();
}

/// Print detailed job information
fn print_job_details(details: &JobDetails) {
    println!("{}", "Job Details:".bold());
    println!("  ID:          {}", details.id.cyan());
    println!("  Name:        {}", details.name);
    println!("  Provider:    {}", details.provider_id);
    println!("  Target:      {}", details.target);
    println!("  Status:      {}", colorize_status(details.status));

    if let Some(created) = details.creation_time {
        println!("  Created:     {}", created.format("%Y-%m-%d %H:%M:%S"));
    }

    if let Some(started) = details.begin_execution_time {
        println!("  Started:     {}", started.format("%Y-%m-%d %H:%M:%S"));
    }

    if let Some(ended) = details.end_execution_time {
        println!("  Ended:       {}", ended.format("%Y-%m-%d %H:%M:%S"));

        if let Some(started) = details.begin_execution_time {
            let seconds = ended.signed_duration_since(started).num_seconds();
            println!("  Duration:    {}s", seconds);
        }
    }

    if let Some(cancelled) = details.cancellation_time {
        println!("  Cancelled:   {}", cancelled.format("%Y-%m-%d %H:%M:%S"));
    }

    if let Some(uri) = &details.output_data_uri {
        println!("  Output:      {}", uri.dimmed());
    }

    if !details.input_params.is_empty() {
        println!("\n{}", "Parameters:".bold());
        for (key, value) in &details.input_params {
            println!("  {} = {}", key.cyan(), value);
        }
    }

    if let Some(error) = &details.error_data {
        println!("\n{}", "Error:".bold());
        println!("{}", error.to_string().red());
    }
}

/// Colorize job status for display
fn colorize_status(status: Option<JobStatus>) -> ColoredString {
    match status {
        None => "Unknown".dimmed(),
        Some(status) => {
            let status_str = status.as_str();
            match status {
                JobStatus::Waiting => status_str.yellow(),
                JobStatus::Executing => status_str.cyan(),
                JobStatus::Succeeded => status_str.green(),
                JobStatus::Failed => status_str.red(),
                JobStatus::Cancelled | JobStatus::Unknown => status_str.dimmed(),
            }
        }
    }
}
