//! ID resolver module
//!
//! Resolves job id prefixes to full ids by walking the workspace's job listing,
//! so users can type a short, unambiguous prefix instead of a full UUID.

use anyhow::{Context, Result, anyhow};
use qjob_client::{Job, JobFilter, Workspace};

use crate::types::IdOrPrefix;

/// Resolve a job ID or prefix to a full id
///
/// If the input is already a full UUID, returns it without a remote call.
/// An id equal to the input (ignoring case) wins over longer ids it prefixes.
///
/// # Errors
/// Returns an error if:
/// - No job matches the prefix
/// - Multiple jobs match the prefix (ambiguous)
/// - The listing fails
pub async fn resolve_job_id(workspace: &Workspace, id_or_prefix: &IdOrPrefix) -> Result<String> {
    if let Some(id) = id_or_prefix.as_full() {
        return Ok(id);
    }

    let jobs = workspace
        .list_jobs(&JobFilter::new())
        .await
        .context("Failed to fetch jobs for ID resolution")?;

    let ids: Vec<&str> = jobs.iter().map(Job::id).collect();
    match_prefix(&ids, &id_or_prefix.as_str())
}

fn match_prefix(ids: &[&str], prefix: &str) -> Result<String> {
    let prefix = prefix.to_lowercase();

    if let Some(exact) = ids.iter().find(|id| id.to_lowercase() == prefix) {
        return Ok(exact.to_string());
    }

    let matches: Vec<&str> = ids
        .iter()
        .copied()
        .filter(|id| id.to_lowercase().starts_with(&prefix))
        .collect();

    match matches.len() {
        0 => Err(anyhow!("No job found with ID starting with '{}'", prefix)),
        1 => Ok(matches[0].to_string()),
        _ => Err(anyhow!(
            "Ambiguous prefix '{}' matches multiple jobs: {}",
            prefix,
            matches.join(", ")
        )),
    }
}
