//! Command execution

use crate::render;
use crate::Args;
use kiln_core::Kiln;
use kiln_foundation::{ConfigLoader, Result};
use tracing::{debug, info};

/// Run the command described by `args`.
///
/// Returns `Ok(false)` when a task failed; fatal errors are returned as `Err`.
pub async fn run(args: Args) -> Result<bool> {
    let loader = match &args.config {
        Some(path) => ConfigLoader::with_path(path),
        None => ConfigLoader::new(&std::env::current_dir()?),
    };
    debug!("Loading configuration from {}", loader.path().display());
    let settings = loader.load()?;

    let mut builder = Kiln::builder().settings(settings).verbose(args.verbose);
    if let Some(network) = &args.network {
        builder = builder.network(network);
    }
    let kiln = builder.bootstrap().await?;
    info!("Kiln ready on network {}", kiln.network_name());

    let Some(task) = args.task.as_deref() else {
        render::task_list(kiln.registry());
        return Ok(true);
    };

    let raw = split_params(&args.params);
    let params = kiln.parse_params(task, &raw)?;

    if args.dry_run {
        render::plan(task, &kiln.plan(task)?);
        return Ok(true);
    }

    let results = kiln.run(task, params).await?;
    if args.verbose {
        render::results(&results);
    }

    match results.iter().find(|r| !r.success) {
        Some(failed) => {
            render::task_failure(failed);
            Ok(false)
        }
        None => Ok(true),
    }
}

/// `KEY=VALUE` -> (KEY, Some(VALUE)), `KEY` -> (KEY, None)
fn split_params(raw: &[String]) -> Vec<(String, Option<String>)> {
    raw.iter()
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) => (key.to_string(), Some(value.to_string())),
            None => (entry.clone(), None),
        })
        .collect()
}
