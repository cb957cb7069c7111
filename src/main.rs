//! docmerge - Merge PDF and Word documents into a single page-numbered PDF.

use clap::Parser;
use std::process;
use std::sync::Arc;

use docmerge::cli::Cli;
use docmerge::config::{Config, OverwriteMode, SortOrder};
use docmerge::document::DocumentList;
use docmerge::error::DocMergeError;
use docmerge::merge::{ChannelProgress, MergePipeline, MergeRequest};
use docmerge::output::{OutputFormatter, ProgressBar};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(0) => {}
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(err.exit_code());
        }
    }
}

/// Main application logic. Returns the process exit code.
async fn run(cli: Cli) -> Result<i32, DocMergeError> {
    let config = cli.to_config()?;
    let formatter = OutputFormatter::from_config(&config);

    if !config.json {
        formatter.section(&format!("{} v{}", docmerge::NAME, docmerge::VERSION));
        formatter.blank_line();
    }

    let mut list = DocumentList::new();
    list.add_all(config.inputs.iter().cloned())?;
    match config.sort {
        SortOrder::AsGiven => {}
        SortOrder::Name => list.sort_by_name(),
        SortOrder::Modified => list.sort_by_modified(),
    }

    formatter.debug(&format!(
        "Probing page counts with {} job(s)",
        config.effective_jobs()
    ));
    list.refresh_page_counts(config.effective_jobs()).await;

    if config.dry_run {
        let plan = list.plan();
        if config.json {
            print_json(&plan)?;
        } else {
            formatter.plan(&plan);
            formatter.blank_line();
            formatter.success("Dry run completed successfully");
            formatter.info(&format!("  Output would be: {}", config.output.display()));
        }
        return Ok(0);
    }

    handle_output_overwrite(&config, &formatter)?;

    formatter.info(&format!("Merging {} document(s)...", list.len()));

    let request = MergeRequest::new(&list, &config.output)
        .with_page_numbers(config.page_numbers)
        .with_start_number(config.start_number);
    let finished = run_with_progress(&config, &formatter, request).await;

    if config.json {
        print_json(&finished)?;
    } else {
        formatter.blank_line();
        formatter.summary(&finished);
        if formatter.is_verbose()
            && let Some(duration) = finished.duration()
        {
            formatter.detail("Started", &format_timestamp(&finished));
            formatter.detail("Wall time", &format!("{}ms", duration.num_milliseconds()));
        }
    }

    Ok(if finished.success {
        0
    } else {
        finished.error_kind.map_or(1, |kind| kind.exit_code())
    })
}

/// Run the merge on a worker while drawing its progress.
async fn run_with_progress(
    config: &Config,
    formatter: &OutputFormatter,
    request: MergeRequest,
) -> MergeRequest {
    let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();
    let pipeline = MergePipeline::from_config(config);

    let mut bar = if formatter.is_quiet() {
        ProgressBar::disabled()
    } else {
        ProgressBar::new()
    };
    bar.set_message("Merging");

    let render = async {
        while let Some(percent) = receiver.recv().await {
            bar.set_percent(percent);
        }
    };

    let (finished, ()) = tokio::join!(
        pipeline.spawn(request, Arc::new(ChannelProgress::new(sender))),
        render
    );

    if finished.success {
        bar.finish();
    } else {
        bar.clear();
    }
    finished
}

/// Handle output file overwrite scenarios.
fn handle_output_overwrite(
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<(), DocMergeError> {
    if !config.output.exists() {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(DocMergeError::output_exists(config.output.clone())),
        OverwriteMode::Prompt => {
            // No one to ask in quiet or JSON mode.
            if formatter.is_quiet() {
                return Err(DocMergeError::output_exists(config.output.clone()));
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                config.output.display()
            ));

            use std::io::{self, Write};
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .map_err(|err| DocMergeError::other(format!("Failed to read input: {err}")))?;

            let response = response.trim().to_lowercase();
            if response == "y" || response == "yes" {
                Ok(())
            } else {
                Err(DocMergeError::Cancelled)
            }
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), DocMergeError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|err| DocMergeError::other(format!("Failed to serialize result: {err}")))?;
    println!("{json}");
    Ok(())
}

fn format_timestamp(request: &MergeRequest) -> String {
    request
        .started_at
        .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}
