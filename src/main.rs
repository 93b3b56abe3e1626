use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

use fenju::discovery::{self, DiscoveryConfig};
use fenju::output::{self, DocumentRecord, FileReport, RunStats};
use fenju::stats::{format_stats, text_stats};
use fenju::segmenter::{Segmenter, SegmenterOptions};

#[derive(Parser, Debug)]
#[command(name = "fenju")]
#[command(about = "Sentence and paragraph segmentation for mixed Chinese/English text files")]
#[command(version)]
struct Args {
    /// Root directory to scan for *.txt files
    root_dir: PathBuf,

    /// Overwrite existing segments files
    #[arg(long)]
    overwrite_all: bool,

    /// Abort on first error
    #[arg(long)]
    fail_fast: bool,

    /// Drop degenerate sentences (punctuation-only, digits-only)
    #[arg(long)]
    filter_degenerate: bool,

    /// Suppress the console progress bar
    #[arg(long)]
    no_progress: bool,

    /// Stats output file path
    #[arg(long, default_value = "run_stats.json")]
    stats_out: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: structured JSON logging keeps batch runs observable without
    // interleaving into the progress output
    tracing_subscriber::fmt()
        .with_target(false)
        .json()
        .init();

    let args = Args::parse();
    info!(?args, "starting fenju");

    if !args.root_dir.exists() {
        anyhow::bail!("Root directory does not exist: {}", args.root_dir.display());
    }
    if !args.root_dir.is_dir() {
        anyhow::bail!("Root path is not a directory: {}", args.root_dir.display());
    }

    let segmenter = Segmenter::new(SegmenterOptions {
        filter_degenerate_sentences: args.filter_degenerate,
    })?;

    let discovered = discovery::collect_source_files(
        &args.root_dir,
        DiscoveryConfig {
            fail_fast: args.fail_fast,
        },
    )
    .await?;

    let valid_count = discovered.iter().filter(|f| f.is_valid()).count();
    let invalid_count = discovered.len() - valid_count;

    println!(
        "fenju v{} - found {} text files ({} with issues)",
        env!("CARGO_PKG_VERSION"),
        discovered.len(),
        invalid_count
    );

    let progress = if args.no_progress {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(valid_count as u64)
    };
    progress.set_style(ProgressStyle::with_template(
        "{bar:40.cyan/blue} {pos}/{len} {msg}",
    )?);

    let mut run_stats = RunStats::default();

    for file in &discovered {
        if let Some(ref error) = file.error {
            run_stats.record(FileReport {
                path: file.path.display().to_string(),
                chars_processed: 0,
                sentences_detected: 0,
                paragraph_breaks: 0,
                processing_time_ms: 0,
                status: "failed".to_string(),
                error: Some(error.clone()),
            });
            continue;
        }

        let path_display = file.path.display().to_string();
        progress.set_message(path_display.clone());

        if output::segments_file_exists(&file.path) && !args.overwrite_all {
            info!("skipping {} (segments file exists)", path_display);
            run_stats.record(FileReport {
                path: path_display,
                chars_processed: 0,
                sentences_detected: 0,
                paragraph_breaks: 0,
                processing_time_ms: 0,
                status: "skipped".to_string(),
                error: None,
            });
            progress.inc(1);
            continue;
        }

        let started = Instant::now();
        let content = match tokio::fs::read_to_string(&file.path).await {
            Ok(content) => content,
            Err(e) => {
                let message = format!("Failed to read {}: {}", path_display, e);
                warn!("{}", message);
                if args.fail_fast {
                    anyhow::bail!(message);
                }
                run_stats.record(FileReport {
                    path: path_display,
                    chars_processed: 0,
                    sentences_detected: 0,
                    paragraph_breaks: 0,
                    processing_time_ms: started.elapsed().as_millis() as u64,
                    status: "failed".to_string(),
                    error: Some(message),
                });
                progress.inc(1);
                continue;
            }
        };

        let segmentation = segmenter.split_with_breaks(&content);
        let stats = text_stats(&content, &segmentation.sentences);
        info!("{}: {}", path_display, format_stats(&stats));

        let title = file
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string();
        let record = DocumentRecord {
            title,
            created_at: output::epoch_seconds(),
            segmentation,
            stats,
        };

        match output::write_document_record(&file.path, &record).await {
            Ok(segments_path) => {
                info!("wrote {}", segments_path.display());
                run_stats.record(FileReport {
                    path: path_display,
                    chars_processed: stats.char_count as u64,
                    sentences_detected: stats.sentence_count as u64,
                    paragraph_breaks: record.segmentation.paragraph_breaks.len() as u64,
                    processing_time_ms: started.elapsed().as_millis() as u64,
                    status: "success".to_string(),
                    error: None,
                });
            }
            Err(e) => {
                let message = format!("Failed to write segments for {}: {}", path_display, e);
                warn!("{}", message);
                if args.fail_fast {
                    anyhow::bail!(message);
                }
                run_stats.record(FileReport {
                    path: path_display,
                    chars_processed: 0,
                    sentences_detected: 0,
                    paragraph_breaks: 0,
                    processing_time_ms: started.elapsed().as_millis() as u64,
                    status: "failed".to_string(),
                    error: Some(message),
                });
            }
        }

        progress.inc(1);
    }

    progress.finish_and_clear();

    println!("Segmentation complete:");
    println!("  Processed: {} files", run_stats.files_processed);
    if run_stats.files_skipped > 0 {
        println!("  Skipped (already segmented): {} files", run_stats.files_skipped);
    }
    if run_stats.files_failed > 0 {
        println!("  Failed: {} files", run_stats.files_failed);
    }
    println!("  Total sentences: {}", run_stats.total_sentences);
    println!("  Total characters: {}", run_stats.total_chars);

    output::write_run_stats(&args.stats_out, &run_stats).await?;
    info!("run stats written to {}", args.stats_out.display());

    Ok(())
}
