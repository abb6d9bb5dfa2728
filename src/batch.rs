use anyhow::Context;
use crossbeam_utils::atomic::AtomicCell;
use geojson_simplify::io::{is_geojson_path, read_geojson, write_geojson};
use geojson_simplify::{simplify_collection_with_summary, BatchConfig, SimplifySummary};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{thread, time};
use tracing::{debug, error, info};
use walkdir::WalkDir;

// how deep below the input directory files are picked up
const MAX_DEPTH: usize = 3;

struct FileResult {
  path: PathBuf,
  summary: SimplifySummary,
}

#[derive(Debug, Default)]
pub struct BatchReport {
  pub files: usize,
  pub failed: usize,
  pub summary: SimplifySummary,
}

fn simplify_file(
  path: &Path,
  input: &Path,
  output: &Path,
  config: &BatchConfig,
) -> anyhow::Result<FileResult> {
  let relative = path.strip_prefix(input)?;
  let tolerance = config.tolerance_for(relative);
  let out_path = output.join(relative);
  if let Some(parent) = out_path.parent() {
    std::fs::create_dir_all(parent)?;
  }

  let collection = read_geojson(path)?;
  let (simplified, summary) = simplify_collection_with_summary(&collection, tolerance);
  write_geojson(&out_path, &simplified)?;

  debug!(
    "{} -> {} at tolerance {}",
    path.display(),
    out_path.display(),
    tolerance
  );
  Ok(FileResult {
    path: relative.to_path_buf(),
    summary,
  })
}

fn initialize_workers(
  input: &Path,
  output: &Path,
  config: Arc<BatchConfig>,
  failed: Arc<AtomicCell<usize>>,
  process_queue_rx: crossbeam_channel::Receiver<PathBuf>,
  result_queue_tx: crossbeam_channel::Sender<FileResult>,
) -> Vec<thread::JoinHandle<()>> {
  let max_workers = std::cmp::max(num_cpus::get().saturating_sub(2), 2);
  info!("Spawning {} workers.", max_workers);
  let mut handles = Vec::with_capacity(max_workers);

  for worker_id in 0..max_workers {
    let thread_input = input.to_path_buf();
    let thread_output = output.to_path_buf();
    let thread_config = Arc::clone(&config);
    let thread_failed = Arc::clone(&failed);
    let thread_process_queue_rx = process_queue_rx.clone();
    let thread_result_queue_tx = result_queue_tx.clone();
    handles.push(thread::spawn(move || {
      while let Ok(path) = thread_process_queue_rx.recv() {
        match simplify_file(&path, &thread_input, &thread_output, &thread_config) {
          Ok(result) => {
            // the receiver outlives every worker
            let _ = thread_result_queue_tx.send(result);
          }
          Err(e) => {
            error!("Failed to simplify {}: {:#}", path.display(), e);
            thread_failed.fetch_add(1);
          }
        }
      }
      debug!("Worker {} finished.", worker_id);
    }));
  }
  handles
}

pub fn batch(config: BatchConfig, input: PathBuf, output: PathBuf) -> anyhow::Result<BatchReport> {
  // written files would be picked up again by the walk
  let input_root = input
    .canonicalize()
    .with_context(|| format!("failed to resolve {}", input.display()))?;
  let output_root = output
    .canonicalize()
    .with_context(|| format!("failed to resolve {}", output.display()))?;
  if output_root.starts_with(&input_root) {
    anyhow::bail!(
      "Output directory {} is inside input directory {}",
      output.display(),
      input.display()
    );
  }

  info!(
    "Simplifying files from {} into {} (tolerance {}, {} overrides)",
    input.display(),
    output.display(),
    config.tolerance,
    config.overrides.len()
  );
  let started = time::Instant::now();

  let failed = Arc::new(AtomicCell::new(0usize));
  let (process_queue_tx, process_queue_rx) = crossbeam_channel::unbounded::<PathBuf>();
  let (result_queue_tx, result_queue_rx) = crossbeam_channel::unbounded::<FileResult>();
  let handles = initialize_workers(
    &input,
    &output,
    Arc::new(config),
    Arc::clone(&failed),
    process_queue_rx,
    result_queue_tx,
  );

  let files = WalkDir::new(&input).min_depth(1).max_depth(MAX_DEPTH);
  for entry in files {
    let entry = entry?;
    if entry.file_type().is_file() && is_geojson_path(entry.path()) {
      process_queue_tx.send(entry.path().to_path_buf())?;
    }
  }
  drop(process_queue_tx);

  let mut report = BatchReport::default();
  for result in result_queue_rx.iter() {
    report.files += 1;
    report.summary.merge(&result.summary);
    info!(
      "[{}] {} features, {} -> {} points",
      result.path.display(),
      result.summary.features,
      result.summary.points_before,
      result.summary.points_after
    );
  }

  for handle in handles {
    if handle.join().is_err() {
      anyhow::bail!("a worker thread panicked");
    }
  }
  report.failed = failed.load();

  info!(
    "Done: {} files in {}ms, {} -> {} points, {} failed",
    report.files,
    started.elapsed().as_millis(),
    report.summary.points_before,
    report.summary.points_after,
    report.failed
  );
  Ok(report)
}
