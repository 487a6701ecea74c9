use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{recommended_watcher, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;

use confetti_renderer::TEMPLATE_OVERRIDE_DIR;
use confetti_sync::{classify, Classification, SyncConfig, SyncError, SyncOutcome, Synchronizer};

use crate::debounce::{sleep_until_deadline, Debouncer};
use crate::error::{io_err, DaemonError};
use crate::git;
use crate::paths::{canonical_root, is_skipped, relative_trigger_path, DEBOUNCE_WINDOW};

/// Watch loop settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct WatchOptions {
    /// Print the per-file progress lines.
    pub verbose: bool,
    /// Resync the standard set before handling the first change.
    pub standard_on_start: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SyncJob {
    Component { file: String },
    Standard,
    /// A Map template override changed: reload it and rebuild the Map.
    ReloadTemplates,
}

impl SyncJob {
    fn label(&self) -> &str {
        match self {
            SyncJob::Component { file } => file,
            SyncJob::Standard => "standard set",
            SyncJob::ReloadTemplates => "Map template",
        }
    }
}

/// Watch `root` and block the current thread until ctrl-c.
pub fn start_blocking(
    root: &Path,
    config: &SyncConfig,
    options: WatchOptions,
) -> Result<(), DaemonError> {
    init_tracing();
    let root = canonical_root(root);
    let synchronizer = Arc::new(Synchronizer::with_http(&root, config)?);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    runtime.block_on(run(root, synchronizer, options))
}

/// Run the watcher and the sync processor until ctrl-c or a fatal error.
pub async fn run(
    root: PathBuf,
    synchronizer: Arc<Synchronizer>,
    options: WatchOptions,
) -> Result<(), DaemonError> {
    let (sync_tx, sync_rx) = mpsc::channel::<SyncJob>(64);
    let (shutdown_tx, _) = broadcast::channel::<()>(16);

    if options.standard_on_start {
        sync_tx
            .send(SyncJob::Standard)
            .await
            .map_err(|_| DaemonError::ChannelClosed("sync queue"))?;
    }

    let watcher_handle = {
        let shutdown = shutdown_tx.clone();
        let root = root.clone();
        tokio::spawn(async move {
            let result = watcher_task(root, sync_tx, shutdown.subscribe()).await;
            let _ = shutdown.send(());
            result
        })
    };

    let processor_handle = {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move {
            let result =
                sync_processor_task(synchronizer, options.verbose, sync_rx, shutdown.subscribe())
                    .await;
            let _ = shutdown.send(());
            result
        })
    };

    let signal_handle = {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move {
            let mut shutdown_rx = shutdown.subscribe();
            tokio::select! {
                _ = shutdown_rx.recv() => Ok(()),
                signal = tokio::signal::ctrl_c() => {
                    match signal {
                        Ok(()) => {
                            tracing::info!("received ctrl-c, stopping watcher");
                            let _ = shutdown.send(());
                            Ok(())
                        }
                        Err(err) => Err(DaemonError::Task(format!("ctrl-c handler failed: {err}"))),
                    }
                }
            }
        })
    };

    tracing::info!(root = %root.display(), "watching for component changes");

    let (watcher_result, processor_result, signal_result) =
        tokio::join!(watcher_handle, processor_handle, signal_handle);

    handle_join("watcher", watcher_result)?;
    handle_join("sync_processor", processor_result)?;
    handle_join("signal_handler", signal_result)?;
    Ok(())
}

async fn watcher_task(
    root: PathBuf,
    sync_tx: mpsc::Sender<SyncJob>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), DaemonError> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();
    let mut watcher: RecommendedWatcher = recommended_watcher(move |event| {
        let _ = event_tx.send(event);
    })?;
    watcher.watch(&root, RecursiveMode::Recursive)?;

    let mut debouncer = Debouncer::new(DEBOUNCE_WINDOW);

    loop {
        let deadline = debouncer.next_deadline();
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            _ = sleep_until_deadline(deadline) => {
                for (path, job) in debouncer.take_due(Instant::now()) {
                    if matches!(job, SyncJob::Component { .. }) && is_ignored(&root, &path).await {
                        tracing::debug!(file = %job.label(), "ignored by git");
                        continue;
                    }
                    if sync_tx.send(job).await.is_err() {
                        return Err(DaemonError::ChannelClosed("sync queue"));
                    }
                }
            }
            event = event_rx.recv() => {
                let Some(event) = event else { break };
                let event = match event {
                    Ok(event) => event,
                    Err(err) => {
                        tracing::warn!(error = %err, "watcher event error");
                        continue;
                    }
                };
                for path in event.paths {
                    let Some((key, job)) = trigger_for_path(&root, &path) else {
                        continue;
                    };
                    if accepts_event(&job, &event.kind) {
                        debouncer.record(key, job, Instant::now());
                    }
                }
            }
        }
    }

    Ok(())
}

async fn sync_processor_task(
    synchronizer: Arc<Synchronizer>,
    verbose: bool,
    mut sync_rx: mpsc::Receiver<SyncJob>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), DaemonError> {
    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            maybe_job = sync_rx.recv() => {
                let Some(job) = maybe_job else { break };
                let started = Instant::now();
                let label = job.label().to_string();

                let synchronizer = Arc::clone(&synchronizer);
                let result = tokio::task::spawn_blocking(move || {
                    process_job(&synchronizer, &job, verbose)
                })
                .await
                .map_err(|err| DaemonError::Task(format!("sync task join error: {err}")))?;

                // A failed sync leaves the watcher running.
                match result {
                    Ok(written) => tracing::info!(
                        job = %label,
                        written,
                        duration_ms = started.elapsed().as_millis() as u64,
                        "sync completed",
                    ),
                    Err(err) => tracing::error!(job = %label, error = %err, "sync failed"),
                }
            }
        }
    }

    Ok(())
}

/// Run one job, returning the number of files written.
fn process_job(
    synchronizer: &Synchronizer,
    job: &SyncJob,
    verbose: bool,
) -> Result<usize, SyncError> {
    match job {
        SyncJob::Component { file } => {
            match synchronizer.upsert_hidden_component(file, verbose)? {
                SyncOutcome::NotRelevant => Ok(0),
                // Component file plus Map.
                SyncOutcome::Synced { .. } => Ok(2),
            }
        }
        SyncJob::Standard => Ok(synchronizer.save_standard_hidden_files(verbose)?.len()),
        SyncJob::ReloadTemplates => {
            synchronizer.reload_templates()?;
            if !synchronizer.has_components_dir() {
                return Ok(0);
            }
            synchronizer.upsert_hidden_map(verbose)?;
            Ok(1)
        }
    }
}

fn is_relevant_event_kind(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

/// Removing an override falls back to the embedded template, so removals
/// count for templates only.
fn accepts_event(job: &SyncJob, kind: &EventKind) -> bool {
    match job {
        SyncJob::ReloadTemplates => {
            is_relevant_event_kind(kind) || matches!(kind, EventKind::Remove(_))
        }
        SyncJob::Component { .. } | SyncJob::Standard => is_relevant_event_kind(kind),
    }
}

/// Debounce key and job for a changed path, or `None` when the event should
/// not trigger anything.
///
/// All template overrides share one key so an edit touching several of them
/// reloads once.
fn trigger_for_path(root: &Path, path: &Path) -> Option<(PathBuf, SyncJob)> {
    let templates = root.join(TEMPLATE_OVERRIDE_DIR);
    if path.starts_with(&templates) {
        let is_template = path.extension().is_some_and(|ext| ext == "tera");
        return is_template.then_some((templates, SyncJob::ReloadTemplates));
    }
    if is_skipped(root, path) {
        return None;
    }
    let file = relative_trigger_path(root, path)?;
    match classify(&file) {
        Classification::Component { .. } => {
            Some((path.to_path_buf(), SyncJob::Component { file }))
        }
        Classification::NotRelevant => None,
    }
}

async fn is_ignored(root: &Path, path: &Path) -> bool {
    let root = root.to_path_buf();
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || git::is_ignored(&root, &path))
        .await
        .unwrap_or(false)
}

fn handle_join(
    task: &str,
    result: Result<Result<(), DaemonError>, tokio::task::JoinError>,
) -> Result<(), DaemonError> {
    match result {
        Ok(inner) => inner,
        Err(err) => Err(DaemonError::Task(format!("{task} task join failure: {err}"))),
    }
}

pub fn init_tracing() {
    init_tracing_with("info");
}

/// Install the fmt subscriber; `RUST_LOG` overrides `default_directive`.
pub fn init_tracing_with(default_directive: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
