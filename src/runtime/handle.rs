use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, broadcast, mpsc, oneshot};
use tracing::debug;

use crate::{
    config::ExportConfig,
    contact::{ContactRecord, SimContact},
    core::{
        cancel::CancelToken,
        capacity::{SimSpace, read_sim_space},
        export::{ExportReport, export_contacts},
        scan::{ScanLimits, ScanOutcome, ScanTarget, scan_source},
    },
    error::ExportError,
    sim::SimStorage,
    source::ContactSource,
    types::ContactId,
};

use super::{
    events::ExportEvent,
    wake::{WakeGuard, WakeLock},
};

/// Failure surfaced through [`ExportHandle`].
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The pipeline ended early.
    #[error(transparent)]
    Export(#[from] ExportError),
    /// The runtime loop is gone.
    #[error("export runtime channel closed")]
    ChannelClosed,
    /// A blocking worker panicked or was aborted.
    #[error("worker join error: {0}")]
    Join(String),
}

/// Snapshot and buckets from one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// SIM space read before scanning.
    pub space: SimSpace,
    /// Scan buckets.
    pub outcome: ScanOutcome,
}

type SharedSource = Arc<Mutex<Box<dyn ContactSource>>>;
type SharedStorage = Arc<Mutex<Box<dyn SimStorage>>>;

/// Cloneable handle to the export runtime.
///
/// Commands run one at a time, so the scan and export workers never
/// overlap. Cancellation bypasses the queue: each worker polls its own
/// token, which is cleared when its command is enqueued.
#[derive(Clone)]
pub struct ExportHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<ExportEvent>,
    scan_cancel: CancelToken,
    export_cancel: CancelToken,
}

enum Command {
    LoadContact {
        id: ContactId,
        resp: oneshot::Sender<Result<Option<ContactRecord>, RuntimeError>>,
    },
    Scan {
        target: ScanTarget,
        resp: oneshot::Sender<Result<ScanReport, RuntimeError>>,
    },
    Export {
        accepted: Vec<SimContact>,
        to_delete: usize,
        resp: oneshot::Sender<Result<ExportReport, RuntimeError>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

struct Workers {
    source: SharedSource,
    storage: SharedStorage,
    wake_lock: Arc<dyn WakeLock>,
    events_tx: broadcast::Sender<ExportEvent>,
    scan_cancel: CancelToken,
    export_cancel: CancelToken,
    config: ExportConfig,
}

/// Starts the runtime loop on the current tokio runtime.
pub fn spawn_exporter(
    source: Box<dyn ContactSource>,
    storage: Box<dyn SimStorage>,
    wake_lock: Arc<dyn WakeLock>,
    config: ExportConfig,
) -> ExportHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<ExportEvent>(config.event_capacity.max(1));
    let scan_cancel = CancelToken::new();
    let export_cancel = CancelToken::new();

    let workers = Workers {
        source: Arc::new(Mutex::new(source)),
        storage: Arc::new(Mutex::new(storage)),
        wake_lock,
        events_tx: events_tx.clone(),
        scan_cancel: scan_cancel.clone(),
        export_cancel: export_cancel.clone(),
        config,
    };

    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            if handle_command(cmd, &workers).await {
                break;
            }
        }
        debug!("export runtime stopped");
    });

    ExportHandle {
        cmd_tx,
        events_tx,
        scan_cancel,
        export_cancel,
    }
}

impl ExportHandle {
    /// Subscribes to worker events.
    pub fn subscribe(&self) -> broadcast::Receiver<ExportEvent> {
        self.events_tx.subscribe()
    }

    /// Token polled by the scan worker.
    pub fn scan_cancel_token(&self) -> &CancelToken {
        &self.scan_cancel
    }

    /// Token polled by the export worker.
    pub fn export_cancel_token(&self) -> &CancelToken {
        &self.export_cancel
    }

    /// Requests cancellation of the active or queued worker.
    pub fn cancel(&self) {
        self.scan_cancel.cancel();
        self.export_cancel.cancel();
    }

    /// Clears a pending scan cancellation when the UI comes back.
    ///
    /// An export cancellation stands; written entries are kept.
    pub fn resume(&self) {
        self.scan_cancel.reset();
    }

    /// A configuration change always cancels the active worker.
    pub fn configuration_changed(&self) {
        self.cancel();
    }

    /// Resolves one contact from the source.
    pub async fn load_contact(&self, id: ContactId) -> Result<Option<ContactRecord>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::LoadContact { id, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Reads SIM space, then scans `target`.
    pub async fn scan(&self, target: ScanTarget) -> Result<ScanReport, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.scan_cancel.reset();
        self.cmd_tx
            .send(Command::Scan { target, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Deletes `to_delete` entries, then writes `accepted`.
    pub async fn export(
        &self,
        accepted: Vec<SimContact>,
        to_delete: usize,
    ) -> Result<ExportReport, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.export_cancel.reset();
        self.cmd_tx
            .send(Command::Export {
                accepted,
                to_delete,
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Stops the runtime loop after queued commands.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

async fn handle_command(cmd: Command, workers: &Workers) -> bool {
    match cmd {
        Command::LoadContact { id, resp } => {
            let source = Arc::clone(&workers.source);
            let out = join(tokio::task::spawn_blocking(move || {
                let mut source = source.blocking_lock();
                source
                    .load_contact(id)
                    .map_err(|e| RuntimeError::Export(e.into()))
            }))
            .await;
            let _ = resp.send(out);
        }
        Command::Scan { target, resp } => {
            let out = join(tokio::task::spawn_blocking(scan_worker(workers, target))).await;
            match &out {
                Ok(report) => {
                    let _ = workers.events_tx.send(ExportEvent::ScanFinished {
                        accepted: report.outcome.accepted.len(),
                        ignored: report.outcome.ignored.len(),
                        truncated: report.outcome.truncated_names.len(),
                    });
                }
                Err(RuntimeError::Export(err)) if err.is_canceled() => {
                    debug!("scan canceled by user");
                    let _ = workers.events_tx.send(ExportEvent::ScanCanceled);
                }
                Err(_) => {}
            }
            let _ = resp.send(out);
        }
        Command::Export {
            accepted,
            to_delete,
            resp,
        } => {
            let out = join(tokio::task::spawn_blocking(export_worker(
                workers, accepted, to_delete,
            )))
            .await;
            if let Ok(report) = &out {
                let _ = workers.events_tx.send(ExportEvent::ExportFinished {
                    state: report.state,
                    exported: report.exported,
                });
            }
            let _ = resp.send(out);
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(());
            return true;
        }
    }

    false
}

fn scan_worker(
    workers: &Workers,
    target: ScanTarget,
) -> impl FnOnce() -> Result<ScanReport, RuntimeError> + Send + 'static {
    let source = Arc::clone(&workers.source);
    let storage = Arc::clone(&workers.storage);
    let wake_lock = Arc::clone(&workers.wake_lock);
    let events_tx = workers.events_tx.clone();
    let cancel = workers.scan_cancel.clone();
    let attempts = workers.config.space_read_attempts;

    move || {
        let _awake = WakeGuard::new(wake_lock.as_ref());

        let _ = events_tx.send(ExportEvent::CheckingSim);
        let space = {
            let mut storage = storage.blocking_lock();
            read_sim_space(&mut **storage, attempts, &cancel)?
        };

        let _ = events_tx.send(ExportEvent::SearchingContacts);
        let mut source = source.blocking_lock();
        let outcome = scan_source(&mut **source, target, ScanLimits::from(&space), &cancel)?;
        Ok(ScanReport { space, outcome })
    }
}

fn export_worker(
    workers: &Workers,
    accepted: Vec<SimContact>,
    to_delete: usize,
) -> impl FnOnce() -> Result<ExportReport, RuntimeError> + Send + 'static {
    let storage = Arc::clone(&workers.storage);
    let wake_lock = Arc::clone(&workers.wake_lock);
    let events_tx = workers.events_tx.clone();
    let cancel = workers.export_cancel.clone();

    move || {
        let _awake = WakeGuard::new(wake_lock.as_ref());

        let _ = events_tx.send(ExportEvent::ExportStarted {
            total: accepted.len(),
        });
        let mut storage = storage.blocking_lock();
        let report = export_contacts(&mut **storage, accepted, to_delete, &cancel, |p| {
            let _ = events_tx.send(ExportEvent::Progress {
                done: p.done,
                total: p.total,
            });
        });
        Ok(report)
    }
}

async fn join<T>(
    task: tokio::task::JoinHandle<Result<T, RuntimeError>>,
) -> Result<T, RuntimeError> {
    task.await
        .map_err(|e| RuntimeError::Join(e.to_string()))?
}
