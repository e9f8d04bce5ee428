//! The thread that does the blocking fetch and the statistics.
//!
//! Commands arrive one at a time over `mpsc`, so two analyses never overlap.

use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use pairlab_core::data::DataProvider;
use pairlab_runner::{run_analysis, AnalysisReport, AnalysisRequest, ErrorKind};

/// UI → worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Analyze(AnalysisRequest),
    Shutdown,
}

/// Worker → UI. Failures carry the kind so the status bar can colour them.
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    AnalysisDone(Box<AnalysisReport>),
    AnalysisFailed { kind: ErrorKind, message: String },
}

/// Spawn the background worker thread. It owns `provider` for its lifetime.
pub fn spawn_worker(
    provider: Box<dyn DataProvider>,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("pairlab-worker".into())
        .spawn(move || worker_loop(provider.as_ref(), rx, tx))
}

fn worker_loop(
    provider: &dyn DataProvider,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) {
    tracing::debug!(provider = provider.name(), "worker started");
    // Runs until Shutdown, or until either end of the channel pair is gone.
    while let Ok(WorkerCommand::Analyze(request)) = rx.recv() {
        if tx.send(analyze(provider, &request)).is_err() {
            break;
        }
    }
    tracing::debug!("worker stopped");
}

fn analyze(provider: &dyn DataProvider, request: &AnalysisRequest) -> WorkerResponse {
    match run_analysis(provider, request) {
        Ok(report) => WorkerResponse::AnalysisDone(Box::new(report)),
        Err(e) => WorkerResponse::AnalysisFailed {
            kind: e.kind(),
            message: e.to_string(),
        },
    }
}
