//! Per-entry error reporting and cancellation

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::DiagnosticKind;

/// Receives recoverable errors hit while walking. Never affects the scan.
pub trait DiagnosticSink {
    fn report(&mut self, path: &Path, kind: DiagnosticKind);
}

impl<F> DiagnosticSink for F
where
    F: FnMut(&Path, DiagnosticKind),
{
    fn report(&mut self, path: &Path, kind: DiagnosticKind) {
        self(path, kind)
    }
}

/// Sink that logs every diagnostic as a warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, path: &Path, kind: DiagnosticKind) {
        tracing::warn!(path = %path.display(), "skipped: {kind}");
    }
}

/// Shared flag to stop a running scan early.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing flag, e.g. one registered with a signal handler.
    pub fn from_arc(flag: Arc<AtomicBool>) -> Self {
        Self(flag)
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
