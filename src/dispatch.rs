//! Reactions to the tray menu.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    clipboard::ClipboardSink,
    diagnostics::{Action, DiagnosticSink, Failure},
    indicator::Trigger,
    CodeGenerator,
};

/// Turns "Copy" and "Exit" clicks into one-shot actions.
///
/// Copy requests are handled one at a time in arrival order. A failed copy is
/// reported and the listener keeps going. The derive-and-write step runs on
/// the blocking pool, since clipboard backends may block for a while.
#[derive(Clone)]
pub struct ActionDispatcher {
    generator: Arc<dyn CodeGenerator>,
    clipboard: Arc<dyn ClipboardSink>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl ActionDispatcher {
    pub fn new(
        generator: Arc<dyn CodeGenerator>,
        clipboard: Arc<dyn ClipboardSink>,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            generator,
            clipboard,
            diagnostics,
        }
    }

    /// Derives a fresh code and writes it to the clipboard.
    pub fn copy(&self) -> Result<(), Failure> {
        let code = self
            .generator
            .code_now()
            .map_err(|source| Failure::Derivation {
                action: Action::Copy,
                source,
            })?;

        self.clipboard
            .write(&code.to_string())
            .map_err(Failure::Clipboard)?;

        tracing::info!("copied TOTP code to clipboard");
        Ok(())
    }

    /// Handles copy requests until `cancel` fires or the trigger source goes away.
    pub async fn run_copy(self, mut copy: Trigger, cancel: CancellationToken) {
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                fired = copy.fired() => {
                    if !fired {
                        tracing::debug!("copy trigger closed");
                        break;
                    }
                    let dispatcher = self.clone();
                    match tokio::task::spawn_blocking(move || dispatcher.copy()).await {
                        Ok(Ok(())) => {}
                        Ok(Err(failure)) => self.diagnostics.report(&failure),
                        Err(e) => tracing::error!(error = %e, "copy task failed"),
                    }
                }
            }
        }
    }

    pub fn spawn_copy(self, copy: Trigger, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run_copy(copy, cancel))
    }

    /// Waits for the single exit request.
    ///
    /// A closed exit trigger counts as a request: nothing could fire it anymore.
    pub async fn wait_for_exit(mut exit: Trigger) {
        if !exit.fired().await {
            tracing::warn!("exit trigger closed, shutting down");
        }
    }
}
