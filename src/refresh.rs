//! Periodic tooltip refresh.

use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{
    diagnostics::{Action, DiagnosticSink, Failure},
    CodeGenerator,
};

/// Receives every freshly derived code.
pub type PublishFn = Box<dyn Fn(&str) + Send + Sync + 'static>;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Derives the current code on a fixed cadence and publishes it.
///
/// A failed derivation is reported and skipped; the loop only ends when its
/// cancellation token fires.
pub struct RefreshLoop {
    generator: Arc<dyn CodeGenerator>,
    interval: Duration,
    publish: PublishFn,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl RefreshLoop {
    pub fn new(
        generator: Arc<dyn CodeGenerator>,
        interval: Duration,
        publish: PublishFn,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            generator,
            interval: interval.max(MIN_INTERVAL),
            publish,
            diagnostics,
        }
    }

    /// Runs one derive-and-publish step. Returns whether something was published.
    pub fn tick(&self) -> bool {
        match self.generator.code_now() {
            Ok(code) => {
                (self.publish)(&code.to_string());
                true
            }
            Err(source) => {
                self.diagnostics.report(&Failure::Derivation {
                    action: Action::Refresh,
                    source,
                });
                false
            }
        }
    }

    /// Ticks until `cancel` fires. The first tick is immediate.
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::debug!(interval_ms = self.interval.as_millis() as u64, "refresh loop started");

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    self.tick();
                }
            }
        }

        tracing::debug!("refresh loop stopped");
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }
}
