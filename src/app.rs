//! Startup, run and shutdown of the tray core.

use std::{fmt::Display, sync::Arc};

use tokio_util::sync::CancellationToken;

use crate::{
    clipboard::ClipboardSink,
    config::Config,
    diagnostics::{DiagnosticSink, TracingSink},
    dispatch::ActionDispatcher,
    icon,
    indicator::Indicator,
    refresh::RefreshLoop,
    totp::Totp,
    CodeGenerator,
};

pub const NO_SECRET_LABEL: &str = "No secret found";
pub const COPY_LABEL: &str = "Copy";
pub const COPY_DESCRIPTION: &str = "Copy the TOTP code to the clipboard";
pub const EXIT_LABEL: &str = "Exit";
pub const EXIT_DESCRIPTION: &str = "Exit the application";

/// Where the app is in its life.
///
/// `Uninitialized` leads either to `Idle` (no secret, terminal) or to
/// `Running`, which only the exit request turns into `ShuttingDown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Idle,
    Running,
    ShuttingDown,
}

impl Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::ShuttingDown => write!(f, "shutting down"),
        }
    }
}

pub struct App {
    config: Config,
    indicator: Arc<dyn Indicator>,
    clipboard: Arc<dyn ClipboardSink>,
    diagnostics: Arc<dyn DiagnosticSink>,
    state: Lifecycle,
}

impl App {
    pub fn new(
        config: Config,
        indicator: Arc<dyn Indicator>,
        clipboard: Arc<dyn ClipboardSink>,
    ) -> Self {
        Self {
            config,
            indicator,
            clipboard,
            diagnostics: Arc::new(TracingSink),
            state: Lifecycle::Uninitialized,
        }
    }

    /// Replaces the default [`TracingSink`].
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;

        self
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    fn transition(&mut self, next: Lifecycle) {
        tracing::info!(from = %self.state, to = %next, "lifecycle transition");
        self.state = next;
    }

    /// Sets up the indicator and, with a secret, runs until the exit request.
    ///
    /// Returns the terminal state: [`Lifecycle::Idle`] right after setup when no
    /// secret is configured, [`Lifecycle::ShuttingDown`] once the indicator has
    /// been released.
    pub async fn run(mut self) -> Lifecycle {
        let icon = icon::load_icon(self.config.icon_path.as_deref());
        self.indicator.set_icon(&icon);
        self.indicator.set_title(&self.config.title);
        self.indicator.set_tooltip(&self.config.title);

        let Some(secret) = self.config.secret.clone() else {
            self.indicator.add_notice(NO_SECRET_LABEL);
            self.transition(Lifecycle::Idle);
            return self.state;
        };

        let copy = self.indicator.add_menu_item(COPY_LABEL, COPY_DESCRIPTION);
        let exit = self.indicator.add_menu_item(EXIT_LABEL, EXIT_DESCRIPTION);

        let generator: Arc<dyn CodeGenerator> = Arc::new(Totp::new(secret));
        let cancel = CancellationToken::new();

        let indicator = Arc::clone(&self.indicator);
        let refresh = RefreshLoop::new(
            Arc::clone(&generator),
            self.config.refresh_interval,
            Box::new(move |code: &str| indicator.set_tooltip(code)),
            Arc::clone(&self.diagnostics),
        )
        .spawn(cancel.clone());

        let dispatcher = ActionDispatcher::new(
            generator,
            Arc::clone(&self.clipboard),
            Arc::clone(&self.diagnostics),
        )
        .spawn_copy(copy, cancel.clone());

        self.transition(Lifecycle::Running);

        ActionDispatcher::wait_for_exit(exit).await;
        self.transition(Lifecycle::ShuttingDown);

        cancel.cancel();
        for (name, task) in [("refresh", refresh), ("copy", dispatcher)] {
            if let Err(e) = task.await {
                tracing::error!(task = name, "background task failed: {e}");
            }
        }

        self.indicator.quit();
        self.state
    }

    /// Runs the app on a fresh multi-threaded runtime, blocking the caller.
    ///
    /// If the runtime cannot be built the indicator is released right away,
    /// so the tray thread does not wait for a core that never started.
    pub fn run_blocking(self) -> std::io::Result<Lifecycle> {
        self.run_on(tokio::runtime::Runtime::new())
    }

    fn run_on(
        self,
        runtime: std::io::Result<tokio::runtime::Runtime>,
    ) -> std::io::Result<Lifecycle> {
        match runtime {
            Ok(runtime) => Ok(runtime.block_on(self.run())),
            Err(e) => {
                tracing::error!(error = %e, "async runtime could not be started");
                self.indicator.quit();
                Err(e)
            }
        }
    }
}
