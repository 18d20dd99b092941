//! The tray surface as seen by the core.
//!
//! The concrete widget lives outside the core: it owns its event loop and the
//! menu items, and hands clicks over as [`Trigger`]s.

use tokio::sync::mpsc;

/// Status icon with a short menu.
///
/// Implementations serialize their own updates; every method takes `&self`
/// and may be called from any thread.
pub trait Indicator: Send + Sync {
    fn set_icon(&self, icon: &[u8]);

    fn set_title(&self, title: &str);

    fn set_tooltip(&self, tooltip: &str);

    /// Adds a clickable entry; each click fires the returned trigger once.
    fn add_menu_item(&self, label: &str, description: &str) -> Trigger;

    /// Adds a disabled, informational entry.
    fn add_notice(&self, label: &str);

    /// Tears the indicator down. Called once, after the exit request.
    fn quit(&self);
}

/// Creates a connected trigger pair.
pub fn trigger() -> (TriggerHandle, Trigger) {
    let (tx, rx) = mpsc::unbounded_channel();

    (TriggerHandle { tx }, Trigger { rx })
}

/// Receiving side of a unit-payload signal, e.g. menu clicks.
///
/// Signals are delivered in the order they were fired, one per fire.
#[derive(Debug)]
pub struct Trigger {
    rx: mpsc::UnboundedReceiver<()>,
}

impl Trigger {
    /// Waits for the next signal. Returns `false` once the source is gone
    /// and every pending signal has been consumed.
    pub async fn fired(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }
}

/// Firing side of a [`Trigger`], held by the indicator backend.
#[derive(Debug, Clone)]
pub struct TriggerHandle {
    tx: mpsc::UnboundedSender<()>,
}

impl TriggerHandle {
    /// Returns `false` when the listening side has been dropped.
    pub fn fire(&self) -> bool {
        self.tx.send(()).is_ok()
    }
}
