#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use trayotp::{
    clipboard::{ClipboardError, ClipboardSink},
    diagnostics::{Action, DiagnosticSink, Failure},
    indicator::{trigger, Indicator, Trigger, TriggerHandle},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Icon(Vec<u8>),
    Title(String),
    Tooltip(String),
    MenuItem(String, String),
    Notice(String),
    Quit,
}

/// Records every indicator call and keeps the click side of each menu item.
#[derive(Default)]
pub struct MockIndicator {
    calls: Mutex<Vec<Call>>,
    items: Mutex<Vec<(String, TriggerHandle)>>,
}

impl MockIndicator {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn tooltips(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Tooltip(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn menu_labels(&self) -> Vec<String> {
        self.items
            .lock()
            .expect("items lock")
            .iter()
            .map(|(label, _)| label.clone())
            .collect()
    }

    pub fn quit_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| **call == Call::Quit)
            .count()
    }

    /// Simulates a click on the item with `label`.
    pub fn click(&self, label: &str) -> bool {
        self.items
            .lock()
            .expect("items lock")
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, handle)| handle.fire())
            .unwrap_or(false)
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

impl Indicator for MockIndicator {
    fn set_icon(&self, icon: &[u8]) {
        self.record(Call::Icon(icon.to_vec()));
    }

    fn set_title(&self, title: &str) {
        self.record(Call::Title(title.into()));
    }

    fn set_tooltip(&self, tooltip: &str) {
        self.record(Call::Tooltip(tooltip.into()));
    }

    fn add_menu_item(&self, label: &str, description: &str) -> Trigger {
        let (handle, trigger) = trigger();
        self.record(Call::MenuItem(label.into(), description.into()));
        self.items
            .lock()
            .expect("items lock")
            .push((label.into(), handle));
        trigger
    }

    fn add_notice(&self, label: &str) {
        self.record(Call::Notice(label.into()));
    }

    fn quit(&self) {
        self.record(Call::Quit);
    }
}

/// Clipboard that records writes; attempts listed in `fail_on` (1-based) fail.
#[derive(Default)]
pub struct MockClipboard {
    pub fail_on: Vec<usize>,
    attempts: AtomicUsize,
    written: Mutex<Vec<String>>,
}

impl MockClipboard {
    pub fn failing_on(fail_on: Vec<usize>) -> Self {
        Self {
            fail_on,
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn written(&self) -> Vec<String> {
        self.written.lock().expect("written lock").clone()
    }
}

impl ClipboardSink for MockClipboard {
    fn write(&self, text: &str) -> Result<(), ClipboardError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on.contains(&attempt) {
            return Err(ClipboardError::Unavailable("no display".into()));
        }

        self.written
            .lock()
            .expect("written lock")
            .push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct CountingSink {
    actions: Mutex<Vec<Action>>,
}

impl CountingSink {
    pub fn count(&self, action: Action) -> usize {
        self.actions
            .lock()
            .expect("actions lock")
            .iter()
            .filter(|a| **a == action)
            .count()
    }
}

impl DiagnosticSink for CountingSink {
    fn report(&self, failure: &Failure) {
        self.actions
            .lock()
            .expect("actions lock")
            .push(failure.action());
    }
}

pub fn is_code(text: &str) -> bool {
    text.len() == 6 && text.chars().all(|c| c.is_ascii_digit())
}

/// Polls `condition` on the tokio clock until it holds.
pub async fn wait_until<F: Fn() -> bool>(condition: F) {
    for _ in 0..1000 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met in time");
}
