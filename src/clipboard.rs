/// Destination of the "Copy" action.
pub trait ClipboardSink: Send + Sync {
    fn write(&self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("Clipboard is not available: {0}")]
    Unavailable(String),
    #[error("Could not write to the clipboard: {0}")]
    WriteFailed(String),
}
