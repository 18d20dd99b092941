use std::sync::{mpsc, Mutex};

use crate::clipboard::{ClipboardError, ClipboardSink};

type Request = (String, mpsc::Sender<Result<(), ClipboardError>>);

/// System clipboard served by one long-lived thread.
///
/// On X11 the copied text only stays available while a clipboard handle is
/// alive, so the handle is kept by the thread rather than created per write.
pub struct SystemClipboard {
    requests: Mutex<mpsc::Sender<Request>>,
}

impl SystemClipboard {
    pub fn spawn() -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel::<Request>();

        std::thread::Builder::new()
            .name("clipboard".into())
            .spawn(move || serve(rx))?;

        Ok(Self {
            requests: Mutex::new(tx),
        })
    }
}

impl ClipboardSink for SystemClipboard {
    fn write(&self, text: &str) -> Result<(), ClipboardError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        let stopped = || ClipboardError::Unavailable("clipboard thread stopped".into());

        self.requests
            .lock()
            .map_err(|_| stopped())?
            .send((text.to_owned(), reply_tx))
            .map_err(|_| stopped())?;

        reply_rx.recv().map_err(|_| stopped())?
    }
}

fn serve(requests: mpsc::Receiver<Request>) {
    let mut clipboard = None;

    for (text, reply) in requests {
        let _ = reply.send(set_text(&mut clipboard, text));
    }
}

/// Writes through the cached handle. A failed write drops the handle so the
/// next request reconnects.
fn set_text(slot: &mut Option<arboard::Clipboard>, text: String) -> Result<(), ClipboardError> {
    let mut clipboard = match slot.take() {
        Some(clipboard) => clipboard,
        None => arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?,
    };

    clipboard
        .set_text(text)
        .map_err(|e| ClipboardError::WriteFailed(e.to_string()))?;

    *slot = Some(clipboard);
    Ok(())
}
