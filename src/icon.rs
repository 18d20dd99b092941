use std::path::Path;

/// Reads the tray icon file.
///
/// Any failure (no path, missing file, read error) yields an empty byte
/// vector; the tray then falls back to its default icon.
pub fn load_icon(path: Option<&Path>) -> Vec<u8> {
    let Some(path) = path else {
        return Vec::new();
    };

    match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "icon not loaded, using default");
            Vec::new()
        }
    }
}
