use tray_icon::Icon;

const DEFAULT_SIZE: u32 = 16;
const DEFAULT_COLOR: [u8; 4] = [0x2b, 0x6c, 0xb0, 0xff];

/// Decodes icon file bytes (PNG or ICO) into RGBA pixels and dimensions.
pub fn decode_rgba(bytes: &[u8]) -> Option<(Vec<u8>, u32, u32)> {
    if bytes.is_empty() {
        return None;
    }

    match image::load_from_memory(bytes) {
        Ok(image) => {
            let rgba = image.into_rgba8();
            let (width, height) = rgba.dimensions();
            Some((rgba.into_raw(), width, height))
        }
        Err(e) => {
            tracing::debug!(error = %e, "icon bytes not decodable, using default");
            None
        }
    }
}

/// Solid square shown when no usable icon was configured.
pub fn default_rgba() -> (Vec<u8>, u32, u32) {
    let pixels = DEFAULT_COLOR.repeat((DEFAULT_SIZE * DEFAULT_SIZE) as usize);

    (pixels, DEFAULT_SIZE, DEFAULT_SIZE)
}

/// Builds the tray icon from file bytes, falling back to [`default_rgba`].
pub fn tray_icon(bytes: &[u8]) -> Option<Icon> {
    let (rgba, width, height) = decode_rgba(bytes).unwrap_or_else(default_rgba);

    match Icon::from_rgba(rgba, width, height) {
        Ok(icon) => Some(icon),
        Err(e) => {
            tracing::warn!(error = %e, "tray icon rejected");
            None
        }
    }
}
