//! Concrete backends for the desktop binary.
//!
//! - [`tray`]: `tray-icon` status icon driven by a `tao` event loop
//! - [`clipboard`]: `arboard` clipboard owned by a dedicated thread
//! - [`icon`]: decoding of the configured icon file into RGBA
//!
//! The tray must live on the main thread on some platforms; everything else
//! talks to it through [`tray::TrayCommand`]s.

pub mod clipboard;
pub mod icon;
pub mod tray;
