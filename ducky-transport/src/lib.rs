//! Transport layer for Ducky keyboard communication
//!
//! Provides 64-byte framing, device discovery, and a hidapi backend for the
//! vendor control interface of the Holtek 04d9:0348 keyboard family.

pub mod error;
pub mod protocol;
pub mod types;

mod discovery;
mod hid_wired;

pub use discovery::{select_control_interface, HidDiscovery};
pub use error::TransportError;
pub use hid_wired::HidWiredTransport;
pub use protocol::{device, pad_frame, timing, Frame, REPORT_SIZE};
pub use types::{DiscoveredDevice, TransportDeviceInfo};

use std::sync::Arc;

/// The core transport trait
///
/// A transport moves whole 64-byte frames. Callers that need a write and
/// its reply to stay paired must serialise access themselves.
pub trait Transport: Send + Sync {
    /// Write one frame; exactly [`REPORT_SIZE`] bytes go on the wire
    fn write_frame(&self, frame: &Frame) -> Result<(), TransportError>;

    /// Read one frame, waiting at most `timeout_ms`
    ///
    /// Returns [`TransportError::Timeout`] when nothing arrives. Short
    /// replies are zero-padded.
    fn read_frame(&self, timeout_ms: i32) -> Result<Frame, TransportError>;

    /// Get device information
    fn device_info(&self) -> &TransportDeviceInfo;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn write_frame(&self, frame: &Frame) -> Result<(), TransportError> {
        (**self).write_frame(frame)
    }

    fn read_frame(&self, timeout_ms: i32) -> Result<Frame, TransportError> {
        (**self).read_frame(timeout_ms)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        (**self).device_info()
    }
}
