//! HID transport for the keyboard's wired USB control interface

use hidapi::HidDevice;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::error::TransportError;
use crate::protocol::{Frame, REPORT_SIZE};
use crate::types::TransportDeviceInfo;
use crate::Transport;

/// HID transport for the vendor control interface (interface 1)
///
/// Frames are written as plain 64-byte output reports and replies are read
/// as input reports. The device handle is closed when the transport drops.
pub struct HidWiredTransport {
    device: Mutex<HidDevice>,
    info: TransportDeviceInfo,
}

impl HidWiredTransport {
    /// Wrap an opened control interface.
    ///
    /// Switches the handle to non-blocking mode; reads are bounded by the
    /// timeout passed to [`Transport::read_frame`] instead.
    pub fn new(device: HidDevice, info: TransportDeviceInfo) -> Result<Self, TransportError> {
        device.set_blocking_mode(false)?;
        debug!("Opened control interface {}", info.describe());
        Ok(Self {
            device: Mutex::new(device),
            info,
        })
    }
}

impl Transport for HidWiredTransport {
    fn write_frame(&self, frame: &Frame) -> Result<(), TransportError> {
        trace!("OUT {:02X?}", &frame[..16]);
        let written = self.device.lock().write(frame)?;
        if written != REPORT_SIZE {
            return Err(TransportError::ShortWrite {
                written,
                expected: REPORT_SIZE,
            });
        }
        Ok(())
    }

    fn read_frame(&self, timeout_ms: i32) -> Result<Frame, TransportError> {
        let mut frame = [0u8; REPORT_SIZE];
        let len = self.device.lock().read_timeout(&mut frame, timeout_ms)?;
        if len == 0 {
            return Err(TransportError::Timeout);
        }
        trace!("IN  {:02X?} ({} bytes)", &frame[..16], len);
        Ok(frame)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }
}

impl Drop for HidWiredTransport {
    fn drop(&mut self) {
        debug!("Closing control interface {}", self.info.describe());
    }
}
