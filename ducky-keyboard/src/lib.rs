//! Backlight control for Ducky keyboards
//!
//! Drives the vendor control interface of the Holtek 04d9:0348 keyboard
//! through any [`Transport`]: firmware version queries and the four-packet
//! colour/pattern session.

pub mod error;
pub mod led;
pub mod packets;

pub use error::KeyboardError;
pub use led::{Pattern, RgbColor};

use std::time::Duration;

use ducky_transport::protocol::timing;
use ducky_transport::{Frame, Transport, TransportDeviceInfo};
use parking_lot::Mutex;
use tracing::{debug, warn};

/// Anything that can show a colour and pattern on the backlight.
///
/// Implementations are best-effort: failures are logged, not returned, and
/// the caller simply tries again later.
pub trait Backlight: Send {
    fn set_backlight(&self, color: RgbColor, brightness: u8, pattern: Pattern);
}

impl<B: Backlight + Sync + ?Sized> Backlight for std::sync::Arc<B> {
    fn set_backlight(&self, color: RgbColor, brightness: u8, pattern: Pattern) {
        (**self).set_backlight(color, brightness, pattern)
    }
}

/// High-level keyboard interface over a transport
///
/// All exchanges run under one session lock, so a write and the reply it
/// provokes are never interleaved with another command.
pub struct Keyboard<T: Transport> {
    transport: T,
    session: Mutex<()>,
    read_timeout_ms: i32,
}

impl<T: Transport> Keyboard<T> {
    /// Create a new keyboard interface
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            session: Mutex::new(()),
            read_timeout_ms: timing::READ_TIMEOUT_MS,
        }
    }

    /// Override the reply timeout (default [`timing::READ_TIMEOUT_MS`])
    pub fn with_read_timeout(mut self, timeout_ms: i32) -> Self {
        self.read_timeout_ms = timeout_ms;
        self
    }

    /// Get the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get device information
    pub fn device_info(&self) -> &TransportDeviceInfo {
        self.transport.device_info()
    }

    /// Read the firmware version string
    pub fn get_firmware_version(&self) -> Result<String, KeyboardError> {
        let _session = self.session.lock();

        let query = ducky_transport::pad_frame(packets::GET_VERSION)?;
        self.transport.write_frame(&query)?;
        std::thread::sleep(Duration::from_millis(timing::FIRMWARE_REPLY_DELAY_MS));

        let reply = self.transport.read_frame(self.read_timeout_ms)?;
        debug!("Version reply: {:02X?}", &reply[..32]);
        Ok(decode_firmware_version(&reply))
    }

    /// Write one frame and read back the reply it provokes, discarding it.
    ///
    /// Replies that are left unread stall later reads, so every command goes
    /// through here.
    pub fn write_then_drain(&self, frame: &Frame) -> Result<(), KeyboardError> {
        let _session = self.session.lock();
        self.exchange(frame)
    }

    /// Program colour, brightness and pattern
    pub fn try_set_backlight(
        &self,
        color: RgbColor,
        brightness: u8,
        pattern: Pattern,
    ) -> Result<(), KeyboardError> {
        let frames = packets::backlight_sequence(color, brightness, pattern)?;

        let _session = self.session.lock();
        for frame in &frames {
            self.exchange(frame)?;
        }
        debug!("Backlight set: {} brightness 0x{:02x} {}", color, brightness, pattern);
        Ok(())
    }

    // Caller holds the session lock.
    fn exchange(&self, frame: &Frame) -> Result<(), KeyboardError> {
        self.transport.write_frame(frame)?;
        if let Err(e) = self.transport.read_frame(self.read_timeout_ms) {
            debug!("No reply to 0x{:02X}{:02X}: {}", frame[0], frame[1], e);
        }
        Ok(())
    }
}

impl<T: Transport> Backlight for Keyboard<T> {
    fn set_backlight(&self, color: RgbColor, brightness: u8, pattern: Pattern) {
        if let Err(e) = self.try_set_backlight(color, brightness, pattern) {
            warn!("Failed to set backlight to {} {}: {}", color, pattern, e);
        }
    }
}

/// Decode the version string from a firmware query reply.
///
/// The string is UTF-16LE starting at byte 8 and ends at the first NUL code
/// unit or the end of the reply.
pub fn decode_firmware_version(reply: &[u8]) -> String {
    let body = reply.get(packets::VERSION_STRING_OFFSET..).unwrap_or(&[]);
    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|&unit| unit != 0)
        .collect();
    String::from_utf16_lossy(&units)
}
