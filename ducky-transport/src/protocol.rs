//! Protocol constants and framing for the Ducky vendor control interface

use crate::error::TransportError;

/// Every HID exchange on the control interface is a fixed 64-byte frame
pub const REPORT_SIZE: usize = 64;

/// One on-the-wire frame
pub type Frame = [u8; REPORT_SIZE];

/// USB identification of the supported keyboard
pub mod device {
    /// Holtek Semiconductor (Ducky OEM)
    pub const VENDOR_ID: u16 = 0x04D9;
    /// Ducky keyboard with per-key RGB backlight
    pub const PRODUCT_ID: u16 = 0x0348;

    /// Standard HID boot keyboard interface. Never opened.
    pub const INTERFACE_KEYBOARD: i32 = 0;
    /// Vendor-specific control interface carrying the lighting protocol
    pub const INTERFACE_CONTROL: i32 = 1;

    // Raw USB addressing of the control interface, for backends that bypass
    // hidraw. hidapi opens the interface by path and does not need these.
    pub const CONFIGURATION: u8 = 1;
    pub const ALT_SETTING: u8 = 0;
    pub const ENDPOINT_OUT: u8 = 0x04;
    pub const ENDPOINT_IN: u8 = 0x83;
}

/// Timing constants
pub mod timing {
    /// Default read timeout. Long enough for a reply, short enough that a
    /// silent keyboard does not stall the caller.
    pub const READ_TIMEOUT_MS: i32 = 250;
    /// Pause between the firmware query and reading its reply
    pub const FIRMWARE_REPLY_DELAY_MS: u64 = 5;
}

/// Right-pad a command buffer with zeros to exactly one frame.
///
/// Buffers of exactly [`REPORT_SIZE`] bytes pass through unchanged; longer
/// buffers are rejected.
pub fn pad_frame(buf: &[u8]) -> Result<Frame, TransportError> {
    if buf.len() > REPORT_SIZE {
        return Err(TransportError::FrameTooLong { len: buf.len() });
    }
    let mut frame = [0u8; REPORT_SIZE];
    frame[..buf.len()].copy_from_slice(buf);
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_short_buffer() {
        let frame = pad_frame(&[0x41, 0x01]).unwrap();
        assert_eq!(frame.len(), REPORT_SIZE);
        assert_eq!(&frame[..2], &[0x41, 0x01]);
        assert!(frame[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pad_empty_buffer() {
        assert_eq!(pad_frame(&[]).unwrap(), [0u8; REPORT_SIZE]);
    }

    #[test]
    fn test_pad_full_frame_is_identity() {
        let mut full = [0u8; REPORT_SIZE];
        for (i, b) in full.iter_mut().enumerate() {
            *b = i as u8 | 0x80;
        }
        let once = pad_frame(&full).unwrap();
        assert_eq!(once, full);
        assert_eq!(pad_frame(&once).unwrap(), once);
    }

    #[test]
    fn test_pad_preserves_prefix_for_every_length() {
        let source: Vec<u8> = (1..=REPORT_SIZE as u8).collect();
        for len in 0..=REPORT_SIZE {
            let frame = pad_frame(&source[..len]).unwrap();
            assert_eq!(&frame[..len], &source[..len], "len {len}");
            assert!(frame[len..].iter().all(|&b| b == 0), "len {len}");
        }
    }

    #[test]
    fn test_pad_rejects_oversized_buffer() {
        let err = pad_frame(&[0u8; REPORT_SIZE + 1]).unwrap_err();
        assert!(matches!(err, TransportError::FrameTooLong { len: 65 }));
    }
}
