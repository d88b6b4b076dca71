//! Byte layouts of the lighting protocol
//!
//! The protocol was reverse engineered from USB captures. Byte values are
//! reproduced exactly; field meanings beyond the opcode and payload offsets
//! are guesses and named as such.

use ducky_transport::{pad_frame, Frame, TransportError, REPORT_SIZE};

use crate::led::{Pattern, RgbColor};

/// Enters the settings session. Sent before every backlight change.
pub const BEGIN_SETTING: &[u8] = &[0x41, 0x01];

/// Colour header. The trailing `aa` run looks like a per-zone mask.
pub const COLOR_HEADER: &[u8] = &[
    0x56, 0x81, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0xaa, 0xaa, 0xaa, 0xaa,
];

/// Colour body prefix; `R G B brightness` follow at offset 16
pub const SET_COLOR_PREFIX: &[u8] = &[
    0x56, 0x83, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0xc1, 0x00, 0x00, 0x00, 0x00,
];

/// Pattern body prefix; the pattern opcode follows at offset 4
pub const SET_PATTERN_PREFIX: &[u8] = &[0x51, 0x28, 0x00, 0x00];

/// Firmware version query. The reply carries a UTF-16LE string at offset 8.
pub const GET_VERSION: &[u8] = &[0x12, 0x20];

/// Offset of the version string in a firmware query reply
pub const VERSION_STRING_OFFSET: usize = 8;

/// Build a frame from a constant prefix and a payload.
///
/// The prefix is copied into a fresh frame before the payload is written, so
/// the constants above are never touched.
pub fn build_packet(prefix: &[u8], payload: &[u8]) -> Result<Frame, TransportError> {
    let end = prefix.len() + payload.len();
    if end > REPORT_SIZE {
        return Err(TransportError::FrameTooLong { len: end });
    }
    let mut frame = pad_frame(prefix)?;
    frame[prefix.len()..end].copy_from_slice(payload);
    Ok(frame)
}

/// Colour body frame
pub fn set_color(color: RgbColor, brightness: u8) -> Result<Frame, TransportError> {
    build_packet(SET_COLOR_PREFIX, &[color.r, color.g, color.b, brightness])
}

/// Pattern body frame
pub fn set_pattern(pattern: Pattern) -> Result<Frame, TransportError> {
    build_packet(SET_PATTERN_PREFIX, &[pattern.opcode()])
}

/// The four frames of one backlight change, in the order the device expects
pub fn backlight_sequence(
    color: RgbColor,
    brightness: u8,
    pattern: Pattern,
) -> Result<[Frame; 4], TransportError> {
    Ok([
        pad_frame(BEGIN_SETTING)?,
        pad_frame(COLOR_HEADER)?,
        set_color(color, brightness)?,
        set_pattern(pattern)?,
    ])
}
