//! ESC/POS command encoding
//!
//! Pure functions that build the exact byte sequence for one printer command.
//! Nothing here touches a transport: the printer façade decides when each
//! frame is written.
//!
//! Commands made of several sub-commands (init, barcode, QR) return one frame
//! per sub-command so they can be written, and fail, one at a time. All
//! validation happens before the first frame is produced.

use crate::error::ValidationError;
use crate::types::{Alignment, BarcodeType, Font, Framing, QrErrorCorrection, Size, check_range};

pub const ESC: u8 = 0x1B;
pub const GS: u8 = 0x1D;
pub const DLE: u8 = 0x10;
pub const EOT: u8 = 0x04;
pub const NUL: u8 = 0x00;
pub const LF: u8 = b'\n';

/// One write's worth of command bytes
pub type Frame = Vec<u8>;

/// Largest payload a QR symbol can hold (numeric mode, version 40)
pub const QR_MAX_DATA: usize = 7089;

/// Reset (ESC @) followed by the character table selection
pub fn init(select: &[u8]) -> Vec<Frame> {
    vec![vec![ESC, b'@'], select.to_vec()]
}

/// End-of-job marker understood by the printer firmware
pub fn end() -> Frame {
    vec![0xFA]
}

/// Full cut (GS V A 0)
pub fn cut() -> Frame {
    vec![GS, b'V', b'A', b'0']
}

/// Print and feed n lines (ESC d n)
pub fn feed(lines: u8) -> Frame {
    vec![ESC, b'd', lines]
}

/// Line terminator written after `print_ln` text
pub fn line_feed() -> Frame {
    vec![LF]
}

/// Character size (GS ! n)
pub fn size(size: Size) -> Frame {
    vec![GS, b'!', size.packed()]
}

/// Select font (ESC M n)
pub fn font(font: Font) -> Frame {
    vec![ESC, b'M', font.code()]
}

/// Underline on/off (ESC - n)
pub fn underline(enabled: bool) -> Frame {
    vec![ESC, b'-', enabled as u8]
}

/// Smoothing on/off (GS b n)
pub fn smooth(enabled: bool) -> Frame {
    vec![GS, b'b', enabled as u8]
}

/// Justification (ESC a n)
pub fn align(align: Alignment) -> Frame {
    vec![ESC, b'a', align.code()]
}

/// Print area width in dots (GS W nL nH)
pub fn print_area_width(width: u16) -> Frame {
    let [nl, nh] = width.to_le_bytes();
    vec![GS, b'W', nl, nh]
}

/// Transmit printer status, offline cause (DLE EOT 2)
pub fn status_query() -> Frame {
    vec![DLE, EOT, 0x02]
}

/// 1D barcode
///
/// Frames, in order:
/// 1. module width 4 (GS w 4) and height 100 dots (GS h 100)
/// 2. HRI font A (GS f 0)
/// 3. `GS k type data NUL` or `GS k type len data`, depending on the type
///
/// `data` must already be in the printer's code table.
pub fn barcode(data: &[u8], kind: BarcodeType) -> Result<Vec<Frame>, ValidationError> {
    let mut payload = Vec::with_capacity(data.len() + 4);
    payload.extend_from_slice(&[GS, b'k', kind.code()]);

    match kind.framing() {
        Framing::NulTerminated => {
            if data.is_empty() {
                return Err(ValidationError::BarcodeData("empty barcode"));
            }
            if data.contains(&NUL) {
                return Err(ValidationError::BarcodeData("NUL inside terminated barcode"));
            }
            payload.extend_from_slice(data);
            payload.push(NUL);
        }
        Framing::LengthPrefixed => {
            check_range("barcode length", data.len(), 1, u8::MAX as usize)?;
            payload.push(data.len() as u8);
            payload.extend_from_slice(data);
        }
    }

    Ok(vec![
        vec![GS, b'w', 0x04, GS, b'h', 0x64],
        vec![GS, b'f', 0x00],
        payload,
    ])
}

/// QR code built in symbol storage, then printed
///
/// Frames, in order:
/// 1. Function 165: select model 2
/// 2. Function 167: module size
/// 3. Function 169: error correction level
/// 4. Function 180: store data, `pL pH` = data length + 3
/// 5. Function 181: print symbol
pub fn qr(
    data: &[u8],
    module_size: u8,
    level: QrErrorCorrection,
) -> Result<Vec<Frame>, ValidationError> {
    check_range("QR module size", module_size as usize, 1, 16)?;
    check_range("QR data length", data.len(), 1, QR_MAX_DATA)?;

    let len = data.len() + 3;
    let p_l = (len & 0xFF) as u8;
    let p_h = (len >> 8) as u8;

    let mut store = Vec::with_capacity(data.len() + 8);
    store.extend_from_slice(&[GS, b'(', b'k', p_l, p_h, 49, 80, 48]);
    store.extend_from_slice(data);

    Ok(vec![
        vec![GS, b'(', b'k', 4, 0, 49, 65, 50, 0],
        vec![GS, b'(', b'k', 3, 0, 49, 67, module_size],
        vec![GS, b'(', b'k', 3, 0, 49, 69, level.code()],
        store,
        vec![GS, b'(', b'k', 3, 0, 49, 81, 48],
    ])
}
