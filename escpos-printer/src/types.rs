//! Typed command parameters
//!
//! Every value here maps to exactly one protocol byte. Range checks happen
//! when the value is constructed, so the command layer never sees an
//! out-of-range parameter.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Character font (ESC M n)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Font {
    #[default]
    A,
    B,
    C,
}

impl Font {
    pub fn code(self) -> u8 {
        match self {
            Font::A => 0,
            Font::B => 1,
            Font::C => 2,
        }
    }
}

/// Justification (ESC a n)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn code(self) -> u8 {
        match self {
            Alignment::Left => 0,
            Alignment::Center => 1,
            Alignment::Right => 2,
        }
    }
}

/// Character magnification, 1..=16 in each direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    width: u8,
    height: u8,
}

impl Size {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 16;

    /// Normal size (1x1)
    pub const NORMAL: Size = Size {
        width: 1,
        height: 1,
    };

    pub fn new(width: u8, height: u8) -> Result<Self, ValidationError> {
        check_range("width", width as usize, Self::MIN as usize, Self::MAX as usize)?;
        check_range("height", height as usize, Self::MIN as usize, Self::MAX as usize)?;
        Ok(Self { width, height })
    }

    pub fn width(self) -> u8 {
        self.width
    }

    pub fn height(self) -> u8 {
        self.height
    }

    /// Width in the high nibble, height in the low nibble, both zero-based
    pub fn packed(self) -> u8 {
        ((self.width - 1) << 4) | (self.height - 1)
    }

    /// Inverse of [`Size::packed`]; every byte is a valid size
    pub fn from_packed(byte: u8) -> Self {
        Self {
            width: (byte >> 4) + 1,
            height: (byte & 0x0F) + 1,
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// How a barcode payload is delimited after `GS k <type>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// `text NUL`
    NulTerminated,
    /// `len text`, no terminator
    LengthPrefixed,
}

/// 1D barcode symbology (GS k)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarcodeType {
    UpcA,
    UpcE,
    Ean13,
    Ean8,
    Code39,
    Itf,
    Codabar,
    Code93,
    Code128,
}

impl BarcodeType {
    pub const ALL: [BarcodeType; 9] = [
        BarcodeType::UpcA,
        BarcodeType::UpcE,
        BarcodeType::Ean13,
        BarcodeType::Ean8,
        BarcodeType::Code39,
        BarcodeType::Itf,
        BarcodeType::Codabar,
        BarcodeType::Code93,
        BarcodeType::Code128,
    ];

    /// Protocol sub-code sent after `GS k`
    ///
    /// Function A codes (0-6) take NUL-terminated data; function B codes
    /// (65-73) take a length byte.
    pub fn code(self) -> u8 {
        match self {
            BarcodeType::UpcA => 0,
            BarcodeType::UpcE => 1,
            BarcodeType::Ean13 => 2,
            BarcodeType::Ean8 => 3,
            BarcodeType::Code39 => 4,
            BarcodeType::Itf => 5,
            BarcodeType::Codabar => 6,
            BarcodeType::Code93 => 72,
            BarcodeType::Code128 => 73,
        }
    }

    pub fn framing(self) -> Framing {
        match self {
            BarcodeType::Code93 | BarcodeType::Code128 => Framing::LengthPrefixed,
            _ => Framing::NulTerminated,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BarcodeType::UpcA => "UPC-A",
            BarcodeType::UpcE => "UPC-E",
            BarcodeType::Ean13 => "EAN13",
            BarcodeType::Ean8 => "EAN8",
            BarcodeType::Code39 => "CODE39",
            BarcodeType::Itf => "ITF",
            BarcodeType::Codabar => "CODABAR",
            BarcodeType::Code93 => "CODE93",
            BarcodeType::Code128 => "CODE128",
        }
    }
}

impl fmt::Display for BarcodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for BarcodeType {
    type Error = ValidationError;

    /// Function B codes 65-71 name the same symbologies as function A
    /// codes 0-6; those types are always sent in their NUL-terminated form.
    fn try_from(code: u8) -> Result<Self, Self::Error> {
        let normalized = match code {
            65..=71 => code - 65,
            _ => code,
        };
        Self::ALL
            .into_iter()
            .find(|t| t.code() == normalized)
            .ok_or(ValidationError::UnknownBarcodeCode(code))
    }
}

impl FromStr for BarcodeType {
    type Err = ValidationError;

    /// Case-insensitive; `-`, `_` and spaces are ignored ("upc_a" == "UPC-A")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_uppercase())
            .collect();

        Self::ALL
            .into_iter()
            .find(|t| t.name().replace('-', "") == key)
            .ok_or_else(|| ValidationError::UnknownBarcodeName(s.to_string()))
    }
}

impl TryFrom<&str> for BarcodeType {
    type Error = ValidationError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// QR error correction level (GS ( k fn 69)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QrErrorCorrection {
    /// ~7% recovery
    L,
    /// ~15% recovery
    M,
    /// ~25% recovery
    #[default]
    Q,
    /// ~30% recovery
    H,
}

impl QrErrorCorrection {
    pub fn code(self) -> u8 {
        match self {
            QrErrorCorrection::L => 48,
            QrErrorCorrection::M => 49,
            QrErrorCorrection::Q => 50,
            QrErrorCorrection::H => 51,
        }
    }
}

impl TryFrom<u8> for QrErrorCorrection {
    type Error = ValidationError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            48 => Ok(QrErrorCorrection::L),
            49 => Ok(QrErrorCorrection::M),
            50 => Ok(QrErrorCorrection::Q),
            51 => Ok(QrErrorCorrection::H),
            other => Err(ValidationError::UnknownErrorCorrection(other)),
        }
    }
}

pub(crate) fn check_range(
    name: &'static str,
    value: usize,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}
