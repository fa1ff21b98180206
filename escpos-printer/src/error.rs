//! Error types for the printer library

use std::convert::Infallible;
use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// IO error while talking to the printer
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A command parameter was rejected before anything was written
    #[error("Invalid argument: {0}")]
    Validation(#[from] ValidationError),

    /// The character mapping could not be set up or applied
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Device auto-selection found nothing to print to
    #[error("No devices found")]
    NoDevicesFound,

    /// Network connection error
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for printer
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Invalid printer configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Windows-specific printing error
    #[cfg(windows)]
    #[error("Windows printer error: {0}")]
    Spooler(String),
}

// Lets `Printer::barcode` accept an already typed `BarcodeType`.
impl From<Infallible> for PrintError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Rejected command parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Numeric parameter outside its documented range
    #[error("{name} must be in {min}..={max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },

    /// Barcode sub-code with no known framing rule
    #[error("unrecognized barcode type code {0}")]
    UnknownBarcodeCode(u8),

    /// Barcode name with no known framing rule
    #[error("unrecognized barcode type {0:?}")]
    UnknownBarcodeName(String),

    /// QR error correction level outside L/M/Q/H
    #[error("unrecognized QR error correction level {0}")]
    UnknownErrorCorrection(u8),

    /// Barcode payload that cannot be framed for its type
    #[error("invalid barcode data: {0}")]
    BarcodeData(&'static str),
}

/// Failure of the character mapping resource itself
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// No encoding is known under this label
    #[error("unknown encoding label {0:?}")]
    UnknownLabel(String),

    /// The encoding cannot be written byte-wise to a printer
    #[error("encoding {0} is not ASCII compatible")]
    Unsupported(&'static str),
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
