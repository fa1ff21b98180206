//! # escpos-printer
//!
//! ESC/POS thermal receipt printer driver.
//!
//! ## Scope
//!
//! - ESC/POS command encoding (text style, cut, feed, barcodes, QR codes)
//! - Re-encoding UTF-8 text into the printer's character table
//! - A printer façade that writes commands to any byte transport
//! - Transports: network (TCP port 9100), device nodes (`/dev/usb/lp*`),
//!   Windows spooler queues
//!
//! Not included: raster images, retries, fleet management. A failed write is
//! returned to the caller, who decides whether to retry or close.
//!
//! ## Example
//!
//! ```no_run
//! use escpos_printer::{Alignment, BarcodeType, NetworkTransport, Printer, QrErrorCorrection};
//!
//! # fn main() -> escpos_printer::PrintResult<()> {
//! let mut printer = Printer::new(NetworkTransport::connect("192.168.1.100", 9100)?);
//!
//! printer.init()?;
//! printer.size(2, 2)?;
//! printer.print_ln("HELLO")?;
//! printer.size(1, 1)?;
//!
//! printer.align(Alignment::Center)?;
//! printer.barcode_with_text("MECT", BarcodeType::Code39)?;
//! printer.qr("https://example.com", 10, QrErrorCorrection::Q)?;
//! printer.align(Alignment::Left)?;
//!
//! printer.feed(2)?;
//! printer.cut()?;
//! printer.end()?;
//! printer.close()?;
//! # Ok(())
//! # }
//! ```

mod config;
mod encoding;
mod error;
pub mod escpos;
mod printer;
mod status;
mod tracked;
pub mod transport;
mod types;

// Re-exports
pub use config::{EncodingConfig, PrinterConfig, TransportConfig};
pub use encoding::{CharacterConverter, Encoded, REPLACEMENT, TableConverter, substitute};
pub use error::{EncodingError, PrintError, PrintResult, ValidationError};
pub use printer::Printer;
pub use status::{ErrorStatus, StatusFlags, StatusLayout};
pub use tracked::TrackedPrinter;
pub use transport::{DeviceTransport, NetworkTransport, Transport};
pub use types::{Alignment, BarcodeType, Font, Framing, QrErrorCorrection, Size};

#[cfg(windows)]
pub use transport::SpoolerTransport;
