//! Printer façade
//!
//! Owns one transport and writes command frames to it in call order. Every
//! method performs exactly the writes its command needs; nothing is buffered
//! between calls and nothing is retried. If a write fails the error is
//! returned as is and the printer is left for the caller to retry or close.

use std::io;

use crate::encoding::{CharacterConverter, TableConverter};
use crate::error::{PrintError, PrintResult};
use crate::escpos::{self, Frame};
use crate::status::{ErrorStatus, StatusFlags, StatusLayout};
use crate::transport::Transport;
use crate::types::{Alignment, BarcodeType, Font, QrErrorCorrection, Size};

/// ESC/POS printer driven through a [`Transport`]
///
/// Text goes through the injected [`CharacterConverter`] before it is
/// written; the default converter targets ISO 8859-15.
///
/// A `Printer` is not synchronized. Share it between threads only behind a
/// lock, since the protocol depends on commands arriving in order.
#[derive(Debug)]
pub struct Printer<T: Transport, C: CharacterConverter = TableConverter> {
    transport: T,
    converter: C,
}

impl<T: Transport> Printer<T> {
    /// Create a printer with the ISO 8859-15 converter
    pub fn new(transport: T) -> Self {
        Self::with_converter(transport, TableConverter::default())
    }
}

impl<T: Transport, C: CharacterConverter> Printer<T, C> {
    /// Create a printer with a specific character converter
    pub fn with_converter(transport: T, converter: C) -> Self {
        Self {
            transport,
            converter,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// Give the transport back without closing it
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Reset the printer and select the converter's character table
    pub fn init(&mut self) -> PrintResult<()> {
        let frames = escpos::init(self.converter.select_sequence());
        self.write_frames(&frames)
    }

    /// Finalize the print job
    pub fn end(&mut self) -> PrintResult<()> {
        self.write(&escpos::end())?;
        self.transport.flush()?;
        Ok(())
    }

    /// Close the transport; the printer cannot be used afterwards
    pub fn close(mut self) -> PrintResult<()> {
        self.transport.close()?;
        Ok(())
    }

    /// Print text without a line break
    ///
    /// Empty text writes nothing.
    pub fn print(&mut self, text: &str) -> PrintResult<()> {
        if text.is_empty() {
            return Ok(());
        }

        let encoded = self.converter.encode(text)?;
        if encoded.bytes.is_empty() {
            return Ok(());
        }
        self.write(&encoded.bytes)
    }

    /// Print text followed by a line feed, written separately
    pub fn print_ln(&mut self, text: &str) -> PrintResult<()> {
        self.print(text)?;
        self.write(&escpos::line_feed())
    }

    /// Character size, 1..=16 in each direction
    pub fn size(&mut self, width: u8, height: u8) -> PrintResult<()> {
        let size = Size::new(width, height)?;
        self.write(&escpos::size(size))
    }

    pub fn font(&mut self, font: Font) -> PrintResult<()> {
        self.write(&escpos::font(font))
    }

    /// The printer keeps this setting until it is changed or reset
    pub fn underline(&mut self, enabled: bool) -> PrintResult<()> {
        self.write(&escpos::underline(enabled))
    }

    /// The printer keeps this setting until it is changed or reset
    pub fn smooth(&mut self, enabled: bool) -> PrintResult<()> {
        self.write(&escpos::smooth(enabled))
    }

    pub fn align(&mut self, align: Alignment) -> PrintResult<()> {
        self.write(&escpos::align(align))
    }

    /// Print area width in dots; 380 suits narrow card-terminal receipts
    pub fn print_area_width(&mut self, width: u16) -> PrintResult<()> {
        self.write(&escpos::print_area_width(width))
    }

    /// Print and feed n lines
    pub fn feed(&mut self, lines: u8) -> PrintResult<()> {
        self.write(&escpos::feed(lines))
    }

    /// Full paper cut
    pub fn cut(&mut self) -> PrintResult<()> {
        self.write(&escpos::cut())
    }

    /// Print a 1D barcode
    ///
    /// `kind` may be a [`BarcodeType`], a protocol sub-code (`u8`) or a name
    /// (`&str`). An unknown type or unframeable text is rejected before
    /// anything is written.
    pub fn barcode<K>(&mut self, text: &str, kind: K) -> PrintResult<()>
    where
        K: TryInto<BarcodeType>,
        PrintError: From<K::Error>,
    {
        let kind = kind.try_into()?;
        let data = self.converter.encode(text)?;
        let frames = escpos::barcode(&data.bytes, kind)?;
        self.write_frames(&frames)
    }

    /// Print a 1D barcode with its text on the line below
    pub fn barcode_with_text<K>(&mut self, text: &str, kind: K) -> PrintResult<()>
    where
        K: TryInto<BarcodeType>,
        PrintError: From<K::Error>,
    {
        self.barcode(text, kind)?;
        self.print_ln(text)
    }

    /// Print a QR code
    ///
    /// The text is stored as UTF-8, the encoding QR readers expect.
    /// Module size is 1..=16 dots.
    pub fn qr(
        &mut self,
        text: &str,
        module_size: u8,
        level: QrErrorCorrection,
    ) -> PrintResult<()> {
        let frames = escpos::qr(text.as_bytes(), module_size, level)?;
        self.write_frames(&frames)
    }

    /// Query the offline-cause status byte
    ///
    /// Blocks until the printer answers; a transport without read timeouts
    /// can wait forever here. An expired read timeout is reported as
    /// [`PrintError::Timeout`].
    pub fn error_status(&mut self) -> PrintResult<ErrorStatus> {
        self.write(&escpos::status_query())?;
        self.transport.flush()?;

        let mut byte = [0u8; 1];
        self.transport.read_exact(&mut byte).map_err(|e| match e.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => {
                PrintError::Timeout(format!("No status reply: {}", e))
            }
            _ => PrintError::Io(e),
        })?;
        Ok(ErrorStatus(byte[0]))
    }

    /// Query the status byte and decode it with a model-specific layout
    pub fn status_flags(&mut self, layout: &StatusLayout) -> PrintResult<StatusFlags> {
        Ok(self.error_status()?.flags(layout))
    }

    fn write(&mut self, bytes: &[u8]) -> PrintResult<()> {
        self.transport.write_all(bytes)?;
        Ok(())
    }

    fn write_frames(&mut self, frames: &[Frame]) -> PrintResult<()> {
        for frame in frames {
            self.write(frame)?;
        }
        Ok(())
    }
}
