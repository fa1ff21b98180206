//! Printer status byte decoding
//!
//! `DLE EOT 2` answers with one byte whose bit meanings depend on the
//! firmware. The raw byte is kept in [`ErrorStatus`]; a [`StatusLayout`]
//! says which bit means what for a given model.

use serde::{Deserialize, Serialize};

/// Raw status byte as returned by the printer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorStatus(pub u8);

impl ErrorStatus {
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Decode the byte with a model-specific layout
    pub fn flags(self, layout: &StatusLayout) -> StatusFlags {
        let set = |mask: u8| mask != 0 && self.0 & mask != 0;
        StatusFlags {
            cover_open: set(layout.cover_open),
            paper_feed_button: set(layout.paper_feed_button),
            paper_out: set(layout.paper_out),
            error: set(layout.error),
        }
    }
}

impl From<u8> for ErrorStatus {
    fn from(byte: u8) -> Self {
        Self(byte)
    }
}

/// Bit masks for each condition; a zero mask means the model does not report it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusLayout {
    pub cover_open: u8,
    pub paper_feed_button: u8,
    pub paper_out: u8,
    pub error: u8,
}

impl StatusLayout {
    /// Epson TM series, offline cause status (n = 2)
    ///
    /// Bit 2 cover open, bit 3 paper fed by the feed button, bit 5 printing
    /// stopped on paper end, bit 6 error. Bits 1 and 4 are always set.
    pub const EPSON: StatusLayout = StatusLayout {
        cover_open: 0x04,
        paper_feed_button: 0x08,
        paper_out: 0x20,
        error: 0x40,
    };
}

impl Default for StatusLayout {
    fn default() -> Self {
        Self::EPSON
    }
}

/// Decoded printer conditions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusFlags {
    pub cover_open: bool,
    pub paper_feed_button: bool,
    pub paper_out: bool,
    pub error: bool,
}

impl StatusFlags {
    /// True when nothing prevents printing
    pub fn is_ready(&self) -> bool {
        !(self.cover_open || self.paper_out || self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epson_idle_byte() {
        // Fixed bits 1 and 4 only
        let flags = ErrorStatus(0x12).flags(&StatusLayout::EPSON);
        assert_eq!(flags, StatusFlags::default());
        assert!(flags.is_ready());
    }

    #[test]
    fn test_epson_paper_out_and_cover() {
        let flags = ErrorStatus(0x12 | 0x20 | 0x04).flags(&StatusLayout::default());
        assert!(flags.paper_out);
        assert!(flags.cover_open);
        assert!(!flags.error);
        assert!(!flags.is_ready());
    }

    #[test]
    fn test_custom_layout() {
        let layout = StatusLayout {
            paper_out: 0x01,
            cover_open: 0,
            ..StatusLayout::EPSON
        };
        let flags = ErrorStatus(0x05).flags(&layout);
        assert!(flags.paper_out);
        assert!(!flags.cover_open);
    }

    #[test]
    fn test_layout_from_json() {
        let layout: StatusLayout = serde_json::from_str(r#"{"paper_out": 12}"#).unwrap();
        assert_eq!(layout.paper_out, 12);
        assert_eq!(layout.error, 0x40);
    }
}
