//! Character re-encoding for thermal printers
//!
//! Printers expect text in the single-byte code table selected with `ESC t`
//! (or a double-byte table on Chinese models). This module converts UTF-8
//! input into that table:
//! - Characters present in the table are mapped directly
//! - Characters missing from the table go through a substitution table
//!   (smart quotes, dashes, Central European letters)
//! - Anything left becomes `?` and is reported back to the caller
//!
//! Conversion never fails on a single character; an error means the mapping
//! itself could not be set up.

use encoding_rs::Encoding;
use tracing::instrument;

use crate::error::EncodingError;

/// Replacement marker for characters with no mapping and no substitute
pub const REPLACEMENT: u8 = b'?';

/// ESC t 40 - ISO 8859-15 (Latin-9) on Epson firmware
const SELECT_LATIN9: [u8; 3] = [0x1B, 0x74, 40];

/// FS & (enable Chinese mode) + FS C 1 (select GBK)
const SELECT_GBK: [u8; 5] = [0x1C, 0x26, 0x1C, 0x43, 0x01];

/// Converted text ready to be written to the printer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Encoded {
    /// Bytes in the printer's code table
    pub bytes: Vec<u8>,
    /// Number of characters mapped directly or through a substitute
    pub converted: usize,
    /// Characters that were replaced with [`REPLACEMENT`]
    pub unmapped: Vec<char>,
}

/// Converts Unicode text into the byte encoding a printer expects
///
/// The printer façade only knows this trait, so a different code table can be
/// injected without touching the command layer.
pub trait CharacterConverter {
    /// Convert text, substituting characters that have no mapping
    fn encode(&self, text: &str) -> Result<Encoded, EncodingError>;

    /// Command bytes that select this code table, sent by `init`
    fn select_sequence(&self) -> &[u8];
}

/// Converter backed by an `encoding_rs` table plus a substitution table
#[derive(Debug, Clone)]
pub struct TableConverter {
    encoding: &'static Encoding,
    select: Vec<u8>,
}

impl TableConverter {
    /// ISO 8859-15, selected with `ESC t 40`
    pub fn latin9() -> Self {
        Self {
            encoding: encoding_rs::ISO_8859_15,
            select: SELECT_LATIN9.to_vec(),
        }
    }

    /// GBK for Chinese printers, selected with `FS & FS C 1`
    pub fn gbk() -> Self {
        Self {
            encoding: encoding_rs::GBK,
            select: SELECT_GBK.to_vec(),
        }
    }

    /// Look up an encoding by WHATWG label, selected with `ESC t <code_table>`
    ///
    /// Fails for unknown labels, for encodings that do not keep ASCII (and
    /// therefore command bytes) intact, such as UTF-16, and for multi-byte
    /// encodings, which `ESC t` cannot select. GBK has its own constructor.
    #[instrument]
    pub fn for_label(label: &str, code_table: u8) -> Result<Self, EncodingError> {
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| EncodingError::UnknownLabel(label.to_string()))?;

        if !encoding.is_ascii_compatible()
            || encoding.output_encoding() != encoding
            || !is_single_byte(encoding)
        {
            return Err(EncodingError::Unsupported(encoding.name()));
        }

        Ok(Self {
            encoding,
            select: vec![0x1B, 0x74, code_table],
        })
    }

    /// Name of the underlying encoding
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Append one encoded character, false if the table has no mapping for it
    fn encode_char(&self, c: char, out: &mut Vec<u8>) -> bool {
        if c.is_ascii() {
            out.push(c as u8);
            return true;
        }

        let mut tmp = [0u8; 4];
        let (bytes, _, had_errors) = self.encoding.encode(c.encode_utf8(&mut tmp));
        if had_errors {
            return false;
        }
        out.extend_from_slice(&bytes);
        true
    }
}

/// Every mappable character in U+0080..=U+00FF must encode to one byte
fn is_single_byte(encoding: &'static Encoding) -> bool {
    let mut tmp = [0u8; 4];
    ('\u{80}'..='\u{FF}').all(|c| {
        let (bytes, _, had_errors) = encoding.encode(c.encode_utf8(&mut tmp));
        had_errors || bytes.len() == 1
    })
}

impl Default for TableConverter {
    fn default() -> Self {
        Self::latin9()
    }
}

impl CharacterConverter for TableConverter {
    fn encode(&self, text: &str) -> Result<Encoded, EncodingError> {
        let mut encoded = Encoded {
            bytes: Vec::with_capacity(text.len()),
            ..Encoded::default()
        };

        'chars: for c in text.chars() {
            if self.encode_char(c, &mut encoded.bytes) {
                encoded.converted += 1;
                continue;
            }

            if let Some(sub) = substitute(c) {
                let mark = encoded.bytes.len();
                for s in sub.chars() {
                    if !self.encode_char(s, &mut encoded.bytes) {
                        encoded.bytes.truncate(mark);
                        encoded.bytes.push(REPLACEMENT);
                        encoded.unmapped.push(c);
                        continue 'chars;
                    }
                }
                encoded.converted += 1;
                continue;
            }

            encoded.bytes.push(REPLACEMENT);
            encoded.unmapped.push(c);
        }

        Ok(encoded)
    }

    fn select_sequence(&self) -> &[u8] {
        &self.select
    }
}

/// Look-alike replacement for characters missing from the code table
pub fn substitute(c: char) -> Option<&'static str> {
    let sub = match c {
        // Quotes
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => "'",
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' => "\"",
        '\u{2039}' => "<",
        '\u{203A}' => ">",

        // Dashes and spaces
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}'
        | '\u{2212}' => "-",
        '\u{2002}' | '\u{2003}' | '\u{2009}' | '\u{200A}' | '\u{202F}' => " ",
        '\u{200B}' | '\u{2060}' | '\u{FEFF}' => "",

        // Symbols
        '\u{2026}' => "...",
        '\u{2022}' | '\u{2219}' => "*",
        '\u{2122}' => "TM",
        '\u{2020}' => "+",
        '\u{2030}' => "o/oo",
        '\u{2044}' => "/",

        // Central European letters
        'Ą' | 'Ă' | 'Ā' => "A",
        'ą' | 'ă' | 'ā' => "a",
        'Ć' | 'Č' => "C",
        'ć' | 'č' => "c",
        'Ď' | 'Đ' => "D",
        'ď' | 'đ' => "d",
        'Ę' | 'Ě' | 'Ē' => "E",
        'ę' | 'ě' | 'ē' => "e",
        'Ğ' => "G",
        'ğ' => "g",
        'İ' | 'Ī' => "I",
        'ı' | 'ī' => "i",
        'Ł' | 'Ľ' | 'Ĺ' => "L",
        'ł' | 'ľ' | 'ĺ' => "l",
        'Ń' | 'Ň' => "N",
        'ń' | 'ň' => "n",
        'Ő' | 'Ō' => "O",
        'ő' | 'ō' => "o",
        'Ř' | 'Ŕ' => "R",
        'ř' | 'ŕ' => "r",
        'Ś' | 'Ş' | 'Ș' => "S",
        'ś' | 'ş' | 'ș' => "s",
        'Ť' | 'Ţ' | 'Ț' => "T",
        'ť' | 'ţ' | 'ț' => "t",
        'Ů' | 'Ű' | 'Ū' => "U",
        'ů' | 'ű' | 'ū' => "u",
        'Ź' | 'Ż' => "Z",
        'ź' | 'ż' => "z",
        _ => return None,
    };
    Some(sub)
}
