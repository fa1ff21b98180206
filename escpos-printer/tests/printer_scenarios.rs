use escpos_printer::{
    Alignment, BarcodeType, CharacterConverter, Encoded, EncodingError, Font, PrintError,
    Printer, QrErrorCorrection, Transport, ValidationError,
};
use std::io::{self, Read, Write};

/// Transport that records writes and can fail on the n-th one (1-based)
#[derive(Default)]
struct ScriptedTransport {
    writes: Vec<Vec<u8>>,
    attempts: usize,
    fail_on: Option<usize>,
}

impl ScriptedTransport {
    fn failing_on(n: usize) -> Self {
        Self {
            fail_on: Some(n),
            ..Self::default()
        }
    }

    fn bytes(&self) -> Vec<u8> {
        self.writes.concat()
    }
}

impl Read for ScriptedTransport {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Ok(0)
    }
}

impl Write for ScriptedTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.attempts += 1;
        if self.fail_on == Some(self.attempts) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "printer unplugged"));
        }
        self.writes.push(buf.to_vec());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for ScriptedTransport {}

#[test]
fn test_centered_qr_scenario() {
    let mut printer = Printer::new(ScriptedTransport::default());

    printer.align(Alignment::Center).unwrap();
    printer
        .qr("HACK THE PLANET!", 10, QrErrorCorrection::Q)
        .unwrap();
    printer.align(Alignment::Left).unwrap();

    let mut store = vec![0x1D, 0x28, 0x6B, 19, 0, 49, 80, 48];
    store.extend_from_slice(b"HACK THE PLANET!");

    assert_eq!(
        printer.transport().writes,
        vec![
            vec![0x1B, 0x61, 1],
            vec![0x1D, 0x28, 0x6B, 4, 0, 49, 65, 50, 0],
            vec![0x1D, 0x28, 0x6B, 3, 0, 49, 67, 10],
            vec![0x1D, 0x28, 0x6B, 3, 0, 49, 69, 50],
            store,
            vec![0x1D, 0x28, 0x6B, 3, 0, 49, 81, 48],
            vec![0x1B, 0x61, 0],
        ]
    );
}

#[test]
fn test_unknown_barcode_type_writes_nothing() {
    let mut printer = Printer::new(ScriptedTransport::default());

    let by_code = printer.barcode("12345", 42u8);
    assert!(matches!(
        by_code,
        Err(PrintError::Validation(ValidationError::UnknownBarcodeCode(42)))
    ));

    let by_name = printer.barcode("12345", "PDF417");
    assert!(matches!(
        by_name,
        Err(PrintError::Validation(ValidationError::UnknownBarcodeName(_)))
    ));

    assert_eq!(printer.transport().attempts, 0);
}

#[test]
fn test_invalid_barcode_data_writes_nothing() {
    let mut printer = Printer::new(ScriptedTransport::default());

    let long = "9".repeat(300);
    assert!(printer.barcode(&long, BarcodeType::Code128).is_err());
    assert!(printer.barcode("", BarcodeType::UpcA).is_err());
    assert_eq!(printer.transport().attempts, 0);
}

#[test]
fn test_init_stops_at_failed_write() {
    let mut printer = Printer::new(ScriptedTransport::failing_on(2));

    match printer.init() {
        Err(PrintError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
        other => panic!("expected IO error, got {:?}", other),
    }

    let transport = printer.into_inner();
    assert_eq!(transport.attempts, 2);
    assert_eq!(transport.writes, vec![vec![0x1B, 0x40]]);
}

#[test]
fn test_barcode_stops_at_failed_write() {
    let mut printer = Printer::new(ScriptedTransport::failing_on(2));

    assert!(printer.barcode("MECT", BarcodeType::Code39).is_err());
    assert_eq!(printer.transport().writes.len(), 1);

    // No recovery attempt: the next call writes normally
    printer.cut().unwrap();
    assert_eq!(printer.transport().attempts, 3);
}

#[test]
fn test_code128_length_and_fixed_type_terminator() {
    let mut printer = Printer::new(ScriptedTransport::default());
    printer.barcode("ABC-123", BarcodeType::Code128).unwrap();
    printer.barcode("4006381333931", BarcodeType::Ean13).unwrap();

    let writes = &printer.transport().writes;
    assert_eq!(writes[2], b"\x1D\x6B\x49\x07ABC-123".to_vec());
    assert_eq!(writes[5], b"\x1D\x6B\x024006381333931\x00".to_vec());
}

#[test]
fn test_demo_receipt_byte_stream() {
    let mut printer = Printer::new(ScriptedTransport::default());

    printer.init().unwrap();
    printer.smooth(true).unwrap();
    printer.size(2, 2).unwrap();
    printer.print_ln("HELLO").unwrap();
    printer.size(1, 1).unwrap();
    printer.font(Font::B).unwrap();
    printer.underline(true).unwrap();
    printer.print_ln("\u{201C}ISO8859-15\u{201D} \u{160}").unwrap();
    printer.underline(false).unwrap();
    printer.print_area_width(380).unwrap();
    printer.feed(2).unwrap();
    printer.cut().unwrap();
    printer.end().unwrap();

    let mut expected = Vec::new();
    expected.extend_from_slice(b"\x1B@\x1Bt\x28");
    expected.extend_from_slice(b"\x1Db\x01");
    expected.extend_from_slice(b"\x1D!\x11");
    expected.extend_from_slice(b"HELLO\n");
    expected.extend_from_slice(b"\x1D!\x00");
    expected.extend_from_slice(b"\x1BM\x01");
    expected.extend_from_slice(b"\x1B-\x01");
    expected.extend_from_slice(b"\"ISO8859-15\" \xA6\n");
    expected.extend_from_slice(b"\x1B-\x00");
    expected.extend_from_slice(b"\x1DW\x7C\x01");
    expected.extend_from_slice(b"\x1Bd\x02");
    expected.extend_from_slice(b"\x1DVA0");
    expected.push(0xFA);

    assert_eq!(printer.transport().bytes(), expected);
}

/// Upper-cases ASCII and selects table 0 (PC437)
struct ShoutingAscii;

impl CharacterConverter for ShoutingAscii {
    fn encode(&self, text: &str) -> Result<Encoded, EncodingError> {
        let mut encoded = Encoded::default();
        for c in text.chars() {
            if c.is_ascii() {
                encoded.bytes.push(c.to_ascii_uppercase() as u8);
                encoded.converted += 1;
            } else {
                encoded.bytes.push(b'?');
                encoded.unmapped.push(c);
            }
        }
        Ok(encoded)
    }

    fn select_sequence(&self) -> &[u8] {
        &[0x1B, 0x74, 0]
    }
}

#[test]
fn test_injected_converter() {
    let mut printer = Printer::with_converter(ScriptedTransport::default(), ShoutingAscii);
    printer.init().unwrap();
    printer.print("héllo").unwrap();

    assert_eq!(
        printer.transport().writes,
        vec![vec![0x1B, 0x40], vec![0x1B, 0x74, 0], b"H?LLO".to_vec()]
    );
}

/// Converter whose table could not be loaded
struct Broken;

impl CharacterConverter for Broken {
    fn encode(&self, _text: &str) -> Result<Encoded, EncodingError> {
        Err(EncodingError::Unsupported("broken"))
    }

    fn select_sequence(&self) -> &[u8] {
        &[]
    }
}

#[test]
fn test_encoding_failure_writes_nothing() {
    let mut printer = Printer::with_converter(ScriptedTransport::default(), Broken);

    assert!(matches!(
        printer.print_ln("text"),
        Err(PrintError::Encoding(_))
    ));
    assert!(printer.barcode("123", BarcodeType::Code39).is_err());
    assert_eq!(printer.transport().attempts, 0);
}
