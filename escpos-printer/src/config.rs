//! Printer configuration
//!
//! Describes which transport to open, which character table to use and how
//! to read the status byte. Usually loaded from JSON:
//!
//! ```json
//! {
//!   "transport": { "type": "network", "host": "192.168.1.100", "port": 9100 },
//!   "encoding": { "label": "iso-8859-15", "code_table": 40 },
//!   "status": { "paper_out": 32 }
//! }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::encoding::TableConverter;
use crate::error::{PrintError, PrintResult};
use crate::printer::Printer;
use crate::status::StatusLayout;
use crate::transport::{DeviceTransport, NetworkTransport, Transport};

/// Complete printer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterConfig {
    pub transport: TransportConfig,
    #[serde(default)]
    pub encoding: EncodingConfig,
    #[serde(default)]
    pub status: StatusLayout,
}

/// Where the printer is reached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransportConfig {
    /// Raw TCP printing
    Network {
        host: String,
        #[serde(default = "default_port")]
        port: u16,
        #[serde(default = "default_timeout_ms")]
        timeout_ms: u64,
    },
    /// Device node; discovered under `/dev/usb` when no path is given
    Device {
        #[serde(default)]
        path: Option<String>,
    },
    /// Windows spooler queue; default printer when no name is given
    Spooler {
        #[serde(default)]
        name: Option<String>,
    },
}

fn default_port() -> u16 {
    9100
}

fn default_timeout_ms() -> u64 {
    5000
}

/// Character table used for text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// WHATWG encoding label, or "gbk" for Chinese mode
    pub label: String,
    /// Table number sent with `ESC t` (ignored for GBK)
    pub code_table: u8,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            label: "iso-8859-15".to_string(),
            code_table: 40,
        }
    }
}

impl EncodingConfig {
    /// Build the converter this configuration describes
    pub fn converter(&self) -> PrintResult<TableConverter> {
        if self.label.eq_ignore_ascii_case("gbk") {
            return Ok(TableConverter::gbk());
        }
        Ok(TableConverter::for_label(&self.label, self.code_table)?)
    }
}

impl PrinterConfig {
    /// Parse a JSON configuration
    pub fn from_json(json: &str) -> PrintResult<Self> {
        serde_json::from_str(json).map_err(|e| PrintError::InvalidConfig(e.to_string()))
    }

    /// Open the configured transport
    #[instrument(skip(self), fields(transport = ?self.transport))]
    pub fn open_transport(&self) -> PrintResult<Box<dyn Transport>> {
        let transport: Box<dyn Transport> = match &self.transport {
            TransportConfig::Network {
                host,
                port,
                timeout_ms,
            } => {
                let addr = crate::transport::parse_addr(host, *port)?;
                let timeout = Duration::from_millis(*timeout_ms);
                Box::new(NetworkTransport::connect_addr(addr, timeout)?)
            }
            TransportConfig::Device { path: Some(path) } => Box::new(DeviceTransport::open(path)?),
            TransportConfig::Device { path: None } => Box::new(DeviceTransport::discover()?),
            #[cfg(windows)]
            TransportConfig::Spooler { name } => {
                use crate::transport::SpoolerTransport;
                let name = SpoolerTransport::resolve(name.as_deref())?;
                Box::new(SpoolerTransport::open(&name)?)
            }
            #[cfg(not(windows))]
            TransportConfig::Spooler { .. } => {
                return Err(PrintError::InvalidConfig(
                    "Spooler printing not supported on this platform".to_string(),
                ));
            }
        };

        info!("Transport opened");
        Ok(transport)
    }

    /// Open the transport and wrap it in a printer with the configured table
    ///
    /// The printer is not initialized; call `init` before printing.
    pub fn connect(&self) -> PrintResult<Printer<Box<dyn Transport>>> {
        // Validate the encoding before touching the device
        let converter = self.encoding.converter()?;
        let transport = self.open_transport()?;
        Ok(Printer::with_converter(transport, converter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::CharacterConverter;
    use crate::error::EncodingError;

    #[test]
    fn test_network_defaults() {
        let config =
            PrinterConfig::from_json(r#"{"transport": {"type": "network", "host": "10.0.0.5"}}"#)
                .unwrap();

        assert_eq!(
            config.transport,
            TransportConfig::Network {
                host: "10.0.0.5".to_string(),
                port: 9100,
                timeout_ms: 5000,
            }
        );
        assert_eq!(config.encoding, EncodingConfig::default());
        assert_eq!(config.status, StatusLayout::EPSON);
    }

    #[test]
    fn test_full_config() {
        let config = PrinterConfig::from_json(
            r#"{
                "transport": {"type": "device", "path": "/dev/usb/lp1"},
                "encoding": {"label": "gbk"},
                "status": {"paper_out": 1, "error": 0}
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.transport,
            TransportConfig::Device {
                path: Some("/dev/usb/lp1".to_string())
            }
        );
        assert_eq!(
            config.encoding.converter().unwrap().select_sequence(),
            &[0x1C, 0x26, 0x1C, 0x43, 0x01]
        );
        assert_eq!(config.status.paper_out, 1);
        assert_eq!(config.status.error, 0);
        assert_eq!(config.status.cover_open, 0x04);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            PrinterConfig::from_json(r#"{"transport": {"type": "carrier-pigeon"}}"#),
            Err(PrintError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_unknown_encoding_fails_before_connecting() {
        let config = PrinterConfig {
            transport: TransportConfig::Network {
                host: "192.0.2.1".to_string(),
                port: 9100,
                timeout_ms: 1,
            },
            encoding: EncodingConfig {
                label: "ebcdic-9000".to_string(),
                code_table: 0,
            },
            status: StatusLayout::default(),
        };

        assert!(matches!(
            config.connect(),
            Err(PrintError::Encoding(EncodingError::UnknownLabel(_)))
        ));
    }

    #[test]
    fn test_device_config_opens_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lp0");
        std::fs::write(&path, b"").unwrap();

        let config = PrinterConfig {
            transport: TransportConfig::Device {
                path: Some(path.to_string_lossy().into_owned()),
            },
            encoding: EncodingConfig::default(),
            status: StatusLayout::default(),
        };

        let mut printer = config.connect().unwrap();
        printer.init().unwrap();
        printer.close().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"\x1B@\x1Bt\x28");
    }

    #[cfg(not(windows))]
    #[test]
    fn test_spooler_unsupported() {
        let config = PrinterConfig {
            transport: TransportConfig::Spooler { name: None },
            encoding: EncodingConfig::default(),
            status: StatusLayout::default(),
        };
        assert!(matches!(
            config.open_transport(),
            Err(PrintError::InvalidConfig(_))
        ));
    }
}
