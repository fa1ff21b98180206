//! Character device transport (USB/parallel line printers)
//!
//! On Linux the `usblp` driver exposes printers as `/dev/usb/lp*`. Writing to
//! the node sends bytes to the bulk OUT endpoint; reading returns whatever
//! the printer answered.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use super::Transport;
use crate::error::{PrintError, PrintResult};

/// Directory scanned by [`DeviceTransport::discover`]
pub const USB_DEVICE_DIR: &str = "/dev/usb";

/// Printer reached through a device node
#[derive(Debug)]
pub struct DeviceTransport {
    path: PathBuf,
    file: File,
}

impl DeviceTransport {
    /// Open a device node for reading and writing
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> PrintResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().read(true).write(true).open(&path)?;
        info!("Device opened");
        Ok(Self { path, file })
    }

    /// Open the first `lp*` node under `/dev/usb`
    pub fn discover() -> PrintResult<Self> {
        Self::discover_in(USB_DEVICE_DIR)
    }

    /// Open the first `lp*` node (in name order) under `dir`
    #[instrument(skip(dir), fields(dir = %dir.as_ref().display()))]
    pub fn discover_in(dir: impl AsRef<Path>) -> PrintResult<Self> {
        let entries = match fs::read_dir(dir.as_ref()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PrintError::NoDevicesFound);
            }
            Err(e) => return Err(e.into()),
        };

        let mut candidates = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_name().to_string_lossy().starts_with("lp") {
                candidates.push(entry.path());
            }
        }
        candidates.sort();
        debug!(count = candidates.len(), "Device candidates");

        let first = candidates.first().ok_or(PrintError::NoDevicesFound)?;
        Self::open(first)
    }

    /// Path of the opened device node
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Read for DeviceTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for DeviceTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Transport for DeviceTransport {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_picks_first_lp_node() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("lp1"), b"").unwrap();
        fs::write(dir.path().join("lp0"), b"").unwrap();
        fs::write(dir.path().join("hiddev0"), b"").unwrap();

        let mut transport = DeviceTransport::discover_in(dir.path()).unwrap();
        assert_eq!(transport.path(), dir.path().join("lp0"));

        transport.write_all(b"\x1B@").unwrap();
        transport.close().unwrap();
        assert_eq!(fs::read(dir.path().join("lp0")).unwrap(), b"\x1B@");
    }

    #[test]
    fn test_discover_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ttyS0"), b"").unwrap();

        assert!(matches!(
            DeviceTransport::discover_in(dir.path()),
            Err(PrintError::NoDevicesFound)
        ));
    }

    #[test]
    fn test_discover_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            DeviceTransport::discover_in(dir.path().join("usb")),
            Err(PrintError::NoDevicesFound)
        ));
    }

    #[test]
    fn test_open_missing_device() {
        assert!(matches!(
            DeviceTransport::open("/nonexistent/lp0"),
            Err(PrintError::Io(_))
        ));
    }
}
