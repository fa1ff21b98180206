//! Windows spooler transport
//!
//! Sends bytes through an installed printer driver as a RAW document. The
//! document and page are opened with the transport and ended on close, so
//! everything written in between becomes one print job.

use core::ffi::c_void;
use std::io::{self, Read, Write};

use tracing::{info, instrument, warn};
use windows::Win32::Graphics::Printing::{
    ClosePrinter, DOC_INFO_1W, EndDocPrinter, EndPagePrinter, OpenPrinterW, PRINTER_HANDLE,
    StartDocPrinterW, StartPagePrinter, WritePrinter,
};
use windows::core::{PCWSTR, PWSTR};

use super::Transport;
use crate::error::{PrintError, PrintResult};

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Open RAW print job on a spooler queue
pub struct SpoolerTransport {
    name: String,
    handle: PRINTER_HANDLE,
    open: bool,
}

impl SpoolerTransport {
    /// Open a printer by name and start a RAW document
    #[instrument]
    pub fn open(name: &str) -> PrintResult<Self> {
        let name_w = to_wide(name);
        let mut handle = PRINTER_HANDLE::default();

        unsafe {
            OpenPrinterW(PCWSTR::from_raw(name_w.as_ptr()), &mut handle, None)
                .map_err(|_| PrintError::Spooler("OpenPrinterW failed".to_string()))?;

            let doc_name_w = to_wide("Receipt");
            let datatype_w = to_wide("RAW");
            let doc_info = DOC_INFO_1W {
                pDocName: PWSTR(doc_name_w.as_ptr() as *mut _),
                pOutputFile: PWSTR::null(),
                pDatatype: PWSTR(datatype_w.as_ptr() as *mut _),
            };

            if StartDocPrinterW(handle, 1, &doc_info as *const DOC_INFO_1W) == 0 {
                let _ = ClosePrinter(handle);
                return Err(PrintError::Spooler("StartDocPrinter failed".to_string()));
            }

            if !StartPagePrinter(handle).as_bool() {
                let _ = EndDocPrinter(handle);
                let _ = ClosePrinter(handle);
                return Err(PrintError::Spooler("StartPagePrinter failed".to_string()));
            }
        }

        info!("Spooler document started");
        Ok(Self {
            name: name.to_string(),
            handle,
            open: true,
        })
    }

    /// Open the default printer, or the first one available
    pub fn open_default() -> PrintResult<Self> {
        Self::open(&Self::resolve(None)?)
    }

    /// Get the printer name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Installed printers that drive real hardware
    ///
    /// Queues on virtual ports (PDF, XPS, OneNote, file output) are skipped.
    pub fn list() -> PrintResult<Vec<String>> {
        Ok(installed_queues()?
            .into_iter()
            .filter(|(_, port)| !is_virtual_port(port))
            .map(|(name, _)| name)
            .collect())
    }

    /// Name of the system default printer, if one is set
    pub fn default_printer() -> PrintResult<Option<String>> {
        use windows::Win32::Graphics::Printing::GetDefaultPrinterW;

        let mut len: u32 = 0;
        unsafe {
            let _ = GetDefaultPrinterW(None, &mut len);
        }
        if len == 0 {
            return Ok(None);
        }

        let mut name = vec![0u16; len as usize];
        let found = unsafe { GetDefaultPrinterW(Some(PWSTR(name.as_mut_ptr())), &mut len) };
        if !found.as_bool() {
            return Ok(None);
        }

        let end = name.iter().position(|&c| c == 0).unwrap_or(name.len());
        String::from_utf16(&name[..end])
            .map(Some)
            .map_err(|e| PrintError::Spooler(format!("Bad printer name: {}", e)))
    }

    /// Pick a printer: the named one if installed, else default, else first
    pub fn resolve(name: Option<&str>) -> PrintResult<String> {
        let printers = Self::list()?;

        if let Some(name) = name {
            if printers.iter().any(|p| p == name) {
                return Ok(name.to_string());
            }
            return Err(PrintError::Spooler(format!("Printer not found: {}", name)));
        }

        if let Some(default) = Self::default_printer()? {
            return Ok(default);
        }

        printers.first().cloned().ok_or(PrintError::NoDevicesFound)
    }

    /// End page and document, then release the handle
    ///
    /// All three calls are made even if one fails; the first failure is
    /// returned.
    fn finish(&mut self) -> io::Result<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;

        let (page, doc, close) = unsafe {
            (
                EndPagePrinter(self.handle).as_bool(),
                EndDocPrinter(self.handle).as_bool(),
                ClosePrinter(self.handle).is_ok(),
            )
        };

        first_failure(&[
            (page, "EndPagePrinter"),
            (doc, "EndDocPrinter"),
            (close, "ClosePrinter"),
        ])
        .inspect_err(|e| warn!(printer = %self.name, error = %e, "Spooler job not committed"))?;

        info!(printer = %self.name, "Spooler document ended");
        Ok(())
    }
}

fn first_failure(steps: &[(bool, &str)]) -> io::Result<()> {
    match steps.iter().find(|(ok, _)| !ok) {
        Some((_, call)) => Err(io::Error::other(format!("{} failed", call))),
        None => Ok(()),
    }
}

/// `(name, port)` of every local and connected queue
fn installed_queues() -> PrintResult<Vec<(String, String)>> {
    use windows::Win32::Graphics::Printing::{
        EnumPrintersW, PRINTER_ENUM_CONNECTIONS, PRINTER_ENUM_LOCAL, PRINTER_INFO_5W,
    };

    const LEVEL: u32 = 5;
    let flags = PRINTER_ENUM_LOCAL | PRINTER_ENUM_CONNECTIONS;
    let mut size: u32 = 0;
    let mut count: u32 = 0;

    // First call only reports the buffer size
    unsafe {
        let _ = EnumPrintersW(flags, None, LEVEL, None, &mut size, &mut count);
    }
    if size == 0 {
        return Ok(Vec::new());
    }

    let mut buf = vec![0u8; size as usize];
    let infos = unsafe {
        EnumPrintersW(flags, None, LEVEL, Some(buf.as_mut_slice()), &mut size, &mut count)
            .map_err(|_| PrintError::Spooler("EnumPrintersW failed".to_string()))?;
        std::slice::from_raw_parts(buf.as_ptr() as *const PRINTER_INFO_5W, count as usize)
    };

    Ok(infos
        .iter()
        .filter(|info| !info.pPrinterName.is_null())
        .map(|info| (wide(info.pPrinterName), wide(info.pPortName)))
        .collect())
}

/// Copy a NUL-terminated wide string; null and undecodable become empty
fn wide(s: PWSTR) -> String {
    if s.is_null() {
        return String::new();
    }
    unsafe { s.to_string() }.unwrap_or_default()
}

/// Port name prefixes of virtual printers
const VIRTUAL_PORTS: [&str; 6] = ["file:", "portprompt:", "xpsport:", "nul:", "onenote", "wfsport:"];

fn is_virtual_port(port: &str) -> bool {
    let port = port.to_ascii_lowercase();
    VIRTUAL_PORTS.iter().any(|prefix| port.starts_with(prefix))
}

impl Read for SpoolerTransport {
    /// The spooler has no back channel; reads see end of stream
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Ok(0)
    }
}

impl Write for SpoolerTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.open {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "spooler document already ended",
            ));
        }

        let mut written: u32 = 0;
        let ok = unsafe {
            WritePrinter(
                self.handle,
                buf.as_ptr() as *const c_void,
                buf.len() as u32,
                &mut written,
            )
        };

        if !ok.as_bool() {
            return Err(io::Error::other("WritePrinter failed"));
        }
        Ok(written as usize)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for SpoolerTransport {
    fn close(&mut self) -> io::Result<()> {
        self.finish()
    }
}

impl Drop for SpoolerTransport {
    fn drop(&mut self) {
        if self.open {
            warn!(printer = %self.name, "Spooler transport dropped without close");
            let _ = self.finish();
        }
    }
}
