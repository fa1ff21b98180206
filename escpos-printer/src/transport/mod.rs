//! Byte transports to the printer
//!
//! The printer façade only needs a blocking byte stream it can close:
//! - Network printers (TCP port 9100)
//! - Character devices such as `/dev/usb/lp0`
//! - Windows spooler queues (RAW documents)
//!
//! Anything else implementing `Read + Write` can join by implementing
//! [`Transport`].

mod device;
mod network;
#[cfg(windows)]
mod spooler;

use std::io;

pub use device::DeviceTransport;
pub use network::{DEFAULT_PORT, NetworkTransport, parse_addr};
#[cfg(windows)]
pub use spooler::SpoolerTransport;

/// Blocking, ordered byte stream to a printer
///
/// Writes must reach the device in the order they were issued. `close` may be
/// called more than once; calls after the first should be harmless.
pub trait Transport: io::Read + io::Write {
    /// Release the underlying device
    fn close(&mut self) -> io::Result<()> {
        self.flush()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}
