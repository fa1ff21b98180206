//! Network transport (raw TCP, usually port 9100)

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{info, instrument, warn};

use super::Transport;
use crate::error::{PrintError, PrintResult};

/// Default port for raw printing
pub const DEFAULT_PORT: u16 = 9100;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Network printer connection
///
/// Most thermal printers accept raw ESC/POS on TCP port 9100. Reads and
/// writes time out, so a silent printer cannot block a status query forever.
#[derive(Debug)]
pub struct NetworkTransport {
    addr: SocketAddr,
    stream: TcpStream,
}

impl NetworkTransport {
    /// Connect to `host:port` with the default 5 second timeout
    pub fn connect(host: &str, port: u16) -> PrintResult<Self> {
        Self::connect_addr(parse_addr(host, port)?, DEFAULT_TIMEOUT)
    }

    /// Connect to a socket address string (e.g., "192.168.1.100:9100")
    pub fn from_addr(addr: &str, timeout: Duration) -> PrintResult<Self> {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr)))?;
        Self::connect_addr(addr, timeout)
    }

    /// Connect with an explicit timeout, used for connect, read and write
    #[instrument]
    pub fn connect_addr(addr: SocketAddr, timeout: Duration) -> PrintResult<Self> {
        if timeout.is_zero() {
            return Err(PrintError::InvalidConfig("Timeout must be non-zero".into()));
        }

        info!("Connecting to printer");
        let stream = TcpStream::connect_timeout(&addr, timeout).map_err(|e| {
            if e.kind() == io::ErrorKind::TimedOut {
                PrintError::Timeout(format!("Connection timeout: {}", addr))
            } else {
                PrintError::Connection(format!("{}: {}", addr, e))
            }
        })?;

        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;
        stream.set_nodelay(true)?;

        info!("Connected");
        Ok(Self { addr, stream })
    }

    /// Get the printer address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Check whether something accepts connections at `addr`
    #[instrument]
    pub fn probe(addr: SocketAddr, timeout: Duration) -> bool {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(_) => {
                info!("Printer online");
                true
            }
            Err(e) => {
                warn!(error = %e, "Printer offline");
                false
            }
        }
    }
}

/// Resolve `host:port` into a socket address
///
/// `host` may be an IP literal or a hostname; the first resolved address wins.
pub fn parse_addr(host: &str, port: u16) -> PrintResult<SocketAddr> {
    (host, port)
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| PrintError::InvalidConfig(format!("Invalid address: {}:{}", host, port)))
}

impl Read for NetworkTransport {
    /// An expired read timeout is reported as `TimedOut` on every platform
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf).map_err(|e| match e.kind() {
            io::ErrorKind::WouldBlock => io::Error::new(io::ErrorKind::TimedOut, e),
            _ => e,
        })
    }
}

impl Write for NetworkTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

impl Transport for NetworkTransport {
    #[instrument(skip(self), fields(addr = %self.addr))]
    fn close(&mut self) -> io::Result<()> {
        self.stream.flush()?;
        match self.stream.shutdown(Shutdown::Both) {
            // Already shut down by an earlier close or by the peer
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => {
                info!("Connection closed");
                other
            }
        }
    }
}
