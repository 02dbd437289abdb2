//! # Network Transport
//!
//! Raw TCP printing ("JetDirect", port 9100): the printer consumes whatever
//! arrives on the socket as ESC/POS.

use std::fmt;
use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};

use tracing::{debug, instrument};

use super::params::NetworkSettings;
use super::{write_chunked, Transport, TransportKind};
use crate::error::{BuildError, TransportError};

/// Open TCP connection to a printer.
pub struct NetworkTransport {
    stream: TcpStream,
    addr: SocketAddr,
    open: bool,
}

impl NetworkTransport {
    /// Connect to `host:port`.
    ///
    /// With a timeout the connect attempt and every later write are bounded
    /// by it; without one both block.
    #[instrument(skip(settings), fields(host = %settings.host, port = settings.port))]
    pub fn open(settings: &NetworkSettings) -> Result<Self, BuildError> {
        let kind = TransportKind::Network;
        let addr = SocketAddr::from((settings.host, settings.port));

        let stream = match settings.timeout {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
            None => TcpStream::connect(addr),
        }
        .map_err(|e| BuildError::connection(kind, format!("{addr}: {e}")))?;

        stream
            .set_write_timeout(settings.timeout)
            .map_err(|e| BuildError::connection(kind, e))?;
        // Receipts are written in one burst; no point delaying small packets
        stream
            .set_nodelay(true)
            .map_err(|e| BuildError::connection(kind, e))?;

        debug!(%addr, "socket connected");
        Ok(Self {
            stream,
            addr,
            open: true,
        })
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Transport for NetworkTransport {
    #[instrument(skip(self, data), fields(addr = %self.addr, len = data.len()))]
    fn write_raw(&mut self, data: &[u8]) -> Result<(), TransportError> {
        if !self.open {
            return Err(TransportError::Unavailable("socket closed".into()));
        }
        write_chunked(&mut self.stream, data)?;
        self.stream.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        match self.stream.shutdown(Shutdown::Both) {
            // The printer may already have hung up
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other.map_err(TransportError::from),
        }
    }

    fn describe(&self) -> String {
        format!("tcp://{}", self.addr)
    }
}

impl fmt::Debug for NetworkTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkTransport")
            .field("addr", &self.addr)
            .field("open", &self.open)
            .finish()
    }
}
