//! Connection
//!
//! One exclusively owned stream to a fatcache server, used for strictly
//! sequential request/response cycles.

use std::io::ErrorKind;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::Config;
use crate::error::{FatcacheError, Result};
use crate::protocol::{write_command, Command, ResponseMatch};
use super::{Framer, Transport};

/// A single client connection
pub struct Connection<T: Transport = TcpStream> {
    /// Underlying byte stream
    stream: T,

    /// Response framing settings
    framer: Framer,

    /// Peer address for logging
    peer_addr: String,

    /// Cleared on close or after any fatal error
    open: bool,
}

impl Connection<TcpStream> {
    /// Connect to the server described by `config`
    ///
    /// Sets TCP_NODELAY and the write timeout; the read timeout is applied
    /// per response by the framer.
    pub fn open(config: &Config) -> Result<Self> {
        config.validate()?;

        let stream = connect_tcp(config)?;
        stream.set_nodelay(config.nodelay)?;
        stream.set_write_timeout(config.write_timeout())?;

        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| config.addr());

        tracing::debug!("Connected to fatcache at {}", peer_addr);

        Ok(Self::with_transport(stream, Framer::from_config(config), peer_addr))
    }
}

impl<T: Transport> Connection<T> {
    /// Wrap an already established stream
    pub fn with_transport(stream: T, framer: Framer, peer_addr: impl Into<String>) -> Self {
        Self {
            stream,
            framer,
            peer_addr: peer_addr.into(),
            open: true,
        }
    }

    /// Send one command and wait for its terminal response
    ///
    /// Any fatal error closes the connection; later calls then fail with
    /// `ConnectionClosed`.
    pub fn request(
        &mut self,
        command: &Command<'_>,
        timeout: Option<Duration>,
    ) -> Result<ResponseMatch> {
        if !self.open {
            return Err(FatcacheError::ConnectionClosed);
        }

        tracing::trace!(
            "Sending {} for key {:?} to {}",
            command.command_type().name(),
            String::from_utf8_lossy(command.key()),
            self.peer_addr
        );

        self.round_trip(command, timeout).map_err(|e| {
            if e.is_fatal() {
                self.fail(e)
            } else {
                e
            }
        })
    }

    /// Close after an error that leaves the stream out of sync, handing the
    /// error back to the caller
    pub(crate) fn fail(&mut self, err: FatcacheError) -> FatcacheError {
        tracing::warn!("Closing connection to {} after error: {}", self.peer_addr, err);
        let _ = self.close();
        err
    }

    fn round_trip(
        &mut self,
        command: &Command<'_>,
        timeout: Option<Duration>,
    ) -> Result<ResponseMatch> {
        write_command(&mut self.stream, command).map_err(|e| match e {
            FatcacheError::Io(ref io_err)
                if matches!(
                    io_err.kind(),
                    ErrorKind::BrokenPipe | ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted
                ) =>
            {
                FatcacheError::ConnectionClosed
            }
            FatcacheError::Io(ref io_err)
                if matches!(io_err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
            {
                FatcacheError::Timeout
            }
            other => other,
        })?;

        self.framer.await_response(
            &mut self.stream,
            command.command_type().expected_responses(),
            timeout,
        )
    }

    /// Close the connection (idempotent)
    pub fn close(&mut self) -> Result<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        tracing::debug!("Closing connection to {}", self.peer_addr);
        self.stream.close()?;
        Ok(())
    }

    /// Whether the connection can still carry commands
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Borrow the underlying stream
    pub fn get_ref(&self) -> &T {
        &self.stream
    }
}

impl<T: Transport> Drop for Connection<T> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Resolve `host:port` and connect, honoring the connect timeout if set
fn connect_tcp(config: &Config) -> Result<TcpStream> {
    let addr = config.addr();

    let timeout = match config.connect_timeout() {
        Some(timeout) => timeout,
        None => return Ok(TcpStream::connect(&addr)?),
    };

    let mut last_err = None;
    for sock_addr in addr.to_socket_addrs()? {
        match TcpStream::connect_timeout(&sock_addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }

    Err(match last_err {
        Some(e) => e.into(),
        None => FatcacheError::Config(format!("{} resolved to no addresses", addr)),
    })
}
