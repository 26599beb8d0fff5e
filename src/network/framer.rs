//! Response Framer
//!
//! Turns a stream of arbitrarily chunked reads into one recognized terminal
//! response.

use std::io::ErrorKind;
use std::time::{Duration, Instant};

use bytes::BytesMut;

use crate::config::Config;
use crate::error::{FatcacheError, Result};
use crate::protocol::{match_response, Pattern, ResponseMatch};
use super::Transport;

/// Accumulates reads until the whole buffer matches a candidate pattern
#[derive(Debug, Clone, Copy)]
pub struct Framer {
    /// Max bytes requested per read
    chunk_size: usize,

    /// Max bytes buffered before the response is rejected
    max_response_size: usize,
}

impl Framer {
    /// Create a framer; a `chunk_size` of 0 is treated as 1
    pub fn new(chunk_size: usize, max_response_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            max_response_size,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.chunk_size, config.max_response_size)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Block until the response to the command just sent is complete
    ///
    /// The raw buffer lives only for this call, so nothing read here can
    /// leak into the next command. `timeout` bounds the whole response, not
    /// each read.
    pub fn await_response<T: Transport + ?Sized>(
        &self,
        stream: &mut T,
        patterns: &[Pattern],
        timeout: Option<Duration>,
    ) -> Result<ResponseMatch> {
        let deadline = timeout.map(|t| Instant::now() + t);
        if deadline.is_none() {
            stream.set_read_timeout(None)?;
        }

        let mut buffer = BytesMut::with_capacity(self.chunk_size);
        let mut chunk = vec![0u8; self.chunk_size];

        loop {
            if let Some(deadline) = deadline {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    tracing::trace!(buffered = buffer.len(), "response deadline elapsed");
                    return Err(FatcacheError::Timeout);
                }
                stream.set_read_timeout(Some(remaining))?;
            }

            let read = match stream.read(&mut chunk) {
                Ok(0) => {
                    tracing::trace!(buffered = buffer.len(), "peer closed mid-response");
                    return Err(FatcacheError::ConnectionClosed);
                }
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                // Unix reports an expired read timeout as WouldBlock, Windows as TimedOut
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    return Err(FatcacheError::Timeout);
                }
                Err(e)
                    if matches!(
                        e.kind(),
                        ErrorKind::ConnectionReset
                            | ErrorKind::ConnectionAborted
                            | ErrorKind::UnexpectedEof
                    ) =>
                {
                    tracing::trace!(error = %e, "connection dropped mid-response");
                    return Err(FatcacheError::ConnectionClosed);
                }
                Err(e) => return Err(e.into()),
            };

            buffer.extend_from_slice(&chunk[..read]);

            if let Some(response) = match_response(&mut buffer, patterns)? {
                tracing::trace!(pattern = ?response.pattern(), "response framed");
                return Ok(response);
            }

            if buffer.len() > self.max_response_size {
                return Err(FatcacheError::ProtocolMismatch(format!(
                    "response exceeds {} bytes",
                    self.max_response_size
                )));
            }
        }
    }
}

impl Default for Framer {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
