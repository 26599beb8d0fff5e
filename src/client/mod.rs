//! Command Client
//!
//! Typed `set` / `get` / `delete` over one owned connection.
//!
//! ## Result Mapping
//! | Command | Response      | Result                       |
//! |---------|---------------|------------------------------|
//! | set     | `STORED`      | `Ok(())`                     |
//! | set     | `NOT_STORED`  | `Err(SetRejected)`           |
//! | get     | `VALUE`       | `Ok(Some(Item))` (key check) |
//! | get     | `END`/`NOT_FOUND` | `Ok(None)`               |
//! | delete  | `DELETED`/`NOT_FOUND` | `Ok(())`             |

mod shared;

pub use shared::SharedClient;

use std::net::TcpStream;
use std::time::Duration;

use crate::config::Config;
use crate::error::{FatcacheError, Result};
use crate::network::{Connection, Transport};
use crate::protocol::{validate_key, Command, Item, ResponseMatch};

/// Blocking client for one fatcache connection
pub struct Client<T: Transport = TcpStream> {
    /// The owned connection
    conn: Connection<T>,

    /// Read timeout used by the non-`_with_timeout` operations
    read_timeout: Option<Duration>,
}

impl Client<TcpStream> {
    /// Connect using `config`
    pub fn connect(config: Config) -> Result<Self> {
        let conn = Connection::open(&config)?;
        Ok(Self::from_connection(conn, config.read_timeout()))
    }
}

impl<T: Transport> Client<T> {
    /// Build a client over an existing connection
    pub fn from_connection(conn: Connection<T>, read_timeout: Option<Duration>) -> Self {
        Self { conn, read_timeout }
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Store `payload` under `key`
    pub fn set(&mut self, key: &[u8], payload: &[u8], flags: u32, expiry: u32) -> Result<()> {
        self.set_with_timeout(key, payload, flags, expiry, self.read_timeout)
    }

    pub fn set_with_timeout(
        &mut self,
        key: &[u8],
        payload: &[u8],
        flags: u32,
        expiry: u32,
        timeout: Option<Duration>,
    ) -> Result<()> {
        validate_key(key)?;
        let command = Command::Set {
            key,
            payload,
            flags,
            expiry,
        };

        match self.conn.request(&command, timeout)? {
            ResponseMatch::Stored => Ok(()),
            ResponseMatch::NotStored => Err(FatcacheError::SetRejected {
                key: String::from_utf8_lossy(key).into_owned(),
                flags,
                expiry,
                bytes: payload.len(),
            }),
            other => Err(self.unexpected("set", &other)),
        }
    }

    /// Fetch the value stored under `key`; `None` if absent
    pub fn get(&mut self, key: &[u8]) -> Result<Option<Item>> {
        self.get_with_timeout(key, self.read_timeout)
    }

    pub fn get_with_timeout(
        &mut self,
        key: &[u8],
        timeout: Option<Duration>,
    ) -> Result<Option<Item>> {
        validate_key(key)?;

        match self.conn.request(&Command::Get { key }, timeout)? {
            ResponseMatch::End | ResponseMatch::NotFound => Ok(None),
            ResponseMatch::Value {
                key: echoed,
                flags,
                payload,
            } => {
                // Not pipelined, so a different key means the stream is out of sync
                if &echoed[..] != key {
                    return Err(self.conn.fail(FatcacheError::ProtocolMismatch(format!(
                        "requested key {:?} but server returned {:?}",
                        String::from_utf8_lossy(key),
                        String::from_utf8_lossy(&echoed)
                    ))));
                }
                Ok(Some(Item { payload, flags }))
            }
            other => Err(self.unexpected("get", &other)),
        }
    }

    /// Delete `key`; succeeds whether or not it existed
    pub fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.delete_with_timeout(key, self.read_timeout)
    }

    pub fn delete_with_timeout(&mut self, key: &[u8], timeout: Option<Duration>) -> Result<()> {
        validate_key(key)?;

        match self.conn.request(&Command::Delete { key }, timeout)? {
            ResponseMatch::Deleted | ResponseMatch::NotFound => Ok(()),
            other => Err(self.unexpected("delete", &other)),
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Close the connection; further commands fail with `ConnectionClosed`
    pub fn close(&mut self) -> Result<()> {
        self.conn.close()
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_open()
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout
    }

    /// Change the read timeout used by `set`, `get` and `delete`
    pub fn set_read_timeout(&mut self, timeout: Option<Duration>) {
        self.read_timeout = timeout;
    }

    pub fn connection(&self) -> &Connection<T> {
        &self.conn
    }

    /// The framer only returns patterns the command asked for, so this is
    /// unreachable unless the pattern tables and this mapping drift apart.
    fn unexpected(&mut self, command: &str, response: &ResponseMatch) -> FatcacheError {
        self.conn.fail(FatcacheError::ProtocolMismatch(format!(
            "unexpected {:?} response to {}",
            response.pattern(),
            command
        )))
    }
}
