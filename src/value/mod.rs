//! Value Codec Module
//!
//! Structured values on top of the byte-level [`Client`].
//!
//! A [`CodecClient`] pairs a client with a [`ValueCodec`]: `set` encodes
//! before storing, `get` decodes after fetching. A stored null-like value
//! (`serde_json::Value::Null`, `Option::None`) comes back as
//! `Some((null, flags))`, while a cache miss is `None`.

mod json;
mod binary;

pub use json::JsonCodec;
pub use binary::BincodeCodec;

use std::net::TcpStream;
use std::time::Duration;

use crate::client::Client;
use crate::config::Config;
use crate::error::Result;
use crate::network::Transport;

/// Encode/decode pair translating values to and from payload bytes
pub trait ValueCodec {
    type Value;

    /// Fails with `FatcacheError::Encode` if the value is not representable
    fn encode(&self, value: &Self::Value) -> Result<Vec<u8>>;

    /// Fails with `FatcacheError::Decode` on malformed input
    fn decode(&self, bytes: &[u8]) -> Result<Self::Value>;
}

/// A client storing `C::Value`s instead of raw bytes
pub struct CodecClient<C: ValueCodec, T: Transport = TcpStream> {
    client: Client<T>,
    codec: C,
}

/// JSON client over dynamic `serde_json::Value`s
pub type JsonClient<T = TcpStream> = CodecClient<JsonCodec, T>;

/// Connect a JSON client (the usual way to talk to fatcache)
pub fn connect_json(config: Config) -> Result<JsonClient> {
    CodecClient::connect(config, JsonCodec::new())
}

impl<C: ValueCodec> CodecClient<C, TcpStream> {
    pub fn connect(config: Config, codec: C) -> Result<Self> {
        Ok(Self::new(Client::connect(config)?, codec))
    }
}

impl<C: ValueCodec, T: Transport> CodecClient<C, T> {
    pub fn new(client: Client<T>, codec: C) -> Self {
        Self { client, codec }
    }

    /// Encode `value` and store it under `key`
    pub fn set(&mut self, key: &[u8], value: &C::Value, flags: u32, expiry: u32) -> Result<()> {
        let timeout = self.client.read_timeout();
        self.set_with_timeout(key, value, flags, expiry, timeout)
    }

    pub fn set_with_timeout(
        &mut self,
        key: &[u8],
        value: &C::Value,
        flags: u32,
        expiry: u32,
        timeout: Option<Duration>,
    ) -> Result<()> {
        let payload = self.codec.encode(value)?;
        self.client
            .set_with_timeout(key, &payload, flags, expiry, timeout)
    }

    /// Fetch and decode the value under `key`, with its flags
    pub fn get(&mut self, key: &[u8]) -> Result<Option<(C::Value, u32)>> {
        let timeout = self.client.read_timeout();
        self.get_with_timeout(key, timeout)
    }

    pub fn get_with_timeout(
        &mut self,
        key: &[u8],
        timeout: Option<Duration>,
    ) -> Result<Option<(C::Value, u32)>> {
        match self.client.get_with_timeout(key, timeout)? {
            Some(item) => Ok(Some((self.codec.decode(&item.payload)?, item.flags))),
            None => Ok(None),
        }
    }

    pub fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.client.delete(key)
    }

    pub fn delete_with_timeout(&mut self, key: &[u8], timeout: Option<Duration>) -> Result<()> {
        self.client.delete_with_timeout(key, timeout)
    }

    pub fn close(&mut self) -> Result<()> {
        self.client.close()
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Access the byte-level client, e.g. for raw payloads
    pub fn client_mut(&mut self) -> &mut Client<T> {
        &mut self.client
    }

    pub fn into_inner(self) -> Client<T> {
        self.client
    }
}
