//! Shared client
//!
//! A client handle that can be cloned across threads. The lock is held for
//! the full request/response cycle since responses carry no request ids.

use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::Result;
use crate::network::Transport;
use crate::protocol::Item;
use super::Client;

/// Cloneable handle serializing commands onto one connection
pub struct SharedClient<T: Transport = TcpStream> {
    inner: Arc<Mutex<Client<T>>>,
}

impl SharedClient<TcpStream> {
    pub fn connect(config: Config) -> Result<Self> {
        Ok(Self::new(Client::connect(config)?))
    }
}

impl<T: Transport> SharedClient<T> {
    pub fn new(client: Client<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(client)),
        }
    }

    pub fn set(&self, key: &[u8], payload: &[u8], flags: u32, expiry: u32) -> Result<()> {
        self.inner.lock().set(key, payload, flags, expiry)
    }

    pub fn set_with_timeout(
        &self,
        key: &[u8],
        payload: &[u8],
        flags: u32,
        expiry: u32,
        timeout: Option<Duration>,
    ) -> Result<()> {
        self.inner
            .lock()
            .set_with_timeout(key, payload, flags, expiry, timeout)
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Item>> {
        self.inner.lock().get(key)
    }

    pub fn get_with_timeout(&self, key: &[u8], timeout: Option<Duration>) -> Result<Option<Item>> {
        self.inner.lock().get_with_timeout(key, timeout)
    }

    pub fn delete(&self, key: &[u8]) -> Result<()> {
        self.inner.lock().delete(key)
    }

    pub fn delete_with_timeout(&self, key: &[u8], timeout: Option<Duration>) -> Result<()> {
        self.inner.lock().delete_with_timeout(key, timeout)
    }

    pub fn close(&self) -> Result<()> {
        self.inner.lock().close()
    }

    pub fn is_open(&self) -> bool {
        self.inner.lock().is_open()
    }

    /// Run several commands without other handles interleaving
    pub fn with_client<R>(&self, f: impl FnOnce(&mut Client<T>) -> R) -> R {
        let mut client = self.inner.lock();
        f(&mut *client)
    }
}

impl<T: Transport> Clone for SharedClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
