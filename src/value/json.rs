//! JSON value codec

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{FatcacheError, Result};
use super::ValueCodec;

/// Stores values as JSON text (`serde_json`)
///
/// Defaults to dynamic `serde_json::Value`; any serde type works.
pub struct JsonCodec<V = serde_json::Value> {
    _value: PhantomData<fn() -> V>,
}

impl<V> JsonCodec<V> {
    pub fn new() -> Self {
        Self {
            _value: PhantomData,
        }
    }
}

impl<V> Default for JsonCodec<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for JsonCodec<V> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for JsonCodec<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JsonCodec")
    }
}

impl<V: Serialize + DeserializeOwned> ValueCodec for JsonCodec<V> {
    type Value = V;

    fn encode(&self, value: &V) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| FatcacheError::Encode(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<V> {
        serde_json::from_slice(bytes).map_err(|e| FatcacheError::Decode(e.to_string()))
    }
}
