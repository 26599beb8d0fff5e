//! Bincode value codec
//!
//! Compact binary encoding for typed values. Bincode is not self-describing,
//! so `V` must be a concrete type (not `serde_json::Value`).

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{FatcacheError, Result};
use super::ValueCodec;

/// Stores values in bincode's binary format
pub struct BincodeCodec<V> {
    _value: PhantomData<fn() -> V>,
}

impl<V> BincodeCodec<V> {
    pub fn new() -> Self {
        Self {
            _value: PhantomData,
        }
    }
}

impl<V> Default for BincodeCodec<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for BincodeCodec<V> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for BincodeCodec<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BincodeCodec")
    }
}

impl<V: Serialize + DeserializeOwned> ValueCodec for BincodeCodec<V> {
    type Value = V;

    fn encode(&self, value: &V) -> Result<Vec<u8>> {
        bincode::serialize(value).map_err(|e| FatcacheError::Encode(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<V> {
        bincode::deserialize(bytes).map_err(|e| FatcacheError::Decode(e.to_string()))
    }
}
