//! Command definitions
//!
//! Represents requests sent to the server.

use crate::error::{FatcacheError, Result};
use super::Pattern;

/// Longest key the server accepts
pub const MAX_KEY_LEN: usize = 250;

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Set,
    Get,
    Delete,
}

impl CommandType {
    /// Command name as written on the wire
    pub fn name(&self) -> &'static str {
        match self {
            CommandType::Set => "set",
            CommandType::Get => "get",
            CommandType::Delete => "delete",
        }
    }

    /// Terminal response patterns valid for this command, in priority order
    pub fn expected_responses(&self) -> &'static [Pattern] {
        match self {
            CommandType::Set => &[Pattern::Stored, Pattern::NotStored],
            CommandType::Get => &[Pattern::End, Pattern::Value, Pattern::NotFound],
            CommandType::Delete => &[Pattern::NotFound, Pattern::Deleted],
        }
    }
}

/// A request borrowing its key and payload from the caller
#[derive(Debug, Clone, Copy)]
pub enum Command<'a> {
    /// Store a payload under a key
    Set {
        key: &'a [u8],
        payload: &'a [u8],
        flags: u32,
        expiry: u32,
    },

    /// Fetch a value by key
    Get { key: &'a [u8] },

    /// Remove a key
    Delete { key: &'a [u8] },
}

impl<'a> Command<'a> {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Set { .. } => CommandType::Set,
            Command::Get { .. } => CommandType::Get,
            Command::Delete { .. } => CommandType::Delete,
        }
    }

    /// The key this command addresses
    pub fn key(&self) -> &'a [u8] {
        match self {
            Command::Set { key, .. } | Command::Get { key } | Command::Delete { key } => key,
        }
    }
}

/// Reject keys that would break the whitespace/line delimited wire format
pub fn validate_key(key: &[u8]) -> Result<()> {
    if key.is_empty() {
        return Err(FatcacheError::InvalidKey("key is empty".to_string()));
    }
    if key.len() > MAX_KEY_LEN {
        return Err(FatcacheError::InvalidKey(format!(
            "key is {} bytes (max {})",
            key.len(),
            MAX_KEY_LEN
        )));
    }
    if let Some(pos) = key
        .iter()
        .position(|b| b.is_ascii_whitespace() || b.is_ascii_control())
    {
        return Err(FatcacheError::InvalidKey(format!(
            "key {:?} contains whitespace or control byte 0x{:02x} at {}",
            String::from_utf8_lossy(key),
            key[pos],
            pos
        )));
    }
    Ok(())
}
