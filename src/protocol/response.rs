//! Response definitions
//!
//! Terminal response shapes and the matched result handed back to callers.

use bytes::Bytes;

/// A terminal response shape a command may wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// `STORED\r\n`
    Stored,
    /// `NOT_STORED\r\n`
    NotStored,
    /// `DELETED\r\n`
    Deleted,
    /// `NOT_FOUND\r\n`
    NotFound,
    /// `END\r\n`
    End,
    /// `VALUE <key> <flags> <bytes>\r\n<payload>\r\nEND\r\n`
    Value,
}

impl Pattern {
    /// The full line for single-token responses (without CRLF)
    pub fn token(&self) -> Option<&'static [u8]> {
        match self {
            Pattern::Stored => Some(b"STORED"),
            Pattern::NotStored => Some(b"NOT_STORED"),
            Pattern::Deleted => Some(b"DELETED"),
            Pattern::NotFound => Some(b"NOT_FOUND"),
            Pattern::End => Some(b"END"),
            Pattern::Value => None,
        }
    }
}

/// A fully framed response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseMatch {
    Stored,
    NotStored,
    Deleted,
    NotFound,
    /// Empty result terminator for GET
    End,
    /// A single value; `key` is the key echoed by the server
    Value { key: Bytes, flags: u32, payload: Bytes },
}

impl ResponseMatch {
    /// The pattern this match was produced by
    pub fn pattern(&self) -> Pattern {
        match self {
            ResponseMatch::Stored => Pattern::Stored,
            ResponseMatch::NotStored => Pattern::NotStored,
            ResponseMatch::Deleted => Pattern::Deleted,
            ResponseMatch::NotFound => Pattern::NotFound,
            ResponseMatch::End => Pattern::End,
            ResponseMatch::Value { .. } => Pattern::Value,
        }
    }

    /// Match for a single-token pattern; `None` for `Pattern::Value`
    pub(crate) fn from_token(pattern: Pattern) -> Option<Self> {
        match pattern {
            Pattern::Stored => Some(ResponseMatch::Stored),
            Pattern::NotStored => Some(ResponseMatch::NotStored),
            Pattern::Deleted => Some(ResponseMatch::Deleted),
            Pattern::NotFound => Some(ResponseMatch::NotFound),
            Pattern::End => Some(ResponseMatch::End),
            Pattern::Value => None,
        }
    }
}

/// A value returned by GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Raw payload bytes
    pub payload: Bytes,

    /// Client flags stored alongside the payload
    pub flags: u32,
}
