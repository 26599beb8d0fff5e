//! # fatcache
//!
//! A blocking client for the fatcache text protocol (memcache ASCII dialect):
//! - `set` / `get` / `delete` over a single TCP connection
//! - Response framing that tolerates arbitrary TCP chunking
//! - Length-aware `VALUE` matching (binary-safe payloads)
//! - Pluggable value codecs (JSON, bincode)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 CodecClient<C: ValueCodec>                   │
//! │              (encode on set / decode on get)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Client                                │
//! │          (typed set/get/delete, result mapping)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Protocol   │          │ Connection  │
//!   │ (encode /   │          │  + Framer   │
//!   │   match)    │          │ (TcpStream) │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use fatcache::{Client, Config};
//!
//! let mut client = Client::connect(Config::default())?;
//! client.set(b"a", b"a", 1, 0)?;
//! let item = client.get(b"a")?.expect("just stored");
//! assert_eq!(&item.payload[..], b"a");
//! assert_eq!(item.flags, 1);
//! client.delete(b"a")?;
//! assert!(client.get(b"a")?.is_none());
//! # Ok::<(), fatcache::FatcacheError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;
pub mod value;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FatcacheError, Result};
pub use config::Config;
pub use client::{Client, SharedClient};
pub use protocol::Item;
pub use value::{connect_json, BincodeCodec, CodecClient, JsonClient, JsonCodec, ValueCodec};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
