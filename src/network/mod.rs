//! Network Module
//!
//! TCP connection handling and response framing.
//!
//! ## Architecture
//! - One blocking connection per client
//! - One command in flight at a time
//! - Responses framed by accumulating reads until a terminal pattern matches

mod transport;
mod framer;
mod connection;

pub use transport::Transport;
pub use framer::Framer;
pub use connection::Connection;
