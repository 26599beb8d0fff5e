//! Protocol Module
//!
//! Defines the fatcache text protocol (memcache ASCII dialect).
//!
//! ### Commands
//! - `set <key> <flags> <expiry> <bytes>` followed by the payload line
//! - `get <key>`
//! - `delete <key>`
//!
//! ### Terminal Responses
//! | Command | Patterns (priority order)          |
//! |---------|------------------------------------|
//! | set     | `STORED`, `NOT_STORED`             |
//! | get     | `END`, `VALUE ... END`, `NOT_FOUND`|
//! | delete  | `NOT_FOUND`, `DELETED`             |

mod command;
mod response;
mod codec;

pub use command::{validate_key, Command, CommandType, MAX_KEY_LEN};
pub use response::{Item, Pattern, ResponseMatch};
pub use codec::{
    encode_command, match_response, write_command, CRLF, MAX_LINE_LEN, MAX_PAYLOAD_SIZE,
};
