//! Protocol codec
//!
//! Encoding of requests and full-buffer matching of responses.
//!
//! ## Wire Format
//!
//! ### Requests
//! ```text
//! set <key> <flags> <expiry> <bytes>\r\n<payload>\r\n
//! get <key>\r\n
//! delete <key>\r\n
//! ```
//!
//! ### Responses
//! ```text
//! STORED\r\n | NOT_STORED\r\n | DELETED\r\n | NOT_FOUND\r\n | END\r\n
//! VALUE <key> <flags> <bytes>\r\n<payload>\r\nEND\r\n
//! ```
//!
//! A response only matches when the *whole* buffer is exactly one frame. For
//! `VALUE` the declared byte count decides where the payload ends, so payloads
//! that contain `\r\nEND\r\n` are framed correctly.

use std::io::Write;
use std::ops::Range;

use bytes::BytesMut;

use crate::error::{FatcacheError, Result};
use super::{Command, Pattern, ResponseMatch};

/// Line terminator
pub const CRLF: &[u8] = b"\r\n";

/// Maximum length of a response line before CRLF must have been seen
pub const MAX_LINE_LEN: usize = 2048;

/// Maximum payload size a `VALUE` header may declare (16 MB)
pub const MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

const VALUE_PREFIX: &[u8] = b"VALUE ";
const VALUE_TRAILER: &[u8] = b"\r\nEND\r\n";

// =============================================================================
// Command Encoding
// =============================================================================

/// Encode a command to bytes
pub fn encode_command(command: &Command<'_>) -> Vec<u8> {
    let name = command.command_type().name().as_bytes();

    match command {
        Command::Set {
            key,
            payload,
            flags,
            expiry,
        } => {
            let header = format!(" {} {} {}\r\n", flags, expiry, payload.len());
            let mut message =
                Vec::with_capacity(name.len() + 1 + key.len() + header.len() + payload.len() + 2);
            message.extend_from_slice(name);
            message.push(b' ');
            message.extend_from_slice(key);
            message.extend_from_slice(header.as_bytes());
            message.extend_from_slice(payload);
            message.extend_from_slice(CRLF);
            message
        }
        Command::Get { key } | Command::Delete { key } => {
            let mut message = Vec::with_capacity(name.len() + 1 + key.len() + 2);
            message.extend_from_slice(name);
            message.push(b' ');
            message.extend_from_slice(key);
            message.extend_from_slice(CRLF);
            message
        }
    }
}

/// Write a command to a stream
pub fn write_command<W: Write + ?Sized>(writer: &mut W, command: &Command<'_>) -> Result<()> {
    let bytes = encode_command(command);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Response Matching
// =============================================================================

/// Parsed `VALUE` header line
struct ValueHeader {
    key: Range<usize>,
    flags: u32,
    bytes: usize,
}

/// Test the accumulated buffer against `patterns` in priority order
///
/// Returns `Ok(None)` while the buffer is still a valid prefix of a frame.
/// On a match the frame is split off the buffer, leaving it empty.
///
/// Fails as soon as the first line is complete and no candidate can accept
/// it, or when bytes follow a complete frame.
pub fn match_response(
    buffer: &mut BytesMut,
    patterns: &[Pattern],
) -> Result<Option<ResponseMatch>> {
    // A trailing '\r' may be the first half of the terminator
    let line_end = match find_crlf(buffer) {
        Some(pos) => pos,
        None if buffer.len() - usize::from(buffer.ends_with(b"\r")) > MAX_LINE_LEN => {
            return Err(line_too_long());
        }
        None => return Ok(None),
    };
    if line_end > MAX_LINE_LEN {
        return Err(line_too_long());
    }

    let line = &buffer[..line_end];
    let body_start = line_end + CRLF.len();

    for &pattern in patterns {
        if pattern == Pattern::Value {
            let header = match parse_value_header(line)? {
                Some(header) => header,
                None => continue,
            };

            let payload_end = body_start + header.bytes;
            let frame_len = payload_end + VALUE_TRAILER.len();
            if buffer.len() < frame_len {
                return Ok(None);
            }
            check_trailing(buffer.len(), frame_len)?;

            if &buffer[payload_end..frame_len] != VALUE_TRAILER {
                return Err(FatcacheError::ProtocolMismatch(format!(
                    "value of {} bytes is not followed by \\r\\nEND\\r\\n",
                    header.bytes
                )));
            }

            let frame = buffer.split_to(frame_len).freeze();
            return Ok(Some(ResponseMatch::Value {
                key: frame.slice(header.key),
                flags: header.flags,
                payload: frame.slice(body_start..payload_end),
            }));
        }

        let matched = match pattern.token() {
            Some(token) if token == line => ResponseMatch::from_token(pattern),
            _ => None,
        };
        if let Some(response) = matched {
            check_trailing(buffer.len(), body_start)?;
            buffer.clear();
            return Ok(Some(response));
        }
    }

    if let Some(message) = server_error(line) {
        check_trailing(buffer.len(), body_start)?;
        buffer.clear();
        return Err(FatcacheError::Server(message));
    }

    Err(FatcacheError::ProtocolMismatch(format!(
        "unexpected response line {:?} (expected one of {:?})",
        String::from_utf8_lossy(line),
        patterns
    )))
}

/// Position of the first CRLF in `data`
fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(CRLF.len()).position(|w| w == CRLF)
}

fn line_too_long() -> FatcacheError {
    FatcacheError::ProtocolMismatch(format!(
        "no line terminator within {} bytes",
        MAX_LINE_LEN
    ))
}

fn check_trailing(buffered: usize, frame_len: usize) -> Result<()> {
    if buffered > frame_len {
        return Err(FatcacheError::ProtocolMismatch(format!(
            "{} unexpected bytes after a complete response",
            buffered - frame_len
        )));
    }
    Ok(())
}

/// Parse `VALUE <key> <flags> <bytes>`; `Ok(None)` if the line is not a
/// value header at all
fn parse_value_header(line: &[u8]) -> Result<Option<ValueHeader>> {
    if !line.starts_with(VALUE_PREFIX) {
        return Ok(None);
    }

    let rest = &line[VALUE_PREFIX.len()..];
    let fields: Vec<&[u8]> = rest.split(|&b| b == b' ').collect();
    if fields.len() != 3 || fields[0].is_empty() {
        return Err(FatcacheError::ProtocolMismatch(format!(
            "malformed value header {:?}",
            String::from_utf8_lossy(line)
        )));
    }

    let key_start = VALUE_PREFIX.len();
    let key = key_start..key_start + fields[0].len();
    let flags = parse_number::<u32>(fields[1], "flags")?;
    let bytes = parse_number::<usize>(fields[2], "length")?;

    if bytes > MAX_PAYLOAD_SIZE {
        return Err(FatcacheError::ProtocolMismatch(format!(
            "value too large: {} bytes (max {})",
            bytes, MAX_PAYLOAD_SIZE
        )));
    }

    Ok(Some(ValueHeader { key, flags, bytes }))
}

fn parse_number<T: std::str::FromStr>(field: &[u8], what: &str) -> Result<T> {
    std::str::from_utf8(field)
        .ok()
        .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            FatcacheError::ProtocolMismatch(format!(
                "invalid {} in value header: {:?}",
                what,
                String::from_utf8_lossy(field)
            ))
        })
}

/// Message of an `ERROR` / `CLIENT_ERROR` / `SERVER_ERROR` line
fn server_error(line: &[u8]) -> Option<String> {
    if line == b"ERROR"
        || line.starts_with(b"CLIENT_ERROR")
        || line.starts_with(b"SERVER_ERROR")
    {
        Some(String::from_utf8_lossy(line).into_owned())
    } else {
        None
    }
}
