//! Tests for the Command Client
//!
//! These tests verify:
//! - Request serialization per command
//! - Result mapping (STORED, NOT_STORED, VALUE, END, NOT_FOUND, DELETED)
//! - The echoed-key integrity check
//! - Key validation and connection state after errors

#[path = "../common/mod.rs"]
mod common;

use std::thread;
use std::time::Duration;

use common::{scripted_client, ReadEvent, ScriptedStream};
use fatcache::{FatcacheError, SharedClient};

// =============================================================================
// SET Tests
// =============================================================================

#[test]
fn test_set_stored() {
    let mut client = scripted_client(ScriptedStream::whole(b"STORED\r\n"));

    client.set(b"a", b"a", 1, 0).unwrap();

    assert_eq!(client.connection().get_ref().written, b"set a 1 0 1\r\na\r\n");
}

#[test]
fn test_set_not_stored_is_rejected() {
    let mut client = scripted_client(ScriptedStream::whole(b"NOT_STORED\r\n"));

    match client.set(b"full", b"payload", 3, 60) {
        Err(FatcacheError::SetRejected {
            key,
            flags,
            expiry,
            bytes,
        }) => {
            assert_eq!(key, "full");
            assert_eq!(flags, 3);
            assert_eq!(expiry, 60);
            assert_eq!(bytes, 7);
        }
        other => panic!("Expected SetRejected, got {:?}", other),
    }

    // Rejection is recoverable
    assert!(client.is_open());
}

#[test]
fn test_set_payload_with_crlf() {
    let mut client = scripted_client(ScriptedStream::whole(b"STORED\r\n"));

    client.set(b"k", b"line1\r\nEND\r\n", 0, 0).unwrap();

    assert_eq!(
        client.connection().get_ref().written,
        b"set k 0 0 12\r\nline1\r\nEND\r\n\r\n"
    );
}

// =============================================================================
// GET Tests
// =============================================================================

#[test]
fn test_get_value() {
    let mut client = scripted_client(ScriptedStream::whole(b"VALUE a 1 1\r\na\r\nEND\r\n"));

    let item = client.get(b"a").unwrap().expect("value should be present");

    assert_eq!(&item.payload[..], b"a");
    assert_eq!(item.flags, 1);
    assert_eq!(client.connection().get_ref().written, b"get a\r\n");
}

#[test]
fn test_get_end_is_absent() {
    let mut client = scripted_client(ScriptedStream::whole(b"END\r\n"));
    assert!(client.get(b"missing").unwrap().is_none());
}

#[test]
fn test_get_not_found_is_absent() {
    let mut client = scripted_client(ScriptedStream::whole(b"NOT_FOUND\r\n"));
    assert!(client.get(b"missing").unwrap().is_none());
}

#[test]
fn test_get_chunked_value() {
    let response = b"VALUE blob 9 5\r\n\r\nEND\r\nEND\r\n";
    let mut client = scripted_client(ScriptedStream::byte_by_byte(response));

    let item = client.get(b"blob").unwrap().unwrap();
    assert_eq!(&item.payload[..], b"\r\nEND");
    assert_eq!(item.flags, 9);
}

#[test]
fn test_get_key_mismatch() {
    let mut client = scripted_client(ScriptedStream::whole(b"VALUE other 0 1\r\nx\r\nEND\r\n"));

    match client.get(b"mine") {
        Err(FatcacheError::ProtocolMismatch(msg)) => {
            assert!(msg.contains("mine"));
            assert!(msg.contains("other"));
        }
        other => panic!("Expected ProtocolMismatch, got {:?}", other),
    }

    // A desynchronized stream is not reused
    assert!(!client.is_open());
    assert!(client.connection().get_ref().closed);
    assert!(matches!(client.get(b"mine"), Err(FatcacheError::ConnectionClosed)));
}

#[test]
fn test_get_key_prefix_is_still_a_mismatch() {
    let mut client = scripted_client(ScriptedStream::whole(b"VALUE ab 0 1\r\nx\r\nEND\r\n"));
    assert!(matches!(
        client.get(b"a"),
        Err(FatcacheError::ProtocolMismatch(_))
    ));
}

// =============================================================================
// DELETE Tests
// =============================================================================

#[test]
fn test_delete_deleted() {
    let mut client = scripted_client(ScriptedStream::whole(b"DELETED\r\n"));
    client.delete(b"a").unwrap();
    assert_eq!(client.connection().get_ref().written, b"delete a\r\n");
}

#[test]
fn test_delete_not_found_is_ok() {
    let mut client = scripted_client(ScriptedStream::whole(b"NOT_FOUND\r\n"));
    client.delete(b"never-set").unwrap();
}

// =============================================================================
// Sequencing Tests
// =============================================================================

#[test]
fn test_scenario_set_get_delete_get() {
    let stream = ScriptedStream::responses(&[
        b"DELETED\r\n",
        b"END\r\n",
        b"STORED\r\n",
        b"VALUE a 1 1\r\na\r\nEND\r\n",
        b"DELETED\r\n",
        b"END\r\n",
    ]);
    let mut client = scripted_client(stream);

    client.delete(b"a").unwrap();
    assert!(client.get(b"a").unwrap().is_none());

    client.set(b"a", b"a", 1, 0).unwrap();
    let item = client.get(b"a").unwrap().unwrap();
    assert_eq!((&item.payload[..], item.flags), (&b"a"[..], 1));

    client.delete(b"a").unwrap();
    assert!(client.get(b"a").unwrap().is_none());

    assert_eq!(
        client.connection().get_ref().written,
        b"delete a\r\nget a\r\nset a 1 0 1\r\na\r\nget a\r\ndelete a\r\nget a\r\n"
    );
}

// =============================================================================
// Validation and Error State Tests
// =============================================================================

#[test]
fn test_invalid_key_writes_nothing() {
    let mut client = scripted_client(ScriptedStream::whole(b"STORED\r\n"));

    assert!(matches!(
        client.set(b"two words", b"v", 0, 0),
        Err(FatcacheError::InvalidKey(_))
    ));
    assert!(matches!(client.get(b""), Err(FatcacheError::InvalidKey(_))));
    assert!(matches!(
        client.delete(b"new\nline"),
        Err(FatcacheError::InvalidKey(_))
    ));

    assert!(client.connection().get_ref().written.is_empty());
    assert!(client.is_open());
}

#[test]
fn test_timeout_closes_connection() {
    let stream = ScriptedStream::new(vec![ReadEvent::Fail(std::io::ErrorKind::WouldBlock)]);
    let mut client = scripted_client(stream);

    let result = client.get_with_timeout(b"slow", Some(Duration::from_millis(50)));
    assert!(matches!(result, Err(FatcacheError::Timeout)));
    assert!(!client.is_open());
    assert!(matches!(client.get(b"slow"), Err(FatcacheError::ConnectionClosed)));
}

#[test]
fn test_default_read_timeout_is_used() {
    let mut client = scripted_client(ScriptedStream::whole(b"END\r\n"));
    assert_eq!(client.read_timeout(), None);

    client.set_read_timeout(Some(Duration::from_secs(2)));
    client.get(b"k").unwrap();

    let applied = client.connection().get_ref().read_timeouts[0].unwrap();
    assert!(applied <= Duration::from_secs(2));
}

#[test]
fn test_server_error_is_surfaced() {
    let mut client = scripted_client(ScriptedStream::whole(b"SERVER_ERROR out of memory\r\n"));
    match client.set(b"k", b"v", 0, 0) {
        Err(FatcacheError::Server(msg)) => assert!(msg.contains("out of memory")),
        other => panic!("Expected Server error, got {:?}", other),
    }
    assert!(client.is_open());
}

#[test]
fn test_error_fatality() {
    assert!(FatcacheError::ConnectionClosed.is_fatal());
    assert!(FatcacheError::Timeout.is_fatal());
    assert!(FatcacheError::ProtocolMismatch("x".into()).is_fatal());
    assert!(!FatcacheError::Server("x".into()).is_fatal());
    assert!(!FatcacheError::InvalidKey("x".into()).is_fatal());
    assert!(!FatcacheError::Decode("x".into()).is_fatal());
}

// =============================================================================
// Shared Client Tests
// =============================================================================

#[test]
fn test_shared_client_serializes_commands() {
    let responses: Vec<ReadEvent> = (0..8)
        .map(|_| ReadEvent::Data(b"STORED\r\n".to_vec()))
        .collect();
    let shared = SharedClient::new(scripted_client(ScriptedStream::new(responses)));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let shared = shared.clone();
            thread::spawn(move || shared.set(format!("k{}", i).as_bytes(), b"v", 0, 0))
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    // Each request was written whole, never interleaved
    let written = shared.with_client(|c| c.connection().get_ref().written.clone());
    let text = String::from_utf8(written).unwrap();
    assert_eq!(text.matches("\r\nv\r\n").count(), 8);
    for request in text.split_terminator("\r\nv\r\n") {
        assert!(request.starts_with("set k") && request.ends_with(" 0 0 1"));
    }
}

#[test]
fn test_shared_client_with_timeout_forms() {
    let stream = ScriptedStream::responses(&[
        b"STORED\r\n",
        b"VALUE k 4 1\r\nv\r\nEND\r\n",
        b"DELETED\r\n",
    ]);
    let shared = SharedClient::new(scripted_client(stream));
    let timeout = Some(Duration::from_secs(2));

    shared.set_with_timeout(b"k", b"v", 4, 0, timeout).unwrap();
    let item = shared.get_with_timeout(b"k", timeout).unwrap().unwrap();
    assert_eq!((&item.payload[..], item.flags), (&b"v"[..], 4));
    shared.delete_with_timeout(b"k", timeout).unwrap();

    let applied = shared.with_client(|c| c.connection().get_ref().read_timeouts.clone());
    assert_eq!(applied.len(), 3);
    for read_timeout in applied {
        let read_timeout = read_timeout.expect("explicit timeout should bound every read");
        assert!(read_timeout <= Duration::from_secs(2));
    }
}
