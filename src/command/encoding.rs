//! Canonical binary encoding, version 1.
//!
//! Every value that feeds a consensus hash is written through
//! [`CanonicalWriter`], never from its in-memory layout:
//!
//! - integers are fixed-width little-endian
//! - `f64` is its IEEE-754 bit pattern as a little-endian `u64`, with `-0.0`
//!   written as `+0.0`
//! - `bool` is a single `0x00`/`0x01` byte
//! - strings and byte strings are a `u64` length followed by the raw bytes
//! - a command is `ENCODING_VERSION`, its tag byte, then its fields in
//!   declaration order
//! - a sequence (a transaction's commands, a transaction's signatures) is its
//!   `u64` element count followed by the elements
//!
//! Two implementations that follow these rules produce identical bytes for
//! identical logical values.

use super::types::Command;
use crate::peer::Node;

pub const ENCODING_VERSION: u8 = 1;

#[derive(Debug, Default, Clone)]
pub struct CanonicalWriter {
    buf: Vec<u8>,
}

impl CanonicalWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn put_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_f64(&mut self, value: f64) {
        let value = if value == 0.0 { 0.0 } else { value };
        self.put_u64(value.to_bits());
    }

    pub fn put_bool(&mut self, value: bool) {
        self.put_u8(u8::from(value));
    }

    /// Length-prefixed byte string.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.put_u64(bytes.len() as u64);
        self.buf.extend_from_slice(bytes);
    }

    pub fn put_str(&mut self, value: &str) {
        self.put_bytes(value.as_bytes());
    }

    /// Fixed-size field written without a length prefix, such as a digest.
    pub fn put_fixed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

pub trait CanonicalEncode {
    fn encode_canonical(&self, writer: &mut CanonicalWriter);

    fn canonical_bytes(&self) -> Vec<u8> {
        let mut writer = CanonicalWriter::new();
        self.encode_canonical(&mut writer);
        writer.into_bytes()
    }
}

impl CanonicalEncode for Node {
    fn encode_canonical(&self, writer: &mut CanonicalWriter) {
        writer.put_str(&self.ip);
        writer.put_str(&self.public_key);
        writer.put_f64(self.trust);
        writer.put_bool(self.active);
    }
}

impl CanonicalEncode for Command {
    fn encode_canonical(&self, writer: &mut CanonicalWriter) {
        writer.put_u8(ENCODING_VERSION);
        writer.put_u8(self.tag());
        match self {
            Command::AddPeer { node } => node.encode_canonical(writer),
            Command::RemovePeer { public_key } => writer.put_str(public_key),
            Command::SetTrust { public_key, value } => {
                writer.put_str(public_key);
                writer.put_f64(*value);
            }
            Command::ChangeTrust { public_key, delta } => {
                writer.put_str(public_key);
                writer.put_f64(*delta);
            }
            Command::SetActive { public_key, flag } => {
                writer.put_str(public_key);
                writer.put_bool(*flag);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::types::tag;

    #[test]
    fn test_set_active_layout() {
        let bytes = Command::set_active("pkA", true).canonical_bytes();
        let mut expected = vec![ENCODING_VERSION, tag::SET_ACTIVE];
        expected.extend_from_slice(&3u64.to_le_bytes());
        expected.extend_from_slice(b"pkA");
        expected.push(1);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_set_trust_layout() {
        let bytes = Command::set_trust("k", 1.5).canonical_bytes();
        // version | tag | len = 1 | "k" | 1.5 as little-endian bits
        assert_eq!(
            hex::encode(bytes),
            "01030100000000000000\
             6b\
             000000000000f83f"
        );
    }

    #[test]
    fn test_add_peer_layout() {
        let node = Node::new("ip", "pk", 2.0).with_active(true);
        let bytes = Command::add_peer(node).canonical_bytes();

        let mut expected = vec![ENCODING_VERSION, tag::ADD_PEER];
        expected.extend_from_slice(&2u64.to_le_bytes());
        expected.extend_from_slice(b"ip");
        expected.extend_from_slice(&2u64.to_le_bytes());
        expected.extend_from_slice(b"pk");
        expected.extend_from_slice(&2.0f64.to_bits().to_le_bytes());
        expected.push(1);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_negative_zero_is_normalized() {
        assert_eq!(
            Command::change_trust("pkA", -0.0).canonical_bytes(),
            Command::change_trust("pkA", 0.0).canonical_bytes()
        );
    }

    #[test]
    fn test_length_prefix_separates_fields() {
        // Without length prefixes these two would concatenate identically.
        let a = Node::new("ab", "c", 1.0);
        let b = Node::new("a", "bc", 1.0);
        assert_ne!(a.canonical_bytes(), b.canonical_bytes());
    }
}
