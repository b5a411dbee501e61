//! 12-byte unique document identifiers (ObjectIds).
//!
//! An ObjectId is a seconds-since-epoch timestamp, a per-process machine
//! fingerprint, and a randomly seeded counter, each packed big-endian. Ids
//! minted within one process are distinct up to counter wraparound; the
//! fingerprint keeps ids from different processes apart.

use std::fmt;

use lazy_static::lazy_static;

pub mod generator;
pub(crate) mod machine_id;

pub use generator::ObjectIdGenerator;

lazy_static! {
    /// Process-wide generator. Initialized once, race-safely, on first use;
    /// the machine fingerprint is resolved exactly once here and cached for
    /// the process lifetime.
    static ref GENERATOR: ObjectIdGenerator = ObjectIdGenerator::new();
}

/// Generates an id using the process-wide generator and the wall clock.
pub fn generate() -> ObjectId {
    GENERATOR.generate()
}

/// Generates an id at an explicit seconds-since-epoch timestamp.
pub fn generate_at(timestamp: u32) -> ObjectId {
    GENERATOR.generate_at(timestamp)
}

/// A 12-byte ObjectId.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Wraps raw id bytes.
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Returns the raw id bytes.
    pub const fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Returns the timestamp field (bytes 0-3, big-endian seconds since
    /// the Unix epoch).
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Formats the id as 24 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        let mut s = String::with_capacity(24);
        for byte in &self.0 {
            s.push_str(&format!("{byte:02x}"));
        }
        s
    }

    /// Parses an id from a 24-character hex string.
    pub fn parse_str(s: &str) -> Option<Self> {
        if s.len() != 24 || !s.is_ascii() {
            return None;
        }
        let mut bytes = [0u8; 12];
        for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk).ok()?;
            bytes[i] = u8::from_str_radix(pair, 16).ok()?;
        }
        Some(Self(bytes))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}
