//! Byte-level primitives for the BSON wire format.
//!
//! This crate provides the codec core shared by BSON serializers: a growable
//! byte buffer with dual read/write cursors, exact-layout encode/decode
//! primitives for the BSON scalar types, and 12-byte ObjectId generation.
//!
//! # Overview
//!
//! - **Little-endian wire layout**: fixed-width integers, IEEE-754 doubles,
//!   and decimal128 halves are byte-exact with other BSON implementations.
//! - **Length-prefixed strings and NUL-terminated cstrings** with strict
//!   UTF-8 validation on the read path.
//! - **In-place patching** ([`ByteBuf::replace_int32`]) for backfilling
//!   length fields written before their payload is known.
//!
//! # Quick Start
//!
//! ```rust
//! use bson_wire::{ByteBuf, oid};
//!
//! // Build a byte sequence.
//! let mut buf = ByteBuf::new();
//! buf.put_int32(42).put_string("hello");
//! let bytes = buf.to_bytes();
//!
//! // Parse it back.
//! let mut buf = ByteBuf::from_bytes(&bytes);
//! assert_eq!(buf.get_int32().unwrap(), 42);
//! assert_eq!(buf.get_string().unwrap(), "hello");
//!
//! // Mint a unique document id.
//! let id = oid::generate();
//! assert_eq!(id.bytes().len(), 12);
//! ```
//!
//! # Modules
//!
//! - [`codec`]: the [`ByteBuf`] cursor buffer and UTF-8 emission
//! - [`oid`]: ObjectId generation and the machine fingerprint
//! - [`error`]: encode/decode error types
//!
//! # Concurrency
//!
//! A [`ByteBuf`] has one logical owner; share across threads only with
//! external synchronization or by handing the buffer off. ObjectId
//! generation is lock-free and safe to call from any thread.
//!
//! # Security
//!
//! The decoder handles untrusted input: every read is bounds-checked
//! against the write boundary, string lengths are verified before
//! allocation, and malformed UTF-8 or missing terminators are rejected
//! with descriptive errors.

pub mod codec;
pub mod error;
pub mod oid;

// Re-export commonly used types at crate root
pub use codec::ByteBuf;
pub use error::{DecodeError, EncodeError, ErrorKind};
pub use oid::{ObjectId, ObjectIdGenerator};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
