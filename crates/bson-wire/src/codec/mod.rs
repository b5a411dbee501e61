//! Binary encoding/decoding primitives for the BSON wire format.

pub mod buffer;
pub(crate) mod utf8;

pub use buffer::ByteBuf;
