//! Lock-free ObjectId generation.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::oid::{ObjectId, machine_id};

/// Mints 12-byte ObjectIds from a timestamp, the cached process
/// fingerprint, and an atomic counter.
///
/// The counter starts at a random seed so that near-simultaneous processes
/// with colliding fingerprints (container clones) still diverge, and wraps
/// silently on overflow. Every call is a single atomic fetch-and-increment;
/// concurrent callers never observe the same counter value, so generation
/// needs no external locking.
pub struct ObjectIdGenerator {
    counter: AtomicU32,
    fingerprint: u32,
}

impl ObjectIdGenerator {
    /// Creates a generator, resolving the machine fingerprint and seeding
    /// the counter. Callers normally use the process-wide instance behind
    /// [`oid::generate`](crate::oid::generate) instead.
    pub fn new() -> Self {
        Self {
            counter: AtomicU32::new(rand::random()),
            fingerprint: machine_id::resolve(),
        }
    }

    #[cfg(test)]
    fn with_parts(fingerprint: u32, counter_seed: u32) -> Self {
        Self {
            counter: AtomicU32::new(counter_seed),
            fingerprint,
        }
    }

    /// The fingerprint this generator stamps into bytes 4-7.
    pub fn fingerprint(&self) -> u32 {
        self.fingerprint
    }

    /// Generates an id using the wall clock.
    pub fn generate(&self) -> ObjectId {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs() as u32)
            .unwrap_or(0);
        self.generate_at(now)
    }

    /// Generates an id at an explicit seconds-since-epoch timestamp.
    ///
    /// Layout (big-endian fields): bytes 0-3 timestamp, bytes 4-7
    /// fingerprint, bytes 8-11 counter.
    pub fn generate_at(&self, timestamp: u32) -> ObjectId {
        let count = self.counter.fetch_add(1, Ordering::Relaxed);
        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&timestamp.to_be_bytes());
        bytes[4..8].copy_from_slice(&self.fingerprint.to_be_bytes());
        bytes[8..12].copy_from_slice(&count.to_be_bytes());
        ObjectId::from_bytes(bytes)
    }
}

impl Default for ObjectIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
