//! Per-process machine/process fingerprint for ObjectId generation.
//!
//! The fingerprint packs a 16-bit network-identity hash into the upper half
//! of a 32-bit value and a 16-bit process-identity hash into the lower half.
//! It is resolved once per process (cached by the generator) and must stay
//! stable for the process lifetime.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;
use sha2::{Digest, Sha256};

/// Static whose address stands in for the identity of the current address
/// space: with ASLR it differs between otherwise identical processes that
/// share a pid namespace or startup string.
static ADDRESS_SPACE_ANCHOR: u8 = 0;

/// Resolves the 32-bit fingerprint.
pub(crate) fn resolve() -> u32 {
    machine_half() | process_half()
}

/// Network-identity hash, shifted into the upper 16 bits.
fn machine_half() -> u32 {
    match interface_digest() {
        Some(half) => (half as u32) << 16,
        // Interface enumeration can be unavailable (sandboxes, permission
        // denied); a random half is recoverable, never an error.
        None => (rand::random::<u16>() as u32) << 16,
    }
}

/// SHA-256 over the concatenated textual descriptions of all network
/// interfaces, masked to 16 bits.
#[cfg(target_os = "linux")]
fn interface_digest() -> Option<u16> {
    let entries = std::fs::read_dir("/sys/class/net").ok()?;
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    if names.is_empty() {
        return None;
    }
    // Directory order is not stable; the fingerprint must be.
    names.sort();

    let mut description = String::new();
    for name in &names {
        let address = std::fs::read_to_string(format!("/sys/class/net/{name}/address"))
            .unwrap_or_default();
        description.push_str(name);
        description.push('=');
        description.push_str(address.trim());
        description.push(';');
    }

    let digest = Sha256::digest(description.as_bytes());
    Some(u16::from_be_bytes([digest[0], digest[1]]))
}

#[cfg(not(target_os = "linux"))]
fn interface_digest() -> Option<u16> {
    None
}

/// Process-identity hash: pid plus the address-space anchor, rendered to a
/// hex string, hashed and masked to 16 bits.
fn process_half() -> u32 {
    let identity = format!(
        "{:x}{:x}",
        std::process::id(),
        std::ptr::addr_of!(ADDRESS_SPACE_ANCHOR) as usize
    );
    let mut hasher = FxHasher::default();
    identity.hash(&mut hasher);
    (hasher.finish() & 0xFFFF) as u32
}
