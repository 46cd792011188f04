//! TSID Generator
//!
//! Time-sorted identifiers encoded as 13-character Crockford Base32 strings.
//! Assigned to entities on creation.

use std::sync::atomic::{AtomicU16, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Crockford Base32 alphabet (excludes I, L, O, U)
const ALPHABET: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

static COUNTER: AtomicU16 = AtomicU16::new(0);

pub struct TsidGenerator;

impl TsidGenerator {
    /// Generate a new TSID.
    ///
    /// Layout (64 bits): 42 bits of milliseconds since the epoch, 10 random
    /// bits, 12 bits of a process-wide counter.
    pub fn generate() -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        let counter = COUNTER.fetch_add(1, Ordering::SeqCst) as u64;
        let random = rand::random::<u16>() as u64 & 0x3FF;

        let tsid = ((now & 0x3FF_FFFF_FFFF) << 22) | (random << 12) | (counter & 0xFFF);
        encode_crockford(tsid)
    }
}

fn encode_crockford(mut value: u64) -> String {
    let mut result = [b'0'; 13];
    for slot in result.iter_mut().rev() {
        *slot = ALPHABET[(value & 0x1F) as usize];
        value >>= 5;
    }
    result.iter().map(|&b| b as char).collect()
}
