// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC GlobalId compression
//!
//! An `IfcGloballyUniqueId` is a 128-bit uuid written as 22 base-64 digits
//! over the alphabet `0-9A-Za-z_$`. The grouping follows the buildingSMART
//! reference implementation: the first byte becomes two digits (so the first
//! character is always `0`..`3`), each following group of three bytes
//! becomes four digits, most significant digit first.

use uuid::Uuid;

/// Base-64 alphabet of IFC GlobalIds
pub const GUID_ALPHABET: &[u8; 64] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_$";

/// Length of a compressed GlobalId
pub const GUID_LENGTH: usize = 22;

/// Compress a 128-bit uuid into its 22-character GlobalId
pub fn compress(uuid: u128) -> String {
    let bytes = uuid.to_be_bytes();
    let mut out = String::with_capacity(GUID_LENGTH);

    push_digits(&mut out, bytes[0] as u32, 2);
    for group in bytes[1..].chunks_exact(3) {
        let value = (group[0] as u32) << 16 | (group[1] as u32) << 8 | group[2] as u32;
        push_digits(&mut out, value, 4);
    }

    out
}

/// Compress a [`Uuid`]
#[inline]
pub fn compress_uuid(uuid: &Uuid) -> String {
    compress(uuid.as_u128())
}

fn push_digits(out: &mut String, value: u32, digits: u32) {
    for i in (0..digits).rev() {
        let index = (value >> (6 * i)) & 0x3F;
        out.push(GUID_ALPHABET[index as usize] as char);
    }
}

/// Expand a 22-character GlobalId back into its uuid.
///
/// Returns `None` for wrong length, characters outside the alphabet, or a
/// first digit above `3` (which would not fit in 128 bits).
pub fn expand(text: &str) -> Option<u128> {
    let digits = text.as_bytes();
    if digits.len() != GUID_LENGTH {
        return None;
    }

    let mut bytes = [0u8; 16];

    let first = decode_digits(&digits[0..2])?;
    if first > 0xFF {
        return None;
    }
    bytes[0] = first as u8;

    for (i, chunk) in digits[2..].chunks_exact(4).enumerate() {
        let value = decode_digits(chunk)?;
        let offset = 1 + i * 3;
        bytes[offset] = (value >> 16) as u8;
        bytes[offset + 1] = (value >> 8) as u8;
        bytes[offset + 2] = value as u8;
    }

    Some(u128::from_be_bytes(bytes))
}

fn decode_digits(digits: &[u8]) -> Option<u32> {
    digits.iter().try_fold(0u32, |acc, &c| {
        let index = GUID_ALPHABET.iter().position(|&a| a == c)?;
        Some(acc << 6 | index as u32)
    })
}

/// Check that a string is a well-formed compressed GlobalId
pub fn is_valid(text: &str) -> bool {
    expand(text).is_some()
}

/// Source of 128-bit values for new GlobalIds
pub trait UuidSource {
    fn next_uuid(&mut self) -> u128;

    /// Next compressed GlobalId
    fn next_global_id(&mut self) -> String {
        compress(self.next_uuid())
    }
}

/// Random version-4 uuids (uniqueness is probabilistic)
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomUuids;

impl UuidSource for RandomUuids {
    fn next_uuid(&mut self) -> u128 {
        Uuid::new_v4().as_u128()
    }
}

/// Deterministic counter, for reproducible output and tests
#[derive(Debug, Clone, Copy)]
pub struct SequentialUuids {
    next: u128,
}

impl SequentialUuids {
    pub fn new(start: u128) -> Self {
        Self { next: start }
    }
}

impl Default for SequentialUuids {
    fn default() -> Self {
        Self::new(1)
    }
}

impl UuidSource for SequentialUuids {
    fn next_uuid(&mut self) -> u128 {
        let value = self.next;
        self.next = self.next.wrapping_add(1);
        value
    }
}
