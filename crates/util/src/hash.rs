//! 32-bit hash mixing.
//!
//! `update_num` is the djb2-style step `state * 33 + num` with wrapping
//! arithmetic. Byte strings are mixed with a discriminator and their length
//! first, so that `"ab"` and `"a" + "b"` land in different states.

pub const START_STATE: u32 = 5381;

/// Discriminator mixed in ahead of a byte string.
pub const BINARY_CONST: u32 = 982454837;

/// Mix a single integer into the hash state.
///
/// `state = (state << 5) + state + num` with 32-bit wrapping semantics.
#[inline]
pub fn update_num(state: u32, num: u32) -> u32 {
    state.wrapping_shl(5).wrapping_add(state).wrapping_add(num)
}

/// Mix a binary blob into the hash state.
pub fn update_bin(mut state: u32, bin: &[u8]) -> u32 {
    state = update_num(state, BINARY_CONST);
    state = update_num(state, bin.len() as u32);
    for &b in bin.iter().rev() {
        state = update_num(state, b as u32);
    }
    state
}

/// Hash a byte string from the start state.
pub fn hash_bytes(bin: &[u8]) -> u32 {
    update_bin(START_STATE, bin)
}

/// Fold a finished item hash into a running accumulator.
///
/// The accumulator is rotated left by one bit before the xor, so the fold
/// is order sensitive: `[a, b]` and `[b, a]` produce different results.
#[inline]
pub fn rotate_mix(acc: u32, item: u32) -> u32 {
    acc.rotate_left(1) ^ item
}
