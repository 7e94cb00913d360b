//! jsonb-util - small helpers shared by the jsonb crates.
//!
//! - [`obj_key_cmp`]: the length-first key order used for canonical objects.
//! - [`hash`]: 32-bit hash mixing primitives.

pub mod hash;
pub mod obj_key_cmp;

pub use hash::{hash_bytes, rotate_mix, update_bin, update_num, START_STATE};
pub use obj_key_cmp::obj_key_cmp;
