//! High-performance collection types used throughout the crate.
//!
//! The aliases here pin down one hasher (`rustc_hash`), one small-vector
//! implementation (`smallvec`) and one storage backend (`slotmap`) so the rest
//! of the crate never names those crates directly.

#![forbid(unsafe_code)]

mod aliases;
mod buffers;
mod helpers;
mod key_maps;
mod secondary_maps;

pub use aliases::*;
pub use buffers::*;
pub use helpers::*;
pub use key_maps::*;
pub use secondary_maps::*;
