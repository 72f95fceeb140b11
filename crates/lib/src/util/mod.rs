//! Shared utilities.
//!
//! Hashing used for task identity and fingerprints, plus test helpers.

pub mod hash;
