//! Subcommand implementations.

pub mod digest;
pub mod fingerprint;
pub mod normalize;
pub mod verify;
