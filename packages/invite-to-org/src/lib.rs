// invite-to-org - membership sync core
//
// Reads the members of a source organization, diffs them against a target
// organization and invites whoever is missing.
//
// Layout follows the kernel/domains split: kernel/ holds remote transports
// behind traits, domains/ holds the organization and invitation logic.

pub mod config;
pub mod domains;
pub mod error;
pub mod kernel;
pub mod sync;

pub use config::*;
pub use error::{Result, SyncError};
