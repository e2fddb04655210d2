// Organization domain - member snapshots and the membership diff
//
// Responsibilities:
// - Lazily loading and freezing an organization's member snapshot
// - Computing which source members are missing from the target

pub mod differ;
pub mod models;
pub mod organization;

pub use differ::missing_members;
pub use models::*;
pub use organization::*;
