//! Kernel module - remote transports and their dependency wiring.

pub mod client;
pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use client::{RemoteOrganizationClient, INVITATIONS_PAGE_SIZE, MEMBERS_PAGE_SIZE};
pub use deps::{GithubAdapter, OrganizationDeps};
pub use test_dependencies::{MockCall, MockGithub};
pub use traits::*;
