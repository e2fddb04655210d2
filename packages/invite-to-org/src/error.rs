//! Typed errors for the membership sync.
//!
//! Each variant names the phase it aborts. The per-member variants
//! (`MemberInvite`, `OrganizationInvite`) are non-fatal: they are logged inside
//! the invitation loop and never returned from it.

use github_client::GithubError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Missing or invalid configuration; raised before any remote call
    #[error("configuration error: {0}")]
    Config(String),

    /// Paginated member listing failed
    #[error("unable to load members of {organization}: {source}")]
    RemoteQuery {
        organization: String,
        #[source]
        source: GithubError,
    },

    /// Team slug could not be resolved on the target organization
    #[error("unable to resolve team {slug} in {organization}: {source}")]
    TeamResolution {
        organization: String,
        slug: String,
        #[source]
        source: GithubError,
    },

    /// Pending invitations could not be listed
    #[error("unable to list pending invitations of {organization}: {source}")]
    InvitationList {
        organization: String,
        #[source]
        source: GithubError,
    },

    /// A single team membership creation failed
    #[error("unable to add {login} to team {team_slug} in {organization}: {source}")]
    MemberInvite {
        organization: String,
        team_slug: String,
        login: String,
        #[source]
        source: GithubError,
    },

    /// A single organization invitation failed
    #[error("unable to invite {login} to {organization}: {source}")]
    OrganizationInvite {
        organization: String,
        login: String,
        #[source]
        source: GithubError,
    },
}

impl SyncError {
    /// Operation name used as a structured log field.
    pub fn operation(&self) -> &'static str {
        match self {
            SyncError::Config(_) => "load_config",
            SyncError::RemoteQuery { .. } => "list_members",
            SyncError::TeamResolution { .. } => "resolve_team",
            SyncError::InvitationList { .. } => "list_pending_invitations",
            SyncError::MemberInvite { .. } => "create_team_membership",
            SyncError::OrganizationInvite { .. } => "create_organization_invitation",
        }
    }

    pub fn organization(&self) -> Option<&str> {
        match self {
            SyncError::Config(_) => None,
            SyncError::RemoteQuery { organization, .. }
            | SyncError::TeamResolution { organization, .. }
            | SyncError::InvitationList { organization, .. }
            | SyncError::MemberInvite { organization, .. }
            | SyncError::OrganizationInvite { organization, .. } => Some(organization),
        }
    }

    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            SyncError::MemberInvite { .. } | SyncError::OrganizationInvite { .. }
        )
    }

    /// True when the underlying call was abandoned through the run's cancellation token.
    pub fn is_cancelled(&self) -> bool {
        match self {
            SyncError::Config(_) => false,
            SyncError::RemoteQuery { source, .. }
            | SyncError::TeamResolution { source, .. }
            | SyncError::InvitationList { source, .. }
            | SyncError::MemberInvite { source, .. }
            | SyncError::OrganizationInvite { source, .. } => {
                matches!(source, GithubError::Cancelled)
            }
        }
    }
}
