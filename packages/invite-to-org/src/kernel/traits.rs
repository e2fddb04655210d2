// Trait definitions for dependency injection
//
// One trait per remote protocol. These are transport traits only: pagination,
// caching and dedup live in RemoteOrganizationClient and the domains.

use async_trait::async_trait;
use github_client::Result;

use crate::domains::organization::{Member, Team};

// =============================================================================
// Read protocol (GraphQL membership listing)
// =============================================================================

/// One page of an organization's member listing.
#[derive(Debug, Clone, Default)]
pub struct MembersPage {
    pub members: Vec<Member>,
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[async_trait]
pub trait BaseMemberDirectory: Send + Sync {
    /// Fetch the page that follows `cursor` (`None` for the first page).
    async fn members_page(
        &self,
        organization: &str,
        cursor: Option<&str>,
        page_size: u32,
    ) -> Result<MembersPage>;
}

// =============================================================================
// Command protocol (REST teams / invitations / memberships)
// =============================================================================

/// An outstanding invitation. `login` is `None` for email invitations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingInvitation {
    pub login: Option<String>,
}

#[async_trait]
pub trait BaseInvitationApi: Send + Sync {
    async fn team_by_slug(&self, organization: &str, slug: &str) -> Result<Team>;

    /// Fetch one page of pending invitations. Pages start at 1.
    async fn pending_invitations_page(
        &self,
        organization: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PendingInvitation>>;

    async fn add_team_membership(
        &self,
        organization: &str,
        team_slug: &str,
        login: &str,
    ) -> Result<()>;

    /// Organization-wide invitation, used when no team is configured.
    async fn invite_to_organization(&self, organization: &str, invitee_id: u64) -> Result<()>;
}
