//! Transport dependencies (using traits for testability)
//!
//! `OrganizationDeps` is the single place where an access token becomes
//! authenticated clients for both remote protocols.

use anyhow::{Context, Result};
use async_trait::async_trait;
use github_client::{AccessToken, CreateInvitationRequest, GithubClient};
use std::sync::Arc;

use crate::domains::organization::{Member, Team};
use crate::kernel::{BaseInvitationApi, BaseMemberDirectory, MembersPage, PendingInvitation};

// =============================================================================
// GithubClient Adapter (implements both transport traits)
// =============================================================================

/// Wrapper around GithubClient that implements the transport traits
pub struct GithubAdapter(pub Arc<GithubClient>);

impl GithubAdapter {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseMemberDirectory for GithubAdapter {
    async fn members_page(
        &self,
        organization: &str,
        cursor: Option<&str>,
        page_size: u32,
    ) -> github_client::Result<MembersPage> {
        let connection = self
            .0
            .organization_members(organization, page_size, cursor)
            .await?;

        let members = connection
            .edges
            .into_iter()
            .map(|edge| Member {
                id: edge.node.id,
                database_id: edge.node.database_id,
                login: edge.node.login,
                display_name: edge.node.name.unwrap_or_default(),
            })
            .collect();

        Ok(MembersPage {
            members,
            has_next_page: connection.page_info.has_next_page,
            end_cursor: connection.page_info.end_cursor,
        })
    }
}

#[async_trait]
impl BaseInvitationApi for GithubAdapter {
    async fn team_by_slug(&self, organization: &str, slug: &str) -> github_client::Result<Team> {
        let team = self.0.team_by_slug(organization, slug).await?;
        Ok(Team {
            id: team.node_id.unwrap_or_else(|| team.id.to_string()),
            slug: team.slug,
        })
    }

    async fn pending_invitations_page(
        &self,
        organization: &str,
        page: u32,
        per_page: u32,
    ) -> github_client::Result<Vec<PendingInvitation>> {
        let invitations = self
            .0
            .organization_invitations(organization, page, per_page)
            .await?;
        Ok(invitations
            .into_iter()
            .map(|i| PendingInvitation { login: i.login })
            .collect())
    }

    async fn add_team_membership(
        &self,
        organization: &str,
        team_slug: &str,
        login: &str,
    ) -> github_client::Result<()> {
        let membership = self
            .0
            .add_team_membership(organization, team_slug, login)
            .await?;
        tracing::debug!(organization, team_slug, login, state = %membership.state, "Team membership created");
        Ok(())
    }

    async fn invite_to_organization(
        &self,
        organization: &str,
        invitee_id: u64,
    ) -> github_client::Result<()> {
        let request = CreateInvitationRequest {
            invitee_id,
            role: "direct_member".to_string(),
            team_ids: vec![],
        };
        self.0
            .create_organization_invitation(organization, &request)
            .await?;
        Ok(())
    }
}

// =============================================================================
// OrganizationDeps
// =============================================================================

/// Remote protocol clients injected into RemoteOrganizationClient
#[derive(Clone)]
pub struct OrganizationDeps {
    pub directory: Arc<dyn BaseMemberDirectory>,
    pub invitations: Arc<dyn BaseInvitationApi>,
}

impl OrganizationDeps {
    pub fn new(
        directory: Arc<dyn BaseMemberDirectory>,
        invitations: Arc<dyn BaseInvitationApi>,
    ) -> Self {
        Self {
            directory,
            invitations,
        }
    }

    /// Build one authenticated GitHub client and share it between both protocols.
    pub fn from_token(token: AccessToken, api_url: &str) -> Result<Self> {
        let client = GithubClient::new(token)
            .context("Failed to create GitHub client")?
            .with_base_url(api_url);
        let adapter = Arc::new(GithubAdapter::new(Arc::new(client)));

        Ok(Self::new(adapter.clone(), adapter))
    }
}
