//! Remote organization client.
//!
//! Drives pagination over the transport traits and classifies failures into
//! the sync error taxonomy. Holds no state beyond its transports.

use github_client::GithubError;
use std::collections::HashSet;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domains::organization::{Member, Team};
use crate::error::{Result, SyncError};
use crate::kernel::OrganizationDeps;

/// Page size of the GraphQL membership query.
pub const MEMBERS_PAGE_SIZE: u32 = 100;

/// Page size of the pending invitation listing. A shorter page ends the listing.
pub const INVITATIONS_PAGE_SIZE: u32 = 30;

pub struct RemoteOrganizationClient {
    deps: OrganizationDeps,
}

impl RemoteOrganizationClient {
    pub fn new(deps: OrganizationDeps) -> Self {
        Self { deps }
    }

    /// Load every member of `organization`, page after page, in the order returned.
    ///
    /// The first failing page aborts the listing; nothing accumulated so far is returned.
    /// A page that announces a next page without a fresh cursor is a failure too.
    pub async fn list_members(
        &self,
        organization: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Member>> {
        let mut members = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = guarded(
                cancel,
                self.deps
                    .directory
                    .members_page(organization, cursor.as_deref(), MEMBERS_PAGE_SIZE),
            )
            .await
            .map_err(|source| SyncError::RemoteQuery {
                organization: organization.to_string(),
                source,
            })?;

            for member in &page.members {
                debug!(organization, login = %member.login, name = %member.display_name, "Loaded member");
            }
            members.extend(page.members);

            if !page.has_next_page {
                break;
            }
            cursor = match page.end_cursor {
                Some(next) if cursor.as_deref() != Some(next.as_str()) => Some(next),
                stalled => {
                    let reason = match stalled {
                        Some(repeated) => format!("hasNextPage with repeated endCursor {}", repeated),
                        None => "hasNextPage without endCursor".to_string(),
                    };
                    return Err(SyncError::RemoteQuery {
                        organization: organization.to_string(),
                        source: GithubError::Parse(reason),
                    });
                }
            };
        }

        Ok(members)
    }

    /// Resolve a team by slug. A missing team is an error.
    pub async fn resolve_team(
        &self,
        organization: &str,
        slug: &str,
        cancel: &CancellationToken,
    ) -> Result<Team> {
        guarded(
            cancel,
            self.deps.invitations.team_by_slug(organization, slug),
        )
        .await
        .map_err(|source| SyncError::TeamResolution {
            organization: organization.to_string(),
            slug: slug.to_string(),
            source,
        })
    }

    /// Collect the logins of every pending invitation.
    ///
    /// Stops at the first page holding fewer than `INVITATIONS_PAGE_SIZE`
    /// entries, so a listing whose size is an exact multiple of the page size
    /// costs one extra (empty) request.
    pub async fn list_pending_invitations(
        &self,
        organization: &str,
        cancel: &CancellationToken,
    ) -> Result<HashSet<String>> {
        let mut logins = HashSet::new();
        let mut page = 1;

        loop {
            let invitations = guarded(
                cancel,
                self.deps.invitations.pending_invitations_page(
                    organization,
                    page,
                    INVITATIONS_PAGE_SIZE,
                ),
            )
            .await
            .map_err(|source| SyncError::InvitationList {
                organization: organization.to_string(),
                source,
            })?;

            let count = invitations.len();
            logins.extend(invitations.into_iter().filter_map(|i| i.login));
            debug!(organization, page, count, "Loaded pending invitations page");

            if count < INVITATIONS_PAGE_SIZE as usize {
                break;
            }
            page += 1;
        }

        Ok(logins)
    }

    pub async fn create_team_membership(
        &self,
        organization: &str,
        team_slug: &str,
        login: &str,
        cancel: &CancellationToken,
    ) -> Result<()> {
        guarded(
            cancel,
            self.deps
                .invitations
                .add_team_membership(organization, team_slug, login),
        )
        .await
        .map_err(|source| SyncError::MemberInvite {
            organization: organization.to_string(),
            team_slug: team_slug.to_string(),
            login: login.to_string(),
            source,
        })
    }

    /// Invite a member to the organization itself, without a team.
    pub async fn invite_to_organization(
        &self,
        organization: &str,
        member: &Member,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let invitee_id = member.database_id.ok_or_else(|| {
            organization_invite_error(
                organization,
                &member.login,
                GithubError::Parse(format!("no database id for {}", member.login)),
            )
        })?;

        guarded(
            cancel,
            self.deps
                .invitations
                .invite_to_organization(organization, invitee_id),
        )
        .await
        .map_err(|source| organization_invite_error(organization, &member.login, source))
    }
}

fn organization_invite_error(organization: &str, login: &str, source: GithubError) -> SyncError {
    SyncError::OrganizationInvite {
        organization: organization.to_string(),
        login: login.to_string(),
        source,
    }
}

/// Race a remote call against the run's cancellation token.
async fn guarded<T>(
    cancel: &CancellationToken,
    call: impl Future<Output = github_client::Result<T>>,
) -> github_client::Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(GithubError::Cancelled),
        result = call => result,
    }
}
