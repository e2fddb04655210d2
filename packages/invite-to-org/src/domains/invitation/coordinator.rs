use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::domains::organization::{Member, Organization, Team};
use crate::error::Result;
use crate::kernel::RemoteOrganizationClient;

/// Phases of one invitation run. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationPhase {
    Idle,
    TeamResolved,
    InvitationsFetched,
    DryRunSkip,
    Inviting,
    Done,
}

impl fmt::Display for InvitationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InvitationPhase::Idle => "idle",
            InvitationPhase::TeamResolved => "team_resolved",
            InvitationPhase::InvitationsFetched => "invitations_fetched",
            InvitationPhase::DryRunSkip => "dry_run_skip",
            InvitationPhase::Inviting => "inviting",
            InvitationPhase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Outcome of one invitation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvitationReport {
    /// Membership creation calls issued, successful or not
    pub attempted: usize,
    /// Members skipped because an invitation is already pending
    pub skipped_pending: usize,
    /// Calls that failed (logged, not propagated)
    pub failed: usize,
    /// Members that would be invited; set in dry-run mode only
    pub would_invite: usize,
    pub dry_run: bool,
}

/// Where invitations go: a resolved team, or the organization itself.
enum InvitationTarget {
    Team(Team),
    Organization,
}

/// Issues invitations into the target organization for a list of missing members.
pub struct InvitationCoordinator {
    client: Arc<RemoteOrganizationClient>,
    organization: String,
    team_slug: Option<String>,
    dry_run: bool,
}

impl InvitationCoordinator {
    pub fn new(
        client: Arc<RemoteOrganizationClient>,
        organization: impl Into<String>,
        team_slug: Option<String>,
        dry_run: bool,
    ) -> Self {
        Self {
            client,
            organization: organization.into(),
            team_slug,
            dry_run,
        }
    }

    /// Coordinator for `target`, sharing its client, team and dry-run setting.
    pub fn for_organization(target: &Organization) -> Self {
        Self::new(
            target.client().clone(),
            target.name(),
            target.team_slug().map(str::to_string),
            target.dry_run(),
        )
    }

    /// Invite every member of `missing` that has no pending invitation.
    ///
    /// Team resolution and invitation listing failures abort the run. A failure
    /// to invite one member is logged and counted, and the loop continues.
    pub async fn invite(
        &self,
        enterprise: &str,
        missing: &[Member],
        cancel: &CancellationToken,
    ) -> Result<InvitationReport> {
        let organization = self.organization.as_str();
        let mut phase = InvitationPhase::Idle;
        info!(enterprise, organization, members = missing.len(), %phase, "Inviting members");

        let target = match &self.team_slug {
            Some(slug) => {
                let team = self.client.resolve_team(organization, slug, cancel).await?;
                debug!(organization, team = %team.slug, team_id = %team.id, "Resolved team");
                InvitationTarget::Team(team)
            }
            None => InvitationTarget::Organization,
        };
        phase = self.advance(phase, InvitationPhase::TeamResolved);

        let pending = self
            .client
            .list_pending_invitations(organization, cancel)
            .await?;
        phase = self.advance(phase, InvitationPhase::InvitationsFetched);
        debug!(organization, pending = pending.len(), "Loaded pending invitations");

        let mut report = InvitationReport {
            dry_run: self.dry_run,
            ..Default::default()
        };

        if self.dry_run {
            report.would_invite = missing
                .iter()
                .filter(|m| !pending.contains(&m.login))
                .count();
            report.skipped_pending = missing.len() - report.would_invite;
            phase = self.advance(phase, InvitationPhase::DryRunSkip);
            info!(
                organization,
                members = report.would_invite,
                "Dry run - skipping invite"
            );
            self.advance(phase, InvitationPhase::Done);
            return Ok(report);
        }

        phase = self.advance(phase, InvitationPhase::Inviting);
        for member in missing {
            if pending.contains(&member.login) {
                debug!(organization, login = %member.login, "Invitation already pending - skipping");
                report.skipped_pending += 1;
                continue;
            }

            info!(organization, login = %member.login, name = %member.display_name, "Invite member");
            report.attempted += 1;

            let result = match &target {
                InvitationTarget::Team(team) => {
                    self.client
                        .create_team_membership(organization, &team.slug, &member.login, cancel)
                        .await
                }
                InvitationTarget::Organization => {
                    self.client
                        .invite_to_organization(organization, member, cancel)
                        .await
                }
            };

            if let Err(e) = result {
                report.failed += 1;
                error!(
                    organization,
                    login = %member.login,
                    name = %member.display_name,
                    operation = e.operation(),
                    error = %e,
                    "Unable to invite member"
                );
            }
        }
        self.advance(phase, InvitationPhase::Done);

        Ok(report)
    }

    fn advance(&self, from: InvitationPhase, to: InvitationPhase) -> InvitationPhase {
        debug!(organization = %self.organization, %from, %to, "Invitation phase");
        to
    }
}
