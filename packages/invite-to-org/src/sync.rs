//! Driver for one synchronization run.
//!
//! Loads the source snapshot, then the target snapshot, diffs them and hands
//! the missing members to the invitation coordinator. Strictly sequential.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::domains::invitation::{InvitationCoordinator, InvitationReport};
use crate::domains::organization::{Member, Organization};
use crate::error::{Result, SyncError};
use crate::kernel::RemoteOrganizationClient;

/// Counts reported at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    pub source_members: usize,
    pub target_members: usize,
    pub missing: Vec<Member>,
    pub invitations: InvitationReport,
}

impl SyncSummary {
    /// Invitations actually attempted, irrespective of individual failures.
    pub fn members_added(&self) -> usize {
        self.invitations.attempted
    }
}

pub async fn run(
    config: &Config,
    client: Arc<RemoteOrganizationClient>,
    cancel: &CancellationToken,
) -> Result<SyncSummary> {
    info!(
        enterprise = %config.enterprise,
        source_organization = %config.source_organization,
        target_organization = %config.target_organization,
        team = config.team.as_deref().unwrap_or(""),
        dry_run = config.dry_run,
        github_token = %config.github_token,
        "Configuration"
    );

    let source = Organization::new(client.clone(), &config.source_organization, config.dry_run);
    let source_members = source.members(cancel).await.inspect_err(log_failure)?;
    info!(organization = source.name(), members = source_members.len(), "Loaded members");

    let target = Organization::new(client, &config.target_organization, config.dry_run)
        .with_team(config.team.clone());
    let target_members = target.members(cancel).await.inspect_err(log_failure)?.len();
    info!(organization = target.name(), members = target_members, "Loaded members");

    let missing = target.missing_members(source_members);
    info!(
        source_organization = source.name(),
        target_organization = target.name(),
        missing = missing.len(),
        "Computed missing members"
    );

    let invitations = if missing.is_empty() {
        info!(organization = target.name(), "No members missing - nothing to invite");
        InvitationReport {
            dry_run: config.dry_run,
            ..Default::default()
        }
    } else {
        InvitationCoordinator::for_organization(&target)
            .invite(&config.enterprise, &missing, cancel)
            .await
            .inspect_err(log_failure)?
    };

    let summary = SyncSummary {
        source_members: source_members.len(),
        target_members,
        missing,
        invitations,
    };

    info!(
        members_added = summary.members_added(),
        failed = summary.invitations.failed,
        skipped_pending = summary.invitations.skipped_pending,
        dry_run = summary.invitations.dry_run,
        "Done"
    );
    Ok(summary)
}

fn log_failure(err: &SyncError) {
    error!(
        organization = err.organization().unwrap_or_default(),
        operation = err.operation(),
        cancelled = err.is_cancelled(),
        error = %err,
        "Synchronization aborted"
    );
}
