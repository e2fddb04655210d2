use std::sync::Arc;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{differ, Member};
use crate::error::Result;
use crate::kernel::RemoteOrganizationClient;

/// Lifecycle of an organization's member snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loaded,
}

/// A synchronization unit: one organization plus its lazily loaded member snapshot.
///
/// The snapshot is loaded on the first successful call to [`Organization::members`]
/// and frozen afterwards. A failed load leaves the organization `NotLoaded`.
pub struct Organization {
    name: String,
    team_slug: Option<String>,
    dry_run: bool,
    client: Arc<RemoteOrganizationClient>,
    snapshot: OnceCell<Vec<Member>>,
}

impl Organization {
    pub fn new(client: Arc<RemoteOrganizationClient>, name: impl Into<String>, dry_run: bool) -> Self {
        Self {
            name: name.into(),
            team_slug: None,
            dry_run,
            client,
            snapshot: OnceCell::new(),
        }
    }

    /// Scope invitations into this organization to a team.
    pub fn with_team(mut self, team_slug: Option<String>) -> Self {
        self.team_slug = team_slug;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn team_slug(&self) -> Option<&str> {
        self.team_slug.as_deref()
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn client(&self) -> &Arc<RemoteOrganizationClient> {
        &self.client
    }

    pub fn state(&self) -> LoadState {
        if self.snapshot.initialized() {
            LoadState::Loaded
        } else {
            LoadState::NotLoaded
        }
    }

    /// The member snapshot, loading it on first access.
    pub async fn members(&self, cancel: &CancellationToken) -> Result<&[Member]> {
        let members = self
            .snapshot
            .get_or_try_init(|| async {
                debug!(organization = %self.name, "Organization members not loaded");
                let members = self.client.list_members(&self.name, cancel).await?;
                debug!(organization = %self.name, members = members.len(), "Organization members loaded");
                Ok::<_, crate::error::SyncError>(members)
            })
            .await?;
        Ok(members.as_slice())
    }

    /// Exact, case-sensitive login lookup in the loaded snapshot.
    /// Always false while the snapshot is not loaded.
    pub fn has_member(&self, login: &str) -> bool {
        self.snapshot
            .get()
            .is_some_and(|members| members.iter().any(|m| m.login == login))
    }

    /// Members of `source` that are not members of this organization.
    pub fn missing_members(&self, source: &[Member]) -> Vec<Member> {
        differ::missing_members(source, self)
    }
}
