// Mock transport for testing
//
// MockGithub implements both transport traits over in-memory data and records
// every call so tests can assert on what reached the remote side.

use async_trait::async_trait;
use github_client::{GithubError, Result};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use super::{BaseInvitationApi, BaseMemberDirectory, MembersPage, OrganizationDeps, PendingInvitation};
use crate::domains::organization::{Member, Team};

/// A call that reached the mock, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    MembersPage {
        organization: String,
        cursor: Option<String>,
    },
    TeamBySlug {
        organization: String,
        slug: String,
    },
    PendingInvitationsPage {
        organization: String,
        page: u32,
    },
    AddTeamMembership {
        organization: String,
        team_slug: String,
        login: String,
    },
    InviteToOrganization {
        organization: String,
        invitee_id: u64,
    },
}

impl MockCall {
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            MockCall::AddTeamMembership { .. } | MockCall::InviteToOrganization { .. }
        )
    }
}

#[derive(Default)]
pub struct MockGithub {
    members: HashMap<String, Vec<Member>>,
    failing_member_orgs: HashSet<String>,
    stalled_member_orgs: HashMap<String, Option<String>>,
    teams: HashMap<(String, String), Team>,
    pending: Vec<Option<String>>,
    fail_invitation_listing: bool,
    failing_logins: HashSet<String>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockGithub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an organization's members in listing order.
    pub fn with_members(mut self, organization: &str, members: Vec<Member>) -> Self {
        self.members.insert(organization.to_string(), members);
        self
    }

    /// Register members by login; ids and database ids are derived from position.
    pub fn with_member_logins<S: AsRef<str>>(self, organization: &str, logins: &[S]) -> Self {
        let members = logins
            .iter()
            .enumerate()
            .map(|(i, login)| {
                let login = login.as_ref();
                Member::new(format!("id-{}", login), login, login.to_uppercase())
                    .with_database_id(i as u64 + 1)
            })
            .collect();
        self.with_members(organization, members)
    }

    /// Every member page request for `organization` fails.
    pub fn failing_members(mut self, organization: &str) -> Self {
        self.failing_member_orgs.insert(organization.to_string());
        self
    }

    /// Every member page for `organization` claims a next page and returns `end_cursor`.
    pub fn stalled_members(mut self, organization: &str, end_cursor: Option<&str>) -> Self {
        self.stalled_member_orgs
            .insert(organization.to_string(), end_cursor.map(str::to_string));
        self
    }

    pub fn with_team(mut self, organization: &str, slug: &str) -> Self {
        self.teams.insert(
            (organization.to_string(), slug.to_string()),
            Team {
                id: format!("team-{}", slug),
                slug: slug.to_string(),
            },
        );
        self
    }

    /// Pending invitations by login, served 30 (or `per_page`) at a time.
    pub fn with_pending<S: AsRef<str>>(mut self, logins: &[S]) -> Self {
        self.pending
            .extend(logins.iter().map(|l| Some(l.as_ref().to_string())));
        self
    }

    /// Pending invitations sent to an email address (no login).
    pub fn with_email_invitations(mut self, count: usize) -> Self {
        self.pending.extend(std::iter::repeat(None).take(count));
        self
    }

    pub fn failing_invitation_listing(mut self) -> Self {
        self.fail_invitation_listing = true;
        self
    }

    /// Membership creation for `login` fails with a 422.
    pub fn failing_invite(mut self, login: &str) -> Self {
        self.failing_logins.insert(login.to_string());
        self
    }

    /// Transport dependencies backed by this mock for both protocols.
    pub fn deps(self: &Arc<Self>) -> OrganizationDeps {
        OrganizationDeps::new(self.clone(), self.clone())
    }

    // -------------------------------------------------------------------------
    // Assertions
    // -------------------------------------------------------------------------

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn member_page_requests(&self, organization: &str) -> usize {
        self.member_cursors(organization).len()
    }

    pub fn member_cursors(&self, organization: &str) -> Vec<Option<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MockCall::MembersPage {
                    organization: o,
                    cursor,
                } if o == organization => Some(cursor),
                _ => None,
            })
            .collect()
    }

    pub fn invitation_page_requests(&self) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MockCall::PendingInvitationsPage { page, .. } => Some(page),
                _ => None,
            })
            .collect()
    }

    pub fn team_lookups(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, MockCall::TeamBySlug { .. }))
            .count()
    }

    /// Logins passed to the team membership call, in order.
    pub fn membership_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MockCall::AddTeamMembership { login, .. } => Some(login),
                _ => None,
            })
            .collect()
    }

    pub fn organization_invitations(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MockCall::InviteToOrganization { invitee_id, .. } => Some(invitee_id),
                _ => None,
            })
            .collect()
    }

    pub fn mutating_calls(&self) -> usize {
        self.calls().iter().filter(|c| c.is_mutating()).count()
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BaseMemberDirectory for MockGithub {
    async fn members_page(
        &self,
        organization: &str,
        cursor: Option<&str>,
        page_size: u32,
    ) -> Result<MembersPage> {
        self.record(MockCall::MembersPage {
            organization: organization.to_string(),
            cursor: cursor.map(str::to_string),
        });

        if self.failing_member_orgs.contains(organization) {
            return Err(GithubError::Api {
                status: 502,
                message: "Bad Gateway".into(),
            });
        }
        let members = self
            .members
            .get(organization)
            .ok_or_else(|| GithubError::NotFound {
                resource: format!("organization {}", organization),
            })?;

        if let Some(end_cursor) = self.stalled_member_orgs.get(organization) {
            return Ok(MembersPage {
                members: members.clone(),
                has_next_page: true,
                end_cursor: end_cursor.clone(),
            });
        }

        let start = match cursor {
            Some(c) => c
                .parse::<usize>()
                .map_err(|e| GithubError::Parse(e.to_string()))?,
            None => 0,
        };
        let end = (start + page_size as usize).min(members.len());
        let has_next_page = end < members.len();

        Ok(MembersPage {
            members: members[start.min(end)..end].to_vec(),
            has_next_page,
            end_cursor: has_next_page.then(|| end.to_string()),
        })
    }
}

#[async_trait]
impl BaseInvitationApi for MockGithub {
    async fn team_by_slug(&self, organization: &str, slug: &str) -> Result<Team> {
        self.record(MockCall::TeamBySlug {
            organization: organization.to_string(),
            slug: slug.to_string(),
        });

        self.teams
            .get(&(organization.to_string(), slug.to_string()))
            .cloned()
            .ok_or_else(|| GithubError::NotFound {
                resource: format!("team {}/{}", organization, slug),
            })
    }

    async fn pending_invitations_page(
        &self,
        organization: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PendingInvitation>> {
        self.record(MockCall::PendingInvitationsPage {
            organization: organization.to_string(),
            page,
        });

        if self.fail_invitation_listing {
            return Err(GithubError::Api {
                status: 403,
                message: "Resource not accessible by integration".into(),
            });
        }

        Ok(self
            .pending
            .iter()
            .skip((page.saturating_sub(1) * per_page) as usize)
            .take(per_page as usize)
            .map(|login| PendingInvitation {
                login: login.clone(),
            })
            .collect())
    }

    async fn add_team_membership(
        &self,
        organization: &str,
        team_slug: &str,
        login: &str,
    ) -> Result<()> {
        self.record(MockCall::AddTeamMembership {
            organization: organization.to_string(),
            team_slug: team_slug.to_string(),
            login: login.to_string(),
        });

        if self.failing_logins.contains(login) {
            return Err(GithubError::Api {
                status: 422,
                message: "Validation Failed".into(),
            });
        }
        Ok(())
    }

    async fn invite_to_organization(&self, organization: &str, invitee_id: u64) -> Result<()> {
        self.record(MockCall::InviteToOrganization {
            organization: organization.to_string(),
            invitee_id,
        });
        Ok(())
    }
}
