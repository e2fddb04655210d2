//! Pure GitHub API client.
//!
//! A minimal client for the parts of the GitHub API needed to reconcile
//! organization membership: the GraphQL `membersWithRole` connection and the
//! REST endpoints for teams, pending invitations and team memberships.
//!
//! # Example
//!
//! ```rust,ignore
//! use github_client::{AccessToken, GithubClient};
//!
//! let client = GithubClient::new(AccessToken::new("ghp_...")?)?;
//!
//! let page = client.organization_members("my-org", 100, None).await?;
//! for edge in &page.edges {
//!     println!("{}", edge.node.login);
//! }
//! ```

pub mod credentials;
pub mod error;
pub mod types;

pub use credentials::{AccessToken, TokenKind};
pub use error::{GithubError, Result};
pub use types::{
    CreateInvitationRequest, GraphQLRequest, GraphQLResponse, MemberEdge, MemberNode,
    MembersConnection, MembersQueryVariables, OrganizationInvitation, PageInfo, Team,
    TeamMembership, TeamMembershipRequest,
};

use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use types::{MembersQueryData, MEMBERS_QUERY};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("invite-to-org/", env!("CARGO_PKG_VERSION"));
const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

/// GitHub API client. One instance serves both the GraphQL and REST protocols.
pub struct GithubClient {
    http_client: Client,
    token: AccessToken,
    base_url: String,
    graphql_url: String,
}

impl GithubClient {
    /// Create a client for github.com with the given access token.
    pub fn new(token: AccessToken) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| GithubError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            token,
            base_url: DEFAULT_API_URL.to_string(),
            graphql_url: graphql_url_for(DEFAULT_API_URL),
        })
    }

    /// Point the client at another REST base URL (GitHub Enterprise Server, test server).
    ///
    /// The GraphQL endpoint is derived from it: `{base}/graphql`, or
    /// `{host}/api/graphql` when the base ends in `/api/v3`.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self.graphql_url = graphql_url_for(&url);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn graphql_url(&self) -> &str {
        &self.graphql_url
    }

    /// Run a GraphQL query and return its `data` member.
    pub async fn graphql<V, T>(&self, query: &str, variables: V) -> Result<T>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let resp = self
            .http_client
            .post(&self.graphql_url)
            .bearer_auth(self.token.expose())
            .header(header::ACCEPT, ACCEPT)
            .json(&GraphQLRequest { query, variables })
            .send()
            .await?;

        let resp = check_status(resp, "graphql").await?;
        let envelope: GraphQLResponse<T> = parse_json(resp).await?;

        if !envelope.errors.is_empty() {
            let messages = envelope
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            if envelope
                .errors
                .iter()
                .any(|e| e.error_type.as_deref() == Some("NOT_FOUND"))
            {
                return Err(GithubError::NotFound { resource: messages });
            }
            return Err(GithubError::GraphQL(messages));
        }

        envelope
            .data
            .ok_or_else(|| GithubError::Parse("GraphQL response has no data".into()))
    }

    /// Fetch one page of an organization's members.
    pub async fn organization_members(
        &self,
        organization: &str,
        first: u32,
        after: Option<&str>,
    ) -> Result<MembersConnection> {
        let variables = MembersQueryVariables {
            organization: organization.to_string(),
            cursor: after.map(str::to_string),
            first,
        };

        let data: MembersQueryData = self.graphql(MEMBERS_QUERY, variables).await?;
        let org = data.organization.ok_or_else(|| GithubError::NotFound {
            resource: format!("organization {}", organization),
        })?;

        debug!(
            organization,
            edges = org.members_with_role.edges.len(),
            has_next_page = org.members_with_role.page_info.has_next_page,
            "Fetched members page"
        );
        Ok(org.members_with_role)
    }

    /// Look up a team by slug.
    pub async fn team_by_slug(&self, organization: &str, slug: &str) -> Result<Team> {
        let url = format!("{}/orgs/{}/teams/{}", self.base_url, organization, slug);
        let resp = self.rest_get(&url, &[]).await?;
        let resp = check_status(resp, &format!("team {}/{}", organization, slug)).await?;
        parse_json(resp).await
    }

    /// Fetch one page of pending invitations. Pages start at 1.
    pub async fn organization_invitations(
        &self,
        organization: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<OrganizationInvitation>> {
        let url = format!("{}/orgs/{}/invitations", self.base_url, organization);
        let query = [("page", page.to_string()), ("per_page", per_page.to_string())];
        let resp = self.rest_get(&url, &query).await?;
        let resp = check_status(resp, &format!("invitations of {}", organization)).await?;
        parse_json(resp).await
    }

    /// Add (or invite) a user to a team. Users outside the organization
    /// receive an organization invitation scoped to the team.
    pub async fn add_team_membership(
        &self,
        organization: &str,
        team_slug: &str,
        username: &str,
    ) -> Result<TeamMembership> {
        let url = format!(
            "{}/orgs/{}/teams/{}/memberships/{}",
            self.base_url, organization, team_slug, username
        );
        let resp = self
            .http_client
            .put(&url)
            .bearer_auth(self.token.expose())
            .header(header::ACCEPT, ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .json(&TeamMembershipRequest {
                role: "member".to_string(),
            })
            .send()
            .await?;

        let resp = check_status(
            resp,
            &format!("team membership {}/{}/{}", organization, team_slug, username),
        )
        .await?;
        parse_json(resp).await
    }

    /// Invite a user to the organization by numeric account id.
    pub async fn create_organization_invitation(
        &self,
        organization: &str,
        request: &CreateInvitationRequest,
    ) -> Result<OrganizationInvitation> {
        let url = format!("{}/orgs/{}/invitations", self.base_url, organization);
        let resp = self
            .http_client
            .post(&url)
            .bearer_auth(self.token.expose())
            .header(header::ACCEPT, ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .json(request)
            .send()
            .await?;

        let resp = check_status(resp, &format!("invitations of {}", organization)).await?;
        parse_json(resp).await
    }

    async fn rest_get(&self, url: &str, query: &[(&str, String)]) -> Result<Response> {
        let resp = self
            .http_client
            .get(url)
            .bearer_auth(self.token.expose())
            .header(header::ACCEPT, ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .query(query)
            .send()
            .await?;
        Ok(resp)
    }
}

fn graphql_url_for(base: &str) -> String {
    let base = base.trim_end_matches('/');
    match base.strip_suffix("/api/v3") {
        Some(host) => format!("{}/api/graphql", host),
        None => format!("{}/graphql", base),
    }
}

async fn check_status(resp: Response, resource: &str) -> Result<Response> {
    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        return Err(GithubError::NotFound {
            resource: resource.to_string(),
        });
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(GithubError::Api {
            status: status.as_u16(),
            message: body,
        });
    }
    Ok(resp)
}

async fn parse_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| GithubError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_url_for_dotcom() {
        assert_eq!(
            graphql_url_for("https://api.github.com"),
            "https://api.github.com/graphql"
        );
        assert_eq!(
            graphql_url_for("http://127.0.0.1:8080/"),
            "http://127.0.0.1:8080/graphql"
        );
    }

    #[test]
    fn graphql_url_for_enterprise_server() {
        assert_eq!(
            graphql_url_for("https://ghe.example.com/api/v3"),
            "https://ghe.example.com/api/graphql"
        );
    }

    #[test]
    fn with_base_url_trims_trailing_slash() {
        let client = GithubClient::new(AccessToken::new("token").unwrap())
            .unwrap()
            .with_base_url("https://ghe.example.com/api/v3/");
        assert_eq!(client.base_url(), "https://ghe.example.com/api/v3");
        assert_eq!(client.graphql_url(), "https://ghe.example.com/api/graphql");
    }
}
