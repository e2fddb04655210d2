use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// GraphQL envelope
// ============================================================================

/// Body of a GraphQL POST.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQLRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

/// Response envelope shared by every GraphQL query.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQLErrorEntry>,
}

/// A single entry of the GraphQL `errors` array.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLErrorEntry {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
}

// ============================================================================
// Organization members (GraphQL)
// ============================================================================

pub(crate) const MEMBERS_QUERY: &str = r#"
query($organization: String!, $cursor: String, $first: Int!) {
  organization(login: $organization) {
    membersWithRole(first: $first, after: $cursor) {
      pageInfo { hasNextPage endCursor }
      edges { node { id databaseId login name } }
    }
  }
}
"#;

/// Variables for the membership query.
#[derive(Debug, Clone, Serialize)]
pub struct MembersQueryVariables {
    pub organization: String,
    pub cursor: Option<String>,
    pub first: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MembersQueryData {
    pub organization: Option<OrganizationMembers>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationMembers {
    #[serde(rename = "membersWithRole")]
    pub members_with_role: MembersConnection,
}

/// One page of `membersWithRole`.
#[derive(Debug, Clone, Deserialize)]
pub struct MembersConnection {
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
    #[serde(default)]
    pub edges: Vec<MemberEdge>,
}

/// Relay page info.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageInfo {
    #[serde(rename = "hasNextPage")]
    pub has_next_page: bool,
    #[serde(rename = "endCursor")]
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberEdge {
    pub node: MemberNode,
}

/// A user account as returned by the membership query.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberNode {
    pub id: String,
    #[serde(rename = "databaseId")]
    pub database_id: Option<u64>,
    pub login: String,
    pub name: Option<String>,
}

// ============================================================================
// REST: teams and invitations
// ============================================================================

/// `GET /orgs/{org}/teams/{slug}`
#[derive(Debug, Clone, Deserialize)]
pub struct Team {
    pub id: u64,
    pub node_id: Option<String>,
    pub slug: String,
    pub name: String,
}

/// Entry of `GET /orgs/{org}/invitations`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationInvitation {
    pub id: u64,
    /// Null for invitations sent to an email address.
    pub login: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `PUT /orgs/{org}/teams/{slug}/memberships/{username}`.
#[derive(Debug, Clone, Serialize)]
pub struct TeamMembershipRequest {
    pub role: String,
}

/// Response of the team membership call.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamMembership {
    /// `active` or `pending`
    pub state: String,
    pub role: String,
}

/// Body of `POST /orgs/{org}/invitations`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateInvitationRequest {
    pub invitee_id: u64,
    pub role: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub team_ids: Vec<u64>,
}
