//! HTTP-level tests for the GitHub client against a local mock server.

use github_client::{AccessToken, CreateInvitationRequest, GithubClient, GithubError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> GithubClient {
    GithubClient::new(AccessToken::new("ghp_test").unwrap())
        .unwrap()
        .with_base_url(server.uri())
}

#[tokio::test]
async fn members_page_is_decoded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", "Bearer ghp_test"))
        .and(body_partial_json(json!({
            "variables": { "organization": "acme", "cursor": null, "first": 100 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "organization": {
                    "membersWithRole": {
                        "pageInfo": { "hasNextPage": true, "endCursor": "Y3Vyc29yOjE=" },
                        "edges": [
                            { "node": { "id": "MDQ6VXNlcjE=", "databaseId": 1, "login": "alice", "name": "Alice" } },
                            { "node": { "id": "MDQ6VXNlcjI=", "databaseId": 2, "login": "bob", "name": null } }
                        ]
                    }
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let page = client.organization_members("acme", 100, None).await.unwrap();

    assert!(page.page_info.has_next_page);
    assert_eq!(page.page_info.end_cursor.as_deref(), Some("Y3Vyc29yOjE="));
    assert_eq!(page.edges.len(), 2);
    assert_eq!(page.edges[0].node.login, "alice");
    assert_eq!(page.edges[0].node.database_id, Some(1));
    assert_eq!(page.edges[1].node.name, None);
}

#[tokio::test]
async fn members_cursor_is_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "variables": { "cursor": "abc" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "organization": {
                    "membersWithRole": {
                        "pageInfo": { "hasNextPage": false, "endCursor": null },
                        "edges": []
                    }
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let page = client
        .organization_members("acme", 100, Some("abc"))
        .await
        .unwrap();

    assert!(!page.page_info.has_next_page);
    assert!(page.edges.is_empty());
}

#[tokio::test]
async fn unknown_organization_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "organization": null },
            "errors": [{
                "type": "NOT_FOUND",
                "message": "Could not resolve to an Organization with the login of 'nope'."
            }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .organization_members("nope", 100, None)
        .await
        .unwrap_err();

    assert!(err.is_not_found(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn graphql_errors_are_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Something went wrong" }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .organization_members("acme", 100, None)
        .await
        .unwrap_err();

    match err {
        GithubError::GraphQL(message) => assert_eq!(message, "Something went wrong"),
        other => panic!("expected GraphQL error, got {other:?}"),
    }
}

#[tokio::test]
async fn unauthorized_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .organization_members("acme", 100, None)
        .await
        .unwrap_err();

    match err {
        GithubError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Bad credentials");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn team_by_slug_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orgs/acme/teams/core"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "node_id": "MDQ6VGVhbTQy",
            "slug": "core",
            "name": "Core"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let team = client.team_by_slug("acme", "core").await.unwrap();

    assert_eq!(team.id, 42);
    assert_eq!(team.slug, "core");
}

#[tokio::test]
async fn team_by_slug_missing_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orgs/acme/teams/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.team_by_slug("acme", "ghost").await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn invitations_page_uses_query_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orgs/acme/invitations"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "login": "carol", "email": null, "role": "direct_member",
              "created_at": "2024-03-01T10:00:00Z" },
            { "id": 2, "login": null, "email": "dave@example.com", "role": "direct_member",
              "created_at": null }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let invitations = client.organization_invitations("acme", 2, 30).await.unwrap();

    assert_eq!(invitations.len(), 2);
    assert_eq!(invitations[0].login.as_deref(), Some("carol"));
    assert!(invitations[0].created_at.is_some());
    assert_eq!(invitations[1].login, None);
}

#[tokio::test]
async fn add_team_membership_puts_member_role() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/orgs/acme/teams/core/memberships/alice"))
        .and(body_partial_json(json!({ "role": "member" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "pending",
            "role": "member",
            "url": "https://api.github.com/teams/42/memberships/alice"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let membership = client
        .add_team_membership("acme", "core", "alice")
        .await
        .unwrap();

    assert_eq!(membership.state, "pending");
}

#[tokio::test]
async fn create_invitation_posts_invitee_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/orgs/acme/invitations"))
        .and(body_partial_json(json!({ "invitee_id": 7, "role": "direct_member" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 99, "login": "erin", "email": null, "role": "direct_member",
            "created_at": "2024-03-01T10:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let invitation = client
        .create_organization_invitation(
            "acme",
            &CreateInvitationRequest {
                invitee_id: 7,
                role: "direct_member".to_string(),
                team_ids: vec![],
            },
        )
        .await
        .unwrap();

    assert_eq!(invitation.id, 99);
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orgs/acme/teams/core"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.team_by_slug("acme", "core").await.unwrap_err();

    assert!(matches!(err, GithubError::Parse(_)));
}
