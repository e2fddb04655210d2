//! A full run wired through the real GitHub adapter against a local mock server.

use invite_core::kernel::{OrganizationDeps, RemoteOrganizationClient};
use invite_core::{sync, Args, Config};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn members(logins: &[(&str, u64)]) -> Value {
    let edges: Vec<Value> = logins
        .iter()
        .map(|(login, id)| {
            json!({ "node": { "id": format!("U_{}", login), "databaseId": id, "login": login, "name": null } })
        })
        .collect();
    json!({
        "data": {
            "organization": {
                "membersWithRole": {
                    "pageInfo": { "hasNextPage": false, "endCursor": null },
                    "edges": edges
                }
            }
        }
    })
}

async fn mount_members(server: &MockServer, organization: &str, logins: &[(&str, u64)]) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "variables": { "organization": organization } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(members(logins)))
        .expect(1)
        .mount(server)
        .await;
}

fn config(server: &MockServer, team: Option<&str>) -> Config {
    Config::from_args(Args {
        github_token: Some("ghp_test".into()),
        enterprise: Some("acme-enterprise".into()),
        source_organization: Some("source".into()),
        target_organization: Some("target".into()),
        team: team.map(str::to_string),
        dry_run: false,
        verbose: 0,
        api_url: server.uri(),
    })
    .unwrap()
}

fn client(config: &Config) -> Arc<RemoteOrganizationClient> {
    let deps = OrganizationDeps::from_token(config.github_token.clone(), &config.api_url).unwrap();
    Arc::new(RemoteOrganizationClient::new(deps))
}

#[tokio::test]
async fn adds_missing_member_to_team_over_http() {
    let server = MockServer::start().await;
    mount_members(&server, "source", &[("alice", 1), ("bob", 2)]).await;
    mount_members(&server, "target", &[("bob", 2)]).await;

    Mock::given(method("GET"))
        .and(path("/orgs/target/teams/core"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42, "node_id": "T_core", "slug": "core", "name": "Core"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orgs/target/invitations"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/orgs/target/teams/core/memberships/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "pending", "role": "member"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server, Some("core"));
    let summary = sync::run(&config, client(&config), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.members_added(), 1);
    assert_eq!(summary.invitations.failed, 0);
}

#[tokio::test]
async fn invites_to_organization_without_team_over_http() {
    let server = MockServer::start().await;
    mount_members(&server, "source", &[("alice", 7)]).await;
    mount_members(&server, "target", &[]).await;

    Mock::given(method("GET"))
        .and(path("/orgs/target/invitations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/orgs/target/invitations"))
        .and(body_partial_json(json!({ "invitee_id": 7, "role": "direct_member" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 1, "login": "alice", "email": null, "role": "direct_member"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server, None);
    let summary = sync::run(&config, client(&config), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.members_added(), 1);
}

#[tokio::test]
async fn rejected_membership_is_counted_not_fatal() {
    let server = MockServer::start().await;
    mount_members(&server, "source", &[("alice", 1), ("carol", 3)]).await;
    mount_members(&server, "target", &[]).await;

    Mock::given(method("GET"))
        .and(path("/orgs/target/teams/core"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42, "node_id": "T_core", "slug": "core", "name": "Core"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orgs/target/invitations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/orgs/target/teams/core/memberships/alice"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({ "message": "Validation Failed" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/orgs/target/teams/core/memberships/carol"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "active", "role": "member"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server, Some("core"));
    let summary = sync::run(&config, client(&config), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.members_added(), 2);
    assert_eq!(summary.invitations.failed, 1);
}
