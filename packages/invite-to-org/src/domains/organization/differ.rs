//! Pure membership diff.
//!
//! Identity is the login, compared exactly. No side effects.

use super::{Member, Organization};

/// Members of `source`, in source order, whose login is not a member of `target`.
///
/// `target` must already be loaded; an unloaded target has no members, so every
/// source member would be reported missing.
pub fn missing_members(source: &[Member], target: &Organization) -> Vec<Member> {
    source
        .iter()
        .filter(|member| !target.has_member(&member.login))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{MockGithub, RemoteOrganizationClient};
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;

    async fn loaded(name: &str, logins: &[&str]) -> Organization {
        let mock = Arc::new(MockGithub::new().with_member_logins(name, logins));
        let client = Arc::new(RemoteOrganizationClient::new(mock.deps()));
        let org = Organization::new(client, name, false);
        org.members(&CancellationToken::new()).await.unwrap();
        org
    }

    fn members(logins: &[&str]) -> Vec<Member> {
        logins
            .iter()
            .map(|l| Member::new(format!("id-{l}"), *l, ""))
            .collect()
    }

    fn logins(members: &[Member]) -> Vec<&str> {
        members.iter().map(|m| m.login.as_str()).collect()
    }

    #[tokio::test]
    async fn reports_source_members_absent_from_target() {
        let target = loaded("target", &["b"]).await;
        let source = members(&["a", "b", "c"]);

        assert_eq!(logins(&missing_members(&source, &target)), vec!["a", "c"]);
    }

    #[tokio::test]
    async fn preserves_source_order() {
        let target = loaded("target", &["m"]).await;
        let source = members(&["z", "m", "a", "k"]);

        assert_eq!(logins(&missing_members(&source, &target)), vec!["z", "a", "k"]);
    }

    #[tokio::test]
    async fn identical_organizations_have_no_diff() {
        let target = loaded("target", &["a", "b"]).await;
        let source = members(&["b", "a"]);

        assert!(missing_members(&source, &target).is_empty());
    }

    #[tokio::test]
    async fn empty_target_reports_everyone() {
        let target = loaded("target", &[]).await;
        let source = members(&["a", "b"]);

        assert_eq!(target.missing_members(&source), source);
    }

    #[tokio::test]
    async fn login_match_is_case_sensitive() {
        let target = loaded("target", &["Alice"]).await;
        let source = members(&["alice", "Alice"]);

        assert_eq!(logins(&missing_members(&source, &target)), vec!["alice"]);
    }

    #[tokio::test]
    async fn target_members_not_in_source_are_ignored() {
        let target = loaded("target", &["x", "y"]).await;
        let source = members(&["a"]);

        assert_eq!(logins(&missing_members(&source, &target)), vec!["a"]);
    }
}
