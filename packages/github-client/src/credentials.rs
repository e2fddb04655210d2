//! GitHub access tokens.
//!
//! The raw value lives in a `secrecy::SecretString` and only leaves it for the
//! `Authorization` header. Formatting shows the token family, never the secret.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::sync::Arc;

use crate::error::{GithubError, Result};

/// Token family, recognised by GitHub's documented prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `ghp_`
    PersonalAccess,
    /// `github_pat_`
    FineGrainedPersonalAccess,
    /// `gho_`
    OAuth,
    /// `ghu_`
    UserToServer,
    /// `ghs_`
    ServerToServer,
    /// `ghr_`
    Refresh,
    /// No known prefix (GitHub Enterprise Server, legacy 40-hex tokens)
    Unknown,
}

const PREFIXES: &[(&str, TokenKind)] = &[
    ("github_pat_", TokenKind::FineGrainedPersonalAccess),
    ("ghp_", TokenKind::PersonalAccess),
    ("gho_", TokenKind::OAuth),
    ("ghu_", TokenKind::UserToServer),
    ("ghs_", TokenKind::ServerToServer),
    ("ghr_", TokenKind::Refresh),
];

/// A validated, non-empty GitHub token. Clones share the same secret.
#[derive(Clone)]
pub struct AccessToken {
    secret: Arc<SecretString>,
    kind: TokenKind,
}

impl AccessToken {
    /// Accept a token, trimming surrounding whitespace. Blank input is rejected.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let value = value.trim();
        if value.is_empty() {
            return Err(GithubError::Config("access token is empty".into()));
        }

        let kind = PREFIXES
            .iter()
            .find(|(prefix, _)| value.starts_with(prefix))
            .map_or(TokenKind::Unknown, |(_, kind)| *kind);

        Ok(Self {
            secret: Arc::new(SecretString::from(value.to_owned())),
            kind,
        })
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Raw value for the bearer header.
    pub fn expose(&self) -> &str {
        self.secret.expose_secret()
    }

    fn prefix(&self) -> &'static str {
        PREFIXES
            .iter()
            .find(|(_, kind)| *kind == self.kind)
            .map_or("", |(prefix, _)| *prefix)
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}***", self.prefix())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting_never_shows_the_secret() {
        let token = AccessToken::new("ghp_supersecret").unwrap();
        assert_eq!(token.to_string(), "ghp_***");
        assert!(!format!("{:?}", token).contains("supersecret"));

        let legacy = AccessToken::new("0123456789abcdef").unwrap();
        assert_eq!(legacy.to_string(), "***");
    }

    #[test]
    fn blank_tokens_are_rejected() {
        for blank in ["", "   ", "\n\t"] {
            let err = AccessToken::new(blank).unwrap_err();
            assert!(matches!(err, GithubError::Config(_)));
        }
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let token = AccessToken::new("  ghs_installation\n").unwrap();
        assert_eq!(token.expose(), "ghs_installation");
        assert_eq!(token.clone().expose(), "ghs_installation");
    }

    #[test]
    fn kind_follows_prefix() {
        let kind = |raw: &str| AccessToken::new(raw).unwrap().kind();
        assert_eq!(kind("ghp_x"), TokenKind::PersonalAccess);
        assert_eq!(kind("github_pat_x"), TokenKind::FineGrainedPersonalAccess);
        assert_eq!(kind("gho_x"), TokenKind::OAuth);
        assert_eq!(kind("ghu_x"), TokenKind::UserToServer);
        assert_eq!(kind("ghs_x"), TokenKind::ServerToServer);
        assert_eq!(kind("ghr_x"), TokenKind::Refresh);
        assert_eq!(kind("deadbeef"), TokenKind::Unknown);
    }
}
