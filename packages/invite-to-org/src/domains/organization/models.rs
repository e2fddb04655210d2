use std::fmt;

/// A platform account, as read from an organization's member listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Opaque node id
    pub id: String,
    /// Numeric account id, needed for organization-wide invitations
    pub database_id: Option<u64>,
    /// Identity key used for diffing
    pub login: String,
    /// Display name; empty when the account has none
    pub display_name: String,
}

impl Member {
    pub fn new(
        id: impl Into<String>,
        login: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            database_id: None,
            login: login.into(),
            display_name: display_name.into(),
        }
    }

    pub fn with_database_id(mut self, database_id: u64) -> Self {
        self.database_id = Some(database_id);
        self
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.display_name.is_empty() {
            f.write_str(&self.login)
        } else {
            write!(f, "{} ({})", self.login, self.display_name)
        }
    }
}

/// A team within the target organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: String,
    pub slug: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_name_when_present() {
        assert_eq!(Member::new("1", "alice", "Alice").to_string(), "alice (Alice)");
        assert_eq!(Member::new("2", "bob", "").to_string(), "bob");
    }
}
