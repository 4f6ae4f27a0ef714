//! Organizations and the per-request session.
//!
//! There is no ambient "current user": the server authenticates each
//! request, builds a [`Session`] and hands it to the handler explicitly.

use serde::{Deserialize, Serialize};

/// Brand colours used by the dashboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub primary: String,
    pub secondary: String,
    pub tertiary: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: "#6A5ACD".to_string(),
            secondary: "#9B87FF".to_string(),
            tertiary: "#C7BFFF".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Stored as provided by the dataset. Never serialized back out.
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ein: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Identity attached to an authenticated request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub organization: Organization,
}

impl Session {
    /// Looks up an active organization by e-mail and password.
    ///
    /// Comparison is exact on both fields.
    pub fn authenticate(organizations: &[Organization], email: &str, password: &str) -> Option<Self> {
        if email.is_empty() || password.is_empty() {
            return None;
        }
        organizations
            .iter()
            .find(|org| org.is_active && org.email == email && org.password == password)
            .map(|org| Self {
                organization: org.clone(),
            })
    }

    pub fn organization_id(&self) -> &str {
        &self.organization.id
    }

    pub fn theme(&self) -> &Theme {
        &self.organization.theme
    }
}
