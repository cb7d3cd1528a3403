//! Domain entities for the Teamdesk teams domain
//!
//! Teams are addressed by slug in URLs. Memberships carry a role; any role
//! grants read access, only `OWNER` grants update and delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use teamdesk_common::{Error, Result};

/// Maximum length of a team display name
pub const MAX_TEAM_NAME_LEN: usize = 100;

/// Maximum length of a team slug
pub const MAX_TEAM_SLUG_LEN: usize = 50;

/// Maximum length of a team domain (RFC 1035 name limit)
pub const MAX_TEAM_DOMAIN_LEN: usize = 253;

/// Team membership role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "team_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TeamRole {
    Owner,
    Admin,
    #[default]
    Member,
}

impl std::fmt::Display for TeamRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamRole::Owner => write!(f, "OWNER"),
            TeamRole::Admin => write!(f, "ADMIN"),
            TeamRole::Member => write!(f, "MEMBER"),
        }
    }
}

impl TeamRole {
    /// Check if this role is owner
    pub fn is_owner(&self) -> bool {
        matches!(self, TeamRole::Owner)
    }
}

/// Team entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub domain: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Create a new team with validation
    pub fn new(name: String, slug: String) -> Result<Self> {
        if name.is_empty() || name.chars().count() > MAX_TEAM_NAME_LEN {
            return Err(Error::Validation(
                "Team name must be 1-100 characters".to_string(),
            ));
        }
        Self::validate_slug(&slug)?;

        let now = Utc::now();
        Ok(Team {
            id: Uuid::new_v4(),
            name,
            slug,
            domain: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Validate slug format: lowercase alphanumerics and single hyphens
    pub fn validate_slug(slug: &str) -> Result<()> {
        if slug.is_empty() || slug.len() > MAX_TEAM_SLUG_LEN {
            return Err(Error::Validation(
                "Slug must be 1-50 characters".to_string(),
            ));
        }

        if !slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(Error::Validation(
                "Slug must contain only lowercase letters, numbers, and hyphens".to_string(),
            ));
        }

        if slug.starts_with('-') || slug.ends_with('-') {
            return Err(Error::Validation(
                "Slug cannot start or end with a hyphen".to_string(),
            ));
        }

        if slug.contains("--") {
            return Err(Error::Validation(
                "Slug cannot contain consecutive hyphens".to_string(),
            ));
        }

        Ok(())
    }

    /// Apply a partial update; absent fields stay untouched
    pub fn apply(&mut self, changes: TeamChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(slug) = changes.slug {
            self.slug = slug;
        }
        if let Some(domain) = changes.domain {
            self.domain = domain;
        }
        self.updated_at = Utc::now();
    }
}

/// Team membership
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub role: TeamRole,
    pub created_at: DateTime<Utc>,
}

impl TeamMember {
    pub fn new(team_id: Uuid, user_id: Uuid, role: TeamRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_id,
            user_id,
            role,
            created_at: Utc::now(),
        }
    }
}

/// Custom validation function for slug format
fn validate_slug_format(slug: &str) -> std::result::Result<(), validator::ValidationError> {
    Team::validate_slug(slug).map_err(|_| validator::ValidationError::new("invalid_format"))
}

/// Deserialize a field that distinguishes "absent" (`None`) from `null` (`Some(None)`).
///
/// Pair with `#[serde(default)]` so a missing key stays `None`.
pub(crate) fn nullable_field<'de, D, T>(
    deserializer: D,
) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial update accepted by the team store.
///
/// The store validates before writing; callers pass values through untouched.
/// `domain` is tri-state: absent leaves it, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
pub struct TeamChanges {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_slug_format", message = "Invalid slug format"))]
    pub slug: Option<String>,

    #[serde(default, deserialize_with = "nullable_field")]
    pub domain: Option<Option<String>>,
}

impl TeamChanges {
    /// True when the update would change nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.slug.is_none() && self.domain.is_none()
    }

    /// Domain to write when one is being set (not cleared)
    pub fn new_domain(&self) -> Option<&str> {
        self.domain.as_ref().and_then(|d| d.as_deref())
    }

    /// Validate, mapping failures onto the shared error type
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| Error::Validation(format!("Validation failed: {}", e)))?;

        if let Some(domain) = self.new_domain() {
            if domain.is_empty() || domain.chars().count() > MAX_TEAM_DOMAIN_LEN {
                return Err(Error::Validation(
                    "Validation failed: domain must be 1-253 characters".to_string(),
                ));
            }
        }

        Ok(())
    }
}
