//! Team repository

use crate::domain::entities::{Team, TeamChanges};
use sqlx::PgPool;
use teamdesk_common::{Error, RepositoryError, Result};

#[derive(Clone)]
pub struct TeamRepository {
    pool: PgPool,
}

impl TeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find team by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Team>> {
        let row: Option<Team> = sqlx::query_as(
            r#"
            SELECT id, name, slug, domain, created_at, updated_at
            FROM teams
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Insert a new team
    pub async fn create(&self, team: &Team) -> Result<Team> {
        let created: Team = sqlx::query_as(
            r#"
            INSERT INTO teams (id, name, slug, domain, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, slug, domain, created_at, updated_at
            "#,
        )
        .bind(team.id)
        .bind(&team.name)
        .bind(&team.slug)
        .bind(&team.domain)
        .bind(team.created_at)
        .bind(team.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or(e, &team.slug))?;

        Ok(created)
    }

    /// Apply a partial update to the team addressed by `slug`
    pub async fn update_by_slug(&self, slug: &str, changes: &TeamChanges) -> Result<Team> {
        let updated: Option<Team> = sqlx::query_as(
            r#"
            UPDATE teams
            SET name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                domain = CASE WHEN $5 THEN $4 ELSE domain END,
                updated_at = NOW()
            WHERE slug = $1
            RETURNING id, name, slug, domain, created_at, updated_at
            "#,
        )
        .bind(slug)
        .bind(&changes.name)
        .bind(&changes.slug)
        .bind(changes.new_domain())
        .bind(changes.domain.is_some())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_or(e, changes.slug.as_deref().unwrap_or(slug)))?;

        updated.ok_or_else(|| Error::NotFound(format!("Team '{}' not found", slug)))
    }

    /// Delete the team addressed by `slug`; memberships cascade
    pub async fn delete_by_slug(&self, slug: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM teams WHERE slug = $1")
            .bind(slug)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound.into());
        }

        Ok(())
    }
}

/// Map unique violations to a conflict naming the slug, anything else to a database error
fn conflict_or(err: sqlx::Error, slug: &str) -> Error {
    match RepositoryError::from_sqlx(err) {
        RepositoryError::AlreadyExists => {
            Error::Conflict(format!("Team slug or domain for '{}' already exists", slug))
        }
        other => other.into(),
    }
}
