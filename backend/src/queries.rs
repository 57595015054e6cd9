use shared::models::{Vote, VoteFields};
use sqlx::postgres::PgQueryResult;
use sqlx::PgPool;
use uuid::Uuid;

pub struct Queries;

impl Queries {
    /// Full table, newest first (the order the dashboard renders).
    pub async fn list_votes(pool: &PgPool) -> Result<Vec<Vote>, sqlx::Error> {
        sqlx::query_as::<_, Vote>(
            "SELECT id, voter_name, department, candidate, timestamp_ms
             FROM votes ORDER BY timestamp_ms DESC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn insert_vote(pool: &PgPool, vote: &Vote) -> Result<PgQueryResult, sqlx::Error> {
        sqlx::query(
            "INSERT INTO votes (id, voter_name, department, candidate, timestamp_ms)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(vote.id)
        .bind(&vote.voter_name)
        .bind(vote.department)
        .bind(vote.candidate)
        .bind(vote.timestamp_ms)
        .execute(pool)
        .await
    }

    /// Updates the three mutable fields; id and timestamp stay fixed.
    /// Returns the number of rows touched so a missing id is detectable.
    pub async fn update_vote(
        pool: &PgPool,
        id: Uuid,
        fields: &VoteFields,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE votes SET voter_name = $2, department = $3, candidate = $4
             WHERE id = $1",
        )
        .bind(id)
        .bind(&fields.voter_name)
        .bind(fields.department)
        .bind(fields.candidate)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_vote(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM votes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
