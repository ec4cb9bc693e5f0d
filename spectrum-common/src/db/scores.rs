//! Score row queries

use crate::{IdentityId, Result, ScoreVector};
use sqlx::SqlitePool;

/// Insert or overwrite one identity's score row
pub async fn upsert_score(pool: &SqlitePool, id: &IdentityId, scores: &ScoreVector) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO scores (identity_id, aut_score, norm_score, nice_score, toxic_score, updated_at)
        VALUES (?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(identity_id) DO UPDATE SET
            aut_score = excluded.aut_score,
            norm_score = excluded.norm_score,
            nice_score = excluded.nice_score,
            toxic_score = excluded.toxic_score,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(id.as_str())
    .bind(scores.autism)
    .bind(scores.normie)
    .bind(scores.nice)
    .bind(scores.toxic)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load every stored score row, ordered by identity
pub async fn load_all_scores(pool: &SqlitePool) -> Result<Vec<(IdentityId, ScoreVector)>> {
    let rows = sqlx::query_as::<_, (String, i64, i64, i64, i64)>(
        "SELECT identity_id, aut_score, norm_score, nice_score, toxic_score FROM scores ORDER BY identity_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, aut, norm, nice, toxic)| {
            (IdentityId::new(id), ScoreVector::new(aut, norm, nice, toxic))
        })
        .collect())
}

/// Load one identity's score row
pub async fn load_score(pool: &SqlitePool, id: &IdentityId) -> Result<Option<ScoreVector>> {
    let row = sqlx::query_as::<_, (i64, i64, i64, i64)>(
        "SELECT aut_score, norm_score, nice_score, toxic_score FROM scores WHERE identity_id = ?",
    )
    .bind(id.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(aut, norm, nice, toxic)| ScoreVector::new(aut, norm, nice, toxic)))
}
