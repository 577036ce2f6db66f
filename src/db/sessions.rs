use crate::db::{models::*, DbPool};
use crate::error::Result;
use chrono::{Duration, Utc};

/// Store a session token for a user, valid for `ttl`
pub async fn create_session(
    pool: &DbPool,
    token: &str,
    user_id: i64,
    ttl: Duration,
) -> Result<Session> {
    let now = Utc::now();

    let session = sqlx::query_as::<_, Session>(
        r#"
        INSERT INTO sessions (token, user_id, created_at, expires_at)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(token)
    .bind(user_id)
    .bind(now)
    .bind(now + ttl)
    .fetch_one(pool)
    .await?;

    Ok(session)
}

/// The user owning an unexpired session, if any
pub async fn get_session_user(pool: &DbPool, token: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT u.*
        FROM users u
        JOIN sessions s ON s.user_id = u.id
        WHERE s.token = ? AND s.expires_at > ?
        "#,
    )
    .bind(token)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Remove a session; unknown tokens are ignored
pub async fn delete_session(pool: &DbPool, token: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

/// Drop expired sessions, returning how many were removed
pub async fn purge_expired(pool: &DbPool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(Utc::now())
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::db::users::{create_user, tests::new_user};

    #[tokio::test]
    async fn test_session_lifecycle() {
        let pool = test_pool().await;
        let user = create_user(&pool, &new_user("s@example.com", Role::User))
            .await
            .unwrap();

        create_session(&pool, "token-1", user.id, Duration::hours(1))
            .await
            .unwrap();
        let found = get_session_user(&pool, "token-1").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));

        delete_session(&pool, "token-1").await.unwrap();
        assert!(get_session_user(&pool, "token-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_ignored_and_purged() {
        let pool = test_pool().await;
        let user = create_user(&pool, &new_user("e@example.com", Role::User))
            .await
            .unwrap();

        create_session(&pool, "old", user.id, Duration::hours(-1))
            .await
            .unwrap();
        create_session(&pool, "fresh", user.id, Duration::hours(1))
            .await
            .unwrap();

        assert!(get_session_user(&pool, "old").await.unwrap().is_none());
        assert_eq!(purge_expired(&pool).await.unwrap(), 1);
        assert!(get_session_user(&pool, "fresh").await.unwrap().is_some());
    }
}
