use crate::db::{models::*, DbPool};
use crate::error::{Error, Result};
use chrono::Utc;

/// Create a new account. A second account with the same email is a conflict.
pub async fn create_user(pool: &DbPool, new_user: &NewUser) -> Result<User> {
    let result = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (full_name, email, password_salt, password_hash, role, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&new_user.full_name)
    .bind(&new_user.email)
    .bind(&new_user.password_salt)
    .bind(&new_user.password_hash)
    .bind(new_user.role.as_str())
    .bind(Utc::now())
    .fetch_one(pool)
    .await;

    match result {
        Ok(user) => Ok(user),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(Error::Conflict(
            format!("An account with email {} already exists", new_user.email),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Get user by ID
pub async fn get_user(pool: &DbPool, user_id: i64) -> Result<User> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("User {user_id} not found")))?;

    Ok(user)
}

/// Get user by email (case-insensitive)
pub async fn get_user_by_email(pool: &DbPool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ? COLLATE NOCASE")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn count_users(pool: &DbPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

/// Create the account or, if the email exists, reset its credentials and
/// promote it to the given role
pub async fn upsert_user(pool: &DbPool, new_user: &NewUser) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (full_name, email, password_salt, password_hash, role, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(email) DO UPDATE SET
            password_salt = excluded.password_salt,
            password_hash = excluded.password_hash,
            role = excluded.role
        RETURNING *
        "#,
    )
    .bind(&new_user.full_name)
    .bind(&new_user.email)
    .bind(&new_user.password_salt)
    .bind(&new_user.password_hash)
    .bind(new_user.role.as_str())
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(user)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::test_pool;

    pub(crate) fn new_user(email: &str, role: Role) -> NewUser {
        NewUser {
            full_name: "Priya Sharma".to_string(),
            email: email.to_string(),
            password_salt: "salt".to_string(),
            password_hash: "hash".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_user_crud() {
        let pool = test_pool().await;

        let user = create_user(&pool, &new_user("priya@example.com", Role::User))
            .await
            .unwrap();
        assert_eq!(user.role(), Role::User);

        let fetched = get_user(&pool, user.id).await.unwrap();
        assert_eq!(fetched.email, "priya@example.com");

        let by_email = get_user_by_email(&pool, "PRIYA@example.com").await.unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(user.id));

        assert!(get_user_by_email(&pool, "nobody@example.com")
            .await
            .unwrap()
            .is_none());
        assert_eq!(count_users(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let pool = test_pool().await;

        create_user(&pool, &new_user("dup@example.com", Role::User))
            .await
            .unwrap();
        let result = create_user(&pool, &new_user("Dup@Example.com", Role::User)).await;
        assert!(matches!(result, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn test_upsert_promotes_existing_user() {
        let pool = test_pool().await;

        let user = create_user(&pool, &new_user("admin@example.com", Role::User))
            .await
            .unwrap();
        let mut admin = new_user("admin@example.com", Role::Admin);
        admin.password_hash = "new-hash".to_string();

        let upserted = upsert_user(&pool, &admin).await.unwrap();
        assert_eq!(upserted.id, user.id);
        assert_eq!(upserted.role(), Role::Admin);
        assert_eq!(upserted.password_hash, "new-hash");
        assert_eq!(count_users(&pool).await.unwrap(), 1);
    }
}
