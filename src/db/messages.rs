use crate::db::{models::*, DbPool};
use crate::error::Result;
use chrono::Utc;

/// Store a contact-form submission
pub async fn create_message(pool: &DbPool, message: &NewContactMessage) -> Result<ContactMessage> {
    let stored = sqlx::query_as::<_, ContactMessage>(
        r#"
        INSERT INTO contact_messages (name, email, phone, message, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&message.name)
    .bind(&message.email)
    .bind(&message.phone)
    .bind(&message.message)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(stored)
}

pub async fn count_messages(pool: &DbPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM contact_messages")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_create_message() {
        let pool = test_pool().await;

        let stored = create_message(
            &pool,
            &NewContactMessage {
                name: "Ravi".to_string(),
                email: "ravi@example.com".to_string(),
                phone: None,
                message: "Is the Koramangala flat still available?".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(stored.name, "Ravi");
        assert_eq!(count_messages(&pool).await.unwrap(), 1);
    }
}
