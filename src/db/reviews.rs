use crate::db::{models::*, DbPool};
use crate::error::{Error, Result};
use chrono::Utc;

/// Add a review to a property
pub async fn create_review(pool: &DbPool, new_review: &NewReview) -> Result<Review> {
    if !(1..=5).contains(&new_review.rating) {
        return Err(Error::Validation(
            "rating must be between 1 and 5".to_string(),
        ));
    }

    let id: (i64,) = sqlx::query_as(
        r#"
        INSERT INTO reviews (property_id, user_id, rating, comment, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(new_review.property_id)
    .bind(new_review.user_id)
    .bind(new_review.rating)
    .bind(&new_review.comment)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    get_review(pool, id.0).await
}

/// Get review by ID, with the reviewer's name
pub async fn get_review(pool: &DbPool, review_id: i64) -> Result<Review> {
    let review = sqlx::query_as::<_, Review>(
        r#"
        SELECT r.id, r.property_id, r.user_id, u.full_name AS user_name,
               r.rating, r.comment, r.created_at
        FROM reviews r
        JOIN users u ON u.id = r.user_id
        WHERE r.id = ?
        "#,
    )
    .bind(review_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Review {review_id} not found")))?;

    Ok(review)
}

/// Reviews for a property, newest first
pub async fn list_reviews_for_property(pool: &DbPool, property_id: i64) -> Result<Vec<Review>> {
    let reviews = sqlx::query_as::<_, Review>(
        r#"
        SELECT r.id, r.property_id, r.user_id, u.full_name AS user_name,
               r.rating, r.comment, r.created_at
        FROM reviews r
        JOIN users u ON u.id = r.user_id
        WHERE r.property_id = ?
        ORDER BY r.created_at DESC, r.id DESC
        "#,
    )
    .bind(property_id)
    .fetch_all(pool)
    .await?;

    Ok(reviews)
}

/// Average rating of a property, `None` when it has no reviews
pub async fn average_rating(pool: &DbPool, property_id: i64) -> Result<Option<f64>> {
    let avg: (Option<f64>,) =
        sqlx::query_as("SELECT AVG(rating) FROM reviews WHERE property_id = ?")
            .bind(property_id)
            .fetch_one(pool)
            .await?;
    Ok(avg.0)
}

pub async fn count_reviews(pool: &DbPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reviews")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}
