use crate::db::{models::*, DbPool};
use crate::error::{Error, Result};
use crate::listing::{ListingState, PropertyRecord};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

fn to_json(values: &[String]) -> Result<String> {
    serde_json::to_string(values)
        .map_err(|e| Error::Internal(format!("Failed to encode list column: {e}")))
}

/// Create a new property listed by an admin
pub async fn create_property(pool: &DbPool, new_property: &NewProperty) -> Result<Property> {
    insert_property(pool, None, new_property, SOURCE_ADMIN, Utc::now()).await
}

/// Insert a property. `id` pins the primary key (fixture rows); `None` lets
/// SQLite assign one.
pub async fn insert_property(
    pool: &DbPool,
    id: Option<i64>,
    new_property: &NewProperty,
    source: &str,
    created_at: DateTime<Utc>,
) -> Result<Property> {
    let now = Utc::now();

    let property = sqlx::query_as::<_, Property>(
        r#"
        INSERT INTO properties (
            id, title, description, property_type, price, deposit, location, address,
            bedrooms, bathrooms, area, furnished, floor, car_parking, facing, balcony,
            available_from, preferred_tenants, is_rent, amenities, images, owner_name,
            featured, state, source, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&new_property.title)
    .bind(&new_property.description)
    .bind(&new_property.property_type)
    .bind(new_property.price)
    .bind(new_property.deposit)
    .bind(&new_property.location)
    .bind(&new_property.address)
    .bind(new_property.bedrooms)
    .bind(new_property.bathrooms)
    .bind(new_property.area)
    .bind(new_property.furnished.as_str())
    .bind(&new_property.floor)
    .bind(&new_property.car_parking)
    .bind(&new_property.facing)
    .bind(&new_property.balcony)
    .bind(new_property.available_from)
    .bind(&new_property.preferred_tenants)
    .bind(new_property.is_rent)
    .bind(to_json(&new_property.amenities)?)
    .bind(to_json(&new_property.images)?)
    .bind(&new_property.owner_name)
    .bind(new_property.featured)
    .bind(new_property.state.as_str())
    .bind(source)
    .bind(created_at)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(property)
}

/// Overwrite every listing field of an existing property
pub async fn update_property(
    pool: &DbPool,
    property_id: i64,
    update: &NewProperty,
    created_at: DateTime<Utc>,
) -> Result<Property> {
    let now = Utc::now();

    let property = sqlx::query_as::<_, Property>(
        r#"
        UPDATE properties
        SET title = ?, description = ?, property_type = ?, price = ?, deposit = ?,
            location = ?, address = ?, bedrooms = ?, bathrooms = ?, area = ?,
            furnished = ?, floor = ?, car_parking = ?, facing = ?, balcony = ?,
            available_from = ?, preferred_tenants = ?, is_rent = ?, amenities = ?,
            images = ?, owner_name = ?, featured = ?, state = ?, created_at = ?,
            updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&update.title)
    .bind(&update.description)
    .bind(&update.property_type)
    .bind(update.price)
    .bind(update.deposit)
    .bind(&update.location)
    .bind(&update.address)
    .bind(update.bedrooms)
    .bind(update.bathrooms)
    .bind(update.area)
    .bind(update.furnished.as_str())
    .bind(&update.floor)
    .bind(&update.car_parking)
    .bind(&update.facing)
    .bind(&update.balcony)
    .bind(update.available_from)
    .bind(&update.preferred_tenants)
    .bind(update.is_rent)
    .bind(to_json(&update.amenities)?)
    .bind(to_json(&update.images)?)
    .bind(&update.owner_name)
    .bind(update.featured)
    .bind(update.state.as_str())
    .bind(created_at)
    .bind(now)
    .bind(property_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Property {property_id} not found")))?;

    Ok(property)
}

/// Get property by ID
pub async fn get_property(pool: &DbPool, property_id: i64) -> Result<Property> {
    let property = sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = ?")
        .bind(property_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Property {property_id} not found")))?;

    Ok(property)
}

/// Get a property only if it is publicly visible
pub async fn get_active_property(pool: &DbPool, property_id: i64) -> Result<Property> {
    let property = get_property(pool, property_id).await?;
    if property.listing_state() != ListingState::Active {
        return Err(Error::NotFound(format!("Property {property_id} not found")));
    }
    Ok(property)
}

/// Every stored property in insertion order
pub async fn list_all_properties(pool: &DbPool) -> Result<Vec<Property>> {
    let properties = sqlx::query_as::<_, Property>("SELECT * FROM properties ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(properties)
}

/// Publicly visible properties in insertion order: the query engine's candidate set
pub async fn list_active_properties(pool: &DbPool) -> Result<Vec<Property>> {
    let properties =
        sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE state = ? ORDER BY id")
            .bind(ListingState::Active.as_str())
            .fetch_all(pool)
            .await?;

    Ok(properties)
}

/// Engine records for every publicly visible property
pub async fn active_records(pool: &DbPool) -> Result<Vec<PropertyRecord>> {
    let properties = list_active_properties(pool).await?;
    Ok(properties.into_iter().map(PropertyRecord::from).collect())
}

/// Featured active listings for the home page, newest first
pub async fn list_featured(pool: &DbPool, limit: i64) -> Result<Vec<Property>> {
    let properties = sqlx::query_as::<_, Property>(
        r#"
        SELECT * FROM properties
        WHERE state = ? AND featured = 1
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(ListingState::Active.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(properties)
}

/// Most recently listed properties regardless of state
pub async fn list_recent(pool: &DbPool, limit: i64) -> Result<Vec<Property>> {
    let properties = sqlx::query_as::<_, Property>(
        "SELECT * FROM properties ORDER BY created_at DESC, id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(properties)
}

/// Count properties, optionally only those in one state
pub async fn count_properties(pool: &DbPool, state: Option<ListingState>) -> Result<i64> {
    let count: (i64,) = match state {
        Some(state) => {
            sqlx::query_as("SELECT COUNT(*) FROM properties WHERE state = ?")
                .bind(state.as_str())
                .fetch_one(pool)
                .await?
        }
        None => {
            sqlx::query_as("SELECT COUNT(*) FROM properties")
                .fetch_one(pool)
                .await?
        }
    };
    Ok(count.0)
}

/// Count properties listed at or after `since`
pub async fn count_created_since(pool: &DbPool, since: DateTime<Utc>) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM properties WHERE created_at >= ?")
        .bind(since)
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

/// Move a property to another lifecycle state
pub async fn set_state(pool: &DbPool, property_id: i64, state: ListingState) -> Result<()> {
    let result = sqlx::query("UPDATE properties SET state = ?, updated_at = ? WHERE id = ?")
        .bind(state.as_str())
        .bind(Utc::now())
        .bind(property_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Property {property_id} not found")));
    }
    Ok(())
}

async fn delete_row(conn: &mut sqlx::SqliteConnection, property_id: i64) -> Result<u64> {
    // Fixture ids stay deleted across reseeds
    sqlx::query(
        "INSERT OR IGNORE INTO retired_fixture_ids (id, retired_at)
         SELECT id, ? FROM properties WHERE id = ? AND source = ?",
    )
    .bind(Utc::now())
    .bind(property_id)
    .bind(SOURCE_FIXTURE)
    .execute(&mut *conn)
    .await?;

    let result = sqlx::query("DELETE FROM properties WHERE id = ?")
        .bind(property_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

/// Delete property
pub async fn delete_property(pool: &DbPool, property_id: i64) -> Result<()> {
    let mut tx = pool.begin().await?;
    let deleted = delete_row(&mut *tx, property_id).await?;

    if deleted == 0 {
        return Err(Error::NotFound(format!("Property {property_id} not found")));
    }
    tx.commit().await?;
    Ok(())
}

/// Delete several properties at once; returns how many rows went away
pub async fn delete_properties(pool: &DbPool, property_ids: &[i64]) -> Result<u64> {
    if property_ids.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut deleted = 0;
    for id in property_ids {
        deleted += delete_row(&mut *tx, *id).await?;
    }
    tx.commit().await?;

    Ok(deleted)
}

/// Ids of seeded listings an admin has deleted
pub async fn retired_fixture_ids(pool: &DbPool) -> Result<HashSet<i64>> {
    let rows: Vec<(i64,)> = sqlx::query_as("SELECT id FROM retired_fixture_ids")
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::listing::Furnished;

    pub(crate) fn new_property(title: &str, price: i64, is_rent: bool) -> NewProperty {
        NewProperty {
            title: title.to_string(),
            description: Some("A test listing".to_string()),
            property_type: "2BHK".to_string(),
            price,
            deposit: None,
            location: "Koramangala, Bangalore".to_string(),
            address: None,
            bedrooms: 2,
            bathrooms: 2,
            area: 1200.0,
            furnished: Furnished::SemiFurnished,
            floor: None,
            car_parking: None,
            facing: None,
            balcony: None,
            available_from: None,
            preferred_tenants: None,
            is_rent,
            amenities: vec!["Lift".to_string(), "Gym".to_string()],
            images: vec!["https://example.com/a.jpg".to_string()],
            owner_name: Some("John Doe".to_string()),
            featured: false,
            state: ListingState::Active,
        }
    }

    #[tokio::test]
    async fn test_property_crud() {
        let pool = test_pool().await;

        let property = create_property(&pool, &new_property("Flat", 25000, true))
            .await
            .unwrap();
        assert_eq!(property.title, "Flat");
        assert_eq!(property.source, SOURCE_ADMIN);
        assert_eq!(property.amenity_list(), vec!["Lift", "Gym"]);
        assert_eq!(property.furnishing(), Furnished::SemiFurnished);

        let record = property.to_record();
        assert_eq!(record.image_url, "https://example.com/a.jpg");

        let fetched = get_property(&pool, property.id).await.unwrap();
        assert_eq!(fetched.id, property.id);

        set_state(&pool, property.id, ListingState::Pending)
            .await
            .unwrap();
        assert!(get_active_property(&pool, property.id).await.is_err());
        assert_eq!(count_properties(&pool, Some(ListingState::Pending)).await.unwrap(), 1);
        assert!(list_active_properties(&pool).await.unwrap().is_empty());

        delete_property(&pool, property.id).await.unwrap();
        assert!(matches!(
            get_property(&pool, property.id).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            delete_property(&pool, property.id).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_pinned_ids_and_bulk_delete() {
        let pool = test_pool().await;
        let created = Utc::now();

        for id in [3, 1, 2] {
            insert_property(
                &pool,
                Some(id),
                &new_property(&format!("Listing {id}"), 1000 * id, true),
                SOURCE_FIXTURE,
                created,
            )
            .await
            .unwrap();
        }

        let ids: Vec<i64> = list_all_properties(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let deleted = delete_properties(&pool, &[1, 3, 99]).await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(count_properties(&pool, None).await.unwrap(), 1);
        assert_eq!(
            retired_fixture_ids(&pool).await.unwrap(),
            HashSet::from([1, 3])
        );
    }

    #[tokio::test]
    async fn test_admin_rows_are_not_retired() {
        let pool = test_pool().await;
        let property = create_property(&pool, &new_property("Admin Flat", 30000, true))
            .await
            .unwrap();

        delete_property(&pool, property.id).await.unwrap();
        assert!(retired_fixture_ids(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_property() {
        let pool = test_pool().await;
        let property = create_property(&pool, &new_property("Flat", 25000, true))
            .await
            .unwrap();

        let mut update = new_property("Renovated Flat", 27000, true);
        update.featured = true;
        let updated = update_property(&pool, property.id, &update, property.created_at)
            .await
            .unwrap();

        assert_eq!(updated.title, "Renovated Flat");
        assert_eq!(updated.price, 27000);
        assert!(updated.featured);
        assert_eq!(list_featured(&pool, 6).await.unwrap().len(), 1);

        assert!(update_property(&pool, 999, &update, property.created_at)
            .await
            .is_err());
    }
}
