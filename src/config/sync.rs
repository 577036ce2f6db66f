use crate::config::listings::{ListingEntry, ListingFixture};
use crate::db::{self, models::*, DbPool};
use crate::error::{Error, Result};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Report of fixture seeding results
#[derive(Debug, Clone, Default)]
pub struct SeedReport {
    pub added: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub retired: usize,
    pub errors: Vec<String>,
}

impl SeedReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_summary(&self) {
        info!(
            "Listing seed completed: {} added, {} updated, {} unchanged, {} retired, {} errors",
            self.added,
            self.updated,
            self.unchanged,
            self.retired,
            self.errors.len()
        );

        if !self.errors.is_empty() {
            warn!("Seed errors:");
            for error in &self.errors {
                warn!("  - {}", error);
            }
        }
    }
}

/// Synchronize fixture listings into the database, matching rows by id
pub async fn sync_listings_from_fixture(
    pool: &DbPool,
    fixture: &ListingFixture,
) -> Result<SeedReport> {
    let mut report = SeedReport::new();

    info!(
        "Starting listing seed: {} fixture properties",
        fixture.total_properties()
    );

    let existing = db::properties::list_all_properties(pool).await?;
    let existing_by_id: HashMap<i64, Property> = existing.into_iter().map(|p| (p.id, p)).collect();

    let retired: HashSet<i64> = db::properties::retired_fixture_ids(pool).await?;

    debug!(
        "Loaded {} existing properties from database, {} retired fixture ids",
        existing_by_id.len(),
        retired.len()
    );

    for entry in &fixture.properties {
        if retired.contains(&entry.id) && !existing_by_id.contains_key(&entry.id) {
            debug!("Skipping retired fixture property {}", entry.id);
            report.retired += 1;
            continue;
        }
        if let Err(e) = sync_entry(pool, entry, existing_by_id.get(&entry.id), &mut report).await {
            let error_msg = format!("Failed to seed property {}: {}", entry.id, e);
            warn!("{}", error_msg);
            report.errors.push(error_msg);
        }
    }

    report.log_summary();
    Ok(report)
}

async fn sync_entry(
    pool: &DbPool,
    entry: &ListingEntry,
    existing: Option<&Property>,
    report: &mut SeedReport,
) -> Result<()> {
    let mut new_property = entry.to_new_property()?;

    let Some(existing) = existing else {
        let created_at = entry.created_at.unwrap_or_else(Utc::now);
        let property = db::properties::insert_property(
            pool,
            Some(entry.id),
            &new_property,
            SOURCE_FIXTURE,
            created_at,
        )
        .await?;
        info!("Seeded property: {} (id: {})", property.title, property.id);
        report.added += 1;
        return Ok(());
    };

    if existing.source != SOURCE_FIXTURE {
        return Err(Error::Conflict(format!(
            "id {} is taken by a listing added through the admin",
            entry.id
        )));
    }

    // An admin state change survives reseeding unless the fixture pins a state
    if entry.draft.state.is_none() {
        new_property.state = existing.listing_state();
    }
    let created_at = entry.created_at.unwrap_or(existing.created_at);

    if existing.to_new_property() == new_property && existing.created_at == created_at {
        report.unchanged += 1;
        return Ok(());
    }

    db::properties::update_property(pool, entry.id, &new_property, created_at).await?;
    info!("Updated seeded property: {} (id: {})", new_property.title, entry.id);
    report.updated += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::properties::{
        create_property, delete_properties, delete_property, get_property, set_state,
        tests::new_property,
    };
    use crate::db::test_pool;
    use crate::listing::ListingState;

    const FIXTURE: &str = r#"
version: 1
properties:
  - id: 1
    title: "Modern 2BHK Apartment"
    type: "2BHK"
    price: 25000
    location: "Koramangala, Bangalore"
    area: 1200
    created_at: "2024-03-01T09:00:00Z"
  - id: 2
    title: "Residential Plot"
    type: "Land"
    price: 5000000
    location: "Electronic City, Bangalore"
    area: 2400
    is_rent: false
    created_at: "2024-02-01T09:00:00Z"
"#;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let pool = test_pool().await;
        let fixture = ListingFixture::from_yaml(FIXTURE).unwrap();

        let report = sync_listings_from_fixture(&pool, &fixture).await.unwrap();
        assert_eq!(report.added, 2);
        assert!(report.errors.is_empty());

        let property = get_property(&pool, 2).await.unwrap();
        assert_eq!(property.source, SOURCE_FIXTURE);
        assert!(!property.is_rent);

        let report = sync_listings_from_fixture(&pool, &fixture).await.unwrap();
        assert_eq!(report.added, 0);
        assert_eq!(report.updated, 0);
        assert_eq!(report.unchanged, 2);
    }

    #[tokio::test]
    async fn test_changed_entry_is_updated() {
        let pool = test_pool().await;
        let fixture = ListingFixture::from_yaml(FIXTURE).unwrap();
        sync_listings_from_fixture(&pool, &fixture).await.unwrap();

        let changed = ListingFixture::from_yaml(&FIXTURE.replace("25000", "26000")).unwrap();
        let report = sync_listings_from_fixture(&pool, &changed).await.unwrap();
        assert_eq!(report.updated, 1);
        assert_eq!(report.unchanged, 1);
        assert_eq!(get_property(&pool, 1).await.unwrap().price, 26000);
    }

    #[tokio::test]
    async fn test_admin_state_survives_reseed() {
        let pool = test_pool().await;
        let fixture = ListingFixture::from_yaml(FIXTURE).unwrap();
        sync_listings_from_fixture(&pool, &fixture).await.unwrap();

        set_state(&pool, 1, ListingState::Expired).await.unwrap();
        let report = sync_listings_from_fixture(&pool, &fixture).await.unwrap();

        assert_eq!(report.unchanged, 2);
        assert_eq!(
            get_property(&pool, 1).await.unwrap().listing_state(),
            ListingState::Expired
        );
    }

    #[tokio::test]
    async fn test_admin_rows_are_never_overwritten() {
        let pool = test_pool().await;
        let admin_row = create_property(&pool, &new_property("Admin Flat", 30000, true))
            .await
            .unwrap();
        assert_eq!(admin_row.id, 1);

        let fixture = ListingFixture::from_yaml(FIXTURE).unwrap();
        let report = sync_listings_from_fixture(&pool, &fixture).await.unwrap();

        assert_eq!(report.added, 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(get_property(&pool, 1).await.unwrap().title, "Admin Flat");
    }

    #[tokio::test]
    async fn test_deleted_fixture_rows_stay_deleted() {
        let pool = test_pool().await;
        let fixture = ListingFixture::from_yaml(FIXTURE).unwrap();
        sync_listings_from_fixture(&pool, &fixture).await.unwrap();

        delete_property(&pool, 1).await.unwrap();
        let report = sync_listings_from_fixture(&pool, &fixture).await.unwrap();

        assert_eq!(report.added, 0);
        assert_eq!(report.retired, 1);
        assert_eq!(report.unchanged, 1);
        assert!(get_property(&pool, 1).await.is_err());

        delete_properties(&pool, &[2]).await.unwrap();
        let report = sync_listings_from_fixture(&pool, &fixture).await.unwrap();
        assert_eq!(report.retired, 2);
        assert!(get_property(&pool, 2).await.is_err());
    }
}
