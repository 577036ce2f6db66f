use reqwest::{Client, StatusCode};
use std::path::Path;

use crate::api::models::{PropertiesResponse, PropertyDetail};
use crate::config::listings::ListingFixture;
use crate::listing::{self, ListingQuery, PropertyRecord, QueryResult};
use crate::utils::sanitize::truncate;
use crate::{Error, Result};

/// Fetch one page of listings from a running server
pub async fn fetch_properties(
    server_url: &str,
    query: &ListingQuery,
    limit: Option<usize>,
) -> Result<PropertiesResponse> {
    let mut url = format!(
        "{}/api/properties?{}",
        server_url.trim_end_matches('/'),
        query.to_query_string(query.page())
    );
    if let Some(limit) = limit {
        url.push_str(&format!("&limit={limit}"));
    }

    let response = Client::new().get(&url).send().await?;
    let response = response.error_for_status()?;
    Ok(response.json().await?)
}

/// Search listings on a running server and print them
pub async fn search(server_url: &str, query: &ListingQuery, limit: Option<usize>) -> Result<()> {
    let results = fetch_properties(server_url, query, limit).await?;

    print_listings(&results.properties);
    if results.pagination.total > 0 {
        println!(
            "\nPage {} of {} ({} matches)",
            results.pagination.page, results.pagination.total_pages, results.pagination.total
        );
        println!("\nFor details: realestate show <ID>");
    }
    Ok(())
}

/// Fetch a single listing by ID
pub async fn fetch_property(server_url: &str, property_id: i64) -> Result<PropertyDetail> {
    let url = format!(
        "{}/api/properties/{property_id}",
        server_url.trim_end_matches('/')
    );
    let response = Client::new().get(&url).send().await?;

    if response.status() == StatusCode::NOT_FOUND {
        return Err(Error::NotFound(format!("Property {property_id} not found")));
    }
    Ok(response.error_for_status()?.json().await?)
}

/// Print a single listing from a running server
pub async fn show(server_url: &str, property_id: i64) -> Result<()> {
    let property = fetch_property(server_url, property_id).await?;

    println!("{}", property.title);
    println!("  {} · {}", property.property_type, property.location);
    println!("  Price: {}", property.price_display);
    println!(
        "  {} bed · {} bath · {} sq ft · {}",
        property.bedrooms, property.bathrooms, property.area, property.furnished
    );
    if !property.amenities.is_empty() {
        println!("  Amenities: {}", property.amenities.join(", "));
    }
    if let Some(rating) = property.average_rating {
        println!("  Rating: {rating:.1} ({} reviews)", property.review_count);
    }
    Ok(())
}

/// Run the query engine over a fixture file
pub fn query_fixture(
    fixture_path: &Path,
    query: &ListingQuery,
    page_size: usize,
) -> Result<QueryResult> {
    let fixture = ListingFixture::from_file(fixture_path)?;
    let records = fixture.records()?;
    listing::query(
        &records,
        &query.params(),
        query.sort_key(),
        query.page(),
        page_size,
    )
}

/// Offline query over a fixture, printed as a table
pub fn query(fixture_path: &Path, query: &ListingQuery, page_size: usize) -> Result<()> {
    let result = query_fixture(fixture_path, query, page_size)?;

    print_listings(&result.items);
    if result.total_matches > 0 {
        println!(
            "\nPage {} of {} ({} matches)",
            result.page, result.total_pages, result.total_matches
        );
    }
    Ok(())
}

fn print_listings(records: &[PropertyRecord]) {
    if records.is_empty() {
        println!("No properties found");
        return;
    }

    println!(
        "{:<5} {:<40} {:<8} {:<28} {:>16}",
        "ID", "Title", "Type", "Location", "Price"
    );
    println!("{}", "-".repeat(101));

    for record in records {
        println!(
            "{:<5} {:<40} {:<8} {:<28} {:>16}",
            record.id,
            truncate(&record.title, 38),
            record.property_type,
            truncate(&record.location, 26),
            record.price_display()
        );
    }
}
