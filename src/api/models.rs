use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::db::models::{Property, Review};
use crate::listing::PropertyRecord;

/// `limit` on `GET /api/properties`; the filter fields come from `ListingQuery`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LimitParams {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Listing search response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertiesResponse {
    pub properties: Vec<PropertyRecord>,
    pub pagination: Pagination,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Full property details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDetail {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub property_type: String,
    pub price: i64,
    pub price_display: String,
    pub deposit: Option<i64>,
    pub location: String,
    pub address: Option<String>,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub area: f64,
    pub furnished: String,
    pub floor: Option<String>,
    pub car_parking: Option<String>,
    pub facing: Option<String>,
    pub balcony: Option<String>,
    pub available_from: Option<NaiveDate>,
    pub preferred_tenants: Option<String>,
    pub is_rent: bool,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub owner_name: Option<String>,
    pub featured: bool,
    pub state: String,
    pub average_rating: Option<f64>,
    pub review_count: usize,
    pub created_at: DateTime<Utc>,
}

impl PropertyDetail {
    pub fn new(property: Property, reviews: &[Review]) -> Self {
        let record = property.to_record();
        let review_count = reviews.len();
        let average_rating = (review_count > 0)
            .then(|| reviews.iter().map(|r| r.rating as f64).sum::<f64>() / review_count as f64);

        Self {
            price_display: record.price_display(),
            amenities: property.amenity_list(),
            images: property.image_list(),
            furnished: property.furnishing().as_str().to_string(),
            state: property.listing_state().as_str().to_string(),
            id: property.id,
            title: property.title,
            description: property.description,
            property_type: property.property_type,
            price: property.price,
            deposit: property.deposit,
            location: property.location,
            address: property.address,
            bedrooms: property.bedrooms,
            bathrooms: property.bathrooms,
            area: property.area,
            floor: property.floor,
            car_parking: property.car_parking,
            facing: property.facing,
            balcony: property.balcony,
            available_from: property.available_from,
            preferred_tenants: property.preferred_tenants,
            is_rent: property.is_rent,
            owner_name: property.owner_name,
            featured: property.featured,
            average_rating,
            review_count,
            created_at: property.created_at,
        }
    }
}

/// Review as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewItem {
    pub id: i64,
    pub user_name: String,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewItem {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            user_name: review.user_name,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        }
    }
}

/// System statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub total_properties: i64,
    pub active_properties: i64,
    pub pending_properties: i64,
    pub expired_properties: i64,
    pub for_rent: usize,
    pub for_sale: usize,
    pub total_users: i64,
    pub total_reviews: i64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Readiness check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub database: String,
}
