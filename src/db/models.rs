use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::listing::{Furnished, ListingState, PropertyRecord};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Property {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub property_type: String,
    pub price: i64,
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
    /// JSON array of strings
    pub amenities: String,
    /// JSON array of image URLs; the first one is the card image
    pub images: String,
    pub owner_name: Option<String>,
    pub featured: bool,
    pub state: String,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    pub fn amenity_list(&self) -> Vec<String> {
        serde_json::from_str(&self.amenities).unwrap_or_default()
    }

    pub fn image_list(&self) -> Vec<String> {
        serde_json::from_str(&self.images).unwrap_or_default()
    }

    pub fn listing_state(&self) -> ListingState {
        ListingState::parse(&self.state).unwrap_or_default()
    }

    pub fn furnishing(&self) -> Furnished {
        Furnished::parse(&self.furnished).unwrap_or_default()
    }

    /// The writable fields of this row, for change detection
    pub fn to_new_property(&self) -> NewProperty {
        NewProperty {
            title: self.title.clone(),
            description: self.description.clone(),
            property_type: self.property_type.clone(),
            price: self.price,
            deposit: self.deposit,
            location: self.location.clone(),
            address: self.address.clone(),
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            area: self.area,
            furnished: self.furnishing(),
            floor: self.floor.clone(),
            car_parking: self.car_parking.clone(),
            facing: self.facing.clone(),
            balcony: self.balcony.clone(),
            available_from: self.available_from,
            preferred_tenants: self.preferred_tenants.clone(),
            is_rent: self.is_rent,
            amenities: self.amenity_list(),
            images: self.image_list(),
            owner_name: self.owner_name.clone(),
            featured: self.featured,
            state: self.listing_state(),
        }
    }

    /// The engine's view of this listing
    pub fn to_record(&self) -> PropertyRecord {
        PropertyRecord {
            id: self.id,
            title: self.title.clone(),
            property_type: self.property_type.clone(),
            price: self.price,
            location: self.location.clone(),
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            area: self.area,
            image_url: self.image_list().into_iter().next().unwrap_or_default(),
            is_rent: self.is_rent,
            created_at: Some(self.created_at),
        }
    }
}

impl From<Property> for PropertyRecord {
    fn from(property: Property) -> Self {
        property.to_record()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProperty {
    pub title: String,
    pub description: Option<String>,
    pub property_type: String,
    pub price: i64,
    pub deposit: Option<i64>,
    pub location: String,
    pub address: Option<String>,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub area: f64,
    pub furnished: Furnished,
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
    pub state: ListingState,
}

/// Where a stored listing came from
pub const SOURCE_FIXTURE: &str = "fixture";
pub const SOURCE_ADMIN: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Self {
        if value == "admin" {
            Role::Admin
        } else {
            Role::User
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_salt: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Role {
        Role::parse(&self.role)
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_salt: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: i64,
    pub property_id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub property_id: i64,
    pub user_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}
