//! Property listings: the record type the query engine works on, the
//! query engine itself, and the typed boundaries around it.

pub mod admin;
pub mod draft;
pub mod params;
pub mod query;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use params::ListingQuery;
pub use query::{query, ListingStatus, PriceRange, QueryParams, QueryResult, SortKey};

/// One property listing as seen by the query engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub price: i64,
    pub location: String,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub area: f64,
    #[serde(default)]
    pub image_url: String,
    pub is_rent: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl PropertyRecord {
    /// "For Rent" / "For Sale" badge text
    pub fn status_label(&self) -> &'static str {
        if self.is_rent {
            "For Rent"
        } else {
            "For Sale"
        }
    }

    /// Price formatted the way cards show it, with a "/month" suffix for rentals
    pub fn price_display(&self) -> String {
        let amount = format_rupees(self.price);
        if self.is_rent {
            format!("₹{amount}/month")
        } else {
            format!("₹{amount}")
        }
    }
}

/// Admin-managed lifecycle of a stored listing. Only `Active` listings are public.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListingState {
    #[default]
    Active,
    Pending,
    Expired,
}

impl ListingState {
    pub const ALL: [ListingState; 3] = [
        ListingState::Active,
        ListingState::Pending,
        ListingState::Expired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingState::Active => "active",
            ListingState::Pending => "pending",
            ListingState::Expired => "expired",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ListingState::Active => "Active",
            ListingState::Pending => "Pending",
            ListingState::Expired => "Expired",
        }
    }

    /// Case-insensitive parse; unknown values yield `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "active" => Some(ListingState::Active),
            "pending" => Some(ListingState::Pending),
            "expired" => Some(ListingState::Expired),
            _ => None,
        }
    }
}

/// Furnishing level offered on the admin form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Furnished {
    #[default]
    Unfurnished,
    SemiFurnished,
    Furnished,
}

impl Furnished {
    pub fn as_str(&self) -> &'static str {
        match self {
            Furnished::Unfurnished => "unfurnished",
            Furnished::SemiFurnished => "semi-furnished",
            Furnished::Furnished => "furnished",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Furnished::Unfurnished => "Unfurnished",
            Furnished::SemiFurnished => "Semi-furnished",
            Furnished::Furnished => "Fully furnished",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "unfurnished" => Some(Furnished::Unfurnished),
            "semi-furnished" | "semifurnished" | "semi" => Some(Furnished::SemiFurnished),
            "furnished" | "fully-furnished" => Some(Furnished::Furnished),
            _ => None,
        }
    }
}

/// Property types offered on the search form and the admin form
pub const PROPERTY_TYPES: &[&str] = &[
    "1RK", "1BHK", "2BHK", "3BHK", "4BHK", "House", "Land", "PG", "Office",
];

/// Price ranges offered on the search form, as (query value, label)
pub const PRICE_RANGES: &[(&str, &str)] = &[
    ("0-10000", "₹0 - ₹10,000"),
    ("10000-20000", "₹10,000 - ₹20,000"),
    ("20000-30000", "₹20,000 - ₹30,000"),
    ("30000-50000", "₹30,000 - ₹50,000"),
    ("50000-100000", "₹50,000 - ₹1,00,000"),
    ("100000+", "₹1,00,000+"),
];

/// Amenities offered as checkboxes on the admin form
pub const AMENITIES: &[&str] = &[
    "24/7 Security",
    "Power Backup",
    "Lift",
    "Swimming Pool",
    "Gym",
    "Children's Play Area",
    "Clubhouse",
    "Visitor Parking",
    "Gated Community",
    "CCTV",
    "Wifi",
    "Air Conditioning",
];

/// Format an amount with Indian digit grouping: 5000000 -> "50,00,000"
pub fn format_rupees(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let sign = if amount < 0 { "-" } else { "" };

    if digits.len() <= 3 {
        return format!("{sign}{digits}");
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{sign}{},{last_three}", groups.join(","))
}
