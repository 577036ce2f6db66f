//! Typed property submissions from the admin form and the admin API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Furnished, ListingState};
use crate::db::models::NewProperty;
use crate::error::{Error, Result};
use crate::utils::sanitize::{sanitize_html, truncate};
use crate::utils::validation::validate_image_url;

const MAX_TITLE_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 5000;
const MAX_SHORT_FIELD_LEN: usize = 200;
const MAX_IMAGES: usize = 20;

fn default_true() -> bool {
    true
}

/// A property as submitted, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub property_type: String,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub deposit: Option<i64>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub bedrooms: Option<i64>,
    #[serde(default)]
    pub bathrooms: Option<i64>,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub furnished: Option<String>,
    #[serde(default)]
    pub floor: Option<String>,
    #[serde(default)]
    pub car_parking: Option<String>,
    #[serde(default)]
    pub facing: Option<String>,
    #[serde(default)]
    pub balcony: Option<String>,
    #[serde(default)]
    pub available_from: Option<NaiveDate>,
    #[serde(default)]
    pub preferred_tenants: Option<String>,
    #[serde(default = "default_true")]
    pub is_rent: bool,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub state: Option<ListingState>,
}

fn required(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn optional(value: Option<String>, field: &str) -> Result<Option<String>> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.chars().count() > MAX_SHORT_FIELD_LEN => Err(Error::Validation(format!(
            "{field} must be at most {MAX_SHORT_FIELD_LEN} characters"
        ))),
        Some(v) => Ok(Some(v.to_string())),
    }
}

fn non_negative(value: Option<i64>, field: &str) -> Result<Option<i64>> {
    match value {
        Some(v) if v < 0 => Err(Error::Validation(format!("{field} cannot be negative"))),
        other => Ok(other),
    }
}

impl PropertyDraft {
    /// Check every field and produce a record the store will accept
    pub fn validate(self) -> Result<NewProperty> {
        let title = required(&self.title, "title")?;
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(Error::Validation(format!(
                "title must be at most {MAX_TITLE_LEN} characters"
            )));
        }
        let property_type = required(&self.property_type, "type")?;
        let location = required(&self.location, "location")?;

        let price = non_negative(self.price, "price")?
            .ok_or_else(|| Error::Validation("price is required".to_string()))?;
        let deposit = non_negative(self.deposit, "deposit")?;
        let bedrooms = non_negative(self.bedrooms, "bedrooms")?.unwrap_or(0);
        let bathrooms = non_negative(self.bathrooms, "bathrooms")?.unwrap_or(0);

        let area = match self.area {
            Some(a) if a.is_finite() && a > 0.0 => a,
            Some(_) => {
                return Err(Error::Validation(
                    "area must be a positive number".to_string(),
                ))
            }
            None => return Err(Error::Validation("area is required".to_string())),
        };

        let furnished = match self.furnished.as_deref().map(str::trim) {
            None | Some("") => Furnished::default(),
            Some(value) => Furnished::parse(value).ok_or_else(|| {
                Error::Validation(format!(
                    "furnished must be unfurnished, semi-furnished or furnished, got '{value}'"
                ))
            })?,
        };

        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(|d| truncate(&sanitize_html(d), MAX_DESCRIPTION_LEN));

        let mut amenities: Vec<String> = Vec::new();
        for amenity in self.amenities {
            let amenity = amenity.trim();
            if !amenity.is_empty() && !amenities.iter().any(|a| a == amenity) {
                amenities.push(amenity.to_string());
            }
        }

        if self.images.len() > MAX_IMAGES {
            return Err(Error::Validation(format!(
                "at most {MAX_IMAGES} images are allowed"
            )));
        }
        let mut images = Vec::with_capacity(self.images.len());
        for image in self.images {
            let image = image.trim();
            if image.is_empty() {
                continue;
            }
            images.push(validate_image_url(image)?.to_string());
        }

        Ok(NewProperty {
            title,
            description,
            property_type,
            price,
            deposit,
            location,
            address: optional(self.address, "address")?,
            bedrooms,
            bathrooms,
            area,
            furnished,
            floor: optional(self.floor, "floor")?,
            car_parking: optional(self.car_parking, "car parking")?,
            facing: optional(self.facing, "facing")?,
            balcony: optional(self.balcony, "balcony")?,
            available_from: self.available_from,
            preferred_tenants: optional(self.preferred_tenants, "preferred tenants")?,
            is_rent: self.is_rent,
            amenities,
            images,
            owner_name: optional(self.owner_name, "owner name")?,
            featured: self.featured,
            state: self.state.unwrap_or_default(),
        })
    }
}

/// The admin "add property" HTML form. Every field arrives as text;
/// amenities and images are one per line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "type")]
    pub property_type: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub deposit: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub bedrooms: String,
    #[serde(default)]
    pub bathrooms: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub furnished: String,
    #[serde(default)]
    pub floor: String,
    #[serde(default)]
    pub car_parking: String,
    #[serde(default)]
    pub facing: String,
    #[serde(default)]
    pub balcony: String,
    #[serde(default)]
    pub available_from: String,
    #[serde(default)]
    pub preferred_tenants: String,
    /// "rent" or "sale"
    #[serde(default)]
    pub listing_for: String,
    #[serde(default)]
    pub amenities: String,
    #[serde(default)]
    pub images: String,
    #[serde(default)]
    pub owner_name: String,
    /// Present (usually "on") when the checkbox is ticked
    #[serde(default)]
    pub featured: Option<String>,
}

fn parse_int(value: &str, field: &str) -> Result<Option<i64>> {
    let value = value.trim().replace(',', "");
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<i64>()
        .map(Some)
        .map_err(|_| Error::Validation(format!("{field} must be a whole number")))
}

fn parse_float(value: &str, field: &str) -> Result<Option<f64>> {
    let value = value.trim().replace(',', "");
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<f64>()
        .map(Some)
        .map_err(|_| Error::Validation(format!("{field} must be a number")))
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn lines(value: &str) -> Vec<String> {
    value
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

impl TryFrom<PropertyForm> for PropertyDraft {
    type Error = Error;

    fn try_from(form: PropertyForm) -> Result<Self> {
        let available_from = match form.available_from.trim() {
            "" => None,
            date => Some(NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
                Error::Validation("available from must be a date (YYYY-MM-DD)".to_string())
            })?),
        };

        let is_rent = !form.listing_for.trim().eq_ignore_ascii_case("sale");

        Ok(PropertyDraft {
            price: parse_int(&form.price, "price")?,
            deposit: parse_int(&form.deposit, "deposit")?,
            bedrooms: parse_int(&form.bedrooms, "bedrooms")?,
            bathrooms: parse_int(&form.bathrooms, "bathrooms")?,
            area: parse_float(&form.area, "area")?,
            amenities: lines(&form.amenities),
            images: lines(&form.images),
            title: form.title,
            description: non_blank(form.description),
            property_type: form.property_type,
            location: form.location,
            address: non_blank(form.address),
            furnished: non_blank(form.furnished),
            floor: non_blank(form.floor),
            car_parking: non_blank(form.car_parking),
            facing: non_blank(form.facing),
            balcony: non_blank(form.balcony),
            available_from,
            preferred_tenants: non_blank(form.preferred_tenants),
            is_rent,
            owner_name: non_blank(form.owner_name),
            featured: form.featured.is_some(),
            state: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> PropertyDraft {
        PropertyDraft {
            title: "  Modern 2BHK Apartment ".to_string(),
            property_type: "2BHK".to_string(),
            price: Some(25000),
            location: "Koramangala, Bangalore".to_string(),
            area: Some(1200.0),
            bedrooms: Some(2),
            bathrooms: Some(2),
            is_rent: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_draft() {
        let property = valid_draft().validate().unwrap();
        assert_eq!(property.title, "Modern 2BHK Apartment");
        assert_eq!(property.price, 25000);
        assert_eq!(property.furnished, Furnished::Unfurnished);
        assert_eq!(property.state, ListingState::Active);
    }

    #[test]
    fn test_required_fields() {
        for (draft, field) in [
            (
                PropertyDraft {
                    title: " ".to_string(),
                    ..valid_draft()
                },
                "title",
            ),
            (
                PropertyDraft {
                    property_type: String::new(),
                    ..valid_draft()
                },
                "type",
            ),
            (
                PropertyDraft {
                    location: String::new(),
                    ..valid_draft()
                },
                "location",
            ),
            (
                PropertyDraft {
                    price: None,
                    ..valid_draft()
                },
                "price",
            ),
        ] {
            let err = draft.validate().unwrap_err();
            assert!(
                err.to_string().contains(field),
                "expected error about {field}, got {err}"
            );
        }
    }

    #[test]
    fn test_rejects_negative_numbers() {
        let draft = PropertyDraft {
            price: Some(-1),
            ..valid_draft()
        };
        assert!(draft.validate().is_err());

        let draft = PropertyDraft {
            area: Some(0.0),
            ..valid_draft()
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_image_url() {
        let draft = PropertyDraft {
            images: vec!["javascript:alert(1)".to_string()],
            ..valid_draft()
        };
        assert!(draft.validate().is_err());

        let draft = PropertyDraft {
            images: vec!["https://images.unsplash.com/photo-1".to_string()],
            ..valid_draft()
        };
        assert_eq!(draft.validate().unwrap().images.len(), 1);
    }

    #[test]
    fn test_description_is_sanitized() {
        let draft = PropertyDraft {
            description: Some("<p>Nice</p><script>alert(1)</script>".to_string()),
            ..valid_draft()
        };
        let property = draft.validate().unwrap();
        let description = property.description.unwrap();
        assert!(description.contains("<p>Nice</p>"));
        assert!(!description.contains("script"));
    }

    #[test]
    fn test_amenities_are_deduplicated() {
        let draft = PropertyDraft {
            amenities: vec![
                "Lift".to_string(),
                " Gym ".to_string(),
                "Lift".to_string(),
                "".to_string(),
            ],
            ..valid_draft()
        };
        assert_eq!(draft.validate().unwrap().amenities, vec!["Lift", "Gym"]);
    }

    #[test]
    fn test_form_conversion() {
        let form = PropertyForm {
            title: "Residential Plot".to_string(),
            property_type: "Land".to_string(),
            price: "50,00,000".to_string(),
            location: "Electronic City, Bangalore".to_string(),
            area: "2400".to_string(),
            listing_for: "sale".to_string(),
            amenities: "Gated Community\n\nCCTV\n".to_string(),
            available_from: "2024-01-15".to_string(),
            featured: Some("on".to_string()),
            ..Default::default()
        };

        let draft = PropertyDraft::try_from(form).unwrap();
        assert_eq!(draft.price, Some(5000000));
        assert!(!draft.is_rent);
        assert!(draft.featured);
        assert_eq!(draft.amenities, vec!["Gated Community", "CCTV"]);
        assert_eq!(
            draft.available_from,
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(draft.bedrooms, None);

        let property = draft.validate().unwrap();
        assert_eq!(property.bedrooms, 0);
    }

    #[test]
    fn test_form_rejects_non_numeric_price() {
        let form = PropertyForm {
            price: "twenty".to_string(),
            ..Default::default()
        };
        let err = PropertyDraft::try_from(form).unwrap_err();
        assert!(err.to_string().contains("price"));
    }

    #[test]
    fn test_json_draft_defaults_to_rent() {
        let draft: PropertyDraft = serde_json::from_str(
            r#"{"title":"Studio","type":"1RK","price":15000,"location":"Indiranagar","area":500}"#,
        )
        .unwrap();
        assert!(draft.is_rent);
        assert!(draft.validate().is_ok());
    }
}
