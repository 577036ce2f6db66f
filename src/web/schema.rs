//! Schema.org JSON-LD for listing detail pages

use serde_json::{json, Value};

use crate::api::models::PropertyDetail;
use crate::utils::resolve_image_url;

/// Schema.org `@type` for a property type string
fn accommodation_type(property_type: &str) -> &'static str {
    match property_type.to_lowercase().as_str() {
        "house" => "SingleFamilyResidence",
        "land" => "Landform",
        "1rk" | "1bhk" | "2bhk" | "3bhk" | "4bhk" => "Apartment",
        _ => "Accommodation",
    }
}

/// Convert a listing to a Schema.org `Offer` wrapping the accommodation.
/// Relative image paths are made absolute against `base_url`.
pub fn property_to_schema_json(property: &PropertyDetail, base_url: &str) -> Value {
    let mut item = json!({
        "@type": accommodation_type(&property.property_type),
        "name": property.title,
        "address": {
            "@type": "PostalAddress",
            "addressLocality": property.location,
            "addressCountry": "IN"
        },
        "floorSize": {
            "@type": "QuantitativeValue",
            "value": property.area,
            "unitCode": "FTK"
        }
    });

    if property.bedrooms > 0 {
        item["numberOfBedrooms"] = json!(property.bedrooms);
    }
    if property.bathrooms > 0 {
        item["numberOfBathroomsTotal"] = json!(property.bathrooms);
    }
    if let Some(address) = &property.address {
        item["address"]["streetAddress"] = json!(address);
    }
    if !property.amenities.is_empty() {
        item["amenityFeature"] = property
            .amenities
            .iter()
            .map(|a| json!({"@type": "LocationFeatureSpecification", "name": a, "value": true}))
            .collect();
    }

    let business_function = if property.is_rent {
        "http://purl.org/goodrelations/v1#LeaseOut"
    } else {
        "http://purl.org/goodrelations/v1#Sell"
    };

    let mut schema = json!({
        "@context": "https://schema.org",
        "@type": "Offer",
        "name": property.title,
        "price": property.price,
        "priceCurrency": "INR",
        "businessFunction": business_function,
        "url": format!("{}/property/{}", base_url.trim_end_matches('/'), property.id),
        "itemOffered": item
    });

    if let Some(description) = &property.description {
        schema["description"] = json!(ammonia::Builder::empty().clean(description).to_string());
    }

    let images: Vec<String> = property
        .images
        .iter()
        .filter_map(|image| resolve_image_url(image, base_url))
        .collect();
    if !images.is_empty() {
        schema["image"] = json!(images);
    }

    if let Some(rating) = property.average_rating {
        schema["itemOffered"]["aggregateRating"] = json!({
            "@type": "AggregateRating",
            "ratingValue": (rating * 10.0).round() / 10.0,
            "reviewCount": property.review_count
        });
    }

    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn detail() -> PropertyDetail {
        PropertyDetail {
            id: 8,
            title: "Independent House with Garden".to_string(),
            description: None,
            property_type: "House".to_string(),
            price: 7500000,
            price_display: "₹75,00,000".to_string(),
            deposit: None,
            location: "Jayanagar, Bangalore".to_string(),
            address: None,
            bedrooms: 3,
            bathrooms: 3,
            area: 2000.0,
            furnished: "unfurnished".to_string(),
            floor: None,
            car_parking: None,
            facing: None,
            balcony: None,
            available_from: None,
            preferred_tenants: None,
            is_rent: false,
            amenities: vec!["Garden".to_string()],
            images: vec!["/static/img/house.jpg".to_string()],
            owner_name: None,
            featured: true,
            state: "active".to_string(),
            average_rating: Some(4.25),
            review_count: 4,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_property_schema() {
        let schema = property_to_schema_json(&detail(), "https://homes.example.com/");

        assert_eq!(schema["@type"], "Offer");
        assert_eq!(schema["price"], 7500000);
        assert_eq!(schema["url"], "https://homes.example.com/property/8");
        assert_eq!(
            schema["businessFunction"],
            "http://purl.org/goodrelations/v1#Sell"
        );
        assert_eq!(schema["itemOffered"]["@type"], "SingleFamilyResidence");
        assert_eq!(schema["itemOffered"]["numberOfBedrooms"], 3);
        assert_eq!(
            schema["image"][0],
            "https://homes.example.com/static/img/house.jpg"
        );
        assert_eq!(schema["itemOffered"]["aggregateRating"]["ratingValue"], 4.3);
    }

    #[test]
    fn test_accommodation_type() {
        assert_eq!(accommodation_type("2BHK"), "Apartment");
        assert_eq!(accommodation_type("Land"), "Landform");
        assert_eq!(accommodation_type("Office"), "Accommodation");
    }
}
