//! URL query-string boundary for the listing engine.
//!
//! Everything here is lenient: malformed values are dropped rather than
//! rejected, so a hand-edited URL still renders a listing page.

use serde::{Deserialize, Deserializer, Serialize};

use super::query::{ListingStatus, PriceRange, QueryParams, SortKey};

/// Deserialize optional string, treating empty strings as None
pub(crate) fn deserialize_optional_string<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => Ok(Some(s.to_string())),
    }
}

/// Raw listing-page query fields as they appear in the URL
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingQuery {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub location: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "deserialize_optional_string")]
    pub property_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub sort: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub page: Option<String>,
}

impl ListingQuery {
    /// Filter constraints carried by this query
    pub fn params(&self) -> QueryParams {
        QueryParams {
            location: self.location.clone(),
            property_type: self.property_type.clone(),
            price: self.price.as_deref().and_then(parse_price_range),
            status: self.status.as_deref().and_then(parse_status),
        }
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort.as_deref().map(parse_sort_key).unwrap_or_default()
    }

    /// Requested page; anything below 1 or unparsable becomes 1
    pub fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<usize>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }

    /// Query string for the same filter and sort on another page,
    /// e.g. `location=bangalore&status=rent&sort=newest&page=2`
    pub fn to_query_string(&self, page: usize) -> String {
        let mut pairs: Vec<(&str, &str)> = Vec::new();
        if let Some(location) = &self.location {
            pairs.push(("location", location.as_str()));
        }
        if let Some(property_type) = &self.property_type {
            pairs.push(("type", property_type.as_str()));
        }
        if let Some(price) = &self.price {
            pairs.push(("price", price.as_str()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status", status.as_str()));
        }
        let sort = self.sort_key();
        if sort != SortKey::Default {
            pairs.push(("sort", sort.as_str()));
        }

        let mut query: Vec<String> = pairs
            .into_iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect();
        query.push(format!("page={page}"));
        query.join("&")
    }
}

/// Parse one side of a price range. Only finite, non-negative numbers survive.
fn parse_bound(text: &str) -> Option<f64> {
    text.trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Parse `"<min>-<max>"`, `"<min>+"` or a bare `"<min>"`.
///
/// Each side is parsed on its own and dropped if malformed. An upper bound of
/// zero counts as "no upper bound". Returns `None` when no side survives.
pub fn parse_price_range(text: &str) -> Option<PriceRange> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (min, max) = if let Some(min) = text.strip_suffix('+') {
        (parse_bound(min), None)
    } else if let Some((min, max)) = text.split_once('-') {
        (parse_bound(min), parse_bound(max).filter(|m| *m > 0.0))
    } else {
        (parse_bound(text), None)
    };

    if min.is_none() && max.is_none() {
        None
    } else {
        Some(PriceRange::new(min, max))
    }
}

/// `rent` / `sale`, case-insensitive; anything else is no constraint
pub fn parse_status(text: &str) -> Option<ListingStatus> {
    match text.trim().to_lowercase().as_str() {
        "rent" => Some(ListingStatus::Rent),
        "sale" => Some(ListingStatus::Sale),
        _ => None,
    }
}

/// Sort option values used by the listing page; unknown values sort by default
pub fn parse_sort_key(text: &str) -> SortKey {
    match text.trim().to_lowercase().as_str() {
        "price-low-high" | "price_asc" => SortKey::PriceAsc,
        "price-high-low" | "price_desc" => SortKey::PriceDesc,
        "newest" => SortKey::Newest,
        _ => SortKey::Default,
    }
}
