//! Filtering for the admin property table.

use serde::{Deserialize, Serialize};

use super::params::deserialize_optional_string;
use super::ListingState;
use crate::db::models::Property;

/// Admin table query fields. `state` and `type` accept `all`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminQuery {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub state: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "deserialize_optional_string")]
    pub property_type: Option<String>,
}

/// Parsed admin filter; `None` fields match everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminFilter {
    search: Option<String>,
    state: Option<ListingState>,
    property_type: Option<String>,
}

fn unless_all(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.eq_ignore_ascii_case("all"))
}

impl AdminFilter {
    pub fn from_query(query: &AdminQuery) -> Self {
        Self {
            search: query.search.as_deref().map(str::to_lowercase),
            state: unless_all(query.state.as_deref()).and_then(ListingState::parse),
            property_type: unless_all(query.property_type.as_deref()).map(str::to_lowercase),
        }
    }

    pub fn matches(&self, property: &Property) -> bool {
        if let Some(needle) = &self.search {
            let owner = property.owner_name.as_deref().unwrap_or_default();
            let hit = [property.title.as_str(), property.location.as_str(), owner]
                .iter()
                .any(|field| field.to_lowercase().contains(needle.as_str()));
            if !hit {
                return false;
            }
        }

        if let Some(state) = self.state {
            if property.listing_state() != state {
                return false;
            }
        }

        if let Some(property_type) = &self.property_type {
            if property.property_type.to_lowercase() != *property_type {
                return false;
            }
        }

        true
    }

    /// Apply the filter, keeping input order
    pub fn apply(&self, properties: Vec<Property>) -> Vec<Property> {
        properties.into_iter().filter(|p| self.matches(p)).collect()
    }
}
