use crate::db::models::NewProperty;
use crate::error::{Error, Result};
use crate::listing::draft::PropertyDraft;
use crate::listing::PropertyRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// The YAML file of seed listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingFixture {
    pub version: u32,
    pub properties: Vec<ListingEntry>,
    #[serde(default)]
    pub validation: FixtureLimits,
}

/// One seeded listing: a pinned id plus the same fields the admin form takes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingEntry {
    pub id: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub draft: PropertyDraft,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureLimits {
    #[serde(default = "default_max_properties")]
    pub max_properties: usize,
}

impl Default for FixtureLimits {
    fn default() -> Self {
        Self {
            max_properties: default_max_properties(),
        }
    }
}

fn default_max_properties() -> usize {
    1000
}

impl ListingEntry {
    /// Validated store record for this entry
    pub fn to_new_property(&self) -> Result<NewProperty> {
        self.draft.clone().validate()
    }

    /// Engine view of this entry, without touching the database
    pub fn to_record(&self) -> Result<PropertyRecord> {
        let property = self.to_new_property()?;
        Ok(PropertyRecord {
            id: self.id,
            title: property.title,
            property_type: property.property_type,
            price: property.price,
            location: property.location,
            bedrooms: property.bedrooms,
            bathrooms: property.bathrooms,
            area: property.area,
            image_url: property.images.into_iter().next().unwrap_or_default(),
            is_rent: property.is_rent,
            created_at: self.created_at,
        })
    }
}

impl ListingFixture {
    /// Load the fixture from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "Failed to read listings fixture from {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let fixture = Self::from_yaml(&content).map_err(|e| {
            Error::Config(format!("{} ({})", e, path.as_ref().display()))
        })?;
        Ok(fixture)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let fixture: ListingFixture = serde_yaml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse listings fixture: {e}")))?;

        fixture.validate()?;
        Ok(fixture)
    }

    /// Validate the entire fixture
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(Error::Config(format!(
                "Unsupported fixture version: {}. Expected version 1",
                self.version
            )));
        }

        if self.properties.len() > self.validation.max_properties {
            return Err(Error::Config(format!(
                "Too many properties: {} > {}",
                self.properties.len(),
                self.validation.max_properties
            )));
        }

        let mut seen = HashSet::new();
        for entry in &self.properties {
            if entry.id <= 0 {
                return Err(Error::Config(format!(
                    "Property id must be positive, got {}",
                    entry.id
                )));
            }
            if !seen.insert(entry.id) {
                return Err(Error::Config(format!("Duplicate property id: {}", entry.id)));
            }
        }

        for (index, entry) in self.properties.iter().enumerate() {
            entry.to_new_property().map_err(|e| {
                Error::Config(format!("Property #{} (id {}): {}", index + 1, entry.id, e))
            })?;
        }

        Ok(())
    }

    pub fn total_properties(&self) -> usize {
        self.properties.len()
    }

    /// Engine records for every entry, in file order
    pub fn records(&self) -> Result<Vec<PropertyRecord>> {
        self.properties.iter().map(ListingEntry::to_record).collect()
    }
}
