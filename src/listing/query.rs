//! Listing query engine: filter, sort and paginate a candidate set.
//!
//! Every call is a pure function of its inputs. The source slice is never
//! reordered; matches are collected by reference, sorted with a stable sort
//! and only the requested page is cloned into the result.

use serde::{Deserialize, Serialize};

use super::PropertyRecord;
use crate::error::{Error, Result};

/// Filter constraints. `None` means "no constraint on this dimension".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    /// Case-insensitive substring of `location`
    pub location: Option<String>,
    /// Case-insensitive exact match on the property type
    pub property_type: Option<String>,
    pub price: Option<PriceRange>,
    pub status: Option<ListingStatus>,
}

/// Inclusive price bounds. A missing side is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// `min` and up, unbounded above
    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn contains(&self, price: i64) -> bool {
        let price = price as f64;
        self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
    }
}

/// Rent/sale constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Rent,
    Sale,
}

impl ListingStatus {
    pub fn matches(&self, is_rent: bool) -> bool {
        match self {
            ListingStatus::Rent => is_rent,
            ListingStatus::Sale => !is_rent,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Rent => "rent",
            ListingStatus::Sale => "sale",
        }
    }
}

/// Ordering applied after filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortKey {
    /// Input order
    #[default]
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "price-low-high")]
    PriceAsc,
    #[serde(rename = "price-high-low")]
    PriceDesc,
    /// Most recent `created_at` first; undated records last
    #[serde(rename = "newest")]
    Newest,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Default,
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::Newest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Default => "default",
            SortKey::PriceAsc => "price-low-high",
            SortKey::PriceDesc => "price-high-low",
            SortKey::Newest => "newest",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Default => "Default",
            SortKey::PriceAsc => "Price: Low to High",
            SortKey::PriceDesc => "Price: High to Low",
            SortKey::Newest => "Newest First",
        }
    }
}

/// One page of a query plus the totals needed to render pagination
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub items: Vec<PropertyRecord>,
    pub total_matches: usize,
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Page number a caller should show after parameters change:
    /// the requested page clamped to `[1, max(total_pages, 1)]`
    pub fn clamped_page(&self) -> usize {
        self.page.clamp(1, self.total_pages.max(1))
    }
}

/// Lower-cased needles, built once per query instead of once per record
struct Filter<'a> {
    location: Option<String>,
    property_type: Option<String>,
    params: &'a QueryParams,
}

impl<'a> Filter<'a> {
    fn new(params: &'a QueryParams) -> Self {
        Self {
            location: params.location.as_ref().map(|l| l.to_lowercase()),
            property_type: params.property_type.as_ref().map(|t| t.to_lowercase()),
            params,
        }
    }

    fn matches(&self, record: &PropertyRecord) -> bool {
        let location = self
            .location
            .as_ref()
            .map_or(true, |needle| record.location.to_lowercase().contains(needle.as_str()));
        let property_type = self
            .property_type
            .as_ref()
            .map_or(true, |wanted| record.property_type.to_lowercase() == *wanted);
        let price = self
            .params
            .price
            .map_or(true, |range| range.contains(record.price));
        let status = self
            .params
            .status
            .map_or(true, |status| status.matches(record.is_rent));

        location && property_type && price && status
    }
}

impl QueryParams {
    /// True iff `record` satisfies every supplied constraint
    pub fn matches(&self, record: &PropertyRecord) -> bool {
        Filter::new(self).matches(record)
    }

    pub fn is_unconstrained(&self) -> bool {
        self.location.is_none()
            && self.property_type.is_none()
            && self.price.is_none()
            && self.status.is_none()
    }
}

/// Records passing all filters, in input order
pub fn matching<'a>(records: &'a [PropertyRecord], params: &QueryParams) -> Vec<&'a PropertyRecord> {
    let filter = Filter::new(params);
    records.iter().filter(|r| filter.matches(r)).collect()
}

/// Stable in-place sort of matched records
pub fn sort_records(records: &mut [&PropertyRecord], sort: SortKey) {
    match sort {
        SortKey::Default => {}
        SortKey::PriceAsc => records.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceDesc => records.sort_by(|a, b| b.price.cmp(&a.price)),
        // None < Some, so a descending compare puts undated records last
        SortKey::Newest => records.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

/// Filter, sort and paginate `records`.
///
/// `page` is 1-indexed. A page past the end yields an empty page rather than
/// an error; a zero `page` or `page_size` is rejected.
pub fn query(
    records: &[PropertyRecord],
    params: &QueryParams,
    sort: SortKey,
    page: usize,
    page_size: usize,
) -> Result<QueryResult> {
    if page_size == 0 {
        return Err(Error::Validation(
            "page size must be a positive integer".to_string(),
        ));
    }
    if page == 0 {
        return Err(Error::Validation(
            "page must be a positive integer".to_string(),
        ));
    }

    let mut matched = matching(records, params);
    sort_records(&mut matched, sort);

    let total_matches = matched.len();
    let total_pages = total_matches.div_ceil(page_size);

    let start = (page - 1).saturating_mul(page_size);
    let items = if start >= total_matches {
        Vec::new()
    } else {
        let end = start.saturating_add(page_size).min(total_matches);
        matched[start..end].iter().map(|r| (*r).clone()).collect()
    };

    Ok(QueryResult {
        items,
        total_matches,
        total_pages,
        page,
        page_size,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(id: i64, property_type: &str, price: i64, location: &str, is_rent: bool) -> PropertyRecord {
        PropertyRecord {
            id,
            title: format!("Listing {id}"),
            property_type: property_type.to_string(),
            price,
            location: location.to_string(),
            bedrooms: 1,
            bathrooms: 1,
            area: 1000.0,
            image_url: String::new(),
            is_rent,
            created_at: None,
        }
    }

    /// The eight listings shown on the public listing page
    pub(crate) fn sample_records() -> Vec<PropertyRecord> {
        vec![
            record(1, "2BHK", 25000, "Koramangala, Bangalore", true),
            record(2, "3BHK", 45000, "HSR Layout, Bangalore", true),
            record(3, "1RK", 15000, "Indiranagar, Bangalore", true),
            record(4, "1BHK", 18000, "Whitefield, Bangalore", true),
            record(5, "Land", 5000000, "Electronic City, Bangalore", false),
            record(6, "2BHK", 28000, "Marathahalli, Bangalore", true),
            record(7, "1BHK", 16000, "MG Road, Bangalore", true),
            record(8, "House", 7500000, "Jayanagar, Bangalore", false),
        ]
    }

    fn ids(result: &QueryResult) -> Vec<i64> {
        result.items.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_rent_filter_keeps_input_order() {
        let records = sample_records();
        let params = QueryParams {
            status: Some(ListingStatus::Rent),
            ..Default::default()
        };

        let result = query(&records, &params, SortKey::Default, 1, 6).unwrap();

        assert_eq!(result.total_matches, 6);
        assert_eq!(result.total_pages, 1);
        assert_eq!(ids(&result), vec![1, 2, 3, 4, 6, 7]);
    }

    #[test]
    fn test_type_filter_sorted_by_price() {
        let records = sample_records();
        let params = QueryParams {
            property_type: Some("2BHK".to_string()),
            ..Default::default()
        };

        let result = query(&records, &params, SortKey::PriceAsc, 1, 6).unwrap();

        assert_eq!(ids(&result), vec![1, 6]);
        let prices: Vec<i64> = result.items.iter().map(|r| r.price).collect();
        assert_eq!(prices, vec![25000, 28000]);
    }

    #[test]
    fn test_type_filter_is_case_insensitive() {
        let records = sample_records();
        let params = QueryParams {
            property_type: Some("2bhk".to_string()),
            ..Default::default()
        };
        let result = query(&records, &params, SortKey::Default, 1, 10).unwrap();
        assert_eq!(ids(&result), vec![1, 6]);
    }

    #[test]
    fn test_open_ended_price_with_sale_status() {
        let records = sample_records();
        let params = QueryParams {
            price: Some(PriceRange::at_least(100000.0)),
            status: Some(ListingStatus::Sale),
            ..Default::default()
        };

        let result = query(&records, &params, SortKey::Default, 1, 6).unwrap();

        let prices: Vec<i64> = result.items.iter().map(|r| r.price).collect();
        assert_eq!(prices, vec![5000000, 7500000]);
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let records = sample_records();
        let params = QueryParams {
            price: Some(PriceRange::new(Some(16000.0), Some(25000.0))),
            ..Default::default()
        };
        let result = query(&records, &params, SortKey::Default, 1, 10).unwrap();
        assert_eq!(ids(&result), vec![1, 4, 7]);
    }

    #[test]
    fn test_location_is_case_insensitive() {
        let records = sample_records();
        let lower = QueryParams {
            location: Some("bangalore".to_string()),
            ..Default::default()
        };
        let upper = QueryParams {
            location: Some("BANGALORE".to_string()),
            ..Default::default()
        };

        let a = query(&records, &lower, SortKey::Default, 1, 10).unwrap();
        let b = query(&records, &upper, SortKey::Default, 1, 10).unwrap();

        assert_eq!(a.total_matches, 8);
        assert_eq!(ids(&a), ids(&b));

        let narrow = QueryParams {
            location: Some("KORAMANGALA".to_string()),
            ..Default::default()
        };
        let c = query(&records, &narrow, SortKey::Default, 1, 10).unwrap();
        assert_eq!(ids(&c), vec![1]);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let records = sample_records();
        let result = query(&records, &QueryParams::default(), SortKey::Default, 5, 6).unwrap();

        assert_eq!(result.total_pages, 2);
        assert!(result.is_empty());
        assert_eq!(result.total_matches, 8);
        assert_eq!(result.clamped_page(), 2);
    }

    #[test]
    fn test_empty_input() {
        let result = query(&[], &QueryParams::default(), SortKey::PriceAsc, 1, 6).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.total_matches, 0);
        assert_eq!(result.total_pages, 0);
        assert_eq!(result.clamped_page(), 1);
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let records = sample_records();
        let err = query(&records, &QueryParams::default(), SortKey::Default, 1, 0).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = query(&records, &QueryParams::default(), SortKey::Default, 0, 6).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let records = sample_records();
        let params = QueryParams {
            status: Some(ListingStatus::Rent),
            price: Some(PriceRange::new(Some(10000.0), Some(30000.0))),
            ..Default::default()
        };

        let once: Vec<PropertyRecord> = matching(&records, &params).into_iter().cloned().collect();
        let twice: Vec<PropertyRecord> = matching(&once, &params).into_iter().cloned().collect();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_every_result_satisfies_every_constraint() {
        let records = sample_records();
        let params = QueryParams {
            location: Some("a".to_string()),
            property_type: Some("1bhk".to_string()),
            price: Some(PriceRange::new(Some(0.0), Some(20000.0))),
            status: Some(ListingStatus::Rent),
        };

        let result = query(&records, &params, SortKey::PriceDesc, 1, 10).unwrap();

        assert!(!result.is_empty());
        for r in &result.items {
            assert!(r.location.to_lowercase().contains('a'));
            assert_eq!(r.property_type.to_lowercase(), "1bhk");
            assert!(r.price <= 20000);
            assert!(r.is_rent);
        }
    }

    #[test]
    fn test_price_orders_reverse_each_other() {
        let records = sample_records();
        let params = QueryParams::default();

        let asc = query(&records, &params, SortKey::PriceAsc, 1, 10).unwrap();
        let desc = query(&records, &params, SortKey::PriceDesc, 1, 10).unwrap();

        let mut reversed = ids(&desc);
        reversed.reverse();
        assert_eq!(ids(&asc), reversed);
    }

    #[test]
    fn test_sort_is_stable_for_equal_prices() {
        let records = vec![
            record(10, "1BHK", 20000, "A", true),
            record(11, "1BHK", 15000, "B", true),
            record(12, "1BHK", 20000, "C", true),
            record(13, "1BHK", 15000, "D", true),
        ];

        let asc = query(&records, &QueryParams::default(), SortKey::PriceAsc, 1, 10).unwrap();
        assert_eq!(ids(&asc), vec![11, 13, 10, 12]);

        let desc = query(&records, &QueryParams::default(), SortKey::PriceDesc, 1, 10).unwrap();
        assert_eq!(ids(&desc), vec![10, 12, 11, 13]);
    }

    #[test]
    fn test_newest_puts_undated_last() {
        let mut records = sample_records();
        records[2].created_at = Some(Utc.with_ymd_and_hms(2023, 6, 18, 0, 0, 0).unwrap());
        records[0].created_at = Some(Utc.with_ymd_and_hms(2023, 6, 20, 0, 0, 0).unwrap());
        records[4].created_at = Some(Utc.with_ymd_and_hms(2023, 6, 10, 0, 0, 0).unwrap());

        let result = query(&records, &QueryParams::default(), SortKey::Newest, 1, 10).unwrap();

        assert_eq!(ids(&result), vec![1, 3, 5, 2, 4, 6, 7, 8]);
    }

    #[test]
    fn test_total_matches_independent_of_sort_and_page() {
        let records = sample_records();
        let params = QueryParams {
            status: Some(ListingStatus::Rent),
            ..Default::default()
        };

        for sort in SortKey::ALL {
            for page in 1..=4 {
                let result = query(&records, &params, sort, page, 4).unwrap();
                assert_eq!(result.total_matches, 6);
                assert_eq!(result.total_pages, 2);
            }
        }
    }

    #[test]
    fn test_pages_cover_matched_set_exactly_once() {
        let records = sample_records();
        let params = QueryParams::default();

        for page_size in 1..=9 {
            let first = query(&records, &params, SortKey::PriceAsc, 1, page_size).unwrap();
            let mut seen = Vec::new();
            for page in 1..=first.total_pages {
                let result = query(&records, &params, SortKey::PriceAsc, page, page_size).unwrap();
                assert!(result.items.len() <= page_size);
                seen.extend(ids(&result));
            }

            let all = query(&records, &params, SortKey::PriceAsc, 1, records.len()).unwrap();
            assert_eq!(seen, ids(&all), "page size {page_size}");
        }
    }

    #[test]
    fn test_source_is_not_mutated() {
        let records = sample_records();
        let before = records.clone();
        let _ = query(&records, &QueryParams::default(), SortKey::PriceDesc, 1, 3).unwrap();
        assert_eq!(records, before);
    }

    #[test]
    fn test_navigation_flags() {
        let records = sample_records();
        let first = query(&records, &QueryParams::default(), SortKey::Default, 1, 3).unwrap();
        assert!(!first.has_previous());
        assert!(first.has_next());

        let last = query(&records, &QueryParams::default(), SortKey::Default, 3, 3).unwrap();
        assert!(last.has_previous());
        assert!(!last.has_next());
        assert_eq!(last.items.len(), 2);
    }
}
