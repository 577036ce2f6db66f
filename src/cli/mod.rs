pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::listing::ListingQuery;

#[derive(Parser, Debug)]
#[command(name = "realestate")]
#[command(about = "HomeFinder - property listings for rent and sale", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Listing filters shared by `search` and `query`
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Substring of the listing location, e.g. "bangalore"
    #[arg(long)]
    pub location: Option<String>,

    /// Property type, e.g. 2BHK or House
    #[arg(long = "type")]
    pub property_type: Option<String>,

    /// Price range: "10000-20000", "100000+" or a bare minimum
    #[arg(long)]
    pub price: Option<String>,

    /// rent or sale
    #[arg(long)]
    pub status: Option<String>,

    /// price-low-high, price-high-low or newest
    #[arg(long)]
    pub sort: Option<String>,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,
}

impl FilterArgs {
    pub fn to_listing_query(&self) -> ListingQuery {
        let clean = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        ListingQuery {
            location: clean(&self.location),
            property_type: clean(&self.property_type),
            price: clean(&self.price),
            status: clean(&self.status),
            sort: clean(&self.sort),
            page: Some(self.page.max(1).to_string()),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,
    },

    /// Run database migrations
    Migrate,

    /// Load listings from a YAML fixture into the database
    Seed {
        /// Fixture file (defaults to LISTINGS_FIXTURE_PATH)
        #[arg(short, long)]
        fixture: Option<PathBuf>,
    },

    /// Run a listing query against a fixture file, without a server
    Query {
        /// Fixture file (defaults to LISTINGS_FIXTURE_PATH)
        #[arg(short, long)]
        fixture: Option<PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,

        /// Listings per page
        #[arg(long, default_value_t = 6)]
        page_size: usize,
    },

    /// Search listings on a running server
    Search {
        #[command(flatten)]
        filters: FilterArgs,

        /// Listings per page
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show one listing from a running server
    Show {
        /// Property ID
        property_id: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_command() {
        let cli = Cli::try_parse_from([
            "realestate",
            "search",
            "--location",
            "bangalore",
            "--type",
            "2BHK",
            "--status",
            "rent",
            "--page",
            "2",
        ])
        .unwrap();

        match cli.command {
            Commands::Search { filters, limit } => {
                let query = filters.to_listing_query();
                assert_eq!(query.location.as_deref(), Some("bangalore"));
                assert_eq!(query.property_type.as_deref(), Some("2BHK"));
                assert_eq!(query.page(), 2);
                assert_eq!(limit, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_blank_filters_are_dropped() {
        let filters = FilterArgs {
            location: Some("  ".to_string()),
            page: 0,
            ..Default::default()
        };
        let query = filters.to_listing_query();
        assert_eq!(query.location, None);
        assert_eq!(query.page(), 1);
    }
}
