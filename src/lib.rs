// Showtime search over a cinema chain's public XML feed

pub mod cmd_args;
pub mod config;
pub mod controller;
pub mod error;
pub mod feed;
pub mod filter;
pub mod format;
pub mod models;
pub mod render;
pub mod xml;

// Re-export key types for convenience
pub use config::FeedConfig;
pub use controller::{SearchController, SearchForm, SessionContext, View};
pub use error::FeedError;
pub use feed::{FeedClient, FeedSource, ScheduleQuery};
pub use filter::{filter_shows, FilterCriteria};
pub use format::{format_date, format_start_time};
pub use models::{Event, Genre, Listing, Show, TheatreArea, GENRES};
pub use xml::{parse_events, parse_schedule, parse_theatre_areas, XmlElement};
