//! Core library for the `weatherapp` tool.
//!
//! This crate defines:
//! - Location queries and the normalized weather report
//! - Request URL construction and response parsing for the current-weather API
//! - A lookup service issuing one request per call
//! - A session that tags lookups and keeps late results off the display
//! - Configuration & credentials handling
//!
//! It is used by `weatherapp-cli`, but holds no terminal or UI code itself.

pub mod config;
pub mod error;
pub mod format;
pub mod location;
pub mod model;
pub mod parse;
pub mod query;
pub mod service;
pub mod session;

pub use config::Config;
pub use error::{LookupError, Notice, ParseError};
pub use format::DisplayReport;
pub use location::{FixedLocation, LocationFix, LocationProvider};
pub use model::{LocationQuery, WeatherReport};
pub use query::{QueryBuilder, build_url};
pub use service::{WeatherService, WeatherSource};
pub use session::{PendingLookup, ReportView, Ticket, WeatherSession};
