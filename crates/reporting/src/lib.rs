//! Ad performance reporting — ad-name classification, lead extraction,
//! and the account / employee rollups behind the report endpoint.

pub mod aggregate;
pub mod classify;
pub mod leads;
pub mod report;

pub use classify::{decode_ad_name, ParsedName};
pub use leads::extract_leads;
pub use report::{generate_report, InsightsSource, Report};
