//! Services behind the cropstage commands

pub mod report;
pub mod season;

pub use report::ReportService;
pub use season::{SeasonRequest, SeasonService};
