//! Record model for harvested job listings
//!
//! This module defines the values that flow through a crawl:
//! - Search terms and detail-page references discovered on listing pages
//! - The crawl-wide detail level
//! - Job records, whose shape is fixed by the detail level

mod job;
mod level;
mod term;

pub use job::{
    capture_timestamp, field_names, format_timestamp, DetailRecord, FieldValue, FullRecord,
    JobRecord, SummaryRecord, NO_DATA, NO_REQUIREMENT, NO_TITLE, UNDISCLOSED,
};
pub use level::DetailLevel;
pub use term::{PageReference, SearchTerm};
