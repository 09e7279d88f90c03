//! Comparison orchestration and its result model

pub mod errors;
pub mod orchestrator;
pub mod result;

pub use errors::{CompareError, CompareResult, Side};
pub use orchestrator::{Comparator, Stage};
pub use result::{ComparisonRequest, ComparisonResult, TIMESTAMP_FORMAT, format_timestamp};
