//! Business logic services for the Wheat Receiving Tracker

pub mod records;
pub mod reporting;
pub mod timeline;

pub use records::RecordService;
pub use reporting::ReportingService;
pub use timeline::TimelineService;
