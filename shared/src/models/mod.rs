//! Domain models for the Wheat Receiving Tracker

mod record;
mod report;
mod timeline;

pub use record::*;
pub use report::*;
pub use timeline::*;
