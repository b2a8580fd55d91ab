//! CSV import of events and export of reports.

pub mod export;
pub mod import;
