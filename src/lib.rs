//! Revenue sharing for a virtual power plant: register VPPs, sites, and
//! batteries, import priced energy events, and split each month's revenue
//! between the operator and its sites.

pub mod config;
pub mod error;
/// Imported energy/tariff events and calendar months.
pub mod events;
pub mod io;
pub mod ledger;
pub mod registry;
/// Monthly revenue allocation and report types.
pub mod report;

pub use error::{LedgerError, Result};
pub use ledger::Ledger;
