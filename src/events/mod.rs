mod store;
mod types;

pub use store::EventStore;
pub use types::{Event, YearMonth, parse_event_date};
