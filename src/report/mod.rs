pub mod allocation;
mod policy;
mod types;

pub use allocation::allocate;
pub use policy::AllocationPolicy;
pub use types::{MonthlyReport, SiteRevenue};
