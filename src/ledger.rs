//! The owned aggregate behind every public operation.

use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::error::{LedgerError, Result};
use crate::events::{EventStore, YearMonth};
use crate::io::import::{read_events, read_events_from_path};
use crate::registry::Registry;
use crate::report::{AllocationPolicy, MonthlyReport, allocate};

/// Registry, event store, and allocation policy for one revenue-sharing
/// scheme.
///
/// All mutation goes through `&mut self`; callers that share a ledger across
/// threads must serialize access themselves.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    registry: Registry,
    events: EventStore,
    policy: AllocationPolicy,
}

impl Ledger {
    /// Creates an empty ledger with the default 80/20, 28-day policy.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: AllocationPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn events(&self) -> &EventStore {
        &self.events
    }

    pub fn policy(&self) -> &AllocationPolicy {
        &self.policy
    }

    /// See [`Registry::create_vpp`].
    ///
    /// # Errors
    ///
    /// Returns a parse error if either numeric argument is malformed.
    pub fn create_vpp(
        &mut self,
        name: &str,
        revenue_percentage: &str,
        daily_fee: &str,
    ) -> Result<()> {
        self.registry.create_vpp(name, revenue_percentage, daily_fee)
    }

    /// See [`Registry::create_site`].
    pub fn create_site(&mut self, vpp_name: &str, nmi: &str, address: &str) {
        self.registry.create_site(vpp_name, nmi, address);
    }

    /// See [`Registry::create_battery`].
    ///
    /// # Errors
    ///
    /// Returns a lookup error for an unknown NMI or a parse error for a
    /// malformed capacity.
    pub fn create_battery(
        &mut self,
        nmi: &str,
        manufacturer: &str,
        serial_num: &str,
        capacity: &str,
    ) -> Result<()> {
        self.registry.create_battery(nmi, manufacturer, serial_num, capacity)
    }

    /// Appends every event in the CSV file at `path` and returns how many
    /// were added. Nothing is appended if any row fails.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the file is missing, or a row parse error.
    pub fn import_events(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let events = read_events_from_path(path)?;
        let count = events.len();
        self.events.extend(events);
        info!(path = %path.display(), count, total = self.events.len(), "imported events");
        Ok(count)
    }

    /// Like [`Ledger::import_events`], reading CSV text from `reader`.
    ///
    /// # Errors
    ///
    /// Returns a row parse error; nothing is appended in that case.
    pub fn import_events_from_reader(&mut self, reader: impl Read) -> Result<usize> {
        let events = read_events(reader)?;
        let count = events.len();
        self.events.extend(events);
        info!(count, total = self.events.len(), "imported events");
        Ok(count)
    }

    /// Removes every stored event. The registry is untouched.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Builds the revenue report for `vpp_name` over the `YYYY-MM` month.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the VPP is unknown, or a parse error if
    /// `year_month` is malformed.
    pub fn create_report(&self, vpp_name: &str, year_month: &str) -> Result<MonthlyReport> {
        let vpp = self
            .registry
            .vpp(vpp_name)
            .ok_or_else(|| LedgerError::unknown_vpp(vpp_name))?;
        let month: YearMonth = year_month.parse()?;

        let report = allocate(vpp, month, &self.registry, &self.events, &self.policy);
        info!(
            vpp = vpp_name,
            month = %month,
            total_revenue = report.total_revenue,
            vpp_revenue = report.vpp_revenue,
            sites = report.site_revenues.len(),
            "created report"
        );
        Ok(report)
    }

    /// [`Ledger::create_report`] serialized as compact JSON.
    ///
    /// # Errors
    ///
    /// Same as [`Ledger::create_report`].
    pub fn create_report_json(&self, vpp_name: &str, year_month: &str) -> Result<String> {
        self.create_report(vpp_name, year_month)?.to_json()
    }
}
