//! VPP, site, and battery definitions.

mod types;

pub use types::{Battery, Site, Vpp};

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{LedgerError, Result};

/// Insertion-ordered store of every VPP, site, and battery.
///
/// Re-registering a VPP or site under an existing key replaces the previous
/// definition but keeps its position, so iteration order is always the order
/// in which keys were first seen.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    vpps: IndexMap<String, Vpp>,
    sites: IndexMap<String, Site>,
    /// Serial-number index over every battery ever registered.
    batteries: IndexMap<String, Battery>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `vpp`, replacing any VPP with the same name.
    pub fn insert_vpp(&mut self, vpp: Vpp) {
        debug!(
            name = %vpp.name,
            revenue_percentage = vpp.revenue_percentage,
            daily_fee = vpp.daily_fee,
            "registered vpp"
        );
        self.vpps.insert(vpp.name.clone(), vpp);
    }

    /// Stores `site`, replacing any site with the same NMI.
    pub fn insert_site(&mut self, site: Site) {
        debug!(nmi = %site.nmi, vpp = %site.vpp_name, "registered site");
        self.sites.insert(site.nmi.clone(), site);
    }

    /// Attaches `battery` to the site at `nmi` and indexes it by serial.
    ///
    /// # Errors
    ///
    /// Returns a lookup error, without registering anything, if no site has
    /// that NMI.
    pub fn add_battery(&mut self, nmi: &str, battery: Battery) -> Result<()> {
        let nmi = nmi.trim();
        let site = self
            .sites
            .get_mut(nmi)
            .ok_or_else(|| LedgerError::unknown_site(nmi))?;
        debug!(
            nmi,
            serial_num = %battery.serial_num,
            capacity = battery.capacity,
            "registered battery"
        );
        site.batteries.push(battery.clone());
        self.batteries.insert(battery.serial_num.clone(), battery);
        Ok(())
    }

    /// Parses and stores a VPP definition.
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
        self.insert_vpp(Vpp::parse(name, revenue_percentage, daily_fee)?);
        Ok(())
    }

    /// Stores a site with an empty battery list. `vpp_name` is not verified.
    pub fn create_site(&mut self, vpp_name: &str, nmi: &str, address: &str) {
        self.insert_site(Site::new(vpp_name, nmi, address));
    }

    /// Parses a battery and attaches it to the site at `nmi`.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the site is unknown (checked first), or a
    /// parse error if `capacity` is malformed.
    pub fn create_battery(
        &mut self,
        nmi: &str,
        manufacturer: &str,
        serial_num: &str,
        capacity: &str,
    ) -> Result<()> {
        if !self.sites.contains_key(nmi.trim()) {
            return Err(LedgerError::unknown_site(nmi));
        }
        let battery = Battery::parse(manufacturer, serial_num, capacity)?;
        self.add_battery(nmi, battery)
    }

    pub fn vpp(&self, name: &str) -> Option<&Vpp> {
        self.vpps.get(name)
    }

    pub fn site(&self, nmi: &str) -> Option<&Site> {
        self.sites.get(nmi)
    }

    /// Looks up a battery through the serial-number index.
    pub fn battery(&self, serial_num: &str) -> Option<&Battery> {
        self.batteries.get(serial_num)
    }

    /// All VPPs in registration order.
    pub fn vpps(&self) -> impl Iterator<Item = &Vpp> {
        self.vpps.values()
    }

    /// All sites in registration order.
    pub fn sites(&self) -> impl Iterator<Item = &Site> {
        self.sites.values()
    }

    /// Sum of every registered site's capacity.
    pub fn total_capacity(&self) -> f64 {
        self.sites.values().map(Site::capacity).sum()
    }
}
