use serde::Serialize;

use crate::error::{Result, parse_decimal};

/// A virtual power plant operator and its commercial terms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vpp {
    /// Unique operator name.
    pub name: String,
    /// Operator's cut of gross event revenue, in percent (0–100).
    pub revenue_percentage: f64,
    /// Fee charged per site per billed day.
    pub daily_fee: f64,
}

impl Vpp {
    /// Creates a VPP from already-typed terms.
    pub fn new(name: impl Into<String>, revenue_percentage: f64, daily_fee: f64) -> Self {
        Self {
            name: name.into(),
            revenue_percentage,
            daily_fee,
        }
    }

    /// Creates a VPP from decimal text, as supplied by an external caller.
    ///
    /// # Errors
    ///
    /// Returns a parse error if either numeric field is malformed.
    pub fn parse(name: &str, revenue_percentage: &str, daily_fee: &str) -> Result<Self> {
        Ok(Self::new(
            name,
            parse_decimal("revenue_percentage", revenue_percentage)?,
            parse_decimal("daily_fee", daily_fee)?,
        ))
    }
}

/// A physical connection point enrolled in a VPP.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Site {
    /// Network meter identifier.
    pub nmi: String,
    /// Name of the owning VPP. Not checked against the registry.
    pub vpp_name: String,
    /// Street address.
    pub address: String,
    /// Batteries installed at this site, in registration order.
    pub batteries: Vec<Battery>,
}

impl Site {
    /// Creates a site with no batteries. Surrounding whitespace is stripped
    /// from `nmi`, matching how imported events are keyed.
    pub fn new(vpp_name: impl Into<String>, nmi: &str, address: impl Into<String>) -> Self {
        Self {
            nmi: nmi.trim().to_string(),
            vpp_name: vpp_name.into(),
            address: address.into(),
            batteries: Vec::new(),
        }
    }

    /// Total storage capacity across every battery at the site.
    pub fn capacity(&self) -> f64 {
        self.batteries.iter().map(|b| b.capacity).sum()
    }
}

/// A battery installed at exactly one site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Battery {
    /// Manufacturer name.
    pub manufacturer: String,
    /// Globally unique serial number.
    pub serial_num: String,
    /// Usable energy capacity.
    pub capacity: f64,
}

impl Battery {
    pub fn new(
        manufacturer: impl Into<String>,
        serial_num: impl Into<String>,
        capacity: f64,
    ) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            serial_num: serial_num.into(),
            capacity,
        }
    }

    /// Creates a battery whose capacity is given as decimal text.
    ///
    /// # Errors
    ///
    /// Returns a parse error if `capacity` is malformed.
    pub fn parse(manufacturer: &str, serial_num: &str, capacity: &str) -> Result<Self> {
        Ok(Self::new(manufacturer, serial_num, parse_decimal("capacity", capacity)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vpp_parse_keeps_literal_values() {
        let vpp = Vpp::parse("TestVPP", "10", "2.5").ok();
        assert_eq!(vpp, Some(Vpp::new("TestVPP", 10.0, 2.5)));
    }

    #[test]
    fn vpp_parse_rejects_bad_fee() {
        let err = Vpp::parse("TestVPP", "10", "two").err();
        assert!(err.is_some_and(|e| e.is_parse()));
    }

    #[test]
    fn empty_site_has_zero_capacity() {
        let site = Site::new("TestVPP", "1234567890", "123 Test St");
        assert!(site.batteries.is_empty());
        assert_eq!(site.capacity(), 0.0);
    }

    #[test]
    fn site_nmi_is_trimmed_like_event_nmi() {
        let site = Site::new("TestVPP", " 1234567890 ", "123 Test St");
        assert_eq!(site.nmi, "1234567890");
    }

    #[test]
    fn site_capacity_sums_batteries() {
        let mut site = Site::new("TestVPP", "1234567890", "123 Test St");
        site.batteries.push(Battery::new("TestMfg", "SN1", 10.0));
        site.batteries.push(Battery::new("TestMfg", "SN2", 5.5));
        assert_eq!(site.capacity(), 15.5);
    }
}
