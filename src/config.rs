//! TOML portfolio configuration: allocation policy plus the VPPs, sites,
//! and batteries to register.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::ledger::Ledger;
use crate::registry::{Battery, Site, Vpp};
use crate::report::AllocationPolicy;

/// Top-level portfolio configuration parsed from TOML.
///
/// Every section is optional. Load with [`PortfolioConfig::from_toml_file`],
/// check with [`PortfolioConfig::validate`], then turn into a populated
/// [`Ledger`] with [`PortfolioConfig::build_ledger`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortfolioConfig {
    /// Revenue split constants.
    #[serde(default)]
    pub allocation: AllocationPolicy,
    /// VPP operators.
    #[serde(default, rename = "vpp")]
    pub vpps: Vec<VppConfig>,
    /// Enrolled sites.
    #[serde(default, rename = "site")]
    pub sites: Vec<SiteConfig>,
    /// Installed batteries.
    #[serde(default, rename = "battery")]
    pub batteries: Vec<BatteryConfig>,
}

/// One `[[vpp]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VppConfig {
    pub name: String,
    /// Operator's cut, in percent (0–100).
    pub revenue_percentage: f64,
    /// Fee per site per billed day.
    pub daily_fee: f64,
}

/// One `[[site]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Owning VPP name.
    pub vpp: String,
    pub nmi: String,
    #[serde(default)]
    pub address: String,
}

/// One `[[battery]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatteryConfig {
    /// NMI of the site the battery is installed at.
    pub nmi: String,
    pub manufacturer: String,
    pub serial_num: String,
    pub capacity: f64,
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery[2].nmi"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl PortfolioConfig {
    /// Parses a portfolio from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "portfolio".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a portfolio from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut push = |field: String, message: &str| {
            errors.push(ConfigError {
                field,
                message: message.to_string(),
            });
        };

        let a = &self.allocation;
        if !(0.0..=1.0).contains(&a.local_share) {
            push("allocation.local_share".into(), "must be in [0.0, 1.0]");
        }
        if !(0.0..=1.0).contains(&a.capacity_share) {
            push("allocation.capacity_share".into(), "must be in [0.0, 1.0]");
        }
        if a.billing_days == 0 {
            push("allocation.billing_days".into(), "must be > 0");
        }

        for (i, v) in self.vpps.iter().enumerate() {
            if v.name.is_empty() {
                push(format!("vpp[{i}].name"), "must not be empty");
            }
            if !(0.0..=100.0).contains(&v.revenue_percentage) {
                push(format!("vpp[{i}].revenue_percentage"), "must be in [0, 100]");
            }
            if v.daily_fee.is_nan() || v.daily_fee < 0.0 {
                push(format!("vpp[{i}].daily_fee"), "must be >= 0");
            }
        }

        let mut nmis = HashSet::new();
        for (i, s) in self.sites.iter().enumerate() {
            if s.nmi.trim().is_empty() {
                push(format!("site[{i}].nmi"), "must not be empty");
            }
            nmis.insert(s.nmi.trim());
        }

        let mut serials = HashSet::new();
        for (i, b) in self.batteries.iter().enumerate() {
            if !nmis.contains(b.nmi.trim()) {
                push(format!("battery[{i}].nmi"), "must name a declared site");
            }
            if !serials.insert(b.serial_num.as_str()) {
                push(format!("battery[{i}].serial_num"), "must be unique");
            }
            if b.capacity.is_nan() || b.capacity < 0.0 {
                push(format!("battery[{i}].capacity"), "must be >= 0");
            }
        }

        errors
    }

    /// Registers every VPP, site, and battery into a new ledger.
    ///
    /// Entries are applied in file order, so later duplicates overwrite
    /// earlier VPPs and sites exactly as the registry operations do.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a battery names a site that is not declared.
    pub fn build_ledger(&self) -> Result<Ledger, ConfigError> {
        let mut ledger = Ledger::with_policy(self.allocation);
        let registry = ledger.registry_mut();

        for v in &self.vpps {
            registry.insert_vpp(Vpp::new(&v.name, v.revenue_percentage, v.daily_fee));
        }
        for s in &self.sites {
            registry.insert_site(Site::new(&s.vpp, &s.nmi, &s.address));
        }
        for (i, b) in self.batteries.iter().enumerate() {
            let battery = Battery::new(&b.manufacturer, &b.serial_num, b.capacity);
            registry
                .add_battery(&b.nmi, battery)
                .map_err(|e| ConfigError {
                    field: format!("battery[{i}].nmi"),
                    message: e.to_string(),
                })?;
        }

        Ok(ledger)
    }
}
